use std::sync::LazyLock;

use super::rules::{ElementRule, FieldRule};
use super::text::split_title_year;
use crate::film::Film;

static ITEM: LazyLock<FieldRule> =
    LazyLock::new(|| FieldRule::new("item", r"(?s)<item>(?P<value>.*?)</item>"));
static TITLE: LazyLock<ElementRule> = LazyLock::new(|| ElementRule::new("title", "title"));
static LINK: LazyLock<ElementRule> = LazyLock::new(|| ElementRule::new("link", "link"));
static DESCRIPTION: LazyLock<ElementRule> =
    LazyLock::new(|| ElementRule::new("description", "description"));
static RATING: LazyLock<FieldRule> =
    LazyLock::new(|| FieldRule::new("rating", r"(?P<value>★{1,5}½?)"));
static WATCH_DATE: LazyLock<FieldRule> = LazyLock::new(|| {
    FieldRule::new(
        "watch_date",
        r"Watched on\s+\w+\s+(?P<value>\w+\s+\d+,\s+\d{4})",
    )
});

const REWATCH_MARKER: &str = "Rewatched";

/// Parse a profile's RSS feed into films, in document order.
pub fn parse(xml: &str) -> Vec<Film> {
    parse_observed(xml, |_| {})
}

/// Like [`parse`], but calls `on_skip` with the index of every item that
/// had no usable title and was dropped.
pub fn parse_observed(xml: &str, mut on_skip: impl FnMut(usize)) -> Vec<Film> {
    ITEM.capture_all(xml)
        .enumerate()
        .filter_map(|(idx, body)| {
            let film = parse_item(body);
            if film.is_none() {
                on_skip(idx);
            }
            film
        })
        .collect()
}

/// One `<item>` body to a film; `None` when it has no title.
pub fn parse_item(body: &str) -> Option<Film> {
    let raw_title = TITLE.extract(body)?;
    let (title, year) = split_title_year(&raw_title);
    if title.is_empty() {
        return None;
    }

    let link = LINK
        .extract(body)
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty());

    let mut film = Film {
        title,
        year,
        link,
        ..Default::default()
    };

    if let Some(desc) = DESCRIPTION.extract(body) {
        let meta = parse_description(&desc);
        film.rating = meta.rating;
        film.watch_date = meta.watch_date;
        film.rewatch = meta.rewatch;
    }

    Some(film)
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ActivityMeta {
    pub rating: Option<String>,
    pub watch_date: Option<String>,
    pub rewatch: bool,
}

pub fn parse_description(desc: &str) -> ActivityMeta {
    ActivityMeta {
        rating: RATING.capture(desc).map(str::to_string),
        watch_date: WATCH_DATE.capture(desc).map(str::to_string),
        rewatch: desc.contains(REWATCH_MARKER),
    }
}
