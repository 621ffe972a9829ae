use std::sync::LazyLock;

use regex::Regex;

use super::text::decode_entities;
use crate::film::Film;

/// `data-target-link="/film/<slug>/"` followed, within the same poster
/// fragment, by an `<img ... alt="<title>">`.
static POSTER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)data-target-link="(?P<link>/film/[^"]+/)"[^>]*>.*?<img[^>]*alt="(?P<title>[^"]+)""#)
        .unwrap()
});

/// Parse one listing page (watched films or watchlist) into title + link
/// films. Relative film paths are made absolute against `origin`.
///
/// An empty result is valid and means the page had no posters.
pub fn parse(html: &str, origin: &str) -> Vec<Film> {
    let origin = origin.trim_end_matches('/');
    POSTER_RE
        .captures_iter(html)
        .filter_map(|caps| {
            let title = decode_entities(caps["title"].trim());
            if title.is_empty() {
                return None;
            }
            Some(Film::listed(title, format!("{}{}", origin, &caps["link"])))
        })
        .collect()
}
