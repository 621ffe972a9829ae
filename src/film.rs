use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

const FULL_STAR: char = '★';
const HALF_STAR: char = '½';

/// One title associated with a profile, as read from the feed or a listing page.
///
/// Listing-derived films only carry `title` and `link`; the rest stays absent.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Film {
    pub title: String,
    pub year: Option<String>,
    pub rating: Option<String>,
    pub watch_date: Option<String>,
    pub link: Option<String>,
    pub rewatch: bool,
}

impl Film {
    /// A film with only a title and a link, as listing pages provide.
    pub fn listed(title: impl Into<String>, link: impl Into<String>) -> Self {
        Film {
            title: title.into(),
            link: Some(link.into()),
            ..Default::default()
        }
    }

    /// Star rating as a number: one per full glyph, plus 0.5 for a half glyph.
    pub fn rating_value(&self) -> Option<f32> {
        let rating = self.rating.as_deref()?;
        let full = rating.chars().filter(|&c| c == FULL_STAR).count();
        let half = rating.ends_with(HALF_STAR);
        if full == 0 && !half {
            return None;
        }
        Some(full as f32 + if half { 0.5 } else { 0.0 })
    }

    /// `watch_date` parsed as a calendar date, e.g. "June 10, 2024".
    pub fn watched_on(&self) -> Option<NaiveDate> {
        let raw = self.watch_date.as_deref()?;
        NaiveDate::parse_from_str(raw.trim(), "%B %d, %Y").ok()
    }

    pub fn display_title(&self) -> String {
        match &self.year {
            Some(year) => format!("{} ({})", self.title, year),
            None => self.title.clone(),
        }
    }
}
