use crate::film::Film;
use crate::parser::listing;
use crate::transport::{RequestOptions, Transport};

/// The two paginated catalog views of a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingKind {
    Films,
    Watchlist,
}

impl ListingKind {
    /// Highest page index ever requested.
    pub fn ceiling(self) -> u32 {
        match self {
            ListingKind::Films => 50,
            ListingKind::Watchlist => 20,
        }
    }

    fn path(self) -> &'static str {
        match self {
            ListingKind::Films => "films",
            ListingKind::Watchlist => "watchlist",
        }
    }

    pub fn page_url(self, site: &str, username: &str, page: u32) -> String {
        format!("https://{}/{}/{}/page/{}/", site, username, self.path(), page)
    }
}

/// Why a traversal ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stop {
    /// Every page up to the ceiling had films.
    Ceiling,
    /// The request for this page failed or returned a non-success status.
    Failed { page: u32 },
    /// This page parsed to zero films.
    Empty { page: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Traversal {
    pub films: Vec<Film>,
    pub pages: u32,
    pub stop: Stop,
}

/// Fetch pages 1, 2, ... of a listing one at a time until a page fails,
/// comes back empty, or the kind's ceiling is passed. Never errors; films
/// gathered before the stop are kept.
pub async fn traverse<T: Transport>(
    transport: &T,
    kind: ListingKind,
    site: &str,
    username: &str,
    options: &RequestOptions,
) -> Traversal {
    let origin = format!("https://{}", site);
    let mut films = Vec::new();
    let mut page = 1;

    let stop = loop {
        if page > kind.ceiling() {
            break Stop::Ceiling;
        }

        let url = kind.page_url(site, username, page);
        let body = match transport.get(&url, options).await {
            Ok(response) if response.is_success() => response.text(),
            _ => break Stop::Failed { page },
        };

        let page_films = listing::parse(&body, &origin);
        if page_films.is_empty() {
            break Stop::Empty { page };
        }
        films.extend(page_films);
        page += 1;
    };

    let pages = match stop {
        Stop::Ceiling => kind.ceiling(),
        Stop::Failed { page } | Stop::Empty { page } => page - 1,
    };
    Traversal { films, pages, stop }
}
