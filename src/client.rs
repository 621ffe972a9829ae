use std::fmt;

use tracing::{debug, info};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::film::Film;
use crate::paginate::{self, ListingKind};
use crate::parser::feed;
use crate::transport::{HttpTransport, RequestOptions, Transport};

type SkipHook = Box<dyn Fn(usize) + Send + Sync>;

/// Profile fetcher bound to one transport and site.
///
/// Calls are independent: nothing is cached or shared between them.
pub struct Letterboxd<T> {
    transport: T,
    config: Config,
    on_skipped_item: Option<SkipHook>,
}

impl Letterboxd<HttpTransport> {
    pub fn from_config(config: Config) -> Result<Self> {
        let transport = HttpTransport::new(config.timeout)?;
        Ok(Letterboxd::new(transport, config))
    }
}

impl<T: Transport> Letterboxd<T> {
    pub fn new(transport: T, config: Config) -> Self {
        Letterboxd {
            transport,
            config,
            on_skipped_item: None,
        }
    }

    /// Called with the zero-based index of each feed item dropped for
    /// lacking a title.
    pub fn on_skipped_item(mut self, hook: impl Fn(usize) + Send + Sync + 'static) -> Self {
        self.on_skipped_item = Some(Box::new(hook));
        self
    }

    pub fn feed_url(&self, username: &str) -> String {
        format!("https://{}/{}/rss/", self.config.site, username)
    }

    /// Recent diary activity from the profile's RSS feed, newest first as the
    /// feed orders it. Fails if the feed cannot be fetched.
    pub async fn fetch_recent_activity(&self, username: &str) -> Result<Vec<Film>> {
        let url = self.feed_url(username);
        let response = self.transport.get(&url, &RequestOptions::default()).await?;
        if !response.is_success() {
            return Err(Error::Status {
                url,
                status: response.status(),
            });
        }

        let xml = response.text();
        let films = match &self.on_skipped_item {
            Some(hook) => feed::parse_observed(&xml, |idx| hook(idx)),
            None => feed::parse(&xml),
        };
        info!("{} feed items for {}", films.len(), username);
        Ok(films)
    }

    /// Every film on the profile's watched list, up to 50 pages.
    pub async fn fetch_watched_films(&self, username: &str) -> Vec<Film> {
        self.fetch_listing(ListingKind::Films, username).await
    }

    /// The profile's watchlist, up to 20 pages.
    pub async fn fetch_watchlist(&self, username: &str) -> Vec<Film> {
        self.fetch_listing(ListingKind::Watchlist, username).await
    }

    async fn fetch_listing(&self, kind: ListingKind, username: &str) -> Vec<Film> {
        let options = RequestOptions::with_user_agent(self.config.user_agent.as_str());
        let traversal =
            paginate::traverse(&self.transport, kind, &self.config.site, username, &options).await;
        debug!("{:?} for {} stopped: {:?}", kind, username, traversal.stop);
        info!(
            "{:?} for {}: {} films over {} pages",
            kind,
            username,
            traversal.films.len(),
            traversal.pages
        );
        traversal.films
    }
}

impl<T> fmt::Debug for Letterboxd<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Letterboxd")
            .field("config", &self.config)
            .field("on_skipped_item", &self.on_skipped_item.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::testing::{listing_page, FailingTransport, ScriptedTransport};

    const FEED: &str = "https://letterboxd.com/someone/rss/";

    fn matrix_feed() -> String {
        "<rss><channel><item><title>The Matrix, 1999</title>\
         <link>https://x/the-matrix/</link>\
         <description><![CDATA[<p>★★★★★</p><p>Watched on Monday June 10, 2024.</p>]]></description>\
         </item><item><link>https://x/untitled/</link></item></channel></rss>"
            .to_string()
    }

    #[tokio::test]
    async fn recent_activity_from_feed() {
        let transport = ScriptedTransport::new().respond(FEED, 200, matrix_feed());
        let client = Letterboxd::new(transport, Config::default());

        let films = client.fetch_recent_activity("someone").await.unwrap();
        assert_eq!(films.len(), 1);
        assert_eq!(films[0].title, "The Matrix");
        assert_eq!(films[0].watch_date.as_deref(), Some("June 10, 2024"));

        // The feed goes out without a custom user agent.
        let requests = client.transport.requests();
        assert_eq!(requests, vec![(FEED.to_string(), RequestOptions::default())]);
    }

    #[tokio::test]
    async fn skip_hook_sees_untitled_items() {
        let skipped = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&skipped);
        let transport = ScriptedTransport::new().respond(FEED, 200, matrix_feed());
        let client = Letterboxd::new(transport, Config::default())
            .on_skipped_item(move |_| {
                seen.fetch_add(1, Ordering::SeqCst);
            });

        let films = client.fetch_recent_activity("someone").await.unwrap();
        assert_eq!(films.len(), 1);
        assert_eq!(skipped.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn feed_status_failure_surfaces() {
        let client = Letterboxd::new(ScriptedTransport::new(), Config::default());
        let err = client.fetch_recent_activity("someone").await.unwrap_err();
        assert!(matches!(err, Error::Status { status: 404, .. }));
        assert_eq!(err.to_string(), format!("{FEED} returned HTTP 404"));
    }

    #[tokio::test]
    async fn feed_transport_error_surfaces() {
        let client = Letterboxd::new(FailingTransport { status: 503 }, Config::default());
        assert!(client.fetch_recent_activity("someone").await.is_err());
    }

    #[tokio::test]
    async fn watched_films_use_user_agent_and_site() {
        let config = Config::default().with_site("example.org");
        let transport = ScriptedTransport::new().respond(
            "https://example.org/someone/films/page/1/",
            200,
            listing_page(&[("heat", "Heat")]),
        );
        let client = Letterboxd::new(transport, config);

        let films = client.fetch_watched_films("someone").await;
        assert_eq!(films, vec![Film::listed("Heat", "https://example.org/film/heat/")]);

        let requests = client.transport.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].0, "https://example.org/someone/films/page/2/");
        assert!(requests
            .iter()
            .all(|(_, o)| o.user_agent.as_deref() == Some("Mozilla/5.0")));
    }

    #[tokio::test]
    async fn watchlist_failure_is_empty_not_error() {
        let client = Letterboxd::new(FailingTransport { status: 500 }, Config::default());
        assert!(client.fetch_watchlist("someone").await.is_empty());
    }
}
