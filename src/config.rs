use std::time::Duration;

pub const DEFAULT_SITE: &str = "letterboxd.com";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Where and how to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Host name, without scheme or trailing slash.
    pub site: String,
    /// Sent with listing page requests only.
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            site: DEFAULT_SITE.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl Config {
    /// Accepts `letterboxd.com`, `https://letterboxd.com/` and the like.
    pub fn with_site(mut self, site: &str) -> Self {
        let site = site.trim();
        let site = site
            .strip_prefix("https://")
            .or_else(|| site.strip_prefix("http://"))
            .unwrap_or(site);
        self.site = site.trim_end_matches('/').to_string();
        self
    }
}
