use std::future::Future;
use std::time::Duration;

use reqwest::header::USER_AGENT;
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Per-request knobs. Listing pages send a browser-like user agent; the feed
/// needs nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    pub user_agent: Option<String>,
}

impl RequestOptions {
    pub fn with_user_agent(user_agent: impl Into<String>) -> Self {
        RequestOptions {
            user_agent: Some(user_agent.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status: u16,
    body: String,
}

impl Response {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Response {
            status,
            body: body.into(),
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn text(self) -> String {
        self.body
    }
}

/// HTTP GET seam. A non-success status is an `Ok` response; `Err` is kept
/// for requests that never produced one.
pub trait Transport {
    fn get(
        &self,
        url: &str,
        options: &RequestOptions,
    ) -> impl Future<Output = Result<Response>> + Send;
}

/// `reqwest`-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(Error::Client)?;
        Ok(HttpTransport { client })
    }
}

impl Transport for HttpTransport {
    async fn get(&self, url: &str, options: &RequestOptions) -> Result<Response> {
        debug!("GET {}", url);
        let mut request = self.client.get(url);
        if let Some(ua) = &options.user_agent {
            request = request.header(USER_AGENT, ua);
        }

        let response = request.send().await.map_err(|source| {
            warn!("Request to {} failed: {}", url, source);
            Error::Request {
                url: url.to_string(),
                source,
            }
        })?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            warn!("{} returned HTTP {}", url, status);
            return Ok(Response::new(status, String::new()));
        }

        let body = response.text().await.map_err(|source| Error::Request {
            url: url.to_string(),
            source,
        })?;
        debug!("{} -> {} ({} bytes)", url, status, body.len());
        Ok(Response::new(status, body))
    }
}
