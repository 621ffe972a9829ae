use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::{Error, Result};
use crate::transport::{RequestOptions, Response, Transport};

/// In-memory transport: answers from a URL table, 404 for anything else,
/// and records every request in order.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: HashMap<String, Response>,
    requests: Mutex<Vec<(String, RequestOptions)>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, url: &str, status: u16, body: impl Into<String>) -> Self {
        self.responses.insert(url.to_string(), Response::new(status, body));
        self
    }

    pub fn requested_urls(&self) -> Vec<String> {
        self.requests.lock().unwrap().iter().map(|(u, _)| u.clone()).collect()
    }

    pub fn requests(&self) -> Vec<(String, RequestOptions)> {
        self.requests.lock().unwrap().clone()
    }
}

impl Transport for ScriptedTransport {
    async fn get(&self, url: &str, options: &RequestOptions) -> Result<Response> {
        self.requests
            .lock()
            .unwrap()
            .push((url.to_string(), options.clone()));
        Ok(self
            .responses
            .get(url)
            .cloned()
            .unwrap_or_else(|| Response::new(404, "")))
    }
}

/// Transport whose every request returns `Err` instead of a response.
/// The error carries `status`, so callers see an `Error::Status`.
pub struct FailingTransport {
    pub status: u16,
}

impl Transport for FailingTransport {
    async fn get(&self, url: &str, _options: &RequestOptions) -> Result<Response> {
        Err(Error::Status {
            url: url.to_string(),
            status: self.status,
        })
    }
}

/// A listing page with one poster per `(slug, title)`.
pub fn listing_page(films: &[(&str, &str)]) -> String {
    let posters: String = films
        .iter()
        .map(|(slug, title)| {
            format!(
                r#"<li class="poster-container"><div class="poster film-poster" data-target-link="/film/{slug}/"><img src="/empty.png" alt="{title}"/></div></li>"#
            )
        })
        .collect();
    format!(r#"<ul class="poster-list">{posters}</ul>"#)
}
