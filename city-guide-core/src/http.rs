//! HTTP transport shared by all resolvers.

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use std::{fmt::Debug, time::Duration};

/// Sent on every request; Nominatim rejects anonymous clients.
pub const USER_AGENT: &str = "city_guide_app";

/// A GET-only text transport.
///
/// Implementations must turn a non-2xx status into an error.
#[async_trait]
pub trait HttpTransport: Send + Sync + Debug {
    async fn get_text(&self, url: &str, query: &[(&str, &str)]) -> Result<String>;
}

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { http })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get_text(&self, url: &str, query: &[(&str, &str)]) -> Result<String> {
        let res = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            // The query carries the API key; keep it out of error messages.
            .map_err(reqwest::Error::without_url)
            .with_context(|| format!("Failed to send request to {url}"))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .with_context(|| format!("Failed to read response body from {url}"))?;

        if !status.is_success() {
            return Err(anyhow!(
                "Request to {} failed with status {}: {}",
                url,
                status,
                truncate_body(&body),
            ));
        }

        Ok(body)
    }
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_body_leaves_short_bodies() {
        assert_eq!(truncate_body("{\"cod\":401}"), "{\"cod\":401}");
    }

    #[test]
    fn truncate_body_cuts_long_bodies_on_char_boundary() {
        let body = "é".repeat(150);
        let out = truncate_body(&body);
        assert!(out.ends_with("..."));
        assert!(out.len() <= 203);
    }

    #[tokio::test]
    async fn refused_connection_is_an_error() {
        let transport = ReqwestTransport::new(Duration::from_secs(5)).unwrap();
        // Nothing listens on the discard port locally.
        let result = transport.get_text("http://127.0.0.1:9", &[]).await;
        assert!(result.is_err());
    }
}
