//! Scripted transport for resolver and pipeline tests.

use crate::http::HttpTransport;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
enum Reply {
    Body(String),
    Fail(String),
}

#[derive(Debug, Default)]
pub struct FakeTransport {
    routes: Mutex<Vec<(String, Reply)>>,
    calls: Mutex<Vec<String>>,
}

impl FakeTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Answer any URL (query included) starting with `prefix` with `body`.
    ///
    /// The most recently added matching route wins.
    pub fn respond(&self, prefix: &str, body: &str) {
        self.routes
            .lock()
            .unwrap()
            .push((prefix.to_string(), Reply::Body(body.to_string())));
    }

    /// Fail any URL starting with `prefix`.
    pub fn fail(&self, prefix: &str, message: &str) {
        self.routes
            .lock()
            .unwrap()
            .push((prefix.to_string(), Reply::Fail(message.to_string())));
    }

    /// Every URL requested so far, with the query string appended.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, prefix: &str) -> Vec<String> {
        self.calls().into_iter().filter(|c| c.starts_with(prefix)).collect()
    }
}

#[async_trait]
impl HttpTransport for FakeTransport {
    async fn get_text(&self, url: &str, query: &[(&str, &str)]) -> Result<String> {
        let mut recorded = url.to_string();
        if !query.is_empty() {
            let pairs: Vec<String> = query.iter().map(|(k, v)| format!("{k}={v}")).collect();
            recorded.push('?');
            recorded.push_str(&pairs.join("&"));
        }
        self.calls.lock().unwrap().push(recorded.clone());

        let routes = self.routes.lock().unwrap();
        let reply = routes
            .iter()
            .rev()
            .find(|(prefix, _)| recorded.starts_with(prefix.as_str()))
            .map(|(_, reply)| reply.clone());

        match reply {
            Some(Reply::Body(body)) => Ok(body),
            Some(Reply::Fail(message)) => Err(anyhow!(message)),
            None => Err(anyhow!("no scripted response for {url}")),
        }
    }
}
