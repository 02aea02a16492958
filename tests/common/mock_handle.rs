use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use url::Url;

use spike_clientset::{ClientError, ClientResult, GroupVersion, RateLimiter, RestInterface};

/// In-memory request-dispatch handle serving canned JSON by path
#[derive(Debug)]
pub struct MockHandle {
    base_url: Url,
    responses: HashMap<String, Value>,
    requests: AtomicUsize,
}

impl MockHandle {
    pub fn new() -> Self {
        Self {
            base_url: Url::parse("http://mock.invalid").expect("static URL"),
            responses: HashMap::new(),
            requests: AtomicUsize::new(0),
        }
    }

    pub fn with_response(mut self, path: &str, body: Value) -> Self {
        self.responses.insert(path.to_string(), body);
        self
    }

    pub fn into_handle(self) -> Arc<dyn RestInterface> {
        Arc::new(self)
    }

    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

impl Default for MockHandle {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RestInterface for MockHandle {
    fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn api_path(&self) -> &str {
        ""
    }

    fn group_version(&self) -> Option<&GroupVersion> {
        None
    }

    fn rate_limiter(&self) -> Option<&Arc<dyn RateLimiter>> {
        None
    }

    async fn get_json(&self, path: &str) -> ClientResult<Value> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        self.responses
            .get(path)
            .cloned()
            .ok_or_else(|| ClientError::api_error(404, format!("{} not found", path)))
    }
}
