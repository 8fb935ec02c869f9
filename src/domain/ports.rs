use crate::domain::model::RequestSpec;
use async_trait::async_trait;
use std::collections::HashMap;

/// Raw response of a single transport round-trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs one attempt of a request. Timeouts, retries and cancellation are
/// applied by the caller by dropping the returned future.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, spec: &RequestSpec) -> std::result::Result<TransportResponse, String>;
}

pub trait ConfigProvider: Send + Sync {
    fn base_url(&self) -> &str;
    fn timeout_ms(&self) -> u64;
    fn max_attempts(&self) -> u32;
    fn backoff_base_ms(&self) -> u64;
    fn headers(&self) -> HashMap<String, String> {
        HashMap::new()
    }
}
