use crate::domain::model::{HttpMethod, RequestSpec};
use crate::domain::ports::{Transport, TransportResponse};
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Client;

/// `Transport` backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("trip-planner/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, spec: &RequestSpec) -> std::result::Result<TransportResponse, String> {
        let mut request = match spec.method {
            HttpMethod::Get => self.client.get(&spec.url),
            HttpMethod::Post => self.client.post(&spec.url),
            HttpMethod::Put => self.client.put(&spec.url),
            HttpMethod::Delete => self.client.delete(&spec.url),
        };

        for (name, value) in &spec.headers {
            request = request.header(name, value);
        }

        if let Some(body) = &spec.body {
            request = request.json(body);
        }

        tracing::debug!("Sending {} {}", spec.method, spec.url);
        let response = request.send().await.map_err(|e| e.to_string())?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| e.to_string())?;
        tracing::debug!("Response status {} ({} bytes)", status, body.len());

        Ok(TransportResponse { status, body })
    }
}
