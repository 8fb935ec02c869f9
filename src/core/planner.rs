use crate::adapters::http::ReqwestTransport;
use crate::core::cancel::CancellationToken;
use crate::core::executor::RequestExecutor;
use crate::core::interpreter;
use crate::domain::model::{
    Attraction, Itinerary, ItineraryRequest, Preferences, RequestSpec, WeatherForecast,
    DEFAULT_MAX_ATTEMPTS, DEFAULT_TIMEOUT_MS,
};
use crate::domain::ports::{ConfigProvider, Transport};
use crate::utils::error::{PlannerError, Result};
use crate::utils::validation;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::time::Duration;

/// Client for the planner service.
///
/// Each operation is split into a `build_*` method producing a `RequestSpec`
/// and an async method that runs it through the `RequestExecutor` and decodes
/// the payload.
pub struct TripPlanner<T: Transport> {
    base_url: String,
    executor: RequestExecutor<T>,
    timeout_ms: u64,
    max_attempts: u32,
    headers: HashMap<String, String>,
}

impl TripPlanner<ReqwestTransport> {
    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Self::from_config_with_transport(config, ReqwestTransport::new()?)
    }
}

impl<T: Transport> TripPlanner<T> {
    pub fn new(base_url: &str, transport: T) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            executor: RequestExecutor::new(transport),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            headers: HashMap::new(),
        }
    }

    pub fn from_config_with_transport<C: ConfigProvider>(config: &C, transport: T) -> Result<Self> {
        validation::validate_service_url("base_url", config.base_url())?;
        validation::validate_request_limits(config.timeout_ms(), config.max_attempts())?;

        let mut planner = Self::new(config.base_url(), transport);
        planner.timeout_ms = config.timeout_ms();
        planner.max_attempts = config.max_attempts();
        planner.headers = config.headers();
        planner.executor = planner
            .executor
            .with_backoff_base(Duration::from_millis(config.backoff_base_ms()));
        Ok(planner)
    }

    pub fn with_limits(mut self, timeout_ms: u64, max_attempts: u32) -> Self {
        self.timeout_ms = timeout_ms;
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_backoff_base(mut self, backoff_base: Duration) -> Self {
        self.executor = self.executor.with_backoff_base(backoff_base);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn prepare(&self, spec: RequestSpec) -> RequestSpec {
        spec.headers(&self.headers)
            .timeout_ms(self.timeout_ms)
            .max_attempts(self.max_attempts)
    }

    pub fn build_generate_itinerary(
        &self,
        attractions: &[Attraction],
        preferences: &Preferences,
    ) -> Result<RequestSpec> {
        let first = attractions
            .first()
            .ok_or_else(|| PlannerError::ValidationError {
                message: "at least one attraction is required to plan an itinerary".to_string(),
            })?;

        let body = serde_json::to_value(ItineraryRequest {
            attractions,
            preferences,
            latitude: first.location.lat,
            longitude: first.location.lng,
        })?;

        Ok(self.prepare(RequestSpec::post_json(
            format!("{}/api/generate-itinerary", self.base_url),
            body,
        )))
    }

    pub fn build_nearby_attractions(&self, latitude: f64, longitude: f64) -> RequestSpec {
        self.prepare(RequestSpec::get(format!(
            "{}/api/nearby-attractions/{:?}/{:?}",
            self.base_url, latitude, longitude
        )))
    }

    pub fn build_weather(&self, latitude: f64, longitude: f64) -> RequestSpec {
        self.prepare(RequestSpec::get(format!(
            "{}/api/weather/{:?}/{:?}",
            self.base_url, latitude, longitude
        )))
    }

    pub async fn generate_itinerary(
        &self,
        attractions: &[Attraction],
        preferences: &Preferences,
        cancel: &CancellationToken,
    ) -> Result<Itinerary> {
        let spec = self.build_generate_itinerary(attractions, preferences)?;
        tracing::info!(
            "🗺️ Requesting itinerary for {} attractions ({:?} pace)",
            attractions.len(),
            preferences.pace
        );
        let payload = self.run(spec, cancel).await?;
        parse_itinerary_payload(&payload)
    }

    pub async fn nearby_attractions(
        &self,
        latitude: f64,
        longitude: f64,
        cancel: &CancellationToken,
    ) -> Result<Vec<Attraction>> {
        let payload = self
            .run(self.build_nearby_attractions(latitude, longitude), cancel)
            .await?;
        decode(payload, "attraction list")
    }

    pub async fn weather(
        &self,
        latitude: f64,
        longitude: f64,
        cancel: &CancellationToken,
    ) -> Result<WeatherForecast> {
        let payload = self
            .run(self.build_weather(latitude, longitude), cancel)
            .await?;
        decode(payload, "weather forecast")
    }

    async fn run(&self, spec: RequestSpec, cancel: &CancellationToken) -> Result<serde_json::Value> {
        spec.validate()?;
        let payload = self.executor.execute(spec, cancel).await.into_result()?;
        Ok(payload)
    }
}

/// Extracts the `itinerary` string from a generate-itinerary payload and
/// classifies its lines.
pub fn parse_itinerary_payload(payload: &serde_json::Value) -> Result<Itinerary> {
    let text = payload
        .get("itinerary")
        .and_then(serde_json::Value::as_str)
        .ok_or_else(|| PlannerError::UnexpectedPayload {
            message: "response has no 'itinerary' string".to_string(),
        })?;

    let lines = interpreter::parse(text);
    tracing::debug!("Itinerary parsed into {} lines", lines.len());

    Ok(Itinerary {
        text: text.to_string(),
        lines,
    })
}

fn decode<D: DeserializeOwned>(payload: serde_json::Value, what: &str) -> Result<D> {
    serde_json::from_value(payload).map_err(|e| PlannerError::UnexpectedPayload {
        message: format!("invalid {}: {}", what, e),
    })
}
