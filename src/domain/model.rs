use crate::utils::error::{PlannerError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

/// A single request to be executed with timeout and retry.
///
/// Built per call and consumed by `RequestExecutor::execute`. Use
/// [`RequestSpec::new`] or the builder methods; `validate` rejects a zero
/// timeout or zero attempts.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    pub url: String,
    pub method: HttpMethod,
    pub headers: HashMap<String, String>,
    pub body: Option<serde_json::Value>,
    pub timeout_ms: u64,
    pub max_attempts: u32,
}

impl RequestSpec {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method,
            headers: HashMap::new(),
            body: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    pub fn post_json(url: impl Into<String>, body: serde_json::Value) -> Self {
        Self::new(HttpMethod::Post, url)
            .header("Content-Type", "application/json")
            .body(body)
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn headers(mut self, headers: &HashMap<String, String>) -> Self {
        self.headers
            .extend(headers.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }

    pub fn body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_attempts < 1 {
            return Err(PlannerError::ValidationError {
                message: "max_attempts must be at least 1".to_string(),
            });
        }
        if self.timeout_ms == 0 {
            return Err(PlannerError::ValidationError {
                message: "timeout_ms must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}

/// Why a request did not produce a payload.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    /// An attempt, or the caller's deadline, ran out of time.
    #[error("request timed out")]
    Timeout,

    /// Transport failure or a body that is not valid JSON.
    #[error("network error: {0}")]
    Network(String),

    /// The remote application reported an error.
    #[error("server error {code}: {message}")]
    Server { code: u16, message: String },

    /// The caller cancelled the operation.
    #[error("request cancelled")]
    Cancelled,
}

impl FailureKind {
    pub fn is_retryable(&self) -> bool {
        matches!(self, FailureKind::Timeout | FailureKind::Network(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestOutcome {
    Success(serde_json::Value),
    Failure(FailureKind),
}

impl RequestOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RequestOutcome::Success(_))
    }

    pub fn into_result(self) -> std::result::Result<serde_json::Value, FailureKind> {
        match self {
            RequestOutcome::Success(payload) => Ok(payload),
            RequestOutcome::Failure(kind) => Err(kind),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IconHint {
    Weather,
    Travel,
    Info,
}

/// One classified line of itinerary text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItineraryLine {
    TimeBlock {
        time: String,
        location: String,
        duration: Option<String>,
    },
    DetailTip {
        icon_hint: IconHint,
        text: String,
    },
    PlainText {
        text: String,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct Itinerary {
    pub text: String,
    pub lines: Vec<ItineraryLine>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attraction {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub photos: Vec<serde_json::Value>,
    pub location: GeoPoint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Pace {
    Relaxed,
    #[default]
    Moderate,
    Fast,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Transportation {
    #[default]
    Walking,
    PublicTransport,
    Driving,
}

impl Transportation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Transportation::Walking => "walking",
            Transportation::PublicTransport => "public_transport",
            Transportation::Driving => "driving",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    pub start_time: String,
    pub end_time: String,
    pub pace: Pace,
    pub transportation: Transportation,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            start_time: "9:00 AM".to_string(),
            end_time: "6:00 PM".to_string(),
            pace: Pace::default(),
            transportation: Transportation::default(),
        }
    }
}

/// Body of `POST /api/generate-itinerary`.
#[derive(Debug, Clone, Serialize)]
pub struct ItineraryRequest<'a> {
    pub attractions: &'a [Attraction],
    pub preferences: &'a Preferences,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecast {
    pub date: String,
    pub max_temp: f64,
    pub min_temp: f64,
    pub day_condition: String,
    #[serde(default)]
    pub precipitation_probability: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherForecast {
    pub location: String,
    #[serde(default)]
    pub country: String,
    pub forecast: Vec<DailyForecast>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_spec_defaults() {
        let spec = RequestSpec::get("http://localhost:5000/");
        assert_eq!(spec.timeout_ms, 30_000);
        assert_eq!(spec.max_attempts, 3);
        assert!(spec.body.is_none());
        assert!(spec.validate().is_ok());
    }

    #[test]
    fn test_request_spec_rejects_zero_attempts_and_timeout() {
        assert!(RequestSpec::get("http://x").max_attempts(0).validate().is_err());
        assert!(RequestSpec::get("http://x").timeout_ms(0).validate().is_err());
    }

    #[test]
    fn test_preferences_wire_format() {
        let json = serde_json::to_value(Preferences::default()).unwrap();
        assert_eq!(json["startTime"], "9:00 AM");
        assert_eq!(json["endTime"], "6:00 PM");
        assert_eq!(json["pace"], "moderate");
        assert_eq!(json["transportation"], "walking");

        let parsed: Preferences =
            serde_json::from_value(serde_json::json!({"transportation": "public_transport"}))
                .unwrap();
        assert_eq!(parsed.transportation, Transportation::PublicTransport);
        assert_eq!(parsed.start_time, "9:00 AM");
    }

    #[test]
    fn test_only_transport_failures_are_retryable() {
        assert!(FailureKind::Timeout.is_retryable());
        assert!(FailureKind::Network("reset".into()).is_retryable());
        assert!(!FailureKind::Cancelled.is_retryable());
        assert!(!FailureKind::Server {
            code: 500,
            message: "boom".into()
        }
        .is_retryable());
    }
}
