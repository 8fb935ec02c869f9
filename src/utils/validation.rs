use crate::utils::error::{PlannerError, Result};
use chrono::NaiveTime;
use url::Url;

/// Clock format shared by preferences and the offline itinerary.
pub const CLOCK_FORMAT: &str = "%I:%M %p";

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field: &str, value: impl ToString, reason: impl Into<String>) -> PlannerError {
    PlannerError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// Checks that `raw` can serve as the planner service root.
///
/// Endpoint paths are appended to it, so query strings and fragments are
/// rejected along with non-HTTP schemes.
pub fn validate_service_url(field: &str, raw: &str) -> Result<Url> {
    if raw.trim().is_empty() {
        return Err(invalid(field, raw, "the planner service URL is empty"));
    }

    let url = Url::parse(raw).map_err(|e| invalid(field, raw, format!("not a URL: {}", e)))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(
            field,
            raw,
            format!("the planner service speaks http or https, not {}", url.scheme()),
        ));
    }
    if url.host_str().is_none() {
        return Err(invalid(field, raw, "the planner service URL has no host"));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid(
            field,
            raw,
            "endpoint paths are appended to this URL; drop the query or fragment",
        ));
    }
    Ok(url)
}

/// Every request needs a non-zero per-attempt timeout and at least one attempt.
pub fn validate_request_limits(timeout_ms: u64, max_attempts: u32) -> Result<()> {
    if timeout_ms == 0 {
        return Err(invalid("timeout_ms", timeout_ms, "each attempt needs a timeout above 0 ms"));
    }
    if max_attempts == 0 {
        return Err(invalid("max_attempts", max_attempts, "at least one attempt is required"));
    }
    Ok(())
}

pub fn validate_required_field<'a, T>(field: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| PlannerError::MissingConfigError {
        field: field.to_string(),
    })
}

/// Parses a preference time such as `9:00 AM`.
pub fn parse_clock_time(field: &str, value: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), CLOCK_FORMAT)
        .map_err(|e| invalid(field, value, format!("expected a time like '9:00 AM': {}", e)))
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(invalid(
            field,
            value,
            format!("must be between {} and {}", min, max),
        ));
    }
    Ok(())
}
