use crate::config::toml_config::{RequestConfig, TomlConfig};
use crate::core::executor::DEFAULT_BACKOFF_BASE;
use crate::core::ConfigProvider;
use crate::domain::model::{
    Pace, Preferences, Transportation, DEFAULT_MAX_ATTEMPTS, DEFAULT_TIMEOUT_MS,
};
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::{Args, Parser, Subcommand};
use std::collections::HashMap;
use std::path::PathBuf;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

#[derive(Debug, Clone, Parser)]
#[command(name = "trip-planner")]
#[command(about = "Plan a day of sightseeing against the itinerary service")]
pub struct CliConfig {
    /// Planner service root [default: http://localhost:5000]
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// TOML configuration file; explicit flags override its values
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Per-attempt timeout in milliseconds
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    #[arg(long, global = true)]
    pub max_attempts: Option<u32>,

    /// Backoff unit; the wait after attempt i is i times this value
    #[arg(long, global = true)]
    pub backoff_ms: Option<u64>,

    /// Extra request header, `Name: value`
    #[arg(long = "header", global = true, value_parser = parse_header)]
    pub headers: Vec<(String, String)>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Generate an itinerary for a list of attractions
    Plan(PlanArgs),
    /// Classify itinerary text read from a file or stdin
    Parse { file: Option<PathBuf> },
    /// List attractions near a coordinate
    Nearby(CoordinateArgs),
    /// Show the weather forecast for a coordinate
    Weather(CoordinateArgs),
}

#[derive(Debug, Clone, Args)]
pub struct PlanArgs {
    /// JSON file holding an array of attractions
    #[arg(long)]
    pub attractions: PathBuf,

    #[arg(long)]
    pub start_time: Option<String>,

    #[arg(long)]
    pub end_time: Option<String>,

    #[arg(long, value_enum)]
    pub pace: Option<Pace>,

    #[arg(long, value_enum)]
    pub transportation: Option<Transportation>,

    /// Build the itinerary locally instead of calling the service
    #[arg(long)]
    pub offline: bool,

    /// Overall deadline for the whole operation, retries included
    #[arg(long)]
    pub deadline_ms: Option<u64>,
}

#[derive(Debug, Clone, Args)]
pub struct CoordinateArgs {
    #[arg(long, allow_negative_numbers = true)]
    pub lat: f64,

    #[arg(long, allow_negative_numbers = true)]
    pub lng: f64,
}

fn parse_header(raw: &str) -> std::result::Result<(String, String), String> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected 'Name: value', got '{}'", raw))?;
    let name = name.trim();
    if name.is_empty() {
        return Err("header name cannot be empty".to_string());
    }
    Ok((name.to_string(), value.trim().to_string()))
}

impl PlanArgs {
    /// Layers command line preferences over `base`.
    pub fn preferences(&self, base: Preferences) -> Preferences {
        Preferences {
            start_time: self.start_time.clone().unwrap_or(base.start_time),
            end_time: self.end_time.clone().unwrap_or(base.end_time),
            pace: self.pace.unwrap_or(base.pace),
            transportation: self.transportation.unwrap_or(base.transportation),
        }
    }
}

impl CliConfig {
    /// 以命令列參數覆蓋 TOML 設定
    pub fn apply_overrides(&self, config: &mut TomlConfig) {
        let request = config.request.get_or_insert_with(RequestConfig::default);
        if let Some(timeout_ms) = self.timeout_ms {
            request.timeout_ms = Some(timeout_ms);
        }
        if let Some(max_attempts) = self.max_attempts {
            request.max_attempts = Some(max_attempts);
        }
        if let Some(backoff_ms) = self.backoff_ms {
            request.backoff_base_ms = Some(backoff_ms);
        }
        if !self.headers.is_empty() {
            request
                .headers
                .get_or_insert_with(HashMap::new)
                .extend(self.headers.iter().cloned());
        }
        if let Some(base_url) = &self.base_url {
            config.service.base_url = Some(base_url.clone());
        } else if config.service.base_url.is_none() {
            config.service.base_url = Some(DEFAULT_BASE_URL.to_string());
        }
    }
}

impl ConfigProvider for CliConfig {
    fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    fn timeout_ms(&self) -> u64 {
        self.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS)
    }

    fn max_attempts(&self) -> u32 {
        self.max_attempts.unwrap_or(DEFAULT_MAX_ATTEMPTS)
    }

    fn backoff_base_ms(&self) -> u64 {
        self.backoff_ms
            .unwrap_or(DEFAULT_BACKOFF_BASE.as_millis() as u64)
    }

    fn headers(&self) -> HashMap<String, String> {
        self.headers.iter().cloned().collect()
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_service_url("--base-url", self.base_url())?;
        validation::validate_request_limits(self.timeout_ms(), self.max_attempts())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plan_command() {
        let config = CliConfig::parse_from([
            "trip-planner",
            "--max-attempts",
            "5",
            "--header",
            "Authorization: Bearer abc",
            "plan",
            "--attractions",
            "attractions.json",
            "--pace",
            "relaxed",
        ]);

        assert_eq!(config.max_attempts(), 5);
        assert_eq!(config.timeout_ms(), 30_000);
        assert_eq!(
            config.headers().get("Authorization").map(String::as_str),
            Some("Bearer abc")
        );
        assert!(config.validate().is_ok());

        match config.command {
            Command::Plan(args) => {
                let preferences = args.preferences(Preferences::default());
                assert_eq!(preferences.pace, Pace::Relaxed);
                assert_eq!(preferences.start_time, "9:00 AM");
                assert!(!args.offline);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_negative_coordinates() {
        let config =
            CliConfig::parse_from(["trip-planner", "weather", "--lat", "45.67", "--lng", "-111.04"]);
        match config.command {
            Command::Weather(args) => {
                assert_eq!(args.lat, 45.67);
                assert_eq!(args.lng, -111.04);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_overrides_apply_to_toml() {
        let mut toml = TomlConfig::from_toml_str(
            r#"
[service]
base_url = "http://planner.internal:5000"

[request]
timeout_ms = 10000
max_attempts = 2
"#,
        )
        .unwrap();
        let cli = CliConfig::parse_from(["trip-planner", "--max-attempts", "4", "parse"]);

        cli.apply_overrides(&mut toml);

        assert_eq!(toml.base_url(), "http://planner.internal:5000");
        assert_eq!(toml.timeout_ms(), 10_000);
        assert_eq!(toml.max_attempts(), 4);

        let cli = CliConfig::parse_from([
            "trip-planner",
            "--base-url",
            "https://planner.example.com",
            "parse",
        ]);
        cli.apply_overrides(&mut toml);
        assert_eq!(toml.base_url(), "https://planner.example.com");
    }

    #[test]
    fn test_invalid_header_is_rejected() {
        let result = CliConfig::try_parse_from(["trip-planner", "--header", "oops", "parse"]);
        assert!(result.is_err());
    }
}
