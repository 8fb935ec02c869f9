use crate::core::executor::DEFAULT_BACKOFF_BASE;
use crate::core::ConfigProvider;
use crate::domain::model::{Preferences, DEFAULT_MAX_ATTEMPTS, DEFAULT_TIMEOUT_MS};
use crate::utils::error::{PlannerError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

const MAX_TIMEOUT_MS: u64 = 10 * 60 * 1000;
const MAX_ATTEMPTS_LIMIT: u32 = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub service: ServiceConfig,
    pub request: Option<RequestConfig>,
    pub preferences: Option<Preferences>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub base_url: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestConfig {
    pub timeout_ms: Option<u64>,
    pub max_attempts: Option<u32>,
    pub backoff_base_ms: Option<u64>,
    pub headers: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub verbose: Option<bool>,
    pub json: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PlannerError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| PlannerError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${PLANNER_TOKEN})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| PlannerError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        let base_url = validation::validate_required_field("service.base_url", &self.service.base_url)?;
        validation::validate_service_url("service.base_url", base_url)?;

        if let Some(request) = &self.request {
            if let Some(timeout_ms) = request.timeout_ms {
                validation::validate_range("request.timeout_ms", timeout_ms, 1, MAX_TIMEOUT_MS)?;
            }
            if let Some(max_attempts) = request.max_attempts {
                validation::validate_range(
                    "request.max_attempts",
                    max_attempts,
                    1,
                    MAX_ATTEMPTS_LIMIT,
                )?;
            }
        }

        if let Some(preferences) = &self.preferences {
            validation::parse_clock_time("preferences.startTime", &preferences.start_time)?;
            validation::parse_clock_time("preferences.endTime", &preferences.end_time)?;
        }

        Ok(())
    }

    fn request(&self) -> RequestConfig {
        self.request.clone().unwrap_or_default()
    }

    /// 取得行程偏好設定（未設定時使用預設值）
    pub fn preferences(&self) -> Preferences {
        self.preferences.clone().unwrap_or_default()
    }

    pub fn verbose(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.verbose).unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn base_url(&self) -> &str {
        self.service.base_url.as_deref().unwrap_or_default()
    }

    fn timeout_ms(&self) -> u64 {
        self.request().timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS)
    }

    fn max_attempts(&self) -> u32 {
        self.request().max_attempts.unwrap_or(DEFAULT_MAX_ATTEMPTS)
    }

    fn backoff_base_ms(&self) -> u64 {
        self.request()
            .backoff_base_ms
            .unwrap_or(DEFAULT_BACKOFF_BASE.as_millis() as u64)
    }

    fn headers(&self) -> HashMap<String, String> {
        self.request().headers.unwrap_or_default()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Pace, Transportation};
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[service]
name = "bozeman-planner"
base_url = "http://10.168.234.234:5000"

[request]
timeout_ms = 15000
max_attempts = 5
backoff_base_ms = 250
headers = { "X-Client" = "cli" }

[preferences]
startTime = "8:00 AM"
endTime = "5:00 PM"
pace = "fast"
transportation = "driving"

[logging]
verbose = true
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert!(config.validate().is_ok());
        assert_eq!(config.base_url(), "http://10.168.234.234:5000");
        assert_eq!(config.timeout_ms(), 15_000);
        assert_eq!(config.max_attempts(), 5);
        assert_eq!(config.backoff_base_ms(), 250);
        assert_eq!(config.headers().get("X-Client").map(String::as_str), Some("cli"));
        assert_eq!(config.preferences().pace, Pace::Fast);
        assert_eq!(config.preferences().transportation, Transportation::Driving);
        assert!(config.verbose());
        assert!(!config.json_logs());
    }

    #[test]
    fn test_defaults_when_sections_missing() {
        let config = TomlConfig::from_toml_str(
            r#"
[service]
base_url = "https://planner.example.com"
"#,
        )
        .unwrap();

        assert!(config.validate().is_ok());
        assert_eq!(config.timeout_ms(), 30_000);
        assert_eq!(config.max_attempts(), 3);
        assert_eq!(config.backoff_base_ms(), 1_000);
        assert!(config.headers().is_empty());
        assert_eq!(config.preferences(), Preferences::default());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("TRIP_PLANNER_TEST_URL", "https://test.api.com");

        let toml_content = r#"
[service]
base_url = "${TRIP_PLANNER_TEST_URL}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.base_url(), "https://test.api.com");

        std::env::remove_var("TRIP_PLANNER_TEST_URL");
    }

    #[test]
    fn test_config_validation() {
        let missing_url = TomlConfig::from_toml_str("[service]\nname = \"x\"\n").unwrap();
        assert!(matches!(
            missing_url.validate(),
            Err(PlannerError::MissingConfigError { .. })
        ));

        let bad_attempts = TomlConfig::from_toml_str(
            r#"
[service]
base_url = "http://localhost:5000"

[request]
max_attempts = 0
"#,
        )
        .unwrap();
        assert!(bad_attempts.validate().is_err());

        let bad_url = TomlConfig::from_toml_str("[service]\nbase_url = \"invalid-url\"\n").unwrap();
        assert!(bad_url.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[service]
name = "file-test"
base_url = "http://localhost:5000"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.service.name.as_deref(), Some("file-test"));
    }
}
