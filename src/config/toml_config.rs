use crate::domain::model::OrderDefaults;
use crate::utils::error::{OrderEntryError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Headers the client sets itself; `[endpoint.headers]` may not override them.
pub const RESERVED_HEADERS: [&str; 5] = [
    "authorization",
    "content-type",
    "x-jde-environment",
    "x-jde-device",
    "x-jde-role",
];

/// Connection and default-value settings for one order-entry endpoint.
///
/// Credentials never appear here: unknown tables such as `[credentials]` are
/// rejected at parse time, and the password is always supplied per submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrderEntryConfig {
    pub endpoint: EndpointConfig,
    pub environment: EnvironmentConfig,
    pub defaults: OrderDefaults,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EndpointConfig {
    pub url: String,
    pub timeout_seconds: Option<u64>,
    pub headers: Option<BTreeMap<String, String>>,
    /// Probe the server before posting. Defaults to true.
    pub check_before_submit: Option<bool>,
}

/// Sent as the `X-JDE-*` request headers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnvironmentConfig {
    pub name: String,
    pub device: String,
    pub role: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub json: Option<bool>,
}

impl OrderEntryConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(OrderEntryError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| OrderEntryError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${ORDER_ENTRY_URL})；未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| OrderEntryError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("endpoint.url", &self.endpoint.url)?;

        if let Some(timeout) = self.endpoint.timeout_seconds {
            validation::validate_range("endpoint.timeout_seconds", timeout, 1, 300)?;
        }

        if let Some(headers) = &self.endpoint.headers {
            for name in headers.keys() {
                validation::validate_header_name("endpoint.headers", name)?;
                if RESERVED_HEADERS.contains(&name.to_ascii_lowercase().as_str()) {
                    return Err(OrderEntryError::InvalidConfigValueError {
                        field: "endpoint.headers".to_string(),
                        value: name.clone(),
                        reason: "Header is set by the client and cannot be configured"
                            .to_string(),
                    });
                }
            }
        }

        if let Some(level) = self.log_level() {
            validation::validate_log_level("logging.level", level)?;
        }

        validation::validate_non_empty_string("environment.name", &self.environment.name)?;
        validation::validate_non_empty_string("environment.role", &self.environment.role)?;

        // business_unit keeps its leading padding
        validation::validate_non_empty_string("defaults.business_unit", &self.defaults.business_unit)?;
        validation::validate_non_empty_string("defaults.order_type", &self.defaults.order_type)?;
        validation::validate_non_empty_string(
            "defaults.unit_of_measure",
            &self.defaults.unit_of_measure,
        )?;

        if self.defaults.unit_cost.as_f64().map_or(true, |cost| cost < 0.0) {
            return Err(OrderEntryError::InvalidConfigValueError {
                field: "defaults.unit_cost".to_string(),
                value: self.defaults.unit_cost.to_string(),
                reason: "Unit cost must be a non-negative number".to_string(),
            });
        }

        Ok(())
    }

    pub fn endpoint_url(&self) -> &str {
        &self.endpoint.url
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.endpoint.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS))
    }

    pub fn check_before_submit(&self) -> bool {
        self.endpoint.check_before_submit.unwrap_or(true)
    }

    pub fn log_level(&self) -> Option<&str> {
        self.logging.as_ref().and_then(|l| l.level.as_deref())
    }

    pub fn json_logs(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|l| l.json)
            .unwrap_or(false)
    }
}

impl Validate for OrderEntryConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
