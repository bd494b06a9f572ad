use crate::error::{ConfigError, CoreError};
use crate::storage::{Storage, StorageLocation};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

pub const SENDER_PASSWORD_ENV: &str = "SENDER_PASSWORD";
pub const LLM_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// One job board to query. `api_params` are sent verbatim as query
/// parameters, API keys included.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobBoardConfig {
    pub api_url: String,
    #[serde(default)]
    pub api_params: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub job_boards: Vec<JobBoardConfig>,

    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_requests_per_second")]
    pub model_requests_per_second: f64,

    #[serde(default = "default_match_threshold")]
    pub overall_match_percentage: u8,
    #[serde(default = "default_require_remote")]
    pub require_remote: bool,
    #[serde(default)]
    pub job_preferences: String,

    /// Local path or s3:// URI. Overridable with `--resume`.
    pub resume: String,

    #[serde(default = "default_ledger_dir")]
    pub ledger_dir: String,
    /// When set, ledger markers live under `ledger_dir` in this bucket
    /// instead of the local filesystem.
    #[serde(default)]
    pub ledger_bucket: Option<String>,

    pub recipient_address: String,
    pub sender_address: String,
    /// Usually absent from the file; resolved from SENDER_PASSWORD instead.
    #[serde(default)]
    pub sender_password: Option<String>,
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
}

fn default_model() -> String {
    "gemini-1.5-pro".to_string()
}

fn default_requests_per_second() -> f64 {
    1.0
}

fn default_match_threshold() -> u8 {
    80
}

fn default_require_remote() -> bool {
    true
}

fn default_ledger_dir() -> String {
    "/var/tmp/jobs".to_string()
}

fn default_smtp_host() -> String {
    "smtp.gmail.com".to_string()
}

fn default_smtp_port() -> u16 {
    587
}

impl AppConfig {
    /// Loads and validates the JSON config from a local path or object URI.
    pub async fn load(storage: &Storage, location: &StorageLocation) -> Result<Self, CoreError> {
        let text = storage
            .read_to_string(location)
            .await
            .map_err(|e| {
                if matches!(e, CoreError::NotFound { .. }) {
                    match location {
                        StorageLocation::Local(path) => {
                            CoreError::Config(ConfigError::FileNotFound {
                                path: path.display().to_string(),
                            })
                        }
                        StorageLocation::Object { .. } => {
                            CoreError::Config(ConfigError::ObjectNotFound {
                                uri: location.to_string(),
                            })
                        }
                    }
                } else {
                    e
                }
            })?;

        let config: AppConfig = serde_json::from_str(&text)
            .map_err(|e| CoreError::Config(ConfigError::Parse(e)))?;
        config.validate()?;
        info!(
            "Loaded configuration from {} ({} job boards)",
            location,
            config.job_boards.len()
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.job_boards.is_empty() {
            return Err(ConfigError::MissingField {
                field: "job_boards".to_string(),
            });
        }
        for board in &self.job_boards {
            if board.api_url.is_empty() {
                return Err(ConfigError::MissingField {
                    field: "job_boards.api_url".to_string(),
                });
            }
        }
        if self.overall_match_percentage > 100 {
            return Err(ConfigError::InvalidValue {
                field: "overall_match_percentage".to_string(),
                value: self.overall_match_percentage.to_string(),
            });
        }
        if self.model_requests_per_second <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "model_requests_per_second".to_string(),
                value: self.model_requests_per_second.to_string(),
            });
        }
        if self.resume.is_empty() {
            return Err(ConfigError::MissingField {
                field: "resume".to_string(),
            });
        }
        if self.recipient_address.is_empty() || self.sender_address.is_empty() {
            return Err(ConfigError::MissingField {
                field: "recipient_address/sender_address".to_string(),
            });
        }
        Ok(())
    }

    /// The SMTP password, from the config file or the environment.
    /// Missing both is fatal.
    pub fn resolve_sender_password(&self) -> Result<String, ConfigError> {
        if let Some(password) = &self.sender_password {
            if !password.is_empty() {
                return Ok(password.clone());
            }
        }
        std::env::var(SENDER_PASSWORD_ENV).map_err(|_| ConfigError::MissingEnvironmentVariable {
            var_name: SENDER_PASSWORD_ENV.to_string(),
        })
    }
}

/// The LLM API key. Missing is fatal: no analysis can run without it.
pub fn llm_api_key_from_env() -> Result<String, ConfigError> {
    match std::env::var(LLM_API_KEY_ENV) {
        Ok(key) if !key.is_empty() => Ok(key),
        _ => Err(ConfigError::MissingEnvironmentVariable {
            var_name: LLM_API_KEY_ENV.to_string(),
        }),
    }
}
