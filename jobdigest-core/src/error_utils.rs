use crate::error::*;
use tracing::{error, info, warn};

pub trait ErrorExt {
    fn log_error(&self) -> &Self;
    fn log_warn(&self) -> &Self;
    fn is_fatal(&self) -> bool;
    fn user_friendly_message(&self) -> String;
    fn error_code(&self) -> String;
}

impl ErrorExt for CoreError {
    fn log_error(&self) -> &Self {
        error!("CoreError: {}", self);
        match self {
            CoreError::JobBoardApi(e) => {
                error!("Job board API error details: {:?}", e);
            }
            CoreError::Scrape(e) => {
                error!("Scrape error details: {:?}", e);
            }
            CoreError::Llm(e) => {
                error!("LLM error details: {:?}", e);
            }
            CoreError::Ledger(e) => {
                error!("Ledger error details: {:?}", e);
            }
            CoreError::Mail(e) => {
                error!("Mail error details: {:?}", e);
            }
            CoreError::Config(e) => {
                error!("Configuration error details: {:?}", e);
            }
            _ => {}
        }
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("CoreError (warning): {}", self);
        self
    }

    fn is_fatal(&self) -> bool {
        match self {
            CoreError::JobBoardApi(e) => e.is_fatal(),
            CoreError::Scrape(e) => e.is_fatal(),
            CoreError::Llm(e) => e.is_fatal(),
            CoreError::Ledger(e) => e.is_fatal(),
            CoreError::Mail(e) => e.is_fatal(),
            CoreError::Config(e) => e.is_fatal(),
            CoreError::Io(_) => true,
            CoreError::Serialization(_) => false,
            CoreError::Network(_) => false,
            CoreError::InvalidInput { .. } => true,
            CoreError::NotFound { .. } => true,
            CoreError::PermissionDenied { .. } => true,
            CoreError::Internal { .. } => true,
        }
    }

    fn user_friendly_message(&self) -> String {
        match self {
            CoreError::JobBoardApi(e) => e.user_friendly_message(),
            CoreError::Scrape(e) => e.user_friendly_message(),
            CoreError::Llm(e) => e.user_friendly_message(),
            CoreError::Ledger(e) => e.user_friendly_message(),
            CoreError::Mail(e) => e.user_friendly_message(),
            CoreError::Config(e) => e.user_friendly_message(),
            CoreError::Network(_) => {
                "Network connection error. Please check your internet connection.".to_string()
            }
            CoreError::InvalidInput { .. } => {
                "Invalid input provided. Please check your input and try again.".to_string()
            }
            CoreError::NotFound { resource } => format!("Could not find: {}", resource),
            CoreError::PermissionDenied { operation } => {
                format!("Permission denied for: {}", operation)
            }
            _ => "An unexpected error occurred. Please try again later.".to_string(),
        }
    }

    fn error_code(&self) -> String {
        match self {
            CoreError::JobBoardApi(_) => "JOB_BOARD_API".to_string(),
            CoreError::Scrape(_) => "SCRAPE".to_string(),
            CoreError::Llm(_) => "LLM".to_string(),
            CoreError::Ledger(_) => "LEDGER".to_string(),
            CoreError::Mail(_) => "MAIL".to_string(),
            CoreError::Config(_) => "CONFIG".to_string(),
            CoreError::Io(_) => "IO".to_string(),
            CoreError::Serialization(_) => "SERIALIZATION".to_string(),
            CoreError::Network(_) => "NETWORK".to_string(),
            CoreError::InvalidInput { .. } => "INVALID_INPUT".to_string(),
            CoreError::NotFound { .. } => "NOT_FOUND".to_string(),
            CoreError::PermissionDenied { .. } => "PERMISSION_DENIED".to_string(),
            CoreError::Internal { .. } => "INTERNAL".to_string(),
        }
    }
}

impl ErrorExt for JobBoardApiError {
    fn log_error(&self) -> &Self {
        error!("JobBoardApiError: {}", self);
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("JobBoardApiError (warning): {}", self);
        self
    }

    // A board that cannot be fetched leaves nothing to digest.
    fn is_fatal(&self) -> bool {
        true
    }

    fn user_friendly_message(&self) -> String {
        match self {
            JobBoardApiError::RateLimitExceeded { retry_after } => format!(
                "Too many requests to the job board. Please wait {} seconds before running again.",
                retry_after
            ),
            JobBoardApiError::InvalidApiKey => {
                "The job board rejected the API key. Please check your credentials.".to_string()
            }
            JobBoardApiError::Forbidden { resource } => format!(
                "Access denied to {}. You may not have permission to query this board.",
                resource
            ),
            JobBoardApiError::EndpointNotFound { endpoint } => {
                format!("Job board endpoint '{}' was not found.", endpoint)
            }
            JobBoardApiError::RequestTimeout => {
                "Request to the job board timed out. Please try again.".to_string()
            }
            _ => "Job board API error occurred. Please try again later.".to_string(),
        }
    }

    fn error_code(&self) -> String {
        match self {
            JobBoardApiError::RateLimitExceeded { .. } => "BOARD_RATE_LIMIT".to_string(),
            JobBoardApiError::InvalidApiKey => "BOARD_INVALID_API_KEY".to_string(),
            JobBoardApiError::Forbidden { .. } => "BOARD_FORBIDDEN".to_string(),
            JobBoardApiError::EndpointNotFound { .. } => "BOARD_ENDPOINT_NOT_FOUND".to_string(),
            JobBoardApiError::RequestTimeout => "BOARD_TIMEOUT".to_string(),
            JobBoardApiError::InvalidResponse { .. } => "BOARD_INVALID_RESPONSE".to_string(),
            JobBoardApiError::ServerError { .. } => "BOARD_SERVER_ERROR".to_string(),
        }
    }
}

impl ErrorExt for ScrapeError {
    fn log_error(&self) -> &Self {
        error!("ScrapeError: {}", self);
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("ScrapeError (warning): {}", self);
        self
    }

    // A posting whose page cannot be scraped is simply excluded.
    fn is_fatal(&self) -> bool {
        false
    }

    fn user_friendly_message(&self) -> String {
        match self {
            ScrapeError::FetchFailed { url, .. } => {
                format!("Could not fetch the posting page at {}.", url)
            }
            ScrapeError::EmptyDocument { url } => {
                format!("The posting page at {} contained no readable text.", url)
            }
            ScrapeError::RequestTimeout { url } => {
                format!("Fetching the posting page at {} timed out.", url)
            }
        }
    }

    fn error_code(&self) -> String {
        match self {
            ScrapeError::FetchFailed { .. } => "SCRAPE_FETCH_FAILED".to_string(),
            ScrapeError::EmptyDocument { .. } => "SCRAPE_EMPTY_DOCUMENT".to_string(),
            ScrapeError::RequestTimeout { .. } => "SCRAPE_TIMEOUT".to_string(),
        }
    }
}

impl ErrorExt for LlmError {
    fn log_error(&self) -> &Self {
        error!("LlmError: {}", self);
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("LlmError (warning): {}", self);
        self
    }

    // A missing or rejected key kills every analysis; anything else degrades
    // to "no opinion" for the affected posting.
    fn is_fatal(&self) -> bool {
        matches!(self, LlmError::InvalidApiKey { .. })
    }

    fn user_friendly_message(&self) -> String {
        match self {
            LlmError::InvalidApiKey { provider } => format!(
                "Invalid API key for {}. Please update your credentials.",
                provider
            ),
            LlmError::RateLimitExceeded {
                provider,
                retry_after,
            } => format!(
                "Rate limit exceeded for {}. Please wait {} seconds.",
                provider, retry_after
            ),
            LlmError::ModelNotAvailable { model } => format!(
                "Model '{}' is not available. Please try a different model.",
                model
            ),
            LlmError::ContentFiltered { .. } => {
                "Content was filtered by the AI provider's safety systems.".to_string()
            }
            LlmError::ServiceUnavailable { provider } => format!(
                "{} service is temporarily unavailable. Please try again later.",
                provider
            ),
            _ => "AI service error occurred. Please try again later.".to_string(),
        }
    }

    fn error_code(&self) -> String {
        match self {
            LlmError::InvalidApiKey { .. } => "LLM_INVALID_API_KEY".to_string(),
            LlmError::RateLimitExceeded { .. } => "LLM_RATE_LIMIT".to_string(),
            LlmError::ModelNotAvailable { .. } => "LLM_MODEL_NOT_AVAILABLE".to_string(),
            LlmError::ContentFiltered { .. } => "LLM_CONTENT_FILTERED".to_string(),
            LlmError::ServiceUnavailable { .. } => "LLM_SERVICE_UNAVAILABLE".to_string(),
            LlmError::RequestTimeout { .. } => "LLM_TIMEOUT".to_string(),
            LlmError::InvalidResponseFormat { .. } => "LLM_INVALID_RESPONSE".to_string(),
            LlmError::EmptyResponse { .. } => "LLM_EMPTY_RESPONSE".to_string(),
        }
    }
}

impl ErrorExt for LedgerError {
    fn log_error(&self) -> &Self {
        error!("LedgerError: {}", self);
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("LedgerError (warning): {}", self);
        self
    }

    // A broken ledger would re-notify every posting on the next run.
    fn is_fatal(&self) -> bool {
        true
    }

    fn user_friendly_message(&self) -> String {
        match self {
            LedgerError::MarkerWriteFailed { posting_id, .. } => format!(
                "Could not record posting {} as seen. Check ledger permissions.",
                posting_id
            ),
            LedgerError::BucketUnavailable { bucket } => {
                format!("Ledger bucket '{}' is unavailable.", bucket)
            }
            LedgerError::PermissionDenied { location } => {
                format!("Permission denied accessing the ledger at {}.", location)
            }
        }
    }

    fn error_code(&self) -> String {
        match self {
            LedgerError::MarkerWriteFailed { .. } => "LEDGER_MARKER_WRITE_FAILED".to_string(),
            LedgerError::BucketUnavailable { .. } => "LEDGER_BUCKET_UNAVAILABLE".to_string(),
            LedgerError::PermissionDenied { .. } => "LEDGER_PERMISSION_DENIED".to_string(),
        }
    }
}

impl ErrorExt for MailError {
    fn log_error(&self) -> &Self {
        error!("MailError: {}", self);
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("MailError (warning): {}", self);
        self
    }

    // An undelivered digest defeats the run.
    fn is_fatal(&self) -> bool {
        true
    }

    fn user_friendly_message(&self) -> String {
        match self {
            MailError::ConnectionFailed { host, .. } => {
                format!("Could not connect to the mail server at {}.", host)
            }
            MailError::AuthenticationFailed { sender } => format!(
                "Mail server rejected the credentials for {}. Please check the sender password.",
                sender
            ),
            MailError::InvalidAddress { address } => {
                format!("'{}' is not a valid mail address.", address)
            }
            MailError::SendFailed { .. } => {
                "The digest email could not be sent. Please try again later.".to_string()
            }
        }
    }

    fn error_code(&self) -> String {
        match self {
            MailError::ConnectionFailed { .. } => "MAIL_CONNECTION_FAILED".to_string(),
            MailError::AuthenticationFailed { .. } => "MAIL_AUTH_FAILED".to_string(),
            MailError::InvalidAddress { .. } => "MAIL_INVALID_ADDRESS".to_string(),
            MailError::SendFailed { .. } => "MAIL_SEND_FAILED".to_string(),
        }
    }
}

impl ErrorExt for ConfigError {
    fn log_error(&self) -> &Self {
        error!("ConfigError: {}", self);
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("ConfigError (warning): {}", self);
        self
    }

    fn is_fatal(&self) -> bool {
        true
    }

    fn user_friendly_message(&self) -> String {
        match self {
            ConfigError::FileNotFound { path } => {
                format!("Configuration file not found at {}.", path)
            }
            ConfigError::ObjectNotFound { uri } => {
                format!("Configuration object not found at {}.", uri)
            }
            ConfigError::InvalidFormat { .. } => {
                "Configuration file format is invalid. Please check the settings.".to_string()
            }
            ConfigError::MissingField { field } => {
                format!("Required configuration field '{}' is missing.", field)
            }
            ConfigError::InvalidValue { field, .. } => {
                format!("Invalid value for configuration field '{}'.", field)
            }
            ConfigError::MissingEnvironmentVariable { var_name } => format!(
                "Environment variable '{}' is required but not set.",
                var_name
            ),
            ConfigError::InvalidStorageLocation { location } => {
                format!("'{}' is not a valid path or object-storage URI.", location)
            }
            ConfigError::PermissionDenied { .. } => {
                "Permission denied accessing configuration. Please check file permissions."
                    .to_string()
            }
            _ => "Configuration error occurred. Please check your settings.".to_string(),
        }
    }

    fn error_code(&self) -> String {
        match self {
            ConfigError::FileNotFound { .. } => "CONFIG_FILE_NOT_FOUND".to_string(),
            ConfigError::ObjectNotFound { .. } => "CONFIG_OBJECT_NOT_FOUND".to_string(),
            ConfigError::InvalidFormat { .. } => "CONFIG_INVALID_FORMAT".to_string(),
            ConfigError::MissingField { .. } => "CONFIG_MISSING_FIELD".to_string(),
            ConfigError::InvalidValue { .. } => "CONFIG_INVALID_VALUE".to_string(),
            ConfigError::MissingEnvironmentVariable { .. } => "CONFIG_MISSING_ENV_VAR".to_string(),
            ConfigError::ValidationFailed { .. } => "CONFIG_VALIDATION_FAILED".to_string(),
            ConfigError::InvalidStorageLocation { .. } => {
                "CONFIG_INVALID_STORAGE_LOCATION".to_string()
            }
            ConfigError::PermissionDenied { .. } => "CONFIG_PERMISSION_DENIED".to_string(),
            ConfigError::Parse(_) => "CONFIG_PARSE_ERROR".to_string(),
        }
    }
}

pub struct ErrorReporter {
    report_errors: bool,
    report_warnings: bool,
}

impl ErrorReporter {
    pub fn new() -> Self {
        Self {
            report_errors: true,
            report_warnings: true,
        }
    }

    pub fn with_error_reporting(mut self, enabled: bool) -> Self {
        self.report_errors = enabled;
        self
    }

    pub fn with_warning_reporting(mut self, enabled: bool) -> Self {
        self.report_warnings = enabled;
        self
    }

    pub fn report_error(&self, error: &CoreError) {
        if self.report_errors {
            error.log_error();
            info!("Error code: {}", error.error_code());
            info!("User message: {}", error.user_friendly_message());
        }
    }

    pub fn report_warning(&self, error: &CoreError) {
        if self.report_warnings {
            error.log_warn();
        }
    }
}

impl Default for ErrorReporter {
    fn default() -> Self {
        Self::new()
    }
}
