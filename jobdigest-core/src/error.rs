use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Job board API error: {0}")]
    JobBoardApi(#[from] JobBoardApiError),

    #[error("Scrape error: {0}")]
    Scrape(#[from] ScrapeError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Mail error: {0}")]
    Mail(#[from] MailError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Permission denied: {operation}")]
    PermissionDenied { operation: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

#[derive(Error, Debug, Clone)]
pub enum JobBoardApiError {
    #[error("Rate limit exceeded. Retry after {retry_after} seconds")]
    RateLimitExceeded { retry_after: u64 },

    #[error("API key rejected by job board")]
    InvalidApiKey,

    #[error("Forbidden access to resource: {resource}")]
    Forbidden { resource: String },

    #[error("API endpoint not found: {endpoint}")]
    EndpointNotFound { endpoint: String },

    #[error("Request timeout")]
    RequestTimeout,

    #[error("Invalid API response: {details}")]
    InvalidResponse { details: String },

    #[error("Server error: {status_code}")]
    ServerError { status_code: u16 },
}

#[derive(Error, Debug, Clone)]
pub enum ScrapeError {
    #[error("Fetching {url} failed with status {status}")]
    FetchFailed { url: String, status: u16 },

    #[error("No text content extracted from {url}")]
    EmptyDocument { url: String },

    #[error("Request timeout fetching {url}")]
    RequestTimeout { url: String },
}

#[derive(Error, Debug, Clone)]
pub enum LlmError {
    #[error("API key invalid or missing for {provider}")]
    InvalidApiKey { provider: String },

    #[error("Rate limit exceeded for {provider}. Retry after {retry_after} seconds")]
    RateLimitExceeded { provider: String, retry_after: u64 },

    #[error("Model not available: {model}")]
    ModelNotAvailable { model: String },

    #[error("Content filtered by provider: {reason}")]
    ContentFiltered { reason: String },

    #[error("Provider service unavailable: {provider}")]
    ServiceUnavailable { provider: String },

    #[error("Request timeout for {provider}")]
    RequestTimeout { provider: String },

    #[error("Invalid response format from {provider}: {details}")]
    InvalidResponseFormat { provider: String, details: String },

    #[error("Empty response from {provider}")]
    EmptyResponse { provider: String },
}

#[derive(Error, Debug, Clone)]
pub enum LedgerError {
    #[error("Failed to write marker for posting {posting_id}: {reason}")]
    MarkerWriteFailed { posting_id: String, reason: String },

    #[error("Ledger bucket unavailable: {bucket}")]
    BucketUnavailable { bucket: String },

    #[error("Permission denied accessing ledger: {location}")]
    PermissionDenied { location: String },
}

#[derive(Error, Debug, Clone)]
pub enum MailError {
    #[error("SMTP connection to {host} failed: {reason}")]
    ConnectionFailed { host: String, reason: String },

    #[error("SMTP authentication failed for {sender}")]
    AuthenticationFailed { sender: String },

    #[error("Invalid mail address: {address}")]
    InvalidAddress { address: String },

    #[error("Sending digest failed: {reason}")]
    SendFailed { reason: String },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("Configuration object not found: {uri}")]
    ObjectNotFound { uri: String },

    #[error("Invalid configuration format: {details}")]
    InvalidFormat { details: String },

    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    #[error("Environment variable not set: {var_name}")]
    MissingEnvironmentVariable { var_name: String },

    #[error("Configuration validation failed: {reason}")]
    ValidationFailed { reason: String },

    #[error("Invalid storage location: {location}")]
    InvalidStorageLocation { location: String },

    #[error("Permission denied accessing config: {path}")]
    PermissionDenied { path: String },

    #[error("Configuration parsing error: {0}")]
    Parse(#[from] serde_json::Error),
}
