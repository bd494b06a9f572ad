pub mod analyzer;
pub mod llm;
pub mod prompts;
pub mod rate_limiter;

pub use analyzer::FitAnalyzer;
pub use llm::LlmClient;
pub use rate_limiter::{RateLimitConfig, RateLimiter};
