use crate::llm::{LlmClient, PROVIDER};
use crate::prompts;
use crate::rate_limiter::{RateLimitConfig, RateLimiter};
use jobdigest_core::{CoreError, ErrorExt, FitAnalysis, LlmError};
use std::sync::Arc;
use tracing::{debug, warn};

/// Two-stage analysis chain: clean the scraped page text, then score the
/// cleaned description against preferences and resume. Every model call
/// holds a permit from the shared rate limiter.
pub struct FitAnalyzer {
    llm: LlmClient,
    rate_limiter: Arc<RateLimiter>,
}

impl FitAnalyzer {
    pub fn new(model: String, api_key: String, requests_per_second: f64) -> Self {
        let rate_limiter = Arc::new(RateLimiter::new(RateLimitConfig::from_requests_per_second(
            requests_per_second,
        )));

        Self {
            llm: LlmClient::new(model, api_key),
            rate_limiter,
        }
    }

    /// Analyzes one posting. `Ok(None)` means the chain failed for this
    /// posting and it should be excluded ("no opinion"); only credential
    /// failures surface as `Err` and abort the batch.
    pub async fn analyze(
        &self,
        job_description: &str,
        preferences: &str,
        resume: &str,
    ) -> Result<Option<FitAnalysis>, CoreError> {
        match self.run_chain(job_description, preferences, resume).await {
            Ok(analysis) => Ok(Some(analysis)),
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                warn!("Dropping posting analysis: {}", e);
                Ok(None)
            }
        }
    }

    async fn run_chain(
        &self,
        job_description: &str,
        preferences: &str,
        resume: &str,
    ) -> Result<FitAnalysis, CoreError> {
        let cleaned = self.clean_description(job_description).await?;
        self.score_fit(&cleaned, preferences, resume).await
    }

    async fn clean_description(&self, raw: &str) -> Result<String, CoreError> {
        let permit = self.rate_limiter.acquire_permit().await;
        debug!(
            "Cleaning description ({} chars, queued {:?})",
            raw.len(),
            permit.queue_wait_time
        );
        self.llm
            .generate(prompts::CLEANER_SYSTEM, &prompts::clean_prompt(raw), false)
            .await
    }

    async fn score_fit(
        &self,
        job_description: &str,
        preferences: &str,
        resume: &str,
    ) -> Result<FitAnalysis, CoreError> {
        let permit = self.rate_limiter.acquire_permit().await;
        debug!("Scoring fit (queued {:?})", permit.queue_wait_time);
        let text = self
            .llm
            .generate(
                &prompts::fit_system(),
                &prompts::fit_prompt(job_description, preferences, resume),
                true,
            )
            .await?;
        parse_analysis(&text)
    }
}

/// Parses and validates the structured stage's output. Tolerates markdown
/// code fences around the JSON object.
pub fn parse_analysis(text: &str) -> Result<FitAnalysis, CoreError> {
    let trimmed = strip_code_fences(text.trim());

    let mut analysis: FitAnalysis =
        serde_json::from_str(trimmed).map_err(|e| {
            CoreError::Llm(LlmError::InvalidResponseFormat {
                provider: PROVIDER.to_string(),
                details: e.to_string(),
            })
        })?;

    if analysis.overall_match_percentage > 100 {
        analysis.overall_match_percentage = 100;
    }
    if analysis.summary.trim().is_empty() {
        return Err(CoreError::Llm(LlmError::InvalidResponseFormat {
            provider: PROVIDER.to_string(),
            details: "summary is empty".to_string(),
        }));
    }

    Ok(analysis)
}

fn strip_code_fences(text: &str) -> &str {
    let text = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .unwrap_or(text);
    text.strip_suffix("```").unwrap_or(text).trim()
}
