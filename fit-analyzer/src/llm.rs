use jobdigest_core::{CoreError, LlmError};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, warn};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const PROVIDER: &str = "gemini";
const MAX_OUTPUT_TOKENS: u32 = 4096;

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "systemInstruction")]
    system_instruction: Content<'a>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
    #[serde(rename = "responseMimeType", skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default, rename = "promptFeedback")]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PromptFeedback {
    #[serde(rename = "blockReason")]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

impl GenerateResponse {
    fn text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().find_map(|p| p.text))
    }
}

/// The single entry point for model calls. Both chain stages go through
/// `generate`; the structured stage asks for a JSON response body.
#[derive(Debug, Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    model: String,
}

impl LlmClient {
    pub fn new(model: String, api_key: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            api_key,
            model,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn generate(
        &self,
        system: &str,
        prompt: &str,
        json_output: bool,
    ) -> Result<String, CoreError> {
        let url = format!("{}/{}:generateContent", GEMINI_API_BASE, self.model);

        let request_body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            system_instruction: Content {
                parts: vec![Part { text: system }],
            },
            generation_config: GenerationConfig {
                max_output_tokens: MAX_OUTPUT_TOKENS,
                response_mime_type: json_output.then_some("application/json"),
            },
        };

        debug!("Calling {} model {}", PROVIDER, self.model);
        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CoreError::Llm(LlmError::RequestTimeout {
                        provider: PROVIDER.to_string(),
                    })
                } else {
                    CoreError::Network(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            error!("{} returned status {}: {}", PROVIDER, status, message);

            return Err(CoreError::Llm(match status.as_u16() {
                401 | 403 => LlmError::InvalidApiKey {
                    provider: PROVIDER.to_string(),
                },
                404 => LlmError::ModelNotAvailable {
                    model: self.model.clone(),
                },
                429 => LlmError::RateLimitExceeded {
                    provider: PROVIDER.to_string(),
                    retry_after: 60,
                },
                s if s >= 500 => LlmError::ServiceUnavailable {
                    provider: PROVIDER.to_string(),
                },
                _ => LlmError::InvalidResponseFormat {
                    provider: PROVIDER.to_string(),
                    details: message,
                },
            }));
        }

        let parsed: GenerateResponse = response.json().await.map_err(|e| {
            error!("Failed to parse {} response: {}", PROVIDER, e);
            CoreError::Llm(LlmError::InvalidResponseFormat {
                provider: PROVIDER.to_string(),
                details: e.to_string(),
            })
        })?;

        if let Some(feedback) = &parsed.prompt_feedback {
            if let Some(reason) = &feedback.block_reason {
                warn!("{} blocked the prompt: {}", PROVIDER, reason);
                return Err(CoreError::Llm(LlmError::ContentFiltered {
                    reason: reason.clone(),
                }));
            }
        }

        parsed.text().ok_or_else(|| {
            CoreError::Llm(LlmError::EmptyResponse {
                provider: PROVIDER.to_string(),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_text_extraction() {
        let json = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "cleaned description"}]}}
            ]
        }"#;
        let response: GenerateResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.text().unwrap(), "cleaned description");
    }

    #[test]
    fn test_response_without_candidates() {
        let json = r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#;
        let response: GenerateResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            response.prompt_feedback.as_ref().unwrap().block_reason,
            Some("SAFETY".to_string())
        );
        assert!(response.text().is_none());
    }

    #[test]
    fn test_request_serialization_json_mode() {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: "hello" }],
            }],
            system_instruction: Content {
                parts: vec![Part { text: "be terse" }],
            },
            generation_config: GenerationConfig {
                max_output_tokens: 64,
                response_mime_type: Some("application/json"),
            },
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(value["systemInstruction"]["parts"][0]["text"], "be terse");
    }
}
