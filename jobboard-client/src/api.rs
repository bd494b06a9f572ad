use crate::metrics::{MetricsCollector, RequestMetrics};
use chrono::{DateTime, Utc};
use jobdigest_core::{CoreError, JobBoardApiError, JobBoardConfig, Posting};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostingListing {
    pub results: Vec<PostingData>,
    #[serde(default)]
    pub count: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostingData {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub company: Option<CompanyData>,
    pub redirect_url: String,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub location: Option<LocationData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyData {
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationData {
    #[serde(default)]
    pub display_name: Option<String>,
}

// Some boards serialize posting ids as JSON numbers, others as strings.
fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        String(String),
        Number(serde_json::Number),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::String(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}

#[derive(Debug)]
pub struct JobBoardClient {
    http_client: Client,
    metrics: Arc<MetricsCollector>,
}

impl JobBoardClient {
    pub fn new() -> Self {
        let metrics = Arc::new(MetricsCollector::new());

        let http_client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http_client,
            metrics,
        }
    }

    async fn make_request(&self, board: &JobBoardConfig) -> Result<Response, CoreError> {
        let endpoint = board.api_url.as_str();
        let start_time = Instant::now();
        let mut success = false;
        let mut status_code = None;
        let mut error_type = None;
        let mut rate_limited = false;

        // Params carry the API key, so only the bare endpoint is logged.
        info!("Fetching postings from {}", endpoint);
        let request = self
            .http_client
            .get(endpoint)
            .query(&board.api_params)
            .send()
            .await;

        let response = match request {
            Ok(response) => {
                status_code = Some(response.status().as_u16());

                if response.status().is_success() {
                    success = true;
                    debug!("Request successful: {} {}", response.status(), endpoint);
                } else {
                    error!(
                        "Request failed with status: {} for {}",
                        response.status(),
                        endpoint
                    );

                    if response.status().as_u16() == 429 {
                        rate_limited = true;
                        error_type = Some("rate_limited".to_string());

                        if let Some(retry_after) = response.headers().get("retry-after") {
                            if let Ok(retry_seconds) =
                                retry_after.to_str().unwrap_or("60").parse::<u64>()
                            {
                                warn!("Rate limited, retry after {} seconds", retry_seconds);
                                return Err(CoreError::JobBoardApi(
                                    JobBoardApiError::RateLimitExceeded {
                                        retry_after: retry_seconds,
                                    },
                                ));
                            }
                        }

                        return Err(CoreError::JobBoardApi(
                            JobBoardApiError::RateLimitExceeded { retry_after: 60 },
                        ));
                    } else if response.status().as_u16() == 401 {
                        error_type = Some("unauthorized".to_string());
                        return Err(CoreError::JobBoardApi(JobBoardApiError::InvalidApiKey));
                    } else if response.status().as_u16() == 403 {
                        error_type = Some("forbidden".to_string());
                        return Err(CoreError::JobBoardApi(JobBoardApiError::Forbidden {
                            resource: endpoint.to_string(),
                        }));
                    } else if response.status().as_u16() == 404 {
                        error_type = Some("not_found".to_string());
                        return Err(CoreError::JobBoardApi(JobBoardApiError::EndpointNotFound {
                            endpoint: endpoint.to_string(),
                        }));
                    } else if response.status().is_server_error() {
                        error_type = Some("server_error".to_string());
                        return Err(CoreError::JobBoardApi(JobBoardApiError::ServerError {
                            status_code: response.status().as_u16(),
                        }));
                    }
                }

                response
            }
            Err(e) => {
                error!("Network error for {}: {}", endpoint, e);

                if e.is_timeout() {
                    return Err(CoreError::JobBoardApi(JobBoardApiError::RequestTimeout));
                } else {
                    return Err(CoreError::Network(e));
                }
            }
        };

        let response_time = start_time.elapsed();
        let request_metrics = RequestMetrics {
            endpoint: endpoint.to_string(),
            status_code,
            response_time,
            success,
            rate_limited,
            error_type,
        };

        self.metrics.record_request(request_metrics).await;

        Ok(response)
    }

    pub async fn fetch_postings(&self, board: &JobBoardConfig) -> Result<Vec<Posting>, CoreError> {
        let response = self.make_request(board).await?;

        let listing: PostingListing = response.json().await.map_err(|e| {
            error!("Failed to parse postings listing: {}", e);
            CoreError::JobBoardApi(JobBoardApiError::InvalidResponse {
                details: format!("Failed to parse postings from {}", board.api_url),
            })
        })?;

        info!(
            "Retrieved {} postings from {}",
            listing.results.len(),
            board.api_url
        );
        Ok(listing.results.into_iter().map(Posting::from).collect())
    }

    pub async fn get_metrics(&self) -> crate::metrics::ApiMetrics {
        self.metrics.get_metrics().await
    }
}

impl Default for JobBoardClient {
    fn default() -> Self {
        Self::new()
    }
}

impl From<PostingData> for Posting {
    fn from(data: PostingData) -> Self {
        let created = data
            .created
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|dt| dt.with_timezone(&Utc));

        Self {
            id: data.id,
            title: data.title,
            company: data
                .company
                .and_then(|c| c.display_name)
                .unwrap_or_else(|| "unknown".to_string()),
            url: data.redirect_url,
            created,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_client_creation() {
        let client = JobBoardClient::new();

        let metrics = client.get_metrics().await;
        assert_eq!(metrics.total_requests, 0);
    }

    #[test]
    fn test_listing_parse() {
        let json = r#"{
            "count": 2,
            "results": [
                {
                    "id": "4321",
                    "title": "Backend Engineer",
                    "company": {"display_name": "Acme"},
                    "redirect_url": "https://board.example.com/jobs/4321",
                    "created": "2025-07-30T08:00:00Z"
                },
                {
                    "id": 9876,
                    "title": "Platform Engineer",
                    "redirect_url": "https://board.example.com/jobs/9876"
                }
            ]
        }"#;

        let listing: PostingListing = serde_json::from_str(json).unwrap();
        assert_eq!(listing.results.len(), 2);
        assert_eq!(listing.results[0].id, "4321");
        // Numeric ids are normalized to strings
        assert_eq!(listing.results[1].id, "9876");
        assert!(listing.results[1].company.is_none());
    }

    #[test]
    fn test_posting_conversion() {
        let data = PostingData {
            id: "4321".to_string(),
            title: "Backend Engineer".to_string(),
            company: Some(CompanyData {
                display_name: Some("Acme".to_string()),
            }),
            redirect_url: "https://board.example.com/jobs/4321".to_string(),
            created: Some("2025-07-30T08:00:00Z".to_string()),
            location: None,
        };

        let posting: Posting = data.into();
        assert_eq!(posting.id, "4321");
        assert_eq!(posting.company, "Acme");
        assert_eq!(posting.created.unwrap().to_rfc3339(), "2025-07-30T08:00:00+00:00");
    }

    #[test]
    fn test_posting_conversion_missing_fields() {
        let data = PostingData {
            id: "1".to_string(),
            title: "Engineer".to_string(),
            company: None,
            redirect_url: "https://board.example.com/jobs/1".to_string(),
            created: Some("not a date".to_string()),
            location: None,
        };

        let posting: Posting = data.into();
        assert_eq!(posting.company, "unknown");
        assert!(posting.created.is_none());
    }
}
