//! The resilient HTTP client for the campaign API.
//!
//! Every call goes through one retry loop with bounded exponential backoff
//! for transient failures (no response, 5xx, 429) and error normalization,
//! so callers only ever see an [`ApiError`] with a displayable message.

use std::time::Duration;

use reqwest::Client;
use reqwest::multipart::{Form, Part};
use tracing::{debug, warn};

use super::error::ApiError;
use super::retry::RetryPolicy;
use super::types::{
    ApprovalRequest, ApprovalResponse, Campaign, CampaignListResponse, CampaignStatusResponse,
    CancelScheduleResponse, EditRequest, EditResponse, HealthResponse, ImageReplaceResponse,
    ListFilter, PerformanceMetrics, PerformanceUpdateResponse, PreviewResponse, ProcessResponse,
    RecommendationsResponse, ReviewListFilter, ReviewRequest, ReviewResponse, ScheduleRequest,
    ScheduleResponse, UploadResponse,
};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

// Default request timeout; uploads get longer, image replacement keeps the
// default but states it explicitly because the server contract calls it out.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const UPLOAD_TIMEOUT: Duration = Duration::from_secs(60);
const IMAGE_TIMEOUT: Duration = Duration::from_secs(30);

/// An in-memory file destined for a multipart upload. Owned bytes so the
/// request can be rebuilt identically on retry.
#[derive(Debug, Clone)]
pub struct FilePart {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl FilePart {
    fn to_part(&self) -> Part {
        Part::bytes(self.bytes.clone())
            .file_name(self.file_name.clone())
            .mime_str(mime_for(&self.file_name))
            .expect("static mime string")
    }
}

fn mime_for(file_name: &str) -> &'static str {
    let lower = file_name.to_lowercase();
    if lower.ends_with(".png") {
        "image/png"
    } else if lower.ends_with(".jpg") || lower.ends_with(".jpeg") {
        "image/jpeg"
    } else if lower.ends_with(".gif") {
        "image/gif"
    } else if lower.ends_with(".webp") {
        "image/webp"
    } else {
        "application/octet-stream"
    }
}

/// Everything needed to create or update a campaign via POST `/upload`.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub campaign_name: String,
    pub advertiser_name: String,
    pub logo: FilePart,
    pub hero_images: Vec<FilePart>,
    pub subject_line: Option<String>,
    pub preview_text: Option<String>,
    pub body_copy: Option<String>,
    pub cta_text: Option<String>,
    pub cta_url: Option<String>,
    pub footer_text: Option<String>,
    /// Set when re-uploading assets for an existing (rejected) campaign.
    pub campaign_id: Option<String>,
}

pub struct CampaignClient {
    http: Client,
    base_url: String,
    policy: RetryPolicy,
}

impl CampaignClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_policy(base_url, RetryPolicy::default())
    }

    pub fn with_policy(base_url: impl Into<String>, policy: RetryPolicy) -> Self {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("failed to build HTTP client");
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            policy,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Prefix a path with the versioned API base.
    fn api_url(&self, path: &str) -> String {
        format!("{}/api/v1{path}", self.base_url)
    }

    /// Issue a request, retrying transient failures with exponential backoff.
    ///
    /// `build` must produce an identical request on every call; the attempt
    /// count is an explicit loop variable here, never request state. Expected
    /// lifecycle conflicts are returned without a diagnostic log line.
    async fn send_with_retry<F>(&self, build: F) -> Result<reqwest::Response, ApiError>
    where
        F: Fn() -> reqwest::RequestBuilder,
    {
        let mut attempt: u32 = 0;
        loop {
            let error = match build().send().await {
                Ok(response) if response.status().is_success() => return Ok(response),
                Ok(response) => ApiError::from_response(response).await,
                Err(source) => ApiError::transport(source),
            };

            if self.policy.should_retry(&error, attempt) {
                attempt += 1;
                let delay = self.policy.delay_for_attempt(attempt);
                debug!(
                    attempt,
                    max = self.policy.max_retries,
                    delay_ms = delay.as_millis() as u64,
                    %error,
                    "transient failure, retrying"
                );
                tokio::time::sleep(delay).await;
                continue;
            }

            if !error.is_lifecycle_conflict() {
                warn!(status = ?error.status(), %error, "request failed");
            }
            return Err(error);
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: String) -> Result<T, ApiError> {
        let response = self.send_with_retry(|| self.http.get(&url)).await?;
        response.json().await.map_err(ApiError::Decode)
    }

    async fn post_empty_json<T: serde::de::DeserializeOwned>(
        &self,
        url: String,
    ) -> Result<T, ApiError> {
        let response = self.send_with_retry(|| self.http.post(&url)).await?;
        response.json().await.map_err(ApiError::Decode)
    }

    async fn post_body_json<B, T>(&self, url: String, body: &B) -> Result<T, ApiError>
    where
        B: serde::Serialize,
        T: serde::de::DeserializeOwned,
    {
        let response = self
            .send_with_retry(|| self.http.post(&url).json(body))
            .await?;
        response.json().await.map_err(ApiError::Decode)
    }

    /// Create (or update) a campaign with its assets. 60 s timeout.
    pub async fn upload(&self, req: &UploadRequest) -> Result<UploadResponse, ApiError> {
        let url = self.api_url("/upload");
        let response = self
            .send_with_retry(|| {
                let mut form = Form::new()
                    .text("campaign_name", req.campaign_name.clone())
                    .text("advertiser_name", req.advertiser_name.clone())
                    .part("logo", req.logo.to_part());
                for hero in &req.hero_images {
                    form = form.part("hero_images", hero.to_part());
                }
                for (field, value) in [
                    ("subject_line", &req.subject_line),
                    ("preview_text", &req.preview_text),
                    ("body_copy", &req.body_copy),
                    ("cta_text", &req.cta_text),
                    ("cta_url", &req.cta_url),
                    ("footer_text", &req.footer_text),
                    ("campaign_id", &req.campaign_id),
                ] {
                    if let Some(value) = value {
                        form = form.text(field, value.clone());
                    }
                }
                self.http
                    .post(&url)
                    .multipart(form)
                    .timeout(UPLOAD_TIMEOUT)
            })
            .await?;
        response.json().await.map_err(ApiError::Decode)
    }

    /// Current status and previewable flag.
    pub async fn status(&self, campaign_id: &str) -> Result<CampaignStatusResponse, ApiError> {
        self.get_json(self.api_url(&format!("/campaigns/{campaign_id}/status")))
            .await
    }

    /// Run AI content generation. Not idempotent on the server; callers must
    /// deduplicate (see the preview orchestrator).
    pub async fn process(&self, campaign_id: &str) -> Result<ProcessResponse, ApiError> {
        self.post_empty_json(self.api_url(&format!("/process/{campaign_id}")))
            .await
    }

    /// Render the HTML proof.
    pub async fn generate_proof(&self, campaign_id: &str) -> Result<PreviewResponse, ApiError> {
        self.post_empty_json(self.api_url(&format!("/generate/{campaign_id}")))
            .await
    }

    /// Re-render the proof after content or image edits.
    pub async fn regenerate_proof(&self, campaign_id: &str) -> Result<PreviewResponse, ApiError> {
        self.post_empty_json(self.api_url(&format!("/campaigns/{campaign_id}/regenerate")))
            .await
    }

    /// Fetch the rendered proof plus metadata and AI suggestions.
    pub async fn preview(&self, campaign_id: &str) -> Result<PreviewResponse, ApiError> {
        self.get_json(self.api_url(&format!("/preview/{campaign_id}")))
            .await
    }

    /// Finalize the approve/reject decision with optional feedback.
    pub async fn approve(
        &self,
        campaign_id: &str,
        decision: &str,
        feedback: Option<String>,
    ) -> Result<ApprovalResponse, ApiError> {
        let body = ApprovalRequest {
            decision: decision.to_string(),
            feedback,
        };
        self.post_body_json(self.api_url(&format!("/approve/{campaign_id}")), &body)
            .await
    }

    /// Fetch the final HTML artifact as raw bytes.
    pub async fn download(&self, campaign_id: &str) -> Result<Vec<u8>, ApiError> {
        let url = self.api_url(&format!("/download/{campaign_id}"));
        let response = self.send_with_retry(|| self.http.get(&url)).await?;
        let bytes = response.bytes().await.map_err(ApiError::Decode)?;
        Ok(bytes.to_vec())
    }

    /// Paginated, optionally status-filtered listing.
    pub async fn list(&self, filter: &ListFilter) -> Result<CampaignListResponse, ApiError> {
        let url = self.api_url("/campaigns");
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(status) = filter.status {
            query.push(("status", status.to_string()));
        }
        if let Some(limit) = filter.limit {
            query.push(("limit", limit.to_string()));
        }
        if let Some(offset) = filter.offset {
            query.push(("offset", offset.to_string()));
        }
        let response = self
            .send_with_retry(|| self.http.get(&url).query(&query))
            .await?;
        response.json().await.map_err(ApiError::Decode)
    }

    /// Full campaign record.
    pub async fn detail(&self, campaign_id: &str) -> Result<Campaign, ApiError> {
        self.get_json(self.api_url(&format!("/campaigns/{campaign_id}")))
            .await
    }

    /// Reset a rejected campaign back to `uploaded` for resubmission.
    pub async fn reset(
        &self,
        campaign_id: &str,
        clear_feedback: bool,
    ) -> Result<Campaign, ApiError> {
        let url = self.api_url(&format!("/campaigns/{campaign_id}/reset"));
        let response = self
            .send_with_retry(|| {
                self.http
                    .post(&url)
                    .query(&[("clear_feedback", clear_feedback.to_string())])
            })
            .await?;
        response.json().await.map_err(ApiError::Decode)
    }

    /// Update text fields. The server drops the cached proof afterwards.
    pub async fn edit(
        &self,
        campaign_id: &str,
        fields: &EditRequest,
    ) -> Result<EditResponse, ApiError> {
        self.post_body_json(self.api_url(&format!("/campaigns/{campaign_id}/edit")), fields)
            .await
    }

    /// Swap a single asset (`logo` or `hero_{index}`). 30 s timeout.
    pub async fn replace_image(
        &self,
        campaign_id: &str,
        image_type: &str,
        file: &FilePart,
    ) -> Result<ImageReplaceResponse, ApiError> {
        let url = self.api_url(&format!("/campaigns/{campaign_id}/replace-image"));
        let response = self
            .send_with_retry(|| {
                let form = Form::new()
                    .part("file", file.to_part())
                    .text("image_type", image_type.to_string());
                self.http
                    .post(&url)
                    .multipart(form)
                    .timeout(IMAGE_TIMEOUT)
            })
            .await?;
        response.json().await.map_err(ApiError::Decode)
    }

    /// Schedule an approved campaign for a future send.
    pub async fn schedule(
        &self,
        campaign_id: &str,
        scheduled_at: &str,
    ) -> Result<ScheduleResponse, ApiError> {
        let body = ScheduleRequest {
            scheduled_at: scheduled_at.to_string(),
        };
        self.post_body_json(
            self.api_url(&format!("/campaigns/{campaign_id}/schedule")),
            &body,
        )
        .await
    }

    pub async fn cancel_schedule(
        &self,
        campaign_id: &str,
    ) -> Result<CancelScheduleResponse, ApiError> {
        self.post_empty_json(self.api_url(&format!("/campaigns/{campaign_id}/cancel-schedule")))
            .await
    }

    /// Record an editorial review decision with optional notes.
    pub async fn review(
        &self,
        campaign_id: &str,
        review_status: &str,
        reviewer_notes: Option<String>,
    ) -> Result<ReviewResponse, ApiError> {
        let body = ReviewRequest {
            review_status: review_status.to_string(),
            reviewer_notes,
        };
        self.post_body_json(
            self.api_url(&format!("/campaigns/{campaign_id}/review")),
            &body,
        )
        .await
    }

    /// Record performance metrics for a sent campaign. The server derives the
    /// weighted score and timestamp from whatever fields are present.
    pub async fn performance(
        &self,
        campaign_id: &str,
        metrics: &PerformanceMetrics,
    ) -> Result<PerformanceUpdateResponse, ApiError> {
        self.post_body_json(
            self.api_url(&format!("/campaigns/{campaign_id}/performance")),
            metrics,
        )
        .await
    }

    /// Campaigns in the editorial review queue, optionally filtered by verdict.
    pub async fn review_list(
        &self,
        filter: &ReviewListFilter,
    ) -> Result<CampaignListResponse, ApiError> {
        let url = self.api_url("/campaigns/review/list");
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(review_status) = &filter.review_status {
            query.push(("review_status", review_status.clone()));
        }
        if let Some(limit) = filter.limit {
            query.push(("limit", limit.to_string()));
        }
        if let Some(offset) = filter.offset {
            query.push(("offset", offset.to_string()));
        }
        let response = self
            .send_with_retry(|| self.http.get(&url).query(&query))
            .await?;
        response.json().await.map_err(ApiError::Decode)
    }

    /// AI suggestions derived from historical campaign performance.
    pub async fn recommendations(
        &self,
        campaign_id: &str,
    ) -> Result<RecommendationsResponse, ApiError> {
        self.post_empty_json(self.api_url(&format!("/campaigns/{campaign_id}/recommendations")))
            .await
    }

    /// Service health; lives at the API root, outside `/api/v1`.
    pub async fn health(&self) -> Result<HealthResponse, ApiError> {
        self.get_json(format!("{}/health", self.base_url)).await
    }
}
