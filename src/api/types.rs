//! Request and response types for the campaign API.
//!
//! All structs derive `Serialize`/`Deserialize` matching the JSON the
//! backend speaks. Fields the client passes through unmodified (asset maps,
//! AI suggestions) stay as `serde_json::Value`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Lifecycle states of a campaign, owned by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    Draft,
    Uploaded,
    Processed,
    Ready,
    Approved,
    Rejected,
}

impl fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CampaignStatus::Draft => "draft",
            CampaignStatus::Uploaded => "uploaded",
            CampaignStatus::Processed => "processed",
            CampaignStatus::Ready => "ready",
            CampaignStatus::Approved => "approved",
            CampaignStatus::Rejected => "rejected",
        };
        write!(f, "{name}")
    }
}

impl FromStr for CampaignStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(CampaignStatus::Draft),
            "uploaded" => Ok(CampaignStatus::Uploaded),
            "processed" => Ok(CampaignStatus::Processed),
            "ready" => Ok(CampaignStatus::Ready),
            "approved" => Ok(CampaignStatus::Approved),
            "rejected" => Ok(CampaignStatus::Rejected),
            other => Err(format!("unknown campaign status: {other}")),
        }
    }
}

/// A single derivation of "what must happen before this campaign can be
/// previewed", folded from the server's `status` string and `can_preview`
/// flag. The two fields can disagree; disagreement is surfaced explicitly
/// instead of trusting either one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// The rendered proof can be fetched directly.
    Previewable,
    /// Processing and/or proof generation must run first.
    NeedsAdvancement(CampaignStatus),
    /// `status` and `can_preview` contradict each other.
    Inconsistent {
        status: CampaignStatus,
        can_preview: bool,
    },
}

impl Readiness {
    /// The server sets `can_preview` exactly when status is `ready` or
    /// `processed`; anything else is a protocol inconsistency.
    pub fn derive(status: CampaignStatus, can_preview: bool) -> Self {
        let previewable_status =
            matches!(status, CampaignStatus::Ready | CampaignStatus::Processed);
        match (previewable_status, can_preview) {
            (true, true) => Readiness::Previewable,
            (false, false) => Readiness::NeedsAdvancement(status),
            _ => Readiness::Inconsistent {
                status,
                can_preview,
            },
        }
    }
}

/// GET `/campaigns/{id}/status`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignStatusResponse {
    pub campaign_id: String,
    pub status: CampaignStatus,
    pub can_preview: bool,
}

impl CampaignStatusResponse {
    pub fn readiness(&self) -> Readiness {
        Readiness::derive(self.status, self.can_preview)
    }
}

/// POST `/upload`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub campaign_id: String,
    pub status: CampaignStatus,
    pub message: String,
}

/// POST `/process/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessResponse {
    pub campaign_id: String,
    pub status: CampaignStatus,
    pub preview_url: String,
    pub processing_time_ms: u64,
    #[serde(default)]
    pub ai_suggestions: Option<Value>,
}

/// GET `/preview/{id}` — also returned by POST `/campaigns/{id}/regenerate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewResponse {
    pub campaign_id: String,
    pub html_preview: String,
    pub assets: Value,
    #[serde(default)]
    pub ai_suggestions: Option<Value>,
    pub metadata: Value,
}

/// POST `/approve/{id}`
#[derive(Debug, Clone, Serialize)]
pub struct ApprovalRequest {
    pub decision: String,
    pub feedback: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovalResponse {
    pub campaign_id: String,
    pub status: CampaignStatus,
    #[serde(default)]
    pub download_url: Option<String>,
    pub message: String,
}

/// One campaign as returned by listing and detail endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Campaign {
    pub id: String,
    pub campaign_name: String,
    pub advertiser_name: String,
    pub status: CampaignStatus,
    pub created_at: String,
    #[serde(default)]
    pub approved_at: Option<String>,
    #[serde(default)]
    pub feedback: Option<String>,
    #[serde(default)]
    pub ai_processing_data: Option<Value>,
    #[serde(default)]
    pub review_status: Option<String>,
    #[serde(default)]
    pub reviewer_notes: Option<String>,
    #[serde(default)]
    pub scheduled_at: Option<String>,
}

/// GET `/campaigns`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignListResponse {
    pub campaigns: Vec<Campaign>,
    pub total: u64,
    pub limit: u32,
    pub offset: u32,
}

/// Query parameters for GET `/campaigns`.
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    pub status: Option<CampaignStatus>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

/// POST `/campaigns/{id}/edit` — only the present fields are updated.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EditRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_line: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_copy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cta_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cta_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer_text: Option<String>,
}

impl EditRequest {
    pub fn is_empty(&self) -> bool {
        self.subject_line.is_none()
            && self.preview_text.is_none()
            && self.body_copy.is_none()
            && self.cta_text.is_none()
            && self.cta_url.is_none()
            && self.footer_text.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditResponse {
    pub campaign_id: String,
    pub message: String,
    pub status: CampaignStatus,
}

/// POST `/campaigns/{id}/replace-image`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageReplaceResponse {
    pub campaign_id: String,
    pub image_type: String,
    pub image_url: String,
    pub message: String,
    pub status: CampaignStatus,
}

/// POST `/campaigns/{id}/schedule`
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleRequest {
    pub scheduled_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleResponse {
    pub campaign_id: String,
    pub scheduled_at: String,
    pub scheduling_status: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelScheduleResponse {
    pub campaign_id: String,
    pub message: String,
    #[serde(default)]
    pub scheduling_status: Option<String>,
}

/// POST `/campaigns/{id}/review`
#[derive(Debug, Clone, Serialize)]
pub struct ReviewRequest {
    pub review_status: String,
    pub reviewer_notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewResponse {
    pub campaign_id: String,
    pub review_status: String,
    #[serde(default)]
    pub reviewer_notes: Option<String>,
    pub message: String,
}

/// POST `/campaigns/{id}/performance` — metrics reported by external
/// sending systems. Only the present fields are updated.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PerformanceMetrics {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub click_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversion_rate: Option<f64>,
}

impl PerformanceMetrics {
    pub fn is_empty(&self) -> bool {
        self.open_rate.is_none() && self.click_rate.is_none() && self.conversion_rate.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceUpdateResponse {
    pub campaign_id: String,
    #[serde(default)]
    pub open_rate: Option<f64>,
    #[serde(default)]
    pub click_rate: Option<f64>,
    #[serde(default)]
    pub conversion_rate: Option<f64>,
    /// Weighted score the server derives from the metrics; feeds the
    /// recommendations engine.
    pub performance_score: f64,
    pub performance_timestamp: String,
    pub message: String,
}

/// Query parameters for GET `/campaigns/review/list`.
#[derive(Debug, Clone, Default)]
pub struct ReviewListFilter {
    pub review_status: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

/// One AI suggestion with its supporting evidence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationItem {
    pub content: String,
    pub confidence_score: f64,
    pub reasoning: String,
}

/// POST `/campaigns/{id}/recommendations`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationsResponse {
    pub campaign_id: String,
    #[serde(default)]
    pub subject_line_recommendations: Vec<RecommendationItem>,
    #[serde(default)]
    pub preview_text_recommendations: Vec<RecommendationItem>,
    #[serde(default)]
    pub cta_text_recommendations: Vec<RecommendationItem>,
    #[serde(default)]
    pub content_structure_suggestions: Option<Value>,
    #[serde(default)]
    pub image_optimization_suggestions: Option<Value>,
    #[serde(default)]
    pub historical_data_available: bool,
    #[serde(default)]
    pub total_campaigns_analyzed: u64,
}

/// GET `/health` (served at the API root, outside `/api/v1`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    #[serde(default)]
    pub database: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_roundtrip_lowercase() {
        let json = r#""processed""#;
        let status: CampaignStatus = serde_json::from_str(json).unwrap();
        assert_eq!(status, CampaignStatus::Processed);
        assert_eq!(serde_json::to_string(&status).unwrap(), json);
        assert_eq!(status.to_string(), "processed");
    }

    #[test]
    fn status_rejects_unknown_string() {
        assert!("scheduled".parse::<CampaignStatus>().is_err());
        assert!(serde_json::from_str::<CampaignStatus>(r#""scheduled""#).is_err());
    }

    #[test]
    fn readiness_agrees_with_server_flag() {
        assert_eq!(
            Readiness::derive(CampaignStatus::Ready, true),
            Readiness::Previewable
        );
        assert_eq!(
            Readiness::derive(CampaignStatus::Processed, true),
            Readiness::Previewable
        );
        assert_eq!(
            Readiness::derive(CampaignStatus::Uploaded, false),
            Readiness::NeedsAdvancement(CampaignStatus::Uploaded)
        );
    }

    #[test]
    fn readiness_flags_disagreement() {
        assert_eq!(
            Readiness::derive(CampaignStatus::Uploaded, true),
            Readiness::Inconsistent {
                status: CampaignStatus::Uploaded,
                can_preview: true
            }
        );
        assert_eq!(
            Readiness::derive(CampaignStatus::Ready, false),
            Readiness::Inconsistent {
                status: CampaignStatus::Ready,
                can_preview: false
            }
        );
    }

    #[test]
    fn status_response_deserializes_from_api_format() {
        let json = r#"{
            "campaign_id": "c-123",
            "status": "uploaded",
            "can_preview": false
        }"#;
        let resp: CampaignStatusResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.status, CampaignStatus::Uploaded);
        assert_eq!(
            resp.readiness(),
            Readiness::NeedsAdvancement(CampaignStatus::Uploaded)
        );
    }

    #[test]
    fn edit_request_skips_absent_fields() {
        let req = EditRequest {
            subject_line: Some("New subject".into()),
            ..EditRequest::default()
        };
        let json = serde_json::to_string(&req).unwrap();
        assert_eq!(json, r#"{"subject_line":"New subject"}"#);
        assert!(!req.is_empty());
        assert!(EditRequest::default().is_empty());
    }

    #[test]
    fn preview_response_tolerates_missing_suggestions() {
        let json = r#"{
            "campaign_id": "c-1",
            "html_preview": "<html></html>",
            "assets": {},
            "metadata": {"campaign_name": "Spring Sale"}
        }"#;
        let resp: PreviewResponse = serde_json::from_str(json).unwrap();
        assert!(resp.ai_suggestions.is_none());
        assert_eq!(resp.metadata["campaign_name"], "Spring Sale");
    }
}
