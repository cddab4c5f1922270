pub mod client;
pub mod error;
pub mod retry;
pub mod types;

pub use client::{CampaignClient, DEFAULT_BASE_URL, FilePart, UploadRequest};
pub use error::{ApiError, CONNECTIVITY_MESSAGE};
pub use retry::RetryPolicy;
pub use types::{
    ApprovalResponse, Campaign, CampaignListResponse, CampaignStatus, CampaignStatusResponse,
    EditRequest, ListFilter, PerformanceMetrics, PreviewResponse, Readiness, ReviewListFilter,
};
