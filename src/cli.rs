//! Command-line interface for proofctl, built on clap.
//!
//! One subcommand per campaign API operation, plus global flags for the
//! API base URL and verbose diagnostics.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::api::CampaignStatus;

/// proofctl — create, preview, review, approve, schedule, and download
/// marketing email campaigns.
#[derive(Debug, Parser)]
#[command(name = "proofctl", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Base URL of the campaign API (overrides config and environment).
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Enable verbose diagnostic output.
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

/// Campaign status filter accepted on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StatusArg {
    Draft,
    Uploaded,
    Processed,
    Ready,
    Approved,
    Rejected,
}

impl From<StatusArg> for CampaignStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Draft => CampaignStatus::Draft,
            StatusArg::Uploaded => CampaignStatus::Uploaded,
            StatusArg::Processed => CampaignStatus::Processed,
            StatusArg::Ready => CampaignStatus::Ready,
            StatusArg::Approved => CampaignStatus::Approved,
            StatusArg::Rejected => CampaignStatus::Rejected,
        }
    }
}

/// Editorial review verdicts accepted by the review subcommand.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ReviewStatusArg {
    Pending,
    Reviewed,
    Approved,
    Rejected,
}

impl ReviewStatusArg {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewStatusArg::Pending => "pending",
            ReviewStatusArg::Reviewed => "reviewed",
            ReviewStatusArg::Approved => "approved",
            ReviewStatusArg::Rejected => "rejected",
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Upload campaign assets and create (or update) a campaign.
    Upload {
        /// Campaign name.
        #[arg(long)]
        name: String,

        /// Advertiser name.
        #[arg(long)]
        advertiser: String,

        /// Path to the logo image file.
        #[arg(long)]
        logo: PathBuf,

        /// Paths to 1-3 hero image files.
        #[arg(long = "hero", num_args = 1..)]
        hero_images: Vec<PathBuf>,

        #[arg(long)]
        subject_line: Option<String>,

        #[arg(long)]
        preview_text: Option<String>,

        #[arg(long)]
        body_copy: Option<String>,

        #[arg(long)]
        cta_text: Option<String>,

        #[arg(long)]
        cta_url: Option<String>,

        #[arg(long)]
        footer_text: Option<String>,

        /// Existing campaign ID to update (for resubmitting rejected campaigns).
        #[arg(long)]
        campaign_id: Option<String>,
    },

    /// Show a campaign's lifecycle status and previewability.
    Status { campaign_id: String },

    /// Fetch the rendered proof, advancing the campaign first if needed.
    Preview {
        campaign_id: String,

        /// Regenerate the proof before fetching, regardless of state.
        #[arg(long)]
        refresh: bool,

        /// Write the proof HTML to this file instead of a summary.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Approve a campaign, finalizing its HTML artifact.
    Approve {
        campaign_id: String,

        /// Optional feedback to record with the decision.
        #[arg(long)]
        feedback: Option<String>,
    },

    /// Reject a campaign.
    Reject {
        campaign_id: String,

        #[arg(long)]
        feedback: Option<String>,
    },

    /// Download the final HTML artifact of an approved campaign.
    Download {
        campaign_id: String,

        /// Output file path. Defaults to `<campaign_id>.html`.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// List campaigns, optionally filtered by status.
    List {
        #[arg(long)]
        status: Option<StatusArg>,

        #[arg(long)]
        limit: Option<u32>,

        #[arg(long)]
        offset: Option<u32>,
    },

    /// Show the full record of one campaign.
    Show { campaign_id: String },

    /// Reset a rejected campaign to uploaded for resubmission.
    Reset {
        campaign_id: String,

        /// Also clear the stored rejection feedback.
        #[arg(long)]
        clear_feedback: bool,
    },

    /// Edit campaign text content. Only the given fields change.
    Edit {
        campaign_id: String,

        #[arg(long)]
        subject_line: Option<String>,

        #[arg(long)]
        preview_text: Option<String>,

        #[arg(long)]
        body_copy: Option<String>,

        #[arg(long)]
        cta_text: Option<String>,

        #[arg(long)]
        cta_url: Option<String>,

        #[arg(long)]
        footer_text: Option<String>,
    },

    /// Replace a campaign image asset.
    ReplaceImage {
        campaign_id: String,

        /// Which image to replace: `logo` or `hero_{index}` (e.g. `hero_0`).
        #[arg(long = "type")]
        image_type: String,

        /// Path to the replacement image file.
        #[arg(long)]
        file: PathBuf,
    },

    /// Schedule an approved campaign for future sending.
    Schedule {
        campaign_id: String,

        /// Send time as an RFC 3339 datetime (e.g. `2026-12-01T10:00:00Z`).
        #[arg(long)]
        at: String,
    },

    /// Cancel a scheduled send.
    CancelSchedule { campaign_id: String },

    /// Record an editorial review verdict.
    Review {
        campaign_id: String,

        #[arg(long)]
        status: ReviewStatusArg,

        #[arg(long)]
        notes: Option<String>,
    },

    /// List campaigns in the editorial review queue.
    ReviewList {
        /// Filter by review verdict.
        #[arg(long)]
        status: Option<ReviewStatusArg>,

        #[arg(long)]
        limit: Option<u32>,

        #[arg(long)]
        offset: Option<u32>,
    },

    /// Record performance metrics reported by the sending platform.
    Performance {
        campaign_id: String,

        /// Open rate as a fraction (e.g. 0.42).
        #[arg(long)]
        open_rate: Option<f64>,

        /// Click rate as a fraction.
        #[arg(long)]
        click_rate: Option<f64>,

        /// Conversion rate as a fraction.
        #[arg(long)]
        conversion_rate: Option<f64>,
    },

    /// Fetch AI recommendations based on historical campaign performance.
    Recommendations { campaign_id: String },

    /// Check that the campaign API is reachable and healthy.
    Health,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_parses_preview_subcommand() {
        let cli = Cli::parse_from(["proofctl", "preview", "c-123", "--refresh"]);
        match cli.command {
            Command::Preview {
                campaign_id,
                refresh,
                output,
            } => {
                assert_eq!(campaign_id, "c-123");
                assert!(refresh);
                assert!(output.is_none());
            }
            _ => panic!("expected Preview command"),
        }
    }

    #[test]
    fn cli_parses_global_flags() {
        let cli = Cli::parse_from([
            "proofctl",
            "--api-url",
            "https://campaigns.example.com",
            "--verbose",
            "health",
        ]);
        assert!(cli.verbose);
        assert_eq!(
            cli.api_url.as_deref(),
            Some("https://campaigns.example.com")
        );
    }

    #[test]
    fn cli_parses_upload_with_heroes() {
        let cli = Cli::parse_from([
            "proofctl",
            "upload",
            "--name",
            "Spring Sale",
            "--advertiser",
            "Acme",
            "--logo",
            "logo.png",
            "--hero",
            "hero1.png",
            "--hero",
            "hero2.png",
        ]);
        match cli.command {
            Command::Upload {
                name, hero_images, ..
            } => {
                assert_eq!(name, "Spring Sale");
                assert_eq!(hero_images.len(), 2);
            }
            _ => panic!("expected Upload command"),
        }
    }

    #[test]
    fn cli_parses_review_status_value() {
        let cli = Cli::parse_from([
            "proofctl", "review", "c-9", "--status", "reviewed", "--notes", "looks good",
        ]);
        match cli.command {
            Command::Review { status, notes, .. } => {
                assert_eq!(status.as_str(), "reviewed");
                assert_eq!(notes.as_deref(), Some("looks good"));
            }
            _ => panic!("expected Review command"),
        }
    }

    #[test]
    fn cli_parses_performance_metrics() {
        let cli = Cli::parse_from([
            "proofctl", "performance", "c-7", "--open-rate", "0.42", "--click-rate", "0.11",
        ]);
        match cli.command {
            Command::Performance {
                campaign_id,
                open_rate,
                click_rate,
                conversion_rate,
            } => {
                assert_eq!(campaign_id, "c-7");
                assert_eq!(open_rate, Some(0.42));
                assert_eq!(click_rate, Some(0.11));
                assert!(conversion_rate.is_none());
            }
            _ => panic!("expected Performance command"),
        }
    }

    #[test]
    fn cli_parses_review_list_filter() {
        let cli = Cli::parse_from(["proofctl", "review-list", "--status", "pending"]);
        match cli.command {
            Command::ReviewList { status, .. } => {
                assert_eq!(status.map(|s| s.as_str()), Some("pending"));
            }
            _ => panic!("expected ReviewList command"),
        }
    }

    #[test]
    fn status_arg_maps_to_campaign_status() {
        assert_eq!(
            CampaignStatus::from(StatusArg::Processed),
            CampaignStatus::Processed
        );
    }

    #[test]
    fn cli_verify() {
        Cli::command().debug_assert();
    }
}
