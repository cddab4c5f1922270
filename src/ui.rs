//! Terminal output — spinners and colored summaries.
//!
//! `indicatif` drives the spinner shown during multi-step preview
//! orchestration; `console` provides the styling for status badges and
//! result lines.

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::api::{Campaign, CampaignStatus};

/// Spinner shown while a campaign is checked, advanced, and fetched.
pub struct StepProgress {
    pb: ProgressBar,
    green: Style,
}

impl StepProgress {
    pub fn start(message: &str) -> Self {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .expect("invalid template"),
        );
        pb.set_message(message.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));

        Self {
            pb,
            green: Style::new().green().bold(),
        }
    }

    pub fn set_message(&self, message: &str) {
        self.pb.set_message(message.to_string());
    }

    pub fn success(&self, message: &str) {
        self.pb.finish_and_clear();
        println!("{} {message}", self.green.apply_to("✓"));
    }

    /// Stop the spinner without printing; the caller reports the outcome.
    pub fn abandon(&self) {
        self.pb.finish_and_clear();
    }
}

/// Style a lifecycle status for terminal display.
pub fn status_badge(status: CampaignStatus) -> String {
    let style = match status {
        CampaignStatus::Draft => Style::new().dim(),
        CampaignStatus::Uploaded => Style::new().cyan(),
        CampaignStatus::Processed => Style::new().blue(),
        CampaignStatus::Ready => Style::new().yellow(),
        CampaignStatus::Approved => Style::new().green().bold(),
        CampaignStatus::Rejected => Style::new().red().bold(),
    };
    style.apply_to(status.to_string()).to_string()
}

/// Print one campaign per line with id, name, advertiser, and status.
pub fn print_campaign_table(campaigns: &[Campaign], total: u64) {
    let bold = Style::new().bold();
    println!(
        "{:<38} {:<28} {:<20} {}",
        bold.apply_to("ID"),
        bold.apply_to("Campaign"),
        bold.apply_to("Advertiser"),
        bold.apply_to("Status")
    );
    for campaign in campaigns {
        println!(
            "{:<38} {:<28} {:<20} {}",
            campaign.id,
            truncate(&campaign.campaign_name, 26),
            truncate(&campaign.advertiser_name, 18),
            status_badge(campaign.status)
        );
    }
    println!();
    println!("{} of {total} campaigns", campaigns.len());
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let prefix: String = text.chars().take(max.saturating_sub(1)).collect();
        format!("{prefix}…")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_short_text_unchanged() {
        assert_eq!(truncate("Spring Sale", 26), "Spring Sale");
    }

    #[test]
    fn truncate_long_text_adds_ellipsis() {
        let long = "A very long campaign name that overflows the column";
        let result = truncate(long, 10);
        assert_eq!(result.chars().count(), 10);
        assert!(result.ends_with('…'));
    }

    #[test]
    fn status_badge_contains_status_name() {
        // Styles may be stripped in non-tty environments; the name survives.
        assert!(status_badge(CampaignStatus::Approved).contains("approved"));
        assert!(status_badge(CampaignStatus::Draft).contains("draft"));
    }
}
