use std::path::{Path, PathBuf};

use chrono::DateTime;
use clap::Parser;
use console::Style;
use tracing_subscriber::EnvFilter;

use proofctl::api::{
    CampaignClient, EditRequest, FilePart, ListFilter, PerformanceMetrics, PreviewResponse,
    ReviewListFilter, UploadRequest,
};
use proofctl::cli::{Cli, Command};
use proofctl::config::ProofctlConfig;
use proofctl::error::ProofctlError;
use proofctl::preview::PreviewOrchestrator;
use proofctl::ui::{self, StepProgress};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli).await {
        eprintln!("{} {err}", Style::new().red().bold().apply_to("✗"));
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "proofctl=debug" } else { "proofctl=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), ProofctlError> {
    let config = ProofctlConfig::load().map_err(|e| ProofctlError::Config(e.to_string()))?;
    let base_url = cli.api_url.unwrap_or(config.api_url.clone());
    let client = CampaignClient::with_policy(base_url, config.retry_policy());

    match cli.command {
        Command::Upload {
            name,
            advertiser,
            logo,
            hero_images,
            subject_line,
            preview_text,
            body_copy,
            cta_text,
            cta_url,
            footer_text,
            campaign_id,
        } => {
            let mut heroes = Vec::with_capacity(hero_images.len());
            for path in &hero_images {
                heroes.push(read_file_part(path).await?);
            }
            let req = UploadRequest {
                campaign_name: name,
                advertiser_name: advertiser,
                logo: read_file_part(&logo).await?,
                hero_images: heroes,
                subject_line,
                preview_text,
                body_copy,
                cta_text,
                cta_url,
                footer_text,
                campaign_id,
            };
            let progress = StepProgress::start("Uploading campaign assets...");
            match client.upload(&req).await {
                Ok(resp) => {
                    progress.success(&resp.message);
                    println!("Campaign ID: {}", resp.campaign_id);
                    println!("Status: {}", ui::status_badge(resp.status));
                }
                Err(err) => {
                    progress.abandon();
                    return Err(err.into());
                }
            }
        }

        Command::Status { campaign_id } => {
            let resp = client.status(&campaign_id).await?;
            println!("Campaign: {}", resp.campaign_id);
            println!("Status: {}", ui::status_badge(resp.status));
            println!(
                "Previewable: {}",
                if resp.can_preview { "yes" } else { "no" }
            );
        }

        Command::Preview {
            campaign_id,
            refresh,
            output,
        } => {
            let orchestrator = PreviewOrchestrator::new(&client);
            let progress = StepProgress::start(if refresh {
                "Regenerating proof..."
            } else {
                "Loading preview..."
            });
            let result = if refresh {
                orchestrator.refresh(&campaign_id).await
            } else {
                orchestrator.ensure_preview(&campaign_id).await
            };
            match result {
                Ok(preview) => {
                    progress.success("Preview ready");
                    render_preview(&preview, output.as_deref()).await?;
                }
                Err(err) => {
                    progress.abandon();
                    return Err(err.into());
                }
            }
        }

        Command::Approve {
            campaign_id,
            feedback,
        } => {
            let resp = client.approve(&campaign_id, "approve", feedback).await?;
            println!("{}", resp.message);
            if let Some(url) = resp.download_url {
                println!("Download: {url}");
            }
        }

        Command::Reject {
            campaign_id,
            feedback,
        } => {
            let resp = client.approve(&campaign_id, "reject", feedback).await?;
            println!("{}", resp.message);
        }

        Command::Download {
            campaign_id,
            output,
        } => {
            let path = output.unwrap_or_else(|| PathBuf::from(format!("{campaign_id}.html")));
            let bytes = client.download(&campaign_id).await?;
            tokio::fs::write(&path, &bytes).await?;
            println!("Wrote {} bytes to {}", bytes.len(), path.display());
        }

        Command::List {
            status,
            limit,
            offset,
        } => {
            let filter = ListFilter {
                status: status.map(Into::into),
                limit,
                offset,
            };
            let resp = client.list(&filter).await?;
            ui::print_campaign_table(&resp.campaigns, resp.total);
        }

        Command::Show { campaign_id } => {
            let campaign = client.detail(&campaign_id).await?;
            println!("Campaign: {} ({})", campaign.campaign_name, campaign.id);
            println!("Advertiser: {}", campaign.advertiser_name);
            println!("Status: {}", ui::status_badge(campaign.status));
            println!("Created: {}", campaign.created_at);
            if let Some(approved_at) = &campaign.approved_at {
                println!("Approved: {approved_at}");
            }
            if let Some(scheduled_at) = &campaign.scheduled_at {
                println!("Scheduled: {scheduled_at}");
            }
            if let Some(review_status) = &campaign.review_status {
                println!("Review: {review_status}");
            }
            if let Some(notes) = &campaign.reviewer_notes {
                println!("Reviewer notes: {notes}");
            }
            if let Some(feedback) = &campaign.feedback {
                println!("Feedback: {feedback}");
            }
        }

        Command::Reset {
            campaign_id,
            clear_feedback,
        } => {
            let campaign = client.reset(&campaign_id, clear_feedback).await?;
            println!(
                "Campaign {} reset to {}",
                campaign.id,
                ui::status_badge(campaign.status)
            );
        }

        Command::Edit {
            campaign_id,
            subject_line,
            preview_text,
            body_copy,
            cta_text,
            cta_url,
            footer_text,
        } => {
            let fields = EditRequest {
                subject_line,
                preview_text,
                body_copy,
                cta_text,
                cta_url,
                footer_text,
            };
            if fields.is_empty() {
                return Err(ProofctlError::NothingToEdit);
            }
            let resp = client.edit(&campaign_id, &fields).await?;
            println!("{}", resp.message);
            println!("Status: {}", ui::status_badge(resp.status));
        }

        Command::ReplaceImage {
            campaign_id,
            image_type,
            file,
        } => {
            let part = read_file_part(&file).await?;
            let resp = client.replace_image(&campaign_id, &image_type, &part).await?;
            println!("{}", resp.message);
        }

        Command::Schedule { campaign_id, at } => {
            // Catch malformed datetimes before they reach the server.
            DateTime::parse_from_rfc3339(&at).map_err(|e| {
                ProofctlError::Config(format!("invalid --at datetime '{at}': {e}"))
            })?;
            let resp = client.schedule(&campaign_id, &at).await?;
            println!("{}", resp.message);
        }

        Command::CancelSchedule { campaign_id } => {
            let resp = client.cancel_schedule(&campaign_id).await?;
            println!("{}", resp.message);
        }

        Command::Review {
            campaign_id,
            status,
            notes,
        } => {
            let resp = client.review(&campaign_id, status.as_str(), notes).await?;
            println!("{}", resp.message);
        }

        Command::ReviewList {
            status,
            limit,
            offset,
        } => {
            let filter = ReviewListFilter {
                review_status: status.map(|s| s.as_str().to_string()),
                limit,
                offset,
            };
            let resp = client.review_list(&filter).await?;
            ui::print_campaign_table(&resp.campaigns, resp.total);
        }

        Command::Performance {
            campaign_id,
            open_rate,
            click_rate,
            conversion_rate,
        } => {
            let metrics = PerformanceMetrics {
                open_rate,
                click_rate,
                conversion_rate,
            };
            if metrics.is_empty() {
                return Err(ProofctlError::NoMetrics);
            }
            let resp = client.performance(&campaign_id, &metrics).await?;
            println!("{}", resp.message);
            println!("Performance score: {:.3}", resp.performance_score);
        }

        Command::Recommendations { campaign_id } => {
            let resp = client.recommendations(&campaign_id).await?;
            print_recommendations("Subject lines", &resp.subject_line_recommendations);
            print_recommendations("Preview texts", &resp.preview_text_recommendations);
            print_recommendations("CTA texts", &resp.cta_text_recommendations);
            if !resp.historical_data_available {
                println!("(no historical data available yet)");
            } else {
                println!(
                    "Based on {} analyzed campaigns",
                    resp.total_campaigns_analyzed
                );
            }
        }

        Command::Health => {
            let resp = client.health().await?;
            println!("Service: {} ({})", resp.service, resp.status);
            if let Some(database) = resp.database {
                println!("Database: {database}");
            }
        }
    }

    Ok(())
}

async fn read_file_part(path: &Path) -> Result<FilePart, ProofctlError> {
    let bytes = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "file".to_string());
    Ok(FilePart { file_name, bytes })
}

async fn render_preview(
    preview: &PreviewResponse,
    output: Option<&Path>,
) -> Result<(), ProofctlError> {
    if let Some(path) = output {
        tokio::fs::write(path, preview.html_preview.as_bytes()).await?;
        println!("Wrote proof HTML to {}", path.display());
        return Ok(());
    }

    if let Some(name) = preview.metadata.get("campaign_name").and_then(|v| v.as_str()) {
        println!("Campaign: {name}");
    } else {
        println!("Campaign: {}", preview.campaign_id);
    }
    println!("Proof HTML: {} bytes", preview.html_preview.len());
    if let Some(suggestions) = &preview.ai_suggestions {
        println!("AI suggestions:");
        println!("{}", serde_json::to_string_pretty(suggestions)?);
    }
    Ok(())
}

fn print_recommendations(label: &str, items: &[proofctl::api::types::RecommendationItem]) {
    if items.is_empty() {
        return;
    }
    println!("{label}:");
    for item in items {
        println!(
            "  - {} ({:.0}% confidence)",
            item.content,
            item.confidence_score * 100.0
        );
        println!("    {}", item.reasoning);
    }
    println!();
}
