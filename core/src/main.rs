//! LeafScan CLI - Diagnose plant leaf photos from the command line
//!
//! # Commands
//!
//! ```bash
//! leafscan diagnose leaf.jpg               # Submit and print the diagnosis
//! leafscan diagnose leaf.jpg --json        # Normalized diagnosis as JSON
//! leafscan check leaf.jpg                  # Validate only, no network
//! leafscan config                          # Show effective configuration
//! ```
//!
//! Configuration comes from `LEAFSCAN_*` variables (a `.env` file is loaded
//! first); `--api-url` and `--timeout` override them.

use clap::{Parser, Subcommand};
use leafscan::config::parse_timeout;
use leafscan::presenter::{self, candidate_card, intake_notice, ResultView};
use leafscan::{
    CandidateSummary, ClientConfig, DataUriPreview, FileIntake, FileSource, HttpTransport,
    RawFile, SubmissionState, UploadWorkflow,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Width of the confidence bar, in cells.
const BAR_WIDTH: usize = 20;

#[derive(Parser)]
#[command(name = "leafscan")]
#[command(about = "Diagnose plant diseases from leaf photos", long_about = None)]
struct Cli {
    /// Verbose workflow logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit a leaf photo and print the diagnosis
    Diagnose {
        /// Image file (jpg, png, webp, ...)
        image: PathBuf,

        /// Prediction server base URL (overrides LEAFSCAN_API_URL)
        #[arg(long)]
        api_url: Option<String>,

        /// Request timeout in seconds (overrides LEAFSCAN_TIMEOUT_SECS)
        #[arg(short, long)]
        timeout: Option<String>,

        /// Print the normalized diagnosis as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate an image without submitting it
    Check {
        /// Image file
        image: PathBuf,

        /// Also print the preview data URI
        #[arg(long)]
        data_uri: bool,
    },

    /// Show the effective configuration
    Config,
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.debug);

    let outcome = match cli.command {
        Commands::Diagnose {
            image,
            api_url,
            timeout,
            json,
        } => cmd_diagnose(&image, api_url.as_deref(), timeout.as_deref(), json).await,

        Commands::Check { image, data_uri } => cmd_check(&image, data_uri).map(|_| Outcome::Done),

        Commands::Config => cmd_config().map(|_| Outcome::Done),
    };

    match outcome {
        Ok(Outcome::Done) => {}
        // Already reported by the rendered failure view.
        Ok(Outcome::Failed) => std::process::exit(1),
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// How a command ended when it did not error out.
#[derive(Debug, PartialEq, Eq)]
enum Outcome {
    Done,
    /// The diagnosis failed and its failure view was printed.
    Failed,
}

impl From<&SubmissionState> for Outcome {
    fn from(state: &SubmissionState) -> Self {
        match state {
            SubmissionState::Failed(_) => Outcome::Failed,
            _ => Outcome::Done,
        }
    }
}

fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("leafscan=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error"))
    };

    // Also installs the log -> tracing bridge for the library's `log` records.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn load_config(
    api_url: Option<&str>,
    timeout: Option<&str>,
) -> Result<ClientConfig, Box<dyn std::error::Error>> {
    let mut config = ClientConfig::from_env()?;
    if let Some(url) = api_url {
        config = config.with_base_url(url)?;
    }
    if let Some(raw) = timeout {
        config = config.with_timeout(parse_timeout(raw)?);
    }
    Ok(config)
}

async fn cmd_diagnose(
    image: &Path,
    api_url: Option<&str>,
    timeout: Option<&str>,
    json: bool,
) -> Result<Outcome, Box<dyn std::error::Error>> {
    let config = load_config(api_url, timeout)?;
    eprintln!("🌿 Analyzing: {}", image.display());
    eprintln!("   Endpoint: {}", config.predict_url());

    let raw = RawFile::from_path(image)?;
    let workflow = UploadWorkflow::new(config, HttpTransport::new(), DataUriPreview);

    let candidate = workflow
        .accept(raw, FileSource::Path)
        .map_err(|e| intake_notice(&e))?;
    let card = candidate_card(&CandidateSummary::from(&candidate));
    eprintln!("   File: {} ({})", card.name, card.size_label);

    if let Some(preview) = workflow.load_preview().await {
        log::debug!("Preview ready ({} chars)", preview.uri().len());
    }
    eprintln!("   ⏳ {}", presenter::PROGRESS_MESSAGE);

    let state = workflow.submit().await;

    match (&state, json) {
        (SubmissionState::Succeeded(diagnosis), true) => {
            println!("{}", serde_json::to_string_pretty(diagnosis)?);
        }
        _ => print_view(&presenter::present(&state)),
    }

    Ok(Outcome::from(&state))
}

fn cmd_check(image: &Path, data_uri: bool) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("🔍 Checking: {}", image.display());

    let config = ClientConfig::from_env()?;
    let raw = RawFile::from_path(image)?;
    eprintln!("   Media type: {}", raw.media_type);

    let candidate = FileIntake::from_config(&config)
        .admit(raw, leafscan::CandidateId(1))
        .map_err(|e| intake_notice(&e))?;
    let card = candidate_card(&CandidateSummary::from(&candidate));
    eprintln!("✅ {} ({}) is ready to submit", card.name, card.size_label);

    let preview = DataUriPreview::encode(&candidate);
    eprintln!("   Preview: {} chars", preview.uri().len());
    if data_uri {
        println!("{}", preview.uri());
    }
    Ok(())
}

fn cmd_config() -> Result<(), Box<dyn std::error::Error>> {
    let config = ClientConfig::from_env()?;
    println!("API URL:      {}", config.base_url());
    println!("Endpoint:     {}", config.predict_url());
    println!("Timeout:      {:?}", config.request_timeout());
    println!("Upload limit: {}", presenter::format_size(config.max_upload_bytes()));
    Ok(())
}

fn print_view(view: &ResultView) {
    match view {
        ResultView::Placeholder { message } | ResultView::Progress { message } => {
            println!("{}", message);
        }
        ResultView::Diagnosis(view) => {
            println!("🦠 {}", view.title);
            if !view.description.is_empty() {
                println!("   {}", view.description);
            }
            println!(
                "   Confidence: {} {}",
                view.confidence_label,
                confidence_bar(view.confidence_fraction)
            );
            if let Some(badge) = &view.severity_badge {
                println!("   Severity:   {}", badge.label);
            }
            if !view.treatment.is_empty() {
                println!("\n💊 Recommended Treatment");
                for step in &view.treatment {
                    println!("   {}. {}", step.number, step.text);
                }
            }
            if let Some(banner) = &view.healthy_banner {
                println!("\n🌱 {}", banner.headline);
                println!("   {}", banner.detail);
            }
        }
        ResultView::Failure(view) => {
            eprintln!("❌ {}: {}", view.title, view.message);
        }
    }
}

fn confidence_bar(fraction: f64) -> String {
    let filled = ((fraction * BAR_WIDTH as f64).round() as usize).min(BAR_WIDTH);
    format!("[{}{}]", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

#[cfg(test)]
mod tests {
    use super::*;
    use leafscan::ErrorKind;

    #[test]
    fn test_failed_diagnosis_exits_without_extra_error() {
        assert_eq!(
            Outcome::from(&SubmissionState::Failed(ErrorKind::ServerError)),
            Outcome::Failed
        );
        assert_eq!(Outcome::from(&SubmissionState::Idle), Outcome::Done);
    }

    #[test]
    fn test_confidence_bar() {
        assert_eq!(confidence_bar(0.0), format!("[{}]", "░".repeat(BAR_WIDTH)));
        assert_eq!(confidence_bar(1.0), format!("[{}]", "█".repeat(BAR_WIDTH)));
        assert_eq!(confidence_bar(0.5).matches('█').count(), BAR_WIDTH / 2);
    }
}
