//! fieldkit
//!
//! Command-line front end for placing form fields in PDFs and checking
//! rendered pages with perceptual hashes.

mod commands;
mod config;

use anyhow::Context;
use clap::{Parser, Subcommand};
use config::Config;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "fieldkit")]
#[command(version, about = "Add fillable form fields to PDFs and compare page images")]
struct Cli {
    /// Config file (defaults to ./fieldkit.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add form fields described by a JSON array to a PDF
    Fill {
        input: PathBuf,
        fields: PathBuf,
        /// Where to write the fillable PDF
        #[arg(short, long)]
        output: PathBuf,
        /// Position fields on the unrotated page instead of as displayed
        #[arg(long)]
        no_rotation_normalization: bool,
        /// Font size for text and date fields
        #[arg(long)]
        font_size: Option<f64>,
    },
    /// Expand a page range such as "1-3, 5"
    Pages {
        range: String,
        #[arg(long)]
        max_pages: usize,
    },
    /// List form widgets as JSON
    Fields { input: PathBuf },
    /// Print the difference hash of an image
    Dhash { image: PathBuf },
    /// Compare two images; fails when they differ by more than the threshold
    Compare {
        left: PathBuf,
        right: PathBuf,
        #[arg(long)]
        max_distance: Option<u32>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // stdout carries command output, logs go to stderr
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            tracing::error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Command::Fill {
            input,
            fields,
            output,
            no_rotation_normalization,
            font_size,
        } => {
            let mut options = config.fill;
            if no_rotation_normalization {
                options.normalize_page_rotation = false;
            }
            if let Some(size) = font_size {
                options.font_size = size;
            }

            let pdf = read(&input)?;
            let fields_json = fs::read_to_string(&fields)
                .with_context(|| format!("Failed to read {}", fields.display()))?;
            let filled = commands::fill(&pdf, &fields_json, &options)?;
            fs::write(&output, &filled)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            tracing::info!("Wrote {}", output.display());
        }
        Command::Pages { range, max_pages } => {
            let selection = commands::select_pages(&range, max_pages);
            println!("{}", serde_json::to_string_pretty(&selection)?);
        }
        Command::Fields { input } => {
            let reports = commands::describe_fields(&read(&input)?, &config.fill)?;
            println!("{}", serde_json::to_string_pretty(&reports)?);
        }
        Command::Dhash { image } => {
            println!("{}", image_qa::compute_dhash_hex(&read(&image)?)?);
        }
        Command::Compare {
            left,
            right,
            max_distance,
        } => {
            let threshold = max_distance.unwrap_or(config.qa.max_distance);
            let comparison = commands::compare(&read(&left)?, &read(&right)?)?;
            println!("{}", serde_json::to_string_pretty(&comparison)?);

            if !comparison.is_similar(threshold) {
                tracing::warn!(
                    distance = comparison.distance,
                    threshold,
                    "Images differ beyond threshold"
                );
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn read(path: &Path) -> anyhow::Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
}
