//! Screening Dashboard - facility summary report & interactive dashboard
//!
//! `report` writes the per-facility summary workbook and prints it,
//! `dashboard` opens the interactive window.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use eframe::egui;
use screening_dashboard::config::{DASHBOARD_TITLE, DEFAULT_INPUT_PATH, DEFAULT_REPORT_PATH};
use screening_dashboard::data::DataLoader;
use screening_dashboard::export;
use screening_dashboard::gui::ScreeningApp;
use screening_dashboard::pipeline::{self, Dataset};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "screening-dashboard", version, about = "Health risk screening facility summary")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write the facility summary workbook and print it
    Report {
        /// Screening dataset (.xlsx, .xls, .ods or .csv)
        #[arg(short, long, default_value = DEFAULT_INPUT_PATH)]
        input: PathBuf,
        /// Summary workbook to create
        #[arg(short, long, default_value = DEFAULT_REPORT_PATH)]
        output: PathBuf,
    },
    /// Open the interactive dashboard
    Dashboard {
        /// Screening dataset (.xlsx, .xls, .ods or .csv)
        #[arg(short, long, default_value = DEFAULT_INPUT_PATH)]
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(env).with_target(false).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Report { input, output } => run_report(&input, &output),
        Command::Dashboard { input } => run_dashboard(&input),
    }
}

fn run_report(input: &Path, output: &Path) -> Result<()> {
    let summary = pipeline::generate_report(input, output)
        .with_context(|| format!("failed to build report from {}", input.display()))?;

    println!("{}", export::render_table(&summary)?);
    info!(
        facilities = summary.len(),
        output = %output.display(),
        "report complete"
    );
    Ok(())
}

fn run_dashboard(input: &Path) -> Result<()> {
    let mut loader = DataLoader::new();
    let dataset = Dataset::load(&mut loader, input)
        .with_context(|| format!("failed to load {}", input.display()))?;

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([1100.0, 700.0])
            .with_title(DASHBOARD_TITLE),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        DASHBOARD_TITLE,
        options,
        Box::new(|cc| Ok(Box::new(ScreeningApp::new(cc, loader, dataset)))),
    )
    .map_err(|e| anyhow!("dashboard failed: {e}"))
}
