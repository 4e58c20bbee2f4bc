use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use api_client::{ApiClient, ExportRequest};
use media_probe::{probe_audio, UploadPolicy};
use session::{CutList, Selection, Session, SessionEvent, UiState};

mod headless;
use headless::{HeadlessOverlay, HeadlessWave};

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
const BASE_URL_ENV: &str = "CUTTER_API_URL";

#[derive(Parser)]
#[command(name = "cutter-cli")]
#[command(about = "Audio cutter CLI - headless selection and export operations")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect an audio file and print its metadata
    Probe {
        /// Audio file to inspect
        file: PathBuf,
    },

    /// Run an event script against a fresh session and print the cut plan
    Plan {
        /// Audio file the session cuts against
        file: PathBuf,

        /// JSON array of session events
        #[arg(short, long)]
        script: PathBuf,

        /// View width in pixels, used for fit zoom
        #[arg(long, default_value = "800")]
        width: f64,
    },

    /// Upload an audio file and create a project
    Upload {
        /// Audio file to upload
        file: PathBuf,

        /// Backend base URL (falls back to CUTTER_API_URL)
        #[arg(long)]
        base_url: Option<String>,
    },

    /// Export a cut plan through the backend
    Export {
        /// Project id returned by upload
        #[arg(short, long)]
        project: String,

        /// Cut plan JSON produced by `plan`
        #[arg(long)]
        plan: PathBuf,

        /// Export bitrate in kbps
        #[arg(long, default_value = "192")]
        bitrate: u32,

        /// Backend base URL (falls back to CUTTER_API_URL)
        #[arg(long)]
        base_url: Option<String>,
    },

    /// Delete a project and its stored files server-side
    Delete {
        /// Project id to delete
        project: String,

        /// Backend base URL (falls back to CUTTER_API_URL)
        #[arg(long)]
        base_url: Option<String>,
    },
}

#[derive(Serialize)]
struct PlanOutput<'a> {
    cuts: &'a CutList,
    selection: &'a Selection,
    ui: UiState,
}

#[derive(Deserialize)]
struct PlanInput {
    cuts: CutList,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    match cli.command {
        Commands::Probe { file } => cmd_probe(&file),
        Commands::Plan {
            file,
            script,
            width,
        } => cmd_plan(&file, &script, width),
        Commands::Upload { file, base_url } => cmd_upload(&file, base_url).await,
        Commands::Export {
            project,
            plan,
            bitrate,
            base_url,
        } => cmd_export(&project, &plan, bitrate, base_url).await,
        Commands::Delete { project, base_url } => cmd_delete(&project, base_url).await,
    }
}

fn cmd_probe(file: &Path) -> Result<()> {
    UploadPolicy::default()
        .check(file)
        .with_context(|| format!("cannot use {}", file.display()))?;
    let audio = probe_audio(file)?;

    let summary = serde_json::json!({
        "path": audio.path,
        "duration_seconds": audio.duration_seconds,
        "duration": session::to_hms(audio.duration_seconds),
        "codec_name": audio.codec_name,
        "bitrate_bps": audio.bitrate_bps,
        "sample_rate_hz": audio.sample_rate_hz,
        "channels": audio.channels,
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn cmd_plan(file: &Path, script: &Path, width: f64) -> Result<()> {
    let audio = probe_audio(file)?;
    let raw = std::fs::read(script)
        .with_context(|| format!("cannot read script {}", script.display()))?;
    let events: Vec<SessionEvent> =
        serde_json::from_slice(&raw).context("script is not a JSON array of events")?;

    let mut session = Session::new();
    let mut wave = HeadlessWave::new(audio.duration_seconds, width);
    let mut overlay = HeadlessOverlay::default();

    session.apply(
        SessionEvent::SourceReady {
            duration: audio.duration_seconds,
        },
        &mut wave,
        &mut overlay,
    );
    let applied = events.len();
    for event in events {
        session.apply(event, &mut wave, &mut overlay);
    }
    info!(
        events = applied,
        cuts = session.cuts().len(),
        "script applied"
    );

    let output = PlanOutput {
        cuts: session.cuts(),
        selection: session.selection(),
        ui: session.ui_state(),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

async fn cmd_upload(file: &Path, base_url: Option<String>) -> Result<()> {
    UploadPolicy::default()
        .check(file)
        .with_context(|| format!("cannot upload {}", file.display()))?;

    let client = ApiClient::new(resolve_base_url(base_url));
    let created = client.create_project(file).await?;
    info!(project_id = %created.project_id, "project created");

    println!("project_id: {}", created.project_id);
    println!("audio_url:  {}", client.audio_url(&created.project_id));
    Ok(())
}

async fn cmd_export(
    project: &str,
    plan: &Path,
    bitrate: u32,
    base_url: Option<String>,
) -> Result<()> {
    let raw = std::fs::read(plan).with_context(|| format!("cannot read plan {}", plan.display()))?;
    let input: PlanInput = serde_json::from_slice(&raw).context("plan file is not valid JSON")?;
    anyhow::ensure!(!input.cuts.is_empty(), "plan contains no cuts to export");

    let client = ApiClient::new(resolve_base_url(base_url));
    let request = ExportRequest::from_cuts(&input.cuts, bitrate);
    let report = client.export(project, &request).await?;

    println!("{}", serde_json::to_string_pretty(&report.0)?);
    Ok(())
}

async fn cmd_delete(project: &str, base_url: Option<String>) -> Result<()> {
    let client = ApiClient::new(resolve_base_url(base_url));
    client.delete_project(project).await?;
    println!("deleted {}", project);
    Ok(())
}

fn resolve_base_url(flag: Option<String>) -> String {
    flag.or_else(|| std::env::var(BASE_URL_ENV).ok())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
}
