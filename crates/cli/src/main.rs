use analysis::{AnalysisResult, BeatRef};
use anyhow::{bail, Context, Result};
use api_client::{wait_for_job, AnalysisApi, ApiClient, ClientConfig, JobId};
use clap::{Parser, Subcommand};
use inspector::InspectorState;
use session::{prepare_upload, Applied, Session, Upload, Workbench};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "vpe")]
#[command(about = "Visual planning for screenplays - analyze scripts and inspect beats")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, global = true)]
    verbose: bool,

    /// Analysis service base URL (overrides config and VPE_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Client config file (defaults to <config dir>/vpe/client.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Job polls before giving up
    #[arg(long, global = true)]
    poll_attempts: Option<u32>,

    /// Pause between job polls in milliseconds
    #[arg(long, global = true)]
    poll_interval_ms: Option<u64>,

    /// Print views as JSON instead of text
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a screenplay (.fountain, .txt or .pdf) and show its analysis
    Analyze {
        /// Script file
        file: PathBuf,

        /// Title sent with the script (defaults to the file name)
        #[arg(long)]
        title: Option<String>,

        /// Beat to show in the inspector
        #[arg(long)]
        beat: Option<String>,

        /// Write the session JSON to this file or directory
        #[arg(long)]
        export_json: Option<PathBuf>,

        /// Write the selected beat JSON to this file or directory
        #[arg(long, requires = "beat")]
        export_beat: Option<PathBuf>,

        /// Download the PDF report to this file or directory
        #[arg(long)]
        export_pdf: Option<PathBuf>,
    },

    /// Poll an analysis job and show its result
    Job {
        /// Job id
        id: String,

        /// Beat to show in the inspector
        #[arg(long)]
        beat: Option<String>,
    },

    /// Check the analysis service
    Health,

    /// Download the PDF report of a job
    ExportPdf {
        /// Job id
        job_id: String,

        /// Output file or directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Title used for the default file name
        #[arg(long)]
        title: Option<String>,
    },

    /// Show a saved analysis (session export or scene JSON) offline
    Inspect {
        /// JSON file
        file: PathBuf,

        /// Beat to show in the inspector
        #[arg(long)]
        beat: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG wins over --verbose
    let level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = resolve_config(&cli)?;
    let json = cli.json;

    match cli.command {
        Commands::Analyze {
            file,
            title,
            beat,
            export_json,
            export_beat,
            export_pdf,
        } => {
            analyze_command(
                config,
                file,
                title,
                beat,
                export_json,
                export_beat,
                export_pdf,
                json,
            )
            .await
        }
        Commands::Job { id, beat } => job_command(config, id, beat, json).await,
        Commands::Health => health_command(config).await,
        Commands::ExportPdf {
            job_id,
            output,
            title,
        } => export_pdf_command(config, job_id, output, title).await,
        Commands::Inspect { file, beat } => inspect_command(file, beat, json).await,
    }
}

/// Defaults, then the config file, then VPE_* variables, then flags.
fn resolve_config(cli: &Cli) -> Result<ClientConfig> {
    let mut config = ClientConfig::load_or_default(cli.config.as_deref())
        .context("Failed to load client config")?
        .with_env();

    if let Some(url) = &cli.api_url {
        config.base_url = url.clone();
    }
    if let Some(attempts) = cli.poll_attempts {
        config.poll.max_attempts = attempts;
    }
    if let Some(ms) = cli.poll_interval_ms {
        config.poll.interval_ms = ms;
    }

    config.validate()?;
    Ok(config)
}

fn connect(config: &ClientConfig) -> Result<Arc<dyn AnalysisApi>> {
    let client = ApiClient::new(config.clone()).context("Failed to create HTTP client")?;
    info!("Using analysis service at {}", config.base());
    Ok(Arc::new(client))
}

#[allow(clippy::too_many_arguments)]
async fn analyze_command(
    config: ClientConfig,
    file: PathBuf,
    title: Option<String>,
    beat: Option<String>,
    export_json: Option<PathBuf>,
    export_beat: Option<PathBuf>,
    export_pdf: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let upload = prepare_upload(std::slice::from_ref(&file))
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let upload = match title {
        Some(title) => retitle(upload, title),
        None => upload,
    };

    let bench = Workbench::new(connect(&config)?, config.poll);
    match bench.submit(upload).await {
        Applied::Replaced { scenes, beats } => {
            info!("Analysis complete: {} scene(s), {} beat(s)", scenes, beats)
        }
        Applied::Failed(message) => bail!(message),
        Applied::Stale => bail!("Analysis was superseded"),
    }

    if let Some(beat) = &beat {
        bench.select_beat(beat)?;
    }

    let session = bench.snapshot();
    print_views(&session, json)?;

    if let Some(dest) = export_json {
        let path = bench.export_session_json(&dest)?;
        println!("Exported analysis to {}", path.display());
    }
    if let Some(dest) = export_beat {
        let path = bench.export_selected_beat(&dest)?;
        println!("Exported beat to {}", path.display());
    }
    if let Some(dest) = export_pdf {
        // PDF failures are reported but do not fail the run.
        match bench.export_pdf(&dest).await {
            Ok(path) => println!("Saved PDF to {}", path.display()),
            Err(err) => eprintln!("Alert: {}", err),
        }
    }

    Ok(())
}

fn retitle(upload: Upload, title: String) -> Upload {
    match upload {
        Upload::Text { text, .. } => Upload::Text { text, title },
        Upload::Pdf { path, .. } => Upload::Pdf { path, title },
    }
}

async fn job_command(
    config: ClientConfig,
    id: String,
    beat: Option<String>,
    json: bool,
) -> Result<()> {
    let api = connect(&config)?;
    let job_id = JobId::new(id);

    let result = wait_for_job(api.as_ref(), &job_id, &config.poll)
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;

    let session = open_session(result, beat.as_deref())?;
    print_views(&session, json)
}

async fn health_command(config: ClientConfig) -> Result<()> {
    let api = connect(&config)?;
    let body = api
        .health()
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;

    let output = serde_json::json!({
        "service": config.base(),
        "checked_at": chrono::Utc::now().to_rfc3339(),
        "health": body,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

async fn export_pdf_command(
    config: ClientConfig,
    job_id: String,
    output: PathBuf,
    title: Option<String>,
) -> Result<()> {
    let api = connect(&config)?;
    let job_id = JobId::new(job_id);

    let bytes = api
        .export_pdf(&job_id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to export PDF: {}", e.user_message()))?;
    let title = title.unwrap_or_else(|| job_id.to_string());
    let path = exporters::save_pdf(&bytes, Some(title.as_str()), &output)?;

    println!("Saved PDF to {}", path.display());
    Ok(())
}

async fn inspect_command(file: PathBuf, beat: Option<String>, json: bool) -> Result<()> {
    let result = load_document(&file)?;
    let session = open_session(result, beat.as_deref())?;
    print_views(&session, json)
}

fn load_document(path: &Path) -> Result<AnalysisResult> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;
    let result = AnalysisResult::from_document(value)?;

    for issue in result.validate() {
        warn!("{}: {}", path.display(), issue);
    }
    Ok(result)
}

fn open_session(result: AnalysisResult, beat: Option<&str>) -> Result<Session> {
    let mut session = Session::with_result(result);
    if let Some(beat) = beat {
        session.select_beat(beat)?;
    }
    Ok(session)
}

fn print_views(session: &Session, json: bool) -> Result<()> {
    let Some(result) = session.result() else {
        println!("{}", inspector::render_text(&InspectorState::NoData));
        return Ok(());
    };
    let selected: Option<BeatRef> = session.selected();
    let state = InspectorState::new(Some(result), selected);

    if json {
        let output = serde_json::json!({
            "overview": timeline::SceneOverview::new(result),
            "pacing": timeline::PacingSummary::new(result.pacing.as_ref()),
            "chart": timeline::chart_points(result),
            "breakdown": timeline::scene_breakdown(result, selected),
            "inspector": state,
            "job_id": session.job_id(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    print!("{}", timeline::render_text(result, selected));
    if selected.is_some() {
        println!();
        print!("{}", inspector::render_text(&state));
    }
    Ok(())
}
