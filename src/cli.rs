use crate::{
    config::Config,
    decoders,
    engine::{tesseract::TesseractEngine, OcrEngine},
    persist,
    pipeline::Pipeline,
    upload::{UploadedFile, ALLOWED_EXTENSIONS},
    util::ensure_dir,
};
use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

#[derive(Parser, Debug)]
#[command(name = "report-ingest")]
#[command(about = "Validate uploaded medical reports and extract their text")]
pub struct Args {
    #[command(subcommand)]
    pub cmd: Command,

    /// Path to config TOML. If omitted, uses ./report-ingest.toml if present.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override log level (trace/debug/info/warn/error).
    #[arg(long)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Report which extraction capabilities this host provides.
    Doctor {},
    /// Extract text from one batch of files.
    Extract {
        #[arg(long, required = true, num_args = 1..)]
        input: Vec<PathBuf>,
        #[arg(long)]
        session_id: Option<String>,
        #[arg(long)]
        user_id: Option<String>,
        /// Write the JSON + text debug artifacts (needs both ids).
        #[arg(long)]
        persist: bool,
        /// Print the combined document text instead of the JSON result.
        #[arg(long)]
        combined: bool,
    },
}

pub fn dispatch(args: Args) -> Result<()> {
    let cfg = load_config(args.config.as_deref())?;
    let _guard = init_logging(&args, &cfg)?;

    match &args.cmd {
        Command::Doctor {} => doctor(&cfg),
        Command::Extract {
            input,
            session_id,
            user_id,
            persist,
            combined,
        } => extract(
            &cfg,
            input,
            session_id.as_deref(),
            user_id.as_deref(),
            *persist,
            *combined,
        ),
    }
}

/// File (explicit or `./report-ingest.toml`) or built-in defaults, with the
/// process environment layered on top.
pub fn load_config(user: Option<&Path>) -> Result<Config> {
    let mut cfg = match resolve_config_path(user) {
        Some(path) => Config::load(&path)?,
        None => Config::default(),
    };
    cfg.apply_process_env()?;
    Ok(cfg)
}

fn resolve_config_path(user: Option<&Path>) -> Option<PathBuf> {
    if let Some(p) = user {
        return Some(p.to_path_buf());
    }
    let default = PathBuf::from("report-ingest.toml");
    default.exists().then_some(default)
}

fn init_logging(args: &Args, cfg: &Config) -> Result<Option<WorkerGuard>> {
    let level = args
        .log_level
        .as_deref()
        .unwrap_or(cfg.logging.level.as_str());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // stdout carries command output; diagnostics go to stderr.
    let console_layer = if cfg.logging.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed()
    };

    let (file_layer, guard) = match cfg.log_file_path() {
        Some(path) => {
            let parent = path.parent().unwrap_or_else(|| Path::new("."));
            ensure_dir(parent)?;
            let file = std::fs::File::create(&path)
                .map_err(|e| anyhow!("create log file {}: {e}", path.display()))?;
            let (non_blocking, guard) = tracing_appender::non_blocking(file);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .boxed();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow!("failed to init logging: {e}"))?;

    Ok(guard)
}

fn doctor(cfg: &Config) -> Result<()> {
    let engine = TesseractEngine::new(cfg);
    let ocr = engine.doctor();
    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({
            "pdf_native": decoders::pdf::is_available(),
            "ocr": ocr,
            "allowed_extensions": ALLOWED_EXTENSIONS,
            "limits": cfg.limits,
            "ocr_debug_dir": cfg.paths.ocr_debug_dir,
        }))?
    );
    Ok(())
}

fn extract(
    cfg: &Config,
    inputs: &[PathBuf],
    session_id: Option<&str>,
    user_id: Option<&str>,
    force_persist: bool,
    combined: bool,
) -> Result<()> {
    if force_persist && (session_id.is_none() || user_id.is_none()) {
        return Err(anyhow!("--persist needs both --session-id and --user-id"));
    }

    let mut files = inputs
        .iter()
        .map(|p| UploadedFile::open(p))
        .collect::<Result<Vec<_>>>()?;

    let pipeline = Pipeline::new(cfg, TesseractEngine::new(cfg));
    let result = pipeline.run(&mut files)?;

    if let (Some(sid), Some(uid)) = (session_id, user_id) {
        if force_persist || cfg.debug.persist_artifacts {
            if let Some(paths) =
                persist::persist_best_effort(&cfg.ocr_debug_dir(), sid, uid, &result)
            {
                info!("debug artifacts written to {}", paths.json.display());
            }
        }
    }

    if combined {
        let text = result.combined_text();
        if text.is_empty() {
            return Err(anyhow!(
                "Could not extract readable text from uploaded report(s). warnings={:?}",
                result.warnings
            ));
        }
        println!("{text}");
    } else {
        println!("{}", serde_json::to_string_pretty(&result)?);
    }
    Ok(())
}
