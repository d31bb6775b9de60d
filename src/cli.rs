use crate::{
    batch::JsonBatchStore,
    cleanup::clean_intermediates,
    commands::CommandTemplates,
    config::Config,
    engine::command::CommandEngine,
    pipeline::{OcrRunner, RunOutcome},
    properties::ConfigProperties,
    util::ensure_dir,
};
use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

pub const DEFAULT_PLUGIN: &str = "TESSERACT_HOCR";

#[derive(Parser, Debug)]
#[command(name = "hocr-batch")]
#[command(about = "Parallel OCR orchestrator for scanned batches")]
pub struct Args {
    #[command(subcommand)]
    pub cmd: Command,

    /// Path to config TOML. If omitted, uses ./hocr-batch.toml if present.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override log level (trace/debug/info/warn/error).
    #[arg(long)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// OCR every admitted page of a batch and write results back.
    Run {
        #[arg(long)]
        batch: String,
        #[arg(long, default_value = DEFAULT_PLUGIN)]
        plugin: String,
    },
    /// Print the pages a run would dispatch.
    Pages {
        #[arg(long)]
        batch: String,
        #[arg(long, default_value = DEFAULT_PLUGIN)]
        plugin: String,
    },
    /// Print the command templates resolved for this host.
    Commands {},
    /// Remove intermediate rasters from a folder.
    Clean {
        #[arg(long)]
        dir: PathBuf,
    },
}

pub fn dispatch(args: Args) -> Result<()> {
    let cfg_path = resolve_config_path(args.config.as_deref())?;
    let cfg = Config::load(&cfg_path)?;

    let log_path = resolve_log_path(&cfg);
    let _guard = init_logging(&args, &cfg, log_path.as_deref())?;
    info!("config {}", cfg_path.display());

    match &args.cmd {
        Command::Run { batch, plugin } => run(&cfg, batch, plugin),
        Command::Pages { batch, plugin } => pages(&cfg, batch, plugin),
        Command::Commands {} => commands(&cfg),
        Command::Clean { dir } => clean(&cfg, dir),
    }
}

fn resolve_config_path(user: Option<&Path>) -> Result<PathBuf> {
    if let Some(p) = user {
        return Ok(p.to_path_buf());
    }
    let default = PathBuf::from("hocr-batch.toml");
    if default.exists() {
        Ok(default)
    } else {
        Ok(PathBuf::from("hocr-batch.example.toml"))
    }
}

fn init_logging(args: &Args, cfg: &Config, file_path: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = args
        .log_level
        .as_deref()
        .unwrap_or(cfg.logging.level.as_str());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let stdout_layer = if cfg.logging.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer().with_target(true).boxed()
    };

    let (file_layer, guard) = if let Some(path) = file_path {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        ensure_dir(parent)?;
        let dir = if parent.as_os_str().is_empty() {
            Path::new(".")
        } else {
            parent
        };
        let file_name = path
            .file_name()
            .ok_or_else(|| anyhow!("log path has no file name: {}", path.display()))?;
        let appender = tracing_appender::rolling::never(dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(appender);
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true)
            .boxed();
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow!("failed to init logging: {e}"))?;

    Ok(guard)
}

fn resolve_log_path(cfg: &Config) -> Option<PathBuf> {
    if !cfg.logging.write_to_file {
        return None;
    }
    if !cfg.logging.file_path.is_empty() {
        return Some(PathBuf::from(&cfg.logging.file_path));
    }
    Some(PathBuf::from(&cfg.paths.local_folder).join("hocr-batch.log"))
}

fn runner(cfg: &Config) -> Result<OcrRunner<JsonBatchStore, ConfigProperties, CommandEngine>> {
    let templates = CommandTemplates::for_host(&cfg.commands)?;
    let store = JsonBatchStore::new(&cfg.paths.local_folder, &cfg.paths.batch_file_name);
    let props = ConfigProperties::new(cfg);
    let engine = CommandEngine::new(cfg)?;
    Ok(OcrRunner::new(cfg, templates, store, props, engine))
}

fn run(cfg: &Config, batch: &str, plugin: &str) -> Result<()> {
    let outcome = runner(cfg)?.run(batch, plugin)?;
    if !cfg.global.print_summary {
        return Ok(());
    }
    let summary = match outcome {
        RunOutcome::Skipped => serde_json::json!({
            "batch_id": batch,
            "plugin": plugin,
            "status": "skipped",
        }),
        RunOutcome::Completed(report) => serde_json::json!({
            "status": "ok",
            "report": report,
        }),
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn pages(cfg: &Config, batch: &str, plugin: &str) -> Result<()> {
    let runner = runner(cfg)?;
    let pages = runner.preview(batch, plugin)?;
    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({
            "batch_id": batch,
            "plugin": plugin,
            "enabled": runner.is_enabled(batch, plugin),
            "pages": pages,
        }))?
    );
    Ok(())
}

fn commands(cfg: &Config) -> Result<()> {
    let templates = CommandTemplates::for_host(&cfg.commands)?;
    println!("{}", serde_json::to_string_pretty(&templates)?);
    Ok(())
}

fn clean(cfg: &Config, dir: &Path) -> Result<()> {
    let removed = clean_intermediates(dir, &cfg.cleanup);
    info!("removed {} intermediate files from {}", removed.len(), dir.display());
    println!("{}", serde_json::to_string_pretty(&removed)?);
    Ok(())
}
