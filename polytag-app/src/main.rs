use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use polytag_common::observability::init_logging;
use polytag_config::{PolytagConfig, PolytagConfigLoader, default_config_path};
use polytag_pipeline::{PageRequest, Template};
use std::io::Read;
use std::path::{Path, PathBuf};

mod handler;
mod wiring;

/// Tag news articles with policy topics and politicians.
#[derive(Debug, Parser)]
#[command(name = "polytag", version, about)]
struct Cli {
    /// YAML config file (defaults to `<config dir>/polytag/polytag.yaml` if present).
    #[arg(long, global = true, env = "POLYTAG_CONFIG")]
    config: Option<PathBuf>,

    /// Override the configured template.
    #[arg(long, global = true)]
    template: Option<Template>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Classify one article and print the JSON result.
    Classify { url: String },
    /// Handle an inbound event body (`{"url": ...}`) and print the response envelope.
    Event {
        /// File holding the body; `-` or nothing reads stdin.
        input: Option<PathBuf>,
    },
}

fn load_config(cli: &Cli) -> Result<PolytagConfig> {
    let mut loader = PolytagConfigLoader::new();
    if let Some(path) = cli.config.clone().or_else(default_config_path) {
        loader = loader.with_file(path);
    }
    let mut cfg = loader.load().context("loading configuration")?;
    if let Some(template) = cli.template {
        cfg.template = template;
    }
    Ok(cfg)
}

fn read_event_body(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("reading event body from {}", path.display())),
        _ => {
            let mut body = String::new();
            std::io::stdin()
                .read_to_string(&mut body)
                .context("reading event body from stdin")?;
            Ok(body)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1) Load config (env wins)
    let cfg = load_config(&cli)?;

    // 2) Logging goes to file (and stderr); stdout carries results only
    init_logging(cfg.logging.to_log_config("polytag"))?;

    // 3) One pipeline for the whole process
    let pipeline = wiring::build_pipeline(&cfg).context("building pipeline")?;

    match &cli.command {
        Command::Classify { url } => {
            let result = pipeline.classify(&PageRequest::new(url.as_str())).await;
            println!("{}", serde_json::to_string(&result)?);
        }
        Command::Event { input } => {
            let body = read_event_body(input.as_deref())?;
            let envelope = handler::handle_event(&pipeline, &body).await;
            println!("{}", serde_json::to_string(&envelope)?);
        }
    }
    Ok(())
}
