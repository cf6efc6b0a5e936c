#![forbid(unsafe_code)]

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use dvc_exp_api::api::build_router;
use dvc_exp_api::config::{Config, LogFormat};
use dvc_exp_api::report::render_report;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "dvc-exp-api", version, about = "HTTP API for DVC experiments")]
struct Cli {
    /// YAML configuration file
    #[arg(long, global = true, env = "DVC_API_CONFIG")]
    config: Option<PathBuf>,

    /// DVC repository directory
    #[arg(long, global = true)]
    repo: Option<PathBuf>,

    /// `dvc` executable
    #[arg(long, global = true)]
    dvc_bin: Option<PathBuf>,

    /// Bind address
    #[arg(long, global = true)]
    bind: Option<String>,

    /// Listen port
    #[arg(long, global = true)]
    port: Option<u16>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the HTTP API (default)
    Serve,
    /// Print every experiment with its parameters
    Report,
}

impl Cli {
    fn load_config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)
                .with_context(|| format!("loading config from {}", path.display()))?,
            None => Config::default(),
        };
        config.apply_env().context("reading DVC_API_* environment")?;

        if let Some(repo) = &self.repo {
            config.dvc.repo_dir.clone_from(repo);
        }
        if let Some(bin) = &self.dvc_bin {
            config.dvc.binary.clone_from(bin);
        }
        if let Some(bind) = &self.bind {
            config.server.bind.clone_from(bind);
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        Ok(config)
    }
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match config.logging.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let repo = Arc::new(config.dvc_repository());
    let app = build_router(repo);

    let bind_addr = config.bind_addr();
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding {bind_addr}"))?;
    info!(
        addr = %bind_addr,
        repo = %config.dvc.repo_dir.display(),
        "dvc-exp-api listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown signal received");
        })
        .await
        .context("server failed")
}

async fn report(config: Config) -> anyhow::Result<ExitCode> {
    let repo = config.dvc_repository();
    match render_report(&repo).await? {
        Some(text) => {
            print!("{text}");
            Ok(ExitCode::SUCCESS)
        }
        None => {
            eprintln!("No experiments found.");
            Ok(ExitCode::FAILURE)
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let config = cli.load_config()?;
    init_tracing(&config);

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await.map(|()| ExitCode::SUCCESS),
        Command::Report => report(config).await,
    }
}
