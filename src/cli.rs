//! CLI definitions and entry point

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use signet::{AttestationStore, HttpServer, ServerConfig, SledBackend};

/// signet - attestation storage service
#[derive(Parser, Debug)]
#[command(
    name = "signet",
    version,
    about = "Record and serve attestations keyed by subject identifier",
    long_about = "Serve a small JSON API for attestations.\n\n\
                  POST /sig appends attestations to their subjects' histories.\n\
                  GET /sig/{id} returns every attestation stored for an identifier."
)]
pub struct Cli {
    /// Port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Interface to listen on
    #[arg(long)]
    pub host: Option<String>,

    /// Directory of the attestation database
    #[arg(long = "db", value_name = "PATH")]
    pub db_path: Option<PathBuf>,

    /// Number of request worker threads
    #[arg(long)]
    pub workers: Option<usize>,

    /// TOML config file (flags take precedence)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Merge defaults, the optional config file, and flags
    pub fn resolve_config(&self) -> anyhow::Result<ServerConfig> {
        let mut config = match &self.config {
            Some(path) => ServerConfig::load(path)?,
            None => ServerConfig::default(),
        };

        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(host) = &self.host {
            config.host.clone_from(host);
        }
        if let Some(db_path) = &self.db_path {
            config.db_path.clone_from(db_path);
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Run the CLI
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    let config = cli.resolve_config()?;
    log::debug!("Resolved config: {config:?}");

    let backend = SledBackend::open(&config.db_path)
        .with_context(|| format!("Failed to open database at {}", config.db_path.display()))?;
    let server = HttpServer::bind(&config, AttestationStore::new(backend))?;

    let shutdown = server.shutdown_handle();
    ctrlc::set_handler(move || {
        log::info!("Received stop signal, shutting down");
        shutdown.shutdown();
    })
    .context("Failed to install signal handler")?;

    println!("signet v{} listening on port {}", signet::VERSION, config.port);
    println!("Press Ctrl+C to stop");

    server.run()
}
