use anyhow::Result;
use calc_bootstrap::{AppConfig, CliOverrides};
use calc_transport_grpc::ReadySignal;
use calculator::CalculatorModule;
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;

use std::path::PathBuf;

/// Calculator Server - stateless arithmetic over gRPC
#[derive(Parser)]
#[command(name = "calculator-server")]
#[command(about = "Calculator Server - stateless arithmetic over gRPC")]
#[command(version)]
struct Cli {
    /// Path to configuration file (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address override, `host:port` or `uds:///path` (overrides config)
    #[arg(short, long)]
    listen: Option<String>,

    /// Print effective configuration (JSON) and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Validate configuration and exit
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Layered config:
    // 1) defaults -> 2) YAML (if provided) -> 3) env (CALC__*) -> 4) CLI overrides
    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_cli_overrides(&CliOverrides {
        listen: cli.listen.clone(),
        verbose: cli.verbose,
    });

    if cli.print_config {
        println!("{}", config.to_pretty_json()?);
        return Ok(());
    }

    calc_bootstrap::init_logging(&config.logging)?;

    // Dispatch subcommands (default: run)
    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(&config).await,
        Commands::Check => check_config(&config),
    }
}

fn check_config(config: &AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");
    let listen = config.listen_config()?;
    println!("Configuration is valid (listen: {listen})");
    println!("{}", config.to_pretty_json()?);
    Ok(())
}

async fn run_server(config: &AppConfig) -> Result<()> {
    let listen = config.listen_config()?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Calculator Server starting");

    let cancel = CancellationToken::new();
    let cancel_for_signals = cancel.clone();
    tokio::spawn(async move {
        match calc_bootstrap::wait_for_shutdown().await {
            Ok(signal) => tracing::info!(signal, "stopping calculator server"),
            Err(e) => {
                tracing::error!(error = %e, "cannot listen for termination signals");
                return;
            }
        }
        cancel_for_signals.cancel();
    });

    let module = CalculatorModule::new();
    let result = module.serve(listen, cancel, ReadySignal::noop()).await;

    match &result {
        Ok(()) => tracing::info!("Calculator Server stopped"),
        Err(e) => tracing::error!(error = %format!("{e:#}"), "Calculator Server failed"),
    }
    result
}
