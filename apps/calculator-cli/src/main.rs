mod demo;
mod interactive;
#[cfg(test)]
mod testing;

use anyhow::{Context, Result};
use calc_bootstrap::{LoggingConfig, verbosity_level};
use calc_transport_grpc::client::normalize_uri;
use calculator_sdk::{CalculatorClientV1, CalculatorGrpcClient, Operation};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncWriteExt, BufReader};

/// Calculator CLI - call the calculator gRPC service
#[derive(Parser)]
#[command(name = "calculator-cli")]
#[command(about = "Calculator CLI - call the calculator gRPC service")]
#[command(version)]
struct Cli {
    /// Server address (`host:port` or full URI)
    #[arg(short, long, env = "GRPC_SERVER", default_value = "localhost:50051")]
    server: String,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the built-in sample calculations (default)
    Demo,
    /// Perform a single calculation
    #[command(allow_negative_numbers = true)]
    Calc {
        /// add, subtract, multiply or divide
        op: Operation,
        a: f64,
        b: f64,
    },
    /// Prompt for calculations on stdin
    Interactive,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    calc_bootstrap::init_logging(&LoggingConfig {
        level: verbosity_level(cli.verbose).unwrap_or("warn").to_owned(),
        ..LoggingConfig::default()
    })?;

    let server = normalize_uri(&cli.server);
    let client = CalculatorGrpcClient::connect(server.clone())
        .await
        .with_context(|| format!("could not reach calculator service at {server}"))?;

    let mut stdout = tokio::io::stdout();
    match cli.command.unwrap_or(Commands::Demo) {
        Commands::Demo => {
            let failures = demo::run_demo(&client, &server, &mut stdout).await?;
            if failures > 0 {
                anyhow::bail!("{failures} demo call(s) failed");
            }
        }
        Commands::Calc { op, a, b } => {
            let calc = client.calculate(op, a, b).await?;
            let line = format!("{} = {}\n{}\n", calc.operation, calc.result, calc.message);
            stdout.write_all(line.as_bytes()).await?;
            stdout.flush().await?;
        }
        Commands::Interactive => {
            let stdin = BufReader::new(tokio::io::stdin());
            interactive::run_interactive(&client, stdin, &mut stdout).await?;
        }
    }
    Ok(())
}
