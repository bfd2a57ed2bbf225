use anyhow::Result;
use calc_bootstrap::{AppConfig, CliArgs};
use calculator::CalculatorModule;
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use tokio_util::sync::CancellationToken;

use std::path::PathBuf;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Calc Server - line-oriented integer calculator over TCP
#[derive(Parser)]
#[command(name = "calc-server")]
#[command(about = "Calc Server - line-oriented integer calculator over TCP")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port override for the TCP listener (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print effective configuration (YAML) and exit
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

    // 1) defaults -> 2) YAML (if provided, must exist) -> 3) env (CALC__*) -> 4) CLI overrides
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&CliArgs { verbose: cli.verbose });

    let _log_guard = calc_bootstrap::init_logging(&config.logging)?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Calc Server starting");

    if cli.print_config {
        println!("Effective configuration:\n{}", config.to_yaml()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(&config, cli.port).await,
        Commands::Check => check_config(&config, cli.port),
    }
}

fn load_module(config: &AppConfig, port: Option<u16>) -> Result<CalculatorModule> {
    let mut module = CalculatorModule::init(config)?;
    if let Some(port) = port {
        module.set_port(port);
    }
    Ok(module)
}

fn check_config(config: &AppConfig, port: Option<u16>) -> Result<()> {
    tracing::info!("Checking configuration...");
    let module = load_module(config, port)?;
    println!("Configuration is valid");
    println!("listen address: {}", module.config().listen_addr);
    println!("{}", config.to_yaml()?);
    Ok(())
}

async fn run_server(config: &AppConfig, port: Option<u16>) -> Result<()> {
    let module = load_module(config, port)?;
    let server = module.bind().await?;

    let cancel = CancellationToken::new();
    let signals = tokio::spawn(calc_bootstrap::cancel_on_shutdown(cancel.clone()));

    server.serve(cancel.clone()).await;

    // stop the signal waiter when the server ended on a `shutdown` command
    cancel.cancel();
    if let Err(e) = signals.await {
        tracing::warn!(error = %e, "signal task failed");
    }

    tracing::info!("Calc Server stopped");
    Ok(())
}
