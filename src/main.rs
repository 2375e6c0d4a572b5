//! logsynth - Security Log Scenario Synthesizer
//!
//! Usage:
//!   logsynth run --config config.yaml
//!   logsynth run --config config.yaml --output file --count 500
//!   logsynth list
//!   logsynth serve --config config.yaml --port 8080

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::EnvFilter;

use logsynth::config::{self, OutputType, Overrides};
use logsynth::{engine, outputs, server};

#[derive(Parser)]
#[command(name = "logsynth")]
#[command(about = "Synthesize security log events for configurable scenarios")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the configured scenarios and print a summary
    Run {
        /// Path to the YAML configuration file
        #[arg(short, long, default_value = "config.yaml")]
        config: PathBuf,

        /// Override the configured output type
        #[arg(short, long)]
        output: Option<OutputType>,

        /// Override the default per-scenario event count
        #[arg(long)]
        count: Option<u64>,
    },

    /// List available log types
    List,

    /// Serve the demo PIN-guess front door
    Serve {
        /// Path to the YAML configuration file
        #[arg(short, long, default_value = "config.yaml")]
        config: PathBuf,

        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            config,
            output,
            count,
        } => run(config, Overrides { output, count }).await,
        Commands::List => {
            list();
            ExitCode::SUCCESS
        }
        Commands::Serve { config, port, host } => serve(config, host, port).await,
    }
}

async fn run(config_path: PathBuf, overrides: Overrides) -> ExitCode {
    let result = async {
        let cfg = config::load_config(&config_path, overrides)?;
        let mut sink = outputs::create_sink(&cfg)?;
        engine::run(&cfg, sink.as_mut()).await
    }
    .await;

    match result {
        Ok(summary) => {
            match serde_json::to_string_pretty(&summary) {
                Ok(rendered) => println!("{rendered}"),
                Err(e) => error!(error = %e, "failed to render summary"),
            }
            if summary.all_succeeded() {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            }
        }
        Err(e) => {
            error!(error = %e, "run failed");
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

fn list() {
    println!("Available log types:\n");
    for (name, description) in logsynth::list_log_types() {
        println!("  {name:22} {description}");
    }
    println!("\nUsage: logsynth run --config <CONFIG>");
}

async fn serve(config_path: PathBuf, host: String, port: u16) -> ExitCode {
    let result = async {
        let cfg = config::load_config(&config_path, Overrides::default())?;
        let sink = outputs::create_sink(&cfg)?;
        let state = Arc::new(server::ServerState::new(server::secret_pin_from_env(), sink));
        server::serve(state, &host, port).await
    }
    .await;

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "server failed");
            ExitCode::from(e.exit_code() as u8)
        }
    }
}
