//! Churn prediction endpoint.
//!
//! Serves churn probabilities from a pre-trained logistic regression model.
//!
//! # Architecture Overview
//!
//! ```text
//!   HTTP request ──▶ http::server ──┐
//!                                   ├──▶ InvocationEvent ──▶ inference::Endpoint
//!   event JSON ───▶ `invoke` ───────┘                              │
//!                                                                  ▼
//!                                                       routing::route(path, method)
//!                                                       │           │           │
//!                                                    /health    /predict    not found
//!                                                                  │
//!                                              validate ──▶ model ──▶ request log
//!                                                                  │
//!                                                                  ▼
//!                                                         ResponseEnvelope
//! ```
//!
//! # Usage
//!
//! ```text
//! churn-endpoint [--config FILE] [--model FILE] serve [--bind ADDR]
//! churn-endpoint [--config FILE] [--model FILE] invoke [--event FILE]
//! ```

use std::io::Read;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use uuid::Uuid;

use churn_endpoint::config::EndpointConfig;
use churn_endpoint::http::HttpServer;
use churn_endpoint::inference::InvocationEvent;
use churn_endpoint::lifecycle::{signals, startup, Shutdown, StartupError};
use churn_endpoint::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "churn-endpoint", version)]
#[command(about = "Churn probability inference endpoint", long_about = None)]
struct Cli {
    /// Configuration file (TOML). Defaults apply when omitted.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Model artifact path, overriding the config file.
    #[arg(short, long, global = true)]
    model: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve {
        /// Bind address, overriding the config file.
        #[arg(short, long)]
        bind: Option<String>,
    },
    /// Process one invocation event and print the response envelope
    Invoke {
        /// Event file; reads stdin when omitted.
        #[arg(short, long)]
        event: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = startup::resolve_config(cli.config.as_deref())?;
    if let Some(model) = cli.model {
        config.model.path = model;
    }

    logging::init_tracing(config.observability.log_format);
    tracing::info!("churn-endpoint v{} starting", env!("CARGO_PKG_VERSION"));

    match cli.command.unwrap_or(Command::Serve { bind: None }) {
        Command::Serve { bind } => {
            if let Some(bind) = bind {
                config.listener.bind_address = bind;
            }
            serve(config).await?;
        }
        Command::Invoke { event } => invoke(&config, event)?,
    }

    Ok(())
}

async fn serve(config: EndpointConfig) -> Result<(), StartupError> {
    tracing::info!(
        bind_address = %config.listener.bind_address,
        model_path = %config.model.path,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let endpoint = startup::build_endpoint(&config)?;

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    signals::spawn_signal_listener(shutdown);

    HttpServer::new(config, endpoint)
        .run(listener, server_shutdown)
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

fn invoke(config: &EndpointConfig, event_path: Option<PathBuf>) -> Result<(), StartupError> {
    let raw = match event_path {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    let event: InvocationEvent = serde_json::from_str(&raw)?;

    let endpoint = startup::build_endpoint(config)?;
    let request_id = event
        .runtime_request_id()
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let response = endpoint.handle(&event, &request_id);
    println!("{}", serde_json::to_string(&response)?);
    Ok(())
}
