//! Startup orchestration.
//!
//! # Responsibilities
//! - Load and validate configuration
//! - Load the model artifact (cold start)
//! - Assemble the endpoint with its log sink
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - The model is loaded exactly once per process

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;

use crate::config::{load_config, ConfigError, EndpointConfig};
use crate::inference::Endpoint;
use crate::model::{LogisticModel, ModelError, SharedModel};
use crate::observability::{LogSink, NullSink, StdoutSink};

/// Fatal errors raised before the endpoint can serve.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("model '{path}' could not be loaded: {source}")]
    Model {
        path: String,
        #[source]
        source: ModelError,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid invocation event: {0}")]
    Event(#[from] serde_json::Error),

    #[error("metrics exporter failed: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),
}

/// Load the config file, or defaults when no path is given.
pub fn resolve_config(path: Option<&Path>) -> Result<EndpointConfig, StartupError> {
    match path {
        Some(path) => Ok(load_config(path)?),
        None => Ok(EndpointConfig::default()),
    }
}

/// Load the model artifact named by the config.
pub fn load_model(config: &EndpointConfig) -> Result<SharedModel, StartupError> {
    let started = Instant::now();
    let path = &config.model.path;
    let model = LogisticModel::load(Path::new(path)).map_err(|source| StartupError::Model {
        path: path.clone(),
        source,
    })?;

    tracing::info!(
        path = %path,
        load_ms = started.elapsed().as_secs_f64() * 1000.0,
        "Model artifact loaded"
    );
    Ok(Arc::new(model))
}

/// Build the endpoint for `config`, loading its model.
pub fn build_endpoint(config: &EndpointConfig) -> Result<Endpoint, StartupError> {
    let model = load_model(config)?;
    let sink: Arc<dyn LogSink> = if config.observability.request_log {
        Arc::new(StdoutSink)
    } else {
        Arc::new(NullSink)
    };
    Ok(Endpoint::new(model, sink))
}
