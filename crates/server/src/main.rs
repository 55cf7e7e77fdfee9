//! Iris Server - random forest predictions over HTTP
//!
//! Loads the persisted iris model (or trains a fallback one) once at startup
//! and serves `POST /predict` alongside a small static frontend.

use anyhow::Result;
use clap::Parser;
use iris_lib::{
    health::{components, HealthRegistry},
    observability::{ServiceMetrics, StructuredLogger},
    predictor::{provide, train_fallback, FallbackParams},
    Classifier,
};
use iris_server::{api, config::ServiceConfig};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Iris random forest prediction server
#[derive(Parser)]
#[command(name = "iris-server")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Train the fallback model, write it to the artifact path and exit
    #[arg(long)]
    export_artifact: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    let config = ServiceConfig::load()?;
    info!(instance = %config.instance_name, artifact = %config.artifact_path.display(), "Service configured");

    if cli.export_artifact {
        let fallback = train_fallback(&FallbackParams::default())?;
        fallback.model.save(&config.artifact_path)?;
        return Ok(());
    }

    let health_registry = HealthRegistry::new();
    health_registry.register(components::MODEL).await;
    health_registry.register(components::HTTP).await;

    let metrics = ServiceMetrics::new();
    let logger = StructuredLogger::new(&config.instance_name);

    let provided = provide(&config.artifact_path)?;
    logger.log_model_ready(&provided.source, provided.model.n_trees());
    metrics.set_model_info(provided.source.label(), provided.model.n_trees());
    if provided.source.is_fallback() {
        health_registry
            .set_degraded(components::MODEL, "Serving fallback model, artifact unavailable")
            .await;
    }

    let model: Arc<dyn Classifier> = Arc::new(provided.model);
    info!(features = model.n_features(), "Model ready");

    let app_state = Arc::new(api::AppState::new(
        model,
        health_registry.clone(),
        metrics,
        logger.clone(),
        config.static_dir.clone(),
    ));

    health_registry.set_ready(true).await;

    let addr = config.listen_addr();
    logger.log_startup(SERVICE_VERSION, &addr);

    let shutdown_logger = logger.clone();
    api::serve(&addr, app_state, async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            shutdown_logger.log_shutdown("SIGINT received");
        }
    })
    .await?;

    info!("Shutting down");
    Ok(())
}
