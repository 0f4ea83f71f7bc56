use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ppt2pdf_core::{
    load_config_or_default, validate_config, ConversionEngine, ConversionService,
    ConverterBackend, LibreOfficeConverter, ServiceConfig,
};
use ppt2pdf_server::{api::create_router, state::AppState};

/// Environment variable naming the config file.
const CONFIG_ENV: &str = "PPT2PDF_CONFIG";

/// Config file picked up from the working directory when present.
const DEFAULT_CONFIG_FILE: &str = "config.toml";

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // An explicit path must exist; the default file is optional
    let config_path = match std::env::var(CONFIG_ENV) {
        Ok(path) => Some(PathBuf::from(path)),
        Err(_) => Some(PathBuf::from(DEFAULT_CONFIG_FILE)).filter(|p| p.is_file()),
    };

    match &config_path {
        Some(path) => info!("Loading configuration from {:?}", path),
        None => info!("No config file, using defaults and environment"),
    }
    let config = load_config_or_default(config_path.as_deref())
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!("Workspace root: {:?}", config.workspace.temp_root);
    info!("Failure policy: {:?}", config.batch.failure_policy);

    let engine: Arc<dyn ConversionEngine> = match config.converter.backend {
        ConverterBackend::LibreOffice => {
            info!("Using LibreOffice at {:?}", config.converter.soffice_path);
            Arc::new(LibreOfficeConverter::new(config.converter.clone()))
        }
    };

    let service = Arc::new(ConversionService::new(engine, ServiceConfig::from(&config)));

    // Probe the engine in the background; a missing engine only fails uploads
    {
        let service = Arc::clone(&service);
        tokio::spawn(async move {
            match service.check_capability().await {
                Ok(()) => info!("Conversion engine '{}' is available", service.engine().name()),
                Err(e) => warn!("{}; uploads will be rejected until it is installed", e),
            }
        });
    }

    // Create app state
    let state = Arc::new(AppState::new(config.clone(), Arc::clone(&service)));

    // Create router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutting down, reclaiming pending workspaces...");
    service.shutdown().await;
    info!("Workspaces reclaimed");

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
