//! Allowance coach HTTP server
//!
//! Main entry point for the HTTP API server.

use std::{future::IntoFuture, sync::Arc, time::Duration};

use anyhow::Context;
use application::ports::{InferencePort, SpeechPort};
use infrastructure::{AppConfig, ElevenLabsSpeechAdapter, GeminiInferenceAdapter, init_tracing};
use presentation_http::{AppState, create_app};
use tokio::{net::TcpListener, signal, sync::Notify};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // The log format lives in the config, so load it before tracing and
    // report a load failure only once a subscriber exists.
    let loaded = AppConfig::load();
    let log_format = loaded
        .as_ref()
        .map_or("text", |config| config.server.log_format.as_str());
    init_tracing(log_format)?;

    let config = loaded.context("Failed to load configuration")?;
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = %config.environment,
        "Allowance coach relay starting"
    );

    let speech = ElevenLabsSpeechAdapter::new(config.speech.clone())
        .context("Failed to initialize speech provider")?;
    if !speech.is_configured() {
        warn!("ELEVENLABS_API_KEY is not set; /api/tts will fail until it is configured");
    }

    let inference = GeminiInferenceAdapter::new(config.inference.clone())
        .context("Failed to initialize inference provider")?;
    if inference.is_configured() {
        info!(model = %inference.current_model(), "Gemini tip generation enabled");
    } else {
        warn!("GEMINI_API_KEY is not set; /api/generate-tip will serve fallback tips");
    }

    let addr = config.server.bind_addr();
    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_secs.unwrap_or(30));

    let speech: Arc<dyn SpeechPort> = Arc::new(speech);
    let inference: Arc<dyn InferencePort> = Arc::new(inference);
    let app = create_app(AppState::new(speech, inference, config));

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server listening on http://{}", addr);

    let shutdown_started = Arc::new(Notify::new());
    let server = axum::serve(listener, app).with_graceful_shutdown({
        let shutdown_started = Arc::clone(&shutdown_started);
        async move {
            shutdown_signal().await;
            shutdown_started.notify_one();
        }
    });

    tokio::select! {
        result = server.into_future() => result?,
        () = async {
            shutdown_started.notified().await;
            info!("Waiting up to {:?} for connections to close...", shutdown_timeout);
            tokio::time::sleep(shutdown_timeout).await;
        } => {
            warn!("Shutdown timeout elapsed, dropping remaining connections");
        }
    }

    info!("Server shutdown complete");

    Ok(())
}

/// Wait for shutdown signals (SIGINT, SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, initiating graceful shutdown..."),
        () = terminate => info!("Received SIGTERM, initiating graceful shutdown..."),
    }
}
