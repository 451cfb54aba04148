// SPDX-FileCopyrightText: 2026 Attache Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `attache serve` command implementation.
//!
//! Wires the configured pieces together: the LINE webhook channel, the local
//! filesystem sink, the optional Google Drive remote store, and the upload
//! orchestrator, then serves the webhook until interrupted.

use std::sync::Arc;
use std::time::Duration;

use attache_archive::{ArchiveBrowser, ConversationSettings, RemoteSink, UploadOrchestrator};
use attache_config::AttacheConfig;
use attache_core::{AttacheError, RemoteStore};
use attache_drive::DriveClient;
use attache_line::{LineClient, WebhookState, build_router};
use tracing::{info, warn};

/// Runs the `attache serve` command.
pub async fn run_serve(config: AttacheConfig) -> Result<(), AttacheError> {
    init_tracing(&config.agent.log_level);

    info!(name = %config.agent.name, "starting attache serve");

    // The webhook channel cannot run without both LINE credentials; the
    // config validator enforces they are set together.
    let (channel_secret, access_token) = match (&config.line.channel_secret, &config.line.access_token) {
        (Some(secret), Some(token)) => (secret.clone(), token.clone()),
        _ => {
            return Err(AttacheError::Config(
                "line.channel_secret and line.access_token must be set to serve".into(),
            ));
        }
    };
    let client = Arc::new(LineClient::new(&access_token)?);

    // Cloud routing is optional: without a Drive token the orchestrator runs
    // local-only and per-conversation cloud toggles report the gap.
    let remote: Option<Arc<dyn RemoteStore>> = match &config.drive.access_token {
        Some(token) => {
            info!("google drive remote store configured");
            Some(Arc::new(DriveClient::new(token)?))
        }
        None => {
            warn!("no drive access token configured, cloud routing is unavailable");
            None
        }
    };

    let settings = Arc::new(ConversationSettings::new(
        config.drive.default_folder_id.clone(),
    ));
    let orchestrator = Arc::new(
        UploadOrchestrator::new(
            client.clone(),
            remote,
            settings.clone(),
            &config.storage.data_dir,
        )
        .with_remote_sink(RemoteSink::new(
            config.upload.max_attempts,
            Duration::from_secs(config.upload.retry_delay_secs),
        )),
    );

    let state = WebhookState {
        orchestrator,
        settings,
        browser: Arc::new(ArchiveBrowser::new(&config.storage.data_dir)),
        client,
        channel_secret,
    };
    let app = build_router(&config.server.webhook_path, state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AttacheError::Channel {
            message: format!("failed to bind webhook server to {addr}: {e}"),
            source: Some(Box::new(e)),
        })?;

    info!(addr, path = %config.server.webhook_path, "webhook server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AttacheError::Channel {
            message: format!("webhook server error: {e}"),
            source: Some(Box::new(e)),
        })?;

    info!("attache serve stopped");
    Ok(())
}

/// Initializes the global tracing subscriber from the configured level.
/// `RUST_LOG` still wins when set.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("attache={log_level},info")));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}

/// Completes on SIGINT (and SIGTERM on unix), triggering graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to install ctrl-c handler");
        }
    };

    #[cfg(unix)]
    {
        let terminate = async {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut signal) => {
                    signal.recv().await;
                }
                Err(e) => warn!(error = %e, "failed to install SIGTERM handler"),
            }
        };
        tokio::select! {
            _ = ctrl_c => {},
            _ = terminate => {},
        }
    }

    #[cfg(not(unix))]
    ctrl_c.await;

    info!("shutdown signal received");
}
