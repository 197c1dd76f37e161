//! Telegram deploy bot: users send an HTML file and get back a public
//! URL, served by a static-hosting platform.
//!
//! ```text
//! getUpdates long poll -> dispatch (state machine) -> Vercel deployments API
//! ```
//!
//! A small axum server answers the host platform's liveness probes on the
//! side.

mod config;
mod dispatch;
mod health;
mod keyboards;
mod telegram_api;
mod telemetry;
mod texts;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use sitebot_deploy::HttpVercelApi;
use sitebot_session::shared_memory_store;
use tokio::net::TcpListener;
use tokio::time::sleep;

use crate::config::Config;
use crate::dispatch::Bot;
use crate::telegram_api::{HttpTelegramApi, TelegramApi};

const POLL_TIMEOUT_SECS: u64 = 30;
const POLL_ERROR_BACKOFF: Duration = Duration::from_secs(3);

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init("sitebot");
    let config = Config::from_env()?;

    let http = reqwest::Client::new();
    let telegram = Arc::new(HttpTelegramApi::new(
        http.clone(),
        &config.bot_token,
        &config.telegram_api_base,
    ));
    let deploy = Arc::new(HttpVercelApi::new(
        http,
        &config.vercel_token,
        &config.vercel_api_base,
        config.deploy_timeout,
    ));
    let bot = Bot::new(telegram.clone(), deploy, shared_memory_store());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind liveness endpoint on {addr}"))?;
    tracing::info!("liveness endpoint listening on {addr}");
    tokio::spawn(async move {
        if let Err(err) = axum::serve(listener, health::router()).await {
            tracing::error!(error = %err, "liveness endpoint stopped");
        }
    });

    tracing::info!("sitebot started, polling for updates");
    tokio::select! {
        _ = poll_updates(telegram, bot) => {}
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutdown signal received");
        }
    }
    Ok(())
}

/// Fetches and handles updates one at a time. A user's events are never
/// processed concurrently, so sessions need no locking beyond the store's
/// per-entry atomicity. Polling errors back off and the loop keeps going.
async fn poll_updates(telegram: Arc<HttpTelegramApi>, bot: Bot) {
    let mut offset = 0i64;
    loop {
        match telegram.get_updates(offset, POLL_TIMEOUT_SECS).await {
            Ok(updates) => {
                for update in updates {
                    offset = offset.max(update.update_id + 1);
                    if let Err(err) = bot.handle_update(update).await {
                        tracing::error!(error = %err, "update handling failed");
                    }
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "getUpdates failed, backing off");
                sleep(POLL_ERROR_BACKOFF).await;
            }
        }
    }
}
