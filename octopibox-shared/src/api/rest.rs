//! Minimal REST client helpers for consumers (clients).

use super::endpoints as ep;
use super::*;
use once_cell::sync::Lazy;
use std::time::Duration;

pub use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum RestError {
    #[error("http: {0}")]
    Http(String),
    #[error("status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("serde: {0}")]
    Serde(String),
}

static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(|| {
    reqwest::Client::builder()
        // Keep TCP connections alive at kernel level
        .tcp_keepalive(Some(Duration::from_secs(180)))
        // Enable and tune the connection pool
        .pool_max_idle_per_host(4)
        .pool_idle_timeout(Duration::from_secs(180))
        // Bound request duration
        .timeout(Duration::from_secs(30))
        .build()
        .expect("failed to build HTTP client")
});

fn mk_client() -> Result<reqwest::Client, RestError> {
    Ok(HTTP_CLIENT.clone())
}

/// Issue a command to the plugin's command endpoint. No response body is
/// interpreted; the host reflects any resulting state change back over the
/// push bus.
pub async fn plugin_command(
    base: &str,
    plugin_id: &str,
    command: &PluginCommand,
) -> Result<(), RestError> {
    let client = mk_client()?;
    let url = ep::plugin_command(base, plugin_id);
    let body = serde_json::to_vec(command).map_err(|e| RestError::Serde(e.to_string()))?;
    let res = client
        .post(url)
        // The host expects the charset spelled out, so the content type is
        // set by hand instead of via `.json()`.
        .header(
            reqwest::header::CONTENT_TYPE,
            "application/json; charset=UTF-8",
        )
        .body(body)
        .send()
        .await
        .map_err(|e| RestError::Http(e.to_string()))?;
    if res.status().is_success() {
        Ok(())
    } else {
        let status = res.status().as_u16();
        let body = res.text().await.unwrap_or_default();
        Err(RestError::Status { status, body })
    }
}
