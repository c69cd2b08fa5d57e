use eventsource_stream::Eventsource;
use futures_util::StreamExt;
use octopibox_shared::api::{self, PluginMessage};
use tokio::sync::mpsc;

/// Spawn a background listener on the host's push bus, forwarding every
/// decodable message envelope to the dispatcher. Reconnects with capped
/// backoff; envelopes that fail to decode are skipped (other plugins share
/// the bus and their payloads are not ours to interpret).
pub(crate) fn spawn_push_listener(server_base: &str, tx: mpsc::Sender<PluginMessage>) {
    let base = crate::config::normalize_server_url(server_base);
    if base.is_empty() {
        tracing::warn!("push: server_base empty; skipping listener");
        return;
    }
    let url = api::endpoints::push_stream(&base);

    tokio::spawn(async move {
        let client = reqwest::Client::new();
        let mut backoff_secs = 1u64;
        loop {
            match client.get(&url).send().await {
                Ok(res) if res.status().is_success() => {
                    tracing::info!("push: connected");
                    backoff_secs = 1;
                    let mut events = res.bytes_stream().eventsource();
                    while let Some(ev) = events.next().await {
                        match ev {
                            Ok(ev) => {
                                if ev.data.is_empty() {
                                    continue;
                                }
                                match serde_json::from_str::<PluginMessage>(&ev.data) {
                                    Ok(msg) => {
                                        if tx.send(msg).await.is_err() {
                                            tracing::info!(
                                                "push: dispatcher gone; stopping listener"
                                            );
                                            return;
                                        }
                                    }
                                    Err(e) => {
                                        tracing::debug!(error=%e, "push: undecodable envelope; skipping")
                                    }
                                }
                            }
                            Err(e) => {
                                tracing::warn!(error=%e, "push read error");
                                break;
                            }
                        }
                    }
                }
                Ok(res) => {
                    tracing::warn!(status=%res.status(), "push: connect rejected");
                }
                Err(e) => {
                    tracing::warn!(error=%e, "push: connect failed");
                }
            }
            tokio::time::sleep(std::time::Duration::from_secs(backoff_secs)).await;
            backoff_secs = std::cmp::min(backoff_secs * 2, 30);
        }
    });
}
