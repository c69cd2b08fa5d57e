use octopibox_shared::api::{self, PluginCommand};
use tracing::debug;

/// Outbound command channel to the host. Send, do not await, do not retry:
/// the host re-asserts the true device state over the push bus, so callers
/// never observe the outcome of a send.
pub trait CommandSink: Send {
    fn send_abort(&self);
}

/// Sink that POSTs commands to the plugin's REST endpoint from a background
/// task.
pub struct RestCommandSink {
    base: String,
}

impl RestCommandSink {
    pub fn new(server_url: &str) -> Self {
        Self {
            base: crate::config::normalize_server_url(server_url),
        }
    }
}

impl CommandSink for RestCommandSink {
    fn send_abort(&self) {
        let base = self.base.clone();
        tokio::spawn(async move {
            if let Err(e) = api::rest::plugin_command(&base, api::PLUGIN_ID, &PluginCommand::Abort).await
            {
                debug!(error=%e, "abort command failed; host will re-assert state over the push bus");
            }
        });
    }
}
