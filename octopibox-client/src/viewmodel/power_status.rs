use async_trait::async_trait;
use octopibox_shared::api::{self, PluginEvent};
use tokio::sync::watch;
use tracing::debug;

use super::ViewModel;
use crate::ui::Page;

pub const POWER_STATUS_LABEL: &str = "Printer Power";
pub const POWER_STATUS_PLACEHOLDER: &str = "-";

/// Mirrors the device's power state as an observable string. The value is
/// whatever the host last pushed, verbatim; the rendering layer re-displays
/// it reactively through the watch channel.
pub struct PowerStatusDisplay {
    status: watch::Sender<String>,
}

impl PowerStatusDisplay {
    pub fn new() -> Self {
        let (status, _) = watch::channel(POWER_STATUS_PLACEHOLDER.to_string());
        Self { status }
    }

    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.status.subscribe()
    }
}

impl Default for PowerStatusDisplay {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ViewModel for PowerStatusDisplay {
    fn on_startup(&mut self, page: &mut Page) {
        match page.state_panel_mut() {
            Some(panel) => panel.insert_before_progress(POWER_STATUS_LABEL, self.subscribe()),
            // Not an error: this page simply has no printer-state panel, so
            // the display never renders.
            None => debug!("printer-state panel not present; power status stays hidden"),
        }
    }

    async fn on_plugin_message(&mut self, plugin_id: &str, data: &serde_json::Value) {
        if plugin_id != api::PLUGIN_ID {
            return;
        }
        match serde_json::from_value::<PluginEvent>(data.clone()) {
            Ok(PluginEvent::UpdatePowerStatus { power_status_value }) => {
                self.status.send_replace(power_status_value);
            }
            Ok(_) => {}
            Err(e) => debug!(error=%e, "undecodable plugin message; ignoring"),
        }
    }
}
