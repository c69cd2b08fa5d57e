use async_trait::async_trait;
use octopibox_shared::api::{self, PluginEvent};
use tracing::{debug, info};

use super::ViewModel;
use crate::commands::CommandSink;
use crate::notify::{PopupBackend, PopupHandle, PopupOptions};

pub const POPUP_TITLE: &str = "Automatic Printer Power-off";
pub const TIMEOUT_POPUP_TEXT: &str = "Powering off in ";
pub const ABORT_LABEL: &str = "Abort Automatic Power-off";

/// Lifecycle of the countdown popup. At most one popup exists per client;
/// `Active` owns the on-screen identity so an update can never mint a
/// duplicate.
enum CountdownPopup {
    Absent,
    Active { remaining: i32, handle: PopupHandle },
}

/// Surfaces the host's power-off countdown as an interruptible popup and lets
/// the user abort the power-off. Popup state is authoritative only until the
/// next inbound message; the abort command itself is advisory.
pub struct PowerOffCountdown {
    popup: CountdownPopup,
    opts: PopupOptions,
    backend: Box<dyn PopupBackend + Send>,
    commands: Box<dyn CommandSink>,
}

impl PowerOffCountdown {
    pub fn new(backend: Box<dyn PopupBackend + Send>, commands: Box<dyn CommandSink>) -> Self {
        Self {
            popup: CountdownPopup::Absent,
            opts: PopupOptions {
                title: POPUP_TITLE.to_string(),
                text: String::new(),
                abort_label: ABORT_LABEL.to_string(),
            },
            backend,
            commands,
        }
    }

    /// Seconds left on the active countdown, if one is in progress.
    pub fn remaining(&self) -> Option<i32> {
        match &self.popup {
            CountdownPopup::Absent => None,
            CountdownPopup::Active { remaining, .. } => Some(*remaining),
        }
    }

    async fn handle_timeout(&mut self, seconds: i32) {
        if seconds <= 0 {
            self.dismiss().await;
            return;
        }
        self.opts.text = format!("{TIMEOUT_POPUP_TEXT}{seconds}");
        match &mut self.popup {
            CountdownPopup::Active { remaining, handle } => {
                self.backend.update(handle, &self.opts).await;
                *remaining = seconds;
            }
            CountdownPopup::Absent => {
                let handle = self.backend.show(&self.opts).await;
                self.popup = CountdownPopup::Active {
                    remaining: seconds,
                    handle,
                };
            }
        }
    }

    async fn dismiss(&mut self) {
        match std::mem::replace(&mut self.popup, CountdownPopup::Absent) {
            CountdownPopup::Active { handle, .. } => self.backend.close(handle).await,
            // Nothing on screen to remove.
            CountdownPopup::Absent => {}
        }
    }

    /// User-initiated abort: remove the popup and ask the host to stop the
    /// power-off. Fire-and-forget; the next inbound message reconciles state.
    pub async fn abort_printer_off(&mut self) {
        match std::mem::replace(&mut self.popup, CountdownPopup::Absent) {
            CountdownPopup::Active { handle, .. } => {
                self.backend.close(handle).await;
                info!("aborting automatic power-off");
                self.commands.send_abort();
            }
            CountdownPopup::Absent => {
                debug!("abort requested with no active countdown; ignoring");
            }
        }
    }
}

#[async_trait]
impl ViewModel for PowerOffCountdown {
    async fn on_plugin_message(&mut self, plugin_id: &str, data: &serde_json::Value) {
        if plugin_id != api::PLUGIN_ID {
            return;
        }
        match serde_json::from_value::<PluginEvent>(data.clone()) {
            Ok(PluginEvent::Timeout { timeout_value }) => self.handle_timeout(timeout_value).await,
            Ok(PluginEvent::ClosePopup) => self.dismiss().await,
            Ok(_) => {}
            Err(e) => debug!(error=%e, "undecodable plugin message; ignoring"),
        }
    }
}
