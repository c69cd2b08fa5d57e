use serde::{Deserialize, Serialize};

pub mod endpoints;
#[cfg(feature = "rest-client")]
pub mod rest;

/// Identifier under which the OctoPiBox plugin multiplexes its messages on
/// the host's shared push bus.
pub const PLUGIN_ID: &str = "octopibox";

pub(crate) const API_PREFIX: &str = "/api";

/// Envelope delivered for every event on the push bus, regardless of origin
/// plugin. `data` stays untyped here; consumers filter by `plugin_id` before
/// attempting to decode it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginMessage {
    #[serde(rename = "pluginId")]
    pub plugin_id: String,
    pub data: serde_json::Value,
}

/// Message shapes the OctoPiBox view models recognize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PluginEvent {
    #[serde(rename = "updatePowerStatus")]
    UpdatePowerStatus { power_status_value: String },
    /// Power-off countdown tick, in seconds. `<= 0` means cancel/expire.
    #[serde(rename = "timeout")]
    Timeout { timeout_value: i32 },
    #[serde(rename = "close_popup")]
    ClosePopup,
    /// Message types added by newer plugin versions; ignored.
    #[serde(other)]
    Unknown,
}

/// Commands accepted by the plugin's command endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "lowercase")]
pub enum PluginCommand {
    Abort,
}
