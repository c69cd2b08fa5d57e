//! Host-facing view-model interface and the components implementing it.

pub mod power_off;
pub mod power_status;

pub use power_off::PowerOffCountdown;
pub use power_status::PowerStatusDisplay;

use async_trait::async_trait;
use octopibox_shared::api::PluginMessage;

use crate::ui::Page;

/// The interface the host drives: one startup hook after the page has been
/// constructed, one hook per push message on the bus.
#[async_trait]
pub trait ViewModel: Send {
    /// Runs once, after the host's page has been constructed.
    fn on_startup(&mut self, _page: &mut Page) {}

    /// Invoked for every push message on the bus, regardless of origin
    /// plugin. Implementations filter by plugin id.
    async fn on_plugin_message(&mut self, plugin_id: &str, data: &serde_json::Value);
}

/// Deliver one envelope to every registered view model.
pub async fn dispatch(models: &mut [&mut dyn ViewModel], message: &PluginMessage) {
    for vm in models.iter_mut() {
        vm.on_plugin_message(&message.plugin_id, &message.data).await;
    }
}
