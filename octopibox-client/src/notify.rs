use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Action identifier attached to a popup's abort button.
pub const ACTION_ABORT: &str = "abort";

const APP_NAME: &str = "OctoPiBox";

/// User-interaction events raised by the popup backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEvent {
    AbortClicked,
}

/// Presentation of one popup, owned by the component that shows it and
/// passed explicitly on every call. The abort button is the only affordance;
/// the popup never auto-hides and leaves no history entry.
#[derive(Debug, Clone)]
pub struct PopupOptions {
    pub title: String,
    pub text: String,
    pub abort_label: String,
}

/// Identity of an on-screen popup. Stable across in-place updates; a new
/// handle is only ever minted by [`PopupBackend::show`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopupHandle {
    id: u32,
}

impl PopupHandle {
    pub fn new(id: u32) -> Self {
        Self { id }
    }

    pub fn id(self) -> u32 {
        self.id
    }
}

/// Abstraction for showing, updating and removing countdown popups.
#[async_trait]
pub trait PopupBackend: Send {
    async fn show(&mut self, opts: &PopupOptions) -> PopupHandle;
    async fn update(&mut self, popup: &PopupHandle, opts: &PopupOptions);
    async fn close(&mut self, popup: PopupHandle);
}

#[derive(Debug)]
enum NotifierKind {
    NotifyRust,
    LogOnly,
}

/// Desktop popup backend. Uses the session notification daemon, replacing
/// notifications in place by id; downgrades to log-only output if the daemon
/// is unreachable.
pub struct Notifier {
    kind: NotifierKind,
    next_id: u32,
    events: mpsc::Sender<UiEvent>,
}

impl Notifier {
    pub fn new(events: mpsc::Sender<UiEvent>) -> Self {
        // Start optimistic; if we fail to show, we downgrade to LogOnly.
        let s = Self {
            kind: NotifierKind::NotifyRust,
            next_id: 1001u32,
            events,
        };
        debug!("Notifier created: using notify-rust backend initially");
        s
    }

    fn build(popup: PopupHandle, opts: &PopupOptions) -> notify_rust::Notification {
        let mut n = notify_rust::Notification::new();
        n.appname(APP_NAME)
            .summary(&opts.title)
            .body(&opts.text)
            .id(popup.id())
            .action(ACTION_ABORT, &opts.abort_label)
            .hint(notify_rust::Hint::Transient(true))
            .timeout(notify_rust::Timeout::Never);
        n
    }

    fn downgrade(&mut self, err: &notify_rust::error::Error, opts: &PopupOptions) {
        warn!(error=%err, "notification daemon unreachable; downgrading to log-only popups");
        self.kind = NotifierKind::LogOnly;
        info!("[POPUP] {}: {}", opts.title, opts.text);
    }

    /// Waits on the handle's action signal off the async runtime and forwards
    /// an abort click as a [`UiEvent`]. The waiter also wakes (and exits
    /// silently) when the popup is closed or replaced away.
    fn spawn_action_waiter(&self, handle: notify_rust::NotificationHandle) {
        let events = self.events.clone();
        tokio::task::spawn_blocking(move || {
            handle.wait_for_action(|action| {
                if action == ACTION_ABORT {
                    let _ = events.blocking_send(UiEvent::AbortClicked);
                }
            });
        });
    }
}

#[async_trait]
impl PopupBackend for Notifier {
    async fn show(&mut self, opts: &PopupOptions) -> PopupHandle {
        let popup = PopupHandle::new(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        match self.kind {
            NotifierKind::NotifyRust => {
                debug!(id = popup.id(), "show: building popup");
                match Self::build(popup, opts).show_async().await {
                    Ok(handle) => self.spawn_action_waiter(handle),
                    Err(e) => self.downgrade(&e, opts),
                }
            }
            NotifierKind::LogOnly => {
                info!("[POPUP] {}: {}", opts.title, opts.text);
            }
        }
        popup
    }

    async fn update(&mut self, popup: &PopupHandle, opts: &PopupOptions) {
        match self.kind {
            NotifierKind::NotifyRust => {
                debug!(id = popup.id(), "update: replacing popup in place");
                // Re-sending with the same id replaces the on-screen popup
                // without re-animating it; the action waiter from show() keeps
                // listening on that id.
                if let Err(e) = Self::build(*popup, opts).show_async().await {
                    self.downgrade(&e, opts);
                }
            }
            NotifierKind::LogOnly => {
                info!("[POPUP] {}: {}", opts.title, opts.text);
            }
        }
    }

    async fn close(&mut self, popup: PopupHandle) {
        match self.kind {
            NotifierKind::NotifyRust => {
                debug!(
                    id = popup.id(),
                    "close: replacing with short-timeout notification (async hack)"
                );
                let mut n = notify_rust::Notification::new();
                // Replace the popup with an empty, near-immediate timeout one.
                let _ = n
                    .appname(APP_NAME)
                    .summary("Power-off countdown ended")
                    .id(popup.id())
                    .urgency(notify_rust::Urgency::Low)
                    .timeout(notify_rust::Timeout::Milliseconds(1))
                    .show_async()
                    .await;
            }
            NotifierKind::LogOnly => {
                // Nothing to do; nothing was shown via the notify backend.
            }
        }
    }
}

/// Factory for the default backend (notify-rust with log fallback).
pub fn default_backend(events: mpsc::Sender<UiEvent>) -> Box<dyn PopupBackend + Send> {
    Box::new(Notifier::new(events))
}
