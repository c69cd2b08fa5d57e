use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Value, json};

use octopibox_client::commands::CommandSink;
use octopibox_client::notify::{PopupBackend, PopupHandle, PopupOptions};
use octopibox_client::ui::Page;
use octopibox_client::viewmodel::{
    PowerOffCountdown, PowerStatusDisplay, ViewModel,
    power_off::{POPUP_TITLE, TIMEOUT_POPUP_TEXT},
    power_status::POWER_STATUS_PLACEHOLDER,
};

#[derive(Debug, Clone, PartialEq)]
enum PopupOp {
    Show { id: u32, title: String, text: String },
    Update { id: u32, text: String },
    Close { id: u32 },
}

/// Popup backend double that records every operation instead of talking to a
/// notification daemon.
#[derive(Default)]
struct RecordingPopup {
    ops: Arc<Mutex<Vec<PopupOp>>>,
    next_id: u32,
}

impl RecordingPopup {
    fn new() -> (Self, Arc<Mutex<Vec<PopupOp>>>) {
        let ops = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                ops: ops.clone(),
                next_id: 0,
            },
            ops,
        )
    }
}

#[async_trait]
impl PopupBackend for RecordingPopup {
    async fn show(&mut self, opts: &PopupOptions) -> PopupHandle {
        let popup = PopupHandle::new(self.next_id);
        self.next_id += 1;
        self.ops.lock().unwrap().push(PopupOp::Show {
            id: popup.id(),
            title: opts.title.clone(),
            text: opts.text.clone(),
        });
        popup
    }

    async fn update(&mut self, popup: &PopupHandle, opts: &PopupOptions) {
        self.ops.lock().unwrap().push(PopupOp::Update {
            id: popup.id(),
            text: opts.text.clone(),
        });
    }

    async fn close(&mut self, popup: PopupHandle) {
        self.ops
            .lock()
            .unwrap()
            .push(PopupOp::Close { id: popup.id() });
    }
}

#[derive(Default)]
struct RecordingSink {
    aborts: Arc<Mutex<u32>>,
}

impl CommandSink for RecordingSink {
    fn send_abort(&self) {
        *self.aborts.lock().unwrap() += 1;
    }
}

fn countdown() -> (PowerOffCountdown, Arc<Mutex<Vec<PopupOp>>>, Arc<Mutex<u32>>) {
    let (backend, ops) = RecordingPopup::new();
    let sink = RecordingSink::default();
    let aborts = sink.aborts.clone();
    (
        PowerOffCountdown::new(Box::new(backend), Box::new(sink)),
        ops,
        aborts,
    )
}

fn timeout_msg(value: i32) -> Value {
    json!({"type": "timeout", "timeout_value": value})
}

async fn deliver(vm: &mut dyn ViewModel, data: Value) {
    vm.on_plugin_message("octopibox", &data).await;
}

#[tokio::test]
async fn popup_identity_preserved_across_updates() {
    let (mut vm, ops, _) = countdown();
    for n in [10, 9, 8] {
        deliver(&mut vm, timeout_msg(n)).await;
    }

    let ops = ops.lock().unwrap();
    assert_eq!(
        *ops,
        vec![
            PopupOp::Show {
                id: 0,
                title: POPUP_TITLE.to_string(),
                text: format!("{TIMEOUT_POPUP_TEXT}10"),
            },
            PopupOp::Update {
                id: 0,
                text: format!("{TIMEOUT_POPUP_TEXT}9"),
            },
            PopupOp::Update {
                id: 0,
                text: format!("{TIMEOUT_POPUP_TEXT}8"),
            },
        ]
    );
    assert_eq!(vm.remaining(), Some(8));
}

#[tokio::test]
async fn countdown_scenario_runs_to_expiry() {
    // §8 scenario 7: 10 → 9 → 0.
    let (mut vm, ops, _) = countdown();
    deliver(&mut vm, timeout_msg(10)).await;
    assert_eq!(vm.remaining(), Some(10));
    deliver(&mut vm, timeout_msg(9)).await;
    assert_eq!(vm.remaining(), Some(9));
    deliver(&mut vm, timeout_msg(0)).await;
    assert_eq!(vm.remaining(), None);

    let ops = ops.lock().unwrap();
    assert!(matches!(ops[0], PopupOp::Show { id: 0, .. }));
    assert!(matches!(ops[1], PopupOp::Update { id: 0, .. }));
    assert_eq!(ops[2], PopupOp::Close { id: 0 });
}

#[tokio::test]
async fn nonpositive_timeout_always_ends_absent() {
    let (mut vm, ops, _) = countdown();

    // From Active.
    deliver(&mut vm, timeout_msg(5)).await;
    deliver(&mut vm, timeout_msg(-1)).await;
    assert_eq!(vm.remaining(), None);

    // From Absent: safe no-op, no popup to remove.
    deliver(&mut vm, timeout_msg(0)).await;
    deliver(&mut vm, timeout_msg(-10)).await;
    assert_eq!(vm.remaining(), None);
    assert_eq!(ops.lock().unwrap().len(), 2); // one show, one close
}

#[tokio::test]
async fn close_popup_always_ends_absent() {
    let (mut vm, ops, _) = countdown();

    deliver(&mut vm, timeout_msg(7)).await;
    deliver(&mut vm, json!({"type": "close_popup"})).await;
    assert_eq!(vm.remaining(), None);
    assert_eq!(ops.lock().unwrap().len(), 2);

    // §8 scenario 9: close while Absent stays Absent, no crash.
    deliver(&mut vm, json!({"type": "close_popup"})).await;
    assert_eq!(vm.remaining(), None);
    assert_eq!(ops.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn user_abort_clears_popup_and_posts_once() {
    // §8 scenario 8: Active(5), user clicks abort.
    let (mut vm, ops, aborts) = countdown();
    deliver(&mut vm, timeout_msg(5)).await;

    vm.abort_printer_off().await;
    assert_eq!(vm.remaining(), None);
    assert_eq!(*aborts.lock().unwrap(), 1);
    assert_eq!(ops.lock().unwrap().last(), Some(&PopupOp::Close { id: 0 }));

    // Abort with no active countdown is a no-op and sends nothing.
    vm.abort_printer_off().await;
    assert_eq!(*aborts.lock().unwrap(), 1);
}

#[tokio::test]
async fn foreign_plugin_messages_never_mutate_state() {
    let (mut vm, ops, aborts) = countdown();
    // §8 scenario 10 plus a sweep of the other message types.
    vm.on_plugin_message("other_plugin", &timeout_msg(10)).await;
    vm.on_plugin_message("other_plugin", &json!({"type": "close_popup"}))
        .await;
    assert_eq!(vm.remaining(), None);
    assert!(ops.lock().unwrap().is_empty());
    assert_eq!(*aborts.lock().unwrap(), 0);

    let mut status = PowerStatusDisplay::new();
    let rx = status.subscribe();
    status
        .on_plugin_message(
            "other_plugin",
            &json!({"type": "updatePowerStatus", "power_status_value": "on"}),
        )
        .await;
    assert_eq!(*rx.borrow(), POWER_STATUS_PLACEHOLDER);
}

#[tokio::test]
async fn power_status_updates_verbatim() {
    let mut status = PowerStatusDisplay::new();
    let rx = status.subscribe();
    assert_eq!(*rx.borrow(), "-");

    for value in ["on", "", "  Off (auto)  "] {
        status
            .on_plugin_message(
                "octopibox",
                &json!({"type": "updatePowerStatus", "power_status_value": value}),
            )
            .await;
        assert_eq!(*rx.borrow(), value);
    }
}

#[tokio::test]
async fn power_status_ignores_unrelated_and_unknown_messages() {
    let mut status = PowerStatusDisplay::new();
    let rx = status.subscribe();
    status.on_plugin_message("octopibox", &timeout_msg(3)).await;
    status
        .on_plugin_message("octopibox", &json!({"type": "somethingNew"}))
        .await;
    status.on_plugin_message("octopibox", &json!({"no": "type"})).await;
    assert_eq!(*rx.borrow(), POWER_STATUS_PLACEHOLDER);
}

#[tokio::test]
async fn countdown_ignores_unknown_messages() {
    let (mut vm, ops, _) = countdown();
    deliver(&mut vm, json!({"type": "updatePowerStatus", "power_status_value": "on"})).await;
    deliver(&mut vm, json!({"type": "somethingNew", "timeout_value": 5})).await;
    deliver(&mut vm, json!({"garbage": true})).await;
    assert_eq!(vm.remaining(), None);
    assert!(ops.lock().unwrap().is_empty());
}

#[tokio::test]
async fn startup_injects_into_state_panel_once_present() {
    let mut status = PowerStatusDisplay::new();
    let mut page = Page::with_state_panel();
    status.on_startup(&mut page);
    assert_eq!(page.render(), "Printer Power: -\n[progress]\n");

    status
        .on_plugin_message(
            "octopibox",
            &json!({"type": "updatePowerStatus", "power_status_value": "on"}),
        )
        .await;
    assert_eq!(page.render(), "Printer Power: on\n[progress]\n");
}

#[tokio::test]
async fn startup_without_state_panel_is_a_noop() {
    let mut status = PowerStatusDisplay::new();
    let mut page = Page::new();
    status.on_startup(&mut page);
    assert_eq!(page.render(), "");
}
