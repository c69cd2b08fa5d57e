use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info};

pub mod cli;
pub mod commands;
pub mod config;
pub mod notify;
pub mod push;
pub mod ui;
pub mod viewmodel;

pub use cli::Cli;
pub use config::{ClientConfig, load_config, resolve_config_path};

use viewmodel::{PowerOffCountdown, PowerStatusDisplay, ViewModel};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),
    #[error("http error: {0}")]
    Http(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

pub async fn run(cli: Cli) -> Result<(), AppError> {
    init_tracing();

    let (cfg_path, mut cfg) = ClientConfig::find_and_load(cli.config)?;
    if let Some(server) = cli.server {
        cfg.server_url = server;
    }
    info!(path=?cfg_path, server=%cfg.server_url, "loaded config");

    // Spawn the dispatcher loop and race it against the shutdown signal.
    let cancel = tokio_util::sync::CancellationToken::new();
    let cancel_child = cancel.child_token();
    let mut handle = tokio::spawn(async move {
        let _ = dispatcher_loop(cancel_child, cfg).await;
    });

    tokio::select! {
        _ = shutdown_signal() => {
            info!("shutdown signal received; requesting dispatcher to stop");
            cancel.cancel();
        }
        _ = &mut handle => {
            info!("dispatcher finished");
        }
    }

    // Give the dispatcher some time to finish gracefully.
    if !handle.is_finished() {
        let _ = tokio::time::timeout(Duration::from_secs(3), handle).await;
    }
    Ok(())
}

/// The host role: construct the page, run each view model's startup hook
/// once, then fan every push envelope out to all registered view models.
/// Popup clicks and status changes are serviced on the same single-threaded
/// loop, so no handler ever observes partially-applied state.
async fn dispatcher_loop(
    cancel: tokio_util::sync::CancellationToken,
    cfg: ClientConfig,
) -> Result<(), AppError> {
    let mut page = ui::Page::with_state_panel();
    let (ui_tx, mut ui_rx) = mpsc::channel(8);
    let (push_tx, mut push_rx) = mpsc::channel(64);

    let mut power_status = PowerStatusDisplay::new();
    let mut status_rx = power_status.subscribe();
    let mut power_off = PowerOffCountdown::new(
        notify::default_backend(ui_tx),
        Box::new(commands::RestCommandSink::new(&cfg.server_url)),
    );

    power_status.on_startup(&mut page);
    power_off.on_startup(&mut page);

    push::spawn_push_listener(&cfg.server_url, push_tx);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            Some(msg) = push_rx.recv() => {
                viewmodel::dispatch(
                    &mut [&mut power_status as &mut dyn ViewModel, &mut power_off],
                    &msg,
                )
                .await;
            }
            Some(ev) = ui_rx.recv() => match ev {
                notify::UiEvent::AbortClicked => {
                    info!("user clicked abort");
                    power_off.abort_printer_off().await;
                }
            },
            res = status_rx.changed() => {
                if res.is_ok() {
                    let power = status_rx.borrow_and_update().clone();
                    info!(%power, "printer power status");
                    debug!(page = %page.render(), "page re-rendered");
                }
            }
        }
    }
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        let mut sigint = signal(SignalKind::interrupt()).expect("listen SIGINT");
        let mut sigterm = signal(SignalKind::terminate()).expect("listen SIGTERM");
        tokio::select! {
            _ = sigint.recv() => {
                info!("shutdown: received SIGINT");
            }
            _ = sigterm.recv() => {
                info!("shutdown: received SIGTERM");
            }
        }
    }
    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await.expect("listen for ctrl_c");
        info!("shutdown: received ctrl_c");
    }
}
