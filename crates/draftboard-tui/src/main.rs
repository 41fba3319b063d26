// draftboard entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Load config (copying defaults on first run)
// 3. Build the session and load any startup name lists
// 4. Create mpsc channels
// 5. Spawn app logic task
// 6. Run the TUI until the user quits
// 7. Cleanup on exit

use draftboard_tui::app;
use draftboard_tui::config;
use draftboard_tui::tui;

use anyhow::Context;
use tokio::sync::mpsc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing (log to file, not terminal)
    init_tracing()?;
    info!("draftboard starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: timer {} ({}s per turn), notices {}s",
        if config.timer.enabled { "on" } else { "off" },
        config.timer.turn_seconds,
        config.notice.ttl_secs
    );

    // 3-4. Channels first so the session can hand the timer its sender
    let (timer_tx, timer_rx) = mpsc::channel(64);
    let (cmd_tx, cmd_rx) = mpsc::channel(64);
    let (ui_tx, ui_rx) = mpsc::channel(256);

    let mut app_state = app::AppState::new(config, timer_tx);
    app_state
        .load_startup_lists()
        .context("failed to load startup name lists")?;

    // 5. Spawn app logic task
    let app_handle = tokio::spawn(async move {
        if let Err(e) = app::run(cmd_rx, timer_rx, ui_tx, app_state).await {
            error!("Application loop error: {}", e);
        }
    });

    // 6. Run the TUI event loop (blocking until user quits)
    info!("Application ready");
    if let Err(e) = tui::run(ui_rx, cmd_tx).await {
        error!("TUI error: {}", e);
    }

    // 7. Cleanup: wait for app task to finish (with timeout)
    let _ = tokio::time::timeout(std::time::Duration::from_secs(5), async {
        let _ = app_handle.await;
    })
    .await;

    info!("draftboard shut down cleanly");
    Ok(())
}

/// Initialize tracing to log to a file (not the terminal, which is used by the TUI).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("draftboard.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("draftboard=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
