// Property valuation client entry point.
//
// Startup sequence:
// 1. Load config (defaults copied into config/ on first run)
// 2. Initialize tracing (log to file, not terminal)
// 3. Build the prediction client and orchestrator
// 4. Create mpsc channels
// 5. Spawn app logic task
// 6. Run TUI until quit
// 7. Cleanup on exit

use homeval_core::config;
use homeval_core::orchestrator::ValuationOrchestrator;
use homeval_tui::app;
use homeval_tui::tui;

use anyhow::Context;
use tokio::sync::mpsc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load config
    let config = config::load_config().context("failed to load configuration")?;

    // 2. Initialize tracing
    init_tracing(&config)?;
    info!("homeval starting up");
    info!("Prediction service at {}", config.service.base_url);

    // 3. Orchestrator over the HTTP prediction client
    let orchestrator = ValuationOrchestrator::from_config(&config);

    // 4. Channels
    let (prediction_tx, prediction_rx) = mpsc::channel(64);
    let (cmd_tx, cmd_rx) = mpsc::channel(64);
    let (ui_tx, ui_rx) = mpsc::channel(256);

    // 5. App logic task
    let state = app::AppState::new(orchestrator, prediction_tx);
    let app_handle = tokio::spawn(async move {
        if let Err(e) = app::run(cmd_rx, prediction_rx, ui_tx, state).await {
            error!("Application loop error: {}", e);
        }
    });

    info!("Application ready");

    // 6. TUI owns the terminal until the user quits
    if let Err(e) = tui::run(ui_rx, cmd_tx).await {
        error!("TUI error: {}", e);
    }

    // 7. Wait for the app task to wind down (with timeout)
    let _ = tokio::time::timeout(std::time::Duration::from_secs(5), app_handle).await;

    info!("homeval shut down cleanly");
    Ok(())
}

/// Log to `{logging.directory}/homeval.log`. `RUST_LOG` overrides the
/// configured filter.
fn init_tracing(config: &config::Config) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join(&config.logging.directory);
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;

    let log_file = std::fs::File::create(log_dir.join("homeval.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter)),
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
