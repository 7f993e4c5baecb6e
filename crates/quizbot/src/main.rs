use std::sync::Arc;

use quizbot_core::config::Config;

mod app;

use app::App;

// One event loop for HTTP requests and bot updates; file reads go to the
// blocking pool.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), quizbot_core::Error> {
    quizbot_core::logging::init("quizbot")?;

    let cfg = Arc::new(Config::load()?);
    let app = App::start(cfg).await?;

    wait_for_shutdown_signal().await;
    app.shutdown().await;

    Ok(())
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
        ) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => {}
                    _ = sigint.recv() => {}
                }
                return;
            }
            (Err(e), _) | (_, Err(e)) => {
                tracing::warn!("failed to register signal handlers, falling back to ctrl-c: {e}");
            }
        }
    }

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for ctrl-c: {e}");
        std::future::pending::<()>().await;
    }
}
