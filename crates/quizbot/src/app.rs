//! Process lifecycle: the HTTP server and the bot session, started together
//! and torn down together.

use std::{net::SocketAddr, sync::Arc};

use tokio::{net::TcpListener, task::JoinHandle};
use tokio_util::sync::CancellationToken;

use quizbot_core::{config::Config, content::ContentStore, Result};
use quizbot_telegram::{BotPhase, BotSession};

/// Everything startup creates and shutdown must release.
pub struct App {
    addr: SocketAddr,
    stop_http: CancellationToken,
    server: JoinHandle<std::io::Result<()>>,
    bot: BotSession,
}

impl App {
    /// Bind the HTTP listener, start serving, then kick off the bot in the
    /// background. Only a bind failure is fatal.
    pub async fn start(cfg: Arc<Config>) -> Result<Self> {
        let listener = TcpListener::bind(cfg.bind_addr).await?;
        let addr = listener.local_addr()?;

        let content = ContentStore::new(cfg.content_dir.clone());
        if content.root().is_dir() {
            tracing::info!("serving quiz content from {}", content.root().display());
        } else {
            tracing::warn!(
                "content directory {} does not exist; every topic will be not found",
                content.root().display()
            );
        }

        let stop_http = CancellationToken::new();
        let server = tokio::spawn(quizbot_api::serve(
            listener,
            quizbot_api::router(content),
            stop_http.clone().cancelled_owned(),
        ));

        let bot = BotSession::spawn(cfg);

        Ok(Self {
            addr,
            stop_http,
            server,
            bot,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn bot_phase(&self) -> BotPhase {
        self.bot.phase()
    }

    /// Stop accepting requests, stop the bot, then wait for the server to drain.
    /// Failures are logged, never returned.
    pub async fn shutdown(mut self) {
        tracing::info!(
            bot_phase = ?self.bot.phase(),
            bot_active = self.bot.is_active(),
            "shutting down"
        );
        self.stop_http.cancel();
        self.bot.stop().await;

        match self.server.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::error!("HTTP server failed: {e}"),
            Err(e) => tracing::error!("HTTP server task ended abnormally: {e}"),
        }
        tracing::info!("shutdown complete");
    }
}

#[cfg(test)]
mod tests {
    use std::{path::Path, time::Duration};

    use super::*;

    fn config(content_dir: &Path, token: Option<&str>) -> Arc<Config> {
        let content_dir = content_dir.display().to_string();
        let token = token.map(str::to_string);
        let cfg = Config::from_lookup(
            |key| match key {
                "HOST" => Some("127.0.0.1".to_string()),
                "PORT" => Some("0".to_string()),
                "CONTENT_DIR" => Some(content_dir.clone()),
                "TELEGRAM_BOT_TOKEN" => token.clone(),
                _ => None,
            },
            Path::new("/tmp"),
        )
        .unwrap();
        Arc::new(cfg)
    }

    #[tokio::test]
    async fn serves_http_with_bot_disabled() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("os.json"), r#"{"q":1}"#).unwrap();

        let app = App::start(config(dir.path(), Some("not-a-token")))
            .await
            .unwrap();
        assert_eq!(app.bot_phase(), BotPhase::Uninitialized);

        let base = format!("http://{}", app.local_addr());
        let resp = reqwest::get(format!("{base}/api/quiz/os")).await.unwrap();
        assert_eq!(resp.status().as_u16(), 200);
        assert_eq!(resp.text().await.unwrap(), r#"{"q":1}"#);

        let resp = reqwest::get(format!("{base}/api/quiz/unknown_topic"))
            .await
            .unwrap();
        assert_eq!(resp.status().as_u16(), 404);
        let body: serde_json::Value = resp.json().await.unwrap();
        assert!(body["error"].as_str().unwrap().contains("unknown_topic"));

        tokio::time::timeout(Duration::from_secs(10), app.shutdown())
            .await
            .expect("shutdown completes");
    }

    #[tokio::test]
    async fn shutdown_stops_accepting_connections() {
        let dir = tempfile::tempdir().unwrap();
        let app = App::start(config(dir.path(), None)).await.unwrap();
        let addr = app.local_addr();

        app.shutdown().await;
        assert!(tokio::net::TcpStream::connect(addr).await.is_err());
    }

    #[tokio::test]
    async fn bind_conflict_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let first = App::start(config(dir.path(), None)).await.unwrap();

        let taken = first.local_addr();
        let content_dir = dir.path().display().to_string();
        let cfg = Config::from_lookup(
            |key| match key {
                "HOST" => Some(taken.ip().to_string()),
                "PORT" => Some(taken.port().to_string()),
                "CONTENT_DIR" => Some(content_dir.clone()),
                _ => None,
            },
            Path::new("/tmp"),
        )
        .unwrap();
        assert!(App::start(Arc::new(cfg)).await.is_err());

        first.shutdown().await;
    }
}
