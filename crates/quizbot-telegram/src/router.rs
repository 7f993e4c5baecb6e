//! Bot session lifecycle: build → initialize → dispatch → graceful stop.

use std::sync::Arc;

use anyhow::Context;
use teloxide::{
    dispatching::Dispatcher,
    dptree,
    prelude::*,
    types::Me,
    update_listeners::{self, UpdateListener},
};
use tokio::{sync::watch, task::JoinHandle};
use tokio_util::sync::CancellationToken;

use quizbot_core::{config::Config, messaging::port::MessagingPort, welcome::WelcomeSettings};

use crate::handlers;
use crate::TelegramMessenger;

/// Dependencies injected into every handler.
pub struct BotContext {
    pub welcome: WelcomeSettings,
    pub messenger: Arc<dyn MessagingPort>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BotPhase {
    Uninitialized,
    Running,
    Stopped,
}

/// Handle to the background bot task.
///
/// Owned by the process lifecycle; [`BotSession::stop`] must be called on
/// shutdown and is a no-op when the bot never started.
pub struct BotSession {
    phase: watch::Receiver<BotPhase>,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl BotSession {
    /// Start the bot in the background.
    ///
    /// Never fails: a missing/malformed token or a failed startup is logged and
    /// leaves the session `Uninitialized` while the rest of the process runs on.
    pub fn spawn(cfg: Arc<Config>) -> Self {
        let (tx, rx) = watch::channel(BotPhase::Uninitialized);
        let cancel = CancellationToken::new();

        let Some(token) = cfg.bot_token().map(str::to_string) else {
            tracing::warn!("valid TELEGRAM_BOT_TOKEN not found; bot features disabled");
            return Self {
                phase: rx,
                cancel,
                task: None,
            };
        };

        let task = tokio::spawn(run(cfg, token, tx, cancel.clone()));
        Self {
            phase: rx,
            cancel,
            task: Some(task),
        }
    }

    pub fn phase(&self) -> BotPhase {
        *self.phase.borrow()
    }

    /// Phase change receiver; lifecycle tests use it to wait for `Running`.
    pub fn subscribe(&self) -> watch::Receiver<BotPhase> {
        self.phase.clone()
    }

    /// Whether the background task is still alive (starting or dispatching).
    pub fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Stop receiving, drain in-flight handlers and release the client.
    ///
    /// Safe to call more than once and after a failed startup.
    pub async fn stop(&mut self) {
        self.cancel.cancel();
        let Some(task) = self.task.take() else {
            return;
        };
        if let Err(e) = task.await {
            tracing::error!("bot task ended abnormally: {e}");
        }
    }
}

async fn run(
    cfg: Arc<Config>,
    token: String,
    phase: watch::Sender<BotPhase>,
    cancel: CancellationToken,
) {
    let started = tokio::select! {
        res = initialize(&cfg, token) => res,
        _ = cancel.cancelled() => return,
    };
    let (bot, me) = match started {
        Ok(v) => v,
        Err(e) => {
            tracing::error!("bot failed to start: {e:#}");
            return;
        }
    };

    let ctx = Arc::new(BotContext {
        welcome: WelcomeSettings::from(cfg.as_ref()),
        messenger: Arc::new(TelegramMessenger::new(bot.clone())),
    });

    let handler = dptree::entry().branch(Update::filter_message().endpoint(handlers::handle_message));

    let mut listener = tokio::select! {
        l = update_listeners::polling_default(bot.clone()) => l,
        _ = cancel.cancelled() => return,
    };
    // The dispatcher checks its shutdown flag only between updates; stopping
    // the listener is what ends an idle long poll.
    let stop_polling = listener.stop_token();

    let mut dispatcher = Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![ctx])
        .default_handler(|_upd| async {})
        .build();
    let shutdown = dispatcher.shutdown_token();

    phase.send_replace(BotPhase::Running);
    tracing::info!("bot @{} is polling for updates", me.username());

    let dispatch = dispatcher.dispatch_with_listener(
        listener,
        LoggingErrorHandler::with_custom_text("error while polling for updates"),
    );
    tokio::pin!(dispatch);

    let stop_requested = tokio::select! {
        _ = &mut dispatch => false,
        _ = cancel.cancelled() => true,
    };
    if stop_requested {
        stop_polling.stop();
        match shutdown.shutdown() {
            Ok(done) => {
                tokio::join!(dispatch, done);
            }
            Err(_) => {
                tracing::debug!("dispatcher was idle at shutdown");
                dispatch.await;
            }
        }
    } else {
        tracing::warn!("dispatcher exited before shutdown was requested");
    }

    phase.send_replace(BotPhase::Stopped);
    tracing::info!("bot stopped");
}

/// Build the client and check the token against the Bot API.
async fn initialize(cfg: &Config, token: String) -> anyhow::Result<(Bot, Me)> {
    let mut bot = Bot::new(token);
    if let Some(url) = &cfg.telegram_api_url {
        bot = bot.set_api_url(url.clone());
    }

    let me = bot
        .get_me()
        .send()
        .await
        .context("getMe request failed")?;
    Ok((bot, me))
}
