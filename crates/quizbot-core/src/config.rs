use std::{
    env, fs,
    net::{IpAddr, SocketAddr},
    path::{Path, PathBuf},
};

use reqwest::Url;

use crate::{errors::Error, Result};

pub const DEFAULT_WEBAPP_URL: &str = "http://localhost:5173";
pub const DEFAULT_WEBAPP_BUTTON_TEXT: &str = "🚀 Open Premium Quiz";
pub const DEFAULT_MENU_BUTTON_TEXT: &str = "Open Quiz";
pub const DEFAULT_WELCOME_TEMPLATE: &str = "🌟 **Namaste {name}!**\n\n\
Welcome to the **Premium Quiz Experience**.\n\n\
I have been upgraded with a high-end interface, haptic feedback, and advanced \
training tools to help you succeed in your ITI TO exams.\n\n\
👉 **Click the button below to start your journey!**";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;

/// Typed, process-wide configuration. Read once at startup.
#[derive(Clone, Debug)]
pub struct Config {
    // Telegram
    /// Raw token as configured; see [`Config::bot_token`] for the validated view.
    pub telegram_bot_token: Option<String>,
    pub telegram_api_url: Option<Url>,

    // Web app
    pub webapp_url: Url,
    pub webapp_button_text: String,
    pub menu_button_text: String,
    pub welcome_template: String,

    // HTTP
    pub bind_addr: SocketAddr,
    pub content_dir: PathBuf,
}

impl Config {
    /// Load from the process environment (plus `.env`, which never overrides).
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));
        let install_dir = install_dir()?;
        Self::from_lookup(|key| env::var(key).ok(), &install_dir)
    }

    /// Build a config from an arbitrary key lookup.
    ///
    /// `install_dir` anchors relative content paths; the caller's working
    /// directory is never consulted.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        install_dir: &Path,
    ) -> Result<Self> {
        let get = |key: &str| lookup(key).and_then(non_empty);

        let telegram_bot_token = get("TELEGRAM_BOT_TOKEN").map(|t| t.trim().to_string());
        let telegram_api_url = get("TELEGRAM_API_URL")
            .map(|raw| {
                Url::parse(raw.trim())
                    .map_err(|e| Error::Config(format!("TELEGRAM_API_URL is invalid: {e}")))
            })
            .transpose()?;

        let webapp_url = normalize_webapp_url(
            get("WEBAPP_URL").as_deref().unwrap_or(DEFAULT_WEBAPP_URL),
        )?;
        if is_loopback_url(&webapp_url) {
            tracing::warn!(
                url = %webapp_url,
                "WEBAPP_URL points at a loopback host; Telegram mobile/desktop clients cannot open it"
            );
        } else if webapp_url.scheme() != "https" {
            tracing::warn!(url = %webapp_url, "WEBAPP_URL is not https; Telegram requires https web apps");
        }

        let webapp_button_text =
            get("WEBAPP_BUTTON_TEXT").unwrap_or_else(|| DEFAULT_WEBAPP_BUTTON_TEXT.to_string());
        let menu_button_text =
            get("MENU_BUTTON_TEXT").unwrap_or_else(|| DEFAULT_MENU_BUTTON_TEXT.to_string());
        let welcome_template = get("WELCOME_TEMPLATE")
            .map(|t| t.replace("\\n", "\n"))
            .unwrap_or_else(|| DEFAULT_WELCOME_TEMPLATE.to_string());

        let host = get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match get("PORT") {
            Some(p) => p
                .trim()
                .parse::<u16>()
                .map_err(|e| Error::Config(format!("PORT is invalid: {e}")))?,
            None => DEFAULT_PORT,
        };
        let ip = host
            .trim()
            .parse::<IpAddr>()
            .map_err(|e| Error::Config(format!("HOST is invalid: {e}")))?;
        let bind_addr = SocketAddr::new(ip, port);

        let content_dir = resolve_content_dir(get("CONTENT_DIR").map(PathBuf::from), install_dir);

        Ok(Self {
            telegram_bot_token,
            telegram_api_url,
            webapp_url,
            webapp_button_text,
            menu_button_text,
            welcome_template,
            bind_addr,
            content_dir,
        })
    }

    /// The bot token, if one is configured and well-formed.
    pub fn bot_token(&self) -> Option<&str> {
        self.telegram_bot_token
            .as_deref()
            .filter(|t| is_valid_bot_token(t))
    }
}

/// A token is `<bot id>:<secret>`; anything without the separator is rejected.
pub fn is_valid_bot_token(token: &str) -> bool {
    match token.trim().split_once(':') {
        Some((id, secret)) => !id.is_empty() && !secret.is_empty(),
        None => false,
    }
}

/// Prepend `https://` when no scheme is given, then parse.
pub fn normalize_webapp_url(raw: &str) -> Result<Url> {
    let raw = raw.trim();
    let with_scheme = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("https://{raw}")
    };
    Url::parse(&with_scheme)
        .map_err(|e| Error::Config(format!("WEBAPP_URL {with_scheme:?} is invalid: {e}")))
}

pub fn is_loopback_url(url: &Url) -> bool {
    let Some(host) = url.host_str() else {
        return false;
    };
    let host = host.trim_start_matches('[').trim_end_matches(']');
    if host.eq_ignore_ascii_case("localhost") || host.to_ascii_lowercase().ends_with(".localhost")
    {
        return true;
    }
    match host.parse::<IpAddr>() {
        Ok(ip) => ip.is_loopback() || ip.is_unspecified(),
        Err(_) => false,
    }
}

/// Absolute paths win; relative ones hang off the installation directory.
pub fn resolve_content_dir(configured: Option<PathBuf>, install_dir: &Path) -> PathBuf {
    match configured {
        Some(p) if p.is_absolute() => p,
        Some(p) => install_dir.join(p),
        None => {
            let packaged = install_dir.join("data");
            if packaged.is_dir() {
                packaged
            } else {
                PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/../../data"))
            }
        }
    }
}

/// Directory containing the running executable.
fn install_dir() -> Result<PathBuf> {
    let exe = env::current_exe()?;
    exe.parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| Error::InvalidPath {
            path: exe.clone(),
            reason: "executable has no parent directory".to_string(),
        })
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }
        if env::var_os(key).is_some() {
            continue; // do not override existing env
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        env::set_var(key, val);
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}
