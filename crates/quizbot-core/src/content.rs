//! Topic content: read-only JSON documents, one file per topic.
//!
//! Every request re-reads the file from disk. Reads run on tokio's blocking
//! pool so a slow disk never stalls the event loop shared by the HTTP server
//! and the bot dispatcher.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::Serialize;

use crate::domain::TopicId;

/// File extension of topic documents.
pub const TOPIC_EXTENSION: &str = "json";

#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    /// The identifier could address something outside the content directory.
    #[error("Invalid topic ID")]
    InvalidIdentifier,

    #[error("Topic '{0}' not found")]
    NotFound(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{path} is not valid JSON: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("content read task failed: {0}")]
    Worker(String),
}

/// One entry of the topic listing, in the shape the quiz web app renders.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicSummary {
    pub id: String,
    /// The document's `topic` field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub icon: &'static str,
    pub color: &'static str,
    pub question_count: usize,
}

const FALLBACK_ICONS: [&str; 8] = ["📚", "📝", "🧠", "💡", "🔬", "📐", "🎓", "📖"];
const FALLBACK_COLORS: [&str; 8] = [
    "#ff9800", "#9c27b0", "#795548", "#607d8b", "#00bcd4", "#e91e63", "#4caf50", "#ff5722",
];

/// Icon and accent colour for a topic tile.
///
/// Well-known topics have fixed styling; everything else picks a stable
/// entry from the fallback palettes keyed on the sum of the id's UTF-16 units.
pub fn topic_style(id: &str) -> (&'static str, &'static str) {
    match id {
        "dbms" => ("🗄️", "#667eea"),
        "os" => ("💻", "#11998e"),
        "cn" => ("🌐", "#ee0979"),
        _ => {
            let hash: usize = id.encode_utf16().map(usize::from).sum();
            (
                FALLBACK_ICONS[hash % FALLBACK_ICONS.len()],
                FALLBACK_COLORS[hash % FALLBACK_COLORS.len()],
            )
        }
    }
}

/// Read-only view over the content directory.
#[derive(Clone, Debug)]
pub struct ContentStore {
    root: PathBuf,
}

impl ContentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, id: &TopicId) -> PathBuf {
        self.root.join(format!("{id}.{TOPIC_EXTENSION}"))
    }

    /// Validate `raw` and return the parsed document it names.
    ///
    /// Invalid identifiers are rejected before any filesystem access.
    pub async fn load(&self, raw: &str) -> Result<serde_json::Value, ContentError> {
        let id = TopicId::parse(raw)?;
        self.load_topic(&id).await
    }

    pub async fn load_topic(&self, id: &TopicId) -> Result<serde_json::Value, ContentError> {
        let path = self.path_for(id);
        let name = id.to_string();
        tokio::task::spawn_blocking(move || read_topic(&name, &path))
            .await
            .map_err(|e| ContentError::Worker(e.to_string()))?
    }

    /// List the topics currently present, sorted by id.
    pub async fn list(&self) -> Result<Vec<TopicSummary>, ContentError> {
        let root = self.root.clone();
        tokio::task::spawn_blocking(move || list_topics(&root))
            .await
            .map_err(|e| ContentError::Worker(e.to_string()))?
    }
}

fn read_topic(name: &str, path: &Path) -> Result<serde_json::Value, ContentError> {
    if !path.is_file() {
        return Err(ContentError::NotFound(name.to_string()));
    }

    let bytes = fs::read(path).map_err(|source| match source.kind() {
        // Removed between the existence check and the read.
        io::ErrorKind::NotFound => ContentError::NotFound(name.to_string()),
        _ => ContentError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;

    serde_json::from_slice(&bytes).map_err(|source| ContentError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn list_topics(root: &Path) -> Result<Vec<TopicSummary>, ContentError> {
    let entries = fs::read_dir(root).map_err(|source| ContentError::Io {
        path: root.to_path_buf(),
        source,
    })?;

    let mut topics = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some(TOPIC_EXTENSION) {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        // Only list what the quiz endpoint would actually serve.
        let Ok(id) = TopicId::parse(stem) else {
            continue;
        };
        if !path.is_file() {
            continue;
        }

        // A broken document fails the whole listing, like a broken quiz fetch.
        let doc = read_topic(id.as_str(), &path)?;
        topics.push(summarize(&id, &doc));
    }

    topics.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(topics)
}

fn summarize(id: &TopicId, doc: &serde_json::Value) -> TopicSummary {
    let (icon, color) = topic_style(id.as_str());
    TopicSummary {
        id: id.to_string(),
        name: doc.get("topic").and_then(|t| t.as_str()).map(str::to_string),
        icon,
        color,
        question_count: doc
            .get("questions")
            .and_then(|q| q.as_array())
            .map_or(0, Vec::len),
    }
}
