//! Artifact storage — the only place generated files are written or read.
//!
//! Handlers and the pipeline talk to `Arc<dyn ArtifactStore>`; the local-disk
//! backend is chosen at startup in `main`.

pub mod local;
pub mod retention;

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use tokio::io::AsyncRead;
use uuid::Uuid;

pub use local::LocalArtifactStore;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on artifact '{name}': {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error in artifact directory: {0}")]
    Directory(#[from] std::io::Error),
}

// ────────────────────────────────────────────────────────────────────────────
// Artifact names
// ────────────────────────────────────────────────────────────────────────────

/// The three file types a single extraction request produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Pdf,
    Docx,
    Xlsx,
}

impl ArtifactKind {
    pub fn extension(self) -> &'static str {
        match self {
            ArtifactKind::Pdf => "pdf",
            ArtifactKind::Docx => "docx",
            ArtifactKind::Xlsx => "xlsx",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ArtifactKind::Pdf => "application/pdf",
            ArtifactKind::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            ArtifactKind::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        }
    }

    fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "pdf" => Some(ArtifactKind::Pdf),
            "docx" => Some(ArtifactKind::Docx),
            "xlsx" => Some(ArtifactKind::Xlsx),
            _ => None,
        }
    }
}

static ARTIFACT_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^([0-9a-f]{8}-[0-9a-f]{4}-4[0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12})\.(pdf|docx|xlsx)$",
    )
    .expect("artifact name pattern is valid")
});

/// A file name the service generated itself: `<uuid-v4>.<pdf|docx|xlsx>`.
///
/// Anything else (path separators, `..`, other extensions, foreign names) fails
/// to parse, so a parsed name is always safe to join onto the artifact directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactName {
    stem: Uuid,
    kind: ArtifactKind,
}

impl ArtifactName {
    /// Fresh random name for a new request.
    pub fn generate(kind: ArtifactKind) -> Self {
        Self {
            stem: Uuid::new_v4(),
            kind,
        }
    }

    /// Same-stem name with a different extension.
    pub fn sibling(&self, kind: ArtifactKind) -> Self {
        Self {
            stem: self.stem,
            kind,
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let caps = ARTIFACT_NAME_RE.captures(raw)?;
        let stem = Uuid::parse_str(caps.get(1)?.as_str()).ok()?;
        let kind = ArtifactKind::from_extension(caps.get(2)?.as_str())?;
        Some(Self { stem, kind })
    }

    pub fn kind(&self) -> ArtifactKind {
        self.kind
    }
}

impl fmt::Display for ArtifactName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}",
            self.stem.as_hyphenated(),
            self.kind.extension()
        )
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Store trait
// ────────────────────────────────────────────────────────────────────────────

/// An open artifact, read incrementally rather than loaded whole.
pub struct ArtifactReader {
    pub len: u64,
    pub reader: Box<dyn AsyncRead + Send + Unpin>,
}

/// Keyed artifact storage. Implement this to move artifacts off local disk
/// without touching the pipeline or the handlers.
///
/// Carried in `AppState` as `Arc<dyn ArtifactStore>`.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    async fn put(&self, name: &ArtifactName, bytes: &[u8]) -> Result<(), StorageError>;

    /// `Ok(None)` when no artifact with that name exists.
    async fn fetch(&self, name: &ArtifactName) -> Result<Option<ArtifactReader>, StorageError>;

    /// Deletes artifacts last modified more than `older_than` ago.
    /// Returns how many were removed.
    async fn sweep(&self, older_than: Duration) -> Result<usize, StorageError>;
}
