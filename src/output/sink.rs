use async_trait::async_trait;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::{BubbleError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Json,
    Svg,
}

impl ArtifactKind {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Svg => "svg",
        }
    }
}

/// A named report output, rendered and ready to publish.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub name: String,
    pub kind: ArtifactKind,
    pub body: String,
}

impl Artifact {
    pub fn json<T: Serialize>(name: impl Into<String>, value: &T) -> Result<Self> {
        Ok(Self {
            name: name.into(),
            kind: ArtifactKind::Json,
            body: serde_json::to_string_pretty(value)?,
        })
    }

    pub fn svg(name: impl Into<String>, body: String) -> Self {
        Self {
            name: name.into(),
            kind: ArtifactKind::Svg,
            body,
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.{}", self.name, self.kind.extension())
    }
}

#[async_trait]
pub trait ArtifactSink: Send + Sync {
    /// Publish one artifact, returning where it landed if it was written to disk.
    async fn publish(&self, artifact: &Artifact) -> Result<Option<PathBuf>>;
}

/// Writes each artifact as `<dir>/<name>.<ext>`, replacing any previous run's file.
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl ArtifactSink for FileSink {
    async fn publish(&self, artifact: &Artifact) -> Result<Option<PathBuf>> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| BubbleError::io_error(&self.dir, e))?;

        let path = self.dir.join(artifact.file_name());
        tokio::fs::write(&path, artifact.body.as_bytes())
            .await
            .map_err(|e| BubbleError::io_error(&path, e))?;

        info!("Wrote {}", path.display());
        Ok(Some(path))
    }
}

/// Prints text artifacts instead of writing files.
pub struct StdoutSink;

#[async_trait]
impl ArtifactSink for StdoutSink {
    async fn publish(&self, artifact: &Artifact) -> Result<Option<PathBuf>> {
        match artifact.kind {
            ArtifactKind::Json => {
                println!("--- {} ---", artifact.file_name());
                println!("{}", artifact.body);
            }
            ArtifactKind::Svg => {
                warn!("Skipping {} in stdout-only mode", artifact.file_name());
            }
        }
        Ok(None)
    }
}
