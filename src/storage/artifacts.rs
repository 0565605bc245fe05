//! Response artifact lookup.
//!
//! Resolved names are caller-influenced (path values are substituted into
//! templates), so a name is only read when every component is a plain file or
//! directory name and the canonical file stays under the canonical root.

use std::io;
use std::path::{Component, Path, PathBuf};

use axum::body::Bytes;

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("artifact name {0:?} escapes the response root")]
    Rejected(String),

    #[error("artifact {name:?} not readable: {source}")]
    Missing {
        name: String,
        #[source]
        source: io::Error,
    },
}

/// Flat-file artifact storage under a fixed root directory.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Join `name` onto the root, refusing anything but plain components.
    pub fn locate(&self, name: &str) -> Result<PathBuf, ArtifactError> {
        let relative = Path::new(name);
        let plain = !name.is_empty()
            && !name.contains('\\')
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));

        if plain {
            Ok(self.root.join(relative))
        } else {
            Err(ArtifactError::Rejected(name.to_string()))
        }
    }

    /// Read the artifact bytes verbatim.
    pub async fn load(&self, name: &str) -> Result<Bytes, ArtifactError> {
        let missing = |source: io::Error| ArtifactError::Missing {
            name: name.to_string(),
            source,
        };

        let path = self.locate(name)?;
        let root = tokio::fs::canonicalize(&self.root).await.map_err(missing)?;
        let resolved = tokio::fs::canonicalize(&path).await.map_err(missing)?;

        // Symlinks inside the root must not lead outside of it.
        if !resolved.starts_with(&root) {
            return Err(ArtifactError::Rejected(name.to_string()));
        }

        let bytes = tokio::fs::read(&resolved).await.map_err(missing)?;
        Ok(Bytes::from(bytes))
    }
}
