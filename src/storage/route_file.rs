//! Persisted route configuration.
//!
//! The administrative surface works on raw bytes: reads return the file as
//! stored, writes overwrite it verbatim without validation. Parsing happens
//! only when a table is built from the file.

use std::io;
use std::path::{Path, PathBuf};

use axum::body::Bytes;

use crate::routing::table::{RouteTable, RouteTableError};

#[derive(Debug, thiserror::Error)]
pub enum RouteFileError {
    #[error("cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot load {}: {source}", .path.display())]
    Table {
        path: PathBuf,
        #[source]
        source: RouteTableError,
    },
}

/// The on-disk route configuration file.
#[derive(Debug, Clone)]
pub struct RouteFile {
    path: PathBuf,
}

impl RouteFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored bytes, verbatim.
    pub async fn read_raw(&self) -> io::Result<Bytes> {
        tokio::fs::read(&self.path).await.map(Bytes::from)
    }

    /// Overwrite the stored bytes, verbatim.
    pub async fn write_raw(&self, bytes: &[u8]) -> io::Result<()> {
        tokio::fs::write(&self.path, bytes).await
    }

    /// Read, parse and compile the stored configuration.
    pub fn load_table(&self) -> Result<RouteTable, RouteFileError> {
        let bytes = std::fs::read(&self.path).map_err(|source| RouteFileError::Read {
            path: self.path.clone(),
            source,
        })?;
        RouteTable::from_json(&bytes).map_err(|source| RouteFileError::Table {
            path: self.path.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_raw_roundtrip_is_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let file = RouteFile::new(dir.path().join("routes.json"));

        // Not even JSON: raw writes do not validate.
        file.write_raw(b"  garbage\n").await.unwrap();
        assert_eq!(&file.read_raw().await.unwrap()[..], b"  garbage\n");
        assert!(matches!(file.load_table(), Err(RouteFileError::Table { .. })));
    }

    #[test]
    fn test_load_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("routes.json");
        std::fs::write(
            &path,
            r#"[{"method":"GET","path":"/users/{id}","response_template":"user_{id}.json"}]"#,
        )
        .unwrap();

        let table = RouteFile::new(&path).load_table().unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = RouteFile::new(dir.path().join("absent.json"));
        assert!(matches!(file.load_table(), Err(RouteFileError::Read { .. })));
    }
}
