use std::fs::Metadata;
use std::io::{self, ErrorKind};
use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::{ArtifactName, ArtifactReader, ArtifactStore, StorageError};

/// Artifacts as plain files in one flat directory.
#[derive(Debug, Clone)]
pub struct LocalArtifactStore {
    root: PathBuf,
}

impl LocalArtifactStore {
    /// Opens the store, creating the directory if it does not exist yet.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        info!("Artifact directory ready at {}", root.display());
        Ok(Self { root })
    }

    fn path_of(&self, name: &ArtifactName) -> PathBuf {
        self.root.join(name.to_string())
    }
}

/// Age of a regular file. `None` for anything that is not a file, or that
/// vanished between listing and stat.
fn file_age(metadata: io::Result<Metadata>, now: SystemTime) -> io::Result<Option<Duration>> {
    let metadata = match metadata {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e),
    };
    if !metadata.is_file() {
        return Ok(None);
    }
    Ok(Some(
        metadata
            .modified()
            .ok()
            .and_then(|modified| now.duration_since(modified).ok())
            .unwrap_or_default(),
    ))
}

#[async_trait]
impl ArtifactStore for LocalArtifactStore {
    async fn put(&self, name: &ArtifactName, bytes: &[u8]) -> Result<(), StorageError> {
        tokio::fs::write(self.path_of(name), bytes)
            .await
            .map_err(|source| StorageError::Io {
                name: name.to_string(),
                source,
            })?;
        debug!("Stored artifact {name} ({} bytes)", bytes.len());
        Ok(())
    }

    async fn fetch(&self, name: &ArtifactName) -> Result<Option<ArtifactReader>, StorageError> {
        let io_error = |source| StorageError::Io {
            name: name.to_string(),
            source,
        };

        let file = match tokio::fs::File::open(self.path_of(name)).await {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_error(e)),
        };
        let len = file.metadata().await.map_err(io_error)?.len();

        Ok(Some(ArtifactReader {
            len,
            reader: Box::new(file),
        }))
    }

    async fn sweep(&self, older_than: Duration) -> Result<usize, StorageError> {
        let now = SystemTime::now();
        let mut removed = 0;
        let mut entries = tokio::fs::read_dir(&self.root).await?;

        while let Some(entry) = entries.next_entry().await? {
            let file_name = entry.file_name();
            // Only files this service generated are ever eligible.
            let Some(name) = file_name.to_str().and_then(ArtifactName::parse) else {
                continue;
            };

            let Some(age) = file_age(entry.metadata().await, now)? else {
                continue;
            };
            if age <= older_than {
                continue;
            }

            match tokio::fs::remove_file(entry.path()).await {
                Ok(()) => removed += 1,
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => warn!("Failed to remove expired artifact {name}: {e}"),
            }
        }

        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::ArtifactKind;
    use crate::test_support::read_artifact;

    #[tokio::test]
    async fn test_put_then_fetch_streams_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalArtifactStore::open(dir.path()).await.unwrap();
        let name = ArtifactName::generate(ArtifactKind::Pdf);

        store.put(&name, b"%PDF-1.7").await.unwrap();

        let artifact = store.fetch(&name).await.unwrap().unwrap();
        assert_eq!(artifact.len, 8);
        assert_eq!(read_artifact(&store, &name).await.unwrap(), b"%PDF-1.7");
        assert!(dir.path().join(name.to_string()).is_file());
    }

    #[tokio::test]
    async fn test_fetch_missing_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalArtifactStore::open(dir.path()).await.unwrap();
        let name = ArtifactName::generate(ArtifactKind::Xlsx);
        assert!(store.fetch(&name).await.unwrap().is_none());
    }

    #[test]
    fn test_vanished_entry_is_skipped_not_fatal() {
        let now = SystemTime::now();
        let gone = Err(io::Error::from(ErrorKind::NotFound));
        assert_eq!(file_age(gone, now).unwrap(), None);

        let denied = Err(io::Error::from(ErrorKind::PermissionDenied));
        assert!(file_age(denied, now).is_err());
    }

    #[test]
    fn test_file_age_ignores_directories() {
        let dir = tempfile::tempdir().unwrap();
        let now = SystemTime::now();
        assert_eq!(file_age(std::fs::metadata(dir.path()), now).unwrap(), None);

        let file = dir.path().join("a.bin");
        std::fs::write(&file, b"x").unwrap();
        assert!(file_age(std::fs::metadata(&file), now).unwrap().is_some());
    }

    #[tokio::test]
    async fn test_open_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("outputs").join("nested");
        LocalArtifactStore::open(&nested).await.unwrap();
        assert!(nested.is_dir());
    }

    #[tokio::test]
    async fn test_sweep_removes_only_expired_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalArtifactStore::open(dir.path()).await.unwrap();
        let name = ArtifactName::generate(ArtifactKind::Docx);
        store.put(&name, b"docx").await.unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"keep me").unwrap();

        // Nothing is older than an hour yet.
        assert_eq!(store.sweep(Duration::from_secs(3600)).await.unwrap(), 0);
        assert!(store.fetch(&name).await.unwrap().is_some());

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(store.sweep(Duration::from_millis(1)).await.unwrap(), 1);
        assert!(store.fetch(&name).await.unwrap().is_none());
        assert!(dir.path().join("notes.txt").exists());
    }
}
