use async_trait::async_trait;
use log::debug;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use studentbank_core::applications::{DocumentFile, DocumentStoreTrait, DOCUMENTS_BUCKET};
use studentbank_core::errors::{Error, Result};

/// Object store backed by a local directory.
///
/// Objects live at `<root>/<bucket>/<path>`. Existing objects are never
/// overwritten.
pub struct FsDocumentStore {
    root: PathBuf,
    bucket: String,
}

impl FsDocumentStore {
    /// Store rooted at `root`, using the default documents bucket.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_bucket(root, DOCUMENTS_BUCKET)
    }

    pub fn with_bucket(root: impl Into<PathBuf>, bucket: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            bucket: bucket.into(),
        }
    }

    pub fn bucket_dir(&self) -> PathBuf {
        self.root.join(&self.bucket)
    }

    /// Maps an object path onto the bucket directory.
    ///
    /// Only plain relative segments are accepted.
    fn resolve(&self, path: &str) -> Result<PathBuf> {
        let relative = Path::new(path);
        let valid = !path.is_empty()
            && relative
                .components()
                .all(|component| matches!(component, Component::Normal(_)));
        if !valid {
            return Err(Error::DocumentStore(format!(
                "Invalid object path '{}'",
                path
            )));
        }
        Ok(self.bucket_dir().join(relative))
    }

    /// Reads an object back.
    pub async fn read(&self, path: &str) -> Result<Vec<u8>> {
        let target = self.resolve(path)?;
        Ok(fs::read(target).await?)
    }
}

#[async_trait]
impl DocumentStoreTrait for FsDocumentStore {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn upload(&self, path: &str, file: &DocumentFile) -> Result<String> {
        let target = self.resolve(path)?;
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).await?;
        }

        let mut handle = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::AlreadyExists => {
                    Error::DocumentStore(format!("Object '{}' already exists", path))
                }
                _ => Error::from(e),
            })?;
        handle.write_all(&file.bytes).await?;
        handle.flush().await?;

        debug!(
            "Stored {} bytes ({}) at {}/{}",
            file.size(),
            file.mime_type,
            self.bucket,
            path
        );
        Ok(path.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn photo() -> DocumentFile {
        DocumentFile::new("id.png", "image/png", vec![7, 7, 7])
    }

    #[tokio::test]
    async fn test_upload_writes_into_bucket_folder() {
        let dir = tempdir().unwrap();
        let store = FsDocumentStore::new(dir.path());

        let stored = store
            .upload("student-ids/1700000000000.png", &photo())
            .await
            .unwrap();

        assert_eq!(stored, "student-ids/1700000000000.png");
        assert_eq!(store.bucket(), "student-documents");
        let on_disk = dir
            .path()
            .join("student-documents")
            .join("student-ids")
            .join("1700000000000.png");
        assert_eq!(std::fs::read(on_disk).unwrap(), vec![7, 7, 7]);
        assert_eq!(store.read(&stored).await.unwrap(), vec![7, 7, 7]);
    }

    #[tokio::test]
    async fn test_upload_never_overwrites() {
        let dir = tempdir().unwrap();
        let store = FsDocumentStore::with_bucket(dir.path(), "test-bucket");
        store.upload("drivers-licenses/1.png", &photo()).await.unwrap();

        let other = DocumentFile::new("b.png", "image/png", vec![1]);
        let err = store
            .upload("drivers-licenses/1.png", &other)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::DocumentStore(_)));
        assert_eq!(
            store.read("drivers-licenses/1.png").await.unwrap(),
            vec![7, 7, 7]
        );
    }

    #[tokio::test]
    async fn test_paths_outside_bucket_are_rejected() {
        let dir = tempdir().unwrap();
        let store = FsDocumentStore::new(dir.path().join("root"));

        for path in ["../escape.png", "/etc/passwd", "", "student-ids/../../x.png"] {
            let err = store.upload(path, &photo()).await.unwrap_err();
            assert!(matches!(err, Error::DocumentStore(_)), "path {:?}", path);
        }
        assert!(!dir.path().join("escape.png").exists());
    }
}
