//! On-disk storage for uploaded document files.
//!
//! Files are kept flat under one root directory, named by the random
//! stored name generated at upload. Names that could escape the root are
//! refused before any filesystem call.

use std::io;
use std::path::{Path, PathBuf};

use sitebook_core::documents::is_safe_stored_name;

#[derive(Debug, Clone)]
pub struct DocumentStore {
    root: PathBuf,
}

impl DocumentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the root directory if it does not exist.
    pub async fn ensure_root(&self) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.root).await
    }

    /// Absolute path of a stored file.
    pub fn path_for(&self, stored_name: &str) -> io::Result<PathBuf> {
        if !is_safe_stored_name(stored_name) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("refusing unsafe stored name '{stored_name}'"),
            ));
        }
        Ok(self.root.join(stored_name))
    }

    /// Write `bytes` under `stored_name`. Fails if the name is already taken.
    pub async fn save(&self, stored_name: &str, bytes: &[u8]) -> io::Result<()> {
        use tokio::io::AsyncWriteExt;

        let path = self.path_for(stored_name)?;
        self.ensure_root().await?;
        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        Ok(())
    }

    /// Open a stored file for streaming. Returns the file and its length.
    pub async fn open(&self, stored_name: &str) -> io::Result<(tokio::fs::File, u64)> {
        let path = self.path_for(stored_name)?;
        let file = tokio::fs::File::open(&path).await?;
        let len = file.metadata().await?.len();
        Ok((file, len))
    }

    pub async fn exists(&self, stored_name: &str) -> bool {
        match self.path_for(stored_name) {
            Ok(path) => tokio::fs::try_exists(path).await.unwrap_or(false),
            Err(_) => false,
        }
    }

    /// Delete a stored file. A file that is already gone counts as removed.
    pub async fn remove(&self, stored_name: &str) -> io::Result<()> {
        let path = self.path_for(stored_name)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Delete a stored file, logging instead of failing. Used after the
    /// database change has already been committed.
    pub async fn remove_logged(&self, stored_name: &str) {
        if let Err(e) = self.remove(stored_name).await {
            tracing::warn!(stored_name, error = %e, "Failed to delete stored document file");
        }
    }
}
