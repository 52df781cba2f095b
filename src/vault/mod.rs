//! The virtual filesystem the host application owns
//!
//! The planner never touches storage directly: every read and write goes through a
//! [`VaultAdapter`], so the host can back it with whatever it likes (a folder on disk,
//! its own note database, an in-memory map in tests...).
//!
//! Reads and writes are suspend points, not blocking calls: a slow backend must not
//! freeze the UI thread the planner runs on.

pub mod memory;
pub use memory::MemoryVault;

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

#[async_trait]
pub trait VaultAdapter: Send + Sync {
    /// Whether a file exists at this path
    async fn exists(&self, path: &Path) -> bool;
    /// Read the whole file as UTF-8 text
    async fn read(&self, path: &Path) -> Result<String, Box<dyn Error>>;
    /// Create the file, or overwrite it if it already exists
    async fn write(&self, path: &Path, content: &str) -> Result<(), Box<dyn Error>>;
    /// Create this folder (and its missing parents)
    async fn mkdir(&self, path: &Path) -> Result<(), Box<dyn Error>>;
}

/// A vault rooted at a real directory on disk
#[derive(Debug)]
pub struct FsVault {
    root: PathBuf,
}

impl FsVault {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }
}

#[async_trait]
impl VaultAdapter for FsVault {
    async fn exists(&self, path: &Path) -> bool {
        self.resolve(path).exists()
    }

    async fn read(&self, path: &Path) -> Result<String, Box<dyn Error>> {
        fs::read_to_string(self.resolve(path))
            .map_err(|err| format!("Unable to read {:?}: {}", path, err).into())
    }

    async fn write(&self, path: &Path, content: &str) -> Result<(), Box<dyn Error>> {
        fs::write(self.resolve(path), content)
            .map_err(|err| format!("Unable to write {:?}: {}", path, err).into())
    }

    async fn mkdir(&self, path: &Path) -> Result<(), Box<dyn Error>> {
        fs::create_dir_all(self.resolve(path))
            .map_err(|err| format!("Unable to create folder {:?}: {}", path, err).into())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fs_vault_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let vault = FsVault::new(dir.path());

        let path = Path::new("notes/some note.md");
        assert!(!vault.exists(path).await);
        assert!(vault.read(path).await.is_err());

        vault.mkdir(Path::new("notes")).await.unwrap();
        vault.write(path, "hello").await.unwrap();
        assert!(vault.exists(path).await);
        assert_eq!(vault.read(path).await.unwrap(), "hello");
    }
}
