//! Loading and saving the per-year documents
//!
//! One JSON resource per year, at a fixed per-planner path inside the host vault, plus
//! a markdown mirror note at the vault root. The JSON resource is authoritative; the
//! mirror is a best-effort, regenerable echo.

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config;
use crate::document::YearDocument;
use crate::mirror;
use crate::vault::VaultAdapter;

/// Reads and writes [`YearDocument`]s against a host vault
#[derive(Clone)]
pub struct YearStore {
    vault: Arc<dyn VaultAdapter>,
    planner_dir: PathBuf,
}

impl YearStore {
    /// `planner_dir` is the vault folder holding the per-year JSON resources
    /// (for example `.config/plugins/year-planner`)
    pub fn new<P: Into<PathBuf>>(vault: Arc<dyn VaultAdapter>, planner_dir: P) -> Self {
        Self { vault, planner_dir: planner_dir.into() }
    }

    pub fn vault(&self) -> &Arc<dyn VaultAdapter> {
        &self.vault
    }

    /// The path of the JSON resource for `year`
    pub fn data_path_for(&self, year: i32) -> PathBuf {
        self.planner_dir.join(format!("data-{}.json", year))
    }

    /// The path of the markdown mirror note for `year` (at the vault root)
    pub fn mirror_path_for(&self, year: i32) -> PathBuf {
        let title = config::PLANNER_TITLE.lock().unwrap().clone();
        PathBuf::from(sanitize_filename::sanitize(format!("{} {}.md", title, year)))
    }

    /// Load the document for `year`.
    ///
    /// This never fails the caller: a missing resource, an unreadable file or invalid
    /// JSON all log a warning and yield a fresh default document.
    pub async fn load(&self, year: i32) -> YearDocument {
        let path = self.data_path_for(year);
        if self.vault.exists(&path).await {
            match self.vault.read(&path).await {
                Ok(raw) => match serde_json::from_str::<YearDocument>(&raw) {
                    Ok(doc) => return doc,
                    Err(err) => log::warn!("Invalid document {:?}: {}. Using a default document", path, err),
                },
                Err(err) => log::warn!("Unable to read {:?}: {}. Using a default document", path, err),
            }
        }
        YearDocument::new(year)
    }

    /// Persist the document.
    ///
    /// The canonical JSON is written first and is the authoritative copy: its failure is
    /// the failure of the whole save. The markdown mirror is then rewritten best-effort;
    /// a mirror failure is logged and swallowed.
    pub async fn save(&self, doc: &YearDocument) -> Result<(), Box<dyn Error>> {
        self.vault.mkdir(&self.planner_dir).await?;
        let json = serde_json::to_string_pretty(doc)?;
        self.vault.write(&self.data_path_for(doc.year()), &json).await?;

        if let Err(err) = self.write_mirror(doc).await {
            log::warn!("Unable to write the markdown mirror: {}", err);
        }
        Ok(())
    }

    /// (Re)generate the markdown mirror note of this document
    pub async fn write_mirror(&self, doc: &YearDocument) -> Result<(), Box<dyn Error>> {
        let content = mirror::to_markdown(doc)?;
        self.vault.write(&self.mirror_path_for(doc.year()), &content).await
    }
}
