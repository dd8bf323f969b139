use std::fs;
use std::path::{Path, PathBuf};

use crate::error::AppError;

/// File-backed store holding one extracted-text document per user.
///
/// A re-upload replaces the previous document wholesale; readers only ever
/// see a complete file because writes go through a tmp file + rename.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    root: PathBuf,
}

impl DocumentStore {
    pub fn open(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        self.root.as_path()
    }

    fn documents_dir(&self) -> PathBuf {
        self.root.join("documents")
    }

    fn document_path(&self, user_id: i64) -> PathBuf {
        self.documents_dir().join(format!("{user_id}.txt"))
    }

    pub fn ensure_dirs(&self) -> Result<(), AppError> {
        fs::create_dir_all(self.documents_dir()).map_err(|e| {
            AppError::new(
                "DOC_STORE_FAILED",
                "Failed to create document store directory",
            )
            .with_details(format!("path={}; err={}", self.documents_dir().display(), e))
        })
    }

    pub fn save_text(&self, user_id: i64, text: &str) -> Result<(), AppError> {
        self.ensure_dirs()?;
        let path = self.document_path(user_id);
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, text.as_bytes()).map_err(|e| {
            AppError::new("DOC_STORE_FAILED", "Failed to write document text")
                .with_details(format!("path={}; err={}", tmp.display(), e))
        })?;
        fs::rename(&tmp, &path).map_err(|e| {
            AppError::new("DOC_STORE_FAILED", "Failed to finalize document text write")
                .with_details(format!("tmp={}; dest={}; err={}", tmp.display(), path.display(), e))
        })?;
        Ok(())
    }

    /// Returns the stored document text, or None when the user has not
    /// uploaded anything yet.
    pub fn load_text(&self, user_id: i64) -> Result<Option<String>, AppError> {
        let path = self.document_path(user_id);
        if !path.exists() {
            return Ok(None);
        }
        fs::read_to_string(&path)
            .map(Some)
            .map_err(|e| {
                AppError::new("DOC_STORE_FAILED", "Failed to read document text")
                    .with_details(format!("path={}; err={}", path.display(), e))
            })
    }
}
