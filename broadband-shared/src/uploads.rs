/// Upload storage for task attachments
///
/// Engineers may attach a site photo and a supporting document when filing
/// an installation task. Files land under `<root>/<category>/<uuid><ext>`
/// and the returned path is stored on the task as an opaque string.
///
/// # Rules
///
/// - Extension must be one of `.jpg`, `.jpeg`, `.png`, `.pdf`
///   (case-insensitive)
/// - Size must not exceed the configured maximum (2 MB by default)
///
/// # Example
///
/// ```no_run
/// use broadband_shared::uploads::{UploadCategory, UploadStorage};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let storage = UploadStorage::new("uploads");
/// let path = storage
///     .save(UploadCategory::Photos, "site.JPG", b"...")
///     .await?;
/// assert!(path.starts_with("uploads/photos/"));
/// # Ok(())
/// # }
/// ```

use std::path::{Path, PathBuf};

use tracing::{debug, info};
use uuid::Uuid;

/// Extensions accepted for upload
pub const ALLOWED_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".pdf"];

/// Default per-file size limit: 2 MB
pub const DEFAULT_MAX_FILE_SIZE: usize = 2 * 1024 * 1024;

/// Error type for upload operations
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// Upload arrived without a filename
    #[error("File has no name")]
    MissingFilename,

    /// Extension not in [`ALLOWED_EXTENSIONS`]
    #[error("Invalid file type '{0}'. Allowed: .jpg, .jpeg, .png, .pdf")]
    UnsupportedExtension(String),

    /// File exceeds the size limit
    #[error("File is {size} bytes; the limit is {max} bytes")]
    TooLarge { size: usize, max: usize },

    /// Writing to disk failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Subdirectory an upload is filed under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadCategory {
    Photos,
    Documents,
}

impl UploadCategory {
    pub fn as_dir(&self) -> &'static str {
        match self {
            UploadCategory::Photos => "photos",
            UploadCategory::Documents => "documents",
        }
    }
}

/// Local-disk upload storage
#[derive(Debug, Clone)]
pub struct UploadStorage {
    root: PathBuf,
    max_file_size: usize,
}

impl UploadStorage {
    /// Storage under `root` with the default size limit
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_max_file_size(root, DEFAULT_MAX_FILE_SIZE)
    }

    pub fn with_max_file_size(root: impl Into<PathBuf>, max_file_size: usize) -> Self {
        Self {
            root: root.into(),
            max_file_size,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn max_file_size(&self) -> usize {
        self.max_file_size
    }

    /// Checks name and size without touching the disk
    ///
    /// Returns the normalized (lowercase) extension on success.
    pub fn validate(&self, filename: &str, size: usize) -> Result<String, UploadError> {
        if filename.trim().is_empty() {
            return Err(UploadError::MissingFilename);
        }

        let ext = extension_of(filename)
            .filter(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
            .ok_or_else(|| {
                UploadError::UnsupportedExtension(extension_of(filename).unwrap_or_default())
            })?;

        if size > self.max_file_size {
            return Err(UploadError::TooLarge {
                size,
                max: self.max_file_size,
            });
        }

        Ok(ext)
    }

    /// Validates and writes a file, returning its storage path
    pub async fn save(
        &self,
        category: UploadCategory,
        filename: &str,
        contents: &[u8],
    ) -> Result<String, UploadError> {
        let ext = self.validate(filename, contents.len())?;

        let dir = self.root.join(category.as_dir());
        tokio::fs::create_dir_all(&dir).await?;

        let path = dir.join(format!("{}{}", Uuid::new_v4(), ext));
        tokio::fs::write(&path, contents).await?;

        let stored = path.to_string_lossy().into_owned();
        info!(path = %stored, bytes = contents.len(), "Stored upload");
        Ok(stored)
    }

    /// Removes a stored file
    ///
    /// Failures, including a missing file, are ignored.
    pub async fn delete(&self, path: &str) {
        if let Err(e) = tokio::fs::remove_file(path).await {
            debug!(path, error = %e, "Ignoring upload deletion failure");
        }
    }
}

/// Lowercased extension with its leading dot, e.g. `".jpg"`
fn extension_of(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_root() -> PathBuf {
        std::env::temp_dir().join(format!("broadband-uploads-{}", Uuid::new_v4()))
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("site.JPG"), Some(".jpg".to_string()));
        assert_eq!(extension_of("archive.tar.pdf"), Some(".pdf".to_string()));
        assert_eq!(extension_of("README"), None);
    }

    #[test]
    fn test_validate_allow_list() {
        let storage = UploadStorage::new("unused");

        for name in ["a.jpg", "b.JPEG", "c.png", "d.Pdf"] {
            assert!(storage.validate(name, 10).is_ok(), "{} should be allowed", name);
        }

        assert!(matches!(
            storage.validate("payload.exe", 10),
            Err(UploadError::UnsupportedExtension(ext)) if ext == ".exe"
        ));
        assert!(matches!(
            storage.validate("noext", 10),
            Err(UploadError::UnsupportedExtension(_))
        ));
        assert!(matches!(storage.validate("", 10), Err(UploadError::MissingFilename)));
    }

    #[test]
    fn test_validate_size_limit() {
        let storage = UploadStorage::with_max_file_size("unused", 4);

        assert!(storage.validate("ok.png", 4).is_ok());
        assert!(matches!(
            storage.validate("big.png", 5),
            Err(UploadError::TooLarge { size: 5, max: 4 })
        ));
    }

    #[tokio::test]
    async fn test_save_and_delete() {
        let root = temp_root();
        let storage = UploadStorage::new(&root);

        let path = storage
            .save(UploadCategory::Documents, "kyc.PDF", b"%PDF-1.4")
            .await
            .unwrap();

        assert!(path.ends_with(".pdf"));
        assert!(Path::new(&path).starts_with(root.join("documents")));
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"%PDF-1.4");

        storage.delete(&path).await;
        assert!(!Path::new(&path).exists());

        // Deleting again is silently ignored
        storage.delete(&path).await;

        let _ = tokio::fs::remove_dir_all(&root).await;
    }

    #[tokio::test]
    async fn test_rejected_upload_writes_nothing() {
        let root = temp_root();
        let storage = UploadStorage::new(&root);

        let result = storage.save(UploadCategory::Photos, "script.sh", b"#!/bin/sh").await;
        assert!(result.is_err());
        assert!(!root.exists());
    }
}
