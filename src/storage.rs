use std::fs::File;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::fs;

/// Disk-backed blob store for published photos. Keys are deterministic per
/// photo id, and the public URL namespace mirrors the on-disk layout so a
/// static file service can answer `GET /photos/{key}` directly.
pub struct PhotoStorage {
    photos_dir: PathBuf,
    public_base_url: String,
}

impl PhotoStorage {
    pub fn new(root: impl Into<PathBuf>, public_base_url: String) -> Self {
        let photos_dir = root.into().join("photos");
        std::fs::create_dir_all(&photos_dir).expect("Failed to create the photo storage folder");

        Self {
            photos_dir,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn photos_dir(&self) -> &Path {
        &self.photos_dir
    }

    /// Blob key for a photo id. Deterministic, so a key must never be
    /// written twice; uploads enforce id uniqueness before persisting.
    pub fn object_key(id: &str) -> String {
        format!("{id}.jpg")
    }

    pub fn public_url(&self, key: &str) -> String {
        format!("{}/photos/{key}", self.public_base_url)
    }

    pub fn resolve(&self, key: &str) -> PathBuf {
        self.photos_dir.join(key)
    }

    pub fn exists(&self, key: &str) -> bool {
        self.resolve(key).exists()
    }
}

/// An upload staged in a temporary file, not yet visible in storage.
pub struct WrittenFile {
    temp_file: NamedTempFile,
    pub size: usize,
}

impl WrittenFile {
    pub fn new() -> std::io::Result<Self> {
        Ok(Self {
            temp_file: NamedTempFile::new()?,
            size: 0,
        })
    }

    pub fn as_file_mut(&mut self) -> &mut File {
        self.temp_file.as_file_mut()
    }

    /// Moves the temporary file to the target path, handling cross-device scenarios
    pub async fn persist_to(self, target_path: &Path) -> std::io::Result<()> {
        // First, try the fast path (rename)
        match self.temp_file.persist(target_path) {
            Ok(_) => Ok(()),
            Err(tempfile::PersistError { error, file }) => {
                // If persist failed due to a cross-device link, fall back to copy and delete
                if error.raw_os_error() == Some(18) {
                    // EXDEV: Cross-device link
                    fs::copy(file.path(), target_path).await?;
                    // The temporary file will be automatically cleaned up when dropped
                    Ok(())
                } else {
                    Err(error)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn test_storage(dir: &tempfile::TempDir) -> PhotoStorage {
        PhotoStorage::new(dir.path(), "http://localhost:8080/".to_string())
    }

    #[test]
    fn keys_and_urls_are_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        let storage = test_storage(&dir);

        let key = PhotoStorage::object_key("card-42");
        assert_eq!(key, "card-42.jpg");
        assert_eq!(
            storage.public_url(&key),
            "http://localhost:8080/photos/card-42.jpg"
        );
    }

    #[tokio::test]
    async fn staged_file_becomes_visible_on_persist() {
        let dir = tempfile::tempdir().unwrap();
        let storage = test_storage(&dir);

        let mut file = WrittenFile::new().unwrap();
        file.as_file_mut().write_all(b"jpeg bytes").unwrap();
        file.size = 10;

        let key = PhotoStorage::object_key("abc");
        assert!(!storage.exists(&key));

        file.persist_to(&storage.resolve(&key)).await.unwrap();
        assert!(storage.exists(&key));
    }
}
