use crate::utils::error::{CadError, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Directory where uploads live while they are being inspected.
#[derive(Debug, Clone)]
pub struct UploadDir {
    root: PathBuf,
}

impl UploadDir {
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write `data` to a fresh file whose name ends in `-{sanitized_name}`.
    ///
    /// `sanitized_name` must already be a single safe path component.
    pub async fn stage(&self, sanitized_name: &str, data: bytes::Bytes) -> Result<StagedUpload> {
        let root = self.root.clone();
        let suffix = format!("-{}", sanitized_name);

        tokio::task::spawn_blocking(move || -> Result<StagedUpload> {
            let mut file = tempfile::Builder::new()
                .prefix("upload-")
                .suffix(&suffix)
                .tempfile_in(&root)?;
            file.write_all(&data)?;
            file.flush()?;
            Ok(StagedUpload { file })
        })
        .await
        .map_err(|e| CadError::TaskError {
            message: e.to_string(),
        })?
    }
}

/// An uploaded file on disk. Removed when dropped.
#[derive(Debug)]
pub struct StagedUpload {
    file: NamedTempFile,
}

impl StagedUpload {
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Remove the file now and report failures instead of swallowing them in `Drop`.
    pub async fn discard(self) {
        let path = self.file.path().to_path_buf();
        let file = self.file;

        match tokio::task::spawn_blocking(move || file.close()).await {
            Ok(Ok(())) => tracing::debug!("🧹 Removed staged upload {}", path.display()),
            Ok(Err(e)) => tracing::warn!("Failed to remove staged upload {}: {}", path.display(), e),
            Err(e) => tracing::warn!("Cleanup task for {} failed: {}", path.display(), e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_creates_directory() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("a/b/uploads");
        let dir = UploadDir::open(&nested).unwrap();
        assert!(dir.root().is_dir());
    }

    #[tokio::test]
    async fn test_stage_and_discard() {
        let temp = TempDir::new().unwrap();
        let dir = UploadDir::open(temp.path()).unwrap();

        let staged = dir
            .stage("part.stl", bytes::Bytes::from_static(b"solid x\nendsolid x\n"))
            .await
            .unwrap();
        let path = staged.path().to_path_buf();
        assert!(path.exists());
        assert_eq!(path.parent().unwrap(), temp.path());
        assert!(path.file_name().unwrap().to_str().unwrap().ends_with("-part.stl"));

        staged.discard().await;
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_discard_many_empties_directory() {
        let temp = TempDir::new().unwrap();
        let dir = UploadDir::open(temp.path()).unwrap();

        let mut staged = Vec::new();
        for i in 0..5 {
            let name = format!("part{}.stl", i);
            staged.push(dir.stage(&name, bytes::Bytes::from_static(b"x")).await.unwrap());
        }
        assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 5);

        for upload in staged {
            upload.discard().await;
        }
        assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_drop_removes_file() {
        let temp = TempDir::new().unwrap();
        let dir = UploadDir::open(temp.path()).unwrap();

        let path = {
            let staged = dir.stage("a.igs", bytes::Bytes::from_static(b"x")).await.unwrap();
            staged.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_same_name_does_not_collide() {
        let temp = TempDir::new().unwrap();
        let dir = UploadDir::open(temp.path()).unwrap();

        let first = dir.stage("same.stl", bytes::Bytes::from_static(b"1")).await.unwrap();
        let second = dir.stage("same.stl", bytes::Bytes::from_static(b"2")).await.unwrap();
        assert_ne!(first.path(), second.path());
        assert_eq!(std::fs::read(first.path()).unwrap(), b"1");
        assert_eq!(std::fs::read(second.path()).unwrap(), b"2");
    }
}
