use crate::core::stl;
use crate::domain::model::{CadFormat, GeometryResult, Inspection, StubResult};
use crate::domain::ports::Inspector;
use crate::utils::error::{CadError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

pub struct StlInspector;

#[async_trait]
impl Inspector for StlInspector {
    async fn inspect(&self, path: &Path) -> Result<Inspection> {
        let path: PathBuf = path.to_path_buf();

        // 解析放到 blocking thread，避免卡住 runtime
        let mesh = tokio::task::spawn_blocking(move || stl::load_stl(&path))
            .await
            .map_err(|e| CadError::TaskError {
                message: e.to_string(),
            })??;

        tracing::debug!(
            "STL loaded: {} vertices, {} faces",
            mesh.vertices.len(),
            mesh.faces.len()
        );

        Ok(Inspection::Geometry(GeometryResult::from_mesh(mesh)))
    }
}

/// Placeholder for B-rep formats: always reports a failed read and never
/// opens the file.
pub struct StubInspector {
    format: CadFormat,
}

impl StubInspector {
    pub fn new(format: CadFormat) -> Self {
        Self { format }
    }
}

#[async_trait]
impl Inspector for StubInspector {
    async fn inspect(&self, _path: &Path) -> Result<Inspection> {
        tracing::warn!("{} geometry extraction is not implemented", self.format.label());
        Ok(Inspection::Unsupported(StubResult::not_implemented(
            self.format,
        )))
    }
}

pub fn inspector_for(format: CadFormat) -> Box<dyn Inspector> {
    match format {
        CadFormat::Stl => Box::new(StlInspector),
        CadFormat::Step | CadFormat::Iges => Box::new(StubInspector::new(format)),
    }
}

/// Route a file to its handler by the extension of `filename`.
pub async fn inspect_file(path: &Path, filename: &str) -> Result<Inspection> {
    let extension = crate::utils::validation::file_extension(filename).unwrap_or_default();
    let format =
        CadFormat::from_extension(&extension).ok_or(CadError::UnsupportedFormat { extension })?;

    inspector_for(format).inspect(path).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_step_stub_ignores_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("does-not-exist.step");

        let result = inspect_file(&path, "part.STEP").await.unwrap();
        assert_eq!(
            result,
            Inspection::Unsupported(StubResult {
                file_type: "STEP".to_string(),
                status: "failed".to_string(),
                message: "Error reading STEP file".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_iges_stub() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("x.igs");
        std::fs::write(&path, b"anything at all").unwrap();

        let result = inspect_file(&path, "x.igs").await.unwrap();
        assert!(result.is_unsupported());
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["file_type"], "IGES");
        assert_eq!(json["message"], "Error reading IGES file");
    }

    #[tokio::test]
    async fn test_stl_load_error_propagates() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.stl");
        std::fs::write(&path, b"not an stl").unwrap();

        let err = inspect_file(&path, "broken.stl").await.unwrap_err();
        assert!(err.is_input_error());
    }

    #[tokio::test]
    async fn test_unknown_extension() {
        let dir = TempDir::new().unwrap();
        let err = inspect_file(dir.path(), "model.obj").await.unwrap_err();
        assert!(matches!(err, CadError::UnsupportedFormat { .. }));
    }
}
