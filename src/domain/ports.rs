use crate::domain::model::Inspection;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;

pub trait ConfigProvider: Send + Sync {
    fn bind_addr(&self) -> String;
    fn upload_dir(&self) -> &str;
    fn max_body_bytes(&self) -> usize;
    fn sensors_enabled(&self) -> bool;
    fn sensor_interval(&self) -> Duration;
}

/// Extracts whatever information a format handler can get from a file on disk.
#[async_trait]
pub trait Inspector: Send + Sync {
    async fn inspect(&self, path: &Path) -> Result<Inspection>;
}
