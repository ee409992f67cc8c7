use crate::adapters::storage::UploadDir;
use crate::core::result_store::ResultStore;
use crate::core::sensors::SensorFeed;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Shared state for all handlers
pub struct AppState {
    pub uploads: UploadDir,
    pub results: ResultStore,

    // None when the simulator is disabled
    pub sensors: Option<SensorFeed>,

    pub max_body_bytes: usize,
}

impl AppState {
    pub fn new(uploads: UploadDir, sensors: Option<SensorFeed>, max_body_bytes: usize) -> Arc<Self> {
        Arc::new(Self {
            uploads,
            results: ResultStore::new(),
            sensors,
            max_body_bytes,
        })
    }

    /// Build state from config. Starts the sensor task, so this must run
    /// inside a tokio runtime.
    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<(Arc<Self>, Option<JoinHandle<()>>)> {
        let uploads = UploadDir::open(config.upload_dir())?;
        tracing::info!("📁 Upload directory: {}", uploads.root().display());

        let (sensors, handle) = if config.sensors_enabled() {
            let (feed, handle) = SensorFeed::spawn(config.sensor_interval());
            tracing::info!(
                "🌡️ Sensor simulator started (interval {:?})",
                config.sensor_interval()
            );
            (Some(feed), Some(handle))
        } else {
            tracing::info!("Sensor simulator disabled");
            (None, None)
        };

        Ok((Self::new(uploads, sensors, config.max_body_bytes()), handle))
    }
}
