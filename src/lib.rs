pub mod adapters;
pub mod api;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::storage::UploadDir;
pub use api::{router, AppState};
pub use config::TomlConfig;
pub use core::inspector::inspect_file;
pub use domain::model::{GeometryResult, Inspection, SensorSnapshot, StubResult};
pub use utils::error::{CadError, Result};
