pub mod geometry;
pub mod inspector;
pub mod result_store;
pub mod sensors;
pub mod stl;

pub use crate::domain::model::{CadFormat, GeometryResult, IndexedMesh, Inspection, StubResult};
pub use crate::domain::ports::{ConfigProvider, Inspector};
pub use crate::utils::error::Result;
