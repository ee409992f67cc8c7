use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// CAD formats the upload endpoint knows how to route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CadFormat {
    Stl,
    Step,
    Iges,
}

impl CadFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "stl" => Some(CadFormat::Stl),
            "stp" | "step" => Some(CadFormat::Step),
            "igs" | "iges" => Some(CadFormat::Iges),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CadFormat::Stl => "STL",
            CadFormat::Step => "STEP",
            CadFormat::Iges => "IGES",
        }
    }
}

/// Indexed triangle mesh as produced by the STL loader.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexedMesh {
    pub vertices: Vec<[f64; 3]>,
    pub faces: Vec<[u32; 3]>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryResult {
    pub vertices: Vec<[f64; 3]>,
    pub faces: Vec<[u32; 3]>,
    pub edges: Vec<[u32; 2]>,
}

/// Fixed answer for formats whose geometry is not extracted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StubResult {
    pub file_type: String,
    pub status: String,
    pub message: String,
}

impl StubResult {
    pub fn not_implemented(format: CadFormat) -> Self {
        Self {
            file_type: format.label().to_string(),
            status: "failed".to_string(),
            message: format!("Error reading {} file", format.label()),
        }
    }
}

/// Outcome of inspecting one uploaded file.
///
/// Serialized untagged, so the wire shape is either the geometry object or
/// the stub record; callers in Rust can still tell them apart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Inspection {
    Geometry(GeometryResult),
    Unsupported(StubResult),
}

impl Inspection {
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Inspection::Unsupported(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    pub temperature: f64,
    pub pressure: f64,
    pub stress: f64,
}

/// Body of `GET /api/sensors`; field order is the wire order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorSnapshot {
    pub timestamp: String,
    pub temperature: f64,
    pub pressure: f64,
    pub stress: f64,
}

impl SensorSnapshot {
    pub fn at(reading: SensorReading, now: DateTime<Utc>) -> Self {
        Self {
            timestamp: now.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            temperature: reading.temperature,
            pressure: reading.pressure,
            stress: reading.stress,
        }
    }
}
