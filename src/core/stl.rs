//! STL loading into an indexed mesh.
//!
//! Both ASCII and binary STL are accepted. Binary layout:
//!
//! ```text
//! UINT8[80]    – header (ignored)
//! UINT32       – triangle count
//! foreach triangle
//!     REAL32[3] – normal (ignored)
//!     REAL32[3] – vertex 1
//!     REAL32[3] – vertex 2
//!     REAL32[3] – vertex 3
//!     UINT16    – attribute byte count (ignored)
//! end
//! ```
//!
//! STL stores every triangle with its own copy of each corner, so coincident
//! corners are welded afterwards and faces are rewritten to reference the
//! shared vertex list.

use crate::domain::model::IndexedMesh;
use crate::utils::error::{CadError, Result};
use std::collections::HashMap;
use std::path::Path;

const HEADER_SIZE: usize = 80;
const TRIANGLE_SIZE: usize = 50;

/// Coordinates closer than this collapse into one vertex when welding.
const MERGE_TOLERANCE: f64 = 1e-8;

pub fn load_stl<P: AsRef<Path>>(path: P) -> Result<IndexedMesh> {
    let data = std::fs::read(path)?;
    parse_stl(&data)
}

pub fn parse_stl(data: &[u8]) -> Result<IndexedMesh> {
    let soup = if looks_binary(data) {
        parse_binary(data)?
    } else if is_ascii_solid(data) {
        parse_ascii(data)?
    } else if data.len() < 15 {
        return Err(CadError::invalid_stl("file too small to be valid STL"));
    } else {
        parse_binary(data)?
    };

    Ok(weld(&soup))
}

/// Binary when the declared triangle count matches the file length exactly.
fn looks_binary(data: &[u8]) -> bool {
    if data.len() < HEADER_SIZE + 4 {
        return false;
    }
    let count = read_u32(&data[HEADER_SIZE..HEADER_SIZE + 4]) as usize;
    count
        .checked_mul(TRIANGLE_SIZE)
        .and_then(|body| body.checked_add(HEADER_SIZE + 4))
        == Some(data.len())
}

fn is_ascii_solid(data: &[u8]) -> bool {
    let head = &data[..data.len().min(HEADER_SIZE)];
    String::from_utf8_lossy(head)
        .trim_start()
        .to_ascii_lowercase()
        .starts_with("solid")
}

fn read_u32(buf: &[u8]) -> u32 {
    u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]])
}

fn read_vertex(buf: &[u8]) -> [f64; 3] {
    let x = f32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]);
    let y = f32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]);
    let z = f32::from_le_bytes([buf[8], buf[9], buf[10], buf[11]]);
    [f64::from(x), f64::from(y), f64::from(z)]
}

fn parse_binary(data: &[u8]) -> Result<Vec<[[f64; 3]; 3]>> {
    if data.len() < HEADER_SIZE + 4 {
        return Err(CadError::invalid_stl(format!(
            "binary header needs {} bytes, got {}",
            HEADER_SIZE + 4,
            data.len()
        )));
    }

    let count = read_u32(&data[HEADER_SIZE..HEADER_SIZE + 4]);
    let body = &data[HEADER_SIZE + 4..];
    let available = body.len() / TRIANGLE_SIZE;
    if available < count as usize {
        return Err(CadError::TruncatedStl {
            expected: count,
            got: available as u32,
        });
    }

    let triangles = body
        .chunks_exact(TRIANGLE_SIZE)
        .take(count as usize)
        .map(|tri| {
            // 跳過法向量 (前 12 bytes)
            [
                read_vertex(&tri[12..24]),
                read_vertex(&tri[24..36]),
                read_vertex(&tri[36..48]),
            ]
        })
        .collect();

    Ok(triangles)
}

fn parse_ascii(data: &[u8]) -> Result<Vec<[[f64; 3]; 3]>> {
    let text = String::from_utf8_lossy(data);
    let mut triangles = Vec::new();
    let mut corners: Vec<[f64; 3]> = Vec::with_capacity(3);
    let mut in_loop = false;

    for (line_no, line) in text.lines().enumerate() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some(keyword) = parts.first() else {
            continue;
        };

        match keyword.to_ascii_lowercase().as_str() {
            "outer" => {
                in_loop = true;
                corners.clear();
            }
            "vertex" if in_loop => {
                if parts.len() < 4 {
                    return Err(CadError::invalid_stl(format!(
                        "line {}: vertex needs three coordinates",
                        line_no + 1
                    )));
                }
                let mut point = [0.0; 3];
                for (slot, raw) in point.iter_mut().zip(&parts[1..4]) {
                    *slot = raw.parse().map_err(|_| {
                        CadError::invalid_stl(format!(
                            "line {}: '{}' is not a number",
                            line_no + 1,
                            raw
                        ))
                    })?;
                }
                corners.push(point);
            }
            "endloop" => in_loop = false,
            "endfacet" => {
                if corners.len() != 3 {
                    return Err(CadError::invalid_stl(format!(
                        "line {}: facet has {} vertices, expected 3",
                        line_no + 1,
                        corners.len()
                    )));
                }
                triangles.push([corners[0], corners[1], corners[2]]);
                corners.clear();
            }
            "endsolid" => break,
            _ => {}
        }
    }

    Ok(triangles)
}

/// Weld key for a corner: each coordinate rounded to the merge grid, compared by bit pattern.
fn quantize(point: &[f64; 3]) -> (u64, u64, u64) {
    let q = |v: f64| {
        let snapped = (v / MERGE_TOLERANCE).round() * MERGE_TOLERANCE;
        // -0.0 + 0.0 == +0.0, so both zeros share a key
        (snapped + 0.0).to_bits()
    };
    (q(point[0]), q(point[1]), q(point[2]))
}

fn is_finite(triangle: &[[f64; 3]; 3]) -> bool {
    triangle.iter().flatten().all(|v| v.is_finite())
}

/// Merge coincident corners, keeping first-occurrence order.
///
/// Triangles with a NaN or infinite coordinate are dropped first.
fn weld(triangles: &[[[f64; 3]; 3]]) -> IndexedMesh {
    let mut index_of: HashMap<(u64, u64, u64), u32> = HashMap::new();
    let mut mesh = IndexedMesh {
        vertices: Vec::new(),
        faces: Vec::with_capacity(triangles.len()),
    };

    let mut dropped = 0usize;
    for triangle in triangles {
        if !is_finite(triangle) {
            dropped += 1;
            continue;
        }

        let mut face = [0u32; 3];
        for (slot, corner) in face.iter_mut().zip(triangle) {
            *slot = *index_of.entry(quantize(corner)).or_insert_with(|| {
                mesh.vertices.push(*corner);
                (mesh.vertices.len() - 1) as u32
            });
        }
        mesh.faces.push(face);
    }

    if dropped > 0 {
        tracing::warn!("Dropped {} STL triangles with non-finite coordinates", dropped);
    }

    mesh
}
