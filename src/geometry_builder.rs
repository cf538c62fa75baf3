//! Vertex/triangle/UV buffer construction for sculptable meshes.
//!
//! Two builders:
//! - Fan triangulation over an ordered point cloud
//! - Regular grid triangulation over a heightmap
//!
//! Both are pure; attaching the buffers to a renderable is the caller's job.

use rayon::prelude::*;

use crate::error::SculptError;
use crate::height_grid::HeightSampler;

/// Raw geometry produced by the builders.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshBuffers {
    pub vertices: Vec<[f32; 3]>,
    /// Triangle index triples, flattened
    pub triangles: Vec<u32>,
    pub uvs: Vec<[f32; 2]>,
}

impl MeshBuffers {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }
}

/// Fan-triangulate an ordered point cloud around its first point.
///
/// Emits `(0, i, i + 1)` for every `i` in `1..n-1`. The points must already be
/// in an order that fans cleanly; no convexity check is done. UVs are the
/// planar `(x, z)` projection of each point.
pub fn build_from_points(points: &[[f32; 3]]) -> Result<MeshBuffers, SculptError> {
    if points.len() < 3 {
        return Err(SculptError::InsufficientPoints {
            count: points.len(),
        });
    }

    let n = points.len() as u32;
    let mut triangles = Vec::with_capacity((points.len() - 2) * 3);
    for i in 1..n - 1 {
        triangles.extend_from_slice(&[0, i, i + 1]);
    }

    let uvs = points.iter().map(|p| [p[0], p[2]]).collect();

    Ok(MeshBuffers {
        vertices: points.to_vec(),
        triangles,
        uvs,
    })
}

/// Build a regular grid mesh from a heightmap.
///
/// Texel `(x, z)` becomes vertex `z * width + x` at
/// `(x * world_size / width, sample * max_height, z * world_size / height)`.
/// Each quad is split along the `(v + 1, v + width)` diagonal. UVs are the
/// vertex x/z divided by `world_size`.
pub fn build_from_height_grid<S>(
    sampler: &S,
    max_height: f32,
    world_size: f32,
) -> Result<MeshBuffers, SculptError>
where
    S: HeightSampler + Sync,
{
    let width = sampler.width();
    let height = sampler.height();
    if width < 2 || height < 2 {
        return Err(SculptError::DegenerateGrid { width, height });
    }

    let scale_x = world_size / width as f32;
    let scale_z = world_size / height as f32;

    let vertices: Vec<[f32; 3]> = (0..width * height)
        .into_par_iter()
        .map(|i| {
            let x = i % width;
            let z = i / width;
            let y = sampler.sample(x as i32, z as i32) * max_height;
            [x as f32 * scale_x, y, z as f32 * scale_z]
        })
        .collect();

    let w = width as u32;
    let mut triangles = Vec::with_capacity((width - 1) * (height - 1) * 6);
    for z in 0..height as u32 - 1 {
        for x in 0..w - 1 {
            let v = z * w + x;
            triangles.extend_from_slice(&[v, v + w, v + 1]);
            triangles.extend_from_slice(&[v + 1, v + w, v + w + 1]);
        }
    }

    let uvs = vertices
        .iter()
        .map(|p| [p[0] / world_size, p[2] / world_size])
        .collect();

    Ok(MeshBuffers {
        vertices,
        triangles,
        uvs,
    })
}
