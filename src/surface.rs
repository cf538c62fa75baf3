//! Reconciliation between the point store and a renderable surface.
//!
//! Edits only touch `MeshPointStore`. After a batch of edits the caller runs
//! `commit`, which pushes the points into the surface, asks the surface to
//! recompute normals and bounds, and stores the fresh normals back on the points.

use crate::debug_log::{compute_normal_stats, debug_log};
use crate::geometry_builder::MeshBuffers;
use crate::mesh_points::{MeshPointStore, PointBuffers};

/// Epsilon for near-zero length checks (appropriate for f32 precision)
const NORMAL_EPSILON: f32 = 1e-6;
/// Fallback for vertices with no usable faces.
const UP: [f32; 3] = [0.0, 1.0, 0.0];

/// Capabilities a render target exposes to the reconciliation step.
pub trait MeshSurface {
    fn vertex_count(&self) -> usize;
    /// Replace the surface's vertex attributes.
    fn write_attributes(&mut self, buffers: PointBuffers);
    fn recalculate_normals(&mut self);
    fn recalculate_bounds(&mut self);
    /// Current per-vertex normals, one per vertex.
    fn normals(&self) -> &[[f32; 3]];
    /// Copy of the current attributes, e.g. to seed a `MeshPointStore`.
    fn point_buffers(&self) -> PointBuffers;
}

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Aabb {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

impl Aabb {
    /// Smallest box containing every point; a zero box at the origin if empty.
    pub fn from_points(points: &[[f32; 3]]) -> Self {
        let Some(first) = points.first() else {
            return Self::default();
        };
        let mut aabb = Self {
            min: *first,
            max: *first,
        };
        for p in &points[1..] {
            for axis in 0..3 {
                aabb.min[axis] = aabb.min[axis].min(p[axis]);
                aabb.max[axis] = aabb.max[axis].max(p[axis]);
            }
        }
        aabb
    }
}

/// Headless surface: keeps the buffers in memory and computes normals and
/// bounds itself. Used by tools and tests, and as the staging buffer for the
/// Godot mesh.
#[derive(Clone, Debug, Default)]
pub struct BufferMesh {
    attributes: PointBuffers,
    triangles: Vec<u32>,
    bounds: Aabb,
}

impl BufferMesh {
    /// Wrap freshly built geometry, with normals and bounds computed.
    pub fn new(mesh: MeshBuffers) -> Self {
        let attributes = PointBuffers {
            normals: vec![[0.0; 3]; mesh.vertices.len()],
            colors: vec![[0.0; 4]; mesh.vertices.len()],
            tangents: vec![[0.0; 4]; mesh.vertices.len()],
            positions: mesh.vertices,
            uvs: mesh.uvs,
        };
        let mut surface = Self {
            attributes,
            triangles: mesh.triangles,
            bounds: Aabb::default(),
        };
        surface.recalculate_normals();
        surface.recalculate_bounds();
        surface
    }

    pub fn attributes(&self) -> &PointBuffers {
        &self.attributes
    }

    pub fn triangles(&self) -> &[u32] {
        &self.triangles
    }

    pub fn bounds(&self) -> Aabb {
        self.bounds
    }
}

impl MeshSurface for BufferMesh {
    fn vertex_count(&self) -> usize {
        self.attributes.positions.len()
    }

    fn write_attributes(&mut self, buffers: PointBuffers) {
        self.attributes = buffers;
    }

    /// Area-weighted smooth normals. Triangles referencing missing vertices
    /// are skipped; vertices with no usable face get the up vector.
    fn recalculate_normals(&mut self) {
        let positions = &self.attributes.positions;
        let mut accumulated = vec![[0.0f32; 3]; positions.len()];

        for tri in self.triangles.chunks_exact(3) {
            let (i0, i1, i2) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            if i0 >= positions.len() || i1 >= positions.len() || i2 >= positions.len() {
                continue;
            }

            let v0 = positions[i0];
            let v1 = positions[i1];
            let v2 = positions[i2];
            let edge1 = [v1[0] - v0[0], v1[1] - v0[1], v1[2] - v0[2]];
            let edge2 = [v2[0] - v0[0], v2[1] - v0[1], v2[2] - v0[2]];

            // Cross product magnitude = 2x triangle area
            let face = cross(edge1, edge2);
            for &i in &[i0, i1, i2] {
                accumulated[i][0] += face[0];
                accumulated[i][1] += face[1];
                accumulated[i][2] += face[2];
            }
        }

        self.attributes.normals = accumulated.into_iter().map(normalize).collect();
    }

    fn recalculate_bounds(&mut self) {
        self.bounds = Aabb::from_points(&self.attributes.positions);
    }

    fn normals(&self) -> &[[f32; 3]] {
        &self.attributes.normals
    }

    fn point_buffers(&self) -> PointBuffers {
        self.attributes.clone()
    }
}

/// What a commit did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CommitReport {
    /// The store was reloaded from the surface because their lengths disagreed.
    pub resynced: bool,
    /// Points that were dirty before the flush.
    pub flushed: usize,
    /// Recomputed normals that are not unit length.
    pub degenerate_normals: usize,
}

/// Flush every pending edit into `surface` and refresh derived attributes.
///
/// After this returns no point is dirty, the surface holds every point's
/// current attributes, and each point's normal matches the surface. A store
/// whose length disagrees with the surface loses its pending edits and is
/// reloaded from the surface, so the geometry is left as it was.
pub fn commit<S: MeshSurface + ?Sized>(store: &mut MeshPointStore, surface: &mut S) -> CommitReport {
    let resynced = store.sync(surface.vertex_count());
    if resynced {
        *store = MeshPointStore::from_buffers(&surface.point_buffers());
    }
    let flushed = store.dirty_count();

    surface.write_attributes(store.flush());
    surface.recalculate_normals();
    surface.recalculate_bounds();

    let stats = compute_normal_stats(surface.normals());
    store.absorb_recomputed_normals(surface.normals());

    debug_log(&format!(
        "[commit] flushed={} resynced={} normals: min_len={:.4} max_len={:.4} degenerate={}",
        flushed, resynced, stats.min_len, stats.max_len, stats.degenerate_count
    ));

    CommitReport {
        resynced,
        flushed,
        degenerate_normals: stats.degenerate_count,
    }
}

// Vector math helpers
fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn normalize(v: [f32; 3]) -> [f32; 3] {
    let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    if len > NORMAL_EPSILON {
        [v[0] / len, v[1] / len, v[2] / len]
    } else {
        UP
    }
}
