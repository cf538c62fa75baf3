//! Per-vertex attribute storage with change tracking.
//!
//! `MeshPointStore` is the editable source of truth for a mesh; the render
//! buffers are a derived cache. Point `i` always corresponds to vertex `i`.
//!
//! Every attribute write goes through a `MeshPoint` setter, which marks the
//! point dirty. Only `MeshPointStore::flush` clears dirty flags, after it has
//! copied all five attributes out.

use crate::debug_log::debug_log;
use crate::geometry_builder::MeshBuffers;

/// One mesh vertex and its render attributes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshPoint {
    position: [f32; 3],
    normal: [f32; 3],
    uv: [f32; 2],
    color: [f32; 4],
    tangent: [f32; 4],
    dirty: bool,
}

impl MeshPoint {
    pub fn position(&self) -> [f32; 3] {
        self.position
    }

    pub fn x(&self) -> f32 {
        self.position[0]
    }

    pub fn y(&self) -> f32 {
        self.position[1]
    }

    pub fn z(&self) -> f32 {
        self.position[2]
    }

    /// Last known surface normal. Refreshed on commit, so it can lag behind
    /// edits made since.
    pub fn normal(&self) -> [f32; 3] {
        self.normal
    }

    pub fn uv(&self) -> [f32; 2] {
        self.uv
    }

    pub fn color(&self) -> [f32; 4] {
        self.color
    }

    pub fn tangent(&self) -> [f32; 4] {
        self.tangent
    }

    /// True while the buffer-resident copy of this point is stale.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn set_x(&mut self, x: f32) {
        self.position[0] = x;
        self.dirty = true;
    }

    pub fn set_y(&mut self, y: f32) {
        self.position[1] = y;
        self.dirty = true;
    }

    pub fn set_z(&mut self, z: f32) {
        self.position[2] = z;
        self.dirty = true;
    }

    /// Set a single axis (0 = x, 1 = y, 2 = z). Any other axis is ignored
    /// and leaves the point clean.
    pub(crate) fn set_axis(&mut self, axis: usize, value: f32) {
        if let Some(slot) = self.position.get_mut(axis) {
            *slot = value;
            self.dirty = true;
        }
    }

    pub fn set_position(&mut self, position: [f32; 3]) {
        self.position = position;
        self.dirty = true;
    }

    pub fn set_normal(&mut self, normal: [f32; 3]) {
        self.normal = normal;
        self.dirty = true;
    }

    pub fn set_uv(&mut self, uv: [f32; 2]) {
        self.uv = uv;
        self.dirty = true;
    }

    pub fn set_color(&mut self, color: [f32; 4]) {
        self.color = color;
        self.dirty = true;
    }

    pub fn set_tangent(&mut self, tangent: [f32; 4]) {
        self.tangent = tangent;
        self.dirty = true;
    }
}

/// Flat per-attribute buffers, indexed by vertex.
///
/// As input, any attribute buffer may be empty or shorter than `positions`;
/// missing entries default to zero. As flush output, every buffer has one
/// entry per vertex.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointBuffers {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub colors: Vec<[f32; 4]>,
    pub tangents: Vec<[f32; 4]>,
}

impl PointBuffers {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }
}

/// Ordered, index-addressed collection of mesh points.
#[derive(Clone, Debug, Default)]
pub struct MeshPointStore {
    points: Vec<MeshPoint>,
}

impl MeshPointStore {
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    /// Load points from existing buffers. Loaded points start clean.
    pub fn from_buffers(buffers: &PointBuffers) -> Self {
        let points = (0..buffers.positions.len())
            .map(|i| MeshPoint {
                position: buffers.positions[i],
                normal: buffers.normals.get(i).copied().unwrap_or_default(),
                uv: buffers.uvs.get(i).copied().unwrap_or_default(),
                color: buffers.colors.get(i).copied().unwrap_or_default(),
                tangent: buffers.tangents.get(i).copied().unwrap_or_default(),
                dirty: false,
            })
            .collect();
        Self { points }
    }

    /// Load points from freshly built geometry (positions and UVs only).
    pub fn from_mesh(mesh: &MeshBuffers) -> Self {
        Self::from_buffers(&PointBuffers {
            positions: mesh.vertices.clone(),
            uvs: mesh.uvs.clone(),
            ..PointBuffers::default()
        })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&MeshPoint> {
        self.points.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut MeshPoint> {
        self.points.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MeshPoint> {
        self.points.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut MeshPoint> {
        self.points.iter_mut()
    }

    pub fn positions(&self) -> Vec<[f32; 3]> {
        self.points.iter().map(|p| p.position).collect()
    }

    pub fn dirty_count(&self) -> usize {
        self.points.iter().filter(|p| p.dirty).count()
    }

    /// Match the store length to the geometry's vertex count.
    ///
    /// On mismatch every point is replaced by a default one: existing edits
    /// are lost and stale indices are never reused. Returns true if the store
    /// was reset.
    pub fn sync(&mut self, vertex_count: usize) -> bool {
        if self.points.len() == vertex_count {
            return false;
        }
        debug_log(&format!(
            "[sync] point count {} != vertex count {}, resetting store",
            self.points.len(),
            vertex_count
        ));
        self.points = vec![MeshPoint::default(); vertex_count];
        true
    }

    /// Copy every point into full attribute buffers and clear all dirty flags.
    pub fn flush(&mut self) -> PointBuffers {
        let n = self.points.len();
        let mut out = PointBuffers {
            positions: Vec::with_capacity(n),
            normals: Vec::with_capacity(n),
            uvs: Vec::with_capacity(n),
            colors: Vec::with_capacity(n),
            tangents: Vec::with_capacity(n),
        };

        let mut flushed = 0usize;
        for point in &mut self.points {
            out.positions.push(point.position);
            out.normals.push(point.normal);
            out.uvs.push(point.uv);
            out.colors.push(point.color);
            out.tangents.push(point.tangent);
            if point.dirty {
                point.dirty = false;
                flushed += 1;
            }
        }

        debug_log(&format!("[flush] {} of {} points were dirty", flushed, n));
        out
    }

    /// Store normals recomputed by the render side after a flush.
    ///
    /// These come from the buffers, so the points stay clean. Ignored (returns
    /// false) when the length does not match.
    pub fn absorb_recomputed_normals(&mut self, normals: &[[f32; 3]]) -> bool {
        if normals.len() != self.points.len() {
            debug_log(&format!(
                "[absorb_normals] got {} normals for {} points, ignoring",
                normals.len(),
                self.points.len()
            ));
            return false;
        }
        for (point, &normal) in self.points.iter_mut().zip(normals) {
            point.normal = normal;
        }
        true
    }
}
