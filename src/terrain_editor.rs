//! Falloff-weighted terrain deformations over a `MeshPointStore`.
//!
//! Every operation is a full linear scan that reads and writes points in index
//! order, so later points see the already-updated heights of earlier ones.
//! Radial operations select points strictly inside `range` of the center and
//! blend toward a target with factor `distance / range * falloff` (see
//! `falloff`). Writes go through the point setters and mark points dirty;
//! run `surface::commit` after a batch of edits.
//!
//! All edit operations are total: an empty store or a non-positive range
//! selects nothing, and a zero falloff leaves heights where they are. They
//! return the number of points written.

use crate::config::SculptConfig;
use crate::debug_log::debug_log;
use crate::error::SculptError;
use crate::falloff::{blend_factor, clamp_weight, distance, in_box, lerp, range_factor};
use crate::height_grid::HeightSampler;
use crate::mesh_points::MeshPointStore;

/// Offset applied by `raise_in_range`.
const RAISE_OFFSET: [f32; 3] = [0.0, 1.0, 0.0];

/// Which way a normal-directed stamp pushes the surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum StampDirection {
    /// Along the normal
    #[default]
    Raise,
    /// Against the normal
    Lower,
}

impl StampDirection {
    pub fn sign(self) -> f32 {
        match self {
            StampDirection::Raise => 1.0,
            StampDirection::Lower => -1.0,
        }
    }
}

/// Heightmap stamp parameters shared by the 2D and 3D stamp operations.
pub struct Stamp<'a, S: HeightSampler + ?Sized> {
    pub heightmap: &'a S,
    pub max_height: f32,
}

#[derive(Clone, Debug, Default)]
pub struct TerrainEditor {
    config: SculptConfig,
}

impl TerrainEditor {
    pub fn new(config: SculptConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SculptConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: SculptConfig) {
        self.config = config;
    }

    /// Offset every point inside the inclusive box `[min, max]` by
    /// `offset * clamp_weight(distance(point, min), falloff)`.
    ///
    /// Additive, not blended: a point at `min` moves by zero and a point at
    /// least `falloff` away from `min` moves by the full offset.
    pub fn transform_in_range(
        &self,
        store: &mut MeshPointStore,
        min: [f32; 3],
        max: [f32; 3],
        offset: [f32; 3],
        falloff: f32,
    ) -> usize {
        let mut affected = 0;
        for point in store.iter_mut() {
            let p = point.position();
            if !in_box(p, min, max) {
                continue;
            }
            let weight = clamp_weight(distance(p, min), falloff);
            point.set_position([
                p[0] + offset[0] * weight,
                p[1] + offset[1] * weight,
                p[2] + offset[2] * weight,
            ]);
            affected += 1;
        }
        self.log_edit("transform_in_range", affected, store.len());
        affected
    }

    /// `transform_in_range` with a unit upward offset.
    pub fn raise_in_range(
        &self,
        store: &mut MeshPointStore,
        min: [f32; 3],
        max: [f32; 3],
        falloff: f32,
    ) -> usize {
        self.transform_in_range(store, min, max, RAISE_OFFSET, falloff)
    }

    /// Mean height of every point strictly within `neighbor_radius` of `position`.
    pub fn average_height(
        &self,
        store: &MeshPointStore,
        position: [f32; 3],
    ) -> Result<f32, SculptError> {
        let radius = self.config.neighbor_radius;
        let mut sum = 0.0f32;
        let mut count = 0usize;
        for point in store.iter() {
            if distance(position, point.position()) < radius {
                sum += point.y();
                count += 1;
            }
        }

        if count == 0 {
            return Err(SculptError::NoPointsInRadius { position, radius });
        }
        Ok(sum / count as f32)
    }

    /// Replace each point's height with its neighborhood average, `iterations`
    /// times. Points see neighbors already smoothed earlier in the same pass.
    /// A point with no neighbors (only possible with a non-positive radius)
    /// is left unchanged.
    pub fn smooth(&self, store: &mut MeshPointStore, iterations: usize) -> usize {
        let mut written = 0;
        for _ in 0..iterations {
            for i in 0..store.len() {
                let position = store.get(i).map(|p| p.position()).unwrap_or_default();
                let Ok(average) = self.average_height(store, position) else {
                    continue;
                };
                if let Some(point) = store.get_mut(i) {
                    point.set_y(average);
                    written += 1;
                }
            }
        }
        self.log_edit("smooth", written, store.len());
        written
    }

    /// `position` with its height replaced by the neighborhood average.
    /// Reads the store only.
    pub fn smooth_point(
        &self,
        store: &MeshPointStore,
        position: [f32; 3],
    ) -> Result<[f32; 3], SculptError> {
        let average = self.average_height(store, position)?;
        Ok([position[0], average, position[2]])
    }

    /// Blend each point within `range` toward its own neighborhood average.
    pub fn smooth_range(
        &self,
        store: &mut MeshPointStore,
        center: [f32; 3],
        range: f32,
        falloff: f32,
    ) -> usize {
        let affected = self.blend_heights(store, center, range, falloff, |store, p| {
            self.average_height(store, p).ok()
        });
        self.log_edit("smooth_range", affected, store.len());
        affected
    }

    /// Blend each point within `range` toward `y + height`.
    pub fn add_height(
        &self,
        store: &mut MeshPointStore,
        center: [f32; 3],
        range: f32,
        falloff: f32,
        height: f32,
    ) -> usize {
        let affected =
            self.blend_heights(store, center, range, falloff, |_, p| Some(p[1] + height));
        self.log_edit("add_height", affected, store.len());
        affected
    }

    /// Blend each point within `range` toward `y - height`.
    pub fn subtract_height(
        &self,
        store: &mut MeshPointStore,
        center: [f32; 3],
        range: f32,
        falloff: f32,
        height: f32,
    ) -> usize {
        let affected =
            self.blend_heights(store, center, range, falloff, |_, p| Some(p[1] - height));
        self.log_edit("subtract_height", affected, store.len());
        affected
    }

    /// Blend each point within `range` toward the absolute `height`.
    ///
    /// The factor is 0 at the center, so the point at the center is left
    /// unchanged and flattening is strongest toward the edge of the range.
    pub fn flatten(
        &self,
        store: &mut MeshPointStore,
        center: [f32; 3],
        range: f32,
        falloff: f32,
        height: f32,
    ) -> usize {
        let affected = self.blend_heights(store, center, range, falloff, |_, _| Some(height));
        self.log_edit("flatten", affected, store.len());
        affected
    }

    /// Blend each point within `range` toward `y + sample * max_height`, where
    /// the sample is read at the point's texel.
    pub fn stamp_heightmap<S: HeightSampler + ?Sized>(
        &self,
        store: &mut MeshPointStore,
        center: [f32; 3],
        range: f32,
        falloff: f32,
        stamp: &Stamp<'_, S>,
    ) -> usize {
        let affected = self.blend_heights(store, center, range, falloff, |_, p| {
            Some(p[1] + self.sample_at(stamp, p) * stamp.max_height)
        });
        self.log_edit("stamp_heightmap", affected, store.len());
        affected
    }

    /// Push each point within `range` along (or against) its stored normal by
    /// `sample * max_height`, scaled per axis by the normal's component.
    ///
    /// Axes are written x, then y, then z. Each axis re-reads the point's
    /// position, so its texel sample and blend factor reflect the axes already
    /// written. Normals are the ones stored at the last commit.
    pub fn stamp_heightmap_3d<S: HeightSampler + ?Sized>(
        &self,
        store: &mut MeshPointStore,
        center: [f32; 3],
        range: f32,
        falloff: f32,
        stamp: &Stamp<'_, S>,
        direction: StampDirection,
    ) -> usize {
        let sign = direction.sign();
        let mut affected = 0;
        for point in store.iter_mut() {
            if range_factor(distance(center, point.position()), range, falloff).is_none() {
                continue;
            }
            let normal = point.normal();
            for (axis, &n) in normal.iter().enumerate() {
                let p = point.position();
                let factor = blend_factor(distance(center, p), range, falloff);
                let target = p[axis] + sign * self.sample_at(stamp, p) * stamp.max_height * n;
                point.set_axis(axis, lerp(p[axis], target, factor, self.config.clamp_blend));
            }
            affected += 1;
        }
        self.log_edit("stamp_heightmap_3d", affected, store.len());
        affected
    }

    /// Shared loop of the radial height edits. `target` receives the store and
    /// the point's current position and returns the height to blend toward,
    /// or None to skip the point.
    fn blend_heights<F>(
        &self,
        store: &mut MeshPointStore,
        center: [f32; 3],
        range: f32,
        falloff: f32,
        mut target: F,
    ) -> usize
    where
        F: FnMut(&MeshPointStore, [f32; 3]) -> Option<f32>,
    {
        let mut affected = 0;
        for i in 0..store.len() {
            let Some(p) = store.get(i).map(|point| point.position()) else {
                continue;
            };
            let Some(factor) = range_factor(distance(center, p), range, falloff) else {
                continue;
            };
            let Some(goal) = target(&*store, p) else {
                continue;
            };
            if let Some(point) = store.get_mut(i) {
                point.set_y(lerp(p[1], goal, factor, self.config.clamp_blend));
                affected += 1;
            }
        }
        affected
    }

    /// Heightmap intensity under a point: x/z scaled to texels and truncated.
    fn sample_at<S: HeightSampler + ?Sized>(&self, stamp: &Stamp<'_, S>, p: [f32; 3]) -> f32 {
        let scale = self.config.stamp_texel_scale;
        stamp
            .heightmap
            .sample((p[0] * scale) as i32, (p[2] * scale) as i32)
    }

    fn log_edit(&self, op: &str, affected: usize, total: usize) {
        debug_log(&format!("[{}] {} of {} points affected", op, affected, total));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry_builder::build_from_height_grid;
    use crate::height_grid::HeightGrid;
    use crate::mesh_points::PointBuffers;

    const EPSILON: f32 = 1e-5;

    fn store_from_positions(positions: &[[f32; 3]]) -> MeshPointStore {
        MeshPointStore::from_buffers(&PointBuffers {
            positions: positions.to_vec(),
            ..PointBuffers::default()
        })
    }

    fn flat_grid_store(size: usize, height: f32) -> MeshPointStore {
        let grid = HeightGrid::flat(size, size, 1.0).unwrap();
        let mesh = build_from_height_grid(&grid, height, 10.0).unwrap();
        MeshPointStore::from_mesh(&mesh)
    }

    fn heights(store: &MeshPointStore) -> Vec<f32> {
        store.iter().map(|p| p.y()).collect()
    }

    fn editor() -> TerrainEditor {
        TerrainEditor::new(SculptConfig::default())
    }

    #[test]
    fn test_add_height_on_zero_grid() {
        let grid = HeightGrid::flat(3, 3, 0.0).unwrap();
        let mesh = build_from_height_grid(&grid, 5.0, 10.0).unwrap();
        let mut store = MeshPointStore::from_mesh(&mesh);
        assert!(store.iter().all(|p| p.y() == 0.0));

        let center = [1.0, 0.0, 1.0];
        let before = store.positions();
        let affected = editor().add_height(&mut store, center, 2.0, 1.0, 10.0);

        let mut expected_affected = 0;
        for (p, point) in before.iter().zip(store.iter()) {
            let d = distance(center, *p);
            if d < 2.0 {
                expected_affected += 1;
                let expected = lerp(0.0, 10.0, d / 2.0, true);
                assert!((point.y() - expected).abs() < EPSILON);
                assert!(point.is_dirty());
            } else {
                assert_eq!(point.y(), 0.0);
                assert!(!point.is_dirty());
            }
        }
        assert_eq!(affected, expected_affected);
        assert_eq!(affected, 1, "only the origin vertex lies within range 2");
    }

    #[test]
    fn test_flatten_leaves_center_unchanged() {
        let mut store = store_from_positions(&[[0.0, 3.0, 0.0], [0.0, 3.0, 1.0]]);
        editor().flatten(&mut store, [0.0, 3.0, 0.0], 2.0, 1.0, 0.0);

        assert_eq!(store.get(0).unwrap().y(), 3.0, "center point has factor 0");
        // distance 1 of range 2: halfway to the target
        assert!((store.get(1).unwrap().y() - 1.5).abs() < EPSILON);
    }

    #[test]
    fn test_add_then_subtract_is_inverse_when_factor_saturates() {
        let positions = [
            [0.0, 0.0, 0.0],
            [0.5, 0.0, 0.0],
            [0.0, 0.0, 1.0],
            [1.0, 0.0, 1.0],
        ];
        let mut store = store_from_positions(&positions);
        let editor = editor();
        editor.add_height(&mut store, [0.0; 3], 50.0, 100.0, 10.0);
        assert_eq!(heights(&store), vec![0.0, 10.0, 10.0, 10.0]);
        editor.subtract_height(&mut store, [0.0; 3], 50.0, 100.0, 10.0);
        assert_eq!(store.positions(), positions.to_vec());
    }

    #[test]
    fn test_unclamped_blend_overshoots() {
        let mut store = store_from_positions(&[[1.0, 0.0, 0.0]]);
        let config = SculptConfig {
            clamp_blend: false,
            ..SculptConfig::default()
        };
        TerrainEditor::new(config).add_height(&mut store, [0.0; 3], 2.0, 4.0, 1.0);
        // factor = 1 / 2 * 4 = 2
        assert_eq!(store.get(0).unwrap().y(), 2.0);

        let mut store = store_from_positions(&[[1.0, 0.0, 0.0]]);
        editor().add_height(&mut store, [0.0; 3], 2.0, 4.0, 1.0);
        assert_eq!(store.get(0).unwrap().y(), 1.0, "clamped blend stops at target");
    }

    #[test]
    fn test_degenerate_inputs_are_noops() {
        let editor = editor();
        let mut empty = MeshPointStore::new();
        assert_eq!(editor.add_height(&mut empty, [0.0; 3], 5.0, 1.0, 1.0), 0);
        assert_eq!(editor.smooth(&mut empty, 3), 0);

        let mut store = flat_grid_store(3, 1.0);
        assert_eq!(editor.add_height(&mut store, [0.0; 3], 0.0, 1.0, 1.0), 0);
        assert_eq!(editor.flatten(&mut store, [0.0; 3], -1.0, 1.0, 1.0), 0);
        assert_eq!(editor.smooth_range(&mut store, [0.0; 3], 0.0, 1.0), 0);
        assert_eq!(store.dirty_count(), 0);
    }

    #[test]
    fn test_transform_in_range() {
        let min = [0.0, 0.0, 0.0];
        let max = [2.0, 2.0, 2.0];
        let positions = [
            [0.0, 0.0, 0.0],  // at min
            [0.5, 0.0, 0.0],  // half of falloff
            [2.0, 0.0, 0.0],  // beyond falloff
            [3.0, 0.0, 0.0],  // outside
            [1.0, -0.1, 1.0], // outside on y
        ];
        let mut store = store_from_positions(&positions);
        let affected = editor().transform_in_range(&mut store, min, max, [0.0, 2.0, 0.0], 1.0);

        assert_eq!(affected, 3);
        assert_eq!(store.get(0).unwrap().position(), [0.0, 0.0, 0.0]);
        assert_eq!(store.get(1).unwrap().position(), [0.5, 1.0, 0.0]);
        assert_eq!(store.get(2).unwrap().position(), [2.0, 2.0, 0.0]);
        assert_eq!(store.get(3).unwrap().position(), positions[3]);
        assert_eq!(store.get(4).unwrap().position(), positions[4]);
        assert!(!store.get(3).unwrap().is_dirty());
    }

    #[test]
    fn test_raise_in_range_moves_up() {
        let mut store = store_from_positions(&[[1.0, 0.0, 0.0], [5.0, 0.0, 0.0]]);
        editor().raise_in_range(&mut store, [0.0; 3], [2.0; 3], 0.5);
        assert_eq!(store.get(0).unwrap().position(), [1.0, 1.0, 0.0]);
        assert_eq!(store.get(1).unwrap().position(), [5.0, 0.0, 0.0]);
    }

    #[test]
    fn test_average_height_on_flat_mesh() {
        let store = flat_grid_store(4, 2.5);
        let editor = editor();
        let first = store.get(5).unwrap().position();
        let query = [first[0] + 0.05, first[1], first[2]];
        assert_eq!(editor.average_height(&store, query).unwrap(), 2.5);
    }

    #[test]
    fn test_average_height_without_neighbors_errors() {
        let store = flat_grid_store(3, 1.0);
        let err = editor().average_height(&store, [100.0, 0.0, 0.0]).unwrap_err();
        assert_eq!(
            err,
            SculptError::NoPointsInRadius {
                position: [100.0, 0.0, 0.0],
                radius: 0.1
            }
        );
        assert!(editor()
            .average_height(&MeshPointStore::new(), [0.0; 3])
            .is_err());
    }

    #[test]
    fn test_smooth_is_sequential() {
        let mut store =
            store_from_positions(&[[0.0, 0.0, 0.0], [1.0, 0.3, 0.0], [2.0, 0.0, 0.0]]);
        let config = SculptConfig {
            neighbor_radius: 1.2,
            ..SculptConfig::default()
        };
        let written = TerrainEditor::new(config).smooth(&mut store, 1);
        assert_eq!(written, 3);

        // p0 averages {p0, p1}; p1 sees the smoothed p0; p2 sees the smoothed p1
        let h = heights(&store);
        assert!((h[0] - 0.15).abs() < EPSILON, "{h:?}");
        assert!((h[1] - 0.15).abs() < EPSILON, "{h:?}");
        assert!((h[2] - 0.075).abs() < EPSILON, "{h:?}");
    }

    #[test]
    fn test_smooth_iterations_flatten_spike() {
        let config = SculptConfig {
            neighbor_radius: 4.0,
            ..SculptConfig::default()
        };
        let editor = TerrainEditor::new(config);
        let mut store = flat_grid_store(3, 0.0);
        store.get_mut(4).unwrap().set_y(0.9);

        editor.smooth(&mut store, 1);
        let after_one = store.get(4).unwrap().y();
        editor.smooth(&mut store, 5);
        let after_six = store.get(4).unwrap().y();
        assert!(after_one < 0.9);
        assert!(after_six <= after_one);
    }

    #[test]
    fn test_smooth_with_default_radius_is_identity_on_sparse_grid() {
        let mut store = flat_grid_store(3, 0.0);
        store.get_mut(4).unwrap().set_y(1.0);
        let before = heights(&store);
        editor().smooth(&mut store, 2);
        assert_eq!(heights(&store), before, "each point is its only neighbor");
    }

    #[test]
    fn test_smooth_skips_points_without_neighbors() {
        let config = SculptConfig {
            neighbor_radius: 0.0,
            ..SculptConfig::default()
        };
        let mut store = store_from_positions(&[[0.0, 1.0, 0.0]]);
        assert_eq!(TerrainEditor::new(config).smooth(&mut store, 1), 0);
        assert_eq!(store.dirty_count(), 0);
    }

    #[test]
    fn test_smooth_point_does_not_write() {
        let store = store_from_positions(&[[0.0, 1.0, 0.0], [0.05, 1.04, 0.0]]);
        let smoothed = editor().smooth_point(&store, [0.02, 1.02, 0.0]).unwrap();
        assert_eq!(smoothed[0], 0.02);
        assert!((smoothed[1] - 1.02).abs() < EPSILON, "{smoothed:?}");
        assert_eq!(smoothed[2], 0.0);
        assert_eq!(store.dirty_count(), 0);
        assert!(editor().smooth_point(&store, [9.0, 0.0, 9.0]).is_err());
    }

    #[test]
    fn test_smooth_range_blends_toward_average() {
        let config = SculptConfig {
            neighbor_radius: 0.5,
            ..SculptConfig::default()
        };
        let positions = [[0.0, 0.0, 0.0], [0.2, 0.2, 0.0], [5.0, 1.0, 0.0]];
        let mut store = store_from_positions(&positions);
        let affected =
            TerrainEditor::new(config).smooth_range(&mut store, [0.0; 3], 1.0, 1.0);

        // Origin: factor 0, unchanged. Second point blends toward mean of the pair.
        assert_eq!(affected, 2);
        assert_eq!(store.get(0).unwrap().y(), 0.0);
        let d = distance([0.0; 3], positions[1]);
        let expected = lerp(0.2, 0.1, d, true);
        assert!((store.get(1).unwrap().y() - expected).abs() < EPSILON);
        assert_eq!(store.get(2).unwrap().y(), 1.0);
    }

    #[test]
    fn test_stamp_heightmap() {
        let heightmap = HeightGrid::from_fn(4, 4, |x, z| (x + 4 * z) as f32 / 16.0).unwrap();
        let stamp = Stamp {
            heightmap: &heightmap,
            max_height: 2.0,
        };
        let p = [0.15, 0.0, 0.25];
        let mut store = store_from_positions(&[p, [3.0, 0.0, 3.0]]);
        let affected = editor().stamp_heightmap(&mut store, [0.0; 3], 1.0, 1.0, &stamp);

        assert_eq!(affected, 1);
        // texel (1, 2) -> 9 / 16
        let target = 9.0 / 16.0 * 2.0;
        let expected = lerp(0.0, target, distance([0.0; 3], p), true);
        assert!((store.get(0).unwrap().y() - expected).abs() < EPSILON);
        assert_eq!(store.get(1).unwrap().y(), 0.0);
    }

    #[test]
    fn test_stamp_texel_scale_is_configurable() {
        let heightmap = HeightGrid::from_fn(4, 1, |x, _| x as f32 / 4.0).unwrap();
        let stamp = Stamp {
            heightmap: &heightmap,
            max_height: 1.0,
        };
        let config = SculptConfig {
            stamp_texel_scale: 20.0,
            ..SculptConfig::default()
        };
        let p = [0.1, 0.0, 0.0];
        let mut store = store_from_positions(&[p]);
        // falloff 20 saturates the factor, so the point lands on the target
        TerrainEditor::new(config).stamp_heightmap(&mut store, [0.0; 3], 1.0, 20.0, &stamp);
        assert_eq!(store.get(0).unwrap().y(), 0.5, "0.1 * 20 -> texel 2");
    }

    fn store_with_normals(positions: &[[f32; 3]], normal: [f32; 3]) -> MeshPointStore {
        MeshPointStore::from_buffers(&PointBuffers {
            positions: positions.to_vec(),
            normals: vec![normal; positions.len()],
            ..PointBuffers::default()
        })
    }

    #[test]
    fn test_stamp_3d_follows_normal() {
        let heightmap = HeightGrid::flat(2, 2, 0.5).unwrap();
        let stamp = Stamp {
            heightmap: &heightmap,
            max_height: 2.0,
        };
        let editor = editor();

        let mut store = store_with_normals(&[[0.0, 0.0, 1.0]], [0.0, 1.0, 0.0]);
        editor.stamp_heightmap_3d(&mut store, [0.0; 3], 2.0, 100.0, &stamp, StampDirection::Raise);
        assert_eq!(store.get(0).unwrap().position(), [0.0, 1.0, 1.0]);

        let mut store = store_with_normals(&[[0.0, 0.0, 1.0]], [0.0, 1.0, 0.0]);
        editor.stamp_heightmap_3d(&mut store, [0.0; 3], 2.0, 100.0, &stamp, StampDirection::Lower);
        assert_eq!(store.get(0).unwrap().position(), [0.0, -1.0, 1.0]);
    }

    #[test]
    fn test_stamp_3d_recomputes_factor_per_axis() {
        let heightmap = HeightGrid::flat(2, 2, 1.0).unwrap();
        let stamp = Stamp {
            heightmap: &heightmap,
            max_height: 1.0,
        };
        let n = std::f32::consts::FRAC_1_SQRT_2;
        let mut store = store_with_normals(&[[1.0, 0.0, 0.0]], [n, n, 0.0]);
        editor().stamp_heightmap_3d(&mut store, [0.0; 3], 4.0, 1.0, &stamp, StampDirection::Raise);

        // x first: factor 1/4
        let x = lerp(1.0, 1.0 + n, 0.25, true);
        // y uses the factor at the moved x
        let y = lerp(0.0, n, x / 4.0, true);
        let p = store.get(0).unwrap().position();
        assert!((p[0] - x).abs() < EPSILON, "{p:?}");
        assert!((p[1] - y).abs() < EPSILON, "{p:?}");
        assert_eq!(p[2], 0.0);
    }

    #[test]
    fn test_stamp_3d_with_zero_normals_marks_dirty_without_moving() {
        let heightmap = HeightGrid::flat(2, 2, 1.0).unwrap();
        let stamp = Stamp {
            heightmap: &heightmap,
            max_height: 3.0,
        };
        let mut store = store_from_positions(&[[0.5, 0.0, 0.0]]);
        let affected =
            editor().stamp_heightmap_3d(&mut store, [0.0; 3], 1.0, 1.0, &stamp, StampDirection::Raise);
        assert_eq!(affected, 1);
        assert_eq!(store.get(0).unwrap().position(), [0.5, 0.0, 0.0]);
        assert!(store.get(0).unwrap().is_dirty());
    }

    #[test]
    fn test_radial_edits_skip_nan_positions() {
        let heightmap = HeightGrid::flat(2, 2, 1.0).unwrap();
        let stamp = Stamp {
            heightmap: &heightmap,
            max_height: 1.0,
        };
        let positions = [[f32::NAN, 0.0, 0.0], [0.5, 0.0, 0.0]];
        let editor = editor();

        let mut store = store_with_normals(&positions, [0.0, 1.0, 0.0]);
        let affected =
            editor.stamp_heightmap_3d(&mut store, [0.0; 3], 1.0, 1.0, &stamp, StampDirection::Raise);
        assert_eq!(affected, 1);
        assert!(!store.get(0).unwrap().is_dirty());

        let mut store = store_with_normals(&positions, [0.0, 1.0, 0.0]);
        let affected = editor.stamp_heightmap(&mut store, [0.0; 3], 1.0, 1.0, &stamp);
        assert_eq!(affected, 1);
        assert!(!store.get(0).unwrap().is_dirty());
    }
}
