use godot::classes::mesh::{ArrayType, PrimitiveType};
use godot::classes::{ArrayMesh, IMeshInstance3D, Image, Material, MeshInstance3D};
use godot::prelude::*;

use crate::config::SculptConfig;
use crate::debug_log::{close_debug_log, init_debug_log, DEFAULT_LOG_PATH};
use crate::error::SculptError;
use crate::geometry_builder::{build_from_height_grid, build_from_points, MeshBuffers};
use crate::height_grid::HeightGrid;
use crate::history::EditHistory;
use crate::mesh_points::MeshPointStore;
use crate::surface::{commit, BufferMesh, MeshSurface};
use crate::terrain_editor::{Stamp, StampDirection, TerrainEditor};

/// Number of undo steps kept per mesh.
const DEFAULT_UNDO_DEPTH: usize = 32;
/// Noise octaves used by `build_from_noise` when given a non-positive count.
const DEFAULT_NOISE_OCTAVES: usize = 4;

/// Sculptable mesh node. Holds the editable points, a staging buffer mesh,
/// and the undo history. Edits only touch the points; call `commit()` to
/// push them to the displayed mesh.
#[derive(GodotClass)]
#[class(base=MeshInstance3D, init, tool)]
pub struct PixySculptMesh {
    base: Base<MeshInstance3D>,

    /// Extent of heightmap-built terrain in world units
    #[export]
    #[init(val = crate::config::DEFAULT_WORLD_SIZE)]
    world_size: f32,

    /// Neighbor search radius for smoothing and height queries
    #[export]
    #[init(val = crate::config::DEFAULT_NEIGHBOR_RADIUS)]
    neighbor_radius: f32,

    /// World-to-texel factor when stamping heightmaps
    #[export]
    #[init(val = crate::config::DEFAULT_STAMP_TEXEL_SCALE)]
    stamp_texel_scale: f32,

    /// Clamp brush blend factors to [0, 1]
    #[export]
    #[init(val = true)]
    clamp_blend: bool,

    /// Material applied to the generated surface
    #[export]
    material: Option<Gd<Material>>,

    /// Write sculpt operations to debug_sculpt.log
    #[export]
    #[init(val = false)]
    debug_logging: bool,

    store: MeshPointStore,
    surface: BufferMesh,

    #[init(val = EditHistory::new(DEFAULT_UNDO_DEPTH))]
    history: EditHistory,
}

#[godot_api]
impl IMeshInstance3D for PixySculptMesh {
    fn ready(&mut self) {
        if self.debug_logging && !init_debug_log(DEFAULT_LOG_PATH) {
            godot_warn!("PixySculptMesh: could not open {DEFAULT_LOG_PATH}");
        }
        godot_print!("PixySculptMesh ready ({} points)", self.store.len());
    }

    fn exit_tree(&mut self) {
        if self.debug_logging {
            close_debug_log();
        }
    }
}

#[godot_api]
impl PixySculptMesh {
    // ═══════════════════════════════════════════
    // Building
    // ═══════════════════════════════════════════

    /// Fan-triangulate an ordered point cloud around its first point.
    #[func]
    fn build_from_points(&mut self, points: PackedVector3Array) -> bool {
        let points: Vec<[f32; 3]> = points.as_slice().iter().map(|v| to_array(*v)).collect();
        let result = build_from_points(&points);
        self.install_mesh(result)
    }

    /// Build a grid terrain from a grayscale heightmap image.
    #[func]
    fn build_from_heightmap(&mut self, heightmap: Gd<Image>, max_height: f32) -> bool {
        let Some(grid) = height_grid_from_image(&heightmap) else {
            return false;
        };
        let result = build_from_height_grid(&grid, max_height, self.world_size);
        self.install_mesh(result)
    }

    /// Build a grid terrain from fractal noise.
    #[func]
    fn build_from_noise(
        &mut self,
        width: i32,
        height: i32,
        seed: i32,
        octaves: i32,
        frequency: f32,
        max_height: f32,
    ) -> bool {
        let octaves = if octaves > 0 {
            octaves as usize
        } else {
            DEFAULT_NOISE_OCTAVES
        };
        let grid = HeightGrid::from_noise(
            width.max(0) as usize,
            height.max(0) as usize,
            seed as u32,
            octaves,
            frequency,
        );
        let Some(grid) = grid else {
            godot_error!("PixySculptMesh: invalid noise grid size {width}x{height}");
            return false;
        };
        let result = build_from_height_grid(&grid, max_height, self.world_size);
        self.install_mesh(result)
    }

    // ═══════════════════════════════════════════
    // Editing (call commit() afterwards)
    // ═══════════════════════════════════════════

    #[func]
    fn add_height(&mut self, position: Vector3, range: f32, falloff: f32, height: f32) -> i32 {
        let editor = self.editor();
        self.history.record_edit(&mut self.store, |store| {
            editor.add_height(store, to_array(position), range, falloff, height)
        }) as i32
    }

    #[func]
    fn subtract_height(&mut self, position: Vector3, range: f32, falloff: f32, height: f32) -> i32 {
        let editor = self.editor();
        self.history.record_edit(&mut self.store, |store| {
            editor.subtract_height(store, to_array(position), range, falloff, height)
        }) as i32
    }

    #[func]
    fn flatten(&mut self, position: Vector3, range: f32, falloff: f32, height: f32) -> i32 {
        let editor = self.editor();
        self.history.record_edit(&mut self.store, |store| {
            editor.flatten(store, to_array(position), range, falloff, height)
        }) as i32
    }

    #[func]
    fn smooth(&mut self, iterations: i32) -> i32 {
        let editor = self.editor();
        self.history
            .record_edit(&mut self.store, |store| editor.smooth(store, iterations.max(0) as usize))
            as i32
    }

    #[func]
    fn smooth_range(&mut self, position: Vector3, range: f32, falloff: f32) -> i32 {
        let editor = self.editor();
        self.history.record_edit(&mut self.store, |store| {
            editor.smooth_range(store, to_array(position), range, falloff)
        }) as i32
    }

    /// `position` with its height replaced by the neighborhood average.
    /// Returns `position` unchanged if no points are nearby.
    #[func]
    fn smooth_point(&self, position: Vector3) -> Vector3 {
        match self.editor().smooth_point(&self.store, to_array(position)) {
            Ok(p) => Vector3::new(p[0], p[1], p[2]),
            Err(err) => {
                godot_warn!("PixySculptMesh: smooth_point: {err}");
                position
            }
        }
    }

    /// Average height around `position`, or NaN if no points are nearby.
    #[func]
    fn get_average_height(&self, position: Vector3) -> f32 {
        match self.editor().average_height(&self.store, to_array(position)) {
            Ok(h) => h,
            Err(err) => {
                godot_error!("PixySculptMesh: get_average_height: {err}");
                f32::NAN
            }
        }
    }

    #[func]
    fn transform_in_range(&mut self, min: Vector3, max: Vector3, offset: Vector3, falloff: f32) -> i32 {
        let editor = self.editor();
        self.history.record_edit(&mut self.store, |store| {
            editor.transform_in_range(store, to_array(min), to_array(max), to_array(offset), falloff)
        }) as i32
    }

    #[func]
    fn raise_in_range(&mut self, min: Vector3, max: Vector3, falloff: f32) -> i32 {
        let editor = self.editor();
        self.history.record_edit(&mut self.store, |store| {
            editor.raise_in_range(store, to_array(min), to_array(max), falloff)
        }) as i32
    }

    #[func]
    fn stamp_heightmap(
        &mut self,
        heightmap: Gd<Image>,
        position: Vector3,
        range: f32,
        falloff: f32,
        max_height: f32,
    ) -> i32 {
        let Some(grid) = height_grid_from_image(&heightmap) else {
            return 0;
        };
        let stamp = Stamp {
            heightmap: &grid,
            max_height,
        };
        let editor = self.editor();
        self.history.record_edit(&mut self.store, |store| {
            editor.stamp_heightmap(store, to_array(position), range, falloff, &stamp)
        }) as i32
    }

    /// Stamp along each point's normal; `lower` pushes against it.
    #[func]
    fn stamp_heightmap_3d(
        &mut self,
        heightmap: Gd<Image>,
        position: Vector3,
        range: f32,
        falloff: f32,
        max_height: f32,
        lower: bool,
    ) -> i32 {
        let Some(grid) = height_grid_from_image(&heightmap) else {
            return 0;
        };
        let stamp = Stamp {
            heightmap: &grid,
            max_height,
        };
        let direction = if lower {
            StampDirection::Lower
        } else {
            StampDirection::Raise
        };
        let editor = self.editor();
        self.history.record_edit(&mut self.store, |store| {
            editor.stamp_heightmap_3d(store, to_array(position), range, falloff, &stamp, direction)
        }) as i32
    }

    // ═══════════════════════════════════════════
    // Reconciliation and history
    // ═══════════════════════════════════════════

    /// Push pending edits to the displayed mesh and refresh normals and bounds.
    #[func]
    fn commit(&mut self) {
        let report = commit(&mut self.store, &mut self.surface);
        if report.resynced {
            godot_warn!("PixySculptMesh: point store was out of sync with the mesh; pending edits were dropped");
        }
        if report.degenerate_normals > 0 {
            godot_warn!(
                "PixySculptMesh: {} degenerate normals after commit",
                report.degenerate_normals
            );
        }
        self.upload_mesh();
    }

    #[func]
    fn undo(&mut self) -> bool {
        self.history.undo(&mut self.store)
    }

    #[func]
    fn redo(&mut self) -> bool {
        self.history.redo(&mut self.store)
    }

    #[func]
    fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[func]
    fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    #[func]
    fn get_point_count(&self) -> i32 {
        self.store.len() as i32
    }

    #[func]
    fn get_dirty_count(&self) -> i32 {
        self.store.dirty_count() as i32
    }
}

impl PixySculptMesh {
    fn config(&self) -> SculptConfig {
        SculptConfig {
            world_size: self.world_size,
            neighbor_radius: self.neighbor_radius,
            stamp_texel_scale: self.stamp_texel_scale,
            clamp_blend: self.clamp_blend,
        }
    }

    fn editor(&self) -> TerrainEditor {
        TerrainEditor::new(self.config())
    }

    /// Replace the current geometry with a freshly built mesh.
    fn install_mesh(&mut self, result: Result<MeshBuffers, SculptError>) -> bool {
        let mesh = match result {
            Ok(mesh) => mesh,
            Err(err) => {
                godot_error!("PixySculptMesh: {err}");
                return false;
            }
        };
        self.surface = BufferMesh::new(mesh);
        self.store = MeshPointStore::from_buffers(&self.surface.point_buffers());
        self.history.clear();
        self.upload_mesh();
        godot_print!(
            "PixySculptMesh: built {} vertices, {} triangles",
            self.surface.vertex_count(),
            self.surface.triangles().len() / 3
        );
        true
    }

    /// Copy the staging buffers into a new ArrayMesh and display it.
    fn upload_mesh(&mut self) {
        let attributes = self.surface.attributes();
        if attributes.positions.is_empty() {
            self.base_mut().set_mesh(&ArrayMesh::new_gd());
            return;
        }

        let vertices: Vec<Vector3> = attributes
            .positions
            .iter()
            .map(|p| Vector3::new(p[0], p[1], p[2]))
            .collect();
        let normals: Vec<Vector3> = attributes
            .normals
            .iter()
            .map(|n| Vector3::new(n[0], n[1], n[2]))
            .collect();
        let uvs: Vec<Vector2> = attributes
            .uvs
            .iter()
            .map(|uv| Vector2::new(uv[0], uv[1]))
            .collect();
        let colors: Vec<Color> = attributes
            .colors
            .iter()
            .map(|c| Color::from_rgba(c[0], c[1], c[2], c[3]))
            .collect();
        let tangents: Vec<f32> = attributes.tangents.iter().flatten().copied().collect();
        let has_tangents = attributes.tangents.iter().any(|t| *t != [0.0; 4]);

        // Godot treats clockwise triangles as front-facing
        let indices: Vec<i32> = self
            .surface
            .triangles()
            .chunks_exact(3)
            .flat_map(|tri| [tri[0] as i32, tri[2] as i32, tri[1] as i32])
            .collect();

        let packed_vertices = PackedVector3Array::from(&vertices[..]);
        let packed_normals = PackedVector3Array::from(&normals[..]);
        let packed_uvs = PackedVector2Array::from(&uvs[..]);
        let packed_colors = PackedColorArray::from(&colors[..]);
        let packed_tangents = PackedFloat32Array::from(&tangents[..]);
        let packed_indices = PackedInt32Array::from(&indices[..]);

        // Build the mesh arrays - need to fill all slots up to MAX
        let num_arrays = ArrayType::MAX.ord() as usize;
        let mut arrays: Array<Variant> = Array::new();
        for i in 0..num_arrays {
            if i == ArrayType::VERTEX.ord() as usize {
                arrays.push(&packed_vertices.to_variant());
            } else if i == ArrayType::NORMAL.ord() as usize {
                arrays.push(&packed_normals.to_variant());
            } else if i == ArrayType::TEX_UV.ord() as usize {
                arrays.push(&packed_uvs.to_variant());
            } else if i == ArrayType::COLOR.ord() as usize {
                arrays.push(&packed_colors.to_variant());
            } else if i == ArrayType::TANGENT.ord() as usize && has_tangents {
                arrays.push(&packed_tangents.to_variant());
            } else if i == ArrayType::INDEX.ord() as usize {
                arrays.push(&packed_indices.to_variant());
            } else {
                arrays.push(&Variant::nil());
            }
        }

        let mut mesh = ArrayMesh::new_gd();
        mesh.add_surface_from_arrays(PrimitiveType::TRIANGLES, &arrays);
        if let Some(ref mat) = self.material {
            mesh.surface_set_material(0, mat);
        }
        self.base_mut().set_mesh(&mesh);
    }
}

fn to_array(v: Vector3) -> [f32; 3] {
    [v.x, v.y, v.z]
}

/// Read an image into a grayscale height grid.
fn height_grid_from_image(image: &Gd<Image>) -> Option<HeightGrid> {
    if image.is_compressed() {
        godot_error!("PixySculptMesh: heightmap image is compressed; decompress it first");
        return None;
    }
    let width = image.get_width();
    let height = image.get_height();
    let mut colors = Vec::with_capacity((width.max(0) * height.max(0)) as usize);
    for z in 0..height {
        for x in 0..width {
            let c = image.get_pixel(x, z);
            colors.push([c.r, c.g, c.b, c.a]);
        }
    }
    let grid = HeightGrid::from_colors(width.max(0) as usize, height.max(0) as usize, &colors);
    if grid.is_none() {
        godot_error!("PixySculptMesh: heightmap image is empty");
    }
    grid
}
