use godot::prelude::*;

pub mod config;
pub mod debug_log;
pub mod error;
pub mod falloff;
pub mod geometry_builder;
pub mod height_grid;
pub mod history;
pub mod mesh_points;
mod sculpt_mesh;
pub mod surface;
pub mod terrain_editor;

struct PixySculptExtension;

#[gdextension]
unsafe impl ExtensionLibrary for PixySculptExtension {}
