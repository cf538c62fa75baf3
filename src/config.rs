//! Tunable constants shared by the geometry builder and the terrain editor.
//! The Godot node mirrors every field as an exported property.

/// Default extent of a heightmap-built terrain, in world units.
pub const DEFAULT_WORLD_SIZE: f32 = 10.0;
/// Default search radius used when averaging neighbor heights.
pub const DEFAULT_NEIGHBOR_RADIUS: f32 = 0.1;
/// Default world-to-texel factor used when stamping heightmaps.
pub const DEFAULT_STAMP_TEXEL_SCALE: f32 = 10.0;

#[derive(Clone, Debug, PartialEq)]
pub struct SculptConfig {
    /// Side length of the square a height grid is stretched over.
    /// Also normalizes grid UVs.
    pub world_size: f32,
    /// Points strictly closer than this count as neighbors for smoothing.
    pub neighbor_radius: f32,
    /// Point x/z are multiplied by this and truncated to get texel coordinates.
    pub stamp_texel_scale: f32,
    /// Clamp the range-style blend factor to [0, 1] before interpolating.
    /// When false, large falloffs overshoot past the target value.
    pub clamp_blend: bool,
}

impl Default for SculptConfig {
    fn default() -> Self {
        Self {
            world_size: DEFAULT_WORLD_SIZE,
            neighbor_radius: DEFAULT_NEIGHBOR_RADIUS,
            stamp_texel_scale: DEFAULT_STAMP_TEXEL_SCALE,
            clamp_blend: true,
        }
    }
}

impl SculptConfig {
    /// Config for a different world size. The stamp texel scale follows it,
    /// keeping stamped texels aligned with grid-built terrain.
    pub fn with_world_size(world_size: f32) -> Self {
        Self {
            world_size,
            stamp_texel_scale: world_size,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SculptConfig::default();
        assert_eq!(config.world_size, 10.0);
        assert_eq!(config.neighbor_radius, 0.1);
        assert_eq!(config.stamp_texel_scale, 10.0);
        assert!(config.clamp_blend);
    }

    #[test]
    fn test_with_world_size_couples_texel_scale() {
        let config = SculptConfig::with_world_size(32.0);
        assert_eq!(config.world_size, 32.0);
        assert_eq!(config.stamp_texel_scale, 32.0);
        assert_eq!(config.neighbor_radius, DEFAULT_NEIGHBOR_RADIUS);
    }
}
