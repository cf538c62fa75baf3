//! Distance-to-weight functions shared by every spatial edit.
//!
//! There are two blending conventions and they are deliberately not unified:
//! - Clamp style: `clamp01(distance / falloff)`, used by box transforms.
//!   Weight is 0 at the box's min corner and reaches 1 at `falloff` distance.
//! - Range style: `distance / range * falloff`, used by every radial edit.
//!   Only points strictly inside `range` are affected. The factor is not
//!   clamped and exceeds 1 once `falloff > range / distance`.

/// Euclidean distance between two points.
#[inline]
pub fn distance(a: [f32; 3], b: [f32; 3]) -> f32 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    let dz = a[2] - b[2];
    (dx * dx + dy * dy + dz * dz).sqrt()
}

/// Clamp-style weight in `[0, 1]`. Zero distance is always weight 0, even
/// with a zero falloff.
#[inline]
pub fn clamp_weight(distance: f32, falloff: f32) -> f32 {
    if distance <= 0.0 {
        return 0.0;
    }
    (distance / falloff).clamp(0.0, 1.0)
}

/// Range-style blend factor without the range check.
#[inline]
pub fn blend_factor(distance: f32, range: f32, falloff: f32) -> f32 {
    distance / range * falloff
}

/// Range-style blend factor, or None when the point lies outside `range`.
/// A non-positive range selects nothing.
#[inline]
pub fn range_factor(distance: f32, range: f32, falloff: f32) -> Option<f32> {
    if distance < range {
        Some(blend_factor(distance, range, falloff))
    } else {
        None
    }
}

/// Inclusive axis-aligned box test on all three axes.
#[inline]
pub fn in_box(p: [f32; 3], min: [f32; 3], max: [f32; 3]) -> bool {
    (0..3).all(|axis| p[axis] >= min[axis] && p[axis] <= max[axis])
}

/// Linear interpolation from `a` to `b`. With `clamp` the parameter is limited
/// to `[0, 1]`, so the result never passes `b`.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32, clamp: bool) -> f32 {
    let t = if clamp { t.clamp(0.0, 1.0) } else { t };
    a + (b - a) * t
}
