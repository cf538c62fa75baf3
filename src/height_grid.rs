//! Grayscale height grids used to build and stamp terrain.
//!
//! A heightmap is anything that can report its size and a `[0, 1]` intensity at
//! integer texel coordinates. `HeightGrid` is the owned implementation; the
//! Godot layer fills one from an `Image`.

use noise::{Fbm, MultiFractal, NoiseFn, Perlin};

/// Luma weights applied to RGB when converting a color texel to grayscale.
const GRAYSCALE_WEIGHTS: [f32; 3] = [0.299, 0.587, 0.114];
/// Below this value range a generated grid is treated as flat.
const MIN_NOISE_RANGE: f32 = 1e-6;

/// Read access to a 2D grid of grayscale intensities.
pub trait HeightSampler {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    /// Intensity in `[0, 1]` at texel `(x, z)`. Coordinates outside the grid
    /// are resolved by the sampler's addressing rule.
    fn sample(&self, x: i32, z: i32) -> f32;
}

/// How out-of-range texel coordinates are resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum WrapMode {
    /// Clamp to the nearest edge texel
    #[default]
    Clamp,
    /// Tile the grid
    Repeat,
}

impl WrapMode {
    fn resolve(self, coord: i32, size: usize) -> usize {
        let size = size as i32;
        match self {
            WrapMode::Clamp => coord.clamp(0, size - 1) as usize,
            WrapMode::Repeat => coord.rem_euclid(size) as usize,
        }
    }
}

/// Convert an RGB color to grayscale intensity.
pub fn grayscale(r: f32, g: f32, b: f32) -> f32 {
    r * GRAYSCALE_WEIGHTS[0] + g * GRAYSCALE_WEIGHTS[1] + b * GRAYSCALE_WEIGHTS[2]
}

/// Row-major grid of intensities: `values[z * width + x]`.
#[derive(Clone, Debug, PartialEq)]
pub struct HeightGrid {
    width: usize,
    height: usize,
    values: Vec<f32>,
    wrap: WrapMode,
}

impl HeightGrid {
    /// Wrap existing values. Returns None if `values.len() != width * height`
    /// or either dimension is zero.
    pub fn new(width: usize, height: usize, values: Vec<f32>) -> Option<Self> {
        if width == 0 || height == 0 || values.len() != width * height {
            return None;
        }
        Some(Self {
            width,
            height,
            values,
            wrap: WrapMode::default(),
        })
    }

    /// Grid where every texel has the same intensity.
    pub fn flat(width: usize, height: usize, value: f32) -> Option<Self> {
        Self::new(width, height, vec![value; width * height])
    }

    /// Build a grid by evaluating `f(x, z)` for every texel.
    pub fn from_fn(width: usize, height: usize, f: impl Fn(usize, usize) -> f32) -> Option<Self> {
        let mut values = Vec::with_capacity(width * height);
        for z in 0..height {
            for x in 0..width {
                values.push(f(x, z));
            }
        }
        Self::new(width, height, values)
    }

    /// Build a grid from 8-bit luma texels (0 = black, 255 = white).
    pub fn from_luma8(width: usize, height: usize, texels: &[u8]) -> Option<Self> {
        let values = texels.iter().map(|&t| t as f32 / 255.0).collect();
        Self::new(width, height, values)
    }

    /// Build a grid from RGB(A) float colors, converted with `grayscale`.
    pub fn from_colors(width: usize, height: usize, colors: &[[f32; 4]]) -> Option<Self> {
        let values = colors.iter().map(|c| grayscale(c[0], c[1], c[2])).collect();
        Self::new(width, height, values)
    }

    /// Fractal Perlin noise normalized to `[0, 1]`.
    /// `frequency` is in cycles per texel.
    pub fn from_noise(
        width: usize,
        height: usize,
        seed: u32,
        octaves: usize,
        frequency: f32,
    ) -> Option<Self> {
        let fbm = Fbm::<Perlin>::new(seed)
            .set_octaves(octaves)
            .set_frequency(frequency as f64)
            .set_lacunarity(2.0)
            .set_persistence(0.5);

        let mut grid = Self::from_fn(width, height, |x, z| {
            fbm.get([x as f64, z as f64]) as f32
        })?;
        grid.normalize();
        Some(grid)
    }

    pub fn with_wrap_mode(mut self, wrap: WrapMode) -> Self {
        self.wrap = wrap;
        self
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Rescale values so the minimum maps to 0 and the maximum to 1.
    /// A flat grid becomes all zeros.
    pub fn normalize(&mut self) {
        let min = self.values.iter().copied().fold(f32::INFINITY, f32::min);
        let max = self.values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let range = max - min;
        if range < MIN_NOISE_RANGE {
            self.values.fill(0.0);
            return;
        }
        for v in &mut self.values {
            *v = (*v - min) / range;
        }
    }
}

impl HeightSampler for HeightGrid {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn sample(&self, x: i32, z: i32) -> f32 {
        let x = self.wrap.resolve(x, self.width);
        let z = self.wrap.resolve(z, self.height);
        self.values[z * self.width + x]
    }
}
