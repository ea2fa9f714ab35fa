//! Multi-octave fractal Brownian motion (fBm) noise synthesis.

use serde::{Deserialize, Serialize};
use simdnoise::NoiseBuilder;

/// A 2D fractal noise field built from independent per-octave generators.
///
/// Octave `i` (of `n`) is sampled at frequency `2^n / 2^i` and contributes
/// amplitude `2^i / (10 * 2^n)`: each octave doubles spatial frequency
/// relative to the next (lacunarity 2) while the amplitude sum stays below
/// 1/10 for any octave count. For fixed seeds, `sample` is a pure function
/// of `(x, y)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoiseField {
    octaves: u8,
    seed: i32,
    octave_seeds: Vec<i32>,
}

impl NoiseField {
    /// Creates a noise field with the given octave count and base seed.
    ///
    /// Each octave gets its own seed derived from `seed`, so the octave
    /// generators are mutually independent.
    ///
    /// # Panics
    /// Panics if `octaves` is 0 or above 16.
    pub fn new(octaves: u8, seed: i32) -> Self {
        assert!(octaves >= 1, "octave count must be positive");
        assert!(octaves <= 16, "octave count above 16 is not supported");

        let octave_seeds = (0..octaves)
            .map(|i| seed.wrapping_add(i as i32 * 31337))
            .collect();

        Self {
            octaves,
            seed,
            octave_seeds,
        }
    }

    /// Number of octaves.
    pub fn octaves(&self) -> u8 {
        self.octaves
    }

    /// Base seed the per-octave seeds were derived from.
    pub fn seed(&self) -> i32 {
        self.seed
    }

    /// Samples the fractal noise value at a 2D position.
    pub fn sample(&self, x: f32, y: f32) -> f32 {
        let scale = (1u32 << self.octaves) as f32;
        let mut total = 0.0f32;

        for (i, &octave_seed) in self.octave_seeds.iter().enumerate() {
            let frequency = scale / (1u32 << i) as f32;
            let amplitude = (1u32 << i) as f32 / (10.0 * scale);

            // Single-sample generation at pre-scaled coordinates.
            let value = NoiseBuilder::fbm_2d_offset(x * frequency, 1, y * frequency, 1)
                .with_seed(octave_seed)
                .with_freq(1.0)
                .with_octaves(1)
                .generate()
                .0[0];

            total += amplitude * value;
        }

        total
    }
}
