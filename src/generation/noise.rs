//! Seeded noise primitives the climate/surface/cave/feature phases build on
//! (§4.1 Phase A). Grounded in the engine's own `noise::Perlin` sampling
//! (`world/generation/terrain_cpu.rs`), generalized into fBm/ridged
//! combinators and a `seed + salt` convention so every field (continentalness,
//! erosion, temperature, ...) gets an independent but deterministic sample.

use noise::{NoiseFn, Perlin};

/// A named, independently-seeded noise source. `salt` lets many fields share
/// one world seed without correlating.
pub struct NoiseSource {
    perlin: Perlin,
}

impl NoiseSource {
    pub fn new(seed: u32, salt: u32) -> Self {
        Self { perlin: Perlin::new(seed.wrapping_mul(0x9E3779B1).wrapping_add(salt)) }
    }

    pub fn sample2(&self, x: f64, z: f64) -> f64 {
        self.perlin.get([x, z])
    }

    pub fn sample3(&self, x: f64, y: f64, z: f64) -> f64 {
        self.perlin.get([x, y, z])
    }

    /// Fractal Brownian motion: `octaves` layers of this source at doubling
    /// frequency and halving amplitude, normalized to roughly `[-1, 1]`.
    pub fn fbm2(&self, x: f64, z: f64, octaves: u32, lacunarity: f64, gain: f64) -> f64 {
        let mut amplitude = 1.0;
        let mut frequency = 1.0;
        let mut sum = 0.0;
        let mut norm = 0.0;
        for _ in 0..octaves {
            sum += self.sample2(x * frequency, z * frequency) * amplitude;
            norm += amplitude;
            amplitude *= gain;
            frequency *= lacunarity;
        }
        if norm > 0.0 {
            sum / norm
        } else {
            0.0
        }
    }

    pub fn fbm3(&self, x: f64, y: f64, z: f64, octaves: u32, lacunarity: f64, gain: f64) -> f64 {
        let mut amplitude = 1.0;
        let mut frequency = 1.0;
        let mut sum = 0.0;
        let mut norm = 0.0;
        for _ in 0..octaves {
            sum += self.sample3(x * frequency, y * frequency, z * frequency) * amplitude;
            norm += amplitude;
            amplitude *= gain;
            frequency *= lacunarity;
        }
        if norm > 0.0 {
            sum / norm
        } else {
            0.0
        }
    }

    /// Ridged variant: folds fBm around zero so ridges form at zero-crossings,
    /// used for mountain peaks/valleys and cave worms.
    pub fn ridged2(&self, x: f64, z: f64, octaves: u32, lacunarity: f64, gain: f64) -> f64 {
        1.0 - self.fbm2(x, z, octaves, lacunarity, gain).abs() * 2.0
    }

    pub fn ridged3(&self, x: f64, y: f64, z: f64, octaves: u32, lacunarity: f64, gain: f64) -> f64 {
        1.0 - self.fbm3(x, y, z, octaves, lacunarity, gain).abs() * 2.0
    }
}

/// Offsets a 2D sample point by a second noise field before sampling `base`,
/// breaking up the grid-aligned look of raw Perlin output.
pub fn domain_warp2(base: &NoiseSource, warp: &NoiseSource, x: f64, z: f64, strength: f64) -> f64 {
    let wx = x + warp.sample2(x * 0.01, z * 0.01) * strength;
    let wz = z + warp.sample2(x * 0.01 + 100.0, z * 0.01 + 100.0) * strength;
    base.sample2(wx, wz)
}
