use std::f32::consts::PI;

use glam::Vec3;
use rand::Rng;

/// Shape constants of the spiral distribution.
#[derive(Debug, Clone, PartialEq)]
pub struct SpiralParams {
    pub spiral_turns: f32,
    pub radius_power: f32,
    pub randomness: f32,
    pub angle_randomness: f32,
    pub height_scale: f32,
    pub base_shade: f32,
    pub shade_variation: f32,
    pub shade_randomness: f32,
    pub base_size: f32,
    pub size_variation: f32,
}

impl Default for SpiralParams {
    fn default() -> Self {
        Self {
            spiral_turns: 40.0,
            radius_power: 0.5,
            randomness: 0.05,
            angle_randomness: 0.1,
            height_scale: 1.8,
            base_shade: 0.1,
            shade_variation: 0.1,
            shade_randomness: 0.02,
            base_size: 0.1,
            size_variation: 0.2,
        }
    }
}

/// Static spiral point cloud. Generated once, never mutated.
#[derive(Debug, Clone)]
pub struct ParticleCloud {
    positions: Vec<Vec3>,
    /// Grayscale, identical on all three channels.
    shades: Vec<[f32; 3]>,
    sizes: Vec<f32>,
}

impl ParticleCloud {
    /// Builds `count` particles along the spiral, jittered by `rng`.
    pub fn generate<R: Rng + ?Sized>(count: usize, params: &SpiralParams, rng: &mut R) -> Self {
        let mut positions = Vec::with_capacity(count);
        let mut shades = Vec::with_capacity(count);
        let mut sizes = Vec::with_capacity(count);

        for i in 0..count {
            let t = i as f32 / count as f32;
            let radius = t.powf(params.radius_power);
            let angle = t * PI * params.spiral_turns;
            let height = (t * PI).sin() * params.height_scale;

            let jittered_radius = radius + (rng.gen_range(0.0_f32..1.0) - 0.5) * params.randomness;
            let jittered_angle = angle + (rng.gen_range(0.0_f32..1.0) - 0.5) * params.angle_randomness;

            positions.push(Vec3::new(
                jittered_angle.cos() * jittered_radius,
                height,
                jittered_angle.sin() * jittered_radius,
            ));

            let shade = params.base_shade
                + radius.sqrt() * params.shade_variation
                + rng.gen_range(0.0_f32..1.0) * params.shade_randomness;
            shades.push([shade; 3]);

            sizes.push((1.0 - (height * 0.5).abs()) * params.size_variation + params.base_size);
        }

        Self {
            positions,
            shades,
            sizes,
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn shades(&self) -> &[[f32; 3]] {
        &self.shades
    }

    pub fn sizes(&self) -> &[f32] {
        &self.sizes
    }
}
