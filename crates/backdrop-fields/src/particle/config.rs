use std::time::Duration;

use serde::Deserialize;

use backdrop_engine::stage::{StageConfig, TimeStep};
use backdrop_engine::time::PacingMode;

use crate::wave::sanitize_fps;

/// Camera distance of the particle field.
pub const CAMERA_Z: f32 = 5.0;

/// User-facing particle field options. Every key is optional.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParticleFieldOptions {
    /// Number of particles; fixed for the lifetime of the visual.
    pub count: u32,
    #[serde(rename = "targetFPS")]
    pub target_fps: f32,
    pub opacity: f32,
    #[serde(rename = "cameraFOV")]
    pub camera_fov: f32,
    pub max_pixel_ratio: f32,
    /// `0xRRGGBB`.
    pub background_color: u32,
    pub resize_debounce_ms: u64,
    /// Seed for a reproducible cloud; random when absent.
    pub seed: Option<u64>,
}

impl Default for ParticleFieldOptions {
    fn default() -> Self {
        Self {
            count: 5000,
            target_fps: 60.0,
            opacity: 0.4,
            camera_fov: 75.0,
            max_pixel_ratio: 2.0,
            background_color: 0xFFFFFF,
            resize_debounce_ms: 100,
            seed: None,
        }
    }
}

impl ParticleFieldOptions {
    pub fn particle_count(&self) -> usize {
        self.count.max(1) as usize
    }

    pub fn opacity(&self) -> f32 {
        self.opacity.clamp(0.0, 1.0)
    }

    /// Render loop parameters: wall-clock time, with the pacer carrying its
    /// overshoot into the next interval.
    pub fn stage_config(&self) -> StageConfig {
        StageConfig {
            target_fps: sanitize_fps(self.target_fps),
            pacing: PacingMode::CarryRemainder,
            time_step: TimeStep::Elapsed,
            max_pixel_ratio: self.max_pixel_ratio,
            resize_debounce: Duration::from_millis(self.resize_debounce_ms),
            camera_fov_deg: self.camera_fov,
            camera_distance: CAMERA_Z,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let opts = ParticleFieldOptions::default();
        assert_eq!(opts.particle_count(), 5000);
        assert_eq!(opts.opacity(), 0.4);

        let stage = opts.stage_config();
        assert_eq!(stage.time_step, TimeStep::Elapsed);
        assert_eq!(stage.pacing, PacingMode::CarryRemainder);
        assert_eq!(stage.camera_distance, 5.0);
        assert_eq!(stage.target_fps, 60.0);
    }

    #[test]
    fn zero_count_is_raised_to_one() {
        let opts = ParticleFieldOptions {
            count: 0,
            ..ParticleFieldOptions::default()
        };
        assert_eq!(opts.particle_count(), 1);
    }

    #[test]
    fn toml_keys_are_camel_case() {
        let opts: ParticleFieldOptions = toml::from_str(
            r#"
            count = 1200
            targetFPS = 24
            maxPixelRatio = 1.5
            seed = 7
            "#,
        )
        .unwrap();
        assert_eq!(opts.count, 1200);
        assert_eq!(opts.target_fps, 24.0);
        assert_eq!(opts.max_pixel_ratio, 1.5);
        assert_eq!(opts.seed, Some(7));
        assert_eq!(opts.background_color, 0xFFFFFF);
    }
}
