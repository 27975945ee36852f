use std::time::Duration;

use serde::Deserialize;

use backdrop_engine::paint::Color;
use backdrop_engine::stage::{StageConfig, TimeStep};
use backdrop_engine::time::{PacingMode, clamp_fps};

use super::source::SourceParams;

/// User-facing wave field options.
///
/// Every key is optional; missing keys take the defaults below. Keys use the
/// camelCase names of the embedding API (`animationSpeed`, `targetFPS`, ...).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WaveFieldOptions {
    pub animation_speed: f32,
    pub rotation_speed: f32,
    pub rotation_amplitude: f32,
    #[serde(rename = "targetFPS")]
    pub target_fps: f32,
    pub wave_source_count: u32,
    pub wave_frequency: f32,
    pub wave_amplitude: f32,
    /// Grid cells per side; fixed for the lifetime of the visual.
    pub resolution: u32,
    /// Number of stacked field layers, 1..=3.
    pub field_count: u32,
    /// `0xRRGGBB`.
    pub background_color: u32,
    /// `0xRRGGBB`.
    pub line_color: u32,
    pub line_opacity: f32,
    #[serde(rename = "cameraFOV")]
    pub camera_fov: f32,
    /// Camera distance from the origin.
    pub zoom: f32,
    pub max_pixel_ratio: f32,
    /// Geometry is rebuilt every n-th rendered frame.
    pub geometry_update_interval: u32,
    pub resize_debounce_ms: u64,
}

impl Default for WaveFieldOptions {
    fn default() -> Self {
        Self {
            animation_speed: 1.0,
            rotation_speed: 1.0,
            rotation_amplitude: 1.0,
            target_fps: 60.0,
            wave_source_count: 5,
            wave_frequency: 1.0,
            wave_amplitude: 1.0,
            resolution: 32,
            field_count: 3,
            background_color: 0xF0EEE6,
            line_color: 0x333333,
            line_opacity: 0.4,
            camera_fov: 75.0,
            zoom: 6.0,
            max_pixel_ratio: 2.0,
            geometry_update_interval: 1,
            resize_debounce_ms: 100,
        }
    }
}

/// Options resolved into the constants the wave field runs on.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveSettings {
    /// Animation time added per rendered frame.
    pub time_step: f32,
    pub main_rotation_speed: f32,
    pub main_rotation_amplitude: f32,
    pub secondary_rotation_speed: f32,
    pub secondary_rotation_amplitude: f32,
    pub geometry_update_interval: u64,

    pub sources: SourceParams,
    pub resolution: usize,
    pub field_count: usize,

    pub background: Color,
    pub line: Color,
}

impl WaveFieldOptions {
    /// Derives the runtime constants, sanitising out-of-range values.
    pub fn resolve(&self) -> WaveSettings {
        let speed = self.rotation_speed;
        let amplitude = self.rotation_amplitude;

        WaveSettings {
            time_step: self.animation_speed * 0.0013,
            main_rotation_speed: speed * 0.3,
            main_rotation_amplitude: amplitude * 0.2,
            secondary_rotation_speed: speed * 0.2,
            secondary_rotation_amplitude: amplitude * 0.1,
            geometry_update_interval: u64::from(self.geometry_update_interval.max(1)),

            sources: SourceParams::new(
                self.wave_source_count as usize,
                self.wave_frequency,
                self.wave_amplitude,
            ),
            resolution: self.resolution.max(1) as usize,
            field_count: self.field_count.clamp(1, 3) as usize,

            background: Color::from_hex(self.background_color, 1.0),
            line: Color::from_hex(self.line_color, self.line_opacity),
        }
    }

    /// Render loop parameters for this visual.
    ///
    /// Time advances by a fixed step per rendered frame, and the pacer snaps
    /// its baseline to the accepted frame.
    pub fn stage_config(&self) -> StageConfig {
        StageConfig {
            target_fps: sanitize_fps(self.target_fps),
            pacing: PacingMode::Snap,
            time_step: TimeStep::Fixed(self.resolve().time_step),
            max_pixel_ratio: self.max_pixel_ratio,
            resize_debounce: Duration::from_millis(self.resize_debounce_ms),
            camera_fov_deg: self.camera_fov,
            camera_distance: self.zoom,
        }
    }
}

pub(crate) fn sanitize_fps(fps: f32) -> f32 {
    clamp_fps(fps)
}
