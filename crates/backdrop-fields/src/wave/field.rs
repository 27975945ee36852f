use std::f32::consts::PI;

use glam::{EulerRot, Mat4, Vec3};

use backdrop_engine::stage::StageFrame;

use super::config::WaveSettings;
use super::height_field::HeightField;
use super::line_pool::LineMeshPool;
use super::source::{WaveSource, generate_sources};

/// Field side length per unit of layer scale.
pub const SIZE_MULTIPLIER: f32 = 4.0;

/// Placement of one field layer inside the rotating parent.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LayerLayout {
    pub scale: f32,
    /// Added to the animation time before sampling this layer.
    pub time_offset: f32,
    pub position: Vec3,
    /// XYZ Euler angles, radians.
    pub rotation: Vec3,
}

pub const LAYER_LAYOUTS: [LayerLayout; 3] = [
    LayerLayout {
        scale: 1.5,
        time_offset: 0.0,
        position: Vec3::ZERO,
        rotation: Vec3::ZERO,
    },
    LayerLayout {
        scale: 0.8,
        time_offset: 0.33,
        position: Vec3::new(0.0, 1.5, 0.0),
        rotation: Vec3::new(PI / 6.0, 0.0, PI / 4.0),
    },
    LayerLayout {
        scale: 0.8,
        time_offset: 0.66,
        position: Vec3::new(0.0, -1.5, 0.0),
        rotation: Vec3::new(-PI / 6.0, 0.0, -PI / 4.0),
    },
];

/// One field: its sources, height grid and line pool, all sized once.
#[derive(Debug, Clone)]
pub struct WaveLayer {
    layout: LayerLayout,
    sources: Vec<WaveSource>,
    heights: HeightField,
    pool: LineMeshPool,
}

impl WaveLayer {
    fn new(layout: LayerLayout, resolution: usize, source_count: usize) -> Self {
        Self {
            layout,
            sources: Vec::with_capacity(source_count + 1),
            heights: HeightField::new(resolution),
            pool: LineMeshPool::new(resolution),
        }
    }

    pub fn layout(&self) -> &LayerLayout {
        &self.layout
    }

    /// Side length of the square this layer covers.
    pub fn size(&self) -> f32 {
        self.layout.scale * SIZE_MULTIPLIER
    }

    pub fn sources(&self) -> &[WaveSource] {
        &self.sources
    }

    pub fn heights(&self) -> &HeightField {
        &self.heights
    }

    pub fn pool(&self) -> &LineMeshPool {
        &self.pool
    }

    pub fn pool_mut(&mut self) -> &mut LineMeshPool {
        &mut self.pool
    }

    /// Transform relative to the parent group.
    pub fn model_matrix(&self) -> Mat4 {
        let r = self.layout.rotation;
        Mat4::from_translation(self.layout.position) * Mat4::from_euler(EulerRot::XYZ, r.x, r.y, r.z)
    }

    fn update(&mut self, settings: &WaveSettings, time: f32) {
        let t = time + self.layout.time_offset;
        let size = self.size();

        generate_sources(&mut self.sources, &settings.sources, t, self.layout.scale);
        self.heights
            .fill(&self.sources, size, t, settings.sources.decay_rate);
        self.pool.write_heights(&self.heights, size);
    }
}

/// CPU side of the wave field: every enabled layer plus the parent rotation.
#[derive(Debug, Clone)]
pub struct WaveScene {
    settings: WaveSettings,
    layers: Vec<WaveLayer>,
    main_rotation: Vec3,
}

impl WaveScene {
    /// Allocates `settings.field_count` layers. Disabled layers are never
    /// created.
    pub fn new(settings: WaveSettings) -> Self {
        let layers = LAYER_LAYOUTS
            .iter()
            .take(settings.field_count)
            .map(|layout| WaveLayer::new(*layout, settings.resolution, settings.sources.count))
            .collect();

        Self {
            settings,
            layers,
            main_rotation: Vec3::ZERO,
        }
    }

    pub fn settings(&self) -> &WaveSettings {
        &self.settings
    }

    pub fn layers(&self) -> &[WaveLayer] {
        &self.layers
    }

    pub fn layers_mut(&mut self) -> &mut [WaveLayer] {
        &mut self.layers
    }

    /// XYZ Euler angles of the parent group.
    pub fn main_rotation(&self) -> Vec3 {
        self.main_rotation
    }

    pub fn main_matrix(&self) -> Mat4 {
        let r = self.main_rotation;
        Mat4::from_euler(EulerRot::XYZ, r.x, r.y, r.z)
    }

    /// Per-frame entry point: geometry is rebuilt on every
    /// `geometry_update_interval`-th rendered frame.
    pub fn advance(&mut self, frame: &StageFrame) {
        if frame.frame % self.settings.geometry_update_interval == 0 {
            self.update(frame.time);
        }
    }

    /// Rebuilds every layer and the parent rotation for `time`.
    pub fn update(&mut self, time: f32) {
        for layer in &mut self.layers {
            layer.update(&self.settings, time);
        }

        let s = &self.settings;
        self.main_rotation.y = (time * s.main_rotation_speed).sin() * s.main_rotation_amplitude;
        self.main_rotation.x =
            (time * s.secondary_rotation_speed).cos() * s.secondary_rotation_amplitude;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wave::config::WaveFieldOptions;

    fn scene(options: WaveFieldOptions) -> WaveScene {
        WaveScene::new(options.resolve())
    }

    fn frame(n: u64, time: f32) -> StageFrame {
        StageFrame { time, dt: 0.0013, frame: n }
    }

    #[test]
    fn disabled_layers_are_never_allocated() {
        for count in 1..=3 {
            let s = scene(WaveFieldOptions {
                field_count: count,
                ..WaveFieldOptions::default()
            });
            assert_eq!(s.layers().len(), count as usize);
        }
    }

    #[test]
    fn buffers_keep_their_identity_across_frames() {
        let mut s = scene(WaveFieldOptions::default());
        let ptrs: Vec<_> = s
            .layers()
            .iter()
            .map(|l| (l.sources().as_ptr(), l.heights().as_slice().as_ptr(), l.pool().vertices().as_ptr()))
            .collect();

        for n in 1..=120 {
            s.advance(&frame(n, n as f32 * 0.0013));
        }

        let after: Vec<_> = s
            .layers()
            .iter()
            .map(|l| (l.sources().as_ptr(), l.heights().as_slice().as_ptr(), l.pool().vertices().as_ptr()))
            .collect();
        assert_eq!(ptrs, after);
        assert!(s.layers().iter().all(|l| l.pool().vertices().len() == 2 * 33 * 33));
    }

    #[test]
    fn minimal_grid_has_six_three_vertex_lines() {
        let mut s = scene(WaveFieldOptions {
            resolution: 2,
            field_count: 1,
            wave_source_count: 1,
            ..WaveFieldOptions::default()
        });
        s.update(0.0);

        let layer = &s.layers()[0];
        assert_eq!(layer.pool().line_count(), 6);
        for i in 0..6 {
            assert_eq!(layer.pool().line(i).len(), 3);
        }

        // One ring source plus the centre.
        assert_eq!(layer.sources().len(), 2);
        let outer = layer.sources()[0];
        let own = outer.contribution(outer.position.x, outer.position.z, 0.0, 0.3);
        assert!((own - outer.amplitude * outer.phase.sin()).abs() < 1e-6);
    }

    #[test]
    fn layers_sample_at_their_time_offset() {
        let mut s = scene(WaveFieldOptions::default());
        s.update(1.0);

        let central_phase = |layer: &WaveLayer| layer.sources().last().map(|c| c.phase);
        assert_eq!(central_phase(&s.layers()[0]), Some(4.0));
        assert!((central_phase(&s.layers()[1]).unwrap() - 1.33 * 4.0).abs() < 1e-5);
        assert!((central_phase(&s.layers()[2]).unwrap() - 1.66 * 4.0).abs() < 1e-5);
    }

    #[test]
    fn main_rotation_follows_time() {
        let mut s = scene(WaveFieldOptions::default());
        s.update(2.0);
        let r = s.main_rotation();
        assert!((r.y - (2.0_f32 * 0.3).sin() * 0.2).abs() < 1e-6);
        assert!((r.x - (2.0_f32 * 0.2).cos() * 0.1).abs() < 1e-6);
        assert_eq!(r.z, 0.0);
    }

    #[test]
    fn geometry_interval_skips_frames() {
        let mut s = scene(WaveFieldOptions {
            geometry_update_interval: 3,
            ..WaveFieldOptions::default()
        });

        s.advance(&frame(1, 0.1));
        s.advance(&frame(2, 0.2));
        assert!(!s.layers()[0].pool().is_dirty());
        assert_eq!(s.main_rotation(), Vec3::ZERO);

        s.advance(&frame(3, 0.3));
        assert!(s.layers()[0].pool().is_dirty());
    }

    #[test]
    fn second_layer_is_lifted_and_tilted() {
        let s = scene(WaveFieldOptions::default());
        let m = s.layers()[1].model_matrix();
        let origin = m.transform_point3(Vec3::ZERO);
        assert!((origin - Vec3::new(0.0, 1.5, 0.0)).length() < 1e-6);
        assert_ne!(m.transform_vector3(Vec3::X), Vec3::X);
    }
}
