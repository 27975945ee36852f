use std::f32::consts::TAU;

use glam::Vec3;

/// Phase velocity shared by every source.
pub const WAVE_SPEED: f32 = 5.0;

/// One radial wave emitter on the XZ plane.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct WaveSource {
    pub position: Vec3,
    pub frequency: f32,
    pub amplitude: f32,
    pub phase: f32,
}

impl WaveSource {
    /// Height this source contributes at `(x, z)`.
    ///
    /// `A · sin(d·f − t·WAVE_SPEED + φ) · exp(−d·decay)` with `d` the planar
    /// distance to the source.
    #[inline]
    pub fn contribution(&self, x: f32, z: f32, time: f32, decay_rate: f32) -> f32 {
        let dx = x - self.position.x;
        let dz = z - self.position.z;
        let distance = (dx * dx + dz * dz).sqrt();
        (distance * self.frequency - time * WAVE_SPEED + self.phase).sin()
            * self.amplitude
            * (-distance * decay_rate).exp()
    }
}

/// Constants driving source generation.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceParams {
    /// Number of sources on the ring; a central source is always added.
    pub count: usize,
    pub base_frequency: f32,
    pub frequency_variation: f32,
    pub base_amplitude: f32,
    pub amplitude_variation: f32,
    pub central_frequency: f32,
    pub central_amplitude: f32,
    pub phase_multiplier_outer: f32,
    pub phase_multiplier_central: f32,
    pub radius_variation: f32,
    pub radius_frequency: f32,
    pub decay_rate: f32,
}

impl SourceParams {
    pub fn new(count: usize, wave_frequency: f32, wave_amplitude: f32) -> Self {
        Self {
            count,
            base_frequency: wave_frequency * 2.0,
            frequency_variation: 2.0,
            base_amplitude: wave_amplitude * 0.3,
            amplitude_variation: 0.1,
            central_frequency: wave_frequency * 3.0,
            central_amplitude: wave_amplitude * 0.4,
            phase_multiplier_outer: 3.0,
            phase_multiplier_central: 4.0,
            radius_variation: 0.2,
            radius_frequency: 3.0,
            decay_rate: 0.3,
        }
    }
}

impl Default for SourceParams {
    fn default() -> Self {
        Self::new(5, 1.0, 1.0)
    }
}

/// Regenerates the sources of a field of `scale` at `time` into `out`.
///
/// `out` is cleared and refilled, so its allocation is reused across frames.
/// The ring sources come first, the central source last.
pub fn generate_sources(out: &mut Vec<WaveSource>, params: &SourceParams, time: f32, scale: f32) {
    out.clear();

    let n = params.count;
    for i in 0..n {
        let angle = i as f32 / n as f32 * TAU;
        let radius =
            scale * (1.0 + (angle * params.radius_frequency).sin() * params.radius_variation);

        out.push(WaveSource {
            position: Vec3::new(angle.cos() * radius, 0.0, angle.sin() * radius),
            frequency: params.base_frequency + (angle * params.frequency_variation).sin(),
            amplitude: params.base_amplitude + angle.cos() * params.amplitude_variation,
            phase: time * params.phase_multiplier_outer + angle,
        });
    }

    out.push(WaveSource {
        position: Vec3::ZERO,
        frequency: params.central_frequency,
        amplitude: params.central_amplitude,
        phase: time * params.phase_multiplier_central,
    });
}

/// Summed height of all `sources` at `(x, z)`.
pub fn wave_height(sources: &[WaveSource], x: f32, z: f32, time: f32, decay_rate: f32) -> f32 {
    sources
        .iter()
        .map(|s| s.contribution(x, z, time, decay_rate))
        .sum()
}
