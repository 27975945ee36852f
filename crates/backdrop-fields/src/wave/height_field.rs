use super::source::{WaveSource, wave_height};

/// World coordinate of grid index `k` on a field of side `size` split into
/// `resolution` cells. Index 0 is at `-size/2`, index `resolution` at `+size/2`.
#[inline]
pub fn grid_coord(k: usize, resolution: usize, size: f32) -> f32 {
    let step = size / resolution as f32;
    k as f32 * step - size / 2.0
}

/// Square grid of heights, `(resolution + 1)²` samples, row-major by `i`
/// (the X index).
///
/// Allocated once; [`fill`](Self::fill) overwrites it in place.
#[derive(Debug, Clone)]
pub struct HeightField {
    resolution: usize,
    heights: Vec<f32>,
}

impl HeightField {
    pub fn new(resolution: usize) -> Self {
        let resolution = resolution.max(1);
        let side = resolution + 1;
        Self {
            resolution,
            heights: vec![0.0; side * side],
        }
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Samples per side.
    pub fn side(&self) -> usize {
        self.resolution + 1
    }

    /// Height at X index `i`, Z index `j`.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f32 {
        self.heights[i * self.side() + j]
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.heights
    }

    /// Recomputes every sample for a field of side `size`.
    pub fn fill(&mut self, sources: &[WaveSource], size: f32, time: f32, decay_rate: f32) {
        let side = self.side();
        let resolution = self.resolution;

        for (i, row) in self.heights.chunks_exact_mut(side).enumerate() {
            let x = grid_coord(i, resolution, size);
            for (j, h) in row.iter_mut().enumerate() {
                let z = grid_coord(j, resolution, size);
                *h = wave_height(sources, x, z, time, decay_rate);
            }
        }
    }
}
