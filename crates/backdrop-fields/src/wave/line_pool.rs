use bytemuck::{Pod, Zeroable};

use super::height_field::{HeightField, grid_coord};

/// Vertex of a grid line.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct LineVertex {
    pub pos: [f32; 3],
}

impl LineVertex {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];

    pub(crate) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<LineVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Pre-allocated vertices for the grid lines of one field.
///
/// Layout: `resolution + 1` horizontal lines (constant X) followed by
/// `resolution + 1` vertical lines (constant Z), each `resolution + 1`
/// vertices long, stored back to back so one buffer upload covers the pool.
#[derive(Debug, Clone)]
pub struct LineMeshPool {
    resolution: usize,
    vertices: Vec<LineVertex>,
    dirty: bool,
}

impl LineMeshPool {
    pub fn new(resolution: usize) -> Self {
        let resolution = resolution.max(1);
        let side = resolution + 1;
        Self {
            resolution,
            vertices: vec![LineVertex::zeroed(); 2 * side * side],
            dirty: false,
        }
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    pub fn line_count(&self) -> usize {
        2 * (self.resolution + 1)
    }

    pub fn vertices_per_line(&self) -> usize {
        self.resolution + 1
    }

    /// Vertices of line `index`; horizontal lines come first.
    pub fn line(&self, index: usize) -> &[LineVertex] {
        let n = self.vertices_per_line();
        &self.vertices[index * n..(index + 1) * n]
    }

    pub fn vertices(&self) -> &[LineVertex] {
        &self.vertices
    }

    /// Size of the whole pool in bytes.
    pub fn byte_len(&self) -> u64 {
        std::mem::size_of_val(self.vertices.as_slice()) as u64
    }

    /// Writes `heights` into every line for a field of side `size` and marks
    /// the pool dirty.
    ///
    /// Horizontal line `i`, vertex `j` and vertical line `j`, vertex `i` both
    /// get `(x_i, h[i][j], z_j)`.
    pub fn write_heights(&mut self, heights: &HeightField, size: f32) {
        debug_assert_eq!(heights.resolution(), self.resolution);

        let res = self.resolution;
        let side = res + 1;
        let (horizontal, vertical) = self.vertices.split_at_mut(side * side);

        for i in 0..side {
            let x = grid_coord(i, res, size);
            for j in 0..side {
                let z = grid_coord(j, res, size);
                let pos = [x, heights.get(i, j), z];
                horizontal[i * side + j].pos = pos;
                vertical[j * side + i].pos = pos;
            }
        }

        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Returns whether the pool changed since the last call, clearing the flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::wave::source::WaveSource;

    #[test]
    fn pool_shape_follows_resolution() {
        let pool = LineMeshPool::new(2);
        assert_eq!(pool.line_count(), 6);
        assert_eq!(pool.vertices_per_line(), 3);
        assert_eq!(pool.vertices().len(), 18);
        assert_eq!(pool.byte_len(), 18 * 12);
        assert!(!pool.is_dirty());
    }

    #[test]
    fn lines_cross_at_shared_samples() {
        let source = WaveSource {
            position: Vec3::new(0.5, 0.0, -0.3),
            frequency: 2.0,
            amplitude: 0.3,
            phase: 0.4,
        };
        let mut heights = HeightField::new(4);
        heights.fill(&[source], 6.0, 0.2, 0.3);

        let mut pool = LineMeshPool::new(4);
        pool.write_heights(&heights, 6.0);

        for i in 0..5 {
            for j in 0..5 {
                let h = pool.line(i)[j];
                let v = pool.line(5 + j)[i];
                assert_eq!(h, v);
                assert_eq!(h.pos[1], heights.get(i, j));
            }
        }

        // Horizontal lines run along Z at constant X.
        let first = pool.line(0);
        assert_eq!(first[0].pos[0], -3.0);
        assert_eq!(first[4].pos[0], -3.0);
        assert_eq!(first[0].pos[2], -3.0);
        assert_eq!(first[4].pos[2], 3.0);
    }

    #[test]
    fn dirty_flag_is_consumed_once() {
        let heights = HeightField::new(2);
        let mut pool = LineMeshPool::new(2);
        pool.write_heights(&heights, 4.0);
        assert!(pool.take_dirty());
        assert!(!pool.take_dirty());
    }
}
