use winit::dpi::PhysicalSize;

/// Size of the host container (the window's client area).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct HostSize {
    /// Logical width.
    pub width: f32,
    /// Logical height.
    pub height: f32,
    /// Device pixel ratio.
    pub scale_factor: f64,
}

impl HostSize {
    pub fn new(width: f32, height: f32, scale_factor: f64) -> Self {
        Self {
            width,
            height,
            scale_factor,
        }
    }

    /// Converts a physical window size reported by the platform.
    pub fn from_physical(size: PhysicalSize<u32>, scale_factor: f64) -> Self {
        let scale = if scale_factor > 0.0 { scale_factor } else { 1.0 };
        Self {
            width: (size.width as f64 / scale) as f32,
            height: (size.height as f64 / scale) as f32,
            scale_factor: scale,
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    pub fn aspect(&self) -> f32 {
        if self.is_empty() {
            1.0
        } else {
            self.width / self.height
        }
    }

    /// Pixel ratio actually used for the surface: the device ratio capped at
    /// `max_pixel_ratio`.
    pub fn pixel_ratio(&self, max_pixel_ratio: f32) -> f32 {
        let dpr = if self.scale_factor > 0.0 {
            self.scale_factor as f32
        } else {
            1.0
        };
        if max_pixel_ratio > 0.0 {
            dpr.min(max_pixel_ratio)
        } else {
            dpr
        }
    }

    /// Drawable size in physical pixels for the capped pixel ratio.
    pub fn surface_size(&self, max_pixel_ratio: f32) -> PhysicalSize<u32> {
        let ratio = self.pixel_ratio(max_pixel_ratio);
        PhysicalSize::new(
            (self.width * ratio).round().max(0.0) as u32,
            (self.height * ratio).round().max(0.0) as u32,
        )
    }
}
