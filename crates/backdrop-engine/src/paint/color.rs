/// Linear premultiplied RGBA color.
///
/// Invariant:
/// - `rgb` components are multiplied by `a` (premultiplied alpha).
///
/// Pipelines blend with `One, OneMinusSrcAlpha`, so shaders output this
/// representation directly.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32, // premultiplied
    pub g: f32, // premultiplied
    pub b: f32, // premultiplied
    pub a: f32,
}

impl Color {
    #[inline]
    pub const fn transparent() -> Self {
        Self { r: 0.0, g: 0.0, b: 0.0, a: 0.0 }
    }

    /// Creates a premultiplied color from straight alpha linear components.
    #[inline]
    pub fn from_straight(r: f32, g: f32, b: f32, a: f32) -> Self {
        let a = a.clamp(0.0, 1.0);
        Self {
            r: r.clamp(0.0, 1.0) * a,
            g: g.clamp(0.0, 1.0) * a,
            b: b.clamp(0.0, 1.0) * a,
            a,
        }
    }

    /// Creates a color from a `0xRRGGBB` sRGB literal and a straight alpha.
    ///
    /// The channels are decoded to linear so they survive the sRGB surface
    /// encode unchanged.
    pub fn from_hex(rgb: u32, alpha: f32) -> Self {
        let channel = |shift: u32| srgb_to_linear(((rgb >> shift) & 0xFF) as f32 / 255.0);
        Self::from_straight(channel(16), channel(8), channel(0), alpha)
    }

    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    #[inline]
    pub fn to_wgpu(self) -> wgpu::Color {
        wgpu::Color {
            r: self.r as f64,
            g: self.g as f64,
            b: self.b as f64,
            a: self.a as f64,
        }
    }
}

/// Decodes one sRGB-encoded channel in `0..=1` to linear.
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_extremes_map_to_unit_range() {
        let white = Color::from_hex(0xFFFFFF, 1.0);
        assert!((white.r - 1.0).abs() < 1e-6);
        assert!((white.b - 1.0).abs() < 1e-6);

        let black = Color::from_hex(0x000000, 1.0);
        assert_eq!(black.to_array(), [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn hex_is_linearized_and_premultiplied() {
        // 0x33 = 0.2 sRGB ≈ 0.0331 linear.
        let c = Color::from_hex(0x333333, 0.4);
        assert!((c.r - 0.0331 * 0.4).abs() < 1e-3);
        assert!((c.a - 0.4).abs() < 1e-6);
        assert_eq!(c.r, c.g);
    }

    #[test]
    fn hex_channel_order_is_rgb() {
        let c = Color::from_hex(0xFF0000, 1.0);
        assert!(c.r > 0.99);
        assert_eq!(c.g, 0.0);
        assert_eq!(c.b, 0.0);
    }
}
