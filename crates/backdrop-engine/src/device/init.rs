/// How the host window's GPU device and surface are acquired.
///
/// Backdrops are decorative, so the defaults favour portability over features:
/// no optional wgpu features, default limits, FIFO presentation, low power.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Pick an `*Srgb` surface format if the surface lists one.
    ///
    /// Colors handed to renderers are linear; an sRGB target encodes them on write.
    pub prefer_srgb: bool,

    /// FIFO paces presentation to the display refresh, which is what the
    /// frame pacer expects as its upper bound.
    pub present_mode: wgpu::PresentMode,

    /// Forwarded to `request_adapter`.
    pub power_preference: wgpu::PowerPreference,

    /// Requested compositing mode; unsupported requests fall back to the
    /// first mode the surface reports.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    pub required_limits: wgpu::Limits,

    /// Hint only; backends may ignore it.
    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            power_preference: wgpu::PowerPreference::LowPower,
            alpha_mode: None,
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
        }
    }
}
