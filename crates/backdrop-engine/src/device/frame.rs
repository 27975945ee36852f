/// A single acquired swapchain frame.
///
/// Short-lived: the surface texture must be submitted (and presented) before
/// the next frame can be acquired.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}
