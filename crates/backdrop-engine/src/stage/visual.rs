use anyhow::Result;

use crate::camera::PerspectiveCamera;
use crate::paint::Color;
use crate::render::{RenderCtx, RenderTarget};

use super::stage::StageFrame;

/// A procedural visual hosted by a [`Backdrop`](super::Backdrop).
///
/// All GPU allocation happens in `setup`; `update` and `draw` run once per
/// rendered frame and must reuse what `setup` built.
pub trait Visual {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Color the surface is cleared to before `draw`.
    fn clear_color(&self) -> Color;

    /// Pre-allocates every buffer and pipeline the visual needs.
    fn setup(&mut self, ctx: &RenderCtx<'_>) -> Result<()>;

    /// Advances CPU-side state (geometry, uniforms) to `frame.time`.
    fn update(&mut self, frame: &StageFrame);

    /// Uploads dirty data and records draw commands.
    fn draw(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        camera: &PerspectiveCamera,
    );

    /// Releases GPU resources. Must be idempotent and tolerate a partial `setup`.
    fn dispose(&mut self);
}
