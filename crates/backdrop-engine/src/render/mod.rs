//! GPU rendering contracts.
//!
//! Visuals own their GPU resources (pipelines, buffers, bind groups) and
//! record into the frame's encoder through `RenderCtx` + `RenderTarget`.
//!
//! Convention:
//! - world space is right-handed, +Y up, camera looking down -Z
//! - shaders output linear premultiplied color

mod blend;
mod ctx;

pub use blend::premul_alpha_blend;
pub use ctx::{RenderCtx, RenderTarget};
