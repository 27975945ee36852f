//! Color model shared between visuals and the frame loop.
//!
//! Colors are linear premultiplied RGBA. Hex literals from configuration are
//! sRGB-encoded and are linearized on construction.

mod color;

pub use color::{Color, srgb_to_linear};
