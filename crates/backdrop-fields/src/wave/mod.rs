//! Wave-interference grid.
//!
//! Per frame, each field layer regenerates its radial wave sources, samples
//! their summed height on a square grid, and rewrites the vertices of a
//! pre-allocated pool of grid lines. Up to three layers share one rotating
//! parent transform.

mod config;
mod field;
mod height_field;
mod line_pool;
mod renderer;
mod source;

pub use config::{WaveFieldOptions, WaveSettings};
pub(crate) use config::sanitize_fps;
pub use field::{LAYER_LAYOUTS, LayerLayout, SIZE_MULTIPLIER, WaveLayer, WaveScene};
pub use height_field::{HeightField, grid_coord};
pub use line_pool::{LineMeshPool, LineVertex};
pub use renderer::WaveField;
pub use source::{SourceParams, WAVE_SPEED, WaveSource, generate_sources, wave_height};
