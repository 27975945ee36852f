//! Procedural backdrop visuals.
//!
//! - [`wave`]: wireframe wave-interference grid synthesized on the CPU
//! - [`particle`]: spiral point cloud deformed in the vertex shader
//!
//! Both implement [`backdrop_engine::stage::Visual`] and are mounted through
//! [`backdrop_engine::stage::Backdrop`].

pub mod particle;
pub mod wave;

pub use particle::{ParticleField, ParticleFieldOptions};
pub use wave::{WaveField, WaveFieldOptions};
