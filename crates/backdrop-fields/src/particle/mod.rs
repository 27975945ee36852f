//! Spiral particle field.
//!
//! A static point cloud is generated once; all motion happens in the vertex
//! shader, driven by an elapsed-time uniform. [`vessel`] holds the same
//! deformation on the CPU.

mod cloud;
mod config;
mod renderer;
pub mod vessel;

pub use cloud::{ParticleCloud, SpiralParams};
pub use config::ParticleFieldOptions;
pub use renderer::ParticleField;
