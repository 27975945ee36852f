//! Backdrop engine crate.
//!
//! Owns the platform and GPU runtime pieces the procedural visuals build on:
//! window and event loop, wgpu device and surface, frame timing, the camera
//! and the shared stage loop.

pub mod camera;
pub mod core;
pub mod device;
pub mod logging;
pub mod paint;
pub mod render;
pub mod stage;
pub mod time;
pub mod window;
