//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and the host window, and wires them to the GPU
//! layer and the hosted `core::App`.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig, RuntimeCtx};
