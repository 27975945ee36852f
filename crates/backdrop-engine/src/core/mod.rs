//! Core engine-facing contracts.
//!
//! Defines the interface between the runtime (platform loop) and the hosted
//! app, and the per-mount / per-frame contexts handed to it.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, MountCtx, WindowCtx};
