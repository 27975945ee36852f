//! Time subsystem.
//!
//! Frame timing utilities that take `Instant`s from the caller so they stay
//! testable without a running event loop:
//! - `FrameClock`: clamped delta time between presented frames
//! - `FramePacer`: target-FPS gate in front of the render work
//! - `Debouncer`: trailing-edge debounce for host resize bursts

mod debounce;
mod frame_clock;
mod frame_pacer;

pub use debounce::Debouncer;
pub use frame_clock::{FrameClock, FrameTime};
pub use frame_pacer::{FramePacer, MAX_FPS, MIN_FPS, PacingMode, clamp_fps};
