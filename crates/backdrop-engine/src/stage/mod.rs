//! Shared render loop for procedural backdrops.
//!
//! A [`Stage`] owns lifecycle, frame pacing, debounced resizing, the camera
//! and the animation clock. A [`Visual`] owns GPU resources and geometry.
//! [`Backdrop`] joins the two and plugs them into the runtime as an
//! [`App`](crate::core::App).

mod backdrop;
mod host;
#[allow(clippy::module_inception)]
mod stage;
mod state;
mod visual;

pub use backdrop::Backdrop;
pub use host::HostSize;
pub use stage::{Stage, StageConfig, StageFrame, Tick, TimeStep};
pub use state::{StageState, Subscriptions};
pub use visual::Visual;
