use winit::event::WindowEvent;

use super::ctx::{FrameCtx, MountCtx, WindowCtx};

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Contract between the runtime (platform loop) and whatever is hosted in
/// its window.
///
/// Call order: `on_mount` once after the window exists, then any number of
/// `on_window_event` / `on_frame`, then `on_unmount` once before the window
/// and its GPU context are dropped.
pub trait App {
    /// Called once the host window exists. `ctx.gpu` is `None` if no drawing
    /// surface could be acquired.
    fn on_mount(&mut self, ctx: MountCtx<'_, '_>) {
        let _ = ctx;
    }

    /// Called for window events, before the runtime's own handling.
    fn on_window_event(&mut self, window: &WindowCtx<'_>, event: &WindowEvent) -> AppControl {
        let _ = (window, event);
        AppControl::Continue
    }

    /// Called for every redraw the app requested through `RuntimeCtx`.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;

    /// Called once before the host window is destroyed.
    fn on_unmount(&mut self) {}
}
