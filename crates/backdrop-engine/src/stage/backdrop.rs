use std::time::Instant;

use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;

use crate::core::{App, AppControl, FrameCtx, MountCtx, WindowCtx};
use crate::render::RenderCtx;

use super::host::HostSize;
use super::stage::{Stage, StageConfig, Tick};
use super::visual::Visual;

/// Window changes a backdrop reacts to, detached from winit's event types.
#[derive(Debug, Copy, Clone, PartialEq)]
enum HostEvent {
    Resized {
        size: PhysicalSize<u32>,
        scale_factor: f64,
    },
    Occluded(bool),
}

impl HostEvent {
    fn from_window_event(window: &WindowCtx<'_>, event: &WindowEvent) -> Option<Self> {
        match event {
            WindowEvent::Resized(size) => Some(Self::Resized {
                size: *size,
                scale_factor: window.scale_factor(),
            }),
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => Some(Self::Resized {
                size: window.window.inner_size(),
                scale_factor: *scale_factor,
            }),
            WindowEvent::Occluded(occluded) => Some(Self::Occluded(*occluded)),
            _ => None,
        }
    }
}

/// Hosts one [`Visual`] in the runtime window.
///
/// Owns the [`Stage`] that drives it and translates window events into stage
/// transitions. The visual only sees `setup`, `update`, `draw` and `dispose`.
pub struct Backdrop<V: Visual> {
    stage: Stage,
    visual: V,
    occluded: bool,
    minimized: bool,
}

impl<V: Visual> Backdrop<V> {
    pub fn new(config: StageConfig, visual: V) -> Self {
        Self {
            stage: Stage::new(config),
            visual,
            occluded: false,
            minimized: false,
        }
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn visual(&self) -> &V {
        &self.visual
    }

    /// Stops the loop and releases the visual's GPU resources. Idempotent.
    pub fn dispose(&mut self) {
        if self.stage.dispose() {
            log::info!("{}: disposed", self.visual.name());
        }
        self.visual.dispose();
    }

    fn update_visibility(&mut self, now: Instant) {
        self.stage
            .set_visible(!self.occluded && !self.minimized, now);
    }

    /// A zero-area size minimises the host; any other size goes to the
    /// resize debouncer.
    fn handle_host_event(&mut self, event: HostEvent, now: Instant) {
        match event {
            HostEvent::Resized { size, scale_factor } => {
                self.minimized = size.width == 0 || size.height == 0;
                self.update_visibility(now);
                if !self.minimized {
                    self.stage
                        .host_resized(HostSize::from_physical(size, scale_factor), now);
                }
            }
            HostEvent::Occluded(occluded) => {
                self.occluded = occluded;
                self.update_visibility(now);
            }
        }
    }
}

impl<V: Visual> App for Backdrop<V> {
    fn on_mount(&mut self, ctx: MountCtx<'_, '_>) {
        let name = self.visual.name();
        let Some(gpu) = ctx.gpu else {
            log::warn!("{name}: no drawing surface, nothing to mount");
            return;
        };

        let (width, height) = ctx.window.logical_size();
        let host = HostSize::new(width, height, ctx.window.scale_factor());
        if !self.stage.mount(host) {
            return;
        }

        if let Some(size) = self.stage.surface_size() {
            gpu.resize(size);
        }

        let size = gpu.size();
        let rctx = RenderCtx::new(
            gpu.device(),
            gpu.queue(),
            gpu.surface_format(),
            (size.width.max(1), size.height.max(1)),
        );
        if let Err(e) = self.visual.setup(&rctx) {
            log::error!("{name}: setup failed: {e:#}");
            self.dispose();
            return;
        }

        self.stage.start(ctx.now);
        log::info!(
            "{name}: mounted at {}x{} on {} ({:?})",
            size.width,
            size.height,
            gpu.adapter_info().name,
            self.stage.state()
        );
    }

    fn on_window_event(&mut self, window: &WindowCtx<'_>, event: &WindowEvent) -> AppControl {
        if let Some(event) = HostEvent::from_window_event(window, event) {
            self.handle_host_event(event, Instant::now());
        }
        AppControl::Continue
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let now = ctx.time.now;

        if let Some(size) = self.stage.poll_resize(now) {
            ctx.gpu.resize(size);
        }

        let frame = match self.stage.tick(now) {
            Tick::Cancelled => return AppControl::Continue,
            Tick::Idle => {
                ctx.runtime.request_redraw_at(self.stage.next_wake(now));
                return AppControl::Continue;
            }
            Tick::Advance(frame) => {
                ctx.runtime.request_redraw();
                frame
            }
        };

        self.visual.update(&frame);

        let Self { stage, visual, .. } = self;
        let Some(camera) = stage.camera() else {
            return AppControl::Continue;
        };
        let clear = visual.clear_color();
        ctx.render(clear, |rctx, target| visual.draw(rctx, target, camera))
    }

    fn on_unmount(&mut self) {
        self.dispose();
    }
}

impl<V: Visual> Drop for Backdrop<V> {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::camera::PerspectiveCamera;
    use crate::paint::Color;
    use crate::render::RenderTarget;
    use crate::stage::{StageFrame, StageState};

    #[derive(Default)]
    struct Recorder {
        updates: u32,
        disposals: u32,
    }

    impl Visual for Recorder {
        fn name(&self) -> &'static str {
            "recorder"
        }

        fn clear_color(&self) -> Color {
            Color::transparent()
        }

        fn setup(&mut self, _ctx: &RenderCtx<'_>) -> anyhow::Result<()> {
            Ok(())
        }

        fn update(&mut self, _frame: &StageFrame) {
            self.updates += 1;
        }

        fn draw(&mut self, _: &RenderCtx<'_>, _: &mut RenderTarget<'_>, _: &PerspectiveCamera) {}

        fn dispose(&mut self) {
            self.disposals += 1;
        }
    }

    #[test]
    fn dispose_reaches_stage_and_visual_every_time() {
        let mut backdrop = Backdrop::new(StageConfig::default(), Recorder::default());
        backdrop.dispose();
        backdrop.dispose();
        assert_eq!(backdrop.stage().state(), StageState::Disposed);
        // The visual's own dispose must tolerate repeats.
        assert_eq!(backdrop.visual().disposals, 2);
        assert_eq!(backdrop.visual().updates, 0);
    }

    #[test]
    fn minimise_and_occlusion_combine() {
        let t0 = Instant::now();
        let mut backdrop = Backdrop::new(StageConfig::default(), Recorder::default());
        assert!(backdrop.stage.mount(HostSize::new(100.0, 100.0, 1.0)));
        backdrop.stage.start(t0);

        backdrop.minimized = true;
        backdrop.update_visibility(t0);
        assert_eq!(backdrop.stage().state(), StageState::Paused);

        backdrop.occluded = true;
        backdrop.minimized = false;
        backdrop.update_visibility(t0);
        assert_eq!(backdrop.stage().state(), StageState::Paused);

        backdrop.occluded = false;
        backdrop.update_visibility(t0);
        assert_eq!(backdrop.stage().state(), StageState::Running);
    }

    fn mounted(t0: Instant) -> Backdrop<Recorder> {
        let mut backdrop = Backdrop::new(StageConfig::default(), Recorder::default());
        assert!(backdrop.stage.mount(HostSize::new(100.0, 100.0, 1.0)));
        backdrop.stage.start(t0);
        backdrop
    }

    #[test]
    fn zero_area_resize_minimises_without_resizing() {
        let t0 = Instant::now();
        let mut backdrop = mounted(t0);

        let zero = HostEvent::Resized {
            size: PhysicalSize::new(0, 300),
            scale_factor: 1.0,
        };
        backdrop.handle_host_event(zero, t0);
        assert_eq!(backdrop.stage().state(), StageState::Paused);
        assert_eq!(backdrop.stage.poll_resize(t0 + Duration::from_secs(1)), None);

        let restored = HostEvent::Resized {
            size: PhysicalSize::new(400, 200),
            scale_factor: 1.0,
        };
        backdrop.handle_host_event(restored, t0);
        assert_eq!(backdrop.stage().state(), StageState::Running);
        assert_eq!(
            backdrop.stage.poll_resize(t0 + Duration::from_millis(150)),
            Some(PhysicalSize::new(400, 200))
        );
    }

    #[test]
    fn scale_change_is_debounced_as_a_resize() {
        let t0 = Instant::now();
        let mut backdrop = mounted(t0);

        // 3x is capped at the default max pixel ratio of 2.
        let event = HostEvent::Resized {
            size: PhysicalSize::new(600, 300),
            scale_factor: 3.0,
        };
        backdrop.handle_host_event(event, t0);
        assert_eq!(backdrop.stage.poll_resize(t0 + Duration::from_millis(50)), None);
        assert_eq!(
            backdrop.stage.poll_resize(t0 + Duration::from_millis(150)),
            Some(PhysicalSize::new(400, 200))
        );
        assert_eq!(backdrop.stage().camera().map(|c| c.aspect), Some(2.0));
    }

    #[test]
    fn occlusion_events_pause_and_resume() {
        let t0 = Instant::now();
        let mut backdrop = mounted(t0);

        backdrop.handle_host_event(HostEvent::Occluded(true), t0);
        assert_eq!(backdrop.stage().state(), StageState::Paused);

        let zero = HostEvent::Resized {
            size: PhysicalSize::new(0, 0),
            scale_factor: 1.0,
        };
        backdrop.handle_host_event(zero, t0);
        backdrop.handle_host_event(HostEvent::Occluded(false), t0);
        assert_eq!(backdrop.stage().state(), StageState::Paused);

        let restored = HostEvent::Resized {
            size: PhysicalSize::new(100, 100),
            scale_factor: 1.0,
        };
        backdrop.handle_host_event(restored, t0);
        assert_eq!(backdrop.stage().state(), StageState::Running);
    }
}
