use std::time::Instant;

use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App as CoreApp, AppControl, FrameCtx, MountCtx, WindowCtx};
use crate::device::{Gpu, GpuInit};
use crate::time::FrameClock;

/// Host window configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "backdrop".to_string(),
            initial_size: LogicalSize::new(800.0, 400.0),
        }
    }
}

/// Requests the app makes during `on_frame`.
///
/// Nothing is redrawn unless the app asks for it: a frame callback that does
/// not request a redraw ends the loop for that window.
#[derive(Debug, Default)]
pub struct RuntimeCtx {
    redraw: Option<Redraw>,
    exit: bool,
}

#[derive(Debug, Copy, Clone)]
enum Redraw {
    Now,
    At(Instant),
}

impl RuntimeCtx {
    /// Schedules the next `on_frame` as soon as the platform delivers it.
    pub fn request_redraw(&mut self) {
        self.redraw = Some(Redraw::Now);
    }

    /// Schedules the next `on_frame` no earlier than `at`; the event loop
    /// sleeps until then.
    pub fn request_redraw_at(&mut self, at: Instant) {
        self.redraw = Some(Redraw::At(at));
    }

    pub fn exit(&mut self) {
        self.exit = true;
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens one host window, mounts `app` into it, and runs until the window
    /// closes or the app exits.
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: 'static + CoreApp,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, gpu_init, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        Ok(())
    }
}

#[self_referencing]
struct WindowEntry {
    clock: FrameClock,
    /// A redraw has been requested and not yet delivered.
    armed: bool,

    window: Window,

    /// `None` when no drawing surface could be acquired; the window stays blank.
    #[borrows(window)]
    #[covariant]
    gpu: Option<Gpu<'this>>,
}

struct AppState<A>
where
    A: CoreApp + 'static,
{
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    entry: Option<WindowEntry>,
    /// Deadline of a delayed redraw request.
    wake_at: Option<Instant>,
    exit_requested: bool,
}

impl<A> AppState<A>
where
    A: CoreApp + 'static,
{
    fn new(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Self {
        Self {
            config,
            gpu_init,
            app,
            entry: None,
            wake_at: None,
            exit_requested: false,
        }
    }

    fn create_window_entry(&mut self, event_loop: &ActiveEventLoop) -> Result<WindowEntry> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let gpu_init = self.gpu_init.clone();

        Ok(WindowEntryBuilder {
            clock: FrameClock::default(),
            armed: false,
            window,
            gpu_builder: |w| match pollster::block_on(Gpu::new(w, gpu_init)) {
                Ok(gpu) => Some(gpu),
                Err(e) => {
                    log::warn!("no drawing surface, window stays blank: {e:#}");
                    None
                }
            },
        }
        .build())
    }

    /// Unmounts the app and drops the window. Safe to call repeatedly.
    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(entry) = self.entry.take() {
            self.app.on_unmount();
            drop(entry);
        }
        self.exit_requested = true;
        event_loop.exit();
    }
}

impl<A> ApplicationHandler for AppState<A>
where
    A: CoreApp + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() {
            return;
        }

        let mut entry = match self.create_window_entry(event_loop) {
            Ok(entry) => entry,
            Err(e) => {
                log::error!("failed to create host window: {e:#}");
                self.shutdown(event_loop);
                return;
            }
        };

        let app = &mut self.app;
        entry.with_mut(|fields| {
            let window = WindowCtx {
                id: fields.window.id(),
                window: fields.window,
            };
            app.on_mount(MountCtx {
                window,
                gpu: fields.gpu.as_mut(),
                now: Instant::now(),
            });

            fields.clock.reset_at(Instant::now());
            if fields.gpu.is_some() {
                *fields.armed = true;
                fields.window.request_redraw();
            }
        });

        self.entry = Some(entry);
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        // Redraws are driven by the app re-arming itself, not by the idle loop.
        let Some(at) = self.wake_at else {
            event_loop.set_control_flow(ControlFlow::Wait);
            return;
        };

        if Instant::now() >= at {
            self.wake_at = None;
            if let Some(entry) = &self.entry {
                entry.with_window(|w| w.request_redraw());
            }
            event_loop.set_control_flow(ControlFlow::Wait);
        } else {
            event_loop.set_control_flow(ControlFlow::WaitUntil(at));
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        // Split borrows to avoid `self` capture inside `ouroboros` closures.
        let (app, entry, wake_at) = (&mut self.app, &mut self.entry, &mut self.wake_at);

        let Some(entry) = entry.as_mut() else {
            return;
        };
        if entry.with_window(|w| w.id()) != window_id {
            return;
        }

        let control = entry.with_window(|w| {
            app.on_window_event(&WindowCtx { id: window_id, window: w }, &event)
        });
        if control == AppControl::Exit {
            self.shutdown(event_loop);
            return;
        }

        match &event {
            WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                self.shutdown(event_loop);
            }

            // Visibility and size changes must reach the app's loop even if
            // the platform dropped a pending redraw while the window was hidden.
            WindowEvent::Resized(_)
            | WindowEvent::ScaleFactorChanged { .. }
            | WindowEvent::Occluded(_) => {
                if entry.with_armed(|armed| *armed) {
                    *wake_at = None;
                    entry.with_window(|w| w.request_redraw());
                }
            }

            WindowEvent::RedrawRequested => {
                let mut runtime_ctx = RuntimeCtx::default();
                let mut app_control = AppControl::Continue;

                entry.with_mut(|fields| {
                    *fields.armed = false;

                    let Some(gpu) = fields.gpu.as_mut() else {
                        return;
                    };

                    let time = fields.clock.tick();
                    {
                        let mut ctx = FrameCtx {
                            window: WindowCtx {
                                id: window_id,
                                window: fields.window,
                            },
                            gpu,
                            time,
                            runtime: &mut runtime_ctx,
                        };
                        app_control = app.on_frame(&mut ctx);
                    }

                    match runtime_ctx.redraw {
                        Some(Redraw::Now) => {
                            *fields.armed = true;
                            fields.window.request_redraw();
                        }
                        Some(Redraw::At(at)) => {
                            *fields.armed = true;
                            *wake_at = Some(at);
                        }
                        None => {}
                    }
                });

                if app_control == AppControl::Exit || runtime_ctx.exit {
                    self.shutdown(event_loop);
                }
            }

            _ => {}
        }
    }

    fn exiting(&mut self, event_loop: &ActiveEventLoop) {
        self.shutdown(event_loop);
    }
}
