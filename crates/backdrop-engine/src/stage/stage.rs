use std::time::{Duration, Instant};

use winit::dpi::PhysicalSize;

use crate::camera::PerspectiveCamera;
use crate::time::{Debouncer, FrameClock, FramePacer, PacingMode};

use super::host::HostSize;
use super::state::{StageState, Subscriptions};

/// How the animation time accumulator advances per rendered frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum TimeStep {
    /// Constant step per rendered frame, independent of wall time.
    Fixed(f32),
    /// Clamped wall time since the previous rendered frame.
    Elapsed,
}

/// Stage parameters fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct StageConfig {
    pub target_fps: f32,
    pub pacing: PacingMode,
    pub time_step: TimeStep,
    pub max_pixel_ratio: f32,
    pub resize_debounce: Duration,
    pub camera_fov_deg: f32,
    pub camera_distance: f32,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            target_fps: 60.0,
            pacing: PacingMode::CarryRemainder,
            time_step: TimeStep::Elapsed,
            max_pixel_ratio: 2.0,
            resize_debounce: Duration::from_millis(100),
            camera_fov_deg: 75.0,
            camera_distance: 5.0,
        }
    }
}

/// Animation state handed to a visual for one rendered frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct StageFrame {
    /// Accumulated animation time.
    pub time: f32,
    /// Step added this frame.
    pub dt: f32,
    /// Rendered frame counter, starting at 1.
    pub frame: u64,
}

/// Outcome of one frame callback.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Tick {
    /// Loop cancelled: do not re-arm.
    Cancelled,
    /// Re-armed, nothing to do this refresh (paused, initializing, or paced out).
    Idle,
    /// Re-armed, advance and draw.
    Advance(StageFrame),
}

impl Tick {
    pub fn rearm(&self) -> bool {
        !matches!(self, Tick::Cancelled)
    }
}

/// Render context of one mounted backdrop: lifecycle, pacing, sizing, camera
/// and the animation clock.
///
/// The stage holds no GPU objects; the hosted visual owns those. Everything
/// here takes `Instant`s from the caller.
#[derive(Debug)]
pub struct Stage {
    config: StageConfig,
    state: StageState,
    cancelled: bool,
    subscriptions: Subscriptions,
    visible: bool,

    pacer: FramePacer,
    clock: FrameClock,
    resize: Debouncer<HostSize>,

    camera: Option<PerspectiveCamera>,
    host: Option<HostSize>,

    time: f32,
    frame_count: u64,
    rearms: u64,
}

impl Stage {
    pub fn new(config: StageConfig) -> Self {
        Self {
            pacer: FramePacer::new(config.target_fps, config.pacing),
            clock: FrameClock::new(),
            resize: Debouncer::new(config.resize_debounce),
            config,
            state: StageState::Unmounted,
            cancelled: false,
            subscriptions: Subscriptions::none(),
            visible: true,
            camera: None,
            host: None,
            time: 0.0,
            frame_count: 0,
            rearms: 0,
        }
    }

    /// `Unmounted → Initializing`: builds the camera for `host` and installs
    /// the host subscriptions. Returns `false` (and changes nothing) in any
    /// other state.
    pub fn mount(&mut self, host: HostSize) -> bool {
        if self.state != StageState::Unmounted {
            log::debug!("stage: mount ignored in {:?}", self.state);
            return false;
        }

        self.camera = Some(PerspectiveCamera::new(
            self.config.camera_fov_deg,
            host.aspect(),
            self.config.camera_distance,
        ));
        self.host = Some(host);
        self.subscriptions = Subscriptions::all();
        self.state = StageState::Initializing;

        log::debug!(
            "stage: unmounted -> initializing ({}x{} @{:.2})",
            host.width,
            host.height,
            host.scale_factor
        );
        true
    }

    /// `Initializing → Running` (or `Paused` if the host is already hidden).
    pub fn start(&mut self, now: Instant) {
        if self.state != StageState::Initializing {
            return;
        }
        self.clock.reset_at(now);
        self.pacer.reset();
        self.state = if self.visible {
            StageState::Running
        } else {
            StageState::Paused
        };
        log::debug!("stage: initializing -> {:?}", self.state);
    }

    /// One frame callback. The loop is re-armed before any work is decided.
    pub fn tick(&mut self, now: Instant) -> Tick {
        if self.cancelled || !self.state.is_live() {
            return Tick::Cancelled;
        }
        self.rearms += 1;

        if self.state != StageState::Running || !self.pacer.ready(now) {
            return Tick::Idle;
        }

        let dt = match self.config.time_step {
            TimeStep::Fixed(step) => step,
            TimeStep::Elapsed => self.clock.tick_at(now).dt,
        };
        self.time += dt;
        self.frame_count += 1;

        Tick::Advance(StageFrame {
            time: self.time,
            dt,
            frame: self.frame_count,
        })
    }

    /// When the host should wake the loop after an `Idle` tick.
    ///
    /// A paced-out loop sleeps until the next interval; a paused or
    /// initializing loop polls once per interval so visibility and resize
    /// changes are still picked up.
    pub fn next_wake(&self, now: Instant) -> Instant {
        match self.state {
            StageState::Running => self.pacer.next_due(now),
            _ => now + self.pacer.interval(),
        }
    }

    /// Host visibility changed. Pausing stops the time accumulator; the loop
    /// keeps re-arming.
    pub fn set_visible(&mut self, visible: bool, now: Instant) {
        if !self.subscriptions.visibility {
            return;
        }
        self.visible = visible;

        match (self.state, visible) {
            (StageState::Running, false) => {
                self.state = StageState::Paused;
                log::debug!("stage: running -> paused");
            }
            (StageState::Paused, true) => {
                self.clock.reset_at(now);
                self.pacer.reset();
                self.state = StageState::Running;
                log::debug!("stage: paused -> running");
            }
            _ => {}
        }
    }

    /// Host container changed size; applied after the debounce delay.
    pub fn host_resized(&mut self, host: HostSize, now: Instant) {
        if !self.subscriptions.resize {
            return;
        }
        self.resize.trigger(host, now);
    }

    /// Applies a pending resize whose debounce delay has elapsed.
    ///
    /// Returns the new drawable size for the surface. Empty sizes update
    /// nothing; visibility handling covers minimised hosts.
    pub fn poll_resize(&mut self, now: Instant) -> Option<PhysicalSize<u32>> {
        if !self.state.is_live() {
            return None;
        }
        let host = self.resize.poll(now)?;
        if host.is_empty() {
            return None;
        }
        let camera = self.camera.as_mut()?;
        camera.set_viewport(host.width, host.height);
        self.host = Some(host);

        let size = host.surface_size(self.config.max_pixel_ratio);
        log::debug!("stage: resized to {}x{}", size.width, size.height);
        Some(size)
    }

    /// Tears the stage down. Cancels the loop first, then drops subscriptions
    /// and references. Returns `false` if already disposed.
    pub fn dispose(&mut self) -> bool {
        if self.state == StageState::Disposed {
            return false;
        }
        let from = self.state;

        self.cancelled = true;
        self.subscriptions = Subscriptions::none();
        self.resize.cancel();
        self.camera = None;
        self.host = None;
        self.time = 0.0;
        self.frame_count = 0;
        self.state = StageState::Disposed;

        log::debug!("stage: {from:?} -> disposed");
        true
    }

    pub fn state(&self) -> StageState {
        self.state
    }

    pub fn config(&self) -> &StageConfig {
        &self.config
    }

    pub fn subscriptions(&self) -> Subscriptions {
        self.subscriptions
    }

    pub fn camera(&self) -> Option<&PerspectiveCamera> {
        self.camera.as_ref()
    }

    pub fn host(&self) -> Option<HostSize> {
        self.host
    }

    /// Drawable size for the current host, with the pixel ratio capped.
    pub fn surface_size(&self) -> Option<PhysicalSize<u32>> {
        self.host
            .map(|h| h.surface_size(self.config.max_pixel_ratio))
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Number of times the loop has re-armed itself.
    pub fn rearm_count(&self) -> u64 {
        self.rearms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn fixed_stage() -> Stage {
        Stage::new(StageConfig {
            time_step: TimeStep::Fixed(0.5),
            target_fps: 100.0, // 10ms
            pacing: PacingMode::Snap,
            ..StageConfig::default()
        })
    }

    fn running(stage: &mut Stage, t0: Instant) {
        assert!(stage.mount(HostSize::new(800.0, 400.0, 1.0)));
        stage.start(t0);
        assert_eq!(stage.state(), StageState::Running);
    }

    // ── lifecycle ─────────────────────────────────────────────────────────

    #[test]
    fn tick_before_mount_is_cancelled() {
        let mut stage = fixed_stage();
        assert_eq!(stage.tick(Instant::now()), Tick::Cancelled);
        assert_eq!(stage.rearm_count(), 0);
    }

    #[test]
    fn mount_builds_camera_and_subscriptions() {
        let mut stage = fixed_stage();
        assert!(stage.mount(HostSize::new(800.0, 400.0, 1.0)));
        assert_eq!(stage.state(), StageState::Initializing);
        assert_eq!(stage.subscriptions(), Subscriptions::all());
        assert_eq!(stage.camera().map(|c| c.aspect), Some(2.0));
        assert!(!stage.mount(HostSize::new(10.0, 10.0, 1.0)));
    }

    #[test]
    fn initializing_rearms_without_work() {
        let mut stage = fixed_stage();
        stage.mount(HostSize::new(800.0, 400.0, 1.0));
        assert_eq!(stage.tick(Instant::now()), Tick::Idle);
        assert_eq!(stage.rearm_count(), 1);
    }

    #[test]
    fn fixed_step_accumulates_per_rendered_frame() {
        let t0 = Instant::now();
        let mut stage = fixed_stage();
        running(&mut stage, t0);

        let Tick::Advance(f1) = stage.tick(t0) else { panic!("first frame should render") };
        assert_eq!(f1.time, 0.5);
        assert_eq!(f1.frame, 1);

        // Paced out.
        assert_eq!(stage.tick(t0 + ms(5)), Tick::Idle);

        let Tick::Advance(f2) = stage.tick(t0 + ms(10)) else { panic!("interval elapsed") };
        assert_eq!(f2.time, 1.0);
        assert_eq!(stage.frame_count(), 2);
        assert_eq!(stage.rearm_count(), 3);
    }

    #[test]
    fn elapsed_step_uses_wall_time() {
        let t0 = Instant::now();
        let mut stage = Stage::new(StageConfig::default());
        running(&mut stage, t0);

        let Tick::Advance(f) = stage.tick(t0 + ms(20)) else { panic!("should render") };
        assert!((f.time - 0.02).abs() < 1e-4);
    }

    #[test]
    fn idle_wake_waits_for_next_interval() {
        let t0 = Instant::now();
        let mut stage = fixed_stage();
        running(&mut stage, t0);
        assert!(matches!(stage.tick(t0), Tick::Advance(_)));
        assert_eq!(stage.tick(t0 + ms(4)), Tick::Idle);
        assert_eq!(stage.next_wake(t0 + ms(4)), t0 + ms(10));

        stage.set_visible(false, t0 + ms(4));
        assert_eq!(stage.next_wake(t0 + ms(4)), t0 + ms(14));
    }

    // ── visibility ────────────────────────────────────────────────────────

    #[test]
    fn hidden_host_stops_time_but_keeps_rearming() {
        let t0 = Instant::now();
        let mut stage = fixed_stage();
        running(&mut stage, t0);
        assert!(matches!(stage.tick(t0), Tick::Advance(_)));
        let time_before = stage.time();

        stage.set_visible(false, t0 + ms(1));
        assert_eq!(stage.state(), StageState::Paused);

        for i in 0..10 {
            let tick = stage.tick(t0 + ms(20 * (i + 1)));
            assert_eq!(tick, Tick::Idle);
            assert!(tick.rearm());
        }
        assert_eq!(stage.time(), time_before);
        assert_eq!(stage.rearm_count(), 11);

        stage.set_visible(true, t0 + ms(500));
        assert_eq!(stage.state(), StageState::Running);
        assert!(matches!(stage.tick(t0 + ms(500)), Tick::Advance(_)));
        assert_eq!(stage.time(), time_before + 0.5);
    }

    #[test]
    fn resume_does_not_count_hidden_wall_time() {
        let t0 = Instant::now();
        let mut stage = Stage::new(StageConfig::default());
        running(&mut stage, t0);
        assert!(matches!(stage.tick(t0 + ms(16)), Tick::Advance(_)));
        let before = stage.time();

        stage.set_visible(false, t0 + ms(20));
        stage.set_visible(true, t0 + ms(10_000));
        let Tick::Advance(f) = stage.tick(t0 + ms(10_016)) else { panic!("should render") };
        assert!(f.time - before < 0.05);
    }

    #[test]
    fn hidden_before_start_starts_paused() {
        let mut stage = fixed_stage();
        stage.mount(HostSize::new(800.0, 400.0, 1.0));
        stage.set_visible(false, Instant::now());
        stage.start(Instant::now());
        assert_eq!(stage.state(), StageState::Paused);
    }

    // ── resize ────────────────────────────────────────────────────────────

    #[test]
    fn aspect_changes_only_after_debounce() {
        let t0 = Instant::now();
        let mut stage = fixed_stage();
        running(&mut stage, t0);

        stage.host_resized(HostSize::new(300.0, 600.0, 3.0), t0);
        assert_eq!(stage.poll_resize(t0 + ms(50)), None);
        assert_eq!(stage.camera().map(|c| c.aspect), Some(2.0));

        let size = stage.poll_resize(t0 + ms(100));
        assert_eq!(size, Some(PhysicalSize::new(600, 1200)));
        assert_eq!(stage.camera().map(|c| c.aspect), Some(0.5));
    }

    #[test]
    fn resize_burst_applies_last_size() {
        let t0 = Instant::now();
        let mut stage = fixed_stage();
        running(&mut stage, t0);

        stage.host_resized(HostSize::new(100.0, 100.0, 1.0), t0);
        stage.host_resized(HostSize::new(900.0, 300.0, 1.0), t0 + ms(60));
        assert_eq!(stage.poll_resize(t0 + ms(120)), None);
        assert_eq!(stage.poll_resize(t0 + ms(160)), Some(PhysicalSize::new(900, 300)));
        assert_eq!(stage.camera().map(|c| c.aspect), Some(3.0));
    }

    // ── dispose ───────────────────────────────────────────────────────────

    #[test]
    fn dispose_is_idempotent() {
        let t0 = Instant::now();
        let mut stage = fixed_stage();
        running(&mut stage, t0);

        assert!(stage.dispose());
        assert!(!stage.dispose());
        assert_eq!(stage.state(), StageState::Disposed);
        assert!(stage.subscriptions().is_empty());
        assert!(stage.camera().is_none());
        assert_eq!(stage.time(), 0.0);
    }

    #[test]
    fn dispose_without_mount_is_safe() {
        let mut stage = fixed_stage();
        assert!(stage.dispose());
        assert!(!stage.mount(HostSize::new(1.0, 1.0, 1.0)));
    }

    #[test]
    fn events_after_dispose_are_ignored() {
        let t0 = Instant::now();
        let mut stage = fixed_stage();
        running(&mut stage, t0);
        stage.host_resized(HostSize::new(10.0, 10.0, 1.0), t0);
        stage.dispose();

        stage.host_resized(HostSize::new(20.0, 10.0, 1.0), t0);
        stage.set_visible(false, t0);
        assert_eq!(stage.poll_resize(t0 + ms(1_000)), None);
        assert_eq!(stage.tick(t0 + ms(1_000)), Tick::Cancelled);
        assert_eq!(stage.state(), StageState::Disposed);
    }
}
