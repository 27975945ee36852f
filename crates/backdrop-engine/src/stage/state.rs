/// Lifecycle of a mounted backdrop.
///
/// ```text
/// Unmounted ──mount──▶ Initializing ──start──▶ Running ⇄ Paused
///     │                     │                     │         │
///     └─────────────────────┴──────dispose────────┴─────────┴──▶ Disposed
/// ```
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum StageState {
    Unmounted,
    Initializing,
    Running,
    Paused,
    Disposed,
}

impl StageState {
    /// States in which the frame loop keeps re-arming itself.
    pub fn is_live(self) -> bool {
        matches!(self, Self::Initializing | Self::Running | Self::Paused)
    }
}

/// Host event subscriptions held by a mounted stage.
///
/// Installed together at mount and removed together at dispose.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Subscriptions {
    pub resize: bool,
    pub visibility: bool,
}

impl Subscriptions {
    pub fn all() -> Self {
        Self {
            resize: true,
            visibility: true,
        }
    }

    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_empty(self) -> bool {
        !self.resize && !self.visibility
    }
}
