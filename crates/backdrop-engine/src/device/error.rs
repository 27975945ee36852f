/// What the frame loop should do after `get_current_texture` fails.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface was reconfigured; drawing resumes next tick.
    Reconfigured,
    /// Transient error; skip this frame and keep the loop armed.
    SkipFrame,
    /// Out of memory; the host should shut down.
    Fatal,
}
