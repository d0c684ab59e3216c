/// Whether transitions on an object execute.
///
/// `Paused` suppresses new transition starts and freezes sequences that are
/// already running. Switching back to `Running` resumes frozen sequences from
/// where they stopped.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum AnimationPlayState {
    #[default]
    Running,
    Paused,
}

impl AnimationPlayState {
    pub fn is_paused(self) -> bool {
        matches!(self, AnimationPlayState::Paused)
    }
}
