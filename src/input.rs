/// Key state for one simulation step.
///
/// Movement, focus and fire are level-triggered ("held this frame");
/// `ability` is edge-triggered and should be true for one step per press.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Slow, precise movement while held.
    pub focus: bool,
    pub fire: bool,
    pub ability: bool,
}

impl FrameInput {
    /// Nothing pressed.
    pub fn idle() -> Self {
        Self::default()
    }
}

/// Latches ability key presses into the one-step `ability` flag.
///
/// A press is only accepted while the run is live and unpaused; pausing
/// drops a press the simulation has not seen yet.
#[derive(Clone, Copy, Debug, Default)]
pub struct AbilityLatch {
    queued: bool,
}

impl AbilityLatch {
    pub fn press(&mut self, accepting: bool) {
        if accepting {
            self.queued = true;
        }
    }

    pub fn cancel(&mut self) {
        self.queued = false;
    }

    /// Hand the press to the next step, clearing it.
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.queued)
    }
}
