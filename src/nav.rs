/// State of the event-navigation handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavState {
    /// Waiting for input.
    #[default]
    Idle,
    /// A full redraw of all registered views is pending.
    Redrawing,
}

/// Handler behind the "Event Control" buttons.
///
/// "Next" triggers a full redraw of every registered view; no event-data
/// advance is performed. "Previous" is rendered but permanently disabled
/// and never transitions.
#[derive(Debug, Default)]
pub struct EventNavigator {
    state: NavState,
}

impl EventNavigator {
    /// Creates an idle navigator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> NavState {
        self.state
    }

    /// Handles a "next" click: enters `Redrawing` and returns `true` if
    /// the navigator was idle, otherwise leaves the state alone.
    pub fn request_next(&mut self) -> bool {
        if self.state == NavState::Idle {
            self.state = NavState::Redrawing;
            true
        } else {
            false
        }
    }

    /// Handles a "previous" click: unsupported, never transitions.
    pub fn request_previous(&mut self) -> bool {
        false
    }

    /// Marks the pending redraw as done, returning to `Idle`.
    pub fn finish_redraw(&mut self) {
        self.state = NavState::Idle;
    }
}
