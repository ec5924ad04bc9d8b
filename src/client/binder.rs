//! Binds the running total to a server-issued session id.
//!
//! ```text
//!   NoSession ──present──▶ Bound(id) ──absent──▶ JustLoggedOut
//!       ▲ absent               │ present(other)        │ present
//!       └──────                ▼                       ▼
//!                         Bound(other)             Bound(id)
//! ```

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingState {
    /// No session seen since load (unauthenticated start).
    NoSession,
    Bound(String),
    /// A bound session disappeared; local state has been reset.
    JustLoggedOut,
}

/// What an observation changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingTransition {
    Bound(String),
    Rebound { from: String, to: String },
    LoggedOut,
    Unchanged,
}

#[derive(Debug)]
pub struct SessionBinder {
    state: BindingState,
}

impl SessionBinder {
    pub fn new() -> Self {
        Self {
            state: BindingState::NoSession,
        }
    }

    pub fn state(&self) -> &BindingState {
        &self.state
    }

    pub fn session_id(&self) -> Option<&str> {
        match &self.state {
            BindingState::Bound(id) => Some(id),
            _ => None,
        }
    }

    pub fn is_bound(&self) -> bool {
        matches!(self.state, BindingState::Bound(_))
    }

    /// Feed the result of a session lookup.
    ///
    /// Only `Bound` followed by absence is a logout; absence on an
    /// unauthenticated load leaves the state alone.
    pub fn observe(&mut self, present: Option<&str>) -> BindingTransition {
        let (next, transition) = match (&self.state, present) {
            (BindingState::Bound(current), Some(id)) if current == id => {
                return BindingTransition::Unchanged;
            }
            (BindingState::Bound(current), Some(id)) => (
                BindingState::Bound(id.to_string()),
                BindingTransition::Rebound {
                    from: current.clone(),
                    to: id.to_string(),
                },
            ),
            (BindingState::Bound(_), None) => {
                (BindingState::JustLoggedOut, BindingTransition::LoggedOut)
            }
            (_, Some(id)) => (
                BindingState::Bound(id.to_string()),
                BindingTransition::Bound(id.to_string()),
            ),
            (_, None) => return BindingTransition::Unchanged,
        };

        self.state = next;
        transition
    }
}

impl Default for SessionBinder {
    fn default() -> Self {
        Self::new()
    }
}
