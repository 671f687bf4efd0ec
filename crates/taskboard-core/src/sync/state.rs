//! Synchronizer state and the view handed to the rendering layer.

use crate::domain::{BoardError, SessionId, Task};

/// Lifecycle of the live subscription.
///
/// Errors do not have a phase of their own: they sit in the message slot
/// while snapshots keep arriving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncPhase {
    /// No subscription open
    #[default]
    Idle,
    /// Subscription open, first snapshot not yet received
    Subscribing,
    /// At least one snapshot applied
    Live,
}

/// What the rendering layer receives on every publish
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoardView {
    /// Sorted task list
    pub items: Vec<Task>,
    pub loading: bool,
    /// Most recent failure message, if any
    pub error: Option<String>,
    pub session_id: Option<SessionId>,
    pub phase: SyncPhase,
}

#[derive(Debug)]
pub(crate) struct BoardState {
    pub items: Vec<Task>,
    pub loading: bool,
    pub error: Option<BoardError>,
    pub session: Option<SessionId>,
    pub phase: SyncPhase,
}

impl Default for BoardState {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            // Nothing to show until the first snapshot
            loading: true,
            error: None,
            session: None,
            phase: SyncPhase::Idle,
        }
    }
}

impl BoardState {
    pub fn view(&self) -> BoardView {
        BoardView {
            items: self.items.clone(),
            loading: self.loading,
            error: self.error.as_ref().map(|e| e.user_message().to_string()),
            session_id: self.session.clone(),
            phase: self.phase,
        }
    }
}
