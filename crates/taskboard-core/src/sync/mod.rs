//! Live List Synchronizer
//!
//! Keeps one live subscription on the task collection, rebuilds the sorted
//! list from every snapshot, and sends add/toggle/remove intents outward.
//! Intents never touch the list: their effect arrives with the next
//! snapshot.

mod state;


use std::cell::RefCell;
use std::rc::{Rc, Weak};

pub use state::{BoardView, SyncPhase};
use state::BoardState;

use crate::backend::{Subscription, TaskBackend};
use crate::domain::{BackendError, BoardError, CollectionPath, NewTask, Task, TaskId};
use crate::reducer::reduce;
use crate::session::Session;

/// Receives every published view
pub type Observer = Rc<dyn Fn(&BoardView)>;

/// Synchronizer for one collection.
///
/// Dropping it releases the live subscription.
pub struct Synchronizer<B: TaskBackend> {
    backend: Rc<B>,
    path: CollectionPath,
    state: Rc<RefCell<BoardState>>,
    subscription: RefCell<Option<Subscription>>,
    observer: Observer,
}

impl<B: TaskBackend> Synchronizer<B> {
    pub fn new(backend: Rc<B>, path: CollectionPath, observer: impl Fn(&BoardView) + 'static) -> Self {
        Self {
            backend,
            path,
            state: Rc::new(RefCell::new(BoardState::default())),
            subscription: RefCell::new(None),
            observer: Rc::new(observer),
        }
    }

    /// Current view of the board
    pub fn view(&self) -> BoardView {
        self.state.borrow().view()
    }

    pub fn phase(&self) -> SyncPhase {
        self.state.borrow().phase
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.borrow().is_some()
    }

    /// Adopt a ready session and go live.
    ///
    /// An auth failure is shown but does not stop the subscription.
    pub fn start(&self, session: &Session) {
        {
            let mut state = self.state.borrow_mut();
            state.session = session.id().cloned();
            if let Some(failure) = session.failure() {
                state.error = Some(failure.clone());
            }
        }
        self.subscribe();
    }

    /// Open the live subscription, releasing any previous one first
    pub fn subscribe(&self) {
        self.release();

        {
            let mut state = self.state.borrow_mut();
            state.loading = true;
            state.phase = SyncPhase::Subscribing;
        }
        self.publish();

        log::info!("[SYNC] Subscribing to {}", self.path);
        let on_snapshot = {
            let state = Rc::downgrade(&self.state);
            let observer = self.observer.clone();
            Box::new(move |docs: Vec<Task>| apply_snapshot(&state, &observer, docs))
        };
        let on_error = {
            let state = Rc::downgrade(&self.state);
            let observer = self.observer.clone();
            Box::new(move |error: BackendError| apply_listener_error(&state, &observer, error))
        };

        match self.backend.subscribe(&self.path, on_snapshot, on_error) {
            Ok(subscription) => {
                *self.subscription.borrow_mut() = Some(subscription);
            }
            Err(e) => {
                // No listener was opened
                self.state.borrow_mut().phase = SyncPhase::Idle;
                apply_listener_error(&Rc::downgrade(&self.state), &self.observer, e);
            }
        }
    }

    /// Release the subscription and go idle. Nothing is published.
    pub fn detach(&self) {
        self.release();
        self.state.borrow_mut().phase = SyncPhase::Idle;
    }

    /// Submit a new task.
    ///
    /// Returns `Ok(None)` without writing when the trimmed text is empty or
    /// there is no session.
    pub async fn add(&self, text: &str) -> Result<Option<TaskId>, BoardError> {
        let Some(session) = self.state.borrow().session.clone() else {
            log::debug!("[SYNC] Add ignored: no session");
            return Ok(None);
        };
        let Some(task) = NewTask::from_input(text, session) else {
            log::debug!("[SYNC] Add ignored: empty text");
            return Ok(None);
        };

        match self.backend.add_task(&self.path, &task).await {
            Ok(id) => {
                log::info!("[SYNC] Added task {}", id);
                Ok(Some(id))
            }
            Err(e) => {
                log::error!("[SYNC] Error adding task: {}", e);
                Err(self.report(BoardError::AddFailed))
            }
        }
    }

    /// Flip the completion flag of `task`
    pub async fn toggle(&self, task: &Task) -> Result<(), BoardError> {
        let completed = !task.completed;
        match self.backend.set_completed(&self.path, &task.id, completed).await {
            Ok(()) => {
                log::info!("[SYNC] Task {} completed={}", task.id, completed);
                Ok(())
            }
            Err(e) => {
                log::error!("[SYNC] Error updating task {}: {}", task.id, e);
                Err(self.report(BoardError::UpdateFailed))
            }
        }
    }

    /// Permanently delete the task with `id`
    pub async fn remove(&self, id: &TaskId) -> Result<(), BoardError> {
        match self.backend.delete_task(&self.path, id).await {
            Ok(()) => {
                log::info!("[SYNC] Deleted task {}", id);
                Ok(())
            }
            Err(e) => {
                log::error!("[SYNC] Error deleting task {}: {}", id, e);
                Err(self.report(BoardError::DeleteFailed))
            }
        }
    }

    /// Put `error` in the message slot; the list is left alone
    fn report(&self, error: BoardError) -> BoardError {
        self.state.borrow_mut().error = Some(error.clone());
        self.publish();
        error
    }

    fn release(&self) {
        let previous = self.subscription.borrow_mut().take();
        if let Some(subscription) = previous {
            log::debug!("[SYNC] Releasing subscription on {}", self.path);
            subscription.cancel();
        }
    }

    fn publish(&self) {
        let view = self.state.borrow().view();
        (self.observer)(&view);
    }
}

fn apply_snapshot(state: &Weak<RefCell<BoardState>>, observer: &Observer, docs: Vec<Task>) {
    let Some(state) = state.upgrade() else {
        return;
    };
    let view = {
        let mut state = state.borrow_mut();
        state.items = reduce(&state.items, docs);
        state.loading = false;
        state.phase = SyncPhase::Live;
        state.view()
    };
    log::debug!("[SYNC] Snapshot applied: {} tasks", view.items.len());
    observer(&view);
}

fn apply_listener_error(state: &Weak<RefCell<BoardState>>, observer: &Observer, error: BackendError) {
    let Some(state) = state.upgrade() else {
        return;
    };
    log::error!("[SYNC] Snapshot error: {}", error);
    let view = {
        let mut state = state.borrow_mut();
        state.error = Some(BoardError::Subscription);
        state.loading = false;
        state.view()
    };
    observer(&view);
}
