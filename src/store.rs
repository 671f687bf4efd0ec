//! Global Application State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity. The
//! synchronizer replaces this state wholesale on every publish.

use leptos::prelude::*;
use reactive_stores::Store;
use taskboard_core::{BoardError, BoardView, SessionId, Task};

/// Board state rendered by the components
#[derive(Clone, Debug, Store)]
pub struct AppState {
    /// Sorted tasks from the latest snapshot
    pub tasks: Vec<Task>,
    /// Waiting for the first snapshot (or for startup)
    pub loading: bool,
    /// Single error message slot
    pub error: Option<String>,
    /// Resolved session id
    pub session_id: Option<SessionId>,
    /// Session bootstrap has finished (successfully or not)
    pub auth_ready: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            loading: true,
            error: None,
            session_id: None,
            auth_ready: false,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Type alias for the store
pub type AppStore = Store<AppState>;

/// Get the app store from context
pub fn use_app_store() -> AppStore {
    expect_context::<AppStore>()
}

// ========================
// Store Helper Functions
// ========================

/// Apply a published board view
pub fn store_publish(store: &AppStore, view: &BoardView) {
    store.tasks().set(view.items.clone());
    store.loading().set(view.loading);
    store.error().set(view.error.clone());
    store.session_id().set(view.session_id.clone());
}

/// Show a failure that happened before any synchronizer existed
pub fn store_fail(store: &AppStore, error: &BoardError) {
    store.error().set(Some(error.user_message().to_string()));
    if error.is_fatal() {
        // Nothing will ever arrive
        store.loading().set(false);
    }
}

pub fn store_set_auth_ready(store: &AppStore, session_id: Option<SessionId>) {
    store.session_id().set(session_id);
    store.auth_ready().set(true);
}
