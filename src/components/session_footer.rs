//! Session Footer Component
//!
//! Shows the session id so collaborators can tell each other apart.

use leptos::prelude::*;
use taskboard_core::SessionId;

use crate::store::{use_app_store, AppStateStoreFields};

pub fn session_label(session_id: Option<&SessionId>) -> String {
    session_id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "Connecting...".to_string())
}

#[component]
pub fn SessionFooter() -> impl IntoView {
    let store = use_app_store();

    view! {
        <footer class="session-footer">
            <p class="session-caption">"Your Session ID (for collaboration):"</p>
            <p class="session-id">{move || session_label(store.session_id().get().as_ref())}</p>
        </footer>
    }
}
