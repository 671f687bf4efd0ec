//! New Task Form Component
//!
//! Input row for submitting new tasks.

use leptos::prelude::*;

use crate::context::use_app_context;
use crate::store::{use_app_store, AppStateStoreFields};

/// Whether the add button must stay disabled
pub fn submit_disabled(text: &str, loading: bool, auth_ready: bool) -> bool {
    text.trim().is_empty() || loading || !auth_ready
}

/// Form for creating new tasks
#[component]
pub fn NewTaskForm() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();

    let (new_text, set_new_text) = signal(String::new());

    let input_disabled = move || store.loading().get() || !store.auth_ready().get();
    let button_disabled = move || {
        submit_disabled(&new_text.get(), store.loading().get(), store.auth_ready().get())
    };

    let add_task = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let text = new_text.get();
        if text.trim().is_empty() { return; }
        // Cleared only once the write is accepted
        ctx.add(text, move || set_new_text.set(String::new()));
    };

    view! {
        <form class="new-task-form" on:submit=add_task>
            <input
                type="text"
                placeholder="Add a new task..."
                prop:value=move || new_text.get()
                on:input=move |ev| set_new_text.set(event_target_value(&ev))
                disabled=input_disabled
            />
            <button type="submit" disabled=button_disabled>"Add"</button>
        </form>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_disabled() {
        assert!(submit_disabled("", false, true));
        assert!(submit_disabled("   ", false, true));
        assert!(submit_disabled("Buy milk", true, true));
        assert!(submit_disabled("Buy milk", false, false));
        assert!(!submit_disabled(" Buy milk ", false, true));
    }
}
