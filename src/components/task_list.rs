//! Task List Component
//!
//! Loader, empty state, or the sorted rows.

use leptos::prelude::*;

use crate::components::TaskRow;
use crate::store::{use_app_store, AppStateStoreFields};

#[component]
fn Loader() -> impl IntoView {
    view! {
        <div class="loader">
            <div class="spinner"></div>
        </div>
    }
}

/// The live task list
#[component]
pub fn TaskList() -> impl IntoView {
    let store = use_app_store();

    view! {
        <div class="task-list">
            {move || {
                if store.loading().get() {
                    view! { <Loader /> }.into_any()
                } else if store.tasks().with(|tasks| tasks.is_empty()) {
                    view! {
                        <div class="empty-state">
                            <p class="empty-title">"No tasks yet!"</p>
                            <p>"Add a task above to get started."</p>
                        </div>
                    }.into_any()
                } else {
                    view! {
                        <ul class="task-rows">
                            <For
                                each=move || store.tasks().get()
                                // Completion is part of the key so toggled rows re-render
                                key=|task| (task.id.clone(), task.completed)
                                children=move |task| view! { <TaskRow task=task /> }
                            />
                        </ul>
                    }.into_any()
                }
            }}
        </div>
    }
}
