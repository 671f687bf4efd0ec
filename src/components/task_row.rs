//! Task Row Component
//!
//! A single task in the list.

use leptos::prelude::*;
use taskboard_core::Task;

use crate::context::use_app_context;

/// One task row: completion toggle, text, delete button
#[component]
pub fn TaskRow(task: Task) -> impl IntoView {
    let ctx = use_app_context();

    let id = task.id.clone();
    let completed = task.completed;
    let text = task.text.clone();

    view! {
        <li class=if completed { "task-row completed" } else { "task-row" }>
            <div class="task-toggle" on:click=move |_| ctx.toggle(task.clone())>
                <span class=if completed { "task-check done" } else { "task-check" }>
                    {if completed { "✓" } else { "○" }}
                </span>
                <span class="task-text">{text}</span>
            </div>
            <button
                class="delete-btn"
                aria-label="Delete task"
                on:click=move |_| ctx.remove(id.clone())
            >
                "×"
            </button>
        </li>
    }
}
