//! Application Context
//!
//! Intent dispatch shared with components via the Leptos Context API.

use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use taskboard_core::{Synchronizer, Task, TaskId};

use crate::backend::FirebaseBackend;

pub type Board = Synchronizer<FirebaseBackend>;

/// App-wide handle to the live board
#[derive(Clone, Copy)]
pub struct AppContext {
    /// `None` until startup succeeds; intents are no-ops meanwhile
    board: StoredValue<Option<Rc<Board>>, LocalStorage>,
}

impl AppContext {
    pub fn new() -> Self {
        Self {
            board: StoredValue::new_local(None),
        }
    }

    pub fn attach(&self, board: Rc<Board>) {
        self.board.set_value(Some(board));
    }

    /// Release the live subscription
    pub fn detach(&self) {
        if let Some(board) = self.board.try_get_value().flatten() {
            board.detach();
        }
    }

    fn board(&self) -> Option<Rc<Board>> {
        self.board.get_value()
    }

    /// Submit new task text; `on_added` runs once the write is accepted
    pub fn add(&self, text: String, on_added: impl FnOnce() + 'static) {
        let Some(board) = self.board() else { return };
        spawn_local(async move {
            if let Ok(Some(_)) = board.add(&text).await {
                on_added();
            }
        });
    }

    pub fn toggle(&self, task: Task) {
        let Some(board) = self.board() else { return };
        spawn_local(async move {
            if let Err(e) = board.toggle(&task).await {
                log::debug!("[CONTEXT] Toggle of {} failed: {}", task.id, e);
            }
        });
    }

    pub fn remove(&self, id: TaskId) {
        let Some(board) = self.board() else { return };
        spawn_local(async move {
            if let Err(e) = board.remove(&id).await {
                log::debug!("[CONTEXT] Delete of {} failed: {}", id, e);
            }
        });
    }
}

pub fn use_app_context() -> AppContext {
    expect_context::<AppContext>()
}
