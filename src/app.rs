//! Task Board Frontend App
//!
//! Startup wiring and page layout.

use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use reactive_stores::Store;
use taskboard_core::{bootstrap, AppConfig, BoardError, Synchronizer};

use crate::backend::FirebaseBackend;
use crate::components::{ErrorBanner, NewTaskForm, SessionFooter, TaskList};
use crate::context::AppContext;
use crate::environment::load_config;
use crate::store::{store_fail, store_publish, store_set_auth_ready, AppState, AppStore};

/// Connect, bootstrap the session, then go live.
///
/// Initialization failures are fatal: the message is shown and no board is
/// attached, so every intent stays a no-op.
fn start_board(store: AppStore, ctx: AppContext) {
    let config: AppConfig = match load_config() {
        Ok(config) => config,
        Err(e) => {
            log::error!("[APP] Configuration error: {}", e);
            store_fail(&store, &BoardError::from(e));
            return;
        }
    };

    let backend = match FirebaseBackend::connect(&config.backend) {
        Ok(backend) => backend,
        Err(e) => {
            log::error!("[APP] Firebase initialization error: {:?}", e);
            store_fail(&store, &e);
            return;
        }
    };

    spawn_local(async move {
        let session = bootstrap(&*backend, config.initial_auth_token.as_deref()).await;
        store_set_auth_ready(&store, session.id().cloned());

        let board = Rc::new(Synchronizer::new(
            backend,
            config.collection_path(),
            move |view| store_publish(&store, view),
        ));
        board.start(&session);
        ctx.attach(board);
    });
}

#[component]
pub fn App() -> impl IntoView {
    let store: AppStore = Store::new(AppState::new());
    let ctx = AppContext::new();

    // Provide context to all children
    provide_context(store);
    provide_context(ctx);

    start_board(store, ctx);
    on_cleanup(move || ctx.detach());

    view! {
        <div class="app-layout">
            <main class="board">
                <header class="board-header">
                    <h1>"Collaborative Task Manager"</h1>
                    <p class="board-subtitle">"Changes are updated in real-time for all users."</p>
                </header>

                <section class="board-body">
                    <NewTaskForm />
                    <ErrorBanner />
                    <TaskList />
                </section>

                <SessionFooter />
            </main>
        </div>
    }
}
