//! Error Banner Component

use leptos::prelude::*;

use crate::store::{use_app_store, AppStateStoreFields};

/// Shows the single error message slot, if set
#[component]
pub fn ErrorBanner() -> impl IntoView {
    let store = use_app_store();

    view! {
        {move || store.error().get().map(|message| view! {
            <div class="error-banner" role="alert">{message}</div>
        })}
    }
}
