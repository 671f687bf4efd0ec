//! Auth Bindings
//!
//! `AuthBackend` over Firebase Auth.

use std::cell::RefCell;
use std::rc::Rc;

use async_trait::async_trait;
use js_sys::{Function, Promise};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

use taskboard_core::{AuthBackend, BackendError, BackendResult, SessionId};

use super::{backend_error, FirebaseBackend, User};

/// Read `user.uid` from a `UserCredential`
fn credential_session(credential: &JsValue) -> BackendResult<SessionId> {
    let user = js_sys::Reflect::get(credential, &JsValue::from_str("user"))
        .map_err(|e| backend_error(&e))?;
    if user.is_null() || user.is_undefined() {
        return Err(BackendError::Unauthenticated("Sign-in returned no user".to_string()));
    }
    Ok(SessionId::new(user.unchecked_into::<User>().uid()))
}

#[async_trait(?Send)]
impl AuthBackend for FirebaseBackend {
    /// Waits for the first auth state event, which reports a restored user
    /// or null.
    async fn current_session(&self) -> BackendResult<Option<SessionId>> {
        let resolver: Rc<RefCell<Option<Function>>> = Rc::new(RefCell::new(None));
        let slot = resolver.clone();
        let first_state = Promise::new(&mut |resolve, _reject| {
            *slot.borrow_mut() = Some(resolve);
        });

        let pending = resolver.clone();
        let listener = Closure::<dyn FnMut(JsValue)>::new(move |user: JsValue| {
            if let Some(resolve) = pending.borrow_mut().take() {
                let _ = resolve.call1(&JsValue::NULL, &user);
            }
        });
        let unsubscribe = self.auth.on_auth_state_changed(&listener);

        let user = JsFuture::from(first_state).await;
        let _ = unsubscribe.call0(&JsValue::NULL);
        drop(listener);

        let user = user.map_err(|e| backend_error(&e))?;
        if user.is_null() || user.is_undefined() {
            return Ok(None);
        }
        Ok(Some(SessionId::new(user.unchecked_into::<User>().uid())))
    }

    async fn sign_in_with_token(&self, token: &str) -> BackendResult<SessionId> {
        let credential = JsFuture::from(self.auth.sign_in_with_custom_token(token))
            .await
            .map_err(|e| backend_error(&e))?;
        credential_session(&credential)
    }

    async fn sign_in_anonymously(&self) -> BackendResult<SessionId> {
        let credential = JsFuture::from(self.auth.sign_in_anonymously())
            .await
            .map_err(|e| backend_error(&e))?;
        credential_session(&credential)
    }
}
