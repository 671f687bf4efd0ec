//! Firebase Bindings
//!
//! Frontend bindings to the Firebase compat SDK, which the host page loads
//! as the global `firebase` namespace. Organized by concern.

mod auth;
mod tasks;

use std::rc::Rc;

use js_sys::{Function, Promise};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use taskboard_core::{BackendConfig, BackendError, BoardError};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = firebase, js_name = initializeApp, catch)]
    fn initialize_app(options: &JsValue) -> Result<FirebaseApp, JsValue>;

    #[wasm_bindgen(js_namespace = ["firebase", "firestore", "FieldValue"], js_name = serverTimestamp)]
    fn server_timestamp() -> JsValue;

    #[derive(Clone)]
    type FirebaseApp;

    #[wasm_bindgen(method, catch)]
    fn auth(this: &FirebaseApp) -> Result<Auth, JsValue>;

    #[wasm_bindgen(method, catch)]
    fn firestore(this: &FirebaseApp) -> Result<Firestore, JsValue>;

    // ========================
    // Auth
    // ========================

    #[derive(Clone)]
    type Auth;

    #[wasm_bindgen(method, js_name = onAuthStateChanged)]
    fn on_auth_state_changed(this: &Auth, next: &Closure<dyn FnMut(JsValue)>) -> Function;

    #[wasm_bindgen(method, js_name = signInAnonymously)]
    fn sign_in_anonymously(this: &Auth) -> Promise;

    #[wasm_bindgen(method, js_name = signInWithCustomToken)]
    fn sign_in_with_custom_token(this: &Auth, token: &str) -> Promise;

    type User;

    #[wasm_bindgen(method, getter)]
    fn uid(this: &User) -> String;

    // ========================
    // Firestore
    // ========================

    #[derive(Clone)]
    type Firestore;

    #[wasm_bindgen(method)]
    fn collection(this: &Firestore, path: &str) -> CollectionReference;

    type CollectionReference;

    #[wasm_bindgen(method, js_name = onSnapshot)]
    fn on_snapshot(
        this: &CollectionReference,
        next: &Closure<dyn FnMut(QuerySnapshot)>,
        error: &Closure<dyn FnMut(JsValue)>,
    ) -> Function;

    #[wasm_bindgen(method)]
    fn add(this: &CollectionReference, data: &JsValue) -> Promise;

    #[wasm_bindgen(method)]
    fn doc(this: &CollectionReference, id: &str) -> DocumentReference;

    type DocumentReference;

    #[wasm_bindgen(method, getter)]
    fn id(this: &DocumentReference) -> String;

    #[wasm_bindgen(method)]
    fn update(this: &DocumentReference, data: &JsValue) -> Promise;

    #[wasm_bindgen(method)]
    fn delete(this: &DocumentReference) -> Promise;

    type QuerySnapshot;

    #[wasm_bindgen(method, getter)]
    fn docs(this: &QuerySnapshot) -> js_sys::Array;

    type DocumentSnapshot;

    #[wasm_bindgen(method, getter, js_name = id)]
    fn doc_id(this: &DocumentSnapshot) -> String;

    #[wasm_bindgen(method)]
    fn data(this: &DocumentSnapshot) -> JsValue;

    type Timestamp;

    #[wasm_bindgen(method, catch, js_name = toMillis)]
    fn to_millis(this: &Timestamp) -> Result<f64, JsValue>;
}

/// Handle to an initialized Firebase app: auth plus the document store
#[derive(Clone)]
pub struct FirebaseBackend {
    auth: Auth,
    db: Firestore,
}

impl FirebaseBackend {
    /// Initialize the SDK with the host-provided connection settings
    pub fn connect(config: &BackendConfig) -> Result<Rc<Self>, BoardError> {
        let options = serde_wasm_bindgen::to_value(config)
            .map_err(|e| BoardError::Initialization(format!("Serialization error: {}", e)))?;
        let app = initialize_app(&options).map_err(|e| BoardError::Initialization(describe(&e)))?;
        let auth = app.auth().map_err(|e| BoardError::Initialization(describe(&e)))?;
        let db = app.firestore().map_err(|e| BoardError::Initialization(describe(&e)))?;
        log::info!("[FIREBASE] Initialized project {}", config.project_id);
        Ok(Rc::new(Self { auth, db }))
    }
}

/// Turn a rejected SDK call into a classified backend error
fn backend_error(error: &JsValue) -> BackendError {
    let code = js_sys::Reflect::get(error, &JsValue::from_str("code"))
        .ok()
        .and_then(|c| c.as_string())
        .unwrap_or_default();
    BackendError::from_code(&code, describe(error))
}

fn describe(error: &JsValue) -> String {
    if let Some(e) = error.dyn_ref::<js_sys::Error>() {
        return String::from(e.message());
    }
    error.as_string().unwrap_or_else(|| format!("{:?}", error))
}
