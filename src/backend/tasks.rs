//! Task Collection Bindings
//!
//! `TaskBackend` over a Firestore collection.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

use taskboard_core::backend::{ErrorCallback, SnapshotCallback};
use taskboard_core::{BackendError, BackendResult, CollectionPath, NewTask, SessionId, Subscription, Task, TaskBackend, TaskId};

use super::{backend_error, describe, server_timestamp, DocumentReference, DocumentSnapshot, FirebaseBackend, QuerySnapshot, Timestamp};

/// Stored fields of a task document (createdAt is read separately)
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TaskDocument {
    #[serde(default)]
    text: String,
    #[serde(default)]
    completed: bool,
    #[serde(default)]
    created_by: Option<String>,
}

/// Decode one snapshot document; `None` when its fields are unreadable
fn decode_task(doc: &DocumentSnapshot) -> Option<Task> {
    let data = doc.data();
    let id = doc.doc_id();
    let fields: TaskDocument = match serde_wasm_bindgen::from_value(data.clone()) {
        Ok(fields) => fields,
        Err(e) => {
            log::warn!("[FIREBASE] Skipping undecodable task {}: {}", id, e);
            return None;
        }
    };

    let created_at = read_created_at(&data, &id);

    Some(Task {
        id: TaskId::new(id),
        text: fields.text,
        completed: fields.completed,
        created_at,
        created_by: fields.created_by.map(SessionId::new),
    })
}

/// Server time of `createdAt`.
///
/// Null until the server resolves the timestamp sentinel. Values written
/// without a `toMillis` method are treated the same way.
fn read_created_at(data: &JsValue, id: &str) -> Option<DateTime<Utc>> {
    let value = js_sys::Reflect::get(data, &JsValue::from_str("createdAt")).ok()?;
    if value.is_null() || value.is_undefined() {
        return None;
    }
    match value.unchecked_into::<Timestamp>().to_millis() {
        Ok(millis) if millis.is_finite() => DateTime::<Utc>::from_timestamp_millis(millis as i64),
        Ok(_) => {
            log::warn!("[FIREBASE] Task {} has a non-numeric createdAt", id);
            None
        }
        Err(e) => {
            log::warn!("[FIREBASE] Task {} has an unreadable createdAt: {}", id, describe(&e));
            None
        }
    }
}

fn decode_snapshot(snapshot: &QuerySnapshot) -> Vec<Task> {
    snapshot
        .docs()
        .iter()
        .filter_map(|doc| decode_task(doc.unchecked_ref::<DocumentSnapshot>()))
        .collect()
}

impl FirebaseBackend {
    fn document(&self, path: &CollectionPath, id: &TaskId) -> DocumentReference {
        self.db.collection(path.as_str()).doc(id.as_str())
    }
}

#[async_trait(?Send)]
impl TaskBackend for FirebaseBackend {
    fn subscribe(
        &self,
        path: &CollectionPath,
        mut on_snapshot: SnapshotCallback,
        mut on_error: ErrorCallback,
    ) -> BackendResult<Subscription> {
        let next = Closure::<dyn FnMut(QuerySnapshot)>::new(move |snapshot: QuerySnapshot| {
            on_snapshot(decode_snapshot(&snapshot));
        });
        let error = Closure::<dyn FnMut(JsValue)>::new(move |err: JsValue| {
            on_error(backend_error(&err));
        });

        let unsubscribe = self.db.collection(path.as_str()).on_snapshot(&next, &error);
        log::debug!("[FIREBASE] Listening on {}", path);

        // Closures must outlive the listener
        Ok(Subscription::new(move || {
            let _ = unsubscribe.call0(&JsValue::NULL);
            drop(next);
            drop(error);
        }))
    }

    async fn add_task(&self, path: &CollectionPath, task: &NewTask) -> BackendResult<TaskId> {
        let data = serde_wasm_bindgen::to_value(task)
            .map_err(|e| BackendError::Internal(format!("Serialization error: {}", e)))?;
        js_sys::Reflect::set(&data, &JsValue::from_str("createdAt"), &server_timestamp())
            .map_err(|e| backend_error(&e))?;

        let created = JsFuture::from(self.db.collection(path.as_str()).add(&data))
            .await
            .map_err(|e| backend_error(&e))?;
        Ok(TaskId::new(created.unchecked_into::<DocumentReference>().id()))
    }

    async fn set_completed(&self, path: &CollectionPath, id: &TaskId, completed: bool) -> BackendResult<()> {
        let data = js_sys::Object::new();
        js_sys::Reflect::set(&data, &JsValue::from_str("completed"), &JsValue::from_bool(completed))
            .map_err(|e| backend_error(&e))?;

        JsFuture::from(self.document(path, id).update(&data))
            .await
            .map_err(|e| backend_error(&e))?;
        Ok(())
    }

    async fn delete_task(&self, path: &CollectionPath, id: &TaskId) -> BackendResult<()> {
        JsFuture::from(self.document(path, id).delete())
            .await
            .map_err(|e| backend_error(&e))?;
        Ok(())
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use js_sys::{Function, Object, Reflect};
    use wasm_bindgen_test::wasm_bindgen_test;

    fn document_with(created_at: &JsValue) -> JsValue {
        let data = Object::new();
        Reflect::set(&data, &JsValue::from_str("text"), &JsValue::from_str("Buy milk")).unwrap();
        Reflect::set(&data, &JsValue::from_str("createdAt"), created_at).unwrap();
        data.into()
    }

    #[wasm_bindgen_test]
    fn test_created_at_reads_server_timestamp() {
        let stamp = Object::new();
        let to_millis = Function::new_no_args("return 1700000000000;");
        Reflect::set(&stamp, &JsValue::from_str("toMillis"), &to_millis).unwrap();

        let created_at = read_created_at(&document_with(&stamp.into()), "a");
        assert_eq!(created_at, DateTime::<Utc>::from_timestamp_millis(1_700_000_000_000));
    }

    #[wasm_bindgen_test]
    fn test_created_at_pending_is_none() {
        assert_eq!(read_created_at(&document_with(&JsValue::NULL), "a"), None);
    }

    #[wasm_bindgen_test]
    fn test_created_at_foreign_values_are_none() {
        assert_eq!(read_created_at(&document_with(&JsValue::from_f64(5.0)), "a"), None);
        assert_eq!(read_created_at(&document_with(&JsValue::from_str("yesterday")), "a"), None);

        let broken = Object::new();
        let to_millis = Function::new_no_args("throw new Error('bad clock');");
        Reflect::set(&broken, &JsValue::from_str("toMillis"), &to_millis).unwrap();
        assert_eq!(read_created_at(&document_with(&broken.into()), "a"), None);
    }
}
