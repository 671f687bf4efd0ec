//! Backend Layer - Capability Traits
//!
//! Abstract interfaces over the hosted auth service and document store.
//! Implementations can be the Firebase SDK, in-memory, etc.

use async_trait::async_trait;

use super::subscription::Subscription;
use crate::domain::{BackendError, BackendResult, CollectionPath, NewTask, SessionId, Task, TaskId};

/// Receives the full collection on every change
pub type SnapshotCallback = Box<dyn FnMut(Vec<Task>)>;

/// Receives listener failures (permission, connectivity)
pub type ErrorCallback = Box<dyn FnMut(BackendError)>;

/// Identity provider consumed by the session bootstrapper.
///
/// Futures are not `Send`: everything runs on one event loop.
#[async_trait(?Send)]
pub trait AuthBackend {
    /// Session restored by the provider, if any
    async fn current_session(&self) -> BackendResult<Option<SessionId>>;

    /// Sign in with a host-supplied token
    async fn sign_in_with_token(&self, token: &str) -> BackendResult<SessionId>;

    /// Sign in without credentials
    async fn sign_in_anonymously(&self) -> BackendResult<SessionId>;
}

/// Real-time document collection consumed by the synchronizer
#[async_trait(?Send)]
pub trait TaskBackend {
    /// Open a live listener on `path`.
    ///
    /// `on_snapshot` fires with the full document set after every change.
    /// The listener stays open until the returned guard is cancelled or
    /// dropped.
    fn subscribe(
        &self,
        path: &CollectionPath,
        on_snapshot: SnapshotCallback,
        on_error: ErrorCallback,
    ) -> BackendResult<Subscription>;

    /// Create a task; the backend assigns the id and creation time
    async fn add_task(&self, path: &CollectionPath, task: &NewTask) -> BackendResult<TaskId>;

    /// Set the completion flag of an existing task
    async fn set_completed(&self, path: &CollectionPath, id: &TaskId, completed: bool) -> BackendResult<()>;

    /// Permanently delete a task
    async fn delete_task(&self, path: &CollectionPath, id: &TaskId) -> BackendResult<()>;
}
