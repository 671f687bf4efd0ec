//! In-memory Backend
//!
//! A single-process stand-in for the hosted auth service and document store.
//! Documents keep insertion order, the server clock is monotonic, and every
//! call is recorded so tests can check listener bookkeeping.

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::rc::{Rc, Weak};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::subscription::Subscription;
use super::traits::{AuthBackend, ErrorCallback, SnapshotCallback, TaskBackend};
use crate::domain::{BackendError, BackendResult, CollectionPath, NewTask, SessionId, Task, TaskId};

/// Server clock origin (2023-11-14T22:13:20Z)
const CLOCK_ORIGIN_MILLIS: i64 = 1_700_000_000_000;

/// Operations that can be made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    CurrentSession,
    SignInWithToken,
    SignInAnonymously,
    Subscribe,
    Add,
    Update,
    Delete,
}

/// Record of one call made against the backend
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    SignInWithToken(String),
    SignInAnonymously,
    Subscribe { listener: u64, path: String },
    Unsubscribe { listener: u64 },
    Add(NewTask),
    Update { id: TaskId, completed: bool },
    Delete(TaskId),
}

struct Listener {
    id: u64,
    path: String,
    on_snapshot: Rc<RefCell<SnapshotCallback>>,
    on_error: Rc<RefCell<ErrorCallback>>,
}

#[derive(Default)]
struct MemoryState {
    collections: HashMap<String, Vec<Task>>,
    listeners: Vec<Listener>,
    next_listener: u64,
    next_doc: u64,
    clock_ticks: i64,
    session: Option<SessionId>,
    next_anonymous: u64,
    failing: HashSet<Operation>,
    paused: bool,
    /// Listeners owed a snapshot
    dirty: BTreeSet<u64>,
    calls: Vec<BackendCall>,
}

impl MemoryState {
    fn check(&self, op: Operation) -> BackendResult<()> {
        if !self.failing.contains(&op) {
            return Ok(());
        }
        let message = format!("{:?} rejected by memory backend", op);
        Err(match op {
            Operation::Subscribe | Operation::Update | Operation::Delete | Operation::Add => {
                BackendError::PermissionDenied(message)
            }
            Operation::CurrentSession => BackendError::Unavailable(message),
            Operation::SignInWithToken | Operation::SignInAnonymously => {
                BackendError::Unauthenticated(message)
            }
        })
    }

    fn mark_dirty(&mut self, path: &str) {
        for listener in self.listeners.iter().filter(|l| l.path == path) {
            self.dirty.insert(listener.id);
        }
    }

    fn server_time(&mut self) -> DateTime<Utc> {
        self.clock_ticks += 1;
        // One second per write keeps timestamps distinct at any precision
        DateTime::<Utc>::from_timestamp_millis(CLOCK_ORIGIN_MILLIS + self.clock_ticks * 1_000)
            .unwrap_or_default()
    }
}

/// Shared handle to an in-memory auth service and document store
#[derive(Clone, Default)]
pub struct MemoryBackend {
    state: Rc<RefCell<MemoryState>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend that already holds a signed-in session
    pub fn with_session(session: SessionId) -> Self {
        let backend = Self::new();
        backend.state.borrow_mut().session = Some(session);
        backend
    }

    /// Make every subsequent `op` fail until `recover` is called
    pub fn fail(&self, op: Operation) {
        self.state.borrow_mut().failing.insert(op);
    }

    pub fn recover(&self, op: Operation) {
        self.state.borrow_mut().failing.remove(&op);
    }

    /// Hold snapshots back until `deliver` is called
    pub fn pause_delivery(&self) {
        self.state.borrow_mut().paused = true;
    }

    /// Resume delivery and flush held snapshots
    pub fn deliver(&self) {
        self.state.borrow_mut().paused = false;
        self.flush();
    }

    /// Insert a document as-is (any id, any creation time) and notify
    pub fn insert_raw(&self, path: &CollectionPath, task: Task) {
        {
            let mut state = self.state.borrow_mut();
            state
                .collections
                .entry(path.as_str().to_string())
                .or_default()
                .push(task);
            state.mark_dirty(path.as_str());
        }
        self.flush();
    }

    /// Current documents at `path`, in insertion order
    pub fn documents(&self, path: &CollectionPath) -> Vec<Task> {
        self.state
            .borrow()
            .collections
            .get(path.as_str())
            .cloned()
            .unwrap_or_default()
    }

    /// Report `error` to every listener on `path`
    pub fn emit_error(&self, path: &CollectionPath, error: BackendError) {
        let callbacks: Vec<_> = self
            .state
            .borrow()
            .listeners
            .iter()
            .filter(|l| l.path == path.as_str())
            .map(|l| l.on_error.clone())
            .collect();
        for callback in callbacks {
            (&mut *callback.borrow_mut())(error.clone());
        }
    }

    pub fn calls(&self) -> Vec<BackendCall> {
        self.state.borrow().calls.clone()
    }

    pub fn active_listeners(&self) -> usize {
        self.state.borrow().listeners.len()
    }

    /// Send the current collection to every listener owed a snapshot.
    ///
    /// No borrow is held while callbacks run, so they may call back in.
    fn flush(&self) {
        let deliveries: Vec<(u64, Rc<RefCell<SnapshotCallback>>, Vec<Task>)> = {
            let mut guard = self.state.borrow_mut();
            let state = &mut *guard;
            if state.paused {
                return;
            }
            let dirty = std::mem::take(&mut state.dirty);
            state
                .listeners
                .iter()
                .filter(|l| dirty.contains(&l.id))
                .map(|l| {
                    let docs = state.collections.get(&l.path).cloned().unwrap_or_default();
                    (l.id, l.on_snapshot.clone(), docs)
                })
                .collect()
        };

        for (id, callback, snapshot) in deliveries {
            let still_open = self.state.borrow().listeners.iter().any(|l| l.id == id);
            if still_open {
                (&mut *callback.borrow_mut())(snapshot);
            }
        }
    }

    fn release_listener(state: &Weak<RefCell<MemoryState>>, listener: u64) {
        if let Some(state) = state.upgrade() {
            let mut state = state.borrow_mut();
            state.listeners.retain(|l| l.id != listener);
            state.dirty.remove(&listener);
            state.calls.push(BackendCall::Unsubscribe { listener });
        }
    }
}

#[async_trait(?Send)]
impl AuthBackend for MemoryBackend {
    async fn current_session(&self) -> BackendResult<Option<SessionId>> {
        let state = self.state.borrow();
        state.check(Operation::CurrentSession)?;
        Ok(state.session.clone())
    }

    async fn sign_in_with_token(&self, token: &str) -> BackendResult<SessionId> {
        let mut state = self.state.borrow_mut();
        state.calls.push(BackendCall::SignInWithToken(token.to_string()));
        state.check(Operation::SignInWithToken)?;
        let session = SessionId::new(format!("user-{}", token));
        state.session = Some(session.clone());
        Ok(session)
    }

    async fn sign_in_anonymously(&self) -> BackendResult<SessionId> {
        let mut state = self.state.borrow_mut();
        state.calls.push(BackendCall::SignInAnonymously);
        state.check(Operation::SignInAnonymously)?;
        state.next_anonymous += 1;
        let session = SessionId::new(format!("anon-{}", state.next_anonymous));
        state.session = Some(session.clone());
        Ok(session)
    }
}

#[async_trait(?Send)]
impl TaskBackend for MemoryBackend {
    fn subscribe(
        &self,
        path: &CollectionPath,
        on_snapshot: SnapshotCallback,
        on_error: ErrorCallback,
    ) -> BackendResult<Subscription> {
        let listener = {
            let mut state = self.state.borrow_mut();
            state.check(Operation::Subscribe)?;
            state.next_listener += 1;
            let id = state.next_listener;
            state.listeners.push(Listener {
                id,
                path: path.as_str().to_string(),
                on_snapshot: Rc::new(RefCell::new(on_snapshot)),
                on_error: Rc::new(RefCell::new(on_error)),
            });
            state.calls.push(BackendCall::Subscribe {
                listener: id,
                path: path.as_str().to_string(),
            });
            // Initial snapshot, like a hosted listener
            state.dirty.insert(id);
            id
        };

        let weak = Rc::downgrade(&self.state);
        let subscription = Subscription::new(move || Self::release_listener(&weak, listener));
        self.flush();
        Ok(subscription)
    }

    async fn add_task(&self, path: &CollectionPath, task: &NewTask) -> BackendResult<TaskId> {
        let id = {
            let mut state = self.state.borrow_mut();
            state.calls.push(BackendCall::Add(task.clone()));
            state.check(Operation::Add)?;
            state.next_doc += 1;
            let id = TaskId::new(format!("doc-{}", state.next_doc));
            let created_at = state.server_time();
            let doc = Task {
                id: id.clone(),
                text: task.text.clone(),
                completed: task.completed,
                created_at: Some(created_at),
                created_by: Some(task.created_by.clone()),
            };
            state
                .collections
                .entry(path.as_str().to_string())
                .or_default()
                .push(doc);
            state.mark_dirty(path.as_str());
            id
        };
        self.flush();
        Ok(id)
    }

    async fn set_completed(&self, path: &CollectionPath, id: &TaskId, completed: bool) -> BackendResult<()> {
        {
            let mut state = self.state.borrow_mut();
            state.calls.push(BackendCall::Update {
                id: id.clone(),
                completed,
            });
            state.check(Operation::Update)?;
            let doc = state
                .collections
                .get_mut(path.as_str())
                .and_then(|docs| docs.iter_mut().find(|t| &t.id == id))
                .ok_or_else(|| BackendError::NotFound(format!("No document to update: {}", id)))?;
            doc.completed = completed;
            state.mark_dirty(path.as_str());
        }
        self.flush();
        Ok(())
    }

    async fn delete_task(&self, path: &CollectionPath, id: &TaskId) -> BackendResult<()> {
        {
            let mut state = self.state.borrow_mut();
            state.calls.push(BackendCall::Delete(id.clone()));
            state.check(Operation::Delete)?;
            // Deleting a missing document succeeds, as in the hosted store
            if let Some(docs) = state.collections.get_mut(path.as_str()) {
                docs.retain(|t| &t.id != id);
            }
            state.mark_dirty(path.as_str());
        }
        self.flush();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path() -> CollectionPath {
        CollectionPath::for_app("test-app")
    }

    fn recorder() -> (Rc<RefCell<Vec<Vec<Task>>>>, SnapshotCallback) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        (seen, Box::new(move |docs: Vec<Task>| sink.borrow_mut().push(docs)))
    }

    #[tokio::test]
    async fn test_subscribe_delivers_initial_snapshot() {
        let backend = MemoryBackend::new();
        let (seen, on_snapshot) = recorder();
        let _sub = backend.subscribe(&path(), on_snapshot, Box::new(|_: BackendError| {})).unwrap();
        assert_eq!(seen.borrow().len(), 1);
        assert!(seen.borrow()[0].is_empty());
    }

    #[tokio::test]
    async fn test_add_stamps_monotonic_server_time() {
        let backend = MemoryBackend::new();
        let author = SessionId::new("u1");
        let first = NewTask::from_input("first", author.clone()).unwrap();
        let second = NewTask::from_input("second", author).unwrap();
        backend.add_task(&path(), &first).await.unwrap();
        backend.add_task(&path(), &second).await.unwrap();

        let docs = backend.documents(&path());
        assert_eq!(docs.len(), 2);
        assert!(docs[1].created_at.unwrap() > docs[0].created_at.unwrap());
        assert_ne!(docs[0].id, docs[1].id);
    }

    #[tokio::test]
    async fn test_update_missing_document_is_not_found() {
        let backend = MemoryBackend::new();
        let err = backend
            .set_completed(&path(), &TaskId::new("ghost"), true)
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_paused_delivery_holds_snapshots() {
        let backend = MemoryBackend::new();
        let (seen, on_snapshot) = recorder();
        let _sub = backend.subscribe(&path(), on_snapshot, Box::new(|_: BackendError| {})).unwrap();
        backend.pause_delivery();

        let task = NewTask::from_input("held", SessionId::new("u1")).unwrap();
        backend.add_task(&path(), &task).await.unwrap();
        assert_eq!(seen.borrow().len(), 1);

        backend.deliver();
        assert_eq!(seen.borrow().len(), 2);
        assert_eq!(seen.borrow()[1][0].text, "held");
    }

    #[tokio::test]
    async fn test_dropped_subscription_stops_delivery() {
        let backend = MemoryBackend::new();
        let (seen, on_snapshot) = recorder();
        let sub = backend.subscribe(&path(), on_snapshot, Box::new(|_: BackendError| {})).unwrap();
        drop(sub);
        assert_eq!(backend.active_listeners(), 0);

        let task = NewTask::from_input("unseen", SessionId::new("u1")).unwrap();
        backend.add_task(&path(), &task).await.unwrap();
        assert_eq!(seen.borrow().len(), 1);
        assert!(matches!(backend.calls().last(), Some(BackendCall::Add(_))));
    }

    #[tokio::test]
    async fn test_listeners_are_scoped_by_path() {
        let backend = MemoryBackend::new();
        let (seen, on_snapshot) = recorder();
        let other = CollectionPath::for_app("other-app");
        let _sub = backend.subscribe(&other, on_snapshot, Box::new(|_: BackendError| {})).unwrap();

        let task = NewTask::from_input("elsewhere", SessionId::new("u1")).unwrap();
        backend.add_task(&path(), &task).await.unwrap();
        assert_eq!(seen.borrow().len(), 1);
    }

    #[tokio::test]
    async fn test_anonymous_sign_in_sets_session() {
        let backend = MemoryBackend::new();
        assert_eq!(backend.current_session().await.unwrap(), None);
        let session = backend.sign_in_anonymously().await.unwrap();
        assert_eq!(backend.current_session().await.unwrap(), Some(session));
    }
}
