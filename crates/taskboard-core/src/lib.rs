//! Task Board Core
//!
//! Layered architecture:
//! - domain: Task entities, identifiers, error taxonomy
//! - backend: Capability traits over auth and the live collection
//! - reducer: Pure snapshot-to-list derivation
//! - session: Identity bootstrap
//! - sync: Live list synchronizer and intent dispatch
//! - config: Explicit startup configuration

pub mod backend;
pub mod config;
pub mod domain;
pub mod reducer;
pub mod session;
pub mod sync;

pub use backend::{AuthBackend, Subscription, TaskBackend};
#[cfg(any(test, feature = "memory"))]
pub use backend::MemoryBackend;
pub use config::{AppConfig, BackendConfig, ConfigError};
pub use domain::{BackendError, BackendResult, BoardError, CollectionPath, NewTask, SessionId, Task, TaskId};
pub use reducer::{compare_tasks, reduce};
pub use session::{bootstrap, Session};
pub use sync::{BoardView, SyncPhase, Synchronizer};
