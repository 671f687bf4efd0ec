//! Backend Layer
//!
//! Capability interfaces for auth and the task collection, plus an
//! in-memory implementation behind the `memory` feature.

#[cfg(any(test, feature = "memory"))]
mod memory;
mod subscription;
mod traits;

#[cfg(any(test, feature = "memory"))]
pub use memory::{BackendCall, MemoryBackend, Operation};
pub use subscription::Subscription;
pub use traits::{AuthBackend, ErrorCallback, SnapshotCallback, TaskBackend};
