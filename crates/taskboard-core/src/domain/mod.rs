//! Domain Layer
//!
//! Task entities, identifiers and the error taxonomy shown to users.
//! This layer has NO transport dependencies (except serde and chrono).

mod error;
mod ids;
mod task;

pub use error::{BackendError, BackendResult, BoardError};
pub use ids::{CollectionPath, SessionId, TaskId};
pub use task::{NewTask, Task};
