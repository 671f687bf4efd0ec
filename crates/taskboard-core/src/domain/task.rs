//! Task Entity
//!
//! A shared task item as delivered by collection snapshots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{SessionId, TaskId};

/// A task item in the shared collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier (assigned by the backend)
    pub id: TaskId,
    /// Task text, never empty at creation
    pub text: String,
    /// Completion status
    #[serde(default)]
    pub completed: bool,
    /// Server-assigned creation time; absent while the write is pending
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Session that created the task
    #[serde(default)]
    pub created_by: Option<SessionId>,
}

impl Task {
    /// Create an incomplete task without a creation time
    pub fn new(id: TaskId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            completed: false,
            created_at: None,
            created_by: None,
        }
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }
}

/// Write payload of an add intent.
///
/// The creation time is not part of the payload: the backend stamps it
/// with server time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub text: String,
    pub completed: bool,
    pub created_by: SessionId,
}

impl NewTask {
    /// Build the payload from raw user input.
    ///
    /// Returns `None` when the trimmed text is empty.
    pub fn from_input(input: &str, created_by: SessionId) -> Option<Self> {
        let text = input.trim();
        if text.is_empty() {
            return None;
        }
        Some(Self {
            text: text.to_string(),
            completed: false,
            created_by,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_task_trims_input() {
        let task = NewTask::from_input("  Buy milk ", SessionId::new("u1")).unwrap();
        assert_eq!(task.text, "Buy milk");
        assert!(!task.completed);
        assert_eq!(task.created_by, SessionId::new("u1"));
    }

    #[test]
    fn test_new_task_rejects_blank_input() {
        assert!(NewTask::from_input("", SessionId::new("u1")).is_none());
        assert!(NewTask::from_input(" \t\n ", SessionId::new("u1")).is_none());
    }

    #[test]
    fn test_task_decodes_with_missing_optional_fields() {
        let task: Task = serde_json::from_str(r#"{"id":"t1","text":"Water plants"}"#).unwrap();
        assert_eq!(task.id, TaskId::new("t1"));
        assert!(!task.completed);
        assert!(task.created_at.is_none());
        assert!(task.created_by.is_none());
    }

    #[test]
    fn test_new_task_wire_shape() {
        let task = NewTask::from_input("Call Bob", SessionId::new("u7")).unwrap();
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "text": "Call Bob", "completed": false, "createdBy": "u7" })
        );
    }
}
