//! Snapshot Reducer
//!
//! Pure derivation of the published list from a collection snapshot.

use std::cmp::Ordering;

use crate::domain::Task;

/// Replace the current list with the sorted contents of `snapshot`.
///
/// List state is never merged: every snapshot is the full collection, so
/// `current` only exists to keep the reducer signature uniform.
pub fn reduce(current: &[Task], snapshot: Vec<Task>) -> Vec<Task> {
    let mut next = snapshot;
    next.sort_by(compare_tasks);

    let pending = next.iter().filter(|t| t.created_at.is_none()).count();
    if pending > 0 {
        log::debug!(
            "[REDUCER] {} of {} tasks have no creation time yet, ordered as newest",
            pending,
            next.len()
        );
    }
    log::trace!("[REDUCER] {} -> {} tasks", current.len(), next.len());
    next
}

/// Incomplete before completed, then newest first.
///
/// A missing creation time means the server has not stamped the write yet,
/// so it ranks ahead of every stamped task in its tier. Two unstamped tasks
/// compare equal and keep enumeration order under a stable sort.
pub fn compare_tasks(a: &Task, b: &Task) -> Ordering {
    a.completed
        .cmp(&b.completed)
        .then_with(|| match (&a.created_at, &b.created_at) {
            (Some(a_at), Some(b_at)) => b_at.cmp(a_at),
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TaskId;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn task(id: &str, completed: bool, created: Option<i64>) -> Task {
        let task = Task::new(TaskId::new(id), format!("Task {}", id)).with_completed(completed);
        match created {
            Some(secs) => task.with_created_at(at(secs)),
            None => task,
        }
    }

    fn ids(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.id.as_str()).collect()
    }

    fn assert_sorted(tasks: &[Task]) {
        for pair in tasks.windows(2) {
            assert!(
                !(pair[0].completed && !pair[1].completed),
                "completed task {} precedes incomplete {}",
                pair[0].id,
                pair[1].id
            );
            if pair[0].completed == pair[1].completed {
                if let (Some(a), Some(b)) = (pair[0].created_at, pair[1].created_at) {
                    assert!(a >= b, "{} older than {}", pair[0].id, pair[1].id);
                }
            }
        }
    }

    #[test]
    fn test_incomplete_before_completed() {
        let snapshot = vec![
            task("a", true, Some(300)),
            task("b", false, Some(100)),
            task("c", true, Some(200)),
            task("d", false, Some(400)),
        ];
        let list = reduce(&[], snapshot);
        assert_eq!(ids(&list), vec!["d", "b", "a", "c"]);
        assert_sorted(&list);
    }

    #[test]
    fn test_subsecond_order_is_respected() {
        let early = Task::new(TaskId::new("early"), "x")
            .with_created_at(Utc.timestamp_opt(10, 1_000).unwrap());
        let late = Task::new(TaskId::new("late"), "y")
            .with_created_at(Utc.timestamp_opt(10, 9_000).unwrap());
        let list = reduce(&[], vec![early, late]);
        assert_eq!(ids(&list), vec!["late", "early"]);
    }

    #[test]
    fn test_unstamped_tasks_keep_enumeration_order() {
        let snapshot = vec![
            task("p1", false, None),
            task("s1", false, Some(50)),
            task("p2", false, None),
            task("s2", false, Some(60)),
            task("p3", true, None),
        ];
        let list = reduce(&[], snapshot);
        assert_eq!(ids(&list), vec!["p1", "p2", "s2", "s1", "p3"]);
        assert_sorted(&list);
    }

    #[test]
    fn test_reduce_replaces_current_wholesale() {
        let current = vec![task("old", false, Some(1)), task("gone", true, Some(2))];
        let list = reduce(&current, vec![task("new", false, Some(3))]);
        assert_eq!(ids(&list), vec!["new"]);
    }

    #[test]
    fn test_reduce_empty_snapshot() {
        let current = vec![task("x", false, Some(1))];
        assert!(reduce(&current, Vec::new()).is_empty());
    }

    #[test]
    fn test_sorted_for_mixed_snapshots() {
        // Deterministic pseudo-random mix of completion states and stamps
        let mut seed: u64 = 0x5eed;
        let mut snapshot = Vec::new();
        for i in 0..64 {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let completed = (seed >> 33) % 2 == 0;
            let created = if (seed >> 40) % 5 == 0 { None } else { Some(((seed >> 20) % 1000) as i64) };
            snapshot.push(task(&format!("t{}", i), completed, created));
        }
        let list = reduce(&[], snapshot);
        assert_eq!(list.len(), 64);
        assert_sorted(&list);
    }
}
