//! Core task record shared by both indexes.
//!
//! # Invariants
//! - `id` is unique within a store, assigned once, never reused
//! - `id` is immutable after construction; every other field is mutable
//!   only through the owning store's update operation

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Unique identifier for a task.
///
/// # Properties
/// - Allocated by the owning store from a monotonic counter
/// - Immutable once created, never reused
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct TaskId(u64);

impl TaskId {
    /// Get the raw integer value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl From<u64> for TaskId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Scheduling priority of a task.
///
/// Ordering is by urgency (`Low < Medium < High`); the heap compares tasks
/// by this field alone, so ties between equal priorities are unordered.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    /// Numeric rank (Low=1, Medium=2, High=3).
    pub fn rank(&self) -> u8 {
        match self {
            Priority::Low => 1,
            Priority::Medium => 2,
            Priority::High => 3,
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        };
        write!(f, "{name}")
    }
}

impl std::str::FromStr for Priority {
    type Err = ParsePriorityError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "low" | "l" | "1" => Ok(Priority::Low),
            "medium" | "m" | "2" => Ok(Priority::Medium),
            "high" | "h" | "3" => Ok(Priority::High),
            other => Err(ParsePriorityError(other.to_string())),
        }
    }
}

/// Error for unrecognized priority names at the input boundary.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown priority \"{0}\", expected low, medium or high")]
pub struct ParsePriorityError(String);

/// A task record, indexed by id in the tree and by priority in the heap.
///
/// # Invariants
/// - `id` never changes after construction
///
/// A single record serves both indexes: they hold only the id (plus the
/// priority ordering key on the heap side) and resolve to this record
/// through the store's table, so a field update is visible from either
/// index without rebuilding nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    description: String,
    priority: Priority,
    due_date: NaiveDate,
}

impl Task {
    pub(crate) fn new(
        id: TaskId,
        description: String,
        priority: Priority,
        due_date: NaiveDate,
    ) -> Self {
        Self {
            id,
            description,
            priority,
            due_date,
        }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    /// Due date of the task. The core never orders by it.
    pub fn due_date(&self) -> NaiveDate {
        self.due_date
    }

    /// Overwrite every mutable field in place.
    ///
    /// Only the owning store calls this, after it has pulled the task's
    /// heap entry; the caller re-inserts under the new priority.
    pub(crate) fn apply_update(
        &mut self,
        description: String,
        priority: Priority,
        due_date: NaiveDate,
    ) {
        self.description = description;
        self.priority = priority;
        self.due_date = due_date;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_ordering() {
        assert!(Priority::Low < Priority::Medium);
        assert!(Priority::Medium < Priority::High);
        assert_eq!(Priority::Low.rank(), 1);
        assert_eq!(Priority::Medium.rank(), 2);
        assert_eq!(Priority::High.rank(), 3);
    }

    #[test]
    fn test_priority_parsing() {
        assert_eq!("high".parse::<Priority>().unwrap(), Priority::High);
        assert_eq!("Medium".parse::<Priority>().unwrap(), Priority::Medium);
        assert_eq!(" l ".parse::<Priority>().unwrap(), Priority::Low);
        assert!("urgent".parse::<Priority>().is_err());
    }

    #[test]
    fn test_update_keeps_id() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let mut task = Task::new(TaskId::from(7), "write report".into(), Priority::Low, date);

        let later = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
        task.apply_update("write final report".into(), Priority::High, later);

        assert_eq!(task.id(), TaskId::from(7));
        assert_eq!(task.description(), "write final report");
        assert_eq!(task.priority(), Priority::High);
        assert_eq!(task.due_date(), later);
    }
}
