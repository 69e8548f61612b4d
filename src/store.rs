//! The coordinator that keeps both indexes in agreement.
//!
//! [`TaskStore`] owns one heap, one tree, the id-addressed record table,
//! and the monotonic id counter. Every external mutation passes through
//! it, which bounds any window in which the two indexes could transiently
//! differ to the inside of a single call.
//!
//! # Invariants
//! - Ids are unique, allocated from a counter that only moves forward,
//!   and never reused after removal
//! - The tree is the sole existence authority: an id absent from the tree
//!   is absent from the store, whatever the heap says
//! - A heap entry missing for a tree-present id is a tolerated soft
//!   condition (surfaced as a warning), never a hard failure

use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::index::{AvlTree, HeapEntry, MaxHeap};
use crate::task::{Priority, Task, TaskId};

/// Errors surfaced by [`TaskStore`] operations.
///
/// Malformed input (unparsable ids, unknown priority names, bad dates) is
/// rejected at the caller's boundary and never reaches these operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("no task with id {id}")]
    NotFound { id: TaskId },

    #[error("the store holds no tasks")]
    Empty,
}

/// Dual-indexed in-memory task store.
///
/// Single-threaded, single-writer: callers serialize all mutating calls;
/// there is no internal locking and no operation suspends or blocks.
#[derive(Debug)]
pub struct TaskStore {
    records: HashMap<TaskId, Task>,
    heap: MaxHeap,
    tree: AvlTree,
    next_id: u64,
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskStore {
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
            heap: MaxHeap::new(),
            tree: AvlTree::new(),
            next_id: 1,
        }
    }

    /// Number of stored tasks.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Create a task and index it in both structures.
    ///
    /// # Postconditions
    /// - The returned id is fresh and strictly greater than every id this
    ///   store has handed out before
    /// - The task is immediately visible to `search`, `list_all`, and
    ///   priority extraction
    pub fn add(
        &mut self,
        description: impl Into<String>,
        priority: Priority,
        due_date: NaiveDate,
    ) -> TaskId {
        let id = TaskId::from(self.next_id);
        self.next_id += 1;

        let task = Task::new(id, description.into(), priority, due_date);
        self.heap.insert(HeapEntry { priority, id });
        self.tree.insert(id);
        self.records.insert(id, task);

        debug!(%id, %priority, "task added");
        id
    }

    /// Overwrite a task's mutable fields, re-indexing its heap entry under
    /// the (possibly changed) priority. The id itself never changes.
    ///
    /// # Errors
    /// `NotFound` if the tree has no such id.
    pub fn update(
        &mut self,
        id: TaskId,
        description: impl Into<String>,
        priority: Priority,
        due_date: NaiveDate,
    ) -> Result<(), StoreError> {
        if !self.tree.contains(id) {
            return Err(StoreError::NotFound { id });
        }

        // Pull the stale heap entry first; a missing one is tolerated, the
        // re-insert below restores it either way.
        if self.heap.remove_by_id(id).is_none() {
            warn!(%id, "id present in the tree but missing from the heap");
        }

        let Some(task) = self.records.get_mut(&id) else {
            warn!(%id, "id present in the tree but missing from the record table");
            return Err(StoreError::NotFound { id });
        };
        task.apply_update(description.into(), priority, due_date);
        self.heap.insert(HeapEntry { priority, id });

        debug!(%id, %priority, "task updated");
        Ok(())
    }

    /// Pop the highest-priority task and drop it from both indexes.
    ///
    /// Among equal priorities any maximal task may be returned.
    ///
    /// # Errors
    /// `Empty` if no tasks are stored; nothing is mutated and the id
    /// counter is untouched.
    pub fn extract_top(&mut self) -> Result<Task, StoreError> {
        let entry = self.heap.extract_max().ok_or(StoreError::Empty)?;
        if !self.tree.delete(entry.id) {
            warn!(id = %entry.id, "extracted id was already missing from the tree");
        }
        match self.records.remove(&entry.id) {
            Some(task) => {
                debug!(id = %entry.id, priority = %entry.priority, "top task extracted");
                Ok(task)
            }
            None => {
                warn!(id = %entry.id, "extracted id had no record");
                Err(StoreError::NotFound { id: entry.id })
            }
        }
    }

    /// Remove a task by id from both indexes and return it.
    ///
    /// A tree-present id missing from the heap is tolerated: the heap can
    /// never emit that id again, which is the desired end state, so the
    /// call still succeeds after a warning.
    ///
    /// # Errors
    /// `NotFound` if the tree has no such id.
    pub fn remove(&mut self, id: TaskId) -> Result<Task, StoreError> {
        if !self.tree.contains(id) {
            return Err(StoreError::NotFound { id });
        }

        self.tree.delete(id);
        if self.heap.remove_by_id(id).is_none() {
            warn!(%id, "id present in the tree but missing from the heap; removal continues");
        }
        match self.records.remove(&id) {
            Some(task) => {
                debug!(%id, "task removed");
                Ok(task)
            }
            None => {
                warn!(%id, "id present in the tree but missing from the record table");
                Err(StoreError::NotFound { id })
            }
        }
    }

    /// Look up a task by id. Existence is decided by the tree alone; the
    /// heap is never consulted.
    ///
    /// # Errors
    /// `NotFound` if the tree has no such id.
    pub fn search(&self, id: TaskId) -> Result<&Task, StoreError> {
        if !self.tree.contains(id) {
            return Err(StoreError::NotFound { id });
        }
        self.records
            .get(&id)
            .ok_or(StoreError::NotFound { id })
    }

    /// All stored tasks, ascending by id: the canonical "active tasks"
    /// view, driven by the tree's in-order traversal.
    pub fn list_all(&self) -> Vec<&Task> {
        self.tree
            .ids_in_order()
            .into_iter()
            .filter_map(|id| {
                let record = self.records.get(&id);
                if record.is_none() {
                    warn!(%id, "in-order id has no record, skipping");
                }
                record
            })
            .collect()
    }

    /// Diagnostic: the heap's tasks in current array order.
    ///
    /// A point-in-time copy, not a live view.
    pub fn heap_snapshot(&self) -> Vec<Task> {
        self.heap
            .slots()
            .iter()
            .filter_map(|entry| self.records.get(&entry.id).cloned())
            .collect()
    }

    /// Diagnostic: ASCII rendering of the heap's implied tree shape.
    pub fn heap_render(&self) -> String {
        self.heap.render()
    }

    /// Diagnostic: indented ASCII rendering of the id tree.
    pub fn tree_render(&self) -> String {
        self.tree.render()
    }
}
