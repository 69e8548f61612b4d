//! Array-backed binary max-heap over task priorities.
//!
//! The heap is a complete binary tree stored in a dense slot vector;
//! position alone encodes the shape (children of slot `i` live at `2i + 1`
//! and `2i + 2`, its parent at `(i - 1) / 2`). Slots carry only the
//! priority ordering key and the task id it stands for.
//!
//! # Invariants
//! - For every occupied slot `i` with an existing child `c`:
//!   `slots[i].priority >= slots[c].priority`
//! - Ties between equal priorities are unordered; extraction may return
//!   any maximal entry

use serde::{Deserialize, Serialize};

use crate::task::{Priority, TaskId};

/// A heap slot: the ordering key plus the id it stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeapEntry {
    pub priority: Priority,
    pub id: TaskId,
}

/// Priority queue over task ids.
#[derive(Debug, Default)]
pub struct MaxHeap {
    slots: Vec<HeapEntry>,
}

fn parent(i: usize) -> usize {
    (i - 1) / 2
}

fn left(i: usize) -> usize {
    2 * i + 1
}

fn right(i: usize) -> usize {
    2 * i + 2
}

impl MaxHeap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// The slots in current array order, for diagnostic snapshots.
    pub fn slots(&self) -> &[HeapEntry] {
        &self.slots
    }

    /// Insert an entry and sift it up until the heap property holds again.
    ///
    /// O(log n); never fails.
    pub fn insert(&mut self, entry: HeapEntry) {
        self.slots.push(entry);
        self.sift_up(self.slots.len() - 1);
    }

    /// Remove and return the highest-priority entry.
    ///
    /// On an empty heap returns `None`. Otherwise the last slot replaces
    /// the root and is sifted down. O(log n).
    pub fn extract_max(&mut self) -> Option<HeapEntry> {
        if self.slots.len() <= 1 {
            return self.slots.pop();
        }
        let last = self.slots.len() - 1;
        self.slots.swap(0, last);
        let max = self.slots.pop();
        self.sift_down(0);
        max
    }

    /// Remove the entry for `id`, wherever it sits in the array.
    ///
    /// The last slot moves into the vacated position, then the replacement
    /// is sifted in both directions: its order relative to its new
    /// neighbours is unknown a priori, so down and up must both be
    /// attempted. O(n) because of the id scan.
    pub fn remove_by_id(&mut self, id: TaskId) -> Option<HeapEntry> {
        let index = self.slots.iter().position(|entry| entry.id == id)?;
        let last = self.slots.len() - 1;
        if index == last {
            return self.slots.pop();
        }
        self.slots.swap(index, last);
        let removed = self.slots.pop();
        self.sift_down(index);
        self.sift_up(index);
        removed
    }

    /// Move the slot at `index` up while it outranks its parent.
    fn sift_up(&mut self, index: usize) {
        let mut current = index;
        while current > 0 && self.slots[current].priority > self.slots[parent(current)].priority {
            self.slots.swap(current, parent(current));
            current = parent(current);
        }
    }

    /// Move the slot at `index` down, swapping with the larger child while
    /// that child outranks it.
    fn sift_down(&mut self, index: usize) {
        let mut current = index;
        loop {
            let mut largest = current;
            let (l, r) = (left(current), right(current));
            if l < self.slots.len() && self.slots[l].priority > self.slots[largest].priority {
                largest = l;
            }
            if r < self.slots.len() && self.slots[r].priority > self.slots[largest].priority {
                largest = r;
            }
            if largest == current {
                break;
            }
            self.slots.swap(current, largest);
            current = largest;
        }
    }

    /// ASCII rendering of the implied tree shape, ids only, right subtree
    /// printed above its parent.
    pub fn render(&self) -> String {
        if self.slots.is_empty() {
            return "(empty)".to_string();
        }
        let mut out = String::new();
        self.render_slot(0, "", true, &mut out);
        out
    }

    fn render_slot(&self, index: usize, prefix: &str, is_left: bool, out: &mut String) {
        if right(index) < self.slots.len() {
            let child_prefix = format!("{prefix}{}", if is_left { "│   " } else { "    " });
            self.render_slot(right(index), &child_prefix, false, out);
        }
        out.push_str(prefix);
        out.push_str(if is_left { "└── " } else { "┌── " });
        out.push_str(&self.slots[index].id.to_string());
        out.push('\n');
        if left(index) < self.slots.len() {
            let child_prefix = format!("{prefix}{}", if is_left { "    " } else { "│   " });
            self.render_slot(left(index), &child_prefix, true, out);
        }
    }
}
