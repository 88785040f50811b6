// lib/src/storage_engine/ordered_index.rs

//! Identifier-ordered binary search tree that holds the patient archive.
//!
//! The tree is never rebalanced. Ids are handed out in ascending order, so a
//! freshly registered population degenerates into a right-leaning chain whose
//! depth equals its size. Every walk in this module (insert, lookup, delete,
//! traversal, height, teardown) therefore runs on an explicit cursor or stack
//! instead of recursing.

use std::cmp::Ordering;
use std::fmt;
use std::mem;

use log::debug;
use serde::Serialize;
use models::errors::{IntakeError, IntakeResult};
use models::{PatientId, PatientRecord, PriorityLevel};

use super::storage_engine::PatientIndex;

type Link = Option<Box<PatientNode>>;

struct PatientNode {
    record: PatientRecord,
    left: Link,
    right: Link,
}

impl PatientNode {
    fn new(record: PatientRecord) -> Self {
        PatientNode { record, left: None, right: None }
    }
}

/// Shape summary used to show that the archive still is a search tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeProperties {
    pub total: usize,
    pub height: usize,
    pub min_id: Option<PatientId>,
    pub max_id: Option<PatientId>,
    pub ordered: bool,
}

#[derive(Default)]
pub struct OrderedIndex {
    root: Link,
}

impl OrderedIndex {
    pub fn new() -> Self {
        OrderedIndex { root: None }
    }

    /// Returns the slot holding `id`, or the empty slot where a node with
    /// that id would be attached.
    fn slot_mut(&mut self, id: PatientId) -> &mut Link {
        let mut slot = &mut self.root;
        while slot.as_ref().is_some_and(|node| node.record.id != id) {
            if let Some(node) = slot {
                slot = if id < node.record.id { &mut node.left } else { &mut node.right };
            }
        }
        slot
    }

    /// Attaches `record` as a new leaf. A record whose id is already present
    /// leaves the existing node untouched and returns `false`.
    pub fn insert(&mut self, record: PatientRecord) -> bool {
        let id = record.id;
        let slot = self.slot_mut(id);
        if slot.is_some() {
            debug!("Ignoring duplicate insert for patient {}", id);
            return false;
        }
        *slot = Some(Box::new(PatientNode::new(record)));
        true
    }

    pub fn search(&self, id: PatientId) -> Option<&PatientRecord> {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            current = match id.cmp(&node.record.id) {
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
                Ordering::Equal => return Some(&node.record),
            };
        }
        None
    }

    pub fn contains(&self, id: PatientId) -> bool {
        self.search(id).is_some()
    }

    /// Replaces the record stored under `id` at the same tree position.
    ///
    /// # Errors
    /// `NotFound` when no node carries `id`; `KeyMismatch` when `new_data`
    /// carries a different id, since rekeying in place would break ordering.
    pub fn update(&mut self, id: PatientId, new_data: PatientRecord) -> IntakeResult<()> {
        let Some(node) = self.slot_mut(id) else {
            return Err(IntakeError::NotFound(id));
        };
        if new_data.id != node.record.id {
            return Err(IntakeError::KeyMismatch { expected: id, found: new_data.id });
        }
        node.record = new_data;
        Ok(())
    }

    /// Removes the node keyed by `id` and returns its record.
    ///
    /// A node with at most one child is spliced out and replaced by that
    /// child. A node with two children takes over the record of its in-order
    /// successor (the minimum of the right subtree), and the successor node,
    /// which never has a left child, is spliced out instead.
    pub fn remove(&mut self, id: PatientId) -> Option<PatientRecord> {
        let slot = self.slot_mut(id);
        let mut node = slot.take()?;

        if node.left.is_some() {
            if let Some(successor) = detach_min(&mut node.right) {
                let removed = mem::replace(&mut node.record, successor);
                *slot = Some(node);
                return Some(removed);
            }
        }

        let PatientNode { record, left, right } = *node;
        *slot = left.or(right);
        Some(record)
    }

    /// Borrowing in-order iterator; yields records by ascending id.
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(self.root.as_deref())
    }

    /// All records sorted by ascending id.
    pub fn in_order(&self) -> Vec<PatientRecord> {
        self.iter().cloned().collect()
    }

    /// Root first, then the left subtree, then the right subtree.
    pub fn pre_order(&self) -> Vec<PatientRecord> {
        let mut records = Vec::new();
        let mut stack: Vec<&PatientNode> = self.root.as_deref().into_iter().collect();
        while let Some(node) = stack.pop() {
            records.push(node.record.clone());
            stack.extend(node.right.as_deref());
            stack.extend(node.left.as_deref());
        }
        records
    }

    pub fn ids(&self) -> Vec<PatientId> {
        self.iter().map(|record| record.id).collect()
    }

    pub fn by_priority(&self, level: PriorityLevel) -> Vec<PatientRecord> {
        self.iter().filter(|record| record.priority == level).cloned().collect()
    }

    /// Counts nodes by walking the whole tree; nothing is cached.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn count_by_priority(&self, level: PriorityLevel) -> usize {
        self.iter().filter(|record| record.priority == level).count()
    }

    /// Number of nodes on the longest root-to-leaf path. Empty tree is 0.
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut stack: Vec<(&PatientNode, usize)> = self.root.as_deref().map(|node| (node, 1)).into_iter().collect();
        while let Some((node, depth)) = stack.pop() {
            height = height.max(depth);
            for child in [node.left.as_deref(), node.right.as_deref()].into_iter().flatten() {
                stack.push((child, depth + 1));
            }
        }
        height
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn min_id(&self) -> Option<PatientId> {
        let mut node = self.root.as_deref()?;
        while let Some(left) = node.left.as_deref() {
            node = left;
        }
        Some(node.record.id)
    }

    pub fn max_id(&self) -> Option<PatientId> {
        let mut node = self.root.as_deref()?;
        while let Some(right) = node.right.as_deref() {
            node = right;
        }
        Some(node.record.id)
    }

    pub fn clear(&mut self) {
        release(self.root.take());
    }

    /// Verifies the search-tree invariant: an in-order walk is strictly
    /// ascending.
    pub fn is_ordered(&self) -> bool {
        let mut previous: Option<PatientId> = None;
        for record in self.iter() {
            if previous.is_some_and(|id| id >= record.id) {
                return false;
            }
            previous = Some(record.id);
        }
        true
    }

    pub fn properties(&self) -> TreeProperties {
        TreeProperties {
            total: self.len(),
            height: self.height(),
            min_id: self.min_id(),
            max_id: self.max_id(),
            ordered: self.is_ordered(),
        }
    }

    /// Draws the tree sideways: the right subtree above its parent, the left
    /// subtree below, four spaces of indent per level.
    pub fn render(&self) -> String {
        if self.root.is_none() {
            return "(empty)".to_string();
        }

        let mut lines = Vec::new();
        let mut stack: Vec<(&PatientNode, usize)> = Vec::new();
        let mut current = self.root.as_deref().map(|node| (node, 0));
        loop {
            while let Some((node, depth)) = current {
                stack.push((node, depth));
                current = node.right.as_deref().map(|right| (right, depth + 1));
            }
            let Some((node, depth)) = stack.pop() else {
                break;
            };
            lines.push(format!(
                "{}{} [{}]",
                "    ".repeat(depth),
                node.record.id,
                node.record.priority
            ));
            current = node.left.as_deref().map(|left| (left, depth + 1));
        }
        lines.join("\n")
    }
}

/// Unlinks the minimum node under `slot`, promoting its right child into its
/// place, and returns the record it held.
fn detach_min(mut slot: &mut Link) -> Option<PatientRecord> {
    while slot.as_ref().is_some_and(|node| node.left.is_some()) {
        if let Some(node) = slot {
            slot = &mut node.left;
        }
    }
    let node = slot.take()?;
    let PatientNode { record, right, .. } = *node;
    *slot = right;
    Some(record)
}

/// Frees a subtree in post-order: a node is only dropped once both of its
/// children have been detached and dropped.
fn release(root: Link) {
    let mut stack: Vec<Box<PatientNode>> = root.into_iter().collect();
    while let Some(mut node) = stack.pop() {
        let left = node.left.take();
        let right = node.right.take();
        if left.is_none() && right.is_none() {
            drop(node);
            continue;
        }
        stack.push(node);
        stack.extend(left);
        stack.extend(right);
    }
}

impl Drop for OrderedIndex {
    fn drop(&mut self) {
        release(self.root.take());
    }
}

impl fmt::Debug for OrderedIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderedIndex")
            .field("total", &self.len())
            .field("height", &self.height())
            .finish()
    }
}

impl PatientIndex for OrderedIndex {
    fn insert(&mut self, record: PatientRecord) -> bool {
        OrderedIndex::insert(self, record)
    }

    fn len(&self) -> usize {
        OrderedIndex::len(self)
    }

    fn count_by_priority(&self, level: PriorityLevel) -> usize {
        OrderedIndex::count_by_priority(self, level)
    }

    fn clear(&mut self) {
        OrderedIndex::clear(self)
    }

    fn get_type(&self) -> &'static str {
        "OrderedIndex"
    }
}

pub struct Iter<'a> {
    stack: Vec<&'a PatientNode>,
}

impl<'a> Iter<'a> {
    fn new(root: Option<&'a PatientNode>) -> Self {
        let mut iter = Iter { stack: Vec::new() };
        iter.push_left_spine(root);
        iter
    }

    fn push_left_spine(&mut self, mut node: Option<&'a PatientNode>) {
        while let Some(current) = node {
            self.stack.push(current);
            node = current.left.as_deref();
        }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a PatientRecord;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right.as_deref());
        Some(&node.record)
    }
}

impl<'a> IntoIterator for &'a OrderedIndex {
    type Item = &'a PatientRecord;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
