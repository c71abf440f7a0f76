//! Randomized balanced binary search tree over all key/value pairs.
//
// Max-heap over priorities: a parent's priority is never below its
// children's. On ties the node already in place stays on top.

use rand::RngCore;
use std::cmp::Ordering;
use std::fmt;

use crate::db::error::{KeyTypeError, TreapViolation};
use crate::rng::SplitMix64;

use super::iter::{Iter, Keys};
use super::node::{rotate_left, rotate_right, Link, Node};
use super::ord::KeyOrd;

/// Result of [`Treap::insert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// A node was created for a previously unseen key.
    Inserted,
    /// The key existed; only its value was replaced.
    Updated,
}

/// Treap keyed by `K`, owning its priority source `R`.
pub struct Treap<K, V, R = SplitMix64> {
    pub(super) root: Link<K, V>,
    len: usize,
    rng: R,
    trace_rotations: bool,
}

impl<K, V> Treap<K, V, SplitMix64> {
    /// Creates an empty treap with clock-seeded priorities.
    pub fn new() -> Self {
        Self::with_rng(SplitMix64::from_clock())
    }

    /// Creates an empty treap whose shape is reproducible for a given
    /// sequence of operations.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(SplitMix64::new(seed))
    }
}

impl<K, V> Default for Treap<K, V, SplitMix64> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, R> Treap<K, V, R> {
    /// Creates an empty treap drawing priorities from `rng`.
    pub fn with_rng(rng: R) -> Self {
        Self {
            root: None,
            len: 0,
            rng,
            trace_rotations: false,
        }
    }

    /// Emits a trace event for every rotation when enabled.
    pub fn set_trace_rotations(&mut self, enabled: bool) {
        self.trace_rotations = enabled;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        drain(self.root.take());
        self.len = 0;
    }

    /// Number of nodes on the longest root-to-leaf path; 0 when empty.
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut stack: Vec<(&Node<K, V>, usize)> = Vec::new();
        if let Some(root) = self.root.as_deref() {
            stack.push((root, 1));
        }
        while let Some((node, depth)) = stack.pop() {
            height = height.max(depth);
            for child in [node.left.as_deref(), node.right.as_deref()]
                .into_iter()
                .flatten()
            {
                stack.push((child, depth + 1));
            }
        }
        height
    }

    /// Lazy in-order walk yielding entries in ascending key order.
    /// Calling it again restarts from the smallest key.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self.root.as_deref(), self.len)
    }

    /// Keys in ascending order.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys::new(self.iter())
    }

    /// Entry with the smallest key.
    pub fn first(&self) -> Option<(&K, &V)> {
        let mut node = self.root.as_deref()?;
        while let Some(left) = node.left.as_deref() {
            node = left;
        }
        Some((&node.key, &node.value))
    }

    /// Entry with the largest key.
    pub fn last(&self) -> Option<(&K, &V)> {
        let mut node = self.root.as_deref()?;
        while let Some(right) = node.right.as_deref() {
            node = right;
        }
        Some((&node.key, &node.value))
    }
}

impl<K: KeyOrd, V, R: RngCore> Treap<K, V, R> {
    /// Inserts `key` with `value`, or replaces the value of an existing key
    /// in place without touching its priority or position.
    ///
    /// A new node is placed as a leaf and then rotated upward while its
    /// priority beats its parent's. Neither pass recurses, so a degenerate
    /// tree costs time but never stack.
    pub fn insert(&mut self, key: K, value: V) -> Result<InsertOutcome, KeyTypeError> {
        let mut path: Vec<Side> = Vec::new();
        let mut slot = &mut self.root;
        loop {
            let ordering = match slot.as_deref() {
                None => break,
                Some(node) => key.try_cmp(&node.key)?,
            };
            match ordering {
                Ordering::Equal => {
                    if let Some(node) = slot {
                        node.value = value;
                    }
                    return Ok(InsertOutcome::Updated);
                }
                Ordering::Less => match slot {
                    Some(node) => {
                        path.push(Side::Left);
                        slot = &mut node.left;
                    }
                    None => break,
                },
                Ordering::Greater => match slot {
                    Some(node) => {
                        path.push(Side::Right);
                        slot = &mut node.right;
                    }
                    None => break,
                },
            }
        }
        *slot = Some(Node::new(key, value, self.rng.next_u64()));
        self.len += 1;

        // Walk back up, promoting the new node while it outranks its parent.
        let traced = self.trace_rotations;
        while let Some(side) = path.pop() {
            let parent = slot_at(&mut self.root, &path);
            let promote = parent.as_deref().is_some_and(|node| {
                let child = match side {
                    Side::Left => node.left.as_deref(),
                    Side::Right => node.right.as_deref(),
                };
                child.is_some_and(|child| child.priority > node.priority)
            });
            if !promote {
                break;
            }
            match side {
                Side::Left => rotate_right(parent, traced),
                Side::Right => rotate_left(parent, traced),
            }
        }
        Ok(InsertOutcome::Inserted)
    }
}

impl<K: KeyOrd, V, R> Treap<K, V, R> {
    /// Looks up the value stored under `key`.
    pub fn search(&self, key: &K) -> Result<Option<&V>, KeyTypeError> {
        let mut cur = self.root.as_deref();
        while let Some(node) = cur {
            cur = match key.try_cmp(&node.key)? {
                Ordering::Equal => return Ok(Some(&node.value)),
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
            };
        }
        Ok(None)
    }

    /// Mutable access to the value stored under `key`.
    pub fn search_mut(&mut self, key: &K) -> Result<Option<&mut V>, KeyTypeError> {
        let mut cur = self.root.as_deref_mut();
        while let Some(node) = cur {
            cur = match key.try_cmp(&node.key)? {
                Ordering::Equal => return Ok(Some(&mut node.value)),
                Ordering::Less => node.left.as_deref_mut(),
                Ordering::Greater => node.right.as_deref_mut(),
            };
        }
        Ok(None)
    }

    pub fn contains_key(&self, key: &K) -> Result<bool, KeyTypeError> {
        Ok(self.search(key)?.is_some())
    }

    /// Removes `key` and returns its value, or `None` if it was absent.
    ///
    /// A node with two children is rotated down toward the child with the
    /// higher priority until at most one child remains, then spliced out.
    pub fn delete(&mut self, key: &K) -> Result<Option<V>, KeyTypeError> {
        let traced = self.trace_rotations;
        let mut slot = &mut self.root;
        loop {
            let ordering = match slot.as_deref() {
                None => return Ok(None),
                Some(node) => key.try_cmp(&node.key)?,
            };
            match ordering {
                Ordering::Equal => break,
                Ordering::Less => match slot {
                    Some(node) => slot = &mut node.left,
                    None => return Ok(None),
                },
                Ordering::Greater => match slot {
                    Some(node) => slot = &mut node.right,
                    None => return Ok(None),
                },
            }
        }
        let removed = unlink(slot, traced);
        if removed.is_some() {
            self.len -= 1;
        }
        Ok(removed)
    }

    /// Verifies heap order, cached length and strictly ascending in-order
    /// keys. Returns the first breach found.
    pub fn check_invariants(&self) -> Result<(), TreapViolation> {
        let mut counted = 0;
        let mut stack: Vec<&Node<K, V>> = Vec::new();
        if let Some(root) = self.root.as_deref() {
            stack.push(root);
        }
        while let Some(node) = stack.pop() {
            counted += 1;
            for child in [node.left.as_deref(), node.right.as_deref()]
                .into_iter()
                .flatten()
            {
                if child.priority > node.priority {
                    return Err(TreapViolation::HeapOrder {
                        parent: node.priority,
                        child: child.priority,
                    });
                }
                stack.push(child);
            }
        }
        if counted != self.len {
            return Err(TreapViolation::Length {
                cached: self.len,
                counted,
            });
        }

        let mut prev: Option<&K> = None;
        for (position, key) in self.keys().enumerate() {
            if let Some(prev) = prev {
                if prev.try_cmp(key)? != Ordering::Less {
                    return Err(TreapViolation::OutOfOrder { position });
                }
            }
            prev = Some(key);
        }
        Ok(())
    }
}

impl<'a, K, V, R> IntoIterator for &'a Treap<K, V, R> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: fmt::Debug, V: fmt::Debug, R> fmt::Debug for Treap<K, V, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, R> Drop for Treap<K, V, R> {
    fn drop(&mut self) {
        drain(self.root.take());
    }
}

#[derive(Clone, Copy)]
enum Side {
    Left,
    Right,
}

/// Follows `path` down from `root` and returns the link it ends on.
fn slot_at<'a, K, V>(root: &'a mut Link<K, V>, path: &[Side]) -> &'a mut Link<K, V> {
    let mut slot = root;
    for side in path {
        match slot {
            Some(node) => {
                slot = match side {
                    Side::Left => &mut node.left,
                    Side::Right => &mut node.right,
                }
            }
            None => break,
        }
    }
    slot
}

enum Step {
    PromoteLeft,
    PromoteRight,
    Splice,
}

/// Detaches the root of the subtree at `slot` and returns its value.
fn unlink<K, V>(mut slot: &mut Link<K, V>, traced: bool) -> Option<V> {
    loop {
        let step = match slot.as_deref() {
            None => return None,
            Some(node) => match (&node.left, &node.right) {
                (Some(left), Some(right)) if left.priority > right.priority => Step::PromoteLeft,
                (Some(_), Some(_)) => Step::PromoteRight,
                _ => Step::Splice,
            },
        };
        match step {
            Step::Splice => {
                let mut node = slot.take()?;
                *slot = node.left.take().or_else(|| node.right.take());
                return Some(node.value);
            }
            Step::PromoteLeft => {
                rotate_right(slot, traced);
                match slot {
                    Some(node) => slot = &mut node.right,
                    None => return None,
                }
            }
            Step::PromoteRight => {
                rotate_left(slot, traced);
                match slot {
                    Some(node) => slot = &mut node.left,
                    None => return None,
                }
            }
        }
    }
}

// Iterative teardown so a degenerate tree cannot overflow the stack on drop.
fn drain<K, V>(root: Link<K, V>) {
    let mut stack: Vec<Box<Node<K, V>>> = root.into_iter().collect();
    while let Some(mut node) = stack.pop() {
        stack.extend(node.left.take());
        stack.extend(node.right.take());
    }
}
