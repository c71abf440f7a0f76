//! Tree nodes and the two rotation primitives.

use tracing::trace;

/// Owning link to a subtree. Every node has exactly one owner.
pub(crate) type Link<K, V> = Option<Box<Node<K, V>>>;

pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) priority: u64,
    pub(crate) left: Link<K, V>,
    pub(crate) right: Link<K, V>,
}

impl<K, V> Node<K, V> {
    pub(crate) fn new(key: K, value: V, priority: u64) -> Box<Self> {
        Box::new(Node {
            key,
            value,
            priority,
            left: None,
            right: None,
        })
    }
}

/// Promotes the right child of the subtree rooted at `slot`.
///
/// ```text
///     y              x
///    / \            / \
///   a   x    =>    y   c
///      / \        / \
///     b   c      a   b
/// ```
///
/// A missing right child leaves the subtree as it was.
pub(crate) fn rotate_left<K, V>(slot: &mut Link<K, V>, traced: bool) {
    let Some(mut root) = slot.take() else {
        return;
    };
    match root.right.take() {
        Some(mut pivot) => {
            if traced {
                trace!(
                    component = "treap",
                    event = "rotate_left",
                    demoted = root.priority,
                    promoted = pivot.priority,
                    "rotating left"
                );
            }
            root.right = pivot.left.take();
            pivot.left = Some(root);
            *slot = Some(pivot);
        }
        None => *slot = Some(root),
    }
}

/// Promotes the left child of the subtree rooted at `slot`. Mirror of
/// [`rotate_left`].
pub(crate) fn rotate_right<K, V>(slot: &mut Link<K, V>, traced: bool) {
    let Some(mut root) = slot.take() else {
        return;
    };
    match root.left.take() {
        Some(mut pivot) => {
            if traced {
                trace!(
                    component = "treap",
                    event = "rotate_right",
                    demoted = root.priority,
                    promoted = pivot.priority,
                    "rotating right"
                );
            }
            root.left = pivot.right.take();
            pivot.right = Some(root);
            *slot = Some(pivot);
        }
        None => *slot = Some(root),
    }
}
