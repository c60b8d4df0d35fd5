use super::handle::Handle;
use super::size::Size;

/// Height of a non-empty subtree; a leaf has height 0.
///
/// `u8` is plenty: an AVL tree of height 255 would need more nodes than `Handle::MAX`.
pub(crate) type Height = u8;

/// A single tree node.
///
/// `left`/`right` are the owning edges. `min`/`max`/`prev`/`next` are cross-links into the
/// same arena and never decide when a node is freed.
#[derive(Clone)]
pub(crate) struct AvlNode<K, V> {
    key: K,
    value: V,
    left: Option<Handle>,
    right: Option<Handle>,
    // Augmentation, recomputed bottom-up after every structural change.
    height: Height,
    size: Size,
    min: Handle,
    max: Handle,
    // In-order thread.
    prev: Option<Handle>,
    next: Option<Handle>,
}

impl<K, V> AvlNode<K, V> {
    /// Creates a detached leaf. `this` is the handle the node is about to be stored under,
    /// so its subtree min/max can point at itself.
    pub(crate) fn new_leaf(this: Handle, key: K, value: V) -> Self {
        Self {
            key,
            value,
            left: None,
            right: None,
            height: 0,
            size: Size::ONE,
            min: this,
            max: this,
            prev: None,
            next: None,
        }
    }

    #[inline]
    pub(crate) fn key(&self) -> &K {
        &self.key
    }

    #[inline]
    pub(crate) fn value(&self) -> &V {
        &self.value
    }

    #[inline]
    pub(crate) fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }

    /// Consumes the node, returning its entry.
    pub(crate) fn into_entry(self) -> (K, V) {
        (self.key, self.value)
    }

    #[inline]
    pub(crate) fn left(&self) -> Option<Handle> {
        self.left
    }

    pub(crate) fn set_left(&mut self, left: Option<Handle>) {
        self.left = left;
    }

    #[inline]
    pub(crate) fn right(&self) -> Option<Handle> {
        self.right
    }

    pub(crate) fn set_right(&mut self, right: Option<Handle>) {
        self.right = right;
    }

    /// Returns true if the node has no children.
    pub(crate) fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    #[inline]
    pub(crate) fn height(&self) -> Height {
        self.height
    }

    #[inline]
    pub(crate) fn size(&self) -> Size {
        self.size
    }

    /// Handle of the smallest key in this subtree.
    #[inline]
    pub(crate) fn min(&self) -> Handle {
        self.min
    }

    /// Handle of the largest key in this subtree.
    #[inline]
    pub(crate) fn max(&self) -> Handle {
        self.max
    }

    /// Stores freshly computed augmentation.
    pub(crate) fn set_augmentation(&mut self, height: Height, size: Size, min: Handle, max: Handle) {
        self.height = height;
        self.size = size;
        self.min = min;
        self.max = max;
    }

    #[inline]
    pub(crate) fn prev(&self) -> Option<Handle> {
        self.prev
    }

    pub(crate) fn set_prev(&mut self, prev: Option<Handle>) {
        self.prev = prev;
    }

    #[inline]
    pub(crate) fn next(&self) -> Option<Handle> {
        self.next
    }

    pub(crate) fn set_next(&mut self, next: Option<Handle>) {
        self.next = next;
    }
}

