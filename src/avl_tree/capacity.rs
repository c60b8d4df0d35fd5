use super::AvlTree;
use crate::raw::RawAvlTree;

impl<K, V> AvlTree<K, V> {
    /// Creates an empty tree with room for at least `capacity` entries before its node
    /// arena reallocates.
    ///
    /// # Examples
    ///
    /// ```
    /// use osavl_tree::AvlTree;
    ///
    /// let tree: AvlTree<i32, i32> = AvlTree::with_capacity(32);
    /// assert!(tree.is_empty());
    /// assert!(tree.capacity() >= 32);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(capacity) for memory allocation.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        AvlTree {
            raw: RawAvlTree::with_capacity(capacity),
        }
    }

    /// Returns how many entries the tree can hold without reallocating.
    ///
    /// Slots freed by removals are reused, so the capacity never shrinks.
    ///
    /// # Examples
    ///
    /// ```
    /// use osavl_tree::AvlTree;
    ///
    /// let mut tree = AvlTree::with_capacity(4);
    /// let capacity = tree.capacity();
    /// for key in 0..4 {
    ///     tree.insert(key, ());
    /// }
    /// tree.remove(&0);
    /// tree.insert(10, ());
    /// assert_eq!(tree.capacity(), capacity);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }
}
