use core::ops::{Index, IndexMut};

use super::AvlTree;
use crate::Rank;
use crate::key::Key;

impl<K: Key, V> AvlTree<K, V> {
    /// Returns the one-based position of `key` in ascending key order, or `None` if the key
    /// is not present.
    ///
    /// # Examples
    ///
    /// ```
    /// use osavl_tree::AvlTree;
    ///
    /// let tree = AvlTree::from([(10, "a"), (20, "b"), (30, "c")]);
    /// assert_eq!(tree.rank(&10), Some(1));
    /// assert_eq!(tree.rank(&30), Some(3));
    /// assert_eq!(tree.rank(&15), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn rank(&self, key: &K) -> Option<usize> {
        self.raw.rank_of(key)
    }

    /// Returns the entry holding the `rank`-th smallest key (one-based), or `None` when
    /// `rank` is `0` or greater than [`len`](AvlTree::len).
    ///
    /// `select(rank(k))` returns the entry of `k` for every key in the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use osavl_tree::AvlTree;
    ///
    /// let tree = AvlTree::from([(10, "a"), (30, "c"), (20, "b")]);
    /// assert_eq!(tree.select(2), Some((&20, &"b")));
    /// assert_eq!(tree.select(0), None);
    /// assert_eq!(tree.select(4), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn select(&self, rank: usize) -> Option<(&K, &V)> {
        self.raw.select(rank).map(|handle| self.raw.entry(handle))
    }

    /// Returns the key and a mutable reference to the value of the `rank`-th smallest entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use osavl_tree::AvlTree;
    ///
    /// let mut tree = AvlTree::from([(10, "a"), (5, "b")]);
    /// if let Some((key, value)) = tree.select_mut(1) {
    ///     assert_eq!(key, 5);
    ///     *value = "updated";
    /// }
    /// assert_eq!(tree.get(&5), Some(&"updated"));
    /// ```
    pub fn select_mut(&mut self, rank: usize) -> Option<(K, &mut V)> {
        let handle = self.raw.select(rank)?;
        let key = *self.raw.node(handle).key();
        Some((key, self.raw.value_mut(handle)))
    }
}

/// Indexes into the tree by one-based rank.
///
/// # Panics
///
/// Panics if `rank` is `0` or past the last entry.
///
/// # Examples
///
/// ```
/// use osavl_tree::{AvlTree, Rank};
///
/// let tree = AvlTree::from([(2.5, 'b'), (-1.0, 'a')]);
/// assert_eq!(tree[Rank(1)], 'a');
/// ```
impl<K: Key, V> Index<Rank> for AvlTree<K, V> {
    type Output = V;

    fn index(&self, rank: Rank) -> &Self::Output {
        self.select(rank.0).map(|(_, v)| v).expect("rank out of bounds")
    }
}

/// Mutably indexes into the tree by one-based rank.
///
/// # Panics
///
/// Panics if `rank` is `0` or past the last entry.
///
/// # Examples
///
/// ```
/// use osavl_tree::{AvlTree, Rank};
///
/// let mut tree = AvlTree::from([(1, 1), (2, 2)]);
/// tree[Rank(2)] = 5;
/// assert_eq!(tree.get(&2), Some(&5));
/// ```
impl<K: Key, V> IndexMut<Rank> for AvlTree<K, V> {
    fn index_mut(&mut self, rank: Rank) -> &mut Self::Output {
        self.select_mut(rank.0).map(|(_, v)| v).expect("rank out of bounds")
    }
}
