use core::cmp::Ordering;
use core::fmt;
use core::iter::FusedIterator;
use core::ops::Index;

use crate::error::{Error, Result};
use crate::key::Key;
use crate::raw::{Handle, RawAvlTree};
use crate::traversal::Traversal;

mod capacity;
mod order_statistic;
mod traverse;

pub use traverse::{Entries, Postorder, Preorder, Traverse};

/// An ordered map keyed by numbers, backed by a threaded order-statistic [AVL tree].
///
/// Besides the usual map operations, every node caches the height, size, and minimum and
/// maximum of its subtree, and all nodes are chained into a doubly-linked list in key
/// order. That gives:
///
/// - O(log n) [`insert`], [`remove`], [`get`], [`rank`] and [`select`],
/// - O(1) [`min`]/[`max`] and O(1) steps between neighbouring keys once one is located
///   ([`successor`], [`predecessor`], [`iter`] in both directions),
/// - lazily evaluated pre-order and post-order walks of the actual tree shape.
///
/// Keys are any primitive integer or float (see [`Key`]) and are unique: inserting an
/// existing key replaces its value in place.
///
/// # Examples
///
/// ```
/// use osavl_tree::AvlTree;
///
/// let mut tree = AvlTree::new();
/// for key in [5, 3, 8, 1, 4, 7, 9] {
///     tree.insert(key, key * 10);
/// }
///
/// let keys: Vec<_> = tree.keys().copied().collect();
/// assert_eq!(keys, [1, 3, 4, 5, 7, 8, 9]);
///
/// // Order statistics are one-based.
/// assert_eq!(tree.rank(&7), Some(5));
/// assert_eq!(tree.select(1), Some((&1, &10)));
///
/// // Neighbours, whether or not the probe key is present.
/// assert_eq!(tree.successor(&5), Some((&7, &70)));
/// assert_eq!(tree.predecessor(&6), Some((&5, &50)));
///
/// // Deleting a missing key is an error; `remove` is the `Option` flavour.
/// assert_eq!(tree.delete(&5), Ok(50));
/// assert!(tree.delete(&5).is_err());
/// assert_eq!(tree.len(), 6);
/// ```
///
/// A tree with a known list of entries can be initialized from an array:
///
/// ```
/// use osavl_tree::AvlTree;
///
/// let boiling_points = AvlTree::from([(100.0, "water"), (78.37, "ethanol"), (-33.34, "ammonia")]);
/// assert_eq!(boiling_points.min(), Some((&-33.34, &"ammonia")));
/// ```
///
/// [AVL tree]: https://en.wikipedia.org/wiki/AVL_tree
/// [`insert`]: AvlTree::insert
/// [`remove`]: AvlTree::remove
/// [`get`]: AvlTree::get
/// [`rank`]: AvlTree::rank
/// [`select`]: AvlTree::select
/// [`min`]: AvlTree::min
/// [`max`]: AvlTree::max
/// [`successor`]: AvlTree::successor
/// [`predecessor`]: AvlTree::predecessor
/// [`iter`]: AvlTree::iter
pub struct AvlTree<K, V> {
    raw: RawAvlTree<K, V>,
}

/// An iterator over the entries of an `AvlTree`, in ascending key order.
///
/// This `struct` is created by the [`iter`] method on [`AvlTree`]. It follows the in-order
/// thread, so each step is O(1), and it can be walked from both ends.
///
/// # Examples
///
/// ```
/// use osavl_tree::AvlTree;
///
/// let tree = AvlTree::from([(1, "a"), (2, "b")]);
/// let mut iter = tree.iter();
/// assert_eq!(iter.next(), Some((&1, &"a")));
/// assert_eq!(iter.next_back(), Some((&2, &"b")));
/// assert_eq!(iter.next(), None);
/// ```
///
/// [`iter`]: AvlTree::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, K, V> {
    tree: &'a RawAvlTree<K, V>,
    front: Option<Handle>,
    back: Option<Handle>,
    remaining: usize,
}

/// An iterator over the keys of an `AvlTree`, in ascending order.
///
/// This `struct` is created by the [`keys`] method on [`AvlTree`].
///
/// [`keys`]: AvlTree::keys
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

/// An iterator over the values of an `AvlTree`, in ascending key order.
///
/// This `struct` is created by the [`values`] method on [`AvlTree`].
///
/// [`values`]: AvlTree::values
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

/// An owning iterator over the entries of an `AvlTree`, in ascending key order.
///
/// This `struct` is created by the [`into_iter`] method on [`AvlTree`]
/// (provided by the [`IntoIterator`] trait).
///
/// [`into_iter`]: IntoIterator::into_iter
pub struct IntoIter<K, V> {
    inner: alloc::vec::IntoIter<(K, V)>,
}

impl<K, V> AvlTree<K, V> {
    /// Makes a new, empty `AvlTree`.
    ///
    /// Does not allocate anything on its own.
    ///
    /// # Examples
    ///
    /// ```
    /// use osavl_tree::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    /// tree.insert(1, "a");
    /// ```
    #[must_use]
    pub const fn new() -> Self {
        AvlTree { raw: RawAvlTree::new() }
    }

    /// Returns the number of entries in the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use osavl_tree::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    /// assert_eq!(tree.len(), 0);
    /// tree.insert(1, "a");
    /// assert_eq!(tree.len(), 1);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the tree contains no entries.
    ///
    /// # Examples
    ///
    /// ```
    /// use osavl_tree::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    /// assert!(tree.is_empty());
    /// tree.insert(1, "a");
    /// assert!(!tree.is_empty());
    /// ```
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Returns the height of the tree: `-1` when empty, `0` for a single entry.
    ///
    /// The AVL balance keeps this below `1.45 * log2(len + 2)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use osavl_tree::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    /// assert_eq!(tree.height(), -1);
    /// tree.extend((0..7).map(|k| (k, ())));
    /// assert_eq!(tree.height(), 2);
    /// ```
    #[must_use]
    pub fn height(&self) -> isize {
        self.raw.height()
    }

    /// Clears the tree, removing all entries.
    ///
    /// Entries are dropped in ascending key order.
    ///
    /// # Examples
    ///
    /// ```
    /// use osavl_tree::AvlTree;
    ///
    /// let mut tree = AvlTree::from([(1, "a")]);
    /// tree.clear();
    /// assert!(tree.is_empty());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(n)
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Returns the entry with the smallest key, or `None` if the tree is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use osavl_tree::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    /// assert_eq!(tree.min(), None);
    /// tree.insert(2, "b");
    /// tree.insert(1, "a");
    /// assert_eq!(tree.min(), Some((&1, &"a")));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1), read from the root's cached subtree minimum.
    #[must_use]
    pub fn min(&self) -> Option<(&K, &V)> {
        self.raw.first().map(|handle| self.raw.entry(handle))
    }

    /// Returns the entry with the largest key, or `None` if the tree is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use osavl_tree::AvlTree;
    ///
    /// let tree = AvlTree::from([(1, "a"), (2, "b")]);
    /// assert_eq!(tree.max(), Some((&2, &"b")));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn max(&self) -> Option<(&K, &V)> {
        self.raw.last().map(|handle| self.raw.entry(handle))
    }

    /// Returns the entry stored at the root of the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use osavl_tree::AvlTree;
    ///
    /// // Ascending inserts rotate the middle key to the top.
    /// let tree = AvlTree::from([(1, 'a'), (2, 'b'), (3, 'c')]);
    /// assert_eq!(tree.root_key_value(), Some((&2, &'b')));
    /// ```
    #[must_use]
    pub fn root_key_value(&self) -> Option<(&K, &V)> {
        self.raw.root().map(|handle| self.raw.entry(handle))
    }

    /// Returns an entry at the greatest depth, found by repeatedly descending into the
    /// taller subtree, taking the right one when both are equally tall.
    ///
    /// # Examples
    ///
    /// ```
    /// use osavl_tree::AvlTree;
    ///
    /// let tree = AvlTree::from([(4, ()), (2, ()), (6, ()), (1, ())]);
    /// assert_eq!(tree.deepest_key_value(), Some((&1, &())));
    ///
    /// let tree = AvlTree::from([(2, ()), (1, ()), (3, ())]);
    /// assert_eq!(tree.deepest_key_value(), Some((&3, &())));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn deepest_key_value(&self) -> Option<(&K, &V)> {
        self.raw.deepest().map(|handle| self.raw.entry(handle))
    }

    /// Gets an iterator over the entries of the tree, sorted by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use osavl_tree::AvlTree;
    ///
    /// let tree = AvlTree::from([(3, "c"), (2, "b"), (1, "a")]);
    /// for (key, value) in tree.iter() {
    ///     println!("{key}: {value}");
    /// }
    ///
    /// let (first_key, first_value) = tree.iter().next().unwrap();
    /// assert_eq!((*first_key, *first_value), (1, "a"));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1) to create the iterator; O(1) per step along the in-order thread.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            tree: &self.raw,
            front: self.raw.first(),
            back: self.raw.last(),
            remaining: self.raw.len(),
        }
    }

    /// Gets an iterator over the entries in ascending key order. Same as [`iter`].
    ///
    /// [`iter`]: AvlTree::iter
    pub fn inorder(&self) -> Iter<'_, K, V> {
        self.iter()
    }

    /// Gets an iterator over the entries in pre-order: each node before its left subtree,
    /// then its right subtree.
    ///
    /// Every call starts a fresh walk; iterating does not modify the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use osavl_tree::AvlTree;
    ///
    /// let tree = AvlTree::from([(2, ()), (1, ()), (3, ())]);
    /// let keys: Vec<_> = tree.preorder().map(|(k, _)| *k).collect();
    /// assert_eq!(keys, [2, 1, 3]);
    /// ```
    pub fn preorder(&self) -> Preorder<'_, K, V> {
        Preorder::new(&self.raw)
    }

    /// Gets an iterator over the entries in post-order: left subtree, right subtree, then
    /// the node itself.
    ///
    /// # Examples
    ///
    /// ```
    /// use osavl_tree::AvlTree;
    ///
    /// let tree = AvlTree::from([(2, ()), (1, ()), (3, ())]);
    /// let keys: Vec<_> = tree.postorder().map(|(k, _)| *k).collect();
    /// assert_eq!(keys, [1, 3, 2]);
    /// ```
    pub fn postorder(&self) -> Postorder<'_, K, V> {
        Postorder::new(&self.raw)
    }

    /// Gets an iterator over the entries in the order named by `order`.
    ///
    /// # Examples
    ///
    /// ```
    /// use osavl_tree::{AvlTree, Traversal};
    ///
    /// let tree = AvlTree::from([(2, ()), (1, ()), (3, ())]);
    /// let order: Traversal = "postorder".parse()?;
    /// let keys: Vec<_> = tree.traverse(order).map(|(k, _)| *k).collect();
    /// assert_eq!(keys, [1, 3, 2]);
    /// # Ok::<(), osavl_tree::Error>(())
    /// ```
    pub fn traverse(&self, order: Traversal) -> Traverse<'_, K, V> {
        Traverse::new(self, order)
    }

    /// Gets an iterator over all entries, ascending, or descending if `descending` is set.
    ///
    /// # Examples
    ///
    /// ```
    /// use osavl_tree::AvlTree;
    ///
    /// let tree = AvlTree::from([(1, 'a'), (2, 'b'), (3, 'c')]);
    /// let down: Vec<_> = tree.entries(true).map(|(k, _)| *k).collect();
    /// assert_eq!(down, [3, 2, 1]);
    /// ```
    pub fn entries(&self, descending: bool) -> Entries<'_, K, V> {
        Entries::new(self.iter(), descending)
    }

    /// Gets an iterator over the keys of the tree, in sorted order.
    ///
    /// # Examples
    ///
    /// ```
    /// use osavl_tree::AvlTree;
    ///
    /// let tree = AvlTree::from([(2, "b"), (1, "a")]);
    /// let keys: Vec<i32> = tree.keys().cloned().collect();
    /// assert_eq!(keys, [1, 2]);
    /// ```
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Gets an iterator over the values of the tree, in order by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use osavl_tree::AvlTree;
    ///
    /// let tree = AvlTree::from([(1, "hello"), (2, "goodbye")]);
    /// let values: Vec<&str> = tree.values().cloned().collect();
    /// assert_eq!(values, ["hello", "goodbye"]);
    /// ```
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }
}

impl<K: Key, V> AvlTree<K, V> {
    /// Inserts a key-value pair into the tree.
    ///
    /// If the tree did not have this key present, `None` is returned.
    ///
    /// If the tree did have this key present, the value is updated and the old value is
    /// returned. The node keeps its place in the tree, so nothing is rebalanced.
    ///
    /// # Examples
    ///
    /// ```
    /// use osavl_tree::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    /// assert_eq!(tree.insert(37, "a"), None);
    /// assert_eq!(tree.is_empty(), false);
    ///
    /// tree.insert(37, "b");
    /// assert_eq!(tree.insert(37, "c"), Some("b"));
    /// assert_eq!(tree[&37], "c");
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.raw.insert(key, value)
    }

    /// Returns a reference to the value corresponding to the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use osavl_tree::AvlTree;
    ///
    /// let tree = AvlTree::from([(1, "a")]);
    /// assert_eq!(tree.get(&1), Some(&"a"));
    /// assert_eq!(tree.get(&2), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        self.raw.get(key)
    }

    /// Returns a reference to the value corresponding to the key, or
    /// [`Error::KeyNotFound`] if the key is absent.
    ///
    /// # Errors
    ///
    /// [`Error::KeyNotFound`] when `key` is not in the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use osavl_tree::{AvlTree, Error};
    ///
    /// let tree = AvlTree::from([(1, "a")]);
    /// assert_eq!(tree.get_value(&1), Ok(&"a"));
    /// assert!(matches!(tree.get_value(&2), Err(Error::KeyNotFound { .. })));
    /// ```
    pub fn get_value(&self, key: &K) -> Result<&V> {
        self.get(key).ok_or_else(|| Error::key_not_found(key))
    }

    /// Returns the key-value pair corresponding to the supplied key.
    #[must_use]
    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        self.raw.search(key).map(|handle| self.raw.entry(handle))
    }

    /// Returns a mutable reference to the value corresponding to the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use osavl_tree::AvlTree;
    ///
    /// let mut tree = AvlTree::from([(1, "a")]);
    /// if let Some(x) = tree.get_mut(&1) {
    ///     *x = "b";
    /// }
    /// assert_eq!(tree[&1], "b");
    /// ```
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.raw.get_mut(key)
    }

    /// Returns `true` if the tree contains a value for the specified key.
    ///
    /// # Examples
    ///
    /// ```
    /// use osavl_tree::AvlTree;
    ///
    /// let tree = AvlTree::from([(1, "a")]);
    /// assert!(tree.contains_key(&1));
    /// assert!(!tree.contains_key(&2));
    /// ```
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.raw.search(key).is_some()
    }

    /// Removes a key from the tree, returning the value at the key if the key was
    /// previously in the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use osavl_tree::AvlTree;
    ///
    /// let mut tree = AvlTree::from([(1, "a")]);
    /// assert_eq!(tree.remove(&1), Some("a"));
    /// assert_eq!(tree.remove(&1), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, value)| value)
    }

    /// Removes a key from the tree, returning the stored key and value if the key was
    /// previously in the tree.
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        self.raw.remove_entry(key)
    }

    /// Removes a key from the tree and returns its value, or [`Error::KeyNotFound`] if the
    /// key is absent. A failed delete leaves the tree untouched.
    ///
    /// # Errors
    ///
    /// [`Error::KeyNotFound`] when `key` is not in the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use osavl_tree::AvlTree;
    ///
    /// let mut tree = AvlTree::from([(1, "a"), (2, "b")]);
    /// assert_eq!(tree.delete(&1), Ok("a"));
    /// assert_eq!(
    ///     tree.delete(&1).unwrap_err().to_string(),
    ///     "key 1 does not exist in the tree"
    /// );
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn delete(&mut self, key: &K) -> Result<V> {
        self.remove(key).ok_or_else(|| Error::key_not_found(key))
    }

    /// Removes and returns the entry with the smallest key.
    ///
    /// # Examples
    ///
    /// ```
    /// use osavl_tree::AvlTree;
    ///
    /// let mut tree = AvlTree::from([(1, "a"), (2, "b")]);
    /// assert_eq!(tree.extract_min(), Some((1, "a")));
    /// assert_eq!(tree.extract_min(), Some((2, "b")));
    /// assert_eq!(tree.extract_min(), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn extract_min(&mut self) -> Option<(K, V)> {
        self.raw.pop_first()
    }

    /// Removes and returns the entry with the largest key.
    ///
    /// # Examples
    ///
    /// ```
    /// use osavl_tree::AvlTree;
    ///
    /// let mut tree = AvlTree::from([(1, "a"), (2, "b")]);
    /// assert_eq!(tree.extract_max(), Some((2, "b")));
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn extract_max(&mut self) -> Option<(K, V)> {
        self.raw.pop_last()
    }

    /// Returns the entry with the smallest key strictly greater than `key`.
    ///
    /// `key` does not need to be in the tree. When it is, the answer is read from its
    /// in-order thread link.
    ///
    /// # Examples
    ///
    /// ```
    /// use osavl_tree::AvlTree;
    ///
    /// let tree = AvlTree::from([(10, 'a'), (20, 'b'), (30, 'c')]);
    /// assert_eq!(tree.successor(&10), Some((&20, &'b')));
    /// assert_eq!(tree.successor(&15), Some((&20, &'b')));
    /// assert_eq!(tree.successor(&30), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn successor(&self, key: &K) -> Option<(&K, &V)> {
        self.raw.successor(key).map(|handle| self.raw.entry(handle))
    }

    /// Returns the entry with the largest key strictly less than `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use osavl_tree::AvlTree;
    ///
    /// let tree = AvlTree::from([(10, 'a'), (20, 'b'), (30, 'c')]);
    /// assert_eq!(tree.predecessor(&20), Some((&10, &'a')));
    /// assert_eq!(tree.predecessor(&35), Some((&30, &'c')));
    /// assert_eq!(tree.predecessor(&10), None);
    /// ```
    #[must_use]
    pub fn predecessor(&self, key: &K) -> Option<(&K, &V)> {
        self.raw.predecessor(key).map(|handle| self.raw.entry(handle))
    }
}

impl<K, V> Default for AvlTree<K, V> {
    fn default() -> Self {
        AvlTree::new()
    }
}

impl<K: Clone, V: Clone> Clone for AvlTree<K, V> {
    fn clone(&self) -> Self {
        AvlTree { raw: self.raw.clone() }
    }
}

/// Trees are equal when they hold the same keys, under [`Key::cmp_key`], with equal values.
///
/// ```
/// use osavl_tree::AvlTree;
///
/// let tree = AvlTree::from([(f64::NAN, 1)]);
/// assert_eq!(tree, tree.clone());
/// assert_ne!(AvlTree::from([(-0.0, 1)]), AvlTree::from([(0.0, 1)]));
/// ```
impl<K: Key, V: PartialEq> PartialEq for AvlTree<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .zip(other.iter())
                .all(|((ka, va), (kb, vb))| ka.cmp_key(kb) == Ordering::Equal && va == vb)
    }
}

impl<K: Key, V: Eq> Eq for AvlTree<K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for AvlTree<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Key, V> FromIterator<(K, V)> for AvlTree<K, V> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut tree = AvlTree::new();
        tree.extend(iter);
        tree
    }
}

impl<K: Key, V> Extend<(K, V)> for AvlTree<K, V> {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<'a, K: Key, V: Copy> Extend<(&'a K, &'a V)> for AvlTree<K, V> {
    fn extend<T: IntoIterator<Item = (&'a K, &'a V)>>(&mut self, iter: T) {
        for (&k, &v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K: Key, V, const N: usize> From<[(K, V); N]> for AvlTree<K, V> {
    fn from(arr: [(K, V); N]) -> Self {
        arr.into_iter().collect()
    }
}

impl<'a, K, V> IntoIterator for &'a AvlTree<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<K, V> IntoIterator for AvlTree<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    /// Gets an owning iterator over the entries of the tree, sorted by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use osavl_tree::AvlTree;
    ///
    /// let tree = AvlTree::from([(2, "b"), (1, "a")]);
    /// let mut iter = tree.into_iter();
    /// assert_eq!(iter.next(), Some((1, "a")));
    /// assert_eq!(iter.next_back(), Some((2, "b")));
    /// ```
    fn into_iter(mut self) -> IntoIter<K, V> {
        IntoIter {
            inner: self.raw.drain_to_vec().into_iter(),
        }
    }
}

impl<K: Key, V> Index<&K> for AvlTree<K, V> {
    type Output = V;

    /// Returns a reference to the value corresponding to the supplied key.
    ///
    /// # Panics
    ///
    /// Panics if the key is not present in the tree.
    fn index(&self, key: &K) -> &V {
        self.get(key).expect("no entry found for key")
    }
}

impl<'a, K: 'a, V: 'a> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let handle = self.front?;
        let node = self.tree.node(handle);
        self.front = node.next();
        self.remaining -= 1;
        Some((node.key(), node.value()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K: 'a, V: 'a> DoubleEndedIterator for Iter<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let handle = self.back?;
        let node = self.tree.node(handle);
        self.back = node.prev();
        self.remaining -= 1;
        Some((node.key(), node.value()))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter {
            tree: self.tree,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Keys<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, _)| k)
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for Keys<'_, K, V> {}

impl<K: fmt::Debug, V> fmt::Debug for Keys<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.inner.clone().map(|(k, _)| k)).finish()
    }
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Values<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, v)| v)
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for Values<'_, K, V> {}

impl<K, V: fmt::Debug> fmt::Debug for Values<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.inner.clone().map(|(_, v)| v)).finish()
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for IntoIter<K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for IntoIter<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntoIter").field("len", &self.inner.len()).finish()
    }
}

impl<K, V> Default for IntoIter<K, V> {
    /// Creates an empty `avl_tree::IntoIter`.
    ///
    /// ```
    /// # use osavl_tree::avl_tree;
    /// let iter: avl_tree::IntoIter<u8, u8> = Default::default();
    /// assert_eq!(iter.len(), 0);
    /// ```
    fn default() -> Self {
        IntoIter {
            inner: alloc::vec::Vec::new().into_iter(),
        }
    }
}
