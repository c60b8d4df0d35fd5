use core::fmt;
use core::iter::FusedIterator;

use smallvec::SmallVec;

use super::{AvlTree, Iter};
use crate::raw::{Handle, RawAvlTree};
use crate::traversal::Traversal;

/// Inline stack depth for the structural walks. An AVL tree of 2^22 entries is at most
/// 32 levels deep, so the stack only spills for very large trees.
type WalkStack<T> = SmallVec<[T; 32]>;

/// A pre-order iterator over the entries of an `AvlTree`.
///
/// This `struct` is created by the [`preorder`] method on [`AvlTree`].
///
/// [`preorder`]: AvlTree::preorder
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Preorder<'a, K, V> {
    tree: &'a RawAvlTree<K, V>,
    stack: WalkStack<Handle>,
    remaining: usize,
}

/// A post-order iterator over the entries of an `AvlTree`.
///
/// This `struct` is created by the [`postorder`] method on [`AvlTree`].
///
/// [`postorder`]: AvlTree::postorder
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Postorder<'a, K, V> {
    tree: &'a RawAvlTree<K, V>,
    /// Pending nodes, flagged once their children have been pushed.
    stack: WalkStack<(Handle, bool)>,
    remaining: usize,
}

/// An iterator over the entries of an `AvlTree` in a [`Traversal`] order chosen at runtime.
///
/// This `enum` is created by the [`traverse`] method on [`AvlTree`].
///
/// [`traverse`]: AvlTree::traverse
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub enum Traverse<'a, K, V> {
    /// Ascending key order.
    Inorder(Iter<'a, K, V>),
    /// Node, left subtree, right subtree.
    Preorder(Preorder<'a, K, V>),
    /// Left subtree, right subtree, node.
    Postorder(Postorder<'a, K, V>),
}

/// An iterator over all entries of an `AvlTree` in ascending or descending key order.
///
/// This `struct` is created by the [`entries`] method on [`AvlTree`].
///
/// [`entries`]: AvlTree::entries
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Entries<'a, K, V> {
    inner: Iter<'a, K, V>,
    descending: bool,
}

impl<'a, K, V> Preorder<'a, K, V> {
    pub(super) fn new(tree: &'a RawAvlTree<K, V>) -> Self {
        Preorder {
            tree,
            stack: tree.root().into_iter().collect(),
            remaining: tree.len(),
        }
    }
}

impl<'a, K, V> Postorder<'a, K, V> {
    pub(super) fn new(tree: &'a RawAvlTree<K, V>) -> Self {
        Postorder {
            tree,
            stack: tree.root().map(|root| (root, false)).into_iter().collect(),
            remaining: tree.len(),
        }
    }
}

impl<'a, K, V> Traverse<'a, K, V> {
    pub(super) fn new(tree: &'a AvlTree<K, V>, order: Traversal) -> Self {
        match order {
            Traversal::Inorder => Traverse::Inorder(tree.iter()),
            Traversal::Preorder => Traverse::Preorder(tree.preorder()),
            Traversal::Postorder => Traverse::Postorder(tree.postorder()),
        }
    }

    /// The order this iterator walks in.
    #[must_use]
    pub fn order(&self) -> Traversal {
        match self {
            Traverse::Inorder(_) => Traversal::Inorder,
            Traverse::Preorder(_) => Traversal::Preorder,
            Traverse::Postorder(_) => Traversal::Postorder,
        }
    }
}

impl<'a, K, V> Entries<'a, K, V> {
    pub(super) fn new(inner: Iter<'a, K, V>, descending: bool) -> Self {
        Entries { inner, descending }
    }
}

impl<'a, K: 'a, V: 'a> Iterator for Preorder<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let handle = self.stack.pop()?;
        let node = self.tree.node(handle);
        // Right first so the left subtree pops next.
        self.stack.extend(node.right());
        self.stack.extend(node.left());
        self.remaining -= 1;
        Some((node.key(), node.value()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Preorder<'_, K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V> FusedIterator for Preorder<'_, K, V> {}

impl<'a, K: 'a, V: 'a> Iterator for Postorder<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (handle, expanded) = self.stack.pop()?;
            let node = self.tree.node(handle);
            if expanded || node.is_leaf() {
                self.remaining -= 1;
                return Some((node.key(), node.value()));
            }
            self.stack.push((handle, true));
            self.stack.extend(node.right().map(|right| (right, false)));
            self.stack.extend(node.left().map(|left| (left, false)));
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Postorder<'_, K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V> FusedIterator for Postorder<'_, K, V> {}

impl<'a, K: 'a, V: 'a> Iterator for Traverse<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Traverse::Inorder(iter) => iter.next(),
            Traverse::Preorder(iter) => iter.next(),
            Traverse::Postorder(iter) => iter.next(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Traverse::Inorder(iter) => iter.size_hint(),
            Traverse::Preorder(iter) => iter.size_hint(),
            Traverse::Postorder(iter) => iter.size_hint(),
        }
    }
}

impl<K, V> ExactSizeIterator for Traverse<'_, K, V> {}

impl<K, V> FusedIterator for Traverse<'_, K, V> {}

impl<'a, K: 'a, V: 'a> Iterator for Entries<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.descending { self.inner.next_back() } else { self.inner.next() }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, K: 'a, V: 'a> DoubleEndedIterator for Entries<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.descending { self.inner.next() } else { self.inner.next_back() }
    }
}

impl<K, V> ExactSizeIterator for Entries<'_, K, V> {}

impl<K, V> FusedIterator for Entries<'_, K, V> {}

impl<K, V> fmt::Debug for Preorder<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Preorder").field("remaining", &self.remaining).finish()
    }
}

impl<K, V> fmt::Debug for Postorder<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Postorder").field("remaining", &self.remaining).finish()
    }
}

impl<K, V> fmt::Debug for Traverse<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Traverse")
            .field("order", &self.order())
            .field("remaining", &self.size_hint().0)
            .finish()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Entries<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entries")
            .field("descending", &self.descending)
            .field("remaining", &self.inner.len())
            .finish()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use alloc::vec::Vec;

    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    use super::*;

    fn keys<'a>(iter: impl Iterator<Item = (&'a i32, &'a ())>) -> Vec<i32> {
        iter.map(|(k, _)| *k).collect()
    }

    fn tree_of(keys: &[i32]) -> AvlTree<i32, ()> {
        keys.iter().map(|&k| (k, ())).collect()
    }

    #[test]
    fn empty_tree_walks_nothing() {
        let tree = AvlTree::<i32, ()>::new();
        for order in Traversal::ALL {
            assert_eq!(tree.traverse(order).next(), None);
        }
        assert_eq!(tree.entries(true).len(), 0);
    }

    #[test]
    fn walks_follow_the_tree_shape() {
        //        5
        //      /   \
        //     3     8
        //    / \   / \
        //   1   4 7   9
        let tree = tree_of(&[5, 3, 8, 1, 4, 7, 9]);

        assert_eq!(keys(tree.inorder()), [1, 3, 4, 5, 7, 8, 9]);
        assert_eq!(keys(tree.preorder()), [5, 3, 1, 4, 8, 7, 9]);
        assert_eq!(keys(tree.postorder()), [1, 4, 3, 7, 9, 8, 5]);
        assert_eq!(keys(tree.entries(true)), [9, 8, 7, 5, 4, 3, 1]);
    }

    #[test]
    fn unbalanced_paths_are_walked_fully() {
        //     2
        //    / \
        //   1   4
        //      /
        //     3
        let tree = tree_of(&[2, 1, 4, 3]);
        assert_eq!(keys(tree.preorder()), [2, 1, 4, 3]);
        assert_eq!(keys(tree.postorder()), [1, 3, 4, 2]);
    }

    #[test]
    fn traverse_reports_its_order() {
        let tree = tree_of(&[1, 2, 3]);
        for order in Traversal::ALL {
            let walk = tree.traverse(order);
            assert_eq!(walk.order(), order);
            assert_eq!(walk.len(), 3);
        }
    }

    #[test]
    fn entries_can_be_reversed_again() {
        let tree = tree_of(&[1, 2, 3]);
        assert_eq!(keys(tree.entries(true).rev()), [1, 2, 3]);
        assert_eq!(keys(tree.entries(false)), [1, 2, 3]);
    }

    proptest! {
        #[test]
        fn structural_walks_visit_every_entry_once(keys in prop::collection::btree_set(-500i32..500, 0..300)) {
            let tree: AvlTree<i32, ()> = keys.iter().map(|&k| (k, ())).collect();
            let expected: Vec<i32> = keys.iter().copied().collect();

            for order in Traversal::ALL {
                let walk = tree.traverse(order);
                prop_assert_eq!(walk.len(), expected.len());
                let mut seen: Vec<i32> = walk.map(|(k, _)| *k).collect();
                seen.sort_unstable();
                prop_assert_eq!(&seen, &expected);
            }

            // Pre-order starts at the root, post-order ends there.
            let root = tree.root_key_value().map(|(k, _)| *k);
            prop_assert_eq!(tree.preorder().next().map(|(k, _)| *k), root);
            prop_assert_eq!(tree.postorder().last().map(|(k, _)| *k), root);
        }
    }
}
