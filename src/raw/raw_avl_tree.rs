use core::cmp::Ordering;

use log::{debug, trace};

use super::arena::Arena;
use super::handle::Handle;
use super::node::{AvlNode, Height};
use super::size::Size;
use crate::key::Key;

/// The core AVL implementation backing `AvlTree`.
///
/// Every node lives in one arena. Recursive mutations take a subtree handle and return the
/// handle of the (possibly rotated) subtree root together with a payload describing what
/// happened below, so no state is kept between frames.
#[derive(Clone)]
pub(crate) struct RawAvlTree<K, V> {
    /// Arena storing all tree nodes.
    nodes: Arena<AvlNode<K, V>>,
    /// Handle to the root node, if the tree is non-empty.
    root: Option<Handle>,
}

/// Payload reported up the call chain by an insertion frame.
enum Inserted<V> {
    /// A node was created below and still has to be spliced into the thread.
    Unthreaded(Handle),
    /// A node was created and threaded; ancestors only rebalance.
    Threaded,
    /// The key was already present. Carries the replaced value.
    Replaced(V),
}

impl<K, V> RawAvlTree<K, V> {
    /// Creates a new, empty tree.
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
        }
    }

    /// Creates a new tree with room for `capacity` nodes.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            root: None,
        }
    }

    /// Returns the number of key-value pairs in the tree.
    pub(crate) const fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the tree contains no elements.
    pub(crate) const fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the capacity of the node arena.
    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    /// Height of the whole tree: −1 when empty, 0 for a single node.
    pub(crate) fn height(&self) -> isize {
        self.root.map_or(-1, |root| isize::from(self.nodes.get(root).height()))
    }

    /// Returns the root handle, if any.
    pub(crate) fn root(&self) -> Option<Handle> {
        self.root
    }

    /// Returns the node stored under `handle`.
    pub(crate) fn node(&self, handle: Handle) -> &AvlNode<K, V> {
        self.nodes.get(handle)
    }

    /// Returns the key-value pair stored under `handle`.
    pub(crate) fn entry(&self, handle: Handle) -> (&K, &V) {
        let node = self.nodes.get(handle);
        (node.key(), node.value())
    }

    /// Handle of the smallest key: the head of the thread.
    pub(crate) fn first(&self) -> Option<Handle> {
        self.root.map(|root| self.nodes.get(root).min())
    }

    /// Handle of the largest key: the tail of the thread.
    pub(crate) fn last(&self) -> Option<Handle> {
        self.root.map(|root| self.nodes.get(root).max())
    }

    /// Releases every node by walking the thread head to tail, then resets the tree.
    pub(crate) fn clear(&mut self) {
        let released = self.len();
        let mut current = self.first();
        while let Some(handle) = current {
            current = self.nodes.get(handle).next();
            self.nodes.free(handle);
        }
        self.nodes.clear();
        self.root = None;
        debug!("cleared tree, released {released} nodes");
    }

    /// Drains all key-value pairs in ascending order by walking the thread.
    /// This is O(n) as it avoids rebalancing, unlike repeated `pop_first`.
    pub(crate) fn drain_to_vec(&mut self) -> alloc::vec::Vec<(K, V)> {
        let mut result = alloc::vec::Vec::with_capacity(self.len());
        let mut current = self.first();
        while let Some(handle) = current {
            let node = self.nodes.take(handle);
            current = node.next();
            result.push(node.into_entry());
        }
        self.nodes.clear();
        self.root = None;
        result
    }

    fn height_of(&self, link: Option<Handle>) -> i32 {
        link.map_or(-1, |handle| i32::from(self.nodes.get(handle).height()))
    }

    fn size_of(&self, link: Option<Handle>) -> usize {
        Size::of(link.map(|handle| self.nodes.get(handle).size()))
    }

    /// `height(left) - height(right)`.
    fn balance_factor(&self, handle: Handle) -> i32 {
        let node = self.nodes.get(handle);
        self.height_of(node.left()) - self.height_of(node.right())
    }

    /// Recomputes height, size and subtree min/max of `handle` from its children, which
    /// must already be up to date.
    fn update_augmentation(&mut self, handle: Handle) {
        let node = self.nodes.get(handle);
        let (left, right) = (node.left(), node.right());

        let height = 1 + self.height_of(left).max(self.height_of(right));
        let size = 1 + self.size_of(left) + self.size_of(right);
        // With the BST property the smallest key is the left subtree's minimum, or this
        // node when there is no left subtree; symmetric for the maximum.
        let min = left.map_or(handle, |l| self.nodes.get(l).min());
        let max = right.map_or(handle, |r| self.nodes.get(r).max());

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let height = height as Height;
        self.nodes.get_mut(handle).set_augmentation(height, Size::from_usize(size), min, max);
    }

    /// Splices detached node `new` into the thread immediately before `successor`.
    fn link_before(&mut self, new: Handle, successor: Handle) {
        let prev = self.nodes.get(successor).prev();
        if let Some(prev) = prev {
            self.nodes.get_mut(prev).set_next(Some(new));
        }
        let node = self.nodes.get_mut(new);
        node.set_prev(prev);
        node.set_next(Some(successor));
        self.nodes.get_mut(successor).set_prev(Some(new));
    }

    /// Splices detached node `new` into the thread immediately after `predecessor`.
    fn link_after(&mut self, new: Handle, predecessor: Handle) {
        let next = self.nodes.get(predecessor).next();
        if let Some(next) = next {
            self.nodes.get_mut(next).set_prev(Some(new));
        }
        let node = self.nodes.get_mut(new);
        node.set_prev(Some(predecessor));
        node.set_next(next);
        self.nodes.get_mut(predecessor).set_next(Some(new));
    }

    /// Removes `handle` from the thread, cross-linking its neighbours.
    fn unlink(&mut self, handle: Handle) {
        let node = self.nodes.get_mut(handle);
        let (prev, next) = (node.prev(), node.next());
        node.set_prev(None);
        node.set_next(None);
        if let Some(prev) = prev {
            self.nodes.get_mut(prev).set_next(next);
        }
        if let Some(next) = next {
            self.nodes.get_mut(next).set_prev(prev);
        }
    }

    /// Walks from the root into the taller child (the right one on ties) until a leaf.
    pub(crate) fn deepest(&self) -> Option<Handle> {
        let mut current = self.root?;
        loop {
            let node = self.nodes.get(current);
            let next = if self.height_of(node.left()) > self.height_of(node.right()) {
                node.left()
            } else {
                node.right()
            };
            match next {
                Some(child) => current = child,
                None => return Some(current),
            }
        }
    }

    /// Returns the handle holding the 1-based `rank`-th smallest key.
    pub(crate) fn select(&self, rank: usize) -> Option<Handle> {
        if rank == 0 || rank > self.len() {
            return None;
        }

        let mut current = self.root;
        let mut remaining = rank;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            let here = self.size_of(node.left()) + 1;
            match remaining.cmp(&here) {
                Ordering::Less => current = node.left(),
                Ordering::Equal => return Some(handle),
                Ordering::Greater => {
                    remaining -= here;
                    current = node.right();
                }
            }
        }

        None
    }
}

impl<K: Key, V> RawAvlTree<K, V> {
    fn rotate_left(&mut self, handle: Handle) -> Handle {
        let pivot = self.nodes.get(handle).right().expect("`rotate_left()` - node has no right child!");
        let inner = self.nodes.get(pivot).left();
        self.nodes.get_mut(handle).set_right(inner);
        self.nodes.get_mut(pivot).set_left(Some(handle));
        self.update_augmentation(handle);
        self.update_augmentation(pivot);
        trace!(
            "rotate_left: {:?} now above {:?}",
            self.nodes.get(pivot).key(),
            self.nodes.get(handle).key()
        );
        pivot
    }

    fn rotate_right(&mut self, handle: Handle) -> Handle {
        let pivot = self.nodes.get(handle).left().expect("`rotate_right()` - node has no left child!");
        let inner = self.nodes.get(pivot).right();
        self.nodes.get_mut(handle).set_left(inner);
        self.nodes.get_mut(pivot).set_right(Some(handle));
        self.update_augmentation(handle);
        self.update_augmentation(pivot);
        trace!(
            "rotate_right: {:?} now above {:?}",
            self.nodes.get(pivot).key(),
            self.nodes.get(handle).key()
        );
        pivot
    }

    /// Refreshes the augmentation of `handle` and restores the AVL balance of its subtree.
    /// Both children must already be balanced. Returns the new subtree root.
    fn rebalance(&mut self, handle: Handle) -> Handle {
        self.update_augmentation(handle);
        let balance = self.balance_factor(handle);

        if balance > 1 {
            let left = self.nodes.get(handle).left().expect("`rebalance()` - left-heavy node has no left child!");
            if self.balance_factor(left) < 0 {
                let left = self.rotate_left(left);
                self.nodes.get_mut(handle).set_left(Some(left));
            }
            self.rotate_right(handle)
        } else if balance < -1 {
            let right =
                self.nodes.get(handle).right().expect("`rebalance()` - right-heavy node has no right child!");
            if self.balance_factor(right) > 0 {
                let right = self.rotate_right(right);
                self.nodes.get_mut(handle).set_right(Some(right));
            }
            self.rotate_left(handle)
        } else {
            handle
        }
    }

    /// Detaches the leftmost node of the subtree at `handle` from the tree structure.
    /// Returns the new subtree root and the detached node, which is still threaded.
    fn detach_min(&mut self, handle: Handle) -> (Option<Handle>, Handle) {
        if let Some(left) = self.nodes.get(handle).left() {
            let (rest, min) = self.detach_min(left);
            self.nodes.get_mut(handle).set_left(rest);
            (Some(self.rebalance(handle)), min)
        } else {
            let node = self.nodes.get_mut(handle);
            let right = node.right();
            node.set_right(None);
            (right, handle)
        }
    }

    /// Detaches the rightmost node of the subtree at `handle` from the tree structure.
    /// Returns the new subtree root and the detached node, which is still threaded.
    fn detach_max(&mut self, handle: Handle) -> (Option<Handle>, Handle) {
        if let Some(right) = self.nodes.get(handle).right() {
            let (rest, max) = self.detach_max(right);
            self.nodes.get_mut(handle).set_right(rest);
            (Some(self.rebalance(handle)), max)
        } else {
            let node = self.nodes.get_mut(handle);
            let left = node.left();
            node.set_left(None);
            (left, handle)
        }
    }

    /// Removes the node at `handle` from the thread and returns the subtree that takes its
    /// place. With two children the in-order predecessor moves into the vacated position.
    fn splice_out(&mut self, handle: Handle) -> Option<Handle> {
        self.unlink(handle);
        let node = self.nodes.get(handle);
        match (node.left(), node.right()) {
            (None, None) => None,
            (Some(child), None) | (None, Some(child)) => Some(child),
            (Some(left), Some(right)) => {
                let (rest, predecessor) = self.detach_max(left);
                let replacement = self.nodes.get_mut(predecessor);
                replacement.set_left(rest);
                replacement.set_right(Some(right));
                Some(self.rebalance(predecessor))
            }
        }
    }

    /// Returns the handle holding `key`.
    pub(crate) fn search(&self, key: &K) -> Option<Handle> {
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            current = match key.cmp_key(node.key()) {
                Ordering::Less => node.left(),
                Ordering::Greater => node.right(),
                Ordering::Equal => return Some(handle),
            };
        }
        None
    }

    /// Returns a reference to the value corresponding to the key.
    pub(crate) fn get(&self, key: &K) -> Option<&V> {
        self.search(key).map(|handle| self.nodes.get(handle).value())
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub(crate) fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let handle = self.search(key)?;
        Some(self.nodes.get_mut(handle).value_mut())
    }

    /// Returns a mutable reference to the value stored under `handle`.
    pub(crate) fn value_mut(&mut self, handle: Handle) -> &mut V {
        self.nodes.get_mut(handle).value_mut()
    }

    /// Inserts a key-value pair into the tree.
    /// Returns the old value if the key was already present.
    pub(crate) fn insert(&mut self, key: K, value: V) -> Option<V> {
        let (root, inserted) = self.insert_at(self.root, key, value);
        self.root = Some(root);
        match inserted {
            Inserted::Replaced(old) => Some(old),
            Inserted::Unthreaded(_) | Inserted::Threaded => None,
        }
    }

    fn insert_at(&mut self, link: Option<Handle>, key: K, value: V) -> (Handle, Inserted<V>) {
        let Some(handle) = link else {
            let leaf = self.nodes.alloc_with(|this| AvlNode::new_leaf(this, key, value));
            return (leaf, Inserted::Unthreaded(leaf));
        };

        let node = self.nodes.get(handle);
        let (left, right) = (node.left(), node.right());
        let inserted = match key.cmp_key(node.key()) {
            Ordering::Equal => {
                let old = core::mem::replace(self.nodes.get_mut(handle).value_mut(), value);
                return (handle, Inserted::Replaced(old));
            }
            Ordering::Less => {
                let (left, inserted) = self.insert_at(left, key, value);
                self.nodes.get_mut(handle).set_left(Some(left));
                if let Inserted::Unthreaded(new) = inserted {
                    self.link_before(new, handle);
                    Inserted::Threaded
                } else {
                    inserted
                }
            }
            Ordering::Greater => {
                let (right, inserted) = self.insert_at(right, key, value);
                self.nodes.get_mut(handle).set_right(Some(right));
                if let Inserted::Unthreaded(new) = inserted {
                    self.link_after(new, handle);
                    Inserted::Threaded
                } else {
                    inserted
                }
            }
        };

        match inserted {
            // Nothing changed shape below this frame.
            Inserted::Replaced(_) => (handle, inserted),
            Inserted::Unthreaded(_) | Inserted::Threaded => (self.rebalance(handle), inserted),
        }
    }

    /// Removes a key from the tree, returning the stored key and value if present.
    pub(crate) fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        let root = self.root?;
        let (root, removed) = self.remove_at(root, key);
        let removed = removed?;
        self.root = root;
        Some(self.nodes.take(removed).into_entry())
    }

    /// Returns the new subtree root and the handle of the node to free, if `key` was found.
    /// A miss leaves the subtree untouched.
    fn remove_at(&mut self, handle: Handle, key: &K) -> (Option<Handle>, Option<Handle>) {
        let node = self.nodes.get(handle);
        let removed = match key.cmp_key(node.key()) {
            Ordering::Equal => return (self.splice_out(handle), Some(handle)),
            Ordering::Less => {
                let Some(left) = node.left() else {
                    return (Some(handle), None);
                };
                let (left, removed) = self.remove_at(left, key);
                if removed.is_none() {
                    return (Some(handle), None);
                }
                self.nodes.get_mut(handle).set_left(left);
                removed
            }
            Ordering::Greater => {
                let Some(right) = node.right() else {
                    return (Some(handle), None);
                };
                let (right, removed) = self.remove_at(right, key);
                if removed.is_none() {
                    return (Some(handle), None);
                }
                self.nodes.get_mut(handle).set_right(right);
                removed
            }
        };
        (Some(self.rebalance(handle)), removed)
    }

    /// Removes and returns the smallest entry.
    pub(crate) fn pop_first(&mut self) -> Option<(K, V)> {
        let root = self.root?;
        let (root, min) = self.detach_min(root);
        self.root = root;
        self.unlink(min);
        Some(self.nodes.take(min).into_entry())
    }

    /// Removes and returns the largest entry.
    pub(crate) fn pop_last(&mut self) -> Option<(K, V)> {
        let root = self.root?;
        let (root, max) = self.detach_max(root);
        self.root = root;
        self.unlink(max);
        Some(self.nodes.take(max).into_entry())
    }

    /// Returns the 1-based rank of `key`, summing left subtree sizes on the way down.
    pub(crate) fn rank_of(&self, key: &K) -> Option<usize> {
        let mut current = self.root;
        let mut rank = 0;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            let here = self.size_of(node.left()) + 1;
            match key.cmp_key(node.key()) {
                Ordering::Less => current = node.left(),
                Ordering::Equal => return Some(rank + here),
                Ordering::Greater => {
                    rank += here;
                    current = node.right();
                }
            }
        }
        None
    }

    /// Returns the node with the smallest key strictly greater than `key`.
    ///
    /// A present key answers through its thread link; an absent key keeps the tightest
    /// greater node seen during the descent.
    pub(crate) fn successor(&self, key: &K) -> Option<Handle> {
        let mut bound = None;
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            current = match key.cmp_key(node.key()) {
                Ordering::Less => {
                    bound = Some(handle);
                    node.left()
                }
                Ordering::Greater => node.right(),
                Ordering::Equal => return node.next(),
            };
        }
        bound
    }

    /// Returns the node with the largest key strictly less than `key`.
    pub(crate) fn predecessor(&self, key: &K) -> Option<Handle> {
        let mut bound = None;
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            current = match key.cmp_key(node.key()) {
                Ordering::Greater => {
                    bound = Some(handle);
                    node.right()
                }
                Ordering::Less => node.left(),
                Ordering::Equal => return node.prev(),
            };
        }
        bound
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap, clippy::uninlined_format_args)]
mod tests {
    use super::*;
    use alloc::collections::BTreeMap;
    use alloc::string::String;
    use alloc::vec::Vec;
    use proptest::prelude::*;

    impl<K: Key, V> RawAvlTree<K, V> {
        /// Validates every tree invariant. Panics with a descriptive message if any is violated.
        pub(crate) fn validate_invariants(&self) {
            let Some(root) = self.root else {
                assert_eq!(self.nodes.len(), 0, "Empty tree should own no nodes");
                return;
            };

            let mut errors: Vec<String> = Vec::new();

            // 1. Structure, augmentation and balance, collecting the in-order sequence.
            let mut in_order: Vec<Handle> = Vec::new();
            let (_, size) = self.validate_node(root, &mut in_order, &mut errors);

            // 2. Keys strictly ascending.
            for pair in in_order.windows(2) {
                if self.nodes.get(pair[0]).key().cmp_key(self.nodes.get(pair[1]).key()) != Ordering::Less {
                    errors.push(alloc::format!(
                        "BST order broken between {:?} and {:?}",
                        self.nodes.get(pair[0]).key(),
                        self.nodes.get(pair[1]).key()
                    ));
                }
            }

            // 3. Arena holds exactly the reachable nodes.
            if size != self.nodes.len() {
                errors.push(alloc::format!("size mismatch: reachable={}, arena={}", size, self.nodes.len()));
            }

            // 4. The thread matches the in-order sequence in both directions.
            self.validate_thread(&in_order, &mut errors);

            assert!(errors.is_empty(), "Tree invariant violations:\n{}", errors.join("\n"));
        }

        /// Returns (height, size) of the subtree at `handle` as recomputed from scratch.
        fn validate_node(&self, handle: Handle, in_order: &mut Vec<Handle>, errors: &mut Vec<String>) -> (i32, usize) {
            let node = self.nodes.get(handle);
            let (left_height, left_size) = match node.left() {
                Some(left) => self.validate_node(left, in_order, errors),
                None => (-1, 0),
            };
            let first = in_order.len();
            in_order.push(handle);
            let (right_height, right_size) = match node.right() {
                Some(right) => self.validate_node(right, in_order, errors),
                None => (-1, 0),
            };

            let height = 1 + left_height.max(right_height);
            let size = 1 + left_size + right_size;

            if (left_height - right_height).abs() > 1 {
                errors.push(alloc::format!(
                    "AVL balance broken at {:?}: left={}, right={}",
                    node.key(),
                    left_height,
                    right_height
                ));
            }
            if i32::from(node.height()) != height {
                errors.push(alloc::format!(
                    "height mismatch at {:?}: stored={}, actual={}",
                    node.key(),
                    node.height(),
                    height
                ));
            }
            if node.size().to_usize() != size {
                errors.push(alloc::format!(
                    "size mismatch at {:?}: stored={}, actual={}",
                    node.key(),
                    node.size().to_usize(),
                    size
                ));
            }

            // The subtree occupies in_order[first - left_size ..= first + right_size].
            let expected_min = in_order[first - left_size];
            let expected_max = in_order[first + right_size];
            if node.min() != expected_min || node.max() != expected_max {
                errors.push(alloc::format!(
                    "subtree min/max mismatch at {:?}: stored=({:?}, {:?}), actual=({:?}, {:?})",
                    node.key(),
                    node.min(),
                    node.max(),
                    expected_min,
                    expected_max
                ));
            }

            (height, size)
        }

        fn validate_thread(&self, in_order: &[Handle], errors: &mut Vec<String>) {
            if self.first() != in_order.first().copied() || self.last() != in_order.last().copied() {
                errors.push(alloc::format!(
                    "thread ends mismatch: first={:?}, last={:?}, expected ({:?}, {:?})",
                    self.first(),
                    self.last(),
                    in_order.first(),
                    in_order.last()
                ));
            }

            for (i, &handle) in in_order.iter().enumerate() {
                let node = self.nodes.get(handle);
                let expected_prev = i.checked_sub(1).map(|j| in_order[j]);
                let expected_next = in_order.get(i + 1).copied();
                if node.prev() != expected_prev {
                    errors.push(alloc::format!(
                        "thread prev mismatch at {:?}: expected {:?}, got {:?}",
                        node.key(),
                        expected_prev,
                        node.prev()
                    ));
                }
                if node.next() != expected_next {
                    errors.push(alloc::format!(
                        "thread next mismatch at {:?}: expected {:?}, got {:?}",
                        node.key(),
                        expected_next,
                        node.next()
                    ));
                }
            }
        }

        fn keys_by_thread(&self) -> Vec<K> {
            let mut keys = Vec::new();
            let mut current = self.first();
            while let Some(handle) = current {
                let node = self.nodes.get(handle);
                keys.push(*node.key());
                current = node.next();
            }
            keys
        }

        fn root_key(&self) -> Option<K> {
            self.root.map(|root| *self.nodes.get(root).key())
        }
    }

    fn tree_from(keys: &[i32]) -> RawAvlTree<i32, i32> {
        let mut tree = RawAvlTree::new();
        for &key in keys {
            tree.insert(key, key * 10);
            tree.validate_invariants();
        }
        tree
    }

    #[test]
    fn empty_tree() {
        let mut tree: RawAvlTree<i32, i32> = RawAvlTree::new();
        tree.validate_invariants();
        assert_eq!(tree.height(), -1);
        assert!(tree.is_empty());
        assert!(tree.first().is_none());
        assert!(tree.deepest().is_none());
        assert!(tree.select(1).is_none());
        assert!(tree.rank_of(&1).is_none());
        assert!(tree.successor(&1).is_none());
        assert!(tree.predecessor(&1).is_none());
        assert!(tree.pop_first().is_none());
        assert!(tree.pop_last().is_none());
        assert!(tree.remove_entry(&1).is_none());
    }

    #[test]
    fn single_node_is_its_own_min_and_max() {
        let tree = tree_from(&[42]);
        let root = tree.root().unwrap();
        assert_eq!(tree.height(), 0);
        assert_eq!(tree.node(root).min(), root);
        assert_eq!(tree.node(root).max(), root);
        assert!(tree.node(root).prev().is_none());
        assert!(tree.node(root).next().is_none());
    }

    #[test]
    fn left_left_case_rotates_right() {
        let tree = tree_from(&[3, 2, 1]);
        assert_eq!(tree.root_key(), Some(2));
        assert_eq!(tree.height(), 1);
    }

    #[test]
    fn right_right_case_rotates_left() {
        let tree = tree_from(&[1, 2, 3]);
        assert_eq!(tree.root_key(), Some(2));
        assert_eq!(tree.height(), 1);
    }

    #[test]
    fn left_right_case_double_rotates() {
        let tree = tree_from(&[3, 1, 2]);
        assert_eq!(tree.root_key(), Some(2));
        assert_eq!(tree.keys_by_thread(), [1, 2, 3]);
    }

    #[test]
    fn right_left_case_double_rotates() {
        let tree = tree_from(&[1, 3, 2]);
        assert_eq!(tree.root_key(), Some(2));
        assert_eq!(tree.keys_by_thread(), [1, 2, 3]);
    }

    #[test]
    fn reinsert_replaces_value_without_touching_structure() {
        let mut tree = tree_from(&[5, 3, 8, 1, 4, 7, 9]);
        let handle = tree.search(&4).unwrap();
        let (prev, next) = (tree.node(handle).prev(), tree.node(handle).next());

        assert_eq!(tree.insert(4, -4), Some(40));
        tree.validate_invariants();

        assert_eq!(tree.search(&4), Some(handle));
        assert_eq!(tree.node(handle).prev(), prev);
        assert_eq!(tree.node(handle).next(), next);
        assert_eq!(tree.get(&4), Some(&-4));
        assert_eq!(tree.len(), 7);
    }

    #[test]
    fn delete_with_two_children_promotes_predecessor() {
        let mut tree = tree_from(&[5, 3, 8, 1, 4, 7, 9]);
        let predecessor = tree.search(&4).unwrap();

        assert_eq!(tree.remove_entry(&5), Some((5, 50)));
        tree.validate_invariants();

        // The predecessor node now sits where 5 was and keeps its own thread identity.
        assert_eq!(tree.root(), Some(predecessor));
        assert_eq!(tree.root_key(), Some(4));
        assert_eq!(tree.keys_by_thread(), [1, 3, 4, 7, 8, 9]);
    }

    #[test]
    fn delete_leaf_and_single_child() {
        let mut tree = tree_from(&[5, 3, 8, 1, 9]);
        assert_eq!(tree.remove_entry(&1), Some((1, 10)));
        tree.validate_invariants();
        assert_eq!(tree.remove_entry(&8), Some((8, 80)));
        tree.validate_invariants();
        assert_eq!(tree.keys_by_thread(), [3, 5, 9]);
    }

    #[test]
    fn delete_missing_key_leaves_tree_untouched() {
        let mut tree = tree_from(&[5, 3, 8]);
        let root = tree.root();
        assert!(tree.remove_entry(&4).is_none());
        assert!(tree.remove_entry(&100).is_none());
        tree.validate_invariants();
        assert_eq!(tree.root(), root);
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn freed_slots_are_reused_by_later_inserts() {
        let mut tree = tree_from(&[1, 2, 3]);
        let capacity = tree.capacity();
        tree.remove_entry(&2);
        tree.insert(4, 40);
        tree.validate_invariants();
        assert_eq!(tree.capacity(), capacity);
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn deepest_prefers_taller_child_then_right() {
        // Perfectly balanced: ties all the way down go right.
        let tree = tree_from(&[4, 2, 6, 1, 3, 5, 7]);
        assert_eq!(tree.deepest().map(|h| *tree.node(h).key()), Some(7));

        // Left subtree is taller.
        let tree = tree_from(&[4, 2, 6, 1]);
        assert_eq!(tree.deepest().map(|h| *tree.node(h).key()), Some(1));
    }

    #[test]
    fn neighbors_of_absent_keys_use_closest_bound() {
        let tree = tree_from(&[10, 20, 30, 40, 50]);
        let key = |h: Option<Handle>| h.map(|h| *tree.node(h).key());

        assert_eq!(key(tree.successor(&25)), Some(30));
        assert_eq!(key(tree.predecessor(&25)), Some(20));
        assert_eq!(key(tree.successor(&5)), Some(10));
        assert_eq!(key(tree.predecessor(&5)), None);
        assert_eq!(key(tree.successor(&55)), None);
        assert_eq!(key(tree.predecessor(&55)), Some(50));
        assert_eq!(key(tree.successor(&50)), None);
        assert_eq!(key(tree.predecessor(&10)), None);
    }

    #[test]
    fn clear_walks_thread_and_resets() {
        let mut tree = tree_from(&[5, 3, 8, 1, 4, 7, 9]);
        tree.clear();
        tree.validate_invariants();
        assert!(tree.is_empty());
        assert!(tree.root().is_none());

        tree.insert(1, 1);
        tree.validate_invariants();
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn drain_yields_ascending_entries() {
        let mut tree = tree_from(&[5, 3, 8, 1]);
        assert_eq!(tree.drain_to_vec(), [(1, 10), (3, 30), (5, 50), (8, 80)]);
        assert!(tree.is_empty());
        tree.validate_invariants();
    }

    #[test]
    fn ascending_inserts_stay_logarithmic() {
        let mut tree: RawAvlTree<i32, ()> = RawAvlTree::new();
        for i in 0..1023 {
            tree.insert(i, ());
        }
        tree.validate_invariants();
        // A perfect tree of 1023 nodes has height 9; AVL allows up to ~1.44 log2 n.
        assert!(tree.height() <= 14, "height {} too large", tree.height());
    }

    #[test]
    fn float_keys_order_totally() {
        let mut tree: RawAvlTree<f64, &str> = RawAvlTree::new();
        tree.insert(f64::NAN, "nan");
        tree.insert(1.5, "a");
        tree.insert(-0.0, "neg");
        tree.insert(0.0, "pos");
        tree.insert(f64::INFINITY, "inf");
        tree.validate_invariants();

        assert_eq!(tree.len(), 5);
        assert_eq!(tree.rank_of(&0.0), Some(2));
        assert_eq!(tree.select(5).map(|h| *tree.node(h).value()), Some("nan"));
    }

    // Test operations enum for property testing
    #[derive(Clone, Debug)]
    enum Op {
        Insert(i32),
        Remove(i32),
        PopFirst,
        PopLast,
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            6 => (0i32..400).prop_map(Op::Insert),
            3 => (0i32..400).prop_map(Op::Remove),
            1 => Just(Op::PopFirst),
            1 => Just(Op::PopLast),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn invariants_hold_after_every_operation(ops in prop::collection::vec(op_strategy(), 0..400)) {
            let mut tree: RawAvlTree<i32, i32> = RawAvlTree::new();
            let mut model: BTreeMap<i32, i32> = BTreeMap::new();

            for op in ops {
                match op {
                    Op::Insert(key) => {
                        prop_assert_eq!(tree.insert(key, key * 2), model.insert(key, key * 2));
                    }
                    Op::Remove(key) => {
                        prop_assert_eq!(tree.remove_entry(&key), model.remove_entry(&key));
                    }
                    Op::PopFirst => prop_assert_eq!(tree.pop_first(), model.pop_first()),
                    Op::PopLast => prop_assert_eq!(tree.pop_last(), model.pop_last()),
                }
                tree.validate_invariants();
                prop_assert_eq!(tree.len(), model.len());
            }

            let keys: Vec<i32> = model.keys().copied().collect();
            prop_assert_eq!(tree.keys_by_thread(), keys);
        }

        #[test]
        fn rank_and_select_agree_with_sorted_order(keys in prop::collection::btree_set(-1000i32..1000, 1..200)) {
            let keys: Vec<i32> = keys.into_iter().collect();
            let mut tree: RawAvlTree<i32, i32> = RawAvlTree::new();
            // Insert in a scrambled but deterministic order.
            for (i, &key) in keys.iter().enumerate().rev() {
                if i % 2 == 0 {
                    tree.insert(key, key);
                }
            }
            for (i, &key) in keys.iter().enumerate() {
                if i % 2 == 1 {
                    tree.insert(key, key);
                }
            }
            tree.validate_invariants();

            for (position, key) in keys.iter().enumerate() {
                prop_assert_eq!(tree.rank_of(key), Some(position + 1));
                let handle = tree.select(position + 1).unwrap();
                prop_assert_eq!(tree.node(handle).key(), key);
            }
            prop_assert!(tree.select(0).is_none());
            prop_assert!(tree.select(keys.len() + 1).is_none());
        }

        #[test]
        fn successor_and_predecessor_match_btreemap(
            keys in prop::collection::vec(-500i32..500, 0..200),
            probes in prop::collection::vec(-510i32..510, 1..50),
        ) {
            let mut tree: RawAvlTree<i32, ()> = RawAvlTree::new();
            let mut model: BTreeMap<i32, ()> = BTreeMap::new();
            for key in keys {
                tree.insert(key, ());
                model.insert(key, ());
            }

            for probe in probes {
                let expected_next = model.range(probe + 1..).next().map(|(k, _)| *k);
                let expected_prev = model.range(..probe).next_back().map(|(k, _)| *k);
                prop_assert_eq!(tree.successor(&probe).map(|h| *tree.node(h).key()), expected_next);
                prop_assert_eq!(tree.predecessor(&probe).map(|h| *tree.node(h).key()), expected_prev);
            }
        }
    }
}
