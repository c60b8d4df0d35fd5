/// A one-based rank into the ascending key order of a tree.
///
/// `Rank(1)` is the smallest key, `Rank(tree.len())` the largest. This matches the values
/// returned by [`AvlTree::rank`](crate::AvlTree::rank) and accepted by
/// [`AvlTree::select`](crate::AvlTree::select).
///
/// # Examples
///
/// ```
/// use osavl_tree::{AvlTree, Rank};
///
/// let mut tree = AvlTree::new();
/// tree.insert(20, "b");
/// tree.insert(10, "a");
///
/// assert_eq!(tree[Rank(1)], "a");
/// assert_eq!(tree[Rank(2)], "b");
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Rank(pub usize);
