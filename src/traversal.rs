use core::fmt;
use core::str::FromStr;

use crate::error::Error;

/// The order in which [`AvlTree::traverse`](crate::AvlTree::traverse) visits entries.
///
/// Parses case-insensitively from its name, so callers can pick an order at runtime:
///
/// ```
/// use osavl_tree::Traversal;
///
/// assert_eq!("PreOrder".parse::<Traversal>(), Ok(Traversal::Preorder));
/// assert!("levelorder".parse::<Traversal>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum Traversal {
    /// Ascending key order.
    #[default]
    Inorder,
    /// Node, then left subtree, then right subtree.
    Preorder,
    /// Left subtree, then right subtree, then node.
    Postorder,
}

impl Traversal {
    /// All traversal orders.
    pub const ALL: [Traversal; 3] = [Traversal::Inorder, Traversal::Preorder, Traversal::Postorder];

    /// The lowercase name accepted by [`FromStr`].
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Traversal::Inorder => "inorder",
            Traversal::Preorder => "preorder",
            Traversal::Postorder => "postorder",
        }
    }
}

impl FromStr for Traversal {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Traversal::ALL
            .into_iter()
            .find(|order| order.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownTraversal(s.into()))
    }
}

impl fmt::Display for Traversal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
