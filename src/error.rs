use alloc::string::String;

use thiserror::Error;

/// Errors returned by the fallible [`AvlTree`](crate::AvlTree) operations.
///
/// Lookups that have a natural "nothing there" answer (`min`, `successor`, `rank`, ...)
/// return `Option` instead; only operations whose caller asserts the key exists fail.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The key passed to [`get_value`](crate::AvlTree::get_value) or
    /// [`delete`](crate::AvlTree::delete) is not in the tree. The tree is unchanged.
    #[error("key {key} does not exist in the tree")]
    KeyNotFound {
        /// The missing key, rendered with `Debug`.
        key: String,
    },

    /// A traversal name other than `inorder`, `preorder` or `postorder`.
    #[error("traversal `{0}` not recognized, expected `inorder`, `preorder` or `postorder`")]
    UnknownTraversal(String),
}

impl Error {
    pub(crate) fn key_not_found<K: core::fmt::Debug>(key: &K) -> Self {
        Error::KeyNotFound {
            key: alloc::format!("{key:?}"),
        }
    }
}

/// Result type alias for fallible tree operations.
pub type Result<T> = core::result::Result<T, Error>;
