//! Error types for detached tree views.

use thiserror::Error;

/// Errors raised while building a [`TreeView`](super::TreeView).
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum TreeViewError {
    /// No records were given.
    #[error("Cannot build a tree view from an empty record list")]
    EmptyInput,

    /// The records are not in ascending left-bound order.
    #[error("Record at position {position} is not ordered by left bound")]
    NotSortedByLeft {
        /// Index of the first out-of-order record
        position: usize,
    },
}

impl TreeViewError {
    /// Check if the input violated the ordering or emptiness precondition.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            TreeViewError::EmptyInput | TreeViewError::NotSortedByLeft { .. }
        )
    }
}

impl From<TreeViewError> for crate::Error {
    fn from(err: TreeViewError) -> Self {
        crate::Error::TreeView(err)
    }
}
