//! Error types for node navigation and structural mutation.

use thiserror::Error;

/// Errors raised by node views and the registry.
///
/// Most variants are caller errors: the offending operation is rejected before
/// it touches the store.
///
/// # Stability
///
/// - New variants may be added in minor versions (enum is `#[non_exhaustive]`)
/// - Existing variants will not be removed in minor versions
/// - Helper methods like `is_*()` provide stable APIs
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum NodeError {
    /// The record has no position in a tree (`right <= left`).
    #[error("Record {id} has no position in a tree (left {left}, right {right}) and is not a node")]
    NotANode {
        /// The id of the record
        id: i64,
        /// Its left bound
        left: i64,
        /// Its right bound
        right: i64,
    },

    /// An add, insert or move named the node itself as destination.
    #[error("Cannot {operation}: node {id} is its own destination")]
    SelfReference {
        /// The id of the node
        id: i64,
        /// The rejected operation
        operation: &'static str,
    },

    /// A move destination lies inside the subtree being moved.
    #[error("Cannot move node {id} below its own descendant {destination}")]
    DestinationInsideSubtree {
        /// The id of the node being moved
        id: i64,
        /// The id of the destination
        destination: i64,
    },

    /// A move primitive tag outside the known set reached the dispatcher.
    #[error("Unknown move primitive: {tag}")]
    UnknownMovePrimitive {
        /// The rejected tag
        tag: u8,
    },

    /// A record that already sits in a tree was handed to `create_root` or an add.
    #[error("Record {id} already has a position in a tree (left {left}, right {right})")]
    AlreadyPositioned {
        /// The id of the record
        id: i64,
        /// Its left bound
        left: i64,
        /// Its right bound
        right: i64,
    },

    /// A multi-root operation was used on a single-tree type.
    #[error("Operation {operation} requires a multi-root configuration")]
    NotMultiRoot {
        /// The rejected operation
        operation: &'static str,
    },

    /// The handle does not refer to a view held by the registry.
    #[error("Node {id} is not managed by this registry")]
    UnknownNode {
        /// The id the handle refers to
        id: i64,
    },
}

impl NodeError {
    /// Check if this error indicates a record without a tree position.
    pub fn is_not_a_node(&self) -> bool {
        matches!(self, NodeError::NotANode { .. })
    }

    /// Check if this error is a self-referencing add/insert/move.
    pub fn is_self_reference(&self) -> bool {
        matches!(self, NodeError::SelfReference { .. })
    }

    /// Check if the handle or record could not be found.
    pub fn is_not_found(&self) -> bool {
        matches!(self, NodeError::UnknownNode { .. })
    }

    /// Check if this error was caused by invalid arguments from the caller.
    pub fn is_caller_error(&self) -> bool {
        !matches!(self, NodeError::UnknownMovePrimitive { .. })
    }

    /// Get the id of the node this error is about, if any.
    pub fn node_id(&self) -> Option<i64> {
        match self {
            NodeError::NotANode { id, .. }
            | NodeError::SelfReference { id, .. }
            | NodeError::DestinationInsideSubtree { id, .. }
            | NodeError::AlreadyPositioned { id, .. }
            | NodeError::UnknownNode { id } => Some(*id),
            NodeError::UnknownMovePrimitive { .. } | NodeError::NotMultiRoot { .. } => None,
        }
    }
}

impl From<NodeError> for crate::Error {
    fn from(err: NodeError) -> Self {
        crate::Error::Node(err)
    }
}
