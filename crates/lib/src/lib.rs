//!
//! Nestedset: hierarchical ordering of flat record collections using the
//! nested-set encoding.
//!
//! Every node carries a left bound, a right bound, a depth level and, for
//! multi-root configurations, a tree id. Containment of `(left, right)`
//! intervals encodes ancestry, so subtrees, ancestor chains and levels are
//! single range queries instead of recursive walks.
//!
//! ## Core Concepts
//!
//! * **Records (`record::NodeInfo`)**: Any type exposing an id and the four position integers.
//! * **Configuration (`config::Configuration`)**: Per-type mapping of field roles to store names, declared through `record::NestedSet`.
//! * **Backends (`backend::Backend`)**: The store collaborator evaluating scans, bulk updates and deletes. `backend::InMemory` is the reference implementation.
//! * **Manager (`manager::NestedSetManager`)**: Owns the registry of node views for one record type and one store, creates roots and fetches trees.
//! * **Node views (`node::Node`, `node::NodeMut`)**: Registry-held wrappers adding navigation and structural mutation (add, move, make root, delete), kept in sync with every shift applied to the store.
//! * **Tree views (`tree_view::TreeView`)**: Detached, read-only linked snapshots of a record list.
//!
//! The engine is single-threaded. Every structural operation is a sequence of
//! bulk store updates that must run inside one caller-owned transaction.

pub mod backend;
pub mod config;
pub mod manager;
pub mod node;
pub mod record;
pub mod tree_view;

pub use config::{Configuration, Field};
pub use manager::NestedSetManager;
pub use node::{MovePrimitive, Node, NodeMut, Position};
pub use record::{NestedSet, NodeInfo, NodeKey};
pub use tree_view::TreeView;

/// Result type used throughout the Nestedset library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the Nestedset library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Structured store errors from the backend module
    #[error(transparent)]
    Backend(backend::BackendError),

    /// Structured node errors from the node module
    #[error(transparent)]
    Node(node::NodeError),

    /// Structured configuration errors from the config module
    #[error(transparent)]
    Config(config::ConfigError),

    /// Structured tree view errors from the tree_view module
    #[error(transparent)]
    TreeView(tree_view::TreeViewError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Backend(_) => "backend",
            Error::Node(_) => "node",
            Error::Config(_) => "config",
            Error::TreeView(_) => "tree_view",
        }
    }

    /// Check if this error indicates a record or node was not found.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Backend(backend_err) => backend_err.is_not_found(),
            Error::Node(node_err) => node_err.is_not_found(),
            _ => false,
        }
    }

    /// Check if a record without a tree position was used as a node.
    pub fn is_not_a_node(&self) -> bool {
        match self {
            Error::Node(node_err) => node_err.is_not_a_node(),
            _ => false,
        }
    }

    /// Check if an operation named a node as its own destination.
    pub fn is_self_reference(&self) -> bool {
        match self {
            Error::Node(node_err) => node_err.is_self_reference(),
            _ => false,
        }
    }

    /// Check if this error was caused by invalid caller input.
    pub fn is_caller_error(&self) -> bool {
        match self {
            Error::Node(node_err) => node_err.is_caller_error(),
            Error::Config(_) => true,
            Error::TreeView(tree_err) => tree_err.is_invalid_input(),
            Error::Backend(_) => false,
        }
    }

    /// Check if this error came from the store.
    pub fn is_backend_error(&self) -> bool {
        matches!(self, Error::Backend(_))
    }

    /// Check if this error is I/O related.
    pub fn is_io_error(&self) -> bool {
        match self {
            Error::Backend(backend_err) => backend_err.is_io_error(),
            _ => false,
        }
    }

    /// Check if this error is configuration-related.
    pub fn is_config_error(&self) -> bool {
        matches!(self, Error::Config(_))
    }
}
