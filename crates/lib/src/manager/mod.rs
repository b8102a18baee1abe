//! The tree manager: registry owner and entry point of the engine.
//!
//! A [`NestedSetManager`] pairs one [`Backend`] with the registry of node views
//! for one record type. It creates roots, lists and fetches whole trees,
//! resolves records into views, and hands out [`NodeMut`] handles for
//! navigation and structural mutation.
//!
//! The manager is single-threaded and not reentrant. Every structural
//! operation issues several bulk store updates that must run inside one
//! transaction owned by the caller.

mod builder;
mod registry;
mod shift;

use tracing::{debug, warn};

use crate::Result;
use crate::backend::{Backend, BackendError, Direction, Filter, Query};
use crate::config::{Configuration, Field};
use crate::node::{Node, NodeError, NodeMut, Position};
use crate::record::{NestedSet, NodeKey};

use registry::Registry;

/// Owner of the node views of one record type over one store.
///
/// # Example
///
/// ```
/// # use nestedset::{Configuration, NestedSet, NestedSetManager, NodeInfo};
/// # use nestedset::backend::InMemory;
/// # #[derive(Clone, Default)]
/// # struct Category { id: i64, lft: i64, rgt: i64, level: i64, name: String }
/// # impl NodeInfo for Category {
/// #     fn id(&self) -> i64 { self.id }
/// #     fn set_id(&mut self, id: i64) { self.id = id }
/// #     fn left(&self) -> i64 { self.lft }
/// #     fn set_left(&mut self, v: i64) { self.lft = v }
/// #     fn right(&self) -> i64 { self.rgt }
/// #     fn set_right(&mut self, v: i64) { self.rgt = v }
/// #     fn level(&self) -> i64 { self.level }
/// #     fn set_level(&mut self, v: i64) { self.level = v }
/// #     fn root(&self) -> i64 { 0 }
/// #     fn set_root(&mut self, _: i64) {}
/// # }
/// # impl NestedSet for Category {
/// #     fn configuration() -> Configuration { Configuration::new("category") }
/// # }
/// let mut manager = NestedSetManager::new(InMemory::<Category>::new())?;
/// let root = manager.create_root(Category::default())?;
/// let child = manager.node_mut(root)?.add_child(Category::default())?;
///
/// assert_eq!(manager.node(root)?.right(), 4);
/// assert_eq!(manager.node(child)?.left(), 2);
/// # Ok::<(), nestedset::Error>(())
/// ```
pub struct NestedSetManager<T: NestedSet, B: Backend<T>> {
    pub(crate) backend: B,
    config: Configuration,
    pub(crate) registry: Registry<T>,
}

impl<T: NestedSet, B: Backend<T>> NestedSetManager<T, B> {
    /// Creates a manager using the configuration declared by `T`.
    pub fn new(backend: B) -> Result<Self> {
        Self::with_configuration(backend, T::configuration())
    }

    /// Creates a manager with an explicit configuration, overriding the one
    /// declared by `T`.
    pub fn with_configuration(backend: B, config: Configuration) -> Result<Self> {
        config.validate()?;
        debug!(entity = config.entity_name(), many_roots = config.has_many_roots(), "Created nested set manager");
        Ok(Self {
            backend,
            config,
            registry: Registry::default(),
        })
    }

    pub fn configuration(&self) -> &Configuration {
        &self.config
    }

    /// Read access to the store. Writing to it directly would leave cached
    /// views out of sync, so no mutable accessor is offered.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Consumes the manager and returns the store, dropping all views.
    pub fn into_backend(self) -> B {
        self.backend
    }

    /// Registry scope of tree `root`: the tree itself for multi-root types,
    /// everything otherwise.
    pub(crate) fn scope(&self, root: i64) -> Option<i64> {
        self.config.has_many_roots().then_some(root)
    }

    /// Whether two positions belong to the same tree.
    pub(crate) fn same_tree(&self, a: &Position, b: &Position) -> bool {
        !self.config.has_many_roots() || a.root == b.root
    }

    /// Returns the canonical view of `record`.
    ///
    /// An already registered view is kept as is, so every caller observes the
    /// same state. Fails with [`NodeError::NotANode`] if the record has no
    /// position in a tree.
    pub fn get_node(&mut self, record: T) -> Result<NodeKey> {
        let key = NodeKey::of::<T>(record.id());
        if self.registry.contains(&key) {
            return Ok(key);
        }
        if record.right() <= record.left() {
            return Err(NodeError::NotANode {
                id: record.id(),
                left: record.left(),
                right: record.right(),
            }
            .into());
        }
        self.registry.insert(key, Node::new(record));
        Ok(key)
    }

    /// Registers a freshly written record, replacing any previous view of it.
    pub(crate) fn adopt(&mut self, record: T) -> NodeKey {
        let key = NodeKey::of::<T>(record.id());
        self.registry.insert(key, Node::new(record));
        key
    }

    pub(crate) fn wrap_all(&mut self, records: Vec<T>) -> Result<Vec<NodeKey>> {
        records.into_iter().map(|record| self.get_node(record)).collect()
    }

    /// The view behind `key`.
    pub fn node(&self, key: NodeKey) -> Result<&Node<T>> {
        self.registry
            .get(&key)
            .ok_or_else(|| NodeError::UnknownNode { id: key.id() }.into())
    }

    pub(crate) fn node_entry(&mut self, key: NodeKey) -> Result<&mut Node<T>> {
        self.registry
            .get_mut(&key)
            .ok_or_else(|| NodeError::UnknownNode { id: key.id() }.into())
    }

    /// Writes the view behind `key` back to the store.
    pub(crate) fn persist_node(&mut self, key: NodeKey) -> Result<()> {
        let node = self
            .registry
            .get_mut(&key)
            .ok_or(NodeError::UnknownNode { id: key.id() })?;
        self.backend.persist(node.record_mut())
    }

    pub(crate) fn position(&self, key: NodeKey) -> Result<Position> {
        self.node(key).map(Node::position)
    }

    /// A handle for navigating and mutating the view behind `key`.
    pub fn node_mut(&mut self, key: NodeKey) -> Result<NodeMut<'_, T, B>> {
        if !self.registry.contains(&key) {
            return Err(NodeError::UnknownNode { id: key.id() }.into());
        }
        Ok(NodeMut::new(self, key))
    }

    /// Snapshot of every managed view, ordered by root and left bound.
    pub fn managed_nodes(&self) -> Vec<&Node<T>> {
        let mut nodes: Vec<&Node<T>> = self.registry.iter().map(|(_, node)| node).collect();
        nodes.sort_by_key(|node| (node.root(), node.left()));
        nodes
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.len() == 0
    }

    pub fn contains(&self, key: NodeKey) -> bool {
        self.registry.contains(&key)
    }

    /// Turns an unpositioned record into the root of a tree and persists it.
    ///
    /// Multi-root types always start a new tree at `(1, 2)` in the tree named
    /// by the record's root field. Single-tree types append the root after the
    /// current maximum right bound.
    pub fn create_root(&mut self, mut record: T) -> Result<NodeKey> {
        if record.left() < record.right() {
            return Err(NodeError::AlreadyPositioned {
                id: record.id(),
                left: record.left(),
                right: record.right(),
            }
            .into());
        }

        let maximum_right = if self.config.has_many_roots() {
            0
        } else {
            self.backend.max(Field::Right, None)?.unwrap_or(0)
        };
        record.set_left(maximum_right + 1);
        record.set_right(maximum_right + 2);
        record.set_level(0);
        self.backend.persist(&mut record)?;

        debug!(id = record.id(), left = record.left(), root = record.root(), "Created root");
        Ok(self.adopt(record))
    }

    /// All nodes of tree `root` ordered by left bound, wrapped through the
    /// registry. `root` is ignored for single-tree types.
    pub fn list_nodes(&mut self, root: i64) -> Result<Vec<NodeKey>> {
        let query = Query::new(Filter::new().ge(Field::Left, 1).in_root(self.scope(root)))
            .order_by(Field::Left, Direction::Ascending);
        let records = self.backend.scan(&query)?;
        self.wrap_all(records)
    }

    /// Like [`list_nodes`](Self::list_nodes), and links every returned view so
    /// that navigating among them issues no further queries.
    pub fn fetch_tree_as_list(&mut self, root: i64) -> Result<Vec<NodeKey>> {
        let keys = self.list_nodes(root)?;
        if keys.is_empty() {
            warn!(root, entity = self.config.entity_name(), "Fetched an empty tree");
            return Ok(keys);
        }
        self.build_tree(&keys, None)?;
        Ok(keys)
    }

    /// The first node of the fetched tree, normally its root.
    pub fn fetch_tree(&mut self, root: i64) -> Result<Option<NodeKey>> {
        Ok(self.fetch_tree_as_list(root)?.first().copied())
    }

    /// Loads the record with `id` from the store and returns its view.
    pub fn find(&mut self, id: i64) -> Result<NodeKey> {
        let query = Query::new(Filter::new().eq(Field::Id, id)).limit(1);
        let record = self
            .backend
            .scan(&query)?
            .into_iter()
            .next()
            .ok_or(BackendError::RecordNotFound { id })?;
        self.get_node(record)
    }

    /// Reloads the record behind `key` from the store, dropping its caches.
    pub fn refresh(&mut self, key: NodeKey) -> Result<()> {
        let query = Query::new(Filter::new().eq(Field::Id, key.id())).limit(1);
        let record = self
            .backend
            .scan(&query)?
            .into_iter()
            .next()
            .ok_or(BackendError::RecordNotFound { id: key.id() })?;
        if record.right() <= record.left() {
            return Err(NodeError::NotANode {
                id: record.id(),
                left: record.left(),
                right: record.right(),
            }
            .into());
        }
        let node = self.node_entry(key)?;
        *node.record_mut() = record;
        node.invalidate();
        Ok(())
    }

    /// Drops one view from the registry and returns its record.
    ///
    /// Every other cache is invalidated as well, since cached relations may
    /// name the evicted handle.
    pub fn evict(&mut self, key: NodeKey) -> Option<T> {
        let node = self.registry.remove(&key)?;
        self.registry.invalidate_all();
        Some(node.into_record())
    }

    /// Drops every view without touching the store.
    pub fn clear(&mut self) {
        debug!(dropped = self.registry.len(), "Cleared registry");
        self.registry.clear();
    }

    /// Runs `f` and afterwards evicts every view registered while it ran.
    ///
    /// Views that existed before are kept, with their caches invalidated.
    pub fn scoped<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let before: std::collections::HashSet<NodeKey> = self.registry.keys().copied().collect();
        let result = f(self);
        let created: Vec<NodeKey> = self
            .registry
            .keys()
            .filter(|key| !before.contains(key))
            .copied()
            .collect();
        for key in &created {
            self.registry.remove(key);
        }
        self.registry.invalidate_all();
        debug!(evicted = created.len(), "Closed registry scope");
        result
    }
}

impl<T: NestedSet, B: Backend<T>> std::fmt::Debug for NestedSetManager<T, B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NestedSetManager")
            .field("config", &self.config)
            .field("managed", &self.registry.len())
            .finish()
    }
}
