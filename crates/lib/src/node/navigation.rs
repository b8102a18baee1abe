//! Read-side navigation of a node view.
//!
//! Each relation is served from the view's cache when present and sufficient.
//! Otherwise a range query is issued against the store, ordered by left bound
//! and scoped to the node's tree, and every returned record is resolved
//! through the registry so that identity is preserved.

use std::fmt;

use crate::Result;
use crate::backend::{Backend, Direction, Filter, Query};
use crate::config::Field;
use crate::node::{NodeMut, Position};
use crate::record::{NestedSet, NodeKey};

impl<T: NestedSet, B: Backend<T>> NodeMut<'_, T, B> {
    fn scoped(&self, pos: &Position, filter: Filter) -> Filter {
        filter.in_root(self.manager.scope(pos.root))
    }

    fn descendant_filter(&self, pos: &Position) -> Filter {
        self.scoped(
            pos,
            Filter::new()
                .gt(Field::Left, pos.left)
                .lt(Field::Right, pos.right),
        )
    }

    fn ancestor_filter(&self, pos: &Position) -> Filter {
        self.scoped(
            pos,
            Filter::new()
                .lt(Field::Left, pos.left)
                .gt(Field::Right, pos.right),
        )
    }

    fn fetch(&mut self, query: Query) -> Result<Vec<NodeKey>> {
        let records = self.manager.backend.scan(&query)?;
        self.manager.wrap_all(records)
    }

    fn levels_of(&self, keys: &[NodeKey]) -> Result<Vec<(NodeKey, i64)>> {
        keys.iter()
            .map(|key| -> Result<(NodeKey, i64)> { Ok((*key, self.manager.node(*key)?.level())) })
            .collect()
    }

    /// Direct children ordered by left bound.
    pub fn children(&mut self) -> Result<Vec<NodeKey>> {
        let view = self.view()?;
        if let Some(children) = &view.cache.children {
            return Ok(children.clone());
        }
        let pos = view.position();
        if !view.has_children() {
            self.manager.node_entry(self.key)?.cache.children = Some(Vec::new());
            return Ok(Vec::new());
        }

        let children = if view.cache.covers_depth(Some(1)) {
            let cached = view.cache.descendants.clone().unwrap_or_default();
            self.levels_of(&cached)?
                .into_iter()
                .filter(|(_, level)| *level == pos.level + 1)
                .map(|(key, _)| key)
                .collect()
        } else {
            let filter = self.descendant_filter(&pos).eq(Field::Level, pos.level + 1);
            self.fetch(Query::new(filter).order_by(Field::Left, Direction::Ascending))?
        };

        self.manager.node_entry(self.key)?.cache.children = Some(children.clone());
        Ok(children)
    }

    /// Every descendant ordered by left bound.
    pub fn descendants(&mut self) -> Result<Vec<NodeKey>> {
        self.descendants_to_depth(None)
    }

    /// Descendants at most `depth` levels below this node; `None` is unbounded.
    ///
    /// A cached list reaching at least `depth` answers the request; otherwise
    /// the list is fetched again and replaces the cached one.
    pub fn descendants_to_depth(&mut self, depth: Option<u32>) -> Result<Vec<NodeKey>> {
        let view = self.view()?;
        let pos = view.position();
        if view.is_leaf() {
            return Ok(Vec::new());
        }

        if view.cache.covers_depth(depth) {
            let cached = view.cache.descendants.clone().unwrap_or_default();
            let Some(depth) = depth else {
                return Ok(cached);
            };
            let deepest = pos.level + i64::from(depth);
            return Ok(self
                .levels_of(&cached)?
                .into_iter()
                .filter(|(_, level)| *level <= deepest)
                .map(|(key, _)| key)
                .collect());
        }

        let mut filter = self.descendant_filter(&pos);
        if let Some(depth) = depth {
            filter = filter.le(Field::Level, pos.level + i64::from(depth));
        }
        let descendants =
            self.fetch(Query::new(filter).order_by(Field::Left, Direction::Ascending))?;

        let cache = &mut self.manager.node_entry(self.key)?.cache;
        cache.descendants = Some(descendants.clone());
        cache.descendant_depth = depth;
        Ok(descendants)
    }

    /// Ancestors from the tree root down to the parent.
    pub fn ancestors(&mut self) -> Result<Vec<NodeKey>> {
        let view = self.view()?;
        if let Some(ancestors) = &view.cache.ancestors {
            return Ok(ancestors.clone());
        }
        let pos = view.position();
        let filter = self.ancestor_filter(&pos);
        let ancestors = self.fetch(Query::new(filter).order_by(Field::Left, Direction::Ascending))?;

        self.manager.node_entry(self.key)?.cache.ancestors = Some(ancestors.clone());
        Ok(ancestors)
    }

    /// The closest ancestor, or `None` for a root.
    pub fn parent(&mut self) -> Result<Option<NodeKey>> {
        let view = self.view()?;
        if view.is_root() {
            return Ok(None);
        }
        if let Some(parent) = view.cache.parent {
            return Ok(Some(parent));
        }
        if let Some(ancestors) = &view.cache.ancestors {
            return Ok(ancestors.last().copied());
        }

        // The innermost enclosing interval has the smallest right bound.
        let pos = view.position();
        let filter = self.ancestor_filter(&pos);
        let query = Query::new(filter)
            .order_by(Field::Right, Direction::Ascending)
            .limit(1);
        let parent = self.fetch(query)?.into_iter().next();

        self.manager.node_entry(self.key)?.cache.parent = parent;
        Ok(parent)
    }

    pub fn first_child(&mut self) -> Result<Option<NodeKey>> {
        self.edge_child(true)
    }

    pub fn last_child(&mut self) -> Result<Option<NodeKey>> {
        self.edge_child(false)
    }

    fn edge_child(&mut self, first: bool) -> Result<Option<NodeKey>> {
        let view = self.view()?;
        if !view.has_children() {
            return Ok(None);
        }
        if let Some(children) = &view.cache.children {
            return Ok(if first { children.first() } else { children.last() }.copied());
        }

        let pos = view.position();
        let point = if first {
            Filter::new().eq(Field::Left, pos.left + 1)
        } else {
            Filter::new().eq(Field::Right, pos.right - 1)
        };
        let query = Query::new(self.scoped(&pos, point)).limit(1);
        Ok(self.fetch(query)?.into_iter().next())
    }

    pub fn number_of_children(&mut self) -> Result<usize> {
        Ok(self.children()?.len())
    }

    /// Renders the ancestors of this node joined by `separator`.
    pub fn path(&mut self, separator: &str) -> Result<String>
    where
        T: fmt::Display,
    {
        let ancestors = self.ancestors()?;
        let names = ancestors
            .iter()
            .map(|key| -> Result<String> { Ok(self.manager.node(*key)?.record().to_string()) })
            .collect::<Result<Vec<String>>>()?;
        Ok(names.join(separator))
    }
}
