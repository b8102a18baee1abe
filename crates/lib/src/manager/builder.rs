//! Single-pass linking of a left-ordered node list.
//!
//! A scan ordered by left bound visits every node right after its parent, so
//! a stack of open parents is enough to recover parent, children, ancestors
//! and descendants of every listed view without further queries.

use tracing::{debug, warn};

use crate::Result;
use crate::backend::Backend;
use crate::manager::NestedSetManager;
use crate::node::NodeCache;
use crate::record::{NestedSet, NodeKey};

struct Open {
    key: NodeKey,
    level: i64,
}

impl<T: NestedSet, B: Backend<T>> NestedSetManager<T, B> {
    /// Fills the caches of every view in `keys`, which must cover whole
    /// subtrees and be ordered by left bound.
    ///
    /// Nodes deeper than `max_level` are skipped, and nodes at `max_level`
    /// keep no children cache since theirs were not collected.
    pub(crate) fn build_tree(&mut self, keys: &[NodeKey], max_level: Option<i64>) -> Result<()> {
        let mut stack: Vec<Open> = Vec::new();
        let mut linked = 0usize;

        for &key in keys {
            let node = self.node(key)?;
            let (level, is_root, is_leaf) = (node.level(), node.is_root(), node.is_leaf());

            if let Some(max) = max_level
                && level > max
            {
                warn!(%key, level, max_level = max, "Skipped node beyond the maximum level");
                continue;
            }

            while stack.last().is_some_and(|top| top.level >= level) {
                stack.pop();
            }

            let mut cache = NodeCache::default();
            match stack.last() {
                Some(parent) => {
                    cache.parent = Some(parent.key);
                    if let Some(base) = stack.first()
                        && self.node(base.key)?.is_root()
                    {
                        cache.ancestors = Some(stack.iter().map(|open| open.key).collect());
                    }
                    self.node_entry(parent.key)?
                        .cache
                        .children
                        .get_or_insert_with(Vec::new)
                        .push(key);
                    for open in &stack {
                        self.node_entry(open.key)?
                            .cache
                            .descendants
                            .get_or_insert_with(Vec::new)
                            .push(key);
                    }
                }
                None if is_root => cache.ancestors = Some(Vec::new()),
                None => {}
            }

            let expands = max_level.is_none_or(|max| level < max);
            if is_leaf || expands {
                cache.children = Some(Vec::new());
                cache.descendants = Some(Vec::new());
                cache.descendant_depth = if is_leaf {
                    None
                } else {
                    max_level.map(|max| (max - level) as u32)
                };
            }
            self.node_entry(key)?.cache = cache;

            if !is_leaf && expands {
                stack.push(Open { key, level });
            }
            linked += 1;
        }

        debug!(linked, ?max_level, "Built tree");
        Ok(())
    }
}
