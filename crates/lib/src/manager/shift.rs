//! Range shifts applied to the store and the registry in lockstep.
//!
//! Every structural mutation is a sequence of these primitives. Each one
//! updates the store first and then applies the identical change to the
//! cached views, so that a view always matches what a fresh scan returns.

use tracing::trace;

use crate::Result;
use crate::backend::{Backend, Filter, Update};
use crate::config::Field;
use crate::manager::NestedSetManager;
use crate::record::NestedSet;

impl<T: NestedSet, B: Backend<T>> NestedSetManager<T, B> {
    /// Adds `delta` to every left bound in `[first, last]` and to every right
    /// bound in `[first, last]` of tree `root`. `last = None` is unbounded.
    pub(crate) fn shift_range(
        &mut self,
        first: i64,
        last: Option<i64>,
        delta: i64,
        root: i64,
    ) -> Result<()> {
        if delta == 0 {
            return Ok(());
        }
        let scope = self.scope(root);
        for field in [Field::Left, Field::Right] {
            let update = Update::new(Filter::new().range(field, first, last).in_root(scope))
                .add(field, delta);
            let changed = self.backend.update(&update)?;
            trace!(
                %field,
                filter = %update.filter.describe(self.configuration()),
                delta,
                changed,
                "Shifted bounds"
            );
        }
        self.registry.update_left_values(first, last, delta, scope);
        self.registry.update_right_values(first, last, delta, scope);
        Ok(())
    }

    /// Adds `delta` to the level of every node strictly inside
    /// `(left, right)` of tree `root`.
    pub(crate) fn shift_levels(&mut self, left: i64, right: i64, delta: i64, root: i64) -> Result<()> {
        if delta == 0 {
            return Ok(());
        }
        let scope = self.scope(root);
        let update = Update::new(
            Filter::new()
                .gt(Field::Left, left)
                .lt(Field::Right, right)
                .in_root(scope),
        )
        .add(Field::Level, delta);
        let changed = self.backend.update(&update)?;
        trace!(left, right, delta, ?scope, changed, "Shifted levels");
        self.registry.update_levels(left, right, delta, scope);
        Ok(())
    }

    /// Moves every descendant strictly inside `(left, right)` of tree `from`
    /// into tree `to` in one bulk update, shifting bounds by `diff` and levels
    /// by `level_diff`.
    pub(crate) fn relocate_descendants(
        &mut self,
        left: i64,
        right: i64,
        from: i64,
        to: i64,
        diff: i64,
        level_diff: i64,
    ) -> Result<()> {
        let update = Update::new(
            Filter::new()
                .gt(Field::Left, left)
                .lt(Field::Right, right)
                .in_root(Some(from)),
        )
        .add(Field::Left, diff)
        .add(Field::Right, diff)
        .add(Field::Level, level_diff)
        .set(Field::Root, to);
        let changed = self.backend.update(&update)?;
        trace!(left, right, from, to, diff, level_diff, changed, "Relocated descendants");
        self.registry.relocate(left, right, from, to, diff, level_diff);
        Ok(())
    }
}
