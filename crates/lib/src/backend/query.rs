//! Store-neutral descriptions of scans, bulk updates and deletes.
//!
//! The engine never talks to a store in terms of a query language. It builds
//! [`Filter`], [`Query`] and [`Update`] values over field *roles*, and each
//! backend translates them. [`Filter::describe`] renders a filter with the
//! concrete field names of a [`Configuration`] for log output.

use std::fmt;

use crate::config::{Configuration, Field};
use crate::record::NodeInfo;

/// A single comparison of a record field against a constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    Eq(Field, i64),
    Gt(Field, i64),
    Ge(Field, i64),
    Lt(Field, i64),
    Le(Field, i64),
}

impl Condition {
    /// The field this condition tests.
    pub fn field(&self) -> Field {
        match *self {
            Condition::Eq(field, _)
            | Condition::Gt(field, _)
            | Condition::Ge(field, _)
            | Condition::Lt(field, _)
            | Condition::Le(field, _) => field,
        }
    }

    /// Evaluates the condition against a record.
    pub fn matches<T: NodeInfo + ?Sized>(&self, record: &T) -> bool {
        let value = record.value_of(self.field());
        match *self {
            Condition::Eq(_, v) => value == v,
            Condition::Gt(_, v) => value > v,
            Condition::Ge(_, v) => value >= v,
            Condition::Lt(_, v) => value < v,
            Condition::Le(_, v) => value <= v,
        }
    }

    fn operator(&self) -> (&'static str, i64) {
        match *self {
            Condition::Eq(_, v) => ("=", v),
            Condition::Gt(_, v) => (">", v),
            Condition::Ge(_, v) => (">=", v),
            Condition::Lt(_, v) => ("<", v),
            Condition::Le(_, v) => ("<=", v),
        }
    }
}

/// Conjunction of conditions, optionally scoped to one tree.
///
/// An empty filter matches every record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    conditions: Vec<Condition>,
    root: Option<i64>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(self, field: Field, value: i64) -> Self {
        self.with(Condition::Eq(field, value))
    }

    pub fn gt(self, field: Field, value: i64) -> Self {
        self.with(Condition::Gt(field, value))
    }

    pub fn ge(self, field: Field, value: i64) -> Self {
        self.with(Condition::Ge(field, value))
    }

    pub fn lt(self, field: Field, value: i64) -> Self {
        self.with(Condition::Lt(field, value))
    }

    pub fn le(self, field: Field, value: i64) -> Self {
        self.with(Condition::Le(field, value))
    }

    /// Inclusive range `[first, last]`; `None` leaves the range unbounded above.
    pub fn range(self, field: Field, first: i64, last: Option<i64>) -> Self {
        let filter = self.ge(field, first);
        match last {
            Some(last) => filter.le(field, last),
            None => filter,
        }
    }

    /// Restricts the filter to the tree `root`. `None` leaves it unscoped,
    /// which is what single-tree types use.
    pub fn in_root(mut self, root: Option<i64>) -> Self {
        self.root = root;
        self
    }

    pub fn with(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn root(&self) -> Option<i64> {
        self.root
    }

    /// Evaluates every condition and the root scope against a record.
    pub fn matches<T: NodeInfo + ?Sized>(&self, record: &T) -> bool {
        if let Some(root) = self.root
            && record.root() != root
        {
            return false;
        }
        self.conditions.iter().all(|c| c.matches(record))
    }

    /// Renders the filter using the field names of `config`.
    pub fn describe<'a>(&'a self, config: &'a Configuration) -> Describe<'a> {
        Describe {
            filter: self,
            config,
        }
    }
}

/// Display adapter returned by [`Filter::describe`].
pub struct Describe<'a> {
    filter: &'a Filter,
    config: &'a Configuration,
}

impl fmt::Display for Describe<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = |field: Field| self.config.field_name(field).unwrap_or(field.role());
        let mut first = true;
        for condition in &self.filter.conditions {
            if !first {
                f.write_str(" AND ")?;
            }
            first = false;
            let (op, value) = condition.operator();
            write!(f, "{} {op} {value}", name(condition.field()))?;
        }
        if let Some(root) = self.filter.root {
            if !first {
                f.write_str(" AND ")?;
            }
            first = false;
            write!(f, "{} = {root}", name(Field::Root))?;
        }
        if first {
            f.write_str("TRUE")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// Ordered, optionally limited scan over the records matching a filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub filter: Filter,
    pub order: Option<(Field, Direction)>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn new(filter: Filter) -> Self {
        Self {
            filter,
            order: None,
            limit: None,
        }
    }

    pub fn order_by(mut self, field: Field, direction: Direction) -> Self {
        self.order = Some((field, direction));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// One assignment of a bulk update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assignment {
    /// `field = field + delta`
    Add(Field, i64),
    /// `field = value`
    Set(Field, i64),
}

/// Bulk update applied to every record matching `filter`.
///
/// The filter is evaluated against the values *before* any assignment, and all
/// assignments of one update apply to a record together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Update {
    pub filter: Filter,
    pub assignments: Vec<Assignment>,
}

impl Update {
    pub fn new(filter: Filter) -> Self {
        Self {
            filter,
            assignments: Vec::new(),
        }
    }

    pub fn add(mut self, field: Field, delta: i64) -> Self {
        self.assignments.push(Assignment::Add(field, delta));
        self
    }

    pub fn set(mut self, field: Field, value: i64) -> Self {
        self.assignments.push(Assignment::Set(field, value));
        self
    }

    /// Applies the assignments to one record without evaluating the filter.
    pub fn apply<T: NodeInfo + ?Sized>(&self, record: &mut T) {
        for assignment in &self.assignments {
            match *assignment {
                Assignment::Add(field, delta) => {
                    let value = record.value_of(field);
                    record.set_value_of(field, value + delta);
                }
                Assignment::Set(field, value) => record.set_value_of(field, value),
            }
        }
    }
}
