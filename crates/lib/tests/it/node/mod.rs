//! Node view integration tests
//!
//! Tests are organized by concern: creating roots and children, read-side
//! navigation, structural mutation inside one tree, and multi-root behaviour.

mod creation;
