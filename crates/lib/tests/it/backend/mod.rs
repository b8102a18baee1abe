//! Backend integration tests
//!
//! Covers the in-memory store contract, its JSON persistence, and how store
//! failures surface through structural operations.

mod failures;
mod in_memory;
mod save_load;
