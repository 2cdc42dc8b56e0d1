//! Configuration for Strata.
//!
//! This module provides configuration structures for the schema loader and
//! the traversal layer.

mod loader;

pub use loader::LoaderConfig;
