//! The parallel, multi-source dependency graph walker (spec §4.3, C6).
//!
//! Call [`create_graph_node`] from a non-async thread (a `rayon` worker or
//! inside `tokio::task::spawn_blocking`) since it calls
//! [`tokio::runtime::Handle::block_on`] internally to reach remote
//! providers.

#![warn(clippy::all)]

pub mod context;
pub mod error;
pub mod types;
pub mod walker;

pub use context::{Group, WalkContext, WarningSink};
pub use error::{ResolverError, Result};
pub use types::{GraphItem, GraphNode};
pub use walker::create_graph_node;
