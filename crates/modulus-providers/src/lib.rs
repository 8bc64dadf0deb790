//! The six provider kinds the graph walker queries for candidates (spec
//! §4.2, C5): project-source, local package store, framework-reference,
//! GAC, remote feed, and the unresolved sentinel.

#![warn(clippy::all)]

pub mod candidate;
pub mod error;
pub mod framework;
pub mod gac;
pub mod local;
pub mod metadata;
pub mod project;
pub mod provider;
pub mod remote;
pub mod unresolved;

pub use candidate::{Candidate, ProviderKind, ProviderToken};
pub use error::{ProviderError, Result};
pub use framework::FrameworkReferenceProvider;
pub use gac::GacProvider;
pub use local::LocalStoreProvider;
pub use project::ProjectProvider;
pub use provider::{get_dependencies, Provider};
pub use remote::RemoteFeedProvider;
pub use unresolved::sentinel_for;
