//! nexus-context library crate
//!
//! Ranks and budgets repository content into a size-bounded context for a
//! downstream prompt builder. The `nexus-ctx` binary is a thin shell over
//! [`context::ContextManager`].

pub mod analysis;
pub mod config;
pub mod context;
pub mod core;
pub mod error;
pub mod index;

pub use context::{ContextManager, ContextOptions, ProjectContext};
pub use error::{LoadError, ManifestError};
