//! Static analysis of a loaded repository
//!
//! Stages run in a fixed order: project metadata, structure, dependency
//! graph, architectural patterns, then (after content indexing) quality
//! metrics and security findings. The health report is derived on demand.

pub mod graph;
pub mod health;
pub mod patterns;
pub mod project;
pub mod quality;
pub mod structure;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Shared low/medium/high rating for impacts, severities and priorities
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        };
        f.write_str(label)
    }
}
