//! Architectural pattern detection from structure and metadata

use serde::{Deserialize, Serialize};

use super::project::ProjectMetadata;
use super::structure::{ModuleKind, ProjectStructure};

const MVC_MODULE_NAMES: [&str; 3] = ["controller", "model", "view"];
const MICROSERVICE_THRESHOLD: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchitecturalPattern {
    #[serde(rename = "type")]
    pub name: String,
    pub confidence: f64,
    pub evidence: Vec<String>,
}

impl ArchitecturalPattern {
    fn new(name: &str, confidence: f64, evidence: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            confidence,
            evidence: vec![evidence.into()],
        }
    }
}

pub fn detect_patterns(
    metadata: &ProjectMetadata,
    structure: &ProjectStructure,
) -> Vec<ArchitecturalPattern> {
    let mut patterns = Vec::new();

    if MVC_MODULE_NAMES
        .iter()
        .any(|name| structure.modules.contains_key(*name))
    {
        patterns.push(ArchitecturalPattern::new(
            "MVC",
            0.8,
            "Folder structure suggests MVC pattern",
        ));
    }

    let services = structure
        .modules
        .values()
        .filter(|m| m.kind == ModuleKind::Service)
        .count();
    if services > MICROSERVICE_THRESHOLD {
        patterns.push(ArchitecturalPattern::new(
            "Microservices",
            0.7,
            format!("{services} service modules detected"),
        ));
    }

    if let Some(framework @ ("React" | "Vue")) = metadata.framework.as_deref() {
        patterns.push(ArchitecturalPattern::new(
            "Component-Based",
            0.9,
            format!("{framework} framework"),
        ));
    }

    if structure
        .routes
        .iter()
        .any(|r| r.method == "GET" || r.method == "POST")
    {
        patterns.push(ArchitecturalPattern::new(
            "RESTful API",
            0.85,
            "HTTP methods in routes",
        ));
    }

    patterns
}
