//! File-level dependency graph over script sources
//!
//! Import targets are kept exactly as written. A dependent edge is only
//! recorded when an import string is itself a node key, so `./b` never
//! resolves to `b.js`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::complexity::calculate_complexity;
use crate::core::parser::extract_module_facts;

const SCRIPT_EXTENSIONS: [&str; 4] = [".js", ".ts", ".jsx", ".tsx"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyNode {
    pub imports: Vec<String>,
    pub exports: Vec<String>,
    pub dependents: Vec<String>,
    pub complexity: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DependencyGraph {
    pub nodes: BTreeMap<String, DependencyNode>,
}

pub fn is_script_path(path: &str) -> bool {
    SCRIPT_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

impl DependencyGraph {
    pub fn build(files: &BTreeMap<String, String>) -> Self {
        let mut nodes: BTreeMap<String, DependencyNode> = files
            .iter()
            .filter(|(path, _)| is_script_path(path))
            .map(|(path, content)| {
                let facts = extract_module_facts(content);
                let node = DependencyNode {
                    imports: facts.imports,
                    exports: facts.exports,
                    dependents: Vec::new(),
                    complexity: calculate_complexity(content),
                };
                (path.clone(), node)
            })
            .collect();

        let edges: Vec<(String, String)> = nodes
            .iter()
            .flat_map(|(path, node)| {
                node.imports
                    .iter()
                    .map(move |target| (target.clone(), path.clone()))
            })
            .collect();

        for (target, dependent) in edges {
            if let Some(node) = nodes.get_mut(&target) {
                node.dependents.push(dependent);
            }
        }

        Self { nodes }
    }

    pub fn get(&self, path: &str) -> Option<&DependencyNode> {
        self.nodes.get(path)
    }

    pub fn complexity_of(&self, path: &str) -> u32 {
        self.nodes.get(path).map_or(0, |n| n.complexity)
    }

    pub fn dependents_count(&self, path: &str) -> usize {
        self.nodes.get(path).map_or(0, |n| n.dependents.len())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
