//! The assembled, serializable context handed to a prompt builder

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::compress::CompressionStep;
use super::intent::Intent;
use super::memory::MemoryBlock;
use crate::analysis::patterns::ArchitecturalPattern;
use crate::analysis::project::ProjectMetadata;
use crate::analysis::quality::{CodeSmell, QualityMetrics};
use crate::analysis::structure::ProjectStructure;
use crate::core::parser::Route;
use crate::index::{ClassRecord, FunctionRecord};

const STRUCTURE_MODULE_LIMIT: usize = 10;
const STRUCTURE_ROUTE_LIMIT: usize = 20;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub name: Option<String>,
    pub language: Option<String>,
    pub framework: Option<String>,
    pub description: Option<String>,
}

impl From<&ProjectMetadata> for ProjectSummary {
    fn from(metadata: &ProjectMetadata) -> Self {
        Self {
            name: metadata.name.clone(),
            language: metadata.language.clone(),
            framework: metadata.framework.clone(),
            description: metadata.description.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedFile {
    pub path: String,
    pub content: String,
    pub relevance: u64,
    pub summarized: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedFunction {
    pub name: String,
    pub path: String,
    pub params: Vec<String>,
    pub body: String,
    pub complexity: u32,
    pub calls: Vec<String>,
    pub summarized: bool,
}

impl From<&FunctionRecord> for SelectedFunction {
    fn from(record: &FunctionRecord) -> Self {
        Self {
            name: record.name.clone(),
            path: record.path.clone(),
            params: record.params.clone(),
            body: record.body.clone(),
            complexity: record.complexity,
            calls: record.calls.clone(),
            summarized: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedClass {
    pub name: String,
    pub path: String,
    pub methods: Vec<String>,
    pub properties: Vec<String>,
    pub extends: Option<String>,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl From<&ClassRecord> for SelectedClass {
    fn from(record: &ClassRecord) -> Self {
        Self {
            name: record.name.clone(),
            path: record.path.clone(),
            methods: record.methods.clone(),
            properties: record.properties.clone(),
            extends: record.extends.clone(),
            body: record.body.clone(),
            summary: None,
        }
    }
}

/// Graph facts for a selected file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyExcerpt {
    pub imports: Vec<String>,
    pub exports: Vec<String>,
    pub complexity: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureSummary {
    pub entry_points: Vec<String>,
    pub main_modules: Vec<String>,
    pub routes: Vec<Route>,
    pub total_files: usize,
}

impl StructureSummary {
    pub fn new(structure: &ProjectStructure, total_files: usize) -> Self {
        Self {
            entry_points: structure.entry_points.clone(),
            main_modules: structure
                .modules
                .keys()
                .take(STRUCTURE_MODULE_LIMIT)
                .cloned()
                .collect(),
            routes: structure
                .routes
                .iter()
                .take(STRUCTURE_ROUTE_LIMIT)
                .cloned()
                .collect(),
            total_files,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplexityHotspot {
    pub location: String,
    pub complexity: u32,
}

/// Intent-specific analysis; every field is absent for intents that need none
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisBlock {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<QualityMetrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_smells: Option<Vec<CodeSmell>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patterns: Option<Vec<ArchitecturalPattern>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complexity: Option<Vec<ComplexityHotspot>>,
}

impl AnalysisBlock {
    pub fn is_empty(&self) -> bool {
        self.quality.is_none()
            && self.code_smells.is_none()
            && self.patterns.is_none()
            && self.complexity.is_none()
    }
}

/// A long line repeated across files, replaced after its first occurrence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbstractedPattern {
    pub id: usize,
    pub text: String,
    pub occurrences: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Context {
    pub project: ProjectSummary,
    pub intent: Intent,
    pub relevant_files: Vec<SelectedFile>,
    pub relevant_functions: Vec<SelectedFunction>,
    pub relevant_classes: Vec<SelectedClass>,
    pub dependencies: BTreeMap<String, DependencyExcerpt>,
    pub patterns: Vec<ArchitecturalPattern>,
    pub structure: StructureSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<AnalysisBlock>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<MemoryBlock>,
    pub focus: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub abstracted_patterns: Vec<AbstractedPattern>,
    pub estimated_tokens: usize,
    #[serde(default)]
    pub compression_steps: Vec<CompressionStep>,
    #[serde(default)]
    pub over_budget: bool,
}
