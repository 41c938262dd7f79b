//! Repository structure: modules, entry points, routes and config files

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::core::loader::RepoEntry;
use crate::core::parser::{extract_routes, Route};

const MODULE_DIRS: [&str; 3] = ["components/", "modules/", "features/"];
const ENTRY_POINT_MARKERS: [&str; 4] = ["index.", "main.", "app.", "server."];
const ROUTE_DIRS: [&str; 3] = ["routes/", "api/", "pages/"];
const CONFIG_SUFFIXES: [&str; 6] = [".config.js", ".config.ts", ".json", ".yml", ".yaml", ".toml"];

const MODULE_KINDS: [(&str, ModuleKind); 5] = [
    ("component", ModuleKind::Component),
    ("service", ModuleKind::Service),
    ("controller", ModuleKind::Controller),
    ("model", ModuleKind::Model),
    ("util", ModuleKind::Utility),
];

const CONFIG_KINDS: [(&str, ConfigKind); 5] = [
    ("webpack", ConfigKind::Webpack),
    ("babel", ConfigKind::Babel),
    ("eslint", ConfigKind::Eslint),
    ("tsconfig", ConfigKind::Typescript),
    ("package.json", ConfigKind::Npm),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleKind {
    Component,
    Service,
    Controller,
    Model,
    Utility,
    Module,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigKind {
    Webpack,
    Babel,
    Eslint,
    Typescript,
    Npm,
    Config,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleInfo {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: ModuleKind,
    pub dependencies: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigInfo {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: ConfigKind,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectStructure {
    pub tree: Vec<RepoEntry>,
    /// Keyed by file stem; a later file with the same stem replaces an earlier one
    pub modules: BTreeMap<String, ModuleInfo>,
    pub entry_points: Vec<String>,
    pub routes: Vec<Route>,
    pub configs: BTreeMap<String, ConfigInfo>,
}

impl ProjectStructure {
    pub fn file_count(&self) -> usize {
        self.tree.iter().filter(|e| e.is_file()).count()
    }
}

pub fn detect_module_kind(path: &str) -> ModuleKind {
    MODULE_KINDS
        .iter()
        .find(|(marker, _)| path.contains(marker))
        .map(|(_, kind)| *kind)
        .unwrap_or(ModuleKind::Module)
}

pub fn detect_config_kind(path: &str) -> ConfigKind {
    CONFIG_KINDS
        .iter()
        .find(|(marker, _)| path.contains(marker))
        .map(|(_, kind)| *kind)
        .unwrap_or(ConfigKind::Config)
}

fn is_config_path(path: &str) -> bool {
    path.contains("config") || CONFIG_SUFFIXES.iter().any(|s| path.ends_with(s))
}

/// File name without its last extension
fn file_stem(path: &str) -> &str {
    let name = path.rsplit('/').next().unwrap_or(path);
    match name.rfind('.') {
        Some(dot) if dot > 0 => &name[..dot],
        _ => name,
    }
}

/// Classify every file entry of the listing. Route text comes from `files`;
/// route sources that were not loaded contribute nothing.
pub fn analyze_structure(
    listing: &[RepoEntry],
    files: &BTreeMap<String, String>,
) -> ProjectStructure {
    let mut structure = ProjectStructure {
        tree: listing.to_vec(),
        ..ProjectStructure::default()
    };

    for entry in listing.iter().filter(|e| e.is_file()) {
        let path = entry.path.as_str();

        if MODULE_DIRS.iter().any(|d| path.contains(d)) {
            structure.modules.insert(
                file_stem(path).to_string(),
                ModuleInfo {
                    path: path.to_string(),
                    kind: detect_module_kind(path),
                    dependencies: Vec::new(),
                },
            );
        }

        if ENTRY_POINT_MARKERS.iter().any(|m| path.contains(m)) {
            structure.entry_points.push(path.to_string());
        }

        if ROUTE_DIRS.iter().any(|d| path.contains(d)) {
            match files.get(path) {
                Some(content) => structure.routes.extend(extract_routes(content)),
                None => debug!("Route source {} not loaded", path),
            }
        }

        if is_config_path(path) {
            structure.configs.insert(
                path.to_string(),
                ConfigInfo {
                    path: path.to_string(),
                    kind: detect_config_kind(path),
                },
            );
        }
    }

    structure
}
