//! Project metadata: name, language, framework and dependencies

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

use crate::core::loader::RepoEntry;
use crate::error::ManifestError;

const NPM_FRAMEWORKS: [(&[&str], &str); 5] = [
    (&["react"], "React"),
    (&["vue"], "Vue"),
    (&["angular", "@angular/core"], "Angular"),
    (&["express"], "Express"),
    (&["next"], "Next.js"),
];

const CARGO_FRAMEWORKS: [(&[&str], &str); 3] = [
    (&["axum"], "Axum"),
    (&["actix-web"], "Actix Web"),
    (&["rocket"], "Rocket"),
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectMetadata {
    pub name: Option<String>,
    /// Most frequent file extension
    pub language: Option<String>,
    pub framework: Option<String>,
    pub dependencies: Vec<String>,
    pub version: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PackageJson {
    name: Option<String>,
    version: Option<String>,
    description: Option<String>,
    #[serde(default)]
    dependencies: BTreeMap<String, serde_json::Value>,
}

/// Facts read from a dependency manifest
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestFacts {
    pub name: Option<String>,
    pub version: Option<String>,
    pub description: Option<String>,
    pub dependencies: Vec<String>,
}

pub fn parse_package_json(text: &str) -> Result<ManifestFacts, ManifestError> {
    let pkg: PackageJson = serde_json::from_str(text)?;
    Ok(ManifestFacts {
        name: pkg.name,
        version: pkg.version,
        description: pkg.description,
        dependencies: pkg.dependencies.into_keys().collect(),
    })
}

pub fn parse_cargo_toml(text: &str) -> Result<ManifestFacts, ManifestError> {
    let value: toml::Value = toml::from_str(text)?;
    let package = value.get("package");
    let field = |key: &str| {
        package
            .and_then(|p| p.get(key))
            .and_then(|v| v.as_str())
            .map(str::to_string)
    };

    let dependencies = value
        .get("dependencies")
        .and_then(|d| d.as_table())
        .map(|table| table.keys().cloned().collect())
        .unwrap_or_default();

    Ok(ManifestFacts {
        name: field("name"),
        version: field("version"),
        description: field("description"),
        dependencies,
    })
}

/// First framework in the chain whose dependency is present
pub fn detect_framework(
    chain: &[(&[&str], &str)],
    dependencies: &[String],
) -> Option<String> {
    chain
        .iter()
        .find(|(names, _)| names.iter().any(|n| dependencies.iter().any(|d| d == n)))
        .map(|(_, framework)| framework.to_string())
}

/// Most frequent extension among file entries; ties go to the first seen
pub fn detect_language(listing: &[RepoEntry]) -> Option<String> {
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();

    for entry in listing.iter().filter(|e| e.is_file()) {
        let file_name = entry.path.rsplit('/').next().unwrap_or(&entry.path);
        let Some((_, ext)) = file_name.rsplit_once('.') else {
            continue;
        };
        if ext.is_empty() {
            continue;
        }
        let first_seen = counts.len();
        counts.entry(ext).or_insert((0, first_seen)).0 += 1;
    }

    counts
        .into_iter()
        .max_by(|(_, (count_a, seen_a)), (_, (count_b, seen_b))| {
            count_a.cmp(count_b).then(seen_b.cmp(seen_a))
        })
        .map(|(ext, _)| ext.to_string())
}

/// Build metadata from the listing and whatever manifest was loaded
pub fn analyze_project(listing: &[RepoEntry], files: &BTreeMap<String, String>) -> ProjectMetadata {
    let mut metadata = ProjectMetadata {
        language: detect_language(listing),
        ..ProjectMetadata::default()
    };

    let has_file = |name: &str| listing.iter().any(|e| e.is_file() && e.path == name);

    let manifest = if has_file("package.json") {
        files
            .get("package.json")
            .map(|text| (parse_package_json(text), &NPM_FRAMEWORKS[..]))
    } else if has_file("Cargo.toml") {
        files
            .get("Cargo.toml")
            .map(|text| (parse_cargo_toml(text), &CARGO_FRAMEWORKS[..]))
    } else {
        None
    };

    match manifest {
        Some((Ok(facts), chain)) => {
            metadata.framework = detect_framework(chain, &facts.dependencies);
            metadata.name = facts.name;
            metadata.version = facts.version;
            metadata.description = facts.description;
            metadata.dependencies = facts.dependencies;
        }
        Some((Err(e), _)) => warn!("Error parsing manifest: {}", e),
        None => debug!("No manifest found"),
    }

    metadata
}
