//! Context assembly engine
//!
//! A [`ContextManager`] owns one analyzed repository per session. Analysis
//! loads every listed file concurrently, runs the analysis stages and swaps
//! the result in. Queries then classify intent, score and select content
//! under a token budget, and compress the draft when it is still too large.

pub mod budget;
pub mod compress;
pub mod intent;
pub mod memory;
pub mod output;
pub mod relevance;
pub mod select;

use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::analysis::graph::DependencyGraph;
use crate::analysis::health::{self, HealthReport};
use crate::analysis::patterns::{detect_patterns, ArchitecturalPattern};
use crate::analysis::project::{analyze_project, ProjectMetadata};
use crate::analysis::quality::{calculate_quality, scan_security, QualityMetrics, SecurityFinding};
use crate::analysis::structure::{analyze_structure, ProjectStructure};
use crate::config::ContextConfig;
use crate::core::complexity::HIGH_COMPLEXITY_THRESHOLD;
use crate::core::loader::{FileLoader, RepoEntry};
use crate::error::LoadError;
use crate::index::{ContentIndex, IndexStats};

use self::budget::estimate_json_tokens;
use self::compress::compress;
use self::intent::{classify, IntentType};
use self::memory::{DynamicState, Interaction, MemoryStore};
use self::output::{
    AnalysisBlock, ComplexityHotspot, Context, DependencyExcerpt, ProjectSummary,
    StructureSummary,
};
use self::relevance::{score_all, ScoringInput};
use self::select::select;

const HOTSPOT_LIMIT: usize = 5;

/// Derived analysis of the repository
#[derive(Debug, Clone, Default, Serialize)]
pub struct AnalysisSection {
    pub patterns: Vec<ArchitecturalPattern>,
    pub dependencies: DependencyGraph,
    pub quality: QualityMetrics,
    pub security: Vec<SecurityFinding>,
}

/// Everything known about one repository in one session
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectContext {
    pub metadata: ProjectMetadata,
    pub structure: ProjectStructure,
    pub analysis: AnalysisSection,
    pub content: ContentIndex,
    pub memory: MemoryStore,
    pub dynamic: DynamicState,
}

impl ProjectContext {
    /// Run every analysis stage over a listing and its loaded contents.
    ///
    /// Memory and dynamic state start empty.
    pub fn analyze(listing: &[RepoEntry], files: BTreeMap<String, String>) -> Self {
        let metadata = analyze_project(listing, &files);
        let structure = analyze_structure(listing, &files);
        let dependencies = DependencyGraph::build(&files);
        let patterns = detect_patterns(&metadata, &structure);
        let content = ContentIndex::build(files);
        let quality = calculate_quality(&content);
        let security = scan_security(&content);

        info!(
            "Analyzed {} files: {} modules, {} graph nodes, {} patterns",
            content.files.len(),
            structure.modules.len(),
            dependencies.len(),
            patterns.len()
        );

        Self {
            metadata,
            structure,
            analysis: AnalysisSection {
                patterns,
                dependencies,
                quality,
                security,
            },
            content,
            memory: MemoryStore::default(),
            dynamic: DynamicState::default(),
        }
    }

    /// Analysis worth attaching for a given kind of query
    pub fn relevant_analysis(&self, kind: IntentType) -> AnalysisBlock {
        match kind {
            IntentType::Debugging | IntentType::Analysis => AnalysisBlock {
                quality: Some(self.analysis.quality.clone()),
                code_smells: Some(self.analysis.quality.code_smells.clone()),
                ..AnalysisBlock::default()
            },
            IntentType::Refactoring => AnalysisBlock {
                patterns: Some(self.analysis.patterns.clone()),
                complexity: Some(self.complexity_hotspots()),
                ..AnalysisBlock::default()
            },
            _ => AnalysisBlock::default(),
        }
    }

    /// The most complex functions above the threshold, most complex first
    pub fn complexity_hotspots(&self) -> Vec<ComplexityHotspot> {
        let mut hotspots: Vec<ComplexityHotspot> = self
            .content
            .functions
            .iter()
            .filter(|(_, f)| f.complexity > HIGH_COMPLEXITY_THRESHOLD)
            .map(|(key, f)| ComplexityHotspot {
                location: key.clone(),
                complexity: f.complexity,
            })
            .collect();
        hotspots.sort_by(|a, b| b.complexity.cmp(&a.complexity));
        hotspots.truncate(HOTSPOT_LIMIT);
        hotspots
    }
}

/// Per-query options for [`ContextManager::build_context`]
#[derive(Debug, Clone)]
pub struct ContextOptions {
    pub max_tokens: usize,
    pub include_analysis: bool,
    pub include_memory: bool,
    /// Overrides the session focus for this query
    pub focus_area: Option<String>,
}

impl Default for ContextOptions {
    fn default() -> Self {
        Self {
            max_tokens: 100_000,
            include_analysis: true,
            include_memory: true,
            focus_area: None,
        }
    }
}

impl From<&ContextConfig> for ContextOptions {
    fn from(config: &ContextConfig) -> Self {
        Self {
            max_tokens: config.max_tokens,
            include_analysis: config.include_analysis,
            include_memory: config.include_memory,
            focus_area: None,
        }
    }
}

/// Load every file entry of the listing, at most `max_concurrent` at a time.
///
/// Files that fail to load are left out of the map.
pub async fn load_contents<L: FileLoader + 'static>(
    listing: &[RepoEntry],
    loader: Arc<L>,
    max_concurrent: usize,
) -> BTreeMap<String, String> {
    let semaphore = Arc::new(Semaphore::new(max_concurrent.max(1)));
    let mut tasks = JoinSet::new();

    for entry in listing.iter().filter(|e| e.is_file()) {
        let path = entry.path.clone();
        let loader = Arc::clone(&loader);
        let semaphore = Arc::clone(&semaphore);
        tasks.spawn(async move {
            let _permit = semaphore.acquire_owned().await.ok();
            let result = loader.load(&path).await;
            (path, result)
        });
    }

    let mut files = BTreeMap::new();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((path, Ok(content))) => {
                files.insert(path, content);
            }
            Ok((_, Err(e @ (LoadError::NotFound(_) | LoadError::TooLarge { .. })))) => {
                debug!("Skipping file: {}", e);
            }
            Ok((_, Err(e))) => warn!("{}", e),
            Err(e) => warn!("File load task failed: {}", e),
        }
    }

    files
}

/// Owns the live [`ProjectContext`] for a session
pub struct ContextManager {
    project: RwLock<ProjectContext>,
    max_concurrent_loads: usize,
}

impl Default for ContextManager {
    fn default() -> Self {
        Self::new(32)
    }
}

impl ContextManager {
    pub fn new(max_concurrent_loads: usize) -> Self {
        Self {
            project: RwLock::new(ProjectContext::default()),
            max_concurrent_loads,
        }
    }

    pub fn read(&self) -> RwLockReadGuard<'_, ProjectContext> {
        self.project.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ProjectContext> {
        self.project.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Load and analyze a repository, replacing the previous analysis
    pub async fn analyze_repository<L: FileLoader + 'static>(
        &self,
        listing: &[RepoEntry],
        loader: Arc<L>,
    ) -> IndexStats {
        info!("Starting project analysis of {} entries", listing.len());
        let files = load_contents(listing, loader, self.max_concurrent_loads).await;
        let fresh = ProjectContext::analyze(listing, files);
        let stats = fresh.content.stats();
        self.install(fresh);
        stats
    }

    /// Swap in a fresh analysis, carrying session memory and dynamic state over
    pub fn install(&self, mut fresh: ProjectContext) {
        let mut project = self.write();
        fresh.memory = std::mem::take(&mut project.memory);
        fresh.dynamic = std::mem::take(&mut project.dynamic);
        *project = fresh;
    }

    pub fn build_context(&self, query: &str, options: &ContextOptions) -> Context {
        let project = self.read();
        info!("Building context for query: {}", query);

        let intent = classify(query);
        let scored = score_all(
            query,
            &intent,
            &ScoringInput {
                index: &project.content,
                graph: &project.analysis.dependencies,
                recent_files: &project.dynamic.recent_files,
            },
        );
        let selection = select(&scored, &project.content, options.max_tokens);

        let dependencies = selection
            .files
            .iter()
            .filter_map(|file| {
                project.analysis.dependencies.get(&file.path).map(|node| {
                    let excerpt = DependencyExcerpt {
                        imports: node.imports.clone(),
                        exports: node.exports.clone(),
                        complexity: node.complexity,
                    };
                    (file.path.clone(), excerpt)
                })
            })
            .collect();

        let analysis = options
            .include_analysis
            .then(|| project.relevant_analysis(intent.kind));
        let memory = options
            .include_memory
            .then(|| project.memory.relevant_for(query));
        let focus = options
            .focus_area
            .clone()
            .or_else(|| project.dynamic.current_focus.clone());

        let mut context = Context {
            project: ProjectSummary::from(&project.metadata),
            intent,
            relevant_files: selection.files,
            relevant_functions: selection.functions,
            relevant_classes: selection.classes,
            dependencies,
            patterns: project.analysis.patterns.clone(),
            structure: StructureSummary::new(&project.structure, project.content.files.len()),
            analysis,
            memory,
            focus,
            abstracted_patterns: Vec::new(),
            estimated_tokens: 0,
            compression_steps: Vec::new(),
            over_budget: false,
        };

        let tokens = estimate_json_tokens(&context);
        if tokens > options.max_tokens {
            compress(&mut context, options.max_tokens);
            if context.over_budget {
                warn!(
                    "Context still over budget after compression: {} > {} tokens",
                    context.estimated_tokens, options.max_tokens
                );
            }
        } else {
            context.estimated_tokens = tokens;
        }

        context
    }

    pub fn update_memory(&self, interaction: &Interaction) {
        let mut project = self.write();
        project.memory.record(interaction);
        for path in &interaction.files_modified {
            project.dynamic.touch(path);
        }
        debug!(
            "Memory now holds {} conversations, {} decisions",
            project.memory.conversations.len(),
            project.memory.decisions.len()
        );
    }

    pub fn set_focus(&self, area: Option<String>) {
        self.write().dynamic.current_focus = area;
    }

    pub fn analyze_project_health(&self) -> HealthReport {
        health::assess(&self.read())
    }
}
