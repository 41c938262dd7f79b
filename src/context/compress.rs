//! Ordered size-reducing transforms for an over-budget context
//!
//! Steps run from least to most lossy. The context is re-estimated after each
//! one and the pipeline stops as soon as it fits.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::LazyLock;
use tracing::{debug, info};

use super::budget::estimate_json_tokens;
use super::output::{AbstractedPattern, Context};

/// Function bodies longer than this are replaced by a placeholder
pub const LONG_BODY_CHARS: usize = 500;

/// Lines shorter than this (after trimming) are never abstracted
pub const MIN_PATTERN_CHARS: usize = 40;

/// A line must appear at least this often to be abstracted
pub const MIN_PATTERN_OCCURRENCES: usize = 3;

/// Share of files kept by the final step, in percent
pub const KEEP_FILES_PERCENT: usize = 60;

static BLOCK_COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("BLOCK_COMMENT_RE should compile"));

static LINE_COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"//.*").expect("LINE_COMMENT_RE should compile"));

static BLANK_LINES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n(?:[^\S\n]*\n)+").expect("BLANK_LINES_RE should compile"));

static INLINE_WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\S\n]+").expect("INLINE_WHITESPACE_RE should compile"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompressionStep {
    StripComments,
    CollapseWhitespace,
    SummarizeFunctions,
    SummarizeClasses,
    AbstractRepeats,
    DropLowRelevanceFiles,
}

pub const PIPELINE: [CompressionStep; 6] = [
    CompressionStep::StripComments,
    CompressionStep::CollapseWhitespace,
    CompressionStep::SummarizeFunctions,
    CompressionStep::SummarizeClasses,
    CompressionStep::AbstractRepeats,
    CompressionStep::DropLowRelevanceFiles,
];

impl fmt::Display for CompressionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CompressionStep::StripComments => "strip comments",
            CompressionStep::CollapseWhitespace => "collapse whitespace",
            CompressionStep::SummarizeFunctions => "summarize long functions",
            CompressionStep::SummarizeClasses => "summarize classes",
            CompressionStep::AbstractRepeats => "abstract repeated lines",
            CompressionStep::DropLowRelevanceFiles => "drop low-relevance files",
        };
        f.write_str(label)
    }
}

impl CompressionStep {
    pub fn apply(self, ctx: &mut Context) {
        match self {
            CompressionStep::StripComments => strip_comments(ctx),
            CompressionStep::CollapseWhitespace => collapse_whitespace(ctx),
            CompressionStep::SummarizeFunctions => summarize_functions(ctx),
            CompressionStep::SummarizeClasses => summarize_classes(ctx),
            CompressionStep::AbstractRepeats => abstract_repeats(ctx),
            CompressionStep::DropLowRelevanceFiles => drop_low_relevance_files(ctx),
        }
    }
}

/// Run the pipeline until `ctx` fits in `max_tokens`.
///
/// Records the applied steps and the final estimate, and flags the context
/// when every step ran and it still does not fit.
pub fn compress(ctx: &mut Context, max_tokens: usize) {
    let mut tokens = estimate_json_tokens(&*ctx);
    info!("Compressing context from {} to {} tokens", tokens, max_tokens);

    for step in PIPELINE {
        if tokens <= max_tokens {
            break;
        }
        step.apply(ctx);
        ctx.compression_steps.push(step);
        tokens = estimate_json_tokens(&*ctx);
        debug!("After {}: {} tokens", step, tokens);
    }

    ctx.over_budget = tokens > max_tokens;
    ctx.estimated_tokens = tokens;
}

fn strip_comments(ctx: &mut Context) {
    for file in ctx.relevant_files.iter_mut().filter(|f| !f.summarized) {
        let without_blocks = BLOCK_COMMENT_RE.replace_all(&file.content, "");
        file.content = LINE_COMMENT_RE.replace_all(&without_blocks, "").into_owned();
    }
}

fn collapse_whitespace(ctx: &mut Context) {
    for file in ctx.relevant_files.iter_mut().filter(|f| !f.summarized) {
        let lines = BLANK_LINES_RE.replace_all(&file.content, "\n");
        file.content = INLINE_WHITESPACE_RE.replace_all(&lines, " ").into_owned();
    }
}

fn summarize_functions(ctx: &mut Context) {
    for func in &mut ctx.relevant_functions {
        let len = func.body.chars().count();
        if len > LONG_BODY_CHARS {
            func.body = format!(
                "[Function body: {} chars, complexity: {}]",
                len, func.complexity
            );
            func.summarized = true;
        }
    }
}

fn summarize_classes(ctx: &mut Context) {
    for class in &mut ctx.relevant_classes {
        class.body.clear();
        class.summary = Some(format!("Class with {} methods", class.methods.len()));
    }
}

fn abstract_repeats(ctx: &mut Context) {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut first_seen: Vec<&str> = Vec::new();

    for file in ctx.relevant_files.iter().filter(|f| !f.summarized) {
        for line in file.content.split('\n') {
            let text = line.trim();
            if text.chars().count() < MIN_PATTERN_CHARS {
                continue;
            }
            let count = counts.entry(text).or_insert(0);
            if *count == 0 {
                first_seen.push(text);
            }
            *count += 1;
        }
    }

    let patterns: Vec<AbstractedPattern> = first_seen
        .into_iter()
        .filter(|text| counts[text] >= MIN_PATTERN_OCCURRENCES)
        .enumerate()
        .map(|(i, text)| AbstractedPattern {
            id: i + 1,
            text: text.to_string(),
            occurrences: counts[text],
        })
        .collect();

    if patterns.is_empty() {
        return;
    }

    let ids: HashMap<String, usize> = patterns.iter().map(|p| (p.text.clone(), p.id)).collect();
    let mut seen: HashSet<usize> = HashSet::new();

    for file in ctx.relevant_files.iter_mut().filter(|f| !f.summarized) {
        let rewritten: Vec<String> = file
            .content
            .split('\n')
            .map(|line| {
                let Some(&id) = ids.get(line.trim()) else {
                    return line.to_string();
                };
                // First occurrence stays verbatim
                if seen.insert(id) {
                    return line.to_string();
                }
                let indent = &line[..line.len() - line.trim_start().len()];
                format!("{indent}[repeated pattern #{id}]")
            })
            .collect();
        file.content = rewritten.join("\n");
    }

    debug!("Abstracted {} repeated lines", patterns.len());
    ctx.abstracted_patterns.extend(patterns);
}

fn drop_low_relevance_files(ctx: &mut Context) {
    ctx.relevant_files.sort_by(|a, b| b.relevance.cmp(&a.relevance));
    let keep = ctx.relevant_files.len() * KEEP_FILES_PERCENT / 100;
    ctx.relevant_files.truncate(keep);

    let kept: HashSet<&str> = ctx.relevant_files.iter().map(|f| f.path.as_str()).collect();
    ctx.dependencies.retain(|path, _| kept.contains(path.as_str()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::intent::classify;
    use crate::context::output::{
        DependencyExcerpt, ProjectSummary, SelectedClass, SelectedFile, SelectedFunction, StructureSummary,
    };
    use std::collections::BTreeMap;

    fn context() -> Context {
        Context {
            project: ProjectSummary::default(),
            intent: classify("fix it"),
            relevant_files: Vec::new(),
            relevant_functions: Vec::new(),
            relevant_classes: Vec::new(),
            dependencies: BTreeMap::new(),
            patterns: Vec::new(),
            structure: StructureSummary::default(),
            analysis: None,
            memory: None,
            focus: None,
            abstracted_patterns: Vec::new(),
            estimated_tokens: 0,
            compression_steps: Vec::new(),
            over_budget: false,
        }
    }

    fn file(path: &str, content: &str, relevance: u64) -> SelectedFile {
        SelectedFile {
            path: path.to_string(),
            content: content.to_string(),
            relevance,
            summarized: false,
        }
    }

    #[test]
    fn test_long_body_placeholder_after_function_step() {
        let mut ctx = context();
        ctx.relevant_functions.push(SelectedFunction {
            name: "work".to_string(),
            path: "a.js".to_string(),
            params: Vec::new(),
            body: "z".repeat(600),
            complexity: 7,
            calls: Vec::new(),
            summarized: false,
        });

        compress(&mut ctx, 10);

        let func = &ctx.relevant_functions[0];
        assert_eq!(func.body, "[Function body: 600 chars, complexity: 7]");
        assert!(func.summarized);
        assert!(ctx.over_budget);
        assert_eq!(ctx.compression_steps, PIPELINE.to_vec());
    }

    #[test]
    fn test_within_budget_is_untouched() {
        let mut ctx = context();
        ctx.relevant_files.push(file("a.js", "// keep me", 1));

        compress(&mut ctx, 100_000);

        assert!(ctx.compression_steps.is_empty());
        assert!(!ctx.over_budget);
        assert_eq!(ctx.relevant_files[0].content, "// keep me");
    }

    #[test]
    fn test_comments_and_whitespace_skip_summarized_files() {
        let mut ctx = context();
        ctx.relevant_files.push(file("a.js", "a  =  1; // note\n\n\n/* block */b = 2;", 1));
        let mut summarized = file("b.js", "x // y", 1);
        summarized.summarized = true;
        ctx.relevant_files.push(summarized);

        CompressionStep::StripComments.apply(&mut ctx);
        CompressionStep::CollapseWhitespace.apply(&mut ctx);

        assert_eq!(ctx.relevant_files[0].content, "a = 1; \nb = 2;");
        assert_eq!(ctx.relevant_files[1].content, "x // y");
    }

    #[test]
    fn test_class_summary() {
        let mut ctx = context();
        ctx.relevant_classes.push(SelectedClass {
            name: "User".to_string(),
            path: "u.js".to_string(),
            methods: vec!["save".to_string(), "load".to_string()],
            properties: Vec::new(),
            extends: None,
            body: "{ save() {} load() {} }".to_string(),
            summary: None,
        });

        CompressionStep::SummarizeClasses.apply(&mut ctx);

        assert!(ctx.relevant_classes[0].body.is_empty());
        assert_eq!(ctx.relevant_classes[0].summary.as_deref(), Some("Class with 2 methods"));
    }

    #[test]
    fn test_repeated_lines_abstracted() {
        let line = "const client = createClient({ retries: 3, timeout: 5000 });";
        let mut ctx = context();
        ctx.relevant_files.push(file("a.js", &format!("{line}\nshort\n  {line}"), 2));
        ctx.relevant_files.push(file("b.js", &format!("{line}\nother"), 1));

        CompressionStep::AbstractRepeats.apply(&mut ctx);

        assert_eq!(ctx.abstracted_patterns.len(), 1);
        assert_eq!(ctx.abstracted_patterns[0].occurrences, 3);
        assert_eq!(
            ctx.relevant_files[0].content,
            format!("{line}\nshort\n  [repeated pattern #1]")
        );
        assert_eq!(ctx.relevant_files[1].content, "[repeated pattern #1]\nother");
    }

    #[test]
    fn test_no_repeats_is_noop() {
        let mut ctx = context();
        ctx.relevant_files.push(file("a.js", "short line", 1));
        CompressionStep::AbstractRepeats.apply(&mut ctx);
        assert!(ctx.abstracted_patterns.is_empty());
        assert_eq!(ctx.relevant_files[0].content, "short line");
    }

    #[test]
    fn test_drop_keeps_top_sixty_percent() {
        let mut ctx = context();
        for (i, score) in [3u64, 9, 1, 9, 5].iter().enumerate() {
            ctx.relevant_files.push(file(&format!("f{i}.js"), "", *score));
        }

        CompressionStep::DropLowRelevanceFiles.apply(&mut ctx);

        let kept: Vec<_> = ctx.relevant_files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(kept, vec!["f1.js", "f3.js", "f4.js"]);
    }

    #[test]
    fn test_drop_prunes_dependency_excerpts() {
        let mut ctx = context();
        for (i, score) in [3u64, 9, 1, 9, 5].iter().enumerate() {
            let path = format!("f{i}.js");
            ctx.relevant_files.push(file(&path, "", *score));
            ctx.dependencies.insert(
                path,
                DependencyExcerpt {
                    imports: vec!["./cache.js".to_string()],
                    exports: Vec::new(),
                    complexity: 1,
                },
            );
        }

        CompressionStep::DropLowRelevanceFiles.apply(&mut ctx);

        let kept: Vec<_> = ctx.relevant_files.iter().map(|f| f.path.as_str()).collect();
        let excerpts: Vec<_> = ctx.dependencies.keys().map(String::as_str).collect();
        assert_eq!(excerpts, vec!["f1.js", "f3.js", "f4.js"]);
        assert!(excerpts.iter().all(|p| kept.contains(p)));
    }
}
