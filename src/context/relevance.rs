//! Relevance scoring of files, functions and classes against a query

use std::collections::BTreeMap;
use std::fmt;

use super::intent::{Intent, IntentType};
use crate::analysis::graph::DependencyGraph;
use crate::core::complexity::HIGH_COMPLEXITY_THRESHOLD;
use crate::index::ContentIndex;

pub const TARGET_POINTS: u64 = 100;
pub const WORD_OCCURRENCE_POINTS: u64 = 2;
pub const DEBUG_TEST_POINTS: u64 = 20;
pub const CREATION_TEMPLATE_POINTS: u64 = 15;
pub const COMPLEX_FILE_POINTS: u64 = 10;
pub const DEPENDENT_POINTS: u64 = 3;
pub const RECENT_FILE_POINTS: u64 = 25;
pub const NAMED_ITEM_POINTS: u64 = 50;

/// Query words shorter than this many characters carry no content signal
const MIN_WORD_CHARS: usize = 4;

/// What a score is attached to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScoreKey {
    File(String),
    /// Function record key `path:name`
    Function(String),
    /// Class record key `path:name`
    Class(String),
}

impl fmt::Display for ScoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreKey::File(path) => f.write_str(path),
            ScoreKey::Function(key) => write!(f, "function:{key}"),
            ScoreKey::Class(key) => write!(f, "class:{key}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scored {
    pub key: ScoreKey,
    pub score: u64,
}

/// Inputs the scorer reads from the project
pub struct ScoringInput<'a> {
    pub index: &'a ContentIndex,
    pub graph: &'a DependencyGraph,
    pub recent_files: &'a [String],
}

fn count_u64(n: usize) -> u64 {
    u64::try_from(n).unwrap_or(u64::MAX)
}

/// Score every indexed file, then every function and class.
///
/// Output order is files by path, functions by key, then classes by key.
pub fn score_all(query: &str, intent: &Intent, input: &ScoringInput<'_>) -> Vec<Scored> {
    let query_lower = query.to_lowercase();
    let words: Vec<&str> = query_lower.split_whitespace().collect();
    let content_words: Vec<&str> = words
        .iter()
        .copied()
        .filter(|w| w.chars().count() >= MIN_WORD_CHARS)
        .collect();

    let mut scored = Vec::with_capacity(
        input.index.files.len() + input.index.functions.len() + input.index.classes.len(),
    );

    let mut file_scores: BTreeMap<&str, u64> = BTreeMap::new();
    for (path, content) in &input.index.files {
        let score = score_file(path, content, intent, &content_words, input);
        file_scores.insert(path.as_str(), score);
        scored.push(Scored {
            key: ScoreKey::File(path.clone()),
            score,
        });
    }

    // Functions and classes start from their file's score; unknown files score 0
    let file_score = |path: &str| -> u64 { file_scores.get(path).copied().unwrap_or(0) };
    let named_bonus = |name: &str| -> u64 {
        let name = name.to_lowercase();
        if words.iter().any(|w| *w == name) {
            NAMED_ITEM_POINTS
        } else {
            0
        }
    };

    for (key, func) in &input.index.functions {
        scored.push(Scored {
            key: ScoreKey::Function(key.clone()),
            score: file_score(&func.path).saturating_add(named_bonus(&func.name)),
        });
    }

    for (key, class) in &input.index.classes {
        scored.push(Scored {
            key: ScoreKey::Class(key.clone()),
            score: file_score(&class.path).saturating_add(named_bonus(&class.name)),
        });
    }

    scored
}

pub fn score_file(
    path: &str,
    content: &str,
    intent: &Intent,
    content_words: &[&str],
    input: &ScoringInput<'_>,
) -> u64 {
    let mut score: u64 = 0;

    if intent.targets.iter().any(|t| t == path) {
        score = score.saturating_add(TARGET_POINTS);
    }

    if !content_words.is_empty() {
        let content_lower = content.to_lowercase();
        for word in content_words {
            let occurrences = count_u64(content_lower.matches(word).count());
            score = score.saturating_add(occurrences.saturating_mul(WORD_OCCURRENCE_POINTS));
        }
    }

    if intent.kind == IntentType::Debugging && path.contains("test") {
        score = score.saturating_add(DEBUG_TEST_POINTS);
    }
    if intent.kind == IntentType::Creation && path.contains("template") {
        score = score.saturating_add(CREATION_TEMPLATE_POINTS);
    }

    if input.graph.complexity_of(path) > HIGH_COMPLEXITY_THRESHOLD {
        score = score.saturating_add(COMPLEX_FILE_POINTS);
    }

    let dependents = count_u64(input.graph.dependents_count(path));
    score = score.saturating_add(dependents.saturating_mul(DEPENDENT_POINTS));

    if input.recent_files.iter().any(|f| f == path) {
        score = score.saturating_add(RECENT_FILE_POINTS);
    }

    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::intent::classify;
    use std::collections::BTreeMap;

    fn index(entries: &[(&str, &str)]) -> ContentIndex {
        ContentIndex::build(
            entries
                .iter()
                .map(|(p, c)| (p.to_string(), c.to_string()))
                .collect::<BTreeMap<_, _>>(),
        )
    }

    fn score_of(scored: &[Scored], key: &str) -> u64 {
        scored
            .iter()
            .find(|s| s.key.to_string() == key)
            .map(|s| s.score)
            .unwrap()
    }

    #[test]
    fn test_scores_every_file() {
        let entries: Vec<(String, String)> = (0..12)
            .map(|i| (format!("src/f{i}.js"), String::new()))
            .collect();
        let refs: Vec<(&str, &str)> = entries.iter().map(|(p, c)| (p.as_str(), c.as_str())).collect();
        let idx = index(&refs);
        let graph = DependencyGraph::build(&idx.files);
        let input = ScoringInput {
            index: &idx,
            graph: &graph,
            recent_files: &[],
        };

        let scored = score_all("anything", &classify("anything"), &input);
        assert_eq!(scored.len(), 12);
    }

    #[test]
    fn test_signals_add_up() {
        let idx = index(&[
            ("auth.js", "function login(user) { return check(user); }\n// login login"),
            ("test/auth.test.js", "import a from 'auth.js';"),
            ("lib.js", "import a from 'auth.js';"),
        ]);
        let graph = DependencyGraph::build(&idx.files);
        let recent = vec!["auth.js".to_string()];
        let input = ScoringInput {
            index: &idx,
            graph: &graph,
            recent_files: &recent,
        };

        let query = "fix the login bug in auth.js";
        let scored = score_all(query, &classify(query), &input);

        // target + 3 "login" occurrences + 2 dependents + recent
        assert_eq!(score_of(&scored, "auth.js"), 100 + 3 * 2 + 2 * 3 + 25);
        // debugging on a test path, plus one "auth.js" occurrence in the import
        assert_eq!(score_of(&scored, "test/auth.test.js"), 20 + 2);
        assert_eq!(score_of(&scored, "lib.js"), 2);
        assert_eq!(
            score_of(&scored, "function:auth.js:login"),
            score_of(&scored, "auth.js") + NAMED_ITEM_POINTS
        );
    }

    #[test]
    fn test_more_occurrences_never_score_lower() {
        let idx = index(&[
            ("a.js", "cache"),
            ("b.js", "cache cache"),
            ("c.js", "cache cache cache"),
        ]);
        let graph = DependencyGraph::build(&idx.files);
        let input = ScoringInput {
            index: &idx,
            graph: &graph,
            recent_files: &[],
        };

        let scored = score_all("explain cache", &classify("explain cache"), &input);
        let scores: Vec<_> = ["a.js", "b.js", "c.js"]
            .iter()
            .map(|k| score_of(&scored, k))
            .collect();
        assert!(scores.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(scores, vec![2, 4, 6]);
    }

    #[test]
    fn test_class_named_in_query() {
        let idx = index(&[("models/user.js", "class User { save() {} }")]);
        let graph = DependencyGraph::build(&idx.files);
        let input = ScoringInput {
            index: &idx,
            graph: &graph,
            recent_files: &[],
        };

        let scored = score_all("explain user", &classify("explain user"), &input);
        let file = score_of(&scored, "models/user.js");
        assert_eq!(score_of(&scored, "class:models/user.js:User"), file + NAMED_ITEM_POINTS);
    }

    #[test]
    fn test_functions_reuse_owning_file_score() {
        let body: String = (0..200)
            .map(|i| format!("function handler{i}() {{ return cache; }}\n"))
            .collect();
        let mut idx = index(&[("big.js", body.as_str())]);
        let graph = DependencyGraph::build(&idx.files);
        let input = ScoringInput {
            index: &idx,
            graph: &graph,
            recent_files: &[],
        };

        let scored = score_all("explain cache", &classify("explain cache"), &input);
        let file = score_of(&scored, "big.js");
        assert_eq!(file, 200 * 2);
        assert_eq!(scored.len(), 201);
        assert!(scored
            .iter()
            .filter(|s| matches!(s.key, ScoreKey::Function(_)))
            .all(|s| s.score == file));

        // a record whose file is no longer loaded starts from zero
        idx.files.clear();
        let input = ScoringInput {
            index: &idx,
            graph: &graph,
            recent_files: &[],
        };
        let scored = score_all("explain cache", &classify("explain cache"), &input);
        assert_eq!(scored.len(), 200);
        assert!(scored.iter().all(|s| s.score == 0));
    }
}
