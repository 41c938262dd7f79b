//! Query intent classification
//!
//! Every decision is a literal ordered chain of case-insensitive substring
//! tests; the first rule that matches wins.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static TARGET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w+\.\w+").expect("TARGET_RE should compile"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntentType {
    Debugging,
    Creation,
    Refactoring,
    Explanation,
    Analysis,
    General,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Project,
    Function,
    File,
    Local,
}

const TYPE_RULES: [(&[&str], IntentType); 5] = [
    (&["fix", "bug", "error", "issue"], IntentType::Debugging),
    (&["create", "add", "implement", "build"], IntentType::Creation),
    (&["refactor", "improve", "optimize"], IntentType::Refactoring),
    (&["explain", "understand", "what", "how"], IntentType::Explanation),
    (&["analyze", "review", "check"], IntentType::Analysis),
];

const ACTIONS: [&str; 7] = ["create", "modify", "delete", "fix", "add", "remove", "update"];

const SCOPE_RULES: [(&[&str], Scope); 3] = [
    (&["whole", "entire", "all", "project"], Scope::Project),
    (&["function", "method"], Scope::Function),
    (&["file", "module"], Scope::File),
];

/// What a query is asking for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    #[serde(rename = "type")]
    pub kind: IntentType,
    /// `name.ext`-shaped substrings, in query order
    pub targets: Vec<String>,
    pub action: Option<String>,
    pub scope: Scope,
}

fn first_match<T: Copy>(query: &str, rules: &[(&[&str], T)], default: T) -> T {
    rules
        .iter()
        .find(|(words, _)| words.iter().any(|w| query.contains(w)))
        .map_or(default, |(_, value)| *value)
}

pub fn classify(query: &str) -> Intent {
    let lower = query.to_lowercase();

    Intent {
        kind: first_match(&lower, &TYPE_RULES, IntentType::General),
        targets: TARGET_RE
            .find_iter(query)
            .map(|m| m.as_str().to_string())
            .collect(),
        action: ACTIONS
            .iter()
            .find(|a| lower.contains(*a))
            .map(|a| a.to_string()),
        scope: first_match(&lower, &SCOPE_RULES, Scope::Local),
    }
}
