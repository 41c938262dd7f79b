//! Branch-count complexity heuristic shared by the indexer and the graph

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// Complexity above this marks a file or function as complex
pub const HIGH_COMPLEXITY_THRESHOLD: u32 = 10;

const BRANCH_KEYWORDS: [&str; 6] = ["if", "else", "for", "while", "case", "catch"];

static KEYWORD_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    BRANCH_KEYWORDS
        .iter()
        .map(|kw| Regex::new(&format!(r"\b{kw}\b")).expect("keyword pattern should compile"))
        .collect()
});

static LOGICAL_OPERATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&&|\|\|").expect("LOGICAL_OPERATOR_RE should compile"));

/// 1 + branch keywords + `&&`/`||` tokens + `?` characters.
///
/// Empty input scores 1, and so does any overflow while counting.
pub fn calculate_complexity(code: &str) -> u32 {
    if code.trim().is_empty() {
        return 1;
    }

    count_branches(code).unwrap_or_else(|| {
        debug!("Complexity count overflowed for {} bytes of code", code.len());
        1
    })
}

fn count_branches(code: &str) -> Option<u32> {
    let mut complexity: u32 = 1;

    for re in KEYWORD_RES.iter() {
        complexity = complexity.checked_add(u32::try_from(re.find_iter(code).count()).ok()?)?;
    }

    let operators = LOGICAL_OPERATOR_RE.find_iter(code).count();
    complexity = complexity.checked_add(u32::try_from(operators).ok()?)?;

    let ternaries = code.matches('?').count();
    complexity.checked_add(u32::try_from(ternaries).ok()?)
}
