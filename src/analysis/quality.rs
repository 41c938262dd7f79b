//! Quality metrics, code smells and heuristic security findings

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use super::graph::is_script_path;
use super::Severity;
use crate::core::complexity::HIGH_COMPLEXITY_THRESHOLD;
use crate::index::ContentIndex;

/// Function bodies longer than this are reported as long
pub const LONG_FUNCTION_CHARS: usize = 500;

static SECRET_ASSIGNMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\b(?:password|secret|api_key|apikey|token)\b\s*[:=]\s*['"][^'"]+['"]"#)
        .expect("SECRET_ASSIGNMENT_RE should compile")
});

static INNER_HTML_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\.innerHTML\s*=[^=]").expect("INNER_HTML_RE should compile")
});

const LITERAL_RULES: [(&str, &str); 3] = [
    ("eval(", "eval"),
    ("new Function(", "dynamic-function"),
    ("document.write(", "document-write"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeSmell {
    #[serde(rename = "type")]
    pub kind: String,
    /// Function record key
    pub location: String,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complexity: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QualityMetrics {
    pub total_files: usize,
    pub total_functions: usize,
    pub total_classes: usize,
    pub avg_complexity: f64,
    pub code_smells: Vec<CodeSmell>,
    /// Test files per function, as a percentage
    pub coverage: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityFinding {
    pub path: String,
    pub rule: String,
    pub line: usize,
}

pub fn calculate_quality(index: &ContentIndex) -> QualityMetrics {
    let total_functions = index.functions.len();
    let mut metrics = QualityMetrics {
        total_files: index.files.len(),
        total_functions,
        total_classes: index.classes.len(),
        ..QualityMetrics::default()
    };

    if total_functions > 0 {
        let sum: u64 = index.functions.values().map(|f| u64::from(f.complexity)).sum();
        metrics.avg_complexity = sum as f64 / total_functions as f64;
        metrics.coverage = index.tests.len() as f64 / total_functions as f64 * 100.0;
    }

    for (key, func) in &index.functions {
        if func.body.len() > LONG_FUNCTION_CHARS {
            metrics.code_smells.push(CodeSmell {
                kind: "Long Function".to_string(),
                location: key.clone(),
                severity: Severity::Medium,
                complexity: None,
            });
        }
        if func.complexity > HIGH_COMPLEXITY_THRESHOLD {
            metrics.code_smells.push(CodeSmell {
                kind: "High Complexity".to_string(),
                location: key.clone(),
                severity: Severity::High,
                complexity: Some(func.complexity),
            });
        }
    }

    metrics
}

/// Line-by-line scan of script files for risky constructs
pub fn scan_security(index: &ContentIndex) -> Vec<SecurityFinding> {
    let mut findings = Vec::new();

    for (path, content) in index.files.iter().filter(|(p, _)| is_script_path(p)) {
        for (i, line) in content.lines().enumerate() {
            let mut hit = |rule: &str| {
                findings.push(SecurityFinding {
                    path: path.clone(),
                    rule: rule.to_string(),
                    line: i + 1,
                })
            };

            for (needle, rule) in LITERAL_RULES {
                if line.contains(needle) {
                    hit(rule);
                }
            }
            if INNER_HTML_RE.is_match(line) {
                hit("inner-html");
            }
            if SECRET_ASSIGNMENT_RE.is_match(line) {
                hit("hardcoded-secret");
            }
        }
    }

    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn index(entries: &[(&str, &str)]) -> ContentIndex {
        ContentIndex::build(
            entries
                .iter()
                .map(|(p, c)| (p.to_string(), c.to_string()))
                .collect::<BTreeMap<_, _>>(),
        )
    }

    #[test]
    fn test_metrics_for_empty_index() {
        let metrics = calculate_quality(&ContentIndex::default());
        assert_eq!(metrics.total_functions, 0);
        assert_eq!(metrics.avg_complexity, 0.0);
        assert_eq!(metrics.coverage, 0.0);
    }

    #[test]
    fn test_smells_and_averages() {
        let branches = "if (a) {} ".repeat(11);
        let long = format!("function big() {{ {} }}", "x();".repeat(130));
        let complex = format!("function tangled() {{ {branches} }}");
        let idx = index(&[
            ("src/big.js", &long),
            ("src/tangled.js", &complex),
            ("test/big.test.js", "test('big', () => {});"),
        ]);

        let metrics = calculate_quality(&idx);
        assert_eq!(metrics.total_functions, 2);
        assert_eq!(metrics.avg_complexity, (1.0 + 12.0) / 2.0);
        assert_eq!(metrics.coverage, 50.0);

        let kinds: Vec<_> = metrics
            .code_smells
            .iter()
            .map(|s| (s.kind.as_str(), s.location.as_str()))
            .collect();
        assert_eq!(
            kinds,
            vec![
                ("Long Function", "src/big.js:big"),
                ("High Complexity", "src/tangled.js:tangled"),
            ]
        );
        assert_eq!(metrics.code_smells[1].complexity, Some(12));
    }

    #[test]
    fn test_security_scan() {
        let idx = index(&[
            (
                "src/view.js",
                "el.innerHTML = input;\nif (el.innerHTML == x) {}\nconst apiKey = 1;\nconst token = \"abc123\";\neval(code);",
            ),
            ("notes.md", "eval(code)"),
        ]);

        let findings: Vec<_> = scan_security(&idx)
            .into_iter()
            .map(|f| (f.rule, f.line))
            .collect();
        assert_eq!(
            findings,
            vec![
                ("inner-html".to_string(), 1),
                ("hardcoded-secret".to_string(), 4),
                ("eval".to_string(), 5),
            ]
        );
    }
}
