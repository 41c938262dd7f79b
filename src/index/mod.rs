//! Content indexing
//!
//! Turns the file-text map into function, class, comment and test records.
//! Records are keyed by `path:name`, so a later extraction pass overwrites
//! an earlier one that found the same name in the same file.

pub mod scanner;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::core::complexity::calculate_complexity;
use crate::core::parser::{
    extract_calls, extract_classes, extract_comments, extract_functions, extract_tests, Comment,
    TestCase,
};

/// An indexed function
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionRecord {
    pub name: String,
    pub path: String,
    pub params: Vec<String>,
    pub body: String,
    pub complexity: u32,
    pub calls: Vec<String>,
}

/// An indexed class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassRecord {
    pub name: String,
    pub path: String,
    pub methods: Vec<String>,
    pub properties: Vec<String>,
    pub extends: Option<String>,
    pub body: String,
}

/// The content section of a project: raw text plus everything extracted from it
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentIndex {
    pub files: BTreeMap<String, String>,
    pub functions: BTreeMap<String, FunctionRecord>,
    pub classes: BTreeMap<String, ClassRecord>,
    pub comments: BTreeMap<String, Vec<Comment>>,
    pub tests: BTreeMap<String, Vec<TestCase>>,
}

/// Record key for a named item in a file
pub fn record_key(path: &str, name: &str) -> String {
    format!("{path}:{name}")
}

/// Whether a path looks like a test file
pub fn is_test_path(path: &str) -> bool {
    path.contains("test") || path.contains("spec")
}

impl ContentIndex {
    /// Index every file in the map
    pub fn build(files: BTreeMap<String, String>) -> Self {
        let mut index = ContentIndex::default();

        for (path, content) in &files {
            for func in extract_functions(content) {
                let complexity = calculate_complexity(&func.body);
                let calls = extract_calls(&func.body);
                index.functions.insert(
                    record_key(path, &func.name),
                    FunctionRecord {
                        name: func.name,
                        path: path.clone(),
                        params: func.params,
                        body: func.body,
                        complexity,
                        calls,
                    },
                );
            }

            for class in extract_classes(content) {
                index.classes.insert(
                    record_key(path, &class.name),
                    ClassRecord {
                        name: class.name,
                        path: path.clone(),
                        methods: class.methods,
                        properties: class.properties,
                        extends: class.extends,
                        body: class.body,
                    },
                );
            }

            let comments = extract_comments(content);
            if !comments.is_empty() {
                index.comments.insert(path.clone(), comments);
            }

            if is_test_path(path) {
                index.tests.insert(path.clone(), extract_tests(content));
            }
        }

        index.files = files;
        debug!(
            "Indexed {} files: {} functions, {} classes",
            index.files.len(),
            index.functions.len(),
            index.classes.len()
        );
        index
    }

    /// Get count of each record type
    pub fn stats(&self) -> IndexStats {
        IndexStats {
            files: self.files.len(),
            total_lines: self.files.values().map(|c| c.lines().count()).sum(),
            functions: self.functions.len(),
            classes: self.classes.len(),
            commented_files: self.comments.len(),
            test_files: self.tests.len(),
        }
    }
}

/// Counts of indexed records
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub files: usize,
    pub total_lines: usize,
    pub functions: usize,
    pub classes: usize,
    pub commented_files: usize,
    pub test_files: usize,
}

impl IndexStats {
    pub fn total_records(&self) -> usize {
        self.functions + self.classes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn files(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
        entries
            .iter()
            .map(|(p, c)| (p.to_string(), c.to_string()))
            .collect()
    }

    #[test]
    fn test_functions_keyed_by_path_and_name() {
        let index = ContentIndex::build(files(&[
            ("src/a.js", "function load(id) { if (id) { return fetch(id); } }"),
            ("src/b.js", "function load() { return 1; }"),
        ]));

        let a = &index.functions["src/a.js:load"];
        assert_eq!(a.params, vec!["id"]);
        assert_eq!(a.complexity, 2);
        assert_eq!(a.calls, vec!["fetch"]);
        assert!(index.functions.contains_key("src/b.js:load"));
    }

    #[test]
    fn test_later_pass_overwrites_same_name() {
        // Declared as an arrow, then again as a bare method shape in an object literal
        let index = ContentIndex::build(files(&[(
            "src/obj.js",
            "const run = () => 1;\nconst api = { run(x) { return x; } };",
        )]));
        assert_eq!(index.functions.len(), 1);
        assert!(index.functions["src/obj.js:run"].body.is_empty());
    }

    #[test]
    fn test_comments_omitted_when_absent_and_tests_only_for_test_paths() {
        let index = ContentIndex::build(files(&[
            ("src/plain.js", "const x = 1;"),
            ("src/noted.js", "// NOTE: keep in sync"),
            ("test/auth.test.js", "test('logs in', () => {});"),
            ("src/describe.js", "describe('not a test file', () => {});"),
        ]));

        assert!(!index.comments.contains_key("src/plain.js"));
        assert_eq!(index.comments["src/noted.js"][0].text, "keep in sync");
        assert_eq!(index.tests.len(), 1);
        assert_eq!(index.tests["test/auth.test.js"][0].name, "logs in");
    }

    #[test]
    fn test_classes_indexed() {
        let index = ContentIndex::build(files(&[(
            "src/user.js",
            "class User extends Model { save() { this.saved = true; } }",
        )]));
        let user = &index.classes["src/user.js:User"];
        assert_eq!(user.extends.as_deref(), Some("Model"));
        assert_eq!(user.methods, vec!["save"]);
        assert_eq!(user.properties, vec!["saved"]);
        assert_eq!(index.stats().classes, 1);
    }
}
