//! Heuristic code extraction
//!
//! Pattern-matches raw JavaScript/TypeScript-shaped text for functions,
//! classes, comments, tests, imports and routes. This is not a parser:
//! braces inside strings and comments are counted like any other, and a
//! name is whatever the pattern captured.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Call-shaped names that are control flow rather than functions
pub const CONTROL_FLOW_STOPLIST: [&str; 6] = ["if", "for", "while", "switch", "catch", "function"];

static FUNCTION_DECL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"function\s+(\w+)\s*\(([^)]*)\)\s*\{").expect("FUNCTION_DECL_RE should compile")
});

static ARROW_FUNCTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:const|let|var)\s+(\w+)\s*=\s*(?:async\s+)?(?:\([^)]*\)|\w+)\s*=>")
        .expect("ARROW_FUNCTION_RE should compile")
});

static METHOD_SHAPE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\w+)\s*\([^)]*\)\s*\{").expect("METHOD_SHAPE_RE should compile")
});

static CLASS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"class\s+(\w+)(?:\s+extends\s+(\w+))?\s*\{").expect("CLASS_RE should compile")
});

/// `this.x =` but not `this.x ==`
static PROPERTY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"this\.(\w+)\s*=(?:[^=]|$)").expect("PROPERTY_RE should compile")
});

static CALL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\w+)\s*\(").expect("CALL_RE should compile"));

static TODO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)//\s*TODO:?\s*(.+)$").expect("TODO_RE should compile")
});

static FIXME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)//\s*FIXME:?\s*(.+)$").expect("FIXME_RE should compile")
});

static NOTE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)//\s*NOTE:?\s*(.+)$").expect("NOTE_RE should compile")
});

static JSDOC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*\*.*?\*/").expect("JSDOC_RE should compile"));

static TEST_CASE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\b(?:test|it|describe)\s*\(\s*['"]([^'"]+)['"]"#)
        .expect("TEST_CASE_RE should compile")
});

static IMPORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"import\s+(?:\{[^}]*\}|\w+|\*\s+as\s+\w+)\s+from\s+['"]([^'"]+)['"]"#)
        .expect("IMPORT_RE should compile")
});

static REQUIRE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"require\(\s*['"]([^'"]+)['"]\s*\)"#).expect("REQUIRE_RE should compile")
});

static EXPORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"export\s+(?:default\s+)?(?:const|let|var|function|class)\s+(\w+)")
        .expect("EXPORT_RE should compile")
});

static APP_ROUTE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"app\.(get|post|put|delete|patch)\s*\(\s*['"]([^'"]+)['"]"#)
        .expect("APP_ROUTE_RE should compile")
});

static ROUTER_ROUTE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"router\.(get|post|put|delete|patch)\s*\(\s*['"]([^'"]+)['"]"#)
        .expect("ROUTER_ROUTE_RE should compile")
});

/// A function found by one of the three function passes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedFunction {
    pub name: String,
    pub params: Vec<String>,
    /// Brace-enclosed body; empty for arrow and bare-method matches
    pub body: String,
}

/// A class declaration and what was found inside its body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedClass {
    pub name: String,
    pub extends: Option<String>,
    pub body: String,
    pub methods: Vec<String>,
    pub properties: Vec<String>,
}

/// Marker comments worth surfacing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommentKind {
    #[serde(rename = "TODO")]
    Todo,
    #[serde(rename = "FIXME")]
    Fixme,
    #[serde(rename = "NOTE")]
    Note,
    #[serde(rename = "JSDoc")]
    JsDoc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(rename = "type")]
    pub kind: CommentKind,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestKind {
    Unit,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TestKind,
}

/// An HTTP route registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub method: String,
    pub path: String,
}

/// Raw import targets and exported names of one file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleFacts {
    pub imports: Vec<String>,
    pub exports: Vec<String>,
}

/// Brace-balanced block starting at the first `{` at or after `from`.
///
/// Returns the block including both braces, the rest of the text when the
/// block never closes, or an empty string when there is no opening brace.
pub fn extract_block(content: &str, from: usize) -> &str {
    let Some(open) = content.get(from..).and_then(|rest| rest.find('{')) else {
        return "";
    };
    let open = from + open;

    let mut depth = 0usize;
    for (offset, byte) in content.as_bytes()[open..].iter().enumerate() {
        match byte {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return &content[open..=open + offset];
                }
            }
            _ => {}
        }
    }

    &content[open..]
}

/// Run all three function passes, in order, over `content`
pub fn extract_functions(content: &str) -> Vec<ExtractedFunction> {
    let mut functions = Vec::new();

    // Classic declarations
    for cap in FUNCTION_DECL_RE.captures_iter(content) {
        let Some(whole) = cap.get(0) else { continue };
        let params = cap[2]
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();
        functions.push(ExtractedFunction {
            name: cap[1].to_string(),
            params,
            // The pattern ends on the opening brace
            body: extract_block(content, whole.end() - 1).to_string(),
        });
    }

    // Arrow assignments
    for cap in ARROW_FUNCTION_RE.captures_iter(content) {
        functions.push(ExtractedFunction {
            name: cap[1].to_string(),
            params: Vec::new(),
            body: String::new(),
        });
    }

    // Bare method shapes
    for name in method_shapes(content, true) {
        functions.push(ExtractedFunction {
            name,
            params: Vec::new(),
            body: String::new(),
        });
    }

    functions
}

/// Names of `name(...) {` shapes outside the control-flow stoplist.
///
/// With `skip_declarations`, shapes preceded by the `function` keyword are
/// left out since the declaration pass already recorded them with a body.
fn method_shapes(content: &str, skip_declarations: bool) -> Vec<String> {
    METHOD_SHAPE_RE
        .captures_iter(content)
        .filter_map(|cap| {
            let name = cap.get(1)?;
            if CONTROL_FLOW_STOPLIST.contains(&name.as_str()) {
                return None;
            }
            if skip_declarations && follows_function_keyword(content, name.start()) {
                return None;
            }
            Some(name.as_str().to_string())
        })
        .collect()
}

fn follows_function_keyword(content: &str, at: usize) -> bool {
    let before = content[..at].trim_end();
    let Some(prefix) = before.strip_suffix("function") else {
        return false;
    };
    !prefix
        .chars()
        .next_back()
        .is_some_and(|c| c.is_alphanumeric() || c == '_')
}

/// Classes with their bodies, methods and `this.` properties
pub fn extract_classes(content: &str) -> Vec<ExtractedClass> {
    CLASS_RE
        .captures_iter(content)
        .filter_map(|cap| {
            let whole = cap.get(0)?;
            let body = extract_block(content, whole.end() - 1);
            Some(ExtractedClass {
                name: cap[1].to_string(),
                extends: cap.get(2).map(|m| m.as_str().to_string()),
                body: body.to_string(),
                methods: method_shapes(body, false),
                properties: extract_properties(body),
            })
        })
        .collect()
}

fn extract_properties(body: &str) -> Vec<String> {
    let mut properties: Vec<String> = Vec::new();
    for cap in PROPERTY_RE.captures_iter(body) {
        let name = &cap[1];
        if !properties.iter().any(|p| p == name) {
            properties.push(name.to_string());
        }
    }
    properties
}

/// Unique call-shaped names in first-seen order
pub fn extract_calls(body: &str) -> Vec<String> {
    let mut calls: Vec<String> = Vec::new();
    for cap in CALL_RE.captures_iter(body) {
        let name = &cap[1];
        if CONTROL_FLOW_STOPLIST.contains(&name) || calls.iter().any(|c| c == name) {
            continue;
        }
        calls.push(name.to_string());
    }
    calls
}

/// TODO, FIXME and NOTE line comments, then JSDoc blocks
pub fn extract_comments(content: &str) -> Vec<Comment> {
    let line_kinds: [(&Regex, CommentKind); 3] = [
        (&TODO_RE, CommentKind::Todo),
        (&FIXME_RE, CommentKind::Fixme),
        (&NOTE_RE, CommentKind::Note),
    ];

    let mut comments = Vec::new();
    for (re, kind) in line_kinds {
        for cap in re.captures_iter(content) {
            comments.push(Comment {
                kind,
                text: cap[1].trim_end().to_string(),
            });
        }
    }
    for m in JSDOC_RE.find_iter(content) {
        comments.push(Comment {
            kind: CommentKind::JsDoc,
            text: m.as_str().to_string(),
        });
    }
    comments
}

/// `test('...')`, `it('...')` and `describe('...')` names
pub fn extract_tests(content: &str) -> Vec<TestCase> {
    TEST_CASE_RE
        .captures_iter(content)
        .map(|cap| TestCase {
            name: cap[1].to_string(),
            kind: TestKind::Unit,
        })
        .collect()
}

/// Static imports, then `require` targets, then exported names
pub fn extract_module_facts(content: &str) -> ModuleFacts {
    let imports = IMPORT_RE
        .captures_iter(content)
        .chain(REQUIRE_RE.captures_iter(content))
        .map(|cap| cap[1].to_string())
        .collect();
    let exports = EXPORT_RE
        .captures_iter(content)
        .map(|cap| cap[1].to_string())
        .collect();
    ModuleFacts { imports, exports }
}

/// Express-style `app.<verb>('/path'` and `router.<verb>('/path'` calls
pub fn extract_routes(content: &str) -> Vec<Route> {
    APP_ROUTE_RE
        .captures_iter(content)
        .chain(ROUTER_ROUTE_RE.captures_iter(content))
        .map(|cap| Route {
            method: cap[1].to_uppercase(),
            path: cap[2].to_string(),
        })
        .collect()
}
