use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::{tempdir, TempDir};

fn setup_repo() -> TempDir {
    let temp = tempdir().unwrap();
    let root = temp.path();
    fs::create_dir_all(root.join("src/routes")).unwrap();
    fs::create_dir_all(root.join("test")).unwrap();
    fs::create_dir_all(root.join("node_modules/left-pad")).unwrap();

    fs::write(
        root.join("package.json"),
        r#"{"name":"shop","version":"1.0.0","dependencies":{"express":"^4","jquery":"^3"}}"#,
    )
    .unwrap();
    fs::write(
        root.join("auth.js"),
        "import db from 'db.js';\n// TODO: rate limit\nexport function login(user, password) {\n  if (!user) { return null; }\n  return db.find(user);\n}\n",
    )
    .unwrap();
    fs::write(root.join("db.js"), "export const find = (id) => id;\n").unwrap();
    fs::write(
        root.join("src/routes/users.js"),
        "router.get('/users', list);\nrouter.post('/users', create);\n",
    )
    .unwrap();
    fs::write(root.join("test/auth.test.js"), "test('login works', () => {});\n").unwrap();
    fs::write(root.join("node_modules/left-pad/index.js"), "module.exports = 1;\n").unwrap();
    temp
}

fn nexus(config_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("nexus-ctx").unwrap();
    cmd.env("NEXUS_CTX_CONFIG", config_dir.join("missing.toml"))
        .env_remove("RUST_LOG");
    cmd
}

fn json_stdout(cmd: &mut Command) -> Value {
    let output = cmd.output().unwrap();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

#[test]
fn test_context_ranks_named_file_first() {
    let repo = setup_repo();
    let body = json_stdout(
        nexus(repo.path())
            .arg("context")
            .arg("fix the login bug in auth.js")
            .arg("--path")
            .arg(repo.path())
            .arg("--compact"),
    );

    assert_eq!(body["intent"]["type"], "debugging");
    assert_eq!(body["relevant_files"][0]["path"], "auth.js");
    assert_eq!(body["project"]["framework"], "Express");
    assert_eq!(body["over_budget"], false);

    let paths: Vec<&str> = body["relevant_files"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|f| f["path"].as_str())
        .collect();
    assert!(!paths.iter().any(|p| p.starts_with("node_modules")));
}

#[test]
fn test_context_replays_history_and_honors_flags() {
    let repo = setup_repo();
    let history = repo.path().join("history.json");
    fs::write(
        &history,
        r#"[{"query":"refactor auth module","response":"switched to async/await","filesModified":["auth.js"]}]"#,
    )
    .unwrap();

    let body = json_stdout(
        nexus(repo.path())
            .args(["context", "refactor the auth module", "--no-analysis"])
            .arg("--path")
            .arg(repo.path())
            .arg("--history")
            .arg(&history)
            .args(["--focus", "auth"]),
    );

    assert!(body.get("analysis").is_none());
    assert_eq!(body["focus"], "auth");
    assert_eq!(body["memory"]["preferences"]["prefer_async"], true);
    assert_eq!(
        body["memory"]["recent_conversations"].as_array().unwrap().len(),
        1
    );
}

#[test]
fn test_analyze_json() {
    let repo = setup_repo();
    let body = json_stdout(nexus(repo.path()).arg("analyze").arg(repo.path()).arg("--json"));

    assert_eq!(body["metadata"]["name"], "shop");
    assert_eq!(body["structure"]["routes"].as_array().unwrap().len(), 2);
    assert!(body["analysis"]["dependencies"]["db.js"]["dependents"]
        .as_array()
        .unwrap()
        .iter()
        .any(|d| d == "auth.js"));
}

#[test]
fn test_health_json() {
    let repo = setup_repo();
    let body = json_stdout(nexus(repo.path()).arg("health").arg(repo.path()).arg("--json"));

    let score = body["score"].as_u64().unwrap();
    assert!(score <= 100);
    assert!(body["risks"]
        .as_array()
        .unwrap()
        .iter()
        .any(|r| r["area"] == "Dependencies"));
}

#[test]
fn test_analyze_pretty_output() {
    let repo = setup_repo();
    nexus(repo.path())
        .arg("analyze")
        .arg(repo.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Files Loaded"));
}

#[test]
fn test_info() {
    let repo = setup_repo();
    nexus(repo.path())
        .arg("info")
        .assert()
        .success()
        .stdout(predicate::str::contains("nexus-ctx v"));
}

#[test]
fn test_invalid_path_fails() {
    let repo = setup_repo();
    nexus(repo.path())
        .args(["context", "anything", "--path"])
        .arg(repo.path().join("does-not-exist"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid path"));
}
