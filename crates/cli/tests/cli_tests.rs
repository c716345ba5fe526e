//! CLI integration tests
use predicates::prelude::*;
use tempfile::TempDir;

fn cmd() -> assert_cmd::Command {
    assert_cmd::cargo::cargo_bin_cmd!("renderdot")
}

fn get_fixture_path(name: &str) -> String {
    format!("../../tests/fixtures/{}", name)
}

fn read_json(path: &std::path::Path) -> serde_json::Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_cli_output_file() {
    let tmp = TempDir::new().unwrap();
    let output = tmp.path().join("atomization").join("dep_graph.json");

    cmd()
        .args(["-o", output.to_str().unwrap()])
        .arg(get_fixture_path("dep_graph_document.html"))
        .assert()
        .success()
        .stderr(predicate::str::contains("Output written to"));

    let value = read_json(&output);
    let mut keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(keys, vec!["edge", "edges", "graph", "node", "node_info", "nodes"]);
    assert_eq!(value["node_info"].as_array().unwrap().len(), 3);
}

#[test]
fn test_cli_stdout_output() {
    cmd()
        .args(["-o", "-", &get_fixture_path("dep_graph_document.html")])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("{"))
        .stdout(predicate::str::contains(r#""id": "lem_identity->thm_lagrange""#));
}

#[test]
fn test_cli_stdin_input() {
    let html = std::fs::read_to_string(get_fixture_path("dep_graph_document.html")).unwrap();
    cmd()
        .args(["-q", "-o", "-", "-"])
        .write_stdin(html)
        .assert()
        .success()
        .stdout(predicate::str::contains("def_group"));
}

#[test]
fn test_cli_compact() {
    cmd()
        .args(["--compact", "-o", "-", &get_fixture_path("dep_graph_document.html")])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""bgcolor":"transparent""#))
        .stdout(predicate::str::is_match(r"^\{[^\n]*\}\n$").unwrap());
}

#[test]
fn test_cli_blueprint_format() {
    cmd()
        .args(["-f", "blueprint", "-o", "-", &get_fixture_path("dep_graph_document.html")])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""kind": "definition""#))
        .stdout(predicate::str::contains(r#""term-status": "can-prove""#));
}

#[test]
fn test_cli_summary() {
    cmd()
        .args(["-o", "-", &get_fixture_path("dep_graph_document.html")])
        .assert()
        .success()
        .stderr(predicate::str::contains("Graph Summary"))
        .stderr(predicate::str::contains("thm_lagrange"));
}

#[test]
fn test_cli_summary_shapes_and_parallel_edges() {
    let html = "<html><body><script>renderDot(`digraph { a [shape=box]; a; b; a -> b; a -> b }`)</script></body></html>";
    cmd()
        .args(["-o", "-", "-"])
        .write_stdin(html)
        .assert()
        .success()
        .stderr(predicate::str::contains("Distinct nodes:"))
        .stderr(predicate::str::contains("Shapes:"))
        .stderr(predicate::str::contains("box:"))
        .stderr(predicate::str::contains("ellipse:"))
        .stderr(predicate::str::contains("1 parallel edges: a->b (x2)"));
}

#[test]
fn test_cli_no_analysis() {
    cmd()
        .args(["--no-analysis", "-o", "-", &get_fixture_path("dep_graph_document.html")])
        .assert()
        .success()
        .stderr(predicate::str::contains("Graph Summary").not());
}

#[test]
fn test_cli_quiet() {
    cmd()
        .args(["-q", "-o", "-", &get_fixture_path("dep_graph_document.html")])
        .assert()
        .success()
        .stderr(predicate::str::is_empty());
}

#[test]
fn test_cli_verbose() {
    cmd()
        .args(["-v", "-o", "-", &get_fixture_path("dep_graph_document.html")])
        .assert()
        .success()
        .stderr(predicate::str::contains("renderdot"))
        .stderr(predicate::str::contains("Statements:"));
}

#[test]
fn test_cli_missing_input() {
    cmd()
        .arg("nonexistent.html")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("input not found"));
}

#[test]
fn test_cli_default_input_missing() {
    let tmp = TempDir::new().unwrap();
    cmd()
        .current_dir(tmp.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("blueprint/web/dep_graph_document.html"));
}

#[test]
fn test_cli_no_render_call() {
    cmd()
        .args(["-o", "-", &get_fixture_path("no_graph.html")])
        .assert()
        .code(3)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("no renderDot call"));
}

#[test]
fn test_cli_malformed_dot() {
    cmd()
        .args(["-o", "-", &get_fixture_path("malformed.html")])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("unterminated attribute list"));
}

#[test]
fn test_cli_unterminated_call() {
    cmd()
        .args(["-o", "-", &get_fixture_path("unterminated_call.html")])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("malformed input"));
}

#[test]
fn test_cli_failure_writes_no_output() {
    let tmp = TempDir::new().unwrap();
    let output = tmp.path().join("dep_graph.json");

    cmd()
        .args(["-o", output.to_str().unwrap(), &get_fixture_path("no_graph.html")])
        .assert()
        .failure();

    assert!(!output.exists());
}

#[test]
fn test_cli_completions() {
    cmd()
        .args(["--completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("renderdot"));
}

#[test]
fn test_cli_invalid_format() {
    cmd()
        .args(["-f", "yaml", &get_fixture_path("dep_graph_document.html")])
        .assert()
        .failure();
}
