//! E2E workflow tests: `dg init` → `dg import` → `dg render` / `dg options`.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;

const TICKETS: &str = r#"{
  "tickets": [
    {"id": 1, "summary": "Design schema", "status": "closed", "milestone": "1.0"},
    {"id": 2, "summary": "Write migration", "milestone": "1.0"},
    {"id": 3, "summary": "Ship it", "priority": "critical", "milestone": "2.0"},
    {"id": 4, "summary": "Announce"}
  ],
  "links": [
    {"blocking": 1, "blocked": 2},
    {"blocking": 2, "blocked": 3},
    {"blocking": 3, "blocked": 4}
  ]
}"#;

fn dg_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("dg"));
    cmd.current_dir(dir);
    cmd.env("DEPGRAPH_LOG", "error");
    cmd.env("XDG_CONFIG_HOME", dir.join("xdg"));
    cmd.env("HOME", dir);
    cmd.env_remove("DEPGRAPH_DB");
    cmd
}

fn seeded_project() -> TempDir {
    let dir = TempDir::new().expect("tempdir");
    dg_cmd(dir.path()).arg("init").assert().success();
    std::fs::write(dir.path().join("tickets.json"), TICKETS).expect("write tickets");
    dg_cmd(dir.path())
        .args(["import", "tickets.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 4 tickets and 3 links"));
    dir
}

fn render(dir: &Path, args: &[&str]) -> String {
    let output = dg_cmd(dir)
        .arg("render")
        .args(args)
        .output()
        .expect("render should not crash");
    assert!(
        output.status.success(),
        "render failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).expect("utf-8 output")
}

#[test]
fn init_creates_database() {
    let dir = TempDir::new().expect("tempdir");
    dg_cmd(dir.path())
        .args(["init", "--db", "data/tickets.db"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created ticket database"));
    assert!(dir.path().join("data/tickets.db").exists());

    dg_cmd(dir.path())
        .args(["init", "--db", "data/tickets.db"])
        .assert()
        .success()
        .stdout(predicate::str::contains("up to date (0 tickets, schema v1)"));
}

#[test]
fn render_wraps_graph_in_wiki_block() {
    let dir = seeded_project();
    let out = render(dir.path(), &[]);

    assert!(out.starts_with("{{{\n#!graphviz\ndigraph "), "{out}");
    assert!(out.ends_with("}\n}}}\n"), "{out}");
    assert!(out.contains("ticket1 -> ticket2 [style=\"dashed\""));
    assert!(out.contains("ticket2 -> ticket3\n"));
    assert!(out.contains("URL=\"/ticket/4\""));
    assert!(out.contains("label=\"{#3|Ship it}\""));
    assert!(out.contains("subgraph cluster_1 {"));
}

#[test]
fn dot_format_prints_bare_graph() {
    let dir = seeded_project();
    let out = render(
        dir.path(),
        &["--format", "dot", "--base-url", "https://tracker.example/t/"],
    );

    assert!(out.starts_with("digraph "), "{out}");
    assert!(!out.contains("{{{"));
    assert!(out.contains("URL=\"https://tracker.example/t/2\""));
}

#[test]
fn milestone_filter_and_label_overrides() {
    let dir = seeded_project();
    let out = render(
        dir.path(),
        &[
            "--content",
            "milestone=1.0, label=Release one",
            "show_ticket_number=0",
        ],
    );

    assert!(out.contains("label=\"Release one\""), "{out}");
    assert!(out.contains("ticket2 [URL=\"/ticket/2\", label=\"Write migration\""));
    assert!(!out.contains("ticket3"));
    assert!(!out.contains("shape=\"record\""));
}

#[test]
fn debug_option_echoes_source() {
    let dir = seeded_project();
    let out = render(dir.path(), &["debug=1"]);
    assert_eq!(out.matches("digraph ").count(), 2, "{out}");
    assert_eq!(out.matches("#!graphviz").count(), 1);
}

#[test]
fn dangling_link_prints_failure_text() {
    let dir = seeded_project();
    std::fs::write(
        dir.path().join("dangling.json"),
        r#"{"links": [{"blocking": 4, "blocked": 404}]}"#,
    )
    .expect("write links");
    dg_cmd(dir.path())
        .args(["import", "dangling.json"])
        .assert()
        .success();

    dg_cmd(dir.path())
        .arg("render")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("DepGraph E2001:"))
        .stdout(predicate::str::contains("#404"))
        .stdout(predicate::str::contains("digraph").not());

    dg_cmd(dir.path())
        .args(["render", "--strict"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("#404"));
}

#[test]
fn invalid_option_value_prints_failure_text() {
    let dir = seeded_project();
    dg_cmd(dir.path())
        .args(["render", "fontsize=huge"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("DepGraph E1002:"))
        .stdout(predicate::str::contains("fontsize"));
}

#[test]
fn render_requires_initialized_database() {
    let dir = TempDir::new().expect("tempdir");
    dg_cmd(dir.path())
        .arg("render")
        .assert()
        .failure()
        .stderr(predicate::str::contains("dg init"));
    assert!(!dir.path().join("depgraph.db").exists());
}

#[test]
fn render_leaves_an_uninitialized_file_untouched() {
    let dir = TempDir::new().expect("tempdir");
    let db = dir.path().join("depgraph.db");
    std::fs::write(&db, b"").expect("create empty file");

    dg_cmd(dir.path())
        .arg("render")
        .assert()
        .failure()
        .stderr(predicate::str::contains("dg init"));
    assert_eq!(std::fs::metadata(&db).expect("db metadata").len(), 0);
}

#[test]
fn options_merge_config_content_and_args() {
    let dir = TempDir::new().expect("tempdir");
    std::fs::write(
        dir.path().join("depgraph.toml"),
        "fontsize = 9\nshow_ticket_number = false\nclosed_color = \"gray\"\n",
    )
    .expect("write config");

    let output = dg_cmd(dir.path())
        .args([
            "options",
            "--config",
            "depgraph.toml",
            "--content",
            "fontsize=10, milestone=Beta|1.0",
            "fontsize=14",
        ])
        .output()
        .expect("options should not crash");
    assert!(
        output.status.success(),
        "options failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let json: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(json["fontsize"], 14);
    assert_eq!(json["show_ticket_number"], false);
    assert_eq!(json["closed"]["color"], "gray");
    assert_eq!(json["closed"]["linkcolor"], "#4ECDC4");
    assert_eq!(json["milestone"], serde_json::json!(["1.0", "beta"]));
}

#[test]
fn user_config_file_is_picked_up() {
    let dir = TempDir::new().expect("tempdir");
    let config_dir = dir.path().join("xdg/depgraph");
    std::fs::create_dir_all(&config_dir).expect("create config dir");
    std::fs::write(config_dir.join("config.toml"), "word_wrap_char_limit = 12\n")
        .expect("write config");

    let output = dg_cmd(dir.path())
        .arg("options")
        .output()
        .expect("options should not crash");
    let json: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(json["word_wrap_char_limit"], 12);
}

#[test]
fn invalid_option_fails_options_command() {
    let dir = TempDir::new().expect("tempdir");
    dg_cmd(dir.path())
        .args(["options", "word_wrap_char_limit=0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("word_wrap_char_limit"));
}
