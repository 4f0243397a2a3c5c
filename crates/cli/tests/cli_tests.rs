// Integration tests for the `teamrank` binary: exit codes, JSON contract,
// interactive mode.
// Run with: cargo test -p teamrank-cli --test cli_tests -- --nocapture

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

fn teamrank() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_teamrank"));
    cmd.current_dir(env!("CARGO_MANIFEST_DIR"));
    cmd.env_remove("TEAMRANK_TOP");
    cmd.env_remove("RUST_LOG");
    cmd
}

// Shares the five-source fixture with the merge crate
fn config_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../merge/tests/fixtures/teamrank.toml")
}

fn run(args: &[&str]) -> Output {
    teamrank().args(args).output().expect("run teamrank")
}

fn query_json(team: &str, extra: &[&str]) -> (Output, serde_json::Value) {
    let config = config_path();
    let mut args = vec!["query", config.to_str().unwrap(), team, "--json"];
    args.extend_from_slice(extra);
    let output = run(&args);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    (output, json)
}

fn view_ids(json: &serde_json::Value, view: usize) -> Vec<String> {
    json["views"][view]["entries"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["user_id"].as_str().unwrap().to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// query
// ---------------------------------------------------------------------------

#[test]
fn query_exact_team_json() {
    let (output, json) = query_json("Engineering", &[]);
    assert!(output.status.success(), "exit code was {:?}", output.status);

    assert_eq!(json["status"], "ranked");
    assert_eq!(json["team"], "engineering");
    assert_eq!(json["display_name"], "Engineering");
    assert_eq!(json["fuzzy"], false);
    assert_eq!(json["views"][0]["score"], "okr");
    assert_eq!(json["views"][1]["score"], "kpi");
    assert_eq!(json["views"][2]["score"], "manager");

    // Ties (4.5) keep merged-table order
    assert_eq!(view_ids(&json, 0), vec!["1", "4", "2"]);
    assert_eq!(view_ids(&json, 1), vec!["2", "4", "1"]);
    assert_eq!(view_ids(&json, 2), vec!["2", "1", "4"]);

    let top = &json["views"][1]["entries"][0];
    assert_eq!(top["full_name"], "Bob Lim");
    assert_eq!(top["score"], 91.0);
    assert_eq!(top["year_of_service"], 2.0);
}

#[test]
fn query_typo_resolves_fuzzily() {
    let (output, json) = query_json("  enginering ", &["--top", "1"]);
    assert!(output.status.success());
    assert_eq!(json["team"], "engineering");
    assert_eq!(json["fuzzy"], true);
    for view in 0..3 {
        assert_eq!(view_ids(&json, view).len(), 1);
    }
}

#[test]
fn query_top_from_env() {
    let config = config_path();
    let output = teamrank()
        .env("TEAMRANK_TOP", "2")
        .args(["query", config.to_str().unwrap(), "engineering", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(view_ids(&json, 0).len(), 2);
}

#[test]
fn query_unknown_team_exits_6() {
    let (output, json) = query_json("xyzzyzzy", &[]);
    assert_eq!(output.status.code(), Some(6));
    assert_eq!(json["status"], "not_found");
    assert_eq!(json["reason"], "no_match");
    assert_eq!(json["suggestions"].as_array().unwrap().len(), 0);
}

#[test]
fn query_human_output() {
    let config = config_path();
    let output = run(&["query", config.to_str().unwrap(), "sales"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("Top employees in team 'Sales':"));
    assert!(stdout.contains("Top Employees Ranked by Average OKR Score"));
    assert!(stdout.contains("Top Employees Ranked by Average Manager Score"));
    assert!(stdout.contains("Cara Ong"));
    assert!(stdout.contains("Fay Goh"));
}

#[test]
fn query_not_found_human_output() {
    let config = config_path();
    let output = run(&["query", config.to_str().unwrap(), "xyzzyzzy"]);
    assert_eq!(output.status.code(), Some(6));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(
        stdout,
        "No employees found for team 'xyzzyzzy'.\nNo similar team names found.\n"
    );
    assert!(output.stderr.is_empty(), "no error line for a soft miss");
}

#[test]
fn query_suggestions_with_relaxed_cutoff() {
    let dir = tempfile::tempdir().unwrap();
    let fixtures = config_path().parent().unwrap().to_path_buf();
    let base = std::fs::read_to_string(config_path()).unwrap();
    // Point sources back at the fixture directory
    let toml = base.replace("file = \"", &format!("file = \"{}/", fixtures.display()))
        + "\n[ranking]\nsuggestion_cutoff = 0.3\n";
    let config = dir.path().join("relaxed.toml");
    std::fs::write(&config, toml).unwrap();

    let output = run(&["query", config.to_str().unwrap(), "slack", "--json"]);
    assert_eq!(output.status.code(), Some(6));
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["suggestions"], serde_json::json!(["sales"]));
}

// ---------------------------------------------------------------------------
// ask
// ---------------------------------------------------------------------------

#[test]
fn ask_answers_each_line_until_quit() {
    let config = config_path();
    let mut child = teamrank()
        .args(["ask", config.to_str().unwrap()])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"sales\n\nxyzzyzzy\nquit\nengineering\n")
        .unwrap();
    let output = child.wait_with_output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Top employees in team 'Sales':"));
    assert!(stdout.contains("Please enter a team name."));
    assert!(stdout.contains("No similar team names found."));
    assert!(!stdout.contains("team 'Engineering'"), "input after quit is ignored");
}

#[test]
fn ask_stops_at_eof() {
    let config = config_path();
    let mut child = teamrank()
        .args(["ask", config.to_str().unwrap()])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child.stdin.take().unwrap().write_all(b"marketing").unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Eve Ng"));
}

// ---------------------------------------------------------------------------
// merge
// ---------------------------------------------------------------------------

#[test]
fn merge_csv_has_one_row_per_employee() {
    let config = config_path();
    let output = run(&["merge", config.to_str().unwrap()]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 10);
    assert!(lines[0].starts_with("user_id,full_name,team_name,average_okr_score"));
    assert!(lines[1].starts_with("1,Alice Tan,Engineering,4.5,78.0,4.0,5.0,2.0,1.0"));
}

#[test]
fn merge_json_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("merged.json");
    let config = config_path();
    let output = run(&["merge", config.to_str().unwrap(), "--json", "--output", out.to_str().unwrap()]);
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(json["employee_count"], 9);
    assert_eq!(json["sources"].as_array().unwrap().len(), 5);
    assert_eq!(json["employees"][7]["user_id"], "8");
    assert_eq!(json["employees"][7]["full_name"], serde_json::Value::Null);
    assert_eq!(json["employees"][7]["average_okr_score"], 0.0);
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

#[test]
fn missing_config_exits_3() {
    let output = run(&["query", "does-not-exist.toml", "sales"]);
    assert_eq!(output.status.code(), Some(3));
    assert!(String::from_utf8_lossy(&output.stderr).contains("cannot read config"));
}

#[test]
fn missing_source_exits_4_and_names_it() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.csv"), "user_id,team_name\n1,Sales\n").unwrap();
    let config = dir.path().join("teamrank.toml");
    std::fs::write(
        &config,
        "name = \"t\"\n[[sources]]\nname = \"a\"\nfile = \"a.csv\"\n[[sources]]\nname = \"ghost\"\nfile = \"ghost.csv\"\n",
    )
    .unwrap();

    let output = run(&["query", config.to_str().unwrap(), "sales"]);
    assert_eq!(output.status.code(), Some(4));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("source 'ghost'"));
    assert!(output.stdout.is_empty(), "no partial result");
}

#[test]
fn missing_key_exits_5() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.csv"), "id,team_name\n1,Sales\n").unwrap();
    let config = dir.path().join("teamrank.toml");
    std::fs::write(&config, "name = \"t\"\n[[sources]]\nname = \"a\"\nfile = \"a.csv\"\n").unwrap();

    let output = run(&["merge", config.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(5));
    assert!(String::from_utf8_lossy(&output.stderr).contains("missing key column 'user_id'"));
}

#[test]
fn validate_reports_bad_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("teamrank.toml");
    std::fs::write(&config, "name = \"t\"\nsources = []\n").unwrap();
    let output = run(&["validate", config.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(3));

    let ok = run(&["validate", config_path().to_str().unwrap()]);
    assert!(ok.status.success());
    assert!(String::from_utf8_lossy(&ok.stderr).contains("5 source(s)"));
}
