use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};
use tempfile::tempdir;
use twohundred_bench::config::BenchmarkConfig;
use twohundred_bench::tournament::{RunSummary, TournamentRunner};

fn load_config(output_dir: &Path, seed: u64) -> BenchmarkConfig {
    let yaml = format!(
        r#"
run_id: "test_smoke"
matches:
  seed: {seed}
  count: 4
  swap_sides: true
teams:
  - name: "greedy"
    kind: "heuristic"
    params:
      difficulty: "normal"
  - name: "coin"
    kind: "random"
    params:
      bid_chance: 0.3
outputs:
  jsonl: "{jsonl}"
  summary_md: "{summary}"
logging:
  enable_structured: false
"#,
        jsonl = output_dir.join("matches.jsonl").display(),
        summary = output_dir.join("summary.md").display(),
    );

    let mut cfg: BenchmarkConfig = serde_yaml::from_str(&yaml).expect("valid yaml");
    cfg.validate().expect("config validates");
    cfg
}

fn run(output_dir: &Path, seed: u64) -> RunSummary {
    let config = load_config(output_dir, seed);
    let outputs = config.resolved_outputs();
    let runner = TournamentRunner::new(config, outputs).expect("runner created");
    runner.run().expect("matches complete")
}

/// JSONL rows with the wall-clock field zeroed, hashed.
fn normalized_digest(jsonl_path: &Path) -> String {
    let jsonl = fs::read_to_string(jsonl_path).expect("jsonl readable");
    let mut normalized = String::new();
    for line in jsonl.lines() {
        let mut value: serde_json::Value = serde_json::from_str(line).expect("row decodes to JSON");
        if let Some(obj) = value.as_object_mut()
            && let Some(elapsed) = obj.get_mut("elapsed_ms")
        {
            *elapsed = serde_json::Value::from(0);
        }
        normalized.push_str(&serde_json::to_string(&value).expect("re-serialize normalized row"));
        normalized.push('\n');
    }

    let mut hasher = Sha256::new();
    hasher.update(normalized.as_bytes());
    hex::encode(hasher.finalize())
}

#[test]
fn smoke_run_writes_one_row_per_match_and_a_summary() {
    let dir = tempdir().expect("temp dir");
    let summary = run(dir.path(), 4242);

    assert_eq!(summary.matches_played, 4);
    assert_eq!(summary.rows_written, 4);
    assert!(summary.telemetry_path.is_none());

    let jsonl = fs::read_to_string(&summary.jsonl_path).expect("jsonl readable");
    let rows: Vec<serde_json::Value> = jsonl
        .lines()
        .map(|line| serde_json::from_str(line).expect("row decodes"))
        .collect();
    assert_eq!(rows.len(), 4);

    // Sides alternate between matches.
    assert_eq!(rows[0]["north_south"], "greedy");
    assert_eq!(rows[1]["north_south"], "coin");
    for row in &rows {
        let scores = row["scores"].as_array().expect("scores array");
        assert!(scores.iter().any(|s| s.as_i64().unwrap_or(0) >= 200));
        let winner = row["winner"].as_str().expect("winner name");
        assert!(winner == "greedy" || winner == "coin");
    }

    let total_wins: u32 = summary.wins.iter().map(|(_, wins)| wins).sum();
    assert_eq!(total_wins, 4);

    let markdown = fs::read_to_string(&summary.summary_path).expect("summary markdown");
    assert!(markdown.contains("| greedy | Heuristic | 4 |"));
    assert!(markdown.contains("| coin | Random | 4 |"));
}

#[test]
fn same_seed_reproduces_identical_rows() {
    let first = tempdir().expect("temp dir");
    let second = tempdir().expect("temp dir");
    let a = run(first.path(), 77);
    let b = run(second.path(), 77);
    assert_eq!(
        normalized_digest(&a.jsonl_path),
        normalized_digest(&b.jsonl_path),
        "rows differ between runs with the same seed"
    );
}
