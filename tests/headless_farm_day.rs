use std::path::PathBuf;
use std::process::Command;

fn repo_path(rel: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(rel)
}

fn run_farm_day(seed: u64, event_log: &std::path::Path) -> serde_json::Value {
    let bin = env!("CARGO_BIN_EXE_voxfarm");
    let output = Command::new(bin)
        .args([
            "--config",
            repo_path("config/voxfarm.toml").to_str().unwrap(),
            "--script",
            repo_path("demos/farm_day.json").to_str().unwrap(),
            "--seed",
            &seed.to_string(),
            "--max-ticks",
            "1300",
            "--event-log",
            event_log.to_str().unwrap(),
        ])
        .output()
        .expect("run voxfarm");
    assert!(
        output.status.success(),
        "voxfarm failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("summary json on stdout")
}

#[test]
fn farm_day_script_produces_expected_summary() {
    let dir = tempfile::tempdir().expect("tempdir");
    let log = dir.path().join("events.jsonl");
    let summary = run_farm_day(7, &log);
    let counters = &summary["counters"];

    assert_eq!(summary["ticks"], 1300);
    assert_eq!(counters["commands"], 17);
    assert_eq!(counters["commands.failed"], 0);
    assert_eq!(counters["block.farmland"], 3);
    assert_eq!(counters["block.water"], 1);
    assert_eq!(counters["block.water_source"], 1);
    assert_eq!(counters["block.air"], 1);
    assert_eq!(counters["block.grass"], 64 * 64 - 6);
    assert_eq!(counters["crops"], 0);
    // three harvests plus the broken grass block, all out of pickup range
    assert_eq!(counters["drops"], 4);
    assert_eq!(counters["item.seeds_wheat"], 2);
    assert_eq!(counters["item.bucket_empty"], 1);

    let contents = std::fs::read_to_string(&log).expect("event log");
    let harvested = contents
        .lines()
        .filter(|line| line.contains("Harvested"))
        .count();
    assert_eq!(harvested, 3);
    assert!(contents.lines().last().unwrap_or("").contains("\"summary\""));
}

#[test]
fn farm_day_is_deterministic_per_seed() {
    let dir = tempfile::tempdir().expect("tempdir");
    let a = run_farm_day(99, &dir.path().join("a.jsonl"));
    let b = run_farm_day(99, &dir.path().join("b.jsonl"));
    assert_eq!(a, b);
    assert_eq!(
        std::fs::read_to_string(dir.path().join("a.jsonl")).unwrap(),
        std::fs::read_to_string(dir.path().join("b.jsonl")).unwrap()
    );
}
