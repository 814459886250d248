use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::{tempdir, TempDir};

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../docs/fixtures/sample_tracks.csv")
        .canonicalize()
        .expect("fixture tracks present")
}

fn cli() -> Command {
    let mut cmd = cargo_bin_cmd!("shiproute");
    cmd.env("RUST_LOG", "error");
    cmd
}

/// Store the fixture and splice its crossings in, returning the graph path.
fn prepared_graph() -> (PathBuf, TempDir) {
    let temp = tempdir().expect("create temp dir");
    let graph = temp.path().join("tracks.srg");
    cli()
        .args(["store", "--input"])
        .arg(fixture_path())
        .arg("--output")
        .arg(&graph)
        .assert()
        .success();
    cli()
        .args(["intersect", "--graph"])
        .arg(&graph)
        .assert()
        .success();
    (graph, temp)
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).expect("output file written")
}

#[test]
fn store_reports_ingested_rows() {
    let temp = tempdir().unwrap();
    let graph = temp.path().join("tracks.srg");
    let counts = temp.path().join("shiptypes.txt");

    cli()
        .args(["store", "--input"])
        .arg(fixture_path())
        .arg("--output")
        .arg(&graph)
        .arg("--shiptype-counts")
        .arg(&counts)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Read 10 rows (1 skipped): 9 nodes, 5 edges, 4 paths",
        ));

    assert!(graph.exists());
    assert_eq!(read(&counts), "70 3\n80 1\n");
}

#[test]
fn store_can_split_by_shiptype() {
    let temp = tempdir().unwrap();
    let graph = temp.path().join("tracks.srg");
    let split = temp.path().join("split");

    cli()
        .args(["store", "--input"])
        .arg(fixture_path())
        .arg("--output")
        .arg(&graph)
        .arg("--split-dir")
        .arg(&split)
        .assert()
        .success();

    assert!(split.join("tracks_70.srg").exists());
    assert!(split.join("tracks_80.srg").exists());
}

#[test]
fn intersect_writes_per_path_counts() {
    let temp = tempdir().unwrap();
    let graph = temp.path().join("tracks.srg");
    let counts = temp.path().join("crossings.txt");
    cli()
        .args(["store", "--input"])
        .arg(fixture_path())
        .arg("--output")
        .arg(&graph)
        .assert()
        .success();

    cli()
        .args(["intersect", "--graph"])
        .arg(&graph)
        .arg("--counts")
        .arg(&counts)
        .assert()
        .success()
        .stdout(predicate::str::contains("Added 1 crossing nodes from 1 tested pairs"));

    assert_eq!(read(&counts), "0 1\n1 1\n2 0\n3 0\n");
}

#[test]
fn info_reports_intersected_graph_as_json() {
    let (graph, _temp) = prepared_graph();
    let output = cli()
        .args(["--format", "json", "info", "--graph"])
        .arg(&graph)
        .output()
        .expect("command runs");
    assert!(output.status.success());

    let info: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(info["nodes"], 10);
    assert_eq!(info["edges"], 7);
    assert_eq!(info["paths"], 4);
    assert_eq!(info["crossed"], true);
    assert_eq!(info["shiptypes"]["70"], 3);
}

#[test]
fn route_crosses_between_trajectories() {
    let (graph, temp) = prepared_graph();
    let route_file = temp.path().join("route.txt");
    let control_file = temp.path().join("control.txt");

    cli()
        .args(["route", "--graph"])
        .arg(&graph)
        .args(["--from", "0,0", "--to", "0.8,0", "--heuristic", "zero"])
        .arg("--route-file")
        .arg(&route_file)
        .arg("--control-file")
        .arg(&control_file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Total travel time: 5580.000 s over 2 hops"));

    let route = read(&route_file);
    let lines: Vec<&str> = route.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "id = 0 | 0 | 0 | travelling_time = Source");
    assert!(lines[1].starts_with("id = 9 | 0.4 | 0.4 | travelling_time ="));
    assert_eq!(lines[2], "id = 4 | 0.8 | 0 | travelling_time = 5580.000");

    let control = read(&control_file);
    assert!(control.starts_with("nnodes_path,next,npq\n3,"));
    assert!(control.contains("Nodes in path\n0,0\n"));
}

#[test]
fn route_json_marks_source_record() {
    let (graph, _temp) = prepared_graph();
    let output = cli()
        .args(["--format", "json", "route", "--graph"])
        .arg(&graph)
        .args(["--path", "3", "--queue", "ordered-list"])
        .output()
        .expect("command runs");
    assert!(output.status.success());

    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(summary["queue"], "ordered-list");
    assert_eq!(summary["hops"], 1);
    assert_eq!(summary["records"][0]["cost"], "source");
    assert_eq!(summary["total_time_seconds"], 10800.5);
}

#[test]
fn route_requires_endpoints() {
    let (graph, _temp) = prepared_graph();
    cli()
        .args(["route", "--graph"])
        .arg(&graph)
        .assert()
        .failure()
        .stderr(predicate::str::contains("pass either --from and --to, or --path"));
}

#[test]
fn unreachable_route_fails() {
    let (graph, _temp) = prepared_graph();
    cli()
        .args(["route", "--graph"])
        .arg(&graph)
        .args(["--from", "10.5,10.2", "--to", "10,10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no route found"));
}

#[test]
fn filter_refuses_intersected_graphs() {
    let (graph, temp) = prepared_graph();
    cli()
        .args(["filter", "--graph"])
        .arg(&graph)
        .arg("--output")
        .arg(temp.path().join("filtered.srg"))
        .args(["--min-separation-km", "100"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not been intersected"));
}

#[test]
fn filter_drops_short_trips_before_intersecting() {
    let temp = tempdir().unwrap();
    let graph = temp.path().join("tracks.srg");
    let filtered = temp.path().join("filtered.srg");
    cli()
        .args(["store", "--input"])
        .arg(fixture_path())
        .arg("--output")
        .arg(&graph)
        .assert()
        .success();

    cli()
        .args(["filter", "--graph"])
        .arg(&graph)
        .arg("--output")
        .arg(&filtered)
        .args(["--min-separation-km", "100"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Paths: 3"));
}

#[test]
fn benchmark_writes_metrics_files() {
    let (graph, temp) = prepared_graph();
    let heuristic_csv = temp.path().join("heuristic.csv");
    let queue_csv = temp.path().join("queue.csv");

    cli()
        .args(["benchmark", "--graph"])
        .arg(&graph)
        .arg("--heuristic-metrics")
        .arg(&heuristic_csv)
        .arg("--queue-metrics")
        .arg(&queue_csv)
        .assert()
        .success()
        .stdout(predicate::str::contains("Benchmarked 4 trajectories"));

    let heuristic = read(&heuristic_csv);
    assert!(heuristic.starts_with("PATH ID,SEPARATION [km],SOLUTION COST LL [s]"));
    assert_eq!(heuristic.lines().count(), 5);
    let queue = read(&queue_csv);
    assert!(queue.contains("REQUEUE TIME BH [s]"));
    assert_eq!(queue.lines().count(), 5);
}

#[test]
fn missing_graph_reports_context() {
    let temp = tempdir().unwrap();
    cli()
        .args(["info", "--graph"])
        .arg(temp.path().join("absent.srg"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load graph from"));
}
