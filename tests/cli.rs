use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

fn leadgrid(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("leadgrid").expect("binary");
    cmd.env_remove("LEADGRID_URL")
        .env_remove("LEADGRID_API_KEY")
        .env("NO_COLOR", "1")
        .arg("--config-dir")
        .arg(config_dir.path());
    cmd
}

fn export() -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    write!(
        file,
        r#"{{"data": [
            {{"listing_id": "L1", "street": "1 Oak St", "city": "Austin", "state": "TX", "list_price": 300000, "status": "Active", "active": true}},
            {{"listing_id": "L2", "street": "2 Elm St", "city": "Dallas", "state": "TX", "list_price": 100000, "status": "Pending"}},
            {{"listing_id": "L3", "street": "3 Ash St", "city": "Austin", "state": "TX", "list_price": 200000, "status": "Active", "active": true}}
        ]}}"#
    )
    .expect("write export");
    file
}

#[test]
fn test_page_from_file_prints_summary() {
    let dir = TempDir::new().expect("temp dir");
    let file = export();

    leadgrid(&dir)
        .args(["page", "--sort", "price_low", "--page-size", "2", "--file"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Showing 1-2 of 3 listings (Page 1 of 2)",
        ));
}

#[test]
fn test_page_sort_orders_rows() {
    let dir = TempDir::new().expect("temp dir");
    let file = export();

    let output = leadgrid(&dir)
        .args(["page", "--sort", "price_low", "--page-size", "2", "--json", "--file"])
        .arg(file.path())
        .output()
        .expect("run");

    assert!(output.status.success());
    let body: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    let ids: Vec<&str> = body["rows"]
        .as_array()
        .expect("rows")
        .iter()
        .filter_map(|row| row["listing_id"].as_str())
        .collect();
    assert_eq!(ids, vec!["L2", "L3"]);
    assert_eq!(body["total_pages"], 2);
}

#[test]
fn test_page_filters_and_json_output() {
    let dir = TempDir::new().expect("temp dir");
    let file = export();

    let output = leadgrid(&dir)
        .args(["page", "--city", "Austin", "--min-price", "250,000", "--json", "--file"])
        .arg(file.path())
        .output()
        .expect("run");

    assert!(output.status.success());
    let body: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(body["total_count"], 1);
    assert_eq!(body["rows"][0]["listing_id"], "L1");
    assert_eq!(body["rows"][0]["is_selected"], false);
}

#[test]
fn test_embedded_page_omits_summary() {
    let dir = TempDir::new().expect("temp dir");
    let file = export();

    leadgrid(&dir)
        .args(["page", "--embedded", "--file"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Showing").not());
}

#[test]
fn test_page_past_the_end_is_empty() {
    let dir = TempDir::new().expect("temp dir");
    let file = export();

    leadgrid(&dir)
        .args(["page", "--page", "9", "--file"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("is past the end (3 listings)"));
}

#[test]
fn test_geo_lists_counts() {
    let dir = TempDir::new().expect("temp dir");
    let file = export();

    let output = leadgrid(&dir)
        .args(["geo", "--dimension", "city", "--json", "--file"])
        .arg(file.path())
        .output()
        .expect("run");

    assert!(output.status.success());
    let body: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(body["options"][0]["label"], "Austin");
    assert_eq!(body["options"][0]["count"], 2);
    assert_eq!(body["options"][1]["label"], "Dallas");
}

#[test]
fn test_window_reports_rendered_rows() {
    let dir = TempDir::new().expect("temp dir");

    leadgrid(&dir)
        .args([
            "window",
            "100",
            "--scroll",
            "720",
            "--viewport",
            "600",
            "--row-height",
            "72",
            "--overscan",
            "5",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Rendering rows 6-25 (content height 7200px)",
        ));
}

#[test]
fn test_window_with_no_rows() {
    let dir = TempDir::new().expect("temp dir");

    leadgrid(&dir)
        .args(["window", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to render"));
}

#[test]
fn test_missing_data_source_fails_with_hint() {
    let dir = TempDir::new().expect("temp dir");

    leadgrid(&dir)
        .arg("page")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No data source configured"))
        .stderr(predicate::str::contains("--file"));
}

#[test]
fn test_config_set_then_show() {
    let dir = TempDir::new().expect("temp dir");

    leadgrid(&dir)
        .args(["config", "set", "page_size", "50"])
        .assert()
        .success()
        .stdout(predicate::str::contains("✅ Set page_size = 50"));

    leadgrid(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("page_size"))
        .stdout(predicate::str::contains("50"))
        .stdout(predicate::str::contains("(not set)"));
}

#[test]
fn test_config_rejects_unknown_key() {
    let dir = TempDir::new().expect("temp dir");

    leadgrid(&dir)
        .args(["config", "set", "colour", "blue"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown configuration key 'colour'"));
}

#[test]
fn test_verbose_json_output_stays_parseable() {
    let dir = TempDir::new().expect("temp dir");
    let file = export();

    let output = leadgrid(&dir)
        .args(["-v", "page", "--json", "--file"])
        .arg(file.path())
        .output()
        .expect("run");

    assert!(output.status.success());
    let body: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(body["total_count"], 3);
    assert!(String::from_utf8_lossy(&output.stderr).contains("Verbose mode is enabled"));
}
