// Integration tests for logging functionality
// Note: this binary installs the global subscriber, so it holds a single test.

use sheetwright::domain::models::{AssistMode, LoggingConfig};
use sheetwright::infrastructure::logging::{LogConfig, LoggerImpl};
use std::fs;
use tempfile::TempDir;

mod common;

#[test]
fn test_session_activity_lands_in_log_file() {
    let temp_dir = TempDir::new().unwrap();

    let settings = LoggingConfig {
        level: "debug".to_string(),
        format: "json".to_string(),
        log_dir: Some(temp_dir.path().to_path_buf()),
        rotation: "never".to_string(),
    };
    let config = LogConfig::try_from(&settings).unwrap();
    let logger = LoggerImpl::init(&config).unwrap();
    assert!(logger.has_file_output());

    let mut s = common::session(AssistMode::Analyst);
    let turn = s.run_turn("Build P&L");
    s.controller.commit();

    // Dropping the guard flushes the non-blocking writer
    drop(logger);

    let log_path = temp_dir.path().join("sheetwright.log");
    let contents = fs::read_to_string(&log_path).unwrap();
    let lines: Vec<serde_json::Value> = contents
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();

    assert!(lines
        .iter()
        .any(|l| l["fields"]["message"] == "turn submitted"));
    assert!(lines.iter().any(|l| {
        l["fields"]["message"] == "turn complete" && l["fields"]["turn_id"] == turn.as_str()
    }));
    assert!(lines
        .iter()
        .any(|l| l["fields"]["message"] == "snapshot created"));
}
