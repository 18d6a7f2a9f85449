//! Building loggers from configuration files

use pretty_assertions::assert_eq;
use sqlscope_core::config::load_config;
use sqlscope_core::ConfigurationError;
use sqlscope_logging::LogPipelineBuilder;
use tests::fixtures::{file_config_yaml, select_book_args, write_profile_config};

#[test]
fn test_file_logger_writes_json_records() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = write_profile_config(dir.path(), "develop", &file_config_yaml(dir.path(), "debug"));

    let config = load_config(&path).expect("Failed to load config");
    let logger = LogPipelineBuilder::new(config).build().expect("Failed to build logger");

    logger.print(&select_book_args());
    logger.info("library opened");
    logger.sync().expect("Failed to sync");

    let contents = std::fs::read_to_string(dir.path().join("sqlscope.log")).unwrap();
    let records: Vec<serde_json::Value> = contents
        .lines()
        .map(|line| serde_json::from_str(line).expect("Record is not JSON"))
        .collect();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["level"], "DEBUG");
    assert_eq!(
        records[0]["message"],
        "[sql] : SELECT * FROM book WHERE title = 'Go in Action' AND isbn = '9781617291784'"
    );
    assert_eq!(records[0]["source"], "book_repository.rs:42");
    assert_eq!(records[0]["rows"], 1);
    let elapsed = records[0]["elapsed_ms"].as_f64().expect("elapsed_ms is a number");
    assert!((elapsed - 1.5).abs() < 1e-9);
    assert!(records[0].get("caller").is_none());
    assert_eq!(records[1]["level"], "INFO");
    assert_eq!(records[1]["message"], "library opened");
}

#[test]
fn test_info_level_file_drops_sql_lines() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = write_profile_config(dir.path(), "production", &file_config_yaml(dir.path(), "info"));

    let logger = LogPipelineBuilder::new(load_config(&path).unwrap())
        .build()
        .unwrap();
    logger.print(&select_book_args());
    logger.sync().unwrap();

    let contents = std::fs::read_to_string(dir.path().join("sqlscope.log")).unwrap();
    assert!(contents.is_empty());
}

#[test]
fn test_output_and_error_paths_share_one_file() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let log = dir.path().join("shared.log");
    let yaml = format!(
        "level: info\nencoding: console\noutputPaths: [{log}]\nerrorOutputPaths: [{log}]\n",
        log = log.display()
    );

    let config = sqlscope_core::config::load_config_from_str(&yaml).unwrap();
    let logger = LogPipelineBuilder::new(config).build().unwrap();
    logger.warn("shelf is full");
    logger.sync().unwrap();

    let contents = std::fs::read_to_string(&log).unwrap();
    assert_eq!(contents.lines().count(), 1);
    assert!(contents.contains("WARN"));
    assert!(contents.contains("shelf is full"));
}

#[test]
fn test_missing_config_file() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let err = load_config(&dir.path().join("logger.nowhere.yml")).unwrap_err();
    assert!(matches!(err, ConfigurationError::Read { .. }));
}

#[test]
fn test_unopenable_output_path() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, b"x").unwrap();
    let yaml = format!(
        "level: info\noutputPaths: [{}]\n",
        blocker.join("app.log").display()
    );

    let config = sqlscope_core::config::load_config_from_str(&yaml).unwrap();
    let err = LogPipelineBuilder::new(config).build().unwrap_err();
    assert!(matches!(err, ConfigurationError::Sink { .. }));
}
