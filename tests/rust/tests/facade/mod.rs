//! Process-wide default logger
//!
//! Kept in its own test binary with a single test, since the installed
//! logger is shared by every test in a process.

use pretty_assertions::assert_eq;
use sqlscope_logging::global;
use tests::fixtures::{file_config_yaml, select_book_args, write_profile_config};
use tests::memory::debug_logger;
use tests::Encoding;

#[test]
fn test_install_print_and_replace() {
    // Nothing installed yet: the stderr fallback answers.
    assert!(!global::is_installed());
    assert!(!global::logger().enabled(tests::LogLevel::Debug));

    let first = debug_logger(Encoding::Console);
    global::install(first.logger.clone());
    assert!(global::is_installed());
    global::print(&select_book_args());
    assert_eq!(first.output.lines().len(), 1);

    // Last writer wins.
    let second = debug_logger(Encoding::Console);
    global::install(second.logger.clone());
    global::print(&select_book_args());
    assert_eq!(first.output.lines().len(), 1);
    assert_eq!(second.output.lines().len(), 1);
    global::sync().unwrap();

    // Initialising from a file installs the file logger.
    let dir = tempfile::tempdir().unwrap();
    let path = write_profile_config(dir.path(), "develop", &file_config_yaml(dir.path(), "debug"));
    let logger = global::init_from_file(&path).unwrap();
    global::print(&select_book_args());
    logger.sync().unwrap();

    let contents = std::fs::read_to_string(dir.path().join("sqlscope.log")).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("Success to read logger configuration"));
    assert!(lines[1].contains("[sql] : SELECT * FROM book"));
    assert_eq!(second.output.lines().len(), 1);
}
