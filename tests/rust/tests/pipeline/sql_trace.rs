//! Driver payloads through a memory logger

use pretty_assertions::assert_eq;
use sqlscope_core::{ScalarValue, TraceArg};
use std::time::Duration;
use tests::fixtures::select_book_args;
use tests::memory::debug_logger;
use tests::Encoding;

#[test]
fn test_positional_payload() {
    let memory = debug_logger(Encoding::Console);
    memory.logger.print(&select_book_args());

    let lines = memory.output.lines();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains(
        "[sql] : SELECT * FROM book WHERE title = 'Go in Action' AND isbn = '9781617291784'"
    ));
    assert!(memory.errors.contents().is_empty());
}

#[test]
fn test_numeric_payload_with_null_and_binary() {
    let memory = debug_logger(Encoding::Json);
    memory.logger.print(&[
        TraceArg::from("sql"),
        TraceArg::from(""),
        TraceArg::from(Duration::from_millis(3)),
        TraceArg::from("UPDATE book SET cover = $2, subtitle = $3 WHERE id = $1"),
        TraceArg::Values(vec![
            ScalarValue::from(7_i64),
            ScalarValue::from(vec![0xff_u8, 0x00]),
            ScalarValue::Null,
        ]),
        TraceArg::from(1_i64),
    ]);

    let record: serde_json::Value = serde_json::from_str(&memory.output.lines()[0]).unwrap();
    assert_eq!(
        record["message"],
        "[sql] : UPDATE book SET cover = '<binary>', subtitle = NULL WHERE id = 7"
    );
    assert!(record.get("source").is_none());
}

#[test]
fn test_timestamps_in_payload() {
    let memory = debug_logger(Encoding::Console);
    let published = chrono::NaiveDate::from_ymd_opt(2016, 1, 5)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap();
    memory.logger.print(&[
        TraceArg::from("sql"),
        TraceArg::from("repo.rs:9"),
        TraceArg::from(Duration::ZERO),
        TraceArg::from("INSERT INTO book (published, updated) VALUES (?, ?)"),
        TraceArg::Values(vec![ScalarValue::from(published), ScalarValue::zero_timestamp()]),
        TraceArg::from(1_i64),
    ]);

    assert!(memory.output.contents().contains(
        "[sql] : INSERT INTO book (published, updated) VALUES ('2016-01-05 09:30:00', '0000-00-00 00:00:00')"
    ));
}

#[test]
fn test_other_tags_are_ignored() {
    let memory = debug_logger(Encoding::Console);
    memory.logger.print(&[TraceArg::from("begin"), TraceArg::from("tx 1")]);
    memory.logger.print(&[]);
    assert!(memory.output.contents().is_empty());
}
