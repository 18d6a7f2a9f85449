//! Concurrent tracing through one shared logger

use pretty_assertions::assert_eq;
use std::thread;
use tests::fixtures::select_book_args;
use tests::memory::debug_logger;
use tests::Encoding;

const THREADS: usize = 8;
const PER_THREAD: usize = 50;

#[test]
fn test_concurrent_prints_keep_lines_whole() {
    let memory = debug_logger(Encoding::Json);

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let logger = memory.logger.clone();
            thread::spawn(move || {
                for _ in 0..PER_THREAD {
                    logger.print(&select_book_args());
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("Tracing thread panicked");
    }

    let lines = memory.output.lines();
    assert_eq!(lines.len(), THREADS * PER_THREAD);
    for line in lines {
        let record: serde_json::Value = serde_json::from_str(&line).expect("Interleaved record");
        assert_eq!(record["rows"], 1);
    }
}
