//! File-backed `log::Log` implementation.
//!
//! Stdout carries the framed LSP protocol; nothing may write to it besides encoded
//! messages. Logging therefore goes to a file the operator points at with `--log-file`,
//! truncated on open, one line per record with a level and timestamp-free module path
//! (matching the target detail a log file actually needs, not wall-clock noise).

use std::fs::OpenOptions;
use std::io::Write;
use std::sync::Mutex;

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

pub struct FileLogger {
    file: Mutex<std::fs::File>,
    level: LevelFilter,
}

impl FileLogger {
    fn new(file: std::fs::File, level: LevelFilter) -> Self {
        Self {
            file: Mutex::new(file),
            level,
        }
    }
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let mut file = match self.file.lock() {
            Ok(file) => file,
            Err(poisoned) => poisoned.into_inner(),
        };
        let _ = writeln!(
            file,
            "[pebble-ls] {} {}: {}",
            level_tag(record.level()),
            record.target(),
            record.args()
        );
        let _ = file.flush();
    }

    fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            let _ = file.flush();
        }
    }
}

fn level_tag(level: Level) -> &'static str {
    match level {
        Level::Error => "ERROR",
        Level::Warn => "WARN",
        Level::Info => "INFO",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    }
}

/// Opens `path` (creating it, truncating any previous contents) and installs it as the
/// global logger at `level`. Fails loudly if the file can't be opened — there is nowhere
/// else safe to report that failure, since stdout is reserved for protocol frames.
pub fn init(path: &str, level: LevelFilter) -> Result<(), SetLoggerError> {
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
        .unwrap_or_else(|e| panic!("could not open log file {path}: {e}"));

    log::set_max_level(level);
    log::set_boxed_logger(Box::new(FileLogger::new(file, level)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn log_writes_a_tagged_line_to_the_file() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("pebble-ls-test-{}.log", std::process::id()));
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)
            .unwrap();
        let logger = FileLogger::new(file, LevelFilter::Info);

        logger.log(
            &Record::builder()
                .args(format_args!("hello"))
                .level(Level::Info)
                .target("pebble_ls::logger::tests")
                .build(),
        );

        let mut contents = String::new();
        std::fs::File::open(&path)
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();
        assert!(contents.contains("INFO"));
        assert!(contents.contains("hello"));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn debug_level_is_suppressed_below_the_configured_filter() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("pebble-ls-test-filter-{}.log", std::process::id()));
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)
            .unwrap();
        let logger = FileLogger::new(file, LevelFilter::Info);

        logger.log(
            &Record::builder()
                .args(format_args!("should not appear"))
                .level(Level::Debug)
                .target("pebble_ls::logger::tests")
                .build(),
        );

        let mut contents = String::new();
        std::fs::File::open(&path)
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();
        assert!(contents.is_empty());
        let _ = std::fs::remove_file(&path);
    }
}
