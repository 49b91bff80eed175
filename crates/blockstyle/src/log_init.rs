//! A minimal append-only file logger for hosts without their own `log`
//! backend.

use crate::error::{Error, Result};
use log::{LevelFilter, Metadata, Record};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

struct FileLogger {
    file_path: PathBuf,
    level: LevelFilter,
}

impl log::Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            if let Ok(mut file) = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.file_path)
            {
                let _ = writeln!(
                    file,
                    "[{}] {}: {}",
                    record.level(),
                    record.target(),
                    record.args()
                );
            }
        }
    }

    fn flush(&self) {}
}

/// Installs a logger that appends records up to `level` to `path`.
///
/// Fails if another logger is already installed.
pub fn init_logger(path: impl Into<PathBuf>, level: LevelFilter) -> Result<()> {
    let logger = FileLogger {
        file_path: path.into(),
        level,
    };
    log::set_boxed_logger(Box::new(logger)).map_err(|e| Error::Logger(e.to_string()))?;
    log::set_max_level(level);
    Ok(())
}
