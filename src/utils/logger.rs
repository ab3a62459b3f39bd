// src/utils/logger.rs

use log::{Level, LevelFilter, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::sync::OnceLock;

static LOGGER: OnceLock<StderrLogger> = OnceLock::new();

struct StderrLogger {
  level: LevelFilter,
}

/// Installs the stderr logger. Fails if a logger is already set.
pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
  let logger = LOGGER.get_or_init(|| StderrLogger { level });
  log::set_logger(logger).map(|()| log::set_max_level(level))
}

fn tag(level: Level) -> &'static str {
  match level {
    Level::Error => "error",
    Level::Warn => "warn ",
    Level::Info => "info ",
    Level::Debug => "debug",
    Level::Trace => "trace",
  }
}

impl log::Log for StderrLogger {
  fn enabled(&self, metadata: &Metadata) -> bool {
    metadata.level() <= self.level
  }

  fn log(&self, record: &Record) {
    if self.enabled(record.metadata()) {
      // Format: "[warn ] 2 of 6 'state_implicit_slab' records have no partner"
      let mut err = std::io::stderr().lock();
      let _ = writeln!(err, "[{}] {}", tag(record.level()), record.args());
    }
  }

  fn flush(&self) {
    let _ = std::io::stderr().flush();
  }
}
