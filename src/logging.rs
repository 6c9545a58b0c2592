use log::{LevelFilter, Log, Metadata, Record};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use chrono::Local;

/// Appends `timestamp [LEVEL] message` lines to a file.
pub struct FileLogger {
    file: Mutex<File>,
    level: LevelFilter,
    write_failed: AtomicBool,
}

impl FileLogger {
    pub fn new(log_file: &Path, level: LevelFilter) -> io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_file)?;

        Ok(Self::from_file(file, level))
    }

    fn from_file(file: File, level: LevelFilter) -> Self {
        Self {
            file: Mutex::new(file),
            level,
            write_failed: AtomicBool::new(false),
        }
    }

    /// True once any write or flush to the log file has failed.
    pub fn write_failed(&self) -> bool {
        self.write_failed.load(Ordering::Relaxed)
    }

    // Only the first failure goes to stderr.
    fn report_failure(&self, err: io::Error) {
        if !self.write_failed.swap(true, Ordering::Relaxed) {
            eprintln!("Failed to write to log file: {}", err);
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
        if let Ok(mut file) = self.file.lock() {
            let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
            if let Err(err) = writeln!(file, "{} [{}] {}", timestamp, record.level(), record.args()) {
                self.report_failure(err);
            }
        }
    }

    fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            if let Err(err) = file.flush() {
                self.report_failure(err);
            }
        }
    }
}

/// Installs the global logger: a file logger when `log_file` is given, env_logger otherwise.
///
/// With env_logger, `RUST_LOG` still overrides `level`.
pub fn init(level: LevelFilter, log_file: Option<&Path>) -> anyhow::Result<()> {
    match log_file {
        Some(path) => {
            let logger = FileLogger::new(path, level)?;
            log::set_boxed_logger(Box::new(logger))?;
            log::set_max_level(level);
        }
        None => {
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level.to_string()))
                .try_init()?;
        }
    }
    Ok(())
}
