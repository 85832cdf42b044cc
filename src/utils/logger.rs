use log::{Level, LevelFilter, Log, Metadata, Record};
use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::sync::Mutex;
use thiserror::Error;

const CRATE_TARGET: &str = "staff_bot";
const SUPPRESS_THRESHOLD: u32 = 10;

static NOISY_PATTERNS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| HashSet::from(["do_heartbeat", "recv_event", "recv;", "heartbeat ack"]));

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to set logger: {0}")]
    SetLogger(#[from] log::SetLoggerError),
}

#[derive(Debug)]
struct LoggerState {
    file: Option<File>,
    last_entry: Option<String>,
    repeat_count: u32,
}

/// Writes to stdout and optionally a file.
///
/// Our own records pass at `Info`, dependencies (serenity, poise, reqwest)
/// only at `Warn`. Identical consecutive lines are collapsed into a
/// "repeated N times" summary.
pub struct BotLogger {
    state: Mutex<LoggerState>,
}

impl BotLogger {
    pub fn new(log_file: Option<&str>) -> Result<BotLogger, std::io::Error> {
        let file = match log_file {
            Some(path) => Some(OpenOptions::new().create(true).append(true).open(path)?),
            None => None,
        };

        Ok(BotLogger {
            state: Mutex::new(LoggerState {
                file,
                last_entry: None,
                repeat_count: 0,
            }),
        })
    }

    pub fn init(log_file: Option<&str>) -> Result<(), LoggerError> {
        let logger = BotLogger::new(log_file)?;
        log::set_boxed_logger(Box::new(logger))?;
        log::set_max_level(LevelFilter::Info);
        Ok(())
    }

    fn write_message(state: &mut LoggerState, message: &str) {
        println!("{}", message);
        if let Some(file) = state.file.as_mut() {
            if let Err(e) = writeln!(file, "{}", message) {
                eprintln!("Failed to write log entry: {}", e);
            }
        }
    }

    fn emit_repeat_summary(state: &mut LoggerState) {
        if state.repeat_count > 0 {
            let summary = format!("(previous message repeated {} times)", state.repeat_count);
            Self::write_message(state, &summary);
            state.repeat_count = 0;
        }
    }
}

impl Log for BotLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        if metadata.target().starts_with(CRATE_TARGET) {
            metadata.level() <= Level::Info
        } else {
            metadata.level() <= Level::Warn
        }
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let message = record.args().to_string();
        if NOISY_PATTERNS
            .iter()
            .any(|pattern| message.contains(pattern))
        {
            return;
        }

        let entry = format!("[{}] {}", record.level(), message);
        let Ok(mut state) = self.state.lock() else {
            return;
        };

        if state.last_entry.as_deref() == Some(entry.as_str()) {
            state.repeat_count = state.repeat_count.saturating_add(1);
            if state.repeat_count >= SUPPRESS_THRESHOLD {
                Self::emit_repeat_summary(&mut state);
            }
            return;
        }

        Self::emit_repeat_summary(&mut state);
        Self::write_message(&mut state, &entry);
        state.last_entry = Some(entry);
    }

    fn flush(&self) {
        if let Ok(mut state) = self.state.lock() {
            Self::emit_repeat_summary(&mut state);
            if let Some(file) = state.file.as_mut() {
                let _ = file.flush();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_for<'a>(target: &'a str, level: Level, args: std::fmt::Arguments<'a>) -> Record<'a> {
        Record::builder().target(target).level(level).args(args).build()
    }

    #[test]
    fn test_logger_creation_with_file() {
        let path = std::env::temp_dir().join(format!("staff-bot-{}.log", std::process::id()));
        let logger = BotLogger::new(path.to_str());
        assert!(logger.is_ok());
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_dependency_info_is_filtered() {
        let logger = BotLogger::new(None).unwrap();
        let own = Metadata::builder()
            .target("staff_bot::bot")
            .level(Level::Info)
            .build();
        let dep_info = Metadata::builder()
            .target("serenity::gateway")
            .level(Level::Info)
            .build();
        let dep_warn = Metadata::builder()
            .target("serenity::gateway")
            .level(Level::Warn)
            .build();

        assert!(logger.enabled(&own));
        assert!(!logger.enabled(&dep_info));
        assert!(logger.enabled(&dep_warn));
    }

    #[test]
    fn test_logger_suppresses_duplicates() {
        let logger = BotLogger::new(None).unwrap();
        let record = record_for("staff_bot", Level::Info, format_args!("duplicate message"));

        logger.log(&record);
        for _ in 0..5 {
            logger.log(&record);
        }

        let state = logger.state.lock().unwrap();
        assert_eq!(state.last_entry.as_deref(), Some("[INFO] duplicate message"));
        assert_eq!(state.repeat_count, 5);
    }

    #[test]
    fn test_repeat_counter_resets_at_threshold() {
        let logger = BotLogger::new(None).unwrap();
        let record = record_for("staff_bot", Level::Warn, format_args!("again"));

        logger.log(&record);
        for _ in 0..SUPPRESS_THRESHOLD {
            logger.log(&record);
        }

        assert_eq!(logger.state.lock().unwrap().repeat_count, 0);
    }

    #[test]
    fn test_noisy_messages_are_dropped() {
        let logger = BotLogger::new(None).unwrap();
        let record = record_for("staff_bot", Level::Error, format_args!("do_heartbeat failed"));

        logger.log(&record);

        assert!(logger.state.lock().unwrap().last_entry.is_none());
    }
}
