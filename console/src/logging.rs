//! Logging capability handed to every component
//!
//! Components never reach for a global logger. They hold a [`Logger`],
//! whose default sink forwards to `tracing`.

use std::sync::{Arc, Mutex};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Severity of a log record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

/// Destination for log records
pub trait LogSink: Send + Sync {
    fn log(&self, level: LogLevel, context: &str, message: &str);
}

/// Forwards records to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn log(&self, level: LogLevel, context: &str, message: &str) {
        match level {
            LogLevel::Info => tracing::info!(context, "{}", message),
            LogLevel::Warn => tracing::warn!(context, "{}", message),
            LogLevel::Error => tracing::error!(context, "{}", message),
        }
    }
}

/// One captured record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub level: LogLevel,
    pub context: String,
    pub message: String,
}

/// Keeps records in memory, for embedding hosts that render their own log
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<LogRecord>>,
}

impl MemorySink {
    pub fn records(&self) -> Vec<LogRecord> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }

    pub fn count(&self, level: LogLevel) -> usize {
        self.records().iter().filter(|r| r.level == level).count()
    }
}

impl LogSink for MemorySink {
    fn log(&self, level: LogLevel, context: &str, message: &str) {
        if let Ok(mut records) = self.records.lock() {
            records.push(LogRecord {
                level,
                context: context.to_string(),
                message: message.to_string(),
            });
        }
    }
}

/// Cheaply clonable logging handle
#[derive(Clone)]
pub struct Logger {
    sink: Arc<dyn LogSink>,
}

impl Logger {
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self { sink }
    }

    pub fn info(&self, context: &str, message: impl AsRef<str>) {
        self.sink.log(LogLevel::Info, context, message.as_ref());
    }

    pub fn warn(&self, context: &str, message: impl AsRef<str>) {
        self.sink.log(LogLevel::Warn, context, message.as_ref());
    }

    pub fn error(&self, context: &str, message: impl AsRef<str>) {
        self.sink.log(LogLevel::Error, context, message.as_ref());
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(Arc::new(TracingSink))
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger").finish_non_exhaustive()
    }
}

/// Install the process-wide `tracing` subscriber
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "beereign_console=info,reqwest=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
