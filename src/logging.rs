//! Tracing setup for a full-screen terminal app
//!
//! The terminal belongs to the grid, so formatted events go into a bounded
//! in-memory buffer instead of stdout. The F12 log view reads from it.

use chrono::{DateTime, Local};
use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};
use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

/// Records kept before the oldest is dropped
pub const LOG_CAPACITY: usize = 1000;

#[derive(Debug, Clone)]
pub struct LogRecord {
    pub at: DateTime<Local>,
    pub level: Level,
    pub target: String,
    pub message: String,
}

impl LogRecord {
    pub fn new(level: Level, target: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            at: Local::now(),
            level,
            target: target.into(),
            message: message.into(),
        }
    }

    /// One line for the log view
    pub fn display_line(&self) -> String {
        format!(
            "{} {:<5} {:<10} {}",
            self.at.format("%H:%M:%S%.3f"),
            self.level,
            self.target,
            self.message
        )
    }
}

/// Shared, bounded log store. Clones share the same records.
#[derive(Debug, Clone)]
pub struct LogBuffer {
    records: Arc<Mutex<VecDeque<LogRecord>>>,
    capacity: usize,
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::with_capacity(LOG_CAPACITY)
    }
}

impl LogBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            records: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    // A writer that panicked mid-push leaves the deque intact, so keep using it
    fn guard(&self) -> MutexGuard<'_, VecDeque<LogRecord>> {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn record(&self, record: LogRecord) {
        let mut records = self.guard();
        while records.len() >= self.capacity {
            records.pop_front();
        }
        records.push_back(record);
    }

    /// The newest `count` records, oldest first
    pub fn recent(&self, count: usize) -> Vec<LogRecord> {
        let records = self.guard();
        let skip = records.len().saturating_sub(count);
        records.range(skip..).cloned().collect()
    }

    pub fn clear(&self) {
        self.guard().clear();
    }

    pub fn len(&self) -> usize {
        self.guard().len()
    }

    pub fn is_empty(&self) -> bool {
        self.guard().is_empty()
    }
}

/// Split a compact fmt line ("LEVEL target: message") into its parts
fn split_compact_line(line: &str) -> (Level, &str, &str) {
    let (head, rest) = line.split_once(' ').unwrap_or((line, ""));
    let Ok(level) = head.parse::<Level>() else {
        return (Level::INFO, "general", line);
    };
    let rest = rest.trim_start();

    match rest.split_once(": ") {
        // Targets are module-like paths, never containing spaces
        Some((target, message)) if !target.is_empty() && !target.contains(' ') => {
            (level, target, message.trim())
        }
        _ => (level, "general", rest),
    }
}

/// `MakeWriter` that turns each formatted event into a `LogRecord`
#[derive(Clone)]
pub struct BufferWriter {
    buffer: LogBuffer,
}

impl BufferWriter {
    pub fn new(buffer: LogBuffer) -> Self {
        Self { buffer }
    }
}

impl io::Write for BufferWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let text = String::from_utf8_lossy(buf);
        for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let (level, target, message) = split_compact_line(line);
            self.buffer.record(LogRecord::new(level, target, message));
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for BufferWriter {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

static LOG_BUFFER: OnceLock<LogBuffer> = OnceLock::new();

/// The process-wide buffer, once `init_tracing` has run
pub fn log_buffer() -> Option<LogBuffer> {
    LOG_BUFFER.get().cloned()
}

/// Install the global subscriber. `RUST_LOG` overrides the default `info`
/// filter. Calling it again returns the existing buffer.
pub fn init_tracing() -> LogBuffer {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    if let Some(existing) = LOG_BUFFER.get() {
        return existing.clone();
    }
    let buffer = LOG_BUFFER.get_or_init(LogBuffer::new).clone();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let layer = fmt::layer()
        .compact()
        .without_time()
        .with_ansi(false)
        .with_target(true)
        .with_writer(BufferWriter::new(buffer.clone()));

    match tracing_subscriber::registry().with(filter).with(layer).try_init() {
        Ok(()) => tracing::info!(target: "system", "Tracing initialized"),
        // Another subscriber (a test harness, say) got there first
        Err(e) => buffer.record(LogRecord::new(
            Level::WARN,
            "system",
            format!("Tracing not installed: {}", e),
        )),
    }

    buffer
}
