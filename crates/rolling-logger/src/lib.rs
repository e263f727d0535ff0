//! Rolling Logger
//!
//! A `tracing` layer that keeps the most recent log lines in a bounded
//! ring buffer and forwards every line to a sink.
//! On wasm32 the default sink is the browser console, elsewhere stderr.

use std::collections::VecDeque;
use std::fmt::{self, Write as _};
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::prelude::*;

/// Logger setup errors
#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    #[error("logger already initialized")]
    AlreadyInitialized,
    #[error("failed to install subscriber: {0}")]
    Install(String),
}

/// A single formatted log record
#[derive(Debug, Clone, PartialEq)]
pub struct LogLine {
    pub timestamp: String,
    pub level: Level,
    pub target: String,
    pub message: String,
}

impl fmt::Display for LogLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {:<5} {}: {}", self.timestamp, self.level, self.target, self.message)
    }
}

/// Bounded buffer of recent log lines (oldest evicted first)
#[derive(Clone, Debug)]
pub struct LogBuffer {
    lines: Arc<Mutex<VecDeque<LogLine>>>,
    capacity: usize,
}

impl LogBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn push(&self, line: LogLine) {
        let mut lines = self.lines.lock();
        while lines.len() >= self.capacity {
            lines.pop_front();
        }
        lines.push_back(line);
    }

    /// Snapshot of buffered lines, oldest first
    pub fn recent(&self) -> Vec<LogLine> {
        self.lines.lock().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.lines.lock().clear();
    }

    /// All buffered lines joined with newlines (for "copy logs" in the UI)
    pub fn dump(&self) -> String {
        self.recent()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Destination for formatted lines
pub trait LogSink: Send + Sync + 'static {
    fn write(&self, level: Level, line: &str);
}

/// Browser console on wasm32, stderr otherwise
pub struct ConsoleSink;

impl LogSink for ConsoleSink {
    #[cfg(target_arch = "wasm32")]
    fn write(&self, level: Level, line: &str) {
        let value = wasm_bindgen::JsValue::from_str(line);
        match level {
            Level::ERROR => web_sys::console::error_1(&value),
            Level::WARN => web_sys::console::warn_1(&value),
            Level::INFO => web_sys::console::info_1(&value),
            _ => web_sys::console::debug_1(&value),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn write(&self, _level: Level, line: &str) {
        eprintln!("{}", line);
    }
}

/// Layer feeding the ring buffer and the sink
pub struct RollingLayer<K: LogSink = ConsoleSink> {
    app_name: String,
    buffer: LogBuffer,
    sink: K,
}

impl<K: LogSink> RollingLayer<K> {
    pub fn new(app_name: impl Into<String>, buffer: LogBuffer, sink: K) -> Self {
        Self {
            app_name: app_name.into(),
            buffer,
            sink,
        }
    }
}

impl<S: Subscriber, K: LogSink> Layer<S> for RollingLayer<K> {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        let line = LogLine {
            timestamp: chrono::Local::now().format("%H:%M:%S%.3f").to_string(),
            level: *meta.level(),
            target: format!("{}::{}", self.app_name, meta.target()),
            message: visitor.finish(),
        };
        self.sink.write(line.level, &line.to_string());
        self.buffer.push(line);
    }
}

#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl MessageVisitor {
    fn finish(self) -> String {
        if self.fields.is_empty() {
            self.message
        } else {
            format!("{}{}", self.message, self.fields)
        }
    }
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{:?}", value);
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name(), value);
        }
    }
}

static GLOBAL_BUFFER: OnceLock<LogBuffer> = OnceLock::new();

/// Install the global subscriber. Call once at startup.
pub fn init_logger(app_name: &str, capacity: usize, max_level: Level) -> Result<LogBuffer, LoggerError> {
    if GLOBAL_BUFFER.get().is_some() {
        return Err(LoggerError::AlreadyInitialized);
    }

    let buffer = LogBuffer::new(capacity);
    tracing_subscriber::registry()
        .with(LevelFilter::from_level(max_level))
        .with(RollingLayer::new(app_name, buffer.clone(), ConsoleSink))
        .try_init()
        .map_err(|e| LoggerError::Install(e.to_string()))?;

    let _ = GLOBAL_BUFFER.set(buffer.clone());
    Ok(buffer)
}

/// The buffer installed by [`init_logger`], if any
pub fn global_buffer() -> Option<&'static LogBuffer> {
    GLOBAL_BUFFER.get()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Default)]
    struct MemorySink(Arc<Mutex<Vec<(Level, String)>>>);

    impl LogSink for MemorySink {
        fn write(&self, level: Level, line: &str) {
            self.0.lock().push((level, line.to_string()));
        }
    }

    #[test]
    fn test_buffer_evicts_oldest() {
        let buffer = LogBuffer::new(2);
        for i in 0..3 {
            buffer.push(LogLine {
                timestamp: "00:00:00.000".into(),
                level: Level::INFO,
                target: "t".into(),
                message: format!("line {}", i),
            });
        }
        let lines = buffer.recent();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].message, "line 1");
        assert_eq!(lines[1].message, "line 2");
    }

    #[test]
    fn test_layer_records_message_and_fields() {
        let buffer = LogBuffer::new(8);
        let sink = MemorySink::default();
        let subscriber = tracing_subscriber::registry()
            .with(RollingLayer::new("TaskFlow", buffer.clone(), sink.clone()));

        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!(board_id = "b1", "reload failed");
        });

        let lines = buffer.recent();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].level, Level::WARN);
        assert_eq!(lines[0].message, "reload failed board_id=b1");
        assert!(lines[0].target.starts_with("TaskFlow::"));

        let written = sink.0.lock();
        assert_eq!(written.len(), 1);
        assert!(written[0].1.contains("WARN"));
        assert!(written[0].1.contains("reload failed"));
    }

    #[test]
    fn test_dump_joins_lines() {
        let buffer = LogBuffer::new(4);
        let sink = MemorySink::default();
        let subscriber = tracing_subscriber::registry()
            .with(RollingLayer::new("app", buffer.clone(), sink));

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("first");
            tracing::error!("second");
        });

        let dump = buffer.dump();
        assert_eq!(dump.lines().count(), 2);
        assert!(dump.contains("first"));
        assert!(dump.contains("ERROR"));

        buffer.clear();
        assert!(buffer.is_empty());
    }
}
