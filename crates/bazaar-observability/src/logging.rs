//! Structured logging with session context.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

/// Log level for structured logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Trace => write!(f, "TRACE"),
            Self::Debug => write!(f, "DEBUG"),
            Self::Info => write!(f, "INFO"),
            Self::Warn => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// Output format for logs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per line.
    Json,
    /// Human-readable lines.
    #[default]
    Human,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "human" | "pretty" | "text" => Ok(LogFormat::Human),
            other => Err(format!("unknown log format: {other}")),
        }
    }
}

/// A structured log entry.
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    /// Shopper session for correlation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<String>,
    /// Emitting component, e.g. "checkout".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    #[serde(flatten)]
    pub fields: BTreeMap<String, serde_json::Value>,
    /// Microseconds since the logger was created.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed_us: Option<u64>,
}

impl LogEntry {
    /// Format as JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| self.message.clone())
    }

    /// Format as human-readable string.
    pub fn to_human(&self) -> String {
        let mut s = format!("[{}]", self.level);
        if let Some(component) = &self.component {
            s.push_str(&format!(" {component}:"));
        }
        s.push(' ');
        s.push_str(&self.message);

        if let Some(session) = &self.session {
            s.push_str(&format!(" (session {session})"));
        }

        if !self.fields.is_empty() {
            s.push_str(" | ");
            let fields: Vec<String> = self
                .fields
                .iter()
                .map(|(k, v)| match v {
                    serde_json::Value::String(text) => format!("{k}={text}"),
                    other => format!("{k}={other}"),
                })
                .collect();
            s.push_str(&fields.join(" "));
        }

        s
    }
}

/// Where formatted lines go.
#[derive(Debug, Clone, Default)]
pub enum LogSink {
    #[default]
    Stderr,
    /// Keep lines in memory.
    Buffer(Arc<Mutex<Vec<String>>>),
}

impl LogSink {
    /// A buffer sink and a handle for reading what was written.
    pub fn buffer() -> (Self, Arc<Mutex<Vec<String>>>) {
        let lines = Arc::new(Mutex::new(Vec::new()));
        (LogSink::Buffer(lines.clone()), lines)
    }

    fn write(&self, line: String) {
        match self {
            LogSink::Stderr => eprintln!("{line}"),
            LogSink::Buffer(lines) => {
                if let Ok(mut lines) = lines.lock() {
                    lines.push(line);
                }
            }
        }
    }
}

/// Structured logger carrying session and component context.
#[derive(Debug, Clone)]
pub struct StructuredLogger {
    session: Option<String>,
    component: Option<String>,
    start_time: std::time::Instant,
    min_level: LogLevel,
    format: LogFormat,
    timing: bool,
    sink: LogSink,
}

impl Default for StructuredLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl StructuredLogger {
    pub fn new() -> Self {
        Self {
            session: None,
            component: None,
            start_time: std::time::Instant::now(),
            min_level: LogLevel::Info,
            format: LogFormat::Human,
            timing: true,
            sink: LogSink::Stderr,
        }
    }

    /// Correlate entries with a shopper session.
    pub fn with_session(mut self, session: impl Into<String>) -> Self {
        self.session = Some(session.into());
        self
    }

    pub fn with_component(mut self, component: impl Into<String>) -> Self {
        self.component = Some(component.into());
        self
    }

    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_sink(mut self, sink: LogSink) -> Self {
        self.sink = sink;
        self
    }

    /// Leave `elapsed_us` out of entries.
    pub fn without_timing(mut self) -> Self {
        self.timing = false;
        self
    }

    pub fn trace(&self, message: &str) {
        self.log(LogLevel::Trace, message, BTreeMap::new());
    }

    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message, BTreeMap::new());
    }

    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message, BTreeMap::new());
    }

    pub fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message, BTreeMap::new());
    }

    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, message, BTreeMap::new());
    }

    /// Log a serializable value under `key`.
    pub fn info_value<T: Serialize>(&self, message: &str, key: &str, value: &T) {
        let mut fields = BTreeMap::new();
        fields.insert(
            key.to_string(),
            serde_json::to_value(value).unwrap_or(serde_json::Value::Null),
        );
        self.log(LogLevel::Info, message, fields);
    }

    fn log(&self, level: LogLevel, message: &str, fields: BTreeMap<String, serde_json::Value>) {
        if level < self.min_level {
            return;
        }

        let entry = LogEntry {
            level,
            message: message.to_string(),
            session: self.session.clone(),
            component: self.component.clone(),
            fields,
            elapsed_us: self.timing.then(|| self.elapsed_us()),
        };

        let output = match self.format {
            LogFormat::Json => entry.to_json(),
            LogFormat::Human => entry.to_human(),
        };
        self.sink.write(output);
    }

    pub fn session(&self) -> Option<&str> {
        self.session.as_deref()
    }

    pub fn elapsed_us(&self) -> u64 {
        self.start_time.elapsed().as_micros() as u64
    }
}

/// Builder for log entries with fluent API.
pub struct LogBuilder<'a> {
    logger: &'a StructuredLogger,
    level: LogLevel,
    message: String,
    fields: BTreeMap<String, serde_json::Value>,
}

impl<'a> LogBuilder<'a> {
    pub fn new(logger: &'a StructuredLogger, level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            logger,
            level,
            message: message.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn field(mut self, key: &str, value: impl Into<String>) -> Self {
        self.fields
            .insert(key.to_string(), serde_json::json!(value.into()));
        self
    }

    pub fn field_i64(mut self, key: &str, value: i64) -> Self {
        self.fields.insert(key.to_string(), serde_json::json!(value));
        self
    }

    pub fn field_bool(mut self, key: &str, value: bool) -> Self {
        self.fields.insert(key.to_string(), serde_json::json!(value));
        self
    }

    /// Add a duration field in milliseconds.
    pub fn duration_ms(mut self, key: &str, duration: std::time::Duration) -> Self {
        self.fields
            .insert(key.to_string(), serde_json::json!(duration.as_millis()));
        self
    }

    pub fn emit(self) {
        self.logger.log(self.level, &self.message, self.fields);
    }
}

impl StructuredLogger {
    pub fn info_builder(&self, message: impl Into<String>) -> LogBuilder<'_> {
        LogBuilder::new(self, LogLevel::Info, message)
    }

    pub fn warn_builder(&self, message: impl Into<String>) -> LogBuilder<'_> {
        LogBuilder::new(self, LogLevel::Warn, message)
    }

    pub fn error_builder(&self, message: impl Into<String>) -> LogBuilder<'_> {
        LogBuilder::new(self, LogLevel::Error, message)
    }

    pub fn debug_builder(&self, message: impl Into<String>) -> LogBuilder<'_> {
        LogBuilder::new(self, LogLevel::Debug, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffered(format: LogFormat) -> (StructuredLogger, Arc<Mutex<Vec<String>>>) {
        let (sink, lines) = LogSink::buffer();
        let logger = StructuredLogger::new()
            .with_session("sess_abc")
            .with_component("checkout")
            .with_format(format)
            .with_sink(sink)
            .without_timing();
        (logger, lines)
    }

    #[test]
    fn test_human_line() {
        let (logger, lines) = buffered(LogFormat::Human);
        logger
            .info_builder("order placed")
            .field("payment", "cod")
            .field_i64("items", 2)
            .emit();

        assert_eq!(
            lines.lock().unwrap().as_slice(),
            ["[INFO] checkout: order placed (session sess_abc) | items=2 payment=cod"]
        );
    }

    #[test]
    fn test_json_line() {
        let (logger, lines) = buffered(LogFormat::Json);
        logger.warn_builder("slow").field_bool("preorder", true).emit();

        let line = lines.lock().unwrap()[0].clone();
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["level"], "warn");
        assert_eq!(value["session"], "sess_abc");
        assert_eq!(value["component"], "checkout");
        assert_eq!(value["preorder"], true);
        assert!(value.get("elapsed_us").is_none());
    }

    #[test]
    fn test_min_level_filters() {
        let (logger, lines) = buffered(LogFormat::Human);
        let logger = logger.with_min_level(LogLevel::Warn);
        logger.info("hidden");
        logger.debug("hidden");
        logger.error("shown");
        assert_eq!(lines.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_info_value_embeds_json() {
        let (logger, lines) = buffered(LogFormat::Json);
        logger.info_value("payload", "order", &serde_json::json!({ "total_amount": 1060 }));

        let value: serde_json::Value =
            serde_json::from_str(&lines.lock().unwrap()[0]).unwrap();
        assert_eq!(value["order"]["total_amount"], 1060);
    }

    #[test]
    fn test_log_format_parse() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("pretty".parse::<LogFormat>().unwrap(), LogFormat::Human);
        assert!("xml".parse::<LogFormat>().is_err());
    }
}
