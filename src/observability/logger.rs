//! Structured JSON logger
//!
//! - one log line = one event
//! - deterministic key ordering (event, severity, then fields sorted)
//! - synchronous, no buffering
//!
//! Field values are plain strings; callers format numbers themselves at
//! the call site, keeping the logger allocation-light and deterministic.

use std::fmt;
use std::io::{self, Write};

/// Log severity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Debug-level detail.
    Trace,
    /// Normal operations.
    Info,
    /// Recoverable issues.
    Warn,
    /// Operation failures.
    Error,
}

impl Severity {
    /// String representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Synchronous structured logger.
pub struct Logger;

impl Logger {
    /// Logs an event to stdout.
    pub fn log(severity: Severity, event: &str, fields: &[(&str, &str)]) {
        let line = Self::format_line(severity, event, fields);
        let mut out = io::stdout();
        let _ = out.write_all(line.as_bytes());
        let _ = out.flush();
    }

    /// Logs an error-severity event to stderr.
    pub fn error(event: &str, fields: &[(&str, &str)]) {
        let line = Self::format_line(Severity::Error, event, fields);
        let mut err = io::stderr();
        let _ = err.write_all(line.as_bytes());
        let _ = err.flush();
    }

    /// Builds one JSON log line with deterministic key ordering.
    fn format_line(severity: Severity, event: &str, fields: &[(&str, &str)]) -> String {
        let mut output = String::with_capacity(128);
        output.push_str("{\"event\":\"");
        escape_into(&mut output, event);
        output.push_str("\",\"severity\":\"");
        output.push_str(severity.as_str());
        output.push('"');

        let mut sorted: Vec<_> = fields.to_vec();
        sorted.sort_by_key(|(key, _)| *key);
        for (key, value) in sorted {
            output.push_str(",\"");
            escape_into(&mut output, key);
            output.push_str("\":\"");
            escape_into(&mut output, value);
            output.push('"');
        }

        output.push_str("}\n");
        output
    }
}

fn escape_into(output: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '"' => output.push_str("\\\""),
            '\\' => output.push_str("\\\\"),
            '\n' => output.push_str("\\n"),
            '\r' => output.push_str("\\r"),
            '\t' => output.push_str("\\t"),
            c if c.is_control() => {
                output.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => output.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_shape_and_field_ordering() {
        let line = Logger::format_line(
            Severity::Info,
            "commit",
            &[("txn", "3"), ("key", "user:1")],
        );
        assert_eq!(
            line,
            "{\"event\":\"commit\",\"severity\":\"INFO\",\"key\":\"user:1\",\"txn\":\"3\"}\n"
        );
    }

    #[test]
    fn test_line_is_valid_json() {
        let line = Logger::format_line(Severity::Warn, "gc_sweep", &[("removed", "4")]);
        let parsed: serde_json::Value = serde_json::from_str(line.trim()).unwrap();
        assert_eq!(parsed["event"], "gc_sweep");
        assert_eq!(parsed["severity"], "WARN");
        assert_eq!(parsed["removed"], "4");
    }

    #[test]
    fn test_escaping() {
        let line = Logger::format_line(Severity::Error, "bad\"event", &[("k", "a\nb")]);
        let parsed: serde_json::Value = serde_json::from_str(line.trim()).unwrap();
        assert_eq!(parsed["event"], "bad\"event");
        assert_eq!(parsed["k"], "a\nb");
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Trace < Severity::Info);
        assert!(Severity::Warn < Severity::Error);
    }
}
