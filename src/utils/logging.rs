//! Structured logging with signing-material redaction.
//!
//! Signing keys never appear in logs. Signer addresses and digests are
//! partially redacted so operators can correlate log lines with on-chain
//! activity without leaking full values at debug verbosity.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

/// Global flag to enable/disable debug logging
static DEBUG_ENABLED: AtomicBool = AtomicBool::new(false);

pub fn enable_debug() {
    DEBUG_ENABLED.store(true, Ordering::SeqCst);
}

pub fn disable_debug() {
    DEBUG_ENABLED.store(false, Ordering::SeqCst);
}

pub fn is_debug_enabled() -> bool {
    DEBUG_ENABLED.load(Ordering::SeqCst)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warn => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

/// One structured log line, built field by field.
#[derive(Debug)]
pub struct LogEntry {
    pub level: LogLevel,
    pub module: &'static str,
    pub message: String,
    pub fields: Vec<(&'static str, String)>,
}

impl LogEntry {
    pub fn new(level: LogLevel, module: &'static str, message: impl Into<String>) -> Self {
        Self {
            level,
            module,
            message: message.into(),
            fields: Vec::new(),
        }
    }

    /// Add a field; keys that look like key material are fully redacted.
    pub fn field(mut self, key: &'static str, value: impl fmt::Display) -> Self {
        let rendered = value.to_string();
        let redacted = if is_sensitive_key(key) {
            redact_secret(&rendered)
        } else {
            rendered
        };
        self.fields.push((key, redacted));
        self
    }

    /// Add an address field (first and last characters only).
    pub fn address_field(mut self, key: &'static str, address: &str) -> Self {
        self.fields.push((key, redact_address(address)));
        self
    }

    /// Add a digest/hash field (partial).
    pub fn digest_field(mut self, key: &'static str, digest: &str) -> Self {
        self.fields.push((key, redact_digest(digest)));
        self
    }

    pub fn log(self) {
        if self.level == LogLevel::Debug && !is_debug_enabled() {
            return;
        }

        let fields = self
            .fields
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(" ");

        let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ");
        if fields.is_empty() {
            eprintln!("[{}] {} [{}] {}", timestamp, self.level, self.module, self.message);
        } else {
            eprintln!(
                "[{}] {} [{}] {} | {}",
                timestamp, self.level, self.module, self.message, fields
            );
        }
    }
}

fn is_sensitive_key(key: &str) -> bool {
    let key = key.to_lowercase();
    ["key", "secret", "private"].iter().any(|k| key.contains(k))
}

fn redact_secret(value: &str) -> String {
    if value.is_empty() {
        "[EMPTY]".to_string()
    } else {
        format!("[REDACTED:{}chars]", value.len())
    }
}

/// Show the first 8 and last 4 characters of an address.
fn redact_address(address: &str) -> String {
    let trimmed = address.trim();
    if trimmed.len() <= 12 {
        return redact_secret(trimmed);
    }
    format!("{}...{}", &trimmed[..8], &trimmed[trimmed.len() - 4..])
}

/// Show the first 10 and last 6 characters of a digest.
fn redact_digest(digest: &str) -> String {
    let trimmed = digest.trim();
    if trimmed.len() <= 20 {
        return trimmed.to_string();
    }
    format!("{}...{}", &trimmed[..10], &trimmed[trimmed.len() - 6..])
}
