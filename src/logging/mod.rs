//! Logging infrastructure - structured tracing for the call boundary
//!
//! Design: Uses `tracing` for structured, contextual logging with:
//! - Configurable level, overridable through `RUST_LOG`
//! - Zero-cost when disabled
//! - Optional JSON output and span events
//! - Optional file output through `tracing-appender`

use std::io;
use std::path::Path;

use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

use crate::config::LogSettings;
use crate::error::Violation;
use crate::gc::MarkId;
use crate::signature::MethodSignature;
use crate::vmdata::VmData;

/// Global logging state
static LOGGER_INITIALIZED: OnceCell<()> = OnceCell::new();

/// Keeps the non-blocking file writer flushing for the life of the process
static FILE_GUARD: Mutex<Option<WorkerGuard>> = parking_lot::const_mutex(None);

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Default log level
    pub level: Level,
    /// Enable file logging
    pub file_output: bool,
    /// Log file path (if file_output enabled)
    pub log_path: Option<String>,
    /// Enable JSON format (vs human-readable)
    pub json_format: bool,
    /// Show span events (enter/exit)
    pub show_spans: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            file_output: false,
            log_path: None,
            json_format: false,
            show_spans: false,
        }
    }
}

fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

impl LogConfig {
    /// Build from the `[logging]` section of the bridge configuration
    pub fn from_settings(settings: &LogSettings) -> Self {
        Self {
            level: parse_level(&settings.level),
            file_output: settings.file.is_some(),
            log_path: settings.file.clone(),
            json_format: settings.json,
            show_spans: settings.spans,
        }
    }

    /// Apply `VMBRIDGE_LOG_*` environment overrides
    pub fn with_env(mut self) -> Self {
        // VMBRIDGE_LOG_LEVEL: trace, debug, info, warn, error
        if let Ok(level) = std::env::var("VMBRIDGE_LOG_LEVEL") {
            self.level = parse_level(&level);
        }

        // VMBRIDGE_LOG_FILE: path to log file
        if let Ok(path) = std::env::var("VMBRIDGE_LOG_FILE") {
            self.file_output = true;
            self.log_path = Some(path);
        }

        if std::env::var("VMBRIDGE_LOG_JSON").is_ok() {
            self.json_format = true;
        }

        if std::env::var("VMBRIDGE_LOG_SPANS").is_ok() {
            self.show_spans = true;
        }

        self
    }

    /// Create config from environment variables
    pub fn from_env() -> Self {
        Self::default().with_env()
    }

    /// Create debug config (verbose logging)
    pub fn debug() -> Self {
        Self {
            level: Level::TRACE,
            file_output: false,
            log_path: None,
            json_format: false,
            show_spans: true,
        }
    }
}

/// Initialize logging with default configuration
pub fn init() {
    init_with_config(LogConfig::from_env());
}

/// Initialize logging with custom configuration (first call wins)
pub fn init_with_config(config: LogConfig) {
    LOGGER_INITIALIZED.get_or_init(|| {
        let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("vmbridge={}", config.level.as_str().to_lowercase()))
        });

        let span_events = if config.show_spans {
            FmtSpan::ENTER | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        };

        let (writer, guard) = match config.log_path.as_deref().filter(|_| config.file_output) {
            Some(path) => {
                let path = Path::new(path);
                let dir = path.parent().unwrap_or_else(|| Path::new("."));
                let file = path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "vmbridge.log".to_string());
                let (writer, guard) =
                    tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file));
                (tracing_subscriber::fmt::writer::BoxMakeWriter::new(writer), Some(guard))
            }
            None => (tracing_subscriber::fmt::writer::BoxMakeWriter::new(io::stdout), None),
        };

        let layer = fmt::layer()
            .with_writer(writer)
            .with_span_events(span_events)
            .with_target(true)
            .with_thread_ids(cfg!(debug_assertions))
            .with_line_number(cfg!(debug_assertions));

        let layer = if config.json_format {
            layer.json().boxed()
        } else {
            layer.compact().boxed()
        };

        // Another subscriber may already be installed (tests, embedding host)
        let _ = tracing_subscriber::registry()
            .with(env_filter)
            .with(layer)
            .try_init();

        *FILE_GUARD.lock() = guard;
    });
}

/// Check if logging is initialized
pub fn is_initialized() -> bool {
    LOGGER_INITIALIZED.get().is_some()
}

// ============================================================================
// Boundary-specific logging functions
// ============================================================================

/// Log the one-time VM data capture
pub fn log_vmdata_captured(data: &VmData) {
    use tracing::{debug, info};
    info!(
        event = "vmdata_captured",
        constants = data.iter().count(),
        page_size = data.page_size(),
        "VM data snapshot initialized"
    );
    for (constant, value) in data.iter() {
        debug!(event = "vmdata_constant", name = constant.name(), value, "VM constant");
    }
}

/// Log a handle mark push
#[inline]
pub fn log_mark_push(mark: MarkId, depth: usize) {
    use tracing::trace;
    trace!(event = "mark_push", mark = mark.raw(), depth, "handle mark pushed");
}

/// Log a handle mark pop
#[inline]
pub fn log_mark_pop(mark: MarkId, depth: usize, released: usize) {
    use tracing::trace;
    trace!(
        event = "mark_pop",
        mark = mark.raw(),
        depth,
        released,
        "handle mark popped"
    );
}

/// Log a completed unboxing pass
#[inline]
pub fn log_unbox_complete(signature: &MethodSignature, slots: usize, words: usize) {
    use tracing::trace;
    trace!(
        event = "unbox_complete",
        signature = %signature,
        slots,
        words,
        "arguments unboxed"
    );
}

/// Log an internal consistency violation right before halting
pub fn log_violation(violation: &Violation) {
    use tracing::error;
    error!(
        event = "consistency_violation",
        violation = %violation,
        "internal consistency violation"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_creation() {
        let config = LogConfig::default();
        assert_eq!(config.level, Level::INFO);
        assert!(!config.file_output);

        let debug_config = LogConfig::debug();
        assert_eq!(debug_config.level, Level::TRACE);
        assert!(debug_config.show_spans);
    }

    #[test]
    fn test_config_from_settings() {
        let settings = LogSettings {
            level: "Debug".to_string(),
            json: true,
            spans: false,
            file: Some("logs/bridge.log".to_string()),
        };
        let config = LogConfig::from_settings(&settings);
        assert_eq!(config.level, Level::DEBUG);
        assert!(config.json_format);
        assert!(config.file_output);
        assert_eq!(config.log_path.as_deref(), Some("logs/bridge.log"));
    }

    #[test]
    fn test_unknown_level_falls_back_to_info() {
        assert_eq!(parse_level("chatty"), Level::INFO);
        assert_eq!(parse_level("WARN"), Level::WARN);
    }

    #[test]
    fn test_init_idempotent() {
        init();
        init(); // Should not panic
        assert!(is_initialized());
    }
}
