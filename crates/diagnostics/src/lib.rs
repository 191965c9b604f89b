//! Diagnostics for the playerstats workspace
//!
//! Thin layer over `emit` so every crate logs the same way.
//!
//! The level comes from the `PLAYERSTATS_LOG` environment variable:
//! - `off` (default): nothing is emitted
//! - `error`, `warn`, `info`, `debug`: minimum level written to stderr

use std::str::FromStr;
use std::sync::Once;

// Re-export emit so macros can use it
pub use emit;

/// Environment variable consulted by [`init_diagnostics`]
pub const LOG_ENV_VAR: &str = "PLAYERSTATS_LOG";

static INIT: Once = Once::new();

/// Verbosity selected through `PLAYERSTATS_LOG`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
}

impl LogLevel {
    /// The emit level used as the minimum filter, or None when logging is off
    pub fn min_level(self) -> Option<emit::Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(emit::Level::Error),
            LogLevel::Warn => Some(emit::Level::Warn),
            LogLevel::Info => Some(emit::Level::Info),
            LogLevel::Debug => Some(emit::Level::Debug),
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "off" | "none" => Ok(LogLevel::Off),
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" | "trace" => Ok(LogLevel::Debug),
            other => Err(format!("unknown log level '{other}'")),
        }
    }
}

/// Initialize diagnostics based on the PLAYERSTATS_LOG environment variable
///
/// Call once at startup. Later calls are ignored.
pub fn init_diagnostics() {
    INIT.call_once(|| {
        let raw = std::env::var(LOG_ENV_VAR).unwrap_or_else(|_| "off".to_string());

        let (level, unknown) = match raw.parse::<LogLevel>() {
            Ok(level) => (level, None),
            Err(_) => (LogLevel::Info, Some(raw)),
        };

        let Some(min) = level.min_level() else {
            return;
        };

        let rt = emit::setup()
            .emit_to(emit_term::stderr())
            .emit_when(emit::level::min_filter(min))
            .init();

        if let Some(raw) = unknown {
            emit::warn!("Unknown {var} value '{raw}', using 'info'", var: LOG_ENV_VAR, raw: raw.as_str());
        }

        // The runtime must outlive every emitting call site
        std::mem::forget(rt);
    });
}

/// Log basic operations (uploads, writes, queries)
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::emit::info!($($arg)*)
    };
}

/// Log detailed diagnostics (row counts, generated SQL, inferred schemas)
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        $crate::emit::debug!($($arg)*)
    };
}

/// Log recoverable conditions (empty selection, missing upload)
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::emit::warn!($($arg)*)
    };
}

/// Log failures (store errors, parse errors)
#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::emit::error!($($arg)*)
    };
}
