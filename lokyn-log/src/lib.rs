//! Lokyn Logging
//!
//! Structured logging for the Lokyn localization crates, controlled through
//! `LOKYN_*` environment variables.
//!
//! # Features
//!
//! - **Environment-controlled**: `LOKYN_DEBUG=1` enables debug logging
//! - **Cheap when filtered**: macros check an atomic level before formatting
//! - **Multiple outputs**: pretty, compact or JSON lines on stderr
//! - **`log` bridge**: every record is forwarded to the `log` facade, so hosts
//!   that install a `log` backend see Lokyn records there too
//! - **Capture**: [`capture`] collects records emitted on the current thread
//!
//! # Usage
//!
//! ```rust
//! use lokyn_log::{debug, info, warn};
//!
//! debug!("Loading catalogs");
//! info!("Registered {} languages", 3);
//! let key = "cart.items";
//! warn!(target: "lokyn::lookup", "No translation for {}", key);
//! ```
//!
//! # Environment Variables
//!
//! - `LOKYN_DEBUG=1` - Enable debug logging
//! - `LOKYN_LOG_LEVEL=trace|debug|info|warn|error|off` - Set log level
//! - `LOKYN_LOG_FORMAT=pretty|json|compact` - Set output format
//! - `LOKYN_LOG_COLOR=1|0` - Enable/disable colors (`color` feature)
//! - `LOKYN_LOG_TIMESTAMPS=1|0` - Include timestamps
//! - `LOKYN_LOG_MODULE=1|0` - Include the record target

use once_cell::sync::Lazy;
use std::cell::RefCell;
use std::env;
use std::io::{IsTerminal, Write};
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

// ============================================================================
// Log Levels
// ============================================================================

/// Severity of a log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Level {
    /// Trace level (most verbose)
    Trace = 0,
    /// Debug level
    Debug = 1,
    /// Info level
    Info = 2,
    /// Warning level
    Warn = 3,
    /// Error level (least verbose)
    Error = 4,
    /// Off (no logging)
    Off = 5,
}

impl Level {
    /// Parse a level name, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Some(Level::Trace),
            "debug" => Some(Level::Debug),
            "info" => Some(Level::Info),
            "warn" | "warning" => Some(Level::Warn),
            "error" => Some(Level::Error),
            "off" | "none" => Some(Level::Off),
            _ => None,
        }
    }

    /// Upper-case level name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Trace => "TRACE",
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Off => "OFF",
        }
    }

    /// Matching level of the `log` facade. `Off` has none.
    pub fn to_log_level(self) -> Option<log::Level> {
        match self {
            Level::Trace => Some(log::Level::Trace),
            Level::Debug => Some(log::Level::Debug),
            Level::Info => Some(log::Level::Info),
            Level::Warn => Some(log::Level::Warn),
            Level::Error => Some(log::Level::Error),
            Level::Off => None,
        }
    }

    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Level::Trace,
            1 => Level::Debug,
            2 => Level::Info,
            3 => Level::Warn,
            4 => Level::Error,
            _ => Level::Off,
        }
    }

    #[cfg(feature = "color")]
    fn colored(&self) -> colored::ColoredString {
        use colored::Colorize;
        match self {
            Level::Trace => "TRACE".magenta(),
            Level::Debug => "DEBUG".blue(),
            Level::Info => "INFO".green(),
            Level::Warn => "WARN".yellow(),
            Level::Error => "ERROR".red().bold(),
            Level::Off => "OFF".white(),
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Log Format
// ============================================================================

/// Output format for records written to stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Human readable, one record per line with full timestamp
    Pretty,
    /// Short timestamp and single-letter level
    Compact,
    /// One JSON object per line
    Json,
}

impl Format {
    /// Parse a format name, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Some(Format::Pretty),
            "compact" => Some(Format::Compact),
            "json" => Some(Format::Json),
            _ => None,
        }
    }
}

// ============================================================================
// Global Configuration
// ============================================================================

static DEBUG_ENABLED: AtomicBool = AtomicBool::new(false);

static LOG_LEVEL: AtomicU8 = AtomicU8::new(Level::Info as u8);

static CONFIG: Lazy<LogConfig> = Lazy::new(LogConfig::from_env);

/// Logging configuration, read once from the environment.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Whether debug mode is enabled
    pub debug: bool,
    /// Minimum log level
    pub level: Level,
    /// Output format
    pub format: Format,
    /// Whether colors are enabled
    pub color: bool,
    /// Whether to include timestamps
    pub timestamps: bool,
    /// Whether to include the record target
    pub module_path: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            debug: false,
            level: Level::Info,
            format: Format::Json,
            color: false,
            timestamps: true,
            module_path: true,
        }
    }
}

fn env_flag(name: &str) -> Option<bool> {
    env::var(name)
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}

impl LogConfig {
    /// Build the configuration from `LOKYN_*` variables and publish the
    /// resulting level to the global filter.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let debug = env_flag("LOKYN_DEBUG").unwrap_or(defaults.debug);

        let level = env::var("LOKYN_LOG_LEVEL")
            .ok()
            .and_then(|s| Level::parse(&s))
            .unwrap_or(if debug { Level::Debug } else { defaults.level });

        let format = env::var("LOKYN_LOG_FORMAT")
            .ok()
            .and_then(|s| Format::parse(&s))
            .unwrap_or(defaults.format);

        let color = env_flag("LOKYN_LOG_COLOR").unwrap_or_else(|| {
            env::var_os("NO_COLOR").is_none() && std::io::stderr().is_terminal()
        });

        let config = Self {
            debug,
            level,
            format,
            color,
            timestamps: env_flag("LOKYN_LOG_TIMESTAMPS").unwrap_or(defaults.timestamps),
            module_path: env_flag("LOKYN_LOG_MODULE").unwrap_or(defaults.module_path),
        };

        DEBUG_ENABLED.store(config.debug, Ordering::SeqCst);
        LOG_LEVEL.store(config.level as u8, Ordering::SeqCst);

        config
    }
}

// ============================================================================
// Public API
// ============================================================================

/// Read the `LOKYN_*` configuration now instead of on first use.
pub fn init() {
    Lazy::force(&CONFIG);
}

/// Check if debug logging is enabled.
#[inline]
pub fn is_debug_enabled() -> bool {
    init();
    DEBUG_ENABLED.load(Ordering::Relaxed)
}

/// Check if a log level passes the level filter.
#[inline]
pub fn is_level_enabled(level: Level) -> bool {
    init();
    level != Level::Off && level as u8 >= LOG_LEVEL.load(Ordering::Relaxed)
}

/// Whether a record at `level` is emitted: it passes the level filter, or
/// it is a debug record and debug mode is on.
#[inline]
pub fn enabled(level: Level) -> bool {
    is_level_enabled(level) || (level == Level::Debug && is_debug_enabled())
}

/// Get current log level.
pub fn current_level() -> Level {
    init();
    Level::from_u8(LOG_LEVEL.load(Ordering::Relaxed))
}

/// Set log level at runtime.
pub fn set_level(level: Level) {
    init();
    LOG_LEVEL.store(level as u8, Ordering::SeqCst);
}

/// Enable or disable debug mode at runtime.
pub fn set_debug(enabled: bool) {
    init();
    DEBUG_ENABLED.store(enabled, Ordering::SeqCst);
    if enabled && current_level() > Level::Debug {
        set_level(Level::Debug);
    }
}

/// Get the global configuration.
pub fn config() -> &'static LogConfig {
    &CONFIG
}

// ============================================================================
// Records and capture
// ============================================================================

/// A single emitted log record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Severity
    pub level: Level,
    /// Target, usually a `lokyn::*` path
    pub target: String,
    /// Formatted message
    pub message: String,
}

thread_local! {
    static CAPTURED: RefCell<Option<Vec<Record>>> = const { RefCell::new(None) };
}

/// Run `f` and collect every record it emits on the current thread.
///
/// Captured records are not written to stderr nor forwarded to `log`.
/// Records still have to pass the level filter to be captured.
///
/// ```rust
/// use lokyn_log::{capture, warn, Level};
///
/// let (value, records) = capture(|| {
///     warn!(target: "lokyn::lookup", "missing key");
///     42
/// });
/// assert_eq!(value, 42);
/// assert_eq!(records[0].level, Level::Warn);
/// assert_eq!(records[0].target, "lokyn::lookup");
/// ```
pub fn capture<R>(f: impl FnOnce() -> R) -> (R, Vec<Record>) {
    let previous = CAPTURED.with(|slot| slot.borrow_mut().replace(Vec::new()));
    let value = f();
    let records = CAPTURED.with(|slot| {
        let mut slot = slot.borrow_mut();
        let records = slot.take().unwrap_or_default();
        *slot = previous;
        records
    });
    (value, records)
}

fn try_capture(level: Level, target: &str, message: &str) -> bool {
    CAPTURED.with(|slot| match slot.borrow_mut().as_mut() {
        Some(records) => {
            records.push(Record {
                level,
                target: target.to_string(),
                message: message.to_string(),
            });
            true
        }
        None => false,
    })
}

// ============================================================================
// Output
// ============================================================================

/// Emit a record. Used by the macros.
#[doc(hidden)]
pub fn log(level: Level, target: &str, message: &str) {
    if !enabled(level) || try_capture(level, target, message) {
        return;
    }

    let config = config();
    match config.format {
        Format::Json => write_json(level, target, message),
        text => write_text(text, level, target, message, config),
    }

    if let Some(facade_level) = level.to_log_level() {
        log::log!(target: target, facade_level, "{}", message);
    }
}

fn write_text(format: Format, level: Level, target: &str, message: &str, config: &LogConfig) {
    let mut line = String::with_capacity(message.len() + 48);

    if config.timestamps {
        let stamp = match format {
            Format::Compact => "%H:%M:%S",
            _ => "%Y-%m-%d %H:%M:%S%.3f",
        };
        line.push_str(&chrono::Local::now().format(stamp).to_string());
        line.push(' ');
    }

    match format {
        Format::Compact => line.push(level.as_str().chars().next().unwrap_or('?')),
        _ => line.push_str(&level_label(level, config)),
    }
    line.push(' ');

    if config.module_path && !target.is_empty() {
        match format {
            Format::Compact => line.push_str(&format!("{}: ", target)),
            _ => line.push_str(&format!("[{}] ", target)),
        }
    }

    line.push_str(message);
    let _ = writeln!(std::io::stderr().lock(), "{}", line);
}

#[cfg(feature = "color")]
fn level_label(level: Level, config: &LogConfig) -> String {
    if config.color {
        format!("{:5}", level.colored())
    } else {
        format!("{:5}", level.as_str())
    }
}

#[cfg(not(feature = "color"))]
fn level_label(level: Level, _config: &LogConfig) -> String {
    format!("{:5}", level.as_str())
}

#[cfg(feature = "json")]
fn write_json(level: Level, target: &str, message: &str) {
    let entry = serde_json::json!({
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "level": level.as_str(),
        "target": target,
        "message": message,
    });
    let _ = writeln!(std::io::stderr().lock(), "{}", entry);
}

#[cfg(not(feature = "json"))]
fn write_json(level: Level, target: &str, message: &str) {
    let _ = writeln!(
        std::io::stderr().lock(),
        r#"{{"timestamp":"{}","level":"{}","target":{:?},"message":{:?}}}"#,
        chrono::Utc::now().to_rfc3339(),
        level.as_str(),
        target,
        message
    );
}

// ============================================================================
// Macros
// ============================================================================

#[doc(hidden)]
#[macro_export]
macro_rules! __lokyn_log {
    ($level:expr, target: $target:expr, $($arg:tt)+) => {{
        let level = $level;
        if $crate::enabled(level) {
            $crate::log(level, $target, &::std::format!($($arg)+));
        }
    }};
    ($level:expr, $($arg:tt)+) => {
        $crate::__lokyn_log!($level, target: ::std::module_path!(), $($arg)+)
    };
}

/// Log a trace message.
#[macro_export]
macro_rules! trace {
    ($($arg:tt)+) => { $crate::__lokyn_log!($crate::Level::Trace, $($arg)+) };
}

/// Log a debug message.
///
/// Enabled by `LOKYN_DEBUG=1` or `LOKYN_LOG_LEVEL=debug`.
///
/// ```rust
/// use lokyn_log::debug;
///
/// let file = "fr.json";
/// debug!(target: "lokyn::registry", "Parsed {}", file);
/// ```
#[macro_export]
macro_rules! debug {
    ($($arg:tt)+) => { $crate::__lokyn_log!($crate::Level::Debug, $($arg)+) };
}

/// Log an info message.
#[macro_export]
macro_rules! info {
    ($($arg:tt)+) => { $crate::__lokyn_log!($crate::Level::Info, $($arg)+) };
}

/// Log a warning.
#[macro_export]
macro_rules! warn {
    ($($arg:tt)+) => { $crate::__lokyn_log!($crate::Level::Warn, $($arg)+) };
}

/// Log an error.
#[macro_export]
macro_rules! error {
    ($($arg:tt)+) => { $crate::__lokyn_log!($crate::Level::Error, $($arg)+) };
}
