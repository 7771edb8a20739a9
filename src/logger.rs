//! Structured logging with box-drawing output.
//!
//! Chart rendering and diagnostics share one visual style:
//!
//! ```text
//! ┏ saju v0.4.0 ━━╸
//! ┃
//! ┣ Four pillars
//! ┃   year   甲辰 (갑진)
//! ┣[WARNING] primary ephemeris unavailable, using approximate engine
//! ╹
//! ```
//!
//! ## Conventions
//!
//! - `log_block_start!` opens a section: an empty `┃` line, then `┣ message`.
//! - `log_decorated!` continues a section with `┣ message`.
//! - `log_indented!` prints nested detail as `┃   message`.
//! - `log_pipe!` inserts one empty `┃` line, typically before a levelled message.
//! - `log_version!` / `log_end!` frame the whole run.
//! - `log_info!`, `log_warning!`, `log_error!` and `log_debug!` carry a
//!   `[LEVEL]` tag. `log_debug!` prints only after `Log::set_debug(true)`.
//!
//! Output goes to stdout unless `Log::start_file_logging` routed it to a
//! file, in which case colour codes are stripped.

use std::io::Write;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Sender, channel};

static LOGGING_ENABLED: AtomicBool = AtomicBool::new(true);
static DEBUG_ENABLED: AtomicBool = AtomicBool::new(false);

static LOG_CHANNEL: OnceLock<Sender<LogMessage>> = OnceLock::new();

enum LogMessage {
    Line(String),
    Shutdown,
}

/// Levelled message tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warning,
    Error,
    Debug,
}

impl Level {
    fn tag(self) -> &'static str {
        match self {
            Level::Info => "\x1b[32mINFO\x1b[0m",
            Level::Warning => "\x1b[33mWARNING\x1b[0m",
            Level::Error => "\x1b[31mERROR\x1b[0m",
            Level::Debug => "\x1b[36mDEBUG\x1b[0m",
        }
    }
}

/// Logging switches.
pub struct Log;

impl Log {
    /// Silence or restore all output, e.g. while printing JSON.
    pub fn set_enabled(enabled: bool) {
        LOGGING_ENABLED.store(enabled, Ordering::SeqCst);
    }

    pub fn is_enabled() -> bool {
        LOGGING_ENABLED.load(Ordering::SeqCst)
    }

    /// Show `log_debug!` output (term solves, corrections, engine choice).
    pub fn set_debug(enabled: bool) {
        DEBUG_ENABLED.store(enabled, Ordering::SeqCst);
    }

    pub fn is_debug() -> bool {
        DEBUG_ENABLED.load(Ordering::SeqCst)
    }

    /// Route all further output to `file_path` until the guard drops.
    pub fn start_file_logging(file_path: String) -> anyhow::Result<LoggerGuard> {
        let mut file = std::fs::File::create(&file_path)
            .map_err(|e| anyhow::anyhow!("cannot create log file {file_path}: {e}"))?;
        let (tx, rx) = channel();

        LOG_CHANNEL
            .set(tx.clone())
            .map_err(|_| anyhow::anyhow!("file logging already started"))?;

        let handle = std::thread::spawn(move || {
            while let Ok(LogMessage::Line(text)) = rx.recv() {
                file.write_all(text.as_bytes())?;
            }
            file.flush()?;
            Ok::<(), anyhow::Error>(())
        });

        Ok(LoggerGuard {
            tx,
            handle: Some(handle),
        })
    }
}

/// Flushes and closes the log file on drop.
pub struct LoggerGuard {
    tx: Sender<LogMessage>,
    handle: Option<std::thread::JoinHandle<anyhow::Result<()>>>,
}

impl Drop for LoggerGuard {
    fn drop(&mut self) {
        let _ = self.tx.send(LogMessage::Shutdown);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn strip_ansi_codes(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\x1b' && chars.peek() == Some(&'[') {
            chars.next();
            for c in chars.by_ref() {
                if c == 'm' {
                    break;
                }
            }
        } else {
            result.push(ch);
        }
    }

    result
}

/// Write one already-formatted chunk of output.
pub fn write_output(text: &str) {
    if !Log::is_enabled() {
        return;
    }
    if let Some(tx) = LOG_CHANNEL.get() {
        let _ = tx.send(LogMessage::Line(strip_ansi_codes(text)));
    } else {
        print!("{text}");
        let _ = std::io::stdout().flush();
    }
}

/// Write a `┣[LEVEL] message` line.
pub fn write_levelled(level: Level, message: &str) {
    if level == Level::Debug && !Log::is_debug() {
        return;
    }
    write_output(&format!("┣[{}] {message}\n", level.tag()));
}

// # Logging Macros

/// `┣ message`
#[macro_export]
macro_rules! log_decorated {
    ($($arg:tt)+) => {{
        $crate::logger::write_output(&format!("┣ {}\n", format_args!($($arg)+)));
    }};
}

/// `┃   message`
#[macro_export]
macro_rules! log_indented {
    ($($arg:tt)+) => {{
        $crate::logger::write_output(&format!("┃   {}\n", format_args!($($arg)+)));
    }};
}

/// `┃`
#[macro_export]
macro_rules! log_pipe {
    () => {{
        $crate::logger::write_output("┃\n");
    }};
}

/// `┃` then `┣ message`
#[macro_export]
macro_rules! log_block_start {
    ($($arg:tt)+) => {{
        $crate::logger::write_output(&format!("┃\n┣ {}\n", format_args!($($arg)+)));
    }};
}

/// `┏ saju vX.Y.Z ━━╸`
#[macro_export]
macro_rules! log_version {
    () => {{
        $crate::logger::write_output(&format!(
            "┏ saju v{} ━━╸\n",
            env!("CARGO_PKG_VERSION")
        ));
    }};
}

/// `╹`
#[macro_export]
macro_rules! log_end {
    () => {{
        $crate::logger::write_output("╹\n");
    }};
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)+) => {{
        $crate::logger::write_levelled(
            $crate::logger::Level::Info,
            &format!($($arg)+),
        );
    }};
}

#[macro_export]
macro_rules! log_warning {
    ($($arg:tt)+) => {{
        $crate::logger::write_levelled(
            $crate::logger::Level::Warning,
            &format!($($arg)+),
        );
    }};
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)+) => {{
        $crate::logger::write_levelled(
            $crate::logger::Level::Error,
            &format!($($arg)+),
        );
    }};
}

/// Printed only when debug output is on.
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)+) => {{
        if $crate::logger::Log::is_debug() {
            $crate::logger::write_levelled(
                $crate::logger::Level::Debug,
                &format!($($arg)+),
            );
        }
    }};
}
