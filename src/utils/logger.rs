use chrono::Local;
use std::fmt::Arguments;
use std::sync::atomic::{AtomicU8, Ordering};

/// Severity of a log line. Ordered so that a higher value is more severe.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Debug = 0,
    Info = 1,
    Warn = 2,
    Error = 3,
}

impl Level {
    /// Parses a level name as found in the settings file. Unknown names fall back to `Info`.
    pub fn parse(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "debug" => Level::Debug,
            "warn" | "warning" => Level::Warn,
            "error" => Level::Error,
            _ => Level::Info,
        }
    }
}

static MIN_LEVEL: AtomicU8 = AtomicU8::new(Level::Info as u8);

pub struct Logger;

impl Logger {
    pub fn set_level(level: Level) {
        MIN_LEVEL.store(level as u8, Ordering::Relaxed);
    }

    pub fn enabled(level: Level) -> bool {
        level as u8 >= MIN_LEVEL.load(Ordering::Relaxed)
    }

    pub fn info(args: Arguments) {
        if Logger::enabled(Level::Info) {
            println!("[INFO ] [{}] {args}", Logger::timestamp());
        }
    }

    pub fn debug(args: Arguments) {
        if Logger::enabled(Level::Debug) {
            println!("[DEBUG] [{}] {args}", Logger::timestamp());
        }
    }

    pub fn warn(args: Arguments) {
        if Logger::enabled(Level::Warn) {
            eprintln!("[WARN ] [{}] {args}", Logger::timestamp());
        }
    }

    pub fn error(args: Arguments) {
        if Logger::enabled(Level::Error) {
            eprintln!("[ERROR] [{}] {args}", Logger::timestamp());
        }
    }

    fn timestamp() -> String {
        Local::now().format("%d/%m/%Y %H:%M:%S").to_string()
    }
}

#[macro_export]
macro_rules! logger {
    (INFO, $($arg:tt)*) => {
        $crate::utils::logger::Logger::info(format_args!($($arg)*))
    };
    (DEBUG, $($arg:tt)*) => {
        $crate::utils::logger::Logger::debug(format_args!($($arg)*))
    };
    (WARN, $($arg:tt)*) => {
        $crate::utils::logger::Logger::warn(format_args!($($arg)*))
    };
    (ERROR, $($arg:tt)*) => {
        $crate::utils::logger::Logger::error(format_args!($($arg)*))
    };
}
