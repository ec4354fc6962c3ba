// Messages: a small leveled logger for warnings and diagnostics
//
// Forth-level output goes into the evaluation response. Everything the machine wants to say
// about itself (redefinitions, errors, dispatch tracing) goes through Msg, on stderr.

use std::fmt::Debug;

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub enum DebugLevel {
    Error,
    Warning,
    Info,
    Debug,
}

impl DebugLevel {
    /// Maps the numeric argument of DBG (and -d on the command line) to a level
    pub fn from_number(n: i64) -> DebugLevel {
        match n {
            i64::MIN..=0 => DebugLevel::Error,
            1 => DebugLevel::Warning,
            2 => DebugLevel::Info,
            _ => DebugLevel::Debug,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Msg {
    level: DebugLevel,
}

impl Msg {
    pub fn new() -> Msg {
        Msg {
            level: DebugLevel::Warning,
        }
    }

    pub fn set_level(&mut self, level: DebugLevel) {
        self.level = level;
    }

    pub fn get_level(&self) -> DebugLevel {
        self.level
    }

    /// enabled reports whether a message at this level would be shown
    pub fn enabled(&self, level: DebugLevel) -> bool {
        level <= self.level
    }

    pub fn error<T: Debug>(&self, context: &str, text: &str, detail: Option<T>) {
        self.show(DebugLevel::Error, "ERROR", context, text, detail);
    }

    pub fn warning<T: Debug>(&self, context: &str, text: &str, detail: Option<T>) {
        self.show(DebugLevel::Warning, "WARNING", context, text, detail);
    }

    pub fn info<T: Debug>(&self, context: &str, text: &str, detail: Option<T>) {
        self.show(DebugLevel::Info, "INFO", context, text, detail);
    }

    pub fn debug<T: Debug>(&self, context: &str, text: &str, detail: Option<T>) {
        self.show(DebugLevel::Debug, "DEBUG", context, text, detail);
    }

    fn show<T: Debug>(&self, level: DebugLevel, tag: &str, context: &str, text: &str, detail: Option<T>) {
        if !self.enabled(level) {
            return;
        }
        match detail {
            Some(d) => eprintln!("{tag}: {context}: {text}: {d:?}"),
            None => eprintln!("{tag}: {context}: {text}"),
        }
    }
}

impl Default for Msg {
    fn default() -> Self {
        Msg::new()
    }
}
