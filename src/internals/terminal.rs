use crossterm::terminal::{disable_raw_mode, enable_raw_mode, is_raw_mode_enabled};
use std::io;

/// Puts the terminal in raw mode for the lifetime of the guard
///     Dropping the guard restores cooked mode, including on early return.
pub struct RawMode;

impl RawMode {
    pub fn enable() -> io::Result<RawMode> {
        enable_raw_mode()?;
        Ok(RawMode)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

/// Make sure the terminal is left in cooked mode
pub fn restore() -> io::Result<()> {
    if is_raw_mode_enabled()? {
        disable_raw_mode()?;
    }
    Ok(())
}
