// system configuration and command line processing

use argh::FromArgs;

use crate::internals::messages::DebugLevel;

pub const VERSION: &str = "0.1.0";

#[derive(FromArgs, Debug, PartialEq)]
/// command line arguments for fm.
pub struct Config {
    /// evaluate a source file before the prompt.
    #[argh(option, short = 'f')]
    pub file: Option<String>,

    /// read plain lines from stdin, without the line editor.
    #[argh(switch, short = 'p')]
    pub plain: bool,

    /// message level: 0 error, 1 warning, 2 info, 3 debug.
    #[argh(option, short = 'd', default = "1")]
    pub debug_level: i64,

    /// don't print the banner.
    #[argh(switch, short = 'q')]
    pub quiet: bool,
}

impl Config {
    pub fn new() -> Self {
        Self {
            file: None,
            plain: false,
            debug_level: 1,
            quiet: false,
        }
    }

    pub fn process_args(&mut self) {
        let args: Config = argh::from_env();
        *self = args;
    }

    pub fn level(&self) -> DebugLevel {
        DebugLevel::from_number(self.debug_level)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::new()
    }
}
