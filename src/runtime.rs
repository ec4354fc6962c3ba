//////////////////////////////////////////////////////////////////
/// runtime.rs
///
/// Forth Runtime Engine
///
/// This module defines the ForthRuntime struct, which contains the state of the Forth interpreter:
/// the kernel with its two stacks, the dictionary, the parser for the line being evaluated, and
/// the compile mode. It provides cold_start and eval, the entry point for one line of input.
///

use crate::internals::dictionary::Dictionary;
use crate::internals::error::ForthResult;
use crate::internals::messages::Msg;
use crate::internals::parser::WordParser;
use crate::internals::token::Flow;
use crate::kernel::Kernel;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Immediate,
    Compile,
}

pub struct ForthRuntime {
    pub kernel: Kernel,             // data and return stacks
    pub dictionary: Dictionary,     // every installed word
    pub parser: WordParser,         // the line being evaluated
    pub mode: Mode,
    pub compiling: Option<String>,  // name of the word between : and ;
    pub output: String,             // text produced by the current line
    pub exit_flag: bool,            // set when the "bye" word is executed.
    pub msg: Msg,
    pub call_depth: usize,          // nesting of token runs, bounded by MAX_DEPTH
}

impl Default for ForthRuntime {
    fn default() -> Self {
        ForthRuntime::new()
    }
}

impl ForthRuntime {
    pub fn new() -> ForthRuntime {
        let mut runtime = ForthRuntime {
            kernel: Kernel::new(),
            dictionary: Dictionary::new(),
            parser: WordParser::default(),
            mode: Mode::Immediate,
            compiling: None,
            output: String::new(),
            exit_flag: false,
            msg: Msg::new(),
            call_depth: 0,
        };
        runtime.cold_start();
        runtime
    }

    /// cold_start is where the interpreter begins, installing the builtin functions.
    pub fn cold_start(&mut self) {
        self.compile_builtins();
        self.mode = Mode::Immediate;
    }

    /// get_compile_mode determines whether or not compile mode is active
    ///
    pub fn get_compile_mode(&self) -> bool {
        self.mode == Mode::Compile
    }

    /// set_compile_mode turns on compilation mode
    ///
    pub fn set_compile_mode(&mut self, value: bool) {
        self.mode = if value { Mode::Compile } else { Mode::Immediate };
    }

    /// eval runs one line of input and returns the response.
    ///     The response is the text the line printed, followed by " ok", " compiled" if a
    ///     definition is still open, or " ? " and the error. QUIT returns the text alone.
    ///
    pub fn eval(&mut self, line: &str) -> String {
        self.parser = WordParser::new(line);
        self.output.clear();
        let result = self.f_eval();
        let mut response = std::mem::take(&mut self.output);
        match result {
            Ok(Flow::Quit) => {}
            Ok(_) => {
                if self.get_compile_mode() {
                    response.push_str(" compiled");
                } else {
                    response.push_str(" ok");
                }
            }
            Err(e) => {
                self.msg.info("eval", "error", Some(&e));
                self.f_abort();
                response.push_str(&format!(" ? {e}"));
            }
        }
        response
    }

    /// abort empties the stacks, drops any partial definition, and returns to interpret mode
    ///
    pub fn f_abort(&mut self) {
        self.kernel.reset();
        self.compiling = None;
        self.call_depth = 0;
        self.set_compile_mode(false);
    }

    /// QUIT ( -- ) abandons the rest of the line. The stacks are left as they are.
    pub fn f_quit(&mut self) -> ForthResult<Flow> {
        Ok(Flow::Quit)
    }

    pub fn should_exit(&self) -> bool {
        // Method to determine if we should exit
        self.exit_flag
    }

    /// BYE ( -- ) stops the line like QUIT, and tells the front end to finish
    pub fn f_bye(&mut self) -> ForthResult<Flow> {
        self.exit_flag = true;
        Ok(Flow::Quit)
    }
}
