/// Output words
///
///     Nothing here prints directly. Text goes to the runtime's output buffer, which becomes the
///     body of the evaluation response; the front end decides where it is shown.
///
use crate::internals::error::{ForthError, ForthResult};
use crate::internals::token::Flow;
use crate::runtime::ForthRuntime;

const PAGE_LINES: usize = 100;

impl ForthRuntime {
    /// . ( n -- ) pops the top of the stack and prints it, followed by a space
    ///
    pub fn f_dot(&mut self) -> ForthResult<Flow> {
        let n = self.kernel.pop()?;
        self.output.push_str(&format!("{n} "));
        Ok(Flow::Next)
    }

    /// .S ( -- ) prints a copy of the computation stack, bottom first
    ///
    pub fn f_dot_s(&mut self) -> ForthResult<Flow> {
        let items: Vec<String> = self.kernel.values().iter().map(|n| n.to_string()).collect();
        self.output.push_str(&format!("[{}] ", items.join(", ")));
        Ok(Flow::Next)
    }

    /// EMIT ( c -- ) takes a code point from the stack and prints it as a character.
    ///
    pub fn f_emit(&mut self) -> ForthResult<Flow> {
        let c = self.kernel.top()?;
        let ch = u32::try_from(c)
            .ok()
            .and_then(char::from_u32)
            .ok_or(ForthError::InvalidChar(c))?;
        self.kernel.pop()?;
        self.output.push(ch);
        Ok(Flow::Next)
    }

    pub fn f_cr(&mut self) -> ForthResult<Flow> {
        self.output.push('\n');
        Ok(Flow::Next)
    }

    /// PAGE ( -- ) pushes the previous contents off the screen. No cursor control is assumed.
    pub fn f_page(&mut self) -> ForthResult<Flow> {
        self.output.push_str(&"\n".repeat(PAGE_LINES));
        Ok(Flow::Next)
    }

    /// WORDS ( -- ) lists the dictionary, newest first
    ///
    pub fn f_words(&mut self) -> ForthResult<Flow> {
        let mut text = String::new();
        for name in self.dictionary.names() {
            text.push_str(name);
            text.push(' ');
        }
        self.output.push_str(&text);
        Ok(Flow::Next)
    }
}
