/// Inner Interpreters
///
/// Core functions to execute specific types of tokens
///
use std::rc::Rc;

use crate::internals::dictionary::{Behavior, Word};
use crate::internals::error::{ForthError, ForthResult};
use crate::internals::token::{Flow, Step, Token};
use crate::runtime::ForthRuntime;

/// Deepest nesting of token runs: definitions calling definitions, and control structures
/// inside them. The compiler refuses structures nested deeper than this.
pub const MAX_DEPTH: usize = 256;

impl ForthRuntime {
    /// execute runs a token sequence against the stacks.
    ///
    ///     The first token that does not finish normally stops the run: an error propagates, and a
    ///     Leave or Quit flow is handed back for an enclosing loop (or the outer interpreter) to
    ///     deal with.
    ///     Every nested run (a definition body, a loop body, a branch arm) counts against
    ///     MAX_DEPTH, so deep trees or long call chains fail cleanly instead of exhausting the
    ///     native stack.
    ///
    pub fn execute(&mut self, tokens: &[Token]) -> ForthResult<Flow> {
        if self.call_depth >= MAX_DEPTH {
            return Err(ForthError::TooDeep);
        }
        self.call_depth += 1;
        let result = self.execute_sequence(tokens);
        self.call_depth -= 1;
        result
    }

    fn execute_sequence(&mut self, tokens: &[Token]) -> ForthResult<Flow> {
        for token in tokens {
            match self.execute_token(token)? {
                Flow::Next => {}
                flow => return Ok(flow),
            }
        }
        Ok(Flow::Next)
    }

    pub fn execute_token(&mut self, token: &Token) -> ForthResult<Flow> {
        match token {
            Token::Number(n) => {
                self.kernel.push(*n);
                Ok(Flow::Next)
            }
            Token::Call(word) => self.call_word(word),
            Token::Unresolved(name) => Err(ForthError::UndefinedWord(name.clone())),
            Token::Loop { body, step } => self.i_loop(body, *step),
            Token::Branch { if_true, if_false } => self.i_branch(if_true, if_false),
            Token::While { condition, body } => self.i_while(condition, body),
            Token::Leave => Ok(Flow::Leave),
        }
    }

    /// call_word runs a primitive or a colon definition. Anything else has no run-time meaning.
    ///
    pub fn call_word(&mut self, word: &Rc<Word>) -> ForthResult<Flow> {
        self.msg.debug("call", &word.name, Some(self.call_depth));
        match &word.behavior {
            Behavior::Primitive(builtin) => builtin.call(self),
            Behavior::Definition(body) => {
                let body = Rc::clone(body);
                self.i_definition(&body)
            }
            Behavior::CompileOnly(_) => Err(ForthError::CompileOnly),
            Behavior::InterpretOnly(_) | Behavior::Immediate(_) => {
                Err(ForthError::UnknownToken(word.name.clone()))
            }
        }
    }

    /// Runs the body of a colon definition. LEAVE and QUIT pass through to the caller.
    ///
    fn i_definition(&mut self, body: &[Token]) -> ForthResult<Flow> {
        self.execute(body)
    }

    /// DO .. LOOP / +LOOP
    ///
    ///     ( limit start -- ) The index lives on the return stack while the body runs, where I and
    ///     J can see it. LEAVE ends the loop early; QUIT unwinds through it.
    ///
    fn i_loop(&mut self, body: &[Token], step: Step) -> ForthResult<Flow> {
        let [limit, start] = self.kernel.pop_n::<2>()?;
        let mut index = start;
        while index < limit {
            self.kernel.push_r(index);
            let flow = self.execute(body)?;
            self.kernel.pop_r()?;
            match flow {
                Flow::Next => {}
                Flow::Leave => break,
                Flow::Quit => return Ok(Flow::Quit),
            }
            let delta = match step {
                Step::Fixed(n) => n,
                Step::FromStack => self.kernel.pop()?,
            };
            // an index that would pass i64::MAX has run past any limit
            match index.checked_add(delta) {
                Some(next) => index = next,
                None => break,
            }
        }
        Ok(Flow::Next)
    }

    /// IF .. ELSE .. THEN
    ///
    fn i_branch(&mut self, if_true: &[Token], if_false: &[Token]) -> ForthResult<Flow> {
        if self.kernel.pop()? != 0 {
            self.execute(if_true)
        } else {
            self.execute(if_false)
        }
    }

    /// BEGIN .. WHILE .. REPEAT, and BEGIN .. UNTIL with an empty body
    ///
    fn i_while(&mut self, condition: &[Token], body: &[Token]) -> ForthResult<Flow> {
        loop {
            match self.execute(condition)? {
                Flow::Next => {}
                Flow::Leave => return Ok(Flow::Next),
                Flow::Quit => return Ok(Flow::Quit),
            }
            if self.kernel.pop()? == 0 {
                return Ok(Flow::Next);
            }
            match self.execute(body)? {
                Flow::Next => {}
                Flow::Leave => return Ok(Flow::Next),
                Flow::Quit => return Ok(Flow::Quit),
            }
        }
    }
}
