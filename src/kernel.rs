//////////////////////////////////////////////////////////////
/// Forth Interpreter Kernel
///
/// This module contains the core data structures for the Forth interpreter: the data stack and
/// the return stack, with the checked accessors the builtins use.
///
/// Both stacks hold tagged cells. At run time they carry plain numbers. While a definition is
/// being compiled the data stack doubles as the accumulation buffer for pending tokens, and the
/// return stack records which control structures are open. The tag keeps the two uses apart.
///
use std::fmt;

use crate::internals::error::{ForthError, ForthResult};
use crate::internals::token::{Marker, Token};

// GENERAL constants
pub const TRUE: i64 = -1; // forth convention for true and false
pub const FALSE: i64 = 0;

/// One stack slot
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Value(i64),
    Pending(Token),
    Marker(Marker),
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Cell::Value(n) => write!(f, "{n}"),
            Cell::Pending(token) => write!(f, "{token}"),
            Cell::Marker(marker) => write!(f, "{marker}"),
        }
    }
}

impl Cell {
    fn into_value(self) -> ForthResult<i64> {
        match self {
            Cell::Value(n) => Ok(n),
            other => Err(ForthError::UnknownToken(other.to_string())),
        }
    }
}

pub fn flag(b: bool) -> i64 {
    if b {
        TRUE
    } else {
        FALSE
    }
}

#[derive(Debug, Default)]
pub struct Kernel {
    stack: Vec<Cell>,        // the calculation stack
    return_stack: Vec<Cell>, // for do loops, >r, and compile-time markers
}

impl Kernel {
    pub fn new() -> Kernel {
        Kernel::default()
    }

    /// reset() clears the stacks.
    ///
    pub fn reset(&mut self) {
        self.stack.clear();
        self.return_stack.clear();
    }

    /// Safe stack accessors
    #[inline(always)]
    pub fn push(&mut self, val: i64) {
        self.stack.push(Cell::Value(val));
    }

    #[inline(always)]
    pub fn pop(&mut self) -> ForthResult<i64> {
        self.stack
            .pop()
            .ok_or(ForthError::StackUnderflow)?
            .into_value()
    }

    /// peek returns the value n items below the top without removing it
    #[inline(always)]
    pub fn peek(&self, n: usize) -> ForthResult<i64> {
        let len = self.stack.len();
        if n >= len {
            return Err(ForthError::StackUnderflow);
        }
        self.stack[len - 1 - n].clone().into_value()
    }

    #[inline(always)]
    pub fn top(&self) -> ForthResult<i64> {
        self.peek(0)
    }

    #[inline(always)]
    pub fn stack_len(&self) -> usize {
        self.stack.len()
    }

    /// stack_check checks if there are enough items on the stack for an operation
    #[inline(always)]
    pub fn stack_check(&self, needed: usize) -> ForthResult<()> {
        if self.stack.len() < needed {
            Err(ForthError::StackUnderflow)
        } else {
            Ok(())
        }
    }

    /// pop_n removes the top n values, returning them in stack order (deepest first).
    ///     Nothing is removed if the stack is too shallow.
    pub fn pop_n<const N: usize>(&mut self) -> ForthResult<[i64; N]> {
        self.stack_check(N)?;
        let mut vals = [0; N];
        for (i, slot) in vals.iter_mut().enumerate() {
            *slot = self.peek(N - 1 - i)?;
        }
        self.stack.truncate(self.stack.len() - N);
        Ok(vals)
    }

    pub fn pop2_push1<F>(&mut self, f: F) -> ForthResult<()>
    where
        F: Fn(i64, i64) -> ForthResult<i64>,
    {
        let [j, k] = self.pop_n::<2>()?;
        match f(j, k) {
            Ok(v) => {
                self.push(v);
                Ok(())
            }
            Err(e) => {
                // put the operands back so a failed operation leaves the stack as it was
                self.push(j);
                self.push(k);
                Err(e)
            }
        }
    }

    pub fn pop1_push1<F>(&mut self, f: F) -> ForthResult<()>
    where
        F: Fn(i64) -> i64,
    {
        let x = self.pop()?;
        self.push(f(x));
        Ok(())
    }

    /// values returns the numbers on the stack, bottom first
    pub fn values(&self) -> Vec<i64> {
        self.stack
            .iter()
            .filter_map(|c| match c {
                Cell::Value(n) => Some(*n),
                _ => None,
            })
            .collect()
    }

    pub fn push_cell(&mut self, cell: Cell) {
        self.stack.push(cell);
    }

    /// pop_to_marker removes every pending token above the given marker, and the marker itself,
    ///     returning the tokens in the order they were compiled.
    ///
    pub fn pop_to_marker(&mut self, marker: Marker) -> ForthResult<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            match self.stack.pop() {
                Some(Cell::Pending(token)) => tokens.push(token),
                Some(Cell::Marker(m)) if m == marker => break,
                Some(Cell::Marker(m)) => return Err(ForthError::Unclosed(m)),
                Some(other) => return Err(ForthError::UnknownToken(other.to_string())),
                None => return Err(ForthError::Missing(marker)),
            }
        }
        tokens.reverse();
        Ok(tokens)
    }

    // Return stack

    #[inline(always)]
    pub fn push_r(&mut self, val: i64) {
        self.return_stack.push(Cell::Value(val));
    }

    #[inline(always)]
    pub fn pop_r(&mut self) -> ForthResult<i64> {
        self.return_stack
            .pop()
            .ok_or(ForthError::ReturnStackUnderflow)?
            .into_value()
    }

    /// peek_r reads the return stack n items below the top
    #[inline(always)]
    pub fn peek_r(&self, n: usize) -> ForthResult<i64> {
        let len = self.return_stack.len();
        if n >= len {
            return Err(ForthError::ReturnStackUnderflow);
        }
        self.return_stack[len - 1 - n].clone().into_value()
    }

    pub fn return_len(&self) -> usize {
        self.return_stack.len()
    }

    pub fn push_marker_r(&mut self, marker: Marker) {
        self.return_stack.push(Cell::Marker(marker));
    }

    /// top_marker_r returns the innermost open control structure, if the top of the return stack
    ///     is a marker at all
    pub fn top_marker_r(&self) -> Option<Marker> {
        match self.return_stack.last() {
            Some(Cell::Marker(m)) => Some(*m),
            _ => None,
        }
    }

    pub fn pop_marker_r(&mut self) -> Option<Marker> {
        let marker = self.top_marker_r()?;
        self.return_stack.pop();
        Some(marker)
    }
}
