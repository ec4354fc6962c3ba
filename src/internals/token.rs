/// Tokens and control markers
///
/// A word body is a tree of tokens. Control structures are folded into single nodes at compile
/// time, so the executor never sees IF or DO as words, only Branch and Loop nodes.
use std::fmt;
use std::rc::Rc;

use crate::internals::dictionary::Word;

#[derive(Debug, Clone)]
pub enum Token {
    Number(i64),
    Call(Rc<Word>),
    Unresolved(String),
    Loop { body: Vec<Token>, step: Step },
    Branch { if_true: Vec<Token>, if_false: Vec<Token> },
    While { condition: Vec<Token>, body: Vec<Token> },
    Leave,
}

/// Increment applied to a DO loop index after each pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    Fixed(i64),   // LOOP
    FromStack,    // +LOOP
}

/// Open control structures, as recorded on the return stack while compiling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Colon,
    If,
    Else,
    Do,
    Begin,
    While,
}

/// What happened to a run of tokens that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Next,  // ran to the end
    Leave, // LEAVE: unwinding to the nearest loop
    Quit,  // QUIT or BYE: abandon the rest of the line
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Token::Number(a), Token::Number(b)) => a == b,
            (Token::Call(a), Token::Call(b)) => Rc::ptr_eq(a, b),
            (Token::Unresolved(a), Token::Unresolved(b)) => a == b,
            (Token::Loop { body: b1, step: s1 }, Token::Loop { body: b2, step: s2 }) => {
                b1 == b2 && s1 == s2
            }
            (
                Token::Branch { if_true: t1, if_false: f1 },
                Token::Branch { if_true: t2, if_false: f2 },
            ) => t1 == t2 && f1 == f2,
            (
                Token::While { condition: c1, body: b1 },
                Token::While { condition: c2, body: b2 },
            ) => c1 == c2 && b1 == b2,
            (Token::Leave, Token::Leave) => true,
            _ => false,
        }
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Marker::Colon => ":",
            Marker::If => "IF",
            Marker::Else => "ELSE",
            Marker::Do => "DO",
            Marker::Begin => "BEGIN",
            Marker::While => "WHILE",
        };
        write!(f, "{name}")
    }
}

/// Writes a token sequence back out as source text, separated by single spaces
pub fn write_tokens(f: &mut fmt::Formatter, tokens: &[Token]) -> fmt::Result {
    for token in tokens {
        write!(f, "{token} ")?;
    }
    Ok(())
}

/// Decompiled form, used by SEE
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{n}"),
            Token::Call(word) => write!(f, "{}", word.name),
            Token::Unresolved(name) => write!(f, "{name}"),
            Token::Loop { body, step } => {
                write!(f, "DO ")?;
                write_tokens(f, body)?;
                match step {
                    Step::Fixed(_) => write!(f, "LOOP"),
                    Step::FromStack => write!(f, "+LOOP"),
                }
            }
            Token::Branch { if_true, if_false } => {
                write!(f, "IF ")?;
                write_tokens(f, if_true)?;
                if !if_false.is_empty() {
                    write!(f, "ELSE ")?;
                    write_tokens(f, if_false)?;
                }
                write!(f, "THEN")
            }
            Token::While { condition, body } => {
                write!(f, "BEGIN ")?;
                write_tokens(f, condition)?;
                write!(f, "WHILE ")?;
                write_tokens(f, body)?;
                write!(f, "REPEAT")
            }
            Token::Leave => write!(f, "LEAVE"),
        }
    }
}
