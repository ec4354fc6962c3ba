// Compiler and Interpreter

use std::rc::Rc;

use crate::internals::dictionary::{Behavior, Dictionary, Word};
use crate::internals::error::{ForthError, ForthResult};
use crate::internals::inner::MAX_DEPTH;
use crate::internals::token::{write_tokens, Flow, Marker, Step, Token};
use crate::kernel::{Cell, FALSE, TRUE};
use crate::runtime::ForthRuntime;

/// classify turns a raw word into a token.
///     Numbers win over dictionary names, so no definition can shadow a literal.
///
pub fn classify(word: &str, dictionary: &Dictionary) -> Token {
    if let Ok(n) = word.parse::<i64>() {
        return Token::Number(n);
    }
    match dictionary.get(word) {
        Some(entry) => Token::Call(entry.clone()),
        None => Token::Unresolved(word.to_string()),
    }
}

impl ForthRuntime {
    /// EVAL ( -- ) Interprets the words remaining in the parser, one at a time
    ///
    ///     Each word is classified and then either executed or compiled, depending on the mode.
    ///     Stops early on the first error, or when QUIT asks for the rest of the line to be dropped.
    ///
    pub fn f_eval(&mut self) -> ForthResult<Flow> {
        while let Some(word) = self.parser.next_word() {
            let token = classify(&word, &self.dictionary);
            let flow = if self.get_compile_mode() {
                self.f_d_compile(token)?
            } else {
                self.f_d_interpret(token)?
            };
            if flow == Flow::Quit {
                return Ok(Flow::Quit);
            }
        }
        Ok(Flow::Next)
    }

    /// $INTERPRET executes a classified token immediately.
    ///
    pub fn f_d_interpret(&mut self, token: Token) -> ForthResult<Flow> {
        match token {
            Token::Number(n) => {
                self.kernel.push(n);
                Ok(Flow::Next)
            }
            Token::Call(word) => {
                let flow = match &word.behavior {
                    Behavior::Primitive(_) | Behavior::Definition(_) => self.call_word(&word)?,
                    Behavior::CompileOnly(_) => return Err(ForthError::CompileOnly),
                    Behavior::InterpretOnly(builtin) | Behavior::Immediate(builtin) => {
                        self.msg.debug("interpret", &builtin.name, None::<()>);
                        builtin.call(self)?
                    }
                };
                match flow {
                    Flow::Leave => Err(ForthError::NotLooping),
                    flow => Ok(flow),
                }
            }
            Token::Unresolved(name) => Err(ForthError::UndefinedWord(name)),
            other => Err(ForthError::UnknownToken(other.to_string())),
        }
    }

    /// $COMPILE adds a classified token to the definition being built.
    ///     Structural words run now, to fold what has been compiled so far into control nodes;
    ///     everything else is left on the stack as a pending token.
    ///
    pub fn f_d_compile(&mut self, token: Token) -> ForthResult<Flow> {
        match token {
            Token::Number(_) => self.kernel.push_cell(Cell::Pending(token)),
            Token::Call(word) => match &word.behavior {
                Behavior::CompileOnly(builtin) | Behavior::Immediate(builtin) => {
                    self.msg.debug("compile", &builtin.name, None::<()>);
                    return builtin.call(self);
                }
                Behavior::InterpretOnly(_) => return Err(ForthError::InterpretOnly),
                Behavior::Primitive(_) | Behavior::Definition(_) => {
                    self.kernel.push_cell(Cell::Pending(Token::Call(Rc::clone(&word))))
                }
            },
            Token::Unresolved(name) => return Err(ForthError::UndefinedWord(name)),
            other => return Err(ForthError::UnknownToken(other.to_string())),
        }
        Ok(Flow::Next)
    }

    /// open_structure records a new control structure on both stacks
    ///     While compiling the return stack holds only markers, so its length is the nesting depth.
    fn open_structure(&mut self, marker: Marker) -> ForthResult<()> {
        if self.kernel.return_len() >= MAX_DEPTH {
            return Err(ForthError::TooDeep);
        }
        self.kernel.push_marker_r(marker);
        self.kernel.push_cell(Cell::Marker(marker));
        Ok(())
    }

    /// close_structure pops the innermost open structure, which has to be one of `expected`.
    ///     A bare definition means the opener was never seen; anything else is left unclosed.
    ///
    fn close_structure(&mut self, expected: &[Marker]) -> ForthResult<Marker> {
        match self.kernel.top_marker_r() {
            Some(m) if expected.contains(&m) => {
                self.kernel.pop_marker_r();
                Ok(m)
            }
            Some(Marker::Colon) | None => Err(ForthError::Missing(expected[0])),
            Some(other) => Err(ForthError::Unclosed(other)),
        }
    }

    fn compile_token(&mut self, token: Token) -> ForthResult<Flow> {
        self.kernel.push_cell(Cell::Pending(token));
        Ok(Flow::Next)
    }

    /// : (colon) starts the creation of a compiled function
    ///     It takes the next word as the name and switches to compile mode.
    ///
    pub fn f_colon(&mut self) -> ForthResult<Flow> {
        let name = self.parser.next_word().ok_or(ForthError::NoNameGiven)?;
        self.msg.debug(":", "compiling", Some(&name));
        self.compiling = Some(name);
        self.set_compile_mode(true);
        self.open_structure(Marker::Colon)?;
        Ok(Flow::Next)
    }

    /// ; terminates a definition, installing it and resetting to interpret mode
    ///
    pub fn f_semicolon(&mut self) -> ForthResult<Flow> {
        self.close_structure(&[Marker::Colon])?;
        let body = self.kernel.pop_to_marker(Marker::Colon)?;
        let name = self.compiling.take().ok_or(ForthError::NoNameGiven)?;
        if self.dictionary.contains(&name) {
            self.msg
                .warning("unique?", "Overwriting existing definition", Some(&name));
        }
        self.msg.info(";", "defined", Some(&name));
        self.dictionary
            .insert(Word::new(&name, Behavior::Definition(body.into())));
        self.set_compile_mode(false);
        Ok(Flow::Next)
    }

    /// IF ( b -- )
    pub fn f_if(&mut self) -> ForthResult<Flow> {
        self.open_structure(Marker::If)?;
        Ok(Flow::Next)
    }

    /// ELSE swaps the IF on the return stack for an ELSE, and marks where the false branch begins
    pub fn f_else(&mut self) -> ForthResult<Flow> {
        self.close_structure(&[Marker::If])?;
        self.open_structure(Marker::Else)?;
        Ok(Flow::Next)
    }

    /// THEN folds IF .. [ELSE ..] into one branch node
    pub fn f_then(&mut self) -> ForthResult<Flow> {
        let if_false = match self.close_structure(&[Marker::If, Marker::Else])? {
            Marker::Else => self.kernel.pop_to_marker(Marker::Else)?,
            _ => Vec::new(),
        };
        let if_true = self.kernel.pop_to_marker(Marker::If)?;
        self.compile_token(Token::Branch { if_true, if_false })
    }

    /// DO ( limit start -- )
    pub fn f_do(&mut self) -> ForthResult<Flow> {
        self.open_structure(Marker::Do)?;
        Ok(Flow::Next)
    }

    pub fn f_loop(&mut self) -> ForthResult<Flow> {
        self.close_loop(Step::Fixed(1))
    }

    /// +LOOP ( n -- ) the body leaves the step on the stack
    pub fn f_plus_loop(&mut self) -> ForthResult<Flow> {
        self.close_loop(Step::FromStack)
    }

    fn close_loop(&mut self, step: Step) -> ForthResult<Flow> {
        self.close_structure(&[Marker::Do])?;
        let body = self.kernel.pop_to_marker(Marker::Do)?;
        self.compile_token(Token::Loop { body, step })
    }

    pub fn f_begin(&mut self) -> ForthResult<Flow> {
        self.open_structure(Marker::Begin)?;
        Ok(Flow::Next)
    }

    /// UNTIL ( b -- ) becomes a while node whose test is the inverted flag: the body runs once
    ///     per pass and the loop continues while the flag is false.
    ///
    pub fn f_until(&mut self) -> ForthResult<Flow> {
        self.close_structure(&[Marker::Begin])?;
        let mut condition = self.kernel.pop_to_marker(Marker::Begin)?;
        condition.push(Token::Branch {
            if_true: vec![Token::Number(FALSE)],
            if_false: vec![Token::Number(TRUE)],
        });
        self.compile_token(Token::While {
            condition,
            body: Vec::new(),
        })
    }

    /// WHILE ( b -- ) BEGIN stays open underneath, so REPEAT can find both
    pub fn f_while(&mut self) -> ForthResult<Flow> {
        self.close_structure(&[Marker::Begin])?;
        self.kernel.push_marker_r(Marker::Begin);
        self.open_structure(Marker::While)?;
        Ok(Flow::Next)
    }

    pub fn f_repeat(&mut self) -> ForthResult<Flow> {
        self.close_structure(&[Marker::While])?;
        self.close_structure(&[Marker::Begin])?;
        let body = self.kernel.pop_to_marker(Marker::While)?;
        let condition = self.kernel.pop_to_marker(Marker::Begin)?;
        self.compile_token(Token::While { condition, body })
    }

    pub fn f_leave(&mut self) -> ForthResult<Flow> {
        self.compile_token(Token::Leave)
    }

    /// ( ( -- ) skips input up to the closing parenthesis
    pub fn f_paren(&mut self) -> ForthResult<Flow> {
        self.parser.parse_to(')');
        Ok(Flow::Next)
    }

    /// \ ( -- ) skips the rest of the line
    pub fn f_backslash(&mut self) -> ForthResult<Flow> {
        self.parser.rest_of_line();
        Ok(Flow::Next)
    }

    /// SEE <name> ( -- ) prints the definition of a word
    ///     Taking a postfix word name, this is the Forth decompiler.
    ///
    pub fn f_see(&mut self) -> ForthResult<Flow> {
        let name = self.parser.next_word().ok_or(ForthError::NoNameGiven)?;
        let word = self
            .dictionary
            .get(&name)
            .cloned()
            .ok_or(ForthError::UndefinedWord(name))?;
        let text = match &word.behavior {
            Behavior::Definition(body) => format!(": {} {}; ", word.name, Listing(body)),
            Behavior::Primitive(b)
            | Behavior::CompileOnly(b)
            | Behavior::InterpretOnly(b)
            | Behavior::Immediate(b) => format!("builtin: {} ", b.doc),
        };
        self.output.push_str(&text);
        Ok(Flow::Next)
    }
}

/// Space-separated token list, for SEE
struct Listing<'a>(&'a [Token]);

impl std::fmt::Display for Listing<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write_tokens(f, self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::Mode;

    fn body_of(rt: &ForthRuntime, name: &str) -> Vec<Token> {
        match &rt.dictionary.get(name).unwrap().behavior {
            Behavior::Definition(body) => body.to_vec(),
            other => panic!("{name} is not a definition: {other:?}"),
        }
    }

    #[test]
    fn test_classify() {
        let rt = ForthRuntime::new();
        assert_eq!(classify("23", &rt.dictionary), Token::Number(23));
        assert_eq!(classify("-12", &rt.dictionary), Token::Number(-12));
        assert_eq!(
            classify("*", &rt.dictionary),
            Token::Call(rt.dictionary.get("*").cloned().unwrap())
        );
        assert_eq!(
            classify("dup", &rt.dictionary),
            Token::Unresolved("dup".to_string())
        );
    }

    #[test]
    fn test_numbers_shadow_definitions() {
        let mut rt = ForthRuntime::new();
        assert_eq!(rt.eval(": 5 99 ;"), " ok");
        assert_eq!(rt.eval("5"), " ok");
        assert_eq!(rt.kernel.values(), vec![5]);
        assert_eq!(classify("5", &rt.dictionary), Token::Number(5));
    }

    #[test]
    fn test_colon_compiles_flat_body() {
        let mut rt = ForthRuntime::new();
        assert_eq!(rt.eval(": STAR 42 EMIT ;"), " ok");
        let emit = rt.dictionary.get("EMIT").cloned().unwrap();
        assert_eq!(body_of(&rt, "STAR"), vec![Token::Number(42), Token::Call(emit)]);
        assert_eq!(rt.mode, Mode::Immediate);
        assert_eq!(rt.kernel.stack_len(), 0);
        assert_eq!(rt.kernel.return_len(), 0);
    }

    #[test]
    fn test_compile_keeps_values_below_definition() {
        let mut rt = ForthRuntime::new();
        assert_eq!(rt.eval("1 2 : NOP ; 3"), " ok");
        assert_eq!(rt.kernel.values(), vec![1, 2, 3]);
    }

    #[test]
    fn test_if_else_then_tree() {
        let mut rt = ForthRuntime::new();
        rt.eval(": T IF 42 ELSE 33 THEN ;");
        assert_eq!(
            body_of(&rt, "T"),
            vec![Token::Branch {
                if_true: vec![Token::Number(42)],
                if_false: vec![Token::Number(33)],
            }]
        );
    }

    #[test]
    fn test_if_then_has_empty_false_branch() {
        let mut rt = ForthRuntime::new();
        rt.eval(": T IF 1 THEN 2 ;");
        assert_eq!(
            body_of(&rt, "T"),
            vec![
                Token::Branch { if_true: vec![Token::Number(1)], if_false: vec![] },
                Token::Number(2),
            ]
        );
    }

    #[test]
    fn test_nested_structures() {
        let mut rt = ForthRuntime::new();
        rt.eval(": T DO IF LEAVE THEN 7 LOOP ;");
        assert_eq!(
            body_of(&rt, "T"),
            vec![Token::Loop {
                body: vec![
                    Token::Branch { if_true: vec![Token::Leave], if_false: vec![] },
                    Token::Number(7),
                ],
                step: Step::Fixed(1),
            }]
        );
    }

    #[test]
    fn test_plus_loop_node() {
        let mut rt = ForthRuntime::new();
        rt.eval(": T DO 2 +LOOP ;");
        assert_eq!(
            body_of(&rt, "T"),
            vec![Token::Loop { body: vec![Token::Number(2)], step: Step::FromStack }]
        );
    }

    #[test]
    fn test_until_negates_condition() {
        let mut rt = ForthRuntime::new();
        rt.eval(": T BEGIN 1 UNTIL ;");
        assert_eq!(
            body_of(&rt, "T"),
            vec![Token::While {
                condition: vec![
                    Token::Number(1),
                    Token::Branch {
                        if_true: vec![Token::Number(0)],
                        if_false: vec![Token::Number(-1)],
                    },
                ],
                body: vec![],
            }]
        );
    }

    #[test]
    fn test_while_repeat_node() {
        let mut rt = ForthRuntime::new();
        rt.eval(": T BEGIN 1 WHILE 2 REPEAT ;");
        assert_eq!(
            body_of(&rt, "T"),
            vec![Token::While {
                condition: vec![Token::Number(1)],
                body: vec![Token::Number(2)],
            }]
        );
    }

    #[test]
    fn test_definition_spans_lines() {
        let mut rt = ForthRuntime::new();
        assert_eq!(rt.eval(": T"), " compiled");
        assert_eq!(rt.eval("1 IF 2"), " compiled");
        assert_eq!(rt.eval("THEN ;"), " ok");
        assert_eq!(rt.eval("T"), " ok");
        assert_eq!(rt.kernel.values(), vec![2]);
    }

    #[test]
    fn test_mismatches() {
        let cases = [
            (": X DO 1 ;", "unclosed DO"),
            (": X LOOP ;", "missing DO"),
            (": X +LOOP ;", "missing DO"),
            (": X IF LOOP ;", "unclosed IF"),
            (": X ELSE ;", "missing IF"),
            (": X THEN ;", "missing IF"),
            (": X DO THEN ;", "unclosed DO"),
            (": X IF ELSE ELSE ;", "unclosed ELSE"),
            (": X UNTIL ;", "missing BEGIN"),
            (": X WHILE ;", "missing BEGIN"),
            (": X REPEAT ;", "missing WHILE"),
            (": X BEGIN REPEAT ;", "unclosed BEGIN"),
            (": X BEGIN 1 WHILE UNTIL ;", "unclosed WHILE"),
            (": X BEGIN ;", "unclosed BEGIN"),
            (": X IF ;", "unclosed IF"),
        ];
        for (line, message) in cases {
            let mut rt = ForthRuntime::new();
            assert_eq!(rt.eval(line), format!(" ? {message}"), "{line}");
            assert_eq!(rt.mode, Mode::Immediate, "{line}");
            assert_eq!(rt.kernel.stack_len(), 0, "{line}");
            assert_eq!(rt.kernel.return_len(), 0, "{line}");
            assert!(!rt.dictionary.contains("X"), "{line}");
        }
    }

    #[test]
    fn test_structural_words_are_compile_only() {
        for word in [";", "IF", "ELSE", "THEN", "DO", "LOOP", "+LOOP", "BEGIN", "UNTIL", "WHILE", "REPEAT", "LEAVE"] {
            let mut rt = ForthRuntime::new();
            assert_eq!(rt.eval(word), " ? compile-only word", "{word}");
        }
    }

    #[test]
    fn test_nesting_limit() {
        let mut rt = ForthRuntime::new();
        let deep = format!(": T {} {};", "1 IF ".repeat(MAX_DEPTH + 50), "THEN ".repeat(MAX_DEPTH + 50));
        assert_eq!(rt.eval(&deep), " ? nesting too deep");
        assert_eq!(rt.mode, Mode::Immediate);
        assert_eq!(rt.kernel.stack_len(), 0);
        assert_eq!(rt.kernel.return_len(), 0);
        assert!(!rt.dictionary.contains("T"));

        let fits = MAX_DEPTH - 8;
        let ok = format!(": U {} 7 {};", "1 IF ".repeat(fits), "THEN ".repeat(fits));
        assert_eq!(rt.eval(&ok), " ok");
        assert_eq!(rt.eval("U"), " ok");
        assert_eq!(rt.kernel.values(), vec![7]);
    }

    #[test]
    fn test_long_call_chain_is_an_error() {
        let mut rt = ForthRuntime::new();
        rt.eval(": W0 1 ;");
        for n in 1..MAX_DEPTH + 20 {
            assert_eq!(rt.eval(&format!(": W{n} W{} ;", n - 1)), " ok");
        }
        assert_eq!(rt.eval("W100"), " ok");
        assert_eq!(rt.kernel.values(), vec![1]);
        assert_eq!(rt.eval(&format!("W{}", MAX_DEPTH + 10)), " ? nesting too deep");
        assert_eq!(rt.call_depth, 0);
        assert!(rt.kernel.values().is_empty());
    }

    #[test]
    fn test_colon_needs_a_name() {
        let mut rt = ForthRuntime::new();
        assert_eq!(rt.eval(":"), " ? no name given");
        assert_eq!(rt.mode, Mode::Immediate);
        assert_eq!(rt.eval(":   \t"), " ? no name given");
    }

    #[test]
    fn test_colon_inside_definition() {
        let mut rt = ForthRuntime::new();
        assert_eq!(rt.eval(": A : B ;"), " ? interpret-only word");
        assert_eq!(rt.mode, Mode::Immediate);
    }

    #[test]
    fn test_undefined_word_while_compiling() {
        let mut rt = ForthRuntime::new();
        assert_eq!(rt.eval(": A FOO ;"), " ? undefined word: FOO");
        assert_eq!(rt.mode, Mode::Immediate);
        assert!(!rt.dictionary.contains("A"));
    }

    #[test]
    fn test_redefinition_keeps_old_callers() {
        let mut rt = ForthRuntime::new();
        rt.eval(": A 1 ;");
        rt.eval(": B A ;");
        rt.eval(": A 2 ;");
        assert_eq!(rt.eval("A B"), " ok");
        assert_eq!(rt.kernel.values(), vec![2, 1]);
    }

    #[test]
    fn test_comments() {
        let mut rt = ForthRuntime::new();
        assert_eq!(rt.eval("1 ( two three ) 4"), " ok");
        assert_eq!(rt.kernel.values(), vec![1, 4]);
        assert_eq!(rt.eval(": T ( n -- n ) DUP ; 5 T \\ 6 7"), " ok");
        assert_eq!(rt.kernel.values(), vec![1, 4, 5, 5]);
    }

    #[test]
    fn test_see() {
        let mut rt = ForthRuntime::new();
        rt.eval(": T 3 0 DO I IF I . ELSE 0 . THEN LOOP ;");
        assert_eq!(
            rt.eval("SEE T"),
            ": T 3 0 DO I IF I . ELSE 0 . THEN LOOP ;  ok"
        );
        assert_eq!(
            rt.eval("SEE DUP"),
            "builtin: DUP ( n -- n n ) Push a second copy of the top item  ok"
        );
        assert_eq!(rt.eval("SEE NOPE"), " ? undefined word: NOPE");
        assert_eq!(rt.eval("SEE"), " ? no name given");
    }
}
