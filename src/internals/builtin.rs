/// Interpreter for builtins
///
/// Set up a table of builtin functions, with names, code and documentation, and install them in
/// the dictionary at cold start.
use crate::internals::dictionary::{Behavior, Word};
use crate::internals::error::ForthResult;
use crate::internals::token::Flow;
use crate::runtime::ForthRuntime;

pub type BuiltinCode = fn(&mut ForthRuntime) -> ForthResult<Flow>;

// The internal format for builtins: a name, code pointer, and documentation string for use by SEE
#[derive(Debug, Clone)]
pub struct BuiltInFn {
    pub name: String,
    pub code: BuiltinCode,
    pub doc: String,
}

impl BuiltInFn {
    pub fn new(name: String, code: BuiltinCode, doc: String) -> BuiltInFn {
        BuiltInFn { name, code, doc }
    }

    pub fn call(&self, runtime: &mut ForthRuntime) -> ForthResult<Flow> {
        (self.code)(runtime)
    }
}

/// How a builtin is dispatched; see Behavior
#[derive(Debug, Clone, Copy, PartialEq)]
enum Kind {
    Primitive,
    CompileOnly,
    InterpretOnly,
    Immediate,
}

impl ForthRuntime {
    /// add_builtin creates a builtin record with function pointer etc. and installs it in the dictionary
    ///
    fn add_builtin(&mut self, kind: Kind, name: &str, code: BuiltinCode, doc: &str) {
        let builtin = BuiltInFn::new(name.to_string(), code, doc.to_string());
        let behavior = match kind {
            Kind::Primitive => Behavior::Primitive(builtin),
            Kind::CompileOnly => Behavior::CompileOnly(builtin),
            Kind::InterpretOnly => Behavior::InterpretOnly(builtin),
            Kind::Immediate => Behavior::Immediate(builtin),
        };
        self.dictionary.insert(Word::new(name, behavior));
    }

    /// Set up all the words that are implemented in Rust
    ///     Each one gets a dictionary entry holding its function pointer.
    pub fn compile_builtins(&mut self) {
        use Kind::*;

        // arithmetic
        self.add_builtin(Primitive, "+", ForthRuntime::f_plus, "+ ( j k -- j+k ) Push j+k on the stack");
        self.add_builtin(Primitive, "-", ForthRuntime::f_minus, "- ( j k -- j-k ) Push j-k on the stack");
        self.add_builtin(Primitive, "*", ForthRuntime::f_times, "* ( j k -- j*k ) Push j*k on the stack");
        self.add_builtin(Primitive, "/", ForthRuntime::f_divide, "/ ( j k -- j/k ) Push the floored quotient");
        self.add_builtin(Primitive, "MOD", ForthRuntime::f_mod, "MOD ( j k -- r ) Push the floored remainder");
        self.add_builtin(
            Primitive,
            "/MOD",
            ForthRuntime::f_slash_mod,
            "/MOD ( j k -- r q ) Push remainder, then quotient",
        );
        self.add_builtin(Primitive, "INVERT", ForthRuntime::f_invert, "INVERT ( n -- ~n ) Bitwise complement");
        self.add_builtin(Primitive, "AND", ForthRuntime::f_and, "AND ( a b -- a&b ) Bitwise and");
        self.add_builtin(Primitive, "OR", ForthRuntime::f_or, "OR ( a b -- a|b ) Bitwise or");

        // comparisons
        self.add_builtin(Primitive, ">", ForthRuntime::f_greater, "> ( j k -- b ) If j > k push true else false");
        self.add_builtin(Primitive, ">=", ForthRuntime::f_greater_equal, ">= ( j k -- b ) If j >= k push true else false");
        self.add_builtin(Primitive, "<", ForthRuntime::f_less, "< ( j k -- b ) If j < k push true else false");
        self.add_builtin(Primitive, "<=", ForthRuntime::f_less_equal, "<= ( j k -- b ) If j <= k push true else false");
        self.add_builtin(Primitive, "==", ForthRuntime::f_equal, "== ( j k -- b ) If j == k push true else false");
        self.add_builtin(Primitive, "=", ForthRuntime::f_equal, "= ( j k -- b ) If j == k push true else false");
        self.add_builtin(Primitive, "!=", ForthRuntime::f_not_equal, "!= ( j k -- b ) If j != k push true else false");
        self.add_builtin(Primitive, "0=", ForthRuntime::f_0equal, "0= ( j -- b ) If j == 0 push true else false");
        self.add_builtin(Primitive, "0<", ForthRuntime::f_0less, "0< ( j -- b ) If j < 0 push true else false");
        self.add_builtin(Primitive, "TRUE", ForthRuntime::f_true, "TRUE ( -- -1 ) Push the canonical true value");
        self.add_builtin(Primitive, "FALSE", ForthRuntime::f_false, "FALSE ( -- 0 ) Push the canonical false value");

        // stack shuffles
        self.add_builtin(Primitive, "SWAP", ForthRuntime::f_swap, "SWAP ( m n -- n m ) Reverse the top two items");
        self.add_builtin(Primitive, "DUP", ForthRuntime::f_dup, "DUP ( n -- n n ) Push a second copy of the top item");
        self.add_builtin(Primitive, "OVER", ForthRuntime::f_over, "OVER ( m n -- m n m ) Copy the second item to the top");
        self.add_builtin(Primitive, "ROT", ForthRuntime::f_rot, "ROT ( i j k -- j k i ) Move the third item to the top");
        self.add_builtin(Primitive, "DROP", ForthRuntime::f_drop, "DROP ( n -- ) Discard the top item");
        self.add_builtin(Primitive, "TUCK", ForthRuntime::f_tuck, "TUCK ( m n -- n m n ) Copy the top item below the second");
        self.add_builtin(Primitive, "2DUP", ForthRuntime::f_2dup, "2DUP ( a b -- a b a b ) Copy the top pair");
        self.add_builtin(Primitive, "2SWAP", ForthRuntime::f_2swap, "2SWAP ( a b c d -- c d a b ) Swap the top two pairs");
        self.add_builtin(Primitive, "2OVER", ForthRuntime::f_2over, "2OVER ( a b c d -- a b c d a b ) Copy the second pair");
        self.add_builtin(Primitive, "DEPTH", ForthRuntime::f_stack_depth, "DEPTH ( -- n ) Push the number of items on the stack");
        self.add_builtin(Primitive, "CLEAR", ForthRuntime::f_clear, "CLEAR ( .. -- ) Empty the stack");
        self.add_builtin(Primitive, "0SP", ForthRuntime::f_clear, "0SP ( .. -- ) Empty the stack");

        // return stack and loop indexes
        self.add_builtin(Primitive, ">R", ForthRuntime::f_to_r, ">R ( n -- ) Pop stack and push value to return stack");
        self.add_builtin(Primitive, "R>", ForthRuntime::f_r_from, "R> ( -- n ) Pop return stack and push value to the stack");
        self.add_builtin(Primitive, "R@", ForthRuntime::f_r_get, "R@ ( -- n ) Copy the top of the return stack");
        self.add_builtin(Primitive, "I", ForthRuntime::f_i, "I ( -- n ) Push the innermost loop index");
        self.add_builtin(Primitive, "J", ForthRuntime::f_j, "J ( -- n ) Push the next outer loop index");

        // output
        self.add_builtin(Primitive, ".", ForthRuntime::f_dot, ". ( n -- ) Pop and print the top of the stack");
        self.add_builtin(Primitive, ".S", ForthRuntime::f_dot_s, ".S ( -- ) Print the whole stack, leaving it unchanged");
        self.add_builtin(Primitive, "EMIT", ForthRuntime::f_emit, "EMIT ( c -- ) Print the character with code point c");
        self.add_builtin(Primitive, "CR", ForthRuntime::f_cr, "CR ( -- ) Print a newline");
        self.add_builtin(Primitive, "PAGE", ForthRuntime::f_page, "PAGE ( -- ) Scroll the screen clear");
        self.add_builtin(Primitive, "WORDS", ForthRuntime::f_words, "WORDS ( -- ) List every defined word");

        // control
        self.add_builtin(Primitive, "QUIT", ForthRuntime::f_quit, "QUIT ( -- ) Abandon the rest of the line, keeping the stacks");
        self.add_builtin(Primitive, "BYE", ForthRuntime::f_bye, "BYE ( -- ) Exit to the operating system");
        self.add_builtin(Primitive, "DBG", ForthRuntime::f_dbg, "DBG ( n -- ) Set the message level: 0 error .. 3 debug");

        // defining and reading ahead
        self.add_builtin(InterpretOnly, ":", ForthRuntime::f_colon, ": <name> ( -- ) Start a new definition");
        self.add_builtin(InterpretOnly, "SEE", ForthRuntime::f_see, "SEE <name> ( -- ) Decompile a word");
        self.add_builtin(Immediate, "(", ForthRuntime::f_paren, "( ( -- ) Comment, up to the closing )");
        self.add_builtin(Immediate, "\\", ForthRuntime::f_backslash, "\\ ( -- ) Comment, to the end of the line");

        // structure
        self.add_builtin(CompileOnly, ";", ForthRuntime::f_semicolon, "; ( -- ) End a definition");
        self.add_builtin(CompileOnly, "IF", ForthRuntime::f_if, "IF ( b -- ) Run the following code if b is non-zero");
        self.add_builtin(CompileOnly, "ELSE", ForthRuntime::f_else, "ELSE ( -- ) Start the false branch of an IF");
        self.add_builtin(CompileOnly, "THEN", ForthRuntime::f_then, "THEN ( -- ) Close an IF");
        self.add_builtin(CompileOnly, "DO", ForthRuntime::f_do, "DO ( limit start -- ) Start a counted loop");
        self.add_builtin(CompileOnly, "LOOP", ForthRuntime::f_loop, "LOOP ( -- ) Close a counted loop, stepping by 1");
        self.add_builtin(CompileOnly, "+LOOP", ForthRuntime::f_plus_loop, "+LOOP ( n -- ) Close a counted loop, stepping by n");
        self.add_builtin(CompileOnly, "BEGIN", ForthRuntime::f_begin, "BEGIN ( -- ) Start an indefinite loop");
        self.add_builtin(CompileOnly, "UNTIL", ForthRuntime::f_until, "UNTIL ( b -- ) Repeat from BEGIN until b is non-zero");
        self.add_builtin(CompileOnly, "WHILE", ForthRuntime::f_while, "WHILE ( b -- ) Leave a BEGIN loop when b is zero");
        self.add_builtin(CompileOnly, "REPEAT", ForthRuntime::f_repeat, "REPEAT ( -- ) Go back to BEGIN");
        self.add_builtin(CompileOnly, "LEAVE", ForthRuntime::f_leave, "LEAVE ( -- ) Exit the innermost loop");
    }
}
