pub mod builtin;
pub mod compiler;
pub mod console;
pub mod debug;
pub mod dictionary;
pub mod error;
pub mod files;
pub mod general;
pub mod inner;
pub mod messages;
pub mod parser;
pub mod terminal;
pub mod token;
pub mod tui;
