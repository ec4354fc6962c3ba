////////////////////////////
/// File: src/internals/files.rs
///
/// Line sources for the interpreter
///      Read lines from a file, from plain stdin, or from the line editor.
///      Each call hands back one line with its line ending removed.

use std::fs::File;
use std::io::{self, BufRead, BufReader, IsTerminal, Write};
use std::path::Path;

use crate::internals::messages::Msg;
use crate::internals::tui::ForthTui;

#[derive(Debug)]
pub enum FType {
    Stdin,                          // Plain standard input, for pipes
    BReader(BufReader<File>),       // Buffered reader for file input
    Tui(ForthTui),                  // crossterm line editor
}

#[derive(Debug)]
pub struct FileHandle {
    pub source: FType,
    line_number: usize,
    msg: Msg,
}

impl FileHandle {
    pub fn new_file(file_path: &Path, msg: Msg) -> Option<FileHandle> {
        match File::open(file_path) {
            Ok(file) => Some(FileHandle {
                source: FType::BReader(BufReader::new(file)),
                line_number: 0,
                msg,
            }),
            Err(e) => {
                msg.error("FileHandle::new_file", "Unable to open file", Some(e.to_string()));
                None
            }
        }
    }

    pub fn new_stdin(msg: Msg) -> FileHandle {
        FileHandle {
            source: FType::Stdin,
            line_number: 0,
            msg,
        }
    }

    pub fn new_tui(msg: Msg) -> FileHandle {
        FileHandle {
            source: FType::Tui(ForthTui::new()),
            line_number: 0,
            msg,
        }
    }

    /// new_console picks the line editor when stdin is a terminal, plain lines otherwise
    pub fn new_console(plain: bool, msg: Msg) -> FileHandle {
        if plain || !io::stdin().is_terminal() {
            FileHandle::new_stdin(msg)
        } else {
            FileHandle::new_tui(msg)
        }
    }

    pub fn is_interactive(&self) -> bool {
        matches!(self.source, FType::Tui(_))
    }

    /// get_line returns the next line of input, or None at end of input
    ///
    pub fn get_line(&mut self) -> Option<String> {
        let mut new_line = String::new();
        let result = match &mut self.source {
            FType::Stdin => {
                let _ = io::stdout().flush();
                io::stdin().lock().read_line(&mut new_line)
            }
            FType::BReader(br) => br.read_line(&mut new_line),
            FType::Tui(tui) => {
                return match tui.get_line() {
                    Ok(line) => line,
                    Err(e) => {
                        self.msg.error("get_line", "terminal error", Some(e.to_string()));
                        None
                    }
                };
            }
        };
        match result {
            Ok(0) => None,
            Ok(_) => {
                self.line_number += 1;
                Some(new_line.trim_end_matches(['\n', '\r']).to_string())
            }
            Err(e) => {
                self.msg
                    .error("get_line", "read_line error", Some(e.to_string()));
                None
            }
        }
    }

    /// line_number counts the lines read so far from a file or pipe
    pub fn line_number(&self) -> usize {
        self.line_number
    }
}
