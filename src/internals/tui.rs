use crossterm::{
    cursor::MoveToColumn,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    queue,
    terminal::{Clear, ClearType},
};
use std::io::{self, stdout, Write};

use crate::internals::terminal::RawMode;

pub const PROMPT: &str = "fm> ";

/// What a keystroke did to the line being edited
#[derive(Debug, PartialEq)]
pub enum Edit {
    Continue,
    Submit(String),
    EndOfInput,
}

#[derive(Debug, Default)]
pub struct ForthLineEditor {
    buffer: Vec<char>,
    cursor: usize,
    history: Vec<String>,
    recall: usize, // index into history while browsing with Up/Down
}

impl ForthLineEditor {
    pub fn new() -> Self {
        Self::default()
    }

    fn reset(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
        self.recall = self.history.len();
    }

    fn load(&mut self, line: &str) {
        self.buffer = line.chars().collect();
        self.cursor = self.buffer.len();
    }

    pub fn line(&self) -> String {
        self.buffer.iter().collect()
    }

    /// handle_key applies one keystroke to the buffer
    ///
    pub fn handle_key(&mut self, key: KeyEvent) -> Edit {
        let control = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('a') if control => self.cursor = 0,
            KeyCode::Char('e') if control => self.cursor = self.buffer.len(),
            KeyCode::Char('k') if control => self.buffer.truncate(self.cursor),
            KeyCode::Char('c') if control => return Edit::EndOfInput,
            KeyCode::Char('d') if control => {
                if self.buffer.is_empty() {
                    return Edit::EndOfInput;
                }
            }
            KeyCode::Char(_) if control => {}
            KeyCode::Char(c) => {
                self.buffer.insert(self.cursor, c);
                self.cursor += 1;
            }
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    self.buffer.remove(self.cursor);
                }
            }
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(self.buffer.len()),
            KeyCode::Up => {
                if self.recall > 0 {
                    self.recall -= 1;
                    let line = self.history[self.recall].clone();
                    self.load(&line);
                }
            }
            KeyCode::Down => {
                if self.recall + 1 < self.history.len() {
                    self.recall += 1;
                    let line = self.history[self.recall].clone();
                    self.load(&line);
                } else {
                    self.recall = self.history.len();
                    self.load("");
                }
            }
            KeyCode::Enter => {
                let line = self.line();
                if !line.trim().is_empty() && self.history.last() != Some(&line) {
                    self.history.push(line.clone());
                }
                self.reset();
                return Edit::Submit(line);
            }
            KeyCode::Esc => return Edit::EndOfInput,
            _ => {}
        }
        Edit::Continue
    }

    fn render(&self, out: &mut impl Write) -> io::Result<()> {
        let line = self.line();
        queue!(out, MoveToColumn(0), Clear(ClearType::UntilNewLine))?;
        write!(out, "{PROMPT}{line}")?;
        let column = PROMPT.chars().count() + self.cursor;
        queue!(out, MoveToColumn(column as u16))?;
        out.flush()
    }

    /// run reads one line from the keyboard. None means the user ended the input.
    pub fn run(&mut self) -> io::Result<Option<String>> {
        self.reset();
        let _raw = RawMode::enable()?;
        let mut out = stdout();
        self.render(&mut out)?;
        loop {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Release {
                    continue;
                }
                let edit = self.handle_key(key);
                match edit {
                    Edit::Continue => self.render(&mut out)?,
                    Edit::Submit(line) => {
                        write!(out, "\r\n")?;
                        out.flush()?;
                        return Ok(Some(line));
                    }
                    Edit::EndOfInput => {
                        write!(out, "\r\n")?;
                        out.flush()?;
                        return Ok(None);
                    }
                }
            }
        }
    }
}

#[derive(Debug)]
pub struct ForthTui {
    editor: ForthLineEditor,
}

impl ForthTui {
    pub fn new() -> Self {
        Self {
            editor: ForthLineEditor::new(),
        }
    }

    pub fn get_line(&mut self) -> io::Result<Option<String>> {
        self.editor.run()
    }
}
