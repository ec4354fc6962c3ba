/// Word parser
///
///     Holds one buffer of input text and a position in it. Each call to next_word skips
///     whitespace and returns the following run of non-whitespace characters, advancing the
///     position; None means the buffer is used up. Newlines are ordinary whitespace.
///
///     The parser knows nothing about numbers or the dictionary. Words that read ahead (: and the
///     comment words) take their text from the same parser, so parsing rules can change mid-line.
///
#[derive(Debug, Default, Clone)]
pub struct WordParser {
    text: String,
    pos: usize, // byte offset of the first unread character
}

impl WordParser {
    pub fn new(text: &str) -> WordParser {
        WordParser {
            text: text.to_string(),
            pos: 0,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.pos >= self.text.len()
    }

    fn rest(&self) -> &str {
        &self.text[self.pos..]
    }

    /// skip_whitespace consumes a run of whitespace, returning how much was skipped
    pub fn skip_whitespace(&mut self) -> usize {
        let rest = self.rest();
        let skipped = rest.len() - rest.trim_start().len();
        self.pos += skipped;
        skipped
    }

    /// next_word returns the next whitespace-delimited word, or None at end of input
    ///
    pub fn next_word(&mut self) -> Option<String> {
        self.skip_whitespace();
        if self.is_finished() {
            return None;
        }
        let rest = self.rest();
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        let word = rest[..end].to_string();
        self.pos += end;
        Some(word)
    }

    /// parse_to consumes text up to and including the delimiter, returning what came before it.
    ///     Without a delimiter the rest of the buffer is taken.
    pub fn parse_to(&mut self, delim: char) -> String {
        let rest = self.rest();
        let (taken, consumed) = match rest.find(delim) {
            Some(i) => (rest[..i].to_string(), i + delim.len_utf8()),
            None => (rest.to_string(), rest.len()),
        };
        self.pos += consumed;
        taken
    }

    /// rest_of_line consumes up to the end of the current line
    pub fn rest_of_line(&mut self) -> String {
        self.parse_to('\n')
    }
}

impl Iterator for WordParser {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        self.next_word()
    }
}
