/// The dictionary: word names mapped to their behavior
///
///     Names are case-sensitive and unique. Installing a name that already exists replaces the
///     entry for later lookups; tokens compiled earlier keep pointing at the word they found.
///
use std::collections::HashMap;
use std::rc::Rc;

use crate::internals::builtin::BuiltInFn;
use crate::internals::token::Token;

#[derive(Debug)]
pub enum Behavior {
    /// Runs when interpreted, compiled as a call while compiling
    Primitive(BuiltInFn),
    /// Structural words: run only while compiling
    CompileOnly(BuiltInFn),
    /// Words that read ahead in the input stream, such as : and SEE
    InterpretOnly(BuiltInFn),
    /// Runs at once in either mode (comments)
    Immediate(BuiltInFn),
    /// A colon definition
    Definition(Rc<[Token]>),
}

#[derive(Debug)]
pub struct Word {
    pub name: String,
    pub behavior: Behavior,
}

impl Word {
    pub fn new(name: &str, behavior: Behavior) -> Word {
        Word {
            name: name.to_string(),
            behavior,
        }
    }
}

#[derive(Debug, Default)]
pub struct Dictionary {
    words: HashMap<String, Rc<Word>>,
    order: Vec<String>, // oldest first
}

impl Dictionary {
    pub fn new() -> Dictionary {
        Dictionary::default()
    }

    /// insert installs a word, returning the entry it replaced, if any
    ///
    pub fn insert(&mut self, word: Word) -> Option<Rc<Word>> {
        let name = word.name.clone();
        let previous = self.words.insert(name.clone(), Rc::new(word));
        if previous.is_some() {
            self.order.retain(|n| *n != name);
        }
        self.order.push(name);
        previous
    }

    pub fn get(&self, name: &str) -> Option<&Rc<Word>> {
        self.words.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.words.contains_key(name)
    }

    /// names lists every installed word, most recently defined first
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().rev().map(|s| s.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definition(name: &str, body: Vec<Token>) -> Word {
        Word::new(name, Behavior::Definition(body.into()))
    }

    #[test]
    fn test_insert_and_get() {
        let mut d = Dictionary::new();
        assert!(d.insert(definition("STAR", vec![Token::Number(42)])).is_none());
        assert!(d.contains("STAR"));
        assert!(!d.contains("star"));
        assert_eq!(d.get("STAR").map(|w| w.name.as_str()), Some("STAR"));
        assert_eq!(d.names().count(), 1);
    }

    #[test]
    fn test_redefinition_replaces_and_keeps_old_reference() {
        let mut d = Dictionary::new();
        d.insert(definition("X", vec![Token::Number(1)]));
        let old = d.get("X").cloned().unwrap();
        let replaced = d.insert(definition("X", vec![Token::Number(2)]));
        assert!(Rc::ptr_eq(&old, &replaced.unwrap()));
        let new = d.get("X").unwrap();
        assert!(!Rc::ptr_eq(&old, new));
        assert_eq!(d.names().count(), 1);
        match &old.behavior {
            Behavior::Definition(body) => assert_eq!(&body[..], &[Token::Number(1)]),
            other => panic!("unexpected behavior {other:?}"),
        }
    }

    #[test]
    fn test_names_newest_first() {
        let mut d = Dictionary::new();
        d.insert(definition("A", vec![]));
        d.insert(definition("B", vec![]));
        d.insert(definition("C", vec![]));
        d.insert(definition("A", vec![]));
        let names: Vec<&str> = d.names().collect();
        assert_eq!(names, vec!["A", "C", "B"]);
    }
}
