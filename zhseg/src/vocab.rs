use std::io::{BufRead, Write};

use hashbrown::HashMap;

use crate::errors::Result;

/// The word used for entries that are not in the vocabulary.
pub const UNKNOWN: &str = "<unknown>";

/// The id of [`UNKNOWN`] in a vocabulary created with [`Vocab::new`].
pub const UNKNOWN_ID: usize = 0;

/// Bidirectional mapping between feature strings and dense ids.
///
/// Ids are assigned from 0 in insertion order. Reserved words are inserted first and keep their
/// ids across [`Vocab::sort`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocab {
    ids: HashMap<String, usize>,
    words: Vec<String>,
    reserved: Vec<String>,
}

impl Vocab {
    /// Creates a vocabulary holding only [`UNKNOWN`] at id [`UNKNOWN_ID`].
    pub fn new() -> Self {
        Self::with_reserved([UNKNOWN])
    }

    /// Creates a vocabulary seeded with reserved words.
    ///
    /// # Arguments
    ///
    /// * `reserved` - Words whose ids are fixed, in id order.
    pub fn with_reserved<I, S>(reserved: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let reserved: Vec<String> = reserved.into_iter().map(Into::into).collect();
        let mut vocab = Self {
            ids: HashMap::new(),
            words: vec![],
            reserved: vec![],
        };
        for word in &reserved {
            vocab.add(word);
        }
        vocab.reserved = reserved;
        vocab
    }

    /// Adds a word and returns its id. Adding an existing word returns the existing id.
    pub fn add(&mut self, word: &str) -> usize {
        if let Some(&id) = self.ids.get(word) {
            id
        } else {
            let id = self.words.len();
            self.words.push(word.to_string());
            self.ids.insert(word.to_string(), id);
            id
        }
    }

    /// Gets the id of a word, or [`UNKNOWN_ID`] if it is absent.
    pub fn get_index(&self, word: &str) -> usize {
        self.get_index_or(word, UNKNOWN_ID)
    }

    /// Gets the id of a word, or `default` if it is absent.
    pub fn get_index_or(&self, word: &str, default: usize) -> usize {
        self.ids.get(word).copied().unwrap_or(default)
    }

    /// Gets the word of an id, or [`UNKNOWN`] if the id is out of range.
    pub fn get_word(&self, id: usize) -> &str {
        self.words.get(id).map_or(UNKNOWN, String::as_str)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// All words in id order.
    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn reserved(&self) -> &[String] {
        &self.reserved
    }

    /// Canonicalizes the id assignment.
    ///
    /// Reserved words are re-inserted first in their original order, then every other word in
    /// ascending lexicographic order. All ids handed out before this call become invalid.
    pub fn sort(&mut self) {
        let reserved = std::mem::take(&mut self.reserved);
        let mut rest: Vec<String> = std::mem::take(&mut self.words)
            .into_iter()
            .filter(|word| !reserved.contains(word))
            .collect();
        rest.sort_unstable();
        self.ids.clear();
        for word in reserved.iter().chain(&rest) {
            self.add(word);
        }
        self.reserved = reserved;
    }

    /// Reads a vocabulary file: one entry per line, the n-th line holding id n.
    ///
    /// Lines are inserted one by one on top of [`Vocab::new`], so a file written by
    /// [`Vocab::write`] is restored with identical ids.
    ///
    /// # Errors
    ///
    /// When `rdr` generates an error or contains invalid UTF-8, it will be returned.
    pub fn read<R>(rdr: R) -> Result<Self>
    where
        R: BufRead,
    {
        let mut vocab = Self::new();
        for line in rdr.lines() {
            vocab.add(&line?);
        }
        Ok(vocab)
    }

    /// Writes the vocabulary, one entry per line in id order.
    ///
    /// # Errors
    ///
    /// When `wtr` generates an error, it will be returned as is.
    pub fn write<W>(&self, mut wtr: W) -> Result<()>
    where
        W: Write,
    {
        for word in &self.words {
            writeln!(wtr, "{word}")?;
        }
        Ok(())
    }
}

impl Default for Vocab {
    fn default() -> Self {
        Self::new()
    }
}
