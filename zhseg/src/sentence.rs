/// Boundary type.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[repr(u8)]
pub enum BoundaryType {
    /// Inner of a word.
    NotWordBoundary = 0,

    /// Word boundary. The character is the last character of a word.
    WordBoundary = 1,
}

impl BoundaryType {
    /// Both labels, in index order.
    pub const ALL: [Self; 2] = [Self::NotWordBoundary, Self::WordBoundary];

    /// Gets the label with the given index, treating every non-zero index as a boundary.
    pub const fn from_index(index: usize) -> Self {
        if index == 0 {
            Self::NotWordBoundary
        } else {
            Self::WordBoundary
        }
    }

    /// Gets the index of the label: 0 or 1.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Gets the other label.
    pub const fn flip(self) -> Self {
        match self {
            Self::NotWordBoundary => Self::WordBoundary,
            Self::WordBoundary => Self::NotWordBoundary,
        }
    }
}

/// Returns `true` if `c` separates words in a tokenized text. This covers the ASCII space and
/// the full-width space U+3000.
#[inline(always)]
pub fn is_separator(c: char) -> bool {
    c.is_whitespace()
}

/// Sentence with boundary annotations.
///
/// A sentence holds the characters of a line without separators, and one boundary label per
/// character.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct Sentence {
    pub(crate) chars: Vec<char>,
    pub(crate) boundaries: Vec<BoundaryType>,
}

impl Sentence {
    /// Creates a new [`Sentence`] from a raw string.
    ///
    /// Separators in `text` are dropped and all boundaries are initialized to
    /// [`BoundaryType::NotWordBoundary`].
    ///
    /// # Examples
    ///
    /// ```
    /// use zhseg::Sentence;
    ///
    /// let s = Sentence::from_raw("我爱你");
    /// assert_eq!(3, s.len());
    /// ```
    pub fn from_raw<S>(text: S) -> Self
    where
        S: AsRef<str>,
    {
        let chars: Vec<char> = text.as_ref().chars().filter(|&c| !is_separator(c)).collect();
        let boundaries = vec![BoundaryType::NotWordBoundary; chars.len()];
        Self { chars, boundaries }
    }

    /// Creates a new [`Sentence`] from a tokenized string.
    ///
    /// A character directly followed by one or more separators, or by the end of the text, is a
    /// word boundary. Leading and consecutive separators are allowed. A text without any
    /// non-separator character gives an empty sentence.
    ///
    /// # Examples
    ///
    /// ```
    /// use zhseg::{BoundaryType, Sentence};
    ///
    /// let s = Sentence::from_tokenized("我爱 你");
    /// assert_eq!(
    ///     &[
    ///         BoundaryType::NotWordBoundary,
    ///         BoundaryType::WordBoundary,
    ///         BoundaryType::WordBoundary,
    ///     ],
    ///     s.boundaries(),
    /// );
    /// ```
    pub fn from_tokenized<S>(tokenized_text: S) -> Self
    where
        S: AsRef<str>,
    {
        let mut chars = vec![];
        let mut boundaries = vec![];
        for c in tokenized_text.as_ref().chars() {
            if is_separator(c) {
                if let Some(last) = boundaries.last_mut() {
                    *last = BoundaryType::WordBoundary;
                }
            } else {
                chars.push(c);
                boundaries.push(BoundaryType::NotWordBoundary);
            }
        }
        if let Some(last) = boundaries.last_mut() {
            *last = BoundaryType::WordBoundary;
        }
        Self { chars, boundaries }
    }

    /// Renders the sentence with two spaces after every word boundary.
    ///
    /// # Examples
    ///
    /// ```
    /// use zhseg::Sentence;
    ///
    /// let s = Sentence::from_tokenized("我爱 你");
    /// assert_eq!("我爱  你  ", s.to_segmented_string());
    /// ```
    pub fn to_segmented_string(&self) -> String {
        let mut result = String::with_capacity(self.chars.len() * 5);
        for (&c, &b) in self.chars.iter().zip(&self.boundaries) {
            result.push(c);
            if b == BoundaryType::WordBoundary {
                result.push_str("  ");
            }
        }
        result
    }

    /// Splits the sentence into words at its boundaries.
    ///
    /// Trailing characters without a closing boundary form the last word.
    pub fn to_words(&self) -> Vec<String> {
        let mut words = vec![];
        let mut word = String::new();
        for (&c, &b) in self.chars.iter().zip(&self.boundaries) {
            word.push(c);
            if b == BoundaryType::WordBoundary {
                words.push(std::mem::take(&mut word));
            }
        }
        if !word.is_empty() {
            words.push(word);
        }
        words
    }

    /// Gets the characters without separators.
    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Gets the text without separators.
    pub fn to_raw_string(&self) -> String {
        self.chars.iter().collect()
    }

    pub fn boundaries(&self) -> &[BoundaryType] {
        &self.boundaries
    }

    pub fn boundaries_mut(&mut self) -> &mut [BoundaryType] {
        &mut self.boundaries
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }
}
