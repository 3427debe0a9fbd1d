use std::io::BufRead;

use tracing::debug;

use crate::errors::Result;
use crate::feature::{FeatureExtractor, FeaturePair, FrozenVocab};
use crate::sentence::{BoundaryType, Sentence};
use crate::vocab::Vocab;

/// A sentence with its extracted features.
#[derive(Debug, Clone)]
pub struct Example {
    sentence: Sentence,
    features: Vec<FeaturePair>,
}

impl Example {
    pub const fn sentence(&self) -> &Sentence {
        &self.sentence
    }

    /// Feature pairs, one per character.
    pub fn features(&self) -> &[FeaturePair] {
        &self.features
    }

    /// Gold labels, one per character.
    pub fn labels(&self) -> &[BoundaryType] {
        self.sentence.boundaries()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// Featurized sentences together with the vocabulary their feature ids refer to.
///
/// # Examples
///
/// ```
/// use zhseg::{Dataset, Sentence};
///
/// let mut dataset = Dataset::new();
/// dataset.push_sentence(Sentence::from_tokenized("我 爱 你"));
/// assert_eq!(1, dataset.len());
/// assert_eq!(43, dataset.vocab().len());
/// ```
pub struct Dataset {
    vocab: Vocab,
    frozen: bool,
    extractor: FeatureExtractor,
    examples: Vec<Example>,
}

impl Dataset {
    /// Creates an empty dataset whose vocabulary grows with every new feature.
    pub fn new() -> Self {
        Self {
            vocab: Vocab::new(),
            frozen: false,
            extractor: FeatureExtractor::new(),
            examples: vec![],
        }
    }

    /// Creates an empty dataset on top of a fixed vocabulary. Unseen features map to the
    /// unknown id.
    pub fn with_vocab(vocab: Vocab) -> Self {
        Self {
            vocab,
            frozen: true,
            extractor: FeatureExtractor::new(),
            examples: vec![],
        }
    }

    /// Creates a dataset with a canonical vocabulary.
    ///
    /// All features of `sentences` are registered first, the vocabulary is sorted, and then the
    /// features are extracted against the sorted vocabulary. The resulting ids do not depend on
    /// the order of the sentences.
    pub fn with_sorted_vocab(sentences: Vec<Sentence>) -> Self {
        let mut vocab = Vocab::new();
        let mut extractor = FeatureExtractor::new();
        for sentence in &sentences {
            extractor.extract(sentence, &mut vocab);
        }
        vocab.sort();
        let mut dataset = Self::with_vocab(vocab);
        for sentence in sentences {
            dataset.push_sentence(sentence);
        }
        dataset
    }

    /// Reads a tokenized corpus, one sentence per line.
    ///
    /// # Errors
    ///
    /// When `rdr` generates an error, it will be returned as is.
    pub fn read_corpus<R>(&mut self, rdr: R) -> Result<()>
    where
        R: BufRead,
    {
        for line in rdr.lines() {
            self.push_sentence(Sentence::from_tokenized(line?));
        }
        debug!(
            sentences = self.examples.len(),
            features = self.vocab.len(),
            "corpus loaded"
        );
        Ok(())
    }

    /// Extracts the features of a sentence and adds it to the dataset.
    pub fn push_sentence(&mut self, sentence: Sentence) {
        let features = if self.frozen {
            self.extractor
                .extract(&sentence, &mut FrozenVocab(&self.vocab))
        } else {
            self.extractor.extract(&sentence, &mut self.vocab)
        };
        self.examples.push(Example { sentence, features });
    }

    pub fn examples(&self) -> &[Example] {
        &self.examples
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    /// Returns `true` if the vocabulary does not grow.
    pub const fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub const fn vocab(&self) -> &Vocab {
        &self.vocab
    }

    pub fn into_vocab(self) -> Vocab {
        self.vocab
    }
}

impl Default for Dataset {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::vocab::UNKNOWN_ID;

    #[test]
    fn test_dataset_read_corpus() {
        let mut dataset = Dataset::new();
        dataset
            .read_corpus("我 爱 你\n\n你 爱 我\n".as_bytes())
            .unwrap();
        assert_eq!(3, dataset.len());
        assert!(dataset.examples()[1].is_empty());
        assert_eq!(3, dataset.examples()[2].features().len());
        assert_eq!(&[BoundaryType::WordBoundary; 3], dataset.examples()[2].labels());
    }

    #[test]
    fn test_dataset_frozen() {
        let mut train = Dataset::new();
        train.push_sentence(Sentence::from_tokenized("我 爱 你"));
        let vocab = train.into_vocab();
        let size = vocab.len();

        let mut test = Dataset::with_vocab(vocab);
        test.push_sentence(Sentence::from_tokenized("他 爱 你"));
        assert!(test.is_frozen());
        assert_eq!(size, test.vocab().len());
        let first = test.examples()[0].features()[0];
        assert_eq!(UNKNOWN_ID, first.get(BoundaryType::WordBoundary)[1]);
        assert_ne!(UNKNOWN_ID, first.get(BoundaryType::WordBoundary)[0]);
    }

    #[test]
    fn test_dataset_with_sorted_vocab() {
        let a = Dataset::with_sorted_vocab(vec![
            Sentence::from_tokenized("我 爱 你"),
            Sentence::from_tokenized("你 爱 我"),
        ]);
        let b = Dataset::with_sorted_vocab(vec![
            Sentence::from_tokenized("你 爱 我"),
            Sentence::from_tokenized("我 爱 你"),
        ]);
        assert_eq!(a.vocab(), b.vocab());
        assert_eq!(a.examples()[0].features(), b.examples()[1].features());

        let words = a.vocab().words();
        assert_eq!("<unknown>", words[0]);
        assert!(words[1..].windows(2).all(|w| w[0] < w[1]));
        for example in a.examples() {
            for pair in example.features() {
                for label in BoundaryType::ALL {
                    assert!(pair.get(label).iter().all(|&id| id != UNKNOWN_ID));
                }
            }
        }
    }
}
