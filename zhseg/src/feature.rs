use crate::sentence::{BoundaryType, Sentence};
use crate::vocab::Vocab;

/// Number of feature templates instantiated per character and label.
pub const N_TEMPLATES: usize = 7;

/// Context character placed before the first character of a sentence.
pub const BEGIN_MARK: char = '^';

/// Context character placed after the last character of a sentence.
pub const END_MARK: char = '$';

/// Feature ids of one character, under each label hypothesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FeaturePair {
    ids: [[usize; N_TEMPLATES]; 2],
}

impl FeaturePair {
    pub const fn new(
        not_boundary: [usize; N_TEMPLATES],
        boundary: [usize; N_TEMPLATES],
    ) -> Self {
        Self {
            ids: [not_boundary, boundary],
        }
    }

    /// Gets the feature ids assuming the character has the given label.
    #[inline(always)]
    pub const fn get(&self, label: BoundaryType) -> &[usize; N_TEMPLATES] {
        &self.ids[label as usize]
    }
}

/// Maps feature strings to ids.
pub trait FeatureIndexer {
    fn index(&mut self, key: &str) -> usize;
}

/// Registers unseen features.
impl FeatureIndexer for Vocab {
    #[inline(always)]
    fn index(&mut self, key: &str) -> usize {
        self.add(key)
    }
}

/// Read-only view of a vocabulary. Unseen features map to [`crate::UNKNOWN_ID`].
#[derive(Clone, Copy)]
pub struct FrozenVocab<'a>(pub &'a Vocab);

impl FeatureIndexer for FrozenVocab<'_> {
    #[inline(always)]
    fn index(&mut self, key: &str) -> usize {
        self.0.get_index(key)
    }
}

/// Builds the character n-gram features of a sentence.
///
/// Every character is described by its previous, current and next characters through seven
/// templates: three unigrams, the two adjacent bigrams, the skip bigram and the trigram. A
/// feature string is the `_`-joined template id, characters and hypothesized label, e.g.
/// `4_^_我_1`.
#[derive(Default)]
pub struct FeatureExtractor {
    key: String,
}

impl FeatureExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extracts one feature pair per character of `sentence`.
    ///
    /// # Arguments
    ///
    /// * `sentence` - A sentence.
    /// * `indexer` - Maps feature strings to ids. Pass a [`Vocab`] to register new features or a
    ///   [`FrozenVocab`] to only look them up.
    ///
    /// # Returns
    ///
    /// Feature pairs index-aligned with the characters of `sentence`.
    pub fn extract<I>(&mut self, sentence: &Sentence, indexer: &mut I) -> Vec<FeaturePair>
    where
        I: FeatureIndexer + ?Sized,
    {
        let chars = sentence.chars();
        let mut features = Vec::with_capacity(chars.len());
        for (i, &curr) in chars.iter().enumerate() {
            let prev = if i == 0 { BEGIN_MARK } else { chars[i - 1] };
            let next = chars.get(i + 1).copied().unwrap_or(END_MARK);
            let trigram = [prev, curr, next];
            let skip_bigram = [prev, next];
            let templates: [&[char]; N_TEMPLATES] = [
                &trigram[0..1],
                &trigram[1..2],
                &trigram[2..3],
                &trigram[0..2],
                &trigram[1..3],
                &skip_bigram[..],
                &trigram[..],
            ];
            let mut ids = [[0; N_TEMPLATES]; 2];
            for label in BoundaryType::ALL {
                for (t, context) in templates.iter().enumerate() {
                    ids[label.index()][t] = indexer.index(self.key(t + 1, context, label));
                }
            }
            features.push(FeaturePair { ids });
        }
        features
    }

    // `template` is in 1..=7.
    fn key(&mut self, template: usize, context: &[char], label: BoundaryType) -> &str {
        self.key.clear();
        self.key.push(char::from(b'0' + template as u8));
        for &c in context {
            self.key.push('_');
            self.key.push(c);
        }
        self.key.push('_');
        self.key.push(if label == BoundaryType::WordBoundary {
            '1'
        } else {
            '0'
        });
        &self.key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::vocab::UNKNOWN_ID;

    #[test]
    fn test_extract_registers_in_template_order() {
        let mut vocab = Vocab::new();
        let s = Sentence::from_tokenized("我 爱 你");
        let features = FeatureExtractor::new().extract(&s, &mut vocab);

        assert_eq!(3, features.len());
        assert_eq!(
            FeaturePair::new([1, 2, 3, 4, 5, 6, 7], [8, 9, 10, 11, 12, 13, 14]),
            features[0]
        );
        assert_eq!(
            FeaturePair::new([15, 16, 17, 18, 19, 20, 21], [22, 23, 24, 25, 26, 27, 28]),
            features[1]
        );
        assert_eq!(43, vocab.len());

        assert_eq!("1_^_0", vocab.get_word(1));
        assert_eq!("2_我_0", vocab.get_word(2));
        assert_eq!("3_爱_0", vocab.get_word(3));
        assert_eq!("4_^_我_0", vocab.get_word(4));
        assert_eq!("5_我_爱_0", vocab.get_word(5));
        assert_eq!("6_^_爱_0", vocab.get_word(6));
        assert_eq!("7_^_我_爱_0", vocab.get_word(7));
        assert_eq!("7_^_我_爱_1", vocab.get_word(14));
        assert_eq!("3_$_1", vocab.get_word(38));
    }

    #[test]
    fn test_extract_skips_separators() {
        let mut a = Vocab::new();
        let mut b = Vocab::new();
        let mut extractor = FeatureExtractor::new();
        let fa = extractor.extract(&Sentence::from_tokenized("我 爱"), &mut a);
        let fb = extractor.extract(&Sentence::from_tokenized("我\u{3000}  爱"), &mut b);
        assert_eq!(fa, fb);
        assert_eq!(a, b);
        assert_eq!("5_我_爱_0", a.get_word(5));
    }

    #[test]
    fn test_extract_frozen() {
        let mut vocab = Vocab::new();
        let mut extractor = FeatureExtractor::new();
        extractor.extract(&Sentence::from_tokenized("我 爱 你"), &mut vocab);
        let size = vocab.len();

        let features = extractor.extract(&Sentence::from_raw("你"), &mut FrozenVocab(&vocab));
        assert_eq!(size, vocab.len());
        assert_eq!(
            vec![FeaturePair::new(
                [1, 30, 31, UNKNOWN_ID, 33, UNKNOWN_ID, UNKNOWN_ID],
                [8, 37, 38, UNKNOWN_ID, 40, UNKNOWN_ID, UNKNOWN_ID],
            )],
            features
        );
    }

    #[test]
    fn test_extract_empty() {
        let mut vocab = Vocab::new();
        let features = FeatureExtractor::new().extract(&Sentence::from_tokenized("  "), &mut vocab);
        assert!(features.is_empty());
        assert_eq!(1, vocab.len());
    }

    #[test]
    fn test_feature_pair_get() {
        let pair = FeaturePair::new([1; N_TEMPLATES], [2; N_TEMPLATES]);
        assert_eq!(&[1; N_TEMPLATES], pair.get(BoundaryType::NotWordBoundary));
        assert_eq!(&[2; N_TEMPLATES], pair.get(BoundaryType::WordBoundary));
    }
}
