use crate::errors::{Result, ZhsegError};
use crate::feature::{FeatureExtractor, FeaturePair, FrozenVocab};
use crate::model::Model;
use crate::perceptron::Perceptron;
use crate::sentence::{BoundaryType, Sentence};
use crate::structured::StructuredPerceptron;
use crate::vocab::Vocab;

enum Decoder {
    Pointwise(Perceptron),
    Structured(StructuredPerceptron),
}

/// Predictor.
///
/// The decoding method follows the model: a pointwise model labels each character on its own
/// and a structured model decodes the whole sentence.
pub struct Predictor {
    decoder: Decoder,
    vocab: Vocab,
}

impl Predictor {
    /// Creates a new predictor.
    ///
    /// # Arguments
    ///
    /// * `model` - A model data.
    /// * `vocab` - The vocabulary the model was trained with.
    ///
    /// # Returns
    ///
    /// A new predictor.
    ///
    /// # Errors
    ///
    /// [`ZhsegError::InvalidArgument`] is returned if the size of `vocab` differs from the
    /// dimension of `model`.
    pub fn new(model: Model, vocab: Vocab) -> Result<Self> {
        if model.dimension() != vocab.len() {
            return Err(ZhsegError::invalid_argument(
                "vocab",
                format!(
                    "the vocabulary has {} entries but the model has {} weights",
                    vocab.len(),
                    model.dimension()
                ),
            ));
        }
        let decoder = if model.is_structured() {
            Decoder::Structured(StructuredPerceptron::from_model(model)?)
        } else {
            Decoder::Pointwise(Perceptron::from_model(model)?)
        };
        Ok(Self { decoder, vocab })
    }

    pub const fn vocab(&self) -> &Vocab {
        &self.vocab
    }

    pub const fn is_structured(&self) -> bool {
        matches!(self.decoder, Decoder::Structured(_))
    }

    /// Predicts word boundaries.
    ///
    /// # Arguments
    ///
    /// * `sentence` - A sentence. Its current boundaries are overwritten.
    ///
    /// # Returns
    ///
    /// A sentence with predicted boundaries.
    pub fn predict(&self, mut sentence: Sentence) -> Sentence {
        let features =
            FeatureExtractor::new().extract(&sentence, &mut FrozenVocab(&self.vocab));
        let labels = self.predict_features(&features);
        sentence.boundaries_mut().copy_from_slice(&labels);
        sentence
    }

    /// Predicts one label per feature pair.
    pub fn predict_features(&self, pairs: &[FeaturePair]) -> Vec<BoundaryType> {
        match &self.decoder {
            Decoder::Pointwise(perceptron) => perceptron.predict_sequence(pairs),
            Decoder::Structured(perceptron) => perceptron.predict(pairs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::dataset::Dataset;
    use crate::trainer::{ModelVariant, Trainer};

    const CORPUS: &str = "我 爱 你\n你 爱 我\n";

    fn train(variant: ModelVariant, epochs: usize) -> (Model, Vocab) {
        let mut dataset = Dataset::new();
        dataset.read_corpus(CORPUS.as_bytes()).unwrap();
        let model = Trainer::new(variant).epochs(epochs).train(&dataset);
        (model, dataset.into_vocab())
    }

    fn segment_corpus(predictor: &Predictor, corpus: &str) -> String {
        let mut output = String::new();
        for line in corpus.lines() {
            let s = predictor.predict(Sentence::from_tokenized(line));
            output.push_str(&s.to_segmented_string());
            output.push('\n');
        }
        output
    }

    #[test]
    fn test_predict_toy_corpus() {
        for variant in [
            ModelVariant::new(false, false),
            ModelVariant::new(false, true),
            ModelVariant::new(true, false),
            ModelVariant::new(true, true),
        ] {
            let (model, vocab) = train(variant, 1);
            let predictor = Predictor::new(model, vocab).unwrap();
            assert_eq!(variant.structured, predictor.is_structured());
            assert_eq!(
                "我  爱  你  \n你  爱  我  \n",
                segment_corpus(&predictor, CORPUS),
                "{variant:?}"
            );
        }
    }

    #[test]
    fn test_predict_empty_sentence() {
        let (model, vocab) = train(ModelVariant::new(true, false), 1);
        let predictor = Predictor::new(model, vocab).unwrap();
        let s = predictor.predict(Sentence::from_raw(""));
        assert_eq!("", s.to_segmented_string());
    }

    #[test]
    fn test_predict_after_write_read() {
        for variant in [ModelVariant::new(false, true), ModelVariant::new(true, true)] {
            let mut dataset = Dataset::new();
            dataset
                .read_corpus("中国 人民 很 好\n我们 爱 中国\n人民 很 好\n".as_bytes())
                .unwrap();
            let model = Trainer::new(variant).epochs(5).train(&dataset);
            let vocab = dataset.into_vocab();

            let mut model_buf = vec![];
            model.write(&mut model_buf).unwrap();
            let mut vocab_buf = vec![];
            vocab.write(&mut vocab_buf).unwrap();

            let held_out = ["我们很好", "中国人民爱我们", "好"];
            let original = Predictor::new(model, vocab).unwrap();
            let restored = Predictor::new(
                Model::read(model_buf.as_slice()).unwrap(),
                Vocab::read(vocab_buf.as_slice()).unwrap(),
            )
            .unwrap();
            for text in held_out {
                assert_eq!(
                    original.predict(Sentence::from_raw(text)),
                    restored.predict(Sentence::from_raw(text)),
                );
            }
        }
    }

    #[test]
    fn test_predictor_dimension_mismatch() {
        let (model, _) = train(ModelVariant::default(), 1);
        let result = Predictor::new(model, Vocab::new());
        assert!(matches!(result, Err(ZhsegError::InvalidArgument(_))));
    }
}
