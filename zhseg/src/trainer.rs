use tracing::{info, warn};

use crate::dataset::Dataset;
use crate::model::Model;
use crate::perceptron::Perceptron;
use crate::structured::StructuredPerceptron;

/// Number of passes over the training data when not specified.
pub const DEFAULT_EPOCHS: usize = 10;

/// Selects the learner and whether its weights are averaged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModelVariant {
    /// Decodes whole sentences with [`StructuredPerceptron`] instead of labeling each character
    /// with [`Perceptron`].
    pub structured: bool,

    /// Saves the time average of the weights instead of their final values.
    pub average: bool,
}

impl ModelVariant {
    pub const fn new(structured: bool, average: bool) -> Self {
        Self {
            structured,
            average,
        }
    }

    /// Conventional file name of a model of this variant.
    pub const fn default_file_name(self) -> &'static str {
        match (self.structured, self.average) {
            (false, false) => "perceptron.model",
            (false, true) => "perceptron.average.model",
            (true, false) => "perceptron.structured.model",
            (true, true) => "perceptron.structured.average.model",
        }
    }
}

/// Trainer.
///
/// # Examples
///
/// ```
/// use zhseg::{Dataset, ModelVariant, Sentence, Trainer};
///
/// let mut dataset = Dataset::new();
/// dataset.push_sentence(Sentence::from_tokenized("我 爱 你"));
///
/// let model = Trainer::new(ModelVariant::new(true, true)).epochs(3).train(&dataset);
/// assert!(model.is_structured());
/// assert_eq!(dataset.vocab().len(), model.dimension());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Trainer {
    variant: ModelVariant,
    epochs: usize,
}

impl Trainer {
    /// Creates a trainer running [`DEFAULT_EPOCHS`] epochs.
    pub const fn new(variant: ModelVariant) -> Self {
        Self {
            variant,
            epochs: DEFAULT_EPOCHS,
        }
    }

    /// Sets the number of passes over the training data.
    pub const fn epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    pub const fn variant(&self) -> ModelVariant {
        self.variant
    }

    /// Trains a model on every sentence of `dataset`.
    ///
    /// Empty sentences are skipped. A sentence whose labels do not line up with its features
    /// is reported with a warning and skipped.
    ///
    /// # Returns
    ///
    /// A model whose dimension is the size of the vocabulary of `dataset`.
    pub fn train(&self, dataset: &Dataset) -> Model {
        let dimension = dataset.vocab().len();
        info!(
            sentences = dataset.len(),
            dimension,
            structured = self.variant.structured,
            average = self.variant.average,
            "training begins"
        );
        let model = if self.variant.structured {
            self.train_structured(dataset, dimension)
        } else {
            self.train_pointwise(dataset, dimension)
        };
        info!("training finished");
        model
    }

    fn train_pointwise(&self, dataset: &Dataset, dimension: usize) -> Model {
        let mut perceptron = Perceptron::new(dimension);
        for epoch in 0..self.epochs {
            let mut n_mistakes = 0;
            for (i, example) in dataset.examples().iter().enumerate() {
                if example.is_empty() {
                    continue;
                }
                match perceptron.update_sequence(example.features(), example.labels()) {
                    Ok(n) => n_mistakes += n,
                    Err(e) => warn!(sentence = i, "skipped: {e}"),
                }
            }
            info!(epoch, mistakes = n_mistakes, "epoch finished");
        }
        perceptron.into_model(self.variant.average)
    }

    fn train_structured(&self, dataset: &Dataset, dimension: usize) -> Model {
        let mut perceptron = StructuredPerceptron::new(dimension);
        for epoch in 0..self.epochs {
            let mut n_mistakes = 0;
            for (i, example) in dataset.examples().iter().enumerate() {
                if example.is_empty() {
                    continue;
                }
                match perceptron.update(example.features(), example.labels()) {
                    Ok(true) => n_mistakes += 1,
                    Ok(false) => (),
                    Err(e) => warn!(sentence = i, "skipped: {e}"),
                }
            }
            info!(epoch, mistakes = n_mistakes, "epoch finished");
        }
        perceptron.into_model(self.variant.average)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::sentence::Sentence;

    fn toy_dataset() -> Dataset {
        let mut dataset = Dataset::new();
        dataset.read_corpus("我 爱 你\n你 爱 我\n".as_bytes()).unwrap();
        dataset
    }

    #[test]
    fn test_default_file_name() {
        assert_eq!("perceptron.model", ModelVariant::default().default_file_name());
        assert_eq!(
            "perceptron.average.model",
            ModelVariant::new(false, true).default_file_name()
        );
        assert_eq!(
            "perceptron.structured.model",
            ModelVariant::new(true, false).default_file_name()
        );
    }

    #[test]
    fn test_train_pointwise_one_epoch() {
        let dataset = toy_dataset();
        let model = Trainer::new(ModelVariant::default())
            .epochs(1)
            .train(&dataset);
        let weights = model.weights();
        assert_eq!(dataset.vocab().len(), weights.len());
        // Every gold label is a boundary and only the first sentence triggers corrections.
        assert_eq!(0.0, weights[0]);
        assert_eq!(-1.0, weights[dataset.vocab().get_index("1_^_0")]);
        assert_eq!(1.0, weights[dataset.vocab().get_index("1_^_1")]);
        assert_eq!(1.0, weights[dataset.vocab().get_index("7_^_我_爱_1")]);
        assert_eq!(0.0, weights[dataset.vocab().get_index("7_^_你_爱_1")]);
        assert!(weights.iter().all(|&w| w == -1.0 || w == 0.0 || w == 1.0));
    }

    #[test]
    fn test_train_is_reproducible() {
        for variant in [
            ModelVariant::new(false, false),
            ModelVariant::new(false, true),
            ModelVariant::new(true, false),
            ModelVariant::new(true, true),
        ] {
            let a = Trainer::new(variant).epochs(2).train(&toy_dataset());
            let b = Trainer::new(variant).epochs(2).train(&toy_dataset());
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_train_skips_empty_sentences() {
        let mut dataset = Dataset::new();
        dataset.push_sentence(Sentence::from_tokenized(""));
        dataset.push_sentence(Sentence::from_tokenized("  "));
        let model = Trainer::new(ModelVariant::new(true, true)).train(&dataset);
        assert_eq!(1, model.dimension());
        assert_eq!(Some(&[[0.0; 2]; 2]), model.transitions());
    }
}
