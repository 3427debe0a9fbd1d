#![cfg_attr(docsrs, feature(doc_cfg))]

//! # zhseg
//!
//! zhseg is a Chinese word segmenter based on perceptrons.
//!
//! Segmentation is treated as labeling every character with whether a word ends after it.
//! Characters are described by n-grams of their neighborhood. Two learners are provided: a
//! pointwise [`Perceptron`] that labels every character on its own, and a
//! [`StructuredPerceptron`] that decodes a whole sentence with the Viterbi algorithm. Both can
//! save the time average of their weights instead of the final values.
//!
//! ## Examples
//!
//! ```
//! use zhseg::{Dataset, ModelVariant, Predictor, Sentence, Trainer};
//!
//! let mut dataset = Dataset::new();
//! for line in ["我 爱 你", "你 爱 我"] {
//!     dataset.push_sentence(Sentence::from_tokenized(line));
//! }
//! let model = Trainer::new(ModelVariant::default()).epochs(1).train(&dataset);
//!
//! let predictor = Predictor::new(model, dataset.into_vocab()).unwrap();
//! let s = predictor.predict(Sentence::from_raw("我爱你"));
//! assert_eq!("我  爱  你  ", s.to_segmented_string());
//! ```
//!
//! Models are written with [`Model::write`] and read with [`Model::read`]. The vocabulary is
//! stored next to the model with [`Vocab::write`].

mod averaging;
mod dataset;
mod feature;
mod model;
mod perceptron;
mod predictor;
mod sentence;
mod structured;
mod trainer;
mod vocab;

pub mod errors;

pub use averaging::AveragedVector;
pub use dataset::{Dataset, Example};
pub use feature::{FeatureExtractor, FeatureIndexer, FeaturePair, FrozenVocab, N_TEMPLATES};
pub use model::Model;
pub use perceptron::Perceptron;
pub use predictor::Predictor;
pub use sentence::{is_separator, BoundaryType, Sentence};
pub use structured::StructuredPerceptron;
pub use trainer::{ModelVariant, Trainer, DEFAULT_EPOCHS};
pub use vocab::{Vocab, UNKNOWN, UNKNOWN_ID};
