use crate::averaging::AveragedVector;
use crate::errors::{Result, ZhsegError};
use crate::feature::FeaturePair;
use crate::model::Model;
use crate::sentence::BoundaryType;

// The transition score from `prev` to `curr` is stored at `prev * 2 + curr`.
#[inline(always)]
const fn transition_index(prev: BoundaryType, curr: BoundaryType) -> usize {
    prev.index() * 2 + curr.index()
}

/// Label assumed before the first character when updating transitions.
const VIRTUAL_PREV: BoundaryType = BoundaryType::WordBoundary;

/// Sequence-level perceptron decoded with the Viterbi algorithm.
///
/// A labeling is scored by the emission scores of each character (the same linear scores as
/// [`crate::Perceptron`]) plus a transition score between every pair of adjacent labels.
#[derive(Debug, Clone)]
pub struct StructuredPerceptron {
    weights: AveragedVector,
    transitions: AveragedVector,
    total_step: u64,
}

impl StructuredPerceptron {
    /// Creates a zero-initialized model.
    ///
    /// # Arguments
    ///
    /// * `dimension` - The vocabulary size.
    pub fn new(dimension: usize) -> Self {
        Self {
            weights: AveragedVector::new(dimension),
            transitions: AveragedVector::new(4),
            total_step: 0,
        }
    }

    /// Restores a model for prediction.
    ///
    /// # Errors
    ///
    /// [`ZhsegError::InvalidModel`] is returned if `model` has no transition scores.
    pub fn from_model(model: Model) -> Result<Self> {
        let transitions = model.transitions.ok_or_else(|| {
            ZhsegError::invalid_model("a pointwise model cannot be used as a structured model")
        })?;
        Ok(Self {
            weights: AveragedVector::from_values(model.weights),
            transitions: AveragedVector::from_values(
                transitions.iter().flatten().copied().collect(),
            ),
            total_step: 0,
        })
    }

    pub fn dimension(&self) -> usize {
        self.weights.len()
    }

    pub fn weights(&self) -> &[f64] {
        self.weights.values()
    }

    /// Gets the transition score matrix indexed by `[prev][curr]`.
    pub fn transitions(&self) -> [[f64; 2]; 2] {
        let t = self.transitions.values();
        [[t[0], t[1]], [t[2], t[3]]]
    }

    /// Number of completed update calls.
    pub const fn total_step(&self) -> u64 {
        self.total_step
    }

    #[inline(always)]
    fn emission(&self, pair: &FeaturePair, label: BoundaryType) -> f64 {
        self.weights.score(pair.get(label))
    }

    #[inline(always)]
    fn transition(&self, prev: BoundaryType, curr: BoundaryType) -> f64 {
        self.transitions.get(transition_index(prev, curr))
    }

    /// Computes the score of a labeling: its emission scores plus the transition scores between
    /// adjacent labels.
    ///
    /// # Panics
    ///
    /// Panics if `labels` is shorter than `pairs`.
    pub fn sequence_score(&self, pairs: &[FeaturePair], labels: &[BoundaryType]) -> f64 {
        let mut score = 0.0;
        for (t, pair) in pairs.iter().enumerate() {
            score += self.emission(pair, labels[t]);
            if t != 0 {
                score += self.transition(labels[t - 1], labels[t]);
            }
        }
        score
    }

    /// Finds the best labeling of a sentence.
    ///
    /// Ties between two previous labels resolve to [`BoundaryType::WordBoundary`], and so does a
    /// tie between the two final labels.
    pub fn predict(&self, pairs: &[FeaturePair]) -> Vec<BoundaryType> {
        let Some(first) = pairs.first() else {
            return vec![];
        };
        let mut alpha = BoundaryType::ALL.map(|label| self.emission(first, label));
        let mut backpointers = Vec::with_capacity(pairs.len());
        backpointers.push([BoundaryType::WordBoundary; 2]);
        for pair in &pairs[1..] {
            let mut next_alpha = [0.0; 2];
            let mut backpointer = [BoundaryType::WordBoundary; 2];
            for curr in BoundaryType::ALL {
                let emission = self.emission(pair, curr);
                let from_0 = alpha[0] + self.transition(BoundaryType::NotWordBoundary, curr);
                let from_1 = alpha[1] + self.transition(BoundaryType::WordBoundary, curr);
                let (best, prev) = if from_0 > from_1 {
                    (from_0, BoundaryType::NotWordBoundary)
                } else {
                    (from_1, BoundaryType::WordBoundary)
                };
                next_alpha[curr.index()] = best + emission;
                backpointer[curr.index()] = prev;
            }
            alpha = next_alpha;
            backpointers.push(backpointer);
        }

        let mut label = if alpha[0] > alpha[1] {
            BoundaryType::NotWordBoundary
        } else {
            BoundaryType::WordBoundary
        };
        let mut labels = vec![label; pairs.len()];
        for t in (1..pairs.len()).rev() {
            label = backpointers[t][label.index()];
            labels[t - 1] = label;
        }
        labels
    }

    /// Performs one training step on a sentence.
    ///
    /// The sentence is decoded with the current weights. For every position where the decoded
    /// label differs from the gold label, the gold emission features are incremented and the
    /// decoded ones decremented, and the transitions from the *decoded* previous label (the
    /// virtual [`BoundaryType::WordBoundary`] at the first position) into the gold and decoded
    /// labels are incremented and decremented respectively.
    ///
    /// An empty sentence is a no-op and does not count as a step.
    ///
    /// # Returns
    ///
    /// `true` if the weights were corrected.
    ///
    /// # Errors
    ///
    /// [`ZhsegError::LengthMismatch`] is returned, without touching the model, if `pairs` and
    /// `golds` differ in length.
    pub fn update(&mut self, pairs: &[FeaturePair], golds: &[BoundaryType]) -> Result<bool> {
        if pairs.len() != golds.len() {
            return Err(ZhsegError::length_mismatch(pairs.len(), golds.len()));
        }
        if pairs.is_empty() {
            return Ok(false);
        }
        let predicted = self.predict(pairs);
        let mistake = predicted != golds;
        if mistake {
            let step = self.total_step;
            for (t, (pair, (&gold, &pred))) in pairs.iter().zip(golds.iter().zip(&predicted)).enumerate() {
                if gold == pred {
                    continue;
                }
                for &i in pair.get(gold) {
                    self.weights.add(i, 1.0, step);
                }
                for &i in pair.get(pred) {
                    self.weights.add(i, -1.0, step);
                }
                let prev = if t == 0 { VIRTUAL_PREV } else { predicted[t - 1] };
                self.transitions.add(transition_index(prev, gold), 1.0, step);
                self.transitions.add(transition_index(prev, pred), -1.0, step);
            }
        }
        self.total_step += 1;
        Ok(mistake)
    }

    /// Converts the perceptron into a model.
    ///
    /// # Arguments
    ///
    /// * `average` - If `true`, emission and transition scores are replaced by their averages
    ///   over all training steps.
    pub fn into_model(self, average: bool) -> Model {
        let mut weights = self.weights;
        let mut transitions = self.transitions;
        if average {
            weights.finalize(self.total_step);
            transitions.finalize(self.total_step);
        }
        let t = transitions.into_values();
        Model {
            weights: weights.into_values(),
            transitions: Some([[t[0], t[1]], [t[2], t[3]]]),
        }
    }
}
