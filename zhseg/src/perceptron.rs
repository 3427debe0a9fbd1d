use crate::averaging::AveragedVector;
use crate::errors::{Result, ZhsegError};
use crate::feature::FeaturePair;
use crate::model::Model;
use crate::sentence::BoundaryType;

/// Binary per-character perceptron.
///
/// Each character is classified on its own by comparing the scores of its two feature sets.
/// Training is mistake driven: a tie counts as a mistake.
#[derive(Debug, Clone)]
pub struct Perceptron {
    weights: AveragedVector,
    total_step: u64,
}

impl Perceptron {
    /// Creates a zero-initialized perceptron.
    ///
    /// # Arguments
    ///
    /// * `dimension` - The vocabulary size.
    pub fn new(dimension: usize) -> Self {
        Self {
            weights: AveragedVector::new(dimension),
            total_step: 0,
        }
    }

    /// Restores a perceptron from a model for prediction.
    ///
    /// # Errors
    ///
    /// [`ZhsegError::InvalidModel`] is returned if `model` holds transition scores.
    pub fn from_model(model: Model) -> Result<Self> {
        if model.transitions.is_some() {
            return Err(ZhsegError::invalid_model(
                "a structured model cannot be used as a pointwise model",
            ));
        }
        Ok(Self {
            weights: AveragedVector::from_values(model.weights),
            total_step: 0,
        })
    }

    pub fn dimension(&self) -> usize {
        self.weights.len()
    }

    pub fn weights(&self) -> &[f64] {
        self.weights.values()
    }

    /// Number of completed update calls.
    pub const fn total_step(&self) -> u64 {
        self.total_step
    }

    /// Sums the weights of the given feature ids.
    #[inline(always)]
    pub fn score(&self, ids: &[usize]) -> f64 {
        self.weights.score(ids)
    }

    /// Predicts the label of one character. Ties favor [`BoundaryType::WordBoundary`].
    pub fn predict(&self, pair: &FeaturePair) -> BoundaryType {
        let score0 = self.score(pair.get(BoundaryType::NotWordBoundary));
        let score1 = self.score(pair.get(BoundaryType::WordBoundary));
        if score0 > score1 {
            BoundaryType::NotWordBoundary
        } else {
            BoundaryType::WordBoundary
        }
    }

    /// Predicts the labels of a sequence of characters independently.
    pub fn predict_sequence(&self, pairs: &[FeaturePair]) -> Vec<BoundaryType> {
        pairs.iter().map(|pair| self.predict(pair)).collect()
    }

    /// Performs one training step on a character.
    ///
    /// If the gold label does not strictly outscore the other label, every weight of the gold
    /// feature set is incremented and every weight of the other set is decremented.
    ///
    /// # Returns
    ///
    /// `true` if the weights were corrected.
    pub fn update(&mut self, pair: &FeaturePair, gold: BoundaryType) -> bool {
        let gold_ids = pair.get(gold);
        let other_ids = pair.get(gold.flip());
        let mistake = self.score(other_ids) >= self.score(gold_ids);
        if mistake {
            for &i in gold_ids {
                self.weights.add(i, 1.0, self.total_step);
            }
            for &i in other_ids {
                self.weights.add(i, -1.0, self.total_step);
            }
        }
        self.total_step += 1;
        mistake
    }

    /// Performs one training step per character of a sentence.
    ///
    /// # Returns
    ///
    /// The number of corrected characters.
    ///
    /// # Errors
    ///
    /// [`ZhsegError::LengthMismatch`] is returned, without touching the weights, if `pairs` and
    /// `golds` differ in length.
    pub fn update_sequence(&mut self, pairs: &[FeaturePair], golds: &[BoundaryType]) -> Result<usize> {
        if pairs.len() != golds.len() {
            return Err(ZhsegError::length_mismatch(pairs.len(), golds.len()));
        }
        Ok(pairs
            .iter()
            .zip(golds)
            .filter(|&(pair, &gold)| self.update(pair, gold))
            .count())
    }

    /// Converts the perceptron into a model.
    ///
    /// # Arguments
    ///
    /// * `average` - If `true`, every weight is replaced by its average over all training steps.
    pub fn into_model(self, average: bool) -> Model {
        let mut weights = self.weights;
        if average {
            weights.finalize(self.total_step);
        }
        Model {
            weights: weights.into_values(),
            transitions: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use BoundaryType::*;

    fn pair(base: usize) -> FeaturePair {
        let mut a = [0; 7];
        let mut b = [0; 7];
        for i in 0..7 {
            a[i] = base + i;
            b[i] = base + 7 + i;
        }
        FeaturePair::new(a, b)
    }

    #[test]
    fn test_predict_tie_favors_boundary() {
        let p = Perceptron::new(20);
        assert_eq!(WordBoundary, p.predict(&pair(1)));
    }

    #[test]
    fn test_update_on_tie() {
        let mut p = Perceptron::new(15);
        assert!(p.update(&pair(1), WordBoundary));
        assert_eq!(0.0, p.weights()[0]);
        assert!(p.weights()[1..8].iter().all(|&w| w == -1.0));
        assert!(p.weights()[8..15].iter().all(|&w| w == 1.0));
        assert_eq!(1, p.total_step());
    }

    #[test]
    fn test_update_no_change_when_correct() {
        let mut p = Perceptron::new(15);
        p.update(&pair(1), NotWordBoundary);
        let before = p.weights().to_vec();
        assert!(!p.update(&pair(1), NotWordBoundary));
        assert_eq!(before, p.weights());
        assert_eq!(2, p.total_step());
        assert_eq!(NotWordBoundary, p.predict(&pair(1)));
    }

    #[test]
    fn test_update_sequence_length_mismatch() {
        let mut p = Perceptron::new(15);
        let result = p.update_sequence(&[pair(1)], &[WordBoundary, WordBoundary]);
        assert!(matches!(result, Err(ZhsegError::LengthMismatch(_))));
        assert_eq!(0, p.total_step());
    }

    #[test]
    fn test_update_sequence_empty() {
        let mut p = Perceptron::new(15);
        assert_eq!(0, p.update_sequence(&[], &[]).unwrap());
        assert_eq!(0, p.total_step());
    }

    #[test]
    fn test_deterministic() {
        let pairs = [pair(1), pair(3), pair(5), pair(1)];
        let golds = [WordBoundary, NotWordBoundary, WordBoundary, NotWordBoundary];
        let run = || {
            let mut p = Perceptron::new(20);
            for _ in 0..5 {
                p.update_sequence(&pairs, &golds).unwrap();
            }
            p.weights().to_vec()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_into_model_average() {
        let mut p = Perceptron::new(15);
        p.update(&pair(1), WordBoundary);
        p.update(&pair(1), WordBoundary);
        p.update(&pair(1), WordBoundary);
        p.update(&pair(1), WordBoundary);

        let instant = p.clone().into_model(false);
        assert_eq!(1.0, instant.weights[8]);

        // The weight is 1 after each of the 4 steps.
        let averaged = p.into_model(true);
        assert_eq!(1.0, averaged.weights[8]);
        assert_eq!(-1.0, averaged.weights[1]);
        assert!(averaged.transitions.is_none());
    }

    #[test]
    fn test_into_model_average_after_idle_steps() {
        let mut p = Perceptron::new(15);
        p.update(&pair(1), NotWordBoundary);
        for _ in 0..3 {
            assert!(!p.update(&pair(1), NotWordBoundary));
        }
        p.update(&pair(1), WordBoundary);
        p.update(&pair(1), WordBoundary);
        // Weight 1 takes the values 1, 1, 1, 1, 0, -1.
        let model = p.into_model(true);
        assert_eq!(0.5, model.weights[1]);
    }

    #[test]
    fn test_from_model() {
        let mut p = Perceptron::new(15);
        p.update(&pair(1), NotWordBoundary);
        let model = p.clone().into_model(false);
        let restored = Perceptron::from_model(model).unwrap();
        assert_eq!(p.weights(), restored.weights());
        assert_eq!(p.predict(&pair(1)), restored.predict(&pair(1)));
    }

    #[test]
    fn test_from_structured_model() {
        let model = Model {
            weights: vec![0.0; 3],
            transitions: Some([[0.0; 2]; 2]),
        };
        assert!(Perceptron::from_model(model).is_err());
    }
}
