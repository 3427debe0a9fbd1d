//! Lazily averaged weight vector.
//!
//! The average of a weight over `T` steps is the sum of its value after each step divided by
//! `T`. Instead of adding every weight to its sum at every step, each entry remembers the step up
//! to which its sum is complete and catches up only when it is about to change, or once at
//! finalization.

/// Weight vector with the bookkeeping needed to compute the time average of every entry.
#[derive(Debug, Clone, PartialEq)]
pub struct AveragedVector {
    values: Vec<f64>,
    sums: Vec<f64>,
    last_update: Vec<u64>,
}

impl AveragedVector {
    /// Creates a zero vector.
    pub fn new(dimension: usize) -> Self {
        Self::from_values(vec![0.0; dimension])
    }

    /// Creates a vector starting from the given values, with no averaging history.
    pub fn from_values(values: Vec<f64>) -> Self {
        let dimension = values.len();
        Self {
            values,
            sums: vec![0.0; dimension],
            last_update: vec![0; dimension],
        }
    }

    #[inline(always)]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    #[inline(always)]
    pub fn get(&self, index: usize) -> f64 {
        self.values[index]
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Sum of the entries at the given indices.
    #[inline(always)]
    pub fn score(&self, indices: &[usize]) -> f64 {
        indices.iter().map(|&i| self.values[i]).sum()
    }

    /// Adds `delta` to an entry during step `step + 1`.
    ///
    /// `step` is the number of steps completed before the current one. The entry's sum is first
    /// brought up to date with its old value, then the value is changed.
    #[inline(always)]
    pub fn add(&mut self, index: usize, delta: f64, step: u64) {
        self.flush(index, step);
        self.values[index] += delta;
    }

    #[inline(always)]
    fn flush(&mut self, index: usize, step: u64) {
        let elapsed = step - self.last_update[index];
        self.sums[index] += elapsed as f64 * self.values[index];
        self.last_update[index] = step;
    }

    /// Replaces every entry with its average over `total_step` steps.
    ///
    /// Nothing changes when no step has been completed.
    pub fn finalize(&mut self, total_step: u64) {
        if total_step == 0 {
            return;
        }
        for i in 0..self.values.len() {
            self.flush(i, total_step);
            self.values[i] = self.sums[i] / total_step as f64;
        }
    }

    /// Consumes the vector and returns its current values.
    pub fn into_values(self) -> Vec<f64> {
        self.values
    }
}
