use std::io::{Read, Write};

use bincode::{Decode, Encode};

use crate::errors::{Result, ZhsegError};

const MODEL_MAGIC: &[u8] = b"ZhsegModel 0.1\n";

/// Model data.
///
/// A pointwise model holds one weight per vocabulary entry. A structured model additionally
/// holds the transition scores between labels, indexed by `[prev][curr]`.
#[derive(Debug, Clone, PartialEq, Decode, Encode)]
pub struct Model {
    pub(crate) weights: Vec<f64>,
    pub(crate) transitions: Option<[[f64; 2]; 2]>,
}

impl Model {
    /// Creates a pointwise model from raw weights.
    pub const fn pointwise(weights: Vec<f64>) -> Self {
        Self {
            weights,
            transitions: None,
        }
    }

    /// Creates a structured model from raw weights and transition scores.
    pub const fn structured(weights: Vec<f64>, transitions: [[f64; 2]; 2]) -> Self {
        Self {
            weights,
            transitions: Some(transitions),
        }
    }

    /// Number of weights. This must equal the size of the vocabulary the model was trained
    /// with.
    pub fn dimension(&self) -> usize {
        self.weights.len()
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub const fn transitions(&self) -> Option<&[[f64; 2]; 2]> {
        self.transitions.as_ref()
    }

    pub const fn is_structured(&self) -> bool {
        self.transitions.is_some()
    }

    /// Exports the model data.
    ///
    /// The output is a magic line followed by the bincode encoding of the weights and the
    /// optional transition matrix. Arrays are length prefixed.
    ///
    /// # Arguments
    ///
    /// * `wtr` - Byte-oriented sink object.
    ///
    /// # Errors
    ///
    /// When `wtr` generates an error, it will be returned as is.
    pub fn write<W>(&self, mut wtr: W) -> Result<()>
    where
        W: Write,
    {
        wtr.write_all(MODEL_MAGIC)?;
        bincode::encode_into_std_write(self, &mut wtr, bincode::config::standard())?;
        Ok(())
    }

    /// Creates a model from a reader.
    ///
    /// # Arguments
    ///
    /// * `rdr` - A data source.
    ///
    /// # Returns
    ///
    /// A model data read from `rdr`.
    ///
    /// # Errors
    ///
    /// When `rdr` generates an error, it will be returned as is. If the magic line does not
    /// match or the data is truncated, an error variant is returned.
    pub fn read<R>(mut rdr: R) -> Result<Self>
    where
        R: Read,
    {
        let mut magic = [0; MODEL_MAGIC.len()];
        rdr.read_exact(&mut magic)?;
        if magic.as_slice() != MODEL_MAGIC {
            return Err(ZhsegError::invalid_model(
                "model version mismatch or not a zhseg model",
            ));
        }
        let model: Self = bincode::decode_from_std_read(&mut rdr, bincode::config::standard())?;
        Ok(model)
    }
}
