//! Definition of errors.

use std::error::Error;
use std::fmt;

pub type Result<T, E = ZhsegError> = std::result::Result<T, E>;

#[derive(Debug)]
pub enum ZhsegError {
    InvalidModel(InvalidModelError),
    InvalidArgument(InvalidArgumentError),
    LengthMismatch(LengthMismatchError),
    UTF8Error(std::string::FromUtf8Error),
    DecodeError(bincode::error::DecodeError),
    EncodeError(bincode::error::EncodeError),
    IOError(std::io::Error),
}

impl ZhsegError {
    pub(crate) fn invalid_model<S>(msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidModel(InvalidModelError { msg: msg.into() })
    }

    pub(crate) fn invalid_argument<S>(arg: &'static str, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidArgument(InvalidArgumentError {
            arg,
            msg: msg.into(),
        })
    }

    pub(crate) const fn length_mismatch(features: usize, labels: usize) -> Self {
        Self::LengthMismatch(LengthMismatchError { features, labels })
    }
}

impl fmt::Display for ZhsegError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::InvalidModel(e) => e.fmt(f),
            Self::InvalidArgument(e) => e.fmt(f),
            Self::LengthMismatch(e) => e.fmt(f),
            Self::UTF8Error(e) => e.fmt(f),
            Self::DecodeError(e) => e.fmt(f),
            Self::EncodeError(e) => e.fmt(f),
            Self::IOError(e) => e.fmt(f),
        }
    }
}

impl Error for ZhsegError {}

/// Error used when the model is invalid.
#[derive(Debug)]
pub struct InvalidModelError {
    /// Error message.
    pub(crate) msg: String,
}

impl fmt::Display for InvalidModelError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidModelError: {}", self.msg)
    }
}

impl Error for InvalidModelError {}

/// Error used when the argument is invalid.
#[derive(Debug)]
pub struct InvalidArgumentError {
    /// Name of the argument.
    pub(crate) arg: &'static str,

    /// Error message.
    pub(crate) msg: String,
}

impl fmt::Display for InvalidArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidArgumentError: {}: {}", self.arg, self.msg)
    }
}

impl Error for InvalidArgumentError {}

/// Error used when a label sequence does not line up with its feature sequence.
///
/// This points at a corpus or feature extraction problem upstream. Training loops skip the
/// offending sentence.
#[derive(Debug)]
pub struct LengthMismatchError {
    /// Number of feature pairs.
    pub features: usize,

    /// Number of labels.
    pub labels: usize,
}

impl fmt::Display for LengthMismatchError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "LengthMismatchError: {} feature pairs but {} labels",
            self.features, self.labels
        )
    }
}

impl Error for LengthMismatchError {}

impl From<std::string::FromUtf8Error> for ZhsegError {
    fn from(error: std::string::FromUtf8Error) -> Self {
        Self::UTF8Error(error)
    }
}

impl From<bincode::error::DecodeError> for ZhsegError {
    fn from(error: bincode::error::DecodeError) -> Self {
        Self::DecodeError(error)
    }
}

impl From<bincode::error::EncodeError> for ZhsegError {
    fn from(error: bincode::error::EncodeError) -> Self {
        Self::EncodeError(error)
    }
}

impl From<std::io::Error> for ZhsegError {
    fn from(error: std::io::Error) -> Self {
        Self::IOError(error)
    }
}
