//! Error type shared by curve construction and the curve editing tools.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CurveError {
    #[error("curve '{curve}': key {index} has a non-finite field")]
    NonFiniteKey { curve: String, index: usize },

    #[error("curve '{curve}': key {index} at t={time} comes before the previous key at t={previous}")]
    NonMonotonicKeys {
        curve: String,
        index: usize,
        time: f64,
        previous: f64,
    },

    #[error("curve '{curve}' needs at least two keys for this operation")]
    CurveTooShort { curve: String },

    #[error("curve '{curve}': only one key is selected")]
    SingleKeySelected { curve: String },

    #[error("curve '{curve}': the selected keys are not contiguous (gap after index {after})")]
    SelectionGap { curve: String, after: usize },

    #[error("curve '{curve}': key index {index} is out of range ({len} keys)")]
    KeyIndexOutOfRange {
        curve: String,
        index: usize,
        len: usize,
    },

    #[error("curve '{curve}' is owned by analysis and cannot be edited")]
    OwnedByAnalysis { curve: String },

    #[error("invalid frame rate {0}")]
    InvalidFrameRate(f64),
}
