//! Categorical feature encoding transformers.
//!
//! This module provides encoders for converting categorical columns to numeric
//! columns the regressor can consume.
//!
//! # Available Encoders
//!
//! ## BinaryEncoder
//! Maps a two-level categorical column to a single `1.0`/`0.0` column in place.
//!
//! ```ignore
//! // Gender: ["male", "female"]  ->  Gender: [1.0, 0.0]
//! ```
//!
//! ## OneHotEncoder
//! Replaces each categorical column by one indicator column per level,
//! optionally dropping the first level as the implicit baseline.
//!
//! ```ignore
//! // Intensity: ["high", "low", "mid"]  (drop_first)
//! // ->  Intensity_low: [0, 1, 0], Intensity_mid: [0, 0, 1]
//! ```
//!
//! # Design Notes
//!
//! Both encoders reject labels outside their vocabulary. Empty
//! cells count as missing: the one-hot encoder emits all zeros for them.

mod binary;
mod one_hot;

pub use binary::{BinaryEncoder, Gender};
pub use one_hot::{FittedOneHotEncoder, OneHotEncoder};

