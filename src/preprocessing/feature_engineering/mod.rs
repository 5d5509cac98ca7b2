//! Feature engineering transformers.
//!
//! This module provides transformers that derive new columns from existing ones.

mod bmi;

pub use bmi::{body_mass_index, BmiDeriver};
