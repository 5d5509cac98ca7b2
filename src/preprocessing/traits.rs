//! Core traits for table transformers.
//!
//! This module defines the two central traits:
//! - [`Transformer`]: Used during fitting; has settings and learns from data.
//! - [`FittedTransformer`]: After fitting; applies the learned mapping to any table.
//!
//! Transformers that learn nothing (BMI derivation, binary encoding) implement
//! [`FittedTransformer`] directly.

use crate::dataset::Table;
use crate::preprocessing::error::PipelineError;

/// Trait for unfitted transformers.
///
/// A transformer learns parameters from a training table (for example the
/// levels of each categorical column) and produces a [`FittedTransformer`]
/// that applies exactly that mapping to later tables.
///
/// # Example
/// ```ignore
/// use fitness_tracker::preprocessing::{OneHotEncoder, Transformer, FittedTransformer};
///
/// let encoder = OneHotEncoder::new().with_drop_first(true);
/// let fitted = encoder.fit(&training_table)?;
/// let encoded = fitted.transform(&other_table)?;
/// ```
pub trait Transformer: Clone {
    /// The fitted transformer type.
    type Fitted: FittedTransformer;

    /// Learn the transformation from `table`.
    ///
    /// # Errors
    /// Returns [`PipelineError`] if the table lacks a required column or a
    /// column has the wrong type.
    fn fit(&self, table: &Table) -> Result<Self::Fitted, PipelineError>;

    /// Fit on `table` and transform it in one step.
    fn fit_transform(&self, table: &Table) -> Result<Table, PipelineError> {
        let fitted = self.fit(table)?;
        fitted.transform(table)
    }
}

/// Trait for transformers ready to apply.
///
/// `transform` never edits its input; it returns a new table.
pub trait FittedTransformer: Clone {
    /// Apply the transformation.
    ///
    /// # Errors
    /// Returns [`PipelineError`] if the table lacks a required column, a column
    /// has the wrong type, or a value cannot be mapped.
    fn transform(&self, table: &Table) -> Result<Table, PipelineError>;

    /// Short name used in log output.
    fn name(&self) -> &'static str;
}
