//! One-hot encoding for categorical columns.
//!
//! Transforms every categorical column of a table into indicator (dummy)
//! columns named `<column>_<level>`.

use crate::dataset::{Column, ColumnData, Table};
use crate::preprocessing::error::PipelineError;
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use std::collections::BTreeSet;

/// One-hot encoder for categorical columns.
///
/// During fitting the encoder finds every categorical column that is not
/// excluded and learns its distinct non-empty levels in sorted order. With
/// `drop_first` the smallest level becomes the implicit baseline and gets no
/// indicator column, which keeps the indicators linearly independent.
///
/// Indicator columns are appended after all remaining columns, grouped by
/// source column in table order, then by level.
///
/// # Example
/// ```ignore
/// use fitness_tracker::preprocessing::{OneHotEncoder, Transformer};
///
/// // Intensity: ["high", "low", "mid"]
/// let encoded = OneHotEncoder::new()
///     .with_drop_first(true)
///     .fit_transform(&table)?;
///
/// // Intensity_low: [0, 1, 0]
/// // Intensity_mid: [0, 0, 1]
/// ```
#[derive(Clone, Debug, Default)]
pub struct OneHotEncoder {
    drop_first: bool,
    exclude: Vec<String>,
}

impl OneHotEncoder {
    /// Create a new OneHotEncoder keeping every level.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop the first (smallest) level of every encoded column.
    pub fn with_drop_first(mut self, drop_first: bool) -> Self {
        self.drop_first = drop_first;
        self
    }

    /// Leave the named column untouched even if it is categorical.
    pub fn exclude(mut self, column: impl Into<String>) -> Self {
        self.exclude.push(column.into());
        self
    }
}

/// Levels learned for one source column.
#[derive(Clone, Debug, PartialEq)]
struct EncodedColumn {
    name: String,
    /// Sorted levels that receive an indicator column.
    levels: Vec<String>,
    /// Level dropped as baseline, if any.
    baseline: Option<String>,
}

/// Fitted OneHotEncoder ready to transform.
#[derive(Clone, Debug)]
pub struct FittedOneHotEncoder {
    encoded: Vec<EncodedColumn>,
}

impl FittedOneHotEncoder {
    /// Names of the indicator columns this encoder appends, in order.
    pub fn output_columns(&self) -> Vec<String> {
        self.encoded
            .iter()
            .flat_map(|c| c.levels.iter().map(move |l| indicator_name(&c.name, l)))
            .collect()
    }

    /// Total number of indicator columns.
    pub fn n_features_out(&self) -> usize {
        self.encoded.iter().map(|c| c.levels.len()).sum()
    }
}

impl Transformer for OneHotEncoder {
    type Fitted = FittedOneHotEncoder;

    fn fit(&self, table: &Table) -> Result<Self::Fitted, PipelineError> {
        let mut encoded = Vec::new();

        for column in table.columns() {
            if self.exclude.iter().any(|e| e == column.name()) {
                continue;
            }
            let ColumnData::Categorical(labels) = column.data() else {
                continue;
            };

            let distinct: BTreeSet<&str> = labels
                .iter()
                .map(String::as_str)
                .filter(|l| !l.is_empty())
                .collect();
            let mut levels: Vec<String> = distinct.into_iter().map(str::to_string).collect();

            let baseline = if self.drop_first && !levels.is_empty() {
                Some(levels.remove(0))
            } else {
                None
            };

            log::debug!(
                "OneHotEncoder: {} -> {} indicator columns (baseline {:?})",
                column.name(),
                levels.len(),
                baseline
            );
            encoded.push(EncodedColumn {
                name: column.name().to_string(),
                levels,
                baseline,
            });
        }

        Ok(FittedOneHotEncoder { encoded })
    }
}

impl FittedTransformer for FittedOneHotEncoder {
    fn transform(&self, table: &Table) -> Result<Table, PipelineError> {
        let mut out = table.clone();
        let mut indicators: Vec<Column> = Vec::with_capacity(self.n_features_out());

        for column in &self.encoded {
            let labels = table.categorical(&column.name)?;

            let mut values = vec![vec![0.0f64; table.n_rows()]; column.levels.len()];
            for (row, label) in labels.iter().enumerate() {
                if label.is_empty() || column.baseline.as_deref() == Some(label.as_str()) {
                    continue;
                }
                match column.levels.iter().position(|l| l == label) {
                    Some(idx) => values[idx][row] = 1.0,
                    None => {
                        return Err(PipelineError::UnknownCategory {
                            column: column.name.clone(),
                            value: label.clone(),
                        })
                    }
                }
            }

            out.remove(&column.name)?;
            for (level, col_values) in column.levels.iter().zip(values) {
                indicators.push(Column::numeric(
                    indicator_name(&column.name, level),
                    col_values,
                ));
            }
        }

        for indicator in indicators {
            out.push(indicator)?;
        }
        Ok(out)
    }

    fn name(&self) -> &'static str {
        "OneHotEncoder"
    }
}

fn indicator_name(column: &str, level: &str) -> String {
    format!("{}_{}", column, level)
}
