//! Binary encoding of two-level categorical columns.

use crate::dataset::{Column, Table};
use crate::preprocessing::error::PipelineError;
use crate::preprocessing::traits::FittedTransformer;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Biological sex as recorded in the exercise source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Literal used in the source files.
    pub fn label(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }

    /// Numeric encoding: male is `1.0`, female is `0.0`.
    pub fn encoded(self) -> f64 {
        match self {
            Gender::Male => 1.0,
            Gender::Female => 0.0,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Gender {
    type Err = PipelineError;

    /// Only the exact literals `male` and `female` are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            other => Err(PipelineError::UnknownCategory {
                column: "Gender".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

/// Replaces a categorical column by a numeric `1.0`/`0.0` column of the same
/// name, at the same position.
///
/// Any label other than the two configured ones, including an empty cell, is
/// rejected with [`PipelineError::UnknownCategory`].
///
/// # Example
/// ```ignore
/// use fitness_tracker::preprocessing::{BinaryEncoder, FittedTransformer};
///
/// let encoded = BinaryEncoder::gender().transform(&table)?;
/// assert_eq!(encoded.numeric("Gender")?, &[1.0, 0.0]);
/// ```
#[derive(Clone, Debug)]
pub struct BinaryEncoder {
    column: String,
    positive: String,
    negative: String,
}

impl BinaryEncoder {
    /// Encode `column`, mapping `positive` to `1.0` and `negative` to `0.0`.
    pub fn new(
        column: impl Into<String>,
        positive: impl Into<String>,
        negative: impl Into<String>,
    ) -> Self {
        Self {
            column: column.into(),
            positive: positive.into(),
            negative: negative.into(),
        }
    }

    /// The `Gender` column: male → 1, female → 0.
    pub fn gender() -> Self {
        Self::new("Gender", Gender::Male.label(), Gender::Female.label())
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    fn encode(&self, label: &str) -> Result<f64, PipelineError> {
        if label == self.positive {
            Ok(1.0)
        } else if label == self.negative {
            Ok(0.0)
        } else {
            Err(PipelineError::UnknownCategory {
                column: self.column.clone(),
                value: label.to_string(),
            })
        }
    }
}

impl FittedTransformer for BinaryEncoder {
    fn transform(&self, table: &Table) -> Result<Table, PipelineError> {
        let encoded = table
            .categorical(&self.column)?
            .iter()
            .map(|label| self.encode(label))
            .collect::<Result<Vec<f64>, _>>()?;

        let mut out = table.clone();
        out.replace(Column::numeric(self.column.clone(), encoded))?;
        Ok(out)
    }

    fn name(&self) -> &'static str {
        "BinaryEncoder"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(labels: &[&str]) -> Table {
        Table::from_columns(vec![
            Column::numeric("Age", vec![30.0; labels.len()]),
            Column::categorical("Gender", labels.iter().map(|s| s.to_string()).collect()),
            Column::numeric("Height", vec![180.0; labels.len()]),
        ])
        .unwrap()
    }

    #[test]
    fn test_gender_maps_to_zero_or_one() {
        let out = BinaryEncoder::gender()
            .transform(&table(&["male", "female", "female", "male"]))
            .unwrap();
        let values = out.numeric("Gender").unwrap();
        assert_eq!(values, &[1.0, 0.0, 0.0, 1.0]);
        assert!(values.iter().all(|&v| v == 0.0 || v == 1.0));
    }

    #[test]
    fn test_column_position_preserved() {
        let out = BinaryEncoder::gender().transform(&table(&["male"])).unwrap();
        assert_eq!(out.column_names(), vec!["Age", "Gender", "Height"]);
    }

    #[test]
    fn test_unknown_gender_rejected() {
        let result = BinaryEncoder::gender().transform(&table(&["male", "other"]));
        match result {
            Err(PipelineError::UnknownCategory { column, value }) => {
                assert_eq!(column, "Gender");
                assert_eq!(value, "other");
            }
            other => panic!("expected UnknownCategory, got {:?}", other),
        }
    }

    #[test]
    fn test_case_sensitive_labels() {
        let result = BinaryEncoder::gender().transform(&table(&["Male"]));
        assert!(matches!(result, Err(PipelineError::UnknownCategory { .. })));
    }

    #[test]
    fn test_empty_label_rejected() {
        let result = BinaryEncoder::gender().transform(&table(&[""]));
        assert!(matches!(result, Err(PipelineError::UnknownCategory { .. })));
    }

    #[test]
    fn test_numeric_column_rejected() {
        let numeric = Table::from_columns(vec![Column::numeric("Gender", vec![1.0])]).unwrap();
        let result = BinaryEncoder::gender().transform(&numeric);
        assert!(matches!(result, Err(PipelineError::Dataset(_))));
    }

    #[test]
    fn test_gender_from_str() {
        assert_eq!("male".parse::<Gender>().unwrap(), Gender::Male);
        assert_eq!("female".parse::<Gender>().unwrap(), Gender::Female);
        assert!("x".parse::<Gender>().is_err());
        assert_eq!(Gender::Male.encoded(), 1.0);
        assert_eq!(Gender::Female.encoded(), 0.0);
        assert_eq!(Gender::Female.to_string(), "female");
    }
}
