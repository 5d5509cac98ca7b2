//! Column schema of the training matrix and alignment of inference inputs.
//!
//! The schema is the ordered list of feature names the regressor was fitted
//! on. Every vector handed to the fitted model must have exactly these
//! columns, in exactly this order; [`ColumnSchema::reindex`] is the only way to
//! build one.

use crate::preprocessing::encoding::Gender;
use crate::preprocessing::error::PipelineError;
use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Ordered feature column names of a training matrix.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnSchema {
    columns: Vec<String>,
}

impl ColumnSchema {
    /// Builds a validated schema.
    ///
    /// # Errors
    /// [`PipelineError::SchemaMismatch`] if there are no columns, a name is
    /// empty, or a name repeats.
    pub fn new<I, S>(columns: I) -> Result<Self, PipelineError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let schema = Self {
            columns: columns.into_iter().map(Into::into).collect(),
        };
        schema.validate()?;
        Ok(schema)
    }

    /// Checks the schema is non-empty with unique, non-empty names.
    ///
    /// Schemas can also arrive through deserialization, which skips
    /// [`ColumnSchema::new`], so alignment re-checks them here.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.columns.is_empty() {
            return Err(PipelineError::SchemaMismatch(
                "schema has no columns".to_string(),
            ));
        }
        let mut seen = HashSet::with_capacity(self.columns.len());
        for (idx, name) in self.columns.iter().enumerate() {
            if name.is_empty() {
                return Err(PipelineError::SchemaMismatch(format!(
                    "column {} has an empty name",
                    idx
                )));
            }
            if !seen.insert(name.as_str()) {
                return Err(PipelineError::SchemaMismatch(format!(
                    "column {} appears more than once",
                    name
                )));
            }
        }
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Aligns named values to this schema.
    ///
    /// - A schema column with no supplied value is `0.0`.
    /// - A supplied name that is not in the schema is dropped.
    /// - The output has exactly the schema's columns, in the schema's order.
    ///
    /// When a name is supplied twice the later value wins.
    ///
    /// # Errors
    /// [`PipelineError::SchemaMismatch`] if the schema itself is invalid.
    pub fn reindex<'a, I>(&self, fields: I) -> Result<FeatureVector, PipelineError>
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        self.validate()?;

        let mut values = Array1::zeros(self.len());
        for (name, value) in fields {
            match self.position(name) {
                Some(idx) => values[idx] = value,
                None => log::trace!("Dropping field {} absent from schema", name),
            }
        }

        Ok(FeatureVector {
            schema: self.clone(),
            values,
        })
    }
}

/// A single row aligned to a [`ColumnSchema`].
#[derive(Clone, Debug, PartialEq)]
pub struct FeatureVector {
    schema: ColumnSchema,
    values: Array1<f64>,
}

impl FeatureVector {
    pub fn schema(&self) -> &ColumnSchema {
        &self.schema
    }

    pub fn columns(&self) -> &[String] {
        self.schema.columns()
    }

    pub fn values(&self) -> ArrayView1<'_, f64> {
        self.values.view()
    }

    /// Value of a named column, `None` if the column is not in the schema.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.schema.position(name).map(|idx| self.values[idx])
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Hand-entered parameters for one prediction.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawSingleInput {
    pub age: f64,
    pub bmi: f64,
    /// Minutes.
    pub duration: f64,
    /// Beats per minute.
    pub heart_rate: f64,
    /// Degrees Celsius.
    pub body_temp: f64,
    pub gender: Gender,
}

impl RawSingleInput {
    /// The input under its training-time column names.
    ///
    /// Gender is offered twice: as `Gender` for tables where it was binary
    /// encoded in place, and as `Gender_male` for tables where it went through
    /// one-hot encoding with `female` as the baseline. Whichever the schema
    /// lacks is dropped by [`ColumnSchema::reindex`].
    pub fn fields(&self) -> [(&'static str, f64); 7] {
        let gender = self.gender.encoded();
        [
            ("Age", self.age),
            ("BMI", self.bmi),
            ("Duration", self.duration),
            ("Heart_Rate", self.heart_rate),
            ("Body_Temp", self.body_temp),
            ("Gender", gender),
            ("Gender_male", gender),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> RawSingleInput {
        RawSingleInput {
            age: 30.0,
            bmi: 22.0,
            duration: 20.0,
            heart_rate: 80.0,
            body_temp: 37.0,
            gender: Gender::Male,
        }
    }

    fn training_schema() -> ColumnSchema {
        ColumnSchema::new([
            "Gender",
            "Age",
            "Height",
            "Weight",
            "Duration",
            "Heart_Rate",
            "Body_Temp",
            "BMI",
        ])
        .unwrap()
    }

    #[test]
    fn test_schema_rejects_empty() {
        let result = ColumnSchema::new(Vec::<String>::new());
        assert!(matches!(result, Err(PipelineError::SchemaMismatch(_))));
    }

    #[test]
    fn test_schema_rejects_duplicates_and_blank_names() {
        assert!(matches!(
            ColumnSchema::new(["Age", "Age"]),
            Err(PipelineError::SchemaMismatch(_))
        ));
        assert!(matches!(
            ColumnSchema::new(["Age", ""]),
            Err(PipelineError::SchemaMismatch(_))
        ));
    }

    #[test]
    fn test_deserialized_schema_is_checked_on_reindex() {
        let schema: ColumnSchema = deserialized_schema(&[]);
        let result = schema.reindex(input().fields());
        assert!(matches!(result, Err(PipelineError::SchemaMismatch(_))));
    }

    // Builds a schema the way deserialization would, bypassing `new`.
    fn deserialized_schema(columns: &[&str]) -> ColumnSchema {
        let text = format!(
            "columns = [{}]",
            columns
                .iter()
                .map(|c| format!("\"{}\"", c))
                .collect::<Vec<_>>()
                .join(", ")
        );
        #[derive(Deserialize)]
        struct Wrapper {
            columns: ColumnSchema,
        }
        toml::from_str::<Wrapper>(&text).unwrap().columns
    }

    #[test]
    fn test_reindex_columns_equal_schema() {
        let schema = training_schema();
        let vector = schema.reindex(input().fields()).unwrap();
        assert_eq!(vector.columns(), schema.columns());
        assert_eq!(vector.len(), schema.len());
    }

    #[test]
    fn test_reindex_fills_absent_columns_with_zero() {
        let vector = training_schema().reindex(input().fields()).unwrap();
        assert_eq!(vector.get("Height"), Some(0.0));
        assert_eq!(vector.get("Weight"), Some(0.0));
        assert_eq!(vector.get("Gender"), Some(1.0));
        assert_eq!(vector.get("Heart_Rate"), Some(80.0));
    }

    #[test]
    fn test_reindex_drops_fields_absent_from_schema() {
        let schema = ColumnSchema::new(["Age", "BMI"]).unwrap();
        let vector = schema.reindex(input().fields()).unwrap();
        assert_eq!(vector.columns(), &["Age".to_string(), "BMI".to_string()]);
        assert_eq!(vector.get("Duration"), None);
        assert_eq!(vector.values().to_vec(), vec![30.0, 22.0]);
    }

    #[test]
    fn test_reindex_with_gender_indicator_schema() {
        let schema =
            ColumnSchema::new(["Age", "BMI", "Duration", "Heart_Rate", "Body_Temp", "Gender_male"])
                .unwrap();
        let vector = schema.reindex(input().fields()).unwrap();

        assert_eq!(vector.columns(), schema.columns());
        assert_eq!(
            vector.values().to_vec(),
            vec![30.0, 22.0, 20.0, 80.0, 37.0, 1.0]
        );
        assert_eq!(vector.get("Heart_Rate"), Some(80.0));
    }

    #[test]
    fn test_reindex_later_value_wins() {
        let schema = ColumnSchema::new(["A"]).unwrap();
        let vector = schema.reindex([("A", 1.0), ("A", 2.0)]).unwrap();
        assert_eq!(vector.get("A"), Some(2.0));
    }

    #[test]
    fn test_female_encodes_zero() {
        let mut raw = input();
        raw.gender = Gender::Female;
        let vector = training_schema().reindex(raw.fields()).unwrap();
        assert_eq!(vector.get("Gender"), Some(0.0));
    }

    #[test]
    fn test_schema_serializes_as_plain_list() {
        #[derive(Serialize, Deserialize)]
        struct Wrapper {
            columns: ColumnSchema,
        }
        let schema = ColumnSchema::new(["Age", "BMI"]).unwrap();
        let text = toml::to_string(&Wrapper {
            columns: schema.clone(),
        })
        .unwrap();
        assert!(text.starts_with("columns = ["));

        let back: Wrapper = toml::from_str(&text).unwrap();
        assert_eq!(back.columns, schema);
    }
}
