//! The feature pipeline: from the two raw sources to a training matrix.
//!
//! Steps run in a fixed order:
//!
//! 1. Join exercise and calorie tables on the identifier; drop the identifier.
//! 2. Derive `BMI` from `Height` and `Weight`.
//! 3. Encode `Gender` as male → 1, female → 0.
//! 4. One-hot encode every remaining categorical column except the target,
//!    dropping the first level.
//! 5. Split the target column off the features.
//!
//! Encoding runs after derivation so derived columns are never categorical
//! leftovers, and the target is excluded before encoding so it can never leak
//! into the feature schema.

use crate::dataset::Table;
use crate::preprocessing::encoding::{BinaryEncoder, OneHotEncoder};
use crate::preprocessing::error::PipelineError;
use crate::preprocessing::feature_engineering::BmiDeriver;
use crate::preprocessing::join::{join_on, JoinPolicy};
use crate::preprocessing::schema::{ColumnSchema, FeatureVector, RawSingleInput};
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

/// Settings of the feature pipeline.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Column both sources are joined on; removed after the join.
    pub id_column: String,
    /// Column predicted by the model; never part of the features.
    pub target_column: String,
    pub join_policy: JoinPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            id_column: "User_ID".to_string(),
            target_column: "Calories".to_string(),
            join_policy: JoinPolicy::Inner,
        }
    }
}

/// Output of [`FeaturePipeline::prepare`].
///
/// Immutable once built; share it behind an `Arc` rather than rebuilding it.
#[derive(Clone, Debug)]
pub struct PreparedDataset {
    table: Table,
    features: Array2<f64>,
    target: Array1<f64>,
    schema: ColumnSchema,
    target_column: String,
}

impl PreparedDataset {
    /// Encoded table, target column included.
    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Feature matrix of shape `(n_samples, schema.len())`.
    pub fn features(&self) -> ArrayView2<'_, f64> {
        self.features.view()
    }

    pub fn target(&self) -> ArrayView1<'_, f64> {
        self.target.view()
    }

    pub fn schema(&self) -> &ColumnSchema {
        &self.schema
    }

    pub fn target_column(&self) -> &str {
        &self.target_column
    }

    pub fn n_samples(&self) -> usize {
        self.features.nrows()
    }

    /// Aligns a hand-entered input to this dataset's schema.
    pub fn inference_vector(&self, raw: &RawSingleInput) -> Result<FeatureVector, PipelineError> {
        build_inference_vector(raw, &self.schema)
    }

    /// `(FeatureMatrix, TargetVector, ColumnSchema)`.
    pub fn into_parts(self) -> (Array2<f64>, Array1<f64>, ColumnSchema) {
        (self.features, self.target, self.schema)
    }
}

/// Turns the exercise and calorie tables into a numeric training matrix.
///
/// # Example
/// ```rust
/// use fitness_tracker::dataset::Table;
/// use fitness_tracker::preprocessing::FeaturePipeline;
///
/// let exercise = Table::from_reader(
///     "User_ID,Gender,Age,Height,Weight,Duration,Heart_Rate,Body_Temp\n\
///      1,male,30,180,72,20,110,40\n"
///         .as_bytes(),
/// )
/// .unwrap();
/// let calories = Table::from_reader("User_ID,Calories\n1,150\n".as_bytes()).unwrap();
///
/// let prepared = FeaturePipeline::default().prepare(&exercise, &calories).unwrap();
/// assert_eq!(prepared.n_samples(), 1);
/// assert!(prepared.schema().contains("BMI"));
/// assert!(!prepared.schema().contains("Calories"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct FeaturePipeline {
    config: PipelineConfig,
}

impl FeaturePipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn with_join_policy(mut self, policy: JoinPolicy) -> Self {
        self.config.join_policy = policy;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Runs every step and returns the prepared dataset.
    ///
    /// Deterministic: the same inputs always give the same matrix, target and
    /// schema.
    ///
    /// # Errors
    /// - [`PipelineError::Dataset`] if a required column is missing or has the
    ///   wrong type (`Height`, `Weight` and the target must be numeric).
    /// - [`PipelineError::JoinMismatch`] on duplicated identifiers, or on
    ///   unmatched ones under [`JoinPolicy::Strict`].
    /// - [`PipelineError::UnknownCategory`] on a `Gender` other than
    ///   `male`/`female`.
    /// - [`PipelineError::EmptyData`] if no row survives the join.
    /// - [`PipelineError::SchemaMismatch`] if no feature column remains.
    pub fn prepare(
        &self,
        exercise: &Table,
        calories: &Table,
    ) -> Result<PreparedDataset, PipelineError> {
        let id = self.config.id_column.as_str();
        let target = self.config.target_column.as_str();

        calories.require(target)?;
        let mut table = join_on(exercise, calories, id, self.config.join_policy)?;
        table.remove(id)?;
        if table.is_empty() {
            return Err(PipelineError::EmptyData(format!(
                "no {} value is present in both sources",
                id
            )));
        }
        log::debug!("Joined {} rows on {}", table.n_rows(), id);

        let table = apply(&BmiDeriver::new(), &table)?;
        let table = apply(&BinaryEncoder::gender(), &table)?;
        let one_hot = OneHotEncoder::new()
            .with_drop_first(true)
            .exclude(target)
            .fit(&table)?;
        log::debug!("One-hot indicator columns: {:?}", one_hot.output_columns());
        let table = one_hot.transform(&table)?;

        let target_values = Array1::from(table.numeric(target)?.to_vec());

        let mut names = Vec::with_capacity(table.n_cols());
        let mut columns = Vec::with_capacity(table.n_cols());
        for column in table.columns().iter().filter(|c| c.name() != target) {
            names.push(column.name().to_string());
            columns.push(table.numeric(column.name())?);
        }
        let schema = ColumnSchema::new(names)?;

        let features = Array2::from_shape_fn((table.n_rows(), columns.len()), |(i, j)| {
            columns[j][i]
        });

        log::info!(
            "Prepared {} samples with {} features: {:?}",
            features.nrows(),
            schema.len(),
            schema.columns()
        );

        Ok(PreparedDataset {
            table,
            features,
            target: target_values,
            schema,
            target_column: target.to_string(),
        })
    }
}

fn apply<T: FittedTransformer>(step: &T, table: &Table) -> Result<Table, PipelineError> {
    log::trace!("Applying {}", step.name());
    step.transform(table)
}

/// Joins, derives and encodes the two sources with the default settings.
///
/// Returns `(FeatureMatrix, TargetVector, ColumnSchema)`. Use
/// [`FeaturePipeline`] directly to keep the encoded table or to change the
/// join policy.
pub fn load_and_prepare(
    exercise: &Table,
    calories: &Table,
) -> Result<(Array2<f64>, Array1<f64>, ColumnSchema), PipelineError> {
    Ok(FeaturePipeline::default()
        .prepare(exercise, calories)?
        .into_parts())
}

/// Aligns a hand-entered input to a training schema.
///
/// Fields are supplied under their training names (`Heart_Rate`, `Body_Temp`,
/// ...). Schema columns the input lacks are zero, input fields the schema
/// lacks are dropped, and the output order is the schema order.
///
/// # Errors
/// [`PipelineError::SchemaMismatch`] if the schema is empty or malformed.
pub fn build_inference_vector(
    raw: &RawSingleInput,
    schema: &ColumnSchema,
) -> Result<FeatureVector, PipelineError> {
    schema.reindex(raw.fields())
}
