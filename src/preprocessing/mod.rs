//! Feature preparation for the calorie regressor.
//!
//! This module turns the two raw sources into a numeric feature matrix and
//! keeps inference inputs aligned with it.
//!
//! # Design Philosophy
//!
//! - **Fixed order**: join, derive, encode, split the target. See [`pipeline`].
//! - **Immutable steps**: every transformer returns a new [`Table`](crate::dataset::Table).
//! - **One schema contract**: [`ColumnSchema`] records the training column order
//!   and [`ColumnSchema::reindex`] is the only way inference vectors are built.
//!
//! # Core Traits
//!
//! - [`Transformer`]: Unfitted transformer that learns from a table
//! - [`FittedTransformer`]: Transformer ready to apply
//!
//! # Available Transformers
//!
//! ## Feature engineering
//! - [`BmiDeriver`]: Body Mass Index from height and weight
//!
//! ## Encoding
//! - [`BinaryEncoder`]: Two-level categorical column to `1.0`/`0.0`
//! - [`OneHotEncoder`]: Indicator columns with optional dropped baseline
//!
//! # Example
//!
//! ```ignore
//! use fitness_tracker::preprocessing::{build_inference_vector, FeaturePipeline};
//!
//! let prepared = FeaturePipeline::default().prepare(&exercise, &calories)?;
//! let vector = build_inference_vector(&raw_input, prepared.schema())?;
//! assert_eq!(vector.columns(), prepared.schema().columns());
//! ```

pub mod encoding;
pub mod error;
pub mod feature_engineering;
pub mod join;
pub mod pipeline;
pub mod schema;
pub mod traits;

// Re-export main types
pub use encoding::{BinaryEncoder, FittedOneHotEncoder, Gender, OneHotEncoder};
pub use error::PipelineError;
pub use feature_engineering::{body_mass_index, BmiDeriver};
pub use join::{join_on, JoinPolicy};
pub use pipeline::{
    build_inference_vector, load_and_prepare, FeaturePipeline, PipelineConfig, PreparedDataset,
};
pub use schema::{ColumnSchema, FeatureVector, RawSingleInput};
pub use traits::{FittedTransformer, Transformer};
