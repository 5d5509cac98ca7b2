//! # fitness-tracker
//!
//! Calorie-burn prediction over a fitness dataset: a deterministic feature
//! pipeline, a bagged regression-tree model and a few dataset summaries.
//!
//! ## Core Design Principles
//!
//! - **One schema contract**: the training column order is recorded once as a
//!   [`ColumnSchema`] and every inference vector is reindexed against it.
//! - **Training/Inference Separation**: estimators hold hyperparameters and only
//!   fit; fitted models hold only what prediction needs.
//! - **Fit once**: a [`Session`] caches the prepared dataset and the fitted
//!   model behind `Arc`; predictions never retrain.
//!
//! ## Quick Start
//!
//! ```rust
//! use fitness_tracker::dataset::Table;
//! use fitness_tracker::model::{Predictor, RandomForestRegressor, Regressor};
//! use fitness_tracker::preprocessing::{build_inference_vector, load_and_prepare, Gender, RawSingleInput};
//!
//! let exercise = Table::from_reader(
//!     "User_ID,Gender,Age,Height,Weight,Duration,Heart_Rate,Body_Temp\n\
//!      1,male,30,180,72,20,110,40\n\
//!      2,female,45,165,60,10,90,39\n\
//!      3,male,25,175,80,25,120,40.5\n"
//!         .as_bytes(),
//! )
//! .unwrap();
//! let calories =
//!     Table::from_reader("User_ID,Calories\n1,150\n2,45\n3,190\n".as_bytes()).unwrap();
//!
//! let (x, y, schema) = load_and_prepare(&exercise, &calories).unwrap();
//! let model = RandomForestRegressor::new()
//!     .with_n_estimators(10)
//!     .fit(x.view(), y.view())
//!     .unwrap();
//!
//! let input = RawSingleInput {
//!     age: 30.0,
//!     bmi: 22.0,
//!     duration: 20.0,
//!     heart_rate: 80.0,
//!     body_temp: 37.0,
//!     gender: Gender::Male,
//! };
//! let vector = build_inference_vector(&input, &schema).unwrap();
//! let kcal = model.predict(vector.values()).unwrap();
//! assert!((45.0..=190.0).contains(&kcal));
//! ```
//!
//! ## Module Structure
//!
//! - `dataset`: Columnar tables, CSV loading and typed raw records
//! - `preprocessing`: Join, BMI derivation, encoding and the column schema
//! - `model`: Regression trees, the random forest and fit metrics
//! - `insights`: Head, correlations, histograms and grouped means
//! - `session`: The cached dataset and model shared by every view
//! - `config`: TOML application configuration

/// Columnar tables and CSV loading.
pub mod dataset;

/// Feature pipeline transformers and the inference schema.
pub mod preprocessing;

/// Regression models with separate unfitted and fitted types.
pub mod model;

pub mod config;
pub mod error;
pub mod insights;
pub mod session;

pub use config::AppConfig;
pub use error::{Error, Result};
pub use preprocessing::{build_inference_vector, load_and_prepare, ColumnSchema, RawSingleInput};
pub use session::Session;
