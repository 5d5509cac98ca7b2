//! A prepared dataset and its fitted model, built once and shared.

use crate::config::AppConfig;
use crate::dataset::Table;
use crate::error::Result;
use crate::insights::Prediction;
use crate::model::{FittedRandomForest, Metrics, Predictor, RandomForestRegressor, RegressionMetrics, Regressor};
use crate::preprocessing::{build_inference_vector, FeaturePipeline, PreparedDataset, RawSingleInput};
use std::sync::Arc;

/// The dataset and model behind every view.
///
/// Both are immutable and reference counted, so cloning a session is cheap
/// and clones can be handed to concurrent callers. Predictions reuse the
/// cached model; nothing is refitted after [`Session::initialize`].
#[derive(Clone, Debug)]
pub struct Session {
    dataset: Arc<PreparedDataset>,
    model: Arc<FittedRandomForest>,
}

impl Session {
    /// Loads both source files, prepares the features and fits the forest.
    pub fn initialize(config: &AppConfig) -> Result<Self> {
        log::info!(
            "Loading {} and {}",
            config.data.exercise_path.display(),
            config.data.calories_path.display()
        );
        let exercise = Table::from_path(&config.data.exercise_path)?;
        let calories = Table::from_path(&config.data.calories_path)?;
        Self::from_tables(config, &exercise, &calories)
    }

    /// Same as [`Session::initialize`] for tables already in memory.
    pub fn from_tables(config: &AppConfig, exercise: &Table, calories: &Table) -> Result<Self> {
        let dataset = FeaturePipeline::new(config.pipeline.clone()).prepare(exercise, calories)?;
        let model = RandomForestRegressor::from_config(config.forest.clone())
            .fit(dataset.features(), dataset.target())?;

        Ok(Self {
            dataset: Arc::new(dataset),
            model: Arc::new(model),
        })
    }

    pub fn dataset(&self) -> &PreparedDataset {
        &self.dataset
    }

    pub fn model(&self) -> &FittedRandomForest {
        &self.model
    }

    /// Calorie estimate for one hand-entered input.
    pub fn predict(&self, raw: &RawSingleInput) -> Result<Prediction> {
        let vector = build_inference_vector(raw, self.dataset.schema())?;
        let kilocalories = self.model.predict(vector.values())?;
        log::debug!("Predicted {:.2} for {:?}", kilocalories, raw);
        Ok(Prediction { kilocalories })
    }

    /// Fit quality of the cached model on its own training data.
    pub fn training_metrics(&self) -> Result<RegressionMetrics> {
        let predictions = self.model.predict_batch(self.dataset.features())?;
        Ok(Metrics::calculate_all(self.dataset.target(), predictions.view())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{RawCalorieRecord, RawExerciseRecord};
    use crate::preprocessing::Gender;

    // Duration is the only column that varies, so the zero-filled Height and
    // Weight of an inference vector cannot steer the trees.
    fn tables() -> (Table, Table) {
        let exercise: Vec<RawExerciseRecord> = (0..30u64)
            .map(|i| RawExerciseRecord {
                user_id: 1000 + i,
                gender: "male".to_string(),
                age: 30,
                height: 175.0,
                weight: 70.0,
                duration: 5.0 + (i % 25) as f64,
                heart_rate: 95,
                body_temp: 39.0,
            })
            .collect();
        let calories: Vec<RawCalorieRecord> = exercise
            .iter()
            .map(|r| RawCalorieRecord {
                user_id: r.user_id,
                calories: 6.0 * r.duration,
            })
            .collect();
        (
            Table::from(exercise.as_slice()),
            Table::from(calories.as_slice()),
        )
    }

    fn config() -> AppConfig {
        let mut config = AppConfig::default();
        config.forest.n_estimators = 25;
        config
    }

    fn input(duration: f64) -> RawSingleInput {
        RawSingleInput {
            age: 30.0,
            bmi: 22.0,
            duration,
            heart_rate: 95.0,
            body_temp: 39.0,
            gender: Gender::Male,
        }
    }

    #[test]
    fn test_from_tables_builds_dataset_and_model() {
        let (exercise, calories) = tables();
        let session = Session::from_tables(&config(), &exercise, &calories).unwrap();

        assert_eq!(session.dataset().n_samples(), 30);
        assert_eq!(session.model().n_estimators(), 25);
        assert_eq!(session.model().n_features_in(), session.dataset().schema().len());
    }

    #[test]
    fn test_predict_tracks_duration() {
        let (exercise, calories) = tables();
        let session = Session::from_tables(&config(), &exercise, &calories).unwrap();

        let short = session.predict(&input(5.0)).unwrap();
        let long = session.predict(&input(29.0)).unwrap();
        assert!(short.kilocalories < long.kilocalories);
        assert!(long.to_string().ends_with(" kilocalories"));
    }

    #[test]
    fn test_predict_returns_training_leaf_value() {
        let (exercise, calories) = tables();
        let mut config = config();
        config.forest.n_estimators = 1;
        config.forest.bootstrap = false;
        config.forest.max_depth = None;
        let session = Session::from_tables(&config, &exercise, &calories).unwrap();

        let vector = session.dataset().inference_vector(&input(12.0)).unwrap();
        assert_eq!(vector.get("Height"), Some(0.0));
        assert_eq!(vector.get("Duration"), Some(12.0));

        let prediction = session.predict(&input(12.0)).unwrap();
        assert!((prediction.kilocalories - 72.0).abs() < 1e-9);
        assert_eq!(prediction.to_string(), "72.00 kilocalories");
    }

    #[test]
    fn test_predictions_are_repeatable_across_clones() {
        let (exercise, calories) = tables();
        let session = Session::from_tables(&config(), &exercise, &calories).unwrap();
        let clone = session.clone();

        assert_eq!(
            session.predict(&input(12.0)).unwrap(),
            clone.predict(&input(12.0)).unwrap()
        );
        assert!(Arc::ptr_eq(&session.model, &clone.model));
    }

    #[test]
    fn test_training_metrics() {
        let (exercise, calories) = tables();
        let session = Session::from_tables(&config(), &exercise, &calories).unwrap();
        let metrics = session.training_metrics().unwrap();
        assert!(metrics.r_squared > 0.8, "{}", metrics);
    }

    #[test]
    fn test_invalid_forest_config_is_reported() {
        let (exercise, calories) = tables();
        let mut config = config();
        config.forest.n_estimators = 0;
        assert!(matches!(
            Session::from_tables(&config, &exercise, &calories),
            Err(crate::error::Error::Model(_))
        ));
    }

    #[test]
    fn test_initialize_missing_file() {
        let mut config = config();
        config.data.exercise_path = std::env::temp_dir().join("fitness-tracker-no-such-file.csv");
        assert!(matches!(
            Session::initialize(&config),
            Err(crate::error::Error::Dataset(_))
        ));
    }
}
