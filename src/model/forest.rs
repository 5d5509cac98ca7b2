//! Bagged ensemble of regression trees.

use crate::model::tree::{DecisionTreeRegressor, FittedDecisionTree};
use crate::model::{check_training_data, check_width, ModelError, Predictor, Regressor};
use ndarray::{ArrayView1, ArrayView2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Hyperparameters of a [`RandomForestRegressor`].
///
/// Missing fields in a config file take the default values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestConfig {
    pub n_estimators: usize,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    pub max_features: Option<usize>,
    pub bootstrap: bool,
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_estimators: 500,
            max_depth: Some(6),
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
            bootstrap: true,
            seed: 42,
        }
    }
}

/// Random forest regressor: the mean of many trees, each grown on a
/// bootstrap sample of the training rows.
///
/// # Example
/// ```
/// use fitness_tracker::model::{Predictor, RandomForestRegressor, Regressor};
/// use ndarray::array;
///
/// let x = array![[1.0], [2.0], [3.0], [4.0], [5.0], [6.0]];
/// let y = array![1.0, 1.0, 1.0, 5.0, 5.0, 5.0];
///
/// let forest = RandomForestRegressor::new()
///     .with_n_estimators(20)
///     .fit(x.view(), y.view())
///     .unwrap();
/// let low = forest.predict(array![1.0].view()).unwrap();
/// let high = forest.predict(array![6.0].view()).unwrap();
/// assert!(low < high);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RandomForestRegressor {
    config: ForestConfig,
}

impl RandomForestRegressor {
    /// Create a forest with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: ForestConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ForestConfig {
        &self.config
    }

    /// Number of trees in the ensemble.
    pub fn with_n_estimators(mut self, n: usize) -> Self {
        self.config.n_estimators = n;
        self
    }

    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.config.max_depth = max_depth;
        self
    }

    pub fn with_min_samples_split(mut self, n: usize) -> Self {
        self.config.min_samples_split = n;
        self
    }

    pub fn with_min_samples_leaf(mut self, n: usize) -> Self {
        self.config.min_samples_leaf = n;
        self
    }

    pub fn with_max_features(mut self, max_features: Option<usize>) -> Self {
        self.config.max_features = max_features;
        self
    }

    /// Grow each tree on a bootstrap sample instead of the full data.
    pub fn with_bootstrap(mut self, bootstrap: bool) -> Self {
        self.config.bootstrap = bootstrap;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    fn tree(&self) -> DecisionTreeRegressor {
        DecisionTreeRegressor::new()
            .with_max_depth(self.config.max_depth)
            .with_min_samples_split(self.config.min_samples_split)
            .with_min_samples_leaf(self.config.min_samples_leaf)
            .with_max_features(self.config.max_features)
    }
}

impl Regressor for RandomForestRegressor {
    type Fitted = FittedRandomForest;

    fn fit(
        &self,
        x: ArrayView2<'_, f64>,
        y: ArrayView1<'_, f64>,
    ) -> Result<Self::Fitted, ModelError> {
        if self.config.n_estimators == 0 {
            return Err(ModelError::InvalidParameter(
                "n_estimators must be at least 1".to_string(),
            ));
        }
        let tree = self.tree();
        tree.validate()?;
        check_training_data(&x, &y)?;

        let start = Instant::now();
        let n = x.nrows();
        let mut rng = StdRng::seed_from_u64(self.config.seed);

        let mut trees = Vec::with_capacity(self.config.n_estimators);
        for _ in 0..self.config.n_estimators {
            let rows: Vec<usize> = if self.config.bootstrap {
                (0..n).map(|_| rng.gen_range(0..n)).collect()
            } else {
                (0..n).collect()
            };
            trees.push(tree.fit_rows(x, y, rows, &mut rng));
        }

        log::info!(
            "Fitted {} trees on {} samples x {} features in {:.2?}",
            trees.len(),
            n,
            x.ncols(),
            start.elapsed()
        );
        log::debug!(
            "Deepest tree: {}",
            trees.iter().map(FittedDecisionTree::depth).max().unwrap_or(0)
        );

        Ok(FittedRandomForest {
            trees,
            n_features: x.ncols(),
        })
    }
}

/// Fitted random forest.
#[derive(Clone, Debug, PartialEq)]
pub struct FittedRandomForest {
    trees: Vec<FittedDecisionTree>,
    n_features: usize,
}

impl FittedRandomForest {
    pub fn n_estimators(&self) -> usize {
        self.trees.len()
    }

    pub fn trees(&self) -> &[FittedDecisionTree] {
        &self.trees
    }
}

impl Predictor for FittedRandomForest {
    fn n_features_in(&self) -> usize {
        self.n_features
    }

    fn predict(&self, x: ArrayView1<'_, f64>) -> Result<f64, ModelError> {
        check_width(self.n_features, &x)?;
        let total: f64 = self.trees.iter().map(|t| t.evaluate(&x)).sum();
        Ok(total / self.trees.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array1, Array2};

    fn linear_data() -> (Array2<f64>, Array1<f64>) {
        let x = Array2::from_shape_fn((40, 2), |(i, j)| if j == 0 { i as f64 } else { (i % 3) as f64 });
        let y = Array1::from_shape_fn(40, |i| 2.0 * i as f64 + 1.0);
        (x, y)
    }

    #[test]
    fn test_default_config() {
        let config = ForestConfig::default();
        assert_eq!(config.n_estimators, 500);
        assert_eq!(config.max_depth, Some(6));
        assert_eq!(config.max_features, None);
        assert!(config.bootstrap);
        assert_eq!(config.seed, 42);
    }

    #[test]
    fn test_deterministic_for_seed() {
        let (x, y) = linear_data();
        let model = RandomForestRegressor::new().with_n_estimators(10).with_seed(3);
        let a = model.fit(x.view(), y.view()).unwrap();
        let b = model.fit(x.view(), y.view()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.n_estimators(), 10);
    }

    #[test]
    fn test_without_bootstrap_trees_are_identical() {
        let (x, y) = linear_data();
        let forest = RandomForestRegressor::new()
            .with_n_estimators(3)
            .with_bootstrap(false)
            .fit(x.view(), y.view())
            .unwrap();
        assert_eq!(forest.trees()[0], forest.trees()[1]);

        let single = DecisionTreeRegressor::new()
            .with_max_depth(Some(6))
            .fit(x.view(), y.view())
            .unwrap();
        let row = x.row(17);
        assert!((forest.predict(row).unwrap() - single.predict(row).unwrap()).abs() < 1e-9);
    }

    #[test]
    fn test_fits_training_data_closely() {
        let (x, y) = linear_data();
        let forest = RandomForestRegressor::new()
            .with_n_estimators(50)
            .fit(x.view(), y.view())
            .unwrap();
        let predictions = forest.predict_batch(x.view()).unwrap();
        let r2 = crate::model::Metrics::r_squared(y.view(), predictions.view()).unwrap();
        assert!(r2 > 0.9, "r2 = {}", r2);
    }

    #[test]
    fn test_prediction_within_target_range() {
        let (x, y) = linear_data();
        let forest = RandomForestRegressor::new()
            .with_n_estimators(10)
            .fit(x.view(), y.view())
            .unwrap();
        let p = forest.predict(array![1000.0, 0.0].view()).unwrap();
        assert!((1.0..=79.0).contains(&p));
    }

    #[test]
    fn test_zero_estimators_rejected() {
        let (x, y) = linear_data();
        let result = RandomForestRegressor::new()
            .with_n_estimators(0)
            .fit(x.view(), y.view());
        assert!(matches!(result, Err(ModelError::InvalidParameter(_))));
    }

    #[test]
    fn test_feature_mismatch() {
        let (x, y) = linear_data();
        let forest = RandomForestRegressor::new()
            .with_n_estimators(2)
            .fit(x.view(), y.view())
            .unwrap();
        assert!(matches!(
            forest.predict(array![1.0, 2.0, 3.0].view()),
            Err(ModelError::FeatureMismatch {
                expected: 2,
                got: 3
            })
        ));
    }

    #[test]
    fn test_empty_data_rejected() {
        let x = Array2::<f64>::zeros((0, 2));
        let y = Array1::<f64>::zeros(0);
        let result = RandomForestRegressor::new().fit(x.view(), y.view());
        assert!(matches!(result, Err(ModelError::EmptyData(_))));
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: ForestConfig = toml::from_str("n_estimators = 25").unwrap();
        assert_eq!(config.n_estimators, 25);
        assert_eq!(config.max_depth, Some(6));
        assert_eq!(config.seed, 42);
    }
}
