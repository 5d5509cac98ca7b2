//! CART regression tree.
//!
//! Splits minimize the summed squared error of the two children, which for a
//! fixed node is the same as maximizing `S_l²/n_l + S_r²/n_r` where `S` is the
//! sum of targets on each side. Thresholds sit halfway between adjacent
//! distinct feature values and samples with `x <= threshold` go left.

use crate::model::{check_training_data, check_width, ModelError, Predictor, Regressor};
use ndarray::{ArrayView1, ArrayView2};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

const MIN_GAIN: f64 = 1e-12;

/// Unfitted regression tree.
///
/// # Example
/// ```
/// use fitness_tracker::model::{DecisionTreeRegressor, Predictor, Regressor};
/// use ndarray::array;
///
/// let x = array![[1.0], [2.0], [3.0], [4.0]];
/// let y = array![10.0, 10.0, 20.0, 20.0];
///
/// let tree = DecisionTreeRegressor::new().fit(x.view(), y.view()).unwrap();
/// assert_eq!(tree.predict(array![1.5].view()).unwrap(), 10.0);
/// assert_eq!(tree.predict(array![3.5].view()).unwrap(), 20.0);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DecisionTreeRegressor {
    max_depth: Option<usize>,
    min_samples_split: usize,
    min_samples_leaf: usize,
    max_features: Option<usize>,
    seed: u64,
}

impl Default for DecisionTreeRegressor {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
            seed: 0,
        }
    }
}

impl DecisionTreeRegressor {
    /// Create a tree that grows until leaves are pure.
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit the depth of the tree. `None` means unlimited.
    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Minimum number of samples a node needs to be split.
    pub fn with_min_samples_split(mut self, n: usize) -> Self {
        self.min_samples_split = n;
        self
    }

    /// Minimum number of samples in each child of a split.
    pub fn with_min_samples_leaf(mut self, n: usize) -> Self {
        self.min_samples_leaf = n;
        self
    }

    /// Number of features drawn at random as split candidates at each node.
    /// `None` considers every feature.
    pub fn with_max_features(mut self, max_features: Option<usize>) -> Self {
        self.max_features = max_features;
        self
    }

    /// Seed for the feature sampling of `max_features`.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub(crate) fn validate(&self) -> Result<(), ModelError> {
        if self.max_depth == Some(0) {
            return Err(ModelError::InvalidParameter(
                "max_depth must be at least 1".to_string(),
            ));
        }
        if self.min_samples_split < 2 {
            return Err(ModelError::InvalidParameter(format!(
                "min_samples_split must be at least 2, got {}",
                self.min_samples_split
            )));
        }
        if self.min_samples_leaf == 0 {
            return Err(ModelError::InvalidParameter(
                "min_samples_leaf must be at least 1".to_string(),
            ));
        }
        if self.max_features == Some(0) {
            return Err(ModelError::InvalidParameter(
                "max_features must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Grows a tree on the given sample rows, which may repeat.
    ///
    /// Callers must have validated the data and the hyperparameters.
    pub(crate) fn fit_rows(
        &self,
        x: ArrayView2<'_, f64>,
        y: ArrayView1<'_, f64>,
        mut rows: Vec<usize>,
        rng: &mut StdRng,
    ) -> FittedDecisionTree {
        let mut builder = TreeBuilder {
            params: self,
            x: x.view(),
            y: y.view(),
            nodes: Vec::new(),
            depth: 0,
            rng,
        };
        builder.grow(&mut rows, 0);

        FittedDecisionTree {
            n_features: x.ncols(),
            depth: builder.depth,
            nodes: builder.nodes,
        }
    }
}

impl Regressor for DecisionTreeRegressor {
    type Fitted = FittedDecisionTree;

    fn fit(
        &self,
        x: ArrayView2<'_, f64>,
        y: ArrayView1<'_, f64>,
    ) -> Result<Self::Fitted, ModelError> {
        self.validate()?;
        check_training_data(&x, &y)?;

        let mut rng = StdRng::seed_from_u64(self.seed);
        let rows = (0..x.nrows()).collect();
        Ok(self.fit_rows(x, y, rows, &mut rng))
    }
}

#[derive(Clone, Debug, PartialEq)]
enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// Fitted regression tree stored as a flat node arena rooted at index 0.
#[derive(Clone, Debug, PartialEq)]
pub struct FittedDecisionTree {
    nodes: Vec<Node>,
    n_features: usize,
    depth: usize,
}

impl FittedDecisionTree {
    /// Length of the longest root-to-leaf path; a single leaf has depth 0.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn n_leaves(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, Node::Leaf { .. }))
            .count()
    }

    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn evaluate(&self, x: &ArrayView1<'_, f64>) -> f64 {
        let mut idx = 0;
        loop {
            match self.nodes[idx] {
                Node::Leaf { value } => return value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => idx = if x[feature] <= threshold { left } else { right },
            }
        }
    }
}

impl Predictor for FittedDecisionTree {
    fn n_features_in(&self) -> usize {
        self.n_features
    }

    fn predict(&self, x: ArrayView1<'_, f64>) -> Result<f64, ModelError> {
        check_width(self.n_features, &x)?;
        Ok(self.evaluate(&x))
    }
}

struct BestSplit {
    feature: usize,
    threshold: f64,
    score: f64,
}

struct TreeBuilder<'a, 'd> {
    params: &'a DecisionTreeRegressor,
    x: ArrayView2<'d, f64>,
    y: ArrayView1<'d, f64>,
    nodes: Vec<Node>,
    depth: usize,
    rng: &'a mut StdRng,
}

impl TreeBuilder<'_, '_> {
    fn grow(&mut self, rows: &mut [usize], depth: usize) -> usize {
        self.depth = self.depth.max(depth);
        let idx = self.nodes.len();
        let sum: f64 = rows.iter().map(|&r| self.y[r]).sum();
        self.nodes.push(Node::Leaf {
            value: sum / rows.len() as f64,
        });

        let depth_reached = self.params.max_depth.is_some_and(|max| depth >= max);
        if depth_reached || rows.len() < self.params.min_samples_split {
            return idx;
        }

        let Some(best) = self.best_split(rows, sum) else {
            return idx;
        };

        let n_left = partition(rows, |r| self.x[[r, best.feature]] <= best.threshold);
        let (left_rows, right_rows) = rows.split_at_mut(n_left);
        let left = self.grow(left_rows, depth + 1);
        let right = self.grow(right_rows, depth + 1);

        self.nodes[idx] = Node::Split {
            feature: best.feature,
            threshold: best.threshold,
            left,
            right,
        };
        idx
    }

    fn candidate_features(&mut self) -> Vec<usize> {
        let n_features = self.x.ncols();
        match self.params.max_features {
            Some(k) if k < n_features => {
                let mut features = rand::seq::index::sample(&mut *self.rng, n_features, k).into_vec();
                features.sort_unstable();
                features
            }
            _ => (0..n_features).collect(),
        }
    }

    fn best_split(&mut self, rows: &[usize], total: f64) -> Option<BestSplit> {
        let n = rows.len();
        let min_leaf = self.params.min_samples_leaf;
        if n < 2 * min_leaf {
            return None;
        }

        let parent_score = total * total / n as f64;
        let mut best: Option<BestSplit> = None;
        let mut order = rows.to_vec();

        for feature in self.candidate_features() {
            order.sort_by(|&a, &b| self.x[[a, feature]].total_cmp(&self.x[[b, feature]]));

            let mut left_sum = 0.0;
            for i in 1..n {
                left_sum += self.y[order[i - 1]];
                if i < min_leaf || n - i < min_leaf {
                    continue;
                }

                let a = self.x[[order[i - 1], feature]];
                let b = self.x[[order[i], feature]];
                if a == b || a.is_nan() || b.is_nan() {
                    continue;
                }

                let right_sum = total - left_sum;
                let score = left_sum * left_sum / i as f64
                    + right_sum * right_sum / (n - i) as f64;
                if score - parent_score <= MIN_GAIN {
                    continue;
                }
                if best.as_ref().is_some_and(|current| score <= current.score) {
                    continue;
                }

                // An infinite neighbour makes the midpoint non-finite
                let mut threshold = a + (b - a) / 2.0;
                if !threshold.is_finite() || threshold >= b {
                    threshold = a;
                }
                best = Some(BestSplit {
                    feature,
                    threshold,
                    score,
                });
            }
        }

        best
    }
}

/// Moves the rows matching `pred` to the front and returns their count.
fn partition(rows: &mut [usize], pred: impl Fn(usize) -> bool) -> usize {
    let mut split = 0;
    for j in 0..rows.len() {
        if pred(rows[j]) {
            rows.swap(split, j);
            split += 1;
        }
    }
    split
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array1, Array2};

    #[test]
    fn test_fits_step_function_exactly() {
        let x = array![[1.0], [2.0], [3.0], [4.0], [5.0], [6.0]];
        let y = array![5.0, 5.0, 5.0, 9.0, 9.0, 9.0];

        let tree = DecisionTreeRegressor::new().fit(x.view(), y.view()).unwrap();

        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.n_leaves(), 2);
        assert_eq!(tree.predict(array![3.0].view()).unwrap(), 5.0);
        assert_eq!(tree.predict(array![3.4].view()).unwrap(), 5.0);
        assert_eq!(tree.predict(array![3.6].view()).unwrap(), 9.0);
    }

    #[test]
    fn test_picks_informative_feature() {
        // Feature 0 is noise, feature 1 decides the target
        let x = array![[3.0, 0.0], [1.0, 0.0], [2.0, 1.0], [4.0, 1.0]];
        let y = array![0.0, 0.0, 10.0, 10.0];

        let tree = DecisionTreeRegressor::new().fit(x.view(), y.view()).unwrap();
        assert_eq!(tree.n_leaves(), 2);
        assert_eq!(tree.predict(array![100.0, 0.0].view()).unwrap(), 0.0);
        assert_eq!(tree.predict(array![-100.0, 1.0].view()).unwrap(), 10.0);
    }

    #[test]
    fn test_constant_target_is_single_leaf() {
        let x = array![[1.0], [2.0], [3.0]];
        let y = array![7.0, 7.0, 7.0];
        let tree = DecisionTreeRegressor::new().fit(x.view(), y.view()).unwrap();
        assert_eq!(tree.n_nodes(), 1);
        assert_eq!(tree.depth(), 0);
        assert_eq!(tree.predict(array![42.0].view()).unwrap(), 7.0);
    }

    #[test]
    fn test_max_depth_limits_growth() {
        let x = Array2::from_shape_fn((16, 1), |(i, _)| i as f64);
        let y = Array1::from_shape_fn(16, |i| i as f64);

        let tree = DecisionTreeRegressor::new()
            .with_max_depth(Some(2))
            .fit(x.view(), y.view())
            .unwrap();
        assert_eq!(tree.depth(), 2);
        assert!(tree.n_leaves() <= 4);

        let full = DecisionTreeRegressor::new().fit(x.view(), y.view()).unwrap();
        assert_eq!(full.n_leaves(), 16);
    }

    #[test]
    fn test_min_samples_leaf() {
        let x = array![[1.0], [2.0], [3.0], [4.0]];
        let y = array![0.0, 10.0, 10.0, 10.0];

        let tree = DecisionTreeRegressor::new()
            .with_min_samples_leaf(2)
            .fit(x.view(), y.view())
            .unwrap();
        // The pure split after the first sample is not allowed
        assert_eq!(tree.predict(array![1.0].view()).unwrap(), 5.0);
        assert_eq!(tree.predict(array![4.0].view()).unwrap(), 10.0);
    }

    #[test]
    fn test_duplicate_feature_values_never_separated() {
        let x = array![[1.0], [1.0], [2.0]];
        let y = array![0.0, 4.0, 8.0];
        let tree = DecisionTreeRegressor::new().fit(x.view(), y.view()).unwrap();
        assert_eq!(tree.predict(array![1.0].view()).unwrap(), 2.0);
        assert_eq!(tree.predict(array![2.0].view()).unwrap(), 8.0);
    }

    #[test]
    fn test_threshold_between_adjacent_floats() {
        let a = 1.0f64;
        let b = f64::from_bits(a.to_bits() + 1);
        let x = array![[a], [b]];
        let y = array![0.0, 1.0];
        let tree = DecisionTreeRegressor::new().fit(x.view(), y.view()).unwrap();
        assert_eq!(tree.predict(array![a].view()).unwrap(), 0.0);
        assert_eq!(tree.predict(array![b].view()).unwrap(), 1.0);
    }

    #[test]
    fn test_infinite_feature_values_split_cleanly() {
        let x = array![[f64::NEG_INFINITY], [1.0]];
        let y = array![0.0, 10.0];
        let tree = DecisionTreeRegressor::new().fit(x.view(), y.view()).unwrap();
        assert_eq!(tree.n_leaves(), 2);
        assert_eq!(tree.predict(array![f64::NEG_INFINITY].view()).unwrap(), 0.0);
        assert_eq!(tree.predict(array![1.0].view()).unwrap(), 10.0);

        let x = array![[f64::NEG_INFINITY], [1.0], [2.0], [f64::INFINITY]];
        let y = array![0.0, 10.0, 20.0, 30.0];
        let tree = DecisionTreeRegressor::new()
            .with_max_depth(Some(6))
            .fit(x.view(), y.view())
            .unwrap();
        assert_eq!(tree.n_leaves(), 4);
        for (row, expected) in x.rows().into_iter().zip(y.iter()) {
            let p = tree.predict(row).unwrap();
            assert!(!p.is_nan());
            assert_eq!(p, *expected);
        }
    }

    #[test]
    fn test_max_features_is_deterministic_per_seed() {
        let x = Array2::from_shape_fn((20, 3), |(i, j)| ((i * (j + 3)) % 7) as f64);
        let y = Array1::from_shape_fn(20, |i| (i % 5) as f64);

        let model = DecisionTreeRegressor::new()
            .with_max_features(Some(1))
            .with_seed(7);
        let a = model.fit(x.view(), y.view()).unwrap();
        let b = model.fit(x.view(), y.view()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_feature_mismatch() {
        let x = array![[1.0, 2.0], [2.0, 3.0]];
        let y = array![1.0, 2.0];
        let tree = DecisionTreeRegressor::new().fit(x.view(), y.view()).unwrap();
        assert!(matches!(
            tree.predict(array![1.0].view()),
            Err(ModelError::FeatureMismatch {
                expected: 2,
                got: 1
            })
        ));
    }

    #[test]
    fn test_invalid_parameters() {
        let x = array![[1.0], [2.0]];
        let y = array![1.0, 2.0];
        for model in [
            DecisionTreeRegressor::new().with_max_depth(Some(0)),
            DecisionTreeRegressor::new().with_min_samples_split(1),
            DecisionTreeRegressor::new().with_min_samples_leaf(0),
            DecisionTreeRegressor::new().with_max_features(Some(0)),
        ] {
            assert!(matches!(
                model.fit(x.view(), y.view()),
                Err(ModelError::InvalidParameter(_))
            ));
        }
    }

    #[test]
    fn test_partition() {
        let mut rows = vec![5, 2, 8, 1, 9];
        let n = partition(&mut rows, |r| r < 5);
        assert_eq!(n, 2);
        let mut left = rows[..n].to_vec();
        left.sort_unstable();
        assert_eq!(left, vec![1, 2]);
    }
}
