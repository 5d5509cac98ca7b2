//! Summaries of the prepared dataset for the overview and statistics views.
//!
//! Everything here reads the encoded table; nothing feeds back into training.

use crate::dataset::{DatasetError, Table};
use ndarray::Array2;
use std::fmt;

/// First `n` rows of a table.
pub fn head(table: &Table, n: usize) -> Table {
    table.head(n)
}

/// Pairwise Pearson correlations between the numeric columns of a table.
#[derive(Clone, Debug, PartialEq)]
pub struct CorrelationMatrix {
    labels: Vec<String>,
    values: Array2<f64>,
}

impl CorrelationMatrix {
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Square matrix indexed like [`CorrelationMatrix::labels`].
    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// Correlation between two named columns.
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.labels.iter().position(|l| l == a)?;
        let j = self.labels.iter().position(|l| l == b)?;
        Some(self.values[[i, j]])
    }
}

impl fmt::Display for CorrelationMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .labels
            .iter()
            .map(String::len)
            .max()
            .unwrap_or(0)
            .max(6);

        write!(f, "{:w$}", "", w = width)?;
        for label in &self.labels {
            write!(f, "  {:>w$}", label, w = width)?;
        }
        writeln!(f)?;

        for (i, label) in self.labels.iter().enumerate() {
            write!(f, "{:<w$}", label, w = width)?;
            for j in 0..self.labels.len() {
                write!(f, "  {:>w$.2}", self.values[[i, j]], w = width)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Pearson correlation over every numeric column, the target included.
///
/// Rows where either value is `NaN` are skipped pairwise. A pair involving a
/// constant column has no defined correlation and yields `NaN`.
pub fn correlation_matrix(table: &Table) -> CorrelationMatrix {
    let numeric: Vec<(&str, &[f64])> = table
        .columns()
        .iter()
        .filter_map(|c| c.data().as_numeric().map(|v| (c.name(), v)))
        .collect();

    let n = numeric.len();
    let mut values = Array2::from_elem((n, n), f64::NAN);
    for i in 0..n {
        for j in i..n {
            let r = pearson(numeric[i].1, numeric[j].1);
            values[[i, j]] = r;
            values[[j, i]] = r;
        }
    }

    CorrelationMatrix {
        labels: numeric.iter().map(|(name, _)| name.to_string()).collect(),
        values,
    }
}

fn pearson(a: &[f64], b: &[f64]) -> f64 {
    let pairs: Vec<(f64, f64)> = a
        .iter()
        .zip(b)
        .filter(|(x, y)| !x.is_nan() && !y.is_nan())
        .map(|(&x, &y)| (x, y))
        .collect();
    if pairs.len() < 2 {
        return f64::NAN;
    }

    let n = pairs.len() as f64;
    let mean_a = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_b = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let (mut cov, mut var_a, mut var_b) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        let (dx, dy) = (x - mean_a, y - mean_b);
        cov += dx * dy;
        var_a += dx * dx;
        var_b += dy * dy;
    }

    if var_a == 0.0 || var_b == 0.0 {
        return f64::NAN;
    }
    (cov / (var_a.sqrt() * var_b.sqrt())).clamp(-1.0, 1.0)
}

/// Equal-width histogram.
#[derive(Clone, Debug, PartialEq)]
pub struct Histogram {
    /// `bins + 1` ascending bin edges.
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn n_bins(&self) -> usize {
        self.counts.len()
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

impl fmt::Display for Histogram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let peak = self.counts.iter().copied().max().unwrap_or(0).max(1);
        for (i, &count) in self.counts.iter().enumerate() {
            let bar = "#".repeat((count * 40).div_ceil(peak));
            writeln!(
                f,
                "[{:>8.2}, {:>8.2}{} {:>6} {}",
                self.edges[i],
                self.edges[i + 1],
                if i + 1 == self.counts.len() { ']' } else { ')' },
                count,
                bar
            )?;
        }
        Ok(())
    }
}

/// Counts `values` into `bins` equal-width bins spanning `[min, max]`.
///
/// Each bin is half-open except the last, which also holds `max`. `NaN`
/// values are skipped. When every value is equal the range is widened to
/// `[v - 0.5, v + 0.5]`. Zero bins are treated as one.
///
/// Returns `None` if there is no value to count.
pub fn histogram(values: &[f64], bins: usize) -> Option<Histogram> {
    let bins = bins.max(1);
    let finite: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();

    let mut min = finite.iter().copied().reduce(f64::min)?;
    let mut max = finite.iter().copied().reduce(f64::max)?;
    if min == max {
        min -= 0.5;
        max += 0.5;
    }

    let width = (max - min) / bins as f64;
    let edges: Vec<f64> = (0..=bins)
        .map(|i| if i == bins { max } else { min + width * i as f64 })
        .collect();

    let mut counts = vec![0usize; bins];
    for v in finite {
        let idx = (((v - min) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }

    Some(Histogram { edges, counts })
}

/// Mean of one numeric column for one distinct value of another.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GroupMean {
    pub key: f64,
    pub mean: f64,
    pub count: usize,
}

/// Mean of `value` per distinct value of `by`, sorted ascending by key.
///
/// Rows where either column is `NaN` are skipped.
///
/// # Errors
/// [`DatasetError::MissingColumn`] or [`DatasetError::ColumnType`] if either
/// column is absent or not numeric.
pub fn grouped_mean(table: &Table, by: &str, value: &str) -> Result<Vec<GroupMean>, DatasetError> {
    let keys = table.numeric(by)?;
    let values = table.numeric(value)?;

    let mut pairs: Vec<(f64, f64)> = keys
        .iter()
        .zip(values)
        .filter(|(k, v)| !k.is_nan() && !v.is_nan())
        .map(|(&k, &v)| (k, v))
        .collect();
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut groups: Vec<GroupMean> = Vec::new();
    for (key, v) in pairs {
        match groups.last_mut() {
            Some(group) if group.key == key => {
                group.mean += v;
                group.count += 1;
            }
            _ => groups.push(GroupMean {
                key,
                mean: v,
                count: 1,
            }),
        }
    }
    for group in &mut groups {
        group.mean /= group.count as f64;
    }

    Ok(groups)
}

/// A calorie estimate, shown rounded to two decimals.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Prediction {
    pub kilocalories: f64,
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} kilocalories", self.kilocalories)
    }
}
