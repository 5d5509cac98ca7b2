//! One-to-one join of two tables on a shared identifier column.

use crate::dataset::{Column, Table};
use crate::preprocessing::error::PipelineError;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// What to do with identifiers present in only one of the two sources.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinPolicy {
    /// Drop unmatched rows from either side and log how many were dropped.
    #[default]
    Inner,
    /// Fail with [`PipelineError::JoinMismatch`] on any unmatched identifier.
    Strict,
}

/// Joins `left` and `right` on `key`.
///
/// Output rows follow the order of `left`. Output columns are the columns of
/// `left` (key included) followed by the non-key columns of `right`. A non-key
/// name present on both sides gets the suffix `_x` on the left copy and `_y`
/// on the right copy.
///
/// # Errors
/// - [`PipelineError::JoinMismatch`] if a key value repeats on either side, or
///   if `policy` is [`JoinPolicy::Strict`] and some key appears on one side only.
/// - [`PipelineError::Dataset`] if either table lacks `key`.
pub fn join_on(
    left: &Table,
    right: &Table,
    key: &str,
    policy: JoinPolicy,
) -> Result<Table, PipelineError> {
    let left_keys = left.require(key)?.data();
    let right_keys = right.require(key)?.data();

    let mut right_index: HashMap<String, usize> = HashMap::with_capacity(right.n_rows());
    for row in 0..right.n_rows() {
        let value = right_keys.key_at(row);
        if right_index.insert(value.clone(), row).is_some() {
            return Err(duplicate_key(key, &value, "right"));
        }
    }

    let mut seen: HashSet<String> = HashSet::with_capacity(left.n_rows());
    let mut left_rows = Vec::with_capacity(left.n_rows());
    let mut right_rows = Vec::with_capacity(left.n_rows());
    for row in 0..left.n_rows() {
        let value = left_keys.key_at(row);
        if let Some(&matched) = right_index.get(&value) {
            left_rows.push(row);
            right_rows.push(matched);
        }
        if !seen.insert(value.clone()) {
            return Err(duplicate_key(key, &value, "left"));
        }
    }

    let unmatched_left = left.n_rows() - left_rows.len();
    let unmatched_right = right.n_rows() - right_rows.len();
    if unmatched_left + unmatched_right > 0 {
        match policy {
            JoinPolicy::Strict => {
                return Err(PipelineError::JoinMismatch {
                    key: key.to_string(),
                    detail: format!(
                        "{} left and {} right rows have no counterpart",
                        unmatched_left, unmatched_right
                    ),
                });
            }
            JoinPolicy::Inner => log::warn!(
                "Dropping unmatched rows on {}: {} left, {} right",
                key,
                unmatched_left,
                unmatched_right
            ),
        }
    }

    let left_part = left.select_rows(&left_rows);
    let right_part = right.select_rows(&right_rows);

    let mut columns: Vec<Column> = Vec::with_capacity(left.n_cols() + right.n_cols());
    for column in left_part.columns() {
        let clash = column.name() != key && right.contains(column.name());
        columns.push(suffixed(column, clash, "_x"));
    }
    for column in right_part.columns().iter().filter(|c| c.name() != key) {
        let clash = left.contains(column.name());
        columns.push(suffixed(column, clash, "_y"));
    }

    Ok(Table::from_columns(columns)?)
}

fn suffixed(column: &Column, clash: bool, suffix: &str) -> Column {
    if clash {
        let name = format!("{}{}", column.name(), suffix);
        column.clone().renamed(name)
    } else {
        column.clone()
    }
}

fn duplicate_key(key: &str, value: &str, side: &str) -> PipelineError {
    PipelineError::JoinMismatch {
        key: key.to_string(),
        detail: format!("identifier {} repeats in the {} source", value, side),
    }
}
