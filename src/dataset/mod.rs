//! Tabular data sources for the fitness dataset.
//!
//! This module provides a small columnar [`Table`] that the feature pipeline
//! operates on, together with the typed raw records the two source files
//! describe.
//!
//! # Core Concepts
//!
//! - **Table**: An ordered set of equally long named columns. Each column is
//!   either numeric (`f64`, missing cells are `NaN`) or categorical (`String`,
//!   missing cells are empty).
//! - **Type inference**: A CSV column is numeric when every non-empty cell
//!   parses as `f64`; otherwise it is categorical.
//! - **Raw records**: [`RawExerciseRecord`] and [`RawCalorieRecord`] mirror the
//!   on-disk headers and convert into tables, which is handy for building
//!   sources in memory.
//!
//! # Example
//!
//! ```rust
//! use fitness_tracker::dataset::Table;
//!
//! let csv = "User_ID,Calories\n1,150\n2,66\n";
//! let table = Table::from_reader(csv.as_bytes()).unwrap();
//!
//! assert_eq!(table.n_rows(), 2);
//! assert_eq!(table.numeric("Calories").unwrap(), &[150.0, 66.0]);
//! ```

mod records;
mod table;

pub use self::records::{RawCalorieRecord, RawExerciseRecord};
pub use self::table::{Column, ColumnData, Table};

use thiserror::Error;

/// Error type for loading and accessing tables.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// I/O error while opening a source file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed CSV input (ragged rows, invalid UTF-8, ...).
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is not present in the table.
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// A column exists but holds the wrong kind of data.
    #[error("Column {column} has wrong type: expected {expected}")]
    ColumnType {
        column: String,
        expected: &'static str,
    },

    /// Two columns share a name.
    #[error("Duplicate column: {0}")]
    DuplicateColumn(String),

    /// A column does not have as many rows as the table.
    #[error("Column {column} has {got} rows, table has {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        got: usize,
    },
}
