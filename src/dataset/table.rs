//! Columnar in-memory table with CSV loading.

use super::DatasetError;
use csv::{ReaderBuilder, Trim};
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Values of a single column.
#[derive(Clone, Debug, PartialEq)]
pub enum ColumnData {
    /// Numeric values; missing cells are `NaN`.
    Numeric(Vec<f64>),
    /// Categorical labels; missing cells are empty strings.
    Categorical(Vec<String>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Numeric(v) => v.len(),
            ColumnData::Categorical(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_numeric(&self) -> Option<&[f64]> {
        match self {
            ColumnData::Numeric(v) => Some(v),
            ColumnData::Categorical(_) => None,
        }
    }

    pub fn as_categorical(&self) -> Option<&[String]> {
        match self {
            ColumnData::Numeric(_) => None,
            ColumnData::Categorical(v) => Some(v),
        }
    }

    fn select(&self, rows: &[usize]) -> ColumnData {
        match self {
            ColumnData::Numeric(v) => ColumnData::Numeric(rows.iter().map(|&r| v[r]).collect()),
            ColumnData::Categorical(v) => {
                ColumnData::Categorical(rows.iter().map(|&r| v[r].clone()).collect())
            }
        }
    }

    /// Cell formatted for display: integral numbers without a fractional
    /// part, other numbers with two decimals.
    fn display_at(&self, row: usize) -> String {
        match self {
            ColumnData::Numeric(v) if v[row].fract() == 0.0 => format!("{}", v[row]),
            ColumnData::Numeric(v) => format!("{:.2}", v[row]),
            ColumnData::Categorical(v) => v[row].clone(),
        }
    }

    /// Join key of a cell. Integral numbers print without a fractional part,
    /// so `7` and `7.0` address the same key.
    pub(crate) fn key_at(&self, row: usize) -> String {
        match self {
            ColumnData::Numeric(v) => v[row].to_string(),
            ColumnData::Categorical(v) => v[row].clone(),
        }
    }
}

/// A named column.
#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    name: String,
    data: ColumnData,
}

impl Column {
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    pub fn numeric(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self::new(name, ColumnData::Numeric(values))
    }

    pub fn categorical(name: impl Into<String>, values: Vec<String>) -> Self {
        Self::new(name, ColumnData::Categorical(values))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub(crate) fn renamed(self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: self.data,
        }
    }
}

/// Ordered collection of equally long, uniquely named columns.
///
/// Tables are built once and then only read; every transformation in the
/// feature pipeline produces a new table instead of editing one that is
/// already shared.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    n_rows: usize,
}

impl Table {
    /// Creates an empty table with no columns and no rows.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from columns that are known to share one length and
    /// have distinct names.
    pub(super) fn from_uniform_columns(columns: Vec<Column>) -> Self {
        let n_rows = columns.first().map_or(0, Column::len);
        debug_assert!(columns.iter().all(|c| c.len() == n_rows));
        Self { columns, n_rows }
    }

    /// Builds a table from columns, checking names and lengths.
    pub fn from_columns(columns: Vec<Column>) -> Result<Self, DatasetError> {
        let mut table = Self::new();
        for column in columns {
            table.push(column)?;
        }
        Ok(table)
    }

    /// Reads a headered CSV source, inferring each column's type.
    ///
    /// Header names are trimmed. A column whose cells all parse as numbers
    /// once surrounding whitespace is ignored is numeric, with blank cells
    /// read as `NaN`. Categorical cells keep their text exactly as written.
    ///
    /// # Errors
    /// Returns [`DatasetError::Csv`] for malformed input (including rows with a
    /// different number of fields than the header) and
    /// [`DatasetError::DuplicateColumn`] for repeated header names.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::Headers)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];

        for result in rdr.records() {
            let record = result?;
            for (col, field) in record.iter().enumerate() {
                cells[col].push(field.to_string());
            }
        }

        let columns = headers
            .iter()
            .zip(cells)
            .map(|(name, values)| infer_column(name, values))
            .collect();
        Self::from_columns(columns)
    }

    /// Opens and reads a CSV file. See [`Table::from_reader`].
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, DatasetError> {
        let file = File::open(path.as_ref())?;
        log::debug!("Reading table from {}", path.as_ref().display());
        Self::from_reader(BufReader::new(file))
    }

    /// Appends a column at the end.
    pub fn push(&mut self, column: Column) -> Result<(), DatasetError> {
        if self.contains(column.name()) {
            return Err(DatasetError::DuplicateColumn(column.name().to_string()));
        }
        if self.columns.is_empty() {
            self.n_rows = column.len();
        } else if column.len() != self.n_rows {
            return Err(DatasetError::LengthMismatch {
                column: column.name().to_string(),
                expected: self.n_rows,
                got: column.len(),
            });
        }
        self.columns.push(column);
        Ok(())
    }

    /// Replaces the column of the same name, keeping its position.
    pub fn replace(&mut self, column: Column) -> Result<(), DatasetError> {
        let idx = self.index_of(column.name())?;
        if column.len() != self.n_rows {
            return Err(DatasetError::LengthMismatch {
                column: column.name().to_string(),
                expected: self.n_rows,
                got: column.len(),
            });
        }
        self.columns[idx] = column;
        Ok(())
    }

    /// Removes a column and returns it.
    pub fn remove(&mut self, name: &str) -> Result<Column, DatasetError> {
        let idx = self.index_of(name)?;
        Ok(self.columns.remove(idx))
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    /// Like [`Table::column`], but a missing column is an error.
    pub fn require(&self, name: &str) -> Result<&Column, DatasetError> {
        self.column(name)
            .ok_or_else(|| DatasetError::MissingColumn(name.to_string()))
    }

    /// Values of a numeric column.
    pub fn numeric(&self, name: &str) -> Result<&[f64], DatasetError> {
        self.require(name)?
            .data()
            .as_numeric()
            .ok_or_else(|| DatasetError::ColumnType {
                column: name.to_string(),
                expected: "numeric",
            })
    }

    /// Labels of a categorical column.
    pub fn categorical(&self, name: &str) -> Result<&[String], DatasetError> {
        self.require(name)?
            .data()
            .as_categorical()
            .ok_or_else(|| DatasetError::ColumnType {
                column: name.to_string(),
                expected: "categorical",
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    /// New table holding the given rows, in the given order.
    pub fn select_rows(&self, rows: &[usize]) -> Table {
        Table {
            columns: self
                .columns
                .iter()
                .map(|c| Column::new(c.name(), c.data().select(rows)))
                .collect(),
            n_rows: rows.len(),
        }
    }

    /// First `n` rows (fewer if the table is shorter).
    pub fn head(&self, n: usize) -> Table {
        let rows: Vec<usize> = (0..n.min(self.n_rows)).collect();
        self.select_rows(&rows)
    }

    fn index_of(&self, name: &str) -> Result<usize, DatasetError> {
        self.columns
            .iter()
            .position(|c| c.name() == name)
            .ok_or_else(|| DatasetError::MissingColumn(name.to_string()))
    }
}

impl fmt::Display for Table {
    /// Renders the table as right-aligned text columns under a header line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells: Vec<Vec<String>> = self
            .columns
            .iter()
            .map(|c| (0..self.n_rows).map(|row| c.data().display_at(row)).collect())
            .collect();
        let widths: Vec<usize> = self
            .columns
            .iter()
            .zip(&cells)
            .map(|(c, values)| {
                values
                    .iter()
                    .map(String::len)
                    .chain(std::iter::once(c.name().len()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let header: Vec<String> = self
            .columns
            .iter()
            .zip(&widths)
            .map(|(c, &w)| format!("{:>w$}", c.name(), w = w))
            .collect();
        writeln!(f, "{}", header.join("  "))?;

        for row in 0..self.n_rows {
            let line: Vec<String> = cells
                .iter()
                .zip(&widths)
                .map(|(values, &w)| format!("{:>w$}", values[row], w = w))
                .collect();
            writeln!(f, "{}", line.join("  "))?;
        }
        Ok(())
    }
}

fn infer_column(name: &str, cells: Vec<String>) -> Column {
    let parsed: Option<Vec<f64>> = cells
        .iter()
        .map(|cell| {
            let cell = cell.trim();
            if cell.is_empty() {
                Some(f64::NAN)
            } else {
                cell.parse::<f64>().ok()
            }
        })
        .collect();

    match parsed {
        Some(values) => Column::numeric(name, values),
        None => Column::categorical(name, cells),
    }
}
