//! Typed raw records of the exercise and calorie sources.

use super::table::{Column, Table};
use serde::{Deserialize, Serialize};

/// One exercise session of one user, as stored in `exercise.csv`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawExerciseRecord {
    #[serde(rename = "User_ID")]
    pub user_id: u64,
    #[serde(rename = "Gender")]
    pub gender: String,
    #[serde(rename = "Age")]
    pub age: u32,
    /// Height in centimetres.
    #[serde(rename = "Height")]
    pub height: f64,
    /// Weight in kilograms.
    #[serde(rename = "Weight")]
    pub weight: f64,
    /// Session length in minutes.
    #[serde(rename = "Duration")]
    pub duration: f64,
    /// Beats per minute.
    #[serde(rename = "Heart_Rate")]
    pub heart_rate: u32,
    /// Degrees Celsius.
    #[serde(rename = "Body_Temp")]
    pub body_temp: f64,
}

/// Calories burned in one session, as stored in `calories.csv`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawCalorieRecord {
    #[serde(rename = "User_ID")]
    pub user_id: u64,
    #[serde(rename = "Calories")]
    pub calories: f64,
}

impl From<&[RawExerciseRecord]> for Table {
    fn from(records: &[RawExerciseRecord]) -> Self {
        let numeric = |name: &str, f: fn(&RawExerciseRecord) -> f64| {
            Column::numeric(name, records.iter().map(f).collect())
        };
        let columns = vec![
            numeric("User_ID", |r| r.user_id as f64),
            Column::categorical("Gender", records.iter().map(|r| r.gender.clone()).collect()),
            numeric("Age", |r| f64::from(r.age)),
            numeric("Height", |r| r.height),
            numeric("Weight", |r| r.weight),
            numeric("Duration", |r| r.duration),
            numeric("Heart_Rate", |r| f64::from(r.heart_rate)),
            numeric("Body_Temp", |r| r.body_temp),
        ];
        table_of(columns)
    }
}

impl From<&[RawCalorieRecord]> for Table {
    fn from(records: &[RawCalorieRecord]) -> Self {
        table_of(vec![
            Column::numeric("User_ID", records.iter().map(|r| r.user_id as f64).collect()),
            Column::numeric("Calories", records.iter().map(|r| r.calories).collect()),
        ])
    }
}

// Columns built from one record slice always share a length and have
// distinct names.
fn table_of(columns: Vec<Column>) -> Table {
    Table::from_uniform_columns(columns)
}
