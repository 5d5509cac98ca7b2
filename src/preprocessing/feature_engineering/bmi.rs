//! Body Mass Index derivation.

use crate::dataset::{Column, Table};
use crate::preprocessing::error::PipelineError;
use crate::preprocessing::traits::FittedTransformer;

/// Body Mass Index from weight in kilograms and height in centimetres.
///
/// `weight / (height / 100)^2`. A zero height yields an infinite value and a
/// `NaN` input yields `NaN`; neither is rejected.
pub fn body_mass_index(weight_kg: f64, height_cm: f64) -> f64 {
    let height_m = height_cm / 100.0;
    weight_kg / (height_m * height_m)
}

/// Appends a `BMI` column computed from the height and weight columns.
///
/// Stateless: there is nothing to learn, so it implements
/// [`FittedTransformer`] directly.
///
/// # Example
/// ```ignore
/// use fitness_tracker::preprocessing::{BmiDeriver, FittedTransformer};
///
/// let with_bmi = BmiDeriver::new().transform(&joined)?;
/// assert!(with_bmi.contains("BMI"));
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct BmiDeriver;

impl BmiDeriver {
    const HEIGHT: &'static str = "Height";
    const WEIGHT: &'static str = "Weight";
    const OUTPUT: &'static str = "BMI";

    /// Reads `Height` and `Weight`, writes `BMI`.
    pub fn new() -> Self {
        Self
    }
}

impl FittedTransformer for BmiDeriver {
    fn transform(&self, table: &Table) -> Result<Table, PipelineError> {
        let heights = table.numeric(Self::HEIGHT)?;
        let weights = table.numeric(Self::WEIGHT)?;

        let bmi = weights
            .iter()
            .zip(heights)
            .map(|(&w, &h)| body_mass_index(w, h))
            .collect();

        let mut out = table.clone();
        out.push(Column::numeric(Self::OUTPUT, bmi))?;
        Ok(out)
    }

    fn name(&self) -> &'static str {
        "BmiDeriver"
    }
}
