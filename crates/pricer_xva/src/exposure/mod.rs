//! Exposure reduction.
//!
//! - Expected Positive Exposure (EPE)
//! - Expected Negative Exposure (ENE), signed
//! - Potential Future Exposure (PFE)
//! - Time-weighted averages and peaks

mod calculator;
mod matrix;

pub use calculator::ExposureCalculator;
pub use matrix::ExposureMatrix;

/// EPE and ENE profiles on the simulation grid.
#[derive(Debug, Clone, PartialEq)]
pub struct ExposureProfile {
    /// Expected positive exposure per grid date.
    pub epe: Vec<f64>,
    /// Expected negative exposure per grid date, `<= 0`.
    pub ene: Vec<f64>,
}

impl ExposureProfile {
    /// Reduces a gathered matrix.
    pub fn from_matrix(matrix: &ExposureMatrix) -> Self {
        Self {
            epe: ExposureCalculator::expected_positive_exposure(matrix),
            ene: ExposureCalculator::expected_negative_exposure(matrix),
        }
    }

    /// Number of grid dates.
    pub fn len(&self) -> usize {
        self.epe.len()
    }

    /// Whether the profile has no dates.
    pub fn is_empty(&self) -> bool {
        self.epe.is_empty()
    }
}
