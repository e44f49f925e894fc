//! Soil water-capacity functions (FAO-56 chapter 8).
//!
//! All depths are in mm; `theta_fc` and `theta_wp` are volumetric
//! fractions and Zr is the effective root depth in metres. Validation
//! of depths happens at the caller; these functions propagate whatever
//! they are given.

use crate::error::BalanceError;

/// Depth of water per metre of soil column at unit volumetric content.
const MM_PER_M: f64 = 1000.0;

/// Soil texture parameters, immutable for a run.
#[derive(Debug, Clone, Copy)]
pub struct SoilProfile {
    /// Volumetric water content at field capacity [m³/m³].
    pub theta_fc: f64,
    /// Volumetric water content at wilting point [m³/m³].
    pub theta_wp: f64,
    /// Water-availability (depletion) factor [0, 1).
    pub p: f64,
}

impl SoilProfile {
    /// Build a profile, checking the fraction ranges and fc > wp.
    ///
    /// `p` must stay strictly below 1: at `p == 1` RAW equals TAW and
    /// the stress coefficient's linear branch divides by zero.
    pub fn new(theta_fc: f64, theta_wp: f64, p: f64) -> Result<Self, BalanceError> {
        if !(0.0..=1.0).contains(&theta_fc) || !(0.0..=1.0).contains(&theta_wp) {
            return Err(BalanceError::InvalidProfile(format!(
                "theta_fc = {theta_fc} and theta_wp = {theta_wp} must be volumetric fractions in [0, 1]"
            )));
        }
        if theta_fc <= theta_wp {
            return Err(BalanceError::InvalidProfile(format!(
                "theta_fc = {theta_fc} must exceed theta_wp = {theta_wp}"
            )));
        }
        if !(0.0..1.0).contains(&p) {
            return Err(BalanceError::InvalidProfile(format!(
                "availability factor p = {p} must be in [0, 1)"
            )));
        }
        Ok(Self {
            theta_fc,
            theta_wp,
            p,
        })
    }
}

/// Total available water in the root zone [mm] (FAO-56 Eq. 82).
pub fn total_available_water(theta_fc: f64, theta_wp: f64, zr: f64) -> f64 {
    MM_PER_M * (theta_fc - theta_wp) * zr
}

/// Readily available water [mm] (FAO-56 Eq. 83).
pub fn readily_available_water(p: f64, taw: f64) -> f64 {
    p * taw
}

/// Water depth held at field capacity over the root zone [mm].
pub fn field_capacity_depth(zr: f64, theta_fc: f64) -> f64 {
    MM_PER_M * zr * theta_fc
}

/// Water depth held at wilting point over the root zone [mm].
pub fn wilting_point_depth(zr: f64, theta_wp: f64) -> f64 {
    MM_PER_M * zr * theta_wp
}

/// Critical moisture depth below which stress begins [mm].
pub fn critical_threshold(fc: f64, wp: f64, p: f64) -> f64 {
    fc - (fc - wp) * p
}
