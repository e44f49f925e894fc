//! TOML run configuration.
//!
//! One document describes a run: site, planting date, soil texture,
//! and the crop's phase schedule. Sections convert into the validated
//! profile types through their checked constructors, so a bad file
//! fails with the same `InvalidProfile` errors as bad API input.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::crop::{CropProfile, PhaseFlags, PhaseLengths, StageCurve};
use crate::error::BalanceError;
use crate::soil::SoilProfile;

/// Parsed run configuration, not yet validated.
#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    pub site: String,
    pub planting_date: NaiveDate,
    soil: SoilSection,
    crop: CropSection,
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct SoilSection {
    theta_fc: f64,
    theta_wp: f64,
    p: f64,
}

#[derive(Debug, Clone, Deserialize)]
struct CropSection {
    name: String,
    total_days: u32,
    phases: PhaseLengths,
    kc: CurveSection,
    zr: CurveSection,
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct CurveSection {
    initial: f64,
    mid: f64,
    late: f64,
    #[serde(default = "standard_flags")]
    constant: PhaseFlags,
}

fn standard_flags() -> PhaseFlags {
    PhaseFlags::STANDARD
}

impl CurveSection {
    fn into_curve(self) -> StageCurve {
        StageCurve {
            initial: self.initial,
            mid: self.mid,
            late: self.late,
            constant: self.constant,
        }
    }
}

impl RunConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, BalanceError> {
        toml::from_str(text)
            .map_err(|e| BalanceError::InvalidProfile(format!("configuration: {e}")))
    }

    /// Validated soil profile.
    pub fn soil(&self) -> Result<SoilProfile, BalanceError> {
        SoilProfile::new(self.soil.theta_fc, self.soil.theta_wp, self.soil.p)
    }

    /// Validated crop profile.
    pub fn crop(&self) -> Result<CropProfile, BalanceError> {
        CropProfile::new(
            self.crop.name.clone(),
            self.crop.phases,
            self.crop.total_days,
            self.crop.kc.into_curve(),
            self.crop.zr.into_curve(),
        )
    }
}
