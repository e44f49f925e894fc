/// Crop growth profile and growth-stage interpolation.
///
/// A cultivation window is split into four consecutive phases (initial,
/// development, mid, late). Kc and the effective root depth Zr each carry
/// endpoint values for the initial/mid/late stages plus per-phase flags:
/// a flagged phase holds its plateau, an unflagged one ramps linearly
/// toward the next endpoint (FAO-56 Eq. 66).
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::BalanceError;

/// Lengths of the four growth phases, in whole days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseLengths {
    pub initial: u32,
    pub development: u32,
    pub mid: u32,
    pub late: u32,
}

impl PhaseLengths {
    /// Total cultivation days.
    pub fn total(&self) -> u32 {
        self.initial + self.development + self.mid + self.late
    }
}

/// Per-phase constant flags: `true` holds the plateau, `false` ramps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseFlags {
    pub initial: bool,
    pub development: bool,
    pub mid: bool,
    pub late: bool,
}

impl PhaseFlags {
    /// The standard annual-crop shape: plateaus in initial and mid,
    /// ramps through development and late.
    pub const STANDARD: Self = Self {
        initial: true,
        development: false,
        mid: true,
        late: false,
    };
}

/// One tracked quantity's stage endpoints plus its phase flags.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StageCurve {
    pub initial: f64,
    pub mid: f64,
    pub late: f64,
    pub constant: PhaseFlags,
}

/// Validated crop parameters for one cultivation.
///
/// Only constructible through [`CropProfile::new`], so a held profile
/// is always internally consistent.
#[derive(Debug, Clone)]
pub struct CropProfile {
    pub name: String,
    pub phases: PhaseLengths,
    pub kc: StageCurve,
    pub zr: StageCurve,
    total_days: u32,
}

impl CropProfile {
    /// Build a profile, checking that the phase lengths sum to the
    /// declared total and that every day of the season resolves to
    /// exactly one interpolation rule.
    pub fn new(
        name: impl Into<String>,
        phases: PhaseLengths,
        total_days: u32,
        kc: StageCurve,
        zr: StageCurve,
    ) -> Result<Self, BalanceError> {
        if phases.total() != total_days {
            return Err(BalanceError::InvalidProfile(format!(
                "phase lengths sum to {} but the declared total is {total_days}",
                phases.total()
            )));
        }
        validate_curve("Kc", &kc, &phases)?;
        validate_curve("Zr", &zr, &phases)?;
        for (label, value) in [
            ("Kc initial", kc.initial),
            ("Kc mid", kc.mid),
            ("Kc late", kc.late),
        ] {
            if value.is_nan() || value < 0.0 {
                return Err(BalanceError::InvalidProfile(format!(
                    "{label} endpoint {value} must be non-negative"
                )));
            }
        }
        // A zero root depth would collapse TAW and RAW to 0 and the
        // stress coefficient to 0/0.
        for (label, value) in [
            ("Zr initial", zr.initial),
            ("Zr mid", zr.mid),
            ("Zr late", zr.late),
        ] {
            if value.is_nan() || value <= 0.0 {
                return Err(BalanceError::InvalidProfile(format!(
                    "{label} endpoint {value} must be a positive root depth"
                )));
            }
        }
        Ok(Self {
            name: name.into(),
            phases,
            kc,
            zr,
            total_days,
        })
    }

    pub fn total_days(&self) -> u32 {
        self.total_days
    }

    /// Kc for `elapsed` whole days since planting.
    pub fn kc_at(&self, elapsed: i64) -> f64 {
        stage_value(&self.kc, &self.phases, elapsed)
    }

    /// Zr (m) for `elapsed` whole days since planting.
    pub fn zr_at(&self, elapsed: i64) -> f64 {
        stage_value(&self.zr, &self.phases, elapsed)
    }

    /// Kc on a calendar date, given the planting date.
    pub fn kc_on(&self, date: NaiveDate, planting: NaiveDate) -> f64 {
        self.kc_at((date - planting).num_days())
    }

    /// Zr on a calendar date, given the planting date.
    pub fn zr_on(&self, date: NaiveDate, planting: NaiveDate) -> f64 {
        self.zr_at((date - planting).num_days())
    }
}

/// Reject flag combinations that would leave a day with no rule: a
/// nonzero plateau phase must be flagged constant and a nonzero ramp
/// phase must not be.
fn validate_curve(
    label: &str,
    curve: &StageCurve,
    phases: &PhaseLengths,
) -> Result<(), BalanceError> {
    if phases.initial > 0 && !curve.constant.initial {
        return Err(BalanceError::InvalidProfile(format!(
            "{label}: initial phase has no plateau value and no ramp rule"
        )));
    }
    if phases.development > 0 && curve.constant.development {
        return Err(BalanceError::InvalidProfile(format!(
            "{label}: development phase must ramp toward the mid endpoint"
        )));
    }
    if phases.mid > 0 && !curve.constant.mid {
        return Err(BalanceError::InvalidProfile(format!(
            "{label}: mid phase has no plateau value and no ramp rule"
        )));
    }
    if phases.late > 0 && curve.constant.late {
        return Err(BalanceError::InvalidProfile(format!(
            "{label}: late phase must ramp toward the late endpoint"
        )));
    }
    Ok(())
}

/// Interpolate a stage curve at `elapsed` days since planting.
///
/// Days past the cultivation window hold the late endpoint. Negative
/// `elapsed` (a date before planting) is undefined input.
pub fn stage_value(curve: &StageCurve, phases: &PhaseLengths, elapsed: i64) -> f64 {
    debug_assert!(elapsed >= 0, "date before planting");
    let l_ini = i64::from(phases.initial);
    let l_dev = i64::from(phases.development);
    let l_mid = i64::from(phases.mid);
    let l_late = i64::from(phases.late);

    if elapsed < l_ini {
        curve.initial
    } else if elapsed < l_ini + l_dev {
        ramp(curve.initial, curve.mid, l_dev, l_ini, elapsed)
    } else if elapsed < l_ini + l_dev + l_mid {
        curve.mid
    } else if elapsed < l_ini + l_dev + l_mid + l_late {
        ramp(curve.mid, curve.late, l_late, l_ini + l_dev + l_mid, elapsed)
    } else {
        curve.late
    }
}

/// FAO-56 Eq. 66: linear ramp from `from` toward `to` across a phase of
/// `len` days that begins after `sum_prev` elapsed days.
fn ramp(from: f64, to: f64, len: i64, sum_prev: i64, elapsed: i64) -> f64 {
    let fraction = (elapsed + 1 - sum_prev) as f64 / len as f64;
    from + fraction * (to - from)
}
