/// Daily depletion recurrence: pure functions for each term of the
/// FAO-56 root-zone water balance (Eq. 85 and companions).
///
/// All inputs and outputs are f64 depths in mm. The driver wires these
/// together in data-dependency order; none of them touches state.
use super::constants::RUNOFF;

/// Depletion at the start of the day, after overnight rain.
///
/// Rain reduces yesterday's closing depletion, floored at zero (the
/// root zone cannot hold more than field capacity). A rainless day
/// carries the depletion through unchanged.
pub fn starting_depletion(precip: f64, prior_ending: f64) -> f64 {
    if precip > 0.0 {
        (prior_ending - precip).max(0.0)
    } else {
        prior_ending
    }
}

/// Water-stress coefficient Ks (FAO-56 Eq. 84).
///
/// Equal to 1 while depletion stays below readily available water.
/// Beyond RAW it falls linearly and goes negative once depletion
/// exceeds TAW; FAO-56 leaves it unclamped.
pub fn stress_coefficient(depletion: f64, taw: f64, raw: f64) -> f64 {
    if depletion < raw {
        1.0
    } else {
        (taw - depletion) / (taw - raw)
    }
}

/// Adjusted crop evapotranspiration ETc [mm/day] (FAO-56 Eq. 81).
pub fn crop_et(eto: f64, kc: f64, ks: f64) -> f64 {
    eto * kc * ks
}

/// Demand-driven irrigation depth [mm].
///
/// Once depletion reaches RAW, refill the whole deficit plus today's
/// crop demand; otherwise apply nothing. Full automatic refill, not a
/// fixed application depth.
pub fn irrigation_depth(depletion: f64, raw: f64, etc: f64) -> f64 {
    if depletion >= raw {
        depletion + etc
    } else {
        0.0
    }
}

/// Deep percolation below the root zone [mm] (FAO-56 Eq. 88).
///
/// Water in excess of yesterday's closing deficit drains; the ET term
/// is yesterday's because today's transpiration has not yet drawn down
/// the profile when drainage occurs.
pub fn deep_percolation(precip: f64, irrigation: f64, prior_et: f64, prior_ending: f64) -> f64 {
    ((precip - RUNOFF) + irrigation - prior_et - prior_ending).max(0.0)
}

/// Root-zone depletion at close of day [mm] (FAO-56 Eq. 85).
///
/// Clamped at zero: depletion cannot go negative.
pub fn ending_depletion(
    prior_ending: f64,
    precip: f64,
    irrigation: f64,
    etc: f64,
    dp: f64,
) -> f64 {
    (prior_ending - (precip - RUNOFF) - irrigation + etc + dp).max(0.0)
}
