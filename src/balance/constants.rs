/// Fixed terms of the water balance for this site class.
///
/// Surface runoff and capillary rise from a water table are neglected,
/// the standard FAO-56 simplification for deep groundwater and level
/// cropped fields.

/// Surface runoff [mm/day].
pub const RUNOFF: f64 = 0.0;

/// Capillary rise from the water table [mm/day].
pub const CAPILLARY_RISE: f64 = 0.0;
