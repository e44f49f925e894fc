/// Carried day-to-day simulation state.
///
/// Owned exclusively by the driver for the duration of one run. Two
/// quantities cross the midnight boundary: the closing depletion and
/// the day's adjusted crop ET (the percolation term needs yesterday's).
#[derive(Debug, Clone, Copy)]
pub struct State {
    /// Root-zone depletion at close of day [mm].
    pub ending_depletion: f64,
    /// Adjusted crop evapotranspiration for the day [mm].
    pub crop_et: f64,
}

impl State {
    /// Day-zero state: no depletion, no prior crop ET.
    pub fn initialize() -> Self {
        Self {
            ending_depletion: 0.0,
            crop_et: 0.0,
        }
    }
}
