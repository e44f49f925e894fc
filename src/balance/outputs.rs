/// Per-day water-balance outputs.
///
/// Two levels: `DailyFluxes` holds a single day, `DailyTimeseries`
/// holds the full season (one Vec per tracked quantity). The field
/// order matches the persisted column order and must stay stable.
///
/// Single-day record — returned by `step()`, immutable once appended.
#[derive(Debug, Clone, Copy)]
pub struct DailyFluxes {
    pub eto: f64,                 // reference ET [mm]
    pub precipitation: f64,       // P [mm]
    pub kc: f64,                  // crop coefficient [-]
    pub zr: f64,                  // root depth [m]
    pub taw: f64,                 // total available water [mm]
    pub raw: f64,                 // readily available water [mm]
    pub starting_depletion: f64,  // Din [mm]
    pub ending_depletion: f64,    // Dfim [mm]
    pub ks: f64,                  // stress coefficient [-]
    pub irrigation: f64,          // applied depth [mm]
    pub deep_percolation: f64,    // DP [mm]
    pub crop_et: f64,             // adjusted ETc [mm]
    pub field_capacity: f64,      // FC depth [mm]
    pub wilting_point: f64,       // WP depth [mm]
    pub critical_threshold: f64,  // stress onset depth [mm]
    pub soil_water: f64,          // FC - Din [mm]
}

/// Full-season record — returned by `run()`.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyTimeseries {
    pub eto: Vec<f64>,
    pub precipitation: Vec<f64>,
    pub kc: Vec<f64>,
    pub zr: Vec<f64>,
    pub taw: Vec<f64>,
    pub raw: Vec<f64>,
    pub starting_depletion: Vec<f64>,
    pub ending_depletion: Vec<f64>,
    pub ks: Vec<f64>,
    pub irrigation: Vec<f64>,
    pub deep_percolation: Vec<f64>,
    pub crop_et: Vec<f64>,
    pub field_capacity: Vec<f64>,
    pub wilting_point: Vec<f64>,
    pub critical_threshold: Vec<f64>,
    pub soil_water: Vec<f64>,
}

impl DailyTimeseries {
    /// Pre-allocate all vectors for `n` days.
    pub fn with_capacity(n: usize) -> Self {
        Self {
            eto: Vec::with_capacity(n),
            precipitation: Vec::with_capacity(n),
            kc: Vec::with_capacity(n),
            zr: Vec::with_capacity(n),
            taw: Vec::with_capacity(n),
            raw: Vec::with_capacity(n),
            starting_depletion: Vec::with_capacity(n),
            ending_depletion: Vec::with_capacity(n),
            ks: Vec::with_capacity(n),
            irrigation: Vec::with_capacity(n),
            deep_percolation: Vec::with_capacity(n),
            crop_et: Vec::with_capacity(n),
            field_capacity: Vec::with_capacity(n),
            wilting_point: Vec::with_capacity(n),
            critical_threshold: Vec::with_capacity(n),
            soil_water: Vec::with_capacity(n),
        }
    }

    /// Push one day's fluxes into the season.
    pub fn push(&mut self, f: &DailyFluxes) {
        self.eto.push(f.eto);
        self.precipitation.push(f.precipitation);
        self.kc.push(f.kc);
        self.zr.push(f.zr);
        self.taw.push(f.taw);
        self.raw.push(f.raw);
        self.starting_depletion.push(f.starting_depletion);
        self.ending_depletion.push(f.ending_depletion);
        self.ks.push(f.ks);
        self.irrigation.push(f.irrigation);
        self.deep_percolation.push(f.deep_percolation);
        self.crop_et.push(f.crop_et);
        self.field_capacity.push(f.field_capacity);
        self.wilting_point.push(f.wilting_point);
        self.critical_threshold.push(f.critical_threshold);
        self.soil_water.push(f.soil_water);
    }

    /// Number of simulated days.
    pub fn len(&self) -> usize {
        self.ending_depletion.len()
    }

    /// Returns `true` if no days were simulated.
    pub fn is_empty(&self) -> bool {
        self.ending_depletion.is_empty()
    }

    /// Season summary for planning reports.
    pub fn summary(&self) -> SeasonSummary {
        let events = self.irrigation.iter().filter(|i| **i > 0.0).count();
        SeasonSummary {
            days: self.len(),
            total_irrigation: self.irrigation.iter().sum(),
            irrigation_events: events,
            peak_irrigation: self.irrigation.iter().cloned().fold(0.0, f64::max),
            total_crop_et: self.crop_et.iter().sum(),
            total_precipitation: self.precipitation.iter().sum(),
            total_percolation: self.deep_percolation.iter().sum(),
        }
    }
}

/// Season-level aggregates derived from the daily vectors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeasonSummary {
    pub days: usize,
    pub total_irrigation: f64,
    pub irrigation_events: usize,
    pub peak_irrigation: f64,
    pub total_crop_et: f64,
    pub total_precipitation: f64,
    pub total_percolation: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn flux(irrigation: f64, etc: f64) -> DailyFluxes {
        DailyFluxes {
            eto: 5.0,
            precipitation: 0.0,
            kc: 1.0,
            zr: 0.5,
            taw: 65.0,
            raw: 32.5,
            starting_depletion: 10.0,
            ending_depletion: 15.0,
            ks: 1.0,
            irrigation,
            deep_percolation: 0.0,
            crop_et: etc,
            field_capacity: 115.0,
            wilting_point: 50.0,
            critical_threshold: 82.5,
            soil_water: 105.0,
        }
    }

    #[test]
    fn push_grows_every_vector() {
        let mut ts = DailyTimeseries::with_capacity(2);
        assert!(ts.is_empty());
        ts.push(&flux(0.0, 4.0));
        ts.push(&flux(36.0, 4.5));
        assert_eq!(ts.len(), 2);
        assert_eq!(ts.eto.len(), 2);
        assert_eq!(ts.soil_water.len(), 2);
        assert_eq!(ts.irrigation[1], 36.0);
    }

    #[test]
    fn summary_counts_irrigation_events() {
        let mut ts = DailyTimeseries::with_capacity(3);
        ts.push(&flux(0.0, 4.0));
        ts.push(&flux(36.0, 4.5));
        ts.push(&flux(20.0, 4.2));
        let s = ts.summary();
        assert_eq!(s.days, 3);
        assert_eq!(s.irrigation_events, 2);
        assert_relative_eq!(s.total_irrigation, 56.0, max_relative = 1e-12);
        assert_relative_eq!(s.peak_irrigation, 36.0, max_relative = 1e-12);
        assert_relative_eq!(s.total_crop_et, 12.7, max_relative = 1e-12);
    }
}
