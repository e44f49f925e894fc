/// Season driver for the daily water balance.
///
/// - `step()`: one day → (State, DailyFluxes)
/// - `run()`: fold `step` across the cultivation window → DailyTimeseries
use chrono::NaiveDate;
use tracing::{debug, info};

use super::outputs::{DailyFluxes, DailyTimeseries};
use super::processes;
use super::state::State;
use crate::crop::CropProfile;
use crate::error::BalanceError;
use crate::forcing::{DailySeries, WeatherSource};
use crate::soil::{self, SoilProfile};

/// Execute one day of the balance.
///
/// `elapsed` is the whole-day offset from planting. Terms are computed
/// in data-dependency order: today's crop ET feeds the irrigation
/// decision, while percolation uses yesterday's ET and closing
/// depletion carried in `state`.
pub fn step(
    state: &State,
    soil: &SoilProfile,
    crop: &CropProfile,
    elapsed: i64,
    precip: f64,
    eto: f64,
) -> (State, DailyFluxes) {
    let kc = crop.kc_at(elapsed);
    let zr = crop.zr_at(elapsed);

    let taw = soil::total_available_water(soil.theta_fc, soil.theta_wp, zr);
    let raw = soil::readily_available_water(soil.p, taw);
    let fc = soil::field_capacity_depth(zr, soil.theta_fc);
    let wp = soil::wilting_point_depth(zr, soil.theta_wp);
    let critical = soil::critical_threshold(fc, wp, soil.p);

    // Day zero starts from an empty deficit, so this is 0 there
    // whatever the rain; later days draw on yesterday's close.
    let din = processes::starting_depletion(precip, state.ending_depletion);

    let ks = processes::stress_coefficient(din, taw, raw);
    let etc = processes::crop_et(eto, kc, ks);
    let irrigation = processes::irrigation_depth(din, raw, etc);
    let dp = processes::deep_percolation(precip, irrigation, state.crop_et, state.ending_depletion);
    let dfim = processes::ending_depletion(state.ending_depletion, precip, irrigation, etc, dp);

    let new_state = State {
        ending_depletion: dfim,
        crop_et: etc,
    };

    let fluxes = DailyFluxes {
        eto,
        precipitation: precip,
        kc,
        zr,
        taw,
        raw,
        starting_depletion: din,
        ending_depletion: dfim,
        ks,
        irrigation,
        deep_percolation: dp,
        crop_et: etc,
        field_capacity: fc,
        wilting_point: wp,
        critical_threshold: critical,
        soil_water: fc - din,
    };

    (new_state, fluxes)
}

/// Run the balance over the full cultivation window.
///
/// Both weather series must cover `[planting, planting + total - 1]`
/// with a sample on every day; the run fails before any state is
/// created otherwise. The result is fully materialized and in date
/// order — re-run from day zero to change any upstream parameter.
pub fn run(
    soil: &SoilProfile,
    crop: &CropProfile,
    precip_series: &DailySeries,
    eto_series: &DailySeries,
    planting: NaiveDate,
) -> Result<DailyTimeseries, BalanceError> {
    let total = crop.total_days();
    if total == 0 {
        return Ok(DailyTimeseries::with_capacity(0));
    }
    let end = planting + chrono::Days::new(u64::from(total - 1));
    let precip = precip_series.slice_window("precipitation", planting, end)?;
    let eto = eto_series.slice_window("ETo", planting, end)?;
    if precip.len() != eto.len() {
        return Err(BalanceError::Alignment {
            precip_len: precip.len(),
            eto_len: eto.len(),
        });
    }

    info!(crop = %crop.name, days = precip.len(), %planting, "starting water-balance run");

    let mut state = State::initialize();
    let mut outputs = DailyTimeseries::with_capacity(precip.len());

    for (day, (&p, &e)) in precip.iter().zip(eto).enumerate() {
        let (new_state, fluxes) = step(&state, soil, crop, day as i64, p, e);
        if fluxes.irrigation > 0.0 {
            debug!(day, depth_mm = fluxes.irrigation, "irrigation event");
        }
        outputs.push(&fluxes);
        state = new_state;
    }

    let summary = outputs.summary();
    info!(
        total_irrigation_mm = summary.total_irrigation,
        events = summary.irrigation_events,
        "run complete"
    );
    Ok(outputs)
}

/// Run from a `WeatherSource` instead of loose series.
pub fn run_with_source<W: WeatherSource>(
    soil: &SoilProfile,
    crop: &CropProfile,
    source: &W,
    planting: NaiveDate,
) -> Result<DailyTimeseries, BalanceError> {
    run(soil, crop, source.precipitation(), source.eto(), planting)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crop::{PhaseFlags, PhaseLengths, StageCurve};
    use crate::forcing::MemoryWeather;
    use approx::assert_relative_eq;

    fn test_soil() -> SoilProfile {
        SoilProfile::new(0.23, 0.10, 0.5).unwrap()
    }

    fn test_crop() -> CropProfile {
        let phases = PhaseLengths {
            initial: 20,
            development: 30,
            mid: 40,
            late: 10,
        };
        let kc = StageCurve {
            initial: 0.4,
            mid: 1.15,
            late: 0.4,
            constant: PhaseFlags::STANDARD,
        };
        let zr = StageCurve {
            initial: 0.2,
            mid: 0.5,
            late: 0.5,
            constant: PhaseFlags::STANDARD,
        };
        CropProfile::new("maize", phases, 100, kc, zr).unwrap()
    }

    fn planting() -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 10, 1).unwrap()
    }

    fn dry_season() -> (DailySeries, DailySeries) {
        let p = DailySeries::from_start(planting(), vec![0.0; 100]).unwrap();
        let e = DailySeries::from_start(planting(), vec![5.0; 100]).unwrap();
        (p, e)
    }

    fn rainy_season() -> (DailySeries, DailySeries) {
        let rain: Vec<f64> = (0..100).map(|d| if d % 3 == 0 { 12.0 } else { 0.0 }).collect();
        let p = DailySeries::from_start(planting(), rain).unwrap();
        let e = DailySeries::from_start(planting(), vec![4.0; 100]).unwrap();
        (p, e)
    }

    #[test]
    fn run_produces_one_record_per_day() {
        let (p, e) = dry_season();
        let out = run(&test_soil(), &test_crop(), &p, &e, planting()).unwrap();
        assert_eq!(out.len(), 100);
    }

    #[test]
    fn day_zero_starts_at_zero_depletion_even_with_rain() {
        let mut rain = vec![0.0; 100];
        rain[0] = 25.0;
        let p = DailySeries::from_start(planting(), rain).unwrap();
        let e = DailySeries::from_start(planting(), vec![5.0; 100]).unwrap();
        let out = run(&test_soil(), &test_crop(), &p, &e, planting()).unwrap();
        assert_eq!(out.starting_depletion[0], 0.0);
    }

    #[test]
    fn run_all_outputs_finite() {
        // A high availability factor keeps RAW close to TAW; the
        // stress branch must still divide by a nonzero margin.
        let soil = SoilProfile::new(0.23, 0.10, 0.95).unwrap();
        let (p, e) = dry_season();
        let out = run(&soil, &test_crop(), &p, &e, planting()).unwrap();
        for day in 0..out.len() {
            assert!(out.ks[day].is_finite(), "non-finite Ks on day {day}");
            assert!(out.crop_et[day].is_finite(), "non-finite ETc on day {day}");
            assert!(
                out.irrigation[day].is_finite(),
                "non-finite irrigation on day {day}"
            );
            assert!(out.ending_depletion[day].is_finite());
        }
    }

    #[test]
    fn ending_depletion_never_negative() {
        for (p, e) in [dry_season(), rainy_season()] {
            let out = run(&test_soil(), &test_crop(), &p, &e, planting()).unwrap();
            for (day, d) in out.ending_depletion.iter().enumerate() {
                assert!(*d >= 0.0, "negative depletion on day {day}");
            }
        }
    }

    #[test]
    fn no_stress_while_depletion_below_raw() {
        let (p, e) = rainy_season();
        let out = run(&test_soil(), &test_crop(), &p, &e, planting()).unwrap();
        for day in 0..out.len() {
            if out.starting_depletion[day] < out.raw[day] {
                assert_eq!(out.ks[day], 1.0, "Ks != 1 on unstressed day {day}");
            }
        }
    }

    #[test]
    fn dry_season_triggers_demand_driven_irrigation() {
        let (p, e) = dry_season();
        let out = run(&test_soil(), &test_crop(), &p, &e, planting()).unwrap();
        let summary = out.summary();
        assert!(summary.irrigation_events > 0, "dry season must irrigate");
        // Each application refills the deficit plus that day's demand.
        for day in 0..out.len() {
            if out.irrigation[day] > 0.0 {
                assert_relative_eq!(
                    out.irrigation[day],
                    out.starting_depletion[day] + out.crop_et[day],
                    max_relative = 1e-12
                );
            }
        }
    }

    #[test]
    fn irrigation_waits_until_raw_is_depleted() {
        let (p, e) = dry_season();
        let out = run(&test_soil(), &test_crop(), &p, &e, planting()).unwrap();
        for day in 0..out.len() {
            if out.starting_depletion[day] < out.raw[day] {
                assert_eq!(out.irrigation[day], 0.0);
            }
        }
    }

    #[test]
    fn soil_water_is_fc_minus_starting_depletion() {
        let (p, e) = dry_season();
        let out = run(&test_soil(), &test_crop(), &p, &e, planting()).unwrap();
        for day in 0..out.len() {
            assert_relative_eq!(
                out.soil_water[day],
                out.field_capacity[day] - out.starting_depletion[day],
                max_relative = 1e-12
            );
        }
    }

    #[test]
    fn run_is_idempotent() {
        let (p, e) = rainy_season();
        let a = run(&test_soil(), &test_crop(), &p, &e, planting()).unwrap();
        let b = run(&test_soil(), &test_crop(), &p, &e, planting()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn fails_when_series_starts_too_late() {
        let late_start = planting() + chrono::Days::new(1);
        let p = DailySeries::from_start(late_start, vec![0.0; 100]).unwrap();
        let e = DailySeries::from_start(planting(), vec![5.0; 100]).unwrap();
        let err = run(&test_soil(), &test_crop(), &p, &e, planting());
        assert!(matches!(
            err,
            Err(BalanceError::InsufficientData { series: "precipitation", .. })
        ));
    }

    #[test]
    fn fails_when_series_ends_too_early() {
        let p = DailySeries::from_start(planting(), vec![0.0; 100]).unwrap();
        let e = DailySeries::from_start(planting(), vec![5.0; 99]).unwrap();
        let err = run(&test_soil(), &test_crop(), &p, &e, planting());
        assert!(matches!(
            err,
            Err(BalanceError::InsufficientData { series: "ETo", .. })
        ));
    }

    #[test]
    fn oversized_series_are_sliced_to_the_window() {
        let wide_start = planting() - chrono::Days::new(30);
        let p = DailySeries::from_start(wide_start, vec![0.0; 200]).unwrap();
        let e = DailySeries::from_start(wide_start, vec![5.0; 200]).unwrap();
        let out = run(&test_soil(), &test_crop(), &p, &e, planting()).unwrap();
        assert_eq!(out.len(), 100);
    }

    #[test]
    fn run_with_source_matches_run() {
        let (p, e) = rainy_season();
        let direct = run(&test_soil(), &test_crop(), &p, &e, planting()).unwrap();
        let weather = MemoryWeather::new(p, e);
        let via_source = run_with_source(&test_soil(), &test_crop(), &weather, planting()).unwrap();
        assert_eq!(direct, via_source);
    }
}
