/// fao56-swb — FAO-56 crop soil-water balance in Rust.
///
/// Daily root-zone depletion accounting and demand-driven irrigation
/// scheduling following FAO Irrigation and Drainage Paper 56 (2006).
/// The crate consumes already-validated daily ETo and precipitation
/// series and produces a per-day irrigation schedule plus a persisted
/// run record.
pub mod balance;
pub mod config;
pub mod crop;
pub mod error;
pub mod forcing;
pub mod soil;
pub mod store;

pub use balance::outputs::{DailyFluxes, DailyTimeseries};
pub use balance::run::{run, run_with_source};
pub use crop::CropProfile;
pub use error::BalanceError;
pub use forcing::{DailySeries, WeatherSource};
pub use soil::SoilProfile;
pub use store::{RunRecord, RunStore, SqliteRunStore};
