//! Error taxonomy for the water-balance engine.
//!
//! Every failure is surfaced synchronously to the caller; a run either
//! yields a complete per-day sequence or one of these errors, never a
//! truncated result.

use chrono::NaiveDate;

/// Errors raised while preparing, running, or persisting a simulation.
#[derive(Debug)]
pub enum BalanceError {
    /// A weather series does not cover the cultivation window.
    InsufficientData {
        series: &'static str,
        from: NaiveDate,
        to: NaiveDate,
    },
    /// The sliced ETo and precipitation series disagree in length.
    Alignment { precip_len: usize, eto_len: usize },
    /// Profile parameters are internally inconsistent (phase lengths do
    /// not sum to the declared total, a stage flag leaves a day with no
    /// interpolation rule, or a soil fraction is out of range).
    InvalidProfile(String),
    /// An input series is malformed: unsorted or duplicate dates, or NaN.
    InvalidSeries(String),
    /// The storage write failed.
    Persistence(rusqlite::Error),
}

impl std::fmt::Display for BalanceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BalanceError::InsufficientData { series, from, to } => {
                write!(f, "{series} series does not cover {from}..={to}")
            }
            BalanceError::Alignment {
                precip_len,
                eto_len,
            } => {
                write!(
                    f,
                    "sliced series lengths disagree: precipitation {precip_len}, ETo {eto_len}"
                )
            }
            BalanceError::InvalidProfile(msg) => write!(f, "invalid profile: {msg}"),
            BalanceError::InvalidSeries(msg) => write!(f, "invalid series: {msg}"),
            BalanceError::Persistence(err) => write!(f, "persistence failure: {err}"),
        }
    }
}

impl std::error::Error for BalanceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BalanceError::Persistence(err) => Some(err),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for BalanceError {
    fn from(err: rusqlite::Error) -> Self {
        BalanceError::Persistence(err)
    }
}
