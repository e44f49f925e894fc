//! Run-record persistence.
//!
//! One row per simulation run: identifying metadata, the profile
//! scalars, and every per-day vector as a little-endian f64 blob. The
//! column order and encoding are a durable contract shared with the
//! downstream planning tools — do not reorder.

use chrono::NaiveDate;
use rusqlite::{params, Connection};
use tracing::debug;

use crate::balance::outputs::DailyTimeseries;
use crate::crop::CropProfile;
use crate::error::BalanceError;
use crate::soil::SoilProfile;

/// One complete simulation run, ready to persist.
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub site: String,
    pub crop: CropProfile,
    pub soil: SoilProfile,
    pub planting: NaiveDate,
    pub results: DailyTimeseries,
}

/// Narrow seam over persistence so the engine stays storage-free.
pub trait RunStore {
    /// Persist one run atomically, returning its row id.
    fn save(&mut self, record: &RunRecord) -> Result<i64, BalanceError>;
}

const CREATE_TABLE: &str = "
CREATE TABLE IF NOT EXISTS balance_runs (
    id INTEGER PRIMARY KEY,
    site TEXT NOT NULL,
    crop TEXT NOT NULL,
    planting_date TEXT NOT NULL,
    kc_initial REAL NOT NULL,
    kc_mid REAL NOT NULL,
    kc_late REAL NOT NULL,
    zr_initial REAL NOT NULL,
    zr_mid REAL NOT NULL,
    zr_late REAL NOT NULL,
    len_initial INTEGER NOT NULL,
    len_development INTEGER NOT NULL,
    len_mid INTEGER NOT NULL,
    len_late INTEGER NOT NULL,
    p REAL NOT NULL,
    theta_fc REAL NOT NULL,
    theta_wp REAL NOT NULL,
    eto BLOB NOT NULL,
    precipitation BLOB NOT NULL,
    kc BLOB NOT NULL,
    zr BLOB NOT NULL,
    taw BLOB NOT NULL,
    raw BLOB NOT NULL,
    starting_depletion BLOB NOT NULL,
    ending_depletion BLOB NOT NULL,
    ks BLOB NOT NULL,
    irrigation BLOB NOT NULL,
    deep_percolation BLOB NOT NULL,
    crop_et BLOB NOT NULL,
    field_capacity BLOB NOT NULL,
    wilting_point BLOB NOT NULL,
    critical_threshold BLOB NOT NULL,
    soil_water BLOB NOT NULL
);
";

const INSERT_RUN: &str = "
INSERT INTO balance_runs (
    site, crop, planting_date,
    kc_initial, kc_mid, kc_late,
    zr_initial, zr_mid, zr_late,
    len_initial, len_development, len_mid, len_late,
    p, theta_fc, theta_wp,
    eto, precipitation, kc, zr, taw, raw,
    starting_depletion, ending_depletion, ks, irrigation,
    deep_percolation, crop_et, field_capacity, wilting_point,
    critical_threshold, soil_water
) VALUES (
    ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16,
    ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24, ?25, ?26, ?27, ?28, ?29, ?30,
    ?31, ?32
);
";

/// SQLite-backed run store. Only this type talks to the database.
pub struct SqliteRunStore {
    conn: Connection,
}

impl SqliteRunStore {
    /// Open (or create) the store at `path`.
    pub fn open(path: &str) -> Result<Self, BalanceError> {
        Ok(Self {
            conn: Connection::open(path)?,
        })
    }

    /// In-memory store, used in tests.
    pub fn in_memory() -> Result<Self, BalanceError> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
        })
    }

    /// Read back the per-day vectors of a persisted run.
    pub fn load_vectors(&self, id: i64) -> Result<DailyTimeseries, BalanceError> {
        let mut stmt = self.conn.prepare(
            "SELECT eto, precipitation, kc, zr, taw, raw,
                    starting_depletion, ending_depletion, ks, irrigation,
                    deep_percolation, crop_et, field_capacity, wilting_point,
                    critical_threshold, soil_water
             FROM balance_runs WHERE id = ?1",
        )?;
        let ts = stmt.query_row(params![id], |row| {
            let blob = |idx: usize| {
                let bytes: Vec<u8> = row.get(idx)?;
                decode_vector(&bytes).map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(
                        idx,
                        rusqlite::types::Type::Blob,
                        Box::new(e),
                    )
                })
            };
            Ok(DailyTimeseries {
                eto: blob(0)?,
                precipitation: blob(1)?,
                kc: blob(2)?,
                zr: blob(3)?,
                taw: blob(4)?,
                raw: blob(5)?,
                starting_depletion: blob(6)?,
                ending_depletion: blob(7)?,
                ks: blob(8)?,
                irrigation: blob(9)?,
                deep_percolation: blob(10)?,
                crop_et: blob(11)?,
                field_capacity: blob(12)?,
                wilting_point: blob(13)?,
                critical_threshold: blob(14)?,
                soil_water: blob(15)?,
            })
        })?;
        Ok(ts)
    }
}

impl RunStore for SqliteRunStore {
    fn save(&mut self, record: &RunRecord) -> Result<i64, BalanceError> {
        let r = &record.results;
        // Schema creation and insert commit together: a failure leaves
        // no half-recorded run behind.
        let tx = self.conn.transaction()?;
        tx.execute_batch(CREATE_TABLE)?;
        tx.execute(
            INSERT_RUN,
            params![
                record.site,
                record.crop.name,
                record.planting.to_string(),
                record.crop.kc.initial,
                record.crop.kc.mid,
                record.crop.kc.late,
                record.crop.zr.initial,
                record.crop.zr.mid,
                record.crop.zr.late,
                record.crop.phases.initial,
                record.crop.phases.development,
                record.crop.phases.mid,
                record.crop.phases.late,
                record.soil.p,
                record.soil.theta_fc,
                record.soil.theta_wp,
                encode_vector(&r.eto),
                encode_vector(&r.precipitation),
                encode_vector(&r.kc),
                encode_vector(&r.zr),
                encode_vector(&r.taw),
                encode_vector(&r.raw),
                encode_vector(&r.starting_depletion),
                encode_vector(&r.ending_depletion),
                encode_vector(&r.ks),
                encode_vector(&r.irrigation),
                encode_vector(&r.deep_percolation),
                encode_vector(&r.crop_et),
                encode_vector(&r.field_capacity),
                encode_vector(&r.wilting_point),
                encode_vector(&r.critical_threshold),
                encode_vector(&r.soil_water),
            ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;
        debug!(id, site = %record.site, "run persisted");
        Ok(id)
    }
}

/// Pack a float vector as fixed-width little-endian doubles.
pub fn encode_vector(values: &[f64]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(values.len() * 8);
    for v in values {
        buf.extend_from_slice(&v.to_le_bytes());
    }
    buf
}

/// Unpack a little-endian double buffer.
///
/// A well-formed buffer is always a whole number of eight-byte values;
/// anything else is corruption and must not read back as a shorter but
/// plausible vector.
pub fn decode_vector(buf: &[u8]) -> Result<Vec<f64>, BalanceError> {
    if buf.len() % 8 != 0 {
        return Err(BalanceError::InvalidSeries(format!(
            "blob length {} is not a whole number of eight-byte values",
            buf.len()
        )));
    }
    Ok(buf
        .chunks_exact(8)
        .map(|c| f64::from_le_bytes(c.try_into().unwrap()))
        .collect())
}
