use crate::Timetable;
use crate::clock::ClockError;
use crate::week::WeekdayError;
use serde_json::Error as SerdeJsonError;
use std::io;

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("serialization error: {0}")]
    Serialization(#[from] SerdeJsonError),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[cfg(feature = "sqlite")]
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid clock: {0}")]
    Clock(#[from] ClockError),
    #[error("invalid weekdays: {0}")]
    Weekday(#[from] WeekdayError),
    #[error("invalid data: {0}")]
    InvalidData(String),
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

pub trait TimetableStore {
    fn save_timetable(&self, timetable: &Timetable) -> PersistenceResult<()>;
    fn load_timetable(&self) -> PersistenceResult<Option<Timetable>>;
}

pub mod file;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use file::{
    load_timetable_from_csv, load_timetable_from_json, save_timetable_to_csv,
    save_timetable_to_json,
};
