pub mod clock;
pub mod config;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod interval;
pub mod persistence;
pub mod timetable;
pub mod week;

pub use clock::{ClockError, ClockTime};
pub use config::{IntervalConfig, TimetableConfig};
pub use interval::{Interval, IntervalBuilder};
#[cfg(feature = "sqlite")]
pub use persistence::sqlite::SqliteTimetableStore;
pub use persistence::{
    PersistenceError, PersistenceResult, TimetableStore, load_timetable_from_csv,
    load_timetable_from_json, save_timetable_to_csv, save_timetable_to_json,
};
pub use timetable::Timetable;
pub use week::{WeekdayError, WeekdaySet};
