use super::file::parse_date;
use super::{PersistenceResult, TimetableStore};
use crate::week::WeekdayError;
use crate::{ClockTime, Interval, Timetable, WeekdaySet};
use parking_lot::Mutex;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef};
use rusqlite::{Connection, ToSql, params};

/// Weekday sets are stored as their binary-digit text (`"1001001"`).
impl ToSql for WeekdaySet {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.to_bitstring()))
    }
}

impl FromSql for WeekdaySet {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let ValueRef::Text(raw) = value else {
            return Err(FromSqlError::Other(Box::new(WeekdayError::NotString)));
        };
        let raw = std::str::from_utf8(raw).map_err(|err| FromSqlError::Other(Box::new(err)))?;
        raw.parse()
            .map_err(|err: WeekdayError| FromSqlError::Other(Box::new(err)))
    }
}

impl ToSql for ClockTime {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(format!("{self:#}")))
    }
}

impl FromSql for ClockTime {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let raw = value.as_str()?;
        raw.parse()
            .map_err(|err: crate::ClockError| FromSqlError::Other(Box::new(err)))
    }
}

pub struct SqliteTimetableStore {
    connection: Mutex<Connection>,
}

impl SqliteTimetableStore {
    pub fn new<P: AsRef<std::path::Path>>(path: P) -> PersistenceResult<Self> {
        let connection = Connection::open(path)?;
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    pub fn in_memory() -> PersistenceResult<Self> {
        let connection = Connection::open_in_memory()?;
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn initialize_schema(connection: &Connection) -> PersistenceResult<()> {
        let ddl = r#"
            CREATE TABLE IF NOT EXISTS intervals (
                position INTEGER PRIMARY KEY,
                label TEXT,
                start_date TEXT,
                end_date TEXT,
                start_clock TEXT NOT NULL,
                end_clock TEXT NOT NULL,
                weekdays TEXT NOT NULL
            );
        "#;
        connection.execute_batch(ddl)?;
        Ok(())
    }

    fn save_intervals(
        &self,
        tx: &rusqlite::Transaction,
        timetable: &Timetable,
    ) -> PersistenceResult<()> {
        tx.execute("DELETE FROM intervals", [])?;
        let mut stmt = tx.prepare(
            "INSERT INTO intervals (position, label, start_date, end_date, start_clock, end_clock, weekdays)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )?;
        for (position, interval) in timetable.iter().enumerate() {
            stmt.execute(params![
                position as i64,
                interval.label(),
                optional_date(interval.start_date()),
                optional_date(interval.end_date()),
                interval.start_clock(),
                interval.end_clock(),
                interval.weekdays(),
            ])?;
        }
        Ok(())
    }
}

fn optional_date(date: Option<&chrono::DateTime<chrono_tz::Tz>>) -> Option<String> {
    date.map(|d| d.to_rfc3339())
}

struct IntervalRow {
    label: Option<String>,
    start_date: Option<String>,
    end_date: Option<String>,
    start_clock: ClockTime,
    end_clock: ClockTime,
    weekdays: WeekdaySet,
}

impl IntervalRow {
    fn into_interval(self) -> PersistenceResult<Interval> {
        let mut builder = Interval::builder()
            .clock(self.start_clock, self.end_clock)
            .weekday_set(self.weekdays);
        if let Some(label) = self.label {
            builder = builder.label(label);
        }
        if let Some(start) = parse_date(self.start_date.as_deref().unwrap_or_default())? {
            builder = builder.start_date(start);
        }
        if let Some(end) = parse_date(self.end_date.as_deref().unwrap_or_default())? {
            builder = builder.end_date(end);
        }
        Ok(builder.build())
    }
}

impl TimetableStore for SqliteTimetableStore {
    fn save_timetable(&self, timetable: &Timetable) -> PersistenceResult<()> {
        let mut conn = self.connection.lock();
        let tx = conn.transaction()?;
        self.save_intervals(&tx, timetable)?;
        tx.commit()?;
        tracing::debug!(intervals = timetable.len(), "timetable saved to sqlite");
        Ok(())
    }

    fn load_timetable(&self) -> PersistenceResult<Option<Timetable>> {
        let conn = self.connection.lock();
        let mut stmt = conn.prepare(
            "SELECT label, start_date, end_date, start_clock, end_clock, weekdays
             FROM intervals ORDER BY position ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(IntervalRow {
                label: row.get(0)?,
                start_date: row.get(1)?,
                end_date: row.get(2)?,
                start_clock: row.get(3)?,
                end_clock: row.get(4)?,
                weekdays: row.get(5)?,
            })
        })?;

        let mut timetable = Timetable::new();
        for row in rows {
            timetable.push(row?.into_interval()?);
        }

        if timetable.is_empty() {
            tracing::debug!("no timetable stored in sqlite");
            return Ok(None);
        }
        tracing::debug!(intervals = timetable.len(), "timetable loaded from sqlite");
        Ok(Some(timetable))
    }
}
