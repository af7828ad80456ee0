use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Row;

use std::sync::Arc;

use crate::{
    error::EngineError,
    timing::{closure::TemporaryClosure, day_schedule::DaySchedule},
};

/// The default weekly schedule, written once when the store is empty.
/// Sunday opens later; Saturday closes later.
const DEFAULT_HOURS: [(u32, &str, &str); 7] = [
    (0, "16:00", "20:30"),
    (1, "11:30", "20:30"),
    (2, "11:30", "20:30"),
    (3, "11:30", "20:30"),
    (4, "11:30", "20:30"),
    (5, "11:30", "20:30"),
    (6, "11:30", "21:00"),
];

pub struct SqliteDatabase {}

impl SqliteDatabase {
    /**
    Create the schedule tables and seed them on first boot.

    The weekly hours are only written when the table is empty; the
    closure singleton is inserted with OR IGNORE so an existing record
    is never overwritten. Safe to call on every startup.
    */
    pub fn setup(
        connection_pool: &Arc<Pool<SqliteConnectionManager>>,
        seeded_at: &str,
    ) -> Result<(), EngineError> {
        let connection = connection_pool.get()?;
        Self::create_tables(&connection)?;
        Self::seed_defaults(&connection, seeded_at)?;
        Ok(())
    }

    /**
    Get the schedule for one day of the week (0 = Sunday .. 6 = Saturday).

    Returns an `Ok(None)` when no row exists for that day.
    */
    pub fn query_day_schedule(
        connection: &PooledConnection<SqliteConnectionManager>,
        day_of_week: u32,
    ) -> rusqlite::Result<Option<DaySchedule>> {
        let mut statement = connection.prepare(
            "SELECT day_of_week, open_time, close_time, is_closed, is_holiday, holiday_name
             FROM business_hours WHERE day_of_week = ?1",
        )?;
        let mut rows = statement.query(rusqlite::params![day_of_week])?;
        match rows.next()? {
            Some(row) => Ok(Some(Self::day_schedule_from_row(row)?)),
            None => Ok(None),
        }
    }

    /**
    Get all seven day schedules, ordered by day of week.

    Used by the administrative view; the status path only ever reads
    single days.
    */
    pub fn query_all_day_schedules(
        connection: &PooledConnection<SqliteConnectionManager>,
    ) -> rusqlite::Result<Vec<DaySchedule>> {
        let mut statement = connection.prepare(
            "SELECT day_of_week, open_time, close_time, is_closed, is_holiday, holiday_name
             FROM business_hours ORDER BY day_of_week ASC",
        )?;
        let rows = statement.query_map((), Self::day_schedule_from_row)?;

        let mut schedules: Vec<DaySchedule> = Vec::new();
        for row in rows {
            schedules.push(row?);
        }
        Ok(schedules)
    }

    /**
    Get the temporary-closure singleton.

    The record is seeded at startup, so a missing row means the store is
    in an unexpected state and surfaces as `QueryReturnedNoRows`; the
    status path turns that into a fail-closed answer.
    */
    pub fn query_temporary_closure(
        connection: &PooledConnection<SqliteConnectionManager>,
    ) -> rusqlite::Result<TemporaryClosure> {
        connection.query_row(
            "SELECT is_closed, reason, last_updated FROM temporary_closure WHERE id = 0",
            (),
            |row| {
                Ok(TemporaryClosure {
                    is_closed: row.get(0)?,
                    reason: row.get(1)?,
                    last_updated: row.get(2)?,
                })
            },
        )
    }

    /**
    Write one day's schedule, replacing whatever was there before.

    Last write wins per day; the write succeeds whether or not the row
    previously existed.
    */
    pub fn upsert_day_schedule(
        connection: &PooledConnection<SqliteConnectionManager>,
        schedule: &DaySchedule,
    ) -> rusqlite::Result<()> {
        connection.execute(
            "INSERT INTO business_hours
                 (day_of_week, open_time, close_time, is_closed, is_holiday, holiday_name)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(day_of_week) DO UPDATE SET
                 open_time = excluded.open_time,
                 close_time = excluded.close_time,
                 is_closed = excluded.is_closed,
                 is_holiday = excluded.is_holiday,
                 holiday_name = excluded.holiday_name",
            rusqlite::params![
                schedule.day_of_week,
                schedule.open_time,
                schedule.close_time,
                schedule.is_closed,
                schedule.is_holiday,
                schedule.holiday_name,
            ],
        )?;
        Ok(())
    }

    /**
    Flip the temporary-closure singleton.
    */
    pub fn upsert_temporary_closure(
        connection: &PooledConnection<SqliteConnectionManager>,
        is_closed: bool,
        reason: Option<&str>,
        last_updated: &str,
    ) -> rusqlite::Result<()> {
        connection.execute(
            "INSERT INTO temporary_closure (id, is_closed, reason, last_updated)
             VALUES (0, ?1, ?2, ?3)
             ON CONFLICT(id) DO UPDATE SET
                 is_closed = excluded.is_closed,
                 reason = excluded.reason,
                 last_updated = excluded.last_updated",
            rusqlite::params![is_closed, reason, last_updated],
        )?;
        Ok(())
    }

    fn day_schedule_from_row(row: &Row) -> rusqlite::Result<DaySchedule> {
        Ok(DaySchedule {
            day_of_week: row.get(0)?,
            open_time: row.get(1)?,
            close_time: row.get(2)?,
            is_closed: row.get(3)?,
            is_holiday: row.get(4)?,
            holiday_name: row.get(5)?,
        })
    }

    fn create_tables(
        connection: &PooledConnection<SqliteConnectionManager>,
    ) -> rusqlite::Result<()> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS business_hours (
                day_of_week INTEGER PRIMARY KEY,
                open_time TEXT,
                close_time TEXT,
                is_closed INTEGER NOT NULL DEFAULT 0,
                is_holiday INTEGER NOT NULL DEFAULT 0,
                holiday_name TEXT
            )",
            (),
        )?;
        connection.execute(
            "CREATE TABLE IF NOT EXISTS temporary_closure (
                id INTEGER PRIMARY KEY CHECK (id = 0),
                is_closed INTEGER NOT NULL,
                reason TEXT,
                last_updated TEXT NOT NULL
            )",
            (),
        )?;
        Ok(())
    }

    fn seed_defaults(
        connection: &PooledConnection<SqliteConnectionManager>,
        seeded_at: &str,
    ) -> rusqlite::Result<()> {
        let existing: i64 =
            connection.query_row("SELECT COUNT(*) FROM business_hours", (), |row| row.get(0))?;
        if existing == 0 {
            for (day_of_week, open_time, close_time) in DEFAULT_HOURS {
                let schedule = DaySchedule::new_open(day_of_week, open_time, close_time);
                Self::upsert_day_schedule(connection, &schedule)?;
            }
        }

        connection.execute(
            "INSERT OR IGNORE INTO temporary_closure (id, is_closed, reason, last_updated)
             VALUES (0, 0, NULL, ?1)",
            rusqlite::params![seeded_at],
        )?;
        Ok(())
    }
}
