use chrono::{DateTime, Datelike};
use chrono_tz::Tz;
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;

use std::sync::Arc;

use crate::{
    availability::next_opening::{project_next_opening, render_label},
    availability::status::Status,
    database::sqlite::SqliteDatabase,
    timing::{business_time::business_now, window::is_within_window},
    TIME_FORMAT,
};

/// The single entry point the storefront queries before accepting an
/// order. Always comes back with a definite answer: any failure along
/// the way is logged and reported as closed.
pub fn current_status(connection_pool: &Arc<Pool<SqliteConnectionManager>>, timezone: Tz) -> Status {
    let now = business_now(timezone);

    let connection = match connection_pool.get() {
        Ok(connection) => connection,
        Err(err) => {
            tracing::error!("could not get a connection for the status query: {}", err);
            return Status::degraded(now.time().format(TIME_FORMAT).to_string());
        }
    };

    match resolve_status(&connection, now) {
        Ok(status) => status,
        Err(err) => {
            tracing::error!("status query failed, answering closed: {}", err);
            Status::degraded(now.time().format(TIME_FORMAT).to_string())
        }
    }
}

/// Evaluate the configuration at one instant, in strict precedence
/// order: the temporary-closure override first, then the day's closed
/// and holiday flags, then the time-of-day window. Recomputed on every
/// call; nothing here is cached.
pub fn resolve_status(
    connection: &PooledConnection<SqliteConnectionManager>,
    now: DateTime<Tz>,
) -> rusqlite::Result<Status> {
    let day_of_week = now.weekday().num_days_from_sunday();
    let current_time = now.time().format(TIME_FORMAT).to_string();

    let closure = SqliteDatabase::query_temporary_closure(connection)?;
    if closure.is_closed {
        let reason = closure
            .reason
            .unwrap_or_else(|| "Temporarily closed".to_string());
        let next_open_time = next_open_label(connection, now)?;
        return Ok(Status::temporarily_closed(current_time, reason, next_open_time));
    }

    let schedule = SqliteDatabase::query_day_schedule(connection, day_of_week)?;
    let schedule = match schedule {
        Some(schedule) if !schedule.is_closed && !schedule.is_holiday => schedule,
        Some(schedule) if schedule.is_holiday => {
            let reason = format!(
                "Closed for {}",
                schedule.holiday_name.as_deref().unwrap_or("holiday")
            );
            let next_open_time = next_open_label(connection, now)?;
            return Ok(Status::closed(current_time, reason, next_open_time));
        }
        _ => {
            let next_open_time = next_open_label(connection, now)?;
            return Ok(Status::closed(
                current_time,
                "Closed today".to_string(),
                next_open_time,
            ));
        }
    };

    match schedule.window() {
        Some((open, close)) if is_within_window(now.time(), open, close) => {
            Ok(Status::open(current_time))
        }
        _ => {
            let next_open_time = next_open_label(connection, now)?;
            Ok(Status::closed(
                current_time,
                "Currently closed".to_string(),
                next_open_time,
            ))
        }
    }
}

fn next_open_label(
    connection: &PooledConnection<SqliteConnectionManager>,
    now: DateTime<Tz>,
) -> rusqlite::Result<Option<String>> {
    Ok(project_next_opening(connection, now)?.map(|next| render_label(&next)))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::timing::day_schedule::DaySchedule;

    fn memory_pool() -> Arc<Pool<SqliteConnectionManager>> {
        let manager = SqliteConnectionManager::memory();
        let pool = r2d2::Pool::builder().max_size(1).build(manager).unwrap();
        Arc::new(pool)
    }

    fn seeded_pool() -> Arc<Pool<SqliteConnectionManager>> {
        let pool = memory_pool();
        SqliteDatabase::setup(&pool, "2024-07-01T00:00:00").unwrap();
        pool
    }

    fn london() -> Tz {
        "Europe/London".parse().unwrap()
    }

    // 2024-07-01 was a Monday.
    fn monday_at(hour: u32, minute: u32) -> DateTime<Tz> {
        london()
            .with_ymd_and_hms(2024, 7, 1, hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn open_within_the_monday_window() {
        let pool = seeded_pool();
        let connection = pool.get().unwrap();

        let status = resolve_status(&connection, monday_at(14, 0)).unwrap();
        assert!(status.is_open);
        assert!(!status.is_temporarily_closed);
        assert_eq!(status.closure_reason, None);
        assert_eq!(status.next_open_time, None);
        assert_eq!(status.current_time, "14:00");
    }

    #[test]
    fn closed_after_hours_with_a_projection() {
        let pool = seeded_pool();
        let connection = pool.get().unwrap();

        let status = resolve_status(&connection, monday_at(21, 0)).unwrap();
        assert!(!status.is_open);
        assert_eq!(status.closure_reason.as_deref(), Some("Currently closed"));
        assert_eq!(status.next_open_time.as_deref(), Some("Tomorrow at 11:30"));
    }

    #[test]
    fn opening_minute_is_inclusive() {
        let pool = seeded_pool();
        let connection = pool.get().unwrap();

        let monday = DaySchedule::new_open(1, "09:00", "17:00");
        SqliteDatabase::upsert_day_schedule(&connection, &monday).unwrap();

        let status = resolve_status(&connection, monday_at(9, 0)).unwrap();
        assert!(status.is_open);

        let status = resolve_status(&connection, monday_at(17, 0)).unwrap();
        assert!(status.is_open);
    }

    #[test]
    fn temporary_closure_wins_over_an_open_calendar() {
        let pool = seeded_pool();
        let connection = pool.get().unwrap();

        SqliteDatabase::upsert_temporary_closure(
            &connection,
            true,
            Some("Plumbing emergency"),
            "2024-07-01T08:00:00",
        )
        .unwrap();

        let status = resolve_status(&connection, monday_at(14, 0)).unwrap();
        assert!(!status.is_open);
        assert!(status.is_temporarily_closed);
        assert_eq!(status.closure_reason.as_deref(), Some("Plumbing emergency"));
    }

    #[test]
    fn temporary_closure_without_a_reason_gets_the_generic_one() {
        let pool = seeded_pool();
        let connection = pool.get().unwrap();

        SqliteDatabase::upsert_temporary_closure(&connection, true, None, "2024-07-01T08:00:00")
            .unwrap();

        let status = resolve_status(&connection, monday_at(14, 0)).unwrap();
        assert_eq!(status.closure_reason.as_deref(), Some("Temporarily closed"));
    }

    #[test]
    fn holiday_wins_over_the_times_on_the_row() {
        let pool = seeded_pool();
        let connection = pool.get().unwrap();

        let mut monday = DaySchedule::new_open(1, "11:30", "20:30");
        monday.is_holiday = true;
        monday.holiday_name = Some("Bank Holiday".to_string());
        SqliteDatabase::upsert_day_schedule(&connection, &monday).unwrap();

        let status = resolve_status(&connection, monday_at(14, 0)).unwrap();
        assert!(!status.is_open);
        assert!(!status.is_temporarily_closed);
        assert_eq!(
            status.closure_reason.as_deref(),
            Some("Closed for Bank Holiday")
        );
    }

    #[test]
    fn unnamed_holiday_reads_as_plain_holiday() {
        let pool = seeded_pool();
        let connection = pool.get().unwrap();

        let mut monday = DaySchedule::new_open(1, "11:30", "20:30");
        monday.is_holiday = true;
        SqliteDatabase::upsert_day_schedule(&connection, &monday).unwrap();

        let status = resolve_status(&connection, monday_at(14, 0)).unwrap();
        assert_eq!(status.closure_reason.as_deref(), Some("Closed for holiday"));
    }

    #[test]
    fn standing_closure_reads_as_closed_today() {
        let pool = seeded_pool();
        let connection = pool.get().unwrap();

        let mut monday = DaySchedule::new_open(1, "11:30", "20:30");
        monday.is_closed = true;
        SqliteDatabase::upsert_day_schedule(&connection, &monday).unwrap();

        let status = resolve_status(&connection, monday_at(14, 0)).unwrap();
        assert!(!status.is_open);
        assert_eq!(status.closure_reason.as_deref(), Some("Closed today"));
    }

    #[test]
    fn overnight_hours_stay_open_past_midnight() {
        let pool = seeded_pool();
        let connection = pool.get().unwrap();

        let monday = DaySchedule::new_open(1, "22:00", "02:00");
        SqliteDatabase::upsert_day_schedule(&connection, &monday).unwrap();

        let status = resolve_status(&connection, monday_at(23, 30)).unwrap();
        assert!(status.is_open);

        let status = resolve_status(&connection, monday_at(10, 0)).unwrap();
        assert!(!status.is_open);
    }

    #[test]
    fn repeated_queries_agree_when_nothing_changes() {
        let pool = seeded_pool();
        let connection = pool.get().unwrap();

        let first = resolve_status(&connection, monday_at(14, 0)).unwrap();
        let second = resolve_status(&connection, monday_at(14, 0)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn fully_closed_week_has_no_projection() {
        let pool = seeded_pool();
        let connection = pool.get().unwrap();

        for day_of_week in 0..7 {
            let mut schedule = DaySchedule::new_open(day_of_week, "11:30", "20:30");
            schedule.is_closed = true;
            SqliteDatabase::upsert_day_schedule(&connection, &schedule).unwrap();
        }

        let status = resolve_status(&connection, monday_at(14, 0)).unwrap();
        assert!(!status.is_open);
        assert_eq!(status.next_open_time, None);
    }

    #[test]
    fn unreadable_store_answers_closed() {
        // No tables at all: every read fails, the caller still gets a
        // definite closed answer.
        let pool = memory_pool();

        let status = current_status(&pool, london());
        assert!(!status.is_open);
        assert!(!status.is_temporarily_closed);
        assert_eq!(
            status.closure_reason.as_deref(),
            Some("Unable to determine status")
        );
        assert_eq!(status.next_open_time, None);
    }
}
