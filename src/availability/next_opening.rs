use chrono::{DateTime, Datelike, NaiveTime};
use chrono_tz::Tz;
use r2d2::PooledConnection;
use r2d2_sqlite::SqliteConnectionManager;

use crate::{database::sqlite::SqliteDatabase, TIME_FORMAT};

pub const WEEKDAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// The first moment inside the 7-day horizon at which the business will
/// accept orders again. `day_offset` counts days forward from today in
/// the business timezone; label rendering is a separate step so callers
/// can also consume this as data.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NextOpening {
    pub day_offset: u32,
    pub day_of_week: u32,
    pub open_time: NaiveTime,
}

/// Walk forward at most one week looking for the next day that opens.
///
/// Days that are missing, closed, on holiday, or without a parseable
/// opening time are skipped. Today only counts while its opening time is
/// still strictly ahead: a day that already opened must not come back
/// as "Today". `None` means nothing in the horizon opens, which is a
/// valid terminal state for a fully closed week.
pub fn project_next_opening(
    connection: &PooledConnection<SqliteConnectionManager>,
    now: DateTime<Tz>,
) -> rusqlite::Result<Option<NextOpening>> {
    let current_day = now.weekday().num_days_from_sunday();
    let current_time = now.time();

    for day_offset in 0..7 {
        let check_day = (current_day + day_offset) % 7;
        let Some(schedule) = SqliteDatabase::query_day_schedule(connection, check_day)? else {
            continue;
        };
        if schedule.is_closed || schedule.is_holiday {
            continue;
        }
        let Some(open_time) = schedule.opening_time() else {
            continue;
        };
        if day_offset == 0 && open_time <= current_time {
            continue;
        }
        return Ok(Some(NextOpening {
            day_offset,
            day_of_week: check_day,
            open_time,
        }));
    }

    Ok(None)
}

pub fn render_label(next: &NextOpening) -> String {
    let open_time = next.open_time.format(TIME_FORMAT);
    match next.day_offset {
        0 => format!("Today at {}", open_time),
        1 => format!("Tomorrow at {}", open_time),
        _ => format!("{} at {}", WEEKDAY_NAMES[next.day_of_week as usize], open_time),
    }
}
