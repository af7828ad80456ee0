use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::TIME_FORMAT;

/// One row of the recurring weekly schedule, keyed by day of week
/// (0 = Sunday .. 6 = Saturday).
///
/// Times stay in their stored "HH:MM" form and are parsed at evaluation,
/// so a malformed value degrades to "day not configured" instead of
/// failing the whole read. When `is_closed` or `is_holiday` is set the
/// times are never consulted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySchedule {
    pub day_of_week: u32,
    pub open_time: Option<String>,
    pub close_time: Option<String>,
    pub is_closed: bool,
    pub is_holiday: bool,
    pub holiday_name: Option<String>,
}

impl DaySchedule {
    pub fn new_open(day_of_week: u32, open_time: &str, close_time: &str) -> Self {
        Self {
            day_of_week,
            open_time: Some(open_time.to_string()),
            close_time: Some(close_time.to_string()),
            is_closed: false,
            is_holiday: false,
            holiday_name: None,
        }
    }

    pub fn opening_time(&self) -> Option<NaiveTime> {
        parse_time_of_day(self.open_time.as_deref()?)
    }

    pub fn closing_time(&self) -> Option<NaiveTime> {
        parse_time_of_day(self.close_time.as_deref()?)
    }

    /// Both ends of the day's window, or `None` when either is absent or
    /// unparseable.
    pub fn window(&self) -> Option<(NaiveTime, NaiveTime)> {
        Some((self.opening_time()?, self.closing_time()?))
    }
}

pub fn parse_time_of_day(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value, TIME_FORMAT).ok()
}
