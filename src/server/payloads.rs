use serde::{Deserialize, Serialize};

use crate::timing::{closure::TemporaryClosure, day_schedule::DaySchedule};

/// Admin view of the whole configuration: the seven day rows plus the
/// closure singleton.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HoursOverview {
    pub business_hours: Vec<DaySchedule>,
    pub temporary_closure: TemporaryClosure,
}

/// One day's schedule as submitted by the admin screen. Field names
/// mirror the stored record; omitted flags default to off.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoursUpdate {
    pub day_of_week: u32,
    #[serde(default)]
    pub open_time: Option<String>,
    #[serde(default)]
    pub close_time: Option<String>,
    #[serde(default)]
    pub is_closed: bool,
    #[serde(default)]
    pub is_holiday: bool,
    #[serde(default)]
    pub holiday_name: Option<String>,
}

impl HoursUpdate {
    pub fn into_schedule(self) -> DaySchedule {
        DaySchedule {
            day_of_week: self.day_of_week,
            open_time: self.open_time,
            close_time: self.close_time,
            is_closed: self.is_closed,
            is_holiday: self.is_holiday,
            holiday_name: self.holiday_name,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClosureUpdate {
    pub is_closed: bool,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Serialize)]
pub struct UpdateOutcome {
    pub success: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hours_update_accepts_the_wire_field_names() {
        let update: HoursUpdate = serde_json::from_str(
            r#"{"dayOfWeek": 2, "openTime": "11:30", "closeTime": "20:30", "isHoliday": true, "holidayName": "Boxing Day"}"#,
        )
        .unwrap();

        let schedule = update.into_schedule();
        assert_eq!(schedule.day_of_week, 2);
        assert_eq!(schedule.open_time.as_deref(), Some("11:30"));
        assert!(!schedule.is_closed);
        assert!(schedule.is_holiday);
        assert_eq!(schedule.holiday_name.as_deref(), Some("Boxing Day"));
    }

    #[test]
    fn closure_update_reason_is_optional() {
        let update: ClosureUpdate = serde_json::from_str(r#"{"isClosed": true}"#).unwrap();
        assert!(update.is_closed);
        assert_eq!(update.reason, None);
    }
}
