use chrono::{DateTime, Utc};
use chrono_tz::Tz;

/// The current instant in the business's civil timezone.
///
/// The zone comes from configuration, never from the host clock; every
/// day-of-week and time-of-day in the engine derives from this value.
pub fn business_now(timezone: Tz) -> DateTime<Tz> {
    Utc::now().with_timezone(&timezone)
}
