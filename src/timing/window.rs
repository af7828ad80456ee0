use chrono::{NaiveTime, Timelike};

/// Whether `current` falls inside the open/close window, inclusive at both
/// ends.
///
/// A window whose close is numerically earlier than its open spans
/// midnight (open 22:00, close 02:00), in which case membership means
/// being after the open or before the close.
pub fn is_within_window(current: NaiveTime, open: NaiveTime, close: NaiveTime) -> bool {
    let current = minutes_since_midnight(current);
    let open = minutes_since_midnight(open);
    let close = minutes_since_midnight(close);

    if open <= close {
        open <= current && current <= close
    } else {
        current >= open || current <= close
    }
}

fn minutes_since_midnight(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}
