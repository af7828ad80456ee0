pub mod business_time;
pub mod closure;
pub mod day_schedule;
pub mod window;
