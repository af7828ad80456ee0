use chrono_tz::Tz;

use crate::error::EngineError;

/// Runtime configuration, read once at startup.
///
/// Every time-of-day comparison in the engine happens in the single
/// configured civil zone, never in the zone the host clock runs in.
#[derive(Clone, Debug)]
pub struct Config {
    pub timezone: Tz,
    pub bind_address: String,
    pub database_path: String,
}

impl Config {
    pub fn from_env() -> Result<Self, EngineError> {
        dotenvy::dotenv().ok();

        let timezone = std::env::var("BUSINESS_TIMEZONE").unwrap_or_else(|_| "Europe/London".to_string());
        let timezone: Tz = timezone
            .parse()
            .map_err(|_| EngineError::Config(format!("unrecognized BUSINESS_TIMEZONE '{}'", timezone)))?;

        Ok(Self {
            timezone,
            bind_address: std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "127.0.0.1:7878".to_string()),
            database_path: std::env::var("DATABASE_PATH").unwrap_or_else(|_| "data.db".to_string()),
        })
    }
}
