//! Configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use chrono_tz::Tz;

/// Service configuration outside the mail and weather connections, which
/// load their own settings.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// SQLite database URL or path.
    pub database_url: String,
    /// Timezone for users whose location has none.
    pub default_timezone: String,
    /// Delay between inbox polls.
    pub poll_interval: Duration,
    /// Local hour at which digests go out.
    pub digest_hour: u32,
    /// Delay between checks for due digests.
    pub digest_check_interval: Duration,
    /// Days to keep processed-message ledger entries.
    pub ledger_retention_days: u32,
    /// Directory with per-language message overrides.
    pub messages_dir: Option<PathBuf>,
    /// Directory with per-language name day calendars.
    pub namedays_dir: Option<PathBuf>,
    /// Log replies and digests instead of sending them.
    pub dry_run: bool,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `SQLITE_PATH` | SQLite database URL or path | `./data/app.db` |
    /// | `TZ` | Default timezone | `Europe/Bratislava` |
    /// | `POLL_INTERVAL_SECS` | Inbox poll interval | `60` |
    /// | `DIGEST_HOUR` | Local hour for digests (0-23) | `5` |
    /// | `DIGEST_CHECK_INTERVAL_SECS` | Digest check interval | `300` |
    /// | `LEDGER_RETENTION_DAYS` | Ledger retention | `90` |
    /// | `MESSAGES_DIR` | Message override directory | (none) |
    /// | `NAMEDAYS_DIR` | Name day directory | (none) |
    /// | `DRY_RUN` | Log instead of sending | `false` |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through `lookup` instead of the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let default_timezone = get("TZ").unwrap_or_else(|| "Europe/Bratislava".to_string());
        if default_timezone.parse::<Tz>().is_err() {
            return Err(ConfigError::UnknownTimezone(default_timezone));
        }

        let digest_hour: u32 = parse(&get, "DIGEST_HOUR", 5)?;
        if digest_hour > 23 {
            return Err(ConfigError::Invalid {
                name: "DIGEST_HOUR",
                value: digest_hour.to_string(),
            });
        }

        Ok(Self {
            database_url: get("SQLITE_PATH").unwrap_or_else(|| "./data/app.db".to_string()),
            default_timezone,
            poll_interval: Duration::from_secs(parse(&get, "POLL_INTERVAL_SECS", 60)?),
            digest_hour,
            digest_check_interval: Duration::from_secs(parse(&get, "DIGEST_CHECK_INTERVAL_SECS", 300)?),
            ledger_retention_days: parse(&get, "LEDGER_RETENTION_DAYS", 90)?,
            messages_dir: get("MESSAGES_DIR").map(PathBuf::from),
            namedays_dir: get("NAMEDAYS_DIR").map(PathBuf::from),
            dry_run: match get("DRY_RUN") {
                Some(raw) => parse_bool("DRY_RUN", &raw)?,
                None => false,
            },
        })
    }
}

fn parse<T, G>(get: &G, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value: raw }),
        None => Ok(default),
    }
}

fn parse_bool(name: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            name,
            value: raw.to_string(),
        }),
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },

    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),
}
