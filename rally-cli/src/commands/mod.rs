pub mod list;
pub mod log;
pub mod respond;
pub mod seen;

use chrono_tz::Tz;

/// The viewer's local time zone, falling back to UTC when the platform
/// zone cannot be determined or parsed.
pub fn viewer_tz() -> Tz {
    iana_time_zone::get_timezone()
        .ok()
        .and_then(|name| name.parse().ok())
        .unwrap_or(Tz::UTC)
}
