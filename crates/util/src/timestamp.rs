//! Timestamp suffixes used to keep imported workflow names unique.

use chrono::{DateTime, TimeZone};

/// Format used for name suffixes, for example `20250805_010732`.
pub const NAME_SUFFIX_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Render `now` as a name suffix.
pub fn timestamp_suffix<Tz>(now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    now.format(NAME_SUFFIX_FORMAT).to_string()
}

/// Append ` - <timestamp>` to `name`.
///
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use n8n_ops_util::with_timestamp_suffix;
///
/// let at = Utc.with_ymd_and_hms(2025, 8, 5, 1, 7, 32).unwrap();
/// assert_eq!(with_timestamp_suffix("Booking", &at), "Booking - 20250805_010732");
/// ```
pub fn with_timestamp_suffix<Tz>(name: &str, now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    format!("{} - {}", name, timestamp_suffix(now))
}
