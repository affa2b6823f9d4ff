//! Day boundaries and timestamp parsing.
//!
//! Every calendar-day decision in habitrack (streaks, "completed today",
//! toggling, heatmaps) goes through [`DayBoundary`] so they can never drift
//! apart. A day runs from local midnight to the last nanosecond before the
//! next local midnight, in a single fixed offset.

use chrono::{
    DateTime, Days, Duration, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, Offset, Utc,
};

use crate::error::HabitError;

/// The owner's local day reckoning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayBoundary {
    offset: FixedOffset,
}

impl DayBoundary {
    /// Create a boundary for a fixed UTC offset.
    #[must_use]
    pub const fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// Days run midnight-to-midnight UTC.
    #[must_use]
    pub fn utc() -> Self {
        Self::new(Utc.fix())
    }

    /// Use the system's current local offset.
    #[must_use]
    pub fn local() -> Self {
        Self::new(*Local::now().offset())
    }

    /// Create a boundary from an offset in minutes east of UTC.
    ///
    /// # Errors
    ///
    /// Returns `HabitError::Config` if the offset is outside ±24 hours.
    pub fn from_offset_minutes(minutes: i32) -> Result<Self, HabitError> {
        minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .map(Self::new)
            .ok_or_else(|| HabitError::Config(format!("Invalid UTC offset: {minutes} minutes")))
    }

    /// The fixed offset this boundary uses.
    #[must_use]
    pub const fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Calendar day an instant falls on.
    #[must_use]
    pub fn day_of(&self, ts: DateTime<Utc>) -> NaiveDate {
        ts.with_timezone(&self.offset).date_naive()
    }

    /// Calendar day of `now`.
    #[must_use]
    pub fn today(&self, now: DateTime<Utc>) -> NaiveDate {
        self.day_of(now)
    }

    /// First instant of `day`.
    #[must_use]
    pub fn start_of_day(&self, day: NaiveDate) -> DateTime<Utc> {
        self.local_to_utc(day.and_time(NaiveTime::default()))
    }

    /// Last instant of `day` (inclusive).
    #[must_use]
    pub fn end_of_day(&self, day: NaiveDate) -> DateTime<Utc> {
        self.start_of_day(day + Duration::days(1)) - Duration::nanoseconds(1)
    }

    /// Local noon of `day`, used when backfilling a completion.
    #[must_use]
    pub fn midday(&self, day: NaiveDate) -> DateTime<Utc> {
        self.start_of_day(day) + Duration::hours(12)
    }

    /// Whether `ts` falls within `day`.
    #[must_use]
    pub fn contains(&self, day: NaiveDate, ts: DateTime<Utc>) -> bool {
        ts >= self.start_of_day(day) && ts <= self.end_of_day(day)
    }

    fn local_to_utc(&self, local: NaiveDateTime) -> DateTime<Utc> {
        let utc = local - Duration::seconds(i64::from(self.offset.local_minus_utc()));
        DateTime::from_naive_utc_and_offset(utc, Utc)
    }
}

impl Default for DayBoundary {
    fn default() -> Self {
        Self::local()
    }
}

/// Parse a stored or user-supplied timestamp.
///
/// Accepts RFC 3339 (`2024-03-01T08:30:00Z`) or a bare ISO date, which is
/// read as local noon of that day.
///
/// # Errors
///
/// Returns `HabitError::Parse` for anything else.
pub fn parse_timestamp(input: &str, boundary: &DayBoundary) -> Result<DateTime<Utc>, HabitError> {
    let input = input.trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(input) {
        return Ok(ts.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map(|day| boundary.midday(day))
        .map_err(|_| HabitError::Parse(format!("Invalid timestamp: '{input}'")))
}

/// Parse a day expression: `today`, `yesterday`, `N days ago` or `YYYY-MM-DD`.
///
/// # Errors
///
/// Returns `HabitError::Parse` if the input is not recognised.
pub fn parse_day(
    input: &str,
    now: DateTime<Utc>,
    boundary: &DayBoundary,
) -> Result<NaiveDate, HabitError> {
    let input = input.trim().to_lowercase();
    let today = boundary.today(now);

    let days_back = match input.as_str() {
        "today" => Some(0),
        "yesterday" => Some(1),
        _ => parse_days_ago(&input),
    };

    if let Some(days) = days_back {
        return today
            .checked_sub_days(Days::new(days))
            .ok_or_else(|| HabitError::Parse(format!("Day out of range: '{input}'")));
    }

    NaiveDate::parse_from_str(&input, "%Y-%m-%d")
        .map_err(|_| HabitError::Parse(format!("Invalid day: '{input}'")))
}

/// Parse "N days ago" / "1 day ago".
fn parse_days_ago(input: &str) -> Option<u64> {
    let parts: Vec<&str> = input.split_whitespace().collect();

    if parts.len() == 3 && parts[2] == "ago" && parts[1].trim_end_matches('s') == "day" {
        return parts[0].parse::<u64>().ok();
    }

    None
}

/// Format an instant for storage.
///
/// Fixed-width so stored values compare correctly as text.
#[must_use]
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_day_of_utc() {
        let boundary = DayBoundary::utc();
        assert_eq!(boundary.day_of(at(2024, 3, 1, 23, 59)), day(2024, 3, 1));
        assert_eq!(boundary.day_of(at(2024, 3, 2, 0, 0)), day(2024, 3, 2));
    }

    #[test]
    fn test_day_of_with_offset() {
        // UTC-5: 03:00 UTC is still the previous evening locally
        let boundary = DayBoundary::from_offset_minutes(-300).unwrap();
        assert_eq!(boundary.day_of(at(2024, 3, 2, 3, 0)), day(2024, 3, 1));
        assert_eq!(boundary.day_of(at(2024, 3, 2, 5, 0)), day(2024, 3, 2));
    }

    #[test]
    fn test_start_and_end_of_day() {
        let boundary = DayBoundary::from_offset_minutes(120).unwrap();
        let start = boundary.start_of_day(day(2024, 3, 2));
        let end = boundary.end_of_day(day(2024, 3, 2));

        assert_eq!(start, at(2024, 3, 1, 22, 0));
        assert_eq!(end + Duration::nanoseconds(1), at(2024, 3, 2, 22, 0));
        assert!(boundary.contains(day(2024, 3, 2), start));
        assert!(boundary.contains(day(2024, 3, 2), end));
        assert!(!boundary.contains(day(2024, 3, 2), end + Duration::nanoseconds(1)));
    }

    #[test]
    fn test_midday() {
        let boundary = DayBoundary::utc();
        assert_eq!(boundary.midday(day(2024, 1, 15)), at(2024, 1, 15, 12, 0));
    }

    #[test]
    fn test_invalid_offset() {
        assert!(DayBoundary::from_offset_minutes(24 * 60).is_err());
        assert!(DayBoundary::from_offset_minutes(i32::MAX).is_err());
    }

    #[test]
    fn test_parse_timestamp_rfc3339() {
        let boundary = DayBoundary::utc();
        let ts = parse_timestamp("2024-03-01T08:30:00+02:00", &boundary).unwrap();
        assert_eq!(ts, at(2024, 3, 1, 6, 30));
    }

    #[test]
    fn test_parse_timestamp_date_only() {
        let boundary = DayBoundary::utc();
        let ts = parse_timestamp("2024-03-01", &boundary).unwrap();
        assert_eq!(ts, at(2024, 3, 1, 12, 0));
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        let boundary = DayBoundary::utc();
        assert!(matches!(
            parse_timestamp("last tuesday-ish", &boundary),
            Err(HabitError::Parse(_))
        ));
    }

    #[test]
    fn test_parse_day() {
        let boundary = DayBoundary::utc();
        let now = at(2024, 3, 10, 9, 0);

        assert_eq!(parse_day("today", now, &boundary).unwrap(), day(2024, 3, 10));
        assert_eq!(parse_day("Yesterday", now, &boundary).unwrap(), day(2024, 3, 9));
        assert_eq!(parse_day("3 days ago", now, &boundary).unwrap(), day(2024, 3, 7));
        assert_eq!(parse_day("1 day ago", now, &boundary).unwrap(), day(2024, 3, 9));
        assert_eq!(parse_day("2024-02-29", now, &boundary).unwrap(), day(2024, 2, 29));
        assert!(parse_day("someday", now, &boundary).is_err());
        assert!(matches!(
            parse_day("99999999 days ago", now, &boundary),
            Err(HabitError::Parse(_))
        ));
        assert!(matches!(
            parse_day("18446744073709551615 days ago", now, &boundary),
            Err(HabitError::Parse(_))
        ));
    }

    #[test]
    fn test_format_timestamp_is_fixed_width() {
        let a = format_timestamp(at(2024, 3, 1, 8, 0));
        let b = format_timestamp(at(2024, 3, 1, 8, 0) + Duration::microseconds(1));
        assert_eq!(a, "2024-03-01T08:00:00.000000Z");
        assert_eq!(a.len(), b.len());
        assert!(a < b);
    }
}
