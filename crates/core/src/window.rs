//! Time window evaluation
//!
//! A Room's status is never stored authoritatively: it is derived from the
//! current time and the Room's window every time the store is read or polled.

use std::fmt::Display;

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::RoomStatus;

impl RoomStatus {
    /// Status of a window `[start, end]` at `now`. Both bounds are inclusive.
    pub fn at(now: DateTime<Utc>, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        if now < start {
            RoomStatus::Scheduled
        } else if now <= end {
            RoomStatus::Live
        } else {
            RoomStatus::Closed
        }
    }
}

/// Start and end of a Room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Create a window, rejecting empty or inverted ranges
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if start >= end {
            return Err(Error::InvalidOperation(
                "End time must be after start time".to_string(),
            ));
        }
        Ok(Self { start, end })
    }

    pub fn status_at(&self, now: DateTime<Utc>) -> RoomStatus {
        RoomStatus::at(now, self.start, self.end)
    }

    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        self.status_at(now) == RoomStatus::Live
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("{} {}", count, unit)
    } else {
        format!("{} {}s", count, unit)
    }
}

fn minutes_or_hours(minutes: i64) -> String {
    if minutes < 60 {
        plural(minutes, "minute")
    } else {
        plural(minutes / 60, "hour")
    }
}

/// Human readable window length ("45 minutes", "2 hours"), hours rounded down
pub fn format_duration(start: DateTime<Utc>, end: DateTime<Utc>) -> String {
    minutes_or_hours((end - start).num_minutes())
}

/// Time left until `target` ("5 minutes", "2 hours"), or "Started" once passed
pub fn format_time_remaining(target: DateTime<Utc>, now: DateTime<Utc>) -> String {
    if target < now {
        return "Started".to_string();
    }
    minutes_or_hours((target - now).num_minutes())
}

fn format_clock<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    at.format("%-I:%M %p").to_string()
}

fn format_day<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    at.format("%b %-d, %Y").to_string()
}

/// Window label in the caller's timezone.
///
/// Same-day windows print the date once: `7:30 PM - 9:00 PM, May 15, 2025`.
pub fn format_time_window<Tz: TimeZone>(start: &DateTime<Tz>, end: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    if start.date_naive() == end.date_naive() {
        format!(
            "{} - {}, {}",
            format_clock(start),
            format_clock(end),
            format_day(start)
        )
    } else {
        format!(
            "{}, {} - {}, {}",
            format_clock(start),
            format_day(start),
            format_clock(end),
            format_day(end)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window_around(now: DateTime<Utc>, start_mins: i64, end_mins: i64) -> TimeWindow {
        TimeWindow::new(
            now + Duration::minutes(start_mins),
            now + Duration::minutes(end_mins),
        )
        .unwrap()
    }

    #[test]
    fn test_status_scenarios() {
        let now = Utc::now();
        assert_eq!(window_around(now, -30, 90).status_at(now), RoomStatus::Live);
        assert_eq!(window_around(now, 60, 180).status_at(now), RoomStatus::Scheduled);
        assert_eq!(window_around(now, -180, -60).status_at(now), RoomStatus::Closed);
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let now = Utc::now();
        let window = window_around(now, 0, 60);
        assert_eq!(window.status_at(window.start), RoomStatus::Live);
        assert_eq!(window.status_at(window.end), RoomStatus::Live);
        assert_eq!(
            window.status_at(window.start - Duration::milliseconds(1)),
            RoomStatus::Scheduled
        );
        assert_eq!(
            window.status_at(window.end + Duration::milliseconds(1)),
            RoomStatus::Closed
        );
    }

    #[test]
    fn test_live_iff_inside_window() {
        let now = Utc::now();
        let window = window_around(now, -10, 10);
        for offset in -30..=30 {
            let at = now + Duration::minutes(offset);
            let inside = window.start <= at && at <= window.end;
            assert_eq!(window.is_live_at(at), inside, "offset {}", offset);
        }
    }

    #[test]
    fn test_rejects_empty_window() {
        let now = Utc::now();
        assert!(TimeWindow::new(now, now).is_err());
    }

    #[test]
    fn test_format_duration() {
        let now = Utc::now();
        assert_eq!(format_duration(now, now + Duration::minutes(1)), "1 minute");
        assert_eq!(format_duration(now, now + Duration::minutes(45)), "45 minutes");
        assert_eq!(format_duration(now, now + Duration::minutes(60)), "1 hour");
        assert_eq!(format_duration(now, now + Duration::minutes(179)), "2 hours");
    }

    #[test]
    fn test_format_time_remaining() {
        let now = Utc::now();
        assert_eq!(format_time_remaining(now - Duration::seconds(1), now), "Started");
        assert_eq!(format_time_remaining(now + Duration::minutes(5), now), "5 minutes");
        assert_eq!(format_time_remaining(now + Duration::minutes(125), now), "2 hours");
    }

    #[test]
    fn test_format_time_window() {
        let start = Utc.with_ymd_and_hms(2025, 5, 15, 19, 30, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 5, 15, 21, 0, 0).unwrap();
        assert_eq!(
            format_time_window(&start, &end),
            "7:30 PM - 9:00 PM, May 15, 2025"
        );

        let next_day = Utc.with_ymd_and_hms(2025, 5, 16, 1, 0, 0).unwrap();
        assert_eq!(
            format_time_window(&start, &next_day),
            "7:30 PM, May 15, 2025 - 1:00 AM, May 16, 2025"
        );
    }
}
