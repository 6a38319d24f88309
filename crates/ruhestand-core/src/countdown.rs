//! Calendar-correct countdown arithmetic.
//!
//! The remaining time until the target is split along two reference points:
//! hours/minutes/seconds are taken modulo 60/60/24 from the raw millisecond
//! delta, while years/months/days come from calendar component subtraction
//! with month borrowing. The split yields the human reading "N years,
//! M months, D days" instead of a fixed-ratio decomposition, so the day
//! count borrowed across a month boundary depends on actual month lengths
//! and leap years.

use chrono::{Datelike, Local, NaiveDate, NaiveDateTime};

/// Largest remaining-day count shown on the progress scale.
pub const DEFAULT_MAX_DAYS: i64 = 730;

/// Fallback target when no date has been chosen yet.
pub const DEFAULT_TARGET: &str = "2027-09-02";

/// Wall-clock source. The TUI ticks with [`SystemClock`]; tests drive
/// virtual time by handing fixed instants to the computation.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// Host-clock implementation of [`Clock`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Remaining time decomposed into display units. All fields are
/// non-negative while the countdown is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemainingDuration {
    pub years: u32,
    pub months: u32,
    pub days: u32,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

/// Countdown state, re-derived from scratch on every tick. Correcting the
/// target date can move `Done` back to `Remaining` at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Countdown {
    /// The target lies in the future.
    Remaining {
        duration: RemainingDuration,
        /// Whole days until the target, used by the progress scale.
        remaining_days: i64,
    },
    /// The target is in the past, right now, or not a valid instant.
    Done,
}

/// Parse a stored target string: `YYYY-MM-DD HH:MM`, or `YYYY-MM-DD`
/// which reads as midnight.
pub fn parse_target(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Evaluate the countdown for a raw stored target string. Unparseable and
/// past targets both read as [`Countdown::Done`].
pub fn countdown_from_input(raw: &str, now: NaiveDateTime) -> Countdown {
    match parse_target(raw) {
        Some(target) => compute_remaining(target, now),
        None => Countdown::Done,
    }
}

/// Split the span between `now` and `target` into display units.
///
/// Pure: identical inputs always produce identical output. When the day
/// difference is negative, day counts are borrowed from the months
/// preceding the target's month until the field is non-negative; a
/// negative month difference then borrows a year.
pub fn compute_remaining(target: NaiveDateTime, now: NaiveDateTime) -> Countdown {
    if target <= now {
        return Countdown::Done;
    }

    let delta_ms = (target - now).num_milliseconds();
    let seconds = ((delta_ms / 1_000) % 60) as u32;
    let minutes = ((delta_ms / 60_000) % 60) as u32;
    let hours = ((delta_ms / 3_600_000) % 24) as u32;

    let mut years = target.year() - now.year();
    let mut months = target.month() as i32 - now.month() as i32;
    let mut days = target.day() as i32 - now.day() as i32;

    let (mut year, mut month) = (target.year(), target.month());
    while days < 0 {
        if month == 1 {
            year -= 1;
            month = 12;
        } else {
            month -= 1;
        }
        days += days_in_month(year, month);
        months -= 1;
    }
    if months < 0 {
        months += 12;
        years -= 1;
    }

    Countdown::Remaining {
        duration: RemainingDuration {
            years: years as u32,
            months: months as u32,
            days: days as u32,
            hours,
            minutes,
            seconds,
        },
        remaining_days: delta_ms / 86_400_000,
    }
}

/// Elapsed/remaining day counts mapped onto the bounded progress scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressSplit {
    pub elapsed: i64,
    pub remaining: i64,
}

impl ProgressSplit {
    /// Filled fraction of the scale, in `0.0..=1.0`.
    pub fn ratio(&self) -> f64 {
        let total = self.elapsed + self.remaining;
        if total <= 0 {
            return 0.0;
        }
        self.elapsed as f64 / total as f64
    }
}

/// Clamp the remaining-day count onto a scale of `max_days`, so the chart
/// never overflows however distant the target is.
pub fn progress_split(remaining_days: i64, max_days: i64) -> ProgressSplit {
    let elapsed = (max_days - remaining_days).clamp(0, max_days);
    ProgressSplit {
        elapsed,
        remaining: max_days - elapsed,
    }
}

fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

fn days_in_month(year: i32, month: u32) -> i32 {
    match month {
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 31,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    fn remaining(c: Countdown) -> RemainingDuration {
        match c {
            Countdown::Remaining { duration, .. } => duration,
            Countdown::Done => panic!("expected a running countdown"),
        }
    }

    #[test]
    fn test_borrows_actual_february_days() {
        // Jan 31 -> Mar 1 spans all of February: 28 days in a common year.
        let d = remaining(compute_remaining(at(2027, 3, 1, 0, 0, 0), at(2027, 1, 31, 0, 0, 0)));
        assert_eq!((d.years, d.months, d.days), (0, 0, 29));

        // Same pair in a leap year borrows 29 February days.
        let d = remaining(compute_remaining(at(2028, 3, 1, 0, 0, 0), at(2028, 1, 31, 0, 0, 0)));
        assert_eq!((d.years, d.months, d.days), (0, 0, 30));
    }

    #[test]
    fn test_single_borrow_across_year_boundary() {
        let d = remaining(compute_remaining(at(2027, 1, 1, 0, 0, 0), at(2026, 12, 31, 0, 0, 0)));
        assert_eq!((d.years, d.months, d.days), (0, 0, 1));
        assert_eq!((d.hours, d.minutes, d.seconds), (0, 0, 0));
    }

    #[test]
    fn test_month_and_year_normalization() {
        let d = remaining(compute_remaining(at(2027, 9, 2, 0, 0, 0), at(2026, 10, 15, 0, 0, 0)));
        assert_eq!((d.years, d.months, d.days), (0, 10, 18));
    }

    #[test]
    fn test_done_at_exact_equality_and_one_ms_either_side() {
        let t = at(2027, 9, 2, 0, 0, 0);
        assert_eq!(compute_remaining(t, t), Countdown::Done);
        assert_eq!(compute_remaining(t, t + Duration::milliseconds(1)), Countdown::Done);

        match compute_remaining(t + Duration::milliseconds(1), t) {
            Countdown::Remaining { duration, remaining_days } => {
                assert_eq!(
                    duration,
                    RemainingDuration { years: 0, months: 0, days: 0, hours: 0, minutes: 0, seconds: 0 }
                );
                assert_eq!(remaining_days, 0);
            }
            Countdown::Done => panic!("one millisecond ahead must still count down"),
        }
    }

    #[test]
    fn test_time_fields_stay_in_modular_ranges() {
        let now = at(2026, 3, 14, 9, 26, 53);
        for secs in [1i64, 59, 60, 3_599, 3_600, 86_399, 86_400, 86_401, 9_999_999] {
            let d = remaining(compute_remaining(now + Duration::seconds(secs), now));
            assert!(d.hours < 24, "hours out of range for +{}s", secs);
            assert!(d.minutes < 60, "minutes out of range for +{}s", secs);
            assert!(d.seconds < 60, "seconds out of range for +{}s", secs);
        }
    }

    #[test]
    fn test_compute_is_idempotent() {
        let target = at(2027, 9, 2, 0, 0, 0);
        let now = at(2026, 5, 17, 13, 45, 12);
        assert_eq!(compute_remaining(target, now), compute_remaining(target, now));
    }

    #[test]
    fn test_parse_target_forms() {
        assert_eq!(parse_target("2027-09-02"), Some(at(2027, 9, 2, 0, 0, 0)));
        assert_eq!(parse_target("2027-09-02 18:30"), Some(at(2027, 9, 2, 18, 30, 0)));
        assert_eq!(parse_target(" 2027-09-02 "), Some(at(2027, 9, 2, 0, 0, 0)));
        assert_eq!(parse_target("not a date"), None);
        assert_eq!(parse_target(""), None);
    }

    #[test]
    fn test_invalid_input_reads_as_done() {
        let now = at(2026, 1, 1, 0, 0, 0);
        assert_eq!(countdown_from_input("garbage", now), Countdown::Done);
        assert_eq!(countdown_from_input("2020-01-01", now), Countdown::Done);
        assert!(matches!(
            countdown_from_input("2030-01-01", now),
            Countdown::Remaining { .. }
        ));
    }

    #[test]
    fn test_progress_clamps_at_both_ends() {
        let far = progress_split(10_000, DEFAULT_MAX_DAYS);
        assert_eq!((far.elapsed, far.remaining), (0, DEFAULT_MAX_DAYS));

        let due = progress_split(0, DEFAULT_MAX_DAYS);
        assert_eq!((due.elapsed, due.remaining), (DEFAULT_MAX_DAYS, 0));

        let mid = progress_split(100, DEFAULT_MAX_DAYS);
        assert_eq!((mid.elapsed, mid.remaining), (630, 100));
        assert!((mid.ratio() - 630.0 / 730.0).abs() < 1e-9);
    }
}
