//! Distance between two instants in words ("about 2 hours ago").

use chrono::{DateTime, Datelike, Timelike, Utc};

const MINUTES_IN_DAY: i64 = 1_440;
const MINUTES_IN_ALMOST_TWO_DAYS: i64 = 2_520;
const MINUTES_IN_MONTH: i64 = 43_200;
const MINUTES_IN_TWO_MONTHS: i64 = 86_400;

/// Describe how long ago (or how far ahead) `then` is, as seen from `now`.
///
/// ```
/// use chrono::{Duration, Utc};
/// use driverboard::view::relative::time_ago;
///
/// let now = Utc::now();
/// assert_eq!(time_ago(now - Duration::hours(3), now), "about 3 hours ago");
/// assert_eq!(time_ago(now + Duration::days(4), now), "in 4 days");
/// ```
#[must_use]
pub fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let (earlier, later) = if then <= now { (then, now) } else { (now, then) };
    let words = distance_in_words(earlier, later);
    if then <= now {
        format!("{words} ago")
    } else {
        format!("in {words}")
    }
}

/// `earlier` must not be after `later`.
fn distance_in_words(earlier: DateTime<Utc>, later: DateTime<Utc>) -> String {
    let seconds = (later - earlier).num_seconds();
    let minutes = round_div(seconds, 60);

    if minutes == 0 {
        return "less than a minute".to_string();
    }
    if minutes < 45 {
        return count(minutes, "minute");
    }
    if minutes < 90 {
        return "about 1 hour".to_string();
    }
    if minutes < MINUTES_IN_DAY {
        return format!("about {}", count(round_div(minutes, 60), "hour"));
    }
    if minutes < MINUTES_IN_ALMOST_TWO_DAYS {
        return "1 day".to_string();
    }
    if minutes < MINUTES_IN_MONTH {
        return count(round_div(minutes, MINUTES_IN_DAY), "day");
    }
    if minutes < MINUTES_IN_TWO_MONTHS {
        return format!("about {}", count(round_div(minutes, MINUTES_IN_MONTH), "month"));
    }

    let months = months_between(earlier, later);
    if months < 12 {
        return count(round_div(minutes, MINUTES_IN_MONTH), "month");
    }

    let years = months / 12;
    match months % 12 {
        0..=2 => format!("about {}", count(years, "year")),
        3..=8 => format!("over {}", count(years, "year")),
        _ => format!("almost {}", count(years + 1, "year")),
    }
}

/// Whole calendar months from `earlier` to `later`.
fn months_between(earlier: DateTime<Utc>, later: DateTime<Utc>) -> i64 {
    let mut months = i64::from(later.year() - earlier.year()) * 12
        + i64::from(later.month())
        - i64::from(earlier.month());

    let later_in_month = (later.day(), later.num_seconds_from_midnight(), later.nanosecond());
    let earlier_in_month = (
        earlier.day(),
        earlier.num_seconds_from_midnight(),
        earlier.nanosecond(),
    );
    if months > 0 && later_in_month < earlier_in_month {
        months -= 1;
    }
    months
}

/// `n / d` rounded half up, for non-negative `n` and positive `d`.
fn round_div(n: i64, d: i64) -> i64 {
    (2 * n + d) / (2 * d)
}

fn count(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {unit}")
    } else {
        format!("{n} {unit}s")
    }
}
