//! Countdown and expiry arithmetic for saved links.
//!
//! All times are milliseconds since the Unix epoch. The countdown is only as
//! fresh as the last call; callers re-render on a poll interval.

use jiff::tz::TimeZone;
use jiff::{SignedDuration, Timestamp};
use std::fmt::{Display, Formatter};

/// How long a saved link lives, in milliseconds.
pub const LINK_LIFETIME_MS: i64 = 7 * MS_PER_DAY;

/// How long a saved link lives.
pub const LINK_LIFETIME: SignedDuration = SignedDuration::from_millis(LINK_LIFETIME_MS);

const MS_PER_SECOND: i64 = 1_000;
const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

/// Time left before a link expires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Countdown {
    Expired,
    Remaining {
        days: i64,
        hours: u8,
        minutes: u8,
        seconds: u8,
    },
}

impl Countdown {
    /// Computes the countdown for a link saved at `saved_at`, seen at `now`.
    pub fn compute(saved_at: i64, now: i64, lifetime: SignedDuration) -> Self {
        let deadline = saved_at.saturating_add(lifetime_millis(lifetime));
        let remaining = deadline.saturating_sub(now);
        if remaining <= 0 {
            return Countdown::Expired;
        }

        Countdown::Remaining {
            days: remaining / MS_PER_DAY,
            hours: ((remaining % MS_PER_DAY) / MS_PER_HOUR) as u8,
            minutes: ((remaining % MS_PER_HOUR) / MS_PER_MINUTE) as u8,
            seconds: ((remaining % MS_PER_MINUTE) / MS_PER_SECOND) as u8,
        }
    }

    pub fn is_expired(&self) -> bool {
        matches!(self, Countdown::Expired)
    }
}

impl Display for Countdown {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Countdown::Expired => f.write_str("Expired"),
            Countdown::Remaining {
                days,
                hours,
                minutes,
                seconds,
            } => write!(f, "{days}:{hours:02}:{minutes:02}:{seconds:02}"),
        }
    }
}

/// Renders the time left for a link as `"D:HH:MM:SS"`, or `"Expired"`.
pub fn remaining_time(saved_at: i64, now: i64) -> String {
    Countdown::compute(saved_at, now, LINK_LIFETIME).to_string()
}

/// Returns true once `now - saved_at` has reached `lifetime`.
pub fn is_expired(saved_at: i64, now: i64, lifetime: SignedDuration) -> bool {
    now.saturating_sub(saved_at) >= lifetime_millis(lifetime)
}

/// Formats the moment a link was saved in the given time zone.
///
/// Returns `None` if `saved_at` is outside the range `jiff` can represent.
pub fn format_saved_at(saved_at: i64, tz: &TimeZone) -> Option<String> {
    let ts = Timestamp::from_millisecond(saved_at).ok()?;
    Some(
        ts.to_zoned(tz.clone())
            .strftime("%Y-%m-%d %H:%M:%S")
            .to_string(),
    )
}

fn lifetime_millis(lifetime: SignedDuration) -> i64 {
    i64::try_from(lifetime.as_millis()).unwrap_or(i64::MAX)
}
