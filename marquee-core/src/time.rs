//! Time types
//!
//! The scheduler only needs a monotonic millisecond clock. `Instant` counts
//! milliseconds since boot; `Duration` is a span in milliseconds.
//! `LocalTime` is the broken-down civil time used by clock/date messages.

use core::ops::Add;

/// Milliseconds per second
const MS_PER_S: u32 = 1000;

/// Seconds per day
const SECS_PER_DAY: i64 = 86_400;

/// A span of time in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Duration {
    millis: u32,
}

impl Duration {
    /// Zero-length duration
    pub const ZERO: Self = Self { millis: 0 };

    /// Create a duration from milliseconds
    pub const fn from_millis(millis: u32) -> Self {
        Self { millis }
    }

    /// Create a duration from whole seconds
    pub const fn from_secs(secs: u32) -> Self {
        Self {
            millis: secs.saturating_mul(MS_PER_S),
        }
    }

    /// Length in milliseconds
    pub const fn as_millis(&self) -> u32 {
        self.millis
    }

    /// Subtract, clamping at zero
    pub const fn saturating_sub(self, other: Duration) -> Self {
        Self {
            millis: self.millis.saturating_sub(other.millis),
        }
    }
}

/// A point in time, milliseconds since boot
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Instant {
    millis: u64,
}

impl Instant {
    /// Boot time; also "ready immediately" for wake times
    pub const ZERO: Self = Self { millis: 0 };

    /// Create an instant from milliseconds since boot
    pub const fn from_millis(millis: u64) -> Self {
        Self { millis }
    }

    /// Milliseconds since boot
    pub const fn as_millis(&self) -> u64 {
        self.millis
    }

    /// Time elapsed since `earlier`, zero if `earlier` is in the future
    pub fn saturating_duration_since(&self, earlier: Instant) -> Duration {
        let delta = self.millis.saturating_sub(earlier.millis);
        Duration::from_millis(delta.min(u32::MAX as u64) as u32)
    }
}

impl Add<Duration> for Instant {
    type Output = Instant;

    fn add(self, rhs: Duration) -> Instant {
        Instant {
            millis: self.millis.saturating_add(rhs.millis as u64),
        }
    }
}

/// Broken-down local civil time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LocalTime {
    pub year: u16,
    /// 1-12
    pub month: u8,
    /// 1-31
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl LocalTime {
    /// Convert Unix seconds plus a UTC offset (minutes) to civil time
    ///
    /// Uses the proleptic Gregorian calendar. Valid for any time the
    /// device can represent (1970 onwards with a `u32` epoch).
    pub fn from_unix(unix_s: u32, utc_offset_min: i16) -> Self {
        let local = unix_s as i64 + utc_offset_min as i64 * 60;
        let days = local.div_euclid(SECS_PER_DAY);
        let secs_of_day = local.rem_euclid(SECS_PER_DAY);

        let (year, month, day) = civil_from_days(days);

        Self {
            year: year as u16,
            month,
            day,
            hour: (secs_of_day / 3600) as u8,
            minute: ((secs_of_day % 3600) / 60) as u8,
            second: (secs_of_day % 60) as u8,
        }
    }
}

/// Days since 1970-01-01 to (year, month, day)
fn civil_from_days(days: i64) -> (i64, u8, u8) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u8;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u8;
    let year = yoe + era * 400 + if month <= 2 { 1 } else { 0 };
    (year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_from_secs() {
        assert_eq!(Duration::from_secs(2).as_millis(), 2000);
        assert!(Duration::from_millis(500) < Duration::from_secs(1));
    }

    #[test]
    fn test_instant_add_and_since() {
        let t = Instant::from_millis(1000) + Duration::from_millis(250);
        assert_eq!(t.as_millis(), 1250);
        assert_eq!(
            t.saturating_duration_since(Instant::from_millis(1000)),
            Duration::from_millis(250)
        );
        assert_eq!(
            Instant::ZERO.saturating_duration_since(t),
            Duration::ZERO
        );
    }

    #[test]
    fn test_epoch_is_1970() {
        let t = LocalTime::from_unix(0, 0);
        assert_eq!((t.year, t.month, t.day), (1970, 1, 1));
        assert_eq!((t.hour, t.minute, t.second), (0, 0, 0));
    }

    #[test]
    fn test_known_timestamp() {
        // 2017-02-15 13:45:30 UTC
        let t = LocalTime::from_unix(1_487_166_330, 0);
        assert_eq!((t.year, t.month, t.day), (2017, 2, 15));
        assert_eq!((t.hour, t.minute, t.second), (13, 45, 30));
    }

    #[test]
    fn test_leap_day() {
        // 2024-02-29 12:00:00 UTC
        let t = LocalTime::from_unix(1_709_208_000, 0);
        assert_eq!((t.year, t.month, t.day), (2024, 2, 29));
    }

    #[test]
    fn test_utc_offset_crosses_midnight() {
        // 2017-02-15 23:30:00 UTC, +60 min => 2017-02-16 00:30
        let t = LocalTime::from_unix(1_487_201_400, 60);
        assert_eq!((t.month, t.day, t.hour, t.minute), (2, 16, 0, 30));

        // Negative offset goes back a day
        let t = LocalTime::from_unix(1_487_203_200, -120);
        assert_eq!((t.day, t.hour), (15, 22));
    }
}
