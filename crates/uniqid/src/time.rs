use std::time::{SystemTime, UNIX_EPOCH};

/// A source of the nanosecond timestamp used to seed a generator's counter.
///
/// The seed only spreads counters from different process starts apart. It
/// carries no ordering guarantee once generation starts.
///
/// # Example
///
/// ```
/// use uniqid::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_nanos(&self) -> u64 {
///         1234
///     }
/// }
///
/// assert_eq!(FixedTime.current_nanos(), 1234);
/// ```
pub trait TimeSource {
    /// Returns nanoseconds elapsed since the source's epoch.
    fn current_nanos(&self) -> u64;
}

/// Wall-clock time source measured from the UNIX epoch.
///
/// A system clock set before 1970 yields `0`. Values past `u64::MAX`
/// nanoseconds (year 2554) saturate.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn current_nanos(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| u64::try_from(d.as_nanos()).unwrap_or(u64::MAX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_is_after_2025() {
        // 2025-01-01T00:00:00Z
        const CUSTOM_EPOCH_NANOS: u64 = 1_735_689_600_000_000_000;
        assert!(SystemClock.current_nanos() > CUSTOM_EPOCH_NANOS);
    }
}
