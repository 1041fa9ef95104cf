//! Conversions between counter ticks and durations.
use core::time::Duration;

/// A value of the hardware free-running counter. This is not a time unit by
/// itself: it needs to be divided by the counter frequency to get seconds.
pub type Ticks = u64;

/// Convert a duration to a number of ticks of a counter running at the given
/// frequency, in Hertz. The result saturates at `Ticks::MAX`.
#[must_use]
pub fn from_duration(duration: Duration, frequency: u64) -> Ticks {
    let ticks = duration.as_nanos().saturating_mul(u128::from(frequency)) / 1_000_000_000;
    Ticks::try_from(ticks).unwrap_or(Ticks::MAX)
}

/// Convert a number of ticks of a counter running at the given frequency, in
/// Hertz, to a duration. A zero frequency yields a zero duration, since no
/// time can be measured with a stopped counter.
#[must_use]
pub fn to_duration(ticks: Ticks, frequency: u64) -> Duration {
    if frequency == 0 {
        return Duration::ZERO;
    }

    let secs = ticks / frequency;
    let rest = u128::from(ticks % frequency);

    // The remainder is strictly lower than the frequency, so the number of
    // nanoseconds is strictly lower than one billion and fits in an u32.
    #[allow(clippy::cast_possible_truncation)]
    let nanos = (rest * 1_000_000_000 / u128::from(frequency)) as u32;
    Duration::new(secs, nanos)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PI3_FREQUENCY: u64 = 19_200_000;

    #[test]
    fn whole_seconds() {
        let ticks = from_duration(Duration::from_secs(2), PI3_FREQUENCY);
        assert_eq!(ticks, 38_400_000);
        assert_eq!(to_duration(ticks, PI3_FREQUENCY), Duration::from_secs(2));
    }

    #[test]
    fn sub_second_durations() {
        assert_eq!(from_duration(Duration::from_millis(5), PI3_FREQUENCY), 96_000);
        assert_eq!(
            to_duration(96_000, PI3_FREQUENCY),
            Duration::from_millis(5)
        );
    }

    #[test]
    fn saturates_on_overflow() {
        assert_eq!(from_duration(Duration::MAX, u64::MAX), Ticks::MAX);
    }

    #[test]
    fn stopped_counter() {
        assert_eq!(to_duration(1234, 0), Duration::ZERO);
    }
}
