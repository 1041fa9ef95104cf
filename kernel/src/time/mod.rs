use crate::arch;
use core::{fmt, ops::Add, time::Duration};
use timer::{ClockSource, Ticks};

pub mod events;

/// A measurement of the free-running counter. This is very similar to
/// `std::time::Instant`, but stores raw ticks: the timer scheduler works
/// exclusively in ticks, and converting back and forth to nanoseconds would
/// accumulate rounding errors for periodic timers.
///
/// Conversions to and from durations go through the timer scheduler, so they
/// must not happen before it is set up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Instant(Ticks);

impl Instant {
    /// Returns an instant corresponding to "now".
    #[must_use]
    pub fn now() -> Self {
        Instant(arch::timer::current_ticks())
    }

    /// Returns the value of the counter at this instant.
    #[must_use]
    pub fn ticks(&self) -> Ticks {
        self.0
    }

    /// Returns the duration elapsed between the boot (when the counter was
    /// zero) and this instant.
    #[must_use]
    pub fn since_boot(&self) -> Duration {
        events::scheduler().hardware().ticks_to_duration(self.0)
    }
}

impl Add<Duration> for Instant {
    type Output = Instant;

    fn add(self, duration: Duration) -> Instant {
        let delta = events::scheduler().hardware().duration_to_ticks(duration);
        Instant(self.0.saturating_add(delta))
    }
}

impl fmt::Display for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let uptime = self.since_boot();
        write!(f, "{}.{:03}s", uptime.as_secs(), uptime.subsec_millis())
    }
}
