use crate::Ticks;
use core::time::Duration;

/// A free-running hardware counter with a one-shot countdown that raises an
/// interrupt when it expires.
pub trait ClockSource {
    /// Read the current value of the free-running counter. The counter is
    /// monotonic and is never reset while the kernel is running. Wrapping
    /// around is not handled: at the frequencies involved, it would take
    /// thousands of years.
    fn now(&self) -> Ticks;

    /// The frequency of the counter, in Hertz. The scheduler itself never uses
    /// it and works exclusively in ticks, but it is needed to convert ticks
    /// to human readable durations.
    fn frequency(&self) -> u64;

    /// Program the countdown to raise an interrupt `ticks` ticks after this
    /// call. If a countdown was already running, it is replaced. A `ticks`
    /// value of zero raises the interrupt as soon as possible.
    fn arm(&self, ticks: Ticks);

    /// Convert a number of ticks of this counter to a duration.
    fn ticks_to_duration(&self, ticks: Ticks) -> Duration {
        crate::ticks::to_duration(ticks, self.frequency())
    }

    /// Convert a duration to a number of ticks of this counter, saturating
    /// at `Ticks::MAX`.
    fn duration_to_ticks(&self, duration: Duration) -> Ticks {
        crate::ticks::from_duration(duration, self.frequency())
    }
}

/// The interrupt controller gating the timer expiry signal.
pub trait InterruptController {
    /// Route the timer expiry signal to the core. Enabling an already
    /// enabled line does nothing.
    fn enable(&self);

    /// Stop routing the timer expiry signal to the core. The countdown may
    /// still expire, but it will not interrupt the core anymore.
    fn disable(&self);

    /// Mask interrupts on the core. Until [`InterruptController::unmask`] is
    /// called, the timer interrupt handler cannot preempt the caller.
    fn mask(&self);

    /// Unmask interrupts on the core.
    fn unmask(&self);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimulatedTimer;

    #[test]
    fn conversions_use_the_counter_frequency() {
        let timer = SimulatedTimer::new();
        assert_eq!(timer.frequency(), SimulatedTimer::FREQUENCY);

        assert_eq!(timer.duration_to_ticks(Duration::from_secs(2)), 2_000);
        assert_eq!(timer.duration_to_ticks(Duration::from_micros(1_500)), 1);
        assert_eq!(timer.ticks_to_duration(2_500), Duration::from_millis(2_500));
    }
}
