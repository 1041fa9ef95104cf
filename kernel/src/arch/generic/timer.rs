/// The hardware timer driven by the timer scheduler.
pub type HardwareTimer = crate::arch::target::timer::CoreTimer;

/// Get the current value of the free-running counter, in ticks.
#[must_use]
pub fn current_ticks() -> u64 {
    crate::arch::target::timer::current_ticks()
}

