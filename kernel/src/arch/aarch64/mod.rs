use crate::arch::generic;

pub mod irq;
pub mod mmio;
pub mod timer;
pub mod trap;
pub mod uart;

mod lang;

/// Setup the aarch64 architecture: the console, the logger and the core
/// timer. Interrupts are left masked: the caller enables them once the
/// timer scheduler is ready to handle them.
#[must_use]
pub fn setup() -> timer::CoreTimer {
    uart::setup();

    #[cfg(feature = "logging")]
    generic::log::setup();

    ::log::info!("Booting the aarch64 kernel");
    ::log::info!("Exception level: EL{}", current_el());

    timer::CoreTimer::setup()
}

/// Stop the current core forever.
pub fn halt() -> ! {
    loop {
        // SAFETY: Waiting for an event has no side effect other than
        // stalling the core until an interrupt or an event is signaled.
        unsafe {
            core::arch::asm!("wfe", options(nomem, nostack, preserves_flags));
        }
    }
}

/// Return the current exception level, between 0 and 3.
#[must_use]
pub fn current_el() -> u64 {
    let el: u64;
    // SAFETY: Reading `CurrentEL` has no side effect.
    unsafe {
        core::arch::asm!("mrs {}, currentel", out(reg) el, options(nomem, nostack));
    }
    (el >> 2) & 0b11
}
