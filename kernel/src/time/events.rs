//! The kernel timer scheduler: the single instance multiplexing every kernel
//! timer over the core timer.
use super::Instant;
use crate::arch::timer::HardwareTimer;
use alloc::string::String;
use timer::{Callback, Dispatch, Scheduler};

/// The payload of kernel timers: a message, usually printed by the callback.
pub type Message = String;

/// The scheduler type used by the kernel.
pub type KernelScheduler = Scheduler<HardwareTimer, Message>;

/// The kernel timer scheduler. It is created once the core timer is set up
/// and lives for the rest of the kernel lifetime. Timer callbacks receive a
/// reference to it, and the interrupt handler reaches it through this static.
static SCHEDULER: spin::Once<KernelScheduler> = spin::Once::new();

/// Setup the timer scheduler on top of the given hardware timer. This must be
/// called before enabling interrupts.
pub fn setup(hardware: HardwareTimer) {
    log::info!("Initializing timer scheduler");
    SCHEDULER.call_once(|| Scheduler::new(hardware));
}

/// Get the kernel timer scheduler.
///
/// # Panics
/// This function panics if the scheduler has not been initialized by calling
/// `setup()` beforehand. This should never happen, and indicates a bug in the
/// kernel.
#[must_use]
pub fn scheduler() -> &'static KernelScheduler {
    SCHEDULER
        .get()
        .expect("Timer scheduler used before being initialized")
}

/// Schedule `callback` to be called with `message` at the given instant.
pub fn add_timer(callback: Callback<HardwareTimer, Message>, message: Message, expire: Instant) {
    scheduler().add_timer(callback, message, expire.ticks());
}

/// Handle the core timer interrupt.
pub fn handle_interrupt() {
    let scheduler = scheduler();
    scheduler.hardware().acknowledge();

    match scheduler.handle_interrupt() {
        Dispatch::Spurious => log::debug!("Timer interrupt with no pending timer"),
        Dispatch::Fired { remaining } => {
            log::trace!("Timer fired, {} timer(s) still pending", remaining);
        }
    }
}
