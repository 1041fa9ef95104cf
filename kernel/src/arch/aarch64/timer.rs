//! The EL1 physical timer of the ARMv8 generic timer, routed to core 0 through
//! the BCM2836 local interrupt controller.
use super::{irq, mmio::Register};
use bitflags::bitflags;
use ::timer::{ClockSource, InterruptController, Ticks};

bitflags! {
    /// The bits of the `CNTP_CTL_EL0` register.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct Control: u64 {
        /// The timer is enabled.
        const ENABLE = 1 << 0;
        /// The timer interrupt is masked at the timer level.
        const IMASK = 1 << 1;
        /// The timer condition is met (read only).
        const ISTATUS = 1 << 2;
    }
}

bitflags! {
    /// The bits of the `CORE0_TIMER_IRQ_CTRL` and `CORE0_IRQ_SOURCE` local
    /// registers related to the generic timer.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct CoreTimerIrq: u32 {
        /// Secure physical timer.
        const CNTPS = 1 << 0;
        /// Non-secure physical timer, the one used by the kernel.
        const CNTPNS = 1 << 1;
        /// Hypervisor timer.
        const CNTHP = 1 << 2;
        /// Virtual timer.
        const CNTV = 1 << 3;
    }
}

/// Routes the timer interrupts of core 0 to its IRQ or FIQ line.
// SAFETY: This is the address of the core 0 timer routing register.
const CORE0_TIMER_IRQ_CTRL: Register =
    unsafe { Register::at(config::LOCAL_PERIPHERAL_BASE + 0x40) };

/// Reports the pending interrupt sources of core 0.
// SAFETY: This is the address of the core 0 IRQ source register.
const CORE0_IRQ_SOURCE: Register =
    unsafe { Register::at(config::LOCAL_PERIPHERAL_BASE + 0x60) };

/// The core timer. All its state lives in the hardware, so it can be freely
/// shared and copied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoreTimer {
    frequency: u64,
}

impl CoreTimer {
    /// Setup the core timer. The timer is enabled but its countdown is pushed
    /// to the end of times, and its interrupt is not routed to the core until
    /// the first timer is added.
    #[must_use]
    pub fn setup() -> Self {
        ::log::info!("Initializing core timer");

        let timer = Self {
            frequency: frequency(),
        };
        timer.disable();
        timer.acknowledge();
        write_control(Control::ENABLE);

        ::log::debug!("Core timer frequency: {} Hz", timer.frequency);
        timer
    }

    /// Acknowledge a timer interrupt by pushing the countdown to the end of
    /// times. The timer interrupt is level triggered: it stays asserted while
    /// the countdown is expired, and would be raised again as soon as
    /// interrupts are unmasked in the middle of the handler.
    pub fn acknowledge(&self) {
        write_compare(u64::MAX);
    }
}

impl ClockSource for CoreTimer {
    fn now(&self) -> Ticks {
        current_ticks()
    }

    fn frequency(&self) -> u64 {
        self.frequency
    }

    fn arm(&self, ticks: Ticks) {
        write_compare(current_ticks().saturating_add(ticks));
    }
}

impl InterruptController for CoreTimer {
    fn enable(&self) {
        CORE0_TIMER_IRQ_CTRL.write(CoreTimerIrq::CNTPNS.bits());
    }

    fn disable(&self) {
        CORE0_TIMER_IRQ_CTRL.write(CoreTimerIrq::empty().bits());
    }

    fn mask(&self) {
        irq::disable();
    }

    fn unmask(&self) {
        // SAFETY: The exception vectors are installed by the boot code and
        // the timer scheduler is set up before any timer can be added, so
        // the kernel is always able to handle the timer interrupt.
        unsafe { irq::enable() };
    }
}

/// Check if the core timer is one of the pending interrupt sources of core 0.
#[must_use]
pub fn pending() -> bool {
    CoreTimerIrq::from_bits_truncate(CORE0_IRQ_SOURCE.read()).contains(CoreTimerIrq::CNTPNS)
}

/// Read the physical counter.
#[must_use]
pub fn current_ticks() -> u64 {
    let ticks: u64;
    // SAFETY: Reading the physical counter has no side effect. The barrier
    // prevents the read from being speculated before previous instructions.
    unsafe {
        core::arch::asm!(
            "isb",
            "mrs {}, cntpct_el0",
            out(reg) ticks,
            options(nomem, nostack)
        );
    }
    ticks
}

/// Read the frequency of the physical counter, set by the firmware.
#[must_use]
pub fn frequency() -> u64 {
    let frequency: u64;
    // SAFETY: Reading the counter frequency has no side effect.
    unsafe {
        core::arch::asm!("mrs {}, cntfrq_el0", out(reg) frequency, options(nomem, nostack));
    }
    frequency
}

/// Set the absolute counter value at which the timer condition is met.
fn write_compare(deadline: u64) {
    // SAFETY: Programming the compare value only changes when the timer
    // interrupt is raised, which the kernel is prepared to handle.
    unsafe {
        core::arch::asm!(
            "msr cntp_cval_el0, {}",
            "isb",
            in(reg) deadline,
            options(nomem, nostack)
        );
    }
}

fn write_control(control: Control) {
    // SAFETY: See `write_compare`.
    unsafe {
        core::arch::asm!(
            "msr cntp_ctl_el0, {}",
            "isb",
            in(reg) control.bits(),
            options(nomem, nostack)
        );
    }
}
