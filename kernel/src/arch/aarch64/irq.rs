use core::sync::atomic::{Ordering, compiler_fence};

/// The IRQ mask bit in the `DAIF` register.
const DAIF_IRQ: u64 = 1 << 7;

/// Enable interrupts.
///
/// # Safety
/// This function is unsafe because it can break invariants of other code.
/// Enabling interrupts could lead to memory unsafety, race conditions,
/// deadlocks, and other undefined behavior.
pub unsafe fn enable() {
    // Memory accesses of the critical section must not be moved after
    // interrupts are unmasked.
    compiler_fence(Ordering::SeqCst);

    // SAFETY: The caller must ensure that enabling interrupts is safe.
    unsafe {
        core::arch::asm!("msr daifclr, #2", options(nomem, nostack));
    }
}

/// Disable interrupts. No interrupt will be triggered until interrupts
/// are enabled again. However, exceptions will still be triggered.
pub fn disable() {
    // SAFETY: Disabling interrupts should be safe and should
    // not cause any side effect that could lead to undefined
    // behavior.
    unsafe {
        core::arch::asm!("msr daifset, #2", options(nomem, nostack));
    }

    // Memory accesses of the critical section must not be moved before
    // interrupts are masked.
    compiler_fence(Ordering::SeqCst);
}

/// Check if interrupts are enabled.
#[must_use]
pub fn enabled() -> bool {
    let daif: u64;
    // SAFETY: Reading `DAIF` has no side effect.
    unsafe {
        core::arch::asm!("mrs {}, daif", out(reg) daif, options(nomem, nostack));
    }
    daif & DAIF_IRQ == 0
}
