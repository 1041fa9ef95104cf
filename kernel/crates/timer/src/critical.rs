//! Critical sections protecting the timer queue from the interrupt handler.
//!
//! On a single core, the only thing that can race with the code manipulating
//! the timer queue is the timer interrupt handler itself. Masking interrupts
//! around every access to the queue is therefore enough to guarantee exclusive
//! access, without any lock.
use crate::hw::InterruptController;
use core::sync::atomic::{Ordering, compiler_fence};

/// A guard masking interrupts for as long as it lives. Interrupts are masked
/// when the guard is created and unmasked when it is dropped, whatever the
/// path taken to leave the scope.
///
/// # Nesting
/// Unmasking is unconditional: leaving a critical section always unmasks
/// interrupts, even if they were masked before entering it. This is what
/// allows timer callbacks to run with interrupts unmasked even though the
/// interrupt handler was entered with interrupts masked by the CPU. As a
/// consequence, critical sections must not be nested.
///
/// # Ordering
/// Memory accesses made inside the critical section are never reordered
/// outside of it by the compiler, so a lock taken and released inside is
/// always released by the time interrupts are unmasked.
#[must_use = "interrupts are unmasked as soon as the guard is dropped"]
pub struct CriticalSection<'a, I: InterruptController + ?Sized> {
    controller: &'a I,
}

impl<'a, I: InterruptController + ?Sized> CriticalSection<'a, I> {
    /// Mask interrupts and return a guard that will unmask them when dropped.
    pub fn enter(controller: &'a I) -> Self {
        controller.mask();
        compiler_fence(Ordering::SeqCst);
        Self { controller }
    }
}

impl<I: InterruptController + ?Sized> Drop for CriticalSection<'_, I> {
    fn drop(&mut self) {
        compiler_fence(Ordering::SeqCst);
        self.controller.unmask();
    }
}

/// Execute the given closure with interrupts masked, returning the result of
/// the closure. Interrupts are unmasked when the closure returns.
pub fn without<I, F, R>(controller: &I, f: F) -> R
where
    I: InterruptController + ?Sized,
    F: FnOnce() -> R,
{
    let _section = CriticalSection::enter(controller);
    f()
}
