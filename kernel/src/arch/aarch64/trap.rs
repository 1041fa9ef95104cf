use crate::arch::generic::{self, trap::Trap};

core::arch::global_asm!(include_str!("asm/vectors.asm"));

/// The common trap handler, called by the exception vectors with the kind of
/// exception that occurred. The caller-saved registers and the exception
/// return state are saved by the vectors, so the handler is free to unmask
/// interrupts.
#[unsafe(no_mangle)]
extern "C" fn trap_handler(kind: u64) {
    match Trap::from_vector(kind) {
        Some(Trap::Interrupt) => handle_interrupt(),
        Some(Trap::Synchronous) => handle_exception(),
        Some(trap) => {
            ::log::warn!("Unhandled {:?} exception", trap);
        }
        None => panic!("Exception vector passed an invalid kind: {}", kind),
    }
}

/// Dispatch an IRQ. The core timer is the only interrupt source routed to
/// the core, so anything else is logged and ignored.
fn handle_interrupt() {
    if super::timer::pending() {
        generic::trap::handle_timer_interrupt();
    } else {
        ::log::warn!("Interrupt from an unexpected source");
    }
}

/// Synchronous exceptions are always a bug in the kernel, since it never
/// runs any user code.
fn handle_exception() -> ! {
    let esr: u64;
    let elr: u64;
    let far: u64;

    // SAFETY: Reading the exception syndrome, return address and fault
    // address registers has no side effect.
    unsafe {
        core::arch::asm!(
            "mrs {}, esr_el1",
            "mrs {}, elr_el1",
            "mrs {}, far_el1",
            out(reg) esr,
            out(reg) elr,
            out(reg) far,
            options(nomem, nostack)
        );
    }

    panic!(
        "Synchronous exception (esr: {:#x}, elr: {:#x}, far: {:#x})",
        esr, elr, far
    );
}
