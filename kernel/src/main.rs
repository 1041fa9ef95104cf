#![no_std]
#![no_main]

extern crate alloc;

#[macro_use]
pub mod console;

pub mod arch;
pub mod heap;
pub mod shell;
pub mod time;

/// The `kernel_main` function is called after the architecture-specific
/// initialization was completed, with the core timer ready to be used. It
/// sets up the heap and the timer scheduler, enables interrupts and hands
/// the console over to the shell.
pub fn kernel_main(timer: arch::timer::HardwareTimer) -> ! {
    heap::setup();
    time::events::setup(timer);

    // SAFETY: The exception vectors were installed by the boot code and the
    // timer scheduler is ready to handle the timer interrupt.
    unsafe {
        arch::irq::enable();
    }

    log::info!("Kernel initialized at {}", time::Instant::now());
    shell::run()
}
