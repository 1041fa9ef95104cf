use crate::arch::generic::trap::KERNEL_STACK;

core::arch::global_asm!(
    include_str!("asm/boot.asm"),
    stack = sym KERNEL_STACK,
    stack_size = const config::KERNEL_STACK_SIZE,
);

/// Oops ! The kernel panicked and must be stopped. This means that there is a
/// bug in the kernel. It will print some information about the panic if the
/// `logging` feature is enabled and then stop the core forever.
#[cold]
#[panic_handler]
fn panic(info: &core::panic::PanicInfo) -> ! {
    super::irq::disable();
    if let Some(location) = info.location() {
        ::log::error!(
            "Kernel panic at {}:{}: {}",
            location.file(),
            location.line(),
            info.message()
        );
    } else {
        ::log::error!("Kernel panic without location or message :(");
    }

    super::halt();
}

/// The entry point of the kernel, called by the boot code on core 0 at EL1
/// with a valid stack and a cleared BSS. It will call architecture-specific
/// setup and then call the `kernel_main` function which never returns.
#[unsafe(no_mangle)]
extern "C" fn entry() -> ! {
    let timer = super::setup();
    ::log::debug!(
        "Kernel stack: {:p} - {:p}",
        KERNEL_STACK.bottom(),
        KERNEL_STACK.top()
    );
    crate::kernel_main(timer);
}
