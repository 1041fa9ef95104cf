use core::cell::UnsafeCell;

/// The only kernel stack. The boot code points the stack pointer at its top
/// before jumping into Rust, and interrupts are handled on top of whatever
/// was running at the time, so timer callbacks share this stack with the
/// shell.
pub static KERNEL_STACK: KernelStack = KernelStack::new();

/// The kernel stack. The stack is packed inside a struct to ensure that it is
/// properly aligned to 16 bytes, as required by the aarch64 ABI. The memory
/// is written behind the compiler's back, hence the `UnsafeCell`.
#[repr(align(16))]
pub struct KernelStack {
    stack: UnsafeCell<[u8; config::KERNEL_STACK_SIZE]>,
}

// SAFETY: The stack is never accessed through Rust references, only through
// the stack pointer of the single core running the kernel.
unsafe impl Sync for KernelStack {}

impl KernelStack {
    /// Create a new kernel stack.
    ///
    /// # Usage
    /// This function should only be used to create static instances of
    /// `KernelStack`, like the `KERNEL_STACK` static variable defined
    /// above. Calling this function at runtime will overflow the stack
    /// since Rust does not support placement allocation !
    #[must_use]
    pub const fn new() -> Self {
        Self {
            stack: UnsafeCell::new([0; config::KERNEL_STACK_SIZE]),
        }
    }

    /// Get the bottom of the stack.
    #[must_use]
    pub fn bottom(&self) -> *const u8 {
        self.stack.get().cast::<u8>()
    }

    /// Get the top of the stack.
    #[must_use]
    pub fn top(&self) -> *const u8 {
        self.bottom().wrapping_add(config::KERNEL_STACK_SIZE)
    }
}

impl Default for KernelStack {
    fn default() -> Self {
        Self::new()
    }
}

/// The kind of exception that caused the kernel to be interrupted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trap {
    /// A synchronous exception, triggered by the CPU when it encounters an
    /// error or an unexpected condition while executing an instruction.
    Synchronous,

    /// An interrupt, which is an asynchronous event triggered by a
    /// peripheral. The core timer is the only source enabled by the kernel.
    Interrupt,

    /// A fast interrupt. The kernel never routes anything to FIQs.
    FastInterrupt,

    /// An asynchronous system error, usually an external abort.
    SystemError,
}

impl Trap {
    /// Decode the kind of exception passed by the exception vectors.
    #[must_use]
    pub fn from_vector(kind: u64) -> Option<Self> {
        match kind {
            0 => Some(Trap::Synchronous),
            1 => Some(Trap::Interrupt),
            2 => Some(Trap::FastInterrupt),
            3 => Some(Trap::SystemError),
            _ => None,
        }
    }
}

/// Handle an interrupt. The architecture code calls this once it has
/// identified the core timer as the source of the interrupt and acknowledged
/// it.
pub fn handle_timer_interrupt() {
    crate::time::events::handle_interrupt();
}
