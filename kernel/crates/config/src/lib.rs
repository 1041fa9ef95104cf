#![no_std]

/// The number of ticks the countdown is rearmed with when the timer interrupt
/// fires while no timer is pending. Rather than clearing the interrupt routing
/// bit of the core timer controller, the handler pushes the next expiry far
/// enough in the future to keep the line quiet. Re-enabling the routing bit
/// right after clearing it has a race window on the BCM2836 local controller,
/// and this sidesteps it.
///
/// At the 19.2 MHz counter frequency of the Raspberry Pi 3, this is a little
/// more than 5 milliseconds.
pub const SPURIOUS_REARM_TICKS: u64 = 100_000;

/// The size of the static arena claimed by the kernel heap. Every pending
/// timer lives in a heap allocated slab, so this bounds the number of timers
/// that can be pending at the same time. A few kilobytes would be enough for
/// the shell, but larger payloads (long messages) quickly add up.
pub const HEAP_SIZE: usize = 256 * 1024;

/// The size of the kernel stack, set up by the boot code before jumping into
/// Rust. Interrupts are handled on the same stack, so it must be large enough
/// to handle a timer callback running on top of an interrupted shell.
pub const KERNEL_STACK_SIZE: usize = 64 * 1024;

/// The maximum length of a line typed in the shell, in bytes. Longer lines are
/// rejected as a whole.
pub const SHELL_LINE_LENGTH: usize = 128;

/// The interval, in seconds, of the periodic timer started by the `twoSec`
/// shell command.
pub const PERIODIC_INTERVAL_SECS: u64 = 2;

/// The base address of the BCM2837 peripherals, as seen by the ARM cores.
pub const PERIPHERAL_BASE: usize = 0x3F00_0000;

/// The base address of the BCM2836 ARM local peripherals, which contains the
/// per-core timer interrupt routing registers.
pub const LOCAL_PERIPHERAL_BASE: usize = 0x4000_0000;
