use core::{
    cell::UnsafeCell,
    sync::atomic::{AtomicBool, Ordering},
};

/// The global heap allocator. Pending timers and their messages are the main
/// users of the heap.
///
/// # Interrupts
/// The allocator is protected by a spinlock, which is not enough against the
/// timer interrupt handler: if a timer callback allocates or frees memory
/// while the interrupted code holds the lock, the core deadlocks. Timer
/// callbacks are free to use the heap, so the code running outside of the
/// handler must only use the heap with IRQs disabled (see
/// [`crate::arch::irq::without`]). The timer scheduler already does this for
/// its own allocations.
#[global_allocator]
static ALLOCATOR: talc::Talck<spin::Mutex<()>, OomHandler> =
    talc::Talck::new(talc::Talc::new(OomHandler {}));

/// The memory backing the heap. It is handed to the allocator on the first
/// allocation.
static ARENA: Arena = Arena(UnsafeCell::new([0; config::HEAP_SIZE]));

/// Set once the arena has been claimed by the allocator.
static CLAIMED: AtomicBool = AtomicBool::new(false);

#[repr(align(16))]
struct Arena(UnsafeCell<[u8; config::HEAP_SIZE]>);

// SAFETY: The arena is only accessed through the allocator, which serializes
// accesses with its own lock.
unsafe impl Sync for Arena {}

/// The global OOM handler when the kernel heap is exhausted. The first time,
/// it hands the static arena to the allocator. After that, the system is
/// truly out of memory and the allocation fails, which makes the kernel
/// panic.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
struct OomHandler {}

impl talc::OomHandler for OomHandler {
    fn handle_oom(talc: &mut talc::Talc<Self>, layout: core::alloc::Layout) -> Result<(), ()> {
        if CLAIMED.swap(true, Ordering::Relaxed) {
            log::error!(
                "Kernel heap exhausted while allocating {} bytes",
                layout.size()
            );
            return Err(());
        }

        log::debug!(
            "Claiming {} bytes for the kernel heap",
            config::HEAP_SIZE
        );

        let start = ARENA.0.get().cast::<u8>();
        let end = start.wrapping_add(config::HEAP_SIZE);

        // SAFETY: The given span is valid, does not overlap with any other
        // span, is not in use anywhere else in the system and is valid for
        // reads and writes. It is only claimed once thanks to `CLAIMED`.
        unsafe { talc.claim(talc::Span::new(start, end)).map(|_| ()) }
    }
}

/// Setup the global kernel heap allocator.
#[inline]
pub fn setup() {
    log::info!("Setting up the kernel heap allocator");
    // The heap will be initialized by the global allocator when the
    // first allocation will be requested.
}
