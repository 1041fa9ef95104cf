/// A 32 bits memory-mapped register of a peripheral.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Register(usize);

impl Register {
    /// Create a register at the given physical address. The MMU is off, so
    /// physical and virtual addresses are the same.
    ///
    /// # Safety
    /// The address must be the address of a 32 bits device register, aligned
    /// and valid for volatile reads and writes for the whole kernel lifetime.
    #[must_use]
    pub const unsafe fn at(address: usize) -> Self {
        Self(address)
    }

    /// Read the register.
    #[must_use]
    pub fn read(self) -> u32 {
        // SAFETY: The caller of `Register::at` guaranteed that the address
        // is valid for 32 bits volatile reads.
        unsafe { core::ptr::read_volatile(self.0 as *const u32) }
    }

    /// Write the register.
    pub fn write(self, value: u32) {
        // SAFETY: The caller of `Register::at` guaranteed that the address
        // is valid for 32 bits volatile writes.
        unsafe { core::ptr::write_volatile(self.0 as *mut u32, value) }
    }

    /// Read the register, apply `f` to its value and write the result back.
    pub fn modify(self, f: impl FnOnce(u32) -> u32) {
        self.write(f(self.read()));
    }
}
