/// Write a string to the console. Line feeds are translated to carriage
/// return and line feed pairs.
pub fn write(message: &str) {
    crate::arch::target::uart::write(message);
}

/// Wait for a byte from the console and return it.
#[must_use]
pub fn read_byte() -> u8 {
    crate::arch::target::uart::read_byte()
}
