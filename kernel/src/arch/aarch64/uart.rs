//! The BCM2837 mini UART, wired to GPIO 14 (TX) and 15 (RX). It is used in
//! polling mode for both directions.
use super::mmio::Register;
use bitflags::bitflags;

bitflags! {
    /// The bits of the `AUX_MU_LSR` line status register.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct LineStatus: u32 {
        /// The receive FIFO holds at least one byte.
        const DATA_READY = 1 << 0;
        /// The transmit FIFO can accept at least one byte.
        const TX_EMPTY = 1 << 5;
    }
}

const GPIO_BASE: usize = config::PERIPHERAL_BASE + 0x20_0000;
const AUX_BASE: usize = config::PERIPHERAL_BASE + 0x21_5000;

// SAFETY: All the addresses below are device registers of the BCM2837
// peripherals, which are identity mapped since the MMU is off.
const GPFSEL1: Register = unsafe { Register::at(GPIO_BASE + 0x04) };
const GPPUD: Register = unsafe { Register::at(GPIO_BASE + 0x94) };
const GPPUDCLK0: Register = unsafe { Register::at(GPIO_BASE + 0x98) };
const AUX_ENABLES: Register = unsafe { Register::at(AUX_BASE + 0x04) };
const AUX_MU_IO: Register = unsafe { Register::at(AUX_BASE + 0x40) };
const AUX_MU_IER: Register = unsafe { Register::at(AUX_BASE + 0x44) };
const AUX_MU_IIR: Register = unsafe { Register::at(AUX_BASE + 0x48) };
const AUX_MU_LCR: Register = unsafe { Register::at(AUX_BASE + 0x4C) };
const AUX_MU_MCR: Register = unsafe { Register::at(AUX_BASE + 0x50) };
const AUX_MU_LSR: Register = unsafe { Register::at(AUX_BASE + 0x54) };
const AUX_MU_CNTL: Register = unsafe { Register::at(AUX_BASE + 0x60) };
const AUX_MU_BAUD: Register = unsafe { Register::at(AUX_BASE + 0x68) };

/// The baud rate divisor for 115200 bauds with the 250 MHz system clock.
const BAUD_115200: u32 = 270;

/// The alternate function 5 of GPIO 14 and 15 is the mini UART.
const GPIO_ALT5: u32 = 0b010;

/// Setup the mini UART: 8 data bits, no parity, 115200 bauds, no interrupt.
pub fn setup() {
    // Select the alternate function 5 for GPIO 14 and 15, which are
    // controlled by bits 12-14 and 15-17 of `GPFSEL1`.
    GPFSEL1.modify(|mut selector| {
        selector &= !((0b111 << 12) | (0b111 << 15));
        selector | (GPIO_ALT5 << 12) | (GPIO_ALT5 << 15)
    });

    // Disable the pull-up/down resistors of both pins. The clock signal
    // must be held for at least 150 cycles after each step.
    GPPUD.write(0);
    wait_cycles(150);
    GPPUDCLK0.write((1 << 14) | (1 << 15));
    wait_cycles(150);
    GPPUDCLK0.write(0);

    AUX_ENABLES.modify(|enables| enables | 1);
    AUX_MU_CNTL.write(0);
    AUX_MU_IER.write(0);
    AUX_MU_LCR.write(3);
    AUX_MU_MCR.write(0);
    AUX_MU_IIR.write(0xC6);
    AUX_MU_BAUD.write(BAUD_115200);
    AUX_MU_CNTL.write(3);
}

/// Send a byte, waiting for room in the transmit FIFO.
pub fn write_byte(byte: u8) {
    while !line_status().contains(LineStatus::TX_EMPTY) {
        core::hint::spin_loop();
    }
    AUX_MU_IO.write(u32::from(byte));
}

/// Send a string. Line feeds are sent as carriage return and line feed pairs,
/// which is what most terminal emulators expect.
pub fn write(message: &str) {
    for byte in message.bytes() {
        if byte == b'\n' {
            write_byte(b'\r');
        }
        write_byte(byte);
    }
}

/// Wait for a byte to be received and return it. Carriage returns are
/// translated to line feeds.
#[must_use]
pub fn read_byte() -> u8 {
    while !line_status().contains(LineStatus::DATA_READY) {
        core::hint::spin_loop();
    }

    // Only the low 8 bits of the register hold data.
    #[allow(clippy::cast_possible_truncation)]
    match AUX_MU_IO.read() as u8 {
        b'\r' => b'\n',
        byte => byte,
    }
}

fn line_status() -> LineStatus {
    LineStatus::from_bits_truncate(AUX_MU_LSR.read())
}

fn wait_cycles(cycles: usize) {
    for _ in 0..cycles {
        // SAFETY: A `nop` has no side effect.
        unsafe {
            core::arch::asm!("nop", options(nomem, nostack, preserves_flags));
        }
    }
}
