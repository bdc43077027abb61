//! NS16550A driver for the QEMU virt machine.
//!
//! QEMU leaves the device configured; the kernel only needs the data
//! register and the line-status register.

use super::Uart;
use bitflags::bitflags;
use volatile::Volatile;

/// UART MMIO base on the virt platform.
pub const UART_BASE: usize = 0x1000_0000;

const DATA: usize = UART_BASE; // THR on write, RBR on read
const LINE_STATUS: usize = UART_BASE + 5;

bitflags! {
    struct LineStatus: u8 {
        const DATA_READY = 0x01;
        const THR_EMPTY = 0x20;
    }
}

fn line_status() -> LineStatus {
    let lsr = unsafe { &*(LINE_STATUS as *const Volatile<u8>) };
    LineStatus::from_bits_truncate(lsr.read())
}

/// The memory-mapped serial console.
pub struct Ns16550 {
    _private: (),
}

impl Ns16550 {
    pub const fn new() -> Self {
        Ns16550 { _private: () }
    }
}

impl Uart for Ns16550 {
    fn write_byte(&mut self, byte: u8) {
        while !self.can_write() {}
        let data = unsafe { &mut *(DATA as *mut Volatile<u8>) };
        data.write(byte);
    }

    fn read_byte(&mut self) -> u8 {
        while !self.can_read() {}
        let data = unsafe { &*(DATA as *const Volatile<u8>) };
        data.read()
    }

    fn can_read(&self) -> bool {
        line_status().contains(LineStatus::DATA_READY)
    }

    fn can_write(&self) -> bool {
        line_status().contains(LineStatus::THR_EMPTY)
    }
}
