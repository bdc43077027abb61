//! Console I/O over the 16550-family UART.
//!
//! The `Uart` trait keeps the kernel independent of the actual device:
//! on riscv64 the NS16550A of the QEMU virt machine is used, everywhere
//! else (host builds, unit tests) an in-memory mock stands in.

use core::fmt;
use lazy_static::lazy_static;
use spin::Mutex;

#[cfg(test)]
mod mod_test;

#[cfg(all(target_arch = "riscv64", not(test)))]
mod ns16550;
#[cfg(any(test, not(target_arch = "riscv64")))]
mod mock;

#[cfg(all(target_arch = "riscv64", not(test)))]
pub use ns16550::Ns16550;
#[cfg(any(test, not(target_arch = "riscv64")))]
pub use mock::MockUart;

#[cfg(all(target_arch = "riscv64", not(test)))]
type ConsoleDevice = Ns16550;
#[cfg(any(test, not(target_arch = "riscv64")))]
type ConsoleDevice = MockUart;

/// Byte-level UART interface.
pub trait Uart {
    /// Write a single byte, blocking until the transmitter is ready.
    fn write_byte(&mut self, byte: u8);

    /// Read a single byte, blocking until data is available.
    fn read_byte(&mut self) -> u8;

    /// Whether a byte is waiting in the receive buffer.
    fn can_read(&self) -> bool;

    /// Whether the transmit holding register is empty.
    fn can_write(&self) -> bool;
}

/// Convenience methods layered on any `Uart`.
pub trait UartExt: Uart {
    /// Write a byte, expanding `\n` to `\r\n`.
    fn put_char(&mut self, byte: u8) {
        if byte == b'\n' {
            self.write_byte(b'\r');
        }
        self.write_byte(byte);
    }

    /// Read one line into `buf` with echo and backspace editing.
    ///
    /// Returns the number of bytes stored (the terminator is not stored).
    /// Backspace (0x08 or 0x7F) erases the previous character, CR or LF
    /// ends the line, and only printable 7-bit ASCII is accepted.
    fn read_line(&mut self, buf: &mut [u8]) -> usize {
        let mut pos = 0;
        loop {
            let byte = self.read_byte();
            match byte {
                b'\r' | b'\n' => {
                    self.write_byte(b'\r');
                    self.write_byte(b'\n');
                    return pos;
                }
                0x08 | 0x7F => {
                    if pos > 0 {
                        pos -= 1;
                        // Erase on screen: backspace, space, backspace.
                        self.write_byte(0x08);
                        self.write_byte(b' ');
                        self.write_byte(0x08);
                    }
                }
                byte if (0x20..0x7F).contains(&byte) => {
                    if pos < buf.len() {
                        buf[pos] = byte;
                        pos += 1;
                        self.write_byte(byte); // echo
                    }
                }
                // Other control characters are ignored.
                _ => {}
            }
        }
    }
}

impl<T: Uart> UartExt for T {}

/// `core::fmt::Write` adapter for a UART, with newline translation.
pub struct ConsoleWriter<'a, T: Uart>(pub &'a mut T);

impl<T: Uart> fmt::Write for ConsoleWriter<'_, T> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for byte in s.bytes() {
            self.0.put_char(byte);
        }
        Ok(())
    }
}

lazy_static! {
    /// The kernel console.
    pub static ref CONSOLE: Mutex<ConsoleDevice> = Mutex::new(ConsoleDevice::new());
}

#[doc(hidden)]
pub fn _print(args: fmt::Arguments) {
    use core::fmt::Write;
    let mut console = CONSOLE.lock();
    let _ = ConsoleWriter(&mut *console).write_fmt(args);
}

#[macro_export]
macro_rules! print {
    ($($arg:tt)*) => {
        $crate::uart::_print(format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! println {
    () => { $crate::print!("\n") };
    ($($arg:tt)*) => {{
        $crate::uart::_print(format_args!($($arg)*));
        $crate::uart::_print(format_args!("\n"));
    }};
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {{
        $crate::uart::_print(format_args!("[INFO] "));
        $crate::uart::_print(format_args!($($arg)*));
        $crate::uart::_print(format_args!("\n"));
    }};
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {{
        $crate::uart::_print(format_args!("[WARN] "));
        $crate::uart::_print(format_args!($($arg)*));
        $crate::uart::_print(format_args!("\n"));
    }};
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {{
        $crate::uart::_print(format_args!("[ERROR] "));
        $crate::uart::_print(format_args!($($arg)*));
        $crate::uart::_print(format_args!("\n"));
    }};
}
