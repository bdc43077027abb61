use super::{ConsoleWriter, MockUart, Uart, UartExt};
use core::fmt::Write;

#[test]
fn write_and_capture() {
    let mut uart = MockUart::new();
    uart.write_byte(b'o');
    uart.write_byte(b'k');
    assert_eq!(uart.output(), b"ok");
}

#[test]
fn put_char_translates_newline() {
    let mut uart = MockUart::new();
    uart.put_char(b'a');
    uart.put_char(b'\n');
    assert_eq!(uart.output(), b"a\r\n");
}

#[test]
fn console_writer_formats_hex_and_decimal() {
    let mut uart = MockUart::new();
    write!(ConsoleWriter(&mut uart), "pid {} at {:#x}", 3, 0x8000_0000u64).unwrap();
    assert_eq!(uart.output(), b"pid 3 at 0x80000000");
}

#[test]
fn read_line_terminates_on_cr() {
    let mut uart = MockUart::with_input(b"help\r");
    let mut buf = [0u8; 128];
    let len = uart.read_line(&mut buf);
    assert_eq!(&buf[..len], b"help");
    // Echo plus the CRLF that ends the line.
    assert_eq!(uart.output(), b"help\r\n");
}

#[test]
fn read_line_terminates_on_lf() {
    let mut uart = MockUart::with_input(b"ps\n");
    let mut buf = [0u8; 128];
    let len = uart.read_line(&mut buf);
    assert_eq!(&buf[..len], b"ps");
}

#[test]
fn read_line_backspace_edits() {
    // "cta" + two erases + "at file" -> "cat file"
    let mut uart = MockUart::with_input(b"cta\x7f\x08at file\r");
    let mut buf = [0u8; 128];
    let len = uart.read_line(&mut buf);
    assert_eq!(&buf[..len], b"cat file");
}

#[test]
fn read_line_backspace_on_empty_line() {
    let mut uart = MockUart::with_input(b"\x7fls\r");
    let mut buf = [0u8; 128];
    let len = uart.read_line(&mut buf);
    assert_eq!(&buf[..len], b"ls");
}

#[test]
fn read_line_ignores_unprintable_input() {
    let mut uart = MockUart::with_input(b"m\x01\x1bem\r");
    let mut buf = [0u8; 128];
    let len = uart.read_line(&mut buf);
    assert_eq!(&buf[..len], b"mem");
}

#[test]
fn read_line_respects_buffer_capacity() {
    let mut uart = MockUart::with_input(b"abcdef\r");
    let mut buf = [0u8; 4];
    let len = uart.read_line(&mut buf);
    assert_eq!(&buf[..len], b"abcd");
}
