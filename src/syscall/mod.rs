//! System call layer: the numbered kernel services behind the ecall gate.
//!
//! Arguments arrive in the saved register slots of the trap frame: the
//! syscall number in a7, up to three arguments in a0..a2. The result goes
//! back into a0. String arguments are passed as (pointer, length) pairs.

use crate::fs::FILES;
use crate::process::{self, PROCESS_TABLE};
use crate::scheduler;
use crate::timer;
use crate::trap::{TrapFrame, REG_A0, REG_A1, REG_A2, REG_A7};
use crate::uart::{Uart, UartExt, CONSOLE};
use crate::{log_warn, println};


/// Syscall numbers (passed in a7).
pub const SYS_EXIT: u64 = 1;
pub const SYS_WRITE: u64 = 2;
pub const SYS_READ: u64 = 3;
pub const SYS_SLEEP: u64 = 4;
pub const SYS_GETPID: u64 = 5;
pub const SYS_EXEC: u64 = 6;
pub const SYS_OPEN: u64 = 7;
pub const SYS_CLOSE: u64 = 8;

pub const STDIN: u64 = 0;
pub const STDOUT: u64 = 1;

/// -1 on the unsigned syscall surface.
const ERR: u64 = u64::MAX;

/// Central dispatcher, invoked by the trap handler for every ecall.
pub fn handle_syscall(frame: &mut TrapFrame) {
    let number = frame.regs[REG_A7];
    let arg0 = frame.regs[REG_A0];
    let arg1 = frame.regs[REG_A1];
    let arg2 = frame.regs[REG_A2];

    let result = match number {
        SYS_EXIT => {
            process::exit(arg0 as i32);
            // Reached only because the cooperative model returns here.
            0
        }
        SYS_WRITE => sys_write(arg0, arg1, arg2),
        SYS_READ => sys_read(arg0, arg1, arg2),
        SYS_SLEEP => {
            do_sleep(arg0);
            0
        }
        SYS_GETPID => process::current_pid().map_or(0, |pid| u64::from(pid.0)),
        SYS_EXEC => match user_str(arg0, arg1) {
            Some(path) => exec(path) as u64,
            None => ERR,
        },
        SYS_OPEN => match user_str(arg0, arg1) {
            Some(path) => FILES.lock().open(path).map_or(0, |id| id.raw()),
            None => 0,
        },
        SYS_CLOSE => 0,
        _ => {
            log_warn!("unknown syscall: {:#x}", number);
            ERR
        }
    };

    frame.regs[REG_A0] = result;
}

fn sys_write(fd: u64, buf: u64, len: u64) -> u64 {
    if fd != STDOUT || len == 0 {
        return 0;
    }
    // All code runs in machine mode over identity-mapped memory; the
    // pointer is trusted like any other kernel pointer.
    let bytes = unsafe { core::slice::from_raw_parts(buf as *const u8, len as usize) };
    let mut console = CONSOLE.lock();
    for &byte in bytes {
        console.put_char(byte);
    }
    len
}

fn sys_read(fd: u64, buf: u64, len: u64) -> u64 {
    if fd != STDIN || len == 0 {
        return 0;
    }
    let bytes = unsafe { core::slice::from_raw_parts_mut(buf as *mut u8, len as usize) };
    let mut console = CONSOLE.lock();
    let mut count: u64 = 0;
    for slot in bytes.iter_mut() {
        let byte = console.read_byte();
        *slot = byte;
        count += 1;
        if byte == b'\n' {
            break;
        }
    }
    count
}

fn do_sleep(ms: u64) {
    let wake_at = timer::now() + ms * timer::TICKS_PER_MS;
    PROCESS_TABLE.lock().sleep_current(wake_at);
    scheduler::schedule();
}

/// Borrow a (pointer, length) argument pair as a string.
fn user_str<'a>(ptr: u64, len: u64) -> Option<&'a str> {
    if len == 0 {
        return Some("");
    }
    let bytes = unsafe { core::slice::from_raw_parts(ptr as *const u8, len as usize) };
    core::str::from_utf8(bytes).ok()
}

/// Validate that a named program exists. Binary loading is not implemented;
/// only the file metadata is read and reported.
pub fn exec(path: &str) -> i64 {
    let files = FILES.lock();
    let Some(file) = files.find(path) else {
        println!("Cannot open: {}", path);
        return -1;
    };
    println!("Executing: {} ({} bytes)", path, file.size());
    println!("Program executed successfully");
    0
}

// ── User-side wrappers ──────────────────────────────────────────────────
//
// On riscv64 these issue a real ecall, trapping into the dispatcher above.
// Host builds construct a trap frame and push it through the same dispatch
// path, so the whole gate is exercised by tests.

#[cfg(all(target_arch = "riscv64", not(test)))]
fn invoke(number: u64, arg0: u64, arg1: u64, arg2: u64) -> u64 {
    let result;
    unsafe {
        core::arch::asm!(
            "ecall",
            in("a7") number,
            inlateout("a0") arg0 => result,
            in("a1") arg1,
            in("a2") arg2,
        );
    }
    result
}

#[cfg(any(test, not(target_arch = "riscv64")))]
fn invoke(number: u64, arg0: u64, arg1: u64, arg2: u64) -> u64 {
    use crate::trap::{self, TrapCause};
    let mut frame = TrapFrame::new();
    frame.regs[REG_A7] = number;
    frame.regs[REG_A0] = arg0;
    frame.regs[REG_A1] = arg1;
    frame.regs[REG_A2] = arg2;
    trap::handle(TrapCause::EnvironmentCall, &mut frame);
    frame.regs[REG_A0]
}

/// Terminate the calling process. Under the cooperative reference model
/// this returns to the caller, which is expected to park itself.
pub fn exit(status: i32) {
    invoke(SYS_EXIT, status as u64, 0, 0);
}

pub fn write(fd: u64, buf: &[u8]) -> u64 {
    invoke(SYS_WRITE, fd, buf.as_ptr() as u64, buf.len() as u64)
}

pub fn read(fd: u64, buf: &mut [u8]) -> u64 {
    invoke(SYS_READ, fd, buf.as_mut_ptr() as u64, buf.len() as u64)
}

/// Sleep for `ms` milliseconds of timer time.
pub fn sleep(ms: u64) {
    invoke(SYS_SLEEP, ms, 0, 0);
}

pub fn getpid() -> u64 {
    invoke(SYS_GETPID, 0, 0, 0)
}

pub fn open(path: &str) -> u64 {
    invoke(SYS_OPEN, path.as_ptr() as u64, path.len() as u64, 0)
}

pub fn close(handle: u64) -> u64 {
    invoke(SYS_CLOSE, handle, 0, 0)
}
