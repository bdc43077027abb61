//! Trap decoding and dispatch.
//!
//! The trap vector (boot glue) saves all general-purpose registers and the
//! exception pc into a `TrapFrame` and hands it to `trap_handler`. Decoding
//! the cause register is a pure function so the dispatch rules are testable
//! without hardware.

use bit_field::BitField;

use crate::{log_error, log_info, log_warn};
use crate::{process, scheduler, syscall, timer};

#[cfg(test)]
mod mod_test;

/// Snapshot of the 32 general-purpose registers in architectural order,
/// plus the saved exception pc (`mepc` on entry, restored before `mret`).
#[repr(C)]
pub struct TrapFrame {
    pub regs: [u64; 32],
    pub pc: u64,
}

impl TrapFrame {
    pub const fn new() -> Self {
        TrapFrame {
            regs: [0; 32],
            pc: 0,
        }
    }
}

// Argument-register slots used by the syscall convention.
pub const REG_A0: usize = 10;
pub const REG_A1: usize = 11;
pub const REG_A2: usize = 12;
pub const REG_A7: usize = 17;

/// Decoded trap cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrapCause {
    /// Machine timer interrupt (interrupt cause 7).
    TimerInterrupt,
    /// Machine external interrupt (interrupt cause 11).
    ExternalInterrupt,
    /// Any other interrupt cause.
    UnknownInterrupt(u64),
    /// Environment call from U-, S- or M-mode (exception causes 8, 9, 11).
    EnvironmentCall,
    /// Any other exception cause; fatal for the current process.
    Exception(u64),
}

impl TrapCause {
    /// Decode a raw `mcause` value. Bit 63 separates interrupts from
    /// exceptions; the remaining bits carry the cause number.
    pub fn decode(raw: u64) -> TrapCause {
        if raw.get_bit(63) {
            match raw.get_bits(0..63) {
                7 => TrapCause::TimerInterrupt,
                11 => TrapCause::ExternalInterrupt,
                n => TrapCause::UnknownInterrupt(n),
            }
        } else {
            match raw {
                8 | 9 | 11 => TrapCause::EnvironmentCall,
                n => TrapCause::Exception(n),
            }
        }
    }
}

/// Route a decoded trap.
pub fn handle(cause: TrapCause, frame: &mut TrapFrame) {
    match cause {
        TrapCause::TimerInterrupt => {
            timer::rearm(timer::TIMER_INTERVAL);
            scheduler::schedule();
        }
        TrapCause::ExternalInterrupt => {
            // No external devices are wired up beyond the polled UART.
            log_info!("external interrupt");
        }
        TrapCause::UnknownInterrupt(cause) => {
            log_warn!("unknown interrupt: {:#x}", cause);
        }
        TrapCause::EnvironmentCall => {
            syscall::handle_syscall(frame);
            // Resume after the ecall instruction.
            frame.pc += 4;
        }
        TrapCause::Exception(cause) => {
            log_error!("EXCEPTION: {:#x} at PC: {:#x}", cause, frame.pc);
            process::exit(-1);
        }
    }
}

/// Entry point called by the trap vector.
#[cfg(all(target_arch = "riscv64", not(test)))]
pub fn trap_handler(frame: &mut TrapFrame) {
    let raw = riscv::register::mcause::read().bits() as u64;
    handle(TrapCause::decode(raw), frame);
}
