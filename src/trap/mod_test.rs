use super::{handle, TrapCause, TrapFrame, REG_A0, REG_A7};
use crate::process::{self, ProcessState, PROCESS_TABLE};
use crate::syscall::SYS_GETPID;
use crate::test_support::{console_output, lock_kernel};
use crate::timer;

fn noop_entry() {}

#[test]
fn decode_separates_interrupts_from_exceptions() {
    const INTERRUPT: u64 = 1 << 63;
    assert_eq!(TrapCause::decode(INTERRUPT | 7), TrapCause::TimerInterrupt);
    assert_eq!(TrapCause::decode(INTERRUPT | 11), TrapCause::ExternalInterrupt);
    assert_eq!(TrapCause::decode(INTERRUPT | 3), TrapCause::UnknownInterrupt(3));

    // Exception cause 11 is an M-mode ecall, not the external interrupt.
    assert_eq!(TrapCause::decode(8), TrapCause::EnvironmentCall);
    assert_eq!(TrapCause::decode(9), TrapCause::EnvironmentCall);
    assert_eq!(TrapCause::decode(11), TrapCause::EnvironmentCall);

    assert_eq!(TrapCause::decode(2), TrapCause::Exception(2));
    assert_eq!(TrapCause::decode(13), TrapCause::Exception(13));
}

#[test]
fn environment_call_advances_the_saved_pc_by_four() {
    let _guard = lock_kernel();
    let mut frame = TrapFrame::new();
    frame.pc = 0x8000_0100;
    frame.regs[REG_A7] = SYS_GETPID;

    handle(TrapCause::EnvironmentCall, &mut frame);

    assert_eq!(frame.pc, 0x8000_0104);
    // No current process, so getpid reports 0.
    assert_eq!(frame.regs[REG_A0], 0);
}

#[test]
fn timer_interrupt_rearms_before_returning() {
    let _guard = lock_kernel();
    timer::set_now(500);

    let mut frame = TrapFrame::new();
    handle(TrapCause::TimerInterrupt, &mut frame);

    assert_eq!(timer::deadline(), 500 + timer::TIMER_INTERVAL);
}

#[test]
fn fatal_exception_terminates_the_current_process() {
    let _guard = lock_kernel();
    let pid = process::create_process("victim", noop_entry, 1).unwrap();
    PROCESS_TABLE.lock().dispatch_to(pid).unwrap();

    let mut frame = TrapFrame::new();
    frame.pc = 0x8000_2000;
    // Illegal instruction.
    handle(TrapCause::Exception(2), &mut frame);

    let table = PROCESS_TABLE.lock();
    let proc = table.by_pid(pid).unwrap();
    assert_eq!(proc.state, ProcessState::Zombie);
    assert_eq!(proc.exit_status, -1);
    assert_eq!(proc.stack_base, 0);
    drop(table);
    assert!(console_output().contains("EXCEPTION: 0x2"));
}

#[test]
fn unknown_interrupt_is_logged_and_ignored() {
    let _guard = lock_kernel();
    let mut frame = TrapFrame::new();
    handle(TrapCause::UnknownInterrupt(5), &mut frame);
    assert!(console_output().contains("unknown interrupt: 0x5"));
}
