//! Thin architecture layer: interrupt enable and the idle instruction.

#[cfg(all(target_arch = "riscv64", not(test)))]
pub fn wait_for_interrupt() {
    unsafe { core::arch::asm!("wfi", options(nomem, nostack)) };
}

#[cfg(any(test, not(target_arch = "riscv64")))]
pub fn wait_for_interrupt() {
    core::hint::spin_loop();
}

/// Arm the machine timer and unmask machine interrupts.
#[cfg(all(target_arch = "riscv64", not(test)))]
pub fn enable_interrupts() {
    use riscv::register::{mie, mstatus};

    crate::timer::rearm(crate::timer::TIMER_INTERVAL);
    unsafe {
        mie::set_mtimer();
        mstatus::set_mie();
    }
}
