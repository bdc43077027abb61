//! Machine timer access (CLINT on the QEMU virt machine).
//!
//! `mtime` is the free-running monotonic counter; writing `mtimecmp`
//! schedules the next machine timer interrupt. On non-riscv builds a
//! mock counter stands in so timer-driven logic stays unit-testable.

/// Timer interrupt period: 10_000_000 ticks, about 100 ms at 100 MHz.
pub const TIMER_INTERVAL: u64 = 10_000_000;

/// Timer ticks per millisecond at the 100 MHz timebase.
pub const TICKS_PER_MS: u64 = 100_000;

#[cfg(all(target_arch = "riscv64", not(test)))]
mod clint {
    use volatile::Volatile;

    const MTIME: usize = 0x0200_bff8;
    const MTIMECMP: usize = 0x0200_4000;

    pub fn now() -> u64 {
        let mtime = unsafe { &*(MTIME as *const Volatile<u64>) };
        mtime.read()
    }

    pub fn rearm(cycles: u64) {
        let mtimecmp = unsafe { &mut *(MTIMECMP as *mut Volatile<u64>) };
        mtimecmp.write(now() + cycles);
    }
}

#[cfg(any(test, not(target_arch = "riscv64")))]
mod clint {
    use core::sync::atomic::{AtomicU64, Ordering};

    static MTIME: AtomicU64 = AtomicU64::new(0);
    static MTIMECMP: AtomicU64 = AtomicU64::new(0);

    pub fn now() -> u64 {
        MTIME.load(Ordering::Relaxed)
    }

    pub fn rearm(cycles: u64) {
        MTIMECMP.store(now() + cycles, Ordering::Relaxed);
    }

    /// Advance the mock counter to an absolute value.
    pub fn set_now(ticks: u64) {
        MTIME.store(ticks, Ordering::Relaxed);
    }

    /// The compare value from the most recent `rearm`.
    pub fn deadline() -> u64 {
        MTIMECMP.load(Ordering::Relaxed)
    }
}

pub use clint::{now, rearm};

#[cfg(any(test, not(target_arch = "riscv64")))]
pub use clint::{deadline, set_now};
