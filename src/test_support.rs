//! Helpers for tests that exercise the kernel-wide singletons.
//!
//! The process table, file table, heap and console are global; tests that
//! go through them serialize on one lock and get every singleton reset to
//! a fresh state while the guard is held. Tests against local instances
//! do not need any of this.

use alloc::string::String;
use alloc::vec;
use core::sync::atomic::Ordering;
use lazy_static::lazy_static;
use spin::{Mutex, MutexGuard};

use crate::fs::{FileTable, FILES};
use crate::memory::HEAP;
use crate::process::{ProcessTable, PROCESS_TABLE};
use crate::scheduler;
use crate::timer;
use crate::uart::CONSOLE;

static KERNEL_TEST_LOCK: Mutex<()> = Mutex::new(());

lazy_static! {
    /// Backing window handed to the global heap on the host.
    static ref TEST_HEAP_WINDOW: (usize, usize) = {
        let buf = vec![0u64; (256 * 1024) / 8].leak();
        let start = buf.as_ptr() as usize;
        (start, start + 256 * 1024)
    };
}

/// Serialize access to the global kernel state and reset it.
pub fn lock_kernel() -> MutexGuard<'static, ()> {
    let guard = KERNEL_TEST_LOCK.lock();
    *PROCESS_TABLE.lock() = ProcessTable::new();
    *FILES.lock() = FileTable::new();
    let (start, end) = *TEST_HEAP_WINDOW;
    unsafe { HEAP.lock().init(start, end) };
    CONSOLE.lock().clear();
    timer::set_now(0);
    scheduler::RUNNING.store(false, Ordering::Relaxed);
    guard
}

/// Everything printed to the mock console since the last reset.
pub fn console_output() -> String {
    String::from_utf8_lossy(CONSOLE.lock().output()).into_owned()
}

/// Queue bytes for the mock console to read.
pub fn push_console_input(data: &[u8]) {
    CONSOLE.lock().push_input(data);
}
