//! Cooperative scheduler.
//!
//! One hart, one live flow of execution. `start` hands the CPU to the
//! designated initial process; `schedule` is the tick shared by the timer
//! interrupt and the voluntary suspension points (sleep, exit, yield).

use core::sync::atomic::{AtomicBool, Ordering};

use crate::process::{Pid, PROCESS_TABLE};
use crate::timer;
use crate::{log_error, println};


pub(crate) static RUNNING: AtomicBool = AtomicBool::new(false);

/// Mark the scheduler live and run the designated initial process.
///
/// No context switch happens on start: the entry runs directly on the boot
/// stack. Returning from here means every process has finished.
pub fn start(pid: Pid) {
    RUNNING.store(true, Ordering::Relaxed);
    let entry = PROCESS_TABLE.lock().dispatch_to(pid);
    let Some(entry) = entry else {
        log_error!("no startable process with pid {}", pid);
        return;
    };
    entry();
    println!("[SCHEDULER] All processes complete");
}

/// Scheduler tick: wake expired sleepers.
///
/// A preemptive implementation would pick the next ready process here and
/// switch contexts; the cooperative reference returns to the interrupted
/// flow instead.
pub fn schedule() {
    if !RUNNING.load(Ordering::Relaxed) {
        return;
    }
    // Interrupt context must not spin on a lock the interrupted process
    // may hold; skip the sweep when the table is busy.
    if let Some(mut table) = PROCESS_TABLE.try_lock() {
        table.wake_sweep(timer::now());
    }
}

/// Voluntarily give the scheduler a tick.
pub fn yield_now() {
    schedule();
}
