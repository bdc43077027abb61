//! Process table and lifecycle.
//!
//! A fixed array of slots holds every process record; the slot index is
//! unrelated to the pid. The table owns the records and their stacks, and
//! the running process is tracked as a slot index, never as a second owner.

use alloc::string::String;
use core::fmt;
use core::ptr::NonNull;
use lazy_static::lazy_static;
use spin::Mutex;

use crate::memory::{HeapAllocator, HEAP};
use crate::println;


pub const MAX_PROCESSES: usize = 32;
pub const STACK_SIZE: usize = 8192;

/// Longest stored process name, in bytes.
pub const NAME_LEN: usize = 31;

/// Register slots reserved below the saved pc and ra in a fresh context
/// (s0-s11, t0-t6, a0-a7 and change on riscv64).
const SAVED_REGS: usize = 30;

/// Process identifier. `Pid(0)` marks an unused slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Pid(pub u32);

impl fmt::Display for Pid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Lifecycle state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    Unused,
    Ready,
    Running,
    Sleeping,
    Waiting,
    Zombie,
}

impl ProcessState {
    fn as_str(self) -> &'static str {
        match self {
            ProcessState::Unused => "UNUSED",
            ProcessState::Ready => "READY",
            ProcessState::Running => "RUNNING",
            ProcessState::Sleeping => "SLEEPING",
            ProcessState::Waiting => "WAITING",
            ProcessState::Zombie => "ZOMBIE",
        }
    }
}

impl fmt::Display for ProcessState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessError {
    TableFull,
    OutOfMemory,
}

impl fmt::Display for ProcessError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ProcessError::TableFull => write!(f, "no free process slots"),
            ProcessError::OutOfMemory => write!(f, "failed to allocate stack"),
        }
    }
}

pub type ProcessResult<T> = Result<T, ProcessError>;

/// One schedulable unit.
pub struct Process {
    pub pid: Pid,
    pub name: String,
    pub state: ProcessState,
    /// Larger means more urgent. The idle process runs at 0.
    pub priority: u32,
    /// Bottom of the owned stack region; 0 once the stack is released.
    pub stack_base: usize,
    pub stack_top: usize,
    /// Saved stack pointer for context restoration.
    pub sp: usize,
    pub entry: Option<fn()>,
    /// Timer value at which a sleeping process becomes ready.
    pub wake_at: u64,
    pub exit_status: i32,
}

impl Process {
    const UNUSED: Process = Process {
        pid: Pid(0),
        name: String::new(),
        state: ProcessState::Unused,
        priority: 0,
        stack_base: 0,
        stack_top: 0,
        sp: 0,
        entry: None,
        wake_at: 0,
        exit_status: 0,
    };
}

/// Lay out the initial saved context at the top of a fresh stack: the entry
/// address, a zero return address, and zeroed register slots. Returns the
/// resulting stack pointer.
unsafe fn write_initial_context(stack_top: usize, entry: fn()) -> usize {
    let mut sp = stack_top;
    sp -= 8;
    unsafe { (sp as *mut u64).write(entry as usize as u64) }; // saved pc
    sp -= 8;
    unsafe { (sp as *mut u64).write(0) }; // saved ra
    sp -= SAVED_REGS * 8;
    unsafe { core::ptr::write_bytes(sp as *mut u8, 0, SAVED_REGS * 8) };
    sp
}

fn truncate_name(name: &mut String) {
    if name.len() > NAME_LEN {
        let mut cut = NAME_LEN;
        while !name.is_char_boundary(cut) {
            cut -= 1;
        }
        name.truncate(cut);
    }
}

/// The fixed-slot process registry.
pub struct ProcessTable {
    slots: [Process; MAX_PROCESSES],
    next_pid: u32,
    current: Option<usize>,
}

impl ProcessTable {
    pub const fn new() -> Self {
        ProcessTable {
            slots: [Process::UNUSED; MAX_PROCESSES],
            next_pid: 1,
            current: None,
        }
    }

    /// Register a new process in the first unused slot.
    ///
    /// The stack comes from `heap`; on any failure the table is left
    /// unchanged, including the pid counter. Names longer than `NAME_LEN`
    /// bytes are truncated in place; nothing in here may allocate, since
    /// the caller typically holds the heap lock.
    pub fn create(
        &mut self,
        mut name: String,
        entry: fn(),
        priority: u32,
        heap: &mut HeapAllocator,
    ) -> ProcessResult<Pid> {
        let slot = self
            .slots
            .iter()
            .position(|p| p.state == ProcessState::Unused)
            .ok_or(ProcessError::TableFull)?;

        let stack = heap.alloc(STACK_SIZE).ok_or(ProcessError::OutOfMemory)?;
        let stack_base = stack.as_ptr() as usize;
        let stack_top = stack_base + STACK_SIZE;
        let sp = unsafe { write_initial_context(stack_top, entry) };

        truncate_name(&mut name);
        let pid = Pid(self.next_pid);
        self.next_pid += 1;

        self.slots[slot] = Process {
            pid,
            name,
            state: ProcessState::Ready,
            priority,
            stack_base,
            stack_top,
            sp,
            entry: Some(entry),
            wake_at: 0,
            exit_status: 0,
        };
        Ok(pid)
    }

    pub fn current(&self) -> Option<&Process> {
        self.current.map(|slot| &self.slots[slot])
    }

    pub fn current_mut(&mut self) -> Option<&mut Process> {
        self.current.map(|slot| &mut self.slots[slot])
    }

    pub fn by_pid(&self, pid: Pid) -> Option<&Process> {
        self.slots
            .iter()
            .find(|p| p.pid == pid && p.state != ProcessState::Unused)
    }

    /// All live (non-unused) records in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &Process> {
        self.slots.iter().filter(|p| p.state != ProcessState::Unused)
    }

    /// Make `pid` the running process and return its entry point.
    ///
    /// Any previously running record drops back to ready, so at most one
    /// record is RUNNING at a time.
    pub fn dispatch_to(&mut self, pid: Pid) -> Option<fn()> {
        let slot = self
            .slots
            .iter()
            .position(|p| p.pid == pid && p.state != ProcessState::Unused)?;
        if let Some(prev) = self.current {
            if prev != slot && self.slots[prev].state == ProcessState::Running {
                self.slots[prev].state = ProcessState::Ready;
            }
        }
        self.slots[slot].state = ProcessState::Running;
        self.current = Some(slot);
        self.slots[slot].entry
    }

    /// Put the running process to sleep until the timer reaches `wake_at`.
    pub fn sleep_current(&mut self, wake_at: u64) {
        if let Some(proc) = self.current_mut() {
            proc.state = ProcessState::Sleeping;
            proc.wake_at = wake_at;
        }
    }

    /// Move every sleeper whose deadline has passed back to ready.
    /// Called from the timer path before the next pick.
    pub fn wake_sweep(&mut self, now: u64) {
        for proc in self.slots.iter_mut() {
            if proc.state == ProcessState::Sleeping && now >= proc.wake_at {
                proc.state = ProcessState::Ready;
            }
        }
    }

    /// Terminate the running process: log, mark it a zombie and release its
    /// stack. Picking a successor is the caller's job.
    pub fn exit_current(&mut self, status: i32, heap: &mut HeapAllocator) {
        let Some(proc) = self.current_mut() else {
            return;
        };
        println!(
            "[KERNEL] Process {} ({}) exited with status {}",
            proc.pid, proc.name, status
        );
        proc.state = ProcessState::Zombie;
        proc.exit_status = status;
        if let Some(stack) = NonNull::new(proc.stack_base as *mut u8) {
            heap.free(stack);
            proc.stack_base = 0;
        }
    }

    /// The ready record with the highest priority; slot order breaks ties.
    pub fn pick_next(&self) -> Option<&Process> {
        let mut best: Option<&Process> = None;
        for proc in self.slots.iter() {
            if proc.state == ProcessState::Ready
                && best.map_or(true, |b| proc.priority > b.priority)
            {
                best = Some(proc);
            }
        }
        best
    }

    /// Print the process listing (the `ps` shell command).
    pub fn list(&self) {
        println!("PID   STATE      PRIORITY  NAME");
        println!("----  ---------  --------  ----");
        for proc in self.iter() {
            println!(
                "{:<5} {:<10} {:<9} {}",
                proc.pid.0, proc.state, proc.priority, proc.name
            );
        }
    }
}

lazy_static! {
    /// The kernel-wide process table.
    pub static ref PROCESS_TABLE: Mutex<ProcessTable> = Mutex::new(ProcessTable::new());
}

/// Create a process backed by the global table and heap.
pub fn create_process(name: &str, entry: fn(), priority: u32) -> ProcessResult<Pid> {
    // Build the owned name before taking locks: nothing may allocate while
    // the heap lock is held.
    let name = String::from(name);
    let mut table = PROCESS_TABLE.lock();
    let mut heap = HEAP.lock();
    table.create(name, entry, priority, &mut heap)
}

/// Terminate the current process and let the scheduler pick a successor.
pub fn exit(status: i32) {
    {
        let mut table = PROCESS_TABLE.lock();
        let mut heap = HEAP.lock();
        table.exit_current(status, &mut heap);
    }
    crate::scheduler::schedule();
}

/// Pid of the running process, if any.
pub fn current_pid() -> Option<Pid> {
    PROCESS_TABLE.lock().current().map(|p| p.pid)
}
