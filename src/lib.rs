//! rvOS, a minimal RISC-V kernel for the QEMU virt machine.
//!
//! Everything runs in machine mode on a single hart. The library holds the
//! whole kernel and builds for the host as well, so the allocator, process
//! table, trap dispatch and syscall layer are unit-testable; `main.rs`
//! carries the bare-metal boot glue.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod arch;
pub mod fs;
pub mod memory;
pub mod process;
pub mod scheduler;
pub mod shell;
pub mod syscall;
#[cfg(test)]
pub mod test_support;
pub mod timer;
pub mod trap;
pub mod uart;

// Heap window provided by linker.ld.
#[cfg(all(target_arch = "riscv64", not(test)))]
extern "C" {
    static _heap_start: u8;
    static _heap_end: u8;
}

/// Kernel entry, called from the boot assembly with interrupts disabled.
#[cfg(all(target_arch = "riscv64", not(test)))]
pub fn kernel_main() -> ! {
    println!("\n=== rvOS Booting ===");
    println!("Kernel Version 1.0\n");

    println!("Initializing memory management...");
    unsafe {
        let heap_start = core::ptr::addr_of!(_heap_start) as usize;
        let heap_end = core::ptr::addr_of!(_heap_end) as usize;
        memory::init(heap_start, heap_end);
    }

    println!("Initializing process management...");
    println!("Initializing filesystem...");

    println!("Creating initial processes...");
    let init_pid = spawn("init", init_process, 1);
    let shell_pid = spawn("shell", shell_process, 1);
    let idle_pid = spawn("idle", idle_process, 0);

    println!("\n=== Boot Complete ===");
    println!("Starting scheduler...\n");

    arch::enable_interrupts();
    match (init_pid, shell_pid, idle_pid) {
        (_, Some(shell_pid), _) => scheduler::start(shell_pid),
        _ => log_error!("boot incomplete, not starting the scheduler"),
    }

    // Reaching this point is not supposed to happen.
    log_error!("Scheduler returned!");
    loop {
        arch::wait_for_interrupt();
    }
}

#[cfg(all(target_arch = "riscv64", not(test)))]
fn spawn(name: &str, entry: fn(), priority: u32) -> Option<process::Pid> {
    match process::create_process(name, entry, priority) {
        Ok(pid) => {
            println!("Created {} process (PID {})", name, pid);
            Some(pid)
        }
        Err(err) => {
            log_error!("failed to create {}: {}", name, err);
            None
        }
    }
}

/// First process: seeds the demo files, then sleeps forever.
pub fn init_process() {
    println!("[INIT] Init process starting");

    let demo_files: [(&str, &[u8]); 3] = [
        ("hello.txt", b"Hello from the filesystem!\n"),
        ("readme.txt", b"rvOS - A simple RISC-V operating system\n"),
        // li a7, 5: a token program body for exec demos.
        ("test.bin", b"\x93\x08\x50\x00"),
    ];
    {
        let mut files = fs::FILES.lock();
        for (name, data) in demo_files {
            if let Err(err) = files.create(name, data) {
                log_error!("failed to create {}: {}", name, err);
            }
        }
    }

    println!("[INIT] Initialization complete");
    loop {
        syscall::sleep(1000);
    }
}

/// Interactive shell process.
pub fn shell_process() {
    shell::run();
}

/// Runs when nothing else can; parked on wait-for-interrupt.
pub fn idle_process() {
    loop {
        arch::wait_for_interrupt();
    }
}

#[cfg(all(target_arch = "riscv64", not(test)))]
#[panic_handler]
fn panic(info: &core::panic::PanicInfo) -> ! {
    log_error!("{}", info);
    loop {
        arch::wait_for_interrupt();
    }
}
