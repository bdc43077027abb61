//! Interactive command shell, run as the `shell` process.

pub mod commands;


use crate::syscall;
use crate::uart::{UartExt, CONSOLE};
use crate::{print, println};

const LINE_LEN: usize = 128;

/// Prompt, read a line, dispatch, forever.
pub fn run() -> ! {
    println!();
    println!("=====================================");
    println!("  rvOS Shell v1.0");
    println!("=====================================");
    println!("Commands: help, ps, ls, cat <file>, mem, clear, exit");
    println!("Type 'help' for command list");
    println!();

    let mut buf = [0u8; LINE_LEN];
    loop {
        print!("$ ");
        let len = CONSOLE.lock().read_line(&mut buf);
        let Ok(line) = core::str::from_utf8(&buf[..len]) else {
            continue;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if line == "exit" {
            println!();
            println!("Exiting shell...");
            println!("Press Ctrl-A then X to exit QEMU");
            println!();
            syscall::exit(0);
            break;
        }

        exec_command(line);
    }

    // The cooperative exit returns here; stay parked.
    loop {
        syscall::sleep(10_000);
    }
}

/// Split input into verb and arguments, then dispatch.
pub fn exec_command(input: &str) {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return;
    }

    let (cmd, args) = match trimmed.split_once(' ') {
        Some((cmd, args)) => (cmd, args.trim()),
        None => (trimmed, ""),
    };

    match cmd {
        "help" => commands::help::run(args),
        "ps" => commands::ps::run(args),
        "ls" => commands::ls::run(args),
        "cat" => commands::cat::run(args),
        "echo" => commands::echo::run(args),
        "create" => commands::create::run(args),
        "exec" => commands::exec::run(args),
        "mem" => commands::mem::run(args),
        "clear" => commands::clear::run(args),
        _ => {
            println!("Unknown command: {}", cmd);
            println!("Type 'help' for available commands");
        }
    }
}
