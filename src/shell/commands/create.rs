use alloc::format;

use crate::fs::FILES;
use crate::println;

pub fn run(args: &str) {
    let name = args.trim();
    if name.is_empty() {
        println!("Usage: create <filename>");
        return;
    }

    let content = format!("This is a test file created at runtime: {}\n", name);
    match FILES.lock().create(name, content.as_bytes()) {
        Ok(()) => println!("File created: {}", name),
        Err(err) => println!("Failed to create file: {}", err),
    }
}
