use alloc::string::String;

use crate::fs::FILES;
use crate::{print, println};

pub fn run(args: &str) {
    let name = args.trim();
    if name.is_empty() {
        println!("Usage: cat <filename>");
        return;
    }

    let files = FILES.lock();
    match files.find(name) {
        Some(file) => {
            let text = String::from_utf8_lossy(file.data());
            print!("{}", text);
            if !text.ends_with('\n') {
                println!();
            }
        }
        None => println!("File not found: {}", name),
    }
}
