use alloc::format;

use crate::fs::FILES;
use crate::println;

/// `echo <text>` prints the text; `echo <text> > <file>` stores it instead.
/// Writing to an existing file fails, because `create` never overwrites.
pub fn run(args: &str) {
    match args.split_once('>') {
        Some((text, name)) => {
            let name = name.trim();
            if name.is_empty() {
                println!("Usage: echo <text> > <file>");
                return;
            }
            let content = format!("{}\n", text.trim());
            match FILES.lock().create(name, content.as_bytes()) {
                Ok(()) => println!("File created: {}", name),
                Err(err) => println!("Failed to create file: {}", err),
            }
        }
        None => println!("{}", args),
    }
}
