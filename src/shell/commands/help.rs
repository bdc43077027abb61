use crate::println;

pub fn run(_args: &str) {
    println!();
    println!("Available commands:");
    println!("  help                   - Show this help");
    println!("  ps                     - List processes");
    println!("  ls                     - List files");
    println!("  cat <file>             - Display file contents");
    println!("  echo <text> [> <file>] - Print text, or write it to a file");
    println!("  create <file>          - Create a test file");
    println!("  exec <file>            - Execute a program");
    println!("  mem                    - Show memory usage");
    println!("  clear                  - Clear screen");
    println!("  exit                   - Exit shell");
    println!();
}
