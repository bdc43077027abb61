use crate::println;
use crate::syscall;

pub fn run(args: &str) {
    let name = args.trim();
    if name.is_empty() {
        println!("Usage: exec <filename>");
        return;
    }
    syscall::exec(name);
}
