use crate::memory;
use crate::println;

pub fn run(_args: &str) {
    println!();
    memory::print_stats();
    println!();
}
