use crate::fs::FILES;
use crate::println;

pub fn run(_args: &str) {
    println!();
    FILES.lock().list();
    println!();
}
