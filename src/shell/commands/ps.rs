use crate::println;
use crate::process::PROCESS_TABLE;

pub fn run(_args: &str) {
    println!();
    PROCESS_TABLE.lock().list();
    println!();
}
