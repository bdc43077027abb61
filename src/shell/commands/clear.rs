use crate::{print, println};

pub fn run(_args: &str) {
    // ANSI: clear screen, cursor home.
    print!("\x1b[2J\x1b[H");
    println!("=====================================");
    println!("  rvOS Shell v1.0");
    println!("=====================================");
    println!();
}
