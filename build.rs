fn main() {
    // The linker script only applies to the bare-metal target. Host builds
    // (unit tests) link normally.
    let target = std::env::var("TARGET").unwrap_or_default();
    if target.starts_with("riscv64") {
        println!("cargo:rustc-link-arg-bins=-Tlinker.ld");
        println!("cargo:rerun-if-changed=linker.ld");
    }
}
