//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `inkboard_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    // Why: keep a tiny CLI probe to validate core crate wiring independently
    // from the host/FFI runtime setup.
    println!("inkboard_core ping={}", inkboard_core::ping());
    println!("inkboard_core version={}", inkboard_core::core_version());
}
