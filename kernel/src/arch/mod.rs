//! Architecture-specific code. The rest of the kernel only uses the `generic`
//! module, which forwards every call to the `target` module selected at
//! compile time.
//!
//! # Adding a new architecture
//! Copy the `aarch64` module, rename it after the new architecture and
//! implement every function the `generic` module forwards to. Then add a
//! conditional compilation block to select the new module as `target`.
#[cfg(target_arch = "aarch64")]
pub mod aarch64;
#[cfg(target_arch = "aarch64")]
pub use aarch64 as target;

pub mod generic;
pub use generic::*;
