//! Backend implementations of the operation catalog.
//!
//! The scalar backend is always compiled: it defines the semantics and
//! serves as the oracle for the parity tests. Native backends are gated
//! on the target architecture and selected at compile time by the crate
//! root; there is no runtime dispatch.

pub mod scalar;

#[cfg(target_arch = "x86_64")]
pub mod x86;
