//! Portable fixed-width SIMD lane types.
//!
//! Each named type (`U32x4`, `F32x8`, ...) is a value-semantics vector of
//! a fixed lane count and lane kind. The backend is chosen at compile
//! time from the target: x86_64 targets get SSE2 (and AVX for `F32x8`
//! when `target-feature=+avx` is enabled), everything else gets the
//! scalar fallback. The two are interchangeable: every exact operation
//! produces bit-identical lanes on both, so code written against the
//! traits never observes which backend it is running on.
//!
//! No operation allocates, panics at runtime on valid input, or returns
//! an error. The only panics are slice-length asserts on [`SimdVector::load`]
//! and [`SimdVector::store`]; lane indices, shift counts, and shuffle
//! patterns are const generics checked at compile time.
//!
//! ```
//! use lanevec::{I32x4, IntVector, SimdVector};
//!
//! let v = I32x4::from_array([-1, 2, -3, 4]);
//! let mask = v.cmp_gt(I32x4::splat(0));
//! assert_eq!(v.abs().to_array(), [1, 2, 3, 4]);
//! assert_eq!(mask.to_array(), [0, !0, 0, !0]);
//! assert_eq!(v.get_mask(), 0b0101);
//! ```

#![no_std]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]

pub mod backends;
pub mod vector;

pub use vector::{FloatVector, IntVector, SimdVector};

#[cfg(target_arch = "x86_64")]
pub use backends::x86::{F32x4, I16x8, I32x4, I8x16, U16x8, U32x4, U8x16};

#[cfg(not(target_arch = "x86_64"))]
pub use backends::scalar::{F32x4, I16x8, I32x4, I8x16, U16x8, U32x4, U8x16};

#[cfg(all(target_arch = "x86_64", target_feature = "avx"))]
pub use backends::x86::F32x8;

#[cfg(not(all(target_arch = "x86_64", target_feature = "avx")))]
pub use backends::scalar::F32x8;
