//! The shared operation contract every backend implements.
//!
//! The scalar backend's per-lane loops are the normative semantics; a
//! native backend is correct exactly when it is lane-for-lane
//! bit-identical for every operation below (estimate operations excepted,
//! see [`FloatVector::fast_reciprocal`]).

use core::fmt::Debug;
use core::ops::{Add, BitAnd, BitOr, BitXor, Div, Mul, Neg, Not, Sub};

/// A fixed-width vector of `LANES` lanes of `Lane`.
///
/// Values are plain by-value aggregates: no heap, no interior references,
/// no shared state. Every operation returns a new vector. Lane order is
/// architecture-independent: lane `i` of a loaded vector is element `i`
/// of the source memory.
pub trait SimdVector: Copy + Clone + Debug + Default {
    /// The per-lane scalar type.
    type Lane: Copy + Debug + PartialEq;

    /// Number of lanes.
    const LANES: usize;

    /// Broadcasts `val` to every lane.
    fn splat(val: Self::Lane) -> Self;

    /// Loads `LANES` elements from the front of `slice`.
    ///
    /// Panics if `slice.len() < LANES`.
    fn load(slice: &[Self::Lane]) -> Self;

    /// Stores all lanes to the front of `out`.
    ///
    /// Panics if `out.len() < LANES`.
    fn store(&self, out: &mut [Self::Lane]);

    /// Unaligned load of `LANES` elements.
    ///
    /// # Safety
    /// `ptr` must be valid for reading `LANES * size_of::<Lane>()` bytes.
    /// No alignment requirement.
    unsafe fn load_ptr(ptr: *const Self::Lane) -> Self;

    /// Unaligned store of all lanes.
    ///
    /// # Safety
    /// `ptr` must be valid for writing `LANES * size_of::<Lane>()` bytes.
    /// No alignment requirement.
    unsafe fn store_ptr(self, ptr: *mut Self::Lane);

    /// Aligned load of `LANES` elements.
    ///
    /// # Safety
    /// As [`SimdVector::load_ptr`], and `ptr` must be naturally aligned to
    /// the full vector width. A misaligned pointer is a contract
    /// violation with implementation-defined behavior, not a trapped
    /// error.
    unsafe fn load_ptr_aligned(ptr: *const Self::Lane) -> Self;

    /// Aligned store of all lanes.
    ///
    /// # Safety
    /// As [`SimdVector::store_ptr`], plus full-vector-width alignment.
    unsafe fn store_ptr_aligned(self, ptr: *mut Self::Lane);

    /// Returns lane `I`. The index is checked at compile time.
    fn get<const I: usize>(self) -> Self::Lane;

    /// Returns a copy with lane `I` replaced by `val`. The index is
    /// checked at compile time.
    fn set<const I: usize>(self, val: Self::Lane) -> Self;
}

/// Integer lane operations.
///
/// `+`, `-` (and `*` where provided) wrap with two's-complement overflow;
/// there is no trapping and no implicit saturation. Bitwise operators act
/// on lanes as raw bit patterns.
pub trait IntVector:
    SimdVector
    + Add<Output = Self>
    + Sub<Output = Self>
    + BitAnd<Output = Self>
    + BitOr<Output = Self>
    + BitXor<Output = Self>
    + Not<Output = Self>
{
    /// `!self & other`, per lane. Operand order matches the hardware
    /// andnot instruction.
    fn nand(self, other: Self) -> Self;

    /// Per-lane minimum.
    fn min(self, other: Self) -> Self;

    /// Per-lane maximum.
    fn max(self, other: Self) -> Self;

    /// Per-lane addition clamped to the lane type's range.
    fn saturating_add(self, other: Self) -> Self;

    /// Per-lane subtraction clamped to the lane type's range.
    fn saturating_sub(self, other: Self) -> Self;

    /// Per-lane equality. Each result lane is all-ones where the relation
    /// holds and all-zeros otherwise (a canonical mask).
    fn cmp_eq(self, other: Self) -> Self;

    /// Per-lane `self > other`, as a canonical mask.
    fn cmp_gt(self, other: Self) -> Self;

    /// Per-lane `self < other`, as a canonical mask.
    fn cmp_lt(self, other: Self) -> Self {
        other.cmp_gt(self)
    }

    /// Per-lane blend: where a lane of `self` (the mask) is all-ones the
    /// result takes `if_true`, where all-zeros it takes `if_false`.
    ///
    /// A mask lane holding any other bit pattern violates the contract;
    /// the scalar backend asserts canonicality in debug builds.
    fn select(self, if_true: Self, if_false: Self) -> Self;
}

/// Floating-point lane operations.
///
/// Arithmetic follows IEEE-754 semantics including NaN propagation and
/// signed zero. Bitwise operators act on the raw lane bit patterns.
pub trait FloatVector:
    SimdVector
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + BitAnd<Output = Self>
    + BitOr<Output = Self>
    + BitXor<Output = Self>
    + Not<Output = Self>
{
    /// `!self & other` on raw bit patterns.
    fn nand(self, other: Self) -> Self;

    /// Per-lane absolute value (clears the sign bit, so `abs(NaN)` keeps
    /// the payload and `abs(-0.0) == 0.0`).
    fn abs(self) -> Self;

    /// Per-lane minimum using the hardware rule `if a < b { a } else
    /// { b }`: on an unordered pair, and on equal values (including
    /// `-0.0` vs `0.0`), the second operand is returned. This is *not*
    /// `f32::min`.
    fn min(self, other: Self) -> Self;

    /// Per-lane maximum using the hardware rule `if a > b { a } else
    /// { b }`. See [`FloatVector::min`] for the unordered/equal cases.
    fn max(self, other: Self) -> Self;

    /// Correctly rounded per-lane square root.
    fn sqrt(self) -> Self;

    /// `1 / x` to near full precision (estimate plus one Newton-Raphson
    /// step on hardware backends; exact on the scalar backend).
    ///
    /// Defined for positive finite input. At `x = 0` hardware backends
    /// yield NaN (the refinement multiplies the infinite estimate by
    /// zero) where the scalar backend yields infinity.
    fn reciprocal(self) -> Self;

    /// `1 / sqrt(x)` to near full precision (estimate plus one
    /// Newton-Raphson step on hardware backends). Same positive-finite
    /// domain as [`FloatVector::reciprocal`].
    fn rsqrt(self) -> Self;

    /// Low-precision `1 / x` estimate. Callers must not assume exactness:
    /// hardware backends return the raw `rcpps` estimate (relative error
    /// up to about `1.5 * 2^-12`).
    fn fast_reciprocal(self) -> Self;

    /// Low-precision `1 / sqrt(x)` estimate; same accuracy contract as
    /// [`FloatVector::fast_reciprocal`].
    fn fast_rsqrt(self) -> Self;

    /// Low-precision square root derived from the reciprocal-square-root
    /// estimate (`x * rsqrt_estimate(x)`).
    ///
    /// Defined for positive finite input: `fast_sqrt(0)` is NaN on
    /// hardware backends (`0 * inf`) but `0.0` on the scalar backend.
    fn fast_sqrt(self) -> Self;

    /// Ordered per-lane equality: NaN in either operand yields all-zeros.
    fn cmp_eq(self, other: Self) -> Self;

    /// Ordered per-lane not-equal: NaN in either operand yields
    /// all-zeros. (Ordered, unlike the legacy `cmpneq` predicate.)
    fn cmp_ne(self, other: Self) -> Self;

    /// Ordered per-lane `<`; NaN yields all-zeros.
    fn cmp_lt(self, other: Self) -> Self;

    /// Ordered per-lane `<=`; NaN yields all-zeros.
    fn cmp_le(self, other: Self) -> Self;

    /// Ordered per-lane `>`; NaN yields all-zeros.
    fn cmp_gt(self, other: Self) -> Self;

    /// Ordered per-lane `>=`; NaN yields all-zeros.
    fn cmp_ge(self, other: Self) -> Self;

    /// Per-lane blend on raw bit patterns; see [`IntVector::select`] for
    /// the mask contract.
    fn select(self, if_true: Self, if_false: Self) -> Self;

    /// Rounds to the nearest integer, ties to even.
    fn round(self) -> Self;

    /// Rounds toward zero.
    fn trunc(self) -> Self;

    /// Rounds toward negative infinity.
    fn floor(self) -> Self;

    /// Rounds toward positive infinity.
    fn ceil(self) -> Self;

    /// `x - floor(x)`, defined literally in terms of [`FloatVector::floor`]
    /// so the two can never disagree.
    fn fract(self) -> Self {
        self - self.floor()
    }

    /// Sign-bit bitmask: bit `i` is set iff lane `i` has its sign bit
    /// set, lane 0 in the lowest bit.
    fn get_mask(self) -> u32;
}
