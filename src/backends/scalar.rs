//! Scalar fallback backend: explicit per-lane loops over a plain array.
//!
//! This backend is the normative semantics of the whole catalog. Native
//! backends are validated against it lane-for-lane, so the loops here are
//! kept deliberately literal: integer arithmetic wraps, comparison masks
//! are `!0`/`0`, and float min/max follow the hardware selection rule
//! rather than `f32::min`.

use crate::vector::{FloatVector, IntVector, SimdVector};
use core::fmt::Debug;
use core::ops::{Add, BitAnd, BitOr, BitXor, Div, Mul, Neg, Not, Sub};

/// A fixed-size array of `N` lanes of `T`, standing in for a hardware
/// register. Index `i` of the array is lane `i` of the vector on every
/// backend.
#[derive(Copy, Clone, Debug)]
#[repr(transparent)]
pub struct ScalarVec<T: Copy, const N: usize>(pub(crate) [T; N]);

/// 16 lanes of `u8`.
pub type U8x16 = ScalarVec<u8, 16>;
/// 8 lanes of `u16`.
pub type U16x8 = ScalarVec<u16, 8>;
/// 4 lanes of `u32`.
pub type U32x4 = ScalarVec<u32, 4>;
/// 16 lanes of `i8`.
pub type I8x16 = ScalarVec<i8, 16>;
/// 8 lanes of `i16`.
pub type I16x8 = ScalarVec<i16, 8>;
/// 4 lanes of `i32`.
pub type I32x4 = ScalarVec<i32, 4>;
/// 4 lanes of `f32`.
pub type F32x4 = ScalarVec<f32, 4>;
/// 8 lanes of `f32`.
pub type F32x8 = ScalarVec<f32, 8>;

impl<T: Copy + Default, const N: usize> Default for ScalarVec<T, N> {
    fn default() -> Self {
        Self([T::default(); N])
    }
}

impl<T: Copy, const N: usize> ScalarVec<T, N> {
    /// Builds a vector from an array, lane `i` from element `i`.
    #[inline(always)]
    pub const fn from_array(arr: [T; N]) -> Self {
        Self(arr)
    }

    /// Returns the lanes as an array, element `i` from lane `i`.
    #[inline(always)]
    pub const fn to_array(self) -> [T; N] {
        self.0
    }

    #[inline(always)]
    fn map(self, f: impl Fn(T) -> T) -> Self {
        let mut v = self.0;
        for i in 0..N {
            v[i] = f(self.0[i]);
        }
        Self(v)
    }

    #[inline(always)]
    fn zip(self, other: Self, f: impl Fn(T, T) -> T) -> Self {
        let mut v = self.0;
        for i in 0..N {
            v[i] = f(self.0[i], other.0[i]);
        }
        Self(v)
    }
}

impl<T, const N: usize> SimdVector for ScalarVec<T, N>
where
    T: Copy + Debug + Default + PartialEq,
{
    type Lane = T;
    const LANES: usize = N;

    #[inline(always)]
    fn splat(val: T) -> Self {
        Self([val; N])
    }

    #[inline(always)]
    fn load(slice: &[T]) -> Self {
        assert!(slice.len() >= N);
        let mut v = [T::default(); N];
        v.copy_from_slice(&slice[..N]);
        Self(v)
    }

    #[inline(always)]
    fn store(&self, out: &mut [T]) {
        assert!(out.len() >= N);
        out[..N].copy_from_slice(&self.0);
    }

    #[inline(always)]
    unsafe fn load_ptr(ptr: *const T) -> Self {
        // SAFETY: caller guarantees N readable elements.
        unsafe { core::ptr::read_unaligned(ptr as *const Self) }
    }

    #[inline(always)]
    unsafe fn store_ptr(self, ptr: *mut T) {
        // SAFETY: caller guarantees N writable elements.
        unsafe { core::ptr::write_unaligned(ptr as *mut Self, self) }
    }

    #[inline(always)]
    unsafe fn load_ptr_aligned(ptr: *const T) -> Self {
        // SAFETY: caller guarantees N readable, suitably aligned elements.
        unsafe { core::ptr::read(ptr as *const Self) }
    }

    #[inline(always)]
    unsafe fn store_ptr_aligned(self, ptr: *mut T) {
        // SAFETY: caller guarantees N writable, suitably aligned elements.
        unsafe { core::ptr::write(ptr as *mut Self, self) }
    }

    #[inline(always)]
    fn get<const I: usize>(self) -> T {
        const { assert!(I < N, "lane index out of range") }
        self.0[I]
    }

    #[inline(always)]
    fn set<const I: usize>(self, val: T) -> Self {
        const { assert!(I < N, "lane index out of range") }
        let mut v = self.0;
        v[I] = val;
        Self(v)
    }
}

// ---------------------------------------------------------------------
// integer lanes
// ---------------------------------------------------------------------

// Integer arithmetic wraps to match hardware vector semantics.
macro_rules! impl_int_lanes {
    ($t:ty, $n:expr) => {
        impl Add for ScalarVec<$t, $n> {
            type Output = Self;
            #[inline(always)]
            fn add(self, rhs: Self) -> Self {
                self.zip(rhs, <$t>::wrapping_add)
            }
        }
        impl Sub for ScalarVec<$t, $n> {
            type Output = Self;
            #[inline(always)]
            fn sub(self, rhs: Self) -> Self {
                self.zip(rhs, <$t>::wrapping_sub)
            }
        }
        impl BitAnd for ScalarVec<$t, $n> {
            type Output = Self;
            #[inline(always)]
            fn bitand(self, rhs: Self) -> Self {
                self.zip(rhs, |a, b| a & b)
            }
        }
        impl BitOr for ScalarVec<$t, $n> {
            type Output = Self;
            #[inline(always)]
            fn bitor(self, rhs: Self) -> Self {
                self.zip(rhs, |a, b| a | b)
            }
        }
        impl BitXor for ScalarVec<$t, $n> {
            type Output = Self;
            #[inline(always)]
            fn bitxor(self, rhs: Self) -> Self {
                self.zip(rhs, |a, b| a ^ b)
            }
        }
        impl Not for ScalarVec<$t, $n> {
            type Output = Self;
            #[inline(always)]
            fn not(self) -> Self {
                self.map(|a| !a)
            }
        }

        impl IntVector for ScalarVec<$t, $n> {
            #[inline(always)]
            fn nand(self, other: Self) -> Self {
                self.zip(other, |a, b| !a & b)
            }

            #[inline(always)]
            fn min(self, other: Self) -> Self {
                self.zip(other, |a, b| if a < b { a } else { b })
            }

            #[inline(always)]
            fn max(self, other: Self) -> Self {
                self.zip(other, |a, b| if a > b { a } else { b })
            }

            #[inline(always)]
            fn saturating_add(self, other: Self) -> Self {
                self.zip(other, <$t>::saturating_add)
            }

            #[inline(always)]
            fn saturating_sub(self, other: Self) -> Self {
                self.zip(other, <$t>::saturating_sub)
            }

            #[inline(always)]
            fn cmp_eq(self, other: Self) -> Self {
                self.zip(other, |a, b| if a == b { !0 } else { 0 })
            }

            #[inline(always)]
            fn cmp_gt(self, other: Self) -> Self {
                self.zip(other, |a, b| if a > b { !0 } else { 0 })
            }

            #[inline(always)]
            fn select(self, if_true: Self, if_false: Self) -> Self {
                let mut v = self.0;
                for i in 0..$n {
                    let m = self.0[i];
                    debug_assert!(m == 0 || m == !0, "non-canonical select mask");
                    v[i] = (m & if_true.0[i]) | (!m & if_false.0[i]);
                }
                Self(v)
            }
        }
    };
}

impl_int_lanes!(u8, 16);
impl_int_lanes!(u16, 8);
impl_int_lanes!(u32, 4);
impl_int_lanes!(i8, 16);
impl_int_lanes!(i16, 8);
impl_int_lanes!(i32, 4);

impl Mul for U32x4 {
    type Output = Self;
    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        self.zip(rhs, u32::wrapping_mul)
    }
}

impl Mul for I32x4 {
    type Output = Self;
    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        self.zip(rhs, i32::wrapping_mul)
    }
}

// Shuffle patterns and shift counts are compile-time constants; an
// out-of-range value fails the const assert during monomorphization.
macro_rules! impl_shuffle4 {
    ($t:ty) => {
        impl ScalarVec<$t, 4> {
            /// Permutes lanes: output lane `k` takes input lane `pattern[k]`.
            /// The identity pattern returns the value unchanged.
            #[inline(always)]
            pub fn shuffle<const X: usize, const Y: usize, const Z: usize, const W: usize>(
                self,
            ) -> Self {
                const {
                    assert!(X < 4 && Y < 4 && Z < 4 && W < 4, "lane index out of range")
                }
                if X == 0 && Y == 1 && Z == 2 && W == 3 {
                    return self;
                }
                Self([self.0[X], self.0[Y], self.0[Z], self.0[W]])
            }
        }
    };
}

impl_shuffle4!(u32);
impl_shuffle4!(i32);
impl_shuffle4!(f32);

impl U32x4 {
    /// Shifts each lane left by `COUNT` bits, filling with zeros.
    #[inline(always)]
    pub fn shl<const COUNT: i32>(self) -> Self {
        const { assert!(COUNT >= 0 && COUNT < 32, "shift count out of range") }
        self.map(|a| a << COUNT)
    }

    /// Shifts each lane right by `COUNT` bits, filling with zeros.
    #[inline(always)]
    pub fn shr<const COUNT: i32>(self) -> Self {
        const { assert!(COUNT >= 0 && COUNT < 32, "shift count out of range") }
        self.map(|a| a >> COUNT)
    }
}

impl I32x4 {
    /// Shifts each lane's bit pattern left by `COUNT` bits.
    #[inline(always)]
    pub fn shl<const COUNT: i32>(self) -> Self {
        const { assert!(COUNT >= 0 && COUNT < 32, "shift count out of range") }
        self.map(|a| ((a as u32) << COUNT) as i32)
    }

    /// Logical right shift: zero-fill regardless of sign.
    #[inline(always)]
    pub fn shr<const COUNT: i32>(self) -> Self {
        const { assert!(COUNT >= 0 && COUNT < 32, "shift count out of range") }
        self.map(|a| ((a as u32) >> COUNT) as i32)
    }

    /// Arithmetic right shift: sign-extending.
    #[inline(always)]
    pub fn sra<const COUNT: i32>(self) -> Self {
        const { assert!(COUNT >= 0 && COUNT < 32, "shift count out of range") }
        self.map(|a| a >> COUNT)
    }

    /// Per-lane two's-complement negation (wraps at `i32::MIN`).
    #[inline(always)]
    pub fn neg(self) -> Self {
        self.map(i32::wrapping_neg)
    }

    /// Per-lane absolute value (wraps at `i32::MIN`).
    #[inline(always)]
    pub fn abs(self) -> Self {
        self.map(i32::wrapping_abs)
    }

    /// Sign-bit bitmask: bit `i` set iff lane `i` is negative, lane 0 in
    /// the lowest bit.
    #[inline(always)]
    pub fn get_mask(self) -> u32 {
        let mut mask = 0;
        for i in 0..4 {
            mask |= ((self.0[i] as u32) >> 31) << i;
        }
        mask
    }

    /// Clamps each lane to `[0, 255]` and packs the four bytes into a
    /// `u32`, lane 0 in the lowest byte.
    #[inline(always)]
    pub fn pack_u8(self) -> u32 {
        let mut packed = 0u32;
        for i in 0..4 {
            let byte = self.0[i].clamp(0, 255) as u32;
            packed |= byte << (i * 8);
        }
        packed
    }

    /// Unpacks four bytes into four zero-extended lanes, lowest byte to
    /// lane 0.
    #[inline(always)]
    pub fn unpack_u8(packed: u32) -> Self {
        Self([
            (packed & 0xff) as i32,
            ((packed >> 8) & 0xff) as i32,
            ((packed >> 16) & 0xff) as i32,
            (packed >> 24) as i32,
        ])
    }

    /// Converts each lane to `f32` (round to nearest even where inexact).
    #[inline(always)]
    pub fn to_f32(self) -> F32x4 {
        ScalarVec([
            self.0[0] as f32,
            self.0[1] as f32,
            self.0[2] as f32,
            self.0[3] as f32,
        ])
    }
}

// ---------------------------------------------------------------------
// float lanes
// ---------------------------------------------------------------------

impl<const N: usize> Add for ScalarVec<f32, N> {
    type Output = Self;
    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        self.zip(rhs, |a, b| a + b)
    }
}

impl<const N: usize> Sub for ScalarVec<f32, N> {
    type Output = Self;
    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        self.zip(rhs, |a, b| a - b)
    }
}

impl<const N: usize> Mul for ScalarVec<f32, N> {
    type Output = Self;
    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        self.zip(rhs, |a, b| a * b)
    }
}

impl<const N: usize> Div for ScalarVec<f32, N> {
    type Output = Self;
    #[inline(always)]
    fn div(self, rhs: Self) -> Self {
        self.zip(rhs, |a, b| a / b)
    }
}

impl<const N: usize> Neg for ScalarVec<f32, N> {
    type Output = Self;
    // Sign-bit flip, so NaN payloads survive and neg(0.0) == -0.0.
    #[inline(always)]
    fn neg(self) -> Self {
        self.map(|a| f32::from_bits(a.to_bits() ^ 0x8000_0000))
    }
}

impl<const N: usize> BitAnd for ScalarVec<f32, N> {
    type Output = Self;
    #[inline(always)]
    fn bitand(self, rhs: Self) -> Self {
        self.zip(rhs, |a, b| f32::from_bits(a.to_bits() & b.to_bits()))
    }
}

impl<const N: usize> BitOr for ScalarVec<f32, N> {
    type Output = Self;
    #[inline(always)]
    fn bitor(self, rhs: Self) -> Self {
        self.zip(rhs, |a, b| f32::from_bits(a.to_bits() | b.to_bits()))
    }
}

impl<const N: usize> BitXor for ScalarVec<f32, N> {
    type Output = Self;
    #[inline(always)]
    fn bitxor(self, rhs: Self) -> Self {
        self.zip(rhs, |a, b| f32::from_bits(a.to_bits() ^ b.to_bits()))
    }
}

impl<const N: usize> Not for ScalarVec<f32, N> {
    type Output = Self;
    #[inline(always)]
    fn not(self) -> Self {
        self.map(|a| f32::from_bits(!a.to_bits()))
    }
}

#[inline(always)]
fn float_mask(cond: bool) -> f32 {
    f32::from_bits(if cond { !0 } else { 0 })
}

impl<const N: usize> FloatVector for ScalarVec<f32, N> {
    #[inline(always)]
    fn nand(self, other: Self) -> Self {
        self.zip(other, |a, b| f32::from_bits(!a.to_bits() & b.to_bits()))
    }

    #[inline(always)]
    fn abs(self) -> Self {
        self.map(|a| f32::from_bits(a.to_bits() & 0x7fff_ffff))
    }

    // min/max follow the minps/maxps rule: the second operand wins on
    // unordered and on equal (so min(-0.0, 0.0) == 0.0).
    #[inline(always)]
    fn min(self, other: Self) -> Self {
        self.zip(other, |a, b| if a < b { a } else { b })
    }

    #[inline(always)]
    fn max(self, other: Self) -> Self {
        self.zip(other, |a, b| if a > b { a } else { b })
    }

    #[inline(always)]
    fn sqrt(self) -> Self {
        self.map(libm::sqrtf)
    }

    #[inline(always)]
    fn reciprocal(self) -> Self {
        self.map(|a| 1.0 / a)
    }

    #[inline(always)]
    fn rsqrt(self) -> Self {
        self.map(|a| 1.0 / libm::sqrtf(a))
    }

    // The scalar backend computes the fast variants exactly; the exact
    // value trivially satisfies the estimate tolerance.
    #[inline(always)]
    fn fast_reciprocal(self) -> Self {
        self.map(|a| 1.0 / a)
    }

    #[inline(always)]
    fn fast_rsqrt(self) -> Self {
        self.map(|a| 1.0 / libm::sqrtf(a))
    }

    #[inline(always)]
    fn fast_sqrt(self) -> Self {
        self.map(libm::sqrtf)
    }

    #[inline(always)]
    fn cmp_eq(self, other: Self) -> Self {
        self.zip(other, |a, b| float_mask(a == b))
    }

    // Ordered not-equal: NaN yields false, unlike the legacy cmpneq
    // predicate.
    #[inline(always)]
    fn cmp_ne(self, other: Self) -> Self {
        self.zip(other, |a, b| float_mask(a < b || a > b))
    }

    #[inline(always)]
    fn cmp_lt(self, other: Self) -> Self {
        self.zip(other, |a, b| float_mask(a < b))
    }

    #[inline(always)]
    fn cmp_le(self, other: Self) -> Self {
        self.zip(other, |a, b| float_mask(a <= b))
    }

    #[inline(always)]
    fn cmp_gt(self, other: Self) -> Self {
        self.zip(other, |a, b| float_mask(a > b))
    }

    #[inline(always)]
    fn cmp_ge(self, other: Self) -> Self {
        self.zip(other, |a, b| float_mask(a >= b))
    }

    #[inline(always)]
    fn select(self, if_true: Self, if_false: Self) -> Self {
        let mut v = self.0;
        for i in 0..N {
            let m = self.0[i].to_bits();
            debug_assert!(m == 0 || m == !0, "non-canonical select mask");
            v[i] = f32::from_bits((m & if_true.0[i].to_bits()) | (!m & if_false.0[i].to_bits()));
        }
        Self(v)
    }

    #[inline(always)]
    fn round(self) -> Self {
        self.map(libm::rintf)
    }

    #[inline(always)]
    fn trunc(self) -> Self {
        self.map(libm::truncf)
    }

    #[inline(always)]
    fn floor(self) -> Self {
        self.map(libm::floorf)
    }

    #[inline(always)]
    fn ceil(self) -> Self {
        self.map(libm::ceilf)
    }

    #[inline(always)]
    fn get_mask(self) -> u32 {
        let mut mask = 0;
        for i in 0..N {
            mask |= (self.0[i].to_bits() >> 31) << i;
        }
        mask
    }
}

// cvtps2dq rule: NaN and out-of-range lanes become i32::MIN (the
// "integer indefinite" value).
#[inline(always)]
fn cvt_saturating(r: f32) -> i32 {
    if r.is_nan() || r >= 2_147_483_648.0 || r < -2_147_483_648.0 {
        i32::MIN
    } else {
        r as i32
    }
}

impl F32x4 {
    /// Converts each lane to `i32`, rounding to nearest even. NaN and
    /// out-of-range lanes become `i32::MIN`, matching the hardware
    /// conversion.
    #[inline(always)]
    pub fn to_i32(self) -> I32x4 {
        let mut v = [0i32; 4];
        for i in 0..4 {
            v[i] = cvt_saturating(libm::rintf(self.0[i]));
        }
        ScalarVec(v)
    }

    /// Converts each lane to `i32`, rounding toward zero. NaN and
    /// out-of-range lanes become `i32::MIN`.
    #[inline(always)]
    pub fn to_i32_trunc(self) -> I32x4 {
        let mut v = [0i32; 4];
        for i in 0..4 {
            v[i] = cvt_saturating(libm::truncf(self.0[i]));
        }
        ScalarVec(v)
    }

    /// Interleaves the low halves: `[a0, b0, a1, b1]`.
    #[inline(always)]
    pub fn unpack_lo(self, other: Self) -> Self {
        Self([self.0[0], other.0[0], self.0[1], other.0[1]])
    }

    /// Interleaves the high halves: `[a2, b2, a3, b3]`.
    #[inline(always)]
    pub fn unpack_hi(self, other: Self) -> Self {
        Self([self.0[2], other.0[2], self.0[3], other.0[3]])
    }
}

impl F32x8 {
    /// Interleaves low pairs within each 128-bit half, exactly like the
    /// 256-bit unpack instruction: `[a0, b0, a1, b1, a4, b4, a5, b5]`.
    #[inline(always)]
    pub fn unpack_lo(self, other: Self) -> Self {
        Self([
            self.0[0], other.0[0], self.0[1], other.0[1], self.0[4], other.0[4], self.0[5],
            other.0[5],
        ])
    }

    /// Interleaves high pairs within each 128-bit half:
    /// `[a2, b2, a3, b3, a6, b6, a7, b7]`.
    #[inline(always)]
    pub fn unpack_hi(self, other: Self) -> Self {
        Self([
            self.0[2], other.0[2], self.0[3], other.0[3], self.0[6], other.0[6], self.0[7],
            other.0[7],
        ])
    }
}
