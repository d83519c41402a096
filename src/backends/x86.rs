//! x86_64 backend: SSE2 for the 128-bit families, AVX for `F32x8`.
//!
//! Where SSE2 has no direct instruction the operation is composed from
//! primitives with an algebraically exact identity (sign-bias compares,
//! saturating-subtract min/max, overflow-mask saturating adds, guarded
//! integer-conversion rounding). Each composition carries the identity it
//! relies on as a comment.

use crate::vector::{FloatVector, IntVector, SimdVector};
use core::arch::x86_64::*;
use core::fmt::{Debug, Formatter};
use core::ops::{Add, BitAnd, BitOr, BitXor, Div, Mul, Neg, Not, Sub};

// ---------------------------------------------------------------------
// shared __m128i helpers
// ---------------------------------------------------------------------

#[inline(always)]
unsafe fn not_si128(a: __m128i) -> __m128i {
    unsafe { _mm_xor_si128(a, _mm_set1_epi32(-1)) }
}

#[inline(always)]
unsafe fn blend_si128(mask: __m128i, if_true: __m128i, if_false: __m128i) -> __m128i {
    // (mask & t) | (!mask & f)
    unsafe {
        _mm_or_si128(
            _mm_and_si128(mask, if_true),
            _mm_andnot_si128(mask, if_false),
        )
    }
}

// a > b for unsigned 32-bit lanes: bias both by 0x8000_0000 so the
// signed compare orders them correctly.
#[inline(always)]
unsafe fn cmpgt_epu32(a: __m128i, b: __m128i) -> __m128i {
    unsafe {
        let bias = _mm_set1_epi32(i32::MIN);
        _mm_cmpgt_epi32(_mm_xor_si128(a, bias), _mm_xor_si128(b, bias))
    }
}

// Low 32 bits of the 32x32 product. SSE2 only multiplies even lanes
// (mul_epu32), so the odd lanes are shifted down, multiplied, and the
// two low halves re-interleaved. The low 32 bits are the same for
// signed and unsigned operands.
#[inline(always)]
unsafe fn mullo_epi32(a: __m128i, b: __m128i) -> __m128i {
    unsafe {
        let even = _mm_mul_epu32(a, b);
        let odd = _mm_mul_epu32(_mm_srli_si128::<4>(a), _mm_srli_si128::<4>(b));
        _mm_unpacklo_epi32(
            _mm_shuffle_epi32::<0b11_10_10_00>(even),
            _mm_shuffle_epi32::<0b11_10_10_00>(odd),
        )
    }
}

// ---------------------------------------------------------------------
// integer type scaffolding
// ---------------------------------------------------------------------

macro_rules! m128i_type {
    ($name:ident, $lane:ty, $lanes:expr, $set1:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(Copy, Clone)]
        #[repr(transparent)]
        pub struct $name(__m128i);

        impl Default for $name {
            #[inline(always)]
            fn default() -> Self {
                unsafe { Self(_mm_setzero_si128()) }
            }
        }

        impl Debug for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
                write!(f, concat!(stringify!($name), "({:?})"), self.to_array())
            }
        }

        impl $name {
            /// Builds a vector from an array, lane `i` from element `i`.
            #[inline(always)]
            pub fn from_array(arr: [$lane; $lanes]) -> Self {
                unsafe { Self(_mm_loadu_si128(arr.as_ptr() as *const __m128i)) }
            }

            /// Returns the lanes as an array, element `i` from lane `i`.
            #[inline(always)]
            pub fn to_array(self) -> [$lane; $lanes] {
                let mut arr = [0 as $lane; $lanes];
                unsafe { _mm_storeu_si128(arr.as_mut_ptr() as *mut __m128i, self.0) };
                arr
            }
        }

        impl SimdVector for $name {
            type Lane = $lane;
            const LANES: usize = $lanes;

            #[inline(always)]
            fn splat(val: $lane) -> Self {
                unsafe { Self($set1(val as _)) }
            }

            #[inline(always)]
            fn load(slice: &[$lane]) -> Self {
                assert!(slice.len() >= $lanes);
                // SAFETY: length checked above.
                unsafe { Self::load_ptr(slice.as_ptr()) }
            }

            #[inline(always)]
            fn store(&self, out: &mut [$lane]) {
                assert!(out.len() >= $lanes);
                // SAFETY: length checked above.
                unsafe { self.store_ptr(out.as_mut_ptr()) }
            }

            #[inline(always)]
            unsafe fn load_ptr(ptr: *const $lane) -> Self {
                // SAFETY: caller guarantees 16 readable bytes.
                unsafe { Self(_mm_loadu_si128(ptr as *const __m128i)) }
            }

            #[inline(always)]
            unsafe fn store_ptr(self, ptr: *mut $lane) {
                // SAFETY: caller guarantees 16 writable bytes.
                unsafe { _mm_storeu_si128(ptr as *mut __m128i, self.0) }
            }

            #[inline(always)]
            unsafe fn load_ptr_aligned(ptr: *const $lane) -> Self {
                // SAFETY: caller guarantees 16 readable, 16-aligned bytes.
                unsafe { Self(_mm_load_si128(ptr as *const __m128i)) }
            }

            #[inline(always)]
            unsafe fn store_ptr_aligned(self, ptr: *mut $lane) {
                // SAFETY: caller guarantees 16 writable, 16-aligned bytes.
                unsafe { _mm_store_si128(ptr as *mut __m128i, self.0) }
            }

            #[inline(always)]
            fn get<const I: usize>(self) -> $lane {
                const { assert!(I < $lanes, "lane index out of range") }
                self.to_array()[I]
            }

            #[inline(always)]
            fn set<const I: usize>(self, val: $lane) -> Self {
                const { assert!(I < $lanes, "lane index out of range") }
                let mut arr = self.to_array();
                arr[I] = val;
                Self::from_array(arr)
            }
        }

        impl BitAnd for $name {
            type Output = Self;
            #[inline(always)]
            fn bitand(self, rhs: Self) -> Self {
                unsafe { Self(_mm_and_si128(self.0, rhs.0)) }
            }
        }

        impl BitOr for $name {
            type Output = Self;
            #[inline(always)]
            fn bitor(self, rhs: Self) -> Self {
                unsafe { Self(_mm_or_si128(self.0, rhs.0)) }
            }
        }

        impl BitXor for $name {
            type Output = Self;
            #[inline(always)]
            fn bitxor(self, rhs: Self) -> Self {
                unsafe { Self(_mm_xor_si128(self.0, rhs.0)) }
            }
        }

        impl Not for $name {
            type Output = Self;
            #[inline(always)]
            fn not(self) -> Self {
                unsafe { Self(not_si128(self.0)) }
            }
        }
    };
}

macro_rules! m128i_add_sub {
    ($name:ident, $add:ident, $sub:ident) => {
        impl Add for $name {
            type Output = Self;
            #[inline(always)]
            fn add(self, rhs: Self) -> Self {
                unsafe { Self($add(self.0, rhs.0)) }
            }
        }

        impl Sub for $name {
            type Output = Self;
            #[inline(always)]
            fn sub(self, rhs: Self) -> Self {
                unsafe { Self($sub(self.0, rhs.0)) }
            }
        }
    };
}

m128i_type!(U8x16, u8, 16, _mm_set1_epi8, "16 lanes of `u8`.");
m128i_type!(U16x8, u16, 8, _mm_set1_epi16, "8 lanes of `u16`.");
m128i_type!(U32x4, u32, 4, _mm_set1_epi32, "4 lanes of `u32`.");
m128i_type!(I8x16, i8, 16, _mm_set1_epi8, "16 lanes of `i8`.");
m128i_type!(I16x8, i16, 8, _mm_set1_epi16, "8 lanes of `i16`.");
m128i_type!(I32x4, i32, 4, _mm_set1_epi32, "4 lanes of `i32`.");

m128i_add_sub!(U8x16, _mm_add_epi8, _mm_sub_epi8);
m128i_add_sub!(I8x16, _mm_add_epi8, _mm_sub_epi8);
m128i_add_sub!(U16x8, _mm_add_epi16, _mm_sub_epi16);
m128i_add_sub!(I16x8, _mm_add_epi16, _mm_sub_epi16);
m128i_add_sub!(U32x4, _mm_add_epi32, _mm_sub_epi32);
m128i_add_sub!(I32x4, _mm_add_epi32, _mm_sub_epi32);

impl IntVector for U8x16 {
    #[inline(always)]
    fn nand(self, other: Self) -> Self {
        unsafe { Self(_mm_andnot_si128(self.0, other.0)) }
    }

    #[inline(always)]
    fn min(self, other: Self) -> Self {
        unsafe { Self(_mm_min_epu8(self.0, other.0)) }
    }

    #[inline(always)]
    fn max(self, other: Self) -> Self {
        unsafe { Self(_mm_max_epu8(self.0, other.0)) }
    }

    #[inline(always)]
    fn saturating_add(self, other: Self) -> Self {
        unsafe { Self(_mm_adds_epu8(self.0, other.0)) }
    }

    #[inline(always)]
    fn saturating_sub(self, other: Self) -> Self {
        unsafe { Self(_mm_subs_epu8(self.0, other.0)) }
    }

    #[inline(always)]
    fn cmp_eq(self, other: Self) -> Self {
        unsafe { Self(_mm_cmpeq_epi8(self.0, other.0)) }
    }

    #[inline(always)]
    fn cmp_gt(self, other: Self) -> Self {
        // a >u b  <=>  (a ^ 0x80) >s (b ^ 0x80)
        unsafe {
            let bias = _mm_set1_epi8(i8::MIN);
            Self(_mm_cmpgt_epi8(
                _mm_xor_si128(self.0, bias),
                _mm_xor_si128(other.0, bias),
            ))
        }
    }

    #[inline(always)]
    fn select(self, if_true: Self, if_false: Self) -> Self {
        unsafe { Self(blend_si128(self.0, if_true.0, if_false.0)) }
    }
}

impl IntVector for I8x16 {
    #[inline(always)]
    fn nand(self, other: Self) -> Self {
        unsafe { Self(_mm_andnot_si128(self.0, other.0)) }
    }

    #[inline(always)]
    fn min(self, other: Self) -> Self {
        // SSE2 has no min_epi8: bias to unsigned, min, bias back.
        unsafe {
            let bias = _mm_set1_epi8(i8::MIN);
            Self(_mm_xor_si128(
                _mm_min_epu8(_mm_xor_si128(self.0, bias), _mm_xor_si128(other.0, bias)),
                bias,
            ))
        }
    }

    #[inline(always)]
    fn max(self, other: Self) -> Self {
        unsafe {
            let bias = _mm_set1_epi8(i8::MIN);
            Self(_mm_xor_si128(
                _mm_max_epu8(_mm_xor_si128(self.0, bias), _mm_xor_si128(other.0, bias)),
                bias,
            ))
        }
    }

    #[inline(always)]
    fn saturating_add(self, other: Self) -> Self {
        unsafe { Self(_mm_adds_epi8(self.0, other.0)) }
    }

    #[inline(always)]
    fn saturating_sub(self, other: Self) -> Self {
        unsafe { Self(_mm_subs_epi8(self.0, other.0)) }
    }

    #[inline(always)]
    fn cmp_eq(self, other: Self) -> Self {
        unsafe { Self(_mm_cmpeq_epi8(self.0, other.0)) }
    }

    #[inline(always)]
    fn cmp_gt(self, other: Self) -> Self {
        unsafe { Self(_mm_cmpgt_epi8(self.0, other.0)) }
    }

    #[inline(always)]
    fn select(self, if_true: Self, if_false: Self) -> Self {
        unsafe { Self(blend_si128(self.0, if_true.0, if_false.0)) }
    }
}

impl IntVector for U16x8 {
    #[inline(always)]
    fn nand(self, other: Self) -> Self {
        unsafe { Self(_mm_andnot_si128(self.0, other.0)) }
    }

    #[inline(always)]
    fn min(self, other: Self) -> Self {
        // min_u16(a, b) = a - max(a - b, 0), via the saturating subtract.
        unsafe { Self(_mm_sub_epi16(self.0, _mm_subs_epu16(self.0, other.0))) }
    }

    #[inline(always)]
    fn max(self, other: Self) -> Self {
        // max_u16(a, b) = b + max(a - b, 0).
        unsafe { Self(_mm_add_epi16(other.0, _mm_subs_epu16(self.0, other.0))) }
    }

    #[inline(always)]
    fn saturating_add(self, other: Self) -> Self {
        unsafe { Self(_mm_adds_epu16(self.0, other.0)) }
    }

    #[inline(always)]
    fn saturating_sub(self, other: Self) -> Self {
        unsafe { Self(_mm_subs_epu16(self.0, other.0)) }
    }

    #[inline(always)]
    fn cmp_eq(self, other: Self) -> Self {
        unsafe { Self(_mm_cmpeq_epi16(self.0, other.0)) }
    }

    #[inline(always)]
    fn cmp_gt(self, other: Self) -> Self {
        unsafe {
            let bias = _mm_set1_epi16(i16::MIN);
            Self(_mm_cmpgt_epi16(
                _mm_xor_si128(self.0, bias),
                _mm_xor_si128(other.0, bias),
            ))
        }
    }

    #[inline(always)]
    fn select(self, if_true: Self, if_false: Self) -> Self {
        unsafe { Self(blend_si128(self.0, if_true.0, if_false.0)) }
    }
}

impl IntVector for I16x8 {
    #[inline(always)]
    fn nand(self, other: Self) -> Self {
        unsafe { Self(_mm_andnot_si128(self.0, other.0)) }
    }

    #[inline(always)]
    fn min(self, other: Self) -> Self {
        unsafe { Self(_mm_min_epi16(self.0, other.0)) }
    }

    #[inline(always)]
    fn max(self, other: Self) -> Self {
        unsafe { Self(_mm_max_epi16(self.0, other.0)) }
    }

    #[inline(always)]
    fn saturating_add(self, other: Self) -> Self {
        unsafe { Self(_mm_adds_epi16(self.0, other.0)) }
    }

    #[inline(always)]
    fn saturating_sub(self, other: Self) -> Self {
        unsafe { Self(_mm_subs_epi16(self.0, other.0)) }
    }

    #[inline(always)]
    fn cmp_eq(self, other: Self) -> Self {
        unsafe { Self(_mm_cmpeq_epi16(self.0, other.0)) }
    }

    #[inline(always)]
    fn cmp_gt(self, other: Self) -> Self {
        unsafe { Self(_mm_cmpgt_epi16(self.0, other.0)) }
    }

    #[inline(always)]
    fn select(self, if_true: Self, if_false: Self) -> Self {
        unsafe { Self(blend_si128(self.0, if_true.0, if_false.0)) }
    }
}

impl IntVector for U32x4 {
    #[inline(always)]
    fn nand(self, other: Self) -> Self {
        unsafe { Self(_mm_andnot_si128(self.0, other.0)) }
    }

    #[inline(always)]
    fn min(self, other: Self) -> Self {
        unsafe {
            let gt = cmpgt_epu32(self.0, other.0);
            Self(blend_si128(gt, other.0, self.0))
        }
    }

    #[inline(always)]
    fn max(self, other: Self) -> Self {
        unsafe {
            let gt = cmpgt_epu32(self.0, other.0);
            Self(blend_si128(gt, self.0, other.0))
        }
    }

    #[inline(always)]
    fn saturating_add(self, other: Self) -> Self {
        // Unsigned overflow iff sum < a; force those lanes to all-ones.
        unsafe {
            let sum = _mm_add_epi32(self.0, other.0);
            let overflow = cmpgt_epu32(self.0, sum);
            Self(_mm_or_si128(sum, overflow))
        }
    }

    #[inline(always)]
    fn saturating_sub(self, other: Self) -> Self {
        // Unsigned underflow iff b > a; force those lanes to zero.
        unsafe {
            let diff = _mm_sub_epi32(self.0, other.0);
            let underflow = cmpgt_epu32(other.0, self.0);
            Self(_mm_andnot_si128(underflow, diff))
        }
    }

    #[inline(always)]
    fn cmp_eq(self, other: Self) -> Self {
        unsafe { Self(_mm_cmpeq_epi32(self.0, other.0)) }
    }

    #[inline(always)]
    fn cmp_gt(self, other: Self) -> Self {
        unsafe { Self(cmpgt_epu32(self.0, other.0)) }
    }

    #[inline(always)]
    fn select(self, if_true: Self, if_false: Self) -> Self {
        unsafe { Self(blend_si128(self.0, if_true.0, if_false.0)) }
    }
}

impl IntVector for I32x4 {
    #[inline(always)]
    fn nand(self, other: Self) -> Self {
        unsafe { Self(_mm_andnot_si128(self.0, other.0)) }
    }

    #[inline(always)]
    fn min(self, other: Self) -> Self {
        unsafe {
            let gt = _mm_cmpgt_epi32(self.0, other.0);
            Self(blend_si128(gt, other.0, self.0))
        }
    }

    #[inline(always)]
    fn max(self, other: Self) -> Self {
        unsafe {
            let gt = _mm_cmpgt_epi32(self.0, other.0);
            Self(blend_si128(gt, self.0, other.0))
        }
    }

    #[inline(always)]
    fn saturating_add(self, other: Self) -> Self {
        // Signed overflow iff a and b share a sign that differs from the
        // sum's. The saturated value is MAX or MIN by a's sign:
        // (a >> 31) ^ 0x7fffffff.
        unsafe {
            let sum = _mm_add_epi32(self.0, other.0);
            let overflow = _mm_andnot_si128(
                _mm_xor_si128(self.0, other.0),
                _mm_xor_si128(sum, self.0),
            );
            let mask = _mm_srai_epi32::<31>(overflow);
            let sat = _mm_xor_si128(_mm_srai_epi32::<31>(self.0), _mm_set1_epi32(i32::MAX));
            Self(blend_si128(mask, sat, sum))
        }
    }

    #[inline(always)]
    fn saturating_sub(self, other: Self) -> Self {
        // Signed overflow iff a and b differ in sign and the difference's
        // sign differs from a's.
        unsafe {
            let diff = _mm_sub_epi32(self.0, other.0);
            let overflow = _mm_and_si128(
                _mm_xor_si128(self.0, other.0),
                _mm_xor_si128(diff, self.0),
            );
            let mask = _mm_srai_epi32::<31>(overflow);
            let sat = _mm_xor_si128(_mm_srai_epi32::<31>(self.0), _mm_set1_epi32(i32::MAX));
            Self(blend_si128(mask, sat, diff))
        }
    }

    #[inline(always)]
    fn cmp_eq(self, other: Self) -> Self {
        unsafe { Self(_mm_cmpeq_epi32(self.0, other.0)) }
    }

    #[inline(always)]
    fn cmp_gt(self, other: Self) -> Self {
        unsafe { Self(_mm_cmpgt_epi32(self.0, other.0)) }
    }

    #[inline(always)]
    fn select(self, if_true: Self, if_false: Self) -> Self {
        unsafe { Self(blend_si128(self.0, if_true.0, if_false.0)) }
    }
}

impl Mul for U32x4 {
    type Output = Self;
    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        unsafe { Self(mullo_epi32(self.0, rhs.0)) }
    }
}

impl Mul for I32x4 {
    type Output = Self;
    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        unsafe { Self(mullo_epi32(self.0, rhs.0)) }
    }
}

macro_rules! impl_shuffle4 {
    ($name:ident) => {
        impl $name {
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
                let a = self.to_array();
                Self::from_array([a[X], a[Y], a[Z], a[W]])
            }
        }
    };
}

impl_shuffle4!(U32x4);
impl_shuffle4!(I32x4);
impl_shuffle4!(F32x4);

impl U32x4 {
    /// Shifts each lane left by `COUNT` bits, filling with zeros.
    #[inline(always)]
    pub fn shl<const COUNT: i32>(self) -> Self {
        const { assert!(COUNT >= 0 && COUNT < 32, "shift count out of range") }
        unsafe { Self(_mm_slli_epi32::<COUNT>(self.0)) }
    }

    /// Shifts each lane right by `COUNT` bits, filling with zeros.
    #[inline(always)]
    pub fn shr<const COUNT: i32>(self) -> Self {
        const { assert!(COUNT >= 0 && COUNT < 32, "shift count out of range") }
        unsafe { Self(_mm_srli_epi32::<COUNT>(self.0)) }
    }
}

impl I32x4 {
    /// Shifts each lane's bit pattern left by `COUNT` bits.
    #[inline(always)]
    pub fn shl<const COUNT: i32>(self) -> Self {
        const { assert!(COUNT >= 0 && COUNT < 32, "shift count out of range") }
        unsafe { Self(_mm_slli_epi32::<COUNT>(self.0)) }
    }

    /// Logical right shift: zero-fill regardless of sign.
    #[inline(always)]
    pub fn shr<const COUNT: i32>(self) -> Self {
        const { assert!(COUNT >= 0 && COUNT < 32, "shift count out of range") }
        unsafe { Self(_mm_srli_epi32::<COUNT>(self.0)) }
    }

    /// Arithmetic right shift: sign-extending.
    #[inline(always)]
    pub fn sra<const COUNT: i32>(self) -> Self {
        const { assert!(COUNT >= 0 && COUNT < 32, "shift count out of range") }
        unsafe { Self(_mm_srai_epi32::<COUNT>(self.0)) }
    }

    /// Per-lane two's-complement negation (wraps at `i32::MIN`).
    #[inline(always)]
    pub fn neg(self) -> Self {
        unsafe { Self(_mm_sub_epi32(_mm_setzero_si128(), self.0)) }
    }

    /// Per-lane absolute value (wraps at `i32::MIN`).
    #[inline(always)]
    pub fn abs(self) -> Self {
        // |a| = (a ^ (a >> 31)) - (a >> 31)
        unsafe {
            let sign = _mm_srai_epi32::<31>(self.0);
            Self(_mm_sub_epi32(_mm_xor_si128(self.0, sign), sign))
        }
    }

    /// Sign-bit bitmask: bit `i` set iff lane `i` is negative, lane 0 in
    /// the lowest bit.
    #[inline(always)]
    pub fn get_mask(self) -> u32 {
        unsafe { _mm_movemask_ps(_mm_castsi128_ps(self.0)) as u32 }
    }

    /// Clamps each lane to `[0, 255]` and packs the four bytes into a
    /// `u32`, lane 0 in the lowest byte.
    #[inline(always)]
    pub fn pack_u8(self) -> u32 {
        // i32 -> i16 signed saturate, then i16 -> u8 unsigned saturate;
        // the two steps together clamp any i32 to [0, 255].
        unsafe {
            let words = _mm_packs_epi32(self.0, self.0);
            let bytes = _mm_packus_epi16(words, words);
            _mm_cvtsi128_si32(bytes) as u32
        }
    }

    /// Unpacks four bytes into four zero-extended lanes, lowest byte to
    /// lane 0.
    #[inline(always)]
    pub fn unpack_u8(packed: u32) -> Self {
        unsafe {
            let zero = _mm_setzero_si128();
            let bytes = _mm_cvtsi32_si128(packed as i32);
            Self(_mm_unpacklo_epi16(_mm_unpacklo_epi8(bytes, zero), zero))
        }
    }

    /// Converts each lane to `f32` (round to nearest even where inexact).
    #[inline(always)]
    pub fn to_f32(self) -> F32x4 {
        unsafe { F32x4(_mm_cvtepi32_ps(self.0)) }
    }
}

// ---------------------------------------------------------------------
// F32x4 (SSE2)
// ---------------------------------------------------------------------

/// 4 lanes of `f32`.
#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct F32x4(__m128);

impl Default for F32x4 {
    #[inline(always)]
    fn default() -> Self {
        unsafe { Self(_mm_setzero_ps()) }
    }
}

impl Debug for F32x4 {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "F32x4({:?})", self.to_array())
    }
}

#[inline(always)]
unsafe fn splat_bits_ps(bits: u32) -> __m128 {
    unsafe { _mm_castsi128_ps(_mm_set1_epi32(bits as i32)) }
}

impl F32x4 {
    /// Builds a vector from an array, lane `i` from element `i`.
    #[inline(always)]
    pub fn from_array(arr: [f32; 4]) -> Self {
        unsafe { Self(_mm_loadu_ps(arr.as_ptr())) }
    }

    /// Returns the lanes as an array, element `i` from lane `i`.
    #[inline(always)]
    pub fn to_array(self) -> [f32; 4] {
        let mut arr = [0.0f32; 4];
        unsafe { _mm_storeu_ps(arr.as_mut_ptr(), self.0) };
        arr
    }

    /// Converts each lane to `i32`, rounding to nearest even. NaN and
    /// out-of-range lanes become `i32::MIN`.
    #[inline(always)]
    pub fn to_i32(self) -> I32x4 {
        unsafe { I32x4(_mm_cvtps_epi32(self.0)) }
    }

    /// Converts each lane to `i32`, rounding toward zero. NaN and
    /// out-of-range lanes become `i32::MIN`.
    #[inline(always)]
    pub fn to_i32_trunc(self) -> I32x4 {
        unsafe { I32x4(_mm_cvttps_epi32(self.0)) }
    }

    /// Interleaves the low halves: `[a0, b0, a1, b1]`.
    #[inline(always)]
    pub fn unpack_lo(self, other: Self) -> Self {
        unsafe { Self(_mm_unpacklo_ps(self.0, other.0)) }
    }

    /// Interleaves the high halves: `[a2, b2, a3, b3]`.
    #[inline(always)]
    pub fn unpack_hi(self, other: Self) -> Self {
        unsafe { Self(_mm_unpackhi_ps(self.0, other.0)) }
    }

    // Completes a round-via-i32-conversion: re-applies the input's sign
    // bit so -0.x keeps its sign, then passes through lanes with
    // |x| >= 2^23 (already integral, and outside the conversion's range)
    // and NaN lanes unchanged.
    #[inline(always)]
    unsafe fn finish_round(self, converted: __m128i) -> Self {
        unsafe {
            let sign = _mm_and_ps(self.0, splat_bits_ps(0x8000_0000));
            let rounded = _mm_or_ps(_mm_cvtepi32_ps(converted), sign);
            let magnitude = _mm_and_ps(self.0, splat_bits_ps(0x7fff_ffff));
            let small = _mm_cmplt_ps(magnitude, _mm_set1_ps(8_388_608.0));
            Self(_mm_or_ps(
                _mm_and_ps(small, rounded),
                _mm_andnot_ps(small, self.0),
            ))
        }
    }
}

impl Add for F32x4 {
    type Output = Self;
    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        unsafe { Self(_mm_add_ps(self.0, rhs.0)) }
    }
}

impl Sub for F32x4 {
    type Output = Self;
    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        unsafe { Self(_mm_sub_ps(self.0, rhs.0)) }
    }
}

impl Mul for F32x4 {
    type Output = Self;
    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        unsafe { Self(_mm_mul_ps(self.0, rhs.0)) }
    }
}

impl Div for F32x4 {
    type Output = Self;
    #[inline(always)]
    fn div(self, rhs: Self) -> Self {
        unsafe { Self(_mm_div_ps(self.0, rhs.0)) }
    }
}

impl Neg for F32x4 {
    type Output = Self;
    #[inline(always)]
    fn neg(self) -> Self {
        unsafe { Self(_mm_xor_ps(self.0, splat_bits_ps(0x8000_0000))) }
    }
}

impl BitAnd for F32x4 {
    type Output = Self;
    #[inline(always)]
    fn bitand(self, rhs: Self) -> Self {
        unsafe { Self(_mm_and_ps(self.0, rhs.0)) }
    }
}

impl BitOr for F32x4 {
    type Output = Self;
    #[inline(always)]
    fn bitor(self, rhs: Self) -> Self {
        unsafe { Self(_mm_or_ps(self.0, rhs.0)) }
    }
}

impl BitXor for F32x4 {
    type Output = Self;
    #[inline(always)]
    fn bitxor(self, rhs: Self) -> Self {
        unsafe { Self(_mm_xor_ps(self.0, rhs.0)) }
    }
}

impl Not for F32x4 {
    type Output = Self;
    #[inline(always)]
    fn not(self) -> Self {
        unsafe { Self(_mm_xor_ps(self.0, splat_bits_ps(0xffff_ffff))) }
    }
}

impl SimdVector for F32x4 {
    type Lane = f32;
    const LANES: usize = 4;

    #[inline(always)]
    fn splat(val: f32) -> Self {
        unsafe { Self(_mm_set1_ps(val)) }
    }

    #[inline(always)]
    fn load(slice: &[f32]) -> Self {
        assert!(slice.len() >= 4);
        // SAFETY: length checked above.
        unsafe { Self::load_ptr(slice.as_ptr()) }
    }

    #[inline(always)]
    fn store(&self, out: &mut [f32]) {
        assert!(out.len() >= 4);
        // SAFETY: length checked above.
        unsafe { self.store_ptr(out.as_mut_ptr()) }
    }

    #[inline(always)]
    unsafe fn load_ptr(ptr: *const f32) -> Self {
        // SAFETY: caller guarantees 16 readable bytes.
        unsafe { Self(_mm_loadu_ps(ptr)) }
    }

    #[inline(always)]
    unsafe fn store_ptr(self, ptr: *mut f32) {
        // SAFETY: caller guarantees 16 writable bytes.
        unsafe { _mm_storeu_ps(ptr, self.0) }
    }

    #[inline(always)]
    unsafe fn load_ptr_aligned(ptr: *const f32) -> Self {
        // SAFETY: caller guarantees 16 readable, 16-aligned bytes.
        unsafe { Self(_mm_load_ps(ptr)) }
    }

    #[inline(always)]
    unsafe fn store_ptr_aligned(self, ptr: *mut f32) {
        // SAFETY: caller guarantees 16 writable, 16-aligned bytes.
        unsafe { _mm_store_ps(ptr, self.0) }
    }

    #[inline(always)]
    fn get<const I: usize>(self) -> f32 {
        const { assert!(I < 4, "lane index out of range") }
        self.to_array()[I]
    }

    #[inline(always)]
    fn set<const I: usize>(self, val: f32) -> Self {
        const { assert!(I < 4, "lane index out of range") }
        let mut arr = self.to_array();
        arr[I] = val;
        Self::from_array(arr)
    }
}

impl FloatVector for F32x4 {
    #[inline(always)]
    fn nand(self, other: Self) -> Self {
        unsafe { Self(_mm_andnot_ps(self.0, other.0)) }
    }

    #[inline(always)]
    fn abs(self) -> Self {
        unsafe { Self(_mm_and_ps(self.0, splat_bits_ps(0x7fff_ffff))) }
    }

    #[inline(always)]
    fn min(self, other: Self) -> Self {
        unsafe { Self(_mm_min_ps(self.0, other.0)) }
    }

    #[inline(always)]
    fn max(self, other: Self) -> Self {
        unsafe { Self(_mm_max_ps(self.0, other.0)) }
    }

    #[inline(always)]
    fn sqrt(self) -> Self {
        unsafe { Self(_mm_sqrt_ps(self.0)) }
    }

    #[inline(always)]
    fn reciprocal(self) -> Self {
        // One Newton-Raphson step: n' = 2n - a*n*n.
        unsafe {
            let n = _mm_rcp_ps(self.0);
            let m = _mm_mul_ps(_mm_mul_ps(n, n), self.0);
            Self(_mm_sub_ps(_mm_add_ps(n, n), m))
        }
    }

    #[inline(always)]
    fn rsqrt(self) -> Self {
        // One Newton-Raphson step: n' = 0.5n * (3 - a*n*n).
        unsafe {
            let n = _mm_rsqrt_ps(self.0);
            let e = _mm_mul_ps(_mm_mul_ps(n, n), self.0);
            let n = _mm_mul_ps(_mm_set1_ps(0.5), n);
            let e = _mm_sub_ps(_mm_set1_ps(3.0), e);
            Self(_mm_mul_ps(n, e))
        }
    }

    #[inline(always)]
    fn fast_reciprocal(self) -> Self {
        unsafe { Self(_mm_rcp_ps(self.0)) }
    }

    #[inline(always)]
    fn fast_rsqrt(self) -> Self {
        unsafe { Self(_mm_rsqrt_ps(self.0)) }
    }

    #[inline(always)]
    fn fast_sqrt(self) -> Self {
        unsafe { Self(_mm_mul_ps(self.0, _mm_rsqrt_ps(self.0))) }
    }

    #[inline(always)]
    fn cmp_eq(self, other: Self) -> Self {
        unsafe { Self(_mm_cmpeq_ps(self.0, other.0)) }
    }

    #[inline(always)]
    fn cmp_ne(self, other: Self) -> Self {
        // cmpneq is unordered; mask it down to the ordered lanes.
        unsafe {
            Self(_mm_and_ps(
                _mm_cmpneq_ps(self.0, other.0),
                _mm_cmpord_ps(self.0, other.0),
            ))
        }
    }

    #[inline(always)]
    fn cmp_lt(self, other: Self) -> Self {
        unsafe { Self(_mm_cmplt_ps(self.0, other.0)) }
    }

    #[inline(always)]
    fn cmp_le(self, other: Self) -> Self {
        unsafe { Self(_mm_cmple_ps(self.0, other.0)) }
    }

    #[inline(always)]
    fn cmp_gt(self, other: Self) -> Self {
        // Single lt predicate with operands reversed; NaN stays
        // unordered (all-zero).
        unsafe { Self(_mm_cmplt_ps(other.0, self.0)) }
    }

    #[inline(always)]
    fn cmp_ge(self, other: Self) -> Self {
        unsafe { Self(_mm_cmple_ps(other.0, self.0)) }
    }

    #[inline(always)]
    fn select(self, if_true: Self, if_false: Self) -> Self {
        unsafe {
            Self(_mm_or_ps(
                _mm_and_ps(self.0, if_true.0),
                _mm_andnot_ps(self.0, if_false.0),
            ))
        }
    }

    #[inline(always)]
    fn round(self) -> Self {
        // cvtps uses the default MXCSR mode: nearest, ties to even.
        unsafe { self.finish_round(_mm_cvtps_epi32(self.0)) }
    }

    #[inline(always)]
    fn trunc(self) -> Self {
        unsafe { self.finish_round(_mm_cvttps_epi32(self.0)) }
    }

    #[inline(always)]
    fn floor(self) -> Self {
        // floor = trunc, minus one where truncation rounded up.
        unsafe {
            let t = self.trunc();
            let too_high = _mm_cmplt_ps(self.0, t.0);
            Self(_mm_sub_ps(t.0, _mm_and_ps(too_high, _mm_set1_ps(1.0))))
        }
    }

    #[inline(always)]
    fn ceil(self) -> Self {
        // ceil = trunc, plus one where truncation rounded down.
        unsafe {
            let t = self.trunc();
            let too_low = _mm_cmplt_ps(t.0, self.0);
            Self(_mm_add_ps(t.0, _mm_and_ps(too_low, _mm_set1_ps(1.0))))
        }
    }

    #[inline(always)]
    fn get_mask(self) -> u32 {
        unsafe { _mm_movemask_ps(self.0) as u32 }
    }
}

// ---------------------------------------------------------------------
// F32x8 (AVX)
// ---------------------------------------------------------------------

/// 8 lanes of `f32`.
#[cfg(target_feature = "avx")]
#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct F32x8(__m256);

#[cfg(target_feature = "avx")]
impl Default for F32x8 {
    #[inline(always)]
    fn default() -> Self {
        unsafe { Self(_mm256_setzero_ps()) }
    }
}

#[cfg(target_feature = "avx")]
impl Debug for F32x8 {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "F32x8({:?})", self.to_array())
    }
}

#[cfg(target_feature = "avx")]
#[inline(always)]
unsafe fn splat_bits_ps256(bits: u32) -> __m256 {
    unsafe { _mm256_castsi256_ps(_mm256_set1_epi32(bits as i32)) }
}

#[cfg(target_feature = "avx")]
impl F32x8 {
    /// Builds a vector from an array, lane `i` from element `i`.
    #[inline(always)]
    pub fn from_array(arr: [f32; 8]) -> Self {
        unsafe { Self(_mm256_loadu_ps(arr.as_ptr())) }
    }

    /// Returns the lanes as an array, element `i` from lane `i`.
    #[inline(always)]
    pub fn to_array(self) -> [f32; 8] {
        let mut arr = [0.0f32; 8];
        unsafe { _mm256_storeu_ps(arr.as_mut_ptr(), self.0) };
        arr
    }

    /// Interleaves low pairs within each 128-bit half:
    /// `[a0, b0, a1, b1, a4, b4, a5, b5]`.
    #[inline(always)]
    pub fn unpack_lo(self, other: Self) -> Self {
        unsafe { Self(_mm256_unpacklo_ps(self.0, other.0)) }
    }

    /// Interleaves high pairs within each 128-bit half:
    /// `[a2, b2, a3, b3, a6, b6, a7, b7]`.
    #[inline(always)]
    pub fn unpack_hi(self, other: Self) -> Self {
        unsafe { Self(_mm256_unpackhi_ps(self.0, other.0)) }
    }
}

#[cfg(target_feature = "avx")]
impl Add for F32x8 {
    type Output = Self;
    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        unsafe { Self(_mm256_add_ps(self.0, rhs.0)) }
    }
}

#[cfg(target_feature = "avx")]
impl Sub for F32x8 {
    type Output = Self;
    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        unsafe { Self(_mm256_sub_ps(self.0, rhs.0)) }
    }
}

#[cfg(target_feature = "avx")]
impl Mul for F32x8 {
    type Output = Self;
    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        unsafe { Self(_mm256_mul_ps(self.0, rhs.0)) }
    }
}

#[cfg(target_feature = "avx")]
impl Div for F32x8 {
    type Output = Self;
    #[inline(always)]
    fn div(self, rhs: Self) -> Self {
        unsafe { Self(_mm256_div_ps(self.0, rhs.0)) }
    }
}

#[cfg(target_feature = "avx")]
impl Neg for F32x8 {
    type Output = Self;
    #[inline(always)]
    fn neg(self) -> Self {
        unsafe { Self(_mm256_xor_ps(self.0, splat_bits_ps256(0x8000_0000))) }
    }
}

#[cfg(target_feature = "avx")]
impl BitAnd for F32x8 {
    type Output = Self;
    #[inline(always)]
    fn bitand(self, rhs: Self) -> Self {
        unsafe { Self(_mm256_and_ps(self.0, rhs.0)) }
    }
}

#[cfg(target_feature = "avx")]
impl BitOr for F32x8 {
    type Output = Self;
    #[inline(always)]
    fn bitor(self, rhs: Self) -> Self {
        unsafe { Self(_mm256_or_ps(self.0, rhs.0)) }
    }
}

#[cfg(target_feature = "avx")]
impl BitXor for F32x8 {
    type Output = Self;
    #[inline(always)]
    fn bitxor(self, rhs: Self) -> Self {
        unsafe { Self(_mm256_xor_ps(self.0, rhs.0)) }
    }
}

#[cfg(target_feature = "avx")]
impl Not for F32x8 {
    type Output = Self;
    #[inline(always)]
    fn not(self) -> Self {
        unsafe { Self(_mm256_xor_ps(self.0, splat_bits_ps256(0xffff_ffff))) }
    }
}

#[cfg(target_feature = "avx")]
impl SimdVector for F32x8 {
    type Lane = f32;
    const LANES: usize = 8;

    #[inline(always)]
    fn splat(val: f32) -> Self {
        unsafe { Self(_mm256_set1_ps(val)) }
    }

    #[inline(always)]
    fn load(slice: &[f32]) -> Self {
        assert!(slice.len() >= 8);
        // SAFETY: length checked above.
        unsafe { Self::load_ptr(slice.as_ptr()) }
    }

    #[inline(always)]
    fn store(&self, out: &mut [f32]) {
        assert!(out.len() >= 8);
        // SAFETY: length checked above.
        unsafe { self.store_ptr(out.as_mut_ptr()) }
    }

    #[inline(always)]
    unsafe fn load_ptr(ptr: *const f32) -> Self {
        // SAFETY: caller guarantees 32 readable bytes.
        unsafe { Self(_mm256_loadu_ps(ptr)) }
    }

    #[inline(always)]
    unsafe fn store_ptr(self, ptr: *mut f32) {
        // SAFETY: caller guarantees 32 writable bytes.
        unsafe { _mm256_storeu_ps(ptr, self.0) }
    }

    #[inline(always)]
    unsafe fn load_ptr_aligned(ptr: *const f32) -> Self {
        // SAFETY: caller guarantees 32 readable, 32-aligned bytes.
        unsafe { Self(_mm256_load_ps(ptr)) }
    }

    #[inline(always)]
    unsafe fn store_ptr_aligned(self, ptr: *mut f32) {
        // SAFETY: caller guarantees 32 writable, 32-aligned bytes.
        unsafe { _mm256_store_ps(ptr, self.0) }
    }

    #[inline(always)]
    fn get<const I: usize>(self) -> f32 {
        const { assert!(I < 8, "lane index out of range") }
        self.to_array()[I]
    }

    #[inline(always)]
    fn set<const I: usize>(self, val: f32) -> Self {
        const { assert!(I < 8, "lane index out of range") }
        let mut arr = self.to_array();
        arr[I] = val;
        Self::from_array(arr)
    }
}

#[cfg(target_feature = "avx")]
impl FloatVector for F32x8 {
    #[inline(always)]
    fn nand(self, other: Self) -> Self {
        unsafe { Self(_mm256_andnot_ps(self.0, other.0)) }
    }

    #[inline(always)]
    fn abs(self) -> Self {
        unsafe { Self(_mm256_and_ps(self.0, splat_bits_ps256(0x7fff_ffff))) }
    }

    #[inline(always)]
    fn min(self, other: Self) -> Self {
        unsafe { Self(_mm256_min_ps(self.0, other.0)) }
    }

    #[inline(always)]
    fn max(self, other: Self) -> Self {
        unsafe { Self(_mm256_max_ps(self.0, other.0)) }
    }

    #[inline(always)]
    fn sqrt(self) -> Self {
        unsafe { Self(_mm256_sqrt_ps(self.0)) }
    }

    #[inline(always)]
    fn reciprocal(self) -> Self {
        // One Newton-Raphson step: n' = 2n - a*n*n.
        unsafe {
            let n = _mm256_rcp_ps(self.0);
            let m = _mm256_mul_ps(_mm256_mul_ps(n, n), self.0);
            Self(_mm256_sub_ps(_mm256_add_ps(n, n), m))
        }
    }

    #[inline(always)]
    fn rsqrt(self) -> Self {
        // One Newton-Raphson step: n' = 0.5n * (3 - a*n*n).
        unsafe {
            let n = _mm256_rsqrt_ps(self.0);
            let e = _mm256_mul_ps(_mm256_mul_ps(n, n), self.0);
            let n = _mm256_mul_ps(_mm256_set1_ps(0.5), n);
            let e = _mm256_sub_ps(_mm256_set1_ps(3.0), e);
            Self(_mm256_mul_ps(n, e))
        }
    }

    #[inline(always)]
    fn fast_reciprocal(self) -> Self {
        unsafe { Self(_mm256_rcp_ps(self.0)) }
    }

    #[inline(always)]
    fn fast_rsqrt(self) -> Self {
        unsafe { Self(_mm256_rsqrt_ps(self.0)) }
    }

    #[inline(always)]
    fn fast_sqrt(self) -> Self {
        unsafe { Self(_mm256_mul_ps(self.0, _mm256_rsqrt_ps(self.0))) }
    }

    #[inline(always)]
    fn cmp_eq(self, other: Self) -> Self {
        unsafe { Self(_mm256_cmp_ps::<_CMP_EQ_OQ>(self.0, other.0)) }
    }

    #[inline(always)]
    fn cmp_ne(self, other: Self) -> Self {
        // Ordered predicate: NaN lanes come back all-zero.
        unsafe { Self(_mm256_cmp_ps::<_CMP_NEQ_OQ>(self.0, other.0)) }
    }

    #[inline(always)]
    fn cmp_lt(self, other: Self) -> Self {
        unsafe { Self(_mm256_cmp_ps::<_CMP_LT_OQ>(self.0, other.0)) }
    }

    #[inline(always)]
    fn cmp_le(self, other: Self) -> Self {
        unsafe { Self(_mm256_cmp_ps::<_CMP_LE_OQ>(self.0, other.0)) }
    }

    #[inline(always)]
    fn cmp_gt(self, other: Self) -> Self {
        // Single lt predicate with operands reversed; NaN stays
        // unordered (all-zero).
        unsafe { Self(_mm256_cmp_ps::<_CMP_LT_OQ>(other.0, self.0)) }
    }

    #[inline(always)]
    fn cmp_ge(self, other: Self) -> Self {
        unsafe { Self(_mm256_cmp_ps::<_CMP_LE_OQ>(other.0, self.0)) }
    }

    #[inline(always)]
    fn select(self, if_true: Self, if_false: Self) -> Self {
        // blendv keys on the mask's sign bit, which canonical masks set.
        unsafe { Self(_mm256_blendv_ps(if_false.0, if_true.0, self.0)) }
    }

    #[inline(always)]
    fn round(self) -> Self {
        unsafe {
            Self(_mm256_round_ps::<{ _MM_FROUND_TO_NEAREST_INT | _MM_FROUND_NO_EXC }>(self.0))
        }
    }

    #[inline(always)]
    fn trunc(self) -> Self {
        unsafe { Self(_mm256_round_ps::<{ _MM_FROUND_TO_ZERO | _MM_FROUND_NO_EXC }>(self.0)) }
    }

    #[inline(always)]
    fn floor(self) -> Self {
        unsafe { Self(_mm256_round_ps::<{ _MM_FROUND_TO_NEG_INF | _MM_FROUND_NO_EXC }>(self.0)) }
    }

    #[inline(always)]
    fn ceil(self) -> Self {
        unsafe { Self(_mm256_round_ps::<{ _MM_FROUND_TO_POS_INF | _MM_FROUND_NO_EXC }>(self.0)) }
    }

    #[inline(always)]
    fn get_mask(self) -> u32 {
        unsafe { _mm256_movemask_ps(self.0) as u32 }
    }
}
