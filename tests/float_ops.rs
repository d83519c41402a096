//! Float catalog semantics: IEEE arithmetic, hardware min/max selection,
//! ordered compare masks, the rounding family, conversions, and the
//! estimate tolerances.

use lanevec::{F32x4, F32x8, FloatVector, I32x4, SimdVector};

// Raw estimate bound (rcpps/rsqrtps): relative error <= 1.5 * 2^-12.
// fast_sqrt compounds the rsqrt estimate with a multiply, so its checks
// allow twice that.
const FAST_REL_TOL: f32 = 3.7e-4;
// After one Newton-Raphson step the error is squared.
const REFINED_REL_TOL: f32 = 1e-6;

fn assert_rel_close(got: f32, want: f32, tol: f32) {
    let err = (got - want).abs() / want.abs();
    assert!(
        err <= tol,
        "got {got}, want {want} within rel {tol}, err {err}"
    );
}

#[test]
fn arithmetic_lanes() {
    let a = F32x4::from_array([1.0, -2.0, 0.5, 100.0]);
    let b = F32x4::from_array([2.0, 4.0, 0.25, -10.0]);
    assert_eq!((a + b).to_array(), [3.0, 2.0, 0.75, 90.0]);
    assert_eq!((a - b).to_array(), [-1.0, -6.0, 0.25, 110.0]);
    assert_eq!((a * b).to_array(), [2.0, -8.0, 0.125, -1000.0]);
    assert_eq!((a / b).to_array(), [0.5, -0.5, 2.0, -10.0]);
}

#[test]
fn neg_and_abs_are_sign_bit_ops() {
    let v = F32x4::from_array([1.5, -1.5, 0.0, -0.0]);
    let n = (-v).to_array();
    assert_eq!(n[0], -1.5);
    assert_eq!(n[1], 1.5);
    assert_eq!(n[2].to_bits(), (-0.0f32).to_bits());
    assert_eq!(n[3].to_bits(), 0.0f32.to_bits());

    let a = v.abs().to_array();
    assert_eq!(a, [1.5, 1.5, 0.0, 0.0]);
    assert_eq!(a[3].to_bits(), 0.0f32.to_bits());

    // abs of NaN clears only the sign bit.
    let nan = F32x4::splat(f32::from_bits(0xffc0_0001));
    assert_eq!(nan.abs().to_array()[0].to_bits(), 0x7fc0_0001);
}

#[test]
fn min_max_second_operand_wins() {
    // The hardware rule, not f32::min: NaN in the first operand is
    // discarded, NaN in the second propagates.
    let nan = F32x4::splat(f32::NAN);
    let one = F32x4::splat(1.0);
    assert_eq!(nan.min(one).to_array(), [1.0; 4]);
    assert!(one.min(nan).to_array()[0].is_nan());
    assert_eq!(nan.max(one).to_array(), [1.0; 4]);
    assert!(one.max(nan).to_array()[0].is_nan());

    // Equal magnitudes: the second operand's zero is returned.
    let pz = F32x4::splat(0.0);
    let nz = F32x4::splat(-0.0);
    assert_eq!(nz.min(pz).to_array()[0].to_bits(), 0.0f32.to_bits());
    assert_eq!(pz.min(nz).to_array()[0].to_bits(), (-0.0f32).to_bits());

    let a = F32x4::from_array([1.0, -5.0, 2.5, f32::INFINITY]);
    let b = F32x4::from_array([2.0, -6.0, 2.5, f32::NEG_INFINITY]);
    assert_eq!(a.min(b).to_array(), [1.0, -6.0, 2.5, f32::NEG_INFINITY]);
    assert_eq!(a.max(b).to_array(), [2.0, -5.0, 2.5, f32::INFINITY]);
}

#[test]
fn compares_are_ordered() {
    let a = F32x4::from_array([1.0, 2.0, 3.0, 4.0]);
    let b = F32x4::from_array([1.0, 1.0, 4.0, 4.0]);
    let bits = |v: F32x4| v.to_array().map(f32::to_bits);
    assert_eq!(bits(a.cmp_eq(b)), [!0, 0, 0, !0]);
    assert_eq!(bits(a.cmp_ne(b)), [0, !0, !0, 0]);
    assert_eq!(bits(a.cmp_lt(b)), [0, 0, !0, 0]);
    assert_eq!(bits(a.cmp_le(b)), [!0, 0, !0, !0]);
    assert_eq!(bits(a.cmp_gt(b)), [0, !0, 0, 0]);
    assert_eq!(bits(a.cmp_ge(b)), [!0, !0, 0, !0]);
}

#[test]
fn nan_compares_all_false() {
    // Every predicate is ordered, including not-equal.
    let a = F32x4::from_array([f32::NAN, 1.0, f32::NAN, 0.0]);
    let b = F32x4::from_array([1.0, f32::NAN, f32::NAN, 0.0]);
    let bits = |v: F32x4| v.to_array().map(f32::to_bits);
    assert_eq!(bits(a.cmp_eq(b)), [0, 0, 0, !0]);
    assert_eq!(bits(a.cmp_ne(b)), [0, 0, 0, 0]);
    assert_eq!(bits(a.cmp_lt(b)), [0, 0, 0, 0]);
    assert_eq!(bits(a.cmp_le(b)), [0, 0, 0, !0]);
    assert_eq!(bits(a.cmp_gt(b)), [0, 0, 0, 0]);
    assert_eq!(bits(a.cmp_ge(b)), [0, 0, 0, !0]);
}

#[test]
fn select_blends_on_compare_mask() {
    let a = F32x4::from_array([1.0, 5.0, 3.0, 7.0]);
    let b = F32x4::from_array([4.0, 2.0, 6.0, 0.0]);
    let mask = a.cmp_gt(b);
    assert_eq!(mask.select(a, b).to_array(), [4.0, 5.0, 6.0, 7.0]);
    assert_eq!(mask.select(b, a).to_array(), [1.0, 2.0, 3.0, 0.0]);
}

#[test]
fn rounding_family() {
    let v = F32x4::from_array([2.5, 3.5, -2.5, -3.5]);
    // Ties to even, both signs.
    assert_eq!(v.round().to_array(), [2.0, 4.0, -2.0, -4.0]);
    assert_eq!(v.trunc().to_array(), [2.0, 3.0, -2.0, -3.0]);
    assert_eq!(v.floor().to_array(), [2.0, 3.0, -3.0, -4.0]);
    assert_eq!(v.ceil().to_array(), [3.0, 4.0, -2.0, -3.0]);

    let v = F32x4::from_array([1.2, -1.2, 0.4, -0.6]);
    assert_eq!(v.round().to_array(), [1.0, -1.0, 0.0, -1.0]);
    assert_eq!(v.trunc().to_array(), [1.0, -1.0, 0.0, -0.0]);
    assert_eq!(v.floor().to_array(), [1.0, -2.0, 0.0, -1.0]);
    assert_eq!(v.ceil().to_array(), [2.0, -1.0, 1.0, -0.0]);
}

#[test]
fn rounding_preserves_negative_zero() {
    let v = F32x4::from_array([-0.4, -0.0, -0.5, 0.4]);
    let nz = (-0.0f32).to_bits();
    assert_eq!(v.trunc().to_array().map(f32::to_bits)[0], nz);
    assert_eq!(v.round().to_array().map(f32::to_bits)[0], nz);
    assert_eq!(v.floor().to_array().map(f32::to_bits)[1], nz);
    assert_eq!(v.ceil().to_array().map(f32::to_bits)[0], nz);
    // round(-0.5) ties to even zero, keeping the sign.
    assert_eq!(v.round().to_array().map(f32::to_bits)[2], nz);
    assert_eq!(v.round().to_array()[3], 0.0);
}

#[test]
fn rounding_at_precision_edge() {
    // 2^23 - 0.5 is the largest representable half; above 2^23 every
    // value is already integral and must pass through untouched.
    let v = F32x4::from_array([8_388_607.5, 8_388_608.0, 1.0e10, -1.0e10]);
    assert_eq!(
        v.round().to_array(),
        [8_388_608.0, 8_388_608.0, 1.0e10, -1.0e10]
    );
    assert_eq!(
        v.trunc().to_array(),
        [8_388_607.0, 8_388_608.0, 1.0e10, -1.0e10]
    );
    assert_eq!(
        v.floor().to_array(),
        [8_388_607.0, 8_388_608.0, 1.0e10, -1.0e10]
    );
    assert_eq!(
        v.ceil().to_array(),
        [8_388_608.0, 8_388_608.0, 1.0e10, -1.0e10]
    );
}

#[test]
fn rounding_passes_non_finite_through() {
    let v = F32x4::from_array([f32::NAN, f32::INFINITY, f32::NEG_INFINITY, 0.0]);
    for r in [v.round(), v.trunc(), v.floor(), v.ceil()] {
        let lanes = r.to_array();
        assert!(lanes[0].is_nan());
        assert_eq!(lanes[1], f32::INFINITY);
        assert_eq!(lanes[2], f32::NEG_INFINITY);
        assert_eq!(lanes[3], 0.0);
    }
}

#[test]
fn fract_is_sub_floor() {
    let v = F32x4::from_array([1.25, -1.25, 3.0, -0.75]);
    assert_eq!(v.fract().to_array(), [0.25, 0.75, 0.0, 0.25]);

    let samples = [0.1f32, -0.1, 7.9, -7.9, 123.456, -123.456];
    for &x in &samples {
        let v = F32x4::splat(x);
        let expected = (v - v.floor()).to_array();
        assert_eq!(v.fract().to_array(), expected);
    }
}

#[test]
fn sqrt_is_exact() {
    let v = F32x4::from_array([4.0, 2.0, 0.25, 144.0]);
    let r = v.sqrt().to_array();
    assert_eq!(r[0], 2.0);
    assert_eq!(r[0].to_bits(), 4.0f32.sqrt().to_bits());
    assert_eq!(r[1].to_bits(), 2.0f32.sqrt().to_bits());
    assert_eq!(r[2], 0.5);
    assert_eq!(r[3], 12.0);
    assert!(F32x4::splat(-1.0).sqrt().to_array()[0].is_nan());
    assert_eq!(F32x4::splat(0.0).sqrt().to_array()[0], 0.0);
}

#[test]
fn refined_estimates_near_exact() {
    let inputs = [0.5f32, 1.0, 3.0, 7.5, 100.0, 12345.0, 1.0e-3];
    for &x in &inputs {
        let v = F32x4::splat(x);
        assert_rel_close(v.reciprocal().to_array()[0], 1.0 / x, REFINED_REL_TOL);
        assert_rel_close(v.rsqrt().to_array()[0], 1.0 / x.sqrt(), REFINED_REL_TOL);
    }
}

#[test]
fn fast_estimates_within_tolerance() {
    let inputs = [0.5f32, 1.0, 3.0, 7.5, 100.0, 12345.0, 1.0e-3];
    for &x in &inputs {
        let v = F32x4::splat(x);
        assert_rel_close(v.fast_reciprocal().to_array()[0], 1.0 / x, FAST_REL_TOL);
        assert_rel_close(v.fast_rsqrt().to_array()[0], 1.0 / x.sqrt(), FAST_REL_TOL);
        assert_rel_close(v.fast_sqrt().to_array()[0], x.sqrt(), 2.0 * FAST_REL_TOL);
    }
}

#[test]
fn wide_estimates_within_tolerance() {
    let inputs = [0.5f32, 1.0, 3.0, 7.5, 100.0, 12345.0, 1.0e-3, 4.0e5];
    let v = F32x8::from_array(inputs);
    let recip = v.reciprocal().to_array();
    let rsqrt = v.rsqrt().to_array();
    let fast_recip = v.fast_reciprocal().to_array();
    let fast_rsqrt = v.fast_rsqrt().to_array();
    let fast_sqrt = v.fast_sqrt().to_array();
    for (i, &x) in inputs.iter().enumerate() {
        assert_rel_close(recip[i], 1.0 / x, REFINED_REL_TOL);
        assert_rel_close(rsqrt[i], 1.0 / x.sqrt(), REFINED_REL_TOL);
        assert_rel_close(fast_recip[i], 1.0 / x, FAST_REL_TOL);
        assert_rel_close(fast_rsqrt[i], 1.0 / x.sqrt(), FAST_REL_TOL);
        assert_rel_close(fast_sqrt[i], x.sqrt(), 2.0 * FAST_REL_TOL);
    }
}

#[test]
fn sign_mask_per_lane() {
    let v = F32x4::from_array([-1.0, 2.0, -0.0, 3.0]);
    assert_eq!(v.get_mask(), 0b0101);
    assert_eq!(F32x4::splat(0.0).get_mask(), 0);
    assert_eq!(F32x4::splat(-1.0).get_mask(), 0b1111);
    // get_mask reads the raw sign bit, negative NaN included.
    assert_eq!(F32x4::splat(f32::from_bits(0xffc0_0000)).get_mask(), 0b1111);
}

#[test]
fn float_to_int_conversions() {
    let v = F32x4::from_array([2.5, 3.5, -2.5, -1.7]);
    assert_eq!(v.to_i32().to_array(), [2, 4, -2, -2]);
    assert_eq!(v.to_i32_trunc().to_array(), [2, 3, -2, -1]);

    // NaN and out-of-range lanes become the integer indefinite value.
    let v = F32x4::from_array([f32::NAN, 3.0e9, -3.0e9, 2_147_483_520.0]);
    assert_eq!(
        v.to_i32().to_array(),
        [i32::MIN, i32::MIN, i32::MIN, 2_147_483_520]
    );
    assert_eq!(
        F32x4::splat(-2_147_483_648.0).to_i32().to_array(),
        [i32::MIN; 4]
    );
}

#[test]
fn int_float_round_trip() {
    let v = I32x4::from_array([0, 255, -128, 1_000_000]);
    assert_eq!(v.to_f32().to_i32().to_array(), v.to_array());
}

#[test]
fn interleave_lanes() {
    let a = F32x4::from_array([0.0, 1.0, 2.0, 3.0]);
    let b = F32x4::from_array([10.0, 11.0, 12.0, 13.0]);
    assert_eq!(a.unpack_lo(b).to_array(), [0.0, 10.0, 1.0, 11.0]);
    assert_eq!(a.unpack_hi(b).to_array(), [2.0, 12.0, 3.0, 13.0]);
}

#[test]
fn wide_lanes_basic_ops() {
    let a = F32x8::from_array([1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
    let b = F32x8::splat(2.0);
    assert_eq!(
        (a * b).to_array(),
        [2.0, 4.0, 6.0, 8.0, 10.0, 12.0, 14.0, 16.0]
    );
    assert_eq!(
        a.min(b).to_array(),
        [1.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0]
    );

    let mask = a.cmp_gt(F32x8::splat(4.5));
    assert_eq!(
        mask.select(a, b).to_array(),
        [2.0, 2.0, 2.0, 2.0, 5.0, 6.0, 7.0, 8.0]
    );

    let signs = F32x8::from_array([-1.0, 1.0, -1.0, 1.0, 1.0, 1.0, -1.0, -1.0]);
    assert_eq!(signs.get_mask(), 0b1100_0101);

    assert_eq!(
        F32x8::from_array([2.5, -2.5, 1.2, -1.2, 0.5, 1.5, -0.6, 9.0])
            .round()
            .to_array(),
        [2.0, -2.0, 1.0, -1.0, 0.0, 2.0, -1.0, 9.0]
    );
    assert_eq!(F32x8::splat(16.0).sqrt().to_array(), [4.0; 8]);
}

#[test]
fn wide_interleave_is_half_wise() {
    // 256-bit unpack interleaves within each 128-bit half.
    let a = F32x8::from_array([0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
    let b = F32x8::from_array([10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0, 17.0]);
    assert_eq!(
        a.unpack_lo(b).to_array(),
        [0.0, 10.0, 1.0, 11.0, 4.0, 14.0, 5.0, 15.0]
    );
    assert_eq!(
        a.unpack_hi(b).to_array(),
        [2.0, 12.0, 3.0, 13.0, 6.0, 16.0, 7.0, 17.0]
    );
}
