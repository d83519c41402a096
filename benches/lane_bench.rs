use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lanevec::{F32x4, FloatVector, I32x4, IntVector, SimdVector};

fn bench_int_chain(c: &mut Criterion) {
    let data: Vec<i32> = (0..4096i64).map(|i| (i * 2654435761) as i32).collect();

    c.bench_function("i32x4_mul_add_chain", |b| {
        b.iter(|| {
            let mut acc = I32x4::splat(0);
            let k = I32x4::splat(3);
            for chunk in black_box(&data).chunks_exact(4) {
                let v = I32x4::load(chunk);
                acc = acc + v * k;
            }
            black_box(acc)
        })
    });

    c.bench_function("i32x4_saturating_add", |b| {
        b.iter(|| {
            let mut acc = I32x4::splat(0);
            for chunk in black_box(&data).chunks_exact(4) {
                acc = acc.saturating_add(I32x4::load(chunk));
            }
            black_box(acc)
        })
    });
}

fn bench_rsqrt(c: &mut Criterion) {
    let data: Vec<f32> = (1..4097).map(|i| i as f32 * 0.37).collect();

    c.bench_function("f32x4_rsqrt_refined", |b| {
        b.iter(|| {
            let mut acc = F32x4::splat(0.0);
            for chunk in black_box(&data).chunks_exact(4) {
                acc = acc + F32x4::load(chunk).rsqrt();
            }
            black_box(acc)
        })
    });

    c.bench_function("f32x4_rsqrt_fast", |b| {
        b.iter(|| {
            let mut acc = F32x4::splat(0.0);
            for chunk in black_box(&data).chunks_exact(4) {
                acc = acc + F32x4::load(chunk).fast_rsqrt();
            }
            black_box(acc)
        })
    });

    c.bench_function("f32x4_rsqrt_exact_div", |b| {
        b.iter(|| {
            let mut acc = F32x4::splat(0.0);
            let one = F32x4::splat(1.0);
            for chunk in black_box(&data).chunks_exact(4) {
                acc = acc + one / F32x4::load(chunk).sqrt();
            }
            black_box(acc)
        })
    });
}

fn bench_pack(c: &mut Criterion) {
    let data: Vec<i32> = (0..4096).map(|i| (i * 7919) % 1024 - 256).collect();

    c.bench_function("i32x4_pack_unpack", |b| {
        b.iter(|| {
            let mut acc = 0u32;
            for chunk in black_box(&data).chunks_exact(4) {
                let packed = I32x4::load(chunk).pack_u8();
                acc = acc.wrapping_add(I32x4::unpack_u8(packed).pack_u8());
            }
            black_box(acc)
        })
    });
}

criterion_group!(benches, bench_int_chain, bench_rsqrt, bench_pack);
criterion_main!(benches);
