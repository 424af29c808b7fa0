//! Performance benchmarks for ebcdic-dbcs.
//!
//! Covers single lookups in both directions, whole-string SO/SI conversion
//! and table building, all against the sample mapping file.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use ebcdic_dbcs::{BuildOptions, Codec, ErrorMode};

fn sample_ucm() -> String {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../tests/fixtures/ucm/sample-935.ucm");
    std::fs::read_to_string(path).expect("sample fixture")
}

fn sample_codec() -> Codec {
    Codec::from_ucm_str(&sample_ucm(), &BuildOptions::default())
        .expect("sample builds")
        .value
}

// ---------------------------------------------------------------------------
// Lookups
// ---------------------------------------------------------------------------

fn bench_decode_unit(c: &mut Criterion) {
    let codec = sample_codec();
    c.bench_function("decode_unit/all_units", |b| {
        b.iter(|| {
            let mut mapped = 0usize;
            for unit in 0..=u16::MAX {
                mapped += usize::from(codec.decode_unit(black_box(unit)) != '\u{FFFD}');
            }
            mapped
        })
    });
}

fn bench_encode_char(c: &mut Criterion) {
    let codec = sample_codec();
    c.bench_function("encode_char/bmp", |b| {
        b.iter(|| {
            (0..=0xFFFFu32)
                .filter_map(char::from_u32)
                .filter(|&ch| codec.encode_char(black_box(ch)).is_some())
                .count()
        })
    });
}

// ---------------------------------------------------------------------------
// Streams
// ---------------------------------------------------------------------------

fn bench_streams(c: &mut Criterion) {
    let codec = sample_codec();
    let text = "ABC 中文\u{3001}abc 一丁七万 ".repeat(256);
    let bytes = codec.encode(&text, ErrorMode::Strict).expect("encodable");

    c.bench_function("encode/mixed_4k", |b| {
        b.iter(|| codec.encode(black_box(&text), ErrorMode::Replace))
    });
    c.bench_function("decode/mixed_4k", |b| {
        b.iter(|| codec.decode(black_box(&bytes), ErrorMode::Replace))
    });
}

// ---------------------------------------------------------------------------
// Building
// ---------------------------------------------------------------------------

fn bench_build(c: &mut Criterion) {
    let ucm = sample_ucm();
    let codec = sample_codec();
    let blob = codec.to_blob().expect("blob");

    c.bench_function("build/from_ucm", |b| {
        b.iter(|| Codec::from_ucm_str(black_box(&ucm), &BuildOptions::default()))
    });
    c.bench_function("build/from_blob", |b| {
        b.iter(|| Codec::from_blob(black_box(&blob)))
    });
}

criterion_group!(
    benches,
    bench_decode_unit,
    bench_encode_char,
    bench_streams,
    bench_build
);
criterion_main!(benches);
