use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sc700c::{config, Decoder, Encoder};

fn tone_frame() -> [i16; config::SAMPLES_PER_FRAME] {
    let mut samples = [0i16; config::SAMPLES_PER_FRAME];
    for (i, s) in samples.iter_mut().enumerate() {
        let t = i as f32 / config::FS as f32;
        *s = (6000.0 * libm::sinf(core::f32::consts::TAU * 150.0 * t)) as i16;
    }
    samples
}

fn bench_encode(c: &mut Criterion) {
    let mut encoder = Encoder::new().unwrap();
    let frame = tone_frame();
    c.bench_function("encode_one_superframe", |b| {
        b.iter(|| black_box(encoder.encode(black_box(&frame))));
    });
}

fn bench_decode(c: &mut Criterion) {
    let mut encoder = Encoder::new().unwrap();
    let mut decoder = Decoder::new().unwrap();
    let frame = tone_frame();
    let indexes = encoder.encode(&frame);
    c.bench_function("decode_one_superframe", |b| {
        b.iter(|| black_box(decoder.decode(black_box(&indexes))));
    });
}

criterion_group!(benches, bench_encode, bench_decode);
criterion_main!(benches);
