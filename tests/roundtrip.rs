//! Integration round-trip tests against WAV fixtures.
//!
//! These exercise the full `Encoder`/`Decoder` pair end to end rather than
//! any one module in isolation, so they're kept out of `src/` alongside
//! the `hound` dependency they need `std` for.

#![cfg(feature = "std")]

use sc700c::{config, Decoder, Encoder};

fn encode_decode_all(samples: &[i16]) -> Vec<i16> {
    let mut encoder = Encoder::new().unwrap();
    let mut decoder = Decoder::new().unwrap();
    let frame_len = config::SAMPLES_PER_FRAME;

    let mut out = Vec::with_capacity(samples.len());
    for chunk in samples.chunks(frame_len) {
        let mut frame = [0i16; 320];
        frame[..chunk.len()].copy_from_slice(chunk);
        let indexes = encoder.encode(&frame);
        let decoded = decoder.decode(&indexes);
        out.extend_from_slice(&decoded);
    }
    out
}

#[test]
fn silence_in_silence_out() {
    let samples = vec![0i16; config::SAMPLES_PER_FRAME * 4];
    let out = encode_decode_all(&samples);
    let peak = out.iter().map(|&s| (s as i32).abs()).max().unwrap();
    assert!(peak < 500, "unexpected energy in decoded silence: peak {peak}");
}

#[test]
fn voiced_sawtooth_round_trips_without_nans_or_clipping_runaway() {
    let mut samples = Vec::new();
    let period = config::FS as f32 / 150.0;
    for i in 0..config::SAMPLES_PER_FRAME * 6 {
        let phase = (i as f32 % period) / period;
        samples.push(((phase * 2.0 - 1.0) * 6000.0) as i16);
    }
    let out = encode_decode_all(&samples);
    assert!(out.iter().all(|&s| (s as i32).abs() <= 32760));
}

#[test]
fn white_noise_round_trips_without_clipping_runaway() {
    // A tiny deterministic PRNG so the test doesn't depend on an external
    // rand crate just for fixture generation.
    let mut state: u32 = 12345;
    let mut samples = Vec::new();
    for _ in 0..config::SAMPLES_PER_FRAME * 4 {
        state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        let v = ((state >> 16) % 32768) as i32 - 16384;
        samples.push(v as i16);
    }
    let out = encode_decode_all(&samples);
    assert!(out.iter().all(|&s| (s as i32).abs() <= 32760));
}

#[test]
fn wav_fixture_round_trip_produces_the_expected_sample_count() {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: config::FS as u32,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = std::io::Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        for i in 0..config::SAMPLES_PER_FRAME * 2 {
            let t = i as f32 / config::FS as f32;
            let s = (4000.0 * libm::sinf(core::f32::consts::TAU * 200.0 * t)) as i16;
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();
    }

    cursor.set_position(0);
    let reader = hound::WavReader::new(cursor).unwrap();
    let samples: Vec<i16> = reader.into_samples::<i16>().map(|s| s.unwrap()).collect();
    let out = encode_decode_all(&samples);
    assert_eq!(out.len(), samples.len());
}
