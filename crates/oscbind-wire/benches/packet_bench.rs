//! Packet encode/decode benchmarks

use bytes::Bytes;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use oscbind_wire::{decode_messages, encode_message, OscMessage};

fn bench_encode(c: &mut Criterion) {
    let msg = OscMessage::new("/scene/camera/transform")
        .arg(1.0f32)
        .arg(2.0f32)
        .arg(3.0f32)
        .arg(42i32)
        .arg("label");

    c.bench_function("encode_message", |b| {
        b.iter(|| encode_message(black_box(&msg)).unwrap())
    });
}

fn bench_decode(c: &mut Criterion) {
    let mut msg = OscMessage::new("/matrix");
    for i in 0..16 {
        msg.push(i as f32);
    }
    msg.push(Bytes::from_static(&[0xAB; 32]));
    let bytes = encode_message(&msg).unwrap();

    c.bench_function("decode_messages", |b| {
        b.iter(|| decode_messages(black_box(&bytes)).unwrap())
    });
}

criterion_group!(benches, bench_encode, bench_decode);
criterion_main!(benches);
