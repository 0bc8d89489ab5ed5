use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::{ImageBuffer, Rgb, RgbImage};
use seamshrink::{shrink_image, DualGradient, Size, Sobel};

fn sample() -> RgbImage {
    ImageBuffer::from_fn(160, 120, |x, y| {
        Rgb([(x ^ y) as u8, (x * 3 + y) as u8, (x * y) as u8])
    })
}

fn bench_shrink(c: &mut Criterion) {
    let image = sample();
    c.bench_function("dual gradient 160x120 -> 150x110", |b| {
        b.iter(|| shrink_image(black_box(&image), Size::new(150, 110), &DualGradient))
    });
    c.bench_function("sobel 160x120 -> 150x110", |b| {
        b.iter(|| shrink_image(black_box(&image), Size::new(150, 110), &Sobel))
    });
}

criterion_group!(benches, bench_shrink);
criterion_main!(benches);
