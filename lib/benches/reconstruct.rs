use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use depth_mesh::io::write_obj;
use depth_mesh::io::write_rex;
use depth_mesh::{ColorFrame, DepthFrame, ReconstructParams, reconstruct};

const WIDTH: u32 = 640;
const HEIGHT: u32 = 576;

// A tilted plane crossing the default depth range, so roughly half the
// pixels produce vertices.
#[allow(clippy::cast_possible_truncation)]
fn tilted_plane() -> (DepthFrame, ColorFrame) {
    let mut samples = Vec::with_capacity((WIDTH * HEIGHT) as usize);
    let mut pixels = Vec::with_capacity((WIDTH * HEIGHT) as usize);
    for y in 0..HEIGHT {
        for x in 0..WIDTH {
            samples.push((250 + x + y) as u16);
            pixels.push([x as u8, y as u8, (x ^ y) as u8, 255]);
        }
    }
    (
        DepthFrame::new(WIDTH, HEIGHT, samples).unwrap(),
        ColorFrame::new(WIDTH, HEIGHT, pixels).unwrap(),
    )
}

pub fn reconstruct_benchmark(c: &mut Criterion) {
    let (depth, color) = tilted_plane();
    let params = ReconstructParams::default();

    c.bench_function("reconstruct 640x576", |b| {
        b.iter(|| {
            let mesh = reconstruct(black_box(&depth), black_box(&color), &params);
            assert!(mesh.is_ok(), "Mesh should be generated");
        })
    });
}

pub fn export_benchmark(c: &mut Criterion) {
    let (depth, color) = tilted_plane();
    let mesh = reconstruct(&depth, &color, &ReconstructParams::default()).unwrap();

    c.bench_function("write_rex", |b| {
        b.iter(|| {
            let mut buffer = Vec::new();
            write_rex(&mut buffer, black_box(&mesh)).unwrap();
            buffer
        })
    });

    c.bench_function("write_obj", |b| {
        b.iter(|| {
            let mut buffer = Vec::new();
            write_obj(&mut buffer, black_box(&mesh)).unwrap();
            buffer
        })
    });
}

criterion_group!(benches, reconstruct_benchmark, export_benchmark);
criterion_main!(benches);
