use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lumen_core::GeometryLoader;
use std::fmt::Write;

fn grid_source(cells: u16) -> String {
    let mut text = String::from("# generated grid\n[points]\n");
    for y in 0..=cells {
        for x in 0..=cells {
            let fx = f32::from(x) / f32::from(cells) - 0.5;
            let fy = f32::from(y) / f32::from(cells) - 0.5;
            writeln!(text, "{fx} {fy} {} {} 0.5", fx + 0.5, fy + 0.5).unwrap();
        }
    }

    text.push_str("[indices]\n");
    let row = cells + 1;
    for y in 0..cells {
        for x in 0..cells {
            let i = y * row + x;
            writeln!(text, "{} {} {}", i, i + 1, i + row).unwrap();
            writeln!(text, "{} {} {}", i + 1, i + row + 1, i + row).unwrap();
        }
    }
    text
}

fn bench_parse(c: &mut Criterion) {
    let loader = GeometryLoader::new();
    let small = grid_source(8);
    let large = grid_source(128);

    c.bench_function("parse_grid_8", |b| {
        b.iter(|| loader.parse_str(black_box(&small)).unwrap())
    });
    c.bench_function("parse_grid_128", |b| {
        b.iter(|| loader.parse_str(black_box(&large)).unwrap())
    });
}

criterion_group!(benches, bench_parse);
criterion_main!(benches);
