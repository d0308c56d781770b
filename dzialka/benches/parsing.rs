//! Benchmarks pour le décodage WKT

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use dzialka::{decode, extract_vertices, Identity};

/// Polygone régulier de `n` sommets autour de (19°E, 50°N), fermé
fn polygon_wkt(n: usize) -> String {
    let mut pairs: Vec<String> = (0..n)
        .map(|i| {
            let angle = i as f64 / n as f64 * std::f64::consts::TAU;
            format!("{} {}", 19.0 + 0.01 * angle.cos(), 50.0 + 0.01 * angle.sin())
        })
        .collect();
    pairs.push(pairs[0].clone());
    format!("SRID=4326;POLYGON(({}))", pairs.join(","))
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");

    for size in [16, 256, 4096] {
        let wkt = polygon_wkt(size);
        group.throughput(Throughput::Bytes(wkt.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &wkt, |b, wkt| {
            b.iter(|| {
                let geometry = decode(black_box(wkt), &Identity).unwrap();
                black_box(extract_vertices(&geometry))
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_decode);
criterion_main!(benches);
