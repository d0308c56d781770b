//! Benchmarks pour l'encodage GeoPackage et les exports texte

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use dzialka::{Coordinate, Geometry, Parcel, Ring};
use dzialka_export::export::{self, wkb, ExportOptions, GpkgEngine};

/// Anneau régulier de `n` sommets autour de (lng, lat), fermé
fn ring(n: usize, lng: f64, lat: f64) -> Ring {
    let mut ring: Ring = (0..n)
        .map(|i| {
            let angle = i as f64 / n as f64 * std::f64::consts::TAU;
            Coordinate::new(lat + 0.001 * angle.sin(), lng + 0.001 * angle.cos())
        })
        .collect();
    ring.push(ring[0]);
    ring
}

fn parcels(count: usize) -> Vec<Parcel> {
    (0..count)
        .map(|i| {
            let geometry = Geometry::Polygon {
                rings: vec![ring(12, 19.0 + i as f64 * 0.01, 50.0)],
            };
            Parcel {
                id: format!("146501_8.0101.{}", i),
                source_text: String::new(),
                vertices: dzialka::extract_vertices(&geometry),
                geometry,
            }
        })
        .collect()
}

fn bench_encode_polygon(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_polygon");

    for size in [16, 256, 4096] {
        let rings = vec![ring(size, 19.0, 50.0)];
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &rings, |b, rings| {
            b.iter(|| wkb::encode_polygon(black_box(rings), wkb::WGS84_SRS_ID).unwrap())
        });
    }

    group.finish();
}

fn bench_exports(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let engine = GpkgEngine::new();
    let parcels = parcels(200);
    let options = ExportOptions::both();

    let mut group = c.benchmark_group("export_200_parcels");
    group.sample_size(20);

    group.bench_function("gpkg", |b| {
        b.to_async(&rt)
            .iter(|| async { engine.export_layers(black_box(&parcels), options).await.unwrap() })
    });
    group.bench_function("kml", |b| {
        b.iter(|| export::kml::export_layers(black_box(&parcels), options).unwrap())
    });
    group.bench_function("geojson", |b| {
        b.iter(|| export::geojson::export_layers(black_box(&parcels), options).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_encode_polygon, bench_exports);
criterion_main!(benches);
