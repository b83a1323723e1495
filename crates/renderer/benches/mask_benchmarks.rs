//! Benchmarks for the renderer crate - masking, heatmap and PNG encoding.
//!
//! Run with: cargo bench --package renderer -- apply_mask
//! Or: cargo bench --package renderer --bench mask_benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use mask_common::{CoordinateTransform, GeoBounds, GeoPoint, MaskShape, RadiusUnits};
use renderer::heatmap::{render_heatmap, HeatPoint, HeatmapOptions};
use renderer::mask::{apply_mask, apply_mask_generic};
use renderer::png::encode_overlay;
use renderer::RasterBuffer;
use test_utils::fixtures::{self, shapes};
use test_utils::gradient_raster;

fn reference_bounds() -> GeoBounds {
    let (a, b, c, d) = fixtures::bounds::UNIT_100;
    GeoBounds::new(a, b, c, d).expect("reference bounds are valid")
}

fn ring(points: &[(f64, f64)]) -> Vec<GeoPoint> {
    points.iter().copied().map(GeoPoint::from).collect()
}

/// The four reference masks, labelled by kind.
fn reference_shapes() -> Vec<(&'static str, MaskShape)> {
    let (rmin, rmax) = shapes::RECTANGLE;
    let (center, radius) = shapes::CIRCLE;
    vec![
        ("rectangle", MaskShape::rectangle(rmin.into(), rmax.into()).unwrap()),
        (
            "circle",
            MaskShape::circle(center.into(), radius, RadiusUnits::MapUnits).unwrap(),
        ),
        ("polygon", MaskShape::polygon(ring(&shapes::POLYGON)).unwrap()),
        (
            "multipolygon",
            MaskShape::multi_polygon(shapes::MULTI_POLYGON.iter().map(|sq| ring(sq)).collect())
                .unwrap(),
        ),
    ]
}

// =============================================================================
// APPLY MASK BENCHMARKS
// =============================================================================

fn bench_apply_mask(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply_mask");
    let bounds = reference_bounds();

    for size in [256usize, 512, 1024] {
        let raster = RasterBuffer::new(size, size, gradient_raster(size, size, 255)).unwrap();
        group.throughput(Throughput::Elements((size * size) as u64));

        for (name, shape) in reference_shapes() {
            group.bench_with_input(
                BenchmarkId::new(name, format!("{}x{}", size, size)),
                &raster,
                |b, raster| b.iter(|| apply_mask(black_box(raster.clone()), &bounds, &shape)),
            );
        }
    }

    group.finish();
}

// =============================================================================
// RECTANGLE FAST PATH VS GENERIC
// =============================================================================

fn bench_rectangle_paths(c: &mut Criterion) {
    let mut group = c.benchmark_group("rectangle_paths");
    let bounds = reference_bounds();
    let (rmin, rmax) = shapes::RECTANGLE;
    let shape = MaskShape::rectangle(rmin.into(), rmax.into()).unwrap();
    let raster = RasterBuffer::new(512, 512, gradient_raster(512, 512, 255)).unwrap();

    group.throughput(Throughput::Elements(512 * 512));
    group.bench_function("fast", |b| {
        b.iter(|| apply_mask(black_box(raster.clone()), &bounds, &shape))
    });
    group.bench_function("generic", |b| {
        b.iter(|| apply_mask_generic(black_box(raster.clone()), &bounds, &shape))
    });

    group.finish();
}

// =============================================================================
// HEATMAP + PNG PIPELINE
// =============================================================================

fn bench_heatmap_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("heatmap_pipeline");
    let bounds = reference_bounds();
    let transform = CoordinateTransform::new(bounds, 512, 512);
    let points: Vec<HeatPoint> = fixtures::heatmap::POINTS
        .iter()
        .map(|&(x, y, v)| HeatPoint::new(x, y, v))
        .collect();
    let options = HeatmapOptions::default();
    let (center, radius) = shapes::CIRCLE;
    let circle = MaskShape::circle(center.into(), radius, RadiusUnits::MapUnits).unwrap();

    group.throughput(Throughput::Elements(512 * 512));

    group.bench_function("render_heatmap", |b| {
        b.iter(|| render_heatmap(black_box(&points), &transform, &options).unwrap())
    });

    let heat = render_heatmap(&points, &transform, &options).unwrap();
    group.bench_function("encode_overlay", |b| {
        b.iter(|| encode_overlay(black_box(&heat)).unwrap())
    });

    group.bench_function("full_capture_mask_encode", |b| {
        b.iter(|| {
            let raster = render_heatmap(&points, &transform, &options).unwrap();
            let masked = apply_mask(raster, &bounds, &circle);
            encode_overlay(black_box(&masked)).unwrap()
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_apply_mask,
    bench_rectangle_paths,
    bench_heatmap_pipeline,
);
criterion_main!(benches);
