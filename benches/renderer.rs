use cam_renderer::document::parse_document;
use cam_renderer::render::{RenderRequest, compose, render_png};
use cam_renderer::{RenderConfig, Theme};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

const SHAPES: [&str; 6] = [
    "negative strong",
    "negative weak",
    "positive",
    "positive strong",
    "neutral",
    "ambivalent",
];

const STYLES: [&str; 6] = [
    "Solid",
    "Solid-Strong",
    "Solid-Weak",
    "Dashed",
    "Dashed-Strong",
    "Dashed-Weak",
];

/// Grid of boxes, each linked to its right and lower neighbour.
fn grid_map_source(side: usize) -> String {
    let mut out = String::from("{ nodes: [\n");
    for row in 0..side {
        for col in 0..side {
            let id = row * side + col;
            out.push_str(&format!(
                "  {{ id: {id}, x: {}, y: {}, width: 110, height: 70, shape: \"{}\", title: \"Concept {id}\" }},\n",
                20 + col * 180,
                20 + row * 140,
                SHAPES[id % SHAPES.len()],
            ));
        }
    }
    out.push_str("], edges: [\n");
    let mut edge = 0usize;
    for row in 0..side {
        for col in 0..side {
            let id = row * side + col;
            let mut link = |to: usize| {
                let arrow = if edge % 3 == 0 { "none" } else { "uni" };
                out.push_str(&format!(
                    "  {{ id: {edge}, start: {id}, end: {to}, lineStyle: \"{}\", arrowType: \"{arrow}\" }},\n",
                    STYLES[edge % STYLES.len()],
                ));
                edge += 1;
            };
            if col + 1 < side {
                link(id + 1);
            }
            if row + 1 < side {
                link(id + side);
            }
        }
    }
    out.push_str("] }\n");
    out
}

fn grid_request(side: usize, scale: f32) -> RenderRequest {
    parse_document(&grid_map_source(side))
        .expect("parse failed")
        .into_request(RenderConfig::default().with_scale(scale), Theme::default())
}

fn bench_compose(c: &mut Criterion) {
    let mut group = c.benchmark_group("compose");
    for side in [3usize, 6, 10] {
        let request = grid_request(side, 5.0);
        group.bench_with_input(BenchmarkId::from_parameter(side * side), &request, |b, request| {
            b.iter(|| {
                let commands = compose(black_box(request)).expect("compose failed");
                black_box(commands.len());
            });
        });
    }
    group.finish();
}

fn bench_render_png(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_png");
    group.sample_size(10);
    for (side, scale) in [(3usize, 5.0f32), (6, 5.0), (6, 2.0)] {
        let request = grid_request(side, scale);
        let name = format!("{}_nodes_scale_{scale}", side * side);
        group.bench_with_input(BenchmarkId::from_parameter(name), &request, |b, request| {
            b.iter(|| {
                let png = render_png(black_box(request)).expect("render failed");
                black_box(png.len());
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_compose, bench_render_png);
criterion_main!(benches);
