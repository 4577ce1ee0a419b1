use codemap::config::MinimapConfig;
use codemap::document::Document;
use codemap::highlight::SyntaxHighlighter;
use codemap::render::render;
use codemap::scroll::ScrollState;
use codemap::viewport::scroll_command_for_y;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::time::Duration;

fn python_source(lines: usize) -> String {
    (0..lines)
        .map(|n| match n % 5 {
            0 => format!("class Model{n}(Base):"),
            1 => "    \"\"\"Model docstring.\"\"\"".to_string(),
            2 => format!("    def value(self, x={n}):"),
            3 => "        return self.data[x] * 2.5  # scaled".to_string(),
            _ => String::new(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// ハイライトのベンチマーク
fn bench_highlight(c: &mut Criterion) {
    let mut group = c.benchmark_group("highlight");
    group.measurement_time(Duration::from_secs(10));

    let highlighter = SyntaxHighlighter::python().expect("builtin rules compile");
    let source = python_source(10_000);
    group.bench_function("python_10k_lines", |b| {
        b.iter(|| Document::highlighted(black_box(&source), &highlighter))
    });

    group.finish();
}

/// 描画フレーム生成のベンチマーク
fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");

    let highlighter = SyntaxHighlighter::python().expect("builtin rules compile");
    let config = MinimapConfig::default();
    let geometry = config.geometry(120, 1_200);

    for lines in [100usize, 10_000, 100_000] {
        let document = Document::highlighted(&python_source(lines), &highlighter);
        let total = document.line_count() as u64;
        let scroll = ScrollState::new(total / 2, 60.min(total), total);
        group.bench_function(format!("{}_lines", lines), |b| {
            b.iter(|| render(black_box(&document), &scroll, &geometry, &config.palette))
        });
    }

    group.finish();
}

/// ポインタ変換のベンチマーク
fn bench_pointer_mapping(c: &mut Criterion) {
    let geometry = MinimapConfig::default().geometry(120, 1_200);
    let scroll = ScrollState::new(0, 60, 100_000);
    c.bench_function("scroll_command_for_y", |b| {
        b.iter(|| {
            for y in 0..1_200 {
                black_box(scroll_command_for_y(y as f64, 100_000, &scroll, &geometry, true));
            }
        })
    });
}

criterion_group!(benches, bench_highlight, bench_render, bench_pointer_mapping);
criterion_main!(benches);
