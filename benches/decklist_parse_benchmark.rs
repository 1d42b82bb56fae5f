//! Benchmark for decklist export parsing

use age_core::decklist::{parse_card_line, parse_decklist_export};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::fs;
use std::path::PathBuf;

fn load_sample_exports() -> Vec<(String, String)> {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_decklists");

    let Ok(entries) = fs::read_dir(&dir) else {
        eprintln!("Warning: test_decklists not found, using synthetic sample");
        return vec![(
            "synthetic.txt".to_string(),
            "Name: Synthetic\nHero: Bravo\nFormat: Blitz\nArena Cards\n1x Anothos\nDeck Cards\n3x Pummel (red)\n"
                .to_string(),
        )];
    };

    let mut exports = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("txt") {
            if let Ok(contents) = fs::read_to_string(&path) {
                let filename = path.file_name().unwrap().to_string_lossy().to_string();
                exports.push((filename, contents));
            }
        }
    }
    exports
}

/// A large export: every card line repeated to classic-constructed size and beyond
fn synthetic_large_export(lines: usize) -> String {
    let mut export = String::from("Name: Large\nHero: Dorinthea Ironsong\nFormat: Classic Constructed\n\nDeck Cards\n");
    let colors = ["red", "yellow", "blue"];
    for i in 0..lines {
        export.push_str(&format!("{}x Card Number {} ({})\n", i % 3 + 1, i, colors[i % 3]));
    }
    export.push_str("\nSee the full deck at: https://fabrary.net/decks/large\nMade with Fabrary\n");
    export
}

fn bench_parse_single(c: &mut Criterion) {
    let exports = load_sample_exports();
    let mut group = c.benchmark_group("parse_single_export");

    for (filename, contents) in &exports {
        group.throughput(Throughput::Bytes(contents.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(filename), contents, |b, contents| {
            b.iter(|| black_box(parse_decklist_export(black_box(contents))));
        });
    }

    group.finish();
}

fn bench_parse_large(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_large_export");

    for lines in [80, 800, 8000] {
        let export = synthetic_large_export(lines);
        group.throughput(Throughput::Bytes(export.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(lines), &export, |b, export| {
            b.iter(|| black_box(parse_decklist_export(black_box(export))));
        });
    }

    group.finish();
}

fn bench_card_lines(c: &mut Criterion) {
    let lines = [
        "3x Command and Conquer (blue)",
        "1x Fyendal's Spring Tunic (legendary)",
        "Bravo, Showstopper",
    ];

    c.benchmark_group("parse_components").bench_function("card_lines", |b| {
        b.iter(|| {
            for line in &lines {
                black_box(parse_card_line(black_box(line)));
            }
        });
    });
}

criterion_group!(benches, bench_parse_single, bench_parse_large, bench_card_lines);
criterion_main!(benches);
