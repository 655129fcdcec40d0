use serde::Deserialize;
use shapelet_rs::{Dataset, FloatTransform, SelectionConfig, Shapelet};
use std::fs;

#[derive(Deserialize)]
struct GoldenSeries {
    label: u8,
    values: Vec<f64>,
}

#[derive(Deserialize)]
struct GoldenShapelet {
    series: usize,
    start: usize,
    length: usize,
    quality: f64,
}

#[derive(Deserialize)]
struct GoldenData {
    series: Vec<GoldenSeries>,
    min_length: usize,
    max_length: usize,
    k: usize,
    distinct_best_k: bool,
    expected: Vec<GoldenShapelet>,
}

const MAX_RELATIVE: f64 = 1e-9;

fn load_golden(filename: &str) -> GoldenData {
    let path = format!("tests/golden_data/{filename}");
    let data = fs::read_to_string(&path).unwrap_or_else(|_| {
        panic!(
            "Golden data file not found: {path}. Run: python scripts/generate_golden_data.py"
        )
    });
    serde_json::from_str(&data).unwrap()
}

fn dataset(golden: &GoldenData) -> Dataset<f64> {
    let rows: Vec<(u8, &[f64])> = golden
        .series
        .iter()
        .map(|s| (s.label, s.values.as_slice()))
        .collect();
    Dataset::from_f64(&rows).unwrap()
}

fn config(golden: &GoldenData) -> SelectionConfig {
    SelectionConfig::new(golden.min_length, golden.max_length, golden.k)
        .with_distinct_best_k(golden.distinct_best_k)
}

fn assert_selection_match(name: &str, actual: &[Shapelet<f64>], expected: &[GoldenShapelet]) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "{name}: selected {} shapelets, expected {}",
        actual.len(),
        expected.len()
    );

    for (rank, (a, e)) in actual.iter().zip(expected).enumerate() {
        assert_eq!(
            (a.series, a.start, a.length),
            (e.series, e.start, e.length),
            "{name}: rank {rank} mismatch"
        );
        let rel = (a.quality - e.quality).abs() / e.quality.abs();
        assert!(
            rel < MAX_RELATIVE,
            "{name}: rank {rank} quality {} vs expected {} (rel diff {rel:.2e})",
            a.quality,
            e.quality
        );
    }
    eprintln!("  {name}: {} shapelets match", actual.len());
}

fn run_golden_test(filename: &str) {
    let golden = load_golden(filename);
    eprintln!(
        "Testing {filename}: series={}, lengths={}..={}, k={}",
        golden.series.len(),
        golden.min_length,
        golden.max_length,
        golden.k
    );

    let ds = dataset(&golden);
    let engine = FloatTransform::new(config(&golden));
    let selection = engine.select(&ds).unwrap();
    assert_selection_match("sequential", &selection.shapelets, &golden.expected);

    #[cfg(feature = "parallel")]
    for workers in [2, 3] {
        let selection = engine.select_parallel(&ds, workers).unwrap();
        assert_selection_match(
            &format!("parallel({workers})"),
            &selection.shapelets,
            &golden.expected,
        );
    }
}

#[test]
fn test_golden_bump_motif() {
    run_golden_test("bump_motif.json");
}

#[test]
fn test_golden_ramp_motif_distinct() {
    run_golden_test("ramp_motif.json");
}

#[test]
fn test_golden_transform_features() {
    let golden = load_golden("bump_motif.json");
    let ds = dataset(&golden);
    let engine = FloatTransform::new(config(&golden));
    let selection = engine.select(&ds).unwrap();
    let features = engine.transform(&ds, &selection, &ds).unwrap();

    assert_eq!(features.len(), ds.len());
    for (col, s) in selection.shapelets.iter().enumerate() {
        // A shapelet matches its own source window exactly
        assert_eq!(features[s.series][col], 0.0);
        assert!(features.iter().all(|row| row[col] >= 0.0));
    }
}
