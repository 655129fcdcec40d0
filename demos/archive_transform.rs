//! Select shapelets on a training set, archive them, and transform a test
//! set with the archived shapelets.
//!
//! Usage: cargo run --release --example archive_transform -- TRAIN TEST [OUT_DIR]
//!
//! TRAIN and TEST are UCR-style files (label first, then values; labels 0/1).
//! Without arguments a small synthetic train/test pair is generated.

use std::env;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use shapelet_rs::io::{load_dataset, ARCHIVE_FILE_NAME};
use shapelet_rs::{
    read_archive, save_archive, transform_values, Dataset, FloatTransform, SelectionConfig,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn synthetic(n_series: usize, seed: usize) -> shapelet_rs::Result<Dataset<f64>> {
    let rows: Vec<(u8, Vec<f64>)> = (0..n_series)
        .map(|s| {
            let label = (s % 2) as u8;
            let k = s + seed;
            let values = (0..48)
                .map(|i| {
                    let t = i as f64;
                    let base = 2.0 + (t * 0.4 + k as f64).sin() * 0.6;
                    let bump_at = 10 + (k * 5) % 24;
                    if label == 1 && (bump_at..bump_at + 5).contains(&i) {
                        base + 2.5 - (t - bump_at as f64 - 2.0).abs()
                    } else {
                        base
                    }
                })
                .collect();
            (label, values)
        })
        .collect();
    Dataset::from_f64(&rows)
}

fn main() -> shapelet_rs::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let (train, test) = match args.as_slice() {
        [train, test, ..] => (load_dataset::<f64>(train)?, load_dataset::<f64>(test)?),
        _ => (synthetic(10, 0)?, synthetic(6, 101)?),
    };
    let out_dir = args.get(2).map(PathBuf::from).unwrap_or_else(env::temp_dir);

    let min_len = train.min_series_len().unwrap_or(0);
    let config = SelectionConfig::new(4, 12.min(min_len), 4);
    let selection = FloatTransform::new(config).select(&train)?;

    save_archive(&out_dir, &selection.shapelets, &train)?;
    let archive_path = out_dir.join(ARCHIVE_FILE_NAME);
    println!("Archived {} shapelets to {}", selection.shapelets.len(), archive_path.display());

    let archived = read_archive(BufReader::new(File::open(&archive_path)?))?;
    let pivots: Vec<Vec<f64>> = archived.iter().map(|a| a.values_as()).collect();
    let features = transform_values(&test, &pivots)?;

    println!("\nTest set features (one column per shapelet):");
    for (ts, row) in test.iter().zip(&features) {
        let cols: Vec<String> = row.iter().map(|d| format!("{d:8.5}")).collect();
        println!("  label {}  {}", ts.label(), cols.join(" "));
    }
    Ok(())
}
