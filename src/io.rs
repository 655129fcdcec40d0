//! Text formats around a selection run.
//!
//! - The shapelet archive: for each selected shapelet one descriptive line
//!   followed by one comma-separated line of its raw samples. Downstream
//!   feature-extraction tooling reads this layout, so it is kept exactly.
//! - UCR-style datasets: one series per line, class label first, values
//!   separated by commas or whitespace.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use tracing::debug;

use crate::core::numeric::Numeric;
use crate::core::shapelet::Shapelet;
use crate::core::timeseries::{Dataset, Timeseries};
use crate::error::{Result, ShapeletError};

/// File name used by [`save_archive`] when given a directory.
pub const ARCHIVE_FILE_NAME: &str = "shapelet_archive.csv";

/// A shapelet read back from an archive, owning its samples.
#[derive(Debug, Clone, PartialEq)]
pub struct ArchivedShapelet {
    /// Rank in the archive.
    pub rank: usize,
    pub series: usize,
    pub length: usize,
    pub start: usize,
    pub quality: f64,
    pub values: Vec<f64>,
}

impl ArchivedShapelet {
    /// Samples converted into a numeric backend, e.g. for
    /// [`transform_values`](crate::algorithms::transform::transform_values).
    pub fn values_as<N: Numeric>(&self) -> Vec<N> {
        self.values.iter().map(|&v| N::from_f64(v)).collect()
    }
}

/// Render a number like C's `%g`: six significant digits, trailing zeros
/// removed, exponent form below `1e-4` and from `1e6` on.
pub fn format_g(value: f64) -> String {
    const PRECISION: i32 = 6;

    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    // Exponent after rounding to the target precision
    let sci = format!("{:.*e}", (PRECISION - 1) as usize, value);
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };

    if exp < -4 || exp >= PRECISION {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{sign}{:02}", trim_zeros(mantissa), exp.abs())
    } else {
        let decimals = (PRECISION - 1 - exp) as usize;
        trim_zeros(&format!("{value:.decimals$}")).to_string()
    }
}

fn trim_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

/// Write the shapelet archive for `shapelets` drawn from `dataset`.
///
/// Shapelets that do not fit the dataset are skipped with a debug log.
pub fn write_archive<N, W>(writer: &mut W, shapelets: &[Shapelet<N>], dataset: &Dataset<N>) -> Result<()>
where
    N: Numeric,
    W: Write,
{
    for (i, s) in shapelets.iter().enumerate() {
        let Some(values) = s.values(dataset) else {
            debug!(rank = i, series = s.series, "shapelet outside dataset, not archived");
            continue;
        };
        writeln!(
            writer,
            "Shapelet {i} is from TS {},\thas length: {},\tstarting position: {},\tquality: {}",
            s.series,
            s.length,
            s.start,
            format_g(s.quality.to_f64())
        )?;
        let row: Vec<String> = values.iter().map(|v| format_g(v.to_f64())).collect();
        writeln!(writer, "{}", row.join(","))?;
    }
    Ok(())
}

/// Write the archive to `path`, or to [`ARCHIVE_FILE_NAME`] inside `path` if
/// it is a directory.
pub fn save_archive<N: Numeric>(
    path: impl AsRef<Path>,
    shapelets: &[Shapelet<N>],
    dataset: &Dataset<N>,
) -> Result<()> {
    let path = path.as_ref();
    let path = if path.is_dir() {
        path.join(ARCHIVE_FILE_NAME)
    } else {
        path.to_path_buf()
    };
    let mut writer = BufWriter::new(File::create(&path)?);
    write_archive(&mut writer, shapelets, dataset)?;
    writer.flush()?;
    debug!(path = %path.display(), count = shapelets.len(), "archive written");
    Ok(())
}

/// Extract the text after `key` up to the next comma or end of line.
fn field<'a>(line: &'a str, key: &str, line_no: usize) -> Result<&'a str> {
    let rest = line
        .split_once(key)
        .map(|(_, rest)| rest)
        .ok_or_else(|| ShapeletError::parse(line_no, format!("missing `{}`", key.trim())))?;
    Ok(rest.split(',').next().unwrap_or(rest).trim())
}

fn parse_num<T: std::str::FromStr>(text: &str, what: &str, line_no: usize) -> Result<T> {
    text.parse()
        .map_err(|_| ShapeletError::parse(line_no, format!("invalid {what} `{text}`")))
}

/// Parse one descriptive archive line.
fn parse_header(line: &str, line_no: usize) -> Result<ArchivedShapelet> {
    let rank = field(line, "Shapelet ", line_no)?
        .split_whitespace()
        .next()
        .unwrap_or("");
    Ok(ArchivedShapelet {
        rank: parse_num(rank, "rank", line_no)?,
        series: parse_num(field(line, "from TS ", line_no)?, "series", line_no)?,
        length: parse_num(field(line, "has length: ", line_no)?, "length", line_no)?,
        start: parse_num(field(line, "starting position: ", line_no)?, "start", line_no)?,
        quality: parse_num(field(line, "quality: ", line_no)?, "quality", line_no)?,
        values: Vec::new(),
    })
}

/// Read an archive written by [`write_archive`].
pub fn read_archive<R: BufRead>(reader: R) -> Result<Vec<ArchivedShapelet>> {
    let mut shapelets = Vec::new();
    let mut pending: Option<ArchivedShapelet> = None;
    let mut last_line = 0;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;
        last_line = line_no;
        if line.trim().is_empty() {
            continue;
        }
        match pending.take() {
            None => pending = Some(parse_header(&line, line_no)?),
            Some(mut shapelet) => {
                shapelet.values = line
                    .split(',')
                    .map(|v| parse_num(v.trim(), "value", line_no))
                    .collect::<Result<_>>()?;
                if shapelet.values.len() != shapelet.length {
                    return Err(ShapeletError::parse(
                        line_no,
                        format!(
                            "expected {} values, found {}",
                            shapelet.length,
                            shapelet.values.len()
                        ),
                    ));
                }
                shapelets.push(shapelet);
            }
        }
    }

    if pending.is_some() {
        return Err(ShapeletError::parse(last_line, "archive ends without values line"));
    }
    Ok(shapelets)
}

/// Read a UCR-style dataset: one series per non-empty line, label first.
///
/// Labels must be 0 or 1. Values may be separated by commas, whitespace or
/// both; series may differ in length.
pub fn read_dataset<N: Numeric, R: BufRead>(reader: R) -> Result<Dataset<N>> {
    let mut series = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;
        let mut tokens = line
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty());

        let Some(label) = tokens.next() else {
            continue;
        };
        let label = match parse_num::<f64>(label, "label", line_no)? {
            l if l == 0.0 => 0,
            l if l == 1.0 => 1,
            _ => {
                return Err(ShapeletError::parse(
                    line_no,
                    format!("label `{label}` is not 0 or 1"),
                ))
            }
        };
        let values = tokens
            .map(|t| parse_num::<f64>(t, "value", line_no).map(N::from_f64))
            .collect::<Result<Vec<N>>>()?;
        let ts = Timeseries::new(label, values)
            .map_err(|_| ShapeletError::parse(line_no, "series has no values"))?;
        series.push(ts);
    }

    debug!(series = series.len(), "dataset loaded");
    Ok(Dataset::new(series))
}

/// Read a UCR-style dataset from a file.
pub fn load_dataset<N: Numeric>(path: impl AsRef<Path>) -> Result<Dataset<N>> {
    read_dataset(BufReader::new(File::open(path)?))
}
