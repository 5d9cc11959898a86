//! Text I/O for point sets and precomputed triangulations.
//!
//! Point files carry one `x,y` pair per line; triangulation files carry one
//! `i,j,k` index triple per line. Blank lines are skipped. Parse failures
//! report the path and 1-based line number.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use nalgebra::Point2;
use tracing::info;

use crate::error::{AlignError, AlignResult};
use crate::triangulation::IndexedTriangulation;
use crate::types::PointSet;

/// Load a 2D point set from a comma-separated text file.
pub fn load_points(path: &Path) -> AlignResult<PointSet> {
    let file = File::open(path).map_err(|e| AlignError::io_read(path, e))?;
    let reader = BufReader::new(file);

    let mut set = PointSet::new();
    for (line_idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| AlignError::io_read(path, e))?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let fields = parse_fields::<f64>(path, line_idx + 1, trimmed, 2)?;
        set.push(Point2::new(fields[0], fields[1]));
    }

    info!(
        target: "cloudmatch::io",
        path = %path.display(),
        points = set.len(),
        "Loaded point set"
    );
    Ok(set)
}

/// Save a 2D point set as a comma-separated text file.
pub fn save_points(set: &PointSet, path: &Path) -> AlignResult<()> {
    let file = File::create(path).map_err(|e| AlignError::io_write(path, e))?;
    let mut writer = BufWriter::new(file);

    for p in set.iter() {
        writeln!(writer, "{},{}", p.x, p.y).map_err(|e| AlignError::io_write(path, e))?;
    }
    writer.flush().map_err(|e| AlignError::io_write(path, e))?;

    info!(
        target: "cloudmatch::io",
        path = %path.display(),
        points = set.len(),
        "Saved point set"
    );
    Ok(())
}

/// Load a precomputed triangulation as index triples.
pub fn load_triangles(path: &Path) -> AlignResult<IndexedTriangulation> {
    let file = File::open(path).map_err(|e| AlignError::io_read(path, e))?;
    let reader = BufReader::new(file);

    let mut triples = Vec::new();
    for (line_idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| AlignError::io_read(path, e))?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let fields = parse_fields::<usize>(path, line_idx + 1, trimmed, 3)?;
        triples.push([fields[0], fields[1], fields[2]]);
    }

    info!(
        target: "cloudmatch::io",
        path = %path.display(),
        triangles = triples.len(),
        "Loaded triangulation"
    );
    Ok(IndexedTriangulation::new(triples))
}

/// Parse exactly `expected` comma-separated values from one record.
fn parse_fields<T: std::str::FromStr>(
    path: &Path,
    line: usize,
    record: &str,
    expected: usize,
) -> AlignResult<Vec<T>> {
    let fields: Vec<&str> = record.split(',').map(str::trim).collect();
    if fields.len() != expected {
        return Err(AlignError::parse_error(
            path,
            line,
            format!("expected {} fields, found {}", expected, fields.len()),
        ));
    }

    fields
        .iter()
        .map(|f| {
            f.parse::<T>().map_err(|_| {
                AlignError::parse_error(path, line, format!("invalid value {f:?}"))
            })
        })
        .collect()
}
