//! Point-file and tour-file I/O. A thin collaborator, not part of the
//! optimization core: the core only ever sees `x[]`/`y[]` arrays and a
//! 0-indexed cycle.

use std::fmt;
use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::primitives::PointId;

#[derive(Debug, Error)]
pub enum FileIoError {
    #[error("could not read {path}: {source}")]
    Io { path: String, #[source] source: std::io::Error },
    #[error("{path}:{line}: {message}")]
    Parse { path: String, line: usize, message: String },
    #[error("{path}: missing DIMENSION header")]
    MissingDimension { path: String },
    #[error("{path}: missing TOUR_SECTION marker")]
    MissingTourSection { path: String },
}

impl FileIoError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io { path: path.display().to_string(), source }
    }
}

/// Reads a header-less `x,y` CSV, one point per line, points indexed by
/// line position. The point-file format is not specified by the core;
/// this is the collaborator's choice.
pub fn read_points(path: impl AsRef<Path>) -> Result<(Vec<f64>, Vec<f64>), FileIoError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|e| FileIoError::io(path, e))?;

    let mut x = Vec::new();
    let mut y = Vec::new();
    for (line_no, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let mut parts = line.split(|c: char| c == ',' || c.is_whitespace()).filter(|s| !s.is_empty());
        let parse_error = |message: &str| FileIoError::Parse {
            path: path.display().to_string(),
            line: line_no + 1,
            message: message.to_string(),
        };
        let xs = parts.next().ok_or_else(|| parse_error("expected an x coordinate"))?;
        let ys = parts.next().ok_or_else(|| parse_error("expected a y coordinate"))?;
        let xv: f64 = xs.parse().map_err(|_| parse_error("x coordinate is not a number"))?;
        let yv: f64 = ys.parse().map_err(|_| parse_error("y coordinate is not a number"))?;
        x.push(xv);
        y.push(yv);
    }
    Ok((x, y))
}

/// Reads a TSPLIB-like tour file: a header containing `DIMENSION: N`, an
/// opening `TOUR_SECTION` marker, then exactly `N` lines each holding a
/// 1-indexed point id. Returns the 0-indexed cycle.
pub fn read_tour(path: impl AsRef<Path>) -> Result<Vec<PointId>, FileIoError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|e| FileIoError::io(path, e))?;
    let path_str = path.display().to_string();

    let mut lines = contents.lines().enumerate();
    let mut dimension: Option<usize> = None;
    let mut found_tour_section = false;

    for (line_no, line) in lines.by_ref() {
        let trimmed = line.trim();
        if let Some(rest) = trimmed.strip_prefix("DIMENSION") {
            let value = rest.trim_start_matches(':').trim();
            dimension = Some(value.parse().map_err(|_| FileIoError::Parse {
                path: path_str.clone(),
                line: line_no + 1,
                message: "DIMENSION value is not an integer".to_string(),
            })?);
        }
        if trimmed == "TOUR_SECTION" {
            found_tour_section = true;
            break;
        }
    }

    if !found_tour_section {
        return Err(FileIoError::MissingTourSection { path: path_str });
    }
    let dimension = dimension.ok_or_else(|| FileIoError::MissingDimension { path: path_str.clone() })?;

    let mut order = Vec::with_capacity(dimension);
    for (line_no, line) in lines {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed == "EOF" {
            continue;
        }
        if order.len() == dimension {
            break;
        }
        let one_indexed: i64 = trimmed.parse().map_err(|_| FileIoError::Parse {
            path: path_str.clone(),
            line: line_no + 1,
            message: "expected a point id".to_string(),
        })?;
        let zero_indexed = one_indexed - 1;
        if zero_indexed < 0 {
            return Err(FileIoError::Parse {
                path: path_str.clone(),
                line: line_no + 1,
                message: "point id must be at least 1".to_string(),
            });
        }
        order.push(zero_indexed as PointId);
    }

    if order.len() != dimension {
        return Err(FileIoError::Parse {
            path: path_str,
            line: 0,
            message: format!("expected {dimension} tour entries, found {}", order.len()),
        });
    }

    Ok(order)
}

/// Writes `order` (0-indexed) as a TSPLIB-like tour file, adding one to
/// every id on the way out.
pub fn write_tour(path: impl AsRef<Path>, order: &[PointId]) -> Result<(), FileIoError> {
    let path = path.as_ref();
    let mut out = String::new();
    writeln_header(&mut out, order.len());
    for &p in order {
        out.push_str(&(p + 1).to_string());
        out.push('\n');
    }
    out.push_str("EOF\n");
    fs::write(path, out).map_err(|e| FileIoError::io(path, e))
}

fn writeln_header(out: &mut String, dimension: usize) {
    use fmt::Write;
    let _ = writeln!(out, "DIMENSION: {dimension}");
    let _ = writeln!(out, "TOUR_SECTION");
}

/// The identity permutation `0, 1, ..., n - 1`, used when the CLI is
/// invoked without a tour file.
pub fn identity_order(n: usize) -> Vec<PointId> {
    (0..n as PointId).collect()
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn write_temp(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn reads_simple_csv_points() {
        let file = write_temp("0,0\n10,0\n10,10\n0,10\n");
        let (x, y) = read_points(file.path()).unwrap();
        assert_eq!(x, vec![0.0, 10.0, 10.0, 0.0]);
        assert_eq!(y, vec![0.0, 0.0, 10.0, 10.0]);
    }

    #[test]
    fn reads_tour_file_and_zero_indexes() {
        let file = write_temp("NAME: test\nDIMENSION: 3\nTOUR_SECTION\n1\n2\n3\nEOF\n");
        let order = read_tour(file.path()).unwrap();
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn missing_tour_section_is_an_error() {
        let file = write_temp("DIMENSION: 3\n1\n2\n3\n");
        assert!(matches!(read_tour(file.path()), Err(FileIoError::MissingTourSection { .. })));
    }

    #[test]
    fn write_then_read_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roundtrip.tour");
        write_tour(&path, &[2, 0, 1]).unwrap();
        let order = read_tour(&path).unwrap();
        assert_eq!(order, vec![2, 0, 1]);
    }
}
