//! Plain-text matrices: every value followed by one space, one row per line.

use crate::matrix::Matrix;
use crate::search::Match;
use crate::util::{ScaleMatchError, ScaleMatchResult};
use std::fmt::Display;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

fn write_row<W: Write, T: Display>(out: &mut W, row: &[T]) -> ScaleMatchResult<()> {
    for value in row {
        write!(out, "{value} ")?;
    }
    writeln!(out)?;
    Ok(())
}

/// Writes `matrix` row by row.
pub fn write_matrix<W: Write, T: Copy + Display>(out: &mut W, matrix: &Matrix<T>) -> ScaleMatchResult<()> {
    for r in 0..matrix.rows() {
        write_row(out, matrix.row(r).unwrap_or_default())?;
    }
    Ok(())
}

/// Writes `matrix` to a new file at `path`.
pub fn write_matrix_file<P: AsRef<Path>, T: Copy + Display>(path: P, matrix: &Matrix<T>) -> ScaleMatchResult<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write_matrix(&mut out, matrix)?;
    out.flush()?;
    Ok(())
}

/// Writes one `row col distance scale1 scale2` line per match.
pub fn write_matches<W: Write>(out: &mut W, matches: &[Match]) -> ScaleMatchResult<()> {
    for m in matches {
        write_row(out, &m.to_record())?;
    }
    Ok(())
}

/// Writes the match list to a new file at `path`.
pub fn write_matches_file<P: AsRef<Path>>(path: P, matches: &[Match]) -> ScaleMatchResult<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write_matches(&mut out, matches)?;
    out.flush()?;
    Ok(())
}

/// Reads a whitespace-separated matrix. Blank lines are skipped and every
/// remaining line must hold the same number of values.
pub fn read_matrix<R: BufRead, T>(input: R) -> ScaleMatchResult<Matrix<T>>
where
    T: Copy + FromStr,
    T::Err: Display,
{
    let mut data = Vec::new();
    let mut rows = 0usize;
    let mut cols: Option<usize> = None;
    for (idx, line) in input.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let before = data.len();
        for token in line.split_whitespace() {
            let value = token.parse::<T>().map_err(|err| ScaleMatchError::Parse {
                line: idx + 1,
                reason: format!("invalid value {token:?}: {err}"),
            })?;
            data.push(value);
        }
        let width = data.len() - before;
        match cols {
            None => cols = Some(width),
            Some(expected) if expected != width => {
                return Err(ScaleMatchError::Parse {
                    line: idx + 1,
                    reason: format!("expected {expected} values, found {width}"),
                });
            }
            Some(_) => {}
        }
        rows += 1;
    }
    Matrix::from_vec(data, rows, cols.unwrap_or(0))
}

/// Reads a matrix from the file at `path`.
pub fn read_matrix_file<P: AsRef<Path>, T>(path: P) -> ScaleMatchResult<Matrix<T>>
where
    T: Copy + FromStr,
    T::Err: Display,
{
    read_matrix(BufReader::new(File::open(path)?))
}
