use crate::grid::Grid;
use crate::Error;

/// One row, column, or diagonal of a grid.
pub type Line = Vec<i32>;
/// Every line of one grid.
pub type LineSet = Vec<Line>;

/// Breaks a grid into the lines that must share a sum.
pub trait LineExtractor {
    const NAME: &'static str;

    fn split(&self, grid: &Grid) -> Result<LineSet, Error>;
}

/// The standard extractor. For an NxN grid it produces 2N + 2 lines, always in this order:
///
/// - the N rows, top to bottom
/// - the N columns, left to right
/// - the primary diagonal (row == col)
/// - the anti-diagonal (row == N - 1 - col), from the top right down
#[derive(Debug, Clone, Copy, Default)]
pub struct Splitter;

impl LineExtractor for Splitter {
    const NAME: &'static str = "Splitter";

    fn split(&self, grid: &Grid) -> Result<LineSet, Error> {
        let rows = grid.rows();
        let n = rows.len();
        if n == 0 {
            return Err(Error::InvalidInput("grid is empty".to_owned()));
        }
        if let Some((r, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != n) {
            return Err(Error::InvalidInput(format!(
                "grid is not square: row {} has {} entries, expected {}",
                r,
                row.len(),
                n
            )));
        }

        let mut lines = Vec::with_capacity(2 * n + 2);
        for row in rows {
            lines.push(row.clone());
        }
        for c in 0..n {
            lines.push(rows.iter().map(|row| row[c]).collect());
        }
        lines.push((0..n).map(|i| rows[i][i]).collect());
        lines.push((0..n).map(|r| rows[r][n - 1 - r]).collect());
        Ok(lines)
    }
}
