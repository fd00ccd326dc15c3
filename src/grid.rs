use std::fmt;
use std::fmt::Display;
use std::mem;

const GRID_PADDING: usize = 4;
/// Width used by `GridSet`'s `Display` impl.
pub const TEXT_BOX_WIDTH: usize = 90;

/// A square of numbers, stored as a list of rows.
///
/// Grids made by the generator are always square. Grids made with `Grid::from_rows` are not
/// checked; the line extractor rejects empty or ragged ones.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Grid(pub Vec<Vec<i32>>);

impl Grid {
    pub fn from_rows(rows: Vec<Vec<i32>>) -> Grid {
        Grid(rows)
    }

    /// Cut `values` into consecutive rows of length `size`. If `values.len()` isn't `size * size`
    /// the result isn't square, and the line extractor will reject it.
    pub fn from_values(size: usize, values: Vec<i32>) -> Grid {
        if size == 0 {
            return Grid::default();
        }
        Grid(values.chunks(size).map(|row| row.to_vec()).collect())
    }

    /// Number of rows.
    pub fn size(&self) -> usize {
        self.0.len()
    }

    pub fn rows(&self) -> &[Vec<i32>] {
        &self.0
    }

    /// All values in row-major order.
    pub fn values(&self) -> impl Iterator<Item = i32> + '_ {
        self.0.iter().flat_map(|row| row.iter().copied())
    }
}

impl Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let width = self
            .values()
            .map(|v| v.to_string().len())
            .max()
            .unwrap_or(1);
        for row in &self.0 {
            for (i, value) in row.iter().enumerate() {
                if i > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{:>width$}", value, width = width)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// A bunch of grids. This type exists solely for displaying them: they're printed side by side
/// when they fit.
pub struct GridSet(pub Vec<Grid>);

impl GridSet {
    /// Lay the grids out left to right, starting a new band below whenever the next grid would
    /// run past `max_width` columns. Bands are separated by a blank line.
    pub fn render(&self, max_width: usize) -> String {
        let mut bands: Vec<Vec<String>> = Vec::new();
        let mut band: Vec<String> = Vec::new();
        let mut band_width = 0;
        for grid in &self.0 {
            let text = grid.to_string();
            let width = text.lines().map(|line| line.chars().count()).max().unwrap_or(0);
            let width = width + GRID_PADDING;
            if band_width > 0 && band_width + width > max_width {
                bands.push(mem::take(&mut band));
                band_width = 0;
            }

            let col = band_width + GRID_PADDING;
            for (row, line) in text.lines().enumerate() {
                if row == band.len() {
                    band.push(String::new());
                }
                let out = &mut band[row];
                let len = out.chars().count();
                out.push_str(&" ".repeat(col.saturating_sub(len)));
                out.push_str(line);
            }
            band_width += width;
        }
        bands.push(band);

        bands
            .iter()
            .filter(|band| !band.is_empty())
            .map(|band| band.iter().map(|line| format!("{}\n", line)).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Display for GridSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.render(TEXT_BOX_WIDTH))
    }
}
