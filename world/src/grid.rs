//! Dense terrain storage backing the environment.

use bridge_crew_core::{CellCoord, CellKind, EnvironmentError};

/// Rectangular matrix of terrain kinds stored in row-major order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TerrainGrid {
    columns: u32,
    rows: u32,
    cells: Vec<CellKind>,
}

impl TerrainGrid {
    /// Creates a grid where every cell holds `kind`.
    #[must_use]
    pub fn filled(columns: u32, rows: u32, kind: CellKind) -> Self {
        let capacity_u64 = u64::from(columns) * u64::from(rows);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        Self {
            columns,
            rows,
            cells: vec![kind; capacity],
        }
    }

    /// Builds a grid from explicit rows, rejecting rows of differing width.
    pub fn from_rows(rows: Vec<Vec<CellKind>>) -> Result<Self, EnvironmentError> {
        let expected = rows.first().map_or(0, Vec::len);
        let mut cells = Vec::with_capacity(expected * rows.len());
        for (index, row) in rows.iter().enumerate() {
            if row.len() != expected {
                return Err(EnvironmentError::RaggedRow {
                    row: saturating_u32(index),
                    expected: saturating_u32(expected),
                    found: saturating_u32(row.len()),
                });
            }
            cells.extend_from_slice(row);
        }

        Ok(Self {
            columns: saturating_u32(expected),
            rows: saturating_u32(rows.len()),
            cells,
        })
    }

    /// Builds a grid from one string per row using the glyphs of [`glyph`].
    ///
    /// Unrecognised glyphs become land.
    pub fn from_glyphs(lines: &[&str]) -> Result<Self, EnvironmentError> {
        let rows = lines
            .iter()
            .map(|line| {
                line.chars()
                    .map(|symbol| kind_for_glyph(symbol).unwrap_or(CellKind::Land))
                    .collect()
            })
            .collect();
        Self::from_rows(rows)
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Reports whether the coordinate lies inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Terrain stored at the cell, or `None` when out of bounds.
    #[must_use]
    pub fn get(&self, cell: CellCoord) -> Option<CellKind> {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied())
    }

    /// Reports whether the cell is inside the grid and passable.
    #[must_use]
    pub fn is_walkable(&self, cell: CellCoord) -> bool {
        self.get(cell).is_some_and(CellKind::is_walkable)
    }

    /// Reports whether the cell holds the provided terrain kind.
    #[must_use]
    pub fn is(&self, cell: CellCoord, kind: CellKind) -> bool {
        self.get(cell) == Some(kind)
    }

    /// Iterates every coordinate and its terrain in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, CellKind)> + '_ {
        let columns = self.columns.max(1);
        self.cells.iter().enumerate().map(move |(index, kind)| {
            let index = saturating_u32(index);
            (CellCoord::new(index % columns, index / columns), *kind)
        })
    }

    /// Number of cells holding the provided terrain kind.
    #[must_use]
    pub fn count(&self, kind: CellKind) -> usize {
        self.cells.iter().filter(|cell| **cell == kind).count()
    }

    /// First cell in row-major order holding the provided terrain kind.
    #[must_use]
    pub fn find(&self, kind: CellKind) -> Option<CellCoord> {
        self.iter()
            .find(|(_, candidate)| *candidate == kind)
            .map(|(cell, _)| cell)
    }

    pub(crate) fn set(&mut self, cell: CellCoord, kind: CellKind) {
        if let Some(index) = self.index(cell) {
            if let Some(slot) = self.cells.get_mut(index) {
                *slot = kind;
            }
        }
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if self.contains(cell) {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

/// Single-character representation of a terrain kind.
#[must_use]
pub const fn glyph(kind: CellKind) -> char {
    match kind {
        CellKind::Land => '.',
        CellKind::Water => '~',
        CellKind::Wall => '#',
        CellKind::Resource => 'T',
        CellKind::Bridge => '=',
        CellKind::Depot => 'D',
        CellKind::Goal => 'G',
    }
}

/// Terrain kind represented by a glyph produced by [`glyph`].
#[must_use]
pub const fn kind_for_glyph(symbol: char) -> Option<CellKind> {
    match symbol {
        '.' => Some(CellKind::Land),
        '~' => Some(CellKind::Water),
        '#' => Some(CellKind::Wall),
        'T' => Some(CellKind::Resource),
        '=' => Some(CellKind::Bridge),
        'D' => Some(CellKind::Depot),
        'G' => Some(CellKind::Goal),
        _ => None,
    }
}

fn saturating_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
