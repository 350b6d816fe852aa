//! River extent captured from the terrain before any bridge is built.

use std::collections::VecDeque;

use bridge_crew_core::{CellCoord, CellKind, Direction};

use crate::grid::TerrainGrid;

/// Column span of the river a crossing must cover.
///
/// The river is the largest 4-connected body of water present when the
/// environment is created. Isolated ponds elsewhere on the map do not widen
/// the span, and later construction never shrinks it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RiverSpan {
    first_column: u32,
    last_column: u32,
}

impl RiverSpan {
    /// Creates a span covering `first_column..=last_column`.
    #[must_use]
    pub const fn new(first_column: u32, last_column: u32) -> Self {
        Self {
            first_column,
            last_column,
        }
    }

    /// Westernmost river column.
    #[must_use]
    pub const fn first_column(&self) -> u32 {
        self.first_column
    }

    /// Easternmost river column.
    #[must_use]
    pub const fn last_column(&self) -> u32 {
        self.last_column
    }

    /// Iterates the cells of `row` that lie within the span.
    pub fn cells_on_row(&self, row: u32) -> impl Iterator<Item = CellCoord> {
        (self.first_column..=self.last_column).map(move |column| CellCoord::new(column, row))
    }

    /// Locates the largest connected body of water on the grid.
    ///
    /// Ties between equally sized bodies resolve to the one whose first cell
    /// appears earliest in row-major order.
    #[must_use]
    pub fn locate(grid: &TerrainGrid) -> Option<Self> {
        let width = usize::try_from(grid.columns()).ok()?;
        let height = usize::try_from(grid.rows()).ok()?;
        let mut visited = vec![false; width.checked_mul(height)?];
        let mut queue = VecDeque::new();
        let mut best: Option<(usize, RiverSpan)> = None;

        for (seed, kind) in grid.iter() {
            if kind != CellKind::Water {
                continue;
            }
            let Some(seed_index) = index(width, seed) else {
                continue;
            };
            if visited[seed_index] {
                continue;
            }

            visited[seed_index] = true;
            queue.push_back(seed);
            let mut size = 0;
            let mut span = RiverSpan::new(seed.column(), seed.column());

            while let Some(cell) = queue.pop_front() {
                size += 1;
                span.first_column = span.first_column.min(cell.column());
                span.last_column = span.last_column.max(cell.column());

                for direction in Direction::ALL {
                    let Some(neighbor) = cell.step(direction) else {
                        continue;
                    };
                    if !grid.is(neighbor, CellKind::Water) {
                        continue;
                    }
                    let Some(neighbor_index) = index(width, neighbor) else {
                        continue;
                    };
                    if visited[neighbor_index] {
                        continue;
                    }
                    visited[neighbor_index] = true;
                    queue.push_back(neighbor);
                }
            }

            if best.map_or(true, |(best_size, _)| size > best_size) {
                best = Some((size, span));
            }
        }

        best.map(|(_, span)| span)
    }
}

fn index(width: usize, cell: CellCoord) -> Option<usize> {
    let column = usize::try_from(cell.column()).ok()?;
    let row = usize::try_from(cell.row()).ok()?;
    row.checked_mul(width)?.checked_add(column)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locate_covers_the_full_river_width() {
        let grid = TerrainGrid::from_glyphs(&["..~~~..", "..~~~..", "...~~.."]).expect("grid");
        assert_eq!(RiverSpan::locate(&grid), Some(RiverSpan::new(2, 4)));
    }

    #[test]
    fn isolated_ponds_do_not_widen_the_span() {
        let grid = TerrainGrid::from_glyphs(&["~...~~..", "....~~..", "....~~..", "~...~~.."])
            .expect("grid");
        assert_eq!(RiverSpan::locate(&grid), Some(RiverSpan::new(4, 5)));
    }

    #[test]
    fn dry_maps_have_no_river() {
        let grid = TerrainGrid::from_glyphs(&["...", "..."]).expect("grid");
        assert_eq!(RiverSpan::locate(&grid), None);
    }
}
