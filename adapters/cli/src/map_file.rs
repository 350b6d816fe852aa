//! Text map files: one row per line, one numeric code per cell.
//!
//! Codes are `0` land, `1` water, `2` depot, `3` wall and `4` goal. Cells
//! may be separated by whitespace, by commas, or written one character per
//! cell. Blank lines and lines starting with `#` are skipped.

use std::{
    fmt, fs, io,
    path::{Path, PathBuf},
};

use bridge_crew_core::{CellCoord, CellKind, EnvironmentError};
use bridge_crew_world::{MapLayout, TerrainGrid};
use thiserror::Error;
use tracing::warn;

/// Failures that prevent a map file from producing any terrain.
#[derive(Debug, Error)]
pub(crate) enum MapFileError {
    /// The file could not be read.
    #[error("failed to read map file {path}")]
    Io {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying failure.
        #[source]
        source: io::Error,
    },
    /// The file holds no rows once comments and blank lines are removed.
    #[error("map file contains no rows")]
    Empty,
    /// The rows could not be assembled into a grid.
    #[error(transparent)]
    Grid(#[from] EnvironmentError),
}

/// Recoverable oddities found while parsing; the map is still usable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum MapWarning {
    /// A cell code outside `0..=4`; the cell became land.
    UnknownCode {
        /// Zero-based row among the map rows.
        row: u32,
        /// Zero-based column.
        column: u32,
        /// Code as written in the file.
        code: String,
    },
    /// A row narrower than the first one, padded with land.
    ShortRow {
        /// Zero-based row among the map rows.
        row: u32,
        /// Number of cells the row held.
        found: u32,
        /// Width set by the first row.
        expected: u32,
    },
    /// A row wider than the first one, truncated.
    LongRow {
        /// Zero-based row among the map rows.
        row: u32,
        /// Number of cells the row held.
        found: u32,
        /// Width set by the first row.
        expected: u32,
    },
    /// An earlier marker of the same kind, demoted to land.
    DuplicateMarker {
        /// Marker kind that appeared more than once.
        kind: CellKind,
        /// Position of the demoted marker.
        cell: CellCoord,
    },
}

impl fmt::Display for MapWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownCode { row, column, code } => {
                write!(f, "unknown code '{code}' at row {row}, column {column}; using land")
            }
            Self::ShortRow {
                row,
                found,
                expected,
            } => write!(
                f,
                "row {row} has {found} cells, expected {expected}; padded with land"
            ),
            Self::LongRow {
                row,
                found,
                expected,
            } => write!(
                f,
                "row {row} has {found} cells, expected {expected}; truncated"
            ),
            Self::DuplicateMarker { kind, cell } => {
                write!(f, "extra {kind:?} marker at {cell} replaced by land")
            }
        }
    }
}

/// Terrain recovered from a map file along with everything that had to be
/// patched up on the way.
#[derive(Clone, Debug)]
pub(crate) struct ParsedMap {
    pub(crate) layout: MapLayout,
    pub(crate) warnings: Vec<MapWarning>,
}

/// Reads and parses the map stored at `path`, logging each warning.
pub(crate) fn load(path: &Path) -> Result<MapLayout, MapFileError> {
    let text = fs::read_to_string(path).map_err(|source| MapFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed = parse(&text)?;
    for warning in &parsed.warnings {
        warn!(path = %path.display(), %warning, "map file");
    }
    Ok(parsed.layout)
}

/// Parses map text.
///
/// The first row fixes the width. When a marker appears more than once the
/// last one wins.
pub(crate) fn parse(text: &str) -> Result<ParsedMap, MapFileError> {
    let lines: Vec<Vec<&str>> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(split_cells)
        .collect();
    let width = lines.first().map(Vec::len).ok_or(MapFileError::Empty)?;

    let mut warnings = Vec::new();
    let mut rows: Vec<Vec<CellKind>> = Vec::with_capacity(lines.len());

    for (row_index, codes) in lines.iter().enumerate() {
        let row = to_u32(row_index);
        if codes.len() < width {
            warnings.push(MapWarning::ShortRow {
                row,
                found: to_u32(codes.len()),
                expected: to_u32(width),
            });
        } else if codes.len() > width {
            warnings.push(MapWarning::LongRow {
                row,
                found: to_u32(codes.len()),
                expected: to_u32(width),
            });
        }

        let mut kinds = vec![CellKind::Land; width];
        for ((column_index, code), slot) in codes.iter().enumerate().zip(kinds.iter_mut()) {
            *slot = kind_for_code(code).unwrap_or_else(|| {
                warnings.push(MapWarning::UnknownCode {
                    row,
                    column: to_u32(column_index),
                    code: (*code).to_owned(),
                });
                CellKind::Land
            });
        }
        rows.push(kinds);
    }

    let depot = settle_marker(&mut rows, CellKind::Depot, &mut warnings);
    let goal = settle_marker(&mut rows, CellKind::Goal, &mut warnings);
    let grid = TerrainGrid::from_rows(rows)?;
    Ok(ParsedMap {
        layout: MapLayout { grid, depot, goal },
        warnings,
    })
}

/// Keeps the last `kind` marker in row-major order and turns every earlier
/// one into land.
fn settle_marker(
    rows: &mut [Vec<CellKind>],
    kind: CellKind,
    warnings: &mut Vec<MapWarning>,
) -> Option<CellCoord> {
    let mut kept: Option<CellCoord> = None;
    for (row, kinds) in rows.iter().enumerate() {
        for (column, slot) in kinds.iter().enumerate() {
            if *slot != kind {
                continue;
            }
            let cell = CellCoord::new(to_u32(column), to_u32(row));
            if let Some(previous) = kept.replace(cell) {
                warnings.push(MapWarning::DuplicateMarker {
                    kind,
                    cell: previous,
                });
            }
        }
    }
    if let Some(kept) = kept {
        for (row, kinds) in rows.iter_mut().enumerate() {
            for (column, slot) in kinds.iter_mut().enumerate() {
                let cell = CellCoord::new(to_u32(column), to_u32(row));
                if *slot == kind && cell != kept {
                    *slot = CellKind::Land;
                }
            }
        }
    }
    kept
}

fn split_cells(line: &str) -> Vec<&str> {
    if line.contains(char::is_whitespace) {
        line.split_whitespace().collect()
    } else if line.contains(',') {
        line.split(',').map(str::trim).collect()
    } else {
        line.char_indices()
            .map(|(start, symbol)| &line[start..start + symbol.len_utf8()])
            .collect()
    }
}

fn kind_for_code(code: &str) -> Option<CellKind> {
    match code {
        "0" => Some(CellKind::Land),
        "1" => Some(CellKind::Water),
        "2" => Some(CellKind::Depot),
        "3" => Some(CellKind::Wall),
        "4" => Some(CellKind::Goal),
        _ => None,
    }
}

fn to_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
