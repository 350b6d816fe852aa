#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure bootstrap system that lays out the crew for a fresh run.

use std::collections::BTreeSet;

use bridge_crew_core::{CellCoord, Role, SimulationConfig};
use bridge_crew_world::{query, Roster, TerrainGrid, World};
use tracing::warn;

/// Produces the data required to start a run.
#[derive(Debug, Default)]
pub struct Bootstrap;

impl Bootstrap {
    /// Derives the banner that should be shown when the run starts.
    #[must_use]
    pub fn welcome_banner<'world>(&self, world: &'world World) -> &'world str {
        query::welcome_banner(world)
    }

    /// Builds the roster for a fresh run on `grid`.
    ///
    /// Gatherers come first, then builders, then managers, so identifiers
    /// follow that order.
    #[must_use]
    pub fn roster(&self, grid: &TerrainGrid, config: &SimulationConfig) -> Roster {
        Roster::from_placements(self.placements(grid, config))
    }

    /// Spawn cells for every agent, each snapped to the nearest free
    /// walkable cell of its preferred position.
    ///
    /// Agents that find no free walkable cell are left out.
    #[must_use]
    pub fn placements(&self, grid: &TerrainGrid, config: &SimulationConfig) -> Vec<(Role, CellCoord)> {
        let mut taken = BTreeSet::new();
        let mut placements = Vec::new();

        let wanted = (0..config.gatherers)
            .map(|index| (Role::Gatherer, CellCoord::new(2, 2 + 2 * index)))
            .chain((0..config.builders).map(|index| (Role::Builder, CellCoord::new(3, 2 + 2 * index))))
            .chain(
                (0..config.managers)
                    .map(|index| (Role::Manager, CellCoord::new(4, grid.rows() / 2 + 2 * index))),
            );

        for (role, preferred) in wanted {
            match nearest_free_walkable(grid, clamp(grid, preferred), &taken) {
                Some(cell) => {
                    let _ = taken.insert(cell);
                    placements.push((role, cell));
                }
                None => warn!(?role, %preferred, "no free walkable cell to spawn on"),
            }
        }

        placements
    }
}

fn clamp(grid: &TerrainGrid, cell: CellCoord) -> CellCoord {
    CellCoord::new(
        cell.column().min(grid.columns().saturating_sub(1)),
        cell.row().min(grid.rows().saturating_sub(1)),
    )
}

/// Searches Manhattan rings of growing radius around `origin`, each ring in
/// row-major order.
fn nearest_free_walkable(
    grid: &TerrainGrid,
    origin: CellCoord,
    taken: &BTreeSet<CellCoord>,
) -> Option<CellCoord> {
    let reach = grid.columns().saturating_add(grid.rows());
    (0..=reach).find_map(|radius| {
        ring(origin, radius)
            .into_iter()
            .find(|cell| grid.is_walkable(*cell) && !taken.contains(cell))
    })
}

fn ring(origin: CellCoord, radius: u32) -> Vec<CellCoord> {
    let (column, row) = (i64::from(origin.column()), i64::from(origin.row()));
    let radius = i64::from(radius);
    let mut cells = Vec::new();

    for dy in -radius..=radius {
        let dx = radius - dy.abs();
        let columns = if dx == 0 {
            vec![column]
        } else {
            vec![column - dx, column + dx]
        };
        for x in columns {
            let y = row + dy;
            if let (Ok(x), Ok(y)) = (u32::try_from(x), u32::try_from(y)) {
                cells.push(CellCoord::new(x, y));
            }
        }
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(gatherers: u32, builders: u32, managers: u32) -> SimulationConfig {
        SimulationConfig {
            gatherers,
            builders,
            managers,
            ..SimulationConfig::default()
        }
    }

    #[test]
    fn default_layout_follows_spawn_columns() {
        let grid = TerrainGrid::filled(12, 12, bridge_crew_core::CellKind::Land);
        let placements = Bootstrap.placements(&grid, &config(2, 1, 2));
        assert_eq!(
            placements,
            vec![
                (Role::Gatherer, CellCoord::new(2, 2)),
                (Role::Gatherer, CellCoord::new(2, 4)),
                (Role::Builder, CellCoord::new(3, 2)),
                (Role::Manager, CellCoord::new(4, 6)),
                (Role::Manager, CellCoord::new(4, 8)),
            ]
        );
    }

    #[test]
    fn blocked_or_taken_cells_snap_to_the_nearest_free_one() {
        let grid = TerrainGrid::from_glyphs(&["......", "......", "..#...", "......"])
            .expect("grid");
        let placements = Bootstrap.placements(&grid, &config(1, 0, 0));
        assert_eq!(placements, vec![(Role::Gatherer, CellCoord::new(2, 1))]);

        let grid = TerrainGrid::from_glyphs(&["....", "....", "...."]).expect("grid");
        let placements = Bootstrap.placements(&grid, &config(2, 0, 0));
        assert_eq!(
            placements,
            vec![
                (Role::Gatherer, CellCoord::new(2, 2)),
                (Role::Gatherer, CellCoord::new(2, 1)),
            ]
        );
    }

    #[test]
    fn crowded_maps_drop_agents_without_room() {
        let grid = TerrainGrid::from_glyphs(&[".#", "##"]).expect("grid");
        let roster = Bootstrap.roster(&grid, &config(2, 1, 0));
        assert_eq!(roster.len(), 1);
    }
}
