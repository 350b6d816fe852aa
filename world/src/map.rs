//! Map layouts: the generated default map and preparation of loaded maps.

use bridge_crew_core::{CellCoord, CellKind, SimulationConfig};
use rand::{seq::SliceRandom, Rng};

use crate::{environment::Environment, grid::TerrainGrid};

/// Finished terrain handed over by a map-loading collaborator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MapLayout {
    /// Terrain as described by the map source.
    pub grid: TerrainGrid,
    /// Depot position, when the source marked one.
    pub depot: Option<CellCoord>,
    /// Goal position, when the source marked one.
    pub goal: Option<CellCoord>,
}

/// Where the terrain of a run comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MapSource {
    /// Procedurally generated river map sized by the configuration.
    Generated,
    /// Externally loaded terrain; resources are scattered on top of it.
    Loaded(MapLayout),
}

impl MapSource {
    /// Builds a fresh environment for a new run.
    pub fn build<R>(&self, config: &SimulationConfig, rng: &mut R) -> Environment
    where
        R: Rng + ?Sized,
    {
        let layout = match self {
            Self::Generated => generate_default(config, rng),
            Self::Loaded(layout) => prepare_loaded(layout.clone(), config, rng),
        };
        Environment::new(
            layout.grid,
            layout.depot,
            layout.goal,
            config.wood_per_section,
        )
    }
}

/// Default depot position for a grid of the given size.
#[must_use]
pub fn default_depot(columns: u32, rows: u32) -> CellCoord {
    clamp_into(CellCoord::new(5, rows / 2), columns, rows)
}

/// Default goal position for a grid of the given size.
#[must_use]
pub fn default_goal(columns: u32, rows: u32) -> CellCoord {
    clamp_into(
        CellCoord::new(columns.saturating_sub(3), rows / 2),
        columns,
        rows,
    )
}

/// Generates the default map: a vertical river, wood west of it, the depot
/// on the west bank and the goal on the east bank.
pub fn generate_default<R>(config: &SimulationConfig, rng: &mut R) -> MapLayout
where
    R: Rng + ?Sized,
{
    let (columns, rows) = (config.columns, config.rows);
    let mut grid = TerrainGrid::filled(columns, rows, CellKind::Land);
    let river_start = config.river_start();
    let river_end = river_start.saturating_add(config.river_width).min(columns);

    for row in 0..rows {
        for column in river_start..river_end {
            grid.set(CellCoord::new(column, row), CellKind::Water);
        }
    }

    let depot = default_depot(columns, rows);
    let goal = default_goal(columns, rows);

    if let Some(last_column) = river_start.checked_sub(2) {
        if rows > 0 {
            for _ in 0..config.default_resource_count {
                let cell = CellCoord::new(rng.gen_range(0..=last_column), rng.gen_range(0..rows));
                if cell != depot {
                    grid.set(cell, CellKind::Resource);
                }
            }
        }
    }

    grid.set(depot, CellKind::Depot);
    grid.set(goal, CellKind::Goal);

    MapLayout {
        grid,
        depot: grid_contains(columns, rows, depot),
        goal: grid_contains(columns, rows, goal),
    }
}

/// Fills in a missing depot or goal and scatters resources over the land.
pub fn prepare_loaded<R>(mut layout: MapLayout, config: &SimulationConfig, rng: &mut R) -> MapLayout
where
    R: Rng + ?Sized,
{
    let (columns, rows) = (layout.grid.columns(), layout.grid.rows());

    if layout.depot.is_none() {
        let depot = default_depot(columns, rows);
        if layout.grid.contains(depot) {
            layout.grid.set(depot, CellKind::Depot);
            layout.depot = Some(depot);
        }
    }

    if layout.goal.is_none() {
        let goal = default_goal(columns, rows);
        if layout.grid.contains(goal) {
            layout.grid.set(goal, CellKind::Goal);
            layout.goal = Some(goal);
        }
    }

    let _ = scatter_resources(&mut layout.grid, config.resource_density, rng);
    layout
}

/// Turns a random `density` share of the land cells into resources.
///
/// Returns the number of resources placed.
pub fn scatter_resources<R>(grid: &mut TerrainGrid, density: f64, rng: &mut R) -> usize
where
    R: Rng + ?Sized,
{
    let mut land: Vec<CellCoord> = grid
        .iter()
        .filter(|(_, kind)| *kind == CellKind::Land)
        .map(|(cell, _)| cell)
        .collect();
    if land.is_empty() || density <= 0.0 {
        return 0;
    }

    let wanted = (land.len() as f64 * density.min(1.0)).floor() as usize;
    land.shuffle(rng);
    for cell in land.iter().take(wanted) {
        grid.set(*cell, CellKind::Resource);
    }
    wanted
}

fn clamp_into(cell: CellCoord, columns: u32, rows: u32) -> CellCoord {
    CellCoord::new(
        cell.column().min(columns.saturating_sub(1)),
        cell.row().min(rows.saturating_sub(1)),
    )
}

fn grid_contains(columns: u32, rows: u32, cell: CellCoord) -> Option<CellCoord> {
    (cell.column() < columns && cell.row() < rows).then_some(cell)
}
