//! Vision-limited and global queries agents use to pick targets.
//!
//! Every scan walks candidates in row-major order and keeps the first best
//! match, so ties always resolve the same way for the same world state.

use bridge_crew_core::{AgentId, CellCoord, CellKind, Direction, VisionRadius};

use crate::{grid::TerrainGrid, World};

/// Candidate set a perception query is restricted to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scope {
    /// Cells within a Manhattan diamond around an observer.
    Visible {
        /// Observer position.
        origin: CellCoord,
        /// Diamond radius.
        radius: VisionRadius,
    },
    /// Every cell of the grid, ignoring vision.
    Global,
}

impl Scope {
    /// Scope covering what an observer at `origin` can see.
    #[must_use]
    pub const fn visible(origin: CellCoord, radius: VisionRadius) -> Self {
        Self::Visible { origin, radius }
    }

    /// Reports whether the scope includes `cell`, ignoring grid bounds.
    #[must_use]
    pub fn includes(&self, cell: CellCoord) -> bool {
        match self {
            Self::Visible { origin, radius } => radius.covers(*origin, cell),
            Self::Global => true,
        }
    }
}

/// In-bounds cells of the scope in row-major order.
pub fn cells_in(grid: &TerrainGrid, scope: Scope) -> impl Iterator<Item = CellCoord> {
    let (rows, columns) = match scope {
        Scope::Global => (0..grid.rows(), 0..grid.columns()),
        Scope::Visible { origin, radius } => {
            let reach = radius.get();
            (
                window(origin.row(), reach, grid.rows()),
                window(origin.column(), reach, grid.columns()),
            )
        }
    };

    rows.flat_map(move |row| {
        columns
            .clone()
            .map(move |column| CellCoord::new(column, row))
    })
    .filter(move |cell| scope.includes(*cell))
}

/// Reports whether `cell` is inside the grid and within the world's vision of `origin`.
#[must_use]
pub fn is_visible(world: &World, origin: CellCoord, cell: CellCoord) -> bool {
    world.environment().grid().contains(cell) && world.vision().covers(origin, cell)
}

/// Nearest cell of `kind` to `origin` among the scope's candidates.
///
/// When `exclude_occupied_for` names an agent, cells where any other agent
/// stands are skipped.
#[must_use]
pub fn nearest_matching(
    world: &World,
    kind: CellKind,
    origin: CellCoord,
    scope: Scope,
    exclude_occupied_for: Option<AgentId>,
) -> Option<CellCoord> {
    let grid = world.environment().grid();
    let mut best: Option<(u32, CellCoord)> = None;

    for cell in cells_in(grid, scope) {
        if !grid.is(cell, kind) {
            continue;
        }
        if let Some(me) = exclude_occupied_for {
            if world.is_blocked_by_agent(cell, me) {
                continue;
            }
        }
        let distance = origin.manhattan_distance(cell);
        if best.map_or(true, |(best_distance, _)| distance < best_distance) {
            best = Some((distance, cell));
        }
    }

    best.map(|(_, cell)| cell)
}

/// Bridge cell with the greatest column among the scope's candidates.
#[must_use]
pub fn rightmost_bridge_in(world: &World, scope: Scope) -> Option<CellCoord> {
    let grid = world.environment().grid();
    let mut rightmost: Option<CellCoord> = None;

    for cell in cells_in(grid, scope) {
        if !grid.is(cell, CellKind::Bridge) {
            continue;
        }
        if rightmost.map_or(true, |current| cell.column() > current.column()) {
            rightmost = Some(cell);
        }
    }

    rightmost
}

/// Water cell adjacent to `bridge` that extends it, preferring east, then
/// north, south and finally west.
#[must_use]
pub fn bridge_continuation(
    world: &World,
    bridge: CellCoord,
    exclude_occupied_for: Option<AgentId>,
) -> Option<CellCoord> {
    const PRIORITY: [Direction; 4] = [
        Direction::East,
        Direction::North,
        Direction::South,
        Direction::West,
    ];

    let grid = world.environment().grid();
    PRIORITY
        .into_iter()
        .filter_map(|direction| bridge.step(direction))
        .filter(|cell| grid.is(*cell, CellKind::Water))
        .find(|cell| match exclude_occupied_for {
            Some(me) => !world.is_blocked_by_agent(*cell, me),
            None => true,
        })
}

fn window(center: u32, reach: u32, limit: u32) -> std::ops::Range<u32> {
    let start = center.saturating_sub(reach);
    let end = center.saturating_add(reach).saturating_add(1).min(limit);
    start..end.max(start)
}
