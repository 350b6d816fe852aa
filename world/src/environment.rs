//! Terrain plus the shared counters every agent reads and mutates.

use std::collections::{BTreeMap, BTreeSet};

use bridge_crew_core::{CellCoord, CellKind, EnvironmentError, SectionOutcome};
use tracing::{debug, info};

use crate::{grid::TerrainGrid, river::RiverSpan};

/// Authoritative terrain, depot stock and bridge construction state.
#[derive(Clone, Debug)]
pub struct Environment {
    grid: TerrainGrid,
    depot: Option<CellCoord>,
    goal: Option<CellCoord>,
    resource_stock: u32,
    bridge_progress: BTreeMap<CellCoord, u32>,
    bridge_cells: BTreeSet<CellCoord>,
    spent_wood: u32,
    goal_reached: bool,
    wood_per_section: u32,
    river: Option<RiverSpan>,
}

impl Environment {
    /// Creates an environment around a finished terrain grid.
    ///
    /// The river span is captured here, before any construction, and stays
    /// fixed for the rest of the run.
    #[must_use]
    pub fn new(
        grid: TerrainGrid,
        depot: Option<CellCoord>,
        goal: Option<CellCoord>,
        wood_per_section: u32,
    ) -> Self {
        let river = RiverSpan::locate(&grid);
        Self {
            grid,
            depot,
            goal,
            resource_stock: 0,
            bridge_progress: BTreeMap::new(),
            bridge_cells: BTreeSet::new(),
            spent_wood: 0,
            goal_reached: false,
            wood_per_section: wood_per_section.max(1),
            river,
        }
    }

    /// Terrain grid in its current state.
    #[must_use]
    pub fn grid(&self) -> &TerrainGrid {
        &self.grid
    }

    /// Location of the wood depot, if the map has one.
    #[must_use]
    pub fn depot(&self) -> Option<CellCoord> {
        self.depot
    }

    /// Location of the goal, if the map has one.
    #[must_use]
    pub fn goal(&self) -> Option<CellCoord> {
        self.goal
    }

    /// Wood currently stocked at the depot.
    #[must_use]
    pub fn resource_stock(&self) -> u32 {
        self.resource_stock
    }

    /// Whether any agent has stepped onto the goal.
    #[must_use]
    pub fn goal_reached(&self) -> bool {
        self.goal_reached
    }

    /// Contributions required to turn one water cell into a bridge.
    #[must_use]
    pub fn wood_per_section(&self) -> u32 {
        self.wood_per_section
    }

    /// River extent captured at creation; `None` on maps without water.
    #[must_use]
    pub fn river_span(&self) -> Option<RiverSpan> {
        self.river
    }

    /// Reports whether the cell is in bounds and neither water nor wall.
    #[must_use]
    pub fn is_walkable(&self, cell: CellCoord) -> bool {
        self.grid.is_walkable(cell)
    }

    /// Turns a resource cell back into land.
    ///
    /// Carrying the harvested wood is the caller's responsibility.
    pub fn consume_resource(&mut self, cell: CellCoord) -> Result<(), EnvironmentError> {
        match self.grid.get(cell) {
            None => Err(EnvironmentError::OutOfBounds { cell }),
            Some(CellKind::Resource) => {
                self.grid.set(cell, CellKind::Land);
                debug!(%cell, "resource harvested");
                Ok(())
            }
            Some(_) => Err(EnvironmentError::NotAResource { cell }),
        }
    }

    /// Adds wood to the depot and returns the new stock.
    pub fn deposit(&mut self, amount: u32) -> u32 {
        self.resource_stock = self.resource_stock.saturating_add(amount);
        self.resource_stock
    }

    /// Removes wood from the depot and returns the remaining stock.
    ///
    /// Leaves the stock untouched when it cannot cover the request.
    pub fn withdraw(&mut self, amount: u32) -> Result<u32, EnvironmentError> {
        if self.resource_stock < amount {
            return Err(EnvironmentError::InsufficientStock {
                requested: amount,
                available: self.resource_stock,
            });
        }
        self.resource_stock -= amount;
        Ok(self.resource_stock)
    }

    /// Records one contribution to the bridge section at `cell`.
    ///
    /// Contributing does not use up wood; see [`Environment::spend_wood`].
    /// Only water cells accept contributions. Any other cell, including one
    /// outside the grid, reports [`SectionOutcome::AlreadySatisfied`].
    pub fn add_bridge_section(&mut self, cell: CellCoord) -> SectionOutcome {
        if !self.grid.is(cell, CellKind::Water) {
            return SectionOutcome::AlreadySatisfied;
        }

        let progress = self.bridge_progress.entry(cell).or_insert(0);
        *progress = progress.saturating_add(1);
        if *progress < self.wood_per_section {
            return SectionOutcome::Contributed;
        }

        self.grid.set(cell, CellKind::Bridge);
        let _ = self.bridge_cells.insert(cell);
        debug!(%cell, completed = self.bridge_cells.len(), "bridge section completed");
        SectionOutcome::Completed
    }

    /// Marks the goal as reached when `cell` is the goal.
    ///
    /// Returns `true` only for the arrival that first sets the flag.
    pub fn check_arrival(&mut self, cell: CellCoord) -> bool {
        if self.goal_reached || self.goal != Some(cell) {
            return false;
        }
        self.goal_reached = true;
        info!(%cell, "goal reached");
        true
    }

    /// Reports whether some row offers a dry crossing over the whole river.
    ///
    /// Maps without a river are trivially crossed.
    #[must_use]
    pub fn is_bridge_complete(&self) -> bool {
        match self.river {
            None => true,
            Some(_) => !self.complete_crossing_rows().is_empty(),
        }
    }

    /// Rows on which no river column is still water and at least one is a
    /// bridge. Walls or land inside the span do not disqualify a row.
    #[must_use]
    pub fn complete_crossing_rows(&self) -> Vec<u32> {
        let Some(span) = self.river else {
            return Vec::new();
        };

        (0..self.grid.rows())
            .filter(|row| {
                let mut bridged = false;
                for cell in span.cells_on_row(*row) {
                    match self.grid.get(cell) {
                        Some(CellKind::Bridge) => bridged = true,
                        Some(CellKind::Water) | None => return false,
                        Some(_) => {}
                    }
                }
                bridged
            })
            .collect()
    }

    /// Contributions accumulated at `cell` so far.
    #[must_use]
    pub fn bridge_progress(&self, cell: CellCoord) -> u32 {
        self.bridge_progress.get(&cell).copied().unwrap_or(0)
    }

    /// Completed bridge sections in coordinate order.
    pub fn bridge_cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.bridge_cells.iter().copied()
    }

    /// Number of completed bridge sections.
    #[must_use]
    pub fn completed_sections(&self) -> usize {
        self.bridge_cells.len()
    }

    /// Number of water cells holding contributions that are not yet bridges.
    #[must_use]
    pub fn sections_in_progress(&self) -> usize {
        self.bridge_progress
            .iter()
            .filter(|(cell, _)| !self.bridge_cells.contains(*cell))
            .count()
    }

    /// Records one unit of carried wood used up at a building site and
    /// returns the running total.
    pub fn spend_wood(&mut self) -> u32 {
        self.spent_wood = self.spent_wood.saturating_add(1);
        self.spent_wood
    }

    /// Wood used up at building sites so far.
    #[must_use]
    pub fn spent_wood(&self) -> u32 {
        self.spent_wood
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn river_environment() -> Environment {
        let grid = TerrainGrid::from_glyphs(&[".T~~.G", "D.~~..", "..~~.."]).expect("grid");
        Environment::new(
            grid,
            Some(CellCoord::new(0, 1)),
            Some(CellCoord::new(5, 0)),
            2,
        )
    }

    #[test]
    fn withdraw_refuses_to_overdraw() {
        let mut environment = river_environment();
        assert_eq!(environment.deposit(1), 1);
        assert_eq!(
            environment.withdraw(2),
            Err(EnvironmentError::InsufficientStock {
                requested: 2,
                available: 1,
            })
        );
        assert_eq!(environment.resource_stock(), 1);
        assert_eq!(environment.withdraw(1), Ok(0));
    }

    #[test]
    fn consume_resource_only_accepts_resources() {
        let mut environment = river_environment();
        let tree = CellCoord::new(1, 0);
        assert_eq!(environment.consume_resource(tree), Ok(()));
        assert!(environment.grid().is(tree, CellKind::Land));
        assert_eq!(
            environment.consume_resource(tree),
            Err(EnvironmentError::NotAResource { cell: tree })
        );
        let outside = CellCoord::new(10, 10);
        assert_eq!(
            environment.consume_resource(outside),
            Err(EnvironmentError::OutOfBounds { cell: outside })
        );
    }

    #[test]
    fn bridge_section_completes_at_threshold() {
        let mut environment = river_environment();
        let cell = CellCoord::new(2, 1);
        assert_eq!(
            environment.add_bridge_section(cell),
            SectionOutcome::Contributed
        );
        assert_eq!(environment.sections_in_progress(), 1);
        assert_eq!(environment.add_bridge_section(cell), SectionOutcome::Completed);
        assert!(environment.grid().is(cell, CellKind::Bridge));
        assert_eq!(environment.completed_sections(), 1);
        assert_eq!(environment.sections_in_progress(), 0);
        assert_eq!(
            environment.add_bridge_section(cell),
            SectionOutcome::AlreadySatisfied
        );
        assert_eq!(environment.bridge_progress(cell), 2);
    }

    #[test]
    fn land_cells_report_already_satisfied() {
        let mut environment = river_environment();
        assert_eq!(
            environment.add_bridge_section(CellCoord::new(0, 0)),
            SectionOutcome::AlreadySatisfied
        );
        assert_eq!(environment.bridge_progress(CellCoord::new(0, 0)), 0);
    }

    #[test]
    fn spent_wood_accumulates() {
        let mut environment = river_environment();
        assert_eq!(environment.spent_wood(), 0);
        assert_eq!(environment.spend_wood(), 1);
        assert_eq!(environment.spend_wood(), 2);
        assert_eq!(environment.spent_wood(), 2);
    }

    #[test]
    fn walls_inside_the_river_span_do_not_block_a_crossing() {
        let grid = TerrainGrid::from_glyphs(&["D.~~~..", "..~#~..", "..~~~.G"]).expect("grid");
        let mut environment = Environment::new(grid, None, None, 1);
        for column in [2, 4] {
            let _ = environment.add_bridge_section(CellCoord::new(column, 1));
        }

        assert_eq!(environment.complete_crossing_rows(), vec![1]);
        assert!(environment.is_bridge_complete());
    }

    #[test]
    fn bridge_completeness_requires_a_fully_spanned_row() {
        let mut environment = river_environment();
        assert!(!environment.is_bridge_complete());

        for _ in 0..2 {
            let _ = environment.add_bridge_section(CellCoord::new(2, 1));
        }
        assert!(!environment.is_bridge_complete());

        for _ in 0..2 {
            let _ = environment.add_bridge_section(CellCoord::new(3, 1));
        }
        assert!(environment.is_bridge_complete());
        assert_eq!(environment.complete_crossing_rows(), vec![1]);
    }

    #[test]
    fn dry_map_is_vacuously_crossed() {
        let grid = TerrainGrid::from_glyphs(&["D..G"]).expect("grid");
        let environment = Environment::new(grid, None, None, 2);
        assert!(environment.is_bridge_complete());
        assert!(environment.complete_crossing_rows().is_empty());
    }

    #[test]
    fn goal_arrival_is_reported_once() {
        let mut environment = river_environment();
        assert!(!environment.check_arrival(CellCoord::new(4, 0)));
        assert!(environment.check_arrival(CellCoord::new(5, 0)));
        assert!(!environment.check_arrival(CellCoord::new(5, 0)));
        assert!(environment.goal_reached());
    }
}
