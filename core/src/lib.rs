#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Bridge Crew engine.
//!
//! This crate defines the vocabulary that connects adapters, the authoritative
//! world, and the role systems. Adapters submit [`Command`] values to the
//! simulation, the simulation advances the world one tick at a time, and every
//! observable mutation is reported as an [`Event`] so adapters and tests can
//! follow the run deterministically.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Bridge Crew.";

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Computes the Chebyshev (king-move) distance between two cell coordinates.
    #[must_use]
    pub fn chebyshev_distance(self, other: CellCoord) -> u32 {
        self.column()
            .abs_diff(other.column())
            .max(self.row().abs_diff(other.row()))
    }

    /// Neighbouring cell one step in the provided direction.
    ///
    /// Returns `None` when the step would leave the non-negative quadrant.
    /// Upper bounds are the grid's concern.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<CellCoord> {
        match direction {
            Direction::North => self
                .row
                .checked_sub(1)
                .map(|row| CellCoord::new(self.column, row)),
            Direction::East => self
                .column
                .checked_add(1)
                .map(|column| CellCoord::new(column, self.row)),
            Direction::South => self
                .row
                .checked_add(1)
                .map(|row| CellCoord::new(self.column, row)),
            Direction::West => self
                .column
                .checked_sub(1)
                .map(|column| CellCoord::new(column, self.row)),
        }
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

/// Cardinal movement directions available to agents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// All four unit directions in their canonical order.
    pub const ALL: [Direction; 4] = [
        Direction::East,
        Direction::West,
        Direction::South,
        Direction::North,
    ];
}

/// Kind of terrain stored in a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    /// Open ground.
    Land,
    /// River water; impassable until bridged.
    Water,
    /// Impassable obstacle.
    Wall,
    /// Harvestable wood.
    Resource,
    /// Completed bridge section spanning former water.
    Bridge,
    /// Shared wood stockpile.
    Depot,
    /// Destination the crew is trying to reach.
    Goal,
}

impl CellKind {
    /// Reports whether agents may stand on a cell of this kind.
    #[must_use]
    pub const fn is_walkable(self) -> bool {
        !matches!(self, Self::Water | Self::Wall)
    }
}

/// Behaviour assigned to an agent for the lifetime of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Harvests resources and hauls them to the depot.
    Gatherer,
    /// Withdraws wood from the depot and builds bridge sections.
    Builder,
    /// Walks toward the goal and steers nearby crew members with hints.
    Manager,
}

/// Item an agent may carry between cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cargo {
    /// A single unit of wood.
    Wood,
}

/// Stable identifier assigned to an agent; doubles as its roster index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(u32);

impl AgentId {
    /// Creates a new agent identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Manhattan cutoff that bounds what an agent can perceive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VisionRadius(u32);

impl VisionRadius {
    /// Smallest radius the runtime knob accepts.
    pub const MIN: u32 = 1;
    /// Largest radius the runtime knob accepts.
    pub const MAX: u32 = 20;

    /// Creates a radius clamped into `MIN..=MAX`.
    #[must_use]
    pub fn new(value: u32) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    /// Retrieves the radius measured in cells.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Radius one cell wider, saturating at `MAX`.
    #[must_use]
    pub fn widened(self) -> Self {
        Self::new(self.0.saturating_add(1))
    }

    /// Radius one cell narrower, saturating at `MIN`.
    #[must_use]
    pub fn narrowed(self) -> Self {
        Self::new(self.0.saturating_sub(1))
    }

    /// Reports whether `cell` lies within the diamond centred on `origin`.
    #[must_use]
    pub fn covers(self, origin: CellCoord, cell: CellCoord) -> bool {
        origin.manhattan_distance(cell) <= self.0
    }
}

/// Result of contributing one unit of wood to a bridge section.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SectionOutcome {
    /// The contribution reached the threshold and the cell is now a bridge.
    Completed,
    /// The contribution was recorded but the section still needs wood.
    Contributed,
    /// The cell was no longer water; nothing was recorded.
    AlreadySatisfied,
}

impl SectionOutcome {
    /// Reports whether the caller's job at this site is done.
    ///
    /// A builder gives up its carried wood on these outcomes; after a mere
    /// contribution it keeps the wood and works the same site again.
    #[must_use]
    pub const fn is_success_equivalent(self) -> bool {
        matches!(self, Self::Completed | Self::AlreadySatisfied)
    }
}

/// Reasons an environment mutation may be rejected.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EnvironmentError {
    /// The coordinate lies outside the terrain grid.
    #[error("cell {cell} lies outside the grid")]
    OutOfBounds {
        /// Offending coordinate.
        cell: CellCoord,
    },
    /// Harvest attempted on a cell that holds no resource.
    #[error("cell {cell} holds no resource")]
    NotAResource {
        /// Offending coordinate.
        cell: CellCoord,
    },
    /// Withdrawal requested more wood than the depot holds.
    #[error("depot holds {available} wood but {requested} were requested")]
    InsufficientStock {
        /// Amount the caller asked for.
        requested: u32,
        /// Amount currently stocked.
        available: u32,
    },
    /// Terrain rows were supplied with differing widths.
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        /// Zero-based index of the mismatched row.
        row: u32,
        /// Width established by the first row.
        expected: u32,
        /// Width of the mismatched row.
        found: u32,
    },
}

/// Commands adapters submit to the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Advances the simulation by one discrete step.
    Tick,
    /// Replaces the vision radius used by every perception query.
    SetVisionRadius {
        /// Radius to apply from the next perception query onward.
        radius: VisionRadius,
    },
    /// Suspends or resumes ticking.
    SetPaused {
        /// Whether ticks should be ignored.
        paused: bool,
    },
    /// Discards all agent and environment state and rebuilds the run.
    Reset,
}

/// Events broadcast by the simulation while processing commands.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Event {
    /// Indicates that the simulation advanced one tick.
    TimeAdvanced {
        /// Index of the tick that was just processed.
        tick: u64,
    },
    /// Confirms that an agent moved between two cells.
    AgentMoved {
        /// Agent that moved.
        agent: AgentId,
        /// Cell occupied before the move.
        from: CellCoord,
        /// Cell occupied after the move.
        to: CellCoord,
    },
    /// Reports that an agent gave up on its goal and started wandering.
    RecoveryStarted {
        /// Agent that entered recovery.
        agent: AgentId,
        /// Cell the agent was stuck on.
        cell: CellCoord,
    },
    /// Confirms that an agent picked up wood from a resource cell.
    ResourceHarvested {
        /// Harvesting agent.
        agent: AgentId,
        /// Former resource cell, now land.
        cell: CellCoord,
    },
    /// Confirms that an agent dropped wood at the depot.
    WoodDeposited {
        /// Depositing agent.
        agent: AgentId,
        /// Depot stock after the deposit.
        stock: u32,
    },
    /// Confirms that an agent took wood from the depot.
    WoodWithdrawn {
        /// Withdrawing agent.
        agent: AgentId,
        /// Depot stock after the withdrawal.
        stock: u32,
    },
    /// Reports a contribution to an unfinished bridge section.
    BridgeSectionContributed {
        /// Contributing agent.
        agent: AgentId,
        /// Water cell receiving the contribution.
        cell: CellCoord,
        /// Accumulated contributions for the cell.
        progress: u32,
    },
    /// Reports that a water cell has become a bridge.
    BridgeSectionCompleted {
        /// Agent whose contribution completed the section.
        agent: AgentId,
        /// Cell that turned into a bridge.
        cell: CellCoord,
    },
    /// Reports that a manager pushed a directive to a crew member.
    HintIssued {
        /// Manager that issued the hint.
        manager: AgentId,
        /// Agent receiving the hint.
        recipient: AgentId,
        /// Coordinate carried by the hint.
        cell: CellCoord,
    },
    /// Announces that an agent stepped onto the goal cell for the first time.
    GoalReached {
        /// Agent that arrived.
        agent: AgentId,
        /// Goal cell.
        cell: CellCoord,
    },
    /// Confirms that the vision radius changed.
    VisionChanged {
        /// Radius now in effect.
        radius: VisionRadius,
    },
    /// Confirms that ticking was suspended or resumed.
    PauseChanged {
        /// Whether ticks are now ignored.
        paused: bool,
    },
    /// Confirms that the run was rebuilt from its map configuration.
    SimulationReset,
}

/// Tunable parameters for a simulation run.
///
/// Every field has a default, so a configuration file only needs to name the
/// values it overrides.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Width of the generated default map.
    pub columns: u32,
    /// Height of the generated default map.
    pub rows: u32,
    /// First river column of the generated map; derived from `columns` when absent.
    pub river_column_start: Option<u32>,
    /// Number of river columns on the generated map.
    pub river_width: u32,
    /// Random resource placements attempted on the generated map.
    pub default_resource_count: u32,
    /// Fraction of land cells turned into resources on loaded maps.
    pub resource_density: f64,
    /// Initial vision radius.
    pub vision_radius: u32,
    /// Manhattan range within which managers deliver hints.
    pub manager_range: u32,
    /// Contributions required to complete one bridge section.
    pub wood_per_section: u32,
    /// Whether agents refuse to share a cell.
    pub prevent_collision: bool,
    /// Ticks an agent may stay put before entering recovery; zero disables detection.
    pub stuck_threshold: u32,
    /// Length of a recovery window in ticks.
    pub recovery_ticks: u32,
    /// Number of gatherers spawned on reset.
    pub gatherers: u32,
    /// Number of builders spawned on reset.
    pub builders: u32,
    /// Number of managers spawned on reset.
    pub managers: u32,
    /// Seed for map generation, resource scattering and random walks.
    pub seed: u64,
}

impl SimulationConfig {
    /// First river column used by the generated map.
    #[must_use]
    pub fn river_start(&self) -> u32 {
        self.river_column_start
            .unwrap_or_else(|| (self.columns / 2).saturating_sub(1))
    }

    /// Vision radius clamped into the accepted range.
    #[must_use]
    pub fn vision(&self) -> VisionRadius {
        VisionRadius::new(self.vision_radius)
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            columns: 40,
            rows: 20,
            river_column_start: None,
            river_width: 4,
            default_resource_count: 30,
            resource_density: 0.1,
            vision_radius: 9,
            manager_range: 2,
            wood_per_section: 2,
            prevent_collision: true,
            stuck_threshold: 3,
            recovery_ticks: 15,
            gatherers: 4,
            builders: 3,
            managers: 3,
            seed: 0x5eed_b41d_6e00_c0de,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CellCoord, Direction, SectionOutcome, SimulationConfig, VisionRadius};

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = CellCoord::new(1, 1);
        let destination = CellCoord::new(4, 3);
        assert_eq!(origin.manhattan_distance(destination), 5);
        assert_eq!(destination.manhattan_distance(origin), 5);
    }

    #[test]
    fn chebyshev_distance_counts_diagonals_once() {
        let origin = CellCoord::new(2, 2);
        assert_eq!(origin.chebyshev_distance(CellCoord::new(3, 3)), 1);
        assert_eq!(origin.chebyshev_distance(CellCoord::new(2, 2)), 0);
        assert_eq!(origin.chebyshev_distance(CellCoord::new(5, 3)), 3);
    }

    #[test]
    fn step_refuses_negative_coordinates() {
        let corner = CellCoord::new(0, 0);
        assert_eq!(corner.step(Direction::North), None);
        assert_eq!(corner.step(Direction::West), None);
        assert_eq!(corner.step(Direction::East), Some(CellCoord::new(1, 0)));
        assert_eq!(corner.step(Direction::South), Some(CellCoord::new(0, 1)));
    }

    #[test]
    fn vision_radius_is_clamped() {
        assert_eq!(VisionRadius::new(0).get(), VisionRadius::MIN);
        assert_eq!(VisionRadius::new(99).get(), VisionRadius::MAX);
        assert_eq!(VisionRadius::new(VisionRadius::MAX).widened().get(), 20);
        assert_eq!(VisionRadius::new(VisionRadius::MIN).narrowed().get(), 1);
    }

    #[test]
    fn vision_covers_a_diamond() {
        let radius = VisionRadius::new(2);
        let origin = CellCoord::new(5, 5);
        assert!(radius.covers(origin, CellCoord::new(6, 6)));
        assert!(radius.covers(origin, CellCoord::new(7, 5)));
        assert!(!radius.covers(origin, CellCoord::new(7, 6)));
    }

    #[test]
    fn only_unfinished_contributions_keep_the_site_open() {
        assert!(SectionOutcome::Completed.is_success_equivalent());
        assert!(SectionOutcome::AlreadySatisfied.is_success_equivalent());
        assert!(!SectionOutcome::Contributed.is_success_equivalent());
    }

    #[test]
    fn partial_configuration_keeps_defaults() {
        let config: SimulationConfig =
            toml::from_str("vision_radius = 4\nmanagers = 1\n").expect("config parses");
        assert_eq!(config.vision_radius, 4);
        assert_eq!(config.managers, 1);
        assert_eq!(config.gatherers, SimulationConfig::default().gatherers);
        assert_eq!(config.river_start(), 19);
    }
}
