#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state for the bridge crew simulation.
//!
//! The world owns the terrain, the shared counters agents mutate and the
//! roster of agents. Role systems read and mutate it one agent at a time;
//! adapters observe it through the [`query`] module.

mod environment;
mod grid;
mod map;
pub mod perception;
mod river;
mod roster;

pub use environment::Environment;
pub use grid::{glyph, kind_for_glyph, TerrainGrid};
pub use map::{
    default_depot, default_goal, generate_default, prepare_loaded, scatter_resources, MapLayout,
    MapSource,
};
pub use river::RiverSpan;
pub use roster::{Agent, HintDelivery, Roster};

use bridge_crew_core::{
    AgentId, CellCoord, CellKind, Command, EnvironmentError, Event, Role, SimulationConfig,
    VisionRadius, WELCOME_BANNER,
};

/// Represents the authoritative state of one simulation run.
#[derive(Clone, Debug)]
pub struct World {
    banner: &'static str,
    environment: Environment,
    roster: Roster,
    config: SimulationConfig,
    vision: VisionRadius,
    tick_index: u64,
    paused: bool,
}

impl World {
    /// Creates a world around a prepared environment and roster.
    #[must_use]
    pub fn new(environment: Environment, roster: Roster, config: SimulationConfig) -> Self {
        let vision = config.vision();
        Self {
            banner: WELCOME_BANNER,
            environment,
            roster,
            config,
            vision,
            tick_index: 0,
            paused: false,
        }
    }

    /// Creates a world from glyph rows, locating the depot and goal on the grid.
    ///
    /// Agents are placed verbatim; no snapping or occupancy checks are made.
    pub fn from_glyphs(
        lines: &[&str],
        placements: &[(Role, CellCoord)],
        config: SimulationConfig,
    ) -> Result<Self, EnvironmentError> {
        let grid = TerrainGrid::from_glyphs(lines)?;
        let depot = grid.find(CellKind::Depot);
        let goal = grid.find(CellKind::Goal);
        let environment = Environment::new(grid, depot, goal, config.wood_per_section);
        let roster = Roster::from_placements(placements.iter().copied());
        Ok(Self::new(environment, roster, config))
    }

    /// Shared terrain and counters.
    #[must_use]
    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Mutable access to the shared terrain and counters.
    pub fn environment_mut(&mut self) -> &mut Environment {
        &mut self.environment
    }

    /// Every agent of the run.
    #[must_use]
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Mutable access to the roster.
    pub fn roster_mut(&mut self) -> &mut Roster {
        &mut self.roster
    }

    /// Configuration the run was created with.
    #[must_use]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Vision radius applied to every perception query.
    #[must_use]
    pub const fn vision(&self) -> VisionRadius {
        self.vision
    }

    /// Number of ticks processed since the run started.
    #[must_use]
    pub const fn tick_index(&self) -> u64 {
        self.tick_index
    }

    /// Whether ticking is suspended.
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    /// Whether a tick would currently do anything.
    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.paused && !self.environment.goal_reached()
    }

    /// Reports whether an agent other than `me` stands on `cell`.
    ///
    /// Always `false` when collision prevention is disabled.
    #[must_use]
    pub fn is_blocked_by_agent(&self, cell: CellCoord, me: AgentId) -> bool {
        self.config.prevent_collision && self.roster.occupant_other_than(cell, me).is_some()
    }

    /// Reports whether agent `me` may step onto `cell`.
    #[must_use]
    pub fn can_enter(&self, cell: CellCoord, me: AgentId) -> bool {
        self.environment.is_walkable(cell) && !self.is_blocked_by_agent(cell, me)
    }
}

/// Applies the provided command to the world.
///
/// `Tick` only advances the clock; agent updates are driven by the role
/// systems. `Reset` needs a map source and is handled by whoever owns the
/// world, which replaces it wholesale.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick => {
            if !world.is_running() {
                return;
            }
            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced {
                tick: world.tick_index,
            });
        }
        Command::SetVisionRadius { radius } => {
            if world.vision != radius {
                world.vision = radius;
                out_events.push(Event::VisionChanged { radius });
            }
        }
        Command::SetPaused { paused } => {
            if world.paused != paused {
                world.paused = paused;
                out_events.push(Event::PauseChanged { paused });
            }
        }
        Command::Reset => {}
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use bridge_crew_core::{AgentId, Cargo, CellCoord, CellKind, Role, VisionRadius};

    use super::{Agent, TerrainGrid, World};

    /// Retrieves the welcome banner that adapters may display.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Terrain grid in its current state.
    #[must_use]
    pub fn grid(world: &World) -> &TerrainGrid {
        world.environment.grid()
    }

    /// Wood stocked at the depot.
    #[must_use]
    pub fn resource_stock(world: &World) -> u32 {
        world.environment.resource_stock()
    }

    /// Number of finished bridge sections.
    #[must_use]
    pub fn completed_sections(world: &World) -> usize {
        world.environment.completed_sections()
    }

    /// Number of water cells with partial contributions.
    #[must_use]
    pub fn sections_in_progress(world: &World) -> usize {
        world.environment.sections_in_progress()
    }

    /// Contributions recorded at `cell`.
    #[must_use]
    pub fn bridge_progress(world: &World, cell: CellCoord) -> u32 {
        world.environment.bridge_progress(cell)
    }

    /// Whether any agent reached the goal.
    #[must_use]
    pub fn goal_reached(world: &World) -> bool {
        world.environment.goal_reached()
    }

    /// Whether a dry crossing over the river exists.
    #[must_use]
    pub fn bridge_complete(world: &World) -> bool {
        world.environment.is_bridge_complete()
    }

    /// Current vision radius.
    #[must_use]
    pub fn vision_radius(world: &World) -> VisionRadius {
        world.vision
    }

    /// Depot location, if any.
    #[must_use]
    pub fn depot(world: &World) -> Option<CellCoord> {
        world.environment.depot()
    }

    /// Goal location, if any.
    #[must_use]
    pub fn goal(world: &World) -> Option<CellCoord> {
        world.environment.goal()
    }

    /// Number of processed ticks.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Whether ticking is suspended.
    #[must_use]
    pub fn is_paused(world: &World) -> bool {
        world.paused
    }

    /// Wood accounted for anywhere in the run: stock, cargo, standing
    /// resources and wood used up at building sites.
    #[must_use]
    pub fn wood_accounted(world: &World) -> usize {
        let carried = world
            .roster
            .iter()
            .filter(|agent| agent.carried == Some(Cargo::Wood))
            .count();
        let standing = world.environment.grid().count(CellKind::Resource);
        let stocked = usize::try_from(world.environment.resource_stock()).unwrap_or(usize::MAX);
        let spent = usize::try_from(world.environment.spent_wood()).unwrap_or(usize::MAX);
        stocked + carried + standing + spent
    }

    /// Captures a read-only view of every agent in roster order.
    #[must_use]
    pub fn agent_view(world: &World) -> AgentView {
        AgentView {
            snapshots: world.roster.iter().map(AgentSnapshot::from).collect(),
        }
    }

    /// Read-only snapshot of the crew.
    #[derive(Clone, Debug)]
    pub struct AgentView {
        snapshots: Vec<AgentSnapshot>,
    }

    impl AgentView {
        /// Iterator over the captured snapshots in roster order.
        pub fn iter(&self) -> impl Iterator<Item = &AgentSnapshot> {
            self.snapshots.iter()
        }

        /// Consumes the view, yielding the underlying snapshots.
        #[must_use]
        pub fn into_vec(self) -> Vec<AgentSnapshot> {
            self.snapshots
        }
    }

    /// Immutable representation of one agent used by adapters.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct AgentSnapshot {
        /// Identifier of the agent.
        pub id: AgentId,
        /// Role of the agent.
        pub role: Role,
        /// Cell the agent stands on.
        pub cell: CellCoord,
        /// Item in hand.
        pub carried: Option<Cargo>,
        /// Current movement target.
        pub goal_cell: Option<CellCoord>,
        /// Pending manager directive.
        pub hint: Option<CellCoord>,
        /// Whether the agent is random-walking out of a stuck position.
        pub recovering: bool,
    }

    impl From<&Agent> for AgentSnapshot {
        fn from(agent: &Agent) -> Self {
            Self {
                id: agent.id(),
                role: agent.role(),
                cell: agent.cell,
                carried: agent.carried,
                goal_cell: agent.goal_cell,
                hint: agent.hint,
                recovering: agent.is_recovering(),
            }
        }
    }
}

#[cfg(test)]
mod testing {
    use bridge_crew_core::{CellCoord, Role, SimulationConfig};

    use crate::World;

    pub(crate) fn world_from_glyphs(
        lines: &[&str],
        placements: &[(Role, CellCoord)],
        vision: u32,
    ) -> World {
        let config = SimulationConfig {
            vision_radius: vision,
            ..SimulationConfig::default()
        };
        World::from_glyphs(lines, placements, config).expect("valid test grid")
    }
}
