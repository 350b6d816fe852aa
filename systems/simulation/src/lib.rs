#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Drives complete runs: builds the world, dispatches agents to their role
//! behavior each tick and handles the run-level knobs.

use bridge_crew_core::{Command, Event, Role, SimulationConfig, VisionRadius};
use bridge_crew_system_bootstrap::Bootstrap;
use bridge_crew_system_builder::Builder;
use bridge_crew_system_gatherer::Gatherer;
use bridge_crew_system_manager::Manager;
use bridge_crew_system_movement::{run_update, RoleBehavior};
use bridge_crew_world::{self as world, query, MapSource, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

/// Single-threaded simulation of one crew on one map.
///
/// Each tick updates every manager first and then the rest of the crew,
/// each group in roster order, so hints issued during a tick reach their
/// recipients within the same tick.
#[derive(Debug)]
pub struct Simulation {
    world: World,
    source: MapSource,
    config: SimulationConfig,
    rng: ChaCha8Rng,
    bootstrap: Bootstrap,
    gatherer: Gatherer,
    builder: Builder,
    manager: Manager,
}

impl Simulation {
    /// Creates a simulation on the provided map, seeded from the configuration.
    #[must_use]
    pub fn new(config: SimulationConfig, source: MapSource) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let bootstrap = Bootstrap;
        let world = build_world(&bootstrap, &config, &source, &mut rng);
        info!(
            agents = world.roster().len(),
            columns = query::grid(&world).columns(),
            rows = query::grid(&world).rows(),
            "simulation created"
        );
        Self {
            world,
            source,
            config,
            rng,
            bootstrap,
            gatherer: Gatherer::new(),
            builder: Builder::new(),
            manager: Manager::new(),
        }
    }

    /// Current world state.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Banner adapters may greet the user with.
    #[must_use]
    pub fn banner(&self) -> &str {
        self.bootstrap.welcome_banner(&self.world)
    }

    /// Applies a command, appending the resulting events to `out`.
    pub fn apply(&mut self, command: Command, out: &mut Vec<Event>) {
        match command {
            Command::Tick => self.tick(out),
            Command::Reset => self.reset(out),
            other => world::apply(&mut self.world, other, out),
        }
    }

    /// Advances the run by one tick. Does nothing while paused or once the
    /// goal has been reached.
    pub fn tick(&mut self, out: &mut Vec<Event>) {
        if !self.world.is_running() {
            return;
        }
        world::apply(&mut self.world, Command::Tick, out);

        for id in self.world.roster().update_order() {
            let Some(role) = self.world.roster().get(id).map(|agent| agent.role()) else {
                continue;
            };
            let behavior: &mut dyn RoleBehavior = match role {
                Role::Gatherer => &mut self.gatherer,
                Role::Builder => &mut self.builder,
                Role::Manager => &mut self.manager,
            };
            run_update(&mut self.world, id, behavior, &mut self.rng, out);
        }

        debug!(
            tick = self.world.tick_index(),
            stock = query::resource_stock(&self.world),
            completed = query::completed_sections(&self.world),
            in_progress = query::sections_in_progress(&self.world),
            "tick processed"
        );
    }

    /// Discards every agent and the environment and rebuilds them from the
    /// map source. The vision radius survives; the pause flag does not.
    ///
    /// The random stream continues rather than restarting, so a reset run
    /// scatters and wanders differently from the first one.
    pub fn reset(&mut self, out: &mut Vec<Event>) {
        let vision = self.world.vision();
        self.world = build_world(&self.bootstrap, &self.config, &self.source, &mut self.rng);
        world::apply(
            &mut self.world,
            Command::SetVisionRadius { radius: vision },
            &mut Vec::new(),
        );
        info!("simulation reset");
        out.push(Event::SimulationReset);
    }

    /// Replaces the vision radius, clamped into the accepted range.
    pub fn set_vision_radius(&mut self, radius: u32, out: &mut Vec<Event>) {
        self.apply(
            Command::SetVisionRadius {
                radius: VisionRadius::new(radius),
            },
            out,
        );
    }

    /// Widens vision by one cell.
    pub fn increase_vision(&mut self, out: &mut Vec<Event>) {
        let radius = self.world.vision().widened();
        self.apply(Command::SetVisionRadius { radius }, out);
    }

    /// Narrows vision by one cell.
    pub fn decrease_vision(&mut self, out: &mut Vec<Event>) {
        let radius = self.world.vision().narrowed();
        self.apply(Command::SetVisionRadius { radius }, out);
    }

    /// Suspends or resumes ticking.
    pub fn set_paused(&mut self, paused: bool, out: &mut Vec<Event>) {
        self.apply(Command::SetPaused { paused }, out);
    }

    /// Flips the pause flag.
    pub fn toggle_pause(&mut self, out: &mut Vec<Event>) {
        let paused = !self.world.is_paused();
        self.set_paused(paused, out);
    }
}

fn build_world(
    bootstrap: &Bootstrap,
    config: &SimulationConfig,
    source: &MapSource,
    rng: &mut ChaCha8Rng,
) -> World {
    let environment = source.build(config, rng);
    let roster = bootstrap.roster(environment.grid(), config);
    World::new(environment, roster, config.clone())
}
