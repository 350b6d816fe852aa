#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Builder role: fetches wood from the depot and sinks it into the bridge.

use bridge_crew_core::{AgentId, Cargo, CellCoord, CellKind, Event, Role, SectionOutcome};
use bridge_crew_system_movement::{move_towards, random_walk, RoleBehavior};
use bridge_crew_world::{
    perception::{self, Scope},
    Agent, World,
};
use rand::RngCore;
use tracing::trace;

/// Stateless behavior driving every builder.
///
/// An empty-handed builder is fetching wood; a laden one is placing it.
#[derive(Clone, Copy, Debug, Default)]
pub struct Builder;

impl Builder {
    /// Creates the builder behavior.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn fetch(&self, world: &mut World, agent: &mut Agent, rng: &mut dyn RngCore, out: &mut Vec<Event>) {
        let _ = agent.adopt_hint();

        let depot = world
            .environment()
            .depot()
            .filter(|_| world.environment().resource_stock() > 0)
            .filter(|depot| perception::is_visible(world, agent.cell, *depot));

        if let Some(depot) = depot {
            let _ = move_towards(world, agent, depot, out);
            if agent.cell != depot {
                return;
            }
            if let Ok(stock) = world.environment_mut().withdraw(1) {
                agent.carried = Some(Cargo::Wood);
                agent.clear_goal();
                out.push(Event::WoodWithdrawn {
                    agent: agent.id(),
                    stock,
                });
            }
        } else if let Some(goal) = agent.goal_cell {
            let _ = move_towards(world, agent, goal, out);
            if agent.cell == goal {
                agent.clear_goal();
            }
        } else {
            let _ = random_walk(world, agent, rng, out);
        }
    }

    fn place(&self, world: &mut World, agent: &mut Agent, rng: &mut dyn RngCore, out: &mut Vec<Event>) {
        if let Some(goal) = agent.goal_cell {
            if !world.environment().grid().is(goal, CellKind::Water) {
                agent.clear_goal();
            }
        }

        let visible = Scope::visible(agent.cell, world.vision());
        let extension = perception::rightmost_bridge_in(world, visible)
            .and_then(|bridge| perception::bridge_continuation(world, bridge, Some(agent.id())));
        if let Some(cell) = extension {
            agent.set_goal(cell);
            agent.hint = None;
        }

        if agent.goal_cell.is_none() {
            let _ = agent.adopt_hint();
        }

        if agent.goal_cell.is_none() {
            if let Some(cell) = placement_site(world, agent.cell, agent.id()) {
                agent.set_goal(cell);
            }
        }

        let Some(goal) = agent.goal_cell else {
            let _ = random_walk(world, agent, rng, out);
            return;
        };

        let _ = move_towards(world, agent, goal, out);
        if agent.cell.chebyshev_distance(goal) > 1 {
            return;
        }

        let outcome = world.environment_mut().add_bridge_section(goal);
        match outcome {
            SectionOutcome::Completed => out.push(Event::BridgeSectionCompleted {
                agent: agent.id(),
                cell: goal,
            }),
            SectionOutcome::Contributed => {
                let progress = world.environment().bridge_progress(goal);
                trace!(agent = %agent.id(), cell = %goal, progress, "bridge contribution");
                out.push(Event::BridgeSectionContributed {
                    agent: agent.id(),
                    cell: goal,
                    progress,
                });
            }
            SectionOutcome::AlreadySatisfied => {}
        }

        if outcome.is_success_equivalent() {
            agent.carried = None;
            agent.clear_goal();
            let _ = world.environment_mut().spend_wood();
        }
    }
}

impl RoleBehavior for Builder {
    fn role(&self) -> Role {
        Role::Builder
    }

    fn update(
        &mut self,
        world: &mut World,
        agent: &mut Agent,
        rng: &mut dyn RngCore,
        out: &mut Vec<Event>,
    ) {
        if agent.is_laden() {
            self.place(world, agent, rng, out);
        } else {
            self.fetch(world, agent, rng, out);
        }
    }
}

/// Fallback placement search for a builder standing on `origin`.
///
/// Continues the rightmost completed section anywhere on the map when it has
/// free water beside it, otherwise picks the nearest visible free water cell.
#[must_use]
pub fn placement_site(world: &World, origin: CellCoord, me: AgentId) -> Option<CellCoord> {
    let rightmost = world
        .environment()
        .bridge_cells()
        .fold(None, |best: Option<CellCoord>, cell| match best {
            Some(current) if current.column() >= cell.column() => Some(current),
            _ => Some(cell),
        });

    rightmost
        .and_then(|bridge| perception::bridge_continuation(world, bridge, Some(me)))
        .or_else(|| {
            perception::nearest_matching(
                world,
                CellKind::Water,
                origin,
                Scope::visible(origin, world.vision()),
                Some(me),
            )
        })
}
