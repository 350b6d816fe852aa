#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Gatherer role: harvests wood within sight and hauls it to the depot.

use bridge_crew_core::{Cargo, CellKind, Event, Role};
use bridge_crew_system_movement::{move_towards, random_walk, RoleBehavior};
use bridge_crew_world::{
    perception::{self, Scope},
    Agent, World,
};
use rand::RngCore;
use tracing::trace;

/// Stateless behavior driving every gatherer.
///
/// An empty-handed gatherer is seeking wood; a laden one is returning it.
#[derive(Clone, Copy, Debug, Default)]
pub struct Gatherer;

impl Gatherer {
    /// Creates the gatherer behavior.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn seek(&self, world: &mut World, agent: &mut Agent, rng: &mut dyn RngCore, out: &mut Vec<Event>) {
        let _ = agent.adopt_hint();

        if let Some(goal) = agent.goal_cell {
            let lost_sight = !agent.goal_directed && !perception::is_visible(world, agent.cell, goal);
            let taken = world.is_blocked_by_agent(goal, agent.id());
            let gone = !world.environment().grid().is(goal, CellKind::Resource);
            if lost_sight || taken || gone {
                agent.clear_goal();
            }
        }

        if agent.goal_cell.is_none() {
            let found = perception::nearest_matching(
                world,
                CellKind::Resource,
                agent.cell,
                Scope::visible(agent.cell, world.vision()),
                Some(agent.id()),
            );
            if let Some(cell) = found {
                agent.set_goal(cell);
            }
        }

        let Some(goal) = agent.goal_cell else {
            let _ = random_walk(world, agent, rng, out);
            return;
        };

        let _ = move_towards(world, agent, goal, out);
        if agent.cell != goal {
            return;
        }

        agent.clear_goal();
        if world.environment_mut().consume_resource(goal).is_ok() {
            agent.carried = Some(Cargo::Wood);
            out.push(Event::ResourceHarvested {
                agent: agent.id(),
                cell: goal,
            });
        }
    }

    fn haul(&self, world: &mut World, agent: &mut Agent, rng: &mut dyn RngCore, out: &mut Vec<Event>) {
        let _ = agent.adopt_hint();

        let depot = world
            .environment()
            .depot()
            .filter(|depot| perception::is_visible(world, agent.cell, *depot));

        if let Some(depot) = depot {
            let _ = move_towards(world, agent, depot, out);
            if agent.cell == depot {
                let stock = world.environment_mut().deposit(1);
                agent.carried = None;
                agent.clear_goal();
                trace!(agent = %agent.id(), stock, "wood deposited");
                out.push(Event::WoodDeposited {
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
}

impl RoleBehavior for Gatherer {
    fn role(&self) -> Role {
        Role::Gatherer
    }

    fn update(
        &mut self,
        world: &mut World,
        agent: &mut Agent,
        rng: &mut dyn RngCore,
        out: &mut Vec<Event>,
    ) {
        if agent.is_laden() {
            self.haul(world, agent, rng, out);
        } else {
            self.seek(world, agent, rng, out);
        }
    }
}
