#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Greedy single-step movement, stuck recovery and the per-agent update
//! protocol shared by every role system.

use bridge_crew_core::{AgentId, CellCoord, Direction, Event, Role};
use bridge_crew_world::{Agent, World};
use rand::{seq::SliceRandom, RngCore};
use tracing::debug;

/// Decision logic driving every agent of one role.
pub trait RoleBehavior {
    /// Role whose agents this behavior drives.
    fn role(&self) -> Role;

    /// Runs one decision step for `agent`.
    ///
    /// The agent has been copied out of the roster; occupancy queries still
    /// see its previous position but ignore it by identifier.
    fn update(
        &mut self,
        world: &mut World,
        agent: &mut Agent,
        rng: &mut dyn RngCore,
        out: &mut Vec<Event>,
    );
}

/// Outcome of the stuck check that precedes role logic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Progress {
    /// The agent runs its role logic this update.
    Acting,
    /// The agent is inside a recovery window and only wanders.
    Recovering,
}

/// Runs one complete update for the agent with the provided identifier.
///
/// The stuck check runs first; a recovering agent only random-walks. The
/// agent's hint is cleared afterwards whether or not it was used.
pub fn run_update(
    world: &mut World,
    id: AgentId,
    behavior: &mut dyn RoleBehavior,
    rng: &mut dyn RngCore,
    out: &mut Vec<Event>,
) {
    let Some(mut agent) = world.roster().get(id).copied() else {
        return;
    };

    match observe_progress(world, &mut agent, out) {
        Progress::Recovering => {
            let _ = random_walk(world, &mut agent, rng, out);
        }
        Progress::Acting => behavior.update(world, &mut agent, rng, out),
    }

    agent.hint = None;
    world.roster_mut().store(agent);
}

/// Updates the stuck bookkeeping of `agent` and reports whether it may act.
///
/// A threshold of zero disables detection entirely.
pub fn observe_progress(world: &World, agent: &mut Agent, out: &mut Vec<Event>) -> Progress {
    let threshold = world.config().stuck_threshold;
    if threshold == 0 {
        return Progress::Acting;
    }

    if agent.ignore_goal_ticks > 0 {
        agent.ignore_goal_ticks -= 1;
        return Progress::Recovering;
    }

    if agent.cell == agent.last_cell {
        agent.stuck_count = agent.stuck_count.saturating_add(1);
    } else {
        agent.stuck_count = 0;
        agent.last_cell = agent.cell;
    }

    if agent.stuck_count < threshold {
        return Progress::Acting;
    }

    agent.ignore_goal_ticks = world.config().recovery_ticks;
    agent.stuck_count = 0;
    agent.clear_goal();
    debug!(agent = %agent.id(), cell = %agent.cell, "agent stuck, wandering");
    out.push(Event::RecoveryStarted {
        agent: agent.id(),
        cell: agent.cell,
    });
    Progress::Recovering
}

/// Moves `agent` onto the adjacent `to` when it is walkable and free.
///
/// Reports goal arrival after the move. Returns whether the agent moved.
pub fn step_to(world: &mut World, agent: &mut Agent, to: CellCoord, out: &mut Vec<Event>) -> bool {
    if !world.can_enter(to, agent.id()) {
        return false;
    }

    let from = agent.cell;
    agent.cell = to;
    out.push(Event::AgentMoved {
        agent: agent.id(),
        from,
        to,
    });
    if world.environment_mut().check_arrival(to) {
        out.push(Event::GoalReached {
            agent: agent.id(),
            cell: to,
        });
    }
    true
}

/// Takes one greedy step toward `target`, horizontal axis first.
///
/// Only the two axis-aligned steps that reduce the distance are considered;
/// when neither is open the agent stays put.
pub fn move_towards(
    world: &mut World,
    agent: &mut Agent,
    target: CellCoord,
    out: &mut Vec<Event>,
) -> bool {
    let here = agent.cell;
    let horizontal = match target.column().cmp(&here.column()) {
        std::cmp::Ordering::Greater => here.step(Direction::East),
        std::cmp::Ordering::Less => here.step(Direction::West),
        std::cmp::Ordering::Equal => None,
    };
    let vertical = match target.row().cmp(&here.row()) {
        std::cmp::Ordering::Greater => here.step(Direction::South),
        std::cmp::Ordering::Less => here.step(Direction::North),
        std::cmp::Ordering::Equal => None,
    };

    for candidate in [horizontal, vertical].into_iter().flatten() {
        if step_to(world, agent, candidate, out) {
            return true;
        }
    }
    false
}

/// Steps in the first open direction of a uniformly shuffled order.
pub fn random_walk(
    world: &mut World,
    agent: &mut Agent,
    rng: &mut dyn RngCore,
    out: &mut Vec<Event>,
) -> bool {
    let mut directions = Direction::ALL;
    directions.shuffle(rng);

    for direction in directions {
        let Some(candidate) = agent.cell.step(direction) else {
            continue;
        };
        if step_to(world, agent, candidate, out) {
            return true;
        }
    }
    false
}
