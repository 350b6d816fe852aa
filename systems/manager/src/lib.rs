#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Manager role: heads for the goal once a crossing exists and pushes
//! one-shot directives to the crew members around it.
//!
//! Managers plan with global knowledge: resource and bridge-site searches
//! ignore the vision radius and do not consider occupancy.

use bridge_crew_core::{AgentId, CellCoord, CellKind, Direction, Event, Role};
use bridge_crew_system_movement::{move_towards, random_walk, RoleBehavior};
use bridge_crew_world::{
    perception::{self, Scope},
    Agent, HintDelivery, World,
};
use rand::RngCore;
use tracing::trace;

/// Stateless behavior driving every manager.
#[derive(Clone, Copy, Debug, Default)]
pub struct Manager;

impl Manager {
    /// Creates the manager behavior.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn navigate(&self, world: &mut World, agent: &mut Agent, rng: &mut dyn RngCore, out: &mut Vec<Event>) {
        let goal = world
            .environment()
            .goal()
            .filter(|goal| perception::is_visible(world, agent.cell, *goal));
        if let Some(goal) = goal {
            let _ = move_towards(world, agent, goal, out);
            return;
        }

        match crossing_waypoint(world, agent.cell) {
            Some(waypoint) => {
                let _ = move_towards(world, agent, waypoint, out);
            }
            None => {
                let _ = random_walk(world, agent, rng, out);
            }
        }
    }

    fn coordinate(&self, world: &mut World, manager: &Agent, out: &mut Vec<Event>) {
        let range = world.config().manager_range;
        let recipients: Vec<(AgentId, Role, bool)> = world
            .roster()
            .iter()
            .filter(|other| other.id() != manager.id() && other.role() != Role::Manager)
            .filter(|other| manager.cell.manhattan_distance(other.cell) <= range)
            .map(|other| (other.id(), other.role(), other.is_laden()))
            .collect();

        for (recipient, role, laden) in recipients {
            let Some(delivery) = directive_for(world, manager.cell, role, laden) else {
                continue;
            };
            if world.roster_mut().deliver_hint(recipient, delivery) {
                trace!(manager = %manager.id(), %recipient, cell = %delivery.cell, "hint issued");
                out.push(Event::HintIssued {
                    manager: manager.id(),
                    recipient,
                    cell: delivery.cell,
                });
            }
        }
    }
}

impl RoleBehavior for Manager {
    fn role(&self) -> Role {
        Role::Manager
    }

    fn update(
        &mut self,
        world: &mut World,
        agent: &mut Agent,
        rng: &mut dyn RngCore,
        out: &mut Vec<Event>,
    ) {
        self.navigate(world, agent, rng, out);
        self.coordinate(world, agent, out);
    }
}

/// Resource searches are measured from the manager, not the recipient.
fn directive_for(
    world: &World,
    manager: CellCoord,
    role: Role,
    laden: bool,
) -> Option<HintDelivery> {
    let environment = world.environment();
    let (target, force_goal) = match (role, laden) {
        (Role::Gatherer, false) => (
            perception::nearest_matching(world, CellKind::Resource, manager, Scope::Global, None)?,
            false,
        ),
        (Role::Gatherer, true) => (environment.depot()?, false),
        (Role::Builder, true) => (bridge_site(world)?, true),
        (Role::Builder, false) if environment.resource_stock() > 0 => (environment.depot()?, false),
        _ => return None,
    };
    Some(HintDelivery {
        cell: target,
        force_goal,
    })
}

/// Best place on the whole map to sink the next unit of wood.
///
/// Prefers water directly east of the rightmost bridge, then any water next
/// to any bridge, then the first water cell found scanning rows outward
/// from the middle of the map.
#[must_use]
pub fn bridge_site(world: &World) -> Option<CellCoord> {
    let grid = world.environment().grid();

    let rightmost = perception::rightmost_bridge_in(world, Scope::Global);
    let eastward = rightmost
        .and_then(|bridge| bridge.step(Direction::East))
        .filter(|cell| grid.is(*cell, CellKind::Water));
    if eastward.is_some() {
        return eastward;
    }

    let beside_bridge = grid
        .iter()
        .filter(|(_, kind)| *kind == CellKind::Bridge)
        .find_map(|(bridge, _)| perception::bridge_continuation(world, bridge, None));
    if beside_bridge.is_some() {
        return beside_bridge;
    }

    let middle = grid.rows() / 2;
    (0..grid.rows())
        .flat_map(|offset| [middle.checked_add(offset), middle.checked_sub(offset)])
        .flatten()
        .filter(|row| *row < grid.rows())
        .find_map(|row| {
            (0..grid.columns())
                .map(|column| CellCoord::new(column, row))
                .find(|cell| grid.is(*cell, CellKind::Water))
        })
}

/// Next waypoint for a manager at `cell` heading over a finished crossing.
///
/// Returns `None` while no crossing exists or once the manager is already
/// on the far bank near the crossing row, where it goes back to wandering.
#[must_use]
pub fn crossing_waypoint(world: &World, cell: CellCoord) -> Option<CellCoord> {
    let environment = world.environment();
    if !environment.is_bridge_complete() {
        return None;
    }
    let span = environment.river_span()?;

    let mut nearest: Option<(u32, u32)> = None;
    for row in environment.complete_crossing_rows() {
        let distance = row.abs_diff(cell.row());
        if nearest.map_or(true, |(best, _)| distance < best) {
            nearest = Some((distance, row));
        }
    }
    let (distance, row) = nearest?;

    if cell.column() > span.last_column() && distance <= 2 {
        return None;
    }
    if cell.row() != row {
        return Some(CellCoord::new(cell.column(), row));
    }

    let far_bank = span
        .last_column()
        .saturating_add(1)
        .min(environment.grid().columns().saturating_sub(1));
    Some(CellCoord::new(far_bank, row))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_crew_core::SimulationConfig;

    fn world(lines: &[&str]) -> World {
        World::from_glyphs(lines, &[], SimulationConfig::default()).expect("world")
    }

    #[test]
    fn site_extends_the_rightmost_bridge_eastward() {
        let world = world(&["~~~~", "=~~~", "~=~~"]);
        assert_eq!(bridge_site(&world), Some(CellCoord::new(2, 2)));
    }

    #[test]
    fn site_wraps_around_a_blocked_bridge_head() {
        let world = world(&["~~~~", "~=#~", "~~~~"]);
        assert_eq!(bridge_site(&world), Some(CellCoord::new(1, 0)));
    }

    #[test]
    fn site_scans_outward_from_the_middle_row() {
        let wet = world(&["..~.", "....", "....", ".~..", "~..."]);
        assert_eq!(bridge_site(&wet), Some(CellCoord::new(1, 3)));

        let dry = world(&["...", "..."]);
        assert_eq!(bridge_site(&dry), None);
    }

    #[test]
    fn waypoint_leads_to_the_nearest_crossing_row_then_across() {
        let mut world = world(&["..~~..", "..~~..", "..~~..", "..~~..", "..~~.."]);
        for cell in [
            CellCoord::new(2, 4),
            CellCoord::new(3, 4),
            CellCoord::new(2, 0),
            CellCoord::new(3, 0),
        ] {
            for _ in 0..2 {
                let _ = world.environment_mut().add_bridge_section(cell);
            }
        }

        assert_eq!(
            crossing_waypoint(&world, CellCoord::new(0, 3)),
            Some(CellCoord::new(0, 4))
        );
        assert_eq!(
            crossing_waypoint(&world, CellCoord::new(0, 2)),
            Some(CellCoord::new(0, 0))
        );
        assert_eq!(
            crossing_waypoint(&world, CellCoord::new(1, 4)),
            Some(CellCoord::new(4, 4))
        );
        assert_eq!(crossing_waypoint(&world, CellCoord::new(4, 2)), None);
    }

    #[test]
    fn no_waypoint_before_the_river_is_spanned() {
        let world = world(&["..~..", "..~.."]);
        assert_eq!(crossing_waypoint(&world, CellCoord::new(0, 0)), None);
    }
}
