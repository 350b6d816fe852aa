//! Per-agent behaviour state and the roster that owns it.

use bridge_crew_core::{AgentId, Cargo, CellCoord, Role};

/// Mutable state carried by a single crew member.
///
/// Role systems work on a copy taken from the [`Roster`] and hand it back
/// with [`Roster::store`] once the agent's update has run to completion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Agent {
    id: AgentId,
    role: Role,
    /// Cell the agent currently stands on.
    pub cell: CellCoord,
    /// Item in hand, if any.
    pub carried: Option<Cargo>,
    /// Current movement target.
    pub goal_cell: Option<CellCoord>,
    /// Whether `goal_cell` was handed down by a manager rather than perceived.
    pub goal_directed: bool,
    /// One-shot directive written by a manager; cleared after the next update.
    pub hint: Option<CellCoord>,
    /// Cell recorded the last time the agent was seen to move.
    pub last_cell: CellCoord,
    /// Consecutive updates spent on `last_cell`.
    pub stuck_count: u32,
    /// Remaining updates of the current recovery window.
    pub ignore_goal_ticks: u32,
}

impl Agent {
    /// Creates an idle, empty-handed agent standing on `cell`.
    #[must_use]
    pub const fn new(id: AgentId, role: Role, cell: CellCoord) -> Self {
        Self {
            id,
            role,
            cell,
            carried: None,
            goal_cell: None,
            goal_directed: false,
            hint: None,
            last_cell: cell,
            stuck_count: 0,
            ignore_goal_ticks: 0,
        }
    }

    /// Identifier assigned at creation.
    #[must_use]
    pub const fn id(&self) -> AgentId {
        self.id
    }

    /// Role assigned at creation; never changes.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Whether the agent has something in hand.
    #[must_use]
    pub const fn is_laden(&self) -> bool {
        self.carried.is_some()
    }

    /// Whether the agent is inside a stuck-recovery window.
    #[must_use]
    pub const fn is_recovering(&self) -> bool {
        self.ignore_goal_ticks > 0
    }

    /// Adopts a goal the agent found on its own.
    pub fn set_goal(&mut self, cell: CellCoord) {
        self.goal_cell = Some(cell);
        self.goal_directed = false;
    }

    /// Adopts a goal handed down by a manager.
    pub fn direct_goal(&mut self, cell: CellCoord) {
        self.goal_cell = Some(cell);
        self.goal_directed = true;
    }

    /// Forgets the current goal.
    pub fn clear_goal(&mut self) {
        self.goal_cell = None;
        self.goal_directed = false;
    }

    /// Adopts the pending hint as the goal, consuming it.
    ///
    /// Returns `true` when a hint was present.
    pub fn adopt_hint(&mut self) -> bool {
        match self.hint.take() {
            Some(cell) => {
                self.direct_goal(cell);
                true
            }
            None => false,
        }
    }
}

/// Directive a manager writes into another agent's state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HintDelivery {
    /// Coordinate the recipient should head for.
    pub cell: CellCoord,
    /// Whether the recipient's goal is overwritten immediately as well.
    pub force_goal: bool,
}

/// Ordered collection of every agent in the run, indexed by [`AgentId`].
#[derive(Clone, Debug, Default)]
pub struct Roster {
    agents: Vec<Agent>,
}

impl Roster {
    /// Creates a roster assigning identifiers in placement order.
    #[must_use]
    pub fn from_placements<I>(placements: I) -> Self
    where
        I: IntoIterator<Item = (Role, CellCoord)>,
    {
        let agents = placements
            .into_iter()
            .enumerate()
            .map(|(index, (role, cell))| {
                let id = AgentId::new(u32::try_from(index).unwrap_or(u32::MAX));
                Agent::new(id, role, cell)
            })
            .collect();
        Self { agents }
    }

    /// Number of agents in the roster.
    #[must_use]
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    /// Whether the roster holds no agents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Iterates agents in roster order.
    pub fn iter(&self) -> impl Iterator<Item = &Agent> {
        self.agents.iter()
    }

    /// Agents as a slice in roster order.
    #[must_use]
    pub fn as_slice(&self) -> &[Agent] {
        &self.agents
    }

    /// Agent with the provided identifier.
    #[must_use]
    pub fn get(&self, id: AgentId) -> Option<&Agent> {
        usize::try_from(id.get())
            .ok()
            .and_then(|index| self.agents.get(index))
    }

    /// Writes an updated copy of an agent back into its slot.
    pub fn store(&mut self, agent: Agent) {
        if let Some(slot) = self.slot_mut(agent.id()) {
            *slot = agent;
        }
    }

    /// Agent other than `me` standing on `cell`, if any.
    #[must_use]
    pub fn occupant_other_than(&self, cell: CellCoord, me: AgentId) -> Option<AgentId> {
        self.agents
            .iter()
            .find(|agent| agent.id() != me && agent.cell == cell)
            .map(Agent::id)
    }

    /// Identifiers in update order: every manager first, then everyone else,
    /// each group in roster order.
    #[must_use]
    pub fn update_order(&self) -> Vec<AgentId> {
        let managers = self
            .agents
            .iter()
            .filter(|agent| agent.role() == Role::Manager);
        let crew = self
            .agents
            .iter()
            .filter(|agent| agent.role() != Role::Manager);
        managers.chain(crew).map(Agent::id).collect()
    }

    /// Delivers a manager directive into another agent's hint slot.
    ///
    /// Returns `false` when no agent has the provided identifier.
    pub fn deliver_hint(&mut self, recipient: AgentId, delivery: HintDelivery) -> bool {
        let Some(agent) = self.slot_mut(recipient) else {
            return false;
        };
        agent.hint = Some(delivery.cell);
        if delivery.force_goal {
            agent.direct_goal(delivery.cell);
        }
        true
    }

    fn slot_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        usize::try_from(id.get())
            .ok()
            .and_then(|index| self.agents.get_mut(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mixed_roster() -> Roster {
        Roster::from_placements([
            (Role::Gatherer, CellCoord::new(0, 0)),
            (Role::Manager, CellCoord::new(1, 0)),
            (Role::Builder, CellCoord::new(2, 0)),
            (Role::Manager, CellCoord::new(3, 0)),
        ])
    }

    #[test]
    fn managers_update_before_the_rest_of_the_crew() {
        let roster = mixed_roster();
        let order: Vec<u32> = roster.update_order().iter().map(AgentId::get).collect();
        assert_eq!(order, vec![1, 3, 0, 2]);
    }

    #[test]
    fn occupancy_ignores_the_asking_agent() {
        let roster = mixed_roster();
        let cell = CellCoord::new(2, 0);
        assert_eq!(roster.occupant_other_than(cell, AgentId::new(2)), None);
        assert_eq!(
            roster.occupant_other_than(cell, AgentId::new(0)),
            Some(AgentId::new(2))
        );
    }

    #[test]
    fn forced_hints_overwrite_the_goal() {
        let mut roster = mixed_roster();
        let target = CellCoord::new(5, 5);
        assert!(roster.deliver_hint(
            AgentId::new(2),
            HintDelivery {
                cell: target,
                force_goal: true,
            },
        ));
        let builder = roster.get(AgentId::new(2)).expect("builder");
        assert_eq!(builder.hint, Some(target));
        assert_eq!(builder.goal_cell, Some(target));
        assert!(builder.goal_directed);

        assert!(!roster.deliver_hint(
            AgentId::new(42),
            HintDelivery {
                cell: target,
                force_goal: false,
            },
        ));
    }

    #[test]
    fn adopting_a_hint_consumes_it() {
        let mut agent = Agent::new(AgentId::new(0), Role::Gatherer, CellCoord::new(0, 0));
        agent.hint = Some(CellCoord::new(3, 1));
        assert!(agent.adopt_hint());
        assert_eq!(agent.hint, None);
        assert_eq!(agent.goal_cell, Some(CellCoord::new(3, 1)));
        assert!(!agent.adopt_hint());
    }
}
