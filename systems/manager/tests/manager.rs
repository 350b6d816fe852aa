use bridge_crew_core::{AgentId, Cargo, CellCoord, Event, Role, SimulationConfig};
use bridge_crew_system_manager::Manager;
use bridge_crew_system_movement::run_update;
use bridge_crew_world::{Agent, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn build(lines: &[&str], placements: &[(Role, CellCoord)], config: SimulationConfig) -> World {
    World::from_glyphs(lines, placements, config).expect("world")
}

fn agent(world: &World, id: u32) -> Agent {
    *world.roster().get(AgentId::new(id)).expect("agent")
}

fn load(world: &mut World, id: u32) {
    let mut laden = agent(world, id);
    laden.carried = Some(Cargo::Wood);
    world.roster_mut().store(laden);
}

fn update_manager(world: &mut World, events: &mut Vec<Event>) {
    let mut rng = ChaCha8Rng::seed_from_u64(23);
    run_update(world, AgentId::new(0), &mut Manager::new(), &mut rng, events);
}

fn wide_range() -> SimulationConfig {
    SimulationConfig {
        manager_range: 10,
        ..SimulationConfig::default()
    }
}

#[test]
fn idle_gatherer_learns_of_wood_beyond_its_sight() {
    let config = SimulationConfig {
        vision_radius: 2,
        ..SimulationConfig::default()
    };
    let mut world = build(
        &["......T", "#......"],
        &[
            (Role::Manager, CellCoord::new(0, 0)),
            (Role::Gatherer, CellCoord::new(1, 0)),
        ],
        config,
    );
    let mut events = Vec::new();

    update_manager(&mut world, &mut events);

    let resource = CellCoord::new(6, 0);
    assert_eq!(agent(&world, 0).cell, CellCoord::new(0, 0));
    assert_eq!(agent(&world, 1).hint, Some(resource));
    assert_eq!(agent(&world, 1).goal_cell, None);
    assert_eq!(
        events,
        vec![Event::HintIssued {
            manager: AgentId::new(0),
            recipient: AgentId::new(1),
            cell: resource,
        }]
    );
}

#[test]
fn resource_hints_are_measured_from_the_manager() {
    let mut world = build(
        &[
            "T.....#...T",
            ".....#.#...",
            "......#....",
        ],
        &[
            (Role::Manager, CellCoord::new(6, 1)),
            (Role::Gatherer, CellCoord::new(4, 1)),
        ],
        SimulationConfig::default(),
    );
    let mut events = Vec::new();

    update_manager(&mut world, &mut events);

    assert_eq!(agent(&world, 0).cell, CellCoord::new(6, 1));
    assert_eq!(agent(&world, 1).hint, Some(CellCoord::new(10, 0)));
}

#[test]
fn manager_walks_to_the_crossing_row_and_over_it() {
    let config = SimulationConfig {
        vision_radius: 3,
        ..SimulationConfig::default()
    };
    let mut world = build(
        &[
            "....~~.....G",
            "....~~......",
            "....~~......",
            "....~~......",
            "....~~......",
            "....==......",
            "....~~......",
        ],
        &[(Role::Manager, CellCoord::new(1, 1))],
        config,
    );
    assert!(world.environment().is_bridge_complete());
    let mut events = Vec::new();
    let mut path = Vec::new();

    for _ in 0..9 {
        update_manager(&mut world, &mut events);
        path.push(agent(&world, 0).cell);
    }

    assert_eq!(
        path,
        vec![
            CellCoord::new(1, 2),
            CellCoord::new(1, 3),
            CellCoord::new(1, 4),
            CellCoord::new(1, 5),
            CellCoord::new(2, 5),
            CellCoord::new(3, 5),
            CellCoord::new(4, 5),
            CellCoord::new(5, 5),
            CellCoord::new(6, 5),
        ]
    );
}

#[test]
fn laden_builder_goal_is_forced_to_the_global_site() {
    let mut world = build(
        &["~~~", "...", "..."],
        &[
            (Role::Manager, CellCoord::new(0, 2)),
            (Role::Builder, CellCoord::new(2, 2)),
        ],
        wide_range(),
    );
    load(&mut world, 1);
    let mut events = Vec::new();

    update_manager(&mut world, &mut events);

    let builder = agent(&world, 1);
    assert_eq!(builder.hint, Some(CellCoord::new(0, 0)));
    assert_eq!(builder.goal_cell, Some(CellCoord::new(0, 0)));
    assert!(builder.goal_directed);
}

#[test]
fn empty_builder_is_sent_to_the_depot_only_when_stocked() {
    let mut world = build(
        &["D...", "....", "...."],
        &[
            (Role::Manager, CellCoord::new(3, 2)),
            (Role::Builder, CellCoord::new(2, 2)),
        ],
        wide_range(),
    );
    let mut events = Vec::new();

    update_manager(&mut world, &mut events);
    assert_eq!(agent(&world, 1).hint, None);
    assert!(events
        .iter()
        .all(|event| !matches!(event, Event::HintIssued { .. })));

    let _ = world.environment_mut().deposit(2);
    update_manager(&mut world, &mut events);
    assert_eq!(agent(&world, 1).hint, Some(CellCoord::new(0, 0)));
}

#[test]
fn laden_gatherer_is_sent_to_the_depot() {
    let mut world = build(
        &["D..T", "....", "...."],
        &[
            (Role::Manager, CellCoord::new(3, 2)),
            (Role::Gatherer, CellCoord::new(2, 2)),
        ],
        wide_range(),
    );
    load(&mut world, 1);
    let mut events = Vec::new();

    update_manager(&mut world, &mut events);

    assert_eq!(agent(&world, 1).hint, Some(CellCoord::new(0, 0)));
}

#[test]
fn distant_agents_and_fellow_managers_get_nothing() {
    let mut world = build(
        &["T........"],
        &[
            (Role::Manager, CellCoord::new(8, 0)),
            (Role::Manager, CellCoord::new(7, 0)),
            (Role::Gatherer, CellCoord::new(2, 0)),
        ],
        SimulationConfig::default(),
    );
    let mut events = Vec::new();

    update_manager(&mut world, &mut events);

    assert_eq!(agent(&world, 1).hint, None);
    assert_eq!(agent(&world, 2).hint, None);
    assert!(events
        .iter()
        .all(|event| !matches!(event, Event::HintIssued { .. })));
}
