//! Plain-text frames of the running world.

use std::fmt::Write as _;

use bridge_crew_core::{CellCoord, Role};
use bridge_crew_world::{glyph, query, World};

/// Letter drawn for an agent; upper-case while it carries wood.
pub(crate) fn agent_letter(role: Role, carrying: bool) -> char {
    let letter = match role {
        Role::Gatherer => 'g',
        Role::Builder => 'b',
        Role::Manager => 'm',
    };
    if carrying {
        letter.to_ascii_uppercase()
    } else {
        letter
    }
}

/// Renders a status line followed by one text row per grid row.
pub(crate) fn frame(world: &World) -> String {
    let grid = query::grid(world);
    let agents = query::agent_view(world).into_vec();
    let mut out = String::new();

    let _ = writeln!(
        out,
        "tick {} | stock {} | sections {} (+{} in progress) | vision {}",
        query::tick_index(world),
        query::resource_stock(world),
        query::completed_sections(world),
        query::sections_in_progress(world),
        query::vision_radius(world).get(),
    );

    for row in 0..grid.rows() {
        for column in 0..grid.columns() {
            let cell = CellCoord::new(column, row);
            let symbol = agents
                .iter()
                .find(|agent| agent.cell == cell)
                .map(|agent| agent_letter(agent.role, agent.carried.is_some()))
                .or_else(|| grid.get(cell).map(glyph))
                .unwrap_or(' ');
            out.push(symbol);
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_crew_core::{AgentId, Cargo, SimulationConfig};

    #[test]
    fn terrain_and_crew_share_the_frame() {
        let mut world = World::from_glyphs(
            &["D.~~.G", "T.~~.."],
            &[
                (Role::Gatherer, CellCoord::new(1, 0)),
                (Role::Builder, CellCoord::new(1, 1)),
                (Role::Manager, CellCoord::new(4, 1)),
            ],
            SimulationConfig::default(),
        )
        .expect("world");
        if let Some(mut builder) = world.roster().get(AgentId::new(1)).copied() {
            builder.carried = Some(Cargo::Wood);
            world.roster_mut().store(builder);
        }

        let rendered = frame(&world);
        let rows: Vec<&str> = rendered.lines().collect();

        assert!(rows[0].starts_with("tick 0 | stock 0"));
        assert_eq!(&rows[1..], ["Dg~~.G", "TB~~m."]);
    }
}
