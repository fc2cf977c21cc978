//! Read-only snapshot of the simulation world as seen by overlays.
//!
//! The live world model is owned elsewhere; screens only get this view of it.

use crate::Vec3;

/// One side of the match: its diffuse team color plus agent positions.
/// `None` marks an agent whose position has not been received yet.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Team {
    pub color: [f32; 3],
    pub agents: Vec<Option<Vec3>>,
}

impl Team {
    pub fn new(color: [f32; 3]) -> Self {
        Self {
            color,
            agents: Vec::new(),
        }
    }

    /// Known agent positions, in agent order.
    pub fn known_positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.agents.iter().filter_map(|p| *p)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct WorldSnapshot {
    pub left: Team,
    pub right: Team,
    pub ball: Option<Vec3>,
    /// Whether the field model finished loading; overlays draw nothing before.
    pub field_loaded: bool,
}

/// Match measures and state pushed by the simulation server.
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    pub field_width: f32,
    pub field_length: f32,
    pub play_mode: String,
    pub time: f32,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            field_width: 20.0,
            field_length: 30.0,
            play_mode: String::from("BeforeKickOff"),
            time: 0.0,
        }
    }
}

/// Receiver of game state change notifications.
pub trait GameStateListener {
    fn measures_and_rules_changed(&mut self, gs: &GameState);

    fn play_state_changed(&mut self, _gs: &GameState) {}

    fn time_changed(&mut self, _gs: &GameState) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vec3;

    #[test]
    fn known_positions_skips_unknown_agents() {
        let mut t = Team::new([1.0, 0.0, 0.0]);
        t.agents = vec![Some(vec3(1.0, 0.0, 2.0)), None, Some(vec3(-3.0, 0.0, 0.5))];
        let got: Vec<_> = t.known_positions().collect();
        assert_eq!(got, vec![vec3(1.0, 0.0, 2.0), vec3(-3.0, 0.0, 0.5)]);
    }
}
