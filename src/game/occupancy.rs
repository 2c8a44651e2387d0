//! Spatial occupancy - counting team members inside a zone volume

use std::collections::HashMap;

use crate::ws::protocol::Team;

use super::{PlayerPresence, Vec3};

/// Axis-aligned box spanned by two opposite corners
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    min: Vec3,
    max: Vec3,
}

impl BoundingBox {
    /// Build from two arbitrary opposite corners; corner order does not matter
    pub fn from_corners(p1: Vec3, p2: Vec3) -> Self {
        Self {
            min: Vec3::new(p1.x.min(p2.x), p1.y.min(p2.y), p1.z.min(p2.z)),
            max: Vec3::new(p1.x.max(p2.x), p1.y.max(p2.y), p1.z.max(p2.z)),
        }
    }

    /// Inclusive containment test on every axis
    pub fn contains(&self, p: Vec3) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }
}

/// Count the players of each team standing inside the box.
/// Teams with zero occupants are omitted from the result.
pub fn team_occupancy(bounds: &BoundingBox, players: &[PlayerPresence]) -> HashMap<Team, u32> {
    let mut counts = HashMap::new();
    for player in players {
        if bounds.contains(player.position) {
            *counts.entry(player.team).or_insert(0) += 1;
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn present(team: Team, x: f32, y: f32, z: f32) -> PlayerPresence {
        PlayerPresence {
            team,
            position: Vec3::new(x, y, z),
        }
    }

    #[test]
    fn corners_are_order_independent() {
        let a = BoundingBox::from_corners(Vec3::new(10.0, -5.0, 8.0), Vec3::new(-2.0, 5.0, 0.0));
        let b = BoundingBox::from_corners(Vec3::new(-2.0, 5.0, 0.0), Vec3::new(10.0, -5.0, 8.0));
        assert_eq!(a, b);
        assert!(a.contains(Vec3::new(0.0, 0.0, 4.0)));
    }

    #[test]
    fn containment_is_inclusive_on_faces() {
        let bounds = BoundingBox::from_corners(Vec3::new(0.0, 0.0, 0.0), Vec3::new(4.0, 4.0, 4.0));
        assert!(bounds.contains(Vec3::new(0.0, 4.0, 2.0)));
        assert!(bounds.contains(Vec3::new(4.0, 4.0, 4.0)));
        assert!(!bounds.contains(Vec3::new(4.1, 4.0, 4.0)));
        assert!(!bounds.contains(Vec3::new(2.0, -0.1, 2.0)));
    }

    #[test]
    fn counts_only_players_inside() {
        let bounds = BoundingBox::from_corners(Vec3::new(0.0, 0.0, 0.0), Vec3::new(10.0, 10.0, 10.0));
        let players = [
            present(Team::Red, 1.0, 1.0, 1.0),
            present(Team::Red, 9.0, 9.0, 9.0),
            present(Team::Blue, 5.0, 5.0, 5.0),
            present(Team::Blue, 50.0, 5.0, 5.0), // outside
        ];

        let counts = team_occupancy(&bounds, &players);
        assert_eq!(counts.get(&Team::Red), Some(&2));
        assert_eq!(counts.get(&Team::Blue), Some(&1));
    }

    #[test]
    fn absent_teams_are_omitted() {
        let bounds = BoundingBox::from_corners(Vec3::new(0.0, 0.0, 0.0), Vec3::new(10.0, 10.0, 10.0));
        let players = [present(Team::Red, 1.0, 1.0, 1.0)];

        let counts = team_occupancy(&bounds, &players);
        assert_eq!(counts.len(), 1);
        assert!(!counts.contains_key(&Team::Blue));
    }

    #[test]
    fn no_players_yields_empty_map() {
        let bounds = BoundingBox::from_corners(Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 1.0, 1.0));
        assert!(team_occupancy(&bounds, &[]).is_empty());
    }
}
