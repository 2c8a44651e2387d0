//! The collection of zones for the loaded map and the match win condition

use crate::config::maps::ZoneDef;
use crate::ws::protocol::{Team, ZoneState, ZoneStatus};

use super::occupancy::team_occupancy;
use super::zone::{ControlZone, ZoneEvent};
use super::PlayerPresence;

/// Result of advancing every zone by one tick
#[derive(Debug, Default)]
pub struct TickOutcome {
    /// Transition events in zone configuration order
    pub events: Vec<ZoneEvent>,
    /// Set on the single tick where one team ends up holding every zone
    pub winner: Option<Team>,
}

/// All control zones of the currently loaded map, in configuration order
#[derive(Debug, Default)]
pub struct ZoneSet {
    zones: Vec<ControlZone>,
    map: Option<String>,
    win_signaled: bool,
}

impl ZoneSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn map(&self) -> Option<&str> {
        self.map.as_deref()
    }

    pub fn zones(&self) -> &[ControlZone] {
        &self.zones
    }

    /// Wire-level status of every zone, in configuration order
    pub fn statuses(&self) -> Vec<ZoneStatus> {
        self.zones.iter().map(ControlZone::status).collect()
    }

    /// Replace the zone set with the zones configured for `map`.
    ///
    /// Re-loading the map that is already populated is a no-op so in-progress
    /// contests survive redundant map-change notifications. A map with no
    /// configured zones yields an empty set; that is a data situation for the
    /// caller to report, not an error.
    pub fn rebuild(&mut self, map: &str, defs: Option<&[ZoneDef]>, max_points: u32) -> usize {
        if self.map.as_deref() == Some(map) && !self.zones.is_empty() {
            return self.zones.len();
        }

        self.zones.clear();
        self.win_signaled = false;
        self.map = Some(map.to_string());
        if let Some(defs) = defs {
            for def in defs {
                self.zones.push(ControlZone::new(
                    def.name.as_str(),
                    def.point1,
                    def.point2,
                    max_points,
                ));
            }
        }
        self.zones.len()
    }

    /// Drop all zones (match over). The map name is kept so a later rebuild
    /// of the same map starts a fresh round.
    pub fn clear(&mut self) {
        self.zones.clear();
        self.win_signaled = false;
    }

    /// Advance every zone by one tick against the current alive-player
    /// snapshot, collecting transition events and checking the win condition.
    pub fn advance_all(&mut self, players: &[PlayerPresence]) -> TickOutcome {
        let mut events = Vec::new();
        for zone in &mut self.zones {
            let occupancy = team_occupancy(zone.bounds(), players);
            if let Some(event) = zone.advance(&occupancy) {
                events.push(event);
            }
        }
        TickOutcome {
            events,
            winner: self.check_win(),
        }
    }

    // The match is won once every zone is captured by the same team. Signaled
    // at most once per populated set.
    fn check_win(&mut self) -> Option<Team> {
        if self.win_signaled || self.zones.is_empty() {
            return None;
        }
        let mut holder: Option<Team> = None;
        for zone in &self.zones {
            if zone.state() != ZoneState::Captured {
                return None;
            }
            let owner = zone.owner()?;
            if *holder.get_or_insert(owner) != owner {
                return None;
            }
        }
        self.win_signaled = true;
        holder
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Vec3;

    const MAX_POINTS: u32 = 4;

    fn defs() -> Vec<ZoneDef> {
        vec![
            ZoneDef {
                name: "North".to_string(),
                point1: Vec3::new(0.0, 0.0, 0.0),
                point2: Vec3::new(10.0, 10.0, 10.0),
            },
            ZoneDef {
                name: "South".to_string(),
                point1: Vec3::new(20.0, 0.0, 0.0),
                point2: Vec3::new(30.0, 10.0, 10.0),
            },
        ]
    }

    fn squad(team: Team, x: f32, size: usize) -> Vec<PlayerPresence> {
        vec![
            PlayerPresence {
                team,
                position: Vec3::new(x, 5.0, 5.0),
            };
            size
        ]
    }

    fn populated() -> ZoneSet {
        let defs = defs();
        let mut set = ZoneSet::new();
        set.rebuild("warehouse", Some(defs.as_slice()), MAX_POINTS);
        set
    }

    #[test]
    fn rebuild_loads_zones_in_configuration_order() {
        let set = populated();
        assert_eq!(set.len(), 2);
        assert_eq!(set.map(), Some("warehouse"));
        assert_eq!(set.zones()[0].name(), "North");
        assert_eq!(set.zones()[1].name(), "South");
    }

    #[test]
    fn rebuild_without_configuration_yields_empty_set() {
        let mut set = ZoneSet::new();
        assert_eq!(set.rebuild("uncharted", None, MAX_POINTS), 0);
        assert!(set.is_empty());

        let outcome = set.advance_all(&squad(Team::Red, 5.0, 3));
        assert!(outcome.events.is_empty());
        assert_eq!(outcome.winner, None);
    }

    #[test]
    fn rebuilding_the_loaded_map_preserves_contest_state() {
        let defs = defs();
        let mut set = populated();
        set.advance_all(&squad(Team::Red, 5.0, 2));
        assert_eq!(set.zones()[0].points(), 2);

        set.rebuild("warehouse", Some(defs.as_slice()), MAX_POINTS);
        assert_eq!(set.zones()[0].points(), 2, "in-progress contest was reset");

        set.rebuild("depot", Some(defs.as_slice()), MAX_POINTS);
        assert_eq!(set.map(), Some("depot"));
        assert_eq!(set.zones()[0].points(), 0);
    }

    #[test]
    fn same_team_holding_every_zone_wins_once() {
        let mut set = populated();
        let mut players = squad(Team::Red, 5.0, 2);
        players.extend(squad(Team::Red, 25.0, 2));

        let first = set.advance_all(&players);
        assert!(first.events.is_empty());
        assert_eq!(first.winner, None);

        let second = set.advance_all(&players);
        assert_eq!(second.events.len(), 2);
        // Events come out in zone configuration order.
        assert!(
            matches!(&second.events[0], ZoneEvent::Captured { team: Team::Red, zone } if zone == "North")
        );
        assert!(
            matches!(&second.events[1], ZoneEvent::Captured { team: Team::Red, zone } if zone == "South")
        );
        assert_eq!(second.winner, Some(Team::Red));

        // The win is signaled exactly once even if ticks keep coming.
        let third = set.advance_all(&players);
        assert!(third.events.is_empty());
        assert_eq!(third.winner, None);
    }

    #[test]
    fn split_ownership_never_wins() {
        let mut set = populated();
        let mut players = squad(Team::Red, 5.0, 2);
        players.extend(squad(Team::Blue, 25.0, 2));

        for _ in 0..4 {
            let outcome = set.advance_all(&players);
            assert_eq!(outcome.winner, None);
        }
        assert_eq!(set.zones()[0].owner(), Some(Team::Red));
        assert_eq!(set.zones()[1].owner(), Some(Team::Blue));
        assert!(set
            .zones()
            .iter()
            .all(|z| z.state() == ZoneState::Captured));
    }

    #[test]
    fn clear_empties_the_set_and_rearms_rebuild() {
        let mut set = populated();
        let mut players = squad(Team::Red, 5.0, 2);
        players.extend(squad(Team::Red, 25.0, 2));
        set.advance_all(&players);
        let won = set.advance_all(&players);
        assert_eq!(won.winner, Some(Team::Red));

        set.clear();
        assert!(set.is_empty());

        // Same map again: the empty set bypasses the already-populated guard.
        let defs = defs();
        assert_eq!(set.rebuild("warehouse", Some(defs.as_slice()), MAX_POINTS), 2);
        assert_eq!(set.zones()[0].points(), 0);
        let fresh = set.advance_all(&players);
        assert_eq!(fresh.winner, None);
    }
}
