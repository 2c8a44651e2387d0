//! Per-zone contest state machine

use std::collections::HashMap;

use crate::ws::protocol::{Team, ZoneState, ZoneStatus};

use super::occupancy::BoundingBox;
use super::Vec3;

/// Discrete contest transition emitted by [`ControlZone::advance`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ZoneEvent {
    /// A team accumulated enough points to fully hold the zone
    Captured { team: Team, zone: String },
    /// A previously fully-held zone flipped; `team` is the new owner
    Lost { team: Team, zone: String },
}

/// A single contested zone: geometry plus contest state
#[derive(Debug, Clone)]
pub struct ControlZone {
    name: String,
    bounds: BoundingBox,
    state: ZoneState,
    owner: Option<Team>,
    points: u32,
    max_points: u32,
}

impl ControlZone {
    pub fn new(name: impl Into<String>, point1: Vec3, point2: Vec3, max_points: u32) -> Self {
        Self {
            name: name.into(),
            bounds: BoundingBox::from_corners(point1, point2),
            state: ZoneState::Neutral,
            owner: None,
            points: 0,
            max_points,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    pub fn state(&self) -> ZoneState {
        self.state
    }

    pub fn owner(&self) -> Option<Team> {
        self.owner
    }

    pub fn points(&self) -> u32 {
        self.points
    }

    /// Wire-level status for snapshots
    pub fn status(&self) -> ZoneStatus {
        ZoneStatus {
            name: self.name.clone(),
            state: self.state,
            owner: self.owner,
            points: self.points,
            max_points: self.max_points,
        }
    }

    /// Advance the contest by one tick given the current per-team occupancy
    /// (teams with zero occupants omitted). Returns the transition event for
    /// this tick, if any.
    pub fn advance(&mut self, occupancy: &HashMap<Team, u32>) -> Option<ZoneEvent> {
        let event = self.step(occupancy);
        self.assert_consistent();
        event
    }

    fn step(&mut self, occupancy: &HashMap<Team, u32>) -> Option<ZoneEvent> {
        let red = occupancy.get(&Team::Red).copied().unwrap_or(0);
        let blue = occupancy.get(&Team::Blue).copied().unwrap_or(0);

        if red == 0 && blue == 0 {
            // An untouched zone never decays while fully neutral or fully
            // captured. A half-contested zone snaps back once vacated.
            match self.state {
                ZoneState::Neutral | ZoneState::Captured => {}
                ZoneState::Gaining => {
                    self.state = ZoneState::Neutral;
                    self.owner = None;
                    self.points = 0;
                }
                ZoneState::Losing => {
                    self.state = ZoneState::Captured;
                    self.points = self.max_points;
                }
            }
            return None;
        }

        // Equal presence is a stalemate: nothing moves.
        if red > 0 && blue > 0 && red == blue {
            return None;
        }

        let leader = if red > blue { Team::Red } else { Team::Blue };

        if self.state == ZoneState::Neutral {
            self.owner = Some(leader);
            self.state = ZoneState::Gaining;
        }

        let owner = self.owner.expect("contested zone must have an owner");
        let (own_count, rival_count) = match owner {
            Team::Red => (red, blue),
            Team::Blue => (blue, red),
        };
        let delta = i64::from(own_count) - i64::from(rival_count);

        if leader == owner {
            if self.state == ZoneState::Captured {
                return None;
            }
            let total = i64::from(self.points) + delta;
            if total >= i64::from(self.max_points) {
                self.points = self.max_points;
                self.state = ZoneState::Captured;
                return Some(ZoneEvent::Captured {
                    team: owner,
                    zone: self.name.clone(),
                });
            }
            self.points = total as u32;
            return None;
        }

        // The rival outnumbers the owner: erode the owner's hold.
        if self.state == ZoneState::Captured {
            self.state = ZoneState::Losing;
        }
        let total = i64::from(self.points) + delta;
        if total > 0 {
            self.points = total as u32;
            return None;
        }

        let was_losing = self.state == ZoneState::Losing;
        if total == 0 {
            // Exactly drained: back to neutral ground, nobody gains it yet
            // and no loss is announced.
            self.state = ZoneState::Neutral;
            self.owner = None;
            self.points = 0;
            return None;
        }

        // Drained past zero: ownership flips and the overshoot seeds the new
        // owner's accumulation.
        let new_owner = owner.rival();
        self.owner = Some(new_owner);
        self.points = (-total) as u32;
        self.state = ZoneState::Gaining;
        if was_losing {
            return Some(ZoneEvent::Lost {
                team: new_owner,
                zone: self.name.clone(),
            });
        }
        None
    }

    // Internal-consistency checks; a violation is a logic defect, not a
    // recoverable condition.
    fn assert_consistent(&self) {
        debug_assert!(
            self.points <= self.max_points,
            "zone '{}': points {} above max {}",
            self.name,
            self.points,
            self.max_points
        );
        debug_assert!(
            (self.state != ZoneState::Captured) || self.points == self.max_points,
            "zone '{}': captured without full points",
            self.name
        );
        debug_assert!(
            (self.state != ZoneState::Neutral) || (self.points == 0 && self.owner.is_none()),
            "zone '{}': neutral with residual owner or points",
            self.name
        );
        debug_assert!(
            self.owner.is_some() == (self.state != ZoneState::Neutral),
            "zone '{}': owner must be set exactly when non-neutral",
            self.name
        );
    }
}
