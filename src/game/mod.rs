//! Game simulation modules

pub mod occupancy;
pub mod r#match;
pub mod snapshot;
pub mod zone;
pub mod zone_set;

pub use r#match::{ControlMatch, MatchCommand, MatchHandle};

use crate::ws::protocol::{ClientMsg, Team};
use uuid::Uuid;

/// 3D position in map units
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// A single alive player's contribution to zone contests this tick
#[derive(Debug, Clone, Copy)]
pub struct PlayerPresence {
    pub team: Team,
    pub position: Vec3,
}

/// Player input received from WebSocket
#[derive(Debug, Clone)]
pub struct PlayerInput {
    pub player_id: Uuid,
    pub msg: ClientMsg,
    pub received_at: u64,
}
