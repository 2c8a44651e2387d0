//! WebSocket protocol message definitions
//! These are the wire types for client-server communication

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The two competing teams in a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Team {
    Red,
    Blue,
}

impl Team {
    /// The opposing team. Total: a match has exactly two teams, so either
    /// value uniquely determines the other.
    pub fn rival(self) -> Team {
        match self {
            Team::Red => Team::Blue,
            Team::Blue => Team::Red,
        }
    }
}

/// Contest state of a single control zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneState {
    /// No owner, no accumulated points
    Neutral,
    /// One team accumulating toward capture
    Gaining,
    /// Fully held by the owning team
    Captured,
    /// The owner's hold is being eroded by the rival team
    Losing,
}

/// Per-zone status sent in snapshots
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneStatus {
    pub name: String,
    pub state: ZoneState,
    pub owner: Option<Team>,
    /// Accumulated control points (0..=max_points)
    pub points: u32,
    /// Points needed for a full capture
    pub max_points: u32,
}

/// Messages sent from client to server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMsg {
    /// Join the match on a team
    Join {
        display_name: String,
        team: Team,
    },

    /// Position report for the current tick
    Position {
        /// Sequence number; stale reports are dropped
        seq: u32,
        /// Position X
        x: f32,
        /// Position Y
        y: f32,
        /// Position Z
        z: f32,
        /// Whether the player is currently alive
        alive: bool,
    },

    /// Ping for latency measurement
    Ping {
        /// Client timestamp
        t: u64,
    },

    /// Leave the match
    Leave,
}

/// Messages sent from server to client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMsg {
    /// Welcome message after connection
    Welcome {
        player_id: Uuid,
        server_time: u64,
        /// Currently loaded map, if any
        map: Option<String>,
    },

    /// Player joined the match
    PlayerJoined {
        player: PlayerInfo,
    },

    /// Player left the match
    PlayerLeft {
        player_id: Uuid,
        reason: String,
    },

    /// Zone status snapshot (sent at regular intervals)
    Snapshot {
        /// Server tick number
        tick: u64,
        /// Currently loaded map
        map: Option<String>,
        /// Status of every zone on the map
        zones: Vec<ZoneStatus>,
    },

    /// A team gained full control of a zone
    ZoneCaptured {
        team: Team,
        zone_name: String,
    },

    /// A team lost a fully-held zone to the rival team.
    /// `team` is the team that now controls the zone.
    ZoneLost {
        team: Team,
        zone_name: String,
    },

    /// A new map was loaded and the zone set rebuilt
    MapChanged {
        map: String,
        zones: Vec<ZoneStatus>,
    },

    /// Match has ended: every zone is held by the winning team
    MatchEnd {
        winning_team: Team,
    },

    /// Error message
    Error {
        code: String,
        message: String,
    },

    /// Pong response
    Pong {
        /// Echo back client timestamp
        t: u64,
    },
}

/// Player info for roster updates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerInfo {
    pub player_id: Uuid,
    pub display_name: String,
    pub team: Team,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rival_is_an_involution() {
        assert_eq!(Team::Red.rival(), Team::Blue);
        assert_eq!(Team::Blue.rival(), Team::Red);
        assert_eq!(Team::Red.rival().rival(), Team::Red);
    }

    #[test]
    fn client_msg_uses_tagged_snake_case() {
        let msg: ClientMsg =
            serde_json::from_str(r#"{"type":"join","display_name":"ada","team":"red"}"#).unwrap();
        match msg {
            ClientMsg::Join { display_name, team } => {
                assert_eq!(display_name, "ada");
                assert_eq!(team, Team::Red);
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[test]
    fn zone_captured_serializes_with_event_tag() {
        let msg = ServerMsg::ZoneCaptured {
            team: Team::Blue,
            zone_name: "North".to_string(),
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains(r#""type":"zone_captured""#));
        assert!(json.contains(r#""team":"blue""#));
    }
}
