//! Match state and authoritative tick loop

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::{broadcast, mpsc};
use tokio::time::interval;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::maps::MapRegistry;
use crate::config::Config;
use crate::util::time::{tick_duration, unix_millis, CONTROL_TPS, SNAPSHOT_INTERVAL_TICKS};
use crate::ws::protocol::{ClientMsg, PlayerInfo, ServerMsg, Team};

use super::snapshot::SnapshotBuilder;
use super::zone::ZoneEvent;
use super::zone_set::ZoneSet;
use super::{PlayerInput, PlayerPresence, Vec3};

/// Match phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPhase {
    /// No zones loaded; contest updates suspended
    Waiting,
    /// Zones loaded, contest running
    InProgress,
    /// One team holds every zone; waiting for the next map change
    Ended,
}

impl MatchPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            MatchPhase::Waiting => "waiting",
            MatchPhase::InProgress => "in_progress",
            MatchPhase::Ended => "ended",
        }
    }
}

/// Player state tracked by the match task (authoritative)
#[derive(Debug, Clone)]
pub struct PlayerState {
    pub player_id: Uuid,
    pub display_name: String,
    pub team: Team,
    pub position: Vec3,
    pub alive: bool,
    pub last_input_seq: u32,
    pub joined_at: u64,
}

/// Observable match state for the HTTP layer
#[derive(Debug, Clone)]
pub struct MatchStatus {
    pub map: Option<String>,
    pub phase: MatchPhase,
    pub zone_count: usize,
    pub player_count: usize,
    pub winner: Option<Team>,
}

impl Default for MatchStatus {
    fn default() -> Self {
        Self {
            map: None,
            phase: MatchPhase::Waiting,
            zone_count: 0,
            player_count: 0,
            winner: None,
        }
    }
}

/// Lifecycle commands from the outside world
#[derive(Debug, Clone)]
pub enum MatchCommand {
    /// A new map was loaded; rebuild the zone set from configuration
    ChangeMap(String),
}

/// Handle to the running match task
#[derive(Clone)]
pub struct MatchHandle {
    pub input_tx: mpsc::Sender<PlayerInput>,
    pub command_tx: mpsc::Sender<MatchCommand>,
    pub events_tx: broadcast::Sender<ServerMsg>,
    pub status: Arc<RwLock<MatchStatus>>,
}

/// The authoritative control-zone match
pub struct ControlMatch {
    map: Option<String>,
    phase: MatchPhase,
    tick: u64,
    max_points: u32,
    winner: Option<Team>,
    players: HashMap<Uuid, PlayerState>,
    zones: ZoneSet,
    registry: MapRegistry,
    input_rx: mpsc::Receiver<PlayerInput>,
    command_rx: mpsc::Receiver<MatchCommand>,
    events_tx: broadcast::Sender<ServerMsg>,
    snapshot: SnapshotBuilder,
    status: Arc<RwLock<MatchStatus>>,
}

impl ControlMatch {
    /// Create the match task and its handle
    pub fn new(config: &Config, registry: MapRegistry) -> (Self, MatchHandle) {
        let (input_tx, input_rx) = mpsc::channel(256);
        let (command_tx, command_rx) = mpsc::channel(16);
        let (events_tx, _) = broadcast::channel(64);
        let status = Arc::new(RwLock::new(MatchStatus::default()));

        let handle = MatchHandle {
            input_tx,
            command_tx,
            events_tx: events_tx.clone(),
            status: status.clone(),
        };

        let control_match = Self {
            map: None,
            phase: MatchPhase::Waiting,
            tick: 0,
            max_points: CONTROL_TPS * config.capture_seconds,
            winner: None,
            players: HashMap::new(),
            zones: ZoneSet::new(),
            registry,
            input_rx,
            command_rx,
            events_tx,
            snapshot: SnapshotBuilder::new(SNAPSHOT_INTERVAL_TICKS),
            status,
        };

        (control_match, handle)
    }

    /// Run the authoritative tick loop
    pub async fn run(mut self) {
        info!(tps = CONTROL_TPS, max_points = self.max_points, "Control match task started");

        let mut ticker = interval(tick_duration());
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            self.process_commands();
            self.process_inputs();
            self.run_tick();
        }
    }

    /// Drain pending lifecycle commands
    fn process_commands(&mut self) {
        while let Ok(command) = self.command_rx.try_recv() {
            match command {
                MatchCommand::ChangeMap(map) => self.change_map(map),
            }
        }
    }

    /// Drain pending player inputs
    fn process_inputs(&mut self) {
        while let Ok(input) = self.input_rx.try_recv() {
            match input.msg {
                ClientMsg::Join { display_name, team } => {
                    self.handle_join(input.player_id, display_name, team);
                }
                ClientMsg::Position { seq, x, y, z, alive } => {
                    self.handle_position(input.player_id, seq, Vec3::new(x, y, z), alive);
                }
                ClientMsg::Ping { t } => {
                    let _ = self.events_tx.send(ServerMsg::Pong { t });
                }
                ClientMsg::Leave => {
                    self.handle_leave(input.player_id);
                }
            }
        }
    }

    /// Rebuild the zone set for a newly loaded map
    fn change_map(&mut self, map: String) {
        let defs = self.registry.zones_for(&map);
        let zone_count = self.zones.rebuild(&map, defs, self.max_points);

        if zone_count == 0 {
            // Data situation, not an error: contest stays suspended until a
            // configured map loads.
            warn!(map = %map, "No control zones configured for map");
            self.phase = MatchPhase::Waiting;
        } else {
            info!(map = %map, zones = zone_count, "Zone set rebuilt");
            self.phase = MatchPhase::InProgress;
            self.winner = None;
        }
        self.map = Some(map.clone());

        let _ = self.events_tx.send(ServerMsg::MapChanged {
            map,
            zones: self.zones.statuses(),
        });
        self.snapshot.force_next();
        self.publish_status();
    }

    /// Handle player join request
    fn handle_join(&mut self, player_id: Uuid, display_name: String, team: Team) {
        if self.players.contains_key(&player_id) {
            warn!(player_id = %player_id, "Player already in match");
            let _ = self.events_tx.send(ServerMsg::Error {
                code: "already_joined".to_string(),
                message: "Player already joined this match".to_string(),
            });
            return;
        }

        // Not alive until the first position report places the player on the
        // map; an unplaced player must not count toward any zone.
        let player = PlayerState {
            player_id,
            display_name: display_name.clone(),
            team,
            position: Vec3::default(),
            alive: false,
            last_input_seq: 0,
            joined_at: unix_millis(),
        };
        self.players.insert(player_id, player);

        let _ = self.events_tx.send(ServerMsg::PlayerJoined {
            player: PlayerInfo {
                player_id,
                display_name,
                team,
            },
        });

        info!(
            player_id = %player_id,
            team = ?team,
            player_count = self.players.len(),
            "Player joined match"
        );
        self.publish_status();
    }

    /// Handle a position report; stale reports are dropped
    fn handle_position(&mut self, player_id: Uuid, seq: u32, position: Vec3, alive: bool) {
        if let Some(player) = self.players.get_mut(&player_id) {
            if seq > player.last_input_seq {
                player.last_input_seq = seq;
                player.position = position;
                player.alive = alive;
            }
        }
    }

    /// Handle player leave
    fn handle_leave(&mut self, player_id: Uuid) {
        if self.players.remove(&player_id).is_some() {
            let _ = self.events_tx.send(ServerMsg::PlayerLeft {
                player_id,
                reason: "disconnected".to_string(),
            });
            info!(player_id = %player_id, "Player left match");
            self.publish_status();
        }
    }

    /// Run a single contest tick
    fn run_tick(&mut self) {
        self.tick += 1;
        if self.phase != MatchPhase::InProgress {
            return;
        }

        let presence = self.alive_presence();
        let outcome = self.zones.advance_all(&presence);

        for event in &outcome.events {
            self.announce(event);
        }
        if !outcome.events.is_empty() {
            self.snapshot.force_next();
        }

        if let Some(winner) = outcome.winner {
            self.finish_match(winner);
            return;
        }

        if self.snapshot.should_send() {
            let _ = self
                .events_tx
                .send(self.snapshot.build(self.tick, self.map.as_deref(), &self.zones));
        }
    }

    /// Read-only snapshot of alive players used for zone occupancy this tick
    fn alive_presence(&self) -> Vec<PlayerPresence> {
        self.players
            .values()
            .filter(|p| p.alive)
            .map(|p| PlayerPresence {
                team: p.team,
                position: p.position,
            })
            .collect()
    }

    /// Broadcast a zone transition to all clients
    fn announce(&self, event: &ZoneEvent) {
        let msg = match event {
            ZoneEvent::Captured { team, zone } => {
                info!(zone = %zone, team = ?team, "Zone captured");
                ServerMsg::ZoneCaptured {
                    team: *team,
                    zone_name: zone.clone(),
                }
            }
            ZoneEvent::Lost { team, zone } => {
                info!(zone = %zone, new_owner = ?team, "Zone lost");
                ServerMsg::ZoneLost {
                    team: *team,
                    zone_name: zone.clone(),
                }
            }
        };
        let _ = self.events_tx.send(msg);
    }

    /// End the match: announce the winner once and stop contest updates
    fn finish_match(&mut self, winner: Team) {
        info!(team = ?winner, map = ?self.map, "All zones held, match over");
        let _ = self.events_tx.send(ServerMsg::MatchEnd {
            winning_team: winner,
        });
        self.phase = MatchPhase::Ended;
        self.winner = Some(winner);
        self.zones.clear();
        self.publish_status();
    }

    /// Publish observable state for the HTTP layer
    fn publish_status(&self) {
        let mut status = self.status.write();
        status.map = self.map.clone();
        status.phase = self.phase;
        status.zone_count = self.zones.len();
        status.player_count = self.players.len();
        status.winner = self.winner;
    }
}
