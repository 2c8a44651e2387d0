//! Zone status snapshot cadence

use crate::ws::protocol::ServerMsg;

use super::zone_set::ZoneSet;

/// Decides when to broadcast a zone status snapshot and builds the message
pub struct SnapshotBuilder {
    /// Tick counter since last snapshot
    ticks_since_snapshot: u32,
    /// Snapshot interval in ticks
    snapshot_interval: u32,
}

impl SnapshotBuilder {
    pub fn new(snapshot_interval: u32) -> Self {
        Self {
            ticks_since_snapshot: 0,
            snapshot_interval,
        }
    }

    /// Check if it's time to send a snapshot
    pub fn should_send(&mut self) -> bool {
        self.ticks_since_snapshot += 1;
        if self.ticks_since_snapshot >= self.snapshot_interval {
            self.ticks_since_snapshot = 0;
            true
        } else {
            false
        }
    }

    /// Force a snapshot on the next check (used after zone transitions)
    pub fn force_next(&mut self) {
        self.ticks_since_snapshot = self.snapshot_interval;
    }

    /// Build a snapshot message from the current zone set
    pub fn build(&self, tick: u64, map: Option<&str>, zones: &ZoneSet) -> ServerMsg {
        ServerMsg::Snapshot {
            tick,
            map: map.map(str::to_string),
            zones: zones.statuses(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sends_every_interval_ticks() {
        let mut builder = SnapshotBuilder::new(3);
        assert!(!builder.should_send());
        assert!(!builder.should_send());
        assert!(builder.should_send());
        assert!(!builder.should_send());
    }

    #[test]
    fn force_next_overrides_the_cadence() {
        let mut builder = SnapshotBuilder::new(3);
        builder.force_next();
        assert!(builder.should_send());
        assert!(!builder.should_send());
    }

    #[test]
    fn snapshot_carries_map_and_zone_statuses() {
        let builder = SnapshotBuilder::new(1);
        let zones = ZoneSet::new();
        match builder.build(7, Some("warehouse"), &zones) {
            ServerMsg::Snapshot { tick, map, zones } => {
                assert_eq!(tick, 7);
                assert_eq!(map.as_deref(), Some("warehouse"));
                assert!(zones.is_empty());
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }
}
