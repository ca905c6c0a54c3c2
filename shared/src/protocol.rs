//! Datagrams exchanged between client and server.
//!
//! Every datagram is one bincode-encoded [`Packet`]. Game traffic travels
//! as [`Packet::Dispatch`], carrying the same [`Action`] values the
//! dispatcher consumes; the remaining variants manage the session.

use crate::action::Action;
use crate::entity::EntityId;
use serde::{Deserialize, Serialize};

/// Bumped whenever `Packet` or anything it carries changes shape.
pub const PROTOCOL_VERSION: u32 = 1;

/// Largest datagram either side will try to read.
pub const MAX_PACKET_SIZE: usize = 64 * 1024;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Packet {
    Connect { client_version: u32 },
    Welcome { player_id: EntityId },
    Dispatch { action: Action },
    Heartbeat,
    Disconnect,
    Disconnected { reason: String },
}

impl Packet {
    pub fn encode(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    pub fn decode(bytes: &[u8]) -> Result<Packet, bincode::Error> {
        bincode::deserialize(bytes)
    }

    pub fn dispatch(action: Action) -> Self {
        Packet::Dispatch { action }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::InputName;
    use crate::world::World;

    #[test]
    fn test_connect_roundtrip() {
        let packet = Packet::Connect {
            client_version: PROTOCOL_VERSION,
        };
        let bytes = packet.encode().unwrap();
        assert_eq!(Packet::decode(&bytes).unwrap(), packet);
    }

    #[test]
    fn test_snapshot_fits_in_one_datagram() {
        let mut world = World::build(
            crate::level::Level::arena(),
            &["p1".into(), "p2".into(), "p3".into(), "p4".into()],
            0,
        );
        crate::dispatch::dispatch(&mut world, &Action::set_input("p1", InputName::Jump, true));
        let packet = Packet::dispatch(Action::from_server(Action::SyncGameState {
            players: world.snapshot_players(),
        }));
        let bytes = packet.encode().unwrap();
        assert!(bytes.len() < MAX_PACKET_SIZE);
        assert_eq!(Packet::decode(&bytes).unwrap(), packet);
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(Packet::decode(&[]).is_err());
        assert!(Packet::decode(&[0xff, 0xff, 0xff, 0xff, 0x01]).is_err());
    }

    #[test]
    fn test_truncated_packet_is_rejected() {
        let bytes = Packet::Disconnected {
            reason: "server full".to_string(),
        }
        .encode()
        .unwrap();
        assert!(Packet::decode(&bytes[..bytes.len() - 3]).is_err());
    }
}
