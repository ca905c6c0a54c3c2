//! Messages describing intended state changes. Actions are the only input
//! the dispatcher accepts, whether they come from local input capture, the
//! shooting system, or the network.

use crate::components::{Health, Inputs, Jetpack, Weapon};
use crate::entity::EntityId;
use crate::level::Level;
use crate::math::Vec3;
use serde::{Deserialize, Serialize};

pub use crate::components::InputName;

/// Authoritative copy of one player's synced components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub id: EntityId,
    pub position: Vec3,
    pub rotation: Vec3,
    pub pitch: f32,
    pub velocity: Vec3,
    pub inputs: Inputs,
    pub health: Option<Health>,
    pub weapon: Option<Weapon>,
    pub jetpack: Option<Jetpack>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Action {
    /// Rebuilds the World from the level grid.
    InitGame {
        player_ids: Vec<EntityId>,
        now_ms: u64,
        /// Falls back to the World's current level when absent.
        level: Option<Level>,
    },
    SetScreenSize {
        width: f32,
        height: f32,
    },
    SetAspectRatio {
        aspect: f32,
    },
    SetPlayerInput {
        id: EntityId,
        input: String,
        value: bool,
    },
    SetPlayerAim {
        id: EntityId,
        yaw: f32,
        pitch: f32,
    },
    ShootBullet {
        id: EntityId,
    },
    PlayerJoin {
        id: EntityId,
    },
    PlayerLeave {
        id: EntityId,
    },
    SpawnPlayer {
        id: EntityId,
        position: Vec3,
    },
    HitPlayer {
        id: EntityId,
        amount: i32,
    },
    KillPlayer {
        id: EntityId,
    },
    SyncPlayer {
        player: PlayerSnapshot,
    },
    SyncGameState {
        players: Vec<PlayerSnapshot>,
    },
    /// An action relayed by the server.
    ServerAction {
        action: Box<Action>,
    },
    /// An action addressed to a single client.
    ClientAction {
        client_id: EntityId,
        action: Box<Action>,
    },
    /// Placeholder for kinds this build does not know; always ignored.
    Unknown {
        kind: String,
    },
}

impl Action {
    pub fn set_input(id: impl Into<EntityId>, input: InputName, value: bool) -> Self {
        Action::SetPlayerInput {
            id: id.into(),
            input: input.as_str().to_string(),
            value,
        }
    }

    pub fn from_server(action: Action) -> Self {
        Action::ServerAction {
            action: Box::new(action),
        }
    }

    pub fn for_client(client_id: EntityId, action: Action) -> Self {
        Action::ClientAction {
            client_id,
            action: Box::new(action),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Action::InitGame { .. } => "InitGame",
            Action::SetScreenSize { .. } => "SetScreenSize",
            Action::SetAspectRatio { .. } => "SetAspectRatio",
            Action::SetPlayerInput { .. } => "SetPlayerInput",
            Action::SetPlayerAim { .. } => "SetPlayerAim",
            Action::ShootBullet { .. } => "ShootBullet",
            Action::PlayerJoin { .. } => "PlayerJoin",
            Action::PlayerLeave { .. } => "PlayerLeave",
            Action::SpawnPlayer { .. } => "SpawnPlayer",
            Action::HitPlayer { .. } => "HitPlayer",
            Action::KillPlayer { .. } => "KillPlayer",
            Action::SyncPlayer { .. } => "SyncPlayer",
            Action::SyncGameState { .. } => "SyncGameState",
            Action::ServerAction { .. } => "ServerAction",
            Action::ClientAction { .. } => "ClientAction",
            Action::Unknown { .. } => "Unknown",
        }
    }

    /// The entity this action is about, if it names exactly one.
    pub fn target(&self) -> Option<&EntityId> {
        match self {
            Action::SetPlayerInput { id, .. }
            | Action::SetPlayerAim { id, .. }
            | Action::ShootBullet { id }
            | Action::PlayerJoin { id }
            | Action::PlayerLeave { id }
            | Action::SpawnPlayer { id, .. }
            | Action::HitPlayer { id, .. }
            | Action::KillPlayer { id } => Some(id),
            Action::SyncPlayer { player } => Some(&player.id),
            Action::ServerAction { action } | Action::ClientAction { action, .. } => {
                action.target()
            }
            _ => None,
        }
    }

    /// Strips any relay envelopes.
    pub fn innermost(&self) -> &Action {
        match self {
            Action::ServerAction { action } | Action::ClientAction { action, .. } => {
                action.innermost()
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_input_uses_wire_name() {
        let action = Action::set_input("p1", InputName::Jump, true);
        match action {
            Action::SetPlayerInput { id, input, value } => {
                assert_eq!(id.as_str(), "p1");
                assert_eq!(input, "jump");
                assert!(value);
            }
            _ => panic!("Wrong action kind"),
        }
    }

    #[test]
    fn test_target_sees_through_envelopes() {
        let inner = Action::ShootBullet { id: "p2".into() };
        let wrapped = Action::from_server(Action::for_client("p1".into(), inner));
        assert_eq!(wrapped.target().map(|id| id.as_str()), Some("p2"));
        assert_eq!(wrapped.innermost().kind(), "ShootBullet");
        assert_eq!(wrapped.kind(), "ServerAction");
    }

    #[test]
    fn test_untargeted_actions() {
        assert!(Action::SetAspectRatio { aspect: 1.5 }.target().is_none());
        assert!(Action::Unknown {
            kind: "Emote".into()
        }
        .target()
        .is_none());
    }

    #[test]
    fn test_action_serialization() {
        let action = Action::from_server(Action::SetPlayerAim {
            id: "p1".into(),
            yaw: 0.5,
            pitch: -0.25,
        });
        let bytes = bincode::serialize(&action).unwrap();
        let decoded: Action = bincode::deserialize(&bytes).unwrap();
        assert_eq!(decoded, action);
    }
}
