//! Client-side game state: the predicted World and its link to the server.

use crate::network::NetworkEvent;
use log::{info, warn};
use shared::level::Level;
use shared::sync::ClientSession;
use shared::{update, Action, EntityId, Packet, World};

/// Player id used until the server assigns one.
pub const LOCAL_PLAYER: &str = "local";

#[derive(Debug, Clone, PartialEq)]
pub enum LinkStatus {
    Offline,
    Connecting,
    Online,
    Lost { reason: String },
}

pub struct ClientGame {
    pub world: World,
    pub session: ClientSession,
    pub status: LinkStatus,
    /// Set when the World was rebuilt and held inputs must be re-sent.
    world_replaced: bool,
}

impl ClientGame {
    /// Boots a single-player World so there is something to play before
    /// (or without) a server.
    pub fn new(now_ms: u64) -> Self {
        let player = EntityId::new(LOCAL_PLAYER);
        let mut world = World::empty(now_ms);
        let session = ClientSession::new(player.clone());
        session.dispatch_local(
            &mut world,
            Action::InitGame {
                player_ids: vec![player],
                now_ms,
                level: Some(Level::arena()),
            },
        );
        Self {
            world,
            session,
            status: LinkStatus::Offline,
            world_replaced: false,
        }
    }

    pub fn local_player(&self) -> &EntityId {
        &self.session.player_id
    }

    /// The local player's (yaw, pitch), zero when it has no body.
    pub fn local_aim(&self) -> (f32, f32) {
        self.world
            .entity(self.local_player())
            .transform
            .as_ref()
            .map(|t| (t.yaw(), t.pitch()))
            .unwrap_or((0.0, 0.0))
    }

    pub fn connecting(&mut self) {
        self.status = LinkStatus::Connecting;
    }

    /// Applies a locally produced action and returns the packet to send,
    /// if any.
    pub fn apply_local(&mut self, action: Action) -> Option<Packet> {
        self.session
            .dispatch_local(&mut self.world, action)
            .map(Packet::dispatch)
    }

    /// Folds one network event into the game.
    pub fn handle_event(&mut self, event: NetworkEvent, now_ms: u64) {
        match event {
            NetworkEvent::Packet(packet) => self.handle_packet(packet, now_ms),
            NetworkEvent::LinkUp => self.link_up(),
            NetworkEvent::LinkDown { reason } => self.link_down(reason),
        }
    }

    pub fn handle_packet(&mut self, packet: Packet, now_ms: u64) {
        match packet {
            Packet::Welcome { player_id } => {
                info!("Server assigned player {}", player_id);
                self.session.player_id = player_id;
                self.status = LinkStatus::Online;
            }
            Packet::Dispatch { action } => {
                let rebuilds = matches!(action.innermost(), Action::InitGame { .. });
                if self.session.accept_remote(&mut self.world, action, now_ms) && rebuilds {
                    self.world_replaced = true;
                }
            }
            Packet::Disconnected { reason } => self.link_down(reason),
            Packet::Heartbeat => {}
            other => warn!("Unexpected packet from server: {:?}", other),
        }
    }

    /// A link that comes back after being lost resumes as online once the
    /// server has assigned this peer a player.
    fn link_up(&mut self) {
        self.status = match self.status {
            LinkStatus::Online => LinkStatus::Online,
            LinkStatus::Lost { .. } if self.local_player().as_str() != LOCAL_PLAYER => {
                info!("Server is reachable again");
                LinkStatus::Online
            }
            _ => LinkStatus::Connecting,
        };
    }

    /// Keeps playing on the current World with network forwarding off.
    pub fn link_down(&mut self, reason: String) {
        warn!("Lost server: {}", reason);
        self.session.link_down();
        self.status = LinkStatus::Lost { reason };
    }

    /// True once after each server-driven World rebuild.
    pub fn take_world_replaced(&mut self) -> bool {
        std::mem::take(&mut self.world_replaced)
    }

    /// Advances the simulation to `now_ms`.
    pub fn frame(&mut self, now_ms: u64) {
        update(&mut self.world, now_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{Group, InputName};

    fn welcome(game: &mut ClientGame, id: &str) {
        game.handle_packet(
            Packet::Welcome {
                player_id: id.into(),
            },
            0,
        );
    }

    #[test]
    fn test_boots_offline_with_local_player() {
        let game = ClientGame::new(0);
        assert_eq!(game.local_player().as_str(), LOCAL_PLAYER);
        assert_eq!(game.status, LinkStatus::Offline);
        assert!(game.world.contains(game.local_player()));
        assert!(game.world.count_group(Group::Wall) > 0);
    }

    #[test]
    fn test_offline_inputs_stay_local() {
        let mut game = ClientGame::new(0);
        let packet = game.apply_local(Action::set_input(LOCAL_PLAYER, InputName::Forward, true));
        assert!(packet.is_none());

        let me = game.world.entity(game.local_player());
        assert!(me.controller.unwrap().inputs.forward);
    }

    #[test]
    fn test_welcome_then_init_swaps_world() {
        let mut game = ClientGame::new(0);
        welcome(&mut game, "p2");
        assert_eq!(game.status, LinkStatus::Online);

        let init = Action::from_server(Action::for_client(
            "p2".into(),
            Action::InitGame {
                player_ids: vec!["p1".into(), "p2".into()],
                now_ms: 999_999,
                level: Some(Level::arena()),
            },
        ));
        game.handle_packet(Packet::dispatch(init), 500);

        assert!(game.take_world_replaced());
        assert!(!game.take_world_replaced());
        assert!(game.world.contains(&"p2".into()));
        assert!(!game.world.contains(&LOCAL_PLAYER.into()));
        assert_eq!(game.world.clock.start, 500);
        assert!(game.session.online);
    }

    #[test]
    fn test_online_inputs_are_forwarded() {
        let mut game = ClientGame::new(0);
        welcome(&mut game, "p1");
        game.handle_packet(
            Packet::dispatch(Action::from_server(Action::PlayerJoin { id: "p9".into() })),
            0,
        );

        let packet = game.apply_local(Action::set_input("p1", InputName::Jump, true));
        assert_eq!(
            packet,
            Some(Packet::dispatch(Action::set_input("p1", InputName::Jump, true)))
        );

        let screen = game.apply_local(Action::SetScreenSize {
            width: 800.0,
            height: 600.0,
        });
        assert!(screen.is_none());
    }

    #[test]
    fn test_link_down_keeps_world() {
        let mut game = ClientGame::new(0);
        welcome(&mut game, "p1");
        game.handle_packet(
            Packet::dispatch(Action::from_server(Action::PlayerJoin { id: "p1".into() })),
            0,
        );
        let entities = game.world.entities.len();

        game.handle_event(
            NetworkEvent::LinkDown {
                reason: "timeout".into(),
            },
            0,
        );

        assert!(!game.session.online);
        assert_eq!(
            game.status,
            LinkStatus::Lost {
                reason: "timeout".into()
            }
        );
        assert_eq!(game.world.entities.len(), entities);
    }

    #[test]
    fn test_unanswered_connect_reports_lost() {
        let mut game = ClientGame::new(0);
        game.connecting();
        game.handle_event(
            NetworkEvent::LinkDown {
                reason: "no reply from server".into(),
            },
            0,
        );
        assert!(matches!(game.status, LinkStatus::Lost { .. }));

        game.handle_event(NetworkEvent::LinkUp, 0);
        assert_eq!(game.status, LinkStatus::Connecting);
    }

    #[test]
    fn test_link_recovers_after_loss() {
        let mut game = ClientGame::new(0);
        welcome(&mut game, "p1");
        game.handle_event(
            NetworkEvent::LinkDown {
                reason: "timeout".into(),
            },
            0,
        );
        game.handle_event(NetworkEvent::LinkUp, 0);
        assert_eq!(game.status, LinkStatus::Online);

        game.handle_packet(
            Packet::dispatch(Action::from_server(Action::PlayerJoin { id: "p9".into() })),
            0,
        );
        assert!(game.session.online);
        assert!(game.world.player_ids.contains(&"p9".into()));
    }

    #[test]
    fn test_frame_advances_clock() {
        let mut game = ClientGame::new(100);
        game.frame(116);
        assert_eq!(game.world.clock.elapsed, 16);
        game.frame(150);
        assert_eq!(game.world.clock.elapsed, 50);
    }
}
