//! Keeping peers' Worlds in step.
//!
//! The server is authoritative. A client applies its own input and aim
//! immediately and forwards them; the server validates each forwarded
//! action, applies it and relays it to every client inside a
//! `ServerAction`. Snapshots from the server overwrite a player's synced
//! components wholesale, which corrects whatever prediction drift has built
//! up since the last one.
//!
//! Neither side ever blocks on the other: a client whose link is down keeps
//! dispatching locally, and the server never waits for a client to confirm
//! anything.

use crate::action::{Action, PlayerSnapshot};
use crate::dispatch::dispatch;
use crate::entity::EntityId;
use crate::math::Vec3;
use crate::world::World;
use log::{debug, info, warn};
use std::collections::BTreeMap;

/// Where a locally originated action goes after it is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Local,
    LocalAndForward,
}

/// Only a player's own input and aim leave the client. Shots are replayed
/// by every peer's shooting system from the relayed inputs, and screen or
/// offline setup concerns this peer alone.
pub fn route_local(action: &Action) -> Route {
    match action {
        Action::SetPlayerInput { .. } | Action::SetPlayerAim { .. } => Route::LocalAndForward,
        _ => Route::Local,
    }
}

#[derive(Debug, Clone)]
pub struct ClientSession {
    pub player_id: EntityId,
    pub online: bool,
    pub prediction: bool,
}

impl ClientSession {
    pub fn new(player_id: EntityId) -> Self {
        Self {
            player_id,
            online: false,
            prediction: true,
        }
    }

    /// Applies a locally originated action and returns it when it should
    /// also be sent to the server.
    pub fn dispatch_local(&self, world: &mut World, action: Action) -> Option<Action> {
        dispatch(world, &action);
        match route_local(&action) {
            Route::LocalAndForward if self.online => Some(action),
            _ => None,
        }
    }

    /// Applies an action received from the server. Returns whether it
    /// reached the dispatcher.
    pub fn accept_remote(&mut self, world: &mut World, action: Action, now_ms: u64) -> bool {
        let action = match action {
            Action::ServerAction { action } => {
                if !self.online {
                    info!("Link to server is up");
                }
                self.online = true;
                *action
            }
            other => other,
        };

        let action = match action {
            Action::ClientAction { client_id, action } => {
                if client_id != self.player_id {
                    debug!("Dropping action addressed to {}", client_id);
                    return false;
                }
                *action
            }
            other => other,
        };

        let action = match action {
            Action::InitGame {
                player_ids, level, ..
            } => Action::InitGame {
                player_ids,
                now_ms,
                level,
            },
            other => other,
        };

        if self.is_own_echo(&action) {
            return false;
        }

        let mut action = action;
        self.keep_own_controls(world, &mut action);
        dispatch(world, &action);
        true
    }

    /// Marks the link down. Local play carries on unchanged.
    pub fn link_down(&mut self) {
        if self.online {
            warn!("Link to server is down, continuing offline");
        }
        self.online = false;
    }

    /// While predicting, a snapshot of this peer's own player carries the
    /// inputs and aim the server held when it was taken. Later changes are
    /// only reflected in echoes, which are skipped, so the local values win.
    fn keep_own_controls(&self, world: &World, action: &mut Action) {
        if !self.prediction {
            return;
        }
        let entity = world.entity(&self.player_id);
        let (Some(controller), Some(transform)) = (entity.controller, entity.transform.as_ref())
        else {
            return;
        };
        let own = |snapshot: &mut PlayerSnapshot| {
            if snapshot.id == self.player_id {
                snapshot.inputs = controller.inputs;
                snapshot.rotation = transform.rotation;
                snapshot.pitch = transform.pitch();
            }
        };
        match action {
            Action::SyncPlayer { player } => own(player),
            Action::SyncGameState { players } => players.iter_mut().for_each(own),
            _ => {}
        }
    }

    fn is_own_echo(&self, action: &Action) -> bool {
        if !self.prediction {
            return false;
        }
        match action {
            Action::SetPlayerInput { id, .. } | Action::SetPlayerAim { id, .. } => {
                *id == self.player_id
            }
            _ => false,
        }
    }
}

/// Chooses where a respawning player reappears.
pub type SpawnPicker = Box<dyn FnMut(&World) -> Vec3 + Send>;

pub struct ServerRelay {
    pub respawn_delay_ms: u64,
    /// Ticks between full `SyncGameState` broadcasts; zero disables them.
    pub sync_interval: u64,
    ticks: u64,
    respawns: BTreeMap<EntityId, u64>,
    pick_spawn: SpawnPicker,
}

impl ServerRelay {
    pub fn new(respawn_delay_ms: u64, sync_interval: u64) -> Self {
        let mut next = 0usize;
        Self {
            respawn_delay_ms,
            sync_interval,
            ticks: 0,
            respawns: BTreeMap::new(),
            pick_spawn: Box::new(move |world: &World| {
                let point = world.spawn_point(next);
                next = next.wrapping_add(1);
                point
            }),
        }
    }

    pub fn with_spawn_picker(mut self, pick_spawn: SpawnPicker) -> Self {
        self.pick_spawn = pick_spawn;
        self
    }

    /// Players waiting to respawn, with the time they are due.
    pub fn pending_respawns(&self) -> impl Iterator<Item = (&EntityId, u64)> {
        self.respawns.iter().map(|(id, at)| (id, *at))
    }

    /// Registers a new player. Returns the actions for the joiner alone
    /// followed by the action to broadcast to everyone.
    pub fn join(
        &mut self,
        world: &mut World,
        player_id: &EntityId,
        now_ms: u64,
    ) -> (Vec<Action>, Action) {
        let join = Action::PlayerJoin {
            id: player_id.clone(),
        };
        dispatch(world, &join);

        let init = Action::InitGame {
            player_ids: world.player_ids.clone(),
            now_ms,
            level: Some(world.level.clone()),
        };
        let for_joiner = vec![
            Action::from_server(Action::for_client(player_id.clone(), init)),
            Action::from_server(Action::SyncGameState {
                players: world.snapshot_players(),
            }),
        ];
        (for_joiner, Action::from_server(join))
    }

    pub fn leave(&mut self, world: &mut World, player_id: &EntityId) -> Action {
        let leave = Action::PlayerLeave {
            id: player_id.clone(),
        };
        dispatch(world, &leave);
        self.respawns.remove(player_id);
        Action::from_server(leave)
    }

    /// Validates an action forwarded by the client controlling
    /// `client_player`. Accepted actions are applied and returned wrapped
    /// for broadcast.
    pub fn accept_from_client(
        &mut self,
        world: &mut World,
        client_player: &EntityId,
        action: Action,
    ) -> Option<Action> {
        let allowed = matches!(
            action,
            Action::SetPlayerInput { .. } | Action::SetPlayerAim { .. }
        ) && action.target() == Some(client_player);
        if !allowed {
            warn!("Rejected {} from {}", action.kind(), client_player);
            return None;
        }

        dispatch(world, &action);
        Some(Action::from_server(action))
    }

    /// Runs after every server tick. Returns the actions to broadcast, all
    /// of them already applied to `world`.
    pub fn after_tick(&mut self, world: &mut World, now_ms: u64) -> Vec<Action> {
        let mut out = Vec::new();

        self.respawns.retain(|id, _| world.player_ids.contains(id));

        for id in &world.player_ids {
            if world.contains(id) || self.respawns.contains_key(id) {
                continue;
            }
            info!("Player {} died", id);
            self.respawns
                .insert(id.clone(), now_ms.saturating_add(self.respawn_delay_ms));
            out.push(Action::from_server(Action::KillPlayer { id: id.clone() }));
        }

        let due: Vec<EntityId> = self
            .respawns
            .iter()
            .filter(|(_, at)| **at <= now_ms)
            .map(|(id, _)| id.clone())
            .collect();
        for id in due {
            self.respawns.remove(&id);
            let position = (self.pick_spawn)(world);
            let spawn = Action::SpawnPlayer {
                id: id.clone(),
                position,
            };
            dispatch(world, &spawn);
            info!("Player {} respawned at {:?}", id, position);
            out.push(Action::from_server(spawn));
        }

        self.ticks += 1;
        if self.sync_interval > 0 && self.ticks % self.sync_interval == 0 {
            out.push(Action::from_server(Action::SyncGameState {
                players: world.snapshot_players(),
            }));
        }

        out
    }
}
