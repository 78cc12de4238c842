//! One running match.
//!
//! A session task owns the `GameState`. Both players' connections and the turn timer reach it
//! through a single command queue, so updates are applied strictly one at a time in the
//! order they were accepted. Successful updates are broadcast to both players; failures are
//! reported to the acting player only.

use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tokio::time;
use uuid::Uuid;

use crate::game::actions::{forfeit_player, handle_player_action, turn_tick};
use crate::game::entity::player::PlayerInfo;
use crate::game::game_state::GameState;
use crate::logger;
use crate::models::game_action::{ClientMessage, GameAction};
use crate::models::views::{GameStateView, ServerMessage};
use crate::utils::errors::GameError;

const COMMAND_BUFFER: usize = 64;
const STATE_BUFFER: usize = 32;

#[derive(Debug)]
pub enum SessionCommand {
    Action {
        player_id: String,
        message: ClientMessage,
    },
    /// The player's connection is gone; handled as a forfeit.
    Disconnect { player_id: String },
}

/// A player about to enter a session, with the channel their errors are delivered on.
pub struct SessionPlayer {
    pub info: PlayerInfo,
    pub errors: mpsc::UnboundedSender<ServerMessage>,
}

/// Cheap, cloneable way into a running session.
#[derive(Clone)]
pub struct SessionHandle {
    pub match_id: Uuid,
    commands: mpsc::Sender<SessionCommand>,
}

impl SessionHandle {
    /// Queues a player message. Returns false once the session is over.
    pub async fn act(&self, player_id: &str, message: ClientMessage) -> bool {
        self.commands
            .send(SessionCommand::Action {
                player_id: player_id.to_string(),
                message,
            })
            .await
            .is_ok()
    }

    pub async fn disconnect(&self, player_id: &str) {
        let _ = self
            .commands
            .send(SessionCommand::Disconnect {
                player_id: player_id.to_string(),
            })
            .await;
    }
}

pub struct MatchSession {
    pub match_id: Uuid,
    state: GameState,
    commands: mpsc::Receiver<SessionCommand>,
    transmitter: broadcast::Sender<ServerMessage>,
    errors: Vec<(String, mpsc::UnboundedSender<ServerMessage>)>,
    tick: Duration,
}

impl MatchSession {
    /// Builds the opening state. The session does nothing until `run` is awaited, so callers
    /// can `subscribe` first without missing the opening broadcast.
    pub fn new(
        match_id: Uuid,
        player1: SessionPlayer,
        player2: SessionPlayer,
        seed: i64,
        tick: Duration,
    ) -> (Self, SessionHandle) {
        let (commands_tx, commands) = mpsc::channel(COMMAND_BUFFER);
        let (transmitter, _) = broadcast::channel(STATE_BUFFER);
        let errors = vec![
            (player1.info.id.clone(), player1.errors),
            (player2.info.id.clone(), player2.errors),
        ];
        let state = GameState::new_match(player1.info, player2.info, seed);

        let session = Self {
            match_id,
            state,
            commands,
            transmitter,
            errors,
            tick,
        };
        let handle = SessionHandle {
            match_id,
            commands: commands_tx,
        };
        (session, handle)
    }

    /// Receives every state broadcast from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<ServerMessage> {
        self.transmitter.subscribe()
    }

    /// Drives the match until it has a winner or every handle is gone, then returns the final
    /// state. Dropping the session closes the state channel, which detaches both players.
    pub async fn run(mut self) -> GameState {
        logger!(
            INFO,
            "[MATCH] `{}` started: `{}` vs `{}` (seed {})",
            self.match_id,
            self.state.player1.id,
            self.state.player2.id,
            self.state.seed
        );
        self.broadcast_state();

        let mut timer = time::interval(self.tick);
        timer.set_missed_tick_behavior(time::MissedTickBehavior::Delay);
        // The first tick completes immediately.
        timer.tick().await;

        while !self.state.is_concluded() {
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(command) => self.handle_command(command),
                    None => {
                        logger!(WARN, "[MATCH] `{}` abandoned by every connection", self.match_id);
                        break;
                    }
                },
                _ = timer.tick() => self.update(None, turn_tick),
            }
        }

        let winner = self
            .state
            .winner
            .map(|side| self.state.player(side).id.clone())
            .unwrap_or_else(|| "nobody".to_string());
        logger!(INFO, "[MATCH] `{}` concluded, winner `{winner}`", self.match_id);
        self.state
    }

    fn handle_command(&mut self, command: SessionCommand) {
        match command {
            SessionCommand::Action { player_id, message } => {
                if message.action == GameAction::Unknown {
                    logger!(DEBUG, "[MATCH] Ignoring unknown action from `{player_id}`");
                    return;
                }
                logger!(
                    DEBUG,
                    "[MATCH] `{player_id}` -> {:?} {:?}",
                    message.action,
                    message.target
                );
                self.update(Some(&player_id), |state| {
                    handle_player_action(state, &player_id, message.action, message.target)
                });
            }
            SessionCommand::Disconnect { player_id } => {
                logger!(INFO, "[MATCH] `{player_id}` disconnected, forfeiting");
                self.update(Some(&player_id), |state| forfeit_player(state, &player_id));
            }
        }
    }

    /// Runs `update` against a copy of the state and only keeps the copy when it succeeds.
    fn update<F>(&mut self, actor: Option<&str>, update: F)
    where
        F: FnOnce(&mut GameState) -> Result<(), GameError>,
    {
        let mut next = self.state.clone();
        match update(&mut next) {
            Ok(()) => {
                self.state = next;
                self.broadcast_state();
            }
            Err(error) => {
                let actor = actor.unwrap_or("timer");
                if error.is_logic() {
                    logger!(WARN, "[MATCH] `{}` {actor}: {error}", self.match_id);
                } else {
                    logger!(DEBUG, "[MATCH] `{}` {actor}: {error}", self.match_id);
                }
                self.send_error(actor, error);
            }
        }
    }

    fn broadcast_state(&self) {
        let message = ServerMessage::GameState {
            state: GameStateView::create_view(&self.state),
        };
        // No receivers just means nobody is listening anymore.
        let _ = self.transmitter.send(message);
    }

    fn send_error(&self, player_id: &str, error: GameError) {
        if let Some((_, errors)) = self.errors.iter().find(|(id, _)| id == player_id) {
            let _ = errors.send(ServerMessage::GameError { error });
        }
    }
}
