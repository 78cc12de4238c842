use super::client::{Client, TemporaryClient};
use crate::game::entity::player::PlayerInfo;
use crate::game::matchmaking::{MatchTicket, Matchmaking, PendingPlayer};
use crate::game::rng::generate_seed;
use crate::game::session::{MatchSession, SessionHandle, SessionPlayer};
use crate::logger;
use crate::models::game_action::ClientMessage;
use crate::tcp::header::HeaderType;
use crate::tcp::packet::Packet;
use crate::utils::errors::{NetworkError, PlayerConnectionError};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;

const SEND_ATTEMPTS: u32 = 3;
const RETRY_BACKOFF: Duration = Duration::from_millis(500);

/// The Protocol struct handles the communication protocol for the server: the handshake,
/// packet dispatch during a match, and starting matches out of the matchmaking queue.
pub struct Protocol {
    pub matchmaking: Arc<Matchmaking>,
    pub turn_tick: Duration,
}

impl Protocol {
    pub fn new(matchmaking: Arc<Matchmaking>, turn_tick: Duration) -> Self {
        Protocol {
            matchmaking,
            turn_tick,
        }
    }

    /// Sends a packet to the client, retrying up to 3 times if the send fails.
    ///
    /// If all attempts fail, it disconnects the client and returns an error.
    ///
    /// # Returns
    /// * `Ok(())` if the packet was sent successfully.
    /// * `Err(NetworkError)` if the packet could not be sent after 3 attempts.
    pub async fn send_packet(&self, client: &Client, packet: &Packet) -> Result<(), NetworkError> {
        let packet_data = packet.wrap_packet();
        let mut last_error = String::new();

        for attempt in 1..=SEND_ATTEMPTS {
            let mut stream_guard = client.write_stream.lock().await;
            match stream_guard.write_all(&packet_data).await {
                Ok(()) => {
                    logger!(
                        DEBUG,
                        "[PROTOCOL] Sent packet {{ type: {}, size: {} }} to `{}`",
                        packet.header.header_type,
                        packet_data.len(),
                        client.addr
                    );
                    return Ok(());
                }
                Err(error) => {
                    logger!(
                        ERROR,
                        "[PROTOCOL] Failed to send packet to `{}`. Retrying... [{attempt}/{SEND_ATTEMPTS}]",
                        client.addr
                    );
                    last_error = error.to_string();
                }
            }
            drop(stream_guard);
            tokio::time::sleep(RETRY_BACKOFF).await;
        }

        self.disconnect(client).await;
        Err(NetworkError::PackageWriteError(last_error))
    }

    /// Sends a packet, dropping the client if it cannot be delivered.
    pub async fn send_or_disconnect(&self, client: &Client, packet: &Packet) {
        if let Err(error) = self.send_packet(client, packet).await {
            logger!(ERROR, "[PROTOCOL] Giving up on `{}` ({error})", client.addr);
        }
    }

    /// Marks the client as disconnected. Does not touch the socket.
    pub async fn disconnect(&self, client: &Client) {
        let mut connected_guard = client.connected.write().await;
        if *connected_guard {
            logger!(INFO, "[PROTOCOL] Client `{}` disconnected", client.addr);
            *connected_guard = false;
        }
    }

    /// Handles a packet received from a client that is in a match.
    ///
    /// Returns false when the client asked to leave.
    pub async fn handle_game_packet(
        &self,
        client: &Client,
        session: &SessionHandle,
        packet: &Packet,
    ) -> bool {
        logger!(
            DEBUG,
            "[PROTOCOL] Received packet: {{ type: {}, size: {} }}",
            packet.header.header_type,
            packet.header.payload_length
        );
        if !packet.has_valid_checksum() {
            logger!(ERROR, "[PROTOCOL] Invalid checksum from `{}`", client.addr);
            let reply = Packet::new(HeaderType::InvalidChecksum, b"");
            self.send_or_disconnect(client, &reply).await;
            return true;
        }

        match packet.header.header_type {
            HeaderType::GameAction => {
                match serde_json::from_slice::<ClientMessage>(&packet.payload) {
                    Ok(message) => {
                        session.act(&client.player_id, message).await;
                    }
                    Err(error) => {
                        logger!(WARN, "[PROTOCOL] Unreadable action from `{}` ({error})", client.addr);
                        let reply = Packet::new(
                            HeaderType::InvalidPacketPayload,
                            b"Could not parse game action.",
                        );
                        self.send_or_disconnect(client, &reply).await;
                    }
                }
                true
            }
            HeaderType::Ping => {
                self.send_or_disconnect(client, &Packet::new(HeaderType::Ping, b""))
                    .await;
                true
            }
            HeaderType::Disconnect => false,
            _ => {
                logger!(WARN, "[PROTOCOL] Invalid header from `{}`", client.addr);
                let reply = Packet::new(HeaderType::InvalidHeader, b"");
                self.send_or_disconnect(client, &reply).await;
                true
            }
        }
    }

    /// Handles a `Connect` request from a temporary client.
    ///
    /// Resolves the player's hero and deck, promotes the connection to a `Client`, queues the
    /// player for matchmaking and starts any match that can now be formed.
    ///
    /// # Returns
    /// * `Ok(())` if the player is now waiting for, or playing, a match.
    /// * `Err(PlayerConnectionError)` if the request was rejected; the client is told with a
    ///   `FailedToConnectPlayer` packet.
    pub async fn handle_connect(
        self: Arc<Self>,
        mut temp_client: TemporaryClient,
        packet: &Packet,
    ) -> Result<(), PlayerConnectionError> {
        let info = match PlayerInfo::from_connection(&packet.payload).await {
            Ok(info) => info,
            Err(error) => {
                let reply = Packet::new(
                    HeaderType::FailedToConnectPlayer,
                    error.to_string().as_bytes(),
                );
                let _ = temp_client.stream.write_all(&reply.wrap_packet()).await;
                return Err(error);
            }
        };
        logger!(
            INFO,
            "[PROTOCOL] Client `{}` connected as `{}`",
            temp_client.addr,
            info.id
        );

        let (read_stream, write_stream) = temp_client.stream.into_split();
        let client = Arc::new(Client::new(
            write_stream,
            temp_client.addr,
            info.id.clone(),
            Arc::clone(&self),
        ));
        let (pending_id, ticket) = self.matchmaking.enqueue(info).await;
        tokio::spawn(client.connect(read_stream, pending_id, ticket));

        self.start_matches().await;
        logger!(
            DEBUG,
            "[MATCHMAKING] {} player(s) waiting",
            self.matchmaking.len().await
        );
        Ok(())
    }

    /// Starts a session for every pair the queue can currently form.
    pub async fn start_matches(&self) {
        while let Some((first, second)) = self.matchmaking.pair().await {
            self.start_match(first, second).await;
        }
    }

    async fn start_match(&self, first: PendingPlayer, second: PendingPlayer) {
        let match_id = first.pending_id;
        let (first_errors_tx, first_errors) = mpsc::unbounded_channel();
        let (second_errors_tx, second_errors) = mpsc::unbounded_channel();
        let first_id = first.info.id.clone();
        let second_id = second.info.id.clone();

        let (session, handle) = MatchSession::new(
            match_id,
            SessionPlayer {
                info: first.info,
                errors: first_errors_tx,
            },
            SessionPlayer {
                info: second.info,
                errors: second_errors_tx,
            },
            generate_seed(),
            self.turn_tick,
        );
        let tickets = [
            (first_id, first.ready, session.subscribe(), first_errors),
            (second_id, second.ready, session.subscribe(), second_errors),
        ];
        tokio::spawn(session.run());

        for (player_id, ready, states, errors) in tickets {
            let ticket = MatchTicket {
                session: handle.clone(),
                states,
                errors,
            };
            if ready.send(ticket).is_err() {
                logger!(WARN, "[MATCHMAKING] `{player_id}` left before `{match_id}` started");
                handle.disconnect(&player_id).await;
            }
        }
    }
}
