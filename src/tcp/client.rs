use super::protocol::Protocol;
use crate::game::matchmaking::MatchTicket;
use crate::logger;
use crate::models::views::MatchNotice;
use crate::tcp::header::HeaderType;
use crate::tcp::packet::Packet;
use crate::utils::errors::ProtocolError;
use std::{net::SocketAddr, sync::Arc};
use tokio::{
    io::AsyncWriteExt,
    net::{
        tcp::{OwnedReadHalf, OwnedWriteHalf},
        TcpStream,
    },
    sync::{broadcast::error::RecvError, mpsc, oneshot, Mutex, RwLock},
};
use uuid::Uuid;

type Incoming = mpsc::Receiver<Result<Packet, ProtocolError>>;

/// An identified player's connection.
///
/// Packets are read by a background task and handed over through a channel, so waiting for
/// a match, relaying states and reading actions can all happen in one `select!` loop.
pub struct Client {
    pub protocol: Arc<Protocol>,
    pub player_id: String,
    pub addr: SocketAddr,
    pub connected: RwLock<bool>,
    pub write_stream: Mutex<OwnedWriteHalf>,
}

impl Client {
    pub fn new(
        write_stream: OwnedWriteHalf,
        addr: SocketAddr,
        player_id: String,
        protocol: Arc<Protocol>,
    ) -> Self {
        Self {
            protocol,
            player_id,
            addr,
            connected: RwLock::new(true),
            write_stream: Mutex::new(write_stream),
        }
    }

    pub async fn is_connected(&self) -> bool {
        *self.connected.read().await
    }

    /// Handles the whole lifecycle of an identified client: waiting in the matchmaking
    /// queue, then relaying its match until the match ends or the client leaves.
    pub async fn connect(
        self: Arc<Self>,
        read_stream: OwnedReadHalf,
        pending_id: Uuid,
        mut ticket: oneshot::Receiver<MatchTicket>,
    ) {
        let (packets_tx, mut packets) = mpsc::channel(16);
        let reader = tokio::spawn(Client::read_packets(read_stream, packets_tx));

        let notice = MatchNotice {
            match_id: pending_id,
            player_id: self.player_id.clone(),
        };
        self.send_json(HeaderType::MatchPending, &notice).await;

        match self.wait_for_match(&mut packets, &mut ticket).await {
            Some(ticket) => {
                logger!(
                    INFO,
                    "[CLIENT] `{}` joined match `{}`",
                    self.player_id,
                    ticket.session.match_id
                );
                let notice = MatchNotice {
                    match_id: ticket.session.match_id,
                    player_id: self.player_id.clone(),
                };
                self.send_json(HeaderType::MatchFound, &notice).await;
                self.play(ticket, &mut packets).await;
            }
            None => {
                self.protocol.matchmaking.remove(pending_id).await;
                abandon_ticket(&self.player_id, &mut ticket).await;
            }
        }

        reader.abort();
        self.protocol.disconnect(&self).await;
        logger!(INFO, "[CLIENT] Closing connection with `{}`", self.addr);
    }

    async fn read_packets(
        mut read_stream: OwnedReadHalf,
        packets: mpsc::Sender<Result<Packet, ProtocolError>>,
    ) {
        loop {
            let result = Packet::read_from(&mut read_stream).await;
            let failed = result.is_err();
            if packets.send(result).await.is_err() || failed {
                break;
            }
        }
    }

    /// Waits for the matchmaking ticket. Returns `None` if the client leaves first.
    async fn wait_for_match(
        &self,
        packets: &mut Incoming,
        ticket: &mut oneshot::Receiver<MatchTicket>,
    ) -> Option<MatchTicket> {
        while self.is_connected().await {
            tokio::select! {
                ticket = &mut *ticket => return ticket.ok(),
                incoming = packets.recv() => match incoming {
                    Some(Ok(packet)) => match packet.header.header_type {
                        HeaderType::Ping => {
                            let pong = Packet::new(HeaderType::Ping, b"");
                            self.protocol.send_or_disconnect(self, &pong).await;
                        }
                        HeaderType::Disconnect => return None,
                        _ => {
                            let reply = Packet::new(HeaderType::InvalidHeader, b"Not in a match yet");
                            self.protocol.send_or_disconnect(self, &reply).await;
                        }
                    },
                    Some(Err(error)) => {
                        logger!(DEBUG, "[CLIENT] `{}` stopped waiting ({error})", self.addr);
                        return None;
                    }
                    None => return None,
                },
            }
        }
        None
    }

    /// Relays states and errors to the client and its actions to the session.
    async fn play(&self, ticket: MatchTicket, packets: &mut Incoming) {
        let MatchTicket {
            session,
            mut states,
            mut errors,
        } = ticket;

        loop {
            if !self.is_connected().await {
                session.disconnect(&self.player_id).await;
                return;
            }

            tokio::select! {
                state = states.recv() => match state {
                    Ok(message) => self.send_json(HeaderType::GameState, &message).await,
                    Err(RecvError::Lagged(skipped)) => {
                        logger!(WARN, "[CLIENT] `{}` skipped {skipped} game states", self.addr);
                    }
                    Err(RecvError::Closed) => {
                        let goodbye = Packet::new(HeaderType::Disconnect, b"");
                        self.protocol.send_or_disconnect(self, &goodbye).await;
                        return;
                    }
                },
                Some(error) = errors.recv() => self.send_json(HeaderType::GameError, &error).await,
                incoming = packets.recv() => match incoming {
                    Some(Ok(packet)) => {
                        if !self.protocol.handle_game_packet(self, &session, &packet).await {
                            session.disconnect(&self.player_id).await;
                            return;
                        }
                    }
                    Some(Err(error)) => {
                        logger!(DEBUG, "[CLIENT] `{}` left the match ({error})", self.addr);
                        session.disconnect(&self.player_id).await;
                        return;
                    }
                    None => {
                        session.disconnect(&self.player_id).await;
                        return;
                    }
                },
            }
        }
    }

    async fn send_json<T: serde::Serialize>(&self, header_type: HeaderType, message: &T) {
        match Packet::json(header_type, message) {
            Ok(packet) => self.protocol.send_or_disconnect(self, &packet).await,
            Err(error) => logger!(ERROR, "[CLIENT] Could not encode {header_type} ({error})"),
        }
    }
}

/// Settles a ticket the client will not use. A ticket delivered in the meantime means the
/// match already started, so the player forfeits it.
async fn abandon_ticket(player_id: &str, ticket: &mut oneshot::Receiver<MatchTicket>) {
    ticket.close();
    if let Ok(ticket) = ticket.try_recv() {
        logger!(
            INFO,
            "[CLIENT] `{player_id}` left as match `{}` started",
            ticket.session.match_id
        );
        ticket.session.disconnect(player_id).await;
    }
}

/// A connection that has not identified itself yet.
pub struct TemporaryClient {
    pub addr: SocketAddr,
    pub protocol: Arc<Protocol>,
    pub stream: TcpStream,
}

impl TemporaryClient {
    pub fn new(stream: TcpStream, addr: SocketAddr, protocol: Arc<Protocol>) -> Self {
        TemporaryClient {
            addr,
            stream,
            protocol,
        }
    }

    /// Waits for the `Connect` packet and hands the connection to the protocol.
    ///
    /// Pings are answered; any other packet is rejected. Exits on a read error.
    pub async fn handle_temp_client(mut self) {
        let addr = self.addr;
        logger!(DEBUG, "[CLIENT] Waiting for `{addr}` to identify");

        loop {
            let packet = match Packet::read_from(&mut self.stream).await {
                Ok(packet) => packet,
                Err(error) => {
                    logger!(DEBUG, "[CLIENT] `{addr}` left before identifying ({error})");
                    return;
                }
            };

            if !packet.has_valid_checksum() {
                logger!(ERROR, "[CLIENT] Invalid checksum from `{addr}`");
                self.reply(HeaderType::InvalidChecksum).await;
                continue;
            }

            match packet.header.header_type {
                HeaderType::Connect => {
                    let protocol = Arc::clone(&self.protocol);
                    if let Err(error) = protocol.handle_connect(self, &packet).await {
                        logger!(ERROR, "[CLIENT] Could not connect `{addr}` ({error})");
                    }
                    return;
                }
                HeaderType::Ping => self.reply(HeaderType::Ping).await,
                HeaderType::Disconnect => return,
                _ => self.reply(HeaderType::InvalidHeader).await,
            }
        }
    }

    async fn reply(&mut self, header_type: HeaderType) {
        let packet = Packet::new(header_type, b"");
        if let Err(error) = self.stream.write_all(&packet.wrap_packet()).await {
            logger!(ERROR, "[CLIENT] Unable to write to `{}` ({error})", self.addr);
        }
    }
}
