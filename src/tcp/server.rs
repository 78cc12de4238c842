use std::{io::Error, net::SocketAddr, sync::Arc};

use tokio::net::TcpListener;

use crate::game::matchmaking::Matchmaking;
use crate::logger;
use crate::models::settings::Settings;
use crate::tcp::client::TemporaryClient;
use crate::tcp::protocol::Protocol;

pub struct ServerInstance {
    pub socket: TcpListener,
    pub protocol: Arc<Protocol>,
}

impl ServerInstance {
    /// Binds the listening socket described by the settings.
    pub async fn create_instance(settings: &Settings) -> Result<ServerInstance, Error> {
        let socket = TcpListener::bind((settings.host.as_str(), settings.port)).await?;
        logger!(
            INFO,
            "[SERVER] Listening on {}:{}",
            settings.host,
            settings.port
        );

        let matchmaking = Arc::new(Matchmaking::new());
        let protocol = Arc::new(Protocol::new(matchmaking, settings.turn_tick()));
        Ok(ServerInstance { socket, protocol })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, Error> {
        self.socket.local_addr()
    }

    /// Accepts connections forever. Each one must identify itself before it is matched.
    pub async fn run(self) {
        loop {
            match self.socket.accept().await {
                Ok((stream, addr)) => {
                    logger!(INFO, "[SERVER] Incoming connection from `{addr}`");
                    let client = TemporaryClient::new(stream, addr, Arc::clone(&self.protocol));
                    tokio::spawn(client.handle_temp_client());
                }
                Err(error) => {
                    logger!(ERROR, "[SERVER] Failed to accept connection ({error})");
                }
            }
        }
    }
}
