use serde::Serialize;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::logger;
use crate::tcp::header::{Header, HeaderType, HEADER_SIZE};
use crate::utils::checksum::Checksum;
use crate::utils::errors::{NetworkError, ProtocolError};

/// Largest payload accepted from a client.
pub const MAX_PAYLOAD: u32 = 64 * 1024;

/// Represents a complete network packet with a protocol header and payload.
#[derive(Debug, Clone)]
pub struct Packet {
    pub header: Header,
    pub payload: Box<[u8]>,
}

impl Packet {
    /// Creates a new `Packet`, building the header from the payload.
    pub fn new(header_type: HeaderType, payload: &[u8]) -> Self {
        let header = Header::new(header_type, payload);
        let payload = payload.to_vec().into_boxed_slice();
        Self { header, payload }
    }

    /// Packet carrying `message` as JSON.
    pub fn json<T: Serialize>(header_type: HeaderType, message: &T) -> Result<Self, NetworkError> {
        let payload = serde_json::to_vec(message)?;
        Ok(Packet::new(header_type, &payload))
    }

    /// Reads the next packet from a stream: the fixed header, then exactly the advertised
    /// payload length.
    pub async fn read_from<R>(reader: &mut R) -> Result<Self, ProtocolError>
    where
        R: AsyncRead + Unpin,
    {
        let mut header_bytes = [0u8; HEADER_SIZE];
        reader.read_exact(&mut header_bytes).await?;
        let header = Header::from_bytes(&header_bytes)?;

        if header.payload_length > MAX_PAYLOAD {
            logger!(WARN, "[PROTOCOL] Refusing {} byte payload", header.payload_length);
            return Err(ProtocolError::InvalidPacketError(format!(
                "Payload of {} bytes exceeds the {MAX_PAYLOAD} byte limit",
                header.payload_length
            )));
        }

        let mut payload = vec![0u8; header.payload_length as usize];
        reader.read_exact(&mut payload).await?;
        Ok(Self {
            header,
            payload: payload.into_boxed_slice(),
        })
    }

    pub fn has_valid_checksum(&self) -> bool {
        Checksum::check(self.header.checksum, &self.payload)
    }

    /// Serializes the packet, header first.
    pub fn wrap_packet(&self) -> Box<[u8]> {
        let header = self.header.wrap_header();
        let mut packet = Vec::with_capacity(header.len() + self.payload.len());

        packet.extend_from_slice(&header);
        packet.extend_from_slice(&self.payload);

        packet.into_boxed_slice()
    }
}
