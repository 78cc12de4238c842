use std::fmt::Display;

use crate::utils::checksum::Checksum;
use crate::utils::errors::ProtocolError;

/// Size of a serialized header: type, payload length, checksum and delimiter.
pub const HEADER_SIZE: usize = 8;
const DELIMITER: u8 = 0x0A;

/// Represents the type of message in a protocol packet.
///
/// Each variant maps to a specific `u8` value used during transmission.
///
/// ### Errors (0xF0–0xFF):
/// - `FailedToConnectPlayer` - The handshake was rejected.
/// - `InvalidPacketPayload` - The payload could not be decoded.
/// - `InvalidHeader` - Malformed or unexpected header.
/// - `InvalidChecksum` - Payload failed checksum validation.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderType {
    Disconnect = 0x00,
    Connect = 0x01,
    Ping = 0x02,

    MatchPending = 0x03,
    MatchFound = 0x04,

    GameAction = 0x10,
    GameState = 0x11,
    GameError = 0x12,

    FailedToConnectPlayer = 0xF0,
    InvalidPacketPayload = 0xF1,
    InvalidHeader = 0xFA,
    InvalidChecksum = 0xFD,
}

impl Display for HeaderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let str = match self {
            HeaderType::Disconnect => "DISCONNECT",
            HeaderType::Connect => "CONNECT",
            HeaderType::Ping => "PING",

            HeaderType::MatchPending => "MATCH_PENDING",
            HeaderType::MatchFound => "MATCH_FOUND",

            HeaderType::GameAction => "GAME_ACTION",
            HeaderType::GameState => "GAME_STATE",
            HeaderType::GameError => "GAME_ERROR",

            HeaderType::FailedToConnectPlayer => "FAILED_TO_CONNECT_PLAYER",
            HeaderType::InvalidPacketPayload => "INVALID_PACKET_PAYLOAD",
            HeaderType::InvalidHeader => "INVALID_HEADER",
            HeaderType::InvalidChecksum => "INVALID_CHECKSUM",
        };

        write!(f, "{str}")
    }
}

impl TryFrom<u8> for HeaderType {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x00 => Ok(HeaderType::Disconnect),
            0x01 => Ok(HeaderType::Connect),
            0x02 => Ok(HeaderType::Ping),

            0x03 => Ok(HeaderType::MatchPending),
            0x04 => Ok(HeaderType::MatchFound),

            0x10 => Ok(HeaderType::GameAction),
            0x11 => Ok(HeaderType::GameState),
            0x12 => Ok(HeaderType::GameError),

            0xF0 => Ok(HeaderType::FailedToConnectPlayer),
            0xF1 => Ok(HeaderType::InvalidPacketPayload),
            0xFA => Ok(HeaderType::InvalidHeader),
            0xFD => Ok(HeaderType::InvalidChecksum),
            _ => Err(()),
        }
    }
}

/// Fixed-size protocol header.
///
/// Format: `[type, payload_len (4 bytes BE), checksum (2 bytes BE), 0x0A]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    pub checksum: u16,
    pub payload_length: u32,
    pub header_type: HeaderType,
}

impl Header {
    /// Creates a header for `payload`, computing its length and checksum.
    pub fn new(header_type: HeaderType, payload: &[u8]) -> Self {
        Self {
            checksum: Checksum::new(payload),
            payload_length: payload.len() as u32,
            header_type,
        }
    }

    pub fn wrap_header(&self) -> [u8; HEADER_SIZE] {
        let [l0, l1, l2, l3] = self.payload_length.to_be_bytes();
        let [c0, c1] = self.checksum.to_be_bytes();
        [self.header_type as u8, l0, l1, l2, l3, c0, c1, DELIMITER]
    }

    /// Parses a header from exactly `HEADER_SIZE` bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ProtocolError> {
        if bytes.len() != HEADER_SIZE || bytes[HEADER_SIZE - 1] != DELIMITER {
            return Err(ProtocolError::InvalidHeaderError(format!(
                "Format invalid: {bytes:?}"
            )));
        }

        let header_type = HeaderType::try_from(bytes[0]).map_err(|_| {
            ProtocolError::InvalidHeaderError(format!("Invalid message type: {:#04X}", bytes[0]))
        })?;
        let payload_length = u32::from_be_bytes([bytes[1], bytes[2], bytes[3], bytes[4]]);
        let checksum = u16::from_be_bytes([bytes[5], bytes[6]]);

        Ok(Self {
            header_type,
            payload_length,
            checksum,
        })
    }
}
