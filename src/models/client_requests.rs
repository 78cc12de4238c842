use serde::{Deserialize, Serialize};

/// CBOR payload of the `Connect` packet.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
pub struct ConnectionRequest {
    pub player_id: String,
    pub auth_token: String,
    #[serde(default)]
    pub deck_id: Option<String>,
    #[serde(default)]
    pub hero: Option<String>,
}
