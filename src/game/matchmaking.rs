use std::collections::VecDeque;

use tokio::sync::{broadcast, mpsc, oneshot, Mutex};
use uuid::Uuid;

use crate::game::entity::player::PlayerInfo;
use crate::game::session::SessionHandle;
use crate::logger;
use crate::models::views::ServerMessage;

/// What a waiting player receives once they are paired.
pub struct MatchTicket {
    pub session: SessionHandle,
    pub states: broadcast::Receiver<ServerMessage>,
    pub errors: mpsc::UnboundedReceiver<ServerMessage>,
}

pub struct PendingPlayer {
    /// Identifies the queue entry; the oldest entry of a pair also names the match.
    pub pending_id: Uuid,
    pub info: PlayerInfo,
    pub ready: oneshot::Sender<MatchTicket>,
}

/// Process-wide queue of players waiting for an opponent.
#[derive(Default)]
pub struct Matchmaking {
    queue: Mutex<VecDeque<PendingPlayer>>,
}

impl Matchmaking {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a player to the back of the queue. The receiver resolves once they are paired.
    pub async fn enqueue(&self, info: PlayerInfo) -> (Uuid, oneshot::Receiver<MatchTicket>) {
        let (ready, ticket) = oneshot::channel();
        let pending_id = Uuid::new_v4();
        let mut queue = self.queue.lock().await;

        logger!(
            INFO,
            "[MATCHMAKING] `{}` is waiting for an opponent ({} in queue)",
            info.id,
            queue.len() + 1
        );
        queue.push_back(PendingPlayer {
            pending_id,
            info,
            ready,
        });
        (pending_id, ticket)
    }

    /// Takes the oldest waiting player and the oldest opponent with a different id, skipping
    /// anyone who stopped waiting. Entries sharing the first player's id stay queued.
    pub async fn pair(&self) -> Option<(PendingPlayer, PendingPlayer)> {
        let mut queue = self.queue.lock().await;
        queue.retain(|pending| !pending.ready.is_closed());

        let opponent = {
            let first_id = &queue.front()?.info.id;
            queue
                .iter()
                .position(|pending| &pending.info.id != first_id)?
        };
        let second = queue.remove(opponent)?;
        let first = queue.pop_front()?;
        logger!(
            INFO,
            "[MATCHMAKING] Paired `{}` with `{}`",
            first.info.id,
            second.info.id
        );
        Some((first, second))
    }

    /// Drops a waiting player, e.g. when their connection closes before pairing.
    pub async fn remove(&self, pending_id: Uuid) -> bool {
        let mut queue = self.queue.lock().await;
        let before = queue.len();
        queue.retain(|pending| pending.pending_id != pending_id);
        let removed = queue.len() != before;
        if removed {
            logger!(DEBUG, "[MATCHMAKING] Removed `{pending_id}` from the queue");
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.queue.lock().await.len()
    }
}
