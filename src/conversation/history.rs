use super::exchange::ConversationExchange;
use tokio::sync::{Mutex, MutexGuard, RwLock};
use tracing::{debug, info};

/// Ordered, in-memory conversation history shared by all callers.
///
/// Reads and writes of the sequence go through an `RwLock`. Whole generate
/// turns (snapshot, upstream call, append) and resets additionally hold the
/// turn lock, so two concurrent turns can't both build on the same snapshot.
pub struct ConversationHistory {
    /// Exchanges in insertion order
    exchanges: RwLock<Vec<ConversationExchange>>,

    /// Serializes generate turns and resets
    turn: Mutex<()>,

    /// Keep at most this many exchanges (None = unbounded)
    max_exchanges: Option<usize>,
}

/// Held for the duration of a generate turn or a reset
pub struct TurnGuard<'a> {
    _guard: MutexGuard<'a, ()>,
}

impl ConversationHistory {
    /// Create an empty, unbounded history
    pub fn new() -> Self {
        Self::with_limit(None)
    }

    /// Create an empty history keeping at most `max_exchanges` exchanges
    pub fn with_limit(max_exchanges: Option<usize>) -> Self {
        Self {
            exchanges: RwLock::new(Vec::new()),
            turn: Mutex::new(()),
            max_exchanges,
        }
    }

    /// Wait for any in-flight turn or reset to finish, then claim the history
    pub async fn begin_turn(&self) -> TurnGuard<'_> {
        TurnGuard {
            _guard: self.turn.lock().await,
        }
    }

    /// Add an exchange at the end of the history
    pub async fn append(&self, exchange: ConversationExchange) {
        let mut exchanges = self.exchanges.write().await;
        exchanges.push(exchange);

        // Drop the oldest exchanges once the bound is exceeded
        if let Some(max) = self.max_exchanges {
            if exchanges.len() > max {
                let excess = exchanges.len() - max;
                exchanges.drain(..excess);
                debug!("Evicted {} oldest exchange(s) from history", excess);
            }
        }
    }

    /// Copy of the current sequence, in insertion order
    pub async fn snapshot(&self) -> Vec<ConversationExchange> {
        let exchanges = self.exchanges.read().await;
        exchanges.clone()
    }

    /// Replace the history with an empty sequence
    pub async fn reset(&self) {
        let mut exchanges = self.exchanges.write().await;
        let cleared = exchanges.len();
        *exchanges = Vec::new();
        info!("Conversation history reset ({} exchange(s) cleared)", cleared);
    }

    pub async fn len(&self) -> usize {
        self.exchanges.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.exchanges.read().await.is_empty()
    }

    pub fn max_exchanges(&self) -> Option<usize> {
        self.max_exchanges
    }
}

impl Default for ConversationHistory {
    fn default() -> Self {
        Self::new()
    }
}
