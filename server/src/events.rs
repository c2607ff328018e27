//! The event bus abstraction (spec §6). The transport that carries these
//! events to connected clients is explicitly out of scope; `EventSink` is
//! the seam a websocket/SSE layer would later implement.

use common::ids::{GameId, PlayerId};

#[derive(Clone, Debug)]
pub enum GameEvent {
    /// Upstream: the sole trigger for the Scheduler.
    TurnChange {
        game_id: GameId,
        seat_index: usize,
        player_id: Option<PlayerId>,
    },
    /// Upstream: triggers queued-turn replay.
    PlayerReconnect { game_id: GameId, user_id: uuid::Uuid },
    /// Downstream: delta sent after each mutation.
    StatePatch {
        game_id: GameId,
        changed_players: Vec<PlayerId>,
    },
    TrackUpdated {
        game_id: GameId,
        player_id: PlayerId,
    },
    AiThinking {
        player_id: PlayerId,
    },
    AiTurnComplete {
        player_id: PlayerId,
        summary: String,
        strategy: String,
        debug: String,
    },
}

pub trait EventSink: Send + Sync {
    fn emit(&self, event: GameEvent);
}

/// Test/ambient-logging sink: records events it's given and logs them via
/// `tracing` rather than forwarding them anywhere.
#[derive(Default)]
pub struct LoggingEventSink {
    events: std::sync::Mutex<Vec<GameEvent>>,
}

impl LoggingEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&self) -> Vec<GameEvent> {
        std::mem::take(&mut *self.events.lock().expect("event sink poisoned"))
    }
}

impl EventSink for LoggingEventSink {
    fn emit(&self, event: GameEvent) {
        tracing::debug!(?event, "event emitted");
        self.events.lock().expect("event sink poisoned").push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_returns_emitted_events_in_order() {
        let sink = LoggingEventSink::new();
        let game_id = GameId::new();
        sink.emit(GameEvent::TrackUpdated {
            game_id,
            player_id: PlayerId::new(),
        });
        sink.emit(GameEvent::AiThinking {
            player_id: PlayerId::new(),
        });
        let drained = sink.drain();
        assert_eq!(drained.len(), 2);
        assert!(sink.drain().is_empty());
    }
}
