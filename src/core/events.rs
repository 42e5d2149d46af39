//! Event system for playback state changes.
//!
//! Events are emitted when significant transitions occur (state changes,
//! active interval changes, speed changes) and handled by the host to
//! trigger side effects (UI refresh, progress display).

use crossbeam_channel::Sender;

use super::player::PlayState;

/// Events related to playback state changes
#[derive(Debug, Clone)]
pub enum PlayerEvent {
    /// Player state machine transitioned
    StateChanged { from: PlayState, to: PlayState },

    /// Active interval changed (None = no interval active)
    IntervalChanged {
        old_id: Option<String>,
        new_id: Option<String>,
    },

    /// Speed multiplier changed
    SpeedChanged { speed: f32 },
}

/// Event sender wrapper for the player.
///
/// The player holds this sender to emit events when its state changes.
#[derive(Clone, Debug)]
pub struct PlayerEventSender {
    sender: Option<Sender<PlayerEvent>>,
}

impl PlayerEventSender {
    /// Create event sender (connected to channel)
    pub fn new(sender: Sender<PlayerEvent>) -> Self {
        Self {
            sender: Some(sender),
        }
    }

    /// Create dummy sender (for tests or when events not needed)
    pub fn dummy() -> Self {
        Self { sender: None }
    }

    /// Emit event (silent if no receiver)
    pub fn emit(&self, event: PlayerEvent) {
        if let Some(ref tx) = self.sender {
            let _ = tx.send(event); // Ignore send errors (receiver might be dropped)
        }
    }
}

impl Default for PlayerEventSender {
    fn default() -> Self {
        Self::dummy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dummy_sender_is_silent() {
        let sender = PlayerEventSender::dummy();
        sender.emit(PlayerEvent::SpeedChanged { speed: 1.5 });
    }

    #[test]
    fn test_connected_sender_delivers() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let sender = PlayerEventSender::new(tx);
        sender.emit(PlayerEvent::SpeedChanged { speed: 2.0 });

        match rx.try_recv().unwrap() {
            PlayerEvent::SpeedChanged { speed } => assert_eq!(speed, 2.0),
            other => panic!("unexpected event: {:?}", other),
        }
    }
}
