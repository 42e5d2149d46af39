//! Core engine modules - durations, flattening, playback, narration.
//!
//! These modules form the timeline engine, independent of any UI.

pub mod duration;
pub mod events;
pub mod narration;
pub mod player;
pub mod timeline;

// Re-exports for convenience
pub use duration::{format_duration, parse_duration};
pub use events::{PlayerEvent, PlayerEventSender};
pub use narration::{LogNarrator, MemoryNarrator, Narrator, NullNarrator, Utterance};
pub use player::{PlaybackSnapshot, PlayState, Player, SPEED_PRESETS};
pub use timeline::{Timeline, TimelineInterval};
