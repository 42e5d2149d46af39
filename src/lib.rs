//! SADHANA - Yoga sequence timeline engine
//!
//! Re-exports all modules for use by binary targets.

// Core engine (durations, flattening, playback, narration)
pub mod core;

// App modules
pub mod cli;
pub mod entities;
pub mod export;
pub mod store;

// Re-export commonly used types from core
pub use self::core::duration::{format_duration, parse_duration};
pub use self::core::player::{PlayState, PlaybackSnapshot, Player};
pub use self::core::timeline::{Timeline, TimelineInterval};

// Re-export entities
pub use entities::{GroupBlock, Item, ItemSubstitute, PoseStep, RoundOverride, Section, Sequence};
