//! Playback engine driving a flattened timeline in real time.
//!
//! # Timing Model
//!
//! Wall-clock based: `update()` is called from the host's periodic tick
//! (any small fixed period), reads a monotonic clock, and advances the
//! virtual position by `real_elapsed x speed`. Timing never assumes the
//! tick period was honored - a throttled background timer just produces
//! one large delta on the next tick, with no drift.
//!
//! # States
//!
//! Idle(t=0) -> Playing(t) <-> Paused(t) -> Finished(t=total).
//! Reset returns to Idle from anywhere without touching the speed setting.
//! Seeking lands in Paused at the target position.
//!
//! # Narration
//!
//! Entering an interval fires exactly one announcement, keyed by the
//! interval's emission-unique id. Staying inside an interval, or ticking
//! while paused, never re-fires. The previous utterance is cancelled
//! before the next one is issued.

use std::time::Instant;

use log::{debug, info};

use super::events::{PlayerEvent, PlayerEventSender};
use super::narration::{Narrator, NullNarrator};
use super::timeline::Timeline;

/// Speed multiplier presets for playback
pub const SPEED_PRESETS: &[f32] = &[0.25, 0.5, 0.75, 1.0, 1.25, 1.5, 2.0, 3.0];

/// Playback state machine states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayState {
    Idle,
    Playing,
    Paused,
    Finished,
}

/// Read-only progress readout recomputed after every tick/transition.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSnapshot {
    pub state: PlayState,
    /// Virtual elapsed seconds (fractional)
    pub elapsed: f64,
    /// Total timeline seconds
    pub total: f64,
    /// elapsed / total, 0.0 for an empty timeline
    pub progress: f64,
    /// Active interval id, if any
    pub active_id: Option<String>,
    /// Seconds left in the active interval, 0.0 if none
    pub active_remaining: f64,
}

/// Playback state manager over one flattened timeline.
pub struct Player {
    timeline: Timeline,
    state: PlayState,
    /// Virtual elapsed time in seconds
    elapsed: f64,
    /// Current speed multiplier (always one of SPEED_PRESETS)
    speed: f32,
    /// Wall-clock anchor of the previous tick (None while not playing)
    last_tick: Option<Instant>,
    /// Id of the currently active interval
    active_id: Option<String>,
    /// Id of the last interval announced (de-dup key)
    last_narrated: Option<String>,
    narrator: Box<dyn Narrator>,
    events: PlayerEventSender,
}

impl Player {
    pub fn new(timeline: Timeline) -> Self {
        Self {
            timeline,
            state: PlayState::Idle,
            elapsed: 0.0,
            speed: 1.0,
            last_tick: None,
            active_id: None,
            last_narrated: None,
            narrator: Box::new(NullNarrator),
            events: PlayerEventSender::dummy(),
        }
    }

    /// Swap in a narrator (builder-style)
    pub fn with_narrator(mut self, narrator: Box<dyn Narrator>) -> Self {
        self.narrator = narrator;
        self
    }

    pub fn set_narrator(&mut self, narrator: Box<dyn Narrator>) {
        self.narrator = narrator;
    }

    pub fn set_event_sender(&mut self, events: PlayerEventSender) {
        self.events = events;
    }

    /// Replace the timeline (sequence was edited and re-flattened).
    /// Playback state is discarded; the speed setting survives.
    pub fn set_timeline(&mut self, timeline: Timeline) {
        self.timeline = timeline;
        self.reset();
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn state(&self) -> PlayState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlayState::Playing
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Start or resume playback.
    ///
    /// An empty timeline goes straight to Finished (terminal no-op). If the
    /// position sits at the start of an un-announced interval (fresh start
    /// at 0), that interval is announced before any time advances.
    pub fn play(&mut self) {
        if self.timeline.is_empty() {
            debug!("Play on empty timeline: finished immediately");
            self.set_state(PlayState::Finished);
            return;
        }
        match self.state {
            PlayState::Idle | PlayState::Paused => {
                self.set_state(PlayState::Playing);
                self.last_tick = Some(Instant::now());
                self.sync_active(true);
            }
            PlayState::Playing => {}
            PlayState::Finished => {
                debug!("Play ignored in Finished state (reset first)");
            }
        }
    }

    /// Freeze the virtual clock at its current value.
    pub fn pause(&mut self) {
        if self.state == PlayState::Playing {
            self.set_state(PlayState::Paused);
            self.last_tick = None;
            debug!("Paused at {:.2}s", self.elapsed);
        }
    }

    /// Back to Idle at t=0. Cancels pending narration, keeps the speed.
    pub fn reset(&mut self) {
        self.narrator.cancel();
        self.elapsed = 0.0;
        self.last_tick = None;
        self.set_active(None);
        self.last_narrated = None;
        self.set_state(PlayState::Idle);
    }

    /// Scrub to `t` seconds (clamped to the timeline) and hold there.
    ///
    /// Recomputes the active interval; announces it only when it differs
    /// from whatever was last announced.
    pub fn seek(&mut self, t: f64) {
        if self.timeline.is_empty() {
            return;
        }
        let total = self.timeline.total() as f64;
        self.elapsed = t.clamp(0.0, total);
        self.last_tick = None;
        self.set_state(PlayState::Paused);
        self.sync_active(true);
        debug!("Seek to {:.2}s", self.elapsed);
    }

    /// Change the speed multiplier, snapping to the nearest preset.
    /// `t` is continuous across the change: the wall-clock anchor is reset
    /// so the next tick computes elapsed time at the new speed only.
    pub fn set_speed(&mut self, speed: f32) {
        let snapped = SPEED_PRESETS
            .iter()
            .copied()
            .min_by(|a, b| {
                (a - speed)
                    .abs()
                    .partial_cmp(&(b - speed).abs())
                    .expect("presets are finite")
            })
            .unwrap_or(1.0);
        if snapped != self.speed {
            if self.state == PlayState::Playing {
                self.last_tick = Some(Instant::now());
            }
            self.speed = snapped;
            info!("Speed set to {}x", self.speed);
            self.events.emit(PlayerEvent::SpeedChanged { speed: self.speed });
        }
    }

    /// Step to the next faster preset
    pub fn speed_up(&mut self) {
        if let Some(idx) = SPEED_PRESETS.iter().position(|&s| s > self.speed) {
            let target = SPEED_PRESETS[idx];
            self.set_speed(target);
        }
    }

    /// Step to the next slower preset
    pub fn speed_down(&mut self) {
        if let Some(idx) = SPEED_PRESETS.iter().rposition(|&s| s < self.speed) {
            let target = SPEED_PRESETS[idx];
            self.set_speed(target);
        }
    }

    /// Scheduler tick: advance by the wall-clock delta since the last tick.
    /// A tick that observes a non-playing state is a no-op.
    pub fn update(&mut self) {
        if self.state != PlayState::Playing {
            return;
        }
        let now = Instant::now();
        if let Some(last) = self.last_tick {
            let real_dt = now.duration_since(last).as_secs_f64();
            self.last_tick = Some(now);
            self.advance(real_dt);
        } else {
            self.last_tick = Some(now);
        }
    }

    /// Advance the virtual clock by `real_dt` wall-clock seconds (scaled by
    /// the speed multiplier). Exposed so hosts and tests can drive playback
    /// from their own tick source; `update()` is this plus clock reading.
    pub fn advance(&mut self, real_dt: f64) {
        if self.state != PlayState::Playing {
            return;
        }
        self.elapsed += real_dt * self.speed as f64;

        let total = self.timeline.total() as f64;
        if self.elapsed >= total {
            self.elapsed = total;
            self.set_active(None);
            self.last_tick = None;
            self.set_state(PlayState::Finished);
            info!("Playback finished at {:.0}s", total);
            return;
        }
        self.sync_active(true);
    }

    /// Progress readout for the UI collaborator.
    pub fn snapshot(&self) -> PlaybackSnapshot {
        let total = self.timeline.total() as f64;
        let active_remaining = self
            .active_id
            .as_deref()
            .and_then(|_| self.timeline.interval_at(self.elapsed))
            .map(|i| i.end as f64 - self.elapsed)
            .unwrap_or(0.0);
        PlaybackSnapshot {
            state: self.state,
            elapsed: self.elapsed,
            total,
            progress: if total > 0.0 { self.elapsed / total } else { 0.0 },
            active_id: self.active_id.clone(),
            active_remaining,
        }
    }

    fn set_state(&mut self, to: PlayState) {
        if self.state != to {
            let from = self.state;
            self.state = to;
            debug!("State {:?} -> {:?}", from, to);
            self.events.emit(PlayerEvent::StateChanged { from, to });
        }
    }

    fn set_active(&mut self, id: Option<String>) {
        if self.active_id != id {
            self.events.emit(PlayerEvent::IntervalChanged {
                old_id: self.active_id.clone(),
                new_id: id.clone(),
            });
            self.active_id = id;
        }
    }

    /// Recompute the active interval from `elapsed`; when `narrate`, a
    /// newly active interval that differs from the last announced one is
    /// announced exactly once.
    fn sync_active(&mut self, narrate: bool) {
        let hit = self
            .timeline
            .interval_at(self.elapsed)
            .map(|i| (i.id.clone(), i.pose_ref.clone()));

        let new_id = hit.as_ref().map(|(id, _)| id.clone());
        self.set_active(new_id);

        if !narrate {
            return;
        }
        if let Some((id, text)) = hit {
            if self.last_narrated.as_deref() != Some(id.as_str()) {
                // At most one pending utterance: drop the previous one first
                self.narrator.cancel();
                self.narrator.announce(&text, &id);
                self.last_narrated = Some(id);
            }
        }
    }
}
