//! Voice lifecycle — a slot table for transient sound units.
//!
//! Voices are owned exclusively by the [`VoiceManager`]. Handles carry the
//! generation-cycle counter they were issued under; once a new cycle begins,
//! stale handles are ignored rather than touching a reused slot. Every exit
//! path — natural expiry, forced stop, cycle swap, shutdown — releases the
//! voice from the table; nothing holds a reference past `Stopped`.
//!
//! Callers that share the manager across a driver and an audio-clock
//! callback wrap it in a mutex and take the lock for every mutation,
//! including expiry (see `session`).

use std::collections::HashMap;

use crate::music::pattern::{NoteEvent, Waveform};

/// Lifecycle of one voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceState {
    /// Scheduled, waiting for its start time.
    Created,
    /// Between start and stop time.
    Playing,
    /// Terminal. A stopped voice is released immediately.
    Stopped,
}

/// A transient sound unit with an absolute start and stop time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Voice {
    pub frequency_hz: f64,
    pub waveform: Waveform,
    pub gain: f64,
    /// Absolute start time in seconds on the caller's clock.
    pub start_time: f64,
    /// Absolute stop time: start + duration.
    pub stop_time: f64,
    state: VoiceState,
}

impl Voice {
    pub fn state(&self) -> VoiceState {
        self.state
    }
}

/// Handle to a voice, valid only for the cycle it was issued in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoiceHandle {
    cycle: u64,
    id: u64,
}

/// Slot table of active voices, keyed by voice id.
///
/// One generation cycle is in flight at a time: [`begin_cycle`] force-stops
/// and releases every voice of the previous cycle before the caller adds the
/// next one (clear-before-create), so the table never accumulates across
/// cycles.
///
/// [`begin_cycle`]: VoiceManager::begin_cycle
#[derive(Debug, Default)]
pub struct VoiceManager {
    cycle: u64,
    next_id: u64,
    voices: HashMap<u64, Voice>,
}

impl VoiceManager {
    pub fn new() -> Self {
        VoiceManager::default()
    }

    /// The current generation cycle.
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    pub fn active_count(&self) -> usize {
        self.voices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }

    /// Start a new generation cycle: force-stop and release every voice
    /// from the prior cycle, then invalidate its handles. Returns the new
    /// cycle number.
    pub fn begin_cycle(&mut self) -> u64 {
        let released = self.release_all();
        self.cycle += 1;
        if released > 0 {
            log::debug!("cycle {}: released {released} prior voices", self.cycle);
        }
        self.cycle
    }

    /// Schedule a note as a voice starting at `now + offset`.
    pub fn spawn(&mut self, note: &NoteEvent, now: f64) -> VoiceHandle {
        let id = self.next_id;
        self.next_id += 1;

        let start_time = now + note.start_offset_secs;
        self.voices.insert(
            id,
            Voice {
                frequency_hz: note.frequency_hz,
                waveform: note.waveform,
                gain: note.gain,
                start_time,
                stop_time: start_time + note.duration_secs,
                state: VoiceState::Created,
            },
        );
        VoiceHandle { cycle: self.cycle, id }
    }

    /// Advance the clock: promote voices whose start time has arrived and
    /// release those past their stop time. Returns how many were released.
    ///
    /// This is the natural-expiry path; it tolerates voices that were
    /// already force-stopped (they are simply gone from the table).
    pub fn advance(&mut self, now: f64) -> usize {
        let mut expired = Vec::new();
        for (&id, voice) in self.voices.iter_mut() {
            if now >= voice.stop_time {
                expired.push(id);
            } else if voice.state == VoiceState::Created && now >= voice.start_time {
                voice.state = VoiceState::Playing;
            }
        }
        for id in &expired {
            self.voices.remove(id);
        }
        expired.len()
    }

    /// Force-stop one voice. Removal from the table is the Stopped
    /// transition and the release in one step. Idempotent: stale handles
    /// (from a prior cycle) and already-released voices are no-ops.
    /// Returns whether a voice was actually released.
    pub fn stop(&mut self, handle: VoiceHandle) -> bool {
        if handle.cycle != self.cycle {
            return false;
        }
        self.voices.remove(&handle.id).is_some()
    }

    /// Force-stop and release everything (shutdown path).
    pub fn stop_all(&mut self) -> usize {
        self.release_all()
    }

    /// Inspect a live voice. `None` for stale or released handles.
    pub fn voice(&self, handle: VoiceHandle) -> Option<&Voice> {
        if handle.cycle != self.cycle {
            return None;
        }
        self.voices.get(&handle.id)
    }

    fn release_all(&mut self) -> usize {
        let released = self.voices.len();
        self.voices.clear();
        released
    }
}
