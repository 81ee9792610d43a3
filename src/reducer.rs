// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//

//! The polyphonic reducer: folds a time-ordered note stream into a fixed number of voice tracks,
//! one value per time slot.

use std::fmt;

use serde::Deserialize;
use tracing::{debug, trace};

use crate::error::ConvertError;
use crate::events::{NoteEvent, NoteKind};
use crate::util::{note_to_frequency, velocity_to_gain};

/// Where an onset's length in ticks is taken from. MIDI note-on events carry no length of their
/// own, so it has to be approximated.
#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum NoteLength {
    /// The onset's delta ticks from the previous event in its track.
    #[default]
    Delta,
    /// The onset's absolute tick.
    Absolute,
    /// Ticks until the next event on the same pitch, falling back to the delta ticks.
    Release,
}

impl fmt::Display for NoteLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoteLength::Delta => write!(f, "delta"),
            NoteLength::Absolute => write!(f, "absolute"),
            NoteLength::Release => write!(f, "release"),
        }
    }
}

/// The value of one voice during one slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoiceSlot {
    /// Frequency in Hz, or -1 for silence.
    pub frequency: f64,
    /// Gain between 0 and 1, or 0 for silence.
    pub gain: f64,
}

impl VoiceSlot {
    pub const SILENCE: VoiceSlot = VoiceSlot {
        frequency: -1.0,
        gain: 0.0,
    };
}

/// A note currently sounding inside the reducer.
#[derive(Debug, Clone, Copy)]
struct ActiveNote {
    frequency: f64,
    remaining_slots: u64,
    gain: f64,
}

/// The reducer output: one equal-length track of slots per voice.
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceTracks {
    tracks: Vec<Vec<VoiceSlot>>,
}

impl VoiceTracks {
    /// The number of voices.
    pub fn num_voices(&self) -> usize {
        self.tracks.len()
    }

    /// The number of slots in every track.
    pub fn len(&self) -> usize {
        self.tracks.first().map(Vec::len).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The slots of the given voice (0-based).
    pub fn track(&self, voice: usize) -> &[VoiceSlot] {
        &self.tracks[voice]
    }

    pub fn iter(&self) -> impl Iterator<Item = &[VoiceSlot]> {
        self.tracks.iter().map(Vec::as_slice)
    }

    /// The frequency values of the given voice.
    pub fn frequencies(&self, voice: usize) -> Vec<f64> {
        self.tracks[voice].iter().map(|slot| slot.frequency).collect()
    }

    /// The gain values of the given voice.
    pub fn gains(&self, voice: usize) -> Vec<f64> {
        self.tracks[voice].iter().map(|slot| slot.gain).collect()
    }
}

/// A single-pass state machine advanced one event at a time.
pub struct Reducer {
    ticks_per_slot: f64,
    num_voices: usize,
    /// Notes currently sounding. Re-sorted by frequency each slot.
    active_notes: Vec<ActiveNote>,
    /// Tick of the previously processed event.
    last_time: u64,
    voices: Vec<Vec<VoiceSlot>>,
}

impl Reducer {
    /// Creates a new reducer, rejecting slot sizes and voice counts that cannot be reduced into.
    pub fn new(ticks_per_slot: f64, num_voices: usize) -> Result<Reducer, ConvertError> {
        if !ticks_per_slot.is_finite() || ticks_per_slot <= 0.0 {
            return Err(ConvertError::invalid(format!(
                "ticks per slot must be a positive number, got {}",
                ticks_per_slot
            )));
        }
        if num_voices < 1 {
            return Err(ConvertError::invalid("at least one voice is required"));
        }

        Ok(Reducer {
            ticks_per_slot,
            num_voices,
            active_notes: Vec::new(),
            last_time: 0,
            voices: vec![Vec::new(); num_voices],
        })
    }

    /// The number of notes currently sounding, including those not assigned to a voice.
    pub fn active_count(&self) -> usize {
        self.active_notes.len()
    }

    /// Fills the slots elapsed since the previous event, then applies the event. `length_ticks` is
    /// the note length used if the event is an onset.
    pub fn process(&mut self, event: &NoteEvent, length_ticks: u64) -> Result<(), ConvertError> {
        if event.time < self.last_time {
            return Err(ConvertError::invalid(format!(
                "event at tick {} arrived after tick {}",
                event.time, self.last_time
            )));
        }

        let delta_time = event.time - self.last_time;
        let slots_to_fill = self.slots_for(delta_time);
        self.last_time = event.time;

        for _ in 0..slots_to_fill {
            self.emit_slot();
        }

        match event.kind {
            NoteKind::Onset { velocity } if velocity > 0 => {
                let duration_ticks = if length_ticks > 0 { length_ticks } else { 1 };
                let note = ActiveNote {
                    frequency: note_to_frequency(event.pitch),
                    remaining_slots: self.slots_for(duration_ticks).max(1),
                    gain: velocity_to_gain(velocity),
                };
                trace!(
                    tick = event.time,
                    pitch = event.pitch,
                    frequency = note.frequency,
                    slots = note.remaining_slots,
                    "Note onset"
                );
                self.active_notes.push(note);
            }
            NoteKind::Onset { .. } => {
                trace!(
                    tick = event.time,
                    pitch = event.pitch,
                    "Dropping zero velocity onset"
                );
            }
            NoteKind::Release => {
                // Every entry on this frequency goes, not just the oldest.
                let frequency = note_to_frequency(event.pitch);
                self.active_notes.retain(|note| note.frequency != frequency);
            }
        }

        Ok(())
    }

    /// Pads every voice with silence to a common length and returns the tracks.
    pub fn finish(mut self) -> VoiceTracks {
        let max_len = self.voices.iter().map(Vec::len).max().unwrap_or(0);
        for voice in self.voices.iter_mut() {
            voice.resize(max_len, VoiceSlot::SILENCE);
        }

        debug!(
            voices = self.num_voices,
            slots = max_len,
            unfinished = self.active_count(),
            "Finished reduction"
        );
        VoiceTracks {
            tracks: self.voices,
        }
    }

    fn slots_for(&self, ticks: u64) -> u64 {
        (ticks as f64 / self.ticks_per_slot).round() as u64
    }

    /// Assigns the highest sounding notes to the voices for one slot, then retires exhausted notes.
    fn emit_slot(&mut self) {
        self.active_notes.sort_by(|a, b| b.frequency.total_cmp(&a.frequency));

        for (i, voice) in self.voices.iter_mut().enumerate() {
            match self.active_notes.get_mut(i) {
                Some(note) => {
                    voice.push(VoiceSlot {
                        frequency: note.frequency,
                        gain: note.gain,
                    });
                    note.remaining_slots = note.remaining_slots.saturating_sub(1);
                }
                None => voice.push(VoiceSlot::SILENCE),
            }
        }

        self.active_notes.retain(|note| note.remaining_slots > 0);
    }
}

/// Computes the length in ticks of every event under the given policy. Only onset entries are read.
pub fn note_lengths(events: &[NoteEvent], note_length: NoteLength) -> Vec<u64> {
    match note_length {
        NoteLength::Delta => events.iter().map(|event| event.delta).collect(),
        NoteLength::Absolute => events.iter().map(|event| event.time).collect(),
        NoteLength::Release => {
            let mut next_on_pitch: [Option<u64>; 128] = [None; 128];
            let mut lengths = vec![0; events.len()];
            for (i, event) in events.iter().enumerate().rev() {
                let pitch = usize::from(event.pitch & 0x7f);
                lengths[i] = match next_on_pitch[pitch] {
                    Some(next) => next - event.time,
                    None => event.delta,
                };
                next_on_pitch[pitch] = Some(event.time);
            }
            lengths
        }
    }
}

/// Reduces a complete, time-ordered event stream into `num_voices` tracks. All input is checked
/// before any reduction happens.
pub fn reduce(
    events: &[NoteEvent],
    ticks_per_slot: f64,
    num_voices: usize,
    note_length: NoteLength,
) -> Result<VoiceTracks, ConvertError> {
    let mut reducer = Reducer::new(ticks_per_slot, num_voices)?;

    if let Some(pair) = events.windows(2).find(|pair| pair[1].time < pair[0].time) {
        return Err(ConvertError::invalid(format!(
            "events are not in time order: tick {} follows tick {}",
            pair[1].time, pair[0].time
        )));
    }

    debug!(
        events = events.len(),
        ticks_per_slot,
        num_voices,
        %note_length,
        "Reducing note events"
    );

    let lengths = note_lengths(events, note_length);
    for (event, length) in events.iter().zip(lengths) {
        reducer.process(event, length)?;
    }

    Ok(reducer.finish())
}
