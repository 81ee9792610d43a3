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

//! The decoded, time-ordered note stream handed to the reducer.

use std::collections::BTreeSet;

/// What a note event does to the sounding set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteKind {
    /// A note starts sounding.
    Onset { velocity: u8 },
    /// A note stops sounding.
    Release,
}

/// A single note onset or release at an absolute tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteEvent {
    /// Absolute tick of the event.
    pub time: u64,
    /// Ticks since the previous event in the same track.
    pub delta: u64,
    /// MIDI note number.
    pub pitch: u8,
    /// 1-based MIDI channel.
    pub channel: u8,
    pub kind: NoteKind,
}

impl NoteEvent {
    pub fn onset(time: u64, delta: u64, pitch: u8, velocity: u8) -> NoteEvent {
        NoteEvent {
            time,
            delta,
            pitch,
            channel: 1,
            kind: NoteKind::Onset { velocity },
        }
    }

    pub fn release(time: u64, delta: u64, pitch: u8) -> NoteEvent {
        NoteEvent {
            time,
            delta,
            pitch,
            channel: 1,
            kind: NoteKind::Release,
        }
    }

    /// Returns true if this is an onset with a non-zero velocity.
    pub fn is_sounding_onset(&self) -> bool {
        matches!(self.kind, NoteKind::Onset { velocity } if velocity > 0)
    }
}

/// A decoded MIDI file: every note event across all tracks, merged in time order.
#[derive(Debug, Clone)]
pub struct Timeline {
    /// Ticks per quarter note from the file header.
    ticks_per_beat: u16,
    /// The first tempo (microseconds per beat) found in the file, if any.
    tempo: Option<u32>,
    /// Tempo meta-events found after the first one. These are not applied.
    ignored_tempo_changes: usize,
    /// The number of tracks in the file.
    num_tracks: usize,
    events: Vec<NoteEvent>,
}

impl Timeline {
    pub fn new(
        ticks_per_beat: u16,
        tempo: Option<u32>,
        ignored_tempo_changes: usize,
        num_tracks: usize,
        events: Vec<NoteEvent>,
    ) -> Timeline {
        Timeline {
            ticks_per_beat,
            tempo,
            ignored_tempo_changes,
            num_tracks,
            events,
        }
    }

    pub fn ticks_per_beat(&self) -> u16 {
        self.ticks_per_beat
    }

    pub fn tempo(&self) -> Option<u32> {
        self.tempo
    }

    pub fn ignored_tempo_changes(&self) -> usize {
        self.ignored_tempo_changes
    }

    pub fn num_tracks(&self) -> usize {
        self.num_tracks
    }

    pub fn events(&self) -> &[NoteEvent] {
        &self.events
    }

    /// The 1-based channels that carry at least one note event.
    pub fn channels(&self) -> BTreeSet<u8> {
        self.events.iter().map(|event| event.channel).collect()
    }

    /// The tick of the last note event, or 0 for an empty timeline.
    pub fn end_tick(&self) -> u64 {
        self.events.last().map(|event| event.time).unwrap_or(0)
    }

    /// The largest number of notes sounding at once, counting each onset until a release on the
    /// same pitch and channel.
    pub fn max_polyphony(&self) -> usize {
        let mut sounding: Vec<(u8, u8)> = Vec::new();
        let mut max = 0;
        for event in self.events.iter() {
            let key = (event.channel, event.pitch);
            if event.is_sounding_onset() {
                sounding.push(key);
                max = max.max(sounding.len());
            } else if let Some(pos) = sounding.iter().position(|k| *k == key) {
                sounding.remove(pos);
            }
        }
        max
    }
}
