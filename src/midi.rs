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

//! Decodes Standard MIDI Files into a merged, time-ordered note timeline.

use std::fs;
use std::path::Path;

use midly::{Format, MetaMessage, MidiMessage, Smf, Timing, TrackEventKind};
use tracing::{debug, info, warn};

use crate::error::ConvertError;
use crate::events::{NoteEvent, NoteKind, Timeline};
use crate::util::filename_display;

/// Reads and decodes the MIDI file at the given path. Note events on any of the excluded
/// (1-based) channels are dropped.
pub fn load(path: &Path, exclude_channels: &[u8]) -> Result<Timeline, ConvertError> {
    let buf: Vec<u8> = fs::read(path)?;
    let timeline = parse(&buf, exclude_channels)?;
    info!(
        file = filename_display(path),
        tracks = timeline.num_tracks(),
        events = timeline.events().len(),
        ticks_per_beat = timeline.ticks_per_beat(),
        "Loaded MIDI file"
    );
    Ok(timeline)
}

/// Decodes an in-memory MIDI file.
pub fn parse(buf: &[u8], exclude_channels: &[u8]) -> Result<Timeline, ConvertError> {
    let smf = Smf::parse(buf)?;
    let ticks_per_beat = match smf.header.timing {
        Timing::Metrical(ticks) => ticks.as_int(),
        Timing::Timecode(..) => return Err(ConvertError::UnsupportedTiming),
    };
    if ticks_per_beat == 0 {
        return Err(ConvertError::invalid("ticks per beat must be non-zero"));
    }
    if smf.header.format == Format::Sequential {
        debug!("Sequential MIDI file, tracks are merged as if they were parallel");
    }

    let mut tempo: Option<u32> = None;
    let mut ignored_tempo_changes = 0;
    let mut events: Vec<NoteEvent> = Vec::new();
    for (track_num, track) in smf.tracks.iter().enumerate() {
        let mut abs_time: u64 = 0;
        for event in track.iter() {
            let delta = u64::from(event.delta.as_int());
            abs_time += delta;

            match event.kind {
                TrackEventKind::Meta(MetaMessage::Tempo(value)) => {
                    if tempo.is_none() {
                        tempo = Some(value.as_int());
                    } else {
                        ignored_tempo_changes += 1;
                    }
                }
                TrackEventKind::Midi { channel, message } => {
                    let channel = channel.as_int() + 1;
                    let (pitch, kind) = match message {
                        MidiMessage::NoteOn { key, vel } => (
                            key.as_int(),
                            NoteKind::Onset {
                                velocity: vel.as_int(),
                            },
                        ),
                        MidiMessage::NoteOff { key, .. } => (key.as_int(), NoteKind::Release),
                        _ => continue,
                    };
                    if exclude_channels.contains(&channel) {
                        continue;
                    }
                    events.push(NoteEvent {
                        time: abs_time,
                        delta,
                        pitch,
                        channel,
                        kind,
                    });
                }
                _ => {}
            }
        }
        debug!(track = track_num, end_tick = abs_time, "Decoded track");
    }

    if ignored_tempo_changes > 0 {
        warn!(
            ignored_tempo_changes,
            "MIDI file changes tempo, only the first tempo is used"
        );
    }

    // Stable, so simultaneous events keep track order.
    events.sort_by_key(|event| event.time);

    Ok(Timeline::new(
        ticks_per_beat,
        tempo,
        ignored_tempo_changes,
        smf.tracks.len(),
        events,
    ))
}
