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

//! Reduces polyphonic MIDI files into a fixed number of evenly time-sliced voice arrays that can
//! be pasted into Desmos.
//!
//! A file is decoded into a [`events::Timeline`], the first tempo fixes the length of one slot
//! ([`tempo::SlotTiming`]), and the [`reducer`] assigns the highest sounding notes to the voices
//! slot by slot.

use std::path::Path;

use tracing::info;

pub mod config;
pub mod error;
pub mod events;
pub mod midi;
pub mod reducer;
pub mod render;
pub mod tempo;
pub mod util;

#[cfg(test)]
mod testutil;

use crate::config::Settings;
use crate::error::ConvertError;
use crate::events::Timeline;
use crate::reducer::VoiceTracks;
use crate::render::Document;
use crate::tempo::SlotTiming;

/// The result of converting one timeline.
#[derive(Debug, Clone)]
pub struct Conversion {
    timing: SlotTiming,
    voices: VoiceTracks,
}

impl Conversion {
    pub fn timing(&self) -> SlotTiming {
        self.timing
    }

    pub fn voices(&self) -> &VoiceTracks {
        &self.voices
    }

    /// Renders the conversion using the array prefixes from the settings.
    pub fn document(&self, settings: &Settings) -> Document {
        let gain_arrays = if settings.include_gain() {
            render::gain_arrays(settings.gain_prefix(), &self.voices)
        } else {
            Vec::new()
        };
        Document::new(
            self.timing.ms_per_slot,
            render::note_arrays(settings.note_prefix(), &self.voices),
            gain_arrays,
        )
    }
}

/// Converts a decoded timeline into voice tracks.
pub fn convert(timeline: &Timeline, settings: &Settings) -> Result<Conversion, ConvertError> {
    tempo::validate_fraction(settings.minimal_fraction())?;

    let timing = SlotTiming::for_timeline(timeline, settings.minimal_fraction());
    let voices = reducer::reduce(
        timeline.events(),
        timing.ticks_per_slot,
        settings.num_voices(),
        settings.note_length(),
    )?;

    info!(
        voices = voices.num_voices(),
        slots = voices.len(),
        ms_per_slot = timing.ms_per_slot,
        "Converted timeline"
    );
    Ok(Conversion { timing, voices })
}

/// Loads the MIDI file at the given path and converts it.
pub fn convert_file(path: &Path, settings: &Settings) -> Result<Conversion, ConvertError> {
    let timeline = midi::load(path, settings.exclude_channels())?;
    convert(&timeline, settings)
}
