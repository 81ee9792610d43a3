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
use serde::Deserialize;

use super::error::ConfigError;
use crate::reducer::NoteLength;

pub const DEFAULT_NUM_VOICES: usize = 4;
pub const DEFAULT_MINIMAL_FRACTION: f64 = 0.25;
const DEFAULT_NOTE_PREFIX: &str = "N";
const DEFAULT_GAIN_PREFIX: &str = "V";
const MAX_MIDI_CHANNEL: u8 = 16;

/// The conversion settings. Every field is optional and falls back to a default.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct Settings {
    /// The number of voice tracks to produce (default: 4).
    num_voices: Option<usize>,

    /// The fraction of a beat one slot covers, e.g. 0.25 for sixteenth notes (default: 0.25).
    minimal_fraction: Option<f64>,

    /// The array name prefix for note frequencies (default: "N").
    note_prefix: Option<String>,

    /// The array name prefix for gains (default: "V").
    gain_prefix: Option<String>,

    /// Whether to emit gain arrays alongside the note arrays (default: true).
    include_gain: Option<bool>,

    /// Where onset lengths come from (default: delta).
    note_length: Option<NoteLength>,

    /// 1-based MIDI channels whose notes are ignored.
    exclude_channels: Option<Vec<u8>>,
}

impl Settings {
    /// Checks values the engine does not check itself.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(channel) = self
            .exclude_channels()
            .iter()
            .find(|channel| !(1..=MAX_MIDI_CHANNEL).contains(*channel))
        {
            return Err(ConfigError::Invalid(format!(
                "excluded channel {} is not between 1 and {}",
                channel, MAX_MIDI_CHANNEL
            )));
        }
        for prefix in [self.note_prefix(), self.gain_prefix()] {
            if prefix.is_empty() || prefix.contains(char::is_whitespace) {
                return Err(ConfigError::Invalid(format!(
                    "array prefix \"{}\" must be non-empty and contain no whitespace",
                    prefix
                )));
            }
        }
        Ok(())
    }

    pub fn num_voices(&self) -> usize {
        self.num_voices.unwrap_or(DEFAULT_NUM_VOICES)
    }

    pub fn minimal_fraction(&self) -> f64 {
        self.minimal_fraction.unwrap_or(DEFAULT_MINIMAL_FRACTION)
    }

    pub fn note_prefix(&self) -> &str {
        self.note_prefix.as_deref().unwrap_or(DEFAULT_NOTE_PREFIX)
    }

    pub fn gain_prefix(&self) -> &str {
        self.gain_prefix.as_deref().unwrap_or(DEFAULT_GAIN_PREFIX)
    }

    pub fn include_gain(&self) -> bool {
        self.include_gain.unwrap_or(true)
    }

    pub fn note_length(&self) -> NoteLength {
        self.note_length.unwrap_or_default()
    }

    pub fn exclude_channels(&self) -> &[u8] {
        self.exclude_channels.as_deref().unwrap_or(&[])
    }
}
