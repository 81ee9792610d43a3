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

/// Errors surfaced while converting a MIDI file into voice arrays.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// The engine was handed input it cannot reduce. Raised before any state is touched.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("MIDI file error: {0}")]
    Midi(#[from] midly::Error),

    #[error("SMPTE timecode timing is not supported, only metrical (ticks per beat) timing")]
    UnsupportedTiming,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConvertError {
    pub(crate) fn invalid(msg: impl Into<String>) -> ConvertError {
        ConvertError::InvalidInput(msg.into())
    }
}
