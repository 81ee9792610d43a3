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

use tracing::debug;

use crate::error::ConvertError;
use crate::events::Timeline;
use crate::util::round2;

/// Tempo assumed when a file declares none: 500000 microseconds per beat, or 120 BPM.
pub const DEFAULT_TEMPO: u32 = 500_000;

/// The size of one discrete time slot, in ticks and in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotTiming {
    /// Ticks covered by one slot. Not necessarily a whole number.
    pub ticks_per_slot: f64,
    /// Wall-clock length of one slot, rounded to two decimals.
    pub ms_per_slot: f64,
}

impl SlotTiming {
    /// Derives the slot size from the effective tempo (microseconds per beat, defaulting to
    /// DEFAULT_TEMPO), the ticks per beat and the fraction of a beat one slot covers.
    pub fn new(tempo: Option<u32>, ticks_per_beat: u16, minimal_fraction: f64) -> SlotTiming {
        let tempo = tempo.unwrap_or(DEFAULT_TEMPO);
        let timing = SlotTiming {
            ticks_per_slot: f64::from(ticks_per_beat) * minimal_fraction,
            ms_per_slot: round2((f64::from(tempo) / 1000.0) * minimal_fraction),
        };
        debug!(
            tempo,
            ticks_per_beat,
            minimal_fraction,
            ticks_per_slot = timing.ticks_per_slot,
            ms_per_slot = timing.ms_per_slot,
            "Calculated slot timing"
        );
        timing
    }

    /// Derives the slot size for a decoded timeline. Only the first tempo in the file is honored.
    pub fn for_timeline(timeline: &Timeline, minimal_fraction: f64) -> SlotTiming {
        SlotTiming::new(timeline.tempo(), timeline.ticks_per_beat(), minimal_fraction)
    }

    /// Beats per minute for a tempo in microseconds per beat.
    pub fn bpm(tempo: u32) -> f64 {
        60_000_000.0 / f64::from(tempo)
    }
}

/// Rejects a minimal fraction that cannot produce a positive slot size.
pub fn validate_fraction(minimal_fraction: f64) -> Result<(), ConvertError> {
    if !minimal_fraction.is_finite() || minimal_fraction <= 0.0 {
        return Err(ConvertError::invalid(format!(
            "minimal fraction must be a positive number, got {}",
            minimal_fraction
        )));
    }
    Ok(())
}
