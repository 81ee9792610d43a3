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

use std::path::Path;

/// Reference pitch for MIDI note 69 (A4).
const A4_FREQUENCY: f64 = 440.0;
const A4_NOTE: i32 = 69;

/// Rounds to two decimal places, ties away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Converts a MIDI note number into its equal-tempered frequency in Hz, rounded to two decimals.
pub fn note_to_frequency(note: u8) -> f64 {
    let semitones = i32::from(note) - A4_NOTE;
    round2(A4_FREQUENCY * 2f64.powf(f64::from(semitones) / 12.0))
}

/// Normalizes a 0-127 MIDI velocity into a 0-1 gain, rounded to two decimals.
pub fn velocity_to_gain(velocity: u8) -> f64 {
    round2(f64::from(velocity) / 127.0)
}

/// Extracts a displayable file name from a path, returning a fallback if the name is unreadable.
pub fn filename_display(path: &Path) -> &str {
    path.file_name()
        .and_then(|f| f.to_str())
        .unwrap_or("unreadable file name")
}

#[cfg(test)]
mod test {
    use std::path::Path;

    use crate::util::{filename_display, note_to_frequency, round2, velocity_to_gain};

    #[test]
    fn test_note_to_frequency() {
        assert_eq!(440.0, note_to_frequency(69));
        assert_eq!(880.0, note_to_frequency(81));
        assert_eq!(220.0, note_to_frequency(57));
        assert_eq!(261.63, note_to_frequency(60));
        assert_eq!(523.25, note_to_frequency(72));
        assert_eq!(8.18, note_to_frequency(0));
    }

    #[test]
    fn test_velocity_to_gain() {
        assert_eq!(1.0, velocity_to_gain(127));
        assert_eq!(0.0, velocity_to_gain(0));
        assert_eq!(0.79, velocity_to_gain(100));
        assert_eq!(0.39, velocity_to_gain(50));
    }

    #[test]
    fn test_round2_ties_away_from_zero() {
        assert_eq!(0.13, round2(0.125));
        assert_eq!(-0.13, round2(-0.125));
        assert_eq!(125.0, round2(125.0));
    }

    #[test]
    fn test_filename_display() {
        assert_eq!("song.mid", filename_display(Path::new("/tmp/midi/song.mid")));
    }
}
