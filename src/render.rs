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

//! Renders voice tracks as Desmos array literals, e.g. `N_1=[440,440,-1]`.

use std::fmt;

use crate::reducer::VoiceTracks;
use crate::util::round2;

/// Formats a value rounded to two decimals in its shortest form (`440`, `261.63`, `-1`).
pub fn format_value(value: f64) -> String {
    format!("{}", round2(value))
}

/// Renders a single named array literal.
pub fn array(name: &str, values: &[f64]) -> String {
    let values: Vec<String> = values.iter().map(|value| format_value(*value)).collect();
    format!("{}=[{}]", name, values.join(","))
}

/// Renders one frequency array per voice, named `{prefix}_1` onwards.
pub fn note_arrays(prefix: &str, tracks: &VoiceTracks) -> Vec<String> {
    (0..tracks.num_voices())
        .map(|voice| array(&format!("{}_{}", prefix, voice + 1), &tracks.frequencies(voice)))
        .collect()
}

/// Renders one gain array per voice, named `{prefix}_1` onwards.
pub fn gain_arrays(prefix: &str, tracks: &VoiceTracks) -> Vec<String> {
    (0..tracks.num_voices())
        .map(|voice| array(&format!("{}_{}", prefix, voice + 1), &tracks.gains(voice)))
        .collect()
}

/// The full text handed to the user: the ticker interval followed by every array.
pub struct Document {
    ms_per_slot: f64,
    note_arrays: Vec<String>,
    gain_arrays: Vec<String>,
}

impl Document {
    pub fn new(ms_per_slot: f64, note_arrays: Vec<String>, gain_arrays: Vec<String>) -> Document {
        Document {
            ms_per_slot,
            note_arrays,
            gain_arrays,
        }
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Set your ticker interval to: {} ms per slot",
            format_value(self.ms_per_slot)
        )?;
        writeln!(f)?;
        for array in self.note_arrays.iter().chain(self.gain_arrays.iter()) {
            writeln!(f, "{}", array)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use crate::events::NoteEvent;
    use crate::reducer::{reduce, NoteLength};
    use crate::render::{array, format_value, gain_arrays, note_arrays, Document};

    #[test]
    fn test_format_value() {
        assert_eq!("440", format_value(440.0));
        assert_eq!("261.63", format_value(261.625_565));
        assert_eq!("-1", format_value(-1.0));
        assert_eq!("0", format_value(0.0));
        assert_eq!("0.79", format_value(0.787));
    }

    #[test]
    fn test_array() {
        assert_eq!("N_1=[440,-1,0.5]", array("N_1", &[440.0, -1.0, 0.5]));
        assert_eq!("N_2=[]", array("N_2", &[]));
    }

    #[test]
    fn test_voice_arrays() {
        let events = vec![
            NoteEvent::onset(0, 240, 72, 127),
            NoteEvent::onset(0, 360, 60, 50),
            NoteEvent::release(360, 360, 72),
        ];
        let tracks = reduce(&events, 120.0, 3, NoteLength::Delta).unwrap();

        assert_eq!(
            vec![
                "N_1=[523.25,523.25,261.63]",
                "N_2=[261.63,261.63,-1]",
                "N_3=[-1,-1,-1]",
            ],
            note_arrays("N", &tracks)
        );
        assert_eq!(
            vec!["V_1=[1,1,0.39]", "V_2=[0.39,0.39,0]", "V_3=[0,0,0]"],
            gain_arrays("V", &tracks)
        );
    }

    #[test]
    fn test_document() {
        let document = Document::new(
            125.0,
            vec!["N_1=[440]".to_string()],
            vec!["V_1=[1]".to_string()],
        );

        assert_eq!(
            "Set your ticker interval to: 125 ms per slot\n\nN_1=[440]\nV_1=[1]\n",
            document.to_string()
        );
    }

    #[test]
    fn test_document_without_gain() {
        let document = Document::new(62.5, vec!["N_1=[]".to_string()], vec![]);

        assert_eq!(
            "Set your ticker interval to: 62.5 ms per slot\n\nN_1=[]\n",
            document.to_string()
        );
    }
}
