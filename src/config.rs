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

use config::{Config, File};
use tracing::debug;

use crate::reducer::NoteLength;

mod error;
mod settings;

pub use error::ConfigError;
pub use settings::{Settings, DEFAULT_MINIMAL_FRACTION, DEFAULT_NUM_VOICES};

/// Settings given on the command line. These win over anything in a config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub num_voices: Option<usize>,
    pub minimal_fraction: Option<f64>,
    pub note_length: Option<NoteLength>,
    pub include_gain: Option<bool>,
}

/// Builds the effective settings from an optional config file plus command line overrides.
pub fn load_settings(path: Option<&Path>, overrides: &Overrides) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();
    if let Some(path) = path {
        debug!(path = %path.display(), "Reading settings file");
        builder = builder.add_source(File::from(path));
    }

    let settings = builder
        .set_override_option("num_voices", overrides.num_voices.map(|v| v as i64))?
        .set_override_option("minimal_fraction", overrides.minimal_fraction)?
        .set_override_option(
            "note_length",
            overrides.note_length.map(|length| length.to_string()),
        )?
        .set_override_option("include_gain", overrides.include_gain)?
        .build()?
        .try_deserialize::<Settings>()?;

    settings.validate()?;
    Ok(settings)
}

#[cfg(test)]
mod test {
    use std::error::Error;

    use crate::config::{load_settings, Overrides};
    use crate::reducer::NoteLength;
    use crate::testutil::write_config_file;

    #[test]
    fn test_no_file_no_overrides() -> Result<(), Box<dyn Error>> {
        let settings = load_settings(None, &Overrides::default())?;

        assert_eq!(4, settings.num_voices());
        assert_eq!(0.25, settings.minimal_fraction());
        Ok(())
    }

    #[test]
    fn test_overrides_win_over_file() -> Result<(), Box<dyn Error>> {
        let file = write_config_file(
            "yaml",
            r#"
num_voices: 8
minimal_fraction: 0.5
note_prefix: Hz
include_gain: true
"#,
        )?;
        let settings = load_settings(
            Some(file.path()),
            &Overrides {
                num_voices: Some(2),
                minimal_fraction: None,
                note_length: Some(NoteLength::Absolute),
                include_gain: Some(false),
            },
        )?;

        assert_eq!(2, settings.num_voices());
        assert_eq!(0.5, settings.minimal_fraction());
        assert_eq!("Hz", settings.note_prefix());
        assert_eq!(NoteLength::Absolute, settings.note_length());
        assert!(!settings.include_gain());
        Ok(())
    }

    #[test]
    fn test_toml_file() -> Result<(), Box<dyn Error>> {
        let file = write_config_file(
            "toml",
            r#"
num_voices = 3
exclude_channels = [10]
"#,
        )?;
        let settings = load_settings(Some(file.path()), &Overrides::default())?;

        assert_eq!(3, settings.num_voices());
        assert_eq!(&[10], settings.exclude_channels());
        Ok(())
    }

    #[test]
    fn test_missing_file() {
        let result = load_settings(
            Some(std::path::Path::new("/nonexistent/mididesmos.yaml")),
            &Overrides::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_file_values_rejected() -> Result<(), Box<dyn Error>> {
        let file = write_config_file("yaml", "exclude_channels: [0]\n")?;
        assert!(load_settings(Some(file.path()), &Overrides::default()).is_err());
        Ok(())
    }
}
