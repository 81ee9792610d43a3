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
use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::{crate_version, Parser, Subcommand};
use mididesmos::config::{self, Overrides, DEFAULT_MINIMAL_FRACTION};
use mididesmos::reducer::NoteLength;
use mididesmos::tempo::{SlotTiming, DEFAULT_TEMPO};
use mididesmos::{convert_file, midi};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(
    author = "Michael Wilson",
    version = crate_version!(),
    about = "Reduces MIDI files into voice arrays for Desmos."
)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Converts a MIDI file into note and gain arrays.
    Convert {
        /// The path to the MIDI file.
        path: PathBuf,
        /// A YAML, TOML or JSON settings file.
        #[arg[short, long]]
        config: Option<PathBuf>,
        /// The number of voices to produce.
        #[arg[short, long]]
        voices: Option<usize>,
        /// The fraction of a beat covered by one slot, e.g. 0.25 for sixteenth notes.
        #[arg[short, long]]
        fraction: Option<f64>,
        /// Where note lengths are taken from.
        #[arg[long, value_enum]]
        note_length: Option<NoteLength>,
        /// Only output the note arrays.
        #[arg[long]]
        no_gain: bool,
        /// Write the arrays to this file instead of stdout.
        #[arg[short, long]]
        output: Option<PathBuf>,
    },
    /// Prints a summary of a MIDI file.
    Inspect {
        /// The path to the MIDI file.
        path: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            path,
            config,
            voices,
            fraction,
            note_length,
            no_gain,
            output,
        } => {
            let overrides = Overrides {
                num_voices: voices,
                minimal_fraction: fraction,
                note_length,
                include_gain: if no_gain { Some(false) } else { None },
            };
            let settings = config::load_settings(config.as_deref(), &overrides)?;
            let document = convert_file(&path, &settings)?.document(&settings);

            match output {
                Some(output) => {
                    fs::write(&output, document.to_string())?;
                    info!(path = %output.display(), "Wrote arrays");
                }
                None => print!("{}", document),
            }
        }
        Commands::Inspect { path } => {
            let timeline = midi::load(&path, &[])?;
            let tempo = timeline.tempo().unwrap_or(DEFAULT_TEMPO);
            let timing = SlotTiming::for_timeline(&timeline, DEFAULT_MINIMAL_FRACTION);

            println!("{}:", path.display());
            println!("- Tracks: {}", timeline.num_tracks());
            println!("- Ticks per beat: {}", timeline.ticks_per_beat());
            match timeline.tempo() {
                Some(_) => println!("- Tempo: {:.2} BPM", SlotTiming::bpm(tempo)),
                None => println!("- Tempo: {:.2} BPM (default)", SlotTiming::bpm(tempo)),
            }
            if timeline.ignored_tempo_changes() > 0 {
                println!(
                    "- Ignored tempo changes: {}",
                    timeline.ignored_tempo_changes()
                );
            }
            println!("- Note events: {}", timeline.events().len());
            println!("- Channels: {:?}", timeline.channels());
            println!("- Length: {} ticks", timeline.end_tick());
            println!("- Max polyphony: {}", timeline.max_polyphony());
            println!(
                "- Slot: {} ticks, {} ms (at {} of a beat)",
                timing.ticks_per_slot, timing.ms_per_slot, DEFAULT_MINIMAL_FRACTION
            );
        }
    }

    Ok(())
}
