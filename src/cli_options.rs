/*
cli_options.rs

Copyright 2025 Hervé Quatremain

This file is part of Shapefill.

Shapefill is free software: you can redistribute it and/or modify it under the
terms of the GNU General Public License as published by the Free Software
Foundation, either version 3 of the License, or (at your option) any later
version.

Shapefill is distributed in the hope that it will be useful, but WITHOUT ANY
WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR
A PARTICULAR PURPOSE. See the GNU General Public License for more details.

You should have received a copy of the GNU General Public License along with
Shapefill. If not, see <https://www.gnu.org/licenses/>.

SPDX-License-Identifier: GPL-3.0-or-later
*/

//! Process command-line options.
//!
//! The settings are loaded from a JSON file when `--settings` is given, and then each option
//! overrides the corresponding setting. Every generated level is printed, and written in the
//! output directory when one is set.
//!
//! # Examples
//!
//! Generate three 6x6 hexagon levels with 8 shapes of 3 to 6 cells, and write them in the
//! `levels` directory:
//!
//! ```
//! $ shapefill -g hexagon -x 6 -y 6 -n 8 --min-size 3 --max-size 6 -c 3 -o levels
//! Level 1 (seed 9482210371)
//!   2  2  3  3  3  4
//! ...
//! ```
//!
//! Reuse the blank and block cells of an existing level, with a fixed seed:
//!
//! ```
//! $ shapefill --template levels/level.txt -n 6 -s 42
//! ```

use clap::Parser;
use log::{debug, error};
use std::env;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use shapefill::config::COPYRIGHT_NOTICE;
use shapefill::generator::auto_generation::GeneratedGrid;
use shapefill::generator::topology::GridShape;
use shapefill::generator::worker::{GenerationResult, GenerationWorker};
use shapefill::level::LevelRecord;
use shapefill::saver::levels::{SaverLevels, read_level};
use shapefill::saver::settings::SaverSettings;
use shapefill::settings::GeneratorSettings;

/// Generate block-fitting puzzle levels.
#[derive(Parser)]
#[command(about, long_about = None, version, long_version = COPYRIGHT_NOTICE)]
struct Args {
    /// JSON file to load the settings from
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Save the settings, with the command-line overrides, to the settings file
    #[arg(long, default_value_t = false, requires = "settings")]
    save_settings: bool,

    /// Shape of the board cells
    #[arg(value_enum, short, long)]
    grid_shape: Option<GridShape>,

    /// Rotate the hexagons
    #[arg(short, long, default_value_t = false)]
    rotate_hexagon: bool,

    /// Number of columns
    #[arg(short, long)]
    x_cells: Option<usize>,

    /// Number of rows
    #[arg(short, long)]
    y_cells: Option<usize>,

    /// Number of shapes per level
    #[arg(short, long)]
    num_shapes: Option<usize>,

    /// Minimum number of cells per shape
    #[arg(long)]
    min_size: Option<usize>,

    /// Maximum number of cells per shape
    #[arg(long)]
    max_size: Option<usize>,

    /// Number of levels to generate
    #[arg(short, long)]
    count: Option<usize>,

    /// Base seed, for reproducible levels
    #[arg(short, long)]
    seed: Option<u64>,

    /// Give up generating a level after this number of seconds
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Number of random grow moves after a board is filled
    #[arg(long)]
    grow_iterations: Option<usize>,

    /// Existing level file to reuse the blank and block cells from
    #[arg(long)]
    template: Option<PathBuf>,

    /// Directory where to write the level files
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Base name of the level files
    #[arg(short, long)]
    filename: Option<String>,

    /// Print some statistics after generating the levels
    #[arg(short = 'S', long, default_value_t = false)]
    summary: bool,

    /// Enable debug messages
    #[arg(short, long, default_value_t = false)]
    debug: bool,
}

impl Args {
    /// Override the settings with the options given on the command line.
    fn apply(&self, settings: &mut GeneratorSettings) {
        if let Some(v) = self.grid_shape {
            settings.grid_shape = v;
        }
        if self.rotate_hexagon {
            settings.rotate_hexagon = true;
        }
        if let Some(v) = self.x_cells {
            settings.x_cells = v;
        }
        if let Some(v) = self.y_cells {
            settings.y_cells = v;
        }
        if let Some(v) = self.num_shapes {
            settings.num_shapes = v;
        }
        if let Some(v) = self.min_size {
            settings.min_shape_size = v;
        }
        if let Some(v) = self.max_size {
            settings.max_shape_size = v;
        }
        if let Some(v) = self.count {
            settings.num_levels = v;
        }
        if self.seed.is_some() {
            settings.seed = self.seed;
        }
        if self.timeout.is_some() {
            settings.timeout_sec = self.timeout;
        }
        if let Some(v) = self.grow_iterations {
            settings.grow_iterations = v;
        }
        if self.output.is_some() {
            settings.output_folder = self.output.clone();
        }
        if let Some(v) = &self.filename {
            settings.filename = v.clone();
        }
    }
}

/// Parse and process command-line options, and return the exit code.
pub fn run() -> u8 {
    let args: Args = Args::parse();

    if args.debug {
        unsafe {
            env::set_var("RUST_LOG", "debug");
        }
    }
    env_logger::init();

    //
    // Build the settings
    //
    let saver: Option<SaverSettings> = args.settings.as_deref().map(SaverSettings::new);
    let mut settings: GeneratorSettings = match saver.as_ref().map(|s| s.get_settings()) {
        None | Some(Ok(None)) => GeneratorSettings::default(),
        Some(Ok(Some(s))) => s,
        Some(Err(e)) => {
            eprintln!("Cannot read the settings: {e}");
            return 1;
        }
    };
    args.apply(&mut settings);

    let cell_types: Option<Vec<Vec<i32>>> = match &args.template {
        None => None,
        Some(path) => match read_level(path) {
            Ok(Some(level)) => {
                settings.grid_shape = level.grid_shape;
                settings.rotate_hexagon = level.rotate_hexagon;
                settings.x_cells = level.x_cells;
                settings.y_cells = level.y_cells;
                Some(level.cell_types())
            }
            Ok(None) => {
                eprintln!("Template {path:?} not found");
                return 1;
            }
            Err(e) => {
                eprintln!("Cannot read the template {path:?}: {e}");
                return 1;
            }
        },
    };

    if let Err(e) = settings.validate() {
        eprintln!("{e}");
        return 1;
    }
    debug!("Settings: {settings:?}");

    if args.save_settings
        && let Some(saver) = &saver
        && let Err(e) = saver.save_settings(&settings)
    {
        eprintln!("Cannot save the settings: {e}");
        return 1;
    }

    //
    // Generate the levels
    //
    let level_saver: Option<SaverLevels> = settings
        .output_folder
        .clone()
        .map(|folder| SaverLevels::new(folder, &settings.filename));
    let timeout: Option<Duration> = settings.timeout_sec.map(Duration::from_secs);

    let mut total: f32 = 0.0;
    let mut max: f32 = 0.0;
    let mut iterations: usize = 0;
    let mut moves: usize = 0;
    let mut generated: usize = 0;
    let mut errors: usize = 0;

    for i in 0..settings.num_levels {
        let worker: GenerationWorker = match GenerationWorker::start(
            settings.to_params(cell_types.clone()),
            settings.level_seed(i),
        ) {
            Ok(w) => w,
            Err(e) => {
                eprintln!("Cannot start the generation: {e}");
                return 1;
            }
        };
        let seed: u64 = worker.seed();
        let start: Instant = Instant::now();
        let res: GenerationResult = worker.wait(timeout);
        let duration: f32 = start.elapsed().as_secs_f32();

        match res {
            Ok(Some(grid)) => {
                total += duration;
                if duration > max {
                    max = duration;
                }
                iterations += grid.iterations;
                moves += grid.moves;
                generated += 1;

                println!("Level {} (seed {seed})", i + 1);
                print_grid(&grid);

                let record: LevelRecord = LevelRecord::from_grid(&grid);
                match &level_saver {
                    Some(saver) => match saver.save_level(&record) {
                        Ok(path) => println!("Saved in {}", path.display()),
                        Err(e) => {
                            eprintln!("Cannot save level {}: {e}", i + 1);
                            errors += 1;
                        }
                    },
                    None => println!("{record}"),
                }
            }
            Ok(None) => {
                errors += 1;
                error!("Level {} (seed {seed}): timed out", i + 1);
            }
            Err(e) => {
                errors += 1;
                error!("Level {} (seed {seed}): {e}", i + 1);
                eprintln!("{e}");
            }
        }
    }

    // Print some stats
    if args.summary {
        let n: usize = generated.max(1);
        println!(
            "
        total time = {}s
      average time = {}s
          max time = {}s
average iterations = {}
     average moves = {}
            errors = {}",
            total,
            total / n as f32,
            max,
            iterations / n,
            moves / n,
            errors
        );
    }

    if errors == 0 { 0 } else { 1 }
}

/// Print the cell values of a generated board.
fn print_grid(grid: &GeneratedGrid) {
    for row in &grid.cells {
        let line: String = row.iter().map(|v| format!("{v:>3}")).collect();
        println!("{line}");
    }
}
