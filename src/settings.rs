/*
settings.rs

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

//! Level creator settings.
//!
//! The settings are saved between runs by the [`crate::saver::settings`] module. Fields missing
//! from a saved file take their default value.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::config::{DEFAULT_GROW_ITERATIONS, DEFAULT_LEVEL_FILENAME};
use crate::generator::auto_generation::{GenerationError, GenerationParams};
use crate::generator::topology::GridShape;

/// Level creator settings.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct GeneratorSettings {
    /// Board tessellation.
    pub grid_shape: GridShape,

    /// Whether hexagons are rotated.
    pub rotate_hexagon: bool,

    /// Number of columns.
    pub x_cells: usize,

    /// Number of rows.
    pub y_cells: usize,

    /// Number of shapes per level.
    pub num_shapes: usize,

    /// Minimum number of cells per shape.
    pub min_shape_size: usize,

    /// Maximum number of cells per shape.
    pub max_shape_size: usize,

    /// Number of levels to generate in a batch.
    pub num_levels: usize,

    /// Base name of the level files, without the `.txt` extension.
    pub filename: String,

    /// Directory where the level files are written. Levels are only printed without it.
    pub output_folder: Option<PathBuf>,

    /// Base seed. Level `i` of a batch uses `seed + i`.
    pub seed: Option<u64>,

    /// Maximum duration of a generation in seconds.
    pub timeout_sec: Option<u64>,

    /// Number of random grow moves tried after a board is filled.
    pub grow_iterations: usize,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            grid_shape: GridShape::Square,
            rotate_hexagon: false,
            x_cells: 8,
            y_cells: 8,
            num_shapes: 10,
            min_shape_size: 3,
            max_shape_size: 8,
            num_levels: 1,
            filename: DEFAULT_LEVEL_FILENAME.to_string(),
            output_folder: None,
            seed: None,
            timeout_sec: None,
            grow_iterations: DEFAULT_GROW_ITERATIONS,
        }
    }
}

impl GeneratorSettings {
    /// Verify the settings.
    ///
    /// # Errors
    ///
    /// The method returns [`GenerationError::InvalidParameters`] when the board parameters are
    /// invalid, when no level is requested, or when the file name is empty.
    pub fn validate(&self) -> Result<(), GenerationError> {
        self.to_params(None).validate()?;

        if self.num_levels == 0 {
            return Err(GenerationError::InvalidParameters(
                "the number of levels must be at least 1".to_string(),
            ));
        }
        if self.filename.trim().is_empty() {
            return Err(GenerationError::InvalidParameters(
                "the level file name is empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Return the generation parameters for the settings.
    ///
    /// `cell_types` is the optional layout of blank and block cells, such as the one returned by
    /// [`crate::level::LevelRecord::cell_types`].
    pub fn to_params(&self, cell_types: Option<Vec<Vec<i32>>>) -> GenerationParams {
        GenerationParams {
            grid_shape: self.grid_shape,
            rotate_hexagon: self.rotate_hexagon,
            x_cells: self.x_cells,
            y_cells: self.y_cells,
            cell_types,
            num_shapes: self.num_shapes,
            min_shape_size: self.min_shape_size,
            max_shape_size: self.max_shape_size,
            grow_iterations: self.grow_iterations,
        }
    }

    /// Return the seed for the level at the given index in a batch, if a base seed is set.
    pub fn level_seed(&self, index: usize) -> Option<u64> {
        self.seed.map(|s| s.wrapping_add(index as u64))
    }
}
