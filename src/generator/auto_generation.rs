/*
auto_generation.rs

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

//! Generate a complete board.
//!
//! [`AutoGeneration::generate`] runs the three phases of the generator on a new board:
//!
//! 1. The empty cells are split into regions.
//! 2. The regions are filled with shapes by the [`ShapePacker`]. If the requested shape sizes
//!    cannot fill the regions, then the sizes are relaxed first.
//! 3. The shapes are reshaped at random by the [`Randomizer`].
//!
//! The result is a matrix of cell values: `0` for blank cells, `1` for blocks, and the shape ID
//! plus two for the other cells.

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;
use std::time::Instant;

use super::cells::{Board, SHAPE_VALUE_OFFSET};
use super::packer::{ShapeBounds, ShapePacker, UNBOUNDED};
use super::randomizer::Randomizer;
use super::regions::{Region, partition_board};
use super::topology::{GridShape, Topology};
use crate::config::{DEFAULT_GROW_ITERATIONS, MAX_GRID_SIZE};

pub use super::packer::StopHandle;

/// Type of errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// The parameters cannot describe a board, such as a zero width.
    InvalidParameters(String),

    /// The number of shapes and their sizes cannot cover the playable cells.
    InfeasibleConstraints,

    /// The search tried every possibility without covering the board.
    SearchExhausted,

    /// The background generation ended without sending a result.
    WorkerDisconnected,
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GenerationError::InvalidParameters(msg) => write!(f, "Invalid parameters: {msg}"),
            GenerationError::InfeasibleConstraints | GenerationError::SearchExhausted => {
                write!(f, "Could not fill board with shapes.")
            }
            GenerationError::WorkerDisconnected => {
                write!(f, "The board generation ended without a result.")
            }
        }
    }
}

impl Error for GenerationError {}

/// Generation parameters.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct GenerationParams {
    /// Board tessellation.
    pub grid_shape: GridShape,

    /// Whether hexagons are rotated.
    pub rotate_hexagon: bool,

    /// Number of columns.
    pub x_cells: usize,

    /// Number of rows.
    pub y_cells: usize,

    /// Cell types indexed by row and then by column: `0` for blank, `1` for block, anything
    /// else for playable. `None` makes all the cells playable.
    pub cell_types: Option<Vec<Vec<i32>>>,

    /// Number of shapes to place on the board.
    pub num_shapes: usize,

    /// Minimum number of cells per shape.
    pub min_shape_size: usize,

    /// Maximum number of cells per shape.
    pub max_shape_size: usize,

    /// Number of random grow moves tried after the board is filled.
    pub grow_iterations: usize,
}

impl GenerationParams {
    /// Create a [`GenerationParams`] object for a board without blank or block cells.
    pub fn new(
        grid_shape: GridShape,
        x_cells: usize,
        y_cells: usize,
        num_shapes: usize,
        min_shape_size: usize,
        max_shape_size: usize,
    ) -> Self {
        Self {
            grid_shape,
            rotate_hexagon: false,
            x_cells,
            y_cells,
            cell_types: None,
            num_shapes,
            min_shape_size,
            max_shape_size,
            grow_iterations: DEFAULT_GROW_ITERATIONS,
        }
    }

    /// Return the adjacency rule of the board.
    pub fn topology(&self) -> Topology {
        Topology::new(self.grid_shape, self.rotate_hexagon)
    }

    /// Verify that the parameters describe a board.
    ///
    /// # Errors
    ///
    /// The method returns [`GenerationError::InvalidParameters`] when a dimension is zero or
    /// larger than [`MAX_GRID_SIZE`], when no shape is requested, when the shape sizes are not a
    /// valid range, or when the cell types do not match the board dimensions.
    pub fn validate(&self) -> Result<(), GenerationError> {
        let invalid = |msg: String| Err(GenerationError::InvalidParameters(msg));

        if !(1..=MAX_GRID_SIZE).contains(&self.x_cells)
            || !(1..=MAX_GRID_SIZE).contains(&self.y_cells)
        {
            return invalid(format!(
                "the board must be between 1x1 and {MAX_GRID_SIZE}x{MAX_GRID_SIZE} cells (got {}x{})",
                self.x_cells, self.y_cells
            ));
        }
        if self.num_shapes == 0 {
            return invalid("the number of shapes must be at least 1".to_string());
        }
        if self.min_shape_size == 0 {
            return invalid("the minimum shape size must be at least 1".to_string());
        }
        if self.min_shape_size > self.max_shape_size {
            return invalid(format!(
                "the minimum shape size ({}) is larger than the maximum shape size ({})",
                self.min_shape_size, self.max_shape_size
            ));
        }
        if let Some(types) = &self.cell_types
            && (types.len() != self.y_cells || types.iter().any(|r| r.len() != self.x_cells))
        {
            return invalid(format!(
                "the cell types do not match the {}x{} board",
                self.x_cells, self.y_cells
            ));
        }
        Ok(())
    }
}

/// Generated board.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct GeneratedGrid {
    /// Adjacency rule of the board.
    pub topology: Topology,

    /// Cell values indexed by row and then by column: `0` for blank, `1` for block, and the
    /// shape ID plus two for the other cells.
    pub cells: Vec<Vec<i32>>,

    /// Number of shapes on the board.
    pub num_shapes: usize,

    /// Shape sizes used by the search, after relaxation.
    pub bounds: ShapeBounds,

    /// Seed of the random grow moves. Generating again with the same parameters and seed
    /// returns the same board.
    pub seed: u64,

    /// Number of seed cells the search tried.
    pub iterations: usize,

    /// Number of grow moves applied to the filled board.
    pub moves: usize,
}

impl GeneratedGrid {
    /// Number of columns.
    pub fn x_cells(&self) -> usize {
        self.cells.first().map_or(0, |r| r.len())
    }

    /// Number of rows.
    pub fn y_cells(&self) -> usize {
        self.cells.len()
    }

    /// Number of cells of each shape, indexed by shape ID.
    pub fn shape_sizes(&self) -> Vec<usize> {
        let mut sizes: BTreeMap<i32, usize> = BTreeMap::new();
        for value in self.cells.iter().flatten() {
            if *value >= SHAPE_VALUE_OFFSET {
                *sizes.entry(*value).or_insert(0) += 1;
            }
        }
        sizes.into_values().collect()
    }
}

/// [`AutoGeneration`] object.
pub struct AutoGeneration {
    /// Generation parameters.
    params: GenerationParams,

    /// Seed for the random grow moves.
    seed: u64,

    /// Cancellation flag, shared with the owner of the generation.
    stop: StopHandle,

    /// Shape sizes used by the last generation, after relaxation.
    pub bounds: ShapeBounds,

    /// Number of seed cells the last search tried.
    pub iteration: usize,

    /// Number of grow moves applied by the last generation.
    pub moves: usize,

    /// Duration in seconds of the last generation.
    pub duration: f32,
}

impl AutoGeneration {
    /// Create the object.
    ///
    /// Without a seed, a random one is drawn. See [`AutoGeneration::seed`] to retrieve it.
    pub fn new(params: GenerationParams, seed: Option<u64>) -> Self {
        let seed: u64 = seed.unwrap_or_else(|| rand::rng().random());
        let bounds = ShapeBounds::new(params.min_shape_size, params.max_shape_size);

        Self {
            params,
            seed,
            stop: StopHandle::new(),
            bounds,
            iteration: 0,
            moves: 0,
            duration: 0.0,
        }
    }

    /// Return the seed of the random grow moves.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Return the generation parameters.
    pub fn params(&self) -> &GenerationParams {
        &self.params
    }

    /// Return a handle that stops the generation from another thread.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Generate and return a board.
    ///
    /// Return `Ok(None)` when the generation is stopped through its [`StopHandle`] before
    /// completion.
    ///
    /// # Errors
    ///
    /// The method returns an error if the parameters are invalid, or if the requested shapes
    /// cannot cover the board. No partial board is ever returned.
    pub fn generate(&mut self) -> Result<Option<GeneratedGrid>, GenerationError> {
        let start: Instant = Instant::now();
        self.iteration = 0;
        self.moves = 0;
        self.duration = 0.0;

        let res: Result<Option<GeneratedGrid>, GenerationError> = self.run();

        self.duration = start.elapsed().as_secs_f32();
        debug!(
            "Iterations = {}  Moves = {}  Duration = {}",
            self.iteration, self.moves, self.duration
        );
        res
    }

    fn run(&mut self) -> Result<Option<GeneratedGrid>, GenerationError> {
        self.params.validate()?;

        let num_shapes: usize = self.params.num_shapes;
        let mut board: Board = Board::new(
            self.params.topology(),
            self.params.x_cells,
            self.params.y_cells,
            self.params.cell_types.as_deref(),
        );
        let regions: Vec<Region> = partition_board(&board);

        info!(
            "Generating a {}x{} {} board: {} playable cell(s) in {} region(s)",
            self.params.x_cells,
            self.params.y_cells,
            self.params.grid_shape,
            board.num_playable(),
            regions.len()
        );
        debug!(
            "{} shape(s) of {} to {} cells",
            num_shapes, self.params.min_shape_size, self.params.max_shape_size
        );

        if regions.is_empty() {
            return Err(GenerationError::InfeasibleConstraints);
        }

        // Relax the shape sizes when they obviously cannot fill the regions
        self.bounds = ShapeBounds::new(self.params.min_shape_size, self.params.max_shape_size);
        if !ShapePacker::new(&mut board, num_shapes, self.bounds, self.stop.clone())
            .can_fill_remaining(&regions, 0, 0)
        {
            self.bounds = relax_bounds(&regions, num_shapes, self.bounds);
            debug!(
                "Shape sizes relaxed to {}..={}",
                self.bounds.min, self.bounds.max
            );
        }

        let mut packer: ShapePacker =
            ShapePacker::new(&mut board, num_shapes, self.bounds, self.stop.clone());

        if !packer.can_fill_remaining(&regions, 0, 0) {
            return self.stopped_or(GenerationError::InfeasibleConstraints);
        }

        let filled: bool = packer.fill_regions(&regions, 0, 0);
        self.iteration = packer.iteration;
        if !filled {
            return self.stopped_or(GenerationError::SearchExhausted);
        }
        board.debug("Board filled:");

        // Diversify the shapes
        let mut rng: StdRng = StdRng::seed_from_u64(self.seed);
        let mut randomizer: Randomizer = Randomizer::new(&mut board, num_shapes, self.bounds);
        randomizer.randomize(self.params.grow_iterations, &mut rng);
        self.moves = randomizer.moves;
        board.debug("Board randomized:");

        Ok(Some(GeneratedGrid {
            topology: self.params.topology(),
            cells: board.to_matrix(),
            num_shapes,
            bounds: self.bounds,
            seed: self.seed,
            iterations: self.iteration,
            moves: self.moves,
        }))
    }

    /// A failed search is not an error when it has been stopped on purpose.
    fn stopped_or(&self, error: GenerationError) -> Result<Option<GeneratedGrid>, GenerationError> {
        if self.stop.is_stopped() {
            info!("Generation stopped");
            Ok(None)
        } else {
            Err(error)
        }
    }
}

/// Return relaxed shape sizes for regions that the requested sizes cannot fill.
///
/// With several regions, any size is allowed. With a single region, the requested minimum is
/// kept and the maximum is widened to at least the average number of cells per shape, up to what
/// the other shapes leave when they all have the minimum size.
pub fn relax_bounds(regions: &[Region], num_shapes: usize, requested: ShapeBounds) -> ShapeBounds {
    if regions.len() != 1 || num_shapes == 0 {
        return ShapeBounds::new(1, UNBOUNDED);
    }

    let cell_count: usize = regions[0].len();
    let min_max_size: usize = cell_count.div_ceil(num_shapes).max(1);

    let min: usize = requested.min;
    let max_max_size: usize = cell_count
        .saturating_sub(min.saturating_mul(num_shapes - 1))
        .max(min_max_size);
    let max: usize = requested.max.clamp(min_max_size, max_max_size).max(min);
    ShapeBounds::new(min, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x: usize, y: usize, shapes: usize, min: usize, max: usize) -> GenerationParams {
        GenerationParams::new(GridShape::Square, x, y, shapes, min, max)
    }

    #[test]
    fn invalid_parameters() {
        for params in [
            square(0, 4, 4, 1, 4),
            square(4, MAX_GRID_SIZE + 1, 4, 1, 4),
            square(4, 4, 0, 1, 4),
            square(4, 4, 4, 0, 4),
            square(4, 4, 4, 5, 4),
        ] {
            assert!(matches!(
                params.validate(),
                Err(GenerationError::InvalidParameters(_))
            ));
        }

        let mut params = square(2, 2, 1, 1, 4);
        params.cell_types = Some(vec![vec![-1, -1]]);
        assert!(matches!(
            AutoGeneration::new(params, Some(0)).generate(),
            Err(GenerationError::InvalidParameters(_))
        ));
    }

    #[test]
    fn relaxation_of_several_regions_allows_any_size() {
        let mut params = square(3, 1, 2, 1, 3);
        params.cell_types = Some(vec![vec![-1, 1, -1]]);
        let board = Board::new(params.topology(), 3, 1, params.cell_types.as_deref());
        let regions: Vec<Region> = partition_board(&board);

        assert_eq!(
            relax_bounds(&regions, 2, ShapeBounds::new(2, 3)),
            ShapeBounds::new(1, UNBOUNDED)
        );
    }

    #[test]
    fn relaxation_of_one_region_keeps_the_requested_minimum() {
        let board = Board::new(Topology::default(), 4, 4, None);
        let regions: Vec<Region> = partition_board(&board);

        // 16 cells, 4 shapes: the largest shape cannot exceed 16 - 3 * 2 cells
        assert_eq!(
            relax_bounds(&regions, 4, ShapeBounds::new(2, 12)),
            ShapeBounds::new(2, 10)
        );
        // The requested minimum is never lowered
        assert_eq!(
            relax_bounds(&regions, 4, ShapeBounds::new(5, 8)),
            ShapeBounds::new(5, 5)
        );
        // The maximum grows to the average shape size
        assert_eq!(
            relax_bounds(&regions, 2, ShapeBounds::new(3, 4)),
            ShapeBounds::new(3, 8)
        );
        assert_eq!(
            relax_bounds(&regions, 1, ShapeBounds::new(1, 4)),
            ShapeBounds::new(1, 16)
        );
    }

    #[test]
    fn relaxed_maximum_lets_the_board_be_filled() {
        let mut generation = AutoGeneration::new(square(4, 4, 2, 3, 4), Some(1));
        let grid = generation.generate().unwrap().unwrap();
        assert_eq!(grid.bounds, ShapeBounds::new(3, 8));
        assert_eq!(grid.shape_sizes().iter().sum::<usize>(), 16);
        assert!(grid.shape_sizes().iter().all(|&n| (3..=8).contains(&n)));
        assert_eq!(generation.bounds, ShapeBounds::new(3, 8));
    }

    #[test]
    fn stopped_generation_returns_nothing() {
        let mut generation = AutoGeneration::new(square(6, 6, 9, 4, 4), Some(3));
        generation.stop_handle().stop();
        assert_eq!(generation.generate(), Ok(None));
    }

    #[test]
    fn shape_sizes_of_generated_grid() {
        let grid = GeneratedGrid {
            topology: Topology::default(),
            cells: vec![vec![0, 2, 2], vec![1, 3, 4], vec![4, 4, 3]],
            num_shapes: 3,
            bounds: ShapeBounds::new(1, 3),
            seed: 0,
            iterations: 1,
            moves: 0,
        };
        assert_eq!(grid.shape_sizes(), vec![2, 2, 3]);
        assert_eq!(grid.x_cells(), 3);
        assert_eq!(grid.y_cells(), 3);
    }
}
