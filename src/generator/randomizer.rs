/*
randomizer.rs

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

//! Reshape a filled board by growing shapes into their neighbours.
//!
//! The packer fills the board in a very regular way: shapes are grown from the first cells of
//! each region, so the resulting boards look alike. The randomizer moves the boundaries between
//! shapes, one cell at a time. A grow move gives a cell of one shape to an adjacent shape. The
//! move is allowed only if:
//!
//! - the growing shape is smaller than the maximum shape size,
//! - the shrinking shape stays connected,
//! - the shrinking shape keeps at least the minimum shape size.
//!
//! Every move keeps the board valid, therefore the randomizer never has to backtrack.

use log::debug;
use rand::Rng;
use rand::rngs::StdRng;

use super::cells::{Board, CellFilter};
use super::packer::ShapeBounds;
use super::regions::{self, Region};

/// Move of the `to` cell into the shape of the adjacent `from` cell.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct GrowMove {
    /// Cell of the growing shape.
    pub from: usize,

    /// Cell given to the growing shape.
    pub to: usize,
}

/// Board randomizer.
pub struct Randomizer<'a> {
    /// Filled board.
    board: &'a mut Board,

    /// Number of shapes on the board.
    num_shapes: usize,

    /// Allowed shape sizes.
    bounds: ShapeBounds,

    /// Number of moves applied by the last [`Randomizer::randomize`] call.
    pub moves: usize,
}

impl<'a> Randomizer<'a> {
    /// Create a [`Randomizer`] object for a board filled with `num_shapes` shapes.
    pub fn new(board: &'a mut Board, num_shapes: usize, bounds: ShapeBounds) -> Self {
        Self {
            board,
            num_shapes,
            bounds,
            moves: 0,
        }
    }

    /// Apply up to `iterations` random grow moves. Stop early when no move is possible.
    pub fn randomize(&mut self, iterations: usize, rng: &mut StdRng) {
        self.moves = 0;

        for _ in 0..iterations {
            let grows: Vec<GrowMove> = self.possible_grows();
            if grows.is_empty() {
                debug!("No more grow moves after {} move(s)", self.moves);
                return;
            }

            let grow: GrowMove = grows[rng.random_range(0..grows.len())];
            let shape: Option<usize> = self.board.cell(grow.from).shape;
            self.board.set_shape(grow.to, shape);
            self.moves += 1;
        }
    }

    /// Return all the grow moves that keep the board valid.
    ///
    /// Moves are listed shape by shape, then cell by cell in row-major order. A cell that touches
    /// another shape through several of its cells is listed once per touching cell.
    pub fn possible_grows(&mut self) -> Vec<GrowMove> {
        let mut grows: Vec<GrowMove> = Vec::new();

        for shape_cells in self.board.shape_cells(self.num_shapes) {
            // This shape is already at the maximum shape size
            if shape_cells.len() >= self.bounds.max {
                continue;
            }

            for &from in &shape_cells {
                let shape: Option<usize> = self.board.cell(from).shape;
                for to in self.board.neighbours(from, CellFilter::Playable) {
                    if self.board.cell(to).shape != shape && self.can_grow(from, to) {
                        grows.push(GrowMove { from, to });
                    }
                }
            }
        }
        grows
    }

    /// Whether giving the `to` cell to the shape of the `from` cell leaves the shape of the `to`
    /// cell connected and large enough.
    ///
    /// The `to` cell is reassigned during the check, and restored before returning.
    pub fn can_grow(&mut self, from: usize, to: usize) -> bool {
        let Some(to_shape) = self.board.cell(to).shape else {
            return false;
        };

        // Evaluate the shape of `to` without that cell
        let from_shape: Option<usize> = self.board.cell(from).shape;
        self.board.set_shape(to, from_shape);

        let neighbours: Vec<usize> = self.board.neighbours(to, CellFilter::Shape(to_shape));
        let regions: Vec<Region> =
            regions::partition(self.board, &neighbours, CellFilter::Shape(to_shape));

        self.board.set_shape(to, Some(to_shape));

        regions.len() == 1 && regions[0].len() >= self.bounds.min
    }
}
