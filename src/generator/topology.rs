/*
topology.rs

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

//! Adjacency rules for the three board tessellations.
//!
//! Each tessellation is described by tables of `(dx, dy)` offsets. For triangles and hexagons,
//! the table depends on the parity of the cell coordinates:
//!
//! - Square cells have four neighbours (left, right, up, down).
//! - Triangle cells have three neighbours. A cell is upside down when `(x + y)` is odd. Both
//!   orientations have a left and a right neighbour, but only one vertical neighbour: the row
//!   above for upside-down cells, the row below for upright cells.
//! - Hexagon cells have six neighbours laid out in offset coordinates. Rotated hexagons shift
//!   every odd column, unrotated hexagons shift every odd row.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use strum_macros::FromRepr;

/// Board tessellation.
///
/// The integer representation is the value stored in level files.
#[derive(
    Serialize,
    Deserialize,
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    ValueEnum,
    FromRepr,
    Default,
)]
#[repr(i32)]
pub enum GridShape {
    #[default]
    Square = 0,
    Triangle = 1,
    Hexagon = 2,
}

impl fmt::Display for GridShape {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GridShape::Square => write!(f, "square"),
            GridShape::Triangle => write!(f, "triangle"),
            GridShape::Hexagon => write!(f, "hexagon"),
        }
    }
}

const SQUARE: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

const TRIANGLE_UPRIGHT: [(isize, isize); 3] = [(-1, 0), (1, 0), (0, 1)];
const TRIANGLE_UPSIDE_DOWN: [(isize, isize); 3] = [(-1, 0), (1, 0), (0, -1)];

// Rotated hexagons, selected by the parity of `x`
const HEXAGON_ROTATED_EVEN: [(isize, isize); 6] =
    [(-1, -1), (0, -1), (1, -1), (1, 0), (0, 1), (-1, 0)];
const HEXAGON_ROTATED_ODD: [(isize, isize); 6] =
    [(-1, 0), (0, -1), (1, 0), (1, 1), (0, 1), (-1, 1)];

// Unrotated hexagons, selected by the parity of `y`
const HEXAGON_EVEN: [(isize, isize); 6] = [(-1, 0), (-1, -1), (0, -1), (1, 0), (0, 1), (-1, 1)];
const HEXAGON_ODD: [(isize, isize); 6] = [(-1, 0), (0, -1), (1, -1), (1, 0), (1, 1), (0, 1)];

/// Adjacency rule of a board: its tessellation and, for hexagons, their orientation.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Topology {
    /// Tessellation.
    pub shape: GridShape,

    /// Whether hexagons are rotated. Ignored for the other tessellations.
    pub rotate_hexagon: bool,
}

impl Topology {
    /// Create a [`Topology`] object.
    pub fn new(shape: GridShape, rotate_hexagon: bool) -> Self {
        Self {
            shape,
            rotate_hexagon,
        }
    }

    /// Whether the triangle at the given coordinates points down.
    pub fn is_upside_down(x: usize, y: usize) -> bool {
        (x + y) % 2 == 1
    }

    /// Return the offsets of the cells adjacent to the cell at the given coordinates.
    ///
    /// The offsets are not bound-checked: the caller discards the coordinates outside the board.
    pub fn offsets(&self, x: usize, y: usize) -> &'static [(isize, isize)] {
        match self.shape {
            GridShape::Square => &SQUARE,
            GridShape::Triangle => {
                if Self::is_upside_down(x, y) {
                    &TRIANGLE_UPSIDE_DOWN
                } else {
                    &TRIANGLE_UPRIGHT
                }
            }
            GridShape::Hexagon => match (self.rotate_hexagon, x % 2 == 0, y % 2 == 0) {
                (true, true, _) => &HEXAGON_ROTATED_EVEN,
                (true, false, _) => &HEXAGON_ROTATED_ODD,
                (false, _, true) => &HEXAGON_EVEN,
                (false, _, false) => &HEXAGON_ODD,
            },
        }
    }

    /// Return the in-bound coordinates adjacent to the given cell, for a board of
    /// `x_cells` by `y_cells` cells.
    pub fn adjacent(
        &self,
        x: usize,
        y: usize,
        x_cells: usize,
        y_cells: usize,
    ) -> impl Iterator<Item = (usize, usize)> + use<> {
        self.offsets(x, y).iter().filter_map(move |(dx, dy)| {
            let nx: usize = x.checked_add_signed(*dx)?;
            let ny: usize = y.checked_add_signed(*dy)?;
            if nx < x_cells && ny < y_cells {
                Some((nx, ny))
            } else {
                None
            }
        })
    }
}
