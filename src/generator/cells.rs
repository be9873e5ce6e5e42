/*
cells.rs

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

//! Board cells.
//!
//! The [`Board`] object stores the cells of a rectangular `x_cells` by `y_cells` grid in row-major
//! order. Cells are identified by their index in that storage, `y * x_cells + x`.
//!
//! Not all the cells are playable:
//!
//! - a `Blank` cell is outside the puzzle and never receives a shape.
//! - a `Block` cell is an obstacle placed on the board before the game starts.
//! - a `Playable` cell must be covered by exactly one shape once the board is generated.

use log::{Level, debug, log_enabled};
use serde::{Deserialize, Serialize};

use super::topology::Topology;

/// Value of a blank cell in cell-type and output matrices.
pub const BLANK_VALUE: i32 = 0;

/// Value of a block cell in cell-type and output matrices.
pub const BLOCK_VALUE: i32 = 1;

/// Offset added to shape IDs in output matrices, so that they do not collide with the blank and
/// block values.
pub const SHAPE_VALUE_OFFSET: i32 = 2;

/// Type of a board cell.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum CellKind {
    Blank,
    Block,
    #[default]
    Playable,
}

impl CellKind {
    /// Return the cell type for a value of a cell-type matrix.
    pub fn from_value(value: i32) -> Self {
        match value {
            BLANK_VALUE => CellKind::Blank,
            BLOCK_VALUE => CellKind::Block,
            _ => CellKind::Playable,
        }
    }
}

/// Board cell.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub struct Cell {
    /// Column.
    pub x: usize,

    /// Row.
    pub y: usize,

    /// Cell type.
    pub kind: CellKind,

    /// ID of the shape covering the cell, if any.
    pub shape: Option<usize>,
}

impl Cell {
    /// Whether a shape can be placed on the cell and the cell is not covered yet.
    pub fn is_empty(&self) -> bool {
        self.kind == CellKind::Playable && self.shape.is_none()
    }

    /// Whether the cell is neither blank nor a block.
    pub fn is_playable(&self) -> bool {
        self.kind == CellKind::Playable
    }
}

/// Selection of the cells that neighbour lookups and flood fills are allowed to visit.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CellFilter {
    /// Playable cells not covered by a shape.
    Empty,

    /// All the playable cells, covered or not.
    Playable,

    /// Playable cells covered by the given shape.
    Shape(usize),
}

impl CellFilter {
    /// Whether the cell passes the filter.
    pub fn accepts(&self, cell: &Cell) -> bool {
        match self {
            CellFilter::Empty => cell.is_empty(),
            CellFilter::Playable => cell.is_playable(),
            CellFilter::Shape(id) => cell.is_playable() && cell.shape == Some(*id),
        }
    }
}

/// Rectangular board of cells.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Board {
    /// Adjacency rule.
    topology: Topology,

    /// Number of columns.
    x_cells: usize,

    /// Number of rows.
    y_cells: usize,

    /// Cells in row-major order.
    cells: Vec<Cell>,
}

impl Board {
    /// Create a [`Board`] object.
    ///
    /// `cell_types` gives the type of each cell, indexed by row and then by column: `0` for
    /// blank cells, `1` for blocks, and any other value for playable cells. Missing rows or
    /// values, or a missing matrix, make the cells playable.
    pub fn new(
        topology: Topology,
        x_cells: usize,
        y_cells: usize,
        cell_types: Option<&[Vec<i32>]>,
    ) -> Self {
        let mut cells: Vec<Cell> = Vec::with_capacity(x_cells * y_cells);

        for y in 0..y_cells {
            for x in 0..x_cells {
                let kind: CellKind = cell_types
                    .and_then(|rows| rows.get(y))
                    .and_then(|row| row.get(x))
                    .map_or(CellKind::Playable, |v| CellKind::from_value(*v));
                cells.push(Cell {
                    x,
                    y,
                    kind,
                    shape: None,
                });
            }
        }

        Self {
            topology,
            x_cells,
            y_cells,
            cells,
        }
    }

    /// Return the adjacency rule of the board.
    pub fn topology(&self) -> Topology {
        self.topology
    }

    /// Number of columns.
    pub fn x_cells(&self) -> usize {
        self.x_cells
    }

    /// Number of rows.
    pub fn y_cells(&self) -> usize {
        self.y_cells
    }

    /// Total number of cells, including blank and block cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the board has no cells at all.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Return the ID of the cell at the given coordinates.
    pub fn id(&self, x: usize, y: usize) -> Option<usize> {
        if x < self.x_cells && y < self.y_cells {
            Some(y * self.x_cells + x)
        } else {
            None
        }
    }

    /// Return the cell with the given ID.
    pub fn cell(&self, id: usize) -> &Cell {
        &self.cells[id]
    }

    /// Return the cell at the given coordinates.
    pub fn get(&self, x: usize, y: usize) -> Option<&Cell> {
        self.id(x, y).map(|id| &self.cells[id])
    }

    /// Assign the cell to a shape, or clear it with `None`.
    pub fn set_shape(&mut self, id: usize, shape: Option<usize>) {
        self.cells[id].shape = shape;
    }

    /// Number of playable cells.
    pub fn num_playable(&self) -> usize {
        self.cells.iter().filter(|c| c.is_playable()).count()
    }

    /// Return the IDs of the neighbours of the given cell that pass the filter.
    pub fn neighbours(&self, id: usize, filter: CellFilter) -> Vec<usize> {
        let cell: &Cell = &self.cells[id];

        self.topology
            .adjacent(cell.x, cell.y, self.x_cells, self.y_cells)
            .map(|(x, y)| y * self.x_cells + x)
            .filter(|n| filter.accepts(&self.cells[*n]))
            .collect()
    }

    /// Return the IDs of the cells of each shape, indexed by shape ID, in row-major order.
    ///
    /// Cells covered by a shape ID greater or equal to `num_shapes` are ignored.
    pub fn shape_cells(&self, num_shapes: usize) -> Vec<Vec<usize>> {
        let mut shapes: Vec<Vec<usize>> = vec![Vec::new(); num_shapes];

        for (id, cell) in self.cells.iter().enumerate() {
            if !cell.is_playable() {
                continue;
            }
            if let Some(shape) = cell.shape
                && shape < num_shapes
            {
                shapes[shape].push(id);
            }
        }
        shapes
    }

    /// Return the board as a matrix indexed by row and then by column: `0` for blank cells, `1`
    /// for blocks, and the shape ID plus two for covered cells. Uncovered playable cells are
    /// reported as `1`, which the caller never sees after a successful generation.
    pub fn to_matrix(&self) -> Vec<Vec<i32>> {
        self.cells
            .chunks(self.x_cells.max(1))
            .map(|row| {
                row.iter()
                    .map(|cell| match cell.kind {
                        CellKind::Blank => BLANK_VALUE,
                        CellKind::Block => BLOCK_VALUE,
                        CellKind::Playable => match cell.shape {
                            Some(s) => s as i32 + SHAPE_VALUE_OFFSET,
                            None => SHAPE_VALUE_OFFSET - 1,
                        },
                    })
                    .collect()
            })
            .collect()
    }

    /// Print the board.
    ///
    /// `#` is a block, `_` a blank cell, `E` an empty playable cell, and other cells show the ID
    /// of their shape.
    pub fn debug(&self, header: &str) {
        if !log_enabled!(Level::Debug) {
            return;
        }
        debug!("{header}");

        let mut s: String = String::new();
        for row in self.cells.chunks(self.x_cells.max(1)) {
            s.clear();
            for cell in row {
                match (cell.kind, cell.shape) {
                    (CellKind::Block, _) => s.push_str("  #"),
                    (CellKind::Blank, _) => s.push_str("  _"),
                    (CellKind::Playable, None) => s.push_str("  E"),
                    (CellKind::Playable, Some(id)) => s.push_str(&format!("{id:>3}")),
                }
            }
            debug!("{s}");
        }
    }

    /// Iterate over the cells in row-major order.
    pub fn iter(&self) -> std::slice::Iter<'_, Cell> {
        self.cells.iter()
    }
}
