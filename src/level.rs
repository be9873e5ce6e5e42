/*
level.rs

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

//! Level records.
//!
//! A level is stored as a single line of comma-separated values:
//!
//! ```text
//! timestamp,grid_shape,rotate_hexagon,y_cells,x_cells,value,value,...
//! ```
//!
//! - `timestamp` is the creation time in milliseconds since the Unix epoch.
//! - `grid_shape` is `0` for squares, `1` for triangles, and `2` for hexagons.
//! - `rotate_hexagon` is `True` or `False`.
//! - the `y_cells * x_cells` values follow in row-major order: `0` for blank cells, `1` for
//!   blocks, and the shape ID plus two for the cells covered by a shape.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use std::str::FromStr;

use crate::generator::auto_generation::GeneratedGrid;
use crate::generator::cells::{BLANK_VALUE, BLOCK_VALUE, SHAPE_VALUE_OFFSET};
use crate::generator::topology::{GridShape, Topology};

/// Cell type value of a playable cell in template matrices.
pub const PLAYABLE_VALUE: i32 = -1;

/// Type of errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LevelParseError {
    /// A header field is missing.
    MissingField(&'static str),

    /// A field is not a valid number.
    InvalidNumber(&'static str, String),

    /// The grid shape integer is unknown.
    UnknownGridShape(i32),

    /// The hexagon orientation is not a boolean.
    InvalidBool(String),

    /// The number of cell values does not match the dimensions.
    WrongCellCount { expected: usize, found: usize },
}

impl fmt::Display for LevelParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LevelParseError::MissingField(name) => write!(f, "Missing {name}"),
            LevelParseError::InvalidNumber(name, value) => {
                write!(f, "Invalid {name}: {value:?} is not a number")
            }
            LevelParseError::UnknownGridShape(value) => write!(f, "Unknown grid shape {value}"),
            LevelParseError::InvalidBool(value) => {
                write!(f, "Invalid hexagon orientation: {value:?} is not True or False")
            }
            LevelParseError::WrongCellCount { expected, found } => {
                write!(f, "Expected {expected} cell values, found {found}")
            }
        }
    }
}

impl Error for LevelParseError {}

/// Rectangle around a shape, in cell coordinates.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub struct ShapeRect {
    /// Leftmost column.
    pub x: usize,

    /// Top row.
    pub y: usize,

    pub width: usize,
    pub height: usize,
}

/// Shape of a level, as the game places it on the board.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LevelShape {
    /// Order of the first appearance of the shape in the level, in row-major order.
    pub index: usize,

    /// Cell value of the shape in the level record.
    pub value: i32,

    /// Bounding rectangle.
    pub bounds: ShapeRect,

    /// Cell coordinates `(x, y)` in row-major order. The first one is the anchor.
    pub cells: Vec<(usize, usize)>,
}

impl LevelShape {
    /// Return the cell used to position the shape on the board.
    pub fn anchor(&self) -> (usize, usize) {
        self.cells[0]
    }

    /// For triangle boards, whether the triangle at the anchor points down.
    pub fn is_anchor_flipped(&self) -> bool {
        let (x, y) = self.anchor();
        Topology::is_upside_down(x, y)
    }
}

/// Level record.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LevelRecord {
    /// Creation time in milliseconds since the Unix epoch.
    pub timestamp: i64,

    pub grid_shape: GridShape,
    pub rotate_hexagon: bool,
    pub y_cells: usize,
    pub x_cells: usize,

    /// Cell values in row-major order.
    pub values: Vec<i32>,
}

impl LevelRecord {
    /// Create a [`LevelRecord`] object for a generated board, stamped with the current time.
    pub fn from_grid(grid: &GeneratedGrid) -> Self {
        Self {
            timestamp: Utc::now().timestamp_millis(),
            grid_shape: grid.topology.shape,
            rotate_hexagon: grid.topology.rotate_hexagon,
            y_cells: grid.y_cells(),
            x_cells: grid.x_cells(),
            values: grid.cells.iter().flatten().copied().collect(),
        }
    }

    /// Return the record as a line of comma-separated values.
    pub fn encode(&self) -> String {
        let mut s: String = format!(
            "{},{},{},{},{}",
            self.timestamp,
            self.grid_shape as i32,
            if self.rotate_hexagon { "True" } else { "False" },
            self.y_cells,
            self.x_cells
        );
        for value in &self.values {
            s.push(',');
            s.push_str(&value.to_string());
        }
        s
    }

    /// Parse a record.
    ///
    /// # Errors
    ///
    /// The method returns an error when a field is missing or not a number, when the grid shape
    /// is unknown, or when the number of cell values does not match the dimensions.
    pub fn parse(s: &str) -> Result<Self, LevelParseError> {
        let mut items = s.trim().split(',').map(str::trim);

        let timestamp: i64 = number(items.next(), "timestamp")?;
        let shape: i32 = number(items.next(), "grid shape")?;
        let grid_shape: GridShape =
            GridShape::from_repr(shape).ok_or(LevelParseError::UnknownGridShape(shape))?;
        let rotate: &str = items
            .next()
            .ok_or(LevelParseError::MissingField("hexagon orientation"))?;
        let rotate_hexagon: bool = if rotate.eq_ignore_ascii_case("true") {
            true
        } else if rotate.eq_ignore_ascii_case("false") {
            false
        } else {
            return Err(LevelParseError::InvalidBool(rotate.to_string()));
        };
        let y_cells: usize = number(items.next(), "number of rows")?;
        let x_cells: usize = number(items.next(), "number of columns")?;

        // A trailing comma is tolerated
        let mut fields: Vec<&str> = items.collect();
        if fields.last().is_some_and(|v| v.is_empty()) {
            fields.pop();
        }
        let values: Vec<i32> = fields
            .into_iter()
            .map(|v| number(Some(v), "cell value"))
            .collect::<Result<Vec<i32>, LevelParseError>>()?;

        let expected: usize = y_cells.saturating_mul(x_cells);
        if values.len() != expected {
            return Err(LevelParseError::WrongCellCount {
                expected,
                found: values.len(),
            });
        }

        Ok(Self {
            timestamp,
            grid_shape,
            rotate_hexagon,
            y_cells,
            x_cells,
            values,
        })
    }

    /// Return the creation time.
    pub fn created(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.timestamp).single()
    }

    /// Return the adjacency rule of the level board.
    pub fn topology(&self) -> Topology {
        Topology::new(self.grid_shape, self.rotate_hexagon)
    }

    /// Return the cell values indexed by row and then by column.
    pub fn rows(&self) -> Vec<Vec<i32>> {
        self.values
            .chunks(self.x_cells.max(1))
            .map(|r| r.to_vec())
            .collect()
    }

    /// Return the layout of the level as a cell-type matrix for a new generation: blank cells
    /// and blocks are kept, and every shape cell becomes playable.
    pub fn cell_types(&self) -> Vec<Vec<i32>> {
        self.rows()
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|v| match v {
                        BLANK_VALUE | BLOCK_VALUE => v,
                        _ => PLAYABLE_VALUE,
                    })
                    .collect()
            })
            .collect()
    }

    /// Return the shapes of the level, in the order of their first cell.
    pub fn shapes(&self) -> Vec<LevelShape> {
        let mut shapes: Vec<LevelShape> = Vec::new();
        let mut index_by_value: HashMap<i32, usize> = HashMap::new();
        if self.x_cells == 0 {
            return shapes;
        }

        for (i, value) in self.values.iter().enumerate() {
            if *value < SHAPE_VALUE_OFFSET {
                continue;
            }
            let x: usize = i % self.x_cells;
            let y: usize = i / self.x_cells;

            let index: usize = *index_by_value.entry(*value).or_insert_with(|| {
                shapes.push(LevelShape {
                    index: shapes.len(),
                    value: *value,
                    bounds: ShapeRect {
                        x,
                        y,
                        width: 1,
                        height: 1,
                    },
                    cells: Vec::new(),
                });
                shapes.len() - 1
            });

            let shape: &mut LevelShape = &mut shapes[index];
            let b: &mut ShapeRect = &mut shape.bounds;
            let right: usize = (b.x + b.width - 1).max(x);
            let bottom: usize = (b.y + b.height - 1).max(y);
            b.x = b.x.min(x);
            b.y = b.y.min(y);
            b.width = right - b.x + 1;
            b.height = bottom - b.y + 1;
            shape.cells.push((x, y));
        }
        shapes
    }
}

impl fmt::Display for LevelRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.encode())
    }
}

impl FromStr for LevelRecord {
    type Err = LevelParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Parse a numeric field.
fn number<T: FromStr>(item: Option<&str>, name: &'static str) -> Result<T, LevelParseError> {
    let item: &str = item.ok_or(LevelParseError::MissingField(name))?;
    item.parse::<T>()
        .map_err(|_| LevelParseError::InvalidNumber(name, item.to_string()))
}
