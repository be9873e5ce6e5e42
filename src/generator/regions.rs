/*
regions.rs

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

//! Split cells into connected regions.
//!
//! A region is a maximal set of cells connected through neighbours that all pass the same
//! [`CellFilter`]. Regions are rebuilt from scratch every time they are needed: a region is never
//! updated after the board changes.

use std::collections::VecDeque;

use super::cells::{Board, CellFilter};

/// Connected set of cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    /// Cell IDs in discovery order.
    cells: Vec<usize>,
}

impl Region {
    /// Return the IDs of the cells in the region, in discovery order.
    pub fn cells(&self) -> &[usize] {
        &self.cells
    }

    /// Number of cells in the region.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the region has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Whether the region contains the given cell.
    pub fn contains(&self, id: usize) -> bool {
        self.cells.contains(&id)
    }
}

/// Return the regions of empty cells of the whole board, in row-major order of their first cell.
pub fn partition_board(board: &Board) -> Vec<Region> {
    let all: Vec<usize> = (0..board.len()).collect();
    partition(board, &all, CellFilter::Empty)
}

/// Return the regions that contain the given cells.
///
/// Each cell that passes the filter and that is not part of a previous region starts a new
/// region, which is flooded breadth-first over the neighbours that pass the same filter. The
/// flood is not limited to the given cells.
pub fn partition(board: &Board, cells: &[usize], filter: CellFilter) -> Vec<Region> {
    let mut visited: Vec<bool> = vec![false; board.len()];
    let mut regions: Vec<Region> = Vec::new();

    for &id in cells {
        if !visited[id] && filter.accepts(board.cell(id)) {
            regions.push(flood(board, id, filter, &mut visited));
        }
    }
    regions
}

/// Collect the region that contains the starting cell.
fn flood(board: &Board, start: usize, filter: CellFilter, visited: &mut [bool]) -> Region {
    let mut cells: Vec<usize> = Vec::new();
    let mut queue: VecDeque<usize> = VecDeque::from([start]);

    while let Some(id) = queue.pop_front() {
        // A cell can be queued by several neighbours before it is visited
        if visited[id] {
            continue;
        }
        visited[id] = true;
        cells.push(id);
        queue.extend(board.neighbours(id, filter));
    }
    Region { cells }
}
