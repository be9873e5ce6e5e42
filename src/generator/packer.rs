/*
packer.rs

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

//! Fill regions of empty cells with shapes.
//!
//! The packer places the shapes one by one, region by region, with a depth-first backtracking
//! search:
//!
//! 1. Before working on a region, a quick feasibility check compares the number of remaining
//!    shapes with the sizes of the remaining regions ([`ShapePacker::can_fill_remaining`]).
//! 2. Each cell of the region is tried as the seed of the next shape. The shape grows one
//!    neighbour at a time until it reaches the maximum shape size, or until it cannot grow any
//!    further while being at least the minimum shape size ([`ShapePacker::spread_shape`]).
//! 3. Placing a shape can split what is left of the region. The remaining empty cells of the
//!    region are partitioned again, and the search continues on the new regions followed by the
//!    regions not processed yet ([`ShapePacker::shape_placed`]).
//!
//! Failures are reported as `false` and undo every cell assignment made by the failing branch.
//! Every recursive step first looks at a [`StopHandle`], so that another thread can abort a long
//! search.

use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use super::cells::{Board, CellFilter};
use super::regions::{self, Region};

/// Maximum shape size standing for "no upper bound".
pub const UNBOUNDED: usize = usize::MAX;

/// Cooperative cancellation flag shared between a search and its owner.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    /// Create a [`StopHandle`] object, not stopped.
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    /// Ask the search to stop as soon as possible.
    pub fn stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether a stop has been requested.
    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Allowed number of cells per shape, both ends included.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub struct ShapeBounds {
    /// Minimum number of cells.
    pub min: usize,

    /// Maximum number of cells, or [`UNBOUNDED`].
    pub max: usize,
}

impl ShapeBounds {
    /// Create a [`ShapeBounds`] object.
    pub fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    /// Whether a shape of the given size is allowed.
    pub fn contains(&self, size: usize) -> bool {
        size >= self.min && size <= self.max
    }
}

/// Count of the shapes needed to cover a number of cells exactly.
///
/// The count is built by trying the largest shape size first and keeping the first combination
/// that covers the cells exactly. Results are cached, because the same counts are requested over
/// and over during the search.
#[derive(Debug, Clone)]
pub struct MinShapeCount {
    bounds: ShapeBounds,
    cache: HashMap<usize, usize>,
}

impl MinShapeCount {
    /// Create a [`MinShapeCount`] object.
    pub fn new(bounds: ShapeBounds) -> Self {
        Self {
            bounds,
            cache: HashMap::new(),
        }
    }

    /// Return the number of shapes needed to cover `cells` cells exactly, or `0` if no
    /// combination of allowed shape sizes adds up to `cells`.
    pub fn get(&mut self, cells: usize) -> usize {
        if cells < self.bounds.min || self.bounds.min == 0 {
            return 0;
        }
        if let Some(count) = self.cache.get(&cells) {
            return *count;
        }

        let mut count: usize = 0;
        for size in (self.bounds.min..=self.bounds.max.min(cells)).rev() {
            if size == cells {
                count = 1;
                break;
            }
            let rest: usize = self.get(cells - size);
            if rest > 0 {
                count = rest + 1;
                break;
            }
        }
        self.cache.insert(cells, count);
        count
    }
}

/// Identity of a shape: its cell IDs, sorted by column and then by row.
///
/// Growing a shape in a different order can produce the same set of cells. The key detects that
/// case so that the set is explored only once per seed cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ShapeKey(Vec<usize>);

/// Backtracking shape packer.
pub struct ShapePacker<'a> {
    /// Board to fill. Cell assignments are made in place.
    board: &'a mut Board,

    /// Number of shapes to place.
    num_shapes: usize,

    /// Allowed shape sizes.
    bounds: ShapeBounds,

    /// Cached shape counts.
    min_shapes: MinShapeCount,

    /// Cancellation flag.
    stop: StopHandle,

    /// Number of seed cells tried. Used for statistics.
    pub iteration: usize,
}

impl<'a> ShapePacker<'a> {
    /// Create a [`ShapePacker`] object.
    pub fn new(
        board: &'a mut Board,
        num_shapes: usize,
        bounds: ShapeBounds,
        stop: StopHandle,
    ) -> Self {
        Self {
            board,
            num_shapes,
            bounds,
            min_shapes: MinShapeCount::new(bounds),
            stop,
            iteration: 0,
        }
    }

    /// Fill the regions, starting at `region_index`, with the shapes starting at `shape_index`.
    ///
    /// Return `true` when all the regions are covered by exactly the number of requested shapes.
    /// Otherwise, the board is left as it was before the call (unless the search is stopped).
    pub fn fill_regions(
        &mut self,
        regions: &[Region],
        region_index: usize,
        shape_index: usize,
    ) -> bool {
        if self.stop.is_stopped() {
            return false;
        }

        if region_index >= regions.len() {
            // Shapes left over: the board would have fewer shapes than requested
            return shape_index >= self.num_shapes;
        }

        if !self.can_fill_remaining(regions, region_index, shape_index) {
            return false;
        }

        let region: &Region = &regions[region_index];
        debug!(
            "== Filling region {}/{} ({} cells) from shape {}",
            region_index + 1,
            regions.len(),
            region.len(),
            shape_index
        );

        for &seed in region.cells() {
            if self.stop.is_stopped() {
                return false;
            }
            self.iteration += 1;

            let mut shape: Vec<usize> = Vec::new();
            let mut frontier: Vec<usize> = Vec::new();
            let mut tried: HashSet<ShapeKey> = HashSet::new();
            if self.spread_shape(
                regions,
                region_index,
                shape_index,
                seed,
                &mut shape,
                &mut frontier,
                &mut tried,
            ) {
                return true;
            }
        }
        debug!("    Back: no seed cell fills region {}", region_index + 1);
        false
    }

    /// Quick check of whether the remaining shapes could cover the remaining regions.
    ///
    /// The check is necessary but not sufficient: `true` does not guarantee that the search
    /// succeeds.
    pub fn can_fill_remaining(
        &mut self,
        regions: &[Region],
        region_index: usize,
        shape_index: usize,
    ) -> bool {
        if self.stop.is_stopped() {
            return false;
        }

        let remaining_regions: usize = regions.len().saturating_sub(region_index);
        let remaining_shapes: usize = self.num_shapes.saturating_sub(shape_index);

        // Each region needs at least one shape
        if remaining_regions > remaining_shapes {
            return false;
        }

        let mut min_shapes_can_fit: usize = 0;
        let mut max_shapes_can_fit: usize = 0;

        for region in regions.iter().skip(region_index) {
            if self.stop.is_stopped() {
                return false;
            }

            let num_cells: usize = region.len();
            if num_cells < self.bounds.min {
                return false;
            }

            min_shapes_can_fit += self.min_shapes.get(num_cells);
            if min_shapes_can_fit > remaining_shapes {
                return false;
            }

            let max_shapes: usize = num_cells / self.bounds.min;
            if max_shapes == 0 {
                return false;
            }
            max_shapes_can_fit += max_shapes;
        }

        max_shapes_can_fit >= remaining_shapes
    }

    /// Return the number of shapes needed to cover `cells` cells exactly, or `0` if impossible.
    pub fn min_shapes_to_fill(&mut self, cells: usize) -> usize {
        self.min_shapes.get(cells)
    }

    /// Add `cell` to the shape being built, then either complete the shape or grow it further.
    ///
    /// `shape` holds the cells of the shape sorted by column and then by row. `frontier` holds
    /// the empty neighbours of the shape that have not been tried yet at this depth. `tried`
    /// holds the shapes already explored from the current seed cell.
    #[allow(clippy::too_many_arguments)]
    fn spread_shape(
        &mut self,
        regions: &[Region],
        region_index: usize,
        shape_index: usize,
        cell: usize,
        shape: &mut Vec<usize>,
        frontier: &mut Vec<usize>,
        tried: &mut HashSet<ShapeKey>,
    ) -> bool {
        if self.stop.is_stopped() {
            return false;
        }

        self.board.set_shape(cell, Some(shape_index));
        self.insert_sorted(cell, shape);

        if !tried.insert(ShapeKey(shape.clone())) {
            self.remove_from_shape(cell, shape);
            return false;
        }

        if shape.len() == self.bounds.max {
            if self.shape_placed(regions, region_index, shape_index) {
                return true;
            }
        } else {
            let frontier_len: usize = frontier.len();
            for neighbour in self.board.neighbours(cell, CellFilter::Empty) {
                if !frontier.contains(&neighbour) {
                    frontier.push(neighbour);
                }
            }

            // Try to spread the shape to each cell of the frontier
            let mut i: usize = 0;
            while i < frontier.len() {
                if self.stop.is_stopped() {
                    return false;
                }

                let next: usize = frontier.remove(i);
                if self.spread_shape(
                    regions,
                    region_index,
                    shape_index,
                    next,
                    shape,
                    frontier,
                    tried,
                ) {
                    return true;
                }
                frontier.insert(i, next);
                i += 1;
            }
            frontier.truncate(frontier_len);

            // Growing the shape any further leaves the board unsolvable. If the shape is already
            // large enough, then try to fill the rest of the board with it as it is.
            if shape.len() >= self.bounds.min
                && self.shape_placed(regions, region_index, shape_index)
            {
                return true;
            }
        }

        self.remove_from_shape(cell, shape);
        false
    }

    /// Continue the search after a shape has been completed in `regions[region_index]`.
    fn shape_placed(
        &mut self,
        regions: &[Region],
        region_index: usize,
        shape_index: usize,
    ) -> bool {
        if self.stop.is_stopped() {
            return false;
        }

        // The new shape can split what is left of the region
        let mut new_regions: Vec<Region> =
            regions::partition(self.board, regions[region_index].cells(), CellFilter::Empty);

        if new_regions.is_empty() {
            return self.fill_regions(regions, region_index + 1, shape_index + 1);
        }

        debug!(
            "    Shape {shape_index} placed, {} region(s) left in region {}",
            new_regions.len(),
            region_index + 1
        );
        new_regions.extend_from_slice(&regions[region_index + 1..]);
        self.fill_regions(&new_regions, 0, shape_index + 1)
    }

    /// Insert the cell in the shape, keeping the shape sorted by column and then by row.
    fn insert_sorted(&self, cell: usize, shape: &mut Vec<usize>) {
        let key: (usize, usize) = {
            let c = self.board.cell(cell);
            (c.x, c.y)
        };
        let position: usize = shape.partition_point(|id| {
            let c = self.board.cell(*id);
            (c.x, c.y) < key
        });
        shape.insert(position, cell);
    }

    /// Remove the cell from the shape and clear its assignment.
    fn remove_from_shape(&mut self, cell: usize, shape: &mut Vec<usize>) {
        if let Some(position) = shape.iter().position(|id| *id == cell) {
            shape.remove(position);
        }
        self.board.set_shape(cell, None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::regions::partition_board;
    use crate::generator::topology::{GridShape, Topology};

    fn square(x_cells: usize, y_cells: usize) -> Board {
        Board::new(
            Topology::new(GridShape::Square, false),
            x_cells,
            y_cells,
            None,
        )
    }

    #[test]
    fn min_shape_count_takes_largest_sizes_first() {
        let mut count = MinShapeCount::new(ShapeBounds::new(2, 4));
        assert_eq!(count.get(1), 0);
        assert_eq!(count.get(4), 1);
        assert_eq!(count.get(5), 2);
        assert_eq!(count.get(9), 3);
        assert_eq!(count.get(16), 4);

        let mut fixed = MinShapeCount::new(ShapeBounds::new(3, 3));
        assert_eq!(fixed.get(9), 3);
        assert_eq!(fixed.get(10), 0);
    }

    #[test]
    fn min_shape_count_unbounded() {
        let mut count = MinShapeCount::new(ShapeBounds::new(1, UNBOUNDED));
        assert_eq!(count.get(1), 1);
        assert_eq!(count.get(225), 1);
    }

    #[test]
    fn feasibility_check() {
        let mut board = square(3, 3);
        let regions: Vec<Region> = partition_board(&board);

        // 9 cells cannot hold 5 shapes of at least 2 cells
        let mut packer = ShapePacker::new(&mut board, 5, ShapeBounds::new(2, 9), StopHandle::new());
        assert!(!packer.can_fill_remaining(&regions, 0, 0));

        // 9 cells cannot be covered by a single shape of at most 4 cells
        let mut packer = ShapePacker::new(&mut board, 1, ShapeBounds::new(1, 4), StopHandle::new());
        assert!(!packer.can_fill_remaining(&regions, 0, 0));

        let mut packer = ShapePacker::new(&mut board, 3, ShapeBounds::new(3, 3), StopHandle::new());
        assert!(packer.can_fill_remaining(&regions, 0, 0));
    }

    #[test]
    fn fills_a_strip_with_dominoes() {
        let mut board = square(6, 1);
        let regions: Vec<Region> = partition_board(&board);
        let mut packer = ShapePacker::new(&mut board, 3, ShapeBounds::new(2, 2), StopHandle::new());

        assert!(packer.fill_regions(&regions, 0, 0));
        let matrix: Vec<Vec<i32>> = board.to_matrix();
        assert_eq!(matrix, vec![vec![2, 2, 3, 3, 4, 4]]);
    }

    #[test]
    fn remaining_cells_are_partitioned_again() {
        // The first shape takes five cells, the second one the four cells left
        let mut board = square(3, 3);
        let regions: Vec<Region> = partition_board(&board);
        let mut packer = ShapePacker::new(&mut board, 2, ShapeBounds::new(4, 5), StopHandle::new());

        assert!(packer.fill_regions(&regions, 0, 0));
        assert_eq!(
            board.to_matrix(),
            vec![vec![2, 2, 2], vec![2, 2, 3], vec![3, 3, 3]]
        );
    }

    #[test]
    fn failure_restores_the_board() {
        // No shape of exactly three cells covers a strip of four cells
        let mut board = square(4, 1);
        let regions: Vec<Region> = partition_board(&board);
        let mut packer = ShapePacker::new(&mut board, 1, ShapeBounds::new(3, 3), StopHandle::new());

        assert!(!packer.fill_regions(&regions, 0, 0));
        assert!(packer.iteration > 0);
        assert!(board.iter().all(|c| c.shape.is_none()));
    }

    #[test]
    fn stopped_search_fails() {
        let mut board = square(4, 4);
        let regions: Vec<Region> = partition_board(&board);
        let stop = StopHandle::new();
        stop.stop();
        let mut packer = ShapePacker::new(&mut board, 4, ShapeBounds::new(4, 4), stop);
        assert!(!packer.fill_regions(&regions, 0, 0));
        assert_eq!(packer.iteration, 0);
    }
}
