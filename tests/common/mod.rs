/*
common/mod.rs

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

use shapefill::generator::auto_generation::{GeneratedGrid, GenerationParams};
use shapefill::generator::topology::Topology;
use std::collections::{BTreeMap, VecDeque};

/// Initialize the logger for a test.
#[allow(dead_code)]
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Verify every property of a generated board:
///  - the blank cells and blocks of the parameters are kept,
///  - every other cell is covered by a shape,
///  - there are exactly `num_shapes` shapes, within the effective size bounds,
///  - every shape is connected.
///
/// # Panics
///  - If any property does not hold.
#[allow(dead_code)]
pub fn assert_valid_grid(grid: &GeneratedGrid, params: &GenerationParams) {
    assert_eq!(grid.y_cells(), params.y_cells, "number of rows");
    assert_eq!(grid.x_cells(), params.x_cells, "number of columns");
    assert_eq!(grid.num_shapes, params.num_shapes);

    let mut shapes: BTreeMap<i32, Vec<(usize, usize)>> = BTreeMap::new();
    for (y, row) in grid.cells.iter().enumerate() {
        assert_eq!(row.len(), params.x_cells, "row {y} length");
        for (x, value) in row.iter().enumerate() {
            let cell_type: i32 = params
                .cell_types
                .as_ref()
                .map_or(-1, |types| types[y][x]);
            match cell_type {
                0 | 1 => assert_eq!(*value, cell_type, "cell ({x}, {y}) changed type"),
                _ => {
                    assert!(*value >= 2, "cell ({x}, {y}) is not covered");
                    shapes.entry(*value).or_default().push((x, y));
                }
            }
        }
    }

    let expected: Vec<i32> = (2..params.num_shapes as i32 + 2).collect();
    assert_eq!(shapes.keys().copied().collect::<Vec<i32>>(), expected);

    for (value, cells) in &shapes {
        assert!(
            grid.bounds.contains(cells.len()),
            "shape {value} has {} cells, outside {:?}",
            cells.len(),
            grid.bounds
        );
        assert!(
            is_connected(grid.topology, params.x_cells, params.y_cells, cells),
            "shape {value} is not connected: {cells:?}"
        );
    }
}

/// Whether the cells form a single connected set.
#[allow(dead_code)]
pub fn is_connected(
    topology: Topology,
    x_cells: usize,
    y_cells: usize,
    cells: &[(usize, usize)],
) -> bool {
    let Some(first) = cells.first() else {
        return false;
    };
    let mut seen: Vec<(usize, usize)> = vec![*first];
    let mut queue: VecDeque<(usize, usize)> = VecDeque::from([*first]);

    while let Some((x, y)) = queue.pop_front() {
        for n in topology.adjacent(x, y, x_cells, y_cells) {
            if cells.contains(&n) && !seen.contains(&n) {
                seen.push(n);
                queue.push_back(n);
            }
        }
    }
    seen.len() == cells.len()
}
