/*
generation_tests.rs

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

mod common;

use shapefill::generator::auto_generation::{
    AutoGeneration, GeneratedGrid, GenerationError, GenerationParams,
};
use shapefill::generator::packer::{ShapeBounds, UNBOUNDED};
use shapefill::generator::topology::GridShape;
use shapefill::generator::worker::GenerationWorker;
use std::time::Duration;

fn generate(
    params: &GenerationParams,
    seed: u64,
) -> Result<Option<GeneratedGrid>, GenerationError> {
    AutoGeneration::new(params.clone(), Some(seed)).generate()
}

#[test]
fn square_board_with_four_tetrominoes() {
    common::init_logger();
    let params = GenerationParams::new(GridShape::Square, 4, 4, 4, 4, 4);

    let grid: GeneratedGrid = generate(&params, 1).unwrap().unwrap();
    common::assert_valid_grid(&grid, &params);
    assert_eq!(grid.shape_sizes(), vec![4, 4, 4, 4]);
}

#[test]
fn too_many_shapes_for_the_board() {
    common::init_logger();
    let params = GenerationParams::new(GridShape::Square, 3, 3, 5, 2, 4);

    assert_eq!(
        generate(&params, 1),
        Err(GenerationError::InfeasibleConstraints)
    );
    assert_eq!(
        GenerationError::InfeasibleConstraints.to_string(),
        "Could not fill board with shapes."
    );
}

#[test]
fn single_shape_covers_the_region() {
    common::init_logger();
    let mut params = GenerationParams::new(GridShape::Square, 3, 2, 1, 1, 5);
    params.cell_types = Some(vec![vec![-1, -1, -1], vec![-1, -1, 0]]);

    let grid: GeneratedGrid = generate(&params, 1).unwrap().unwrap();
    common::assert_valid_grid(&grid, &params);
    assert_eq!(grid.cells, vec![vec![2, 2, 2], vec![2, 2, 0]]);
}

#[test]
fn blocks_split_the_board_in_regions() {
    common::init_logger();
    let mut params = GenerationParams::new(GridShape::Square, 5, 3, 2, 6, 6);
    params.cell_types = Some(vec![vec![-1, -1, 1, -1, -1]; 3]);

    let grid: GeneratedGrid = generate(&params, 1).unwrap().unwrap();
    common::assert_valid_grid(&grid, &params);
    assert_eq!(grid.shape_sizes(), vec![6, 6]);
}

#[test]
fn sizes_are_relaxed_for_several_regions() {
    common::init_logger();
    // Two regions of two cells cannot hold shapes of three cells or more
    let mut params = GenerationParams::new(GridShape::Square, 5, 1, 2, 3, 4);
    params.cell_types = Some(vec![vec![-1, -1, 1, -1, -1]]);

    let grid: GeneratedGrid = generate(&params, 1).unwrap().unwrap();
    assert_eq!(grid.bounds, ShapeBounds::new(1, UNBOUNDED));
    assert_eq!(grid.cells, vec![vec![2, 2, 1, 3, 3]]);
}

#[test]
fn search_fails_on_a_feasible_looking_board() {
    common::init_logger();
    // Four cells pass the count check for one 3-cell shape, but one cell stays uncovered
    let params = GenerationParams::new(GridShape::Square, 4, 1, 1, 3, 3);

    let mut generation = AutoGeneration::new(params, Some(1));
    assert_eq!(generation.generate(), Err(GenerationError::SearchExhausted));
    assert!(generation.iteration > 0);
}

#[test]
fn board_without_playable_cells() {
    let mut params = GenerationParams::new(GridShape::Square, 2, 1, 1, 1, 2);
    params.cell_types = Some(vec![vec![0, 1]]);
    assert_eq!(
        generate(&params, 1),
        Err(GenerationError::InfeasibleConstraints)
    );
}

#[test]
fn invalid_parameters_are_rejected() {
    for params in [
        GenerationParams::new(GridShape::Square, 0, 3, 1, 1, 2),
        GenerationParams::new(GridShape::Triangle, 3, 16, 1, 1, 2),
        GenerationParams::new(GridShape::Hexagon, 3, 3, 0, 1, 2),
        GenerationParams::new(GridShape::Square, 3, 3, 2, 3, 2),
    ] {
        assert!(matches!(
            generate(&params, 1),
            Err(GenerationError::InvalidParameters(_))
        ));
    }
}

#[test]
fn every_tessellation_gives_valid_boards() {
    common::init_logger();
    let mut hexagon = GenerationParams::new(GridShape::Hexagon, 6, 6, 9, 3, 5);
    let mut rotated = hexagon.clone();
    rotated.rotate_hexagon = true;
    let triangle = GenerationParams::new(GridShape::Triangle, 6, 4, 6, 3, 5);
    let square = GenerationParams::new(GridShape::Square, 7, 5, 7, 3, 7);
    hexagon.cell_types = Some(vec![
        vec![0, -1, -1, -1, -1, 0],
        vec![-1, -1, -1, -1, -1, -1],
        vec![-1, -1, 1, 1, -1, -1],
        vec![-1, -1, -1, -1, -1, -1],
        vec![-1, -1, -1, -1, -1, -1],
        vec![0, -1, -1, -1, -1, 0],
    ]);
    hexagon.num_shapes = 8;

    for params in [hexagon, rotated, triangle, square] {
        for seed in 0..3 {
            let grid: GeneratedGrid = generate(&params, seed).unwrap().unwrap();
            common::assert_valid_grid(&grid, &params);
        }
    }
}

#[test]
fn grow_moves_keep_boards_valid() {
    common::init_logger();
    for iterations in [0, 1, 10, 1000] {
        let mut params = GenerationParams::new(GridShape::Square, 6, 6, 6, 4, 8);
        params.grow_iterations = iterations;

        let grid: GeneratedGrid = generate(&params, 17).unwrap().unwrap();
        common::assert_valid_grid(&grid, &params);
        assert!(grid.moves <= iterations);
    }
}

#[test]
fn same_seed_gives_the_same_board() {
    let params = GenerationParams::new(GridShape::Triangle, 8, 6, 8, 4, 8);

    let first: GeneratedGrid = generate(&params, 1234).unwrap().unwrap();
    let second: GeneratedGrid = generate(&params, 1234).unwrap().unwrap();
    assert_eq!(first, second);
    assert_eq!(first.seed, 1234);
}

#[test]
fn worker_can_be_stopped() {
    common::init_logger();
    let params = GenerationParams::new(GridShape::Hexagon, 15, 15, 40, 5, 6);
    let worker = GenerationWorker::start(params.clone(), Some(3)).unwrap();
    worker.stop();

    // The search may still complete before it sees the request
    match worker.wait(Some(Duration::from_secs(60))) {
        Ok(None) => (),
        Ok(Some(grid)) => common::assert_valid_grid(&grid, &params),
        Err(e) => panic!("unexpected error: {e}"),
    }
}

#[test]
fn worker_timeout_stops_the_search() {
    let params = GenerationParams::new(GridShape::Square, 15, 15, 45, 5, 5);
    let worker = GenerationWorker::start(params.clone(), Some(8)).unwrap();

    match worker.wait(Some(Duration::from_millis(1))) {
        Ok(None) => (),
        Ok(Some(grid)) => common::assert_valid_grid(&grid, &params),
        Err(e) => panic!("unexpected error: {e}"),
    }
}
