/*
generator.rs

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

//! Generate boards filled with shapes.
//!
//! A board is a rectangular grid of square, triangle, or hexagon cells. Some cells can be blank
//! (outside the puzzle) or blocks (obstacles). The generator covers every other cell with a fixed
//! number of connected shapes, each shape within a range of sizes.
//!
//! The generation has three phases:
//!
//! * The empty cells are split into connected regions by [`regions::partition_board`].
//!   Adjacency depends on the tessellation, see [`topology::Topology`].
//! * The regions are filled by the backtracking search of the [`packer::ShapePacker`] object.
//!   If the search fails, no board is returned.
//! * The shapes are reshaped at random by the [`randomizer::Randomizer`] object, one cell at a
//!   time, without ever breaking the board.
//!
//! [`auto_generation::AutoGeneration`] chains the three phases.
//! [`worker::GenerationWorker`] runs a generation in a background thread that can be stopped.

pub mod auto_generation;
pub mod cells;
pub mod packer;
pub mod randomizer;
pub mod regions;
pub mod topology;
pub mod worker;
