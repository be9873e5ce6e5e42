/*
config.rs

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

//! Build-time and tuning constants.

/// Version of the package, as declared in `Cargo.toml`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Long version string displayed by `--version`.
pub const COPYRIGHT_NOTICE: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "\nCopyright 2025 Hervé Quatremain\n",
    "License GPL-3.0-or-later <https://www.gnu.org/licenses/>"
);

/// Largest number of cells along either side of a board.
///
/// The search recurses once per placed cell, so the board size also bounds the recursion depth.
pub const MAX_GRID_SIZE: usize = 15;

/// Number of grow moves that the randomizer tries after the board has been filled.
pub const DEFAULT_GROW_ITERATIONS: usize = 1000;

/// Delay between two polls of a background generation.
pub const WORKER_POLL_MS: u64 = 20;

/// Name of the level file when none is configured.
pub const DEFAULT_LEVEL_FILENAME: &str = "level";
