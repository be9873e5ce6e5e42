/*
lib.rs

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

//! Board generator for block-fitting puzzles.
//!
//! The [`generator`] module builds boards covered with shapes on square, triangle, and hexagon
//! grids. The [`level`] module stores the boards as level records that the game loads, and the
//! [`saver`] module writes them to disk together with the level creator [`settings`].

pub mod config;
pub mod generator;
pub mod level;
pub mod saver;
pub mod settings;
