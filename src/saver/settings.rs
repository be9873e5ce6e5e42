/*
settings.rs

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

//! Save and restore the level creator settings.
//!
//! The saved object is a serialization of the [`GeneratorSettings`] object in JSON format by
//! using [`serde`].

use log::debug;
use std::error::Error;
use std::fs::{File, remove_file};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::settings::GeneratorSettings;

/// Object to save and restore the settings.
pub struct SaverSettings {
    /// Path to the settings file.
    save_file: PathBuf,
}

impl SaverSettings {
    /// Create a [`SaverSettings`] object for the given settings file.
    pub fn new(save_file: &Path) -> Self {
        debug!("Settings file: {save_file:?}");
        Self {
            save_file: save_file.to_path_buf(),
        }
    }

    /// Create a [`SaverSettings`] object for the `settings.json` file in the given directory.
    pub fn in_dir(mut data_dir: PathBuf) -> Self {
        data_dir.push("settings.json");
        Self::new(&data_dir)
    }

    /// Retrieve the [`GeneratorSettings`] object from the settings file.
    ///
    /// Return the [`GeneratorSettings`] object or None if the settings file does not exist.
    pub fn get_settings(&self) -> Result<Option<GeneratorSettings>, Box<dyn Error>> {
        let file: File = match File::open(&self.save_file) {
            Ok(f) => f,
            Err(error) => match error.kind() {
                ErrorKind::NotFound => return Ok(None),
                _ => return Err(Box::new(error)),
            },
        };
        let reader: BufReader<File> = BufReader::new(file);
        let settings: GeneratorSettings = serde_json::from_reader(reader)?;
        Ok(Some(settings))
    }

    /// Save the provided [`GeneratorSettings`] object.
    pub fn save_settings(&self, settings: &GeneratorSettings) -> Result<(), Box<dyn Error>> {
        let file: File = File::create(&self.save_file)?;
        let mut writer: BufWriter<File> = BufWriter::new(file);

        serde_json::to_writer_pretty(&mut writer, settings)?;
        writer.flush()?;
        Ok(())
    }

    /// Delete the settings file.
    pub fn delete_save(&self) {
        let _ = remove_file(&self.save_file);
    }
}
