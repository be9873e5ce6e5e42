/*
levels.rs

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

//! Write and read level files.
//!
//! Each level is stored in its own text file, `<folder>/<filename>.txt`. When that file already
//! exists, a number is appended to the name: `level 1.txt`, `level 2.txt`, and so on. Existing
//! level files are never overwritten.

use log::{debug, info};
use std::error::Error;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::config::DEFAULT_LEVEL_FILENAME;
use crate::level::LevelRecord;

/// Object to write level files in a directory.
pub struct SaverLevels {
    /// Directory of the level files.
    folder: PathBuf,

    /// Base name of the level files.
    filename: String,
}

impl SaverLevels {
    /// Create a [`SaverLevels`] object.
    ///
    /// An empty `filename` is replaced by `level`.
    pub fn new(folder: PathBuf, filename: &str) -> Self {
        let filename: &str = filename.trim();
        Self {
            folder,
            filename: if filename.is_empty() {
                DEFAULT_LEVEL_FILENAME.to_string()
            } else {
                filename.to_string()
            },
        }
    }

    /// Return the path of the `index`th candidate file name: `level.txt` for `0`, then
    /// `level <index>.txt`.
    pub fn candidate(&self, index: usize) -> PathBuf {
        let name: String = if index == 0 {
            format!("{}.txt", self.filename)
        } else {
            format!("{} {index}.txt", self.filename)
        };
        self.folder.join(name)
    }

    /// Write the level in a new file and return the path of that file.
    pub fn save_level(&self, level: &LevelRecord) -> Result<PathBuf, Box<dyn Error>> {
        fs::create_dir_all(&self.folder)?;

        let mut index: usize = 0;
        let (path, file): (PathBuf, File) = loop {
            let path: PathBuf = self.candidate(index);
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(f) => break (path, f),
                Err(error) if error.kind() == ErrorKind::AlreadyExists => {
                    debug!("{path:?} already exists");
                    index += 1;
                }
                Err(error) => return Err(Box::new(error)),
            }
        };

        let mut writer: BufWriter<File> = BufWriter::new(file);
        writer.write_all(level.encode().as_bytes())?;
        writer.flush()?;
        info!("Level saved in {path:?}");
        Ok(path)
    }
}

/// Read a level file.
///
/// Return the [`LevelRecord`] object or None if the file does not exist.
pub fn read_level(path: &Path) -> Result<Option<LevelRecord>, Box<dyn Error>> {
    let contents: String = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(error) => match error.kind() {
            ErrorKind::NotFound => return Ok(None),
            _ => return Err(Box::new(error)),
        },
    };
    Ok(Some(LevelRecord::parse(&contents)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn temp_dir(name: &str) -> PathBuf {
        let mut dir: PathBuf = env::temp_dir();
        dir.push(format!("shapefill-levels-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn file_names_are_unique() {
        let dir: PathBuf = temp_dir("unique");
        let saver = SaverLevels::new(dir.clone(), "pack");
        let level: LevelRecord = "1,0,False,1,2,2,2".parse().unwrap();

        let first: PathBuf = saver.save_level(&level).unwrap();
        let second: PathBuf = saver.save_level(&level).unwrap();
        let third: PathBuf = saver.save_level(&level).unwrap();

        assert_eq!(first, dir.join("pack.txt"));
        assert_eq!(second, dir.join("pack 1.txt"));
        assert_eq!(third, dir.join("pack 2.txt"));
        assert_eq!(read_level(&second).unwrap(), Some(level));

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn empty_name_falls_back_to_level() {
        let saver = SaverLevels::new(PathBuf::from("out"), "  ");
        assert_eq!(saver.candidate(0), PathBuf::from("out/level.txt"));
        assert_eq!(saver.candidate(3), PathBuf::from("out/level 3.txt"));
    }

    #[test]
    fn missing_and_invalid_files() {
        let dir: PathBuf = temp_dir("invalid");
        assert!(read_level(&dir.join("none.txt")).unwrap().is_none());

        fs::create_dir_all(&dir).unwrap();
        let path: PathBuf = dir.join("bad.txt");
        fs::write(&path, "1,0,False,2,2,2").unwrap();
        assert!(read_level(&path).is_err());

        let _ = fs::remove_dir_all(dir);
    }
}
