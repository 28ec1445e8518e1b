//
// pgpmac database seeding tools
// Copyright (C) 2013 Keith Brister
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.
//

//! Scoped access to an INI source on disk.

use std::{
    fs::File,
    io::Read,
    path::{Path, PathBuf},
};

use crate::{
    document::{CasePolicy, IniDocument},
    error::Error,
};

/// Single-use handle to an INI file.
///
/// The file is held open from [`open`](Self::open) until the first call
/// to [`parse`](Self::parse), which reads it to the end and closes it.
/// Calling `parse` again reports [`Error::Consumed`].
#[derive(Debug)]
pub struct IniFile {
    path: PathBuf,
    source: Option<File>,
    policy: CasePolicy,
}

impl IniFile {
    /// Opens `path` with the default case-insensitive policy.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        Self::open_with(path, CasePolicy::default())
    }

    /// Opens `path` with an explicit case policy.
    pub fn open_with(path: impl AsRef<Path>, policy: CasePolicy) -> Result<Self, Error> {
        let path = path.as_ref().to_path_buf();
        let source =
            File::open(&path).map_err(|source| Error::Open { path: path.clone(), source })?;
        Ok(Self { path, source: Some(source), policy })
    }

    /// Path this handle was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the whole input and builds the document.
    ///
    /// The file handle is released when this returns, whether the read
    /// succeeded or not; the input must be valid UTF-8.
    pub fn parse(&mut self) -> Result<IniDocument, Error> {
        let mut source =
            self.source.take().ok_or_else(|| Error::Consumed { path: self.path.clone() })?;

        let mut text = String::new();
        source
            .read_to_string(&mut text)
            .map_err(|source| Error::Read { path: self.path.clone(), source })?;

        Ok(IniDocument::parse_str(&text, self.policy))
    }
}
