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

//! Error types.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Failure to acquire or consume an INI source.
///
/// Malformed file *content* is never an error; see the crate docs.
#[derive(Debug, Error)]
pub enum Error {
    /// The input file could not be opened.
    #[error("cannot open {}: {source}", path.display())]
    Open {
        /// Path given to [`IniFile::open`](crate::IniFile::open).
        path: PathBuf,
        /// Underlying cause.
        source: io::Error,
    },
    /// The input file could not be read to the end.
    #[error("cannot read {}: {source}", path.display())]
    Read {
        /// Path of the open handle.
        path: PathBuf,
        /// Underlying cause.
        source: io::Error,
    },
    /// [`parse`](crate::IniFile::parse) was called on a handle whose input
    /// was already consumed.
    #[error("{} has already been parsed", path.display())]
    Consumed {
        /// Path of the spent handle.
        path: PathBuf,
    },
}

/// Failure to look up a section or option in a parsed document.
///
/// Callers that cannot tolerate this guard with
/// [`has_section`](crate::IniDocument::has_section) and
/// [`has_option`](crate::IniDocument::has_option) first.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LookupError {
    /// The requested section is not in the document.
    #[error("no such section: [{0}]")]
    UnknownSection(String),
    /// The section exists but the requested option does not.
    #[error("no option {option} in section [{section}]")]
    UnknownOption {
        /// Section that was searched.
        section: String,
        /// Option that was not found.
        option: String,
    },
}
