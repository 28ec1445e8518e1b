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

//! Parser for the MD2 microdiffractometer INI configuration dialect.
//!
//! The MD2 ships its hardware description in loosely specified Windows
//! style INI files. Sections may imply nesting in their names
//! (`[CentringXYTable.XCentringMotor]`) but the nesting carries no
//! meaning, comments start with `;`, and nothing is escaped. Section and
//! option names are matched case insensitively unless the caller asks
//! otherwise.
//!
//! Parsing is best effort: a line that is not a comment, a section header
//! or a single `key = value` pair is dropped without complaint, since the
//! files are hand edited and have always contained a certain amount of
//! debris. The only reported failures are opening and reading the file
//! itself.

mod document;
mod error;
mod reader;

pub use document::{CasePolicy, IniDocument, DEFAULT_SECTION};
pub use error::{Error, LookupError};
pub use reader::IniFile;
