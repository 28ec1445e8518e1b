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

//! Seed the beamline key-value store with the MD2 device model.
//!
//! Writes one store command per line, ready for `redis-cli`:
//!
//! ```text
//! pgpmac-seed -s 2 --hard-ini microdiff_hard.ini --pref-ini microdiff_pref.ini | redis-cli
//! ```

use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};
use pgpmac_ini::{CasePolicy, IniDocument, IniFile};

mod emit;
mod gather;
mod md2;
mod model;

use emit::Emitter;

/// Seed the beamline key-value store with the MD2 device model.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Station number used in generated key prefixes.
    #[arg(short, long, default_value_t = 2)]
    station: u32,

    /// Seed key prefix; defaults to stns.<station>.
    #[arg(long)]
    head: Option<String>,

    /// MD2 hardware description (microdiff_hard.ini).
    #[arg(long)]
    hard_ini: Option<PathBuf>,

    /// MD2 preferences (microdiff_pref.ini).
    #[arg(long)]
    pref_ini: Option<PathBuf>,

    /// Write the gather-buffer macro file for the PLC here.
    #[arg(short, long)]
    macro_out: Option<PathBuf>,

    /// Write the command stream here instead of standard output.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Publisher name used in change notifications.
    #[arg(long, default_value = "mk_pgpmac_redis")]
    publisher: String,

    /// Match INI section and option names case sensitively.
    #[arg(long)]
    case_sensitive: bool,
}

fn load_ini(path: &Path, policy: CasePolicy) -> Result<IniDocument> {
    let mut file = IniFile::open_with(path, policy)?;
    let doc = file.parse()?;
    debug!("{}: {} sections", path.display(), doc.sections().count());
    Ok(doc)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let policy = if args.case_sensitive { CasePolicy::Preserve } else { CasePolicy::Fold };
    let head = args.head.clone().unwrap_or_else(|| format!("stns.{}", args.station));

    let out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("cannot create {}", path.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    };
    let mut em = Emitter::new(out, args.publisher.clone());

    emit::seed_device_model(&mut em, &head).context("writing device model records")?;
    info!("device model: {} records under {head}", em.records());

    if let Some(path) = &args.hard_ini {
        let doc = load_ini(path, policy)?;
        let n = md2::import_hard(&doc, args.station, &mut em)
            .context("writing hardware records")?;
        info!("{}: imported {n} hardware values", path.display());
    }

    if let Some(path) = &args.pref_ini {
        let doc = load_ini(path, policy)?;
        let n = md2::import_pref(&doc, args.station, &mut em)
            .context("writing preference records")?;
        info!("{}: imported {n} preference values", path.display());
    }

    em.finish().context("flushing command stream")?;
    info!("{} records total, {} published", em.records(), em.published());

    if let Some(path) = &args.macro_out {
        let mut file = BufWriter::new(
            File::create(path).with_context(|| format!("cannot create {}", path.display()))?,
        );
        gather::write_macros(&mut file)
            .and_then(|()| file.flush())
            .with_context(|| format!("cannot write {}", path.display()))?;
        info!("wrote gather-buffer macros to {}", path.display());
    }

    Ok(())
}
