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

//! Key-value command stream generation.
//!
//! One command per line, ready to be piped through `redis-cli`. Seed
//! records use `HSETNX` so nothing live is ever clobbered; authoritative
//! values read from the MD2 files use `HSET` and are announced with a
//! `PUBLISH` of the changed key, which is the contract the runtime's
//! redis listener expects from every writer.

use std::io::{self, Write};

use crate::model;

/// Writes the command stream and keeps the record counts.
pub struct Emitter<W: Write> {
    out: W,
    publisher: String,
    records: usize,
    published: usize,
}

impl<W: Write> Emitter<W> {
    pub fn new(out: W, publisher: impl Into<String>) -> Self {
        Self { out, publisher: publisher.into(), records: 0, published: 0 }
    }

    /// Count of all records written so far.
    pub fn records(&self) -> usize {
        self.records
    }

    /// Count of PUBLISH notifications written so far.
    pub fn published(&self) -> usize {
        self.published
    }

    /// Seed record with a quoted value: `HSETNX <key> <field> '<value>'`.
    pub fn seed(&mut self, key: &str, field: &str, value: &str) -> io::Result<()> {
        self.records += 1;
        writeln!(self.out, "HSETNX {key} {field} '{value}'")
    }

    /// Seed record with a bare token value: `HSETNX <key> <field> <value>`.
    pub fn seed_bare(&mut self, key: &str, field: &str, value: &str) -> io::Result<()> {
        self.records += 1;
        writeln!(self.out, "HSETNX {key} {field} {value}")
    }

    /// Authoritative record: `HSET` overwriting the stored value, then a
    /// `PUBLISH` naming the changed key.
    pub fn store(&mut self, key: &str, field: &str, value: &str) -> io::Result<()> {
        self.records += 1;
        self.published += 1;
        writeln!(self.out, "HSET {key} {field} '{value}'")?;
        writeln!(self.out, "PUBLISH {} {key}", self.publisher)
    }

    /// Flushes the underlying stream.
    pub fn finish(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    /// Consumes the emitter, returning the underlying stream.
    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Writes the full static device model under `head`.
pub fn seed_device_model<W: Write>(em: &mut Emitter<W>, head: &str) -> io::Result<()> {
    em.seed(&format!("{head}.md2_pmac.init"), "VALUE", model::PMAC_INIT)?;
    em.seed_bare(&format!("{head}.md2_status_code"), "VALUE", model::MD2_STATUS_CODE)?;

    for device in model::DEVICES {
        let motor = device.name;

        em.seed(&format!("{head}.{motor}.name"), "VALUE", motor)?;
        em.seed_bare(&format!("{head}.{motor}.name"), "DBRTYPE", "0")?;
        em.seed(&format!("{head}.{motor}.position"), "VALUE", "")?;
        em.seed_bare(&format!("{head}.{motor}.position"), "DBRTYPE", "6")?;

        // Device overrides come first: with set-if-absent semantics the
        // generic defaults below cannot displace them.
        for (param, value) in device.params {
            em.seed(&format!("{head}.{motor}.{param}"), "VALUE", value)?;
        }

        for field in model::MOTOR_FIELDS {
            let key = format!("{head}.{motor}.{}", field.name);
            em.seed(&key, "VALUE", field.default)?;
            em.seed(&key, "DBRTYPE", &field.dbr.code().to_string())?;
        }

        if let Some((_, presets)) =
            model::PRESETS.iter().find(|(device, _)| *device == motor)
        {
            for (i, preset) in presets.iter().enumerate() {
                em.seed_bare(&format!("{head}.{motor}.presets.{i}.name"), "VALUE", preset.name)?;
                em.seed_bare(
                    &format!("{head}.{motor}.presets.{i}.position"),
                    "VALUE",
                    preset.position,
                )?;
                if let Some(tune) = preset.can_tune {
                    em.seed_bare(&format!("{head}.{motor}.presets.{i}.canTune"), "VALUE", tune)?;
                }
            }
            em.seed_bare(
                &format!("{head}.{motor}.presets.length"),
                "VALUE",
                &presets.len().to_string(),
            )?;
        }
    }

    for zoom in model::ZOOM_LEVELS {
        let key = |field: &str| format!("{head}.cam.zoom.{}.{field}", zoom.level);
        em.seed_bare(&key("FrontLightIntensity"), "VALUE", zoom.front_light)?;
        em.seed_bare(&key("LightIntensity"), "VALUE", zoom.back_light)?;
        em.seed_bare(&key("MotorPosition"), "VALUE", zoom.motor_position)?;
        em.seed_bare(&key("ScaleX"), "VALUE", zoom.scale_x)?;
        em.seed_bare(&key("ScaleY"), "VALUE", zoom.scale_y)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> String {
        let mut em = Emitter::new(Vec::new(), "mk_pgpmac_redis");
        seed_device_model(&mut em, "stns.2").unwrap();
        String::from_utf8(em.into_inner()).unwrap()
    }

    #[test]
    fn starts_with_pmac_initializer() {
        let out = seeded();
        let mut lines = out.lines();

        assert_eq!(
            lines.next().unwrap(),
            r#"HSETNX stns.2.md2_pmac.init VALUE '{"ENABLE PLCC 0","DISABLE PLCC 1","ENABLE PLCC 2",I5=3}'"#
        );
        assert_eq!(lines.next().unwrap(), "HSETNX stns.2.md2_status_code VALUE 7");
    }

    #[test]
    fn override_precedes_generic_default() {
        let out = seeded();

        let first = out.lines().position(|l| l == "HSETNX stns.2.omega.u2c VALUE '12800'");
        let second = out.lines().position(|l| l == "HSETNX stns.2.omega.u2c VALUE '1.0'");
        assert!(first.unwrap() < second.unwrap());
    }

    #[test]
    fn every_field_gets_a_dbrtype() {
        let out = seeded();

        assert!(out.contains("HSETNX stns.2.phi.motor_num VALUE '-1'"));
        assert!(out.contains("HSETNX stns.2.phi.motor_num DBRTYPE '1'"));
        assert!(out.contains("HSETNX stns.2.phi.u2c DBRTYPE '6'"));
    }

    #[test]
    fn presets_are_numbered_and_terminated() {
        let out = seeded();

        assert!(out.contains("HSETNX stns.2.appz.presets.0.name VALUE In"));
        assert!(out.contains("HSETNX stns.2.appz.presets.1.position VALUE 71.777"));
        assert!(out.contains("HSETNX stns.2.appz.presets.2.canTune VALUE 0"));
        assert!(out.contains("HSETNX stns.2.appz.presets.length VALUE 3"));

        // Untunable presets carry no canTune record.
        assert!(out.contains("HSETNX stns.2.fastShutter.presets.0.name VALUE Open"));
        assert!(!out.contains("HSETNX stns.2.fastShutter.presets.0.canTune"));
    }

    #[test]
    fn zoom_levels_cover_all_five_fields() {
        let out = seeded();

        assert!(out.contains("HSETNX stns.2.cam.zoom.1.FrontLightIntensity VALUE 4.0"));
        assert!(out.contains("HSETNX stns.2.cam.zoom.10.MotorPosition VALUE 0"));
        assert!(out.contains("HSETNX stns.2.cam.zoom.5.ScaleY VALUE 1.011"));
        let zoom_lines = out.lines().filter(|l| l.contains(".cam.zoom.")).count();
        // 10 levels x 5 fields, plus the cam.zoom motor's own records.
        assert!(zoom_lines >= 50);
    }

    #[test]
    fn seeding_never_publishes() {
        let mut em = Emitter::new(Vec::new(), "mk_pgpmac_redis");
        seed_device_model(&mut em, "stns.2").unwrap();

        assert_eq!(em.published(), 0);
        assert!(!String::from_utf8(em.into_inner()).unwrap().contains("PUBLISH"));
    }

    #[test]
    fn store_publishes_the_changed_key() {
        let mut em = Emitter::new(Vec::new(), "tester");
        em.store("mdhard.2.omega", "MotorNumber", "1").unwrap();

        assert_eq!(em.records(), 1);
        assert_eq!(em.published(), 1);
        let out = String::from_utf8(em.into_inner()).unwrap();
        assert_eq!(
            out,
            "HSET mdhard.2.omega MotorNumber '1'\nPUBLISH tester mdhard.2.omega\n"
        );
    }

    #[test]
    fn custom_head_prefixes_every_record() {
        let mut em = Emitter::new(Vec::new(), "mk_pgpmac_redis");
        seed_device_model(&mut em, "stns.9").unwrap();

        let out = String::from_utf8(em.into_inner()).unwrap();
        assert!(out.lines().all(|l| l.starts_with("HSETNX stns.9.")));
    }
}
