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

//! PMAC macro file for the MD2 gather buffer.
//!
//! The firmware PLC copies per-motor status and position registers into
//! the DPRAM block starting at $060100, fifteen motors in a fixed order:
//! status word 1 at $060101 + i, status word 2 at $060111 + i, actual
//! position at $060121 + i. The generated file gives each register an
//! M-variable and a readable alias so the PLC source does not hardcode
//! raw addresses.

use std::io::{self, Write};

/// Motors in gather-buffer order. Index is the register offset.
const GATHER_MOTORS: &[&str] = &[
    "omega",
    "alignx",
    "aligny",
    "alignz",
    "analyzer",
    "zoom",
    "aperturey",
    "aperturez",
    "capy",
    "capz",
    "scint",
    "centerx",
    "centery",
    "kappa",
    "phi",
];

const STATUS_1_ADDR: u32 = 0x060101;
const STATUS_2_ADDR: u32 = 0x060111;
const ACT_POS_ADDR: u32 = 0x060121;

const STATUS_1_MVAR: u32 = 5001;
const STATUS_2_MVAR: u32 = 5021;
const ACT_POS_MVAR: u32 = 5041;

/// ACC-11C analog outputs that live behind the motor block.
const DAC_CHANNELS: &[(&str, u32, u32)] = &[
    ("front_dac", 0x060135, 5061),
    ("back_dac", 0x060136, 5062),
    ("scint_piezo", 0x060137, 5063),
];

fn define(out: &mut impl Write, alias: &str, mvar: u32) -> io::Result<()> {
    writeln!(out, "#define {alias:<24}M{mvar}")
}

/// Writes the complete macro file.
pub fn write_macros(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "; MD2 gather buffer aliases ($060100 DPRAM block).")?;
    writeln!(out, "; Generated by pgpmac-seed. Do not edit.")?;

    for (i, motor) in GATHER_MOTORS.iter().enumerate() {
        let i = i as u32;
        writeln!(out)?;

        // 24 bit status words in the X and Y halves, 32 bit position.
        define(out, &format!("{motor}_status_1"), STATUS_1_MVAR + i)?;
        writeln!(out, "M{}->X:${:06X},0,24", STATUS_1_MVAR + i, STATUS_1_ADDR + i)?;
        define(out, &format!("{motor}_status_2"), STATUS_2_MVAR + i)?;
        writeln!(out, "M{}->Y:${:06X},0,24", STATUS_2_MVAR + i, STATUS_2_ADDR + i)?;
        define(out, &format!("{motor}_act_pos"), ACT_POS_MVAR + i)?;
        writeln!(out, "M{}->L:${:06X}", ACT_POS_MVAR + i, ACT_POS_ADDR + i)?;
    }

    writeln!(out)?;
    for (name, addr, mvar) in DAC_CHANNELS {
        define(out, name, *mvar)?;
        writeln!(out, "M{mvar}->Y:${addr:06X},8,16,S")?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn written() -> String {
        let mut out = Vec::new();
        write_macros(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn covers_all_fifteen_motors() {
        let out = written();

        for motor in GATHER_MOTORS {
            assert!(out.contains(&format!("{motor}_status_1")), "{motor} missing");
            assert!(out.contains(&format!("{motor}_status_2")), "{motor} missing");
            assert!(out.contains(&format!("{motor}_act_pos")), "{motor} missing");
        }
    }

    #[test]
    fn first_and_last_motor_addresses() {
        let out = written();

        assert!(out.contains("M5001->X:$060101,0,24"));
        assert!(out.contains("M5021->Y:$060111,0,24"));
        assert!(out.contains("M5041->L:$060121"));
        // phi is motor 14 in the buffer.
        assert!(out.contains("M5015->X:$06010F,0,24"));
        assert!(out.contains("M5055->L:$06012F"));
    }

    #[test]
    fn dac_channels_follow_the_motor_block() {
        let out = written();

        assert!(out.contains("M5061->Y:$060135,8,16,S"));
        assert!(out.contains("M5063->Y:$060137,8,16,S"));
    }

    #[test]
    fn aliases_pair_with_their_mvars() {
        let out = written();
        let lines: Vec<&str> = out.lines().collect();

        let i = lines.iter().position(|l| l.starts_with("#define omega_status_1")).unwrap();
        assert!(lines[i].ends_with("M5001"));
        assert!(lines[i + 1].starts_with("M5001->"));
    }
}
