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

//! Translation of the MD2 vendor INI files into store records.
//!
//! The vendor names sections after mechanical assemblies and we name
//! records after pgpmac motors; the tables below carry the fixed mapping
//! between the two worlds. Anything the tables do not name is skipped,
//! like the reference implementation always has.

use std::io::{self, Write};

use log::debug;
use pgpmac_ini::IniDocument;

use crate::emit::Emitter;

/// MD2 hardware section and the pgpmac motor it describes.
const HARD_MOTORS: &[(&str, &str)] = &[
    ("ApertureYZTable.ApertureYMotor", "appy"),
    ("ApertureYZTable.ApertureZMotor", "appz"),
    ("CapillaryBSYZtable.CapillaryBSYMotor", "capy"),
    ("CapillaryBSYZtable.CapillaryBSZMotor", "capz"),
    ("CentringXYTable.XCentringMotor", "centering.x"),
    ("CentringXYTable.YCentringMotor", "centering.y"),
    ("MiniKappa.Kappa1", "kappa"),
    ("MiniKappa.Kappa2", "phi"),
    ("PHIAxisXYZTable.PHIXMotor", "align.x"),
    ("PHIAxisXYZTable.PHIYMotor", "align.y"),
    ("PHIAxisXYZTable.PHIZMotor", "align.z"),
    ("ScintillatorPhotodiode.Zmotor", "scint"),
    ("CoaxZoom.ZoomMotor", "cam.zoom"),
    ("PHIRotationAxis.PHIMotor", "omega"),
    ("Analyser.AnalyserMotor", "lightPolar"),
];

/// Recognized per-motor options: vendor option name, stored field name.
const HARD_FIELDS: &[(&str, &str)] = &[
    ("CoordinateSystem", "CoordinateSystem"),
    ("MotorNumber", "MotorNumber"),
    ("Unit", "Unit"),
    ("UnitRatio", "UnitRatio"),
    ("MaxSpeedCts", "MaxSpeedCts"),
    ("Precision", "Precision"),
    ("SmallStep", "smallStep"),
    ("LargeStep", "largeStep"),
    ("MinPosition", "minPosition"),
    ("MaxPosition", "maxPosition"),
    ("Status1Addr", "Status1Addr"),
    ("Status2Addr", "Status2Addr"),
    ("PositionAddr", "PositionAddr"),
    ("MotorModeAddr", "MotorModeAddr"),
    ("HomeCaptureAddr", "HomeCaptureAddr"),
    ("StopSafetyMargin", "StopSafetyMargin"),
];

/// Imports `microdiff_hard.ini` values as `mdhard.<station>.<motor>`
/// records. Returns the number of values imported.
pub fn import_hard<W: Write>(
    doc: &IniDocument,
    station: u32,
    em: &mut Emitter<W>,
) -> io::Result<usize> {
    let mut imported = 0;

    for (section, motor) in HARD_MOTORS {
        if !doc.has_section(section) {
            debug!("hard ini: no [{section}], skipping {motor}");
            continue;
        }

        let key = format!("mdhard.{station}.{motor}");
        for (option, field) in HARD_FIELDS {
            if !doc.has_option(section, option) {
                continue;
            }
            let Ok(value) = doc.get(section, option) else { continue };
            em.store(&key, field, value)?;
            imported += 1;
        }
    }

    Ok(imported)
}

/// Recognized preference sections and their options: vendor option
/// name, stored field name.
const PREF_SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "ApertureYZTable",
        &[
            ("BeamHorizontalPosition_Y0", "BeamHorizontalPosition_Y0"),
            ("OffVerticalPosition_Z0", "OffVerticalPosition_Z0"),
            ("BeamVerticalPosition_Z1", "BeamVerticalPosition_Z1"),
            ("HorizontalScanRange_YR", "HorizontalScanRange_YR"),
            ("HorizontalScanStep_YS", "HorizontalScanStep_YS"),
            ("VerticalScanRange_ZR", "VerticalScanRange_ZR"),
            ("VerticalScanStep_ZS", "VerticalScanStep_ZS"),
            ("VerticalOffScreenPosition_Z2", "VerticalOffScreenPosition_Z2"),
            ("HideApertureForLoading", "HideApertureForLoading"),
        ],
    ),
    (
        "CapillaryBSYZtable",
        &[
            ("HorizontalBeamPosition_Y0", "HorizontalBeamPosition_Y0"),
            ("VerticalOffPosition_Z0", "VerticalOffPosition_Z0"),
            ("VerticalBeamPosition_Z1", "VerticalBeamPosition_Z1"),
            ("HorizontalScanRange_ZR", "HorizontalScanRange_ZR"),
            ("HorizontalScanStep_ZS", "HorizontalScanStep_ZS"),
            ("VerticalScanRange_ZR", "VerticalScanRange_ZR"),
            ("VerticalScanStep_ZS", "VerticalScanStep_ZS"),
            ("VerticalOffScreenPosition_Z2", "VerticalOffScreenPosition_Z2"),
        ],
    ),
    (
        "CentringXYTable",
        &[("PhiReference", "PhiReference"), ("CentringDevDZ", "CentringDevDZ")],
    ),
    ("CoaxCam", &[("XFocus", "XFocus"), ("YFocus", "YFocus")]),
    (
        "PHIAxisXYZTable",
        &[
            ("XDefaultCentring_X0", "XDefaultCentring_X0"),
            ("XBeam_X1", "XBeam_X1"),
            ("XScintillatorOut_X2", "XScintillatorOut_X2"),
            ("YDefaultCentring_Y0", "YDefaultCentring_Y0"),
            ("YBeam_Y1", "YBeam_Y1"),
            ("YScintillatorOut_Y2", "YScintillatorOut_Y2"),
            ("YBack_Y3", "YBack_Y3"),
            ("YFront_Y4", "YFront_Y4"),
            ("ZDefaultCentring_Z0", "ZDefaultCentring_Z0"),
            ("ZBeam_Z1", "ZBeam_Z1"),
            ("ZScintillatorOut_Z2", "ZScintillatorOut_Z2"),
            ("SampleHolderLength", "SampleHolderLength"),
            ("SampleHolderLengthRef", "SampleHolderLengthRef"),
            ("YminiKappaDefaultCentring_Y7", "YminiKappaDefaultCentring_Y7"),
            ("ZOnOpticCentre", "ZOnOpticCentre"),
            ("XMountPositionSC", "XMountPositionSC"),
            ("ZMountPositionSC", "ZMountPositionSC"),
            // The files themselves misspell this one.
            ("XMountPostionKappaSC", "XMountPositionKappaSC"),
            ("ZMountPositionKappaSC", "ZMountPositionKappaSC"),
            ("YSampledCentered", "YSampleCentered"),
        ],
    ),
    (
        "PHIRotationAxis",
        &[
            ("ScanStartAngle", "ScanStartAngle"),
            ("ScanAngle", "ScanAngle"),
            ("ExposureTime", "ExposureTime"),
            ("RisingDelay", "RisingDelay"),
            ("FallingDelay", "FallingDelay"),
            ("NumberOfPasses", "NumberOfPasses"),
            ("StandardGonioMountPosition", "StandardGonioMountPosition"),
            ("KappaMountPosition", "KappaMountPosition"),
            ("Anticipation", "Anticipation"),
        ],
    ),
    (
        "ScintillatorPhotodiode",
        &[
            ("OffVerticalPosition_Z0", "OffVerticalPosition_Z0"),
            ("ScintiOnBeamVerticalPosition_Z1", "ScintiOnBeamVerticalPosition_Z1"),
            ("DiodeOnBeamVerticalPosition_Z2", "DiodeOnBeamVerticalPosition_Z2"),
            ("OnFocusPiezoPosition", "OnFocusPiezoPosition"),
            ("VerticalScanRange_ZR", "VerticalScanRange_ZR"),
            ("VerticalScanStep_ZS", "VerticalScanStep_ZS"),
            ("Gain", "Gain"),
        ],
    ),
    (
        "JAICamera",
        &[
            ("GainCrystalVisualization", "GainCrystalVisualization"),
            ("GainBeamVisualization", "GainBeamVisualization"),
            ("GainUVVisualization", "GainUVVisualization"),
            ("IntegrationCrystalVisualization", "IntegrationCrystalVisualization"),
            ("IntegrationBeamVisualization", "IntegrationBeamVisualization"),
            ("Gamma", "Gamma"),
            ("StartupWhiteBalanceMode", "StartupWhiteBalanceMode"),
            ("StartupWhiteBalanceLevel", "StartupWhiteBalanceLevel"),
            ("ShutterSpeed", "ShutterSpeed"),
            ("ShutterSpeedUV", "ShutterSpeedUV"),
        ],
    ),
];

/// Options recognized in each `CoaxCam.Zoom<N>` section.
const ZOOM_FIELDS: &[&str] =
    &["MotorPosition", "ScaleX", "ScaleY", "LightIntensity", "FrontLightIntensity"];

const ZOOM_SECTION_PREFIX: &str = "CoaxCam.Zoom";

/// Imports `microdiff_pref.ini` values as
/// `mdpref.<station>.Presets.<Section>` records. Returns the number of
/// values imported.
pub fn import_pref<W: Write>(
    doc: &IniDocument,
    station: u32,
    em: &mut Emitter<W>,
) -> io::Result<usize> {
    let mut imported = 0;

    for (section, fields) in PREF_SECTIONS {
        if !doc.has_section(section) {
            debug!("pref ini: no [{section}]");
            continue;
        }

        let key = format!("mdpref.{station}.Presets.{section}");
        for (option, field) in *fields {
            if !doc.has_option(section, option) {
                continue;
            }
            let Ok(value) = doc.get(section, option) else { continue };
            em.store(&key, field, value)?;
            imported += 1;
        }
    }

    // Zoom sections carry their level in the section name, which must
    // survive into the record key.
    for level in doc.sections().filter_map(zoom_level_suffix) {
        debug!("pref ini: zoom level {level}");
        let section = format!("{ZOOM_SECTION_PREFIX}{level}");
        let key = format!("mdpref.{station}.Presets.{section}");
        for option in ZOOM_FIELDS {
            if !doc.has_option(&section, option) {
                continue;
            }
            let Ok(value) = doc.get(&section, option) else { continue };
            em.store(&key, option, value)?;
            imported += 1;
        }
    }

    Ok(imported)
}

/// The `<N>` of a stored `CoaxCam.Zoom<N>` section name, matched case
/// insensitively so both case policies reach the same sections.
fn zoom_level_suffix(name: &str) -> Option<&str> {
    let prefix = name.get(..ZOOM_SECTION_PREFIX.len())?;
    let suffix = name.get(ZOOM_SECTION_PREFIX.len()..)?;
    (!suffix.is_empty() && prefix.eq_ignore_ascii_case(ZOOM_SECTION_PREFIX)).then_some(suffix)
}

#[cfg(test)]
mod tests {
    use pgpmac_ini::{CasePolicy, IniDocument};

    use super::*;

    const HARD: &str = "\
[PHIRotationAxis.PHIMotor]
MotorNumber = 1
CoordinateSystem = 1
UnitRatio = 12800
HomePosition = 0 ; not a recognized option

[CentringXYTable.XCentringMotor]
MotorNumber = 17
MaxSpeedCts = 150

[SomethingElse.Motor]
MotorNumber = 99
";

    const PREF: &str = "\
[CentringXYTable]
PhiReference = 228.5
Ignored = 1

[CoaxCam.Zoom3]
MotorPosition = 27460
ScaleX = 1.752

[JAICamera]
ShutterSpeedUV = 120
";

    fn import(
        text: &str,
        f: impl Fn(&IniDocument, &mut Emitter<Vec<u8>>) -> usize,
    ) -> (usize, String) {
        let doc = IniDocument::parse_str(text, CasePolicy::Fold);
        let mut em = Emitter::new(Vec::new(), "mk_pgpmac_redis");
        let n = f(&doc, &mut em);
        (n, String::from_utf8(em.into_inner()).unwrap())
    }

    #[test]
    fn hard_values_become_mdhard_records() {
        let (n, out) = import(HARD, |doc, em| import_hard(doc, 2, em).unwrap());

        assert_eq!(n, 5);
        assert!(out.contains("HSET mdhard.2.omega MotorNumber '1'"));
        assert!(out.contains("HSET mdhard.2.omega UnitRatio '12800'"));
        assert!(out.contains("HSET mdhard.2.centering.x MaxSpeedCts '150'"));
        assert!(out.contains("PUBLISH mk_pgpmac_redis mdhard.2.omega"));
    }

    #[test]
    fn unknown_hard_sections_and_options_are_skipped() {
        let (_, out) = import(HARD, |doc, em| import_hard(doc, 2, em).unwrap());

        assert!(!out.contains("SomethingElse"));
        assert!(!out.contains("HomePosition"));
    }

    #[test]
    fn absent_hard_file_sections_import_nothing() {
        let (n, out) = import("[Unrelated]\nk = v\n", |doc, em| import_hard(doc, 2, em).unwrap());

        assert_eq!(n, 0);
        assert!(out.is_empty());
    }

    #[test]
    fn pref_values_become_mdpref_records() {
        let (n, out) = import(PREF, |doc, em| import_pref(doc, 2, em).unwrap());

        assert_eq!(n, 4);
        assert!(out.contains("HSET mdpref.2.Presets.CentringXYTable PhiReference '228.5'"));
        assert!(out.contains("HSET mdpref.2.Presets.JAICamera ShutterSpeedUV '120'"));
        assert!(!out.contains("Ignored"));
    }

    #[test]
    fn zoom_sections_keep_their_level() {
        let (_, out) = import(PREF, |doc, em| import_pref(doc, 2, em).unwrap());

        assert!(out.contains("HSET mdpref.2.Presets.CoaxCam.Zoom3 MotorPosition '27460'"));
        assert!(out.contains("HSET mdpref.2.Presets.CoaxCam.Zoom3 ScaleX '1.752'"));
    }

    #[test]
    fn station_number_lands_in_every_key() {
        let (_, out) = import(PREF, |doc, em| import_pref(doc, 7, em).unwrap());

        assert!(out.lines().filter(|l| l.starts_with("HSET ")).all(|l| l.contains("mdpref.7.")));
    }

    #[test]
    fn zoom_suffix_requires_the_exact_prefix() {
        assert_eq!(zoom_level_suffix("coaxcam.zoom10"), Some("10"));
        assert_eq!(zoom_level_suffix("CoaxCam.Zoom1"), Some("1"));
        assert_eq!(zoom_level_suffix("coaxcam.zoom"), None);
        assert_eq!(zoom_level_suffix("coaxcam"), None);
        assert_eq!(zoom_level_suffix("jaicamera"), None);
    }
}
