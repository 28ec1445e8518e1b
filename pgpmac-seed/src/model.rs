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

//! Static device model of the LS-CAT MD2 diffractometer.
//!
//! Everything here is seeded with set-if-absent records, so a value that
//! an operator has changed in the running store survives a re-run.

/// Value type codes understood by the pgpmac redis layer.
#[allow(dead_code)] // full code set kept even where no field uses it yet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dbr {
    /// Free-form string.
    String = 0,
    /// 16 bit integer.
    Short = 1,
    /// 32 bit float.
    Float = 2,
    /// Enumeration. Not supported by the runtime; kept so the codes
    /// stay aligned with the protocol.
    Enum = 3,
    /// 8 bit integer.
    Char = 4,
    /// 32 bit integer.
    Int = 5,
    /// 64 bit float.
    Double = 6,
}

impl Dbr {
    /// Numeric code as written into DBRTYPE records.
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// One field every motor record carries, with its seed default.
pub struct Field {
    pub name: &'static str,
    pub default: &'static str,
    pub dbr: Dbr,
}

/// Fields common to all motors.
pub const MOTOR_FIELDS: &[Field] = &[
    // 1 if the motor is to be enabled and used
    Field { name: "active", default: "1", dbr: Dbr::Short },
    // initialization strings sent to the PMAC if the motor is active
    Field { name: "active_init", default: "", dbr: Dbr::String },
    // PMAC axis (single character: X, Y, Z, etc)
    Field { name: "axis", default: "", dbr: Dbr::Char },
    // 1 if a homing routine can be called
    Field { name: "canHome", default: "0", dbr: Dbr::Short },
    // "true" if we can move this motor
    Field { name: "canMove", default: "true", dbr: Dbr::String },
    // "true" if it makes sense to display a stop button
    Field { name: "canStop", default: "true", dbr: Dbr::String },
    // PMAC coordinate system number for this motor
    Field { name: "coord_num", default: "", dbr: Dbr::Short },
    // name of the current preset position
    Field { name: "currentPreset", default: "", dbr: Dbr::String },
    // format string for publishing the position
    Field { name: "format", default: "%f", dbr: Dbr::String },
    // strings sent to the PMAC to home the motor
    Field { name: "home", default: "", dbr: Dbr::String },
    // "true" if the motor is in position, "false" if it is moving
    Field { name: "inPosition", default: "true", dbr: Dbr::String },
    // initialization strings sent to the PMAC if the motor is inactive
    Field { name: "inactive_init", default: "", dbr: Dbr::String },
    // increment for a large step in a UI
    Field { name: "largeStep", default: "1.0", dbr: Dbr::Double },
    // upper soft limit
    Field { name: "maxPosition", default: "Infinity", dbr: Dbr::Double },
    // maximum acceleration, used for motors that are to be scanned
    Field { name: "max_accel", default: "", dbr: Dbr::String },
    // maximum speed, used for motors that are to be scanned
    Field { name: "max_speed", default: "", dbr: Dbr::Double },
    // lower soft limit
    Field { name: "minPosition", default: "-Infinity", dbr: Dbr::Double },
    // PMAC motor number
    Field { name: "motor_num", default: "-1", dbr: Dbr::Short },
    // translation, rotation, freeRotation
    Field { name: "moveMode", default: "translation", dbr: Dbr::String },
    // what the motor should be called in a UI
    Field { name: "name", default: "", dbr: Dbr::String },
    Field { name: "negLimitSet", default: "0", dbr: Dbr::Short },
    Field { name: "posLimitSet", default: "0", dbr: Dbr::Short },
    // our position
    Field { name: "position", default: "", dbr: Dbr::Double },
    // number of presets defined
    Field { name: "presets.length", default: "0", dbr: Dbr::Short },
    // for a UI to print out the position
    Field { name: "printPrecision", default: "3", dbr: Dbr::Short },
    // printf style format string for the ncurses interface
    Field { name: "printf", default: "%*.3f", dbr: Dbr::String },
    // step size for a fine movement in a UI
    Field { name: "smallStep", default: "0.1", dbr: Dbr::Double },
    // explanation of what the motor is doing
    Field { name: "status_str", default: "", dbr: Dbr::String },
    // type of motor: PMAC, DAC, BO, SOFT, etc
    Field { name: "type", default: "PMAC", dbr: Dbr::String },
    // multiply user units by u2c to get motor counts
    Field { name: "u2c", default: "1.0", dbr: Dbr::Double },
    // user units
    Field { name: "unit", default: "mm", dbr: Dbr::String },
    // publish a moving motor only on a change of this magnitude
    Field { name: "update_resolution", default: "0.001", dbr: Dbr::Char },
];

/// One device in the MD2 model with its seed overrides.
///
/// Overrides are written before [`MOTOR_FIELDS`], so with set-if-absent
/// semantics they take precedence over the generic defaults.
pub struct Device {
    pub name: &'static str,
    pub params: &'static [(&'static str, &'static str)],
}

/// The motors, shutters, lights and switches of the MD2.
pub const DEVICES: &[Device] = &[
    Device {
        name: "omega",
        params: &[
            ("motor_num", "1"),
            ("max_accel", "2"),
            ("max_speed", "1664"),
            ("coord_num", "1"),
            ("u2c", "12800"),
            ("home", r#"{"M401=1 M1115=1 #1$",&1E,#1&1B1R}"#),
            ("active_init", r#"{M31=1,&1#1->A,"M700=(M700 | $000001) ^ $000001", M1115=1}"#),
            ("inactive_init", r#"{M31=0,&1#1->0,"M700=M700 | $000001",M1115=0}"#),
            ("moveMode", "freeRotation"),
            ("reference", "228.5"),
            ("format", "%.3f"),
            ("printf", "%*.4f°"),
        ],
    },
    Device {
        name: "align.x",
        params: &[
            ("motor_num", "2"),
            ("max_accel", "2"),
            ("max_speed", "121"),
            ("coord_num", "3"),
            ("u2c", "60620.8"),
            ("home", "{#2$,M402=1,&3E,#2&3B2R}"),
            ("active_init", r#"{M32=1,&3#2->X,"M700=(M700 | $000002) ^ $000002"}"#),
            ("inactive_init", r#"{M32=0,&3#2->0,"M700=M700 | $000002"}"#),
            ("smallStep", "0.001"),
            ("axis", "X"),
            ("format", "%.3f"),
            ("minPosition", "0.1"),
            ("maxPosition", "4.0"),
        ],
    },
    Device {
        name: "align.y",
        params: &[
            ("motor_num", "3"),
            ("max_accel", "0.5"),
            ("max_speed", "121"),
            ("coord_num", "3"),
            ("u2c", "60620.8"),
            ("home", "{#3$,M403=1,&3E,#3&3B3R}"),
            ("active_init", r#"{M33=1,&3#3->Y,"M700=(M700 | $000004) ^ $000004"}"#),
            ("inactive_init", r#"{M33=0,&3#3->0,"M700=M700 | $000004"}"#),
            ("smallStep", "0.001"),
            ("axis", "Y"),
            ("format", "%.3f"),
            ("minPosition", "0.16"),
            ("maxPosition", "16.15"),
        ],
    },
    Device {
        name: "align.z",
        params: &[
            ("motor_num", "4"),
            ("max_accel", "0.5"),
            ("max_speed", "121"),
            ("coord_num", "3"),
            ("u2c", "60620.8"),
            ("home", "{#4$,M404=1,&3E,#4&3B4R}"),
            ("active_init", r#"{M34=1,&3#4->Z,"M700=(M700 | $000008) ^ $000008"}"#),
            ("inactive_init", r#"{M34=0,&3#4->0,"M700=M700 | $000008"}"#),
            ("smallStep", "0.001"),
            ("axis", "Z"),
            ("format", "%.3f"),
            ("minPosition", "0.45"),
            ("maxPosition", "5.85"),
        ],
    },
    Device {
        name: "lightPolar",
        params: &[
            ("motor_num", "5"),
            ("max_accel", "0.2"),
            ("max_speed", "3"),
            ("u2c", "142"),
            ("home", "{#5$,#5HMZ}"),
            ("largeStep", "45"),
            ("smallStep", "10"),
            ("format", "%.1f"),
            ("printf", "%*.1f°"),
            ("update_resolution", "1"),
        ],
    },
    Device {
        name: "cam.zoom",
        params: &[
            ("motor_num", "6"),
            ("max_accel", "0.2"),
            ("max_speed", "10"),
            ("coord_num", "4"),
            ("u2c", "1.0"),
            ("home", "{#6$,M406=1,&4E,#6&4B6R}"),
            ("active_init", r#"{M36=1,&4#6->Z,"M700=(M700 | $000020) ^ $000020"}"#),
            ("inactive_init", r#"{M36=0,&4#6->0,"M700=M700 | $000020"}"#),
            ("smallStep", "1"),
            ("axis", "Z"),
            ("format", "%.0f"),
            ("minPosition", "1"),
            ("update_resolution", "1"),
        ],
    },
    Device {
        name: "appy",
        params: &[
            ("motor_num", "7"),
            ("max_accel", "1"),
            ("max_speed", "201"),
            ("coord_num", "5"),
            ("u2c", "121241.6"),
            ("home", "{#7$,M407=1,&5E,#7&5B7R}"),
            ("active_init", r#"{M37=1,&5#7->Y,"M700=(M700 | $000040) ^ $000040"}"#),
            ("inactive_init", r#"{M37=0,&5#7->0,"M700=M700 | $000040"}"#),
            ("smallStep", "0.002"),
            ("axis", "Y"),
            ("format", "%.3f"),
            ("minPosition", "0.2"),
            ("maxPosition", "3.25"),
        ],
    },
    Device {
        name: "appz",
        params: &[
            ("motor_num", "8"),
            ("max_accel", "1"),
            ("max_speed", "201"),
            ("coord_num", "5"),
            ("u2c", "60620.8"),
            ("home", "{#8$,M408=1,&5E,#8&5B8R}"),
            ("active_init", r#"{M38=1,&5#8->Z,"M700=(M700 | $000080) ^ $000080"}"#),
            ("inactive_init", r#"{M38=0,&5#8->0,"M700=M700 | $000080"}"#),
            ("smallStep", "0.002"),
            ("axis", "Z"),
            ("format", "%.3f"),
            ("minPosition", "0.3"),
            ("maxPosition", "82.5"),
        ],
    },
    Device {
        name: "capy",
        params: &[
            ("motor_num", "9"),
            ("max_accel", "1"),
            ("max_speed", "201"),
            ("coord_num", "5"),
            ("u2c", "121241.6"),
            ("home", "{#9$,M409=1,&5E,#9&5B9R}"),
            ("active_init", r#"{M39=1,&5#9->U,"M700=(M700 | $000100) ^ $000100"}"#),
            ("inactive_init", r#"{M39=0,&5#9->0,"M700=M700 | $000100"}"#),
            ("smallStep", "0.002"),
            ("axis", "U"),
            ("format", "%.3f"),
            ("minPosition", "0.05"),
            ("maxPosition", "3.19"),
        ],
    },
    Device {
        name: "capz",
        params: &[
            ("motor_num", "10"),
            ("max_accel", "0.5"),
            ("max_speed", "201"),
            ("coord_num", "5"),
            ("u2c", "19865.6"),
            ("home", "{#10$,M410=1,&5E,#10&5B10R}"),
            ("active_init", r#"{M40=1,&5#10->V,"M700=(M700 | $000200) ^ $000200"}"#),
            ("inactive_init", r#"{M40=0,&5#10->0,"M700=M700 | $000200"}"#),
            ("smallStep", "0.002"),
            ("axis", "V"),
            ("format", "%.3f"),
            ("minPosition", "0.57"),
            ("maxPosition", "81.49"),
        ],
    },
    Device {
        name: "scint",
        params: &[
            ("motor_num", "11"),
            ("max_accel", "0.5"),
            ("max_speed", "151"),
            ("coord_num", "5"),
            ("u2c", "19865.6"),
            ("home", "{#11$,M411=1,&5E,#11&5B11R}"),
            ("active_init", r#"{M41=1,&5#11->W,"M700=(M700 | $000400) ^ $000400"}"#),
            ("inactive_init", r#"{M41=0,&5#11->0,"M700=M700 | $000400"}"#),
            ("smallStep", "0.002"),
            ("axis", "W"),
            ("format", "%.3f"),
            ("minPosition", "0.2"),
            ("maxPosition", "86.1"),
        ],
    },
    Device {
        name: "centering.x",
        params: &[
            ("motor_num", "17"),
            ("max_accel", "0.5"),
            ("max_speed", "150"),
            ("coord_num", "2"),
            ("u2c", "182400"),
            ("home", "{#17$,M417=1,&2E,#17&2B17R}"),
            ("active_init", r#"{M47=1,&2#17->X,"M700=(M700 | $010000) ^ $010000"}"#),
            ("inactive_init", r#"{M47=0,&2#17->0,"M700=M700 | $010000"}"#),
            ("smallStep", "0.001"),
            ("axis", "X"),
            ("format", "%.3f"),
            ("minPosition", "-2.56"),
            ("maxPosition", "2.496"),
        ],
    },
    Device {
        name: "centering.y",
        params: &[
            ("motor_num", "18"),
            ("max_accel", "0.5"),
            ("max_speed", "150"),
            ("coord_num", "2"),
            ("u2c", "182400"),
            ("home", "{#18$,M418=1,&2E,#18&2B18R}"),
            ("active_init", r#"{M48=1,&2#18->Y,"M700=(M700 | $020000) ^ $020000"}"#),
            ("inactive_init", r#"{M48=0,&2#18->0,"M700=M700 | $020000"}"#),
            ("smallStep", "0.001"),
            ("axis", "Y"),
            ("format", "%.3f"),
            ("minPosition", "-2.58"),
            ("maxPosition", "2.4"),
        ],
    },
    Device {
        name: "kappa",
        params: &[
            ("motor_num", "19"),
            ("max_accel", "0.2"),
            ("max_speed", "50"),
            ("coord_num", "7"),
            ("u2c", "2844.444"),
            ("home", "{#19$,M419=1,&7E,#19&7B119R}"),
            ("active_init", r#"{M49=1,&7#19->X,"M700=(M700 | $040000) ^ $040000"}"#),
            ("inactive_init", r#"{M49=0,&7#19->0,"M700=M700 | $040000"}"#),
            ("moveMode", "rotation"),
            ("axis", "X"),
            ("format", "%.2f"),
            ("minPosition", "-5"),
            ("update_resolution", "1.0"),
        ],
    },
    Device {
        name: "phi",
        params: &[
            ("motor_num", "20"),
            ("max_accel", "0.2"),
            ("max_speed", "50"),
            ("coord_num", "7"),
            ("u2c", "711.111"),
            ("home", "{#20$,M420=1,&7E,#20&7B20R}"),
            ("active_init", r#"{M50=1,&7#20->Y,"M700=(M700 | $080000) ^ $080000"}"#),
            ("inactive_init", r#"{M50=0,&7#20->0,"M700=M700 | $080000"}"#),
            ("moveMode", "freeRotation"),
            ("axis", "Y"),
            ("format", "%.2f"),
            ("update_resolution", "1.0"),
        ],
    },
    Device {
        name: "fastShutter",
        params: &[
            ("canHome", "false"),
            ("type", "BO"),
            ("update_resolution", "0.5"),
            ("canStop", "false"),
        ],
    },
    Device {
        name: "frontLight.intensity",
        params: &[
            ("canHome", "false"),
            ("type", "DAC"),
            ("update_resolution", "0.5"),
            ("canStop", "false"),
        ],
    },
    Device {
        name: "backLight.intensity",
        params: &[
            ("canHome", "false"),
            ("type", "DAC"),
            ("update_resolution", "0.5"),
            ("canStop", "false"),
        ],
    },
    Device {
        name: "scint.focus",
        params: &[
            ("canHome", "false"),
            ("type", "DAC"),
            ("update_resolution", "0.5"),
            ("canStop", "false"),
        ],
    },
    Device {
        name: "backLight",
        params: &[
            ("canHome", "false"),
            ("type", "BO"),
            ("update_resolution", "0.5"),
            ("canStop", "false"),
        ],
    },
    Device {
        name: "cryo",
        params: &[
            ("canHome", "false"),
            ("type", "BO"),
            ("update_resolution", "0.5"),
            ("canStop", "false"),
        ],
    },
    Device {
        name: "dryer",
        params: &[
            ("canHome", "false"),
            ("type", "BO"),
            ("update_resolution", "0.5"),
            ("canStop", "false"),
        ],
    },
    Device {
        name: "fluo",
        params: &[
            ("canHome", "false"),
            ("type", "BO"),
            ("update_resolution", "0.5"),
            ("canStop", "false"),
        ],
    },
    Device {
        name: "frontLight",
        params: &[
            ("canHome", "false"),
            ("type", "BO"),
            ("update_resolution", "0.5"),
            ("canStop", "false"),
        ],
    },
    Device {
        name: "backLight.factor",
        params: &[
            ("canHome", "false"),
            ("type", "DAC"),
            ("update_resolution", "0.5"),
            ("canStop", "false"),
        ],
    },
    Device {
        name: "frontLight.factor",
        params: &[
            ("canHome", "false"),
            ("type", "DAC"),
            ("update_resolution", "0.5"),
            ("canStop", "false"),
        ],
    },
    Device {
        name: "smartMagnet",
        params: &[
            ("canHome", "false"),
            ("type", "BO"),
            ("update_resolution", "0.5"),
            ("canStop", "false"),
        ],
    },
];

/// A named position a device can be sent to.
pub struct Preset {
    pub name: &'static str,
    pub position: &'static str,
    /// "1" if an operator may retune the stored position, "0" if not,
    /// `None` for devices where tuning makes no sense.
    pub can_tune: Option<&'static str>,
}

/// Preset positions, keyed by device name.
pub const PRESETS: &[(&str, &[Preset])] = &[
    ("appy", &[Preset { name: "In", position: "0.117", can_tune: Some("1") }]),
    (
        "appz",
        &[
            Preset { name: "In", position: "80", can_tune: Some("1") },
            Preset { name: "Out", position: "71.777", can_tune: Some("0") },
            Preset { name: "Cover", position: "2.0", can_tune: Some("0") },
        ],
    ),
    (
        "backLight",
        &[
            Preset { name: "On", position: "1", can_tune: None },
            Preset { name: "Off", position: "0", can_tune: None },
        ],
    ),
    (
        "frontLight",
        &[
            Preset { name: "On", position: "1", can_tune: None },
            Preset { name: "Off", position: "0", can_tune: None },
        ],
    ),
    ("capy", &[Preset { name: "In", position: "0.082", can_tune: Some("1") }]),
    (
        "capz",
        &[
            Preset { name: "In", position: "78.2617", can_tune: Some("1") },
            Preset { name: "Out", position: "69.944", can_tune: Some("0") },
            Preset { name: "Cover", position: "0.3", can_tune: Some("0") },
        ],
    ),
    (
        "fastShutter",
        &[
            Preset { name: "Open", position: "1", can_tune: None },
            Preset { name: "Close", position: "0", can_tune: None },
        ],
    ),
    ("kappa", &[Preset { name: "manualMount", position: "180.0", can_tune: None }]),
    ("omega", &[Preset { name: "manualMount", position: "180.0", can_tune: None }]),
    ("scint.focus", &[Preset { name: "tuner", position: "53", can_tune: Some("1") }]),
    (
        "scint",
        &[
            Preset { name: "Photodiode", position: "53.0", can_tune: Some("1") },
            Preset { name: "Scintillator", position: "78.788", can_tune: Some("1") },
            Preset { name: "Cover", position: "2.0", can_tune: Some("0") },
        ],
    ),
];

/// Camera zoom level: light intensities, zoom motor position and the
/// pixel scales measured at that magnification.
pub struct ZoomLevel {
    pub level: u8,
    pub front_light: &'static str,
    pub back_light: &'static str,
    pub motor_position: &'static str,
    pub scale_x: &'static str,
    pub scale_y: &'static str,
}

/// The ten zoom levels of the coaxial camera.
pub const ZOOM_LEVELS: &[ZoomLevel] = &[
    ZoomLevel { level: 1, front_light: "4.0", back_light: "8.0", motor_position: "34100", scale_x: "2.7083", scale_y: "3.3442" },
    ZoomLevel { level: 2, front_light: "6.0", back_light: "8.1", motor_position: "31440", scale_x: "2.2487", scale_y: "2.2776" },
    ZoomLevel { level: 3, front_light: "6.5", back_light: "8.2", motor_position: "27460", scale_x: "1.752", scale_y: "1.755" },
    ZoomLevel { level: 4, front_light: "7.0", back_light: "8.3", motor_position: "23480", scale_x: "1.336", scale_y: "1.34" },
    ZoomLevel { level: 5, front_light: "8.0", back_light: "10.0", motor_position: "19500", scale_x: "1.014", scale_y: "1.011" },
    ZoomLevel { level: 6, front_light: "9.0", back_light: "12.0", motor_position: "15520", scale_x: "0.771", scale_y: "0.776" },
    ZoomLevel { level: 7, front_light: "10.0", back_light: "17.0", motor_position: "11540", scale_x: "0.588", scale_y: "0.592" },
    ZoomLevel { level: 8, front_light: "12.0", back_light: "25.0", motor_position: "7560", scale_x: "0.446", scale_y: "0.448" },
    ZoomLevel { level: 9, front_light: "15.0", back_light: "37.0", motor_position: "3580", scale_x: "0.341", scale_y: "0.346" },
    ZoomLevel { level: 10, front_light: "16.0", back_light: "42.0", motor_position: "0", scale_x: "0.27", scale_y: "0.269" },
];

/// Initialization string sent to the PMAC on startup.
pub const PMAC_INIT: &str = r#"{"ENABLE PLCC 0","DISABLE PLCC 1","ENABLE PLCC 2",I5=3}"#;

/// Startup value of the md2 status code.
pub const MD2_STATUS_CODE: &str = "7";
