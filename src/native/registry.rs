use std::{collections::BTreeMap, fmt};

/// The declared kind of a native parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKind {
    Bool,
    Int,
    LongInt,
    Real,
    Char,
    String,
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParamKind::Bool => "boolean",
            ParamKind::Int => "integer",
            ParamKind::LongInt => "long integer",
            ParamKind::Real => "real",
            ParamKind::Char => "character",
            ParamKind::String => "string",
        };
        f.write_str(name)
    }
}

/// Storage for one parameter: current value, default, and admissible domain.
#[derive(Debug, Clone)]
pub(super) enum Slot {
    Bool {
        value: bool,
        default: bool,
    },
    Int {
        value: i32,
        default: i32,
        min: i32,
        max: i32,
    },
    LongInt {
        value: i64,
        default: i64,
        min: i64,
        max: i64,
    },
    Real {
        value: f64,
        default: f64,
        min: f64,
        max: f64,
    },
    Char {
        value: char,
        default: char,
        /// Admissible characters, or `None` if any character is accepted.
        allowed: Option<&'static str>,
    },
    String {
        value: String,
        default: &'static str,
    },
}

impl Slot {
    pub(super) fn kind(&self) -> ParamKind {
        match self {
            Slot::Bool { .. } => ParamKind::Bool,
            Slot::Int { .. } => ParamKind::Int,
            Slot::LongInt { .. } => ParamKind::LongInt,
            Slot::Real { .. } => ParamKind::Real,
            Slot::Char { .. } => ParamKind::Char,
            Slot::String { .. } => ParamKind::String,
        }
    }

    pub(super) fn reset(&mut self) {
        match self {
            Slot::Bool { value, default } => *value = *default,
            Slot::Int { value, default, .. } => *value = *default,
            Slot::LongInt { value, default, .. } => *value = *default,
            Slot::Real { value, default, .. } => *value = *default,
            Slot::Char { value, default, .. } => *value = *default,
            Slot::String { value, default } => (*default).clone_into(value),
        }
    }
}

fn boolean(default: bool) -> Slot {
    Slot::Bool {
        value: default,
        default,
    }
}

fn int(default: i32, min: i32, max: i32) -> Slot {
    Slot::Int {
        value: default,
        default,
        min,
        max,
    }
}

fn long_int(default: i64, min: i64, max: i64) -> Slot {
    Slot::LongInt {
        value: default,
        default,
        min,
        max,
    }
}

fn real(default: f64, min: f64, max: f64) -> Slot {
    Slot::Real {
        value: default,
        default,
        min,
        max,
    }
}

fn character(default: char, allowed: &'static str) -> Slot {
    Slot::Char {
        value: default,
        default,
        allowed: Some(allowed),
    }
}

fn string(default: &'static str) -> Slot {
    Slot::String {
        value: default.to_string(),
        default,
    }
}

/// Largest value accepted for real-valued limits.
const INFINITY: f64 = 1e20;

/// Largest memory limit, in megabytes.
const MEMORY_MAX: f64 = 8_796_093_022_207.0;

/// Builds the parameter registry of a freshly created handle.
pub(super) fn default_params() -> BTreeMap<&'static str, Slot> {
    BTreeMap::from([
        ("branching/preferbinary", boolean(false)),
        ("branching/pscost/strategy", character('u', "dsuv")),
        ("concurrent/paramsetprefix", string("")),
        ("conflict/enable", boolean(true)),
        ("conflict/maxlploops", int(2, -1, i32::MAX)),
        ("display/verblevel", int(4, 0, 5)),
        ("limits/gap", real(0.0, 0.0, f64::MAX)),
        ("limits/memory", real(MEMORY_MAX, 0.0, MEMORY_MAX)),
        ("limits/nodes", long_int(-1, -1, i64::MAX)),
        ("limits/solutions", int(-1, -1, i32::MAX)),
        ("limits/time", real(INFINITY, 0.0, INFINITY)),
        ("limits/totalnodes", long_int(-1, -1, i64::MAX)),
        ("lp/initalgorithm", character('s', "spdbc")),
        ("misc/catchctrlc", boolean(true)),
        ("nodeselection/childsel", character('h', "dupilrh")),
        ("presolving/maxrestarts", int(-1, -1, i32::MAX)),
        ("presolving/maxrounds", int(-1, -1, i32::MAX)),
        ("randomization/randomseedshift", int(0, 0, i32::MAX)),
        ("separating/maxrounds", int(-1, -1, i32::MAX)),
        ("separating/maxroundsroot", int(-1, -1, i32::MAX)),
        ("visual/vbcfilename", string("-")),
    ])
}
