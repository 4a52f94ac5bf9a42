//! The built-in pattern registry: one `Iota::Pattern` constructor per
//! built-in action, with the fixed hex shapes named in the interface spec.
//!
//! Directions here use the short compass abbreviations the interface uses
//! for built-in shapes (`ne`, `e`, `se`, `sw`, `w`, `nw`), distinct from the
//! long-form names `HexPattern::parse` accepts for arbitrary pattern text.

use std::rc::Rc;

use crate::hexgrid::{HexAngle::*, HexDir, HexPattern};
use crate::iota::Iota;
use crate::numtable;
use crate::pattern::{ActionKind, Pattern, VectorConst};

fn shape(dir: HexDir, angles: &[crate::hexgrid::HexAngle]) -> HexPattern {
    HexPattern::new(dir, angles.to_vec())
}

fn pat(shape: HexPattern, name: &'static str, action: ActionKind, must_escape: bool) -> Iota {
    Iota::Pattern(Rc::new(Pattern::new(shape, name, action, must_escape)))
}

pub fn introspection() -> Iota {
    pat(
        shape(HexDir::West, &[Left, Left, Left]),
        "Introspection",
        ActionKind::Introspection,
        true,
    )
}

pub fn retrospection() -> Iota {
    pat(
        shape(HexDir::East, &[Right, Right, Right]),
        "Retrospection",
        ActionKind::Retrospection,
        true,
    )
}

pub fn consideration() -> Iota {
    pat(
        shape(HexDir::West, &[Left, Left, Left, LeftBack, Forward]),
        "Consideration",
        ActionKind::Consideration,
        true,
    )
}

pub fn vacant_reflection() -> Iota {
    pat(
        shape(
            HexDir::NorthEast,
            &[Left, Left, LeftBack, Right, LeftBack, LeftBack, Right],
        ),
        "Vacant Reflection",
        ActionKind::VacantReflection,
        false,
    )
}

pub fn singles_purification() -> Iota {
    pat(
        shape(HexDir::East, &[LeftBack, RightBack, Right, Right, Right, RightBack]),
        "Single's Purification",
        ActionKind::SinglesPurification,
        false,
    )
}

pub fn minds_reflection() -> Iota {
    pat(
        shape(HexDir::NorthEast, &[Left, LeftBack, Left]),
        "Mind's Reflection",
        ActionKind::MindsReflection,
        false,
    )
}

pub fn vector_exaltation() -> Iota {
    pat(
        shape(HexDir::East, &[Right, Left, Left, Left, Left, Left]),
        "Vector Exaltation",
        ActionKind::VectorExaltation,
        false,
    )
}

pub fn hermes_gambit() -> Iota {
    pat(
        shape(HexDir::SouthEast, &[RightBack, Right, LeftBack, Left, Left]),
        "Hermes' Gambit",
        ActionKind::HermesGambit,
        false,
    )
}

pub fn thoths_gambit() -> Iota {
    pat(
        shape(HexDir::NorthEast, &[RightBack, LeftBack, RightBack, LeftBack, RightBack]),
        "Thoth's Gambit",
        ActionKind::ThothsGambit,
        false,
    )
}

pub fn iris_gambit() -> Iota {
    pat(
        shape(HexDir::NorthWest, &[Left, Forward, LeftBack, Left, RightBack, Right]),
        "Iris' Gambit",
        ActionKind::IrisGambit,
        false,
    )
}

/// These plain literal reflections have no shape fixed by the interface
/// spec; each is assigned a short, mutually-distinct shape here.
pub fn true_reflection() -> Iota {
    pat(shape(HexDir::East, &[Right]), "True Reflection", ActionKind::TrueReflection, false)
}

pub fn false_reflection() -> Iota {
    pat(shape(HexDir::East, &[Left]), "False Reflection", ActionKind::FalseReflection, false)
}

pub fn nullary_reflection() -> Iota {
    pat(
        shape(HexDir::East, &[Forward]),
        "Nullary Reflection",
        ActionKind::NullaryReflection,
        false,
    )
}

pub fn vector_plus_x() -> Iota {
    pat(
        shape(HexDir::East, &[Right, Right]),
        "Vector Reflection (+X)",
        ActionKind::VectorReflection(VectorConst::PlusX),
        false,
    )
}

pub fn vector_plus_y() -> Iota {
    pat(
        shape(HexDir::East, &[Right, Left]),
        "Vector Reflection (+Y)",
        ActionKind::VectorReflection(VectorConst::PlusY),
        false,
    )
}

pub fn vector_plus_z() -> Iota {
    pat(
        shape(HexDir::East, &[Right, Forward]),
        "Vector Reflection (+Z)",
        ActionKind::VectorReflection(VectorConst::PlusZ),
        false,
    )
}

pub fn vector_minus_x() -> Iota {
    pat(
        shape(HexDir::East, &[Left, Left]),
        "Vector Reflection (-X)",
        ActionKind::VectorReflection(VectorConst::MinusX),
        false,
    )
}

pub fn vector_minus_y() -> Iota {
    pat(
        shape(HexDir::East, &[Left, Right]),
        "Vector Reflection (-Y)",
        ActionKind::VectorReflection(VectorConst::MinusY),
        false,
    )
}

pub fn vector_minus_z() -> Iota {
    pat(
        shape(HexDir::East, &[Left, Forward]),
        "Vector Reflection (-Z)",
        ActionKind::VectorReflection(VectorConst::MinusZ),
        false,
    )
}

pub fn vector_zero() -> Iota {
    pat(
        shape(HexDir::East, &[Forward, Forward]),
        "Vector Reflection (0)",
        ActionKind::VectorReflection(VectorConst::Zero),
        false,
    )
}

pub fn circles_reflection() -> Iota {
    pat(shape(HexDir::East, &[Right, RightBack]), "Circle's Reflection", ActionKind::CirclesReflection, false)
}

pub fn arcs_reflection() -> Iota {
    pat(shape(HexDir::East, &[Left, LeftBack]), "Arc's Reflection", ActionKind::ArcsReflection, false)
}

pub fn eulers_reflection() -> Iota {
    pat(shape(HexDir::East, &[Forward, RightBack]), "Euler's Reflection", ActionKind::EulersReflection, false)
}

/// Numerical Reflection for `value`, looked up in the number table.
///
/// Panics if `value` is outside the table's domain; callers that accept
/// arbitrary host values should check `numtable::pattern_for` first (the
/// shorthand compiler does, converting an out-of-range literal into a
/// `ParseError`).
pub fn numerical_reflection(value: i64) -> Iota {
    let shape = numtable::pattern_for(value).expect("value out of Numerical Reflection range");
    pat(shape, "Numerical Reflection", ActionKind::NumericalReflection(value), false)
}

/// Resolve an arbitrary, freshly-parsed `HexPattern` against the built-in
/// registry: the only way a bare shape (as typed at a REPL, or read from a
/// script) acquires an action. Checks the fixed-shape built-ins first, then
/// falls back to the Numerical Reflection number table.
pub fn lookup(shape: &HexPattern) -> Option<Iota> {
    let fixed: [fn() -> Iota; 23] = [
        introspection,
        retrospection,
        consideration,
        vacant_reflection,
        singles_purification,
        minds_reflection,
        vector_exaltation,
        hermes_gambit,
        thoths_gambit,
        iris_gambit,
        true_reflection,
        false_reflection,
        nullary_reflection,
        vector_plus_x,
        vector_plus_y,
        vector_plus_z,
        vector_minus_x,
        vector_minus_y,
        vector_minus_z,
        vector_zero,
        circles_reflection,
        arcs_reflection,
        eulers_reflection,
    ];
    for ctor in fixed {
        let candidate = ctor();
        if let Iota::Pattern(p) = &candidate {
            if &p.shape == shape {
                return Some(candidate);
            }
        }
    }
    numtable::value_of(shape).map(numerical_reflection)
}
