//! Patterns: the iota that binds a hex-walk to a VM action, and the result
//! of executing one.

use std::fmt;

use crate::change::Change;
use crate::error::Mishap;
use crate::hexgrid::HexPattern;
use crate::iota::Iota;

/// Which built-in action a pattern performs. Dispatch lives in
/// `vm::Vm::invoke_action`; this enum only names the behaviour, mirroring
/// how the teacher crate keeps opcodes as plain data and dispatches on them
/// in one place.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActionKind {
    Introspection,
    Retrospection,
    Consideration,
    VacantReflection,
    SinglesPurification,
    MindsReflection,
    NumericalReflection(i64),
    TrueReflection,
    FalseReflection,
    NullaryReflection,
    VectorReflection(VectorConst),
    CirclesReflection,
    ArcsReflection,
    EulersReflection,
    VectorExaltation,
    HermesGambit,
    ThothsGambit,
    IrisGambit,
}

/// The seven special axis-aligned vector constants the shorthand compiler
/// recognises without falling back to `VectorExaltation`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VectorConst {
    PlusX,
    PlusY,
    PlusZ,
    MinusX,
    MinusY,
    MinusZ,
    Zero,
}

impl VectorConst {
    pub fn value(self) -> (f64, f64, f64) {
        match self {
            VectorConst::PlusX => (1.0, 0.0, 0.0),
            VectorConst::PlusY => (0.0, 1.0, 0.0),
            VectorConst::PlusZ => (0.0, 0.0, 1.0),
            VectorConst::MinusX => (-1.0, 0.0, 0.0),
            VectorConst::MinusY => (0.0, -1.0, 0.0),
            VectorConst::MinusZ => (0.0, 0.0, -1.0),
            VectorConst::Zero => (0.0, 0.0, 0.0),
        }
    }
}

/// An iota that denotes a hex-walk bound to a VM action.
#[derive(Debug, Clone)]
pub struct Pattern {
    pub shape: HexPattern,
    pub name: &'static str,
    pub action: ActionKind,
    /// Patterns that themselves manipulate the quotation state must remain
    /// active inside a quotation; all other patterns are quoted when
    /// `paren_count > 0`.
    pub must_escape: bool,
}

impl Pattern {
    pub fn new(shape: HexPattern, name: &'static str, action: ActionKind, must_escape: bool) -> Self {
        Pattern {
            shape,
            name,
            action,
            must_escape,
        }
    }
}

/// Resolution outcome of executing one iota, with the colour pair from the
/// host UI palette (§6.3) attached for display purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionType {
    Unresolved,
    Evaluated,
    Escaped,
    Undone,
    Errored,
    Invalid,
}

impl ResolutionType {
    /// `true` for EVALUATED, ESCAPED, UNDONE.
    pub fn is_success(self) -> bool {
        matches!(
            self,
            ResolutionType::Evaluated | ResolutionType::Escaped | ResolutionType::Undone
        )
    }

    /// `(light_mode, dark_mode)` RGB hex colour pair.
    pub fn colours(self) -> (&'static str, &'static str) {
        match self {
            ResolutionType::Unresolved => ("7F7F7F", "CCCCCC"),
            ResolutionType::Evaluated => ("7385DE", "FECBE6"),
            ResolutionType::Escaped => ("DDCC73", "FFFAE5"),
            ResolutionType::Undone => ("B26B6B", "CCA88E"),
            ResolutionType::Errored => ("DE6262", "FFC7A0"),
            ResolutionType::Invalid => ("B26B6B", "CCA88E"),
        }
    }
}

/// Priority-tagged sound classification. Higher-priority sounds win when
/// several actions within one change want to announce themselves; see
/// [`Sound::greater_of`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Sound {
    Nothing,
    Normal,
    Spell,
    Hermes,
    Thoth,
    Mute,
    Mishap,
}

impl Sound {
    pub fn greater_of(a: Sound, b: Sound) -> Sound {
        a.max(b)
    }
}

impl fmt::Display for Sound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// The result of executing a single iota.
#[derive(Debug, Clone)]
pub struct CastResult {
    pub cast: Iota,
    pub diff: Change,
    pub mishap: Option<Mishap>,
    pub resolution_type: ResolutionType,
    pub sound: Sound,
}

impl CastResult {
    pub fn evaluated(cast: Iota, diff: Change, sound: Sound) -> Self {
        CastResult {
            cast,
            diff,
            mishap: None,
            resolution_type: ResolutionType::Evaluated,
            sound,
        }
    }

    pub fn escaped(cast: Iota, diff: Change) -> Self {
        CastResult {
            cast,
            diff,
            mishap: None,
            resolution_type: ResolutionType::Escaped,
            sound: Sound::Nothing,
        }
    }

    pub fn errored(cast: Iota, mishap: Mishap) -> Self {
        CastResult {
            cast,
            diff: Change::default(),
            mishap: Some(mishap),
            resolution_type: ResolutionType::Errored,
            sound: Sound::Mishap,
        }
    }

    pub fn invalid(cast: Iota, mishap: Mishap) -> Self {
        CastResult {
            cast,
            diff: Change::default(),
            mishap: Some(mishap),
            resolution_type: ResolutionType::Invalid,
            sound: Sound::Mishap,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sound_priority_picks_higher() {
        assert_eq!(Sound::greater_of(Sound::Normal, Sound::Mishap), Sound::Mishap);
        assert_eq!(Sound::greater_of(Sound::Thoth, Sound::Hermes), Sound::Thoth);
    }

    #[test]
    fn resolution_success_flags() {
        assert!(ResolutionType::Evaluated.is_success());
        assert!(ResolutionType::Escaped.is_success());
        assert!(ResolutionType::Undone.is_success());
        assert!(!ResolutionType::Errored.is_success());
        assert!(!ResolutionType::Invalid.is_success());
    }
}
