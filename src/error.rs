//! Error types.
//!
//! `ParseError` is fatal and synchronous: it is raised while constructing a
//! `HexPattern` or looking up a numerical literal, never while the VM is
//! running. `Mishap` is the in-band runtime error: it is carried inside a
//! `CastResult` (see `pattern.rs`) and never unwinds frames.

use thiserror::Error;

use crate::iota::IotaType;

/// Malformed pattern string or out-of-range numerical literal.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("unknown direction {0:?}")]
    UnknownDirection(String),
    #[error("unknown angle char {0:?}")]
    UnknownAngle(char),
    #[error("pattern string {0:?} has no direction part")]
    EmptyDirection(String),
    #[error("{0} is out of Numerical Reflection's range [-2000, 2000]")]
    NumberOutOfRange(f64),
}

/// A runtime misuse, reported in-band on a `CastResult` rather than by
/// unwinding the frame stack.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Mishap {
    #[error("expected at least {expected} value(s) on the stack, found {found}")]
    TooFewArgs { expected: usize, found: usize },

    #[error("expected {expected:?} at stack depth {index}, found {found:?}")]
    WrongType {
        index: usize,
        expected: IotaType,
        found: IotaType,
    },

    #[error("a non-pattern value was given outside of quotation")]
    UnescapedValue,

    #[error("too many closing parentheses (Retrospection with no open Introspection)")]
    TooManyCloseParens,

    #[error("exceeded the configured step limit ({0} steps)")]
    StepLimitExceeded(u64),

    #[error("{0}")]
    Other(String),
}
