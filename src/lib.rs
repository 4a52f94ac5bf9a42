//! `hexcast`: a stack-based, pattern-driven interpreter for Hex, a hex-grid
//! pattern language.
//!
//! The core is split along the same seams the language itself draws: grid
//! geometry (`hexgrid`), the value algebra (`iota`), pattern/action data
//! (`pattern`), declarative VM mutation (`change`), the VM and its dispatch
//! (`vm`, `actions`), continuation frames (`frame`), the built-in pattern
//! registry (`registry`), the Numerical Reflection number table
//! (`numtable`), and the literal-tree shorthand compiler (`compiler`).

pub mod actions;
pub mod change;
pub mod compiler;
pub mod env;
pub mod error;
pub mod frame;
pub mod hexgrid;
pub mod iota;
pub mod numtable;
pub mod pattern;
pub mod registry;
pub mod vm;

pub use compiler::{patterns, Literal};
pub use env::{DefaultEnvironment, Environment, VmConfig};
pub use error::{Mishap, ParseError};
pub use hexgrid::{HexAngle, HexCoord, HexDir, HexPattern};
pub use iota::{Entity, EntityType, Iota, IotaType};
pub use pattern::{ActionKind, CastResult, Pattern, ResolutionType, Sound};
pub use vm::Vm;

/// Install a `tracing` subscriber reading `RUST_LOG` (default `info`), for
/// binaries that want ambient logging without rolling their own filter.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
