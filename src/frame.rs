//! Continuation frames: the VM's frame stack entries.
//!
//! A frame is a small state machine evaluated one step at a time by
//! [`crate::vm::Vm::step`]. Frames never mutate in place; each `evaluate`
//! call pushes a *replacement* frame carrying the updated state, so sharing
//! an `Rc<dyn ContinuationFrame>` between the live frame stack and a
//! captured [`crate::iota::Iota::Continuation`] is always safe.

use std::fmt;
use std::rc::Rc;

use crate::change::Change;
use crate::env::Environment;
use crate::iota::Iota;
use crate::pattern::{CastResult, Sound};
use crate::vm::Vm;

/// A record on the VM's frame stack.
pub trait ContinuationFrame: fmt::Debug {
    /// Advance this frame by one step, mutating `vm` in place and
    /// returning the `CastResult` produced (for logging/inspection; its
    /// `diff` has already been applied by the time this returns).
    fn evaluate(&self, vm: &mut Vm, env: &mut dyn Environment) -> CastResult;

    /// Whether a `break` unwind should stop at this frame.
    fn captures_break(&self) -> bool;

    /// The change to apply when this frame is unwound mid-evaluation by an
    /// outer jump (e.g. `executeJump`, or a future `break` action).
    fn restore_stack(&self, stack: &[Iota]) -> Change;
}

/// Linear sequencer: runs a fixed list of patterns one at a time.
#[derive(Debug, Clone)]
pub struct HermesFrame {
    pub patterns: Vec<Iota>,
    pub captures_brk: bool,
}

impl HermesFrame {
    pub fn new(patterns: Vec<Iota>, captures_brk: bool) -> Self {
        HermesFrame {
            patterns,
            captures_brk,
        }
    }
}

impl ContinuationFrame for HermesFrame {
    fn evaluate(&self, vm: &mut Vm, env: &mut dyn Environment) -> CastResult {
        if self.patterns.is_empty() {
            let change = Change {
                frame_pop: 1,
                ..Default::default()
            };
            change.apply(vm);
            return CastResult::evaluated(Iota::Null, change, Sound::Hermes);
        }

        let head = self.patterns[0].clone();
        let rest = self.patterns[1..].to_vec();

        let mut frame_change = Change {
            frame_pop: 1,
            ..Default::default()
        };
        if !rest.is_empty() {
            frame_change.frame_push = vec![Rc::new(HermesFrame::new(rest, self.captures_brk))];
        }
        frame_change.apply(vm);

        vm.execute(head, env)
    }

    fn captures_break(&self) -> bool {
        self.captures_brk
    }

    fn restore_stack(&self, _stack: &[Iota]) -> Change {
        Change::default()
    }
}

/// Map/accumulator: runs `code` once per element of `data`, folding each
/// iteration's resulting stack into `acc`.
#[derive(Debug, Clone)]
pub struct ThothFrame {
    pub data: Vec<Iota>,
    pub code: Vec<Iota>,
    pub base_stack: Option<Vec<Iota>>,
    pub acc: Vec<Iota>,
}

impl ThothFrame {
    pub fn new(data: Vec<Iota>, code: Vec<Iota>) -> Self {
        ThothFrame {
            data,
            code,
            base_stack: None,
            acc: Vec::new(),
        }
    }
}

impl ContinuationFrame for ThothFrame {
    fn evaluate(&self, vm: &mut Vm, _env: &mut dyn Environment) -> CastResult {
        let (base, acc) = match &self.base_stack {
            None => (vm.stack.clone(), self.acc.clone()),
            Some(base) => {
                let mut acc = self.acc.clone();
                acc.extend(vm.stack.iter().cloned());
                (base.clone(), acc)
            }
        };

        let change = if let Some((head, rest)) = self.data.split_first() {
            let next = ThothFrame {
                data: rest.to_vec(),
                code: self.code.clone(),
                base_stack: Some(base.clone()),
                acc,
            };
            Change {
                frame_pop: 1,
                stack_set: Some(base),
                stack_push: vec![head.clone()],
                frame_push: vec![Rc::new(next), Rc::new(HermesFrame::new(self.code.clone(), false))],
                ..Default::default()
            }
        } else {
            Change {
                frame_pop: 1,
                stack_set: Some(base),
                stack_push: vec![Iota::list(acc)],
                ..Default::default()
            }
        };

        let cast = Iota::Null;
        change.apply(vm);
        CastResult::evaluated(cast, change, Sound::Thoth)
    }

    fn captures_break(&self) -> bool {
        true
    }

    fn restore_stack(&self, stack: &[Iota]) -> Change {
        let mut acc = self.acc.clone();
        acc.extend(stack.iter().cloned());
        Change {
            stack_set: Some(self.base_stack.clone().unwrap_or_default()),
            stack_push: vec![Iota::list(acc)],
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::DefaultEnvironment;
    use crate::hexgrid::{HexDir, HexPattern};
    use crate::pattern::{ActionKind, Pattern};

    fn vacant_reflection() -> Iota {
        Iota::Pattern(Rc::new(Pattern::new(
            HexPattern::new(HexDir::NorthEast, vec![]),
            "Vacant Reflection",
            ActionKind::VacantReflection,
            false,
        )))
    }

    #[test]
    fn hermes_frame_pops_itself_when_exhausted() {
        let mut vm = Vm::new();
        vm.frames.push(Rc::new(HermesFrame::new(
            vec![vacant_reflection()],
            false,
        )));
        let mut env = DefaultEnvironment::new("Tester");
        vm.step(&mut env);
        assert!(vm.frames.is_empty());
        assert_eq!(vm.stack.len(), 1);
        assert!(vm.stack[0].equals(&Iota::list([])));
    }
}
