//! The virtual machine: stack, frame stack, and the escape/quotation state
//! machine.
//!
//! `Vm` is a thin, directly-mutated struct rather than a rebuilt tuple — the
//! observable semantics come entirely from `Change` application order
//! (`change.rs`), so an in-place mutator is equivalent to the persistent
//! model the design notes describe.

use std::rc::Rc;

use crate::actions;
use crate::change::Change;
use crate::env::Environment;
use crate::error::Mishap;
use crate::frame::ContinuationFrame;
use crate::iota::Iota;
use crate::pattern::{CastResult, Sound};

/// `(stack, frames, parenCount, parenthesized, escapeNext)`.
#[derive(Debug, Default)]
pub struct Vm {
    pub stack: Vec<Iota>,
    pub frames: Vec<Rc<dyn ContinuationFrame>>,
    pub paren_count: usize,
    pub parenthesized: Vec<(Iota, bool)>,
    pub escape_next: bool,
}

impl Vm {
    pub fn new() -> Self {
        Vm::default()
    }

    /// Execute one external iota against the current state, applying its
    /// resulting `Change` before returning.
    pub fn execute(&mut self, iota: Iota, env: &mut dyn Environment) -> CastResult {
        let result = self.execute_inner(iota, env);
        match result.resolution_type {
            crate::pattern::ResolutionType::Errored | crate::pattern::ResolutionType::Invalid => {
                tracing::warn!(cast = %result.cast, mishap = ?result.mishap, "mishap");
            }
            _ => {
                tracing::debug!(cast = %result.cast, resolution = ?result.resolution_type, "resolved");
            }
        }
        result
    }

    fn execute_inner(&mut self, iota: Iota, env: &mut dyn Environment) -> CastResult {
        if let Iota::Pattern(p) = &iota {
            let should_invoke = !self.escape_next && (self.paren_count == 0 || p.must_escape);
            if should_invoke {
                return actions::invoke(self, env, iota);
            }
        }

        if self.escape_next || self.paren_count > 0 {
            let change = if self.paren_count > 0 {
                Change {
                    escape_push: Some(iota.clone()),
                    ..Default::default()
                }
            } else {
                Change {
                    stack_push: vec![iota.clone()],
                    escape_consider: Some(false),
                    ..Default::default()
                }
            };
            change.apply(self);
            return CastResult::escaped(iota, change);
        }

        CastResult::invalid(iota, Mishap::UnescapedValue)
    }

    /// Advance the top frame by one step, if any frame is active.
    pub fn step(&mut self, env: &mut dyn Environment) -> Option<CastResult> {
        let top = self.frames.last()?.clone();
        let result = top.evaluate(self, env);
        match result.resolution_type {
            crate::pattern::ResolutionType::Errored | crate::pattern::ResolutionType::Invalid => {
                tracing::warn!(cast = %result.cast, mishap = ?result.mishap, "mishap during frame step");
            }
            _ => {
                tracing::debug!(cast = %result.cast, resolution = ?result.resolution_type, "frame step resolved");
            }
        }
        Some(result)
    }

    /// Drive `step` to quiescence before and after each external iota, with
    /// no ceiling on the number of steps taken.
    pub fn run(
        &mut self,
        env: &mut dyn Environment,
        iotas: impl IntoIterator<Item = Iota>,
    ) -> Vec<CastResult> {
        self.run_bounded(env, iotas, None)
    }

    /// As [`Vm::run`], but stop (with a trailing `Mishap::StepLimitExceeded`
    /// result) once `max_steps` frame-steps have been taken across the
    /// whole call, per `VmConfig::max_steps`.
    #[tracing::instrument(name = "run", skip(self, env, iotas), fields(max_steps = ?max_steps))]
    pub fn run_bounded(
        &mut self,
        env: &mut dyn Environment,
        iotas: impl IntoIterator<Item = Iota>,
        max_steps: Option<u64>,
    ) -> Vec<CastResult> {
        let mut results = Vec::new();
        let mut taken: u64 = 0;

        macro_rules! drain_steps {
            () => {
                loop {
                    if let Some(limit) = max_steps {
                        if taken >= limit {
                            tracing::warn!(limit, "step limit exceeded");
                            results.push(CastResult::errored(
                                Iota::Null,
                                Mishap::StepLimitExceeded(limit),
                            ));
                            return results;
                        }
                    }
                    let Some(r) = self.step(env) else { break };
                    taken += 1;
                    results.push(r);
                }
            };
        }

        for iota in iotas {
            drain_steps!();
            results.push(self.execute(iota, env));
        }
        drain_steps!();
        results
    }

    /// Replace the frame stack wholesale with a captured continuation.
    pub fn execute_jump(&mut self, continuation: Vec<Rc<dyn ContinuationFrame>>) -> CastResult {
        let cast = Iota::Continuation(continuation.clone());
        let change = Change {
            frame_set: Some(continuation),
            ..Default::default()
        };
        change.apply(self);
        CastResult::evaluated(cast, change, Sound::Hermes)
    }

    /// Unwind frames from the top, invoking each popped frame's
    /// `restore_stack`, until one with `captures_break() == true` has been
    /// popped (or the frame stack empties). No built-in action triggers
    /// this; it exists so a host-defined `break` action can rely on the
    /// unwind protocol this core guarantees.
    pub fn unwind_to_break(&mut self) {
        loop {
            let Some(top) = self.frames.last().cloned() else {
                break;
            };
            let captures = top.captures_break();
            let mut change = top.restore_stack(&self.stack);
            change.frame_pop += 1;
            change.apply(self);
            if captures {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::DefaultEnvironment;

    #[test]
    fn unescaped_double_is_invalid() {
        let mut vm = Vm::new();
        let mut env = DefaultEnvironment::new("Tester");
        let result = vm.execute(Iota::Double(1.0), &mut env);
        assert_eq!(result.resolution_type, crate::pattern::ResolutionType::Invalid);
        assert!(vm.stack.is_empty());
    }

    #[test]
    fn escape_next_pushes_then_clears() {
        let mut vm = Vm::new();
        vm.escape_next = true;
        let mut env = DefaultEnvironment::new("Tester");
        let result = vm.execute(Iota::Double(1.0), &mut env);
        assert_eq!(result.resolution_type, crate::pattern::ResolutionType::Escaped);
        assert!(!vm.escape_next);
        assert_eq!(vm.stack.len(), 1);
    }
}
