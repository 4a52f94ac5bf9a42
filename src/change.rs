//! Change: a declarative record of one VM state transition.
//!
//! Actions never mutate the VM directly; they return a `Change`, which the
//! VM applies in the fixed order defined by [`Change::apply`]. This keeps
//! every transition auditable and lets the VM log each field it actually
//! touched.

use std::rc::Rc;

use crate::frame::ContinuationFrame;
use crate::iota::Iota;
use crate::vm::Vm;

/// A single VM-mutation record. All fields are optional; an action only
/// sets the ones relevant to what it did.
#[derive(Debug, Clone, Default)]
pub struct Change {
    pub escape_intro: bool,
    pub escape_retro: bool,
    pub escape_push: Option<Iota>,
    pub escape_consider: Option<bool>,

    pub stack_set: Option<Vec<Iota>>,
    pub stack_pop: usize,
    pub stack_push: Vec<Iota>,
    pub stack_move: Option<(usize, usize)>,

    pub frame_set: Option<Vec<Rc<dyn ContinuationFrame>>>,
    pub frame_pop: usize,
    pub frame_push: Vec<Rc<dyn ContinuationFrame>>,
}

impl Change {
    /// A change that only pushes values to the stack.
    pub fn push(items: impl IntoIterator<Item = Iota>) -> Self {
        Change {
            stack_push: items.into_iter().collect(),
            ..Default::default()
        }
    }

    /// Apply this change's fields to `vm`, in the deterministic order:
    /// escape bookkeeping, then stack, then frames.
    pub fn apply(&self, vm: &mut Vm) {
        tracing::trace!(change = ?self, "applying change");

        // 1. paren_count, clearing parenthesized if it falls to zero.
        if self.escape_intro {
            vm.paren_count += 1;
        }
        if self.escape_retro {
            vm.paren_count = vm.paren_count.saturating_sub(1);
        }
        if vm.paren_count == 0 {
            vm.parenthesized.clear();
        }

        // 2. escape_push, using the pre-change escape_next flag.
        let pre_escape_next = vm.escape_next;
        if let Some(iota) = &self.escape_push {
            vm.parenthesized.push((iota.clone(), pre_escape_next));
        }

        // 3. escape_next update.
        if let Some(consider) = self.escape_consider {
            vm.escape_next = consider;
        } else if self.escape_push.is_some() {
            vm.escape_next = false;
        }

        // 4. stack_set, stack_pop, stack_move, stack_push.
        if let Some(stack) = &self.stack_set {
            vm.stack = stack.clone();
        }
        if self.stack_pop > 0 {
            assert!(
                self.stack_pop <= vm.stack.len(),
                "stack_pop {} exceeds stack length {}",
                self.stack_pop,
                vm.stack.len()
            );
            vm.stack.truncate(vm.stack.len() - self.stack_pop);
        }
        if let Some((from, to)) = self.stack_move {
            let value = vm.stack.remove(from);
            vm.stack.insert(to, value);
        }
        vm.stack.extend(self.stack_push.iter().cloned());

        // 5. frame_set, frame_pop, frame_push.
        if let Some(frames) = &self.frame_set {
            vm.frames = frames.clone();
        }
        if self.frame_pop > 0 {
            assert!(
                self.frame_pop <= vm.frames.len(),
                "frame_pop {} exceeds frame length {}",
                self.frame_pop,
                vm.frames.len()
            );
            vm.frames.truncate(vm.frames.len() - self.frame_pop);
        }
        vm.frames.extend(self.frame_push.iter().cloned());
    }
}
