//! Built-in action dispatch.
//!
//! `invoke` is the one place that matches on [`ActionKind`] and performs the
//! behaviour a pattern names, mirroring how the teacher crate keeps a single
//! `execute_op` dispatch over its opcode enum rather than scattering
//! closures through the data model.

use std::rc::Rc;

use crate::change::Change;
use crate::env::Environment;
use crate::error::Mishap;
use crate::frame::{HermesFrame, ThothFrame};
use crate::iota::{Iota, IotaType};
use crate::pattern::{ActionKind, CastResult, Sound, VectorConst};
use crate::vm::Vm;

/// Invoke the action named by `iota`'s pattern, applying its `Change` to
/// `vm` and returning the resulting `CastResult` (with `cast` already set to
/// `iota`).
pub fn invoke(vm: &mut Vm, env: &mut dyn Environment, iota: Iota) -> CastResult {
    let pattern = match &iota {
        Iota::Pattern(p) => p.clone(),
        _ => unreachable!("invoke is only called with a Pattern iota"),
    };

    match pattern.action {
        ActionKind::Introspection => introspection(vm, iota),
        ActionKind::Retrospection => retrospection(vm, iota),
        ActionKind::Consideration => consideration(vm, iota),
        ActionKind::VacantReflection => push_one(vm, iota, Iota::list([])),
        ActionKind::SinglesPurification => singles_purification(vm, iota),
        ActionKind::MindsReflection => minds_reflection(vm, env, iota),
        ActionKind::NumericalReflection(v) => push_one(vm, iota, Iota::Double(v as f64)),
        ActionKind::TrueReflection => push_one(vm, iota, Iota::Boolean(true)),
        ActionKind::FalseReflection => push_one(vm, iota, Iota::Boolean(false)),
        ActionKind::NullaryReflection => push_one(vm, iota, Iota::Null),
        ActionKind::VectorReflection(c) => push_vector_const(vm, iota, c),
        ActionKind::CirclesReflection => push_one(vm, iota, Iota::Double(std::f64::consts::TAU)),
        ActionKind::ArcsReflection => push_one(vm, iota, Iota::Double(std::f64::consts::PI)),
        ActionKind::EulersReflection => push_one(vm, iota, Iota::Double(std::f64::consts::E)),
        ActionKind::VectorExaltation => vector_exaltation(vm, iota),
        ActionKind::HermesGambit => hermes_gambit(vm, iota),
        ActionKind::ThothsGambit => thoths_gambit(vm, iota),
        ActionKind::IrisGambit => iris_gambit(vm, iota),
    }
}

fn introspection(vm: &mut Vm, iota: Iota) -> CastResult {
    if vm.paren_count == 0 {
        let change = Change {
            escape_intro: true,
            ..Default::default()
        };
        change.apply(vm);
        CastResult::evaluated(iota, change, Sound::Normal)
    } else {
        let change = Change {
            escape_intro: true,
            escape_push: Some(iota.clone()),
            ..Default::default()
        };
        change.apply(vm);
        CastResult::escaped(iota, change)
    }
}

fn retrospection(vm: &mut Vm, iota: Iota) -> CastResult {
    if vm.paren_count == 0 {
        return CastResult::errored(iota, Mishap::TooManyCloseParens);
    }
    if vm.paren_count == 1 {
        let list = Iota::List(vm.parenthesized.iter().map(|(i, _)| i.clone()).collect());
        let change = Change {
            escape_retro: true,
            stack_push: vec![list],
            ..Default::default()
        };
        change.apply(vm);
        CastResult::evaluated(iota, change, Sound::Normal)
    } else {
        let change = Change {
            escape_retro: true,
            escape_push: Some(iota.clone()),
            ..Default::default()
        };
        change.apply(vm);
        CastResult::escaped(iota, change)
    }
}

fn consideration(vm: &mut Vm, iota: Iota) -> CastResult {
    let change = Change {
        escape_consider: Some(true),
        ..Default::default()
    };
    change.apply(vm);
    CastResult::evaluated(iota, change, Sound::Normal)
}

fn push_one(vm: &mut Vm, iota: Iota, value: Iota) -> CastResult {
    let change = Change::push([value]);
    change.apply(vm);
    CastResult::evaluated(iota, change, Sound::Normal)
}

fn push_vector_const(vm: &mut Vm, iota: Iota, c: VectorConst) -> CastResult {
    let (x, y, z) = c.value();
    push_one(vm, iota, Iota::Vector3(x, y, z))
}

fn singles_purification(vm: &mut Vm, iota: Iota) -> CastResult {
    match pop_n(vm, 1) {
        Ok(vals) => {
            let x = vals.into_iter().next().unwrap();
            let change = Change {
                stack_pop: 1,
                stack_push: vec![Iota::list([x])],
                ..Default::default()
            };
            change.apply(vm);
            CastResult::evaluated(iota, change, Sound::Normal)
        }
        Err(m) => CastResult::errored(iota, m),
    }
}

fn minds_reflection(vm: &mut Vm, env: &mut dyn Environment, iota: Iota) -> CastResult {
    push_one(vm, iota, Iota::Entity(env.caster()))
}

fn vector_exaltation(vm: &mut Vm, iota: Iota) -> CastResult {
    match pop_typed(vm, &[IotaType::Double, IotaType::Double, IotaType::Double]) {
        Ok(vals) => {
            let x = as_double(&vals[0]);
            let y = as_double(&vals[1]);
            let z = as_double(&vals[2]);
            let change = Change {
                stack_pop: 3,
                stack_push: vec![Iota::Vector3(x, y, z)],
                ..Default::default()
            };
            change.apply(vm);
            CastResult::evaluated(iota, change, Sound::Normal)
        }
        Err(m) => CastResult::errored(iota, m),
    }
}

fn hermes_gambit(vm: &mut Vm, iota: Iota) -> CastResult {
    match pop_n(vm, 1) {
        Ok(vals) => {
            let x = vals.into_iter().next().unwrap();
            let change = match hermes_unwrap(x) {
                Unwrapped::Frame(frame) => Change {
                    stack_pop: 1,
                    frame_push: vec![frame],
                    ..Default::default()
                },
                Unwrapped::Direct(value) => Change {
                    stack_pop: 1,
                    stack_push: vec![value],
                    ..Default::default()
                },
                Unwrapped::Empty => Change {
                    stack_pop: 1,
                    stack_push: vec![Iota::list([])],
                    ..Default::default()
                },
            };
            change.apply(vm);
            CastResult::evaluated(iota, change, Sound::Hermes)
        }
        Err(m) => CastResult::errored(iota, m),
    }
}

/// What `Hermes' Gambit` (and `Iris' Gambit`) do with the single popped
/// value `x`: a non-empty List becomes a frame over its elements, a lone
/// Pattern becomes a frame over itself (so its action runs), an empty List
/// has nothing to sequence, and anything else has no action to invoke —
/// routing it through the frame machinery would call `Vm::execute` on a
/// bare datum with nothing open, which mishaps and drops it. Put it
/// straight back on the stack instead.
enum Unwrapped {
    Frame(Rc<HermesFrame>),
    Direct(Iota),
    Empty,
}

fn hermes_unwrap(x: Iota) -> Unwrapped {
    match &x {
        Iota::List(items) if items.is_empty() => Unwrapped::Empty,
        Iota::List(_) => {
            let items = match x {
                Iota::List(items) => items,
                _ => unreachable!(),
            };
            Unwrapped::Frame(Rc::new(HermesFrame::new(items, false)))
        }
        Iota::Pattern(_) => Unwrapped::Frame(Rc::new(HermesFrame::new(vec![x], false))),
        _ => Unwrapped::Direct(x),
    }
}

fn thoths_gambit(vm: &mut Vm, iota: Iota) -> CastResult {
    match pop_typed(vm, &[IotaType::List, IotaType::List]) {
        Ok(mut vals) => {
            let datums = as_list(vals.pop().unwrap());
            let instrs = as_list(vals.pop().unwrap());
            let frame = Rc::new(ThothFrame::new(datums, instrs));
            let change = Change {
                stack_pop: 2,
                frame_push: vec![frame],
                ..Default::default()
            };
            change.apply(vm);
            CastResult::evaluated(iota, change, Sound::Thoth)
        }
        Err(m) => CastResult::errored(iota, m),
    }
}

fn iris_gambit(vm: &mut Vm, iota: Iota) -> CastResult {
    match pop_n(vm, 1) {
        Ok(vals) => {
            let x = vals.into_iter().next().unwrap();
            let continuation = Iota::Continuation(vm.frames.clone());
            let change = match hermes_unwrap(x) {
                Unwrapped::Frame(frame) => Change {
                    stack_pop: 1,
                    stack_push: vec![continuation],
                    frame_push: vec![frame],
                    ..Default::default()
                },
                Unwrapped::Direct(value) => Change {
                    stack_pop: 1,
                    stack_push: vec![continuation, value],
                    ..Default::default()
                },
                Unwrapped::Empty => Change {
                    stack_pop: 1,
                    stack_push: vec![continuation, Iota::list([])],
                    ..Default::default()
                },
            };
            change.apply(vm);
            CastResult::evaluated(iota, change, Sound::Hermes)
        }
        Err(m) => CastResult::errored(iota, m),
    }
}

/// Take the top `n` iotas (deepest first), without mutating `vm.stack`.
fn pop_n(vm: &Vm, n: usize) -> Result<Vec<Iota>, Mishap> {
    let len = vm.stack.len();
    if len < n {
        return Err(Mishap::TooFewArgs {
            expected: n,
            found: len,
        });
    }
    Ok(vm.stack[len - n..].to_vec())
}

/// Typed `get(t1..tn)`: `types[0]` binds to the deepest of the `n` slots.
fn pop_typed(vm: &Vm, types: &[IotaType]) -> Result<Vec<Iota>, Mishap> {
    let vals = pop_n(vm, types.len())?;
    for (index, (val, expected)) in vals.iter().zip(types.iter()).enumerate() {
        if val.type_tag() != *expected {
            return Err(Mishap::WrongType {
                index,
                expected: *expected,
                found: val.type_tag(),
            });
        }
    }
    Ok(vals)
}

fn as_double(iota: &Iota) -> f64 {
    match iota {
        Iota::Double(d) => *d,
        _ => unreachable!("type checked by pop_typed"),
    }
}

fn as_list(iota: Iota) -> Vec<Iota> {
    match iota {
        Iota::List(items) => items,
        _ => unreachable!("type checked by pop_typed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::DefaultEnvironment;
    use crate::hexgrid::{HexDir, HexPattern};
    use crate::pattern::Pattern;

    fn builtin(name: &'static str, action: ActionKind, must_escape: bool) -> Iota {
        Iota::Pattern(Rc::new(Pattern::new(
            HexPattern::new(HexDir::East, vec![]),
            name,
            action,
            must_escape,
        )))
    }

    #[test]
    fn vacant_reflection_pushes_empty_list() {
        let mut vm = Vm::new();
        let mut env = DefaultEnvironment::new("Tester");
        let iota = builtin("Vacant Reflection", ActionKind::VacantReflection, false);
        vm.execute(iota, &mut env);
        assert_eq!(vm.stack.len(), 1);
        assert!(vm.stack[0].equals(&Iota::list([])));
    }

    #[test]
    fn singles_purification_wraps_top_value() {
        let mut vm = Vm::new();
        vm.stack.push(Iota::Double(4.0));
        let mut env = DefaultEnvironment::new("Tester");
        let iota = builtin("Single's Purification", ActionKind::SinglesPurification, false);
        vm.execute(iota, &mut env);
        assert!(vm.stack[0].equals(&Iota::list([Iota::Double(4.0)])));
    }

    #[test]
    fn minds_reflection_pushes_the_caster() {
        let mut vm = Vm::new();
        let mut env = DefaultEnvironment::new("Astavie");
        let iota = builtin("Mind's Reflection", ActionKind::MindsReflection, false);
        vm.execute(iota, &mut env);
        match &vm.stack[0] {
            Iota::Entity(e) => assert_eq!(e.name, "Astavie"),
            other => panic!("expected Entity, got {other:?}"),
        }
    }

    #[test]
    fn vector_exaltation_requires_three_doubles() {
        let mut vm = Vm::new();
        vm.stack.push(Iota::Double(1.0));
        let mut env = DefaultEnvironment::new("Tester");
        let iota = builtin("Vector Exaltation", ActionKind::VectorExaltation, false);
        let result = vm.execute(iota, &mut env);
        assert!(result.mishap.is_some());
        assert_eq!(vm.stack.len(), 1);
    }

    #[test]
    fn retrospection_without_introspection_is_a_mishap() {
        let mut vm = Vm::new();
        let mut env = DefaultEnvironment::new("Tester");
        let iota = builtin("Retrospection", ActionKind::Retrospection, true);
        let result = vm.execute(iota, &mut env);
        assert_eq!(result.resolution_type, crate::pattern::ResolutionType::Errored);
        assert!(matches!(result.mishap, Some(Mishap::TooManyCloseParens)));
    }

    #[test]
    fn hermes_gambit_on_a_list_of_one_pattern_still_runs_it_as_a_frame() {
        let mut vm = Vm::new();
        let mut env = DefaultEnvironment::new("Tester");
        vm.stack.push(Iota::list([builtin(
            "Mind's Reflection",
            ActionKind::MindsReflection,
            false,
        )]));
        let iota = builtin("Hermes' Gambit", ActionKind::HermesGambit, false);
        vm.execute(iota, &mut env);
        while vm.step(&mut env).is_some() {}
        match &vm.stack[0] {
            Iota::Entity(e) => assert_eq!(e.name, "Tester"),
            other => panic!("expected Entity, got {other:?}"),
        }
    }

    #[test]
    fn hermes_gambit_on_a_bare_non_pattern_value_pushes_it_straight_through() {
        let mut vm = Vm::new();
        let mut env = DefaultEnvironment::new("Tester");
        vm.stack.push(Iota::Double(7.0));
        let iota = builtin("Hermes' Gambit", ActionKind::HermesGambit, false);
        let result = vm.execute(iota, &mut env);
        assert_eq!(result.resolution_type, crate::pattern::ResolutionType::Evaluated);
        while vm.step(&mut env).is_some() {}
        assert_eq!(vm.stack.len(), 1);
        assert!(vm.stack[0].equals(&Iota::Double(7.0)));
        assert!(vm.frames.is_empty());
    }

    #[test]
    fn hermes_gambit_on_an_empty_list_does_not_build_an_empty_frame() {
        let mut vm = Vm::new();
        let mut env = DefaultEnvironment::new("Tester");
        vm.stack.push(Iota::list([]));
        let iota = builtin("Hermes' Gambit", ActionKind::HermesGambit, false);
        let result = vm.execute(iota, &mut env);
        assert_eq!(result.resolution_type, crate::pattern::ResolutionType::Evaluated);
        assert!(vm.frames.is_empty());
        assert_eq!(vm.stack.len(), 1);
        assert!(vm.stack[0].equals(&Iota::list([])));
    }
}
