//! The host collaborator.
//!
//! `Environment` is the one object a VM shares with its host: everything
//! else about a VM run is self-contained. The runtime never reaches past
//! this trait for side effects.

use std::rc::Rc;

use crate::iota::{Entity, EntityType};

/// Host-supplied context for a running VM.
pub trait Environment {
    /// The entity casting the current program (Mind's Reflection).
    fn caster(&self) -> Rc<Entity>;
}

/// Plain-data run configuration, analogous to the teacher crate's
/// `max_instructions`-bearing config struct. Not file-backed; the CLI
/// surfaces these as flags.
#[derive(Debug, Clone)]
pub struct VmConfig {
    /// Gas-style ceiling on `Vm::step` invocations per `Vm::run` call.
    /// Exceeding it ends the run with a `Mishap::StepLimitExceeded` rather
    /// than looping forever on a runaway Hermes/Thoth frame.
    pub max_steps: Option<u64>,
    /// The name given to the caster `Entity` a `DefaultEnvironment` builds.
    pub caster_name: String,
}

impl Default for VmConfig {
    fn default() -> Self {
        VmConfig {
            max_steps: Some(100_000),
            caster_name: "Caster".to_string(),
        }
    }
}

/// A minimal environment used by the CLI and by tests: a single named
/// caster entity, created once and held for the environment's lifetime.
pub struct DefaultEnvironment {
    caster: Rc<Entity>,
}

impl DefaultEnvironment {
    pub fn new(caster_name: impl Into<String>) -> Self {
        let entity_type = Rc::new(EntityType {
            name: "player".to_string(),
        });
        let caster = Rc::new(Entity {
            entity_type,
            name: caster_name.into(),
        });
        DefaultEnvironment { caster }
    }
}

impl Environment for DefaultEnvironment {
    fn caster(&self) -> Rc<Entity> {
        self.caster.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_environment_returns_stable_caster() {
        let env = DefaultEnvironment::new("Astavie");
        let a = env.caster();
        let b = env.caster();
        assert!(Rc::ptr_eq(&a, &b));
        assert_eq!(a.name, "Astavie");
    }

    #[test]
    fn vm_config_default_has_a_finite_step_ceiling() {
        let config = VmConfig::default();
        assert!(config.max_steps.is_some());
    }
}
