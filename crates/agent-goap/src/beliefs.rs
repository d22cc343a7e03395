//! Named boolean facts about the agent and its world.
//!
//! Beliefs are registered once during agent setup and never cached: every
//! query re-runs the evaluator against live state. Actions and goals refer
//! to beliefs by name only, which keeps the catalogs plain data.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::GoapError;
use crate::math::Vec3;
use crate::sensor::ProximitySensor;

/// A named, on-demand boolean predicate, optionally carrying a world
/// position (location and sensor beliefs).
pub struct Belief {
    name: String,
    evaluator: Box<dyn Fn() -> bool>,
    location: Option<Box<dyn Fn() -> Option<Vec3>>>,
}

impl Belief {
    pub fn new(name: impl Into<String>, evaluator: impl Fn() -> bool + 'static) -> Self {
        Self {
            name: name.into(),
            evaluator: Box::new(evaluator),
            location: None,
        }
    }

    pub fn with_location(mut self, location: impl Fn() -> Option<Vec3> + 'static) -> Self {
        self.location = Some(Box::new(location));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn evaluate(&self) -> bool {
        (self.evaluator)()
    }

    pub fn location(&self) -> Option<Vec3> {
        self.location.as_ref().and_then(|f| f())
    }
}

impl std::fmt::Debug for Belief {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Belief")
            .field("name", &self.name)
            .field("has_location", &self.location.is_some())
            .finish()
    }
}

/// The agent's belief set. Immutable once setup completes; registration is
/// fail-fast on duplicate names.
#[derive(Default, Debug)]
pub struct BeliefRegistry {
    beliefs: HashMap<String, Belief>,
}

impl BeliefRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, belief: Belief) -> Result<(), GoapError> {
        if self.beliefs.contains_key(belief.name()) {
            return Err(GoapError::DuplicateBelief(belief.name().to_string()));
        }
        self.beliefs.insert(belief.name().to_string(), belief);
        Ok(())
    }

    /// Registers a plain flag belief.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        evaluator: impl Fn() -> bool + 'static,
    ) -> Result<(), GoapError> {
        self.register(Belief::new(name, evaluator))
    }

    /// Registers a location belief: true while the agent is within `range`
    /// of the target point.
    pub fn add_location(
        &mut self,
        name: impl Into<String>,
        range: f32,
        agent_position: impl Fn() -> Vec3 + 'static,
        target: impl Fn() -> Vec3 + 'static,
    ) -> Result<(), GoapError> {
        let target = Rc::new(target);
        let target_for_eval = Rc::clone(&target);
        let belief = Belief::new(name, move || {
            agent_position().distance(target_for_eval()) <= range
        })
        .with_location(move || Some(target()));
        self.register(belief)
    }

    /// Registers a sensor belief delegating to a proximity sensor's current
    /// target state.
    pub fn add_sensor(
        &mut self,
        name: impl Into<String>,
        sensor: Rc<RefCell<dyn ProximitySensor>>,
    ) -> Result<(), GoapError> {
        let sensor_for_eval = Rc::clone(&sensor);
        let belief = Belief::new(name, move || sensor_for_eval.borrow().is_target_in_range())
            .with_location(move || sensor.borrow().target_position());
        self.register(belief)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.beliefs.contains_key(name)
    }

    pub fn evaluate(&self, name: &str) -> Result<bool, GoapError> {
        self.beliefs
            .get(name)
            .map(Belief::evaluate)
            .ok_or_else(|| GoapError::UnknownBelief(name.to_string()))
    }

    /// Tick-path variant: unknown beliefs evaluate as false with a warning
    /// instead of interrupting the loop.
    pub fn evaluate_or_false(&self, name: &str) -> bool {
        match self.evaluate(name) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(%err, "belief treated as false");
                false
            }
        }
    }

    pub fn location(&self, name: &str) -> Option<Vec3> {
        self.beliefs.get(name).and_then(Belief::location)
    }

    pub fn len(&self) -> usize {
        self.beliefs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.beliefs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn evaluation_is_never_cached() {
        let flag = Rc::new(Cell::new(false));
        let mut registry = BeliefRegistry::new();
        let reader = Rc::clone(&flag);
        registry.add("FlagUp", move || reader.get()).unwrap();

        assert!(!registry.evaluate("FlagUp").unwrap());
        flag.set(true);
        assert!(registry.evaluate("FlagUp").unwrap());
    }

    #[test]
    fn unknown_belief_is_an_error() {
        let registry = BeliefRegistry::new();
        assert_eq!(
            registry.evaluate("Missing"),
            Err(GoapError::UnknownBelief("Missing".to_string()))
        );
        assert!(!registry.evaluate_or_false("Missing"));
    }

    #[test]
    fn duplicate_registration_fails_fast() {
        let mut registry = BeliefRegistry::new();
        registry.add("Nothing", || false).unwrap();
        assert_eq!(
            registry.add("Nothing", || true),
            Err(GoapError::DuplicateBelief("Nothing".to_string()))
        );
    }

    #[test]
    fn location_belief_checks_range() {
        let agent_pos = Rc::new(Cell::new(Vec3::new(10.0, 0.0, 0.0)));
        let mut registry = BeliefRegistry::new();
        let reader = Rc::clone(&agent_pos);
        registry
            .add_location("AtRestingPosition", 3.0, move || reader.get(), || Vec3::ZERO)
            .unwrap();

        assert!(!registry.evaluate_or_false("AtRestingPosition"));
        agent_pos.set(Vec3::new(2.0, 0.0, 1.0));
        assert!(registry.evaluate_or_false("AtRestingPosition"));
        assert_eq!(registry.location("AtRestingPosition"), Some(Vec3::ZERO));
    }
}
