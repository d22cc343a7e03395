//! Goal-oriented action planning for game agents.
//!
//! An agent holds a catalog of [`Belief`]s (live boolean predicates),
//! [`AgentAction`]s (cost + preconditions + effects + an executable
//! strategy), and prioritized [`AgentGoal`]s. Each tick the [`GoapRunner`]
//! plans backward from the most important unsatisfied goal, then executes
//! the resulting [`ActionPlan`] one action at a time. [`GoapAgent`] bundles
//! the catalogs, the runner, an optional animation machine, and plan-event
//! logging behind a single per-tick `update` call.

pub mod actions;
pub mod agent;
pub mod beliefs;
pub mod error;
pub mod events;
pub mod math;
pub mod nav;
pub mod planner;
pub mod runner;
pub mod sensor;
pub mod strategy;

pub use actions::{ActionPlan, AgentAction, AgentGoal};
pub use agent::GoapAgent;
pub use beliefs::{Belief, BeliefRegistry};
pub use error::GoapError;
pub use events::{GoapEvent, PlanLog};
pub use math::Vec3;
pub use nav::{Body, Navigator, StubNavigator};
pub use runner::GoapRunner;
pub use sensor::{ProximitySensor, RadiusSensor};
pub use strategy::ActionStrategy;
