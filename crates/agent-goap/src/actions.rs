//! Actions, goals, and plans.
//!
//! An action pairs planner-facing data (cost, precondition and effect belief
//! names) with the one strategy instance that executes it. Both actions and
//! goals are built once at agent setup and reused across plan executions.

use crate::error::GoapError;
use crate::strategy::ActionStrategy;

/// A unit of behavior the planner can schedule.
pub struct AgentAction {
    name: String,
    cost: f32,
    preconditions: Vec<String>,
    effects: Vec<String>,
    strategy: Box<dyn ActionStrategy>,
}

impl AgentAction {
    pub fn builder(name: impl Into<String>) -> ActionBuilder {
        ActionBuilder {
            name: name.into(),
            cost: 1.0,
            preconditions: Vec::new(),
            effects: Vec::new(),
            strategy: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cost(&self) -> f32 {
        self.cost
    }

    pub fn preconditions(&self) -> &[String] {
        &self.preconditions
    }

    pub fn effects(&self) -> &[String] {
        &self.effects
    }

    pub fn can_perform(&self) -> bool {
        self.strategy.can_perform()
    }

    pub fn complete(&self) -> bool {
        self.strategy.complete()
    }

    pub fn start(&mut self) {
        self.strategy.start();
    }

    pub fn update(&mut self, delta: f32) {
        self.strategy.update(delta);
    }

    pub fn stop(&mut self) {
        self.strategy.stop();
    }
}

impl std::fmt::Debug for AgentAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentAction")
            .field("name", &self.name)
            .field("cost", &self.cost)
            .field("preconditions", &self.preconditions)
            .field("effects", &self.effects)
            .finish()
    }
}

pub struct ActionBuilder {
    name: String,
    cost: f32,
    preconditions: Vec<String>,
    effects: Vec<String>,
    strategy: Option<Box<dyn ActionStrategy>>,
}

impl ActionBuilder {
    pub fn with_cost(mut self, cost: f32) -> Self {
        self.cost = cost.max(0.0);
        self
    }

    pub fn with_strategy(mut self, strategy: impl ActionStrategy + 'static) -> Self {
        self.strategy = Some(Box::new(strategy));
        self
    }

    pub fn add_precondition(mut self, belief: impl Into<String>) -> Self {
        self.preconditions.push(belief.into());
        self
    }

    pub fn add_effect(mut self, belief: impl Into<String>) -> Self {
        self.effects.push(belief.into());
        self
    }

    pub fn build(self) -> Result<AgentAction, GoapError> {
        let strategy = self
            .strategy
            .ok_or_else(|| GoapError::MissingStrategy(self.name.clone()))?;
        Ok(AgentAction {
            name: self.name,
            cost: self.cost,
            preconditions: self.preconditions,
            effects: self.effects,
            strategy,
        })
    }
}

/// A desired belief state with a priority. Higher priority wins.
#[derive(Debug, Clone)]
pub struct AgentGoal {
    name: String,
    priority: i32,
    desired_effects: Vec<String>,
}

impl AgentGoal {
    pub fn builder(name: impl Into<String>) -> GoalBuilder {
        GoalBuilder {
            name: name.into(),
            priority: 0,
            desired_effects: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn desired_effects(&self) -> &[String] {
        &self.desired_effects
    }
}

#[derive(Debug)]
pub struct GoalBuilder {
    name: String,
    priority: i32,
    desired_effects: Vec<String>,
}

impl GoalBuilder {
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_desired_effect(mut self, belief: impl Into<String>) -> Self {
        self.desired_effects.push(belief.into());
        self
    }

    pub fn build(self) -> AgentGoal {
        AgentGoal {
            name: self.name,
            priority: self.priority,
            desired_effects: self.desired_effects,
        }
    }
}

/// An ordered action stack satisfying a goal.
///
/// The stack is built goal-to-start during regression search, so `pop_next`
/// (from the end) yields actions in execution order.
#[derive(Debug, Clone)]
pub struct ActionPlan {
    goal: String,
    goal_priority: i32,
    actions: Vec<String>,
    total_cost: f32,
}

impl ActionPlan {
    pub fn new(goal: &AgentGoal, actions: Vec<String>, total_cost: f32) -> Self {
        Self {
            goal: goal.name().to_string(),
            goal_priority: goal.priority(),
            actions,
            total_cost,
        }
    }

    pub fn goal(&self) -> &str {
        &self.goal
    }

    pub fn goal_priority(&self) -> i32 {
        self.goal_priority
    }

    pub fn total_cost(&self) -> f32 {
        self.total_cost
    }

    pub fn remaining(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Next action to execute.
    pub fn pop_next(&mut self) -> Option<String> {
        self.actions.pop()
    }

    /// Remaining actions in execution order, for logs and debug output.
    pub fn execution_order(&self) -> Vec<&str> {
        self.actions.iter().rev().map(String::as_str).collect()
    }
}
