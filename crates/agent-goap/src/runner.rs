//! Plan executor.
//!
//! Drives one action at a time from the current plan, replanning whenever
//! idle. A planning failure is not an error: the runner simply tries again
//! next tick while the agent idles.

use crate::actions::{ActionPlan, AgentAction, AgentGoal};
use crate::beliefs::BeliefRegistry;
use crate::events::{GoapEvent, PlanLog};
use crate::planner;

/// Execution state between ticks: the in-flight plan, the action currently
/// running, and the goal bookkeeping feeding the next planning cycle.
#[derive(Default)]
pub struct GoapRunner {
    plan: Option<ActionPlan>,
    current_action: Option<String>,
    current_goal: Option<(String, i32)>,
    last_goal: Option<String>,
}

impl GoapRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// One tick: find something to do if idle, then advance whatever is
    /// running.
    pub fn perform(
        &mut self,
        delta: f32,
        actions: &mut [AgentAction],
        goals: &[AgentGoal],
        beliefs: &BeliefRegistry,
        pre_action_reset: &mut dyn FnMut(),
        log: &mut PlanLog,
    ) {
        if self.current_action.is_none() {
            self.update_plan_and_action(actions, goals, beliefs, pre_action_reset, log);
        }
        if self.plan.is_some() && self.current_action.is_some() {
            self.execute_action(delta, actions, log);
        }
    }

    /// Abandons the current plan without stopping the strategy; the next
    /// tick plans from scratch. Used by external preemption (sensors).
    pub fn reset_action_and_goal(&mut self) {
        self.current_action = None;
        self.current_goal = None;
    }

    /// Drops all plan state, including the preceding-goal tie-break. Used
    /// when the action or goal catalogs are replaced.
    pub fn clear(&mut self) {
        self.plan = None;
        self.current_action = None;
        self.current_goal = None;
        self.last_goal = None;
    }

    pub fn current_action(&self) -> Option<&str> {
        self.current_action.as_deref()
    }

    pub fn current_goal(&self) -> Option<&str> {
        self.current_goal.as_ref().map(|(name, _)| name.as_str())
    }

    pub fn last_goal(&self) -> Option<&str> {
        self.last_goal.as_deref()
    }

    fn update_plan_and_action(
        &mut self,
        actions: &mut [AgentAction],
        goals: &[AgentGoal],
        beliefs: &BeliefRegistry,
        pre_action_reset: &mut dyn FnMut(),
        log: &mut PlanLog,
    ) {
        self.calculate_plan(actions, goals, beliefs, log);

        let Some(plan) = self.plan.as_mut() else {
            return;
        };
        if plan.is_empty() {
            return;
        }

        pre_action_reset();
        self.current_goal = Some((plan.goal().to_string(), plan.goal_priority()));

        let Some(next) = plan.pop_next() else {
            return;
        };
        let Some(action) = actions.iter_mut().find(|a| a.name() == next) else {
            tracing::warn!(action = %next, "planned action missing from catalog");
            self.current_action = None;
            self.current_goal = None;
            return;
        };

        // Beliefs may have shifted since the plan was computed; starting an
        // action whose preconditions no longer hold would waste the window.
        let ready = action
            .preconditions()
            .iter()
            .all(|belief| beliefs.evaluate_or_false(belief));
        if ready {
            action.start();
            self.current_action = Some(next.clone());
            log.log(&GoapEvent::ActionStarted { action: next });
        } else {
            tracing::debug!(action = %next, "preconditions no longer hold, back to idle");
            log.log(&GoapEvent::ActionAborted { action: next });
            self.current_action = None;
            self.current_goal = None;
        }
    }

    fn execute_action(&mut self, delta: f32, actions: &mut [AgentAction], log: &mut PlanLog) {
        let Some(name) = self.current_action.clone() else {
            return;
        };
        let Some(action) = actions.iter_mut().find(|a| a.name() == name) else {
            tracing::warn!(action = %name, "running action missing from catalog");
            self.current_action = None;
            return;
        };

        action.update(delta);
        if !action.complete() {
            return;
        }

        action.stop();
        self.current_action = None;
        log.log(&GoapEvent::ActionCompleted { action: name });

        let finished = self.plan.as_ref().map(ActionPlan::is_empty).unwrap_or(true);
        if finished {
            if let Some((goal, _)) = self.current_goal.take() {
                log.log(&GoapEvent::PlanCompleted { goal: goal.clone() });
                self.last_goal = Some(goal);
            }
        }
    }

    fn calculate_plan(
        &mut self,
        actions: &[AgentAction],
        goals: &[AgentGoal],
        beliefs: &BeliefRegistry,
        log: &mut PlanLog,
    ) {
        // Mid-plan, only a strictly more important goal may take over.
        let candidates: Vec<&AgentGoal> = match self.current_goal {
            Some((_, priority)) => goals.iter().filter(|g| g.priority() > priority).collect(),
            None => goals.iter().collect(),
        };

        let found = planner::plan(actions, &candidates, self.last_goal.as_deref(), beliefs);
        if let Some(plan) = found {
            log.log(&GoapEvent::PlanSelected {
                goal: plan.goal().to_string(),
                actions: plan
                    .execution_order()
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
                cost: plan.total_cost(),
            });
            self.plan = Some(plan);
        }
    }
}
