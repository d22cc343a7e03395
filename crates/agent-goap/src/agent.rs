//! Agent facade: owns the belief/action/goal catalogs, the runner, and the
//! tick plumbing around them.

use std::cell::RefCell;
use std::rc::Rc;

use agent_anim::AnimationMachine;
use agent_timing::{CountdownTimer, TimerTick};

use crate::actions::{AgentAction, AgentGoal};
use crate::beliefs::BeliefRegistry;
use crate::error::GoapError;
use crate::events::{GoapEvent, PlanLog};
use crate::runner::GoapRunner;

/// An autonomous GOAP-driven agent.
///
/// Setup order mirrors use: register beliefs, then actions referencing them,
/// then goals. The host calls [`GoapAgent::update`] once per frame with a
/// non-negative, finite delta.
pub struct GoapAgent {
    beliefs: BeliefRegistry,
    actions: Vec<AgentAction>,
    goals: Vec<AgentGoal>,
    runner: GoapRunner,
    enabled: bool,
    pre_action_reset: Box<dyn FnMut()>,
    interval_timer: CountdownTimer,
    interval_hook: Option<Box<dyn FnMut()>>,
    animator: Option<Rc<RefCell<AnimationMachine>>>,
    log: PlanLog,
}

impl Default for GoapAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl GoapAgent {
    pub fn new() -> Self {
        Self {
            beliefs: BeliefRegistry::new(),
            actions: Vec::new(),
            goals: Vec::new(),
            runner: GoapRunner::new(),
            enabled: true,
            pre_action_reset: Box::new(|| {}),
            interval_timer: CountdownTimer::new(0.0),
            interval_hook: None,
            animator: None,
            log: PlanLog::null(),
        }
    }

    // --- setup ---

    pub fn beliefs(&self) -> &BeliefRegistry {
        &self.beliefs
    }

    pub fn beliefs_mut(&mut self) -> &mut BeliefRegistry {
        &mut self.beliefs
    }

    pub fn add_action(&mut self, action: AgentAction) -> Result<(), GoapError> {
        if self.actions.iter().any(|a| a.name() == action.name()) {
            return Err(GoapError::DuplicateAction(action.name().to_string()));
        }
        self.actions.push(action);
        Ok(())
    }

    pub fn add_goal(&mut self, goal: AgentGoal) -> Result<(), GoapError> {
        if self.goals.iter().any(|g| g.name() == goal.name()) {
            return Err(GoapError::DuplicateGoal(goal.name().to_string()));
        }
        self.goals.push(goal);
        Ok(())
    }

    /// Swaps the action catalog and drops all plan state.
    pub fn replace_actions(&mut self, actions: Vec<AgentAction>) {
        self.actions = actions;
        self.runner.clear();
    }

    /// Swaps the goal catalog and drops all plan state.
    pub fn replace_goals(&mut self, goals: Vec<AgentGoal>) {
        self.goals = goals;
        self.runner.clear();
    }

    /// Hook run right before a freshly planned action starts (e.g. clearing
    /// pending navigation).
    pub fn set_pre_action_reset(&mut self, hook: impl FnMut() + 'static) {
        self.pre_action_reset = Box::new(hook);
    }

    /// Periodic hook for host-side stat updates (hunger, stamina drift).
    pub fn set_interval_hook(&mut self, interval: f32, hook: impl FnMut() + 'static) {
        self.interval_timer = CountdownTimer::new(interval);
        self.interval_timer.start();
        self.interval_hook = Some(Box::new(hook));
    }

    /// Animation machine ticked alongside the agent.
    pub fn attach_animator(&mut self, animator: Rc<RefCell<AnimationMachine>>) {
        self.animator = Some(animator);
    }

    pub fn set_plan_log(&mut self, log: PlanLog) {
        self.log = log;
    }

    pub fn plan_log(&self) -> &PlanLog {
        &self.log
    }

    pub fn plan_log_mut(&mut self) -> &mut PlanLog {
        &mut self.log
    }

    // --- runtime ---

    /// One tick. Invalid deltas are rejected so a bad frame cannot corrupt
    /// every timer downstream.
    pub fn update(&mut self, delta: f32) {
        if !delta.is_finite() || delta < 0.0 {
            tracing::warn!(delta, "ignoring invalid tick delta");
            return;
        }

        if self.interval_timer.tick(delta) == TimerTick::Finished {
            if let Some(hook) = self.interval_hook.as_mut() {
                hook();
            }
            self.interval_timer.start();
        }

        if let Some(animator) = &self.animator {
            animator.borrow_mut().update(delta);
        }

        if self.enabled {
            self.runner.perform(
                delta,
                &mut self.actions,
                &self.goals,
                &self.beliefs,
                &mut self.pre_action_reset,
                &mut self.log,
            );
        }
    }

    /// External preemption: drop the current action and goal so the next
    /// tick replans. The abandoned strategy is not stopped; it re-enters
    /// fresh if chosen again.
    pub fn reset_action_and_goal(&mut self) {
        self.runner.reset_action_and_goal();
        self.log.log(&GoapEvent::Interrupted);
    }

    pub fn enable_goap(&mut self) {
        self.enabled = true;
    }

    pub fn disable_goap(&mut self) {
        self.enabled = false;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn current_action(&self) -> Option<&str> {
        self.runner.current_action()
    }

    pub fn current_goal(&self) -> Option<&str> {
        self.runner.current_goal()
    }

    pub fn last_goal(&self) -> Option<&str> {
        self.runner.last_goal()
    }
}
