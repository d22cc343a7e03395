//! Executable strategies backing actions.
//!
//! A strategy is the unit of work an action runs between `start` and `stop`.
//! Each action owns exactly one strategy instance for its lifetime; the
//! runner calls `update` once per tick while the action is current and polls
//! `complete` for the completion signal.

pub mod movement;
pub mod performance;

pub use movement::{ChaseStrategy, LookAtStrategy, MoveStrategy, WanderStrategy};
pub use performance::{AttackStrategy, DanceStrategy};

use agent_timing::{CountdownTimer, TimerTick};

pub trait ActionStrategy {
    /// Precheck consulted before the planner considers the owning action.
    fn can_perform(&self) -> bool {
        true
    }

    /// Completion signal polled by the runner each tick.
    fn complete(&self) -> bool;

    fn start(&mut self) {}

    fn update(&mut self, _delta: f32) {}

    fn stop(&mut self) {}
}

/// Does nothing for a fixed duration.
pub struct IdleStrategy {
    timer: CountdownTimer,
    complete: bool,
}

impl IdleStrategy {
    pub fn new(duration: f32) -> Self {
        Self {
            timer: CountdownTimer::new(duration),
            complete: false,
        }
    }
}

impl ActionStrategy for IdleStrategy {
    fn complete(&self) -> bool {
        self.complete
    }

    fn start(&mut self) {
        self.complete = false;
        self.timer.start();
    }

    fn update(&mut self, delta: f32) {
        if self.timer.tick(delta) == TimerTick::Finished {
            self.complete = true;
        }
    }
}

/// Polls a belief each tick and completes once it turns false.
pub struct WaitUntilBeliefFalseStrategy {
    waiting_on: Box<dyn Fn() -> bool>,
    complete: bool,
}

impl WaitUntilBeliefFalseStrategy {
    pub fn new(waiting_on: impl Fn() -> bool + 'static) -> Self {
        Self {
            waiting_on: Box::new(waiting_on),
            complete: false,
        }
    }
}

impl ActionStrategy for WaitUntilBeliefFalseStrategy {
    fn complete(&self) -> bool {
        self.complete
    }

    fn start(&mut self) {
        self.complete = false;
    }

    fn update(&mut self, _delta: f32) {
        if !(self.waiting_on)() {
            self.complete = true;
        }
    }
}
