//! Proximity sensing.
//!
//! Sensor beliefs read a detector's current target state; the host wires the
//! target-changed edge into `GoapAgent::reset_action_and_goal` to preempt a
//! stale plan (a newly spotted player outranks finishing a nap).

use agent_timing::{CountdownTimer, TimerTick};

use crate::math::Vec3;

/// A detector the agent consults for a (possibly absent) target.
pub trait ProximitySensor {
    /// Position of the current target, if one is in range.
    fn target_position(&self) -> Option<Vec3>;

    fn is_target_in_range(&self) -> bool {
        self.target_position().is_some()
    }
}

/// Interval-polled detector: the target counts as present while within the
/// detection radius of the agent. Re-checks on a timer rather than every
/// tick, and reports an edge when the target's known position changes.
pub struct RadiusSensor {
    agent_position: Box<dyn Fn() -> Vec3>,
    target_position: Box<dyn Fn() -> Vec3>,
    radius: f32,
    timer: CountdownTimer,
    in_range: bool,
    last_known: Option<Vec3>,
}

impl RadiusSensor {
    pub fn new(
        radius: f32,
        check_interval: f32,
        agent_position: impl Fn() -> Vec3 + 'static,
        target_position: impl Fn() -> Vec3 + 'static,
    ) -> Self {
        let mut timer = CountdownTimer::new(check_interval);
        timer.start();
        Self {
            agent_position: Box::new(agent_position),
            target_position: Box::new(target_position),
            radius,
            timer,
            in_range: false,
            last_known: None,
        }
    }

    /// Advances the check timer. Returns true when the target's known
    /// position changed this tick (appeared or moved).
    pub fn tick(&mut self, delta: f32) -> bool {
        if self.timer.tick(delta) != TimerTick::Finished {
            return false;
        }
        self.timer.start();

        let position = (self.target_position)();
        self.in_range = (self.agent_position)().distance(position) <= self.radius;

        if !self.in_range {
            return false;
        }
        let changed = self.last_known != Some(position);
        if changed {
            self.last_known = Some(position);
        }
        changed
    }
}

impl ProximitySensor for RadiusSensor {
    fn target_position(&self) -> Option<Vec3> {
        if self.in_range {
            self.last_known
        } else {
            None
        }
    }
}
