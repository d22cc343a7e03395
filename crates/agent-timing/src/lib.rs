//! Restartable countdown timers for tick-driven agents.
//!
//! Everything in the agent stack runs on a single cooperative tick: a "wait"
//! is remaining time checked every `tick` call, never a blocking sleep. The
//! timer reports its finish as an edge so owners can react exactly once per
//! run (animation chain hand-offs, idle-action completion, stat cadences).

/// Result of advancing a timer by one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTick {
    /// Timer is not running.
    Idle,
    /// Timer is running and has time remaining.
    Running,
    /// Timer reached zero on this tick. Reported exactly once per run.
    Finished,
}

/// A countdown timer driven by external delta time.
///
/// `start` always restarts from the full duration, so a single timer can be
/// reused across many activation windows.
#[derive(Debug, Clone)]
pub struct CountdownTimer {
    duration: f32,
    remaining: f32,
    running: bool,
}

impl CountdownTimer {
    pub fn new(duration: f32) -> Self {
        Self {
            duration: duration.max(0.0),
            remaining: 0.0,
            running: false,
        }
    }

    /// Starts (or restarts) the countdown from the full duration.
    pub fn start(&mut self) {
        self.remaining = self.duration;
        self.running = true;
    }

    /// Stops the countdown without firing a finish edge.
    pub fn stop(&mut self) {
        self.running = false;
        self.remaining = 0.0;
    }

    /// Advances the timer. Negative or non-finite deltas are ignored.
    pub fn tick(&mut self, delta: f32) -> TimerTick {
        if !self.running {
            return TimerTick::Idle;
        }
        if !delta.is_finite() || delta < 0.0 {
            return TimerTick::Running;
        }

        self.remaining -= delta;
        if self.remaining <= 0.0 {
            self.remaining = 0.0;
            self.running = false;
            return TimerTick::Finished;
        }
        TimerTick::Running
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// True once the countdown has run to zero and not been restarted.
    pub fn is_finished(&self) -> bool {
        !self.running && self.remaining <= 0.0
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Changes the duration used by the next `start`. Does not affect a run
    /// already in flight.
    pub fn set_duration(&mut self, duration: f32) {
        self.duration = duration.max(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timer_finishes_exactly_once() {
        let mut timer = CountdownTimer::new(1.0);
        timer.start();

        assert_eq!(timer.tick(0.5), TimerTick::Running);
        assert_eq!(timer.tick(0.6), TimerTick::Finished);
        assert_eq!(timer.tick(0.1), TimerTick::Idle);
        assert!(timer.is_finished());
    }

    #[test]
    fn start_restarts_from_full_duration() {
        let mut timer = CountdownTimer::new(2.0);
        timer.start();
        timer.tick(1.5);
        timer.start();

        assert_eq!(timer.remaining(), 2.0);
        assert_eq!(timer.tick(1.5), TimerTick::Running);
    }

    #[test]
    fn stop_does_not_fire_finish() {
        let mut timer = CountdownTimer::new(1.0);
        timer.start();
        timer.stop();

        assert_eq!(timer.tick(5.0), TimerTick::Idle);
        assert!(!timer.is_running());
    }

    #[test]
    fn bad_deltas_are_ignored() {
        let mut timer = CountdownTimer::new(1.0);
        timer.start();

        assert_eq!(timer.tick(-1.0), TimerTick::Running);
        assert_eq!(timer.tick(f32::NAN), TimerTick::Running);
        assert_eq!(timer.remaining(), 1.0);
    }

    #[test]
    fn set_duration_applies_on_next_start() {
        let mut timer = CountdownTimer::new(1.0);
        timer.start();
        timer.set_duration(3.0);
        assert_eq!(timer.remaining(), 1.0);

        timer.start();
        assert_eq!(timer.remaining(), 3.0);
    }
}
