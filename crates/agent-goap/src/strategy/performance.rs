//! Strategies that trigger a clip and wait out its playing length.

use std::cell::RefCell;
use std::rc::Rc;

use agent_anim::AnimationMachine;
use agent_timing::{CountdownTimer, TimerTick};

use crate::strategy::ActionStrategy;

/// Blend used when a strategy forces a clip onto the base layer.
const CLIP_CROSSFADE: f32 = 0.1;
const BASE_LAYER: usize = 0;

/// Shared play-clip-and-wait mechanics for [`AttackStrategy`] and
/// [`DanceStrategy`].
struct TimedClip {
    animator: Rc<RefCell<AnimationMachine>>,
    clip: String,
    timer: CountdownTimer,
    complete: bool,
}

impl TimedClip {
    fn new(animator: Rc<RefCell<AnimationMachine>>, clip: impl Into<String>) -> Self {
        Self {
            animator,
            clip: clip.into(),
            timer: CountdownTimer::new(0.0),
            complete: false,
        }
    }

    fn start(&mut self) {
        self.complete = false;
        let mut animator = self.animator.borrow_mut();
        let length = match animator.clip_length(&self.clip) {
            Some(length) => length,
            None => {
                tracing::warn!(clip = %self.clip, "clip not registered, completing immediately");
                0.0
            }
        };
        animator.play_with(&self.clip, BASE_LAYER, Some(CLIP_CROSSFADE));
        self.timer.set_duration(length);
        self.timer.start();
    }

    fn update(&mut self, delta: f32) {
        if self.timer.tick(delta) == TimerTick::Finished {
            self.complete = true;
        }
    }
}

/// Plays the attack clip and completes when it has run its length.
pub struct AttackStrategy {
    inner: TimedClip,
}

impl AttackStrategy {
    pub fn new(animator: Rc<RefCell<AnimationMachine>>, clip: impl Into<String>) -> Self {
        Self {
            inner: TimedClip::new(animator, clip),
        }
    }
}

impl ActionStrategy for AttackStrategy {
    fn complete(&self) -> bool {
        self.inner.complete
    }

    fn start(&mut self) {
        self.inner.start();
    }

    fn update(&mut self, delta: f32) {
        self.inner.update(delta);
    }
}

/// Crossfades into a celebration clip and waits it out.
pub struct DanceStrategy {
    inner: TimedClip,
}

impl DanceStrategy {
    pub fn new(animator: Rc<RefCell<AnimationMachine>>, clip: impl Into<String>) -> Self {
        Self {
            inner: TimedClip::new(animator, clip),
        }
    }
}

impl ActionStrategy for DanceStrategy {
    fn complete(&self) -> bool {
        self.inner.complete
    }

    fn start(&mut self) {
        self.inner.start();
    }

    fn update(&mut self, delta: f32) {
        self.inner.update(delta);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agent_anim::{Animation, AnimatorBuilder};

    fn machine_with(clip: &str, length: f32) -> Rc<RefCell<AnimationMachine>> {
        let mut machine = AnimationMachine::new(1);
        AnimatorBuilder::new()
            .add_animation(Animation::new("Locomotion"))
            .add_animation(Animation::new(clip).length(length))
            .build(&mut machine);
        machine.initialize(&["Locomotion"]);
        Rc::new(RefCell::new(machine))
    }

    #[test]
    fn attack_plays_clip_and_waits_its_length() {
        let animator = machine_with("Attack", 1.2);
        let mut attack = AttackStrategy::new(animator.clone(), "Attack");

        attack.start();
        assert_eq!(animator.borrow().current_animation(0), Some("Attack"));
        assert!(!attack.complete());

        attack.update(1.0);
        assert!(!attack.complete());
        attack.update(0.3);
        assert!(attack.complete());
    }

    #[test]
    fn unknown_clip_completes_immediately() {
        let animator = machine_with("Attack", 1.0);
        let mut dance = DanceStrategy::new(animator, "Boogie");

        dance.start();
        dance.update(0.0);
        assert!(dance.complete());
    }
}
