//! Movement-flavored strategies: wandering, navigating, chasing, facing.

use std::cell::RefCell;
use std::f32::consts::TAU;
use std::rc::Rc;

use agent_anim::AnimationMachine;
use rand::rngs::SmallRng;
use rand::Rng;

use crate::math::{angle_delta, rotate_towards, Vec3};
use crate::nav::{Body, Navigator};
use crate::strategy::ActionStrategy;

/// Sampling attempts before a wander start gives up for this activation.
const WANDER_SAMPLE_ATTEMPTS: usize = 5;
/// Arrival slack for wander destinations.
const WANDER_ARRIVAL_DISTANCE: f32 = 2.0;
/// Arrival slack for directed movement.
const MOVE_ARRIVAL_DISTANCE: f32 = 1.0;
/// Velocity (squared) below which the agent counts as standing still.
const MOVING_SPEED_SQ: f32 = 0.04;
/// Facing error below which a look-at is done, in degrees.
const LOOK_AT_TOLERANCE: f32 = 5.0;

/// Picks a random reachable point within a radius and walks there.
pub struct WanderStrategy {
    nav: Rc<RefCell<dyn Navigator>>,
    radius: f32,
    rng: SmallRng,
}

impl WanderStrategy {
    pub fn new(nav: Rc<RefCell<dyn Navigator>>, radius: f32, rng: SmallRng) -> Self {
        Self { nav, radius, rng }
    }
}

impl ActionStrategy for WanderStrategy {
    fn can_perform(&self) -> bool {
        !self.complete()
    }

    fn complete(&self) -> bool {
        let nav = self.nav.borrow();
        nav.remaining_distance() <= WANDER_ARRIVAL_DISTANCE && !nav.path_pending()
    }

    fn start(&mut self) {
        let mut nav = self.nav.borrow_mut();
        for _ in 0..WANDER_SAMPLE_ATTEMPTS {
            let angle = self.rng.gen_range(0.0..TAU);
            let distance = self.rng.gen_range(0.0..self.radius);
            let offset = Vec3::new(angle.sin() * distance, 0.0, angle.cos() * distance);
            let candidate = nav.position().add(offset);

            if let Some(point) = nav.sample_position(candidate, self.radius) {
                nav.set_destination(point);
                return;
            }
        }
        tracing::debug!("wander found no reachable point this activation");
    }
}

/// Navigates to a dynamic destination, driving locomotion animation
/// parameters along the way.
pub struct MoveStrategy {
    nav: Rc<RefCell<dyn Navigator>>,
    destination: Box<dyn Fn() -> Vec3>,
    animator: Option<Rc<RefCell<AnimationMachine>>>,
}

impl MoveStrategy {
    pub fn new(
        nav: Rc<RefCell<dyn Navigator>>,
        destination: impl Fn() -> Vec3 + 'static,
        animator: Option<Rc<RefCell<AnimationMachine>>>,
    ) -> Self {
        Self {
            nav,
            destination: Box::new(destination),
            animator,
        }
    }
}

impl ActionStrategy for MoveStrategy {
    fn can_perform(&self) -> bool {
        !self.complete()
    }

    fn complete(&self) -> bool {
        let nav = self.nav.borrow();
        nav.remaining_distance() <= MOVE_ARRIVAL_DISTANCE && !nav.path_pending()
    }

    fn start(&mut self) {
        let target = (self.destination)();
        self.nav.borrow_mut().set_destination(target);
    }

    fn update(&mut self, _delta: f32) {
        if let Some(animator) = &self.animator {
            let velocity = self.nav.borrow().velocity();
            let mut animator = animator.borrow_mut();
            animator.set_bool("IsMoving", velocity.length_squared() >= MOVING_SPEED_SQ);
            animator.set_float("Speed", velocity.length());
        }
    }

    fn stop(&mut self) {
        if let Some(animator) = &self.animator {
            let mut animator = animator.borrow_mut();
            animator.set_bool("IsMoving", false);
            animator.set_float("Speed", 0.0);
        }
        self.nav.borrow_mut().reset_path();
    }
}

/// Movement toward a (typically moving) target without animation coupling.
pub struct ChaseStrategy {
    nav: Rc<RefCell<dyn Navigator>>,
    destination: Box<dyn Fn() -> Vec3>,
}

impl ChaseStrategy {
    pub fn new(nav: Rc<RefCell<dyn Navigator>>, destination: impl Fn() -> Vec3 + 'static) -> Self {
        Self {
            nav,
            destination: Box::new(destination),
        }
    }
}

impl ActionStrategy for ChaseStrategy {
    fn can_perform(&self) -> bool {
        !self.complete()
    }

    fn complete(&self) -> bool {
        let nav = self.nav.borrow();
        nav.remaining_distance() <= MOVE_ARRIVAL_DISTANCE && !nav.path_pending()
    }

    fn start(&mut self) {
        let target = (self.destination)();
        self.nav.borrow_mut().set_destination(target);
    }

    fn stop(&mut self) {
        self.nav.borrow_mut().reset_path();
    }
}

/// Interpolates the agent's facing toward a target point.
pub struct LookAtStrategy {
    body: Rc<RefCell<dyn Body>>,
    target: Box<dyn Fn() -> Vec3>,
    rotation_speed: f32,
    complete: bool,
}

impl LookAtStrategy {
    pub fn new(
        body: Rc<RefCell<dyn Body>>,
        target: impl Fn() -> Vec3 + 'static,
        rotation_speed: f32,
    ) -> Self {
        Self {
            body,
            target: Box::new(target),
            rotation_speed,
            complete: false,
        }
    }
}

impl ActionStrategy for LookAtStrategy {
    fn can_perform(&self) -> bool {
        !self.complete
    }

    fn complete(&self) -> bool {
        self.complete
    }

    fn start(&mut self) {
        self.complete = false;
    }

    fn update(&mut self, delta: f32) {
        let mut body = self.body.borrow_mut();
        let direction = (self.target)().sub(body.position()).flat();
        if direction.length_squared() < 0.001 {
            return;
        }

        let target_yaw = direction.yaw_degrees();
        let step = self.rotation_speed * delta * 100.0;
        let yaw = rotate_towards(body.yaw(), target_yaw, step);
        body.set_yaw(yaw);

        if angle_delta(yaw, target_yaw).abs() < LOOK_AT_TOLERANCE {
            self.complete = true;
        }
    }
}
