//! Navigation and body collaborator interfaces.
//!
//! Pathfinding, steering, and the character's transform live outside this
//! crate; strategies talk to them through these traits. Callers inject the
//! implementations at agent setup (no global lookup).

use crate::math::Vec3;

/// Surface of an external navigation service.
pub trait Navigator {
    fn set_destination(&mut self, target: Vec3);

    fn reset_path(&mut self);

    fn has_path(&self) -> bool;

    /// True while a requested path is still being computed.
    fn path_pending(&self) -> bool {
        false
    }

    /// Distance left along the current path, 0 when idle.
    fn remaining_distance(&self) -> f32;

    fn velocity(&self) -> Vec3;

    fn position(&self) -> Vec3;

    /// Snaps a candidate point to somewhere reachable, if any.
    fn sample_position(&mut self, center: Vec3, radius: f32) -> Option<Vec3>;
}

/// The character's transform, as far as facing is concerned.
pub trait Body {
    fn position(&self) -> Vec3;

    /// Heading in degrees around the up axis.
    fn yaw(&self) -> f32;

    fn set_yaw(&mut self, yaw: f32);
}

/// Straight-line navigator for demos and tests: accepts any destination and
/// walks toward it at a constant speed when `advance` is called.
pub struct StubNavigator {
    position: Vec3,
    destination: Option<Vec3>,
    speed: f32,
    yaw: f32,
}

impl StubNavigator {
    pub fn new(position: Vec3, speed: f32) -> Self {
        Self {
            position,
            destination: None,
            speed,
            yaw: 0.0,
        }
    }

    /// Host-driven movement integration, called once per tick.
    pub fn advance(&mut self, delta: f32) {
        let Some(destination) = self.destination else {
            return;
        };
        let to_target = destination.sub(self.position);
        let step = self.speed * delta;
        if to_target.length() <= step {
            self.position = destination;
            self.destination = None;
        } else {
            self.position = self.position.add(to_target.normalized().scale(step));
        }
    }
}

impl Navigator for StubNavigator {
    fn set_destination(&mut self, target: Vec3) {
        self.destination = Some(target);
    }

    fn reset_path(&mut self) {
        self.destination = None;
    }

    fn has_path(&self) -> bool {
        self.destination.is_some()
    }

    fn remaining_distance(&self) -> f32 {
        self.destination
            .map(|d| self.position.distance(d))
            .unwrap_or(0.0)
    }

    fn velocity(&self) -> Vec3 {
        match self.destination {
            Some(destination) => destination
                .sub(self.position)
                .normalized()
                .scale(self.speed),
            None => Vec3::ZERO,
        }
    }

    fn position(&self) -> Vec3 {
        self.position
    }

    fn sample_position(&mut self, center: Vec3, _radius: f32) -> Option<Vec3> {
        Some(center.flat())
    }
}

impl Body for StubNavigator {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn yaw(&self) -> f32 {
        self.yaw
    }

    fn set_yaw(&mut self, yaw: f32) {
        self.yaw = yaw;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stub_walks_toward_destination_and_arrives() {
        let mut nav = StubNavigator::new(Vec3::ZERO, 2.0);
        nav.set_destination(Vec3::new(0.0, 0.0, 5.0));

        nav.advance(1.0);
        assert!((nav.remaining_distance() - 3.0).abs() < 1e-4);
        assert!(nav.has_path());

        nav.advance(2.0);
        assert!(!nav.has_path());
        assert_eq!(nav.remaining_distance(), 0.0);
    }

    #[test]
    fn velocity_is_zero_without_a_path() {
        let nav = StubNavigator::new(Vec3::ZERO, 2.0);
        assert_eq!(nav.velocity(), Vec3::ZERO);
    }
}
