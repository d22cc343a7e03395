//! Minimal spatial math for belief ranges and facing interpolation.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn distance(self, other: Vec3) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    pub fn length_squared(self) -> f32 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Same vector projected onto the ground plane.
    pub fn flat(self) -> Vec3 {
        Vec3::new(self.x, 0.0, self.z)
    }

    pub fn sub(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }

    pub fn add(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }

    pub fn scale(self, factor: f32) -> Vec3 {
        Vec3::new(self.x * factor, self.y * factor, self.z * factor)
    }

    pub fn normalized(self) -> Vec3 {
        let len = self.length();
        if len <= f32::EPSILON {
            Vec3::ZERO
        } else {
            self.scale(1.0 / len)
        }
    }

    /// Heading of this direction vector in degrees around the up axis.
    pub fn yaw_degrees(self) -> f32 {
        self.x.atan2(self.z).to_degrees()
    }
}

/// Signed shortest difference between two headings, in degrees (-180, 180].
pub fn angle_delta(from: f32, to: f32) -> f32 {
    let mut delta = (to - from) % 360.0;
    if delta > 180.0 {
        delta -= 360.0;
    } else if delta <= -180.0 {
        delta += 360.0;
    }
    delta
}

/// Moves a heading toward a target by at most `max_step` degrees.
pub fn rotate_towards(from: f32, to: f32, max_step: f32) -> f32 {
    let delta = angle_delta(from, to);
    if delta.abs() <= max_step {
        to
    } else {
        from + max_step.copysign(delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_symmetric() {
        let a = Vec3::new(1.0, 0.0, 0.0);
        let b = Vec3::new(4.0, 0.0, 4.0);
        assert_eq!(a.distance(b), b.distance(a));
        assert_eq!(a.distance(b), 5.0);
    }

    #[test]
    fn yaw_points_along_axes() {
        assert_eq!(Vec3::new(0.0, 0.0, 1.0).yaw_degrees(), 0.0);
        assert_eq!(Vec3::new(1.0, 0.0, 0.0).yaw_degrees(), 90.0);
    }

    #[test]
    fn angle_delta_wraps() {
        assert_eq!(angle_delta(170.0, -170.0), 20.0);
        assert_eq!(angle_delta(-170.0, 170.0), -20.0);
    }

    #[test]
    fn rotate_towards_clamps_to_step() {
        assert_eq!(rotate_towards(0.0, 90.0, 30.0), 30.0);
        assert_eq!(rotate_towards(0.0, 20.0, 30.0), 20.0);
        assert_eq!(rotate_towards(0.0, -90.0, 30.0), -30.0);
    }
}
