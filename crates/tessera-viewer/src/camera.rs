use glam::{Mat4, Vec2, Vec3};

/// Pitch stays inside this many degrees of the horizon so the view never flips.
pub const PITCH_LIMIT: f32 = 89.0;

/// Free-flying first-person camera.
///
/// Right-handed, y up, wgpu clip depth `[0, 1]`. `rotation` is in degrees:
/// `x` is yaw around +y (0 looks down +x), `y` is pitch above the horizon.
#[derive(Debug, Clone)]
pub struct FlyCamera {
    pub position: Vec3,
    pub rotation: Vec2,
    /// Degrees of rotation per unit of mouse motion.
    pub sensitivity: f32,
    /// World units per second.
    pub speed: f32,
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
}

/// Movement intent for one frame, each axis in `[-1, 1]`.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Movement {
    pub forward: f32,
    pub right: f32,
    pub up: f32,
}

impl Movement {
    /// Builds the intent from held keys: `pressed(positive, negative)` per axis.
    pub fn from_axes(mut pressed: impl FnMut(Axis) -> (bool, bool)) -> Self {
        let mut axis = |a| match pressed(a) {
            (true, false) => 1.0,
            (false, true) => -1.0,
            _ => 0.0,
        };
        Self {
            forward: axis(Axis::Forward),
            right: axis(Axis::Right),
            up: axis(Axis::Up),
        }
    }

    pub fn is_idle(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Axis {
    Forward,
    Right,
    Up,
}

impl FlyCamera {
    /// Looks at the center of the box `min..max` from above one of its corners.
    pub fn framing(min: Vec3, max: Vec3) -> Self {
        let center = (min + max) * 0.5;
        let extent = (max - min).max_element().max(1.0);

        let mut camera = Self {
            position: center + Vec3::new(1.2, 1.0, 1.2) * extent,
            rotation: Vec2::ZERO,
            sensitivity: 0.1,
            speed: 12.0,
            fov_y: 60f32.to_radians(),
            near: 0.1,
            far: extent * 8.0,
        };
        camera.look_at(center);
        camera
    }

    /// Applies mouse motion; +y (mouse down) pitches down.
    pub fn rotate(&mut self, delta: Vec2) {
        self.rotation.x = (self.rotation.x + delta.x * self.sensitivity).rem_euclid(360.0);
        self.rotation.y =
            (self.rotation.y - delta.y * self.sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Unit view direction.
    pub fn front(&self) -> Vec3 {
        let (sy, cy) = self.rotation.x.to_radians().sin_cos();
        let (sp, cp) = self.rotation.y.to_radians().sin_cos();
        Vec3::new(cy * cp, sp, sy * cp)
    }

    /// Turns toward `target`. A target at the camera position is ignored.
    pub fn look_at(&mut self, target: Vec3) {
        let dir = (target - self.position).normalize_or_zero();
        if dir == Vec3::ZERO {
            return;
        }
        self.rotation = Vec2::new(
            dir.z.atan2(dir.x).to_degrees().rem_euclid(360.0),
            dir.y.asin().to_degrees().clamp(-PITCH_LIMIT, PITCH_LIMIT),
        );
    }

    /// Moves for `dt` seconds. Forward and right stay horizontal; up is world +y.
    pub fn translate(&mut self, movement: Movement, dt: f32) {
        let front = self.front();
        let forward = Vec3::new(front.x, 0.0, front.z).normalize_or_zero();
        let right = forward.cross(Vec3::Y);

        let dir = forward * movement.forward + right * movement.right + Vec3::Y * movement.up;
        self.position += dir.normalize_or_zero() * self.speed * dt;
    }

    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        let view = Mat4::look_to_rh(self.position, self.front(), Vec3::Y);
        let proj = Mat4::perspective_rh(self.fov_y, aspect.max(1e-3), self.near, self.far);
        proj * view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    fn chunk_camera() -> FlyCamera {
        FlyCamera::framing(Vec3::ZERO, Vec3::splat(16.0))
    }

    #[test]
    fn pitch_is_clamped_at_the_limit() {
        let mut camera = chunk_camera();
        camera.rotate(Vec2::new(0.0, -100_000.0));
        assert_eq!(camera.rotation.y, PITCH_LIMIT);

        camera.rotate(Vec2::new(0.0, 100_000.0));
        assert_eq!(camera.rotation.y, -PITCH_LIMIT);
        assert!(camera.front().y > -1.0);
    }

    #[test]
    fn yaw_wraps_instead_of_growing() {
        let mut camera = chunk_camera();
        camera.rotate(Vec2::new(7200.0 + 450.0, 0.0));
        assert!((0.0..360.0).contains(&camera.rotation.x));
    }

    #[test]
    fn look_at_points_front_at_the_target() {
        let mut camera = chunk_camera();
        camera.position = Vec3::new(0.0, 5.0, 0.0);
        let target = Vec3::new(10.0, 5.0, 10.0);
        camera.look_at(target);

        let expected = (target - camera.position).normalize();
        assert!(camera.front().abs_diff_eq(expected, 1e-5));
        assert!((camera.rotation.x - 45.0).abs() < 1e-4);
        assert!(camera.rotation.y.abs() < 1e-4);
    }

    #[test]
    fn forward_movement_stays_horizontal() {
        let mut camera = chunk_camera();
        camera.position = Vec3::ZERO;
        camera.rotation = Vec2::new(0.0, 60.0);
        camera.translate(Movement { forward: 1.0, ..Default::default() }, 0.5);

        assert!(camera.position.abs_diff_eq(Vec3::new(camera.speed * 0.5, 0.0, 0.0), 1e-4));
    }

    #[test]
    fn diagonal_movement_is_not_faster() {
        let mut camera = chunk_camera();
        camera.position = Vec3::ZERO;
        let all = Movement {
            forward: 1.0,
            right: 1.0,
            up: 1.0,
        };
        camera.translate(all, 1.0);
        assert!((camera.position.length() - camera.speed).abs() < 1e-3);
    }

    #[test]
    fn right_is_clockwise_from_forward_seen_from_above() {
        let mut camera = chunk_camera();
        camera.position = Vec3::ZERO;
        camera.rotation = Vec2::ZERO;
        camera.translate(Movement { right: 1.0, ..Default::default() }, 1.0);
        assert!(camera.position.abs_diff_eq(Vec3::new(0.0, 0.0, camera.speed), 1e-4));
    }

    #[test]
    fn held_keys_map_to_axes() {
        let movement = Movement::from_axes(|axis| match axis {
            Axis::Forward => (true, false),
            Axis::Right => (true, true),
            Axis::Up => (false, true),
        });
        assert_eq!(
            movement,
            Movement {
                forward: 1.0,
                right: 0.0,
                up: -1.0,
            }
        );
        assert!(Movement::from_axes(|_| (false, false)).is_idle());
    }

    #[test]
    fn framing_centers_the_box() {
        let camera = chunk_camera();
        let center = Vec3::splat(8.0);
        let clip = camera.view_proj(16.0 / 9.0) * center.extend(1.0);
        let ndc = clip / clip.w;

        assert!(ndc.x.abs() < 1e-4);
        assert!(ndc.y.abs() < 1e-4);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn whole_box_is_in_front_of_the_camera() {
        let camera = chunk_camera();
        let vp = camera.view_proj(1.0);
        for corner in [Vec3::ZERO, Vec3::splat(16.0), Vec3::new(16.0, 0.0, 0.0)] {
            let clip: Vec4 = vp * corner.extend(1.0);
            assert!(clip.w > 0.0);
            let z = clip.z / clip.w;
            assert!((0.0..=1.0).contains(&z));
        }
    }
}
