//! Per-tick integrator for animating bodies
//!
//! Position integrates velocity, rotation integrates spin, and both decay
//! geometrically under friction, so every body comes to rest in finite
//! time. Bodies are clamped to a padded rectangle with a soft bounce.

use glam::Vec2;

use crate::consts::*;

/// Axis-aligned clamp region for a moving body
#[derive(Debug, Clone, Copy)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    /// The region a pin of the given radius may occupy. The far and side
    /// limits are inset by the boundary padding; the near limit is the
    /// throw line.
    pub fn pin_area(radius: f32) -> Self {
        Self {
            min: Vec2::splat(radius + BOUNDARY_PADDING),
            max: Vec2::new(
                FIELD_WIDTH - radius - BOUNDARY_PADDING,
                THROW_LINE_Y - radius,
            ),
        }
    }

    pub fn contains(&self, pos: Vec2) -> bool {
        pos.x >= self.min.x && pos.x <= self.max.x && pos.y >= self.min.y && pos.y <= self.max.y
    }
}

/// Mutable view over the kinetic components of any animating body
pub struct BodyMut<'a> {
    pub pos: &'a mut Vec2,
    pub rotation: &'a mut f32,
    pub vel: &'a mut Vec2,
    pub angular_vel: &'a mut f32,
}

/// Advance a body by one tick. Returns false once the body has stopped
/// (velocity snapped to zero), at which point `animating` should be
/// cleared by the caller.
pub fn step(body: BodyMut<'_>, bounds: &Bounds) -> bool {
    *body.pos += *body.vel;
    *body.rotation += *body.angular_vel;

    *body.vel *= FRICTION;
    *body.angular_vel *= ROTATION_FRICTION;

    let mut moving = true;
    if body.vel.x.abs() < MIN_VELOCITY && body.vel.y.abs() < MIN_VELOCITY {
        *body.vel = Vec2::ZERO;
        *body.angular_vel = 0.0;
        moving = false;
    }

    // Soft bounce: clamp to the field, reflect and damp the offending
    // velocity component. Runs even on the stopping tick so a body never
    // comes to rest outside the field.
    if body.pos.x < bounds.min.x {
        body.pos.x = bounds.min.x;
        body.vel.x = body.vel.x.abs() * BOUNCE_DAMPING;
    } else if body.pos.x > bounds.max.x {
        body.pos.x = bounds.max.x;
        body.vel.x = -body.vel.x.abs() * BOUNCE_DAMPING;
    }
    if body.pos.y < bounds.min.y {
        body.pos.y = bounds.min.y;
        body.vel.y = body.vel.y.abs() * BOUNCE_DAMPING;
    } else if body.pos.y > bounds.max.y {
        body.pos.y = bounds.max.y;
        body.vel.y = -body.vel.y.abs() * BOUNCE_DAMPING;
    }

    moving
}
