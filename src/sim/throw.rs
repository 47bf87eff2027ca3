//! Throw simulation: parametric flight from the launch point to a target
//!
//! A throw is a straight-line interpolation parameterized by normalized
//! progress. Speed is a clamped monotonic function of the launch-to-target
//! distance, which keeps flight time roughly constant on screen. Each tick
//! the projectile sweeps past the pins and knocks any standing pin it
//! overlaps.

use glam::Vec2;

use super::field::PinField;
use super::state::{GamePhase, GameState};
use crate::consts::*;
use crate::error::CommandError;
use crate::Result;

/// A single throw in flight. Created by `throw_at`, discarded when
/// progress reaches 1.
#[derive(Debug, Clone)]
pub struct Throw {
    pub origin: Vec2,
    pub target: Vec2,
    /// Normalized flight progress in [0, 1)
    pub progress: f32,
    /// Progress gained per tick
    pub speed: f32,
    pub pos: Vec2,
    pub rotation: f32,
    /// Recent positions, oldest first, capped at `MAX_TRAIL_LENGTH`
    pub trail: Vec<Vec2>,
}

impl Throw {
    pub fn new(target: Vec2) -> Self {
        let origin = Vec2::new(LAUNCH_X, LAUNCH_Y);
        let distance = origin.distance(target);
        let speed = (THROW_BASE_SPEED + distance * THROW_SPEED_PER_DISTANCE)
            .clamp(THROW_MIN_SPEED, THROW_MAX_SPEED);
        Self {
            origin,
            target,
            progress: 0.0,
            speed,
            pos: origin,
            rotation: 0.0,
            trail: Vec::with_capacity(MAX_TRAIL_LENGTH),
        }
    }

    /// Advance one tick. Returns true once the throw has landed.
    pub fn advance(&mut self) -> bool {
        self.progress += self.speed;
        self.rotation += MOLKKY_SPIN;
        let t = self.progress.min(1.0);
        self.pos = self.origin.lerp(self.target, t);
        self.record_trail();
        self.progress >= 1.0
    }

    fn record_trail(&mut self) {
        self.trail.push(self.pos);
        if self.trail.len() > MAX_TRAIL_LENGTH {
            self.trail.remove(0);
        }
    }

    /// Standing pins the projectile currently overlaps
    pub fn hits(&self, field: &PinField) -> Vec<u8> {
        field
            .pins()
            .iter()
            .filter(|p| !p.knocked && p.pos.distance(self.pos) < PIN_RADIUS + MOLKKY_RADIUS)
            .map(|p| p.number)
            .collect()
    }
}

impl GameState {
    /// Launch a throw at the given target point. Only one throw may be in
    /// flight; targets below the throw line are rejected.
    pub fn throw_at(&mut self, x: f32, y: f32) -> Result<()> {
        if self.phase == GamePhase::GameOver {
            return Err(CommandError::IllegalCommandInState(
                "game is over; start a new game",
            ));
        }
        if self.current_throw.is_some() {
            return Err(CommandError::IllegalCommandInState(
                "a throw is already in flight",
            ));
        }
        if !(0.0..=FIELD_WIDTH).contains(&x) || !(0.0..THROW_LINE_Y).contains(&y) {
            return Err(CommandError::InvalidTarget { x, y });
        }
        let throw = Throw::new(Vec2::new(x, y));
        log::info!(
            "throw launched at ({x:.0}, {y:.0}), speed {:.3}/tick",
            throw.speed
        );
        self.current_throw = Some(throw);
        Ok(())
    }
}
