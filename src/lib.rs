//! Mölkky Referee - a top-down pin-throwing game engine
//!
//! Core modules:
//! - `sim`: Deterministic simulation (pin field, kinematics, throws, scoring)
//! - `snapshot`: Pull-based read models for any presentation layer
//! - `error`: Command rejection taxonomy
//!
//! The engine never draws anything. It consumes commands between ticks,
//! advances kinetic state once per tick, and exposes snapshots on demand.

pub mod error;
pub mod sim;
pub mod snapshot;

pub use error::{CommandError, Result};
pub use sim::{GameEvent, GamePhase, GameState, tick};

/// Game configuration constants
pub mod consts {
    /// Fixed tick rate. Velocities and delays below are denominated per tick.
    pub const TICK_HZ: u32 = 60;

    /// Play field dimensions (top-down view, y grows toward the throw line)
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 600.0;
    /// Pins and throw targets live above this line
    pub const THROW_LINE_Y: f32 = 480.0;
    /// Inset applied when clamping bodies to the field
    pub const BOUNDARY_PADDING: f32 = 20.0;

    /// Pin geometry and official rack layout
    pub const PIN_RADIUS: f32 = 12.0;
    pub const RACK_CENTER_X: f32 = 400.0;
    pub const RACK_START_Y: f32 = 150.0;
    pub const RACK_COLUMN_SPACING: f32 = 35.0;
    pub const RACK_ROW_SPACING: f32 = 40.0;

    /// Knockdown impulse
    pub const KNOCK_FORCE_MIN: f32 = 2.0;
    pub const KNOCK_FORCE_MAX: f32 = 4.0;
    /// Knockdown spin, symmetric around zero (radians per tick)
    pub const KNOCK_SPIN_RANGE: f32 = 0.075;

    /// Knock directions are biased back toward the field interior
    /// once a pin drifts past these coordinates.
    pub const BIAS_FAR_Y: f32 = RACK_START_Y;
    pub const BIAS_NEAR_Y: f32 = 350.0;
    pub const BIAS_LEFT_X: f32 = 200.0;
    pub const BIAS_RIGHT_X: f32 = 600.0;

    /// Per-tick friction multipliers
    pub const FRICTION: f32 = 0.96;
    pub const ROTATION_FRICTION: f32 = 0.93;
    /// Both velocity components below this snap the body to rest
    pub const MIN_VELOCITY: f32 = 0.05;
    /// Velocity retained after a boundary bounce
    pub const BOUNCE_DAMPING: f32 = 0.5;

    /// Chain reactions
    pub const IMPACT_RADIUS: f32 = 50.0;
    pub const CHAIN_PROBABILITY: f64 = 0.3;
    /// Cascade knocks fire 100-300 ms after the source impact
    pub const CHAIN_DELAY_MIN_TICKS: u64 = 6;
    pub const CHAIN_DELAY_MAX_TICKS: u64 = 18;

    /// Between-turn re-stand impulse
    pub const STAND_DELAY_MAX_TICKS: u64 = 6;
    pub const STAND_LATERAL_RANGE: f32 = 0.25;
    pub const STAND_LIFT_MIN: f32 = 0.3;
    pub const STAND_LIFT_MAX: f32 = 0.8;
    pub const STAND_SPIN_RANGE: f32 = 0.015;

    /// Throwing
    pub const LAUNCH_X: f32 = 400.0;
    pub const LAUNCH_Y: f32 = 520.0;
    pub const MOLKKY_RADIUS: f32 = 12.0;
    /// Projectile rotation per tick while in flight
    pub const MOLKKY_SPIN: f32 = 0.15;
    /// Flight speed in progress units per tick, derived from distance
    pub const THROW_BASE_SPEED: f32 = 0.05;
    pub const THROW_SPEED_PER_DISTANCE: f32 = 0.0001;
    pub const THROW_MIN_SPEED: f32 = 0.02;
    pub const THROW_MAX_SPEED: f32 = 0.08;
    pub const MAX_TRAIL_LENGTH: usize = 15;

    /// Scoring
    pub const TARGET_SCORE: u32 = 50;
    pub const BUST_RESET_SCORE: u32 = 25;
    pub const MAX_MISS_STREAK: u32 = 3;
    pub const PIN_COUNT: usize = 12;
    pub const PLAYER_COUNT: usize = 2;
}
