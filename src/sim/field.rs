//! The pin field: official rack layout, knockdowns, and resets
//!
//! Twelve pins live here for the lifetime of a session. A pin's `knocked`
//! flag and its geometry are independent: a knocked pin keeps sliding
//! until the integrator stops it, and between turns pins are stood up
//! wherever they lie - only a full reset restores the rack.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_3, FRAC_PI_4, FRAC_PI_6, PI, TAU};

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::chain::{self, Task};
use super::state::{GameEvent, GamePhase, GameState, Pin};
use crate::consts::*;
use crate::error::CommandError;
use crate::Result;

/// Official 4-row rack: pin numbers by (column offset, row), far row first
const RACK: [(f32, usize, u8); PIN_COUNT] = [
    (-1.0, 0, 7),
    (0.0, 0, 9),
    (1.0, 0, 8),
    (-1.5, 1, 5),
    (-0.5, 1, 11),
    (0.5, 1, 12),
    (1.5, 1, 6),
    (-1.0, 2, 3),
    (0.0, 2, 10),
    (1.0, 2, 4),
    (-0.5, 3, 1),
    (0.5, 3, 2),
];

/// Holds the 12 pins and their kinetic state
#[derive(Debug, Clone)]
pub struct PinField {
    pins: Vec<Pin>,
}

impl Default for PinField {
    fn default() -> Self {
        Self::new()
    }
}

impl PinField {
    /// Build the field with every pin in its rack slot
    pub fn new() -> Self {
        let pins = RACK
            .iter()
            .map(|&(col, row, number)| {
                let pos = Vec2::new(
                    RACK_CENTER_X + col * RACK_COLUMN_SPACING,
                    RACK_START_Y + row as f32 * RACK_ROW_SPACING,
                );
                Pin::new(number, pos)
            })
            .collect();
        Self { pins }
    }

    pub fn pins(&self) -> &[Pin] {
        &self.pins
    }

    pub fn pins_mut(&mut self) -> &mut [Pin] {
        &mut self.pins
    }

    pub fn pin(&self, number: u8) -> Option<&Pin> {
        self.pins.iter().find(|p| p.number == number)
    }

    pub fn pin_mut(&mut self, number: u8) -> Option<&mut Pin> {
        self.pins.iter_mut().find(|p| p.number == number)
    }

    /// Pins still upright
    pub fn standing_pins(&self) -> Vec<&Pin> {
        self.pins.iter().filter(|p| !p.knocked).collect()
    }

    /// Pins down since the last reset cycle
    pub fn knocked_pins(&self) -> Vec<&Pin> {
        self.pins.iter().filter(|p| p.knocked).collect()
    }

    /// Knocked pin numbers, ascending; what the scorer reads
    pub fn knocked_numbers(&self) -> Vec<u8> {
        let mut numbers: Vec<u8> = self
            .pins
            .iter()
            .filter(|p| p.knocked)
            .map(|p| p.number)
            .collect();
        numbers.sort_unstable();
        numbers
    }

    pub fn any_animating(&self) -> bool {
        self.pins.iter().any(|p| p.animating)
    }

    /// Full reset: every pin back to its rack slot, upright and still
    pub fn reset_to_rack(&mut self) {
        for pin in &mut self.pins {
            pin.pos = pin.rack_pos;
            pin.rest_pos = pin.rack_pos;
            pin.settle_upright();
        }
    }

    /// Apply the gentle re-stand impulse scheduled between turns
    pub(crate) fn apply_stand_impulse(&mut self, number: u8, rng: &mut Pcg32) {
        let Some(pin) = self.pin_mut(number) else {
            return;
        };
        if pin.knocked {
            return;
        }
        pin.animating = true;
        pin.vel = Vec2::new(
            rng.random_range(-STAND_LATERAL_RANGE..STAND_LATERAL_RANGE),
            -rng.random_range(STAND_LIFT_MIN..STAND_LIFT_MAX),
        );
        pin.angular_vel = rng.random_range(-STAND_SPIN_RANGE..STAND_SPIN_RANGE);
    }
}

/// Draw the outward knockdown impulse for a pin at `pos`. The direction
/// starts uniform and is resampled toward the field interior near each
/// boundary, so pins stay in the visible play area.
fn knock_impulse(pos: Vec2, rng: &mut Pcg32) -> (Vec2, f32) {
    let mut angle = rng.random_range(0.0..TAU);
    let force = rng.random_range(KNOCK_FORCE_MIN..KNOCK_FORCE_MAX);

    if pos.y < BIAS_FAR_Y {
        // Far edge: push back down the field
        angle = FRAC_PI_4 + rng.random_range(0.0..FRAC_PI_2);
    } else if pos.y > BIAS_NEAR_Y {
        // Near the throw line: push up-field
        angle = -FRAC_PI_4 + rng.random_range(0.0..FRAC_PI_2);
    }
    if pos.x < BIAS_LEFT_X {
        angle = -FRAC_PI_6 + rng.random_range(0.0..FRAC_PI_3);
    } else if pos.x > BIAS_RIGHT_X {
        angle = PI * 5.0 / 6.0 + rng.random_range(0.0..FRAC_PI_3);
    }

    let vel = Vec2::new(angle.cos(), angle.sin()) * force;
    let spin = rng.random_range(-KNOCK_SPIN_RANGE..KNOCK_SPIN_RANGE);
    (vel, spin)
}

impl GameState {
    /// Knock a pin over and roll its chain reaction. Idempotent: a pin
    /// already down is left untouched. Returns whether the pin fell.
    pub(crate) fn knock_pin(&mut self, number: u8) -> bool {
        let Some(pin) = self.field.pin_mut(number) else {
            return false;
        };
        if pin.knocked {
            return false;
        }

        let (vel, spin) = knock_impulse(pin.pos, &mut self.rng);
        pin.topple(vel, spin);
        self.events.push(GameEvent::PinKnocked { number });
        log::debug!("pin {} knocked", number);

        chain::propagate(
            &self.field,
            number,
            &mut self.rng,
            &mut self.pending,
            self.time_ticks,
            &mut self.events,
        );
        true
    }

    /// Referee override: mark a pin as knocked by hand.
    ///
    /// Rejected while a throw is in flight - a manual knock landing in the
    /// same tick as projectile collisions could double-score a turn.
    pub fn knock_pin_manually(&mut self, number: u8) -> Result<()> {
        if self.phase == GamePhase::GameOver {
            return Err(CommandError::IllegalCommandInState(
                "game is over; start a new game",
            ));
        }
        if self.current_throw.is_some() {
            return Err(CommandError::IllegalCommandInState(
                "a throw is in flight",
            ));
        }
        if !(1..=PIN_COUNT as u8).contains(&number) {
            return Err(CommandError::InvalidPinReference(number));
        }
        if self.field.pin(number).is_some_and(|p| p.knocked) {
            return Err(CommandError::AlreadyKnocked(number));
        }
        self.knock_pin(number);
        Ok(())
    }

    /// Full manual reset back to the rack layout
    pub fn reset_pins(&mut self) -> Result<()> {
        if self.phase == GamePhase::GameOver {
            return Err(CommandError::IllegalCommandInState(
                "game is over; start a new game",
            ));
        }
        if self.current_throw.is_some() {
            return Err(CommandError::IllegalCommandInState(
                "a throw is in flight",
            ));
        }
        self.pending.cancel_all();
        self.field.reset_to_rack();
        log::info!("pins re-racked");
        Ok(())
    }

    /// Between-turn reset: stand fallen pins up where they lie and
    /// schedule their re-stand wobble. Pending cascade knocks are
    /// cancelled - a pin that has been stood up must not fall to a stale
    /// task from the previous turn.
    pub(crate) fn reset_field_for_next_turn(&mut self) {
        self.pending.cancel_all();
        let now = self.time_ticks;
        let mut stands: Vec<(u64, u8)> = Vec::new();
        for pin in self.field.pins_mut() {
            if !pin.knocked {
                continue;
            }
            pin.rest_pos = pin.pos;
            pin.settle_upright();
            let delay = self.rng.random_range(0..=STAND_DELAY_MAX_TICKS);
            stands.push((now + delay, pin.number));
        }
        for (due, number) in stands {
            self.pending.schedule(due, Task::Stand(number));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_official_rack_layout() {
        let field = PinField::new();
        assert_eq!(field.pins().len(), 12);

        let mut numbers: Vec<u8> = field.pins().iter().map(|p| p.number).collect();
        numbers.sort_unstable();
        assert_eq!(numbers, (1..=12).collect::<Vec<u8>>());

        // Far row is 7-9-8 left to right
        assert_eq!(field.pin(7).unwrap().pos, Vec2::new(365.0, 150.0));
        assert_eq!(field.pin(9).unwrap().pos, Vec2::new(400.0, 150.0));
        assert_eq!(field.pin(8).unwrap().pos, Vec2::new(435.0, 150.0));
        // Near row is 1-2
        assert_eq!(field.pin(1).unwrap().pos, Vec2::new(382.5, 270.0));
        assert_eq!(field.pin(2).unwrap().pos, Vec2::new(417.5, 270.0));
    }

    #[test]
    fn test_partition_is_always_exhaustive() {
        let mut state = GameState::new(5);
        for n in [3, 7, 7, 12, 1] {
            state.knock_pin(n);
            let standing = state.field.standing_pins().len();
            let knocked = state.field.knocked_pins().len();
            assert_eq!(standing + knocked, 12);
        }
        assert_eq!(state.field.knocked_numbers(), vec![1, 3, 7, 12]);
    }

    #[test]
    fn test_knock_is_idempotent() {
        let mut state = GameState::new(5);
        assert!(state.knock_pin(6));
        let vel = state.field.pin(6).unwrap().vel;
        assert!(!state.knock_pin(6));
        assert_eq!(state.field.pin(6).unwrap().vel, vel);
    }

    #[test]
    fn test_knock_impulse_force_range() {
        let mut rng = Pcg32::seed_from_u64(11);
        for _ in 0..200 {
            let (vel, spin) = knock_impulse(Vec2::new(400.0, 250.0), &mut rng);
            let force = vel.length();
            assert!(force > KNOCK_FORCE_MIN - 0.01 && force < KNOCK_FORCE_MAX + 0.01);
            assert!(spin.abs() <= KNOCK_SPIN_RANGE);
        }
    }

    #[test]
    fn test_knock_impulse_biases_near_pins_up_field() {
        let mut rng = Pcg32::seed_from_u64(11);
        for _ in 0..200 {
            // Below the near threshold: velocity must point up-field
            let (vel, _) = knock_impulse(Vec2::new(400.0, 400.0), &mut rng);
            assert!(vel.y < 0.0, "near-line pin knocked toward the line: {vel:?}");
        }
    }

    #[test]
    fn test_knock_impulse_biases_edge_pins_inward() {
        let mut rng = Pcg32::seed_from_u64(11);
        for _ in 0..200 {
            let (vel, _) = knock_impulse(Vec2::new(100.0, 250.0), &mut rng);
            assert!(vel.x > 0.0, "left-edge pin knocked outward: {vel:?}");
            let (vel, _) = knock_impulse(Vec2::new(700.0, 250.0), &mut rng);
            assert!(vel.x < 0.0, "right-edge pin knocked outward: {vel:?}");
        }
    }

    #[test]
    fn test_full_reset_restores_rack() {
        let mut state = GameState::new(5);
        state.knock_pin(4);
        state.knock_pin(10);
        state.field.pin_mut(4).unwrap().pos = Vec2::new(300.0, 333.0);

        state.reset_pins().unwrap();
        for pin in state.field.pins() {
            assert!(!pin.knocked);
            assert!(!pin.animating);
            assert_eq!(pin.pos, pin.rack_pos);
            assert_eq!(pin.rest_pos, pin.rack_pos);
            assert_eq!(pin.vel, Vec2::ZERO);
            assert_eq!(pin.angular_vel, 0.0);
        }
    }

    #[test]
    fn test_manual_knock_validation() {
        let mut state = GameState::new(5);
        assert_eq!(
            state.knock_pin_manually(0),
            Err(CommandError::InvalidPinReference(0))
        );
        assert_eq!(
            state.knock_pin_manually(13),
            Err(CommandError::InvalidPinReference(13))
        );
        state.knock_pin_manually(8).unwrap();
        assert_eq!(
            state.knock_pin_manually(8),
            Err(CommandError::AlreadyKnocked(8))
        );
    }

    #[test]
    fn test_manual_knock_rejected_mid_flight() {
        let mut state = GameState::new(5);
        state.throw_at(400.0, 200.0).unwrap();
        let before = state.field.knocked_numbers();
        assert!(matches!(
            state.knock_pin_manually(5),
            Err(CommandError::IllegalCommandInState(_))
        ));
        assert_eq!(state.field.knocked_numbers(), before);
    }

    #[test]
    fn test_between_turn_reset_preserves_positions() {
        let mut state = GameState::new(5);
        state.knock_pin(9);
        // Let the pin slide somewhere
        for _ in 0..300 {
            super::super::tick(&mut state);
        }
        let rest = state.field.pin(9).unwrap().pos;
        assert_ne!(rest, state.field.pin(9).unwrap().rack_pos);

        state.reset_field_for_next_turn();
        let pin = state.field.pin(9).unwrap();
        assert!(!pin.knocked);
        assert_eq!(pin.pos, rest);
        assert_eq!(pin.rest_pos, rest);
        assert!(!state.pending.is_empty(), "re-stand impulse not scheduled");
    }
}
