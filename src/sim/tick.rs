//! The cooperative animation tick
//!
//! One call advances the whole simulation by one fixed step: due deferred
//! tasks run first, then every animating pin integrates, then the
//! in-flight throw moves and sweeps for collisions. Commands are invoked
//! between ticks, so each tick observes fully-applied state.

use super::chain::Task;
use super::kinematics::{self, BodyMut, Bounds};
use super::state::{GameEvent, GameState};
use crate::consts::*;

/// Advance the game by one tick
pub fn tick(state: &mut GameState) {
    state.time_ticks += 1;

    // Deferred work: cascade knocks and re-stand impulses
    for task in state.pending.drain_due(state.time_ticks) {
        match task {
            Task::Knock(number) => {
                // Idempotent; a pin knocked since scheduling is skipped
                state.knock_pin(number);
            }
            Task::Stand(number) => {
                state.field.apply_stand_impulse(number, &mut state.rng);
            }
        }
    }

    // Integrate every animating pin
    let bounds = Bounds::pin_area(PIN_RADIUS);
    for pin in state.field.pins_mut() {
        if !pin.animating {
            continue;
        }
        pin.animating = kinematics::step(
            BodyMut {
                pos: &mut pin.pos,
                rotation: &mut pin.rotation,
                vel: &mut pin.vel,
                angular_vel: &mut pin.angular_vel,
            },
            &bounds,
        );
    }

    // Advance the throw and knock whatever it passes through
    if let Some(mut throw) = state.current_throw.take() {
        let landed = throw.advance();
        for number in throw.hits(&state.field) {
            state.knock_pin(number);
        }
        if landed {
            state.events.push(GameEvent::ThrowLanded);
            log::debug!("throw landed at ({:.0}, {:.0})", throw.pos.x, throw.pos.y);
        } else {
            state.current_throw = Some(throw);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Tick until nothing moves, with a generous safety cap
    fn settle(state: &mut GameState) {
        for _ in 0..2_000 {
            if state.settled() {
                return;
            }
            tick(state);
        }
        panic!("simulation did not settle");
    }

    #[test]
    fn test_knocked_pin_settles_in_finite_time() {
        let mut state = GameState::new(21);
        state.knock_pin_manually(9).unwrap();
        settle(&mut state);
        let pin = state.field.pin(9).unwrap();
        assert!(pin.knocked);
        assert!(!pin.animating);
        assert_eq!(pin.vel, glam::Vec2::ZERO);
    }

    #[test]
    fn test_throw_at_pin_knocks_it() {
        let mut state = GameState::new(21);
        let target = state.field.pin(10).unwrap().pos;
        state.throw_at(target.x, target.y).unwrap();
        settle(&mut state);
        assert!(state.field.pin(10).unwrap().knocked);
        assert!(state.current_throw.is_none());
        let events = state.take_events();
        assert!(events.contains(&GameEvent::ThrowLanded));
        assert!(events.contains(&GameEvent::PinKnocked { number: 10 }));
    }

    #[test]
    fn test_wide_throw_knocks_nothing() {
        let mut state = GameState::new(21);
        // Far corner, nowhere near the rack
        state.throw_at(60.0, 420.0).unwrap();
        settle(&mut state);
        assert!(state.field.knocked_pins().is_empty());
    }

    #[test]
    fn test_cascades_never_exceed_twelve_pins() {
        for seed in 0..20 {
            let mut state = GameState::new(seed);
            for n in 1..=12 {
                let _ = state.knock_pin_manually(n);
                for _ in 0..50 {
                    tick(&mut state);
                }
            }
            settle(&mut state);
            assert_eq!(state.field.knocked_pins().len(), 12);
            assert!(state.field.standing_pins().is_empty());
        }
    }

    #[test]
    fn test_pins_drift_across_turns_until_full_reset() {
        let mut state = GameState::new(21);
        state.knock_pin_manually(1).unwrap();
        settle(&mut state);
        state.confirm_throw().unwrap();
        settle(&mut state);

        let pin = state.field.pin(1).unwrap();
        assert!(!pin.knocked);
        assert_ne!(pin.rest_pos, pin.rack_pos, "pin should stand where it fell");

        state.reset_pins().unwrap();
        assert_eq!(state.field.pin(1).unwrap().pos, state.field.pin(1).unwrap().rack_pos);
    }

    #[test]
    fn test_new_game_cancels_in_flight_work() {
        let mut state = GameState::new(21);
        state.throw_at(400.0, 160.0).unwrap();
        for _ in 0..3 {
            tick(&mut state);
        }
        state.knock_pin(5);
        state.new_game();

        assert!(state.current_throw.is_none());
        assert!(state.settled());
        assert!(state.field.knocked_pins().is_empty());
        // Ticking a fresh game does nothing surprising
        for _ in 0..50 {
            tick(&mut state);
        }
        assert!(state.field.knocked_pins().is_empty());
    }
}
