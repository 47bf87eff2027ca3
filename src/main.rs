//! Headless referee demo
//!
//! Plays a full two-player game through the engine: each turn aims at a
//! random standing pin with a little scatter, runs the simulation until
//! everything settles, confirms the throw, and logs what the referee saw.
//! Pass a seed as the first argument to replay a specific game.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use molkky_referee::consts::*;
use molkky_referee::sim::{GameEvent, GameState, tick};

/// Hard cap on turns so a pathological seed can't loop forever
const MAX_TURNS: u32 = 200;

fn main() {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(0xC0FFEE);
    log::info!("refereeing a demo game with seed {seed}");

    let mut state = GameState::new(seed);
    // Aiming jitter is the thrower's problem, not the referee's: keep it
    // on a separate stream so it never perturbs the simulation RNG.
    let mut aim = Pcg32::seed_from_u64(seed ^ 0x5EED_5EED);

    for _ in 0..MAX_TURNS {
        if state.game_over() {
            break;
        }

        let target = pick_target(&state, &mut aim);
        if let Err(err) = state.throw_at(target.x, target.y) {
            log::warn!("throw rejected: {err}");
            break;
        }
        settle(&mut state);

        if let Err(err) = state.confirm_throw() {
            log::warn!("confirm rejected: {err}");
            break;
        }
        report_events(&mut state);
        settle(&mut state);
    }

    let scoreboard = state.scoreboard_snapshot();
    match serde_json::to_string_pretty(&scoreboard) {
        Ok(json) => println!("{json}"),
        Err(err) => log::error!("could not serialize scoreboard: {err}"),
    }
}

/// Aim at a random standing pin, scattered by up to ~30 units
fn pick_target(state: &GameState, aim: &mut Pcg32) -> Vec2 {
    let standing = state.field.standing_pins();
    if standing.is_empty() {
        return Vec2::new(RACK_CENTER_X, RACK_START_Y + RACK_ROW_SPACING);
    }
    let pick = aim.random_range(0..standing.len());
    let jitter = Vec2::new(aim.random_range(-30.0..30.0), aim.random_range(-30.0..30.0));
    let target = standing[pick].pos + jitter;
    Vec2::new(
        target.x.clamp(0.0, FIELD_WIDTH),
        target.y.clamp(0.0, THROW_LINE_Y - 1.0),
    )
}

/// Tick until the throw lands, cascades finish, and every pin stops
fn settle(state: &mut GameState) {
    // Worst case is a full-rack cascade; a few seconds of ticks covers it
    for _ in 0..TICK_HZ * 30 {
        if state.settled() {
            return;
        }
        tick(state);
    }
    log::warn!("field did not settle in time");
}

fn report_events(state: &mut GameState) {
    for event in state.take_events() {
        match event {
            GameEvent::TurnScored {
                player,
                points,
                score_after,
            } => log::info!("player {player} scored {points}, now at {score_after}"),
            GameEvent::PlayerEliminated { player } => {
                log::info!("player {player} eliminated, back to zero")
            }
            GameEvent::GameOver { winner } => log::info!("player {winner} wins!"),
            _ => {}
        }
    }
}
