//! Turn scoring: the official Mölkky rules
//!
//! One pin down scores its number; several pins down score the count of
//! pins, not the sum. Exactly 50 wins. Overshooting 50 busts the score
//! back to 25. Three scoreless throws in a row wipe the score to zero.
//! The rules are applied in that order and only one branch fires per
//! confirmed throw.

use super::state::{GameEvent, GamePhase, GameState, HistoryEntry};
use crate::consts::*;
use crate::error::CommandError;
use crate::Result;

/// Points awarded for a set of knocked pins
pub fn points_for(knocked: &[u8]) -> u32 {
    match knocked {
        [] => 0,
        [single] => u32::from(*single),
        many => many.len() as u32,
    }
}

impl GameState {
    /// Confirm the active player's throw: read the knocked pins, award
    /// points, apply win/bust/elimination precedence, hand the turn to the
    /// next player, and stand the fallen pins back up where they lie.
    ///
    /// Rejected while a throw is in flight - the projectile could still
    /// knock pins, and a half-counted turn would corrupt the score.
    pub fn confirm_throw(&mut self) -> Result<()> {
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

        let knocked = self.field.knocked_numbers();
        let points = points_for(&knocked);
        let index = self.active_player;
        let player = &mut self.players[index];

        player.score += points;
        player.history.push(HistoryEntry::Throw {
            throw_index: self.throw_index,
            pins: knocked.clone(),
            points,
            score_after: player.score,
        });
        if points == 0 {
            player.miss_streak += 1;
        } else {
            player.miss_streak = 0;
        }
        self.events.push(GameEvent::TurnScored {
            player: player.id,
            points,
            score_after: player.score,
        });
        log::info!(
            "{} scored {points} with pins {knocked:?}, total {}",
            player.name,
            player.score
        );

        if player.score == TARGET_SCORE {
            self.phase = GamePhase::GameOver;
            self.winner = Some(index);
            self.events.push(GameEvent::GameOver { winner: player.id });
            log::info!("{} wins with exactly {TARGET_SCORE}", player.name);
            return Ok(());
        } else if player.score > TARGET_SCORE {
            log::info!("{} busts: {} > {TARGET_SCORE}", player.name, player.score);
            player.score = BUST_RESET_SCORE;
        } else if player.miss_streak >= MAX_MISS_STREAK {
            let score_before = player.score;
            player.score = 0;
            player.miss_streak = 0;
            player.history.push(HistoryEntry::Elimination { score_before });
            self.events.push(GameEvent::PlayerEliminated { player: player.id });
            log::info!("{} eliminated after {MAX_MISS_STREAK} misses", player.name);
        }

        self.advance_player();
        self.reset_field_for_next_turn();
        Ok(())
    }
}
