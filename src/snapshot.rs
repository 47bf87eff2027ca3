//! Pull-based read models for presentation layers
//!
//! Rendering and UI never touch the simulation directly; they ask for one
//! of these snapshots each frame (or on demand) and draw from it. The
//! snapshots are plain serializable data with no references back into the
//! engine.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::{GameState, HistoryEntry};

/// Drawable state of one pin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PinSnapshot {
    pub number: u8,
    pub pos: Vec2,
    pub rotation: f32,
    pub knocked: bool,
    pub animating: bool,
}

/// Drawable state of the throw in flight, if any
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThrowSnapshot {
    pub pos: Vec2,
    pub rotation: f32,
    pub progress: f32,
    /// Recent flight path, oldest first
    pub trail: Vec<Vec2>,
}

/// Everything the field renderer needs for one frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSnapshot {
    pub pins: Vec<PinSnapshot>,
    pub standing: usize,
    pub knocked: usize,
    pub throw: Option<ThrowSnapshot>,
}

/// One player's scoreboard line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub id: u8,
    pub name: String,
    pub score: u32,
    pub miss_streak: u32,
    pub history: Vec<HistoryEntry>,
}

/// Everything the score panel needs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreboardSnapshot {
    pub players: Vec<PlayerSnapshot>,
    /// Index of the player throwing now
    pub active_player: usize,
    /// Name of the player up next
    pub next_player: String,
    pub throw_index: u32,
    pub game_over: bool,
    pub winner: Option<String>,
}

impl GameState {
    /// Field state for drawing: pins plus the throw in flight
    pub fn field_snapshot(&self) -> FieldSnapshot {
        let pins: Vec<PinSnapshot> = self
            .field
            .pins()
            .iter()
            .map(|p| PinSnapshot {
                number: p.number,
                pos: p.pos,
                rotation: p.rotation,
                knocked: p.knocked,
                animating: p.animating,
            })
            .collect();
        let knocked = pins.iter().filter(|p| p.knocked).count();
        FieldSnapshot {
            standing: pins.len() - knocked,
            knocked,
            pins,
            throw: self.current_throw.as_ref().map(|t| ThrowSnapshot {
                pos: t.pos,
                rotation: t.rotation,
                progress: t.progress,
                trail: t.trail.clone(),
            }),
        }
    }

    /// Scoreboard state for the UI panel
    pub fn scoreboard_snapshot(&self) -> ScoreboardSnapshot {
        ScoreboardSnapshot {
            players: self
                .players
                .iter()
                .map(|p| PlayerSnapshot {
                    id: p.id,
                    name: p.name.clone(),
                    score: p.score,
                    miss_streak: p.miss_streak,
                    history: p.history.clone(),
                })
                .collect(),
            active_player: self.active_player,
            next_player: self.next_player().name.clone(),
            throw_index: self.throw_index,
            game_over: self.game_over(),
            winner: self.winner.map(|i| self.players[i].name.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::tick;

    #[test]
    fn test_field_snapshot_counts_partition() {
        let mut state = GameState::new(2);
        state.knock_pin_manually(4).unwrap();
        state.knock_pin_manually(11).unwrap();
        let snap = state.field_snapshot();
        assert_eq!(snap.pins.len(), 12);
        assert_eq!(snap.knocked, 2);
        assert_eq!(snap.standing, 10);
        assert!(snap.throw.is_none());
    }

    #[test]
    fn test_snapshot_exposes_throw_trail() {
        let mut state = GameState::new(2);
        state.throw_at(400.0, 160.0).unwrap();
        for _ in 0..4 {
            tick(&mut state);
        }
        let snap = state.field_snapshot();
        let throw = snap.throw.expect("throw should be in flight");
        assert_eq!(snap.pins.len(), 12);
        assert_eq!(throw.trail.len(), 4);
        assert!(throw.progress > 0.0);
    }

    #[test]
    fn test_scoreboard_round_trips_as_json() {
        let mut state = GameState::new(2);
        state.field.pin_mut(9).unwrap().knocked = true;
        state.confirm_throw().unwrap();

        let snap = state.scoreboard_snapshot();
        assert_eq!(snap.players[0].score, 9);
        assert_eq!(snap.active_player, 1);
        assert_eq!(snap.next_player, "Player 1");
        assert!(!snap.game_over);

        let json = serde_json::to_string(&snap).unwrap();
        let back: ScoreboardSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.players[0].score, 9);
        assert_eq!(back.winner, None);
    }
}
