//! Game state and core simulation types
//!
//! Everything the referee tracks across a session lives here. State is
//! mutated only by commands (between ticks) and by [`super::tick`]; a fixed
//! seed therefore replays the exact same game.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::chain::TaskQueue;
use super::field::PinField;
use super::throw::Throw;
use crate::consts::*;

/// Current phase of a game session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Turns are being played
    Playing,
    /// A player reached exactly 50; only `new_game` leaves this phase
    GameOver,
}

/// One of the 12 numbered pins
#[derive(Debug, Clone)]
pub struct Pin {
    /// Identity, 1-12, unique and immutable
    pub number: u8,
    /// Current location; moves while `animating`
    pub pos: Vec2,
    /// Where the pin stands between turns. Updated after each knockdown
    /// cycle - fallen pins are stood up in place, never re-racked.
    pub rest_pos: Vec2,
    /// Official rack slot, restored only by a full reset
    pub rack_pos: Vec2,
    /// True from impact until the next re-stand cycle
    pub knocked: bool,
    pub vel: Vec2,
    pub rotation: f32,
    pub angular_vel: f32,
    /// True while the integrator is still moving this pin
    pub animating: bool,
}

impl Pin {
    pub fn new(number: u8, pos: Vec2) -> Self {
        Self {
            number,
            pos,
            rest_pos: pos,
            rack_pos: pos,
            knocked: false,
            vel: Vec2::ZERO,
            rotation: 0.0,
            angular_vel: 0.0,
            animating: false,
        }
    }

    /// Knock the pin over with the given impulse
    pub fn topple(&mut self, vel: Vec2, spin: f32) {
        self.knocked = true;
        self.vel = vel;
        self.angular_vel = spin;
        self.animating = true;
    }

    /// Clear kinetic state and stand the pin where it currently sits
    pub fn settle_upright(&mut self) {
        self.knocked = false;
        self.vel = Vec2::ZERO;
        self.rotation = 0.0;
        self.angular_vel = 0.0;
        self.animating = false;
    }
}

/// One line in a player's scoring history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HistoryEntry {
    /// A confirmed throw
    Throw {
        throw_index: u32,
        /// Pins down when the throw was confirmed, ascending
        pins: Vec<u8>,
        points: u32,
        score_after: u32,
    },
    /// Third consecutive miss; score wiped back to zero
    Elimination { score_before: u32 },
}

/// One of the two players
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: u8,
    pub name: String,
    /// Running score in [0, 50]
    pub score: u32,
    /// Consecutive scoreless confirmed throws
    pub miss_streak: u32,
    /// Append-only turn log
    pub history: Vec<HistoryEntry>,
}

impl Player {
    pub fn new(id: u8, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            score: 0,
            miss_streak: 0,
            history: Vec::new(),
        }
    }

    /// Wipe scoring state for a fresh game; identity is kept
    pub fn reset(&mut self) {
        self.score = 0;
        self.miss_streak = 0;
        self.history.clear();
    }
}

/// Gameplay notifications drained by the embedder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A pin transitioned from standing to fallen
    PinKnocked { number: u8 },
    /// A knocked pin scheduled a cascade knock on a neighbor
    ChainTriggered { source: u8, target: u8 },
    /// The in-flight projectile reached its target and was discarded
    ThrowLanded,
    /// A throw was confirmed and scored
    TurnScored {
        player: u8,
        points: u32,
        score_after: u32,
    },
    /// Three consecutive misses; the player's score was reset to zero
    PlayerEliminated { player: u8 },
    /// Emitted exactly once per game, when a player reaches 50
    GameOver { winner: u8 },
}

/// Complete session state: the single source of truth for whose turn it is
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    /// Tick counter, the clock for all scheduled tasks
    pub time_ticks: u64,
    pub phase: GamePhase,
    pub field: PinField,
    pub players: [Player; PLAYER_COUNT],
    pub active_player: usize,
    /// 1-based round counter stamped into history records
    pub throw_index: u32,
    /// Index into `players`, set when the game ends
    pub winner: Option<usize>,
    /// At most one throw is in flight at a time
    pub current_throw: Option<Throw>,
    /// Deferred cascade knocks and re-stand impulses
    pub(crate) pending: TaskQueue,
    pub(crate) events: Vec<GameEvent>,
}

impl GameState {
    /// Create a fresh session with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            time_ticks: 0,
            phase: GamePhase::Playing,
            field: PinField::new(),
            players: [Player::new(1, "Player 1"), Player::new(2, "Player 2")],
            active_player: 0,
            throw_index: 1,
            winner: None,
            current_throw: None,
            pending: TaskQueue::default(),
            events: Vec::new(),
        }
    }

    /// Reset the session in place. Cancels the in-flight throw and every
    /// pending scheduled task so nothing stale mutates the new game.
    pub fn new_game(&mut self) {
        for player in &mut self.players {
            player.reset();
        }
        self.active_player = 0;
        self.throw_index = 1;
        self.phase = GamePhase::Playing;
        self.winner = None;
        self.current_throw = None;
        self.pending.cancel_all();
        self.field.reset_to_rack();
        self.time_ticks = 0;
        self.events.clear();
        log::info!("new game started (seed {})", self.seed);
    }

    /// Drain queued gameplay events
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn throw_in_flight(&self) -> bool {
        self.current_throw.is_some()
    }

    /// True once nothing is moving and nothing is scheduled to move
    pub fn settled(&self) -> bool {
        self.current_throw.is_none()
            && self.pending.is_empty()
            && !self.field.any_animating()
    }

    /// The player after the active one in the fixed round-robin order
    pub fn next_player(&self) -> &Player {
        &self.players[(self.active_player + 1) % self.players.len()]
    }

    /// Advance the round-robin; the round counter increments once both
    /// players have thrown.
    pub(crate) fn advance_player(&mut self) {
        self.active_player = (self.active_player + 1) % self.players.len();
        if self.active_player == 0 {
            self.throw_index += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_playing() {
        let state = GameState::new(7);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.active_player, 0);
        assert_eq!(state.throw_index, 1);
        assert!(state.winner.is_none());
        assert!(state.settled());
    }

    #[test]
    fn test_advance_player_round_robin() {
        let mut state = GameState::new(7);
        state.advance_player();
        assert_eq!(state.active_player, 1);
        assert_eq!(state.throw_index, 1);
        state.advance_player();
        assert_eq!(state.active_player, 0);
        assert_eq!(state.throw_index, 2);
    }

    #[test]
    fn test_new_game_keeps_player_identity() {
        let mut state = GameState::new(7);
        state.players[0].score = 31;
        state.players[0].miss_streak = 2;
        state.players[1].history.push(HistoryEntry::Throw {
            throw_index: 1,
            pins: vec![4],
            points: 4,
            score_after: 4,
        });
        state.new_game();
        assert_eq!(state.players[0].score, 0);
        assert_eq!(state.players[0].miss_streak, 0);
        assert!(state.players[1].history.is_empty());
        assert_eq!(state.players[0].name, "Player 1");
        assert_eq!(state.players[1].id, 2);
    }

    #[test]
    fn test_same_seed_same_initial_state() {
        let a = GameState::new(99);
        let b = GameState::new(99);
        for (pa, pb) in a.field.pins().iter().zip(b.field.pins()) {
            assert_eq!(pa.number, pb.number);
            assert_eq!(pa.pos, pb.pos);
        }
    }
}
