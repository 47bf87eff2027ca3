//! Deterministic game simulation
//!
//! All referee logic lives here. The module is pure and deterministic:
//! - Fixed tick step only
//! - Seeded RNG only; a fixed seed replays the same game
//! - No rendering or platform dependencies
//!
//! Commands are methods on [`GameState`] and run between ticks; [`tick`]
//! advances kinetic state one step at a time.

pub mod chain;
pub mod field;
pub mod kinematics;
pub mod scoring;
pub mod state;
pub mod throw;
pub mod tick;

pub use chain::{Task, TaskQueue};
pub use field::PinField;
pub use kinematics::{BodyMut, Bounds};
pub use scoring::points_for;
pub use state::{GameEvent, GamePhase, GameState, HistoryEntry, Pin, Player};
pub use throw::Throw;
pub use tick::tick;
