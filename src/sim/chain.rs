//! Probabilistic chain reactions and the deferred-task queue
//!
//! A falling pin can take neighbors with it. Each standing pin inside the
//! impact radius is knocked with fixed probability after a randomized
//! delay, so cascades stagger visibly instead of landing on one tick.
//! Scheduled knocks re-enter the same knock path, so chains propagate
//! transitively; already-knocked pins are skipped, which bounds every
//! cascade at the 12 pins that exist.
//!
//! Between-turn re-stand impulses ride the same queue, which keeps the
//! tick loop the only place deferred work executes and makes the whole
//! mechanism testable with a scripted clock.

use rand::Rng;
use rand_pcg::Pcg32;

use super::field::PinField;
use super::state::GameEvent;
use crate::consts::*;

/// Work item executed on a future tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// Cascade knock on the numbered pin
    Knock(u8),
    /// Re-stand impulse for the numbered pin
    Stand(u8),
}

#[derive(Debug, Clone, Copy)]
struct Scheduled {
    due: u64,
    task: Task,
}

/// Time-ordered queue of deferred tasks, drained once per tick
#[derive(Debug, Clone, Default)]
pub struct TaskQueue {
    // Kept sorted by due tick; ties preserve insertion order
    tasks: Vec<Scheduled>,
}

impl TaskQueue {
    pub fn schedule(&mut self, due: u64, task: Task) {
        let at = self.tasks.partition_point(|s| s.due <= due);
        self.tasks.insert(at, Scheduled { due, task });
    }

    /// Remove and return every task due at or before `now`, in due order
    pub fn drain_due(&mut self, now: u64) -> Vec<Task> {
        let split = self.tasks.partition_point(|s| s.due <= now);
        self.tasks.drain(..split).map(|s| s.task).collect()
    }

    /// Drop everything; used by resets so stale tasks never fire
    pub fn cancel_all(&mut self) {
        self.tasks.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }
}

/// Roll cascade knocks for every standing neighbor of a freshly knocked
/// source pin and schedule the ones that fire.
pub(crate) fn propagate(
    field: &PinField,
    source: u8,
    rng: &mut Pcg32,
    queue: &mut TaskQueue,
    now: u64,
    events: &mut Vec<GameEvent>,
) {
    let Some(source_pin) = field.pin(source) else {
        return;
    };
    let source_pos = source_pin.pos;

    for pin in field.pins() {
        if pin.number == source || pin.knocked {
            continue;
        }
        if pin.pos.distance(source_pos) >= IMPACT_RADIUS {
            continue;
        }
        if !rng.random_bool(CHAIN_PROBABILITY) {
            continue;
        }
        let delay = rng.random_range(CHAIN_DELAY_MIN_TICKS..=CHAIN_DELAY_MAX_TICKS);
        queue.schedule(now + delay, Task::Knock(pin.number));
        events.push(GameEvent::ChainTriggered {
            source,
            target: pin.number,
        });
        log::debug!(
            "chain: pin {} will take pin {} down in {} ticks",
            source,
            pin.number,
            delay
        );
    }
}
