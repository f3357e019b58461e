//! Latest-wins bookkeeping for cancellable effects
//!
//! Every [`EffectId`] owns a generation counter. Starting a cancellable effect
//! bumps the counter and aborts every task registered under an older
//! generation. Actions produced by an effect carry the [`CancelGuard`] it was
//! started with and are only delivered while that guard is still current.

use blogflux_core::EffectId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::task::AbortHandle;

/// Proof that an effect was started under a given generation of its id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancelGuard {
    id: EffectId,
    generation: u64,
}

impl CancelGuard {
    /// The effect id this guard belongs to
    #[must_use]
    pub const fn id(&self) -> EffectId {
        self.id
    }

    /// The generation the effect was started under
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Default)]
struct Slot {
    generation: u64,
    tasks: Vec<AbortHandle>,
}

impl Slot {
    /// Abort every registered task, returning how many were still running
    fn abort_all(&mut self) -> usize {
        let mut aborted = 0;
        for task in self.tasks.drain(..) {
            if !task.is_finished() {
                aborted += 1;
            }
            task.abort();
        }
        aborted
    }
}

/// Registry of generations and running tasks per effect id
///
/// Cheap to clone; clones share the same registry.
#[derive(Debug, Clone, Default)]
pub struct CancellationRegistry {
    slots: Arc<Mutex<HashMap<EffectId, Slot>>>,
}

impl CancellationRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn slots(&self) -> MutexGuard<'_, HashMap<EffectId, Slot>> {
        // The map is only mutated under short critical sections that cannot
        // leave it half-updated, so a poisoned lock is still consistent.
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start a new generation for `id`, aborting everything started before
    pub fn begin(&self, id: EffectId) -> CancelGuard {
        let mut slots = self.slots();
        let slot = slots.entry(id).or_default();

        let aborted = slot.abort_all();
        slot.generation += 1;

        if aborted > 0 {
            tracing::debug!(
                effect_id = %id,
                aborted,
                generation = slot.generation,
                "Superseded running effects"
            );
            metrics::counter!("store.effects.cancelled", "id" => id.name()).increment(aborted as u64);
        }

        CancelGuard {
            id,
            generation: slot.generation,
        }
    }

    /// Cancel everything running under `id` without starting anything new
    ///
    /// Returns how many tasks were still running.
    pub fn cancel(&self, id: EffectId) -> usize {
        let mut slots = self.slots();
        let slot = slots.entry(id).or_default();
        slot.generation += 1;
        slot.abort_all()
    }

    /// Whether `guard` still belongs to the latest generation of its id
    #[must_use]
    pub fn is_current(&self, guard: &CancelGuard) -> bool {
        self.slots()
            .get(&guard.id)
            .is_some_and(|slot| slot.generation == guard.generation)
    }

    /// Current generation of `id` (0 if never started)
    #[must_use]
    pub fn generation(&self, id: EffectId) -> u64 {
        self.slots().get(&id).map_or(0, |slot| slot.generation)
    }

    /// Register a spawned task under `guard`
    ///
    /// A task registered with a stale guard is aborted immediately.
    pub fn attach(&self, guard: &CancelGuard, task: AbortHandle) {
        let mut slots = self.slots();
        match slots.get_mut(&guard.id) {
            Some(slot) if slot.generation == guard.generation => {
                slot.tasks.retain(|t| !t.is_finished());
                slot.tasks.push(task);
            },
            _ => task.abort(),
        }
    }
}
