use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use poise::serenity_prelude as serenity;
use tokio::task::AbortHandle;

/// Identifies one user's ban in one guild.
pub type BanKey = (serenity::GuildId, serenity::UserId);

#[derive(Debug)]
struct PendingExpiry {
    generation: u64,
    handle: AbortHandle,
}

#[derive(Debug, Default)]
struct TimerState {
    next_generation: u64,
    pending: HashMap<BanKey, PendingExpiry>,
}

/// At most one pending expiry per ban. Scheduling again replaces the older
/// timer, and a timer only runs its action while it is still the current one.
#[derive(Clone, Debug, Default)]
pub struct ExpiryTimers {
    state: Arc<Mutex<TimerState>>,
}

impl ExpiryTimers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `action` once `after` has elapsed, superseding any pending timer for `key`.
    pub fn schedule<F, Fut>(&self, key: BanKey, after: Duration, action: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let mut state = self.lock();
        let generation = state.next_generation;
        state.next_generation += 1;

        let timers = self.clone();
        // The lock is held until the entry is inserted, so the task can't
        // observe the map before its own generation is recorded.
        let task = tokio::spawn(async move {
            tokio::time::sleep(after).await;
            if timers.take_if_current(key, generation) {
                action().await;
            }
        });

        let replaced = state.pending.insert(
            key,
            PendingExpiry {
                generation,
                handle: task.abort_handle(),
            },
        );
        if let Some(old) = replaced {
            old.handle.abort();
        }
    }

    /// Drop the pending timer for `key`. Returns whether one existed.
    pub fn cancel(&self, key: BanKey) -> bool {
        match self.lock().pending.remove(&key) {
            Some(pending) => {
                pending.handle.abort();
                true
            }
            None => false,
        }
    }

    pub fn is_pending(&self, key: BanKey) -> bool {
        self.lock().pending.contains_key(&key)
    }

    pub fn pending_count(&self) -> usize {
        self.lock().pending.len()
    }

    fn take_if_current(&self, key: BanKey, generation: u64) -> bool {
        let mut state = self.lock();
        match state.pending.get(&key) {
            Some(pending) if pending.generation == generation => {
                state.pending.remove(&key);
                true
            }
            _ => false,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, TimerState> {
        // Nothing panics while holding the lock, but a poisoned map is still usable.
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
