//! Latest-request-wins bookkeeping.
//!
//! Each (account, view) slot holds at most one live request. Starting a new
//! one cancels the previous token, so the superseded handler drops whatever
//! it was about to return instead of landing stale data.

use std::{
    collections::HashMap,
    future::Future,
    sync::{Arc, Mutex},
};

use tokio_util::sync::CancellationToken;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Invoice,
    Statistics,
    StatisticsChart,
    StatisticsExport,
}

type SlotKey = (i64, View);

#[derive(Debug)]
struct Slot {
    generation: u64,
    token: CancellationToken,
}

#[derive(Debug, Default)]
struct Registry {
    next_generation: u64,
    slots: HashMap<SlotKey, Slot>,
}

#[derive(Debug, Clone, Default)]
pub struct InFlight {
    inner: Arc<Mutex<Registry>>,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a request for `(account_id, view)`, cancelling any older one.
    pub fn begin(&self, account_id: i64, view: View) -> Ticket {
        let token = CancellationToken::new();
        let mut registry = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        registry.next_generation += 1;
        let generation = registry.next_generation;

        let previous = registry.slots.insert(
            (account_id, view),
            Slot {
                generation,
                token: token.clone(),
            },
        );
        if let Some(previous) = previous {
            tracing::debug!(account_id, ?view, generation, "superseding in-flight request");
            previous.token.cancel();
        }

        Ticket {
            registry: self.inner.clone(),
            key: (account_id, view),
            generation,
            token,
        }
    }

    /// Run `fut` under a fresh ticket; a newer request for the same slot turns
    /// this one into [`AppError::Superseded`].
    pub async fn run_latest<T, F>(&self, account_id: i64, view: View, fut: F) -> AppResult<T>
    where
        F: Future<Output = AppResult<T>>,
    {
        self.begin(account_id, view).run(fut).await
    }

    pub fn in_flight(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .slots
            .len()
    }
}

/// Handle for one registered request. Dropping it frees the slot unless a
/// newer request already owns it.
#[derive(Debug)]
pub struct Ticket {
    registry: Arc<Mutex<Registry>>,
    key: SlotKey,
    generation: u64,
    token: CancellationToken,
}

impl Ticket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_superseded(&self) -> bool {
        self.token.is_cancelled()
    }

    pub async fn run<T, F>(self, fut: F) -> AppResult<T>
    where
        F: Future<Output = AppResult<T>>,
    {
        let result = tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(AppError::Superseded),
            result = fut => result,
        };
        // A result that raced with cancellation is still stale.
        if self.is_superseded() {
            return Err(AppError::Superseded);
        }
        result
    }
}

impl Drop for Ticket {
    fn drop(&mut self) {
        let mut registry = self.registry.lock().unwrap_or_else(|e| e.into_inner());
        if registry
            .slots
            .get(&self.key)
            .is_some_and(|slot| slot.generation == self.generation)
        {
            registry.slots.remove(&self.key);
        }
    }
}
