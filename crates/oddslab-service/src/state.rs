//! Application state.

use std::sync::Arc;

use oddslab_core::{Clock, SystemClock, TierGate, UsageLedger, UserDirectory};
use oddslab_store::SqliteStore;

use crate::config::ServiceConfig;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The storage backend (user accounts and raw records).
    pub store: Arc<SqliteStore>,

    /// The tier-gating decision core.
    pub gate: Arc<TierGate>,

    /// Calendar time source, shared with the gate.
    pub clock: Arc<dyn Clock>,

    /// Service configuration.
    pub config: ServiceConfig,
}

impl AppState {
    /// Create application state with the system clock.
    #[must_use]
    pub fn new(store: Arc<SqliteStore>, config: ServiceConfig) -> Self {
        Self::with_clock(store, config, Arc::new(SystemClock))
    }

    /// Create application state with an explicit clock (used by tests to
    /// drive day rollover).
    #[must_use]
    pub fn with_clock(
        store: Arc<SqliteStore>,
        config: ServiceConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let gate = TierGate::new(
            config.tier_limits.clone(),
            store.clone() as Arc<dyn UsageLedger>,
            store.clone() as Arc<dyn UserDirectory>,
            clock.clone(),
        );

        Self {
            store,
            gate: Arc::new(gate),
            clock,
            config,
        }
    }
}
