//! Application state for the scheduling API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use crate::engine::SchedulingEngine;

/// Shared application state.
///
/// Every request goes through one engine behind a mutex, so the roster's
/// write paths (reviews and training completion) never interleave.
#[derive(Clone)]
pub struct AppState {
    engine: Arc<Mutex<SchedulingEngine>>,
}

impl AppState {
    /// Creates a new application state around an engine.
    pub fn new(engine: SchedulingEngine) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
        }
    }

    /// Waits for exclusive access to the engine.
    pub async fn engine(&self) -> MutexGuard<'_, SchedulingEngine> {
        self.engine.lock().await
    }
}
