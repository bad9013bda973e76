// src/application/state.rs

use std::sync::{Arc, Mutex, PoisonError};

use crate::config::AppConfig;
use crate::db::ConnectionPool;
use crate::domain::ResolutionOutcome;
use crate::events::EventBus;
use crate::services::{ConnectionService, ServerService};

/// Application state shared by every command.
/// Services are initialized in main.rs and passed here.
pub struct AppState {
    pub config: AppConfig,
    pub pool: Arc<ConnectionPool>,
    pub event_bus: Arc<EventBus>,
    pub connection_service: Arc<ConnectionService>,
    pub server_service: Arc<ServerService>,

    /// What the connect screen currently shows
    check_url_state: Mutex<ResolutionOutcome>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        pool: Arc<ConnectionPool>,
        event_bus: Arc<EventBus>,
        connection_service: Arc<ConnectionService>,
        server_service: Arc<ServerService>,
    ) -> Self {
        Self {
            config,
            pool,
            event_bus,
            connection_service,
            server_service,
            check_url_state: Mutex::new(ResolutionOutcome::Unchecked),
        }
    }

    pub fn check_url_state(&self) -> ResolutionOutcome {
        self.check_url_state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_check_url_state(&self, outcome: ResolutionOutcome) {
        *self
            .check_url_state
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = outcome;
    }

    /// Back to `Unchecked`, e.g. when the entered address changes
    pub fn reset_check_url_state(&self) {
        self.set_check_url_state(ResolutionOutcome::Unchecked);
    }

    /// Mark a check as running. The state falls back to `Unchecked` if the
    /// returned guard is dropped before `finish`.
    pub fn begin_check(&self) -> PendingCheck<'_> {
        self.set_check_url_state(ResolutionOutcome::Pending);
        PendingCheck {
            state: self,
            finished: false,
        }
    }
}

/// A running address check, see [`AppState::begin_check`]
pub struct PendingCheck<'a> {
    state: &'a AppState,
    finished: bool,
}

impl PendingCheck<'_> {
    pub fn finish(mut self, outcome: ResolutionOutcome) {
        self.state.set_check_url_state(outcome);
        self.finished = true;
    }
}

impl Drop for PendingCheck<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.state.reset_check_url_state();
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::application::commands::test_support::{app_state, Collaborators};
    use crate::domain::ResolutionOutcome;

    #[test]
    fn test_finished_check_keeps_outcome() {
        let (state, _dir) = app_state(Collaborators::default());

        let check = state.begin_check();
        assert_eq!(state.check_url_state(), ResolutionOutcome::Pending);
        check.finish(ResolutionOutcome::Error(None));

        assert_eq!(state.check_url_state(), ResolutionOutcome::Error(None));
    }

    #[test]
    fn test_abandoned_check_returns_to_unchecked() {
        let (state, _dir) = app_state(Collaborators::default());

        let check = state.begin_check();
        drop(check);

        assert_eq!(state.check_url_state(), ResolutionOutcome::Unchecked);
    }
}
