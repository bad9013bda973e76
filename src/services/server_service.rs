// src/services/server_service.rs
use crate::domain::{validate_hostname, Server};
use crate::error::{AppError, AppResult};
use crate::events::{EventBus, ServerForgotten, ServerSelected};
use crate::repositories::ServerRepository;
use std::sync::Arc;

pub struct ServerService {
    server_repo: Arc<dyn ServerRepository>,
    event_bus: Arc<EventBus>,
}

impl ServerService {
    pub fn new(server_repo: Arc<dyn ServerRepository>, event_bus: Arc<EventBus>) -> Self {
        Self {
            server_repo,
            event_bus,
        }
    }

    /// Remember a resolved address as the current server.
    ///
    /// Known hostnames are reused and only their `last_used_at` moves.
    pub fn remember_server(&self, hostname: &str) -> AppResult<Server> {
        validate_hostname(hostname).map_err(AppError::Domain)?;

        let mut server = match self.server_repo.get_by_hostname(hostname)? {
            Some(existing) => existing,
            None => Server::new(hostname.to_string()),
        };
        server.touch();

        let stored = self.server_repo.save(&server)?;
        log::info!("Selected server {} (id {})", stored.hostname, stored.id);

        self.event_bus
            .emit(ServerSelected::new(stored.id, stored.hostname.clone()));

        Ok(stored)
    }

    pub fn get_server(&self, id: i64) -> AppResult<Option<Server>> {
        self.server_repo.get_by_id(id)
    }

    pub fn list_recent_servers(&self, limit: Option<usize>) -> AppResult<Vec<Server>> {
        self.server_repo.list_recent(limit)
    }

    /// The most recently used server, if any
    pub fn last_used_server(&self) -> AppResult<Option<Server>> {
        Ok(self.server_repo.list_recent(Some(1))?.into_iter().next())
    }

    pub fn forget_server(&self, id: i64) -> AppResult<()> {
        if !self.server_repo.delete(id)? {
            return Err(AppError::NotFound);
        }

        log::info!("Forgot server {}", id);
        self.event_bus.emit(ServerForgotten::new(id));
        Ok(())
    }
}
