// src/repositories/server_repository.rs
//
// Remembered server persistence

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, OptionalExtension, Row};
use std::sync::Arc;

use crate::db::ConnectionPool;
use crate::domain::Server;
use crate::error::AppResult;

#[cfg_attr(test, mockall::automock)]
pub trait ServerRepository: Send + Sync {
    /// Insert the server, or refresh `last_used_at` if the hostname is
    /// already known. Returns the stored row.
    fn save(&self, server: &Server) -> AppResult<Server>;
    fn get_by_id(&self, id: i64) -> AppResult<Option<Server>>;
    fn get_by_hostname(&self, hostname: &str) -> AppResult<Option<Server>>;
    /// Most recently used first
    fn list_recent(&self, limit: Option<usize>) -> AppResult<Vec<Server>>;
    /// Returns whether a row was deleted
    fn delete(&self, id: i64) -> AppResult<bool>;
}

pub struct SqliteServerRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteServerRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_server(row: &Row) -> Result<Server, rusqlite::Error> {
        let last_used_raw: String = row.get("last_used_at")?;
        let last_used_at = DateTime::parse_from_rfc3339(&last_used_raw)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?
            .with_timezone(&Utc);

        Ok(Server {
            id: row.get("id")?,
            hostname: row.get("hostname")?,
            last_used_at,
        })
    }

    fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
        timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
    }
}

impl ServerRepository for SqliteServerRepository {
    fn save(&self, server: &Server) -> AppResult<Server> {
        let conn = self.pool.get()?;

        conn.execute(
            "INSERT INTO servers (hostname, last_used_at) VALUES (?1, ?2)
             ON CONFLICT(hostname) DO UPDATE SET last_used_at = excluded.last_used_at",
            params![server.hostname, Self::format_timestamp(&server.last_used_at)],
        )?;

        let stored = conn.query_row(
            "SELECT id, hostname, last_used_at FROM servers WHERE hostname = ?1",
            params![server.hostname],
            Self::row_to_server,
        )?;
        Ok(stored)
    }

    fn get_by_id(&self, id: i64) -> AppResult<Option<Server>> {
        let conn = self.pool.get()?;

        let server = conn
            .query_row(
                "SELECT id, hostname, last_used_at FROM servers WHERE id = ?1",
                params![id],
                Self::row_to_server,
            )
            .optional()?;
        Ok(server)
    }

    fn get_by_hostname(&self, hostname: &str) -> AppResult<Option<Server>> {
        let conn = self.pool.get()?;

        let server = conn
            .query_row(
                "SELECT id, hostname, last_used_at FROM servers WHERE hostname = ?1",
                params![hostname],
                Self::row_to_server,
            )
            .optional()?;
        Ok(server)
    }

    fn list_recent(&self, limit: Option<usize>) -> AppResult<Vec<Server>> {
        let conn = self.pool.get()?;

        // SQLite treats a negative LIMIT as "no limit"
        let limit = limit.map_or(-1, |l| l as i64);
        let mut stmt = conn.prepare(
            "SELECT id, hostname, last_used_at FROM servers
             ORDER BY last_used_at DESC, id DESC LIMIT ?1",
        )?;

        let servers = stmt
            .query_map(params![limit], Self::row_to_server)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(servers)
    }

    fn delete(&self, id: i64) -> AppResult<bool> {
        let conn = self.pool.get()?;
        let affected = conn.execute("DELETE FROM servers WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }
}
