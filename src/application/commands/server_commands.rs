// src/application/commands/server_commands.rs
//
// Remembered Server Command Handlers

use crate::application::error_handling::{ErrorResponse, ToErrorResponse};
use crate::application::{dto::*, state::AppState};
use crate::db::{get_connection, get_database_stats};

/// Remembered servers, most recently used first
pub async fn list_servers(
    state: &AppState,
    limit: Option<usize>,
) -> Result<Vec<ServerDto>, ErrorResponse> {
    let servers = state
        .server_service
        .list_recent_servers(limit)
        .to_error_response()?;

    Ok(servers.into_iter().map(ServerDto::from).collect())
}

pub async fn get_server(state: &AppState, server_id: i64) -> Result<Option<ServerDto>, ErrorResponse> {
    let server = state
        .server_service
        .get_server(server_id)
        .to_error_response()?;

    Ok(server.map(ServerDto::from))
}

pub async fn forget_server(state: &AppState, server_id: i64) -> Result<(), ErrorResponse> {
    state
        .server_service
        .forget_server(server_id)
        .to_error_response()
}

pub async fn database_status(state: &AppState) -> Result<DatabaseStatusDto, ErrorResponse> {
    let stats = {
        let conn = get_connection(&state.pool).to_error_response()?;
        get_database_stats(&conn).to_error_response()?
    };

    let last_used = state
        .server_service
        .last_used_server()
        .to_error_response()?;

    Ok(DatabaseStatusDto {
        size_bytes: stats.size_bytes,
        server_count: stats.server_count,
        last_used: last_used.map(ServerDto::from),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::commands::test_support::{app_state, Collaborators};
    use crate::application::error_handling::ErrorType;

    #[tokio::test]
    async fn test_list_and_forget() {
        let (state, _dir) = app_state(Collaborators::default());
        let first = state.server_service.remember_server("https://a.example").unwrap();
        state.server_service.remember_server("http://b.example:8096").unwrap();

        let servers = list_servers(&state, None).await.unwrap();
        assert_eq!(servers.len(), 2);
        assert_eq!(servers[0].hostname, "http://b.example:8096");

        forget_server(&state, first.id).await.unwrap();
        assert!(get_server(&state, first.id).await.unwrap().is_none());
        assert_eq!(list_servers(&state, None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_forget_unknown_is_not_found() {
        let (state, _dir) = app_state(Collaborators::default());

        let error = forget_server(&state, 99).await.unwrap_err();

        assert_eq!(error.error_type, ErrorType::NotFound);
        assert_eq!(error.to_string(), "Resource not found");
    }

    #[tokio::test]
    async fn test_database_status() {
        let (state, _dir) = app_state(Collaborators::default());
        state.server_service.remember_server("https://a.example").unwrap();

        let status = database_status(&state).await.unwrap();

        assert_eq!(status.server_count, 1);
        assert!(status.size_bytes > 0);
        assert_eq!(status.last_used.unwrap().hostname, "https://a.example");
    }
}
