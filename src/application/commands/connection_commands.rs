// src/application/commands/connection_commands.rs
//
// Connection Command Handlers
//
// RULES:
// - Accept plain input
// - Call services
// - Return DTOs
// - Never contain business logic

use futures::StreamExt;

use crate::application::error_handling::{ErrorResponse, ToErrorResponse};
use crate::application::{dto::*, state::AppState};

/// Resolve an entered address and remember the winning server.
///
/// The shared check state moves Pending → Success/Error. It only reaches
/// Success once the server is remembered, and drops back to Unchecked if
/// the check fails or is cancelled midway.
pub async fn check_server_url(
    state: &AppState,
    input: String,
) -> Result<CheckServerUrlDto, ErrorResponse> {
    let check = state.begin_check();

    let outcome = state.connection_service.resolve(&input).await;

    let server = match outcome.address() {
        Some(address) => Some(
            state
                .server_service
                .remember_server(address)
                .to_error_response()?,
        ),
        None => None,
    };

    check.finish(outcome.clone());

    Ok(CheckServerUrlDto {
        outcome: outcome.into(),
        server: server.map(ServerDto::from),
    })
}

/// Current state of the connect screen
pub async fn get_check_url_state(state: &AppState) -> Result<ResolutionOutcomeDto, ErrorResponse> {
    Ok(state.check_url_state().into())
}

/// Discover servers on the local network.
///
/// `on_found` sees every server as soon as it answers.
pub async fn discover_servers<F>(
    state: &AppState,
    limit: Option<usize>,
    mut on_found: F,
) -> Result<Vec<DiscoveredServerDto>, ErrorResponse>
where
    F: FnMut(&DiscoveredServerDto),
{
    let mut stream = match limit {
        Some(limit) => state.connection_service.discover_local_servers_up_to(limit).boxed(),
        None => state.connection_service.discover_local_servers().boxed(),
    };

    let mut found = Vec::new();
    while let Some(info) = stream.next().await {
        let dto = DiscoveredServerDto::from(info);
        on_found(&dto);
        found.push(dto);
    }

    Ok(found)
}
