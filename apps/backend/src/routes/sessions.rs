//! Session HTTP routes under `/api/rooms/{room_id}`.

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use tracing::info;

use crate::domain::{Card, PlayerId, StakeTier};
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::extractors::{CurrentPlayer, RoomIdPath, ValidatedJson};
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct AllocateRequest {
    /// Seat order; the first player leads
    pub players: Vec<PlayerId>,
    pub stake: StakeTier,
}

#[derive(Debug, Deserialize)]
pub struct PlayRequest {
    pub cards: Vec<Card>,
}

/// POST /api/rooms/{room_id}/session
///
/// Deals a new game. The caller must be one of the listed players.
async fn allocate(
    player: CurrentPlayer,
    room: RoomIdPath,
    body: ValidatedJson<AllocateRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let AllocateRequest { players, stake } = body.into_inner();
    if !players.contains(&player.id) {
        return Err(AppError::forbidden(
            ErrorCode::NotSeated,
            "Caller must be seated in the session they allocate",
        ));
    }

    let outcome = app_state.sessions.allocate(room.0, players, stake).await?;
    info!(room_id = %room.0, player_id = %player.id, "Session allocated over HTTP");
    Ok(HttpResponse::Created().json(outcome))
}

/// GET /api/rooms/{room_id}/session
///
/// Public view, plus the caller's hand when they are seated.
async fn get_session(
    player: CurrentPlayer,
    room: RoomIdPath,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let view = app_state.sessions.view_for(room.0, player.id)?;
    Ok(HttpResponse::Ok().json(view))
}

/// POST /api/rooms/{room_id}/play
async fn play(
    player: CurrentPlayer,
    room: RoomIdPath,
    body: ValidatedJson<PlayRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let outcome = app_state
        .sessions
        .submit_play(room.0, player.id, body.into_inner().cards)
        .await?;
    Ok(HttpResponse::Ok().json(outcome))
}

/// POST /api/rooms/{room_id}/pass
async fn pass(
    player: CurrentPlayer,
    room: RoomIdPath,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let outcome = app_state.sessions.submit_pass(room.0, player.id).await?;
    Ok(HttpResponse::Ok().json(outcome))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/{room_id}/session")
            .route(web::post().to(allocate))
            .route(web::get().to(get_session)),
    );
    cfg.service(web::resource("/{room_id}/play").route(web::post().to(play)));
    cfg.service(web::resource("/{room_id}/pass").route(web::post().to(pass)));
}
