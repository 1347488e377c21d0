//! HTTP surface over the engine.
//!
//! Thin glue: every invariant lives in the session/store/ledger layers, the
//! handlers only translate between JSON and engine calls.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::directory::RoomDirectory;
use crate::error::EngineError;
use crate::ledger::StatsLedger;
use crate::player::PlayerProfile;
use crate::session::{Session, SessionStatus};
use crate::store::{MatchupRecord, PlayerStats, RoomStore, StatsStore, StoreError};

/// Shared state behind the router.
#[derive(Debug, Clone)]
pub struct AppState {
    store: RoomStore,
    directory: RoomDirectory,
    ledger: StatsLedger,
}

impl AppState {
    /// Builds fresh stores for the given board size.
    #[instrument]
    pub fn new(board_size: usize) -> Self {
        info!(board_size, "Creating app state");
        let store = RoomStore::new();
        Self {
            directory: RoomDirectory::new(store.clone(), board_size),
            ledger: StatsLedger::new(StatsStore::new()),
            store,
        }
    }

    /// The room store, for clients attaching in-process.
    pub fn store(&self) -> &RoomStore {
        &self.store
    }

    /// The stats ledger.
    pub fn ledger(&self) -> &StatsLedger {
        &self.ledger
    }
}

/// Request to create a room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRoomRequest {
    /// The hosting player.
    pub host: PlayerProfile,
}

/// Request to join a room as guest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinRoomRequest {
    /// The joining player.
    pub player: PlayerProfile,
}

/// Join result: either committed as guest, or the slot was already taken
/// and the caller should spectate the returned session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinRoomResponse {
    /// Whether this player was committed as the guest.
    pub joined: bool,
    /// The session after the attempt.
    pub session: Session,
}

/// Request to place a stone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveRequest {
    /// Acting player uid.
    pub uid: String,
    /// Board index.
    pub index: usize,
}

/// Request to restart a finished game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestartRequest {
    /// Acting player uid.
    pub uid: String,
}

/// Identity parameters passed in the query string.
#[derive(Debug, Clone, Deserialize)]
pub struct UidQuery {
    /// Requesting player uid.
    pub uid: String,
}

impl IntoResponse for EngineError {
    fn into_response(self) -> Response {
        let status = match &self {
            EngineError::SessionNotFound { .. }
            | EngineError::Store(StoreError::Missing { .. }) => StatusCode::NOT_FOUND,
            EngineError::NotHost | EngineError::SelfJoin => StatusCode::FORBIDDEN,
            EngineError::RoomCodeExhausted => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::CONFLICT,
        };
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

/// Builds the router over the given state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/rooms", post(create_room).get(list_rooms))
        .route("/rooms/{id}", get(get_room).delete(delete_room))
        .route("/rooms/{id}/join", post(join_room))
        .route("/rooms/{id}/moves", post(submit_move))
        .route("/rooms/{id}/restart", post(restart))
        .route("/players/{uid}/stats", get(player_stats))
        .route("/matchups/{a}/{b}", get(matchup))
        .with_state(state)
}

#[instrument(skip(state, req), fields(host_uid = %req.host.uid()))]
async fn create_room(
    State(state): State<AppState>,
    Json(req): Json<CreateRoomRequest>,
) -> Result<(StatusCode, Json<Session>), EngineError> {
    let session = state.directory.create_room(req.host)?;
    Ok((StatusCode::CREATED, Json(session)))
}

#[instrument(skip(state))]
async fn list_rooms(
    State(state): State<AppState>,
    Query(query): Query<UidQuery>,
) -> Json<Vec<Session>> {
    Json(state.directory.list_waiting(&query.uid))
}

#[instrument(skip(state))]
async fn get_room(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Session>, EngineError> {
    let session = state
        .store
        .get(&id)
        .map_err(|_| EngineError::SessionNotFound { code: id })?;
    Ok(Json(session))
}

#[instrument(skip(state, req), fields(joiner = %req.player.uid()))]
async fn join_room(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<JoinRoomRequest>,
) -> Result<Json<JoinRoomResponse>, EngineError> {
    let player = req.player;
    match state.store.update(&id, |s| s.attach_guest(player.clone())) {
        Ok(session) => Ok(Json(JoinRoomResponse {
            joined: true,
            session,
        })),
        // Race lost: hand back the live session for spectating.
        Err(EngineError::GuestSlotTaken) => {
            let session = state
                .store
                .get(&id)
                .map_err(|_| EngineError::SessionNotFound { code: id })?;
            Ok(Json(JoinRoomResponse {
                joined: false,
                session,
            }))
        }
        Err(other) => Err(other),
    }
}

#[instrument(skip(state, req), fields(uid = %req.uid, index = req.index))]
async fn submit_move(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<MoveRequest>,
) -> Result<Json<Session>, EngineError> {
    let session = state
        .store
        .update(&id, |s| s.submit_move(&req.uid, req.index))?;

    if *session.status() == SessionStatus::Finished {
        state.ledger.record_outcome(&session)?;
    }

    Ok(Json(session))
}

#[instrument(skip(state, req), fields(uid = %req.uid))]
async fn restart(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<RestartRequest>,
) -> Result<Json<Session>, EngineError> {
    let session = state.store.update(&id, |s| s.restart(&req.uid))?;
    Ok(Json(session))
}

#[instrument(skip(state))]
async fn delete_room(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<UidQuery>,
) -> Result<StatusCode, EngineError> {
    let session = state
        .store
        .get(&id)
        .map_err(|_| EngineError::SessionNotFound { code: id.clone() })?;
    if session.host().uid() != &query.uid {
        return Err(EngineError::NotHost);
    }
    state
        .store
        .remove(&id)
        .map_err(|_| EngineError::SessionNotFound { code: id })?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
async fn player_stats(
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> Json<PlayerStats> {
    Json(state.ledger.player_stats(&uid).unwrap_or_default())
}

#[instrument(skip(state))]
async fn matchup(
    State(state): State<AppState>,
    Path((a, b)): Path<(String, String)>,
) -> Json<MatchupRecord> {
    Json(state.ledger.matchup(&a, &b).unwrap_or_default())
}
