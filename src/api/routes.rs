//! API Routes
//!
//! HTTP endpoint definitions. Each handler is a thin translation: decode the
//! request, call one `LedgerService` operation, map the result to a status.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{OperationContext, Tournament, User};
use crate::error::AppError;
use crate::service::LedgerService;

/// Shared service handle used as router state.
pub type ServiceHandle = Arc<dyn LedgerService>;

// =========================================================================
// Request/Response types
// =========================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateTournamentRequest {
    pub name: String,
    pub deposit: Decimal,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PointsRequest {
    pub points: Decimal,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TournamentUserRequest {
    pub user_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub id: Uuid,
}

// =========================================================================
// API Router
// =========================================================================

/// Create the API router
pub fn create_router() -> Router<ServiceHandle> {
    Router::new()
        // User endpoints
        .route("/user", post(create_user))
        .route("/user/:id", get(get_user))
        .route("/user/:id", delete(remove_user))
        .route("/user/:id/take", post(take_user_points))
        .route("/user/:id/fund", post(fund_user_points))
        // Tournament endpoints
        .route("/tournament", post(create_tournament))
        .route("/tournament/:id", get(get_tournament))
        .route("/tournament/:id", delete(remove_tournament))
        .route("/tournament/:id/join", post(join_tournament))
        .route("/tournament/:id/winner", post(set_tournament_winner))
        .route("/tournament/:id/finish", post(finish_tournament))
}

// =========================================================================
// POST /user
// =========================================================================

async fn create_user(
    State(service): State<ServiceHandle>,
    Extension(context): Extension<OperationContext>,
    Json(request): Json<CreateUserRequest>,
) -> Result<Json<CreatedResponse>, AppError> {
    let id = service.add_user(&context, request.name).await?;
    Ok(Json(CreatedResponse { id }))
}

// =========================================================================
// GET /user/:id
// =========================================================================

async fn get_user(
    State(service): State<ServiceHandle>,
    Extension(context): Extension<OperationContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<User>, AppError> {
    let user = service.get_user(&context, id).await?;
    Ok(Json(user))
}

// =========================================================================
// DELETE /user/:id
// =========================================================================

async fn remove_user(
    State(service): State<ServiceHandle>,
    Extension(context): Extension<OperationContext>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    service.delete_user(&context, id).await?;
    Ok(StatusCode::OK)
}

// =========================================================================
// POST /user/:id/take
// =========================================================================

async fn take_user_points(
    State(service): State<ServiceHandle>,
    Extension(context): Extension<OperationContext>,
    Path(id): Path<Uuid>,
    Json(request): Json<PointsRequest>,
) -> Result<StatusCode, AppError> {
    service
        .take_user_balance(&context, id, request.points)
        .await?;
    Ok(StatusCode::OK)
}

// =========================================================================
// POST /user/:id/fund
// =========================================================================

async fn fund_user_points(
    State(service): State<ServiceHandle>,
    Extension(context): Extension<OperationContext>,
    Path(id): Path<Uuid>,
    Json(request): Json<PointsRequest>,
) -> Result<StatusCode, AppError> {
    service
        .fund_user_balance(&context, id, request.points)
        .await?;
    Ok(StatusCode::OK)
}

// =========================================================================
// POST /tournament
// =========================================================================

async fn create_tournament(
    State(service): State<ServiceHandle>,
    Extension(context): Extension<OperationContext>,
    Json(request): Json<CreateTournamentRequest>,
) -> Result<Json<CreatedResponse>, AppError> {
    let id = service
        .add_tournament(&context, request.name, request.deposit)
        .await?;
    Ok(Json(CreatedResponse { id }))
}

// =========================================================================
// GET /tournament/:id
// =========================================================================

async fn get_tournament(
    State(service): State<ServiceHandle>,
    Extension(context): Extension<OperationContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<Tournament>, AppError> {
    let tournament = service.get_tournament(&context, id).await?;
    Ok(Json(tournament))
}

// =========================================================================
// DELETE /tournament/:id
// =========================================================================

async fn remove_tournament(
    State(service): State<ServiceHandle>,
    Extension(context): Extension<OperationContext>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    service.delete_tournament(&context, id).await?;
    Ok(StatusCode::OK)
}

// =========================================================================
// POST /tournament/:id/join
// =========================================================================

async fn join_tournament(
    State(service): State<ServiceHandle>,
    Extension(context): Extension<OperationContext>,
    Path(id): Path<Uuid>,
    Json(request): Json<TournamentUserRequest>,
) -> Result<StatusCode, AppError> {
    service
        .add_user_to_tournament(&context, id, request.user_id)
        .await?;
    Ok(StatusCode::OK)
}

// =========================================================================
// POST /tournament/:id/winner
// =========================================================================

async fn set_tournament_winner(
    State(service): State<ServiceHandle>,
    Extension(context): Extension<OperationContext>,
    Path(id): Path<Uuid>,
    Json(request): Json<TournamentUserRequest>,
) -> Result<StatusCode, AppError> {
    service
        .set_tournament_winner(&context, id, request.user_id)
        .await?;
    Ok(StatusCode::OK)
}

// =========================================================================
// POST /tournament/:id/finish
// =========================================================================

async fn finish_tournament(
    State(service): State<ServiceHandle>,
    Extension(context): Extension<OperationContext>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    service.calculate_tournament_prize(&context, id).await?;
    Ok(StatusCode::OK)
}
