mod health;

pub use health::{health, info};

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use serde_json::Value;
use uuid::Uuid;

use super::error::ApiError;
use crate::db::Database;
use crate::models::*;
use crate::validation;

/// A path segment that is not a UUID cannot name a stored experiment.
fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound)
}

// ============================================================
// Experiments
// ============================================================

pub async fn create_experiment(
    State(db): State<Database>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<Experiment>>), ApiError> {
    let Json(raw) = payload?;
    let input = validation::validate_create(&raw).map_err(ApiError::Validation)?;
    let experiment = db.create_experiment(input)?;

    tracing::info!("Experiment {} created", experiment.id);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "Experiment created successfully",
            experiment,
        )),
    ))
}

pub async fn list_experiments(
    State(db): State<Database>,
    query: Result<Query<ListExperimentsQuery>, QueryRejection>,
) -> Result<Json<ListResponse<Experiment>>, ApiError> {
    let Query(query) = query?;
    let query = validation::validate_list_query(&query).map_err(ApiError::Validation)?;
    let page = db.list_experiments(&query)?;

    Ok(Json(ListResponse {
        success: true,
        data: page.items,
        pagination: Pagination::new(page.total, query.page),
    }))
}

pub async fn get_experiment(
    State(db): State<Database>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Experiment>>, ApiError> {
    let id = parse_id(&id)?;
    db.get_experiment(id)?
        .map(|e| Json(ApiResponse::data(e)))
        .ok_or(ApiError::NotFound)
}

pub async fn update_experiment(
    State(db): State<Database>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ApiResponse<Experiment>>, ApiError> {
    let id = parse_id(&id)?;
    let Json(raw) = payload?;
    let input = validation::validate_update(&raw).map_err(ApiError::Validation)?;

    let mut experiment = db.get_experiment(id)?.ok_or(ApiError::NotFound)?;
    input
        .apply_to(&mut experiment)
        .map_err(ApiError::Validation)?;

    let updated = db.save_experiment(experiment)?.ok_or(ApiError::NotFound)?;

    tracing::info!("Experiment {} updated", updated.id);
    Ok(Json(ApiResponse::with_message(
        "Experiment updated successfully",
        updated,
    )))
}

pub async fn delete_experiment(
    State(db): State<Database>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let id = parse_id(&id)?;
    if db.delete_experiment(id)? {
        tracing::info!("Experiment {} deleted", id);
        Ok(Json(ApiResponse::<()>::message(
            "Experiment deleted successfully",
        )))
    } else {
        Err(ApiError::NotFound)
    }
}

pub async fn experiment_stats(
    State(db): State<Database>,
) -> Result<Json<ApiResponse<ExperimentStats>>, ApiError> {
    let stats = db.experiment_stats()?;
    Ok(Json(ApiResponse::data(stats)))
}

// ============================================================
// Fallback
// ============================================================

pub async fn route_not_found() -> ApiError {
    ApiError::RouteNotFound
}
