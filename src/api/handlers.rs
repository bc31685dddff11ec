//! HTTP request handlers for the todo API

use axum::{
    extract::State,
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Json},
};
use serde::Serialize;
use tracing::{debug, warn};

use super::extract::{ApiPath, ApiQuery, JsonRequest};
use super::response::ApiResponse;
use crate::core::error::Result;
use crate::core::AppState;
use crate::storage::{DocumentStore, StorageImpl};
use crate::system::health::{format_uptime, ServiceStatus};
use crate::types::{DeleteOutcome, NewTodo, Todo, TodoId, TodoPatch, TodoQuery, UpdateOutcome};

/// System health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Current system status
    pub status: ServiceStatus,
    /// System uptime duration
    pub uptime: String,
    /// Service version
    pub version: String,
    /// Whether the document store answered a ping
    pub store_reachable: bool,
}

/// System information response
#[derive(Debug, Serialize)]
pub struct InfoResponse {
    /// Service name
    pub name: String,
    /// Service version
    pub version: String,
    /// Supported operations
    pub capabilities: Vec<String>,
    /// `database.collection` holding the todos
    pub namespace: String,
    /// Store connection target
    pub store: String,
    /// Id allocation mode
    pub id_allocation: String,
}

/// Create a todo
pub async fn create_todo<S: StorageImpl>(
    State(state): State<AppState<S>>,
    JsonRequest(new): JsonRequest<NewTodo>,
) -> Result<(StatusCode, Json<ApiResponse<Todo>>)> {
    let todo = state.service.create_todo(new).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(todo))))
}

/// List todos, filtered when query parameters are present
pub async fn list_todos<S: StorageImpl>(
    State(state): State<AppState<S>>,
    ApiQuery(query): ApiQuery<TodoQuery>,
) -> Result<Json<ApiResponse<Vec<Todo>>>> {
    let todos = if query.is_empty() {
        state.service.list_todos().await?
    } else {
        state.service.find_todos(query).await?
    };
    Ok(Json(ApiResponse::success(todos)))
}

/// Get a todo by id
pub async fn get_todo<S: StorageImpl>(
    State(state): State<AppState<S>>,
    ApiPath(id): ApiPath<TodoId>,
) -> Result<Json<ApiResponse<Todo>>> {
    let todo = state.service.get_todo(id).await?;
    Ok(Json(ApiResponse::success(todo)))
}

/// Partially update a todo by id
pub async fn update_todo<S: StorageImpl>(
    State(state): State<AppState<S>>,
    ApiPath(id): ApiPath<TodoId>,
    JsonRequest(patch): JsonRequest<TodoPatch>,
) -> Result<Json<ApiResponse<UpdateOutcome>>> {
    let outcome = state.service.update_todo(id, patch).await?;
    Ok(Json(ApiResponse::success(outcome)))
}

/// Delete a todo by id
pub async fn delete_todo<S: StorageImpl>(
    State(state): State<AppState<S>>,
    ApiPath(id): ApiPath<TodoId>,
) -> Result<Json<ApiResponse<DeleteOutcome>>> {
    let outcome = state.service.delete_todo(id).await?;
    Ok(Json(ApiResponse::success(outcome)))
}

/// Delete every todo, or those matching the query parameters
pub async fn delete_todos<S: StorageImpl>(
    State(state): State<AppState<S>>,
    ApiQuery(query): ApiQuery<TodoQuery>,
) -> Result<Json<ApiResponse<DeleteOutcome>>> {
    let outcome = state.service.delete_todos(query).await?;
    Ok(Json(ApiResponse::success(outcome)))
}

/// Health check endpoint
pub async fn health_check<S: StorageImpl>(State(state): State<AppState<S>>) -> Json<ApiResponse<HealthResponse>> {
    let store_reachable = match state.service.collection().store().ping().await {
        Ok(()) => true,
        Err(e) => {
            warn!("Store ping failed: {}", e);
            false
        }
    };

    let status = if store_reachable {
        ServiceStatus::Healthy
    } else {
        ServiceStatus::Degraded
    };

    Json(ApiResponse::success(HealthResponse {
        status,
        uptime: format_uptime(state.uptime()),
        version: crate::VERSION.to_string(),
        store_reachable,
    }))
}

/// System information endpoint
pub async fn system_info<S: StorageImpl>(State(state): State<AppState<S>>) -> Json<ApiResponse<InfoResponse>> {
    let todos = state.service.collection();
    let capabilities = ["create", "list", "get", "find", "update", "delete", "delete_all"]
        .iter()
        .map(|c| c.to_string())
        .collect();

    Json(ApiResponse::success(InfoResponse {
        name: crate::NAME.to_string(),
        version: crate::VERSION.to_string(),
        capabilities,
        namespace: todos.namespace().to_string(),
        store: state.config.store.target(),
        id_allocation: todos.allocation().to_string(),
    }))
}

/// Prometheus metrics in text exposition format
pub async fn metrics<S: StorageImpl>(State(state): State<AppState<S>>) -> Result<impl IntoResponse> {
    let body = state.metrics.encode()?;
    debug!("Metrics scraped: {} bytes", body.len());
    Ok(([(CONTENT_TYPE, "text/plain; version=0.0.4")], body))
}
