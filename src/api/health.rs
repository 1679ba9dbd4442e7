//! Health check endpoints

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::MessageResponse;

#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Current status of the service
    pub status: String,
    /// Number of books in the catalog
    pub total_books: usize,
    /// Number of registered members
    pub total_members: usize,
    /// Version of the service
    pub version: String,
}

/// API welcome message
#[utoipa::path(
    get,
    path = "/",
    tag = "health",
    responses(
        (status = 200, description = "Welcome message", body = MessageResponse)
    )
)]
pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse::new(
        "Welcome to the Library Management API! Visit /swagger-ui for interactive documentation.",
    ))
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<crate::AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        total_books: state.services.catalog.count_books().await,
        total_members: state.services.members.count_members().await,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
