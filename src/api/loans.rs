//! Loan management endpoints

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppResult;

use super::books::BookResponse;

/// Borrow or return request
#[derive(Deserialize, ToSchema)]
pub struct LoanRequest {
    /// Member ID
    pub member_id: String,
    /// ISBN of the book
    pub isbn: String,
}

/// Loan operation result
#[derive(Serialize, Deserialize, ToSchema)]
pub struct LoanResponse {
    /// Status message
    pub message: String,
    /// Book state after the operation
    pub book: BookResponse,
}

/// Borrow a book for a member
#[utoipa::path(
    post,
    path = "/loans",
    tag = "loans",
    request_body = LoanRequest,
    responses(
        (status = 200, description = "Book borrowed", body = LoanResponse),
        (status = 404, description = "Member or book not found"),
        (status = 409, description = "Book already borrowed")
    )
)]
pub async fn borrow_book(
    State(state): State<crate::AppState>,
    Json(request): Json<LoanRequest>,
) -> AppResult<Json<LoanResponse>> {
    let book = state
        .services
        .loans
        .borrow(&request.member_id, &request.isbn)
        .await?;

    Ok(Json(LoanResponse {
        message: "Book borrowed successfully.".to_string(),
        book: book.into(),
    }))
}

/// Return a borrowed book
#[utoipa::path(
    post,
    path = "/loans/return",
    tag = "loans",
    request_body = LoanRequest,
    responses(
        (status = 200, description = "Book returned", body = LoanResponse),
        (status = 404, description = "Member or book not found"),
        (status = 409, description = "Book not borrowed by this member")
    )
)]
pub async fn return_book(
    State(state): State<crate::AppState>,
    Json(request): Json<LoanRequest>,
) -> AppResult<Json<LoanResponse>> {
    let book = state
        .services
        .loans
        .return_book(&request.member_id, &request.isbn)
        .await?;

    Ok(Json(LoanResponse {
        message: "Book returned successfully.".to_string(),
        book: book.into(),
    }))
}
