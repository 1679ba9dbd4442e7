//! Member management endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{error::AppResult, models::Member};

use super::{books::BookResponse, MessageResponse};

/// Member as returned by the API
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MemberResponse {
    pub name: String,
    pub member_id: String,
    pub email: String,
    /// ISBNs currently borrowed, oldest first
    pub borrowed_books: Vec<String>,
}

impl From<Member> for MemberResponse {
    fn from(member: Member) -> Self {
        Self {
            borrowed_books: member.borrowed_books().to_vec(),
            name: member.name,
            member_id: member.member_id,
            email: member.email,
        }
    }
}

/// Create member request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateMemberRequest {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: String,
    #[validate(length(min = 1, message = "Member ID cannot be empty"))]
    pub member_id: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

/// List all members
#[utoipa::path(
    get,
    path = "/members",
    tag = "members",
    responses(
        (status = 200, description = "All members in insertion order", body = Vec<MemberResponse>)
    )
)]
pub async fn list_members(State(state): State<crate::AppState>) -> Json<Vec<MemberResponse>> {
    let members = state.services.members.list_members().await;
    Json(members.into_iter().map(MemberResponse::from).collect())
}

/// Get a member by ID
#[utoipa::path(
    get,
    path = "/members/{id}",
    tag = "members",
    params(
        ("id" = String, Path, description = "Member ID")
    ),
    responses(
        (status = 200, description = "Member details", body = MemberResponse),
        (status = 404, description = "Member not found")
    )
)]
pub async fn get_member(
    State(state): State<crate::AppState>,
    Path(member_id): Path<String>,
) -> AppResult<Json<MemberResponse>> {
    let member = state.services.members.get_member(&member_id).await?;
    Ok(Json(member.into()))
}

/// Register a new member
#[utoipa::path(
    post,
    path = "/members",
    tag = "members",
    request_body = CreateMemberRequest,
    responses(
        (status = 201, description = "Member created", body = MemberResponse),
        (status = 409, description = "Member ID already exists"),
        (status = 422, description = "Invalid input")
    )
)]
pub async fn create_member(
    State(state): State<crate::AppState>,
    Json(request): Json<CreateMemberRequest>,
) -> AppResult<(StatusCode, Json<MemberResponse>)> {
    request.validate()?;

    let member = Member::new(
        request.name.trim(),
        request.member_id.trim(),
        request.email.trim(),
    );
    let created = state.services.members.add_member(member).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

/// Delete a member
#[utoipa::path(
    delete,
    path = "/members/{id}",
    tag = "members",
    params(
        ("id" = String, Path, description = "Member ID")
    ),
    responses(
        (status = 200, description = "Member deleted", body = MessageResponse),
        (status = 404, description = "Member not found"),
        (status = 409, description = "Member still has borrowed books")
    )
)]
pub async fn delete_member(
    State(state): State<crate::AppState>,
    Path(member_id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let member = state.services.members.delete_member(&member_id).await?;
    Ok(Json(MessageResponse::new(format!(
        "Member {} has been successfully deleted",
        member.member_id
    ))))
}

/// Books currently borrowed by a member
#[utoipa::path(
    get,
    path = "/members/{id}/loans",
    tag = "members",
    params(
        ("id" = String, Path, description = "Member ID")
    ),
    responses(
        (status = 200, description = "Borrowed books, oldest first", body = Vec<BookResponse>),
        (status = 404, description = "Member not found")
    )
)]
pub async fn get_member_loans(
    State(state): State<crate::AppState>,
    Path(member_id): Path<String>,
) -> AppResult<Json<Vec<BookResponse>>> {
    let books = state.services.loans.member_loans(&member_id).await?;
    Ok(Json(books.into_iter().map(BookResponse::from).collect()))
}
