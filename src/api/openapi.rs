//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{books, health, loans, members, MessageResponse};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Library Management API",
        version = "1.0.0",
        description = "Personal library catalog: books, members and loans"
    ),
    paths(
        // Health
        health::root,
        health::health_check,
        // Books
        books::list_books,
        books::get_book,
        books::add_book,
        books::add_manual_book,
        books::delete_book,
        // Members
        members::list_members,
        members::get_member,
        members::create_member,
        members::delete_member,
        members::get_member_loans,
        // Loans
        loans::borrow_book,
        loans::return_book,
    ),
    components(
        schemas(
            books::BookResponse,
            books::AddBookRequest,
            books::ManualBookRequest,
            members::MemberResponse,
            members::CreateMemberRequest,
            loans::LoanRequest,
            loans::LoanResponse,
            health::HealthResponse,
            MessageResponse,
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "books", description = "Catalog management"),
        (name = "members", description = "Member management"),
        (name = "loans", description = "Borrowing and returns")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
