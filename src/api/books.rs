//! Book (catalog) endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{DEFAULT_FILE_FORMAT, TAG_AUDIO, TAG_ELECTRONIC, TAG_PLAIN},
        Book, BookKind,
    },
};

use super::MessageResponse;

/// Book as returned by the API
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BookResponse {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub is_borrowed: bool,
    /// "Book", "EBook" or "AudioBook"
    pub book_type: String,
    /// E-book file format
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_format: Option<String>,
    /// Audiobook duration in minutes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
}

impl From<Book> for BookResponse {
    fn from(book: Book) -> Self {
        let book_type = book.kind.tag().to_string();
        let is_borrowed = book.is_borrowed();
        let (file_format, duration) = match book.kind {
            BookKind::Plain => (None, None),
            BookKind::Electronic { file_format } => (Some(file_format), None),
            BookKind::Audio { duration } => (None, Some(duration)),
        };

        Self {
            title: book.title,
            author: book.author,
            isbn: book.isbn,
            is_borrowed,
            book_type,
            file_format,
            duration,
        }
    }
}

/// Add a book by ISBN, fetching its details from Open Library
#[derive(Deserialize, ToSchema)]
pub struct AddBookRequest {
    /// ISBN of the book to add
    #[schema(example = "9780743273565")]
    pub isbn: String,
}

/// Add a book with all details entered by hand
#[derive(Deserialize, Validate, ToSchema)]
pub struct ManualBookRequest {
    /// "Book" (default), "EBook" or "AudioBook"
    pub book_type: Option<String>,
    #[validate(length(min = 1, message = "Title cannot be empty"))]
    pub title: String,
    #[validate(length(min = 1, message = "Author cannot be empty"))]
    pub author: String,
    #[validate(length(min = 1, message = "ISBN cannot be empty"))]
    pub isbn: String,
    /// E-book file format, defaults to PDF
    pub file_format: Option<String>,
    /// Audiobook duration in minutes, defaults to 0
    pub duration: Option<u32>,
}

impl TryFrom<ManualBookRequest> for Book {
    type Error = AppError;

    fn try_from(request: ManualBookRequest) -> Result<Self, Self::Error> {
        let kind = match request.book_type.as_deref().unwrap_or(TAG_PLAIN) {
            TAG_PLAIN => BookKind::Plain,
            TAG_ELECTRONIC => BookKind::Electronic {
                file_format: request
                    .file_format
                    .filter(|f| !f.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_FILE_FORMAT.to_string()),
            },
            TAG_AUDIO => BookKind::Audio {
                duration: request.duration.unwrap_or(0),
            },
            other => {
                return Err(AppError::Validation(format!("Unknown book type: {}", other)));
            }
        };

        Ok(Book::new(
            request.title.trim(),
            request.author.trim(),
            request.isbn.trim(),
            kind,
        ))
    }
}

/// List all books
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    responses(
        (status = 200, description = "All books in insertion order", body = Vec<BookResponse>)
    )
)]
pub async fn list_books(State(state): State<crate::AppState>) -> Json<Vec<BookResponse>> {
    let books = state.services.catalog.list_books().await;
    Json(books.into_iter().map(BookResponse::from).collect())
}

/// Get a book by ISBN
#[utoipa::path(
    get,
    path = "/books/{isbn}",
    tag = "books",
    params(
        ("isbn" = String, Path, description = "ISBN of the book")
    ),
    responses(
        (status = 200, description = "Book details", body = BookResponse),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    Path(isbn): Path<String>,
) -> AppResult<Json<BookResponse>> {
    let book = state.services.catalog.get_book(&isbn).await?;
    Ok(Json(book.into()))
}

/// Add a book by ISBN using Open Library
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = AddBookRequest,
    responses(
        (status = 201, description = "Book added", body = BookResponse),
        (status = 404, description = "ISBN not found in Open Library"),
        (status = 409, description = "Book already exists"),
        (status = 422, description = "Empty ISBN")
    )
)]
pub async fn add_book(
    State(state): State<crate::AppState>,
    Json(request): Json<AddBookRequest>,
) -> AppResult<(StatusCode, Json<BookResponse>)> {
    let book = state.services.catalog.add_book_from_isbn(&request.isbn).await?;
    Ok((StatusCode::CREATED, Json(book.into())))
}

/// Add a book with manually entered details
#[utoipa::path(
    post,
    path = "/books/manual",
    tag = "books",
    request_body = ManualBookRequest,
    responses(
        (status = 201, description = "Book added", body = BookResponse),
        (status = 409, description = "Book already exists"),
        (status = 422, description = "Invalid book")
    )
)]
pub async fn add_manual_book(
    State(state): State<crate::AppState>,
    Json(request): Json<ManualBookRequest>,
) -> AppResult<(StatusCode, Json<BookResponse>)> {
    request.validate()?;
    let book = Book::try_from(request)?;
    let created = state.services.catalog.add_book(book).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

/// Delete a book by ISBN
#[utoipa::path(
    delete,
    path = "/books/{isbn}",
    tag = "books",
    params(
        ("isbn" = String, Path, description = "ISBN of the book")
    ),
    responses(
        (status = 200, description = "Book deleted", body = MessageResponse),
        (status = 400, description = "Book is currently borrowed"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    Path(isbn): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let book = state.services.catalog.delete_book(&isbn).await?;
    Ok(Json(MessageResponse::new(format!(
        "Book '{}' with ISBN {} has been successfully deleted",
        book.title, book.isbn
    ))))
}
