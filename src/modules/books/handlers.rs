use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use libris_http::error::AppError;

use super::models::{
    Book, CreateBook, CreateReview, FieldViolation, PageParams, PageWindow, Review,
};
use super::service::{BookCatalog, CatalogError};

type Catalog = State<Arc<BookCatalog>>;

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Invalid(violations) => invalid(violations),
            CatalogError::BookNotFound(_) => AppError::not_found(err.to_string()),
            CatalogError::DuplicateIsbn => {
                AppError::bad_request_with_code("duplicate_isbn", err.to_string())
            }
            CatalogError::DuplicateBook => {
                AppError::bad_request_with_code("duplicate_record", err.to_string())
            }
            CatalogError::Persistence { .. } => AppError::Internal(anyhow::Error::new(err)),
        }
    }
}

fn invalid(violations: Vec<FieldViolation>) -> AppError {
    let details = violations
        .into_iter()
        .map(|violation| serde_json::json!({ "field": violation.field, "error": violation.error }))
        .collect();
    AppError::validation(details, "Validation failed")
}

fn page(query: Result<Query<PageParams>, QueryRejection>) -> Result<PageWindow, AppError> {
    let Query(params) = query?;
    params.window().map_err(invalid)
}

/// `GET /`, one page of books read through the cache.
pub async fn list_books(
    State(catalog): Catalog,
    query: Result<Query<PageParams>, QueryRejection>,
) -> Result<Json<Vec<Book>>, AppError> {
    let window = page(query)?;
    Ok(Json(catalog.list_books(window).await?))
}

/// `POST /`
pub async fn create_book(
    State(catalog): Catalog,
    payload: Result<Json<CreateBook>, JsonRejection>,
) -> Result<(StatusCode, Json<Book>), AppError> {
    let Json(input) = payload?;
    let book = catalog.create_book(&input).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// `GET /{book_id}`
pub async fn get_book(
    State(catalog): Catalog,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Book>, AppError> {
    let Path(book_id) = path?;
    Ok(Json(catalog.get_book(book_id).await?))
}

/// `GET /{book_id}/reviews`
pub async fn list_reviews(
    State(catalog): Catalog,
    path: Result<Path<i64>, PathRejection>,
    query: Result<Query<PageParams>, QueryRejection>,
) -> Result<Json<Vec<Review>>, AppError> {
    let Path(book_id) = path?;
    let window = page(query)?;
    Ok(Json(catalog.list_reviews(book_id, window).await?))
}

/// `POST /{book_id}/reviews`
pub async fn create_review(
    State(catalog): Catalog,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<CreateReview>, JsonRejection>,
) -> Result<(StatusCode, Json<Review>), AppError> {
    let Path(book_id) = path?;
    let Json(input) = payload?;
    let review = catalog.create_review(book_id, &input).await?;
    Ok((StatusCode::CREATED, Json(review)))
}
