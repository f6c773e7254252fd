use async_trait::async_trait;
use libris_db::{classify, DbError};
use sqlx::PgPool;
use time::OffsetDateTime;

use super::models::{Book, CreateBook, CreateReview, PageWindow, Review};
use super::repository::BookRepository;

const BOOK_COLUMNS: &str =
    "id, title, author, isbn, description, published_year, created_at, updated_at";
const REVIEW_COLUMNS: &str = "id, book_id, reviewer_name, rating, comment, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct BookRow {
    id: i64,
    title: String,
    author: String,
    isbn: Option<String>,
    description: Option<String>,
    published_year: Option<i32>,
    created_at: OffsetDateTime,
    updated_at: Option<OffsetDateTime>,
}

impl From<BookRow> for Book {
    fn from(row: BookRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            author: row.author,
            isbn: row.isbn,
            description: row.description,
            published_year: row.published_year,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ReviewRow {
    id: i64,
    book_id: i64,
    reviewer_name: String,
    rating: i32,
    comment: Option<String>,
    created_at: OffsetDateTime,
    updated_at: Option<OffsetDateTime>,
}

impl From<ReviewRow> for Review {
    fn from(row: ReviewRow) -> Self {
        Self {
            id: row.id,
            book_id: row.book_id,
            reviewer_name: row.reviewer_name,
            rating: row.rating,
            comment: row.comment,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Postgres implementation of [`BookRepository`].
#[derive(Clone)]
pub struct PgBookRepository {
    pool: PgPool,
}

impl PgBookRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookRepository for PgBookRepository {
    async fn list_books(&self, window: PageWindow) -> Result<Vec<Book>, DbError> {
        let rows = sqlx::query_as::<_, BookRow>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books ORDER BY id LIMIT $1 OFFSET $2"
        ))
        .bind(window.limit())
        .bind(window.skip())
        .fetch_all(&self.pool)
        .await
        .map_err(classify)?;

        Ok(rows.into_iter().map(Book::from).collect())
    }

    async fn get_book(&self, id: i64) -> Result<Option<Book>, DbError> {
        let row = sqlx::query_as::<_, BookRow>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(classify)?;

        Ok(row.map(Book::from))
    }

    async fn create_book(&self, input: &CreateBook) -> Result<Book, DbError> {
        // Dropping the transaction on an early return rolls it back.
        let mut tx = self.pool.begin().await.map_err(classify)?;

        let row = sqlx::query_as::<_, BookRow>(&format!(
            "INSERT INTO books (title, author, isbn, description, published_year) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {BOOK_COLUMNS}"
        ))
        .bind(&input.title)
        .bind(&input.author)
        .bind(&input.isbn)
        .bind(&input.description)
        .bind(input.published_year)
        .fetch_one(&mut *tx)
        .await
        .map_err(classify)?;

        tx.commit().await.map_err(classify)?;
        Ok(row.into())
    }

    async fn list_reviews(&self, book_id: i64, window: PageWindow) -> Result<Vec<Review>, DbError> {
        let rows = sqlx::query_as::<_, ReviewRow>(&format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews WHERE book_id = $1 \
             ORDER BY created_at, id LIMIT $2 OFFSET $3"
        ))
        .bind(book_id)
        .bind(window.limit())
        .bind(window.skip())
        .fetch_all(&self.pool)
        .await
        .map_err(classify)?;

        Ok(rows.into_iter().map(Review::from).collect())
    }

    async fn create_review(&self, book_id: i64, input: &CreateReview) -> Result<Review, DbError> {
        let mut tx = self.pool.begin().await.map_err(classify)?;

        let row = sqlx::query_as::<_, ReviewRow>(&format!(
            "INSERT INTO reviews (book_id, reviewer_name, rating, comment) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {REVIEW_COLUMNS}"
        ))
        .bind(book_id)
        .bind(&input.reviewer_name)
        .bind(input.rating)
        .bind(&input.comment)
        .fetch_one(&mut *tx)
        .await
        .map_err(classify)?;

        tx.commit().await.map_err(classify)?;
        Ok(row.into())
    }
}
