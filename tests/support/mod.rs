//! Test doubles for the persistence gateway and the cache store.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use libris_app::books::models::{Book, CreateBook, CreateReview, PageWindow, Review};
use libris_app::books::{BookCatalog, BookRepository};
use libris_cache::{CacheClient, CacheError, KeyValueStore, MemoryStore};
use libris_db::DbError;
use time::{macros::datetime, OffsetDateTime};

pub use libris_app::books::cache_keys::LIST_TTL;

const EPOCH: OffsetDateTime = datetime!(2024-05-01 09:00 UTC);

#[derive(Default)]
struct Tables {
    books: Vec<Book>,
    reviews: Vec<Review>,
}

/// Vec-backed gateway that counts every call.
#[derive(Default)]
pub struct InMemoryBooks {
    tables: Mutex<Tables>,
    fail_all: AtomicBool,
    duplicate_constraint: Mutex<Option<String>>,
    pub list_books_calls: AtomicUsize,
    pub get_book_calls: AtomicUsize,
    pub create_book_calls: AtomicUsize,
    pub list_reviews_calls: AtomicUsize,
    pub create_review_calls: AtomicUsize,
}

impl InMemoryBooks {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Insert `count` books directly, bypassing the call counters.
    pub fn seed(&self, count: usize) {
        let mut tables = self.tables.lock().unwrap();
        for _ in 0..count {
            let id = tables.books.len() as i64 + 1;
            tables.books.push(Book {
                id,
                title: format!("Seeded book {id}"),
                author: "Seed Author".to_string(),
                isbn: None,
                description: None,
                published_year: Some(2000),
                created_at: EPOCH + time::Duration::seconds(id),
                updated_at: None,
            });
        }
    }

    /// Make every subsequent call fail with a persistence error.
    pub fn fail_all(&self) {
        self.fail_all.store(true, Ordering::SeqCst);
    }

    /// Make the next `create_book` violate the named unique constraint.
    pub fn violate_constraint_on_create(&self, constraint: &str) {
        *self.duplicate_constraint.lock().unwrap() = Some(constraint.to_string());
    }

    pub fn book_count(&self) -> usize {
        self.tables.lock().unwrap().books.len()
    }

    pub fn review_count(&self) -> usize {
        self.tables.lock().unwrap().reviews.len()
    }

    pub fn calls(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), DbError> {
        if self.fail_all.load(Ordering::SeqCst) {
            Err(DbError::Persistence("connection refused".to_string()))
        } else {
            Ok(())
        }
    }
}

fn window_of<T: Clone>(items: impl Iterator<Item = T>, window: PageWindow) -> Vec<T> {
    items
        .skip(window.skip() as usize)
        .take(window.limit() as usize)
        .collect()
}

#[async_trait]
impl BookRepository for InMemoryBooks {
    async fn list_books(&self, window: PageWindow) -> Result<Vec<Book>, DbError> {
        self.list_books_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        let tables = self.tables.lock().unwrap();
        Ok(window_of(tables.books.iter().cloned(), window))
    }

    async fn get_book(&self, id: i64) -> Result<Option<Book>, DbError> {
        self.get_book_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables.books.iter().find(|book| book.id == id).cloned())
    }

    async fn create_book(&self, input: &CreateBook) -> Result<Book, DbError> {
        self.create_book_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        if let Some(constraint) = self.duplicate_constraint.lock().unwrap().take() {
            return Err(DbError::Duplicate { constraint });
        }

        let mut tables = self.tables.lock().unwrap();
        if let Some(isbn) = &input.isbn {
            if tables.books.iter().any(|book| book.isbn.as_ref() == Some(isbn)) {
                return Err(DbError::Duplicate {
                    constraint: "ix_books_isbn".to_string(),
                });
            }
        }

        let id = tables.books.len() as i64 + 1;
        let book = Book {
            id,
            title: input.title.clone(),
            author: input.author.clone(),
            isbn: input.isbn.clone(),
            description: input.description.clone(),
            published_year: input.published_year,
            created_at: EPOCH + time::Duration::seconds(id),
            updated_at: None,
        };
        tables.books.push(book.clone());
        Ok(book)
    }

    async fn list_reviews(&self, book_id: i64, window: PageWindow) -> Result<Vec<Review>, DbError> {
        self.list_reviews_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        let tables = self.tables.lock().unwrap();
        Ok(window_of(
            tables
                .reviews
                .iter()
                .filter(|review| review.book_id == book_id)
                .cloned(),
            window,
        ))
    }

    async fn create_review(&self, book_id: i64, input: &CreateReview) -> Result<Review, DbError> {
        self.create_review_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        let mut tables = self.tables.lock().unwrap();
        if !tables.books.iter().any(|book| book.id == book_id) {
            return Err(DbError::ForeignKey {
                message: "reviews_book_id_fkey".to_string(),
            });
        }

        let id = tables.reviews.len() as i64 + 1;
        let review = Review {
            id,
            book_id,
            reviewer_name: input.reviewer_name.clone(),
            rating: input.rating,
            comment: input.comment.clone(),
            created_at: EPOCH + time::Duration::seconds(id),
            updated_at: None,
        };
        tables.reviews.push(review.clone());
        Ok(review)
    }
}

/// A cache operation as seen by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOp {
    Get(String),
    Set { key: String, ttl: Duration },
    Delete(String),
}

/// Memory store with switchable failures and an operation log.
#[derive(Default)]
pub struct ScriptedStore {
    inner: MemoryStore,
    fail_get: AtomicBool,
    fail_set: AtomicBool,
    fail_delete: AtomicBool,
    ops: Mutex<Vec<StoreOp>>,
}

impl ScriptedStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fail_gets(&self) {
        self.fail_get.store(true, Ordering::SeqCst);
    }

    pub fn fail_sets(&self) {
        self.fail_set.store(true, Ordering::SeqCst);
    }

    pub fn fail_deletes(&self) {
        self.fail_delete.store(true, Ordering::SeqCst);
    }

    pub fn fail_everything(&self) {
        self.fail_gets();
        self.fail_sets();
        self.fail_deletes();
    }

    pub fn ops(&self) -> Vec<StoreOp> {
        self.ops.lock().unwrap().clone()
    }

    pub fn sets(&self) -> Vec<(String, Duration)> {
        self.ops()
            .into_iter()
            .filter_map(|op| match op {
                StoreOp::Set { key, ttl } => Some((key, ttl)),
                _ => None,
            })
            .collect()
    }

    pub fn deletes(&self) -> Vec<String> {
        self.ops()
            .into_iter()
            .filter_map(|op| match op {
                StoreOp::Delete(key) => Some(key),
                _ => None,
            })
            .collect()
    }

    pub fn clear_log(&self) {
        self.ops.lock().unwrap().clear();
    }

    fn record(&self, op: StoreOp) {
        self.ops.lock().unwrap().push(op);
    }
}

#[async_trait]
impl KeyValueStore for ScriptedStore {
    fn backend(&self) -> &'static str {
        "scripted"
    }

    async fn ping(&self) -> Result<(), CacheError> {
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        self.record(StoreOp::Get(key.to_string()));
        if self.fail_get.load(Ordering::SeqCst) {
            return Err(CacheError::Transport("connection reset by peer".to_string()));
        }
        self.inner.get(key).await
    }

    async fn set_ex(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError> {
        self.record(StoreOp::Set {
            key: key.to_string(),
            ttl,
        });
        if self.fail_set.load(Ordering::SeqCst) {
            return Err(CacheError::Timeout(Duration::from_secs(5)));
        }
        self.inner.set_ex(key, value, ttl).await
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.record(StoreOp::Delete(key.to_string()));
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(CacheError::Transport("connection reset by peer".to_string()));
        }
        self.inner.delete(key).await
    }
}

pub struct Harness {
    pub repo: Arc<InMemoryBooks>,
    pub store: Arc<ScriptedStore>,
    pub catalog: Arc<BookCatalog>,
}

impl Harness {
    pub async fn new() -> Self {
        let repo = InMemoryBooks::new();
        let store = ScriptedStore::new();
        let cache = CacheClient::with_store(store.clone()).await;
        let catalog = Arc::new(BookCatalog::new(repo.clone(), cache));
        Self {
            repo,
            store,
            catalog,
        }
    }

    /// Catalog whose cache never came up.
    pub fn without_cache() -> Self {
        let repo = InMemoryBooks::new();
        let catalog = Arc::new(BookCatalog::new(repo.clone(), CacheClient::disabled()));
        Self {
            repo,
            store: ScriptedStore::new(),
            catalog,
        }
    }
}

pub fn new_book(title: &str, isbn: Option<&str>) -> CreateBook {
    CreateBook {
        title: title.to_string(),
        author: "Octavia E. Butler".to_string(),
        isbn: isbn.map(str::to_string),
        description: Some("A novel".to_string()),
        published_year: Some(1993),
    }
}

pub fn window(skip: i64, limit: i64) -> PageWindow {
    PageWindow::new(skip, limit).unwrap()
}
